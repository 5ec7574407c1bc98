//! Rectangle vs tile-grid collision
//!
//! Moving bodies integrate one axis at a time: move X, resolve; move Y,
//! resolve. Each resolve call reports a single-axis correction, taken from the
//! axis of smallest overlap against the most deeply penetrated solid tile.

use glam::Vec2;

use super::level::TileMap;

/// Overlaps at or below this depth count as touching, not penetrating
pub const CONTACT_EPSILON: f32 = 0.01;

/// Axis-aligned rectangle (top-left origin, y down)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self::new(pos.x, pos.y, size.x, size.y)
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w * 0.5, self.y + self.h * 0.5)
    }

    /// Strict overlap test (shared edges do not overlap)
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }
}

/// Result of resolving a rectangle against the tile grid
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CollisionResult {
    /// Whether any solid tile overlaps the rectangle
    pub hit: bool,
    /// Horizontal correction (zero unless X was the resolving axis)
    pub dx: f32,
    /// Vertical correction (zero unless Y was the resolving axis)
    pub dy: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self::default()
    }
}

/// Check a rectangle against the solid tiles of `map`
///
/// For each overlapping solid tile the smaller overlap axis yields a candidate
/// correction that pushes the rectangle toward the side its center is nearer
/// to. The deepest candidate wins; ties between axes favour Y.
pub fn resolve_rect(map: &TileMap, rect: Rect) -> CollisionResult {
    let ts = map.tile_size();
    let max_col = map.cols() as i32 - 1;
    let max_row = map.rows() as i32 - 1;
    if max_col < 0 || max_row < 0 {
        return CollisionResult::miss();
    }

    // Cells touched by the rectangle, clamped to the grid
    let c0 = ((rect.x / ts).floor() as i32).max(0);
    let c1 = ((rect.right() / ts).ceil() as i32 - 1).min(max_col);
    let r0 = ((rect.y / ts).floor() as i32).max(0);
    let r1 = ((rect.bottom() / ts).ceil() as i32 - 1).min(max_row);

    let center = rect.center();
    let mut result = CollisionResult::miss();
    let mut deepest = 0.0f32;

    for row in r0..=r1 {
        for col in c0..=c1 {
            if !map.is_solid(col, row) {
                continue;
            }

            let tx = col as f32 * ts;
            let ty = row as f32 * ts;
            let ox = rect.right().min(tx + ts) - rect.x.max(tx);
            let oy = rect.bottom().min(ty + ts) - rect.y.max(ty);
            if ox <= CONTACT_EPSILON || oy <= CONTACT_EPSILON {
                continue;
            }

            result.hit = true;
            let tile_center = Vec2::new(tx + ts * 0.5, ty + ts * 0.5);
            if ox < oy {
                if ox > deepest {
                    deepest = ox;
                    result.dx = if center.x < tile_center.x { -ox } else { ox };
                    result.dy = 0.0;
                }
            } else if oy > deepest {
                deepest = oy;
                result.dx = 0.0;
                result.dy = if center.y < tile_center.y { -oy } else { oy };
            }
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::TILE_SIZE;
    use crate::sim::level::Tile;
    use proptest::prelude::*;

    /// 12 × 20 map with a single block at (5, 5) and a ground row at the bottom
    fn test_map() -> TileMap {
        let mut map = TileMap::new(12, 20);
        map.set(5, 5, Tile::Block);
        map.fill(0, 11, 20, 1, Tile::Ground);
        map
    }

    #[test]
    fn test_resolve_landing() {
        let map = test_map();
        // Player-sized rect sunk 3 units into the ground row
        let rect = Rect::new(64.0, 11.0 * TILE_SIZE - 25.0, 20.0, 28.0);
        let result = resolve_rect(&map, rect);
        assert!(result.hit);
        assert_eq!(result.dx, 0.0);
        assert!((result.dy + 3.0).abs() < 1e-4);
    }

    #[test]
    fn test_resting_contact_is_not_a_hit() {
        let map = test_map();
        let rect = Rect::new(64.0, 11.0 * TILE_SIZE - 28.0, 20.0, 28.0);
        assert!(!resolve_rect(&map, rect).hit);
    }

    #[test]
    fn test_non_solid_tiles_ignored() {
        let mut map = TileMap::new(4, 4);
        map.set(1, 1, Tile::Spike);
        map.set(2, 1, Tile::Flag);
        let rect = Rect::new(32.0, 32.0, 64.0, 32.0);
        assert!(!resolve_rect(&map, rect).hit);
    }

    #[test]
    fn test_query_outside_grid() {
        let map = test_map();
        let rect = Rect::new(-500.0, -500.0, 40.0, 40.0);
        assert_eq!(resolve_rect(&map, rect), CollisionResult::miss());
        let rect = Rect::new(10_000.0, 10_000.0, 40.0, 40.0);
        assert_eq!(resolve_rect(&map, rect), CollisionResult::miss());
    }

    #[test]
    fn test_rect_overlaps_is_strict() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(a.overlaps(&Rect::new(9.0, 9.0, 5.0, 5.0)));
        assert!(!a.overlaps(&Rect::new(10.0, 0.0, 5.0, 5.0)));
        assert!(!a.overlaps(&Rect::new(0.0, 10.0, 5.0, 5.0)));
    }

    proptest! {
        #[test]
        fn prop_clear_rects_never_collide(
            x in -100.0f32..700.0,
            y in -100.0f32..100.0,
            w in 1.0f32..60.0,
            h in 1.0f32..50.0,
        ) {
            // Everything above row 5 is open sky in the test map
            let map = test_map();
            let rect = Rect::new(x, y, w, h.min(5.0 * TILE_SIZE - y - 0.5).max(0.5));
            let result = resolve_rect(&map, rect);
            prop_assert!(!result.hit);
            prop_assert_eq!(result.dx, 0.0);
            prop_assert_eq!(result.dy, 0.0);
        }

        #[test]
        fn prop_single_tile_overlap_from_left(
            w in 10.0f32..30.0,
            h in 20.0f32..30.0,
            depth in 0.5f32..9.0,
        ) {
            let map = test_map();
            let tile_x = 5.0 * TILE_SIZE;
            let rect = Rect::new(tile_x - w + depth, 5.0 * TILE_SIZE + 1.0, w, h);
            let result = resolve_rect(&map, rect);
            prop_assert!(result.hit);
            prop_assert!((result.dx + depth).abs() < 1e-3, "dx {} depth {}", result.dx, depth);
            prop_assert_eq!(result.dy, 0.0);
        }

        #[test]
        fn prop_single_tile_overlap_from_right(
            w in 10.0f32..30.0,
            h in 20.0f32..30.0,
            depth in 0.5f32..9.0,
        ) {
            let map = test_map();
            let tile_right = 6.0 * TILE_SIZE;
            let rect = Rect::new(tile_right - depth, 5.0 * TILE_SIZE + 1.0, w, h);
            let result = resolve_rect(&map, rect);
            prop_assert!(result.hit);
            prop_assert!((result.dx - depth).abs() < 1e-3);
            prop_assert_eq!(result.dy, 0.0);
        }

        #[test]
        fn prop_single_tile_overlap_from_above(
            w in 20.0f32..30.0,
            depth in 0.5f32..9.0,
        ) {
            let map = test_map();
            let tile_y = 5.0 * TILE_SIZE;
            let rect = Rect::new(5.0 * TILE_SIZE + 1.0, tile_y - 28.0 + depth, w, 28.0);
            let result = resolve_rect(&map, rect);
            prop_assert!(result.hit);
            prop_assert!((result.dy + depth).abs() < 1e-3);
            prop_assert_eq!(result.dx, 0.0);
        }

        #[test]
        fn prop_single_tile_overlap_from_below(
            w in 20.0f32..30.0,
            depth in 0.5f32..9.0,
        ) {
            let map = test_map();
            let tile_bottom = 6.0 * TILE_SIZE;
            let rect = Rect::new(5.0 * TILE_SIZE + 1.0, tile_bottom - depth, w, 28.0);
            let result = resolve_rect(&map, rect);
            prop_assert!(result.hit);
            prop_assert!((result.dy - depth).abs() < 1e-3);
            prop_assert_eq!(result.dx, 0.0);
        }
    }
}
