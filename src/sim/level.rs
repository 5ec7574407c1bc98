//! Tile map and level generation
//!
//! The level is a fixed grid of typed cells. Generation is a pure function of
//! the grid dimensions, so calling it again yields an identical level.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{Enemy, EnemyVariant, Orb};
use crate::consts::*;

/// Tile types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Tile {
    #[default]
    Empty,
    Ground,
    Block,
    Spike,
    Flag,
}

impl Tile {
    /// Solid tiles stop movement
    pub fn is_solid(self) -> bool {
        match self {
            Tile::Ground | Tile::Block => true,
            Tile::Empty | Tile::Spike | Tile::Flag => false,
        }
    }

    /// Hazard tiles kill the player on contact
    pub fn is_hazard(self) -> bool {
        matches!(self, Tile::Spike)
    }

    /// Goal tiles win the level
    pub fn is_goal(self) -> bool {
        matches!(self, Tile::Flag)
    }
}

/// Rows × cols grid of tiles (row 0 is the top of the world)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileMap {
    rows: usize,
    cols: usize,
    tile_size: f32,
    tiles: Vec<Tile>,
}

impl TileMap {
    /// Create an empty map
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            tile_size: TILE_SIZE,
            tiles: vec![Tile::Empty; rows * cols],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    /// World width in units
    pub fn width(&self) -> f32 {
        self.cols as f32 * self.tile_size
    }

    /// World height in units
    pub fn height(&self) -> f32 {
        self.rows as f32 * self.tile_size
    }

    fn index(&self, col: i32, row: i32) -> Option<usize> {
        if col < 0 || row < 0 {
            return None;
        }
        let (col, row) = (col as usize, row as usize);
        if col >= self.cols || row >= self.rows {
            return None;
        }
        Some(row * self.cols + col)
    }

    /// Tile at (col, row); anything outside the grid is Empty
    pub fn get(&self, col: i32, row: i32) -> Tile {
        self.index(col, row)
            .map(|i| self.tiles[i])
            .unwrap_or(Tile::Empty)
    }

    /// Tile containing the world point (x, y)
    pub fn tile_at(&self, x: f32, y: f32) -> Tile {
        let (col, row) = self.cell_of(x, y);
        self.get(col, row)
    }

    /// Cell coordinates containing a world point
    pub fn cell_of(&self, x: f32, y: f32) -> (i32, i32) {
        (
            (x / self.tile_size).floor() as i32,
            (y / self.tile_size).floor() as i32,
        )
    }

    pub fn is_solid(&self, col: i32, row: i32) -> bool {
        self.get(col, row).is_solid()
    }

    /// Set a tile; writes outside the grid are ignored
    pub fn set(&mut self, col: i32, row: i32, tile: Tile) {
        if let Some(i) = self.index(col, row) {
            self.tiles[i] = tile;
        }
    }

    /// Fill a rectangle of cells (clipped to the grid)
    pub fn fill(&mut self, col: i32, row: i32, width: i32, height: i32, tile: Tile) {
        for r in row..row + height {
            for c in col..col + width {
                self.set(c, r, tile);
            }
        }
    }

    /// Top edge (world y) of the first solid tile at or below `row` in `col`
    pub fn surface_below(&self, col: i32, row: i32) -> Option<f32> {
        (row.max(0)..self.rows as i32)
            .find(|&r| self.is_solid(col, r))
            .map(|r| r as f32 * self.tile_size)
    }
}

/// Pit columns repeat every this many tiles
const PIT_PERIOD: usize = 15;
/// Width of each pit in tiles
const PIT_WIDTH: usize = 2;
/// No pits before this column (safe start area)
const PIT_START_COL: usize = 12;
/// No pits within this many columns of the right edge (goal approach)
const PIT_END_MARGIN: usize = 8;

/// Returns true when `col` is a pit in the ground strip
pub fn is_pit_column(col: usize, cols: usize) -> bool {
    col >= PIT_START_COL
        && col + PIT_END_MARGIN < cols
        && (col + 1) % PIT_PERIOD < PIT_WIDTH
}

/// Floating platforms: (col, tiles the top sits above the ground surface, width, height)
const PLATFORMS: [(i32, i32, i32, i32); 11] = [
    (8, 2, 3, 1),
    (13, 3, 4, 1),
    (19, 4, 3, 1),
    (27, 2, 5, 1),
    (36, 3, 4, 1),
    (41, 5, 3, 1),
    (48, 3, 4, 1),
    (56, 2, 4, 1),
    (78, 3, 3, 1),
    (86, 4, 5, 1),
    (98, 2, 4, 2),
];

/// Spike clusters on the ground surface: (first col, width)
const SPIKE_CLUSTERS: [(i32, i32); 3] = [(22, 2), (52, 3), (82, 2)];

/// Secondary ground strip: (first col, width, rows above the ground surface)
const UPPER_STRIP: (i32, i32, i32) = (62, 12, 5);

/// Generate the level grid
///
/// Layout (from the bottom up):
/// - ground strip two tiles deep with periodic pits
/// - a secondary partial ground strip above the middle of the level
/// - eleven floating block platforms
/// - three spike clusters resting on the ground
/// - a three-tile-tall goal flag near the right edge
pub fn generate_level(rows: usize, cols: usize) -> TileMap {
    let mut map = TileMap::new(rows, cols);
    if rows < 8 || cols < 24 {
        log::warn!("Level {}x{} too small for the standard layout", rows, cols);
        return map;
    }

    // Ground strip occupies the bottom two rows; `surface` is its top row
    let surface = rows as i32 - 2;
    for col in 0..cols {
        if !is_pit_column(col, cols) {
            map.fill(col as i32, surface, 1, 2, Tile::Ground);
        }
    }

    let (strip_col, strip_width, strip_rise) = UPPER_STRIP;
    let strip_col = strip_col.min(cols as i32 - strip_width);
    map.fill(strip_col, surface - strip_rise, strip_width, 1, Tile::Ground);

    for &(col, rise, width, height) in &PLATFORMS {
        map.fill(col, surface - rise, width, height, Tile::Block);
    }

    for &(col, width) in &SPIKE_CLUSTERS {
        map.fill(col, surface - 1, width, 1, Tile::Spike);
    }

    let flag_col = cols as i32 - 4;
    map.fill(flag_col, surface - 3, 1, 3, Tile::Flag);

    log::info!(
        "Generated level {}x{} ({} platforms, {} spike clusters)",
        rows,
        cols,
        PLATFORMS.len(),
        SPIKE_CLUSTERS.len()
    );
    map
}

/// Where the player starts: standing on the ground strip near the left edge
pub fn player_spawn(map: &TileMap) -> Vec2 {
    let ts = map.tile_size();
    let x = PLAYER_SPAWN_COL as f32 * ts;
    let ground = map
        .surface_below(PLAYER_SPAWN_COL as i32, 0)
        .unwrap_or(map.height());
    Vec2::new(x, ground - PLAYER_HEIGHT)
}

/// Enemy start cells: (col, rows above the ground surface it stands on)
const ENEMY_SPAWNS: [(i32, i32); 8] = [
    (18, 0),
    (34, 0),
    (37, 3),
    (47, 0),
    (66, 0),
    (79, 0),
    (95, 0),
    (110, 0),
];

/// Enemies placed at fixed tile coordinates, alternating variant and heading
pub fn default_enemies(map: &TileMap) -> Vec<Enemy> {
    let ts = map.tile_size();
    let surface = map.rows() as i32 - 2;
    ENEMY_SPAWNS
        .iter()
        .enumerate()
        .filter(|&(_, &(col, _))| (col as usize) < map.cols())
        .map(|(i, &(col, rise))| {
            let feet = (surface - rise) as f32 * ts;
            let variant = if i % 2 == 0 {
                EnemyVariant::Trick
            } else {
                EnemyVariant::Hyper
            };
            let heading = if i % 2 == 0 { -1.0 } else { 1.0 };
            let x = col as f32 * ts + (ts - ENEMY_WIDTH) / 2.0;
            let mut enemy = Enemy::new(i as u32, Vec2::new(x, feet - ENEMY_HEIGHT), variant);
            enemy.vel.x = ENEMY_SPEED * heading;
            enemy.phase = i as f32 * 0.7;
            enemy
        })
        .collect()
}

/// Orb columns with a nominal row (rows from the top), snapped down at init
const ORB_SPAWNS: [(i32, i32); 18] = [
    (6, 12),
    (9, 9),
    (17, 12),
    (25, 12),
    (29, 8),
    (33, 12),
    (38, 8),
    (43, 6),
    (50, 9),
    (57, 9),
    (64, 13),
    (70, 13),
    (80, 9),
    (88, 8),
    (93, 12),
    (100, 9),
    (108, 12),
    (113, 12),
];

/// Orbs at fixed columns, each snapped above the surface under it
pub fn default_orbs(map: &TileMap) -> Vec<Orb> {
    let ts = map.tile_size();
    ORB_SPAWNS
        .iter()
        .filter(|&&(col, _)| (col as usize) < map.cols())
        .enumerate()
        .map(|(i, &(col, row))| {
            let x = col as f32 * ts + ts / 2.0;
            let y = snap_orb(map, x, row as f32 * ts + ts / 2.0);
            Orb::new(i as u32, Vec2::new(x, y))
        })
        .collect()
}

/// Snap an orb so it hovers just above the nearest walkable surface below
/// `nominal_y`. Orbs with nothing solid below keep their nominal height.
pub fn snap_orb(map: &TileMap, x: f32, nominal_y: f32) -> f32 {
    let (col, row) = map.cell_of(x, nominal_y);
    match map.surface_below(col, row) {
        Some(surface) => surface - ORB_RADIUS - ORB_HOVER,
        None => nominal_y,
    }
}
