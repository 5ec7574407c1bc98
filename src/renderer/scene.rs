//! Scene projection
//!
//! Turns a read-only view of the session into one triangle list in logical
//! screen units. Draw order is back to front: sky, streaks, tiles, orbs,
//! enemies, trail, player, HUD strip, full-screen tint.

use glam::Vec2;

use super::backdrop::Backdrop;
use super::shapes;
use super::vertex::{Vertex, colors};
use crate::quality::VisualParams;
use crate::sim::{EnemyVariant, GameState, Tile, Viewport};

/// Height of the in-canvas HUD strip
pub const HUD_HEIGHT: f32 = 28.0;
/// Segments for the solid part of an orb
const ORB_SEGMENTS: u32 = 12;
/// Segments for an orb's glow ring
const ORB_GLOW_SEGMENTS: u32 = 16;

/// Everything the renderer needs besides the session
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub viewport: Viewport,
    pub params: VisualParams,
    pub backdrop: &'a Backdrop,
    /// Seconds since start (animation only)
    pub time: f32,
    /// Trail points to draw (0 disables the trail)
    pub trail_points: usize,
    /// Freeze parallax and bobbing
    pub reduced_motion: bool,
}

impl<'a> RenderContext<'a> {
    pub fn new(viewport: Viewport, params: VisualParams, backdrop: &'a Backdrop) -> Self {
        Self {
            viewport,
            params,
            backdrop,
            time: 0.0,
            trail_points: crate::consts::TRAIL_LENGTH,
            reduced_motion: false,
        }
    }
}

/// Build the frame's vertices
pub fn build_scene(state: &GameState, ctx: &RenderContext) -> Vec<Vertex> {
    let mut out = Vec::with_capacity(4096);
    let cam = state.camera.pos;
    let view = Vec2::new(ctx.viewport.width, ctx.viewport.height);

    shapes::gradient_rect(
        &mut out,
        0.0,
        0.0,
        view.x,
        view.y,
        colors::SKY_TOP,
        colors::SKY_BOTTOM,
    );

    draw_streaks(&mut out, ctx, cam, view);
    draw_tiles(&mut out, state, cam, view);
    draw_orbs(&mut out, state, ctx, cam, view);
    draw_enemies(&mut out, state, ctx, cam, view);

    // --- PLAYER ---
    let player = &state.player;
    if ctx.trail_points > 0 && !state.dead {
        let skip = player.trail.len().saturating_sub(ctx.trail_points);
        let points: Vec<Vec2> = player.trail[skip..]
            .iter()
            .map(|p| *p + player.size * 0.5 - cam)
            .collect();
        shapes::trail(&mut out, &points, player.size.x * 0.6, colors::TRAIL);
    }
    let color = if player.can_fly {
        colors::PLAYER_FLY
    } else {
        colors::PLAYER
    };
    let p = player.pos - cam;
    shapes::rect(&mut out, p.x, p.y, player.size.x, player.size.y, color);

    draw_hud(&mut out, state, view);

    if state.dead {
        shapes::rect(&mut out, 0.0, 0.0, view.x, view.y, colors::DEAD_TINT);
    } else if state.won {
        shapes::rect(&mut out, 0.0, 0.0, view.x, view.y, colors::WON_TINT);
    }

    out
}

fn on_screen(pos: Vec2, size: Vec2, view: Vec2) -> bool {
    pos.x + size.x > 0.0 && pos.x < view.x && pos.y + size.y > 0.0 && pos.y < view.y
}

fn draw_streaks(out: &mut Vec<Vertex>, ctx: &RenderContext, cam: Vec2, view: Vec2) {
    let scroll = if ctx.reduced_motion { Vec2::ZERO } else { cam };
    for (pos, streak) in ctx.backdrop.layout(ctx.params.streaks, scroll, view) {
        let color = colors::with_alpha(colors::STREAK, streak.alpha);
        shapes::rect(out, pos.x, pos.y, streak.len, 2.0, color);
    }
}

/// Only cells overlapping the view are emitted
fn draw_tiles(out: &mut Vec<Vertex>, state: &GameState, cam: Vec2, view: Vec2) {
    let map = &state.level;
    let ts = map.tile_size();
    let c0 = (cam.x / ts).floor().max(0.0) as i32;
    let c1 = (((cam.x + view.x) / ts).ceil() as i32).min(map.cols() as i32);
    let r0 = (cam.y / ts).floor().max(0.0) as i32;
    let r1 = (((cam.y + view.y) / ts).ceil() as i32).min(map.rows() as i32);

    for row in r0..r1 {
        for col in c0..c1 {
            let tile = map.get(col, row);
            let x = col as f32 * ts - cam.x;
            let y = row as f32 * ts - cam.y;
            match tile {
                Tile::Empty => {}
                Tile::Ground => {
                    shapes::rect(out, x, y, ts, ts, colors::GROUND);
                    if !map.is_solid(col, row - 1) {
                        shapes::rect(out, x, y, ts, 5.0, colors::GROUND_TOP);
                    }
                }
                Tile::Block => {
                    shapes::rect(out, x, y, ts, ts, colors::BLOCK_EDGE);
                    shapes::rect(out, x + 2.0, y + 2.0, ts - 4.0, ts - 4.0, colors::BLOCK);
                }
                Tile::Spike => {
                    // Three teeth along the cell's bottom edge
                    let tooth = ts / 3.0;
                    for i in 0..3 {
                        let left = x + i as f32 * tooth;
                        shapes::triangle(
                            out,
                            Vec2::new(left, y + ts),
                            Vec2::new(left + tooth, y + ts),
                            Vec2::new(left + tooth * 0.5, y + ts * 0.35),
                            colors::SPIKE,
                        );
                    }
                }
                Tile::Flag => {
                    shapes::rect(out, x + ts * 0.45, y, 3.0, ts, colors::FLAG_POLE);
                    if !map.get(col, row - 1).is_goal() {
                        let pole = Vec2::new(x + ts * 0.45 + 3.0, y + 2.0);
                        shapes::triangle(
                            out,
                            pole,
                            pole + Vec2::new(ts * 0.5, ts * 0.25),
                            pole + Vec2::new(0.0, ts * 0.5),
                            colors::FLAG,
                        );
                    }
                }
            }
        }
    }
}

fn draw_orbs(out: &mut Vec<Vertex>, state: &GameState, ctx: &RenderContext, cam: Vec2, view: Vec2) {
    for orb in state.orbs.iter().filter(|o| !o.collected) {
        let bob = if ctx.reduced_motion {
            0.0
        } else {
            (ctx.time * 3.0 + orb.id as f32).sin() * 2.0
        };
        let center = orb.pos - cam + Vec2::new(0.0, bob);
        let glow_radius = orb.radius + ctx.params.orb_glow as f32;
        let reach = Vec2::splat(glow_radius);
        if !on_screen(center - reach, reach * 2.0, view) {
            continue;
        }
        shapes::ring(
            out,
            center,
            orb.radius,
            glow_radius,
            colors::ORB_GLOW,
            colors::with_alpha(colors::ORB_GLOW, 0.0),
            ORB_GLOW_SEGMENTS,
        );
        shapes::circle(out, center, orb.radius, colors::ORB, ORB_SEGMENTS);
    }
}

fn draw_enemies(
    out: &mut Vec<Vertex>,
    state: &GameState,
    ctx: &RenderContext,
    cam: Vec2,
    view: Vec2,
) {
    for enemy in state.enemies.iter().filter(|e| e.alive) {
        let bob = if ctx.reduced_motion {
            0.0
        } else {
            enemy.phase.sin() * 2.0
        };
        let pos = enemy.pos - cam + Vec2::new(0.0, bob);
        let margin = ctx.params.enemy_glow as f32 * 1.5;
        if !on_screen(pos - Vec2::splat(margin), enemy.size + Vec2::splat(margin * 2.0), view) {
            continue;
        }

        let color = match enemy.variant {
            EnemyVariant::Trick => colors::ENEMY_TRICK,
            EnemyVariant::Hyper => colors::ENEMY_HYPER,
        };

        // Glow: concentric translucent layers, outermost first
        for layer in (1..=ctx.params.enemy_glow).rev() {
            let grow = layer as f32 * 1.5;
            let alpha = 0.3 / layer as f32;
            shapes::rect(
                out,
                pos.x - grow,
                pos.y - grow,
                enemy.size.x + grow * 2.0,
                enemy.size.y + grow * 2.0,
                colors::with_alpha(color, alpha),
            );
        }
        shapes::rect(out, pos.x, pos.y, enemy.size.x, enemy.size.y, color);

        // Eyes look the way it walks
        let look = if enemy.vel.x < 0.0 { -2.0 } else { 2.0 };
        for eye_x in [0.3, 0.7] {
            shapes::rect(
                out,
                pos.x + enemy.size.x * eye_x - 2.0 + look,
                pos.y + 7.0,
                4.0,
                4.0,
                colors::BACKGROUND,
            );
        }
    }
}

fn draw_hud(out: &mut Vec<Vertex>, state: &GameState, view: Vec2) {
    shapes::rect(out, 0.0, 0.0, view.x, HUD_HEIGHT, colors::HUD_BG);

    for (i, orb) in state.orbs.iter().enumerate() {
        let color = if orb.collected {
            colors::HUD_PIP
        } else {
            colors::HUD_PIP_EMPTY
        };
        let center = Vec2::new(16.0 + i as f32 * 14.0, HUD_HEIGHT * 0.5);
        shapes::circle(out, center, 5.0, color, 8);
    }

    if state.flight_message_timer > 0.0 {
        let frac = (state.flight_message_timer / crate::consts::FLIGHT_MESSAGE_SECONDS).min(1.0);
        shapes::rect(out, 0.0, HUD_HEIGHT - 3.0, view.x * frac, 3.0, colors::FLIGHT_BAR);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::QualityPreset;
    use crate::sim::{Orb, TileMap};

    fn empty_state() -> GameState {
        GameState::from_parts(TileMap::new(18, 120), Vec::new(), Vec::new())
    }

    fn scene(state: &GameState, params: VisualParams) -> Vec<Vertex> {
        let backdrop = Backdrop::default();
        let ctx = RenderContext::new(Viewport::default(), params, &backdrop);
        build_scene(state, &ctx)
    }

    #[test]
    fn test_offscreen_tiles_are_culled() {
        let params = VisualParams::default();
        let base = scene(&empty_state(), params).len();

        let mut far = empty_state();
        far.level.set(100, 5, Tile::Block);
        assert_eq!(scene(&far, params).len(), base);

        let mut near = empty_state();
        near.level.set(10, 5, Tile::Block);
        assert_eq!(scene(&near, params).len(), base + 12);
    }

    #[test]
    fn test_collected_orbs_not_drawn() {
        let params = VisualParams::default();
        let mut state = empty_state();
        state.orbs.push(Orb::new(0, Vec2::new(300.0, 300.0)));
        let visible = scene(&state, params).len();
        state.orbs[0].collected = true;
        let collected = scene(&state, params).len();
        // Orb body and glow gone; HUD pip stays
        let orb_vertices = (ORB_SEGMENTS + ORB_GLOW_SEGMENTS * 2) as usize * 3;
        assert_eq!(visible - collected, orb_vertices);
    }

    /// Farthest vertex of one orb (body + glow) from its center
    fn orb_extent(params: VisualParams) -> f32 {
        let mut state = empty_state();
        let center = Vec2::new(300.0, 300.0);
        state.orbs.push(Orb::new(0, center));
        let backdrop = Backdrop::default();
        let ctx = RenderContext {
            reduced_motion: true,
            ..RenderContext::new(Viewport::default(), params, &backdrop)
        };
        let mut out = Vec::new();
        draw_orbs(&mut out, &state, &ctx, Vec2::ZERO, Vec2::new(960.0, 540.0));
        out.iter()
            .map(|v| Vec2::new(v.position[0], v.position[1]).distance(center))
            .fold(0.0, f32::max)
    }

    #[test]
    fn test_orb_glow_radius_follows_quality() {
        let low = VisualParams::at_level(QualityPreset::High, 0.0);
        let high = VisualParams::at_level(QualityPreset::High, 1.0);
        let radius = crate::consts::ORB_RADIUS;

        let low_extent = orb_extent(low);
        let high_extent = orb_extent(high);
        assert!((low_extent - (radius + low.orb_glow as f32)).abs() < 1e-3);
        assert!((high_extent - (radius + high.orb_glow as f32)).abs() < 1e-3);
        assert!(low_extent < high_extent);
    }

    #[test]
    fn test_streak_count_follows_quality() {
        let state = empty_state();
        let low = VisualParams::at_level(QualityPreset::High, 0.0);
        let high = VisualParams::at_level(QualityPreset::High, 1.0);
        let diff = scene(&state, high).len() - scene(&state, low).len();
        assert_eq!(diff, (high.streaks - low.streaks) * 6);
    }

    #[test]
    fn test_terminal_states_tint() {
        let params = VisualParams::default();
        let mut state = empty_state();
        let base = scene(&state, params).len();
        state.won = true;
        assert_eq!(scene(&state, params).len(), base + 6);
        let tint = scene(&state, params).last().map(|v| v.color);
        assert_eq!(tint, Some(colors::WON_TINT));
    }

    #[test]
    fn test_scene_leaves_state_untouched() {
        let mut state = GameState::new();
        state.player.trail = vec![Vec2::new(10.0, 10.0), Vec2::new(20.0, 10.0)];
        let before = serde_json::to_string(&state).unwrap();
        let _ = scene(&state, VisualParams::default());
        assert_eq!(serde_json::to_string(&state).unwrap(), before);
    }
}
