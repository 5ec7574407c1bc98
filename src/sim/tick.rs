//! Fixed timestep simulation tick
//!
//! Advances one session by exactly one step. The order of operations inside
//! a step matters and is fixed: restart, freeze, horizontal, vertical input,
//! gravity, X pass, Y pass, world bounds, hazards, orbs, enemies, flight
//! unlock, goal, camera, trail.

use super::camera::Viewport;
use super::collision::resolve_rect;
use super::state::{GameEvent, GameState};
use crate::approach;
use crate::consts::*;

/// Input intents for a single tick, sampled at the top of the step
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickInput {
    pub move_left: bool,
    pub move_right: bool,
    /// Held: jumps when grounded, thrusts when flight is unlocked
    pub jump: bool,
    pub run: bool,
    /// Reserved; the simulation does not use it yet
    pub attack: bool,
    /// Soft reset of the player this step
    pub restart: bool,
}

impl TickInput {
    /// -1, 0 or 1 from the left/right intents
    pub fn direction(&self) -> f32 {
        match (self.move_left, self.move_right) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        }
    }
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32, viewport: Viewport) {
    // --- RESTART ---
    if input.restart {
        state.reset_player();
        log::info!("Player restarted at {:?}", state.spawn);
    }

    state.flight_message_timer = (state.flight_message_timer - dt).max(0.0);

    // Dead or won: frozen until restart
    if state.dead || state.won {
        return;
    }

    state.time_ticks += 1;
    let prev_bottom = state.player.bottom();

    // --- HORIZONTAL ---
    let player = &mut state.player;
    let dir = input.direction();
    let top_speed = if input.run {
        BASE_SPEED * RUN_MULTIPLIER
    } else {
        BASE_SPEED
    };
    let target_vx = dir * top_speed;
    let mut accel = if player.on_ground {
        GROUND_ACCEL
    } else {
        AIR_ACCEL
    };
    // Reversing across zero velocity turns faster
    if dir != 0.0 && player.vel.x != 0.0 && dir.signum() != player.vel.x.signum() {
        accel *= TURN_ACCEL_MULTIPLIER;
    }
    player.vel.x = approach(player.vel.x, target_vx, accel * dt);

    // --- VERTICAL INPUT ---
    let mut gravity_scale = 1.0;
    let mut jumped = false;
    if player.can_fly && input.jump {
        if player.on_ground {
            // Lift-off kick when leaving the ground
            player.vel.y = player.vel.y.min(FLIGHT_LIFTOFF_VELOCITY);
            player.on_ground = false;
        }
        player.vel.y += FLIGHT_THRUST * dt;
        gravity_scale = FLIGHT_GRAVITY_SCALE;
    } else if player.on_ground && input.jump {
        player.vel.y = JUMP_VELOCITY + if input.run { RUN_JUMP_BONUS } else { 0.0 };
        player.on_ground = false;
        jumped = true;
        state.events.push(GameEvent::Jump);
    }

    // --- GRAVITY ---
    // The jump impulse replaces gravity on the step it fires
    let player = &mut state.player;
    if !jumped {
        player.vel.y += GRAVITY * gravity_scale * dt;
    }
    player.vel.y = player.vel.y.min(MAX_FALL_SPEED);

    // --- X PASS ---
    player.pos.x += player.vel.x * dt;
    let hit = resolve_rect(&state.level, player.rect());
    if hit.hit {
        player.pos.x += hit.dx;
        player.vel.x = 0.0;
    }

    // --- Y PASS ---
    player.pos.y += player.vel.y * dt;
    let hit = resolve_rect(&state.level, player.rect());
    if hit.hit {
        player.pos.y += hit.dy;
        player.on_ground = hit.dy < 0.0;
        player.vel.y = 0.0;
    } else {
        player.on_ground = false;
    }

    // --- WORLD BOUNDS ---
    let world_w = state.level.width();
    let world_h = state.level.height();
    if player.pos.x < 0.0 {
        player.pos.x = 0.0;
        player.vel.x = 0.0;
    }
    if player.pos.x + player.size.x > world_w {
        player.pos.x = world_w - player.size.x;
        player.vel.x = 0.0;
    }
    if player.pos.y < 0.0 {
        player.pos.y = 0.0;
        player.vel.y = 0.0;
    }
    if player.pos.y > world_h + FALL_DEATH_MARGIN {
        state.kill_player("fell");
    }

    // --- HAZARDS ---
    // Feet cell plus the row above, at the horizontal center
    if !state.dead && touches_hazard(state) {
        state.kill_player("spikes");
    }

    // --- FOOTSTEPS ---
    update_footsteps(state, input.run, dt);

    // --- ORBS ---
    collect_orbs(state);

    // --- ENEMIES ---
    update_enemies(state, prev_bottom, dt, viewport);

    // --- FLIGHT UNLOCK ---
    let alive = state.enemies_alive();
    if state.enemies_alive_prev > 0 && alive == 0 && !state.player.can_fly {
        state.player.can_fly = true;
        state.flight_message_timer = FLIGHT_MESSAGE_SECONDS;
        state.events.push(GameEvent::Flight);
        log::info!("All enemies defeated - flight unlocked");
    }
    state.enemies_alive_prev = alive;

    // --- GOAL ---
    if !state.dead {
        let center = state.player.center();
        if state.level.tile_at(center.x, center.y).is_goal() {
            state.won = true;
            state.events.push(GameEvent::Win);
            log::info!(
                "Level complete with {}/{} orbs",
                state.orbs_collected(),
                state.total_orbs()
            );
        }
    }

    // --- CAMERA ---
    let player = &state.player;
    state.camera.follow(player.pos, player.vel, viewport);

    state.player.record_trail();
}

/// Returns true when the player's feet (or the row above) touch a hazard tile
fn touches_hazard(state: &GameState) -> bool {
    let player = &state.player;
    let (col, feet_row) = state
        .level
        .cell_of(player.pos.x + player.size.x / 2.0, player.bottom());
    state.level.get(col, feet_row).is_hazard() || state.level.get(col, feet_row - 1).is_hazard()
}

/// Footstep cadence while grounded and moving
fn update_footsteps(state: &mut GameState, running: bool, dt: f32) {
    let player = &state.player;
    if state.dead || !player.on_ground || player.vel.x.abs() <= FOOTSTEP_MIN_SPEED {
        state.footstep_timer = 0.0;
        return;
    }
    state.footstep_timer -= dt;
    if state.footstep_timer <= 0.0 {
        state.events.push(GameEvent::RunStep);
        state.footstep_timer = if running {
            FOOTSTEP_RUN_INTERVAL
        } else {
            FOOTSTEP_WALK_INTERVAL
        };
    }
}

/// Collect every orb whose center lies strictly inside the pickup radius
fn collect_orbs(state: &mut GameState) {
    if state.dead {
        return;
    }
    let center = state.player.center();
    for orb in state.orbs.iter_mut().filter(|o| !o.collected) {
        let reach = orb.radius + ORB_PICKUP_MARGIN;
        if center.distance_squared(orb.pos) < reach * reach {
            orb.collected = true;
            state.events.push(GameEvent::Collect);
        }
    }
}

/// Enemy patrol physics plus stomp/hurt resolution against the player
///
/// Enemies outside the viewport (± cull margin) are frozen: neither their
/// physics nor their phase advances.
fn update_enemies(state: &mut GameState, prev_bottom: f32, dt: f32, viewport: Viewport) {
    let view_left = state.camera.pos.x - ENEMY_CULL_MARGIN;
    let view_right = state.camera.pos.x + viewport.width + ENEMY_CULL_MARGIN;
    // Sampled before any bounce so one fall can stomp several enemies
    let falling = state.player.vel.y > STOMP_MIN_FALL_SPEED;

    for i in 0..state.enemies.len() {
        let enemy = &mut state.enemies[i];
        if !enemy.alive || enemy.pos.x + enemy.size.x < view_left || enemy.pos.x > view_right {
            continue;
        }

        enemy.phase += ENEMY_PHASE_RATE * dt;
        enemy.vel.y = (enemy.vel.y + GRAVITY * dt).min(MAX_FALL_SPEED);

        // X pass: walls bounce
        enemy.pos.x += enemy.vel.x * dt;
        let hit = resolve_rect(&state.level, enemy.rect());
        if hit.hit {
            enemy.pos.x += hit.dx;
            enemy.vel.x = -enemy.vel.x;
        }

        // Y pass
        enemy.pos.y += enemy.vel.y * dt;
        let hit = resolve_rect(&state.level, enemy.rect());
        let grounded = hit.hit && hit.dy < 0.0;
        if hit.hit {
            enemy.pos.y += hit.dy;
            enemy.vel.y = 0.0;
        }

        // Ledge: turn around when the ground ends just past the leading edge
        if grounded {
            let probe_x = if enemy.vel.x >= 0.0 {
                enemy.pos.x + enemy.size.x + 1.0
            } else {
                enemy.pos.x - 1.0
            };
            let probe_y = enemy.pos.y + enemy.size.y + 1.0;
            if !state.level.tile_at(probe_x, probe_y).is_solid() {
                enemy.vel.x = -enemy.vel.x;
            }
        }

        // --- PLAYER CONTACT ---
        if state.dead || !enemy.rect().overlaps(&state.player.rect()) {
            continue;
        }
        let player = &mut state.player;
        let from_above = falling && prev_bottom <= enemy.pos.y + STOMP_TOLERANCE;
        if from_above {
            enemy.alive = false;
            player.vel.y = JUMP_VELOCITY * STOMP_BOUNCE_FACTOR;
            state.events.push(GameEvent::Stomp);
            log::debug!("Enemy {} stomped", enemy.id);
        } else {
            let id = enemy.id;
            state.kill_player(&format!("enemy {}", id));
        }
    }
}
