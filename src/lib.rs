//! Orb Runner - A side-scrolling tile platformer
//!
//! Core modules:
//! - `sim`: Deterministic simulation (level, collision, entities, camera)
//! - `game_loop`: Fixed-timestep driver decoupling simulation from frame rate
//! - `quality`: Adaptive visual quality driven by measured draw cost
//! - `renderer`: WebGPU rendering pipeline and scene projection
//! - `platform`: Browser/native platform abstraction (input, host errors)
//! - `hud`: HUD snapshot consumed by the DOM overlay

pub mod audio;
pub mod game_loop;
pub mod hud;
pub mod platform;
pub mod quality;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use game_loop::{FixedTimestep, Game, PendingExit};
pub use quality::{AdaptiveQuality, VisualParams};
pub use settings::{QualityPreset, Settings};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame delta fed into the accumulator (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Level grid
    pub const TILE_SIZE: f32 = 32.0;
    pub const LEVEL_ROWS: usize = 18;
    pub const LEVEL_COLS: usize = 120;

    /// Player body
    pub const PLAYER_WIDTH: f32 = 20.0;
    pub const PLAYER_HEIGHT: f32 = 28.0;
    /// Spawn column (player stands on the ground strip)
    pub const PLAYER_SPAWN_COL: usize = 2;

    /// Horizontal movement (units/s, units/s²)
    pub const BASE_SPEED: f32 = 240.0;
    pub const RUN_MULTIPLIER: f32 = 1.6;
    pub const GROUND_ACCEL: f32 = 2600.0;
    pub const AIR_ACCEL: f32 = 1600.0;
    /// Extra acceleration when input reverses the current direction
    pub const TURN_ACCEL_MULTIPLIER: f32 = 1.35;

    /// Vertical movement
    pub const GRAVITY: f32 = 2200.0;
    pub const MAX_FALL_SPEED: f32 = 1200.0;
    pub const JUMP_VELOCITY: f32 = -640.0;
    pub const RUN_JUMP_BONUS: f32 = -140.0;

    /// Flight (unlocked once every enemy is defeated)
    pub const FLIGHT_THRUST: f32 = -1650.0;
    pub const FLIGHT_LIFTOFF_VELOCITY: f32 = -420.0;
    pub const FLIGHT_GRAVITY_SCALE: f32 = 0.25;
    pub const FLIGHT_MESSAGE_SECONDS: f32 = 2.0;

    /// Falling this far below the world kills the player
    pub const FALL_DEATH_MARGIN: f32 = 200.0;

    /// Orbs
    pub const ORB_RADIUS: f32 = 10.0;
    pub const ORB_PICKUP_MARGIN: f32 = 12.0;
    /// Gap between a snapped orb's bottom and the surface under it
    pub const ORB_HOVER: f32 = 10.0;

    /// Enemies
    pub const ENEMY_WIDTH: f32 = 24.0;
    pub const ENEMY_HEIGHT: f32 = 28.0;
    pub const ENEMY_SPEED: f32 = 60.0;
    pub const ENEMY_PHASE_RATE: f32 = 2.0;
    /// Enemies farther than this outside the viewport are frozen
    pub const ENEMY_CULL_MARGIN: f32 = 128.0;

    /// Stomp rules
    pub const STOMP_MIN_FALL_SPEED: f32 = 50.0;
    pub const STOMP_TOLERANCE: f32 = 6.0;
    pub const STOMP_BOUNCE_FACTOR: f32 = 0.55;

    /// Camera
    pub const CAMERA_SMOOTHING: f32 = 0.15;
    pub const CAMERA_MAX_LEAD: f32 = 120.0;
    pub const CAMERA_LEAD_DEADBAND: f32 = 20.0;

    /// Player trail history
    pub const TRAIL_LENGTH: usize = 20;

    /// Footstep cadence (seconds between steps)
    pub const FOOTSTEP_RUN_INTERVAL: f32 = 0.18;
    pub const FOOTSTEP_WALK_INTERVAL: f32 = 0.24;
    pub const FOOTSTEP_MIN_SPEED: f32 = 40.0;
}

/// Move `current` toward `target` by at most `max_delta` without overshooting
#[inline]
pub fn approach(current: f32, target: f32, max_delta: f32) -> f32 {
    if current < target {
        (current + max_delta).min(target)
    } else {
        (current - max_delta).max(target)
    }
}
