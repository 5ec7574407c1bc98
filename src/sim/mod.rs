//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod camera;
pub mod collision;
pub mod dev;
pub mod level;
pub mod state;
pub mod tick;

pub use camera::{Camera, Viewport};
pub use collision::{CONTACT_EPSILON, CollisionResult, Rect, resolve_rect};
pub use dev::{DevAction, DevSnapshot};
pub use level::{Tile, TileMap, generate_level};
pub use state::{Enemy, EnemyVariant, GameEvent, GameState, Orb, Player};
pub use tick::{TickInput, tick};
