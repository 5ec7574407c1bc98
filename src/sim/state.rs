//! Game state and core simulation types
//!
//! Everything a running session owns lives here. The tile map and entity
//! collections keep stable order for the lifetime of the session.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::camera::Camera;
use super::collision::Rect;
use super::level::{self, TileMap};
use crate::consts::*;

/// One-way notifications for the audio collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    Jump,
    /// Footstep on the walk/run cadence
    RunStep,
    Collect,
    Stomp,
    Death,
    Win,
    /// Flight unlocked
    Flight,
}

/// The player character
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Fixed body size
    pub size: Vec2,
    pub on_ground: bool,
    /// Unlocked permanently once every enemy is defeated
    pub can_fly: bool,
    /// Position history for rendering (oldest first)
    #[serde(skip)]
    pub trail: Vec<Vec2>,
}

impl Player {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            size: Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT),
            on_ground: false,
            can_fly: false,
            trail: Vec::with_capacity(TRAIL_LENGTH + 1),
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    /// Record current position to the trail, dropping the oldest past capacity
    pub fn record_trail(&mut self) {
        self.trail.push(self.pos);
        if self.trail.len() > TRAIL_LENGTH {
            self.trail.remove(0);
        }
    }

    /// Put the player back at `spawn` at rest (flight stays unlocked)
    pub fn reset(&mut self, spawn: Vec2) {
        self.pos = spawn;
        self.vel = Vec2::ZERO;
        self.on_ground = false;
        self.trail.clear();
    }
}

/// Enemy look; has no effect on behaviour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyVariant {
    Trick,
    Hyper,
}

/// A patrolling enemy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    pub alive: bool,
    /// Oscillation phase (rendering only)
    pub phase: f32,
    pub variant: EnemyVariant,
}

impl Enemy {
    pub fn new(id: u32, pos: Vec2, variant: EnemyVariant) -> Self {
        Self {
            id,
            pos,
            vel: Vec2::ZERO,
            size: Vec2::new(ENEMY_WIDTH, ENEMY_HEIGHT),
            alive: true,
            phase: 0.0,
            variant,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }
}

/// A collectible orb
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Orb {
    pub id: u32,
    /// Center position
    pub pos: Vec2,
    pub radius: f32,
    pub collected: bool,
}

impl Orb {
    pub fn new(id: u32, pos: Vec2) -> Self {
        Self {
            id,
            pos,
            radius: ORB_RADIUS,
            collected: false,
        }
    }
}

/// Complete session state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub level: TileMap,
    pub spawn: Vec2,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub orbs: Vec<Orb>,
    pub camera: Camera,
    /// Terminal states; both freeze the simulation until restart
    pub dead: bool,
    pub won: bool,
    /// Seconds left on the "flight unlocked" message
    pub flight_message_timer: f32,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Live enemy count seen at the end of the previous step
    pub(crate) enemies_alive_prev: usize,
    /// Seconds until the next footstep
    pub(crate) footstep_timer: f32,
    /// Pending audio notifications (drained by the host)
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    /// New session on the standard level
    pub fn new() -> Self {
        let level = level::generate_level(LEVEL_ROWS, LEVEL_COLS);
        let enemies = level::default_enemies(&level);
        let orbs = level::default_orbs(&level);
        Self::from_parts(level, enemies, orbs)
    }

    /// Session on an arbitrary level with the given entities
    pub fn from_parts(level: TileMap, enemies: Vec<Enemy>, orbs: Vec<Orb>) -> Self {
        let spawn = level::player_spawn(&level);
        let enemies_alive_prev = enemies.iter().filter(|e| e.alive).count();
        Self {
            level,
            spawn,
            player: Player::new(spawn),
            enemies,
            orbs,
            camera: Camera::default(),
            dead: false,
            won: false,
            flight_message_timer: 0.0,
            time_ticks: 0,
            enemies_alive_prev,
            footstep_timer: 0.0,
            events: Vec::new(),
        }
    }

    /// Soft reset: player back to spawn, camera home, terminal flags cleared.
    /// Enemies, orbs and unlocked flight are left as they are.
    pub fn reset_player(&mut self) {
        self.player.reset(self.spawn);
        self.camera = Camera::default();
        self.dead = false;
        self.won = false;
        self.footstep_timer = 0.0;
    }

    pub fn enemies_alive(&self) -> usize {
        self.enemies.iter().filter(|e| e.alive).count()
    }

    pub fn orbs_collected(&self) -> usize {
        self.orbs.iter().filter(|o| o.collected).count()
    }

    pub fn total_orbs(&self) -> usize {
        self.orbs.len()
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn kill_player(&mut self, reason: &str) {
        if !self.dead {
            self.dead = true;
            self.events.push(GameEvent::Death);
            log::info!("Player died ({}) at {:?}", reason, self.player.pos);
        }
    }
}
