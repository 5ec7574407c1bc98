//! Developer overlay hooks
//!
//! Read-only snapshot plus a handful of immediate actions for testing a
//! session by hand. The host exposes both to JavaScript.

use serde::{Deserialize, Serialize};

use super::state::GameState;

/// What the dev overlay shows
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DevSnapshot {
    pub can_fly: bool,
    pub enemies_alive: usize,
    pub orbs_collected: usize,
    pub total_orbs: usize,
}

impl DevSnapshot {
    pub fn capture(state: &GameState) -> Self {
        Self {
            can_fly: state.player.can_fly,
            enemies_alive: state.enemies_alive(),
            orbs_collected: state.orbs_collected(),
            total_orbs: state.total_orbs(),
        }
    }
}

/// Immediate debug actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DevAction {
    ToggleFlight,
    GrantFlight,
    RevokeFlight,
    KillAllEnemies,
    CollectAllOrbs,
    /// Fresh session on the standard level; unlocked flight carries over
    Restart,
}

impl DevAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            DevAction::ToggleFlight => "toggleFlight",
            DevAction::GrantFlight => "grantFlight",
            DevAction::RevokeFlight => "revokeFlight",
            DevAction::KillAllEnemies => "killAllEnemies",
            DevAction::CollectAllOrbs => "collectAllOrbs",
            DevAction::Restart => "restart",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "toggleFlight" => Some(DevAction::ToggleFlight),
            "grantFlight" => Some(DevAction::GrantFlight),
            "revokeFlight" => Some(DevAction::RevokeFlight),
            "killAllEnemies" => Some(DevAction::KillAllEnemies),
            "collectAllOrbs" => Some(DevAction::CollectAllOrbs),
            "restart" => Some(DevAction::Restart),
            _ => None,
        }
    }

    /// Apply to the running session
    ///
    /// Killing every enemy here does not announce flight; the unlock
    /// transition is only observed by the simulation step.
    pub fn apply(self, state: &mut GameState) {
        log::info!("Dev action: {}", self.as_str());
        match self {
            DevAction::ToggleFlight => state.player.can_fly = !state.player.can_fly,
            DevAction::GrantFlight => state.player.can_fly = true,
            DevAction::RevokeFlight => state.player.can_fly = false,
            DevAction::KillAllEnemies => {
                for enemy in &mut state.enemies {
                    enemy.alive = false;
                }
            }
            DevAction::CollectAllOrbs => {
                for orb in &mut state.orbs {
                    orb.collected = true;
                }
            }
            DevAction::Restart => {
                let can_fly = state.player.can_fly;
                *state = GameState::new();
                state.player.can_fly = can_fly;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::sim::camera::Viewport;
    use crate::sim::tick::{TickInput, tick};

    #[test]
    fn test_snapshot_counts() {
        let mut state = GameState::new();
        state.orbs[0].collected = true;
        state.enemies[1].alive = false;
        let snap = DevSnapshot::capture(&state);
        assert_eq!(snap.orbs_collected, 1);
        assert_eq!(snap.total_orbs, state.orbs.len());
        assert_eq!(snap.enemies_alive, state.enemies.len() - 1);
        assert!(!snap.can_fly);
    }

    #[test]
    fn test_snapshot_json_field_names() {
        let snap = DevSnapshot::capture(&GameState::new());
        let json = serde_json::to_string(&snap).unwrap();
        assert!(json.contains("\"canFly\":false"));
        assert!(json.contains("\"enemiesAlive\""));
    }

    #[test]
    fn test_flight_toggles() {
        let mut state = GameState::new();
        DevAction::ToggleFlight.apply(&mut state);
        assert!(state.player.can_fly);
        DevAction::ToggleFlight.apply(&mut state);
        assert!(!state.player.can_fly);
        DevAction::GrantFlight.apply(&mut state);
        assert!(state.player.can_fly);
        DevAction::RevokeFlight.apply(&mut state);
        assert!(!state.player.can_fly);
    }

    #[test]
    fn test_kill_all_then_step_unlocks_flight() {
        let mut state = GameState::new();
        DevAction::KillAllEnemies.apply(&mut state);
        assert_eq!(state.enemies_alive(), 0);
        assert!(!state.player.can_fly);
        tick(&mut state, &TickInput::default(), SIM_DT, Viewport::default());
        assert!(state.player.can_fly);
    }

    #[test]
    fn test_revoked_flight_stays_revoked() {
        let mut state = GameState::new();
        DevAction::KillAllEnemies.apply(&mut state);
        tick(&mut state, &TickInput::default(), SIM_DT, Viewport::default());
        DevAction::RevokeFlight.apply(&mut state);
        for _ in 0..10 {
            tick(&mut state, &TickInput::default(), SIM_DT, Viewport::default());
        }
        assert!(!state.player.can_fly);
    }

    #[test]
    fn test_collect_all_orbs() {
        let mut state = GameState::new();
        DevAction::CollectAllOrbs.apply(&mut state);
        assert_eq!(state.orbs_collected(), state.total_orbs());
    }

    #[test]
    fn test_restart_keeps_flight() {
        let mut state = GameState::new();
        DevAction::KillAllEnemies.apply(&mut state);
        DevAction::GrantFlight.apply(&mut state);
        state.dead = true;
        DevAction::Restart.apply(&mut state);
        assert!(state.player.can_fly);
        assert!(!state.dead);
        assert_eq!(state.enemies_alive(), state.enemies.len());
    }

    #[test]
    fn test_action_names_round_trip() {
        for action in [
            DevAction::ToggleFlight,
            DevAction::GrantFlight,
            DevAction::RevokeFlight,
            DevAction::KillAllEnemies,
            DevAction::CollectAllOrbs,
            DevAction::Restart,
        ] {
            assert_eq!(DevAction::from_str(action.as_str()), Some(action));
        }
        assert_eq!(DevAction::from_str("fly"), None);
    }
}
