//! HUD snapshot
//!
//! Plain data read from the session after each frame; the host writes it
//! into the DOM overlay.

use crate::sim::GameState;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct HudSnapshot {
    pub orbs_collected: usize,
    pub total_orbs: usize,
    pub dead: bool,
    pub won: bool,
    pub can_fly: bool,
    pub flight_message_timer: f32,
}

impl HudSnapshot {
    pub fn capture(state: &GameState) -> Self {
        Self {
            orbs_collected: state.orbs_collected(),
            total_orbs: state.total_orbs(),
            dead: state.dead,
            won: state.won,
            can_fly: state.player.can_fly,
            flight_message_timer: state.flight_message_timer,
        }
    }

    /// Orb counter text
    pub fn orbs_text(&self) -> String {
        format!("{}/{}", self.orbs_collected, self.total_orbs)
    }

    /// One-line status under the counters
    pub fn status_text(&self) -> &'static str {
        if self.won {
            "Level complete"
        } else if self.dead {
            "Ouch"
        } else if self.can_fly {
            "Flight ready"
        } else {
            "Find the flag"
        }
    }

    /// Centered banner, if one should be showing
    pub fn banner(&self) -> Option<&'static str> {
        if self.won {
            Some("You made it! Press jump to continue")
        } else if self.dead {
            Some("You fell! Press R to restart")
        } else if self.flight_message_timer > 0.0 {
            Some("All enemies defeated - hold jump to fly!")
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_session() {
        let state = GameState::new();
        let hud = HudSnapshot::capture(&state);
        assert_eq!(hud.orbs_text(), format!("0/{}", state.total_orbs()));
        assert_eq!(hud.banner(), None);
        assert_eq!(hud.status_text(), "Find the flag");
    }

    #[test]
    fn test_banner_priority() {
        let mut hud = HudSnapshot {
            flight_message_timer: 1.0,
            can_fly: true,
            ..Default::default()
        };
        assert!(hud.banner().unwrap().contains("fly"));
        hud.dead = true;
        assert!(hud.banner().unwrap().contains("restart"));
        hud.won = true;
        assert!(hud.banner().unwrap().contains("made it"));
    }

    #[test]
    fn test_flight_banner_expires() {
        let hud = HudSnapshot {
            can_fly: true,
            flight_message_timer: 0.0,
            ..Default::default()
        };
        assert_eq!(hud.banner(), None);
        assert_eq!(hud.status_text(), "Flight ready");
    }
}
