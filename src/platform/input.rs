//! Keyboard mapping
//!
//! Key events set or clear boolean intents on the pending `TickInput`. The
//! simulation samples the flags at the top of each step.

use crate::sim::TickInput;

/// What a key means to the game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    MoveLeft,
    MoveRight,
    Jump,
    Run,
    Attack,
    Restart,
}

impl Intent {
    /// Movement and jump keys would scroll the page otherwise
    pub fn prevents_default(self) -> bool {
        matches!(self, Intent::MoveLeft | Intent::MoveRight | Intent::Jump)
    }
}

/// Map a `KeyboardEvent.key` value to an intent
pub fn intent_for_key(key: &str) -> Option<Intent> {
    match key {
        "ArrowLeft" | "a" | "A" => Some(Intent::MoveLeft),
        "ArrowRight" | "d" | "D" => Some(Intent::MoveRight),
        "ArrowUp" | "w" | "W" | " " => Some(Intent::Jump),
        "Shift" => Some(Intent::Run),
        "j" | "J" | "x" | "X" => Some(Intent::Attack),
        "r" | "R" => Some(Intent::Restart),
        _ => None,
    }
}

/// Apply a key transition to the pending input
///
/// Restart is one-shot: a press sets it, a release leaves it for the loop to
/// clear after the next step. Returns the intent the key mapped to.
pub fn apply_key(input: &mut TickInput, key: &str, pressed: bool) -> Option<Intent> {
    let intent = intent_for_key(key)?;
    match intent {
        Intent::MoveLeft => input.move_left = pressed,
        Intent::MoveRight => input.move_right = pressed,
        Intent::Jump => input.jump = pressed,
        Intent::Run => input.run = pressed,
        Intent::Attack => input.attack = pressed,
        Intent::Restart => {
            if pressed {
                input.restart = true;
            }
        }
    }
    Some(intent)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_map() {
        assert_eq!(intent_for_key("ArrowLeft"), Some(Intent::MoveLeft));
        assert_eq!(intent_for_key("D"), Some(Intent::MoveRight));
        assert_eq!(intent_for_key(" "), Some(Intent::Jump));
        assert_eq!(intent_for_key("Shift"), Some(Intent::Run));
        assert_eq!(intent_for_key("x"), Some(Intent::Attack));
        assert_eq!(intent_for_key("r"), Some(Intent::Restart));
        assert_eq!(intent_for_key("Escape"), None);
    }

    #[test]
    fn test_hold_and_release() {
        let mut input = TickInput::default();
        apply_key(&mut input, "ArrowRight", true);
        apply_key(&mut input, "Shift", true);
        assert!(input.move_right && input.run);
        apply_key(&mut input, "ArrowRight", false);
        assert!(!input.move_right);
        assert!(input.run);
    }

    #[test]
    fn test_restart_survives_release() {
        let mut input = TickInput::default();
        apply_key(&mut input, "R", true);
        apply_key(&mut input, "R", false);
        assert!(input.restart);
    }

    #[test]
    fn test_prevent_default_set() {
        assert!(Intent::Jump.prevents_default());
        assert!(Intent::MoveLeft.prevents_default());
        assert!(!Intent::Run.prevents_default());
        assert!(!Intent::Restart.prevents_default());
    }

    #[test]
    fn test_unmapped_key_leaves_input() {
        let mut input = TickInput::default();
        assert_eq!(apply_key(&mut input, "q", true), None);
        assert_eq!(input, TickInput::default());
    }
}
