//! Fixed-timestep game driver
//!
//! Rendering runs at whatever rate the host calls `frame`; the simulation
//! always advances in whole `SIM_DT` steps drained from an accumulator.

use std::cell::Cell;
use std::rc::Rc;

use crate::consts::*;
use crate::hud::HudSnapshot;
use crate::platform::{Intent, apply_key};
use crate::quality::{AdaptiveQuality, VisualParams};
use crate::renderer::{Backdrop, RenderContext, Vertex, build_scene};
use crate::settings::Settings;
use crate::sim::{DevAction, DevSnapshot, GameEvent, GameState, TickInput, Viewport, tick};

/// Accumulator that turns variable frame times into whole simulation steps
#[derive(Debug, Clone, Default)]
pub struct FixedTimestep {
    accumulator: f32,
}

impl FixedTimestep {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a frame's elapsed time and return how many steps to run
    ///
    /// Elapsed time is clamped to `MAX_FRAME_DT` and at most `MAX_SUBSTEPS`
    /// steps are drained per frame.
    pub fn advance(&mut self, frame_dt: f32) -> u32 {
        self.accumulator += frame_dt.clamp(0.0, MAX_FRAME_DT);

        let mut steps = 0;
        while self.accumulator >= SIM_DT && steps < MAX_SUBSTEPS {
            self.accumulator -= SIM_DT;
            steps += 1;
        }
        steps
    }

    pub fn accumulator(&self) -> f32 {
        self.accumulator
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}

/// Frames-per-second over the last 60 frames
#[derive(Debug, Clone)]
pub struct FpsCounter {
    frame_times: [f64; 60],
    frame_index: usize,
    fps: u32,
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self {
            frame_times: [0.0; 60],
            frame_index: 0,
            fps: 0,
        }
    }
}

impl FpsCounter {
    pub fn record(&mut self, now_ms: f64) {
        self.frame_times[self.frame_index] = now_ms;
        self.frame_index = (self.frame_index + 1) % 60;

        // Oldest sample is the next slot to be overwritten
        let oldest_time = self.frame_times[self.frame_index];
        if oldest_time > 0.0 {
            let elapsed = now_ms - oldest_time;
            if elapsed > 0.0 {
                self.fps = (59_000.0 / elapsed).round() as u32;
            }
        }
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }
}

/// Callback fired when the player asks to leave a finished level
pub type ExitCallback = Box<dyn FnMut()>;

/// Exit request raised inside a frame and handled after it returns
///
/// The host's exit handler may tear the game down, so it must not run while
/// the frame still holds the game.
#[derive(Debug, Clone, Default)]
pub struct PendingExit(Rc<Cell<bool>>);

impl PendingExit {
    /// Callback for `Game::set_exit_callback` that only raises the flag
    pub fn callback(&self) -> ExitCallback {
        let flag = self.0.clone();
        Box::new(move || flag.set(true))
    }

    /// Clear the flag, returning whether it was raised
    pub fn take(&self) -> bool {
        self.0.replace(false)
    }
}

/// One running game: session, input, stepper and presentation state
pub struct Game {
    session: Option<GameState>,
    pub input: TickInput,
    stepper: FixedTimestep,
    quality: AdaptiveQuality,
    settings: Settings,
    backdrop: Backdrop,
    viewport: Viewport,
    running: bool,
    last_time: Option<f64>,
    on_exit: Option<ExitCallback>,
    /// Won state seen by the previous frame
    exit_won: bool,
    /// Confirm input seen by the previous frame
    confirm_held: bool,
    fps: FpsCounter,
}

impl Game {
    pub fn new(settings: Settings) -> Self {
        log::info!("Starting session (quality {})", settings.quality.as_str());
        Self {
            session: Some(GameState::new()),
            input: TickInput::default(),
            stepper: FixedTimestep::new(),
            quality: AdaptiveQuality::new(settings.quality),
            settings,
            backdrop: Backdrop::default(),
            viewport: Viewport::default(),
            running: true,
            last_time: None,
            on_exit: None,
            exit_won: false,
            confirm_held: false,
            fps: FpsCounter::default(),
        }
    }

    pub fn set_exit_callback(&mut self, callback: ExitCallback) {
        self.on_exit = Some(callback);
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn session(&self) -> Option<&GameState> {
        self.session.as_ref()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn fps(&self) -> u32 {
        self.fps.fps()
    }

    /// Stop the loop and drop the session; later frames are no-ops
    pub fn stop(&mut self) {
        if self.running {
            log::info!("Game stopped");
        }
        self.running = false;
        self.session = None;
    }

    /// Route a key transition into the pending input
    pub fn key(&mut self, key: &str, pressed: bool) -> Option<Intent> {
        apply_key(&mut self.input, key, pressed)
    }

    /// Advance by the time elapsed since the previous frame
    ///
    /// Returns the number of simulation steps run. The first frame runs a
    /// single step.
    pub fn frame(&mut self, now_ms: f64) -> u32 {
        if !self.running {
            return 0;
        }

        let dt = match self.last_time {
            Some(last) => ((now_ms - last) / 1000.0) as f32,
            None => SIM_DT,
        };
        self.last_time = Some(now_ms);
        self.fps.record(now_ms);

        let Some(state) = self.session.as_mut() else {
            return 0;
        };

        let steps = self.stepper.advance(dt);
        for _ in 0..steps {
            tick(state, &self.input, SIM_DT, self.viewport);
            // Clear one-shot inputs after processing
            self.input.restart = false;
        }

        self.check_exit();
        steps
    }

    /// Fire the exit callback on a fresh confirm press after the level is won
    ///
    /// A confirm key already held when the win lands does not count until it
    /// is released and pressed again.
    fn check_exit(&mut self) {
        let won = self.session.as_ref().is_some_and(|s| s.won);
        let confirm = self.input.jump || self.input.attack;
        let was_won = std::mem::replace(&mut self.exit_won, won);
        let was_held = std::mem::replace(&mut self.confirm_held, confirm);
        if !(won && was_won && confirm && !was_held) {
            return;
        }
        if let Some(callback) = self.on_exit.as_mut() {
            log::info!("Exit to menu requested");
            callback();
        }
    }

    /// Report the measured cost of the last render (ms)
    pub fn record_draw_ms(&mut self, ms: f32) {
        self.quality.record(ms);
    }

    pub fn visual_params(&self) -> VisualParams {
        self.quality.params()
    }

    /// Build this frame's vertices; empty without a session
    pub fn scene(&self, time_s: f32) -> Vec<Vertex> {
        let Some(state) = self.session.as_ref() else {
            return Vec::new();
        };
        let ctx = RenderContext {
            time: time_s,
            trail_points: self.settings.trail_points(TRAIL_LENGTH),
            reduced_motion: self.settings.reduced_motion,
            ..RenderContext::new(self.viewport, self.quality.params(), &self.backdrop)
        };
        build_scene(state, &ctx)
    }

    pub fn hud(&self) -> Option<HudSnapshot> {
        self.session.as_ref().map(HudSnapshot::capture)
    }

    pub fn dev_snapshot(&self) -> Option<DevSnapshot> {
        self.session.as_ref().map(DevSnapshot::capture)
    }

    pub fn apply_dev(&mut self, action: DevAction) {
        if let Some(state) = self.session.as_mut() {
            action.apply(state);
            if action == DevAction::Restart {
                self.stepper.reset();
            }
        }
    }

    /// Take pending audio events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.session
            .as_mut()
            .map(GameState::drain_events)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Tile, TileMap};
    use std::cell::RefCell;

    /// Flat 40-column level with a flag column at col 6
    fn flag_level() -> GameState {
        let mut map = TileMap::new(18, 40);
        map.fill(0, 16, 40, 2, Tile::Ground);
        map.fill(6, 8, 1, 8, Tile::Flag);
        GameState::from_parts(map, Vec::new(), Vec::new())
    }

    fn counting_callback(game: &mut Game) -> Rc<Cell<u32>> {
        let fired = Rc::new(Cell::new(0));
        let counter = fired.clone();
        game.set_exit_callback(Box::new(move || counter.set(counter.get() + 1)));
        fired
    }

    #[test]
    fn test_one_step_drains_accumulator() {
        let mut stepper = FixedTimestep::new();
        assert_eq!(stepper.advance(SIM_DT), 1);
        assert_eq!(stepper.accumulator(), 0.0);
    }

    #[test]
    fn test_partial_frames_accumulate() {
        let mut stepper = FixedTimestep::new();
        assert_eq!(stepper.advance(SIM_DT * 0.5), 0);
        assert_eq!(stepper.advance(SIM_DT * 0.6), 1);
        assert!(stepper.accumulator() < SIM_DT);
    }

    #[test]
    fn test_long_frame_is_clamped() {
        let mut stepper = FixedTimestep::new();
        // A 2 s hitch only counts as MAX_FRAME_DT
        let steps = stepper.advance(2.0);
        assert!(steps <= MAX_SUBSTEPS);
        // 0.1 s is six steps, give or take float rounding
        assert!((5..=6).contains(&steps), "got {} steps", steps);
        assert!(stepper.accumulator() < SIM_DT);
    }

    #[test]
    fn test_negative_dt_ignored() {
        let mut stepper = FixedTimestep::new();
        assert_eq!(stepper.advance(-1.0), 0);
        assert_eq!(stepper.accumulator(), 0.0);
    }

    #[test]
    fn test_first_frame_runs_one_step() {
        let mut game = Game::new(Settings::default());
        assert_eq!(game.frame(1000.0), 1);
        assert_eq!(game.session().map(|s| s.time_ticks), Some(1));
    }

    #[test]
    fn test_restart_input_is_one_shot() {
        let mut game = Game::new(Settings::default());
        game.frame(0.0);
        game.key("r", true);
        game.frame(50.0);
        assert!(!game.input.restart);
    }

    #[test]
    fn test_stopped_game_does_nothing() {
        let mut game = Game::new(Settings::default());
        game.frame(0.0);
        game.stop();
        assert!(!game.is_running());
        assert_eq!(game.frame(100.0), 0);
        assert!(game.scene(0.0).is_empty());
        assert!(game.hud().is_none());
        assert!(game.drain_events().is_empty());
    }

    #[test]
    fn test_exit_fires_once_per_press() {
        let mut game = Game::new(Settings::default());
        let fired = counting_callback(&mut game);
        game.frame(0.0);

        // Confirm while playing does nothing
        game.key(" ", true);
        game.frame(20.0);
        game.key(" ", false);
        game.frame(40.0);
        assert_eq!(fired.get(), 0);

        let mut won = GameState::new();
        won.won = true;
        game.session = Some(won);
        game.frame(60.0);
        assert_eq!(fired.get(), 0);

        game.key(" ", true);
        game.frame(80.0);
        game.frame(100.0);
        assert_eq!(fired.get(), 1);

        game.key(" ", false);
        game.frame(120.0);
        game.key("x", true);
        game.frame(140.0);
        assert_eq!(fired.get(), 2);
    }

    #[test]
    fn test_jump_held_through_win_does_not_exit() {
        let mut game = Game::new(Settings::default());
        game.session = Some(flag_level());
        let fired = counting_callback(&mut game);

        game.key("ArrowRight", true);
        game.key(" ", true);
        let mut now = 0.0;
        let mut won_at = None;
        for frame in 0..600 {
            game.frame(now);
            now += 1000.0 / 60.0;
            if game.session().is_some_and(|s| s.won) {
                won_at = Some(frame);
                break;
            }
        }
        assert!(won_at.is_some(), "flag never reached");

        // Still holding: the banner stays up
        for _ in 0..30 {
            game.frame(now);
            now += 1000.0 / 60.0;
        }
        assert_eq!(fired.get(), 0);

        // Release, then press again
        game.key(" ", false);
        game.frame(now);
        now += 1000.0 / 60.0;
        game.key(" ", true);
        game.frame(now);
        assert_eq!(fired.get(), 1);
    }

    #[test]
    fn test_pending_exit_runs_after_frame() {
        let game = Rc::new(RefCell::new(Game::new(Settings::default())));
        let pending = PendingExit::default();
        {
            let mut g = game.borrow_mut();
            g.set_exit_callback(pending.callback());
            let mut won = GameState::new();
            won.won = true;
            g.session = Some(won);
            g.frame(0.0);
            g.key(" ", true);
            g.frame(20.0);
        }

        assert!(pending.take());
        assert!(!pending.take());
        // The handler may tear the game down once the frame has returned
        game.borrow_mut().stop();
        assert!(!game.borrow().is_running());
    }

    #[test]
    fn test_scene_uses_quality() {
        let mut game = Game::new(Settings::default());
        game.frame(0.0);
        let full = game.scene(0.0).len();
        for _ in 0..50 {
            game.record_draw_ms(50.0);
        }
        assert!(game.scene(0.0).len() < full);
    }

    #[test]
    fn test_fps_counter() {
        let mut fps = FpsCounter::default();
        for i in 1..=120 {
            fps.record(i as f64 * 1000.0 / 60.0);
        }
        assert_eq!(fps.fps(), 60);
    }

    #[test]
    fn test_dev_action_through_game() {
        let mut game = Game::new(Settings::default());
        game.apply_dev(DevAction::GrantFlight);
        assert_eq!(game.dev_snapshot().map(|s| s.can_fly), Some(true));
    }
}
