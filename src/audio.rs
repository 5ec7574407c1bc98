//! Audio feedback for game events
//!
//! Each simulation event maps to one short tone. The browser build plays it
//! through a Web Audio oscillator with a simple decay envelope.

use crate::sim::GameEvent;

/// Oscillator shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wave {
    Sine,
    Square,
    Triangle,
    Sawtooth,
}

/// A single enveloped blip
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    /// Start frequency (Hz)
    pub freq: f32,
    /// Frequency at the end of the blip (Hz)
    pub end_freq: f32,
    /// Seconds
    pub duration: f32,
    /// Peak gain before volume scaling
    pub gain: f32,
    pub wave: Wave,
}

impl Tone {
    /// Tone played for a simulation event
    pub fn for_event(event: GameEvent) -> Self {
        match event {
            // Short upward chirp
            GameEvent::Jump => Tone {
                freq: 320.0,
                end_freq: 640.0,
                duration: 0.12,
                gain: 0.25,
                wave: Wave::Triangle,
            },
            GameEvent::RunStep => Tone {
                freq: 110.0,
                end_freq: 70.0,
                duration: 0.05,
                gain: 0.12,
                wave: Wave::Sine,
            },
            GameEvent::Collect => Tone {
                freq: 880.0,
                end_freq: 1320.0,
                duration: 0.15,
                gain: 0.25,
                wave: Wave::Sine,
            },
            GameEvent::Stomp => Tone {
                freq: 180.0,
                end_freq: 60.0,
                duration: 0.15,
                gain: 0.4,
                wave: Wave::Square,
            },
            // Sad descend
            GameEvent::Death => Tone {
                freq: 400.0,
                end_freq: 80.0,
                duration: 0.6,
                gain: 0.35,
                wave: Wave::Sawtooth,
            },
            GameEvent::Win => Tone {
                freq: 523.0,
                end_freq: 1046.0,
                duration: 0.5,
                gain: 0.3,
                wave: Wave::Triangle,
            },
            GameEvent::Flight => Tone {
                freq: 600.0,
                end_freq: 1800.0,
                duration: 0.4,
                gain: 0.3,
                wave: Wave::Sine,
            },
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{Tone, Wave};
    use crate::settings::Settings;
    use crate::sim::GameEvent;

    /// Audio manager for the game
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        volume: f32,
    }

    impl AudioManager {
        pub fn new(settings: &Settings) -> Self {
            // May fail outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                volume: settings.effective_volume(),
            }
        }

        /// Resume audio context (required after user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        /// Play the tone for each drained event
        pub fn play_events(&self, events: &[GameEvent]) {
            for &event in events {
                self.play(Tone::for_event(event));
            }
        }

        pub fn play(&self, tone: Tone) {
            if self.volume <= 0.0 {
                return;
            }
            let Some(ctx) = &self.ctx else { return };

            // Browsers start the context suspended until a user gesture
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            let Some((osc, gain)) = create_osc(ctx, tone) else {
                return;
            };
            let t = ctx.current_time();
            let end = t + tone.duration as f64;

            gain.gain().set_value_at_time(self.volume * tone.gain, t).ok();
            gain.gain().exponential_ramp_to_value_at_time(0.01, end).ok();
            osc.frequency().set_value_at_time(tone.freq, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(tone.end_freq, end)
                .ok();

            osc.start().ok();
            osc.stop_with_when(end + 0.02).ok();
        }
    }

    /// Create an oscillator wired through a gain node to the output
    fn create_osc(ctx: &AudioContext, tone: Tone) -> Option<(OscillatorNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.set_type(match tone.wave {
            Wave::Sine => OscillatorType::Sine,
            Wave::Square => OscillatorType::Square,
            Wave::Triangle => OscillatorType::Triangle,
            Wave::Sawtooth => OscillatorType::Sawtooth,
        });
        osc.frequency().set_value(tone.freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        Some((osc, gain))
    }
}
