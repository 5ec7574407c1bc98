//! Orb Runner entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent};

    use orb_runner::audio::AudioManager;
    use orb_runner::platform::HostError;
    use orb_runner::renderer::RenderState;
    use orb_runner::sim::{DevAction, Viewport};
    use orb_runner::{Game, PendingExit, Settings};

    const CANVAS_ID: &str = "canvas";

    /// Everything the browser loop owns
    struct Host {
        game: Game,
        render_state: Option<RenderState>,
        audio: AudioManager,
        canvas: HtmlCanvasElement,
        start_time: f64,
        listeners: Option<Listeners>,
        /// Raised by the game, handled once the frame's borrow is released
        pending_exit: PendingExit,
    }

    /// Registered DOM listeners, kept so teardown can remove them
    struct Listeners {
        keydown: Closure<dyn FnMut(KeyboardEvent)>,
        keyup: Closure<dyn FnMut(KeyboardEvent)>,
        resize: Closure<dyn FnMut(web_sys::Event)>,
    }

    impl Host {
        /// Match the canvas backing store to its CSS size
        fn resize(&mut self) {
            let Some(window) = web_sys::window() else {
                return;
            };
            let dpr = window.device_pixel_ratio();
            let client_w = self.canvas.client_width().max(1);
            let client_h = self.canvas.client_height().max(1);
            let width = (client_w as f64 * dpr) as u32;
            let height = (client_h as f64 * dpr) as u32;
            self.canvas.set_width(width);
            self.canvas.set_height(height);

            let logical = (client_w as f32, client_h as f32);
            self.game.set_viewport(Viewport::new(logical.0, logical.1));
            if let Some(render_state) = self.render_state.as_mut() {
                render_state.resize(width, height, logical);
            }
        }

        /// Render the current frame and feed its cost to the quality controller
        fn render(&mut self, time: f64) {
            let Some(render_state) = self.render_state.as_mut() else {
                return;
            };
            let performance = web_sys::window().and_then(|w| w.performance());
            let started = performance.as_ref().map(|p| p.now());

            let vertices = self.game.scene(((time - self.start_time) / 1000.0) as f32);
            match render_state.render(&vertices) {
                Ok(_) => {}
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                    render_state.reconfigure();
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("Out of memory!");
                }
                Err(e) => log::warn!("Render error: {:?}", e),
            }

            if let (Some(performance), Some(started)) = (performance, started) {
                self.game.record_draw_ms((performance.now() - started) as f32);
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            let Some(hud) = self.game.hud() else {
                return;
            };

            if let Some(el) = document.query_selector("#hud-orbs .hud-value").ok().flatten() {
                el.set_text_content(Some(&hud.orbs_text()));
            }

            if let Some(el) = document.get_element_by_id("hud-status") {
                el.set_text_content(Some(hud.status_text()));
            }

            if let Some(el) = document.get_element_by_id("hud-banner") {
                match hud.banner() {
                    Some(text) => {
                        el.set_text_content(Some(text));
                        let _ = el.set_attribute("class", "");
                    }
                    None => {
                        let _ = el.set_attribute("class", "hidden");
                    }
                }
            }

            if let Some(el) = document.get_element_by_id("hud-fps") {
                if self.game.settings().show_fps {
                    let _ = el.set_attribute("class", "hud-item");
                    if let Some(val) = document.query_selector("#hud-fps .hud-value").ok().flatten()
                    {
                        val.set_text_content(Some(&self.game.fps().to_string()));
                    }
                } else {
                    let _ = el.set_attribute("class", "hud-item hidden");
                }
            }
        }

        /// Stop the loop and detach every listener
        fn teardown(&mut self) {
            self.game.stop();
            let Some(listeners) = self.listeners.take() else {
                return;
            };
            if let Some(window) = web_sys::window() {
                let _ = window.remove_event_listener_with_callback(
                    "keydown",
                    listeners.keydown.as_ref().unchecked_ref(),
                );
                let _ = window.remove_event_listener_with_callback(
                    "keyup",
                    listeners.keyup.as_ref().unchecked_ref(),
                );
                let _ = window.remove_event_listener_with_callback(
                    "resize",
                    listeners.resize.as_ref().unchecked_ref(),
                );
            }
            log::info!("Orb Runner torn down");
        }
    }

    pub async fn run() -> Result<(), HostError> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info)?;

        log::info!("Orb Runner starting...");

        let window = web_sys::window().ok_or(HostError::NoWindow)?;
        let document = window.document().ok_or(HostError::NoDocument)?;

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id(CANVAS_ID)
            .ok_or_else(|| HostError::CanvasMissing(CANVAS_ID.to_string()))?
            .dyn_into()
            .map_err(|_| HostError::NotACanvas(CANVAS_ID.to_string()))?;

        let settings = Settings::load();
        let audio = AudioManager::new(&settings);
        let mut game = Game::new(settings);
        let pending_exit = PendingExit::default();
        game.set_exit_callback(pending_exit.callback());

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let client_w = canvas.client_width().max(1);
        let client_h = canvas.client_height().max(1);
        let dpr = window.device_pixel_ratio();
        let width = (client_w as f64 * dpr) as u32;
        let height = (client_h as f64 * dpr) as u32;
        let render_state = RenderState::new(
            surface,
            &adapter,
            width,
            height,
            (client_w as f32, client_h as f32),
        )
        .await?;

        let host = Rc::new(RefCell::new(Host {
            game,
            render_state: Some(render_state),
            audio,
            canvas,
            start_time: js_sys::Date::now(),
            listeners: None,
            pending_exit,
        }));
        host.borrow_mut().resize();

        let listeners = setup_input_handlers(&window, host.clone());
        host.borrow_mut().listeners = Some(listeners);

        expose_dev_api(&window, host.clone())?;

        // Show HUD
        if let Some(hud) = document.get_element_by_id("hud") {
            let _ = hud.set_attribute("class", "");
        }

        // Start game loop
        request_animation_frame(host);

        log::info!("Orb Runner running!");
        Ok(())
    }

    /// Call `window.onOrbRunnerExit()` if the page defines it
    fn call_exit_hook() {
        let Some(window) = web_sys::window() else {
            return;
        };
        let hook = js_sys::Reflect::get(&window, &JsValue::from_str("onOrbRunnerExit"))
            .ok()
            .and_then(|f| f.dyn_into::<js_sys::Function>().ok());
        match hook {
            Some(hook) => {
                if let Err(e) = hook.call0(&window) {
                    log::warn!("onOrbRunnerExit failed: {:?}", e);
                }
            }
            None => log::info!("Level finished (no exit hook registered)"),
        }
    }

    fn setup_input_handlers(window: &web_sys::Window, host: Rc<RefCell<Host>>) -> Listeners {
        let keydown = {
            let host = host.clone();
            Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut h = host.borrow_mut();
                if let Some(intent) = h.game.key(&event.key(), true) {
                    if intent.prevents_default() {
                        event.prevent_default();
                    }
                    // Key press counts as the user gesture audio needs
                    h.audio.resume();
                }
            })
        };
        let _ = window
            .add_event_listener_with_callback("keydown", keydown.as_ref().unchecked_ref());

        let keyup = {
            let host = host.clone();
            Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut h = host.borrow_mut();
                if let Some(intent) = h.game.key(&event.key(), false) {
                    if intent.prevents_default() {
                        event.prevent_default();
                    }
                }
            })
        };
        let _ = window.add_event_listener_with_callback("keyup", keyup.as_ref().unchecked_ref());

        let resize = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            host.borrow_mut().resize();
        });
        let _ = window.add_event_listener_with_callback("resize", resize.as_ref().unchecked_ref());

        Listeners {
            keydown,
            keyup,
            resize,
        }
    }

    /// `window.orbRunner = { devAction(name), snapshot(), teardown() }`
    fn expose_dev_api(window: &web_sys::Window, host: Rc<RefCell<Host>>) -> Result<(), HostError> {
        let api = js_sys::Object::new();

        let dev_action = {
            let host = host.clone();
            Closure::<dyn FnMut(String) -> bool>::new(move |name: String| {
                match DevAction::from_str(&name) {
                    Some(action) => {
                        host.borrow_mut().game.apply_dev(action);
                        true
                    }
                    None => {
                        log::warn!("Unknown dev action '{}'", name);
                        false
                    }
                }
            })
        };

        let snapshot = {
            let host = host.clone();
            Closure::<dyn FnMut() -> JsValue>::new(move || {
                host.borrow()
                    .game
                    .dev_snapshot()
                    .and_then(|snap| serde_json::to_string(&snap).ok())
                    .map(|json| JsValue::from_str(&json))
                    .unwrap_or(JsValue::NULL)
            })
        };

        let teardown = Closure::<dyn FnMut()>::new(move || {
            host.borrow_mut().teardown();
        });

        for (name, closure) in [
            ("devAction", dev_action.as_ref()),
            ("snapshot", snapshot.as_ref()),
            ("teardown", teardown.as_ref()),
        ] {
            js_sys::Reflect::set(&api, &JsValue::from_str(name), closure)
                .map_err(|e| HostError::Js(format!("{:?}", e)))?;
        }
        js_sys::Reflect::set(window, &JsValue::from_str("orbRunner"), &api)
            .map_err(|e| HostError::Js(format!("{:?}", e)))?;

        // Owned by the page for its lifetime
        dev_action.forget();
        snapshot.forget();
        teardown.forget();
        Ok(())
    }

    fn request_animation_frame(host: Rc<RefCell<Host>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(host, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(host: Rc<RefCell<Host>>, time: f64) {
        let pending_exit = {
            let mut h = host.borrow_mut();
            if !h.game.is_running() {
                return;
            }

            h.game.frame(time);
            let events = h.game.drain_events();
            h.audio.play_events(&events);
            h.render(time);
            h.update_hud();
            h.pending_exit.clone()
        };

        // The page's exit handler may call back into orbRunner
        if pending_exit.take() {
            call_exit_hook();
        }

        // Teardown may have run during this frame
        if host.borrow().game.is_running() {
            request_animation_frame(host);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    if let Err(e) = wasm_game::run().await {
        log::error!("Orb Runner failed to start: {}", e);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Orb Runner (native) starting...");
    log::info!("Native mode has no window - run with `trunk serve` for the web version");

    println!("\nRunning headless demo...");
    demo::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {}

/// Scripted run through the whole loop without a window
#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use std::collections::BTreeMap;

    use orb_runner::consts::SIM_DT;
    use orb_runner::{Game, PendingExit, Settings};

    /// Frames to play before giving up (one minute at 60 fps)
    const MAX_FRAMES: u32 = 3600;

    pub fn run() {
        let mut game = Game::new(Settings::default());
        let mut events: BTreeMap<String, u32> = BTreeMap::new();
        let mut restarts = 0;
        let frame_ms = SIM_DT as f64 * 1000.0;

        game.key("ArrowRight", true);
        game.key("Shift", true);

        for frame in 0..MAX_FRAMES {
            // Hop every half second, holding jump for a few frames
            game.key(" ", frame % 30 < 8);

            game.frame(frame as f64 * frame_ms);
            for event in game.drain_events() {
                *events.entry(format!("{:?}", event)).or_default() += 1;
            }

            // Vertex count stands in for draw cost
            let vertices = game.scene(frame as f32 * SIM_DT);
            game.record_draw_ms(vertices.len() as f32 / 2000.0);

            let Some(state) = game.session() else { break };
            if state.won {
                break;
            }
            if state.dead && restarts < 3 {
                restarts += 1;
                game.key("r", true);
                game.key("r", false);
            }
        }

        let Some(state) = game.session() else { return };
        log::info!(
            "Demo finished after {} ticks: won={} dead={} x={:.0} orbs {}/{}",
            state.time_ticks,
            state.won,
            state.dead,
            state.player.pos.x,
            state.orbs_collected(),
            state.total_orbs()
        );
        log::info!("Events: {:?}", events);
        log::info!("Streaks drawn at exit: {}", game.visual_params().streaks);
        println!(
            "✓ Demo ran {} ticks ({} restarts), reached x={:.0}",
            state.time_ticks, restarts, state.player.pos.x
        );
    }
}
