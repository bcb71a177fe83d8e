//! Pixie Flight entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

use pixie_flight::Tuning;

/// Parse and check tuning JSON, falling back to defaults on any problem
fn tuning_or_default(json: Option<&str>) -> Tuning {
    let Some(json) = json else {
        return Tuning::default();
    };
    match Tuning::from_json(json) {
        Ok(tuning) => {
            log::info!("Loaded custom tuning");
            tuning
        }
        Err(e) => {
            log::warn!("Ignoring tuning: {e}");
            Tuning::default()
        }
    }
}

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{KeyboardEvent, MouseEvent, TouchEvent};

    use pixie_flight::consts::SIM_DT;
    use pixie_flight::platform::web::{DomHud, JsScene};
    use pixie_flight::{Game, Settings, audio::AudioManager};

    type WebGame = Game<JsScene, AudioManager, DomHud>;

    /// Game plus frame timing
    struct App {
        game: WebGame,
        last_time: f64,
    }

    impl App {
        fn frame(&mut self, time: f64) {
            // Calculate delta time
            let dt = if self.last_time > 0.0 {
                ((time - self.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            self.last_time = time;
            self.game.update(dt);
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::error_1(&format!("Failed to init logger: {e}").into());
        }

        log::info!("Pixie Flight starting...");

        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };

        // Optional tuning embedded in the page
        let tuning_json = document
            .get_element_by_id("tuning")
            .and_then(|el| el.text_content());
        let tuning = super::tuning_or_default(tuning_json.as_deref());

        let settings = Settings::default();
        let mut audio = AudioManager::new();
        audio.apply_settings(&settings);

        let seed = js_sys::Date::now() as u64;
        let game = Game::new(seed, tuning, settings, JsScene, audio, DomHud::new());
        let app = Rc::new(RefCell::new(App {
            game,
            last_time: 0.0,
        }));

        log::info!("Game initialized with seed: {}", seed);

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        setup_input_handlers(app.clone());
        setup_resize(app.clone());
        setup_auto_mute(app.clone());

        // Start game loop
        request_animation_frame(app);

        log::info!("Pixie Flight running!");
    }

    fn activate(app: &Rc<RefCell<App>>) {
        let mut a = app.borrow_mut();
        a.game.audio_mut().resume();
        a.game.activate();
    }

    fn setup_input_handlers(app: Rc<RefCell<App>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        // Mouse down anywhere
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                activate(&app);
            });
            let _ = document
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch start
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                activate(&app);
            });
            let _ = document
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard: space activates, A toggles the autopilot
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if event.repeat() {
                    return;
                }
                match event.code().as_str() {
                    "Space" | "ArrowUp" => {
                        event.prevent_default();
                        activate(&app);
                    }
                    "KeyA" => {
                        let mut a = app.borrow_mut();
                        let on = !a.game.autopilot();
                        a.game.set_autopilot(on);
                    }
                    _ => {}
                }
            });
            let _ = document
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let Some(window) = web_sys::window() else {
                return;
            };
            let width = window
                .inner_width()
                .ok()
                .and_then(|v| v.as_f64())
                .unwrap_or(0.0);
            let height = window
                .inner_height()
                .ok()
                .and_then(|v| v.as_f64())
                .unwrap_or(0.0);
            app.borrow_mut().game.resize(width as u32, height as u32);
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_auto_mute(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        // Window blur (click outside)
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut a = app.borrow_mut();
                if a.game.settings().mute_on_blur {
                    a.game.audio_mut().set_muted(true);
                    log::info!("Muted (window blur)");
                }
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                app.borrow_mut().game.audio_mut().set_muted(false);
            });
            let _ = window.add_event_listener_with_callback("focus", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(app: Rc<RefCell<App>>, time: f64) {
        app.borrow_mut().frame(time);
        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

/// Headless demo: the autopilot plays for a while and the outcome is logged.
///
/// Usage: `pixie-flight [tuning.json] [seconds]`
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use pixie_flight::Game;
    use pixie_flight::consts::SIM_DT;
    use pixie_flight::platform::headless::{LogAudio, RecordingHud, RecordingScene};
    use pixie_flight::settings::Settings;

    env_logger::init();
    log::info!("Pixie Flight (native) starting...");

    let mut args = std::env::args().skip(1);
    let tuning_json = args.next().and_then(|path| match std::fs::read_to_string(&path) {
        Ok(json) => Some(json),
        Err(e) => {
            log::warn!("Could not read tuning file {path}: {e}");
            None
        }
    });
    let tuning = tuning_or_default(tuning_json.as_deref());
    let seconds: u32 = args.next().and_then(|s| s.parse().ok()).unwrap_or(60);

    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);

    let mut game = Game::new(
        seed,
        tuning,
        Settings::default(),
        RecordingScene::with_animated(vec![0]),
        LogAudio::default(),
        RecordingHud::default(),
    );
    game.set_autopilot(true);

    let frames = seconds * 60;
    for _ in 0..frames {
        game.update(SIM_DT);
    }

    let hud = game.hud();
    log::info!(
        "Demo finished after {seconds}s: {} / {}, {} cues played, {} members alive",
        hud.score_text,
        hud.high_score_text,
        game.audio().played.len(),
        game.state.members.len()
    );

    match serde_json::to_string_pretty(&game.state.actor) {
        Ok(json) => println!("{json}"),
        Err(e) => log::error!("Failed to encode actor: {e}"),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
