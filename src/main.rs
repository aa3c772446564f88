//! Life Is A Struggle entry point
//!
//! Handles platform-specific initialization. The browser build wires the DOM
//! to a `GameShell`; the native build runs a headless autopilot session.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::{Rc, Weak};
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, KeyboardEvent, TouchEvent, Window};

    use life_struggle::dom::set_visible;
    use life_struggle::driver::{FrameId, FrameScheduler};
    use life_struggle::renderer::CanvasSurface;
    use life_struggle::viewport::{DeviceClass, Viewport};
    use life_struggle::{Catalog, GameError, GameShell, Screen, Settings};

    /// requestAnimationFrame-backed scheduler
    struct RafScheduler {
        window: Window,
        game: Weak<RefCell<WebGame>>,
    }

    impl FrameScheduler for RafScheduler {
        fn request_frame(&mut self, generation: u64) -> Option<FrameId> {
            let game = self.game.clone();
            let closure = Closure::once(move |time: f64| {
                if let Some(game) = game.upgrade() {
                    game_loop(&game, generation, time);
                }
            });
            let id = self
                .window
                .request_animation_frame(closure.as_ref().unchecked_ref())
                .map_err(|e| log::error!("requestAnimationFrame failed: {:?}", e))
                .ok();
            closure.forget();
            id
        }

        fn cancel_frame(&mut self, id: FrameId) {
            if let Err(e) = self.window.cancel_animation_frame(id) {
                log::warn!("cancelAnimationFrame failed: {:?}", e);
            }
        }
    }

    /// Browser-side state
    struct WebGame {
        shell: GameShell,
        scheduler: RafScheduler,
        surface: Option<CanvasSurface>,
    }

    fn document() -> Option<Document> {
        web_sys::window()?.document()
    }

    /// Show the section for `screen`, hide the others
    fn show_screen(screen: Screen) {
        let Some(document) = document() else { return };
        set_visible(&document, "loading", screen == Screen::Loading);
        set_visible(&document, "selection", screen == Screen::Selection);
        set_visible(&document, "game", screen == Screen::Playing);
        set_visible(&document, "game-over", matches!(screen, Screen::GameOver { .. }));

        if let Screen::GameOver { score } = screen {
            if let Some(el) = document.get_element_by_id("final-score") {
                el.set_text_content(Some(&score.to_string()));
            }
        }
    }

    fn update_hud(shell: &GameShell) {
        let Some(document) = document() else { return };
        let Some(game) = shell.game() else { return };

        if let Some(el) = document.query_selector("#hud-score .hud-value").ok().flatten() {
            el.set_text_content(Some(&game.session().score.to_string()));
        }
        set_visible(&document, "hud-fps", shell.settings().show_fps);
        if shell.settings().show_fps {
            if let Some(el) = document.query_selector("#hud-fps .hud-value").ok().flatten() {
                el.set_text_content(Some(&shell.fps().to_string()));
            }
        }
    }

    fn game_loop(game: &Rc<RefCell<WebGame>>, generation: u64, time: f64) {
        let mut g = game.borrow_mut();
        let WebGame {
            shell,
            scheduler,
            surface,
        } = &mut *g;
        let Some(surface) = surface.as_mut() else {
            return;
        };

        let final_score = shell.on_frame(scheduler, generation, time, surface);
        update_hud(shell);
        if final_score.is_some() {
            show_screen(shell.screen());
        }
    }

    /// Window size and device class from the media query
    fn measure_viewport(window: &Window, settings: &Settings) -> (Viewport, DeviceClass) {
        let width = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0) as f32;
        let height = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0) as f32;
        let device = match window.match_media(&settings.mobile_media_query()) {
            Ok(Some(query)) if query.matches() => DeviceClass::Mobile,
            Ok(Some(_)) => DeviceClass::Desktop,
            _ => settings.device_for_width(width),
        };
        (Viewport::new(width, height), device)
    }

    fn handle_resize(game: &Rc<RefCell<WebGame>>) {
        let Some(window) = web_sys::window() else { return };
        let mut g = game.borrow_mut();
        let WebGame {
            shell,
            scheduler,
            surface,
        } = &mut *g;

        let (viewport, device) = measure_viewport(&window, shell.settings());
        let field = shell.resize(viewport, device, scheduler);
        if let Some(surface) = surface.as_ref() {
            surface.set_size(field.width, field.height);
        }
    }

    fn game_canvas() -> Result<HtmlCanvasElement, GameError> {
        document()
            .and_then(|d| d.get_element_by_id("game-canvas"))
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
            .ok_or(GameError::SurfaceUnavailable)
    }

    fn start_career(game: &Rc<RefCell<WebGame>>, id: &str) {
        let mut g = game.borrow_mut();
        let WebGame {
            shell,
            scheduler,
            surface,
        } = &mut *g;

        let seed = shell.settings().session_seed(js_sys::Date::now() as u64);
        if let Err(e) = shell.select_career(id, seed, scheduler) {
            log::warn!("Selection ignored: {}", e);
            return;
        }
        show_screen(shell.screen());

        match game_canvas().and_then(CanvasSurface::new) {
            Ok(canvas) => {
                let field = shell.field();
                canvas.set_size(field.width, field.height);
                *surface = Some(canvas);
                shell.attach_surface(scheduler);
            }
            Err(e) => {
                log::error!("Cannot start session: {}", e);
                *surface = None;
                shell.surface_lost(scheduler);
                show_screen(shell.screen());
            }
        }
    }

    fn populate_selection(game: &Rc<RefCell<WebGame>>, document: &Document) -> Result<(), JsValue> {
        let Some(list) = document.get_element_by_id("career-list") else {
            log::error!("No #career-list element");
            return Ok(());
        };

        let careers = game.borrow().shell.catalog().careers().to_vec();
        for career in careers {
            let button = document.create_element("button")?;
            button.set_text_content(Some(&format!("{} {}", career.avatar, career.name)));
            button.set_attribute("data-career", &career.id)?;

            let game = game.clone();
            let id = career.id.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                start_career(&game, &id);
            });
            button.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
            closure.forget();

            list.append_child(&button)?;
        }
        Ok(())
    }

    fn setup_input_handlers(game: &Rc<RefCell<WebGame>>, window: &Window) -> Result<(), JsValue> {
        // Keyboard
        for (event_name, pressed) in [("keydown", true), ("keyup", false)] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                let key = event.key();
                if pressed && !event.repeat() && key.eq_ignore_ascii_case("f") {
                    g.shell.toggle_fps();
                    update_hud(&g.shell);
                    return;
                }
                let handled = if pressed {
                    g.shell.key_down(&key)
                } else {
                    g.shell.key_up(&key)
                };
                if handled {
                    event.prevent_default();
                }
            });
            window.add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        let canvas = game_canvas()?;

        // Touch zones: left or right half of the field
        for event_name in ["touchstart", "touchmove"] {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let rect = canvas_clone.get_bounding_client_rect();
                    let x = touch.client_x() as f32 - rect.left() as f32;
                    game.borrow_mut().shell.touch(x);
                }
            });
            canvas.add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        for event_name in ["touchend", "touchcancel"] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: TouchEvent| {
                game.borrow_mut().shell.release_touch();
            });
            canvas.add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }

    fn setup_resize(game: &Rc<RefCell<WebGame>>, window: &Window) -> Result<(), JsValue> {
        let game = game.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            handle_resize(&game);
        });
        window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    fn on_background_ready(game: &Rc<RefCell<WebGame>>) {
        let mut g = game.borrow_mut();
        if g.shell.background_ready() {
            show_screen(g.shell.screen());
        }
    }

    fn setup_background_ready(
        game: &Rc<RefCell<WebGame>>,
        window: &Window,
        document: &Document,
    ) -> Result<(), JsValue> {
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                on_background_ready(&game);
            });
            window.add_event_listener_with_callback("background-ready", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // The image may have finished loading before the module did
        let already = document
            .body()
            .is_some_and(|body| body.has_attribute("data-background-ready"));
        if already {
            on_background_ready(game);
        }
        Ok(())
    }

    fn setup_restart_button(game: &Rc<RefCell<WebGame>>, document: &Document) -> Result<(), JsValue> {
        if let Some(btn) = document.get_element_by_id("restart-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let mut g = game.borrow_mut();
                let WebGame {
                    shell,
                    scheduler,
                    surface,
                } = &mut *g;
                shell.restart(scheduler);
                *surface = None;
                show_screen(shell.screen());
            });
            btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        Ok(())
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::error_1(&format!("Failed to init logger: {}", e).into());
        }

        log::info!("Life Is A Struggle starting...");

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;

        let catalog = Catalog::builtin()?;
        let settings = Settings::load();
        log::info!("Loaded {} careers", catalog.len());

        let game = Rc::new_cyclic(|weak| {
            RefCell::new(WebGame {
                shell: GameShell::new(catalog, settings),
                scheduler: RafScheduler {
                    window: window.clone(),
                    game: weak.clone(),
                },
                surface: None,
            })
        });

        show_screen(Screen::Loading);
        handle_resize(&game);

        populate_selection(&game, &document)?;
        setup_input_handlers(&game, &window)?;
        setup_resize(&game, &window)?;
        setup_restart_button(&game, &document)?;
        setup_background_ready(&game, &window, &document)?;

        log::info!("Life Is A Struggle ready");
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Life Is A Struggle (native) starting...");
    log::info!("Native mode runs a headless autopilot - use `trunk serve` for the web version");

    let mut args = std::env::args().skip(1);
    let career = args.next().unwrap_or_else(|| "intern".to_string());
    let seed = args.next().and_then(|s| s.parse().ok());

    match headless::run(&career, seed) {
        Ok(score) => println!("{}: survived {} frames", career, score),
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use life_struggle::driver::ManualScheduler;
    use life_struggle::renderer::HeadlessSurface;
    use life_struggle::viewport::{DeviceClass, Viewport};
    use life_struggle::{Catalog, GameError, GameShell, Settings};

    /// Two simulated minutes
    const MAX_FRAMES: usize = 60 * 120;
    /// How far above the avatar an obstacle counts as a threat
    const LOOKAHEAD: f32 = 120.0;

    /// Play one session with a simple dodging autopilot; returns the score
    pub fn run(career: &str, seed: Option<u64>) -> Result<u64, GameError> {
        let settings = Settings::load();
        let mut shell = GameShell::new(Catalog::builtin()?, settings);
        let mut scheduler = ManualScheduler::new();
        let mut surface = HeadlessSurface::new();

        shell.background_ready();
        shell.resize(Viewport::new(1280.0, 800.0), DeviceClass::Desktop, &mut scheduler);

        let clock_seed = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default();
        let seed = seed.unwrap_or_else(|| shell.settings().session_seed(clock_seed));
        shell.select_career(career, seed, &mut scheduler)?;
        shell.attach_surface(&mut scheduler);

        let frame_ms = 1000.0 / 60.0;
        for frame in 0..MAX_FRAMES {
            steer(&mut shell);
            for (_, generation) in scheduler.take_due() {
                let time = frame as f64 * frame_ms;
                if let Some(score) = shell.on_frame(&mut scheduler, generation, time, &mut surface) {
                    log::info!("Game over after {} drawn frames", surface.frames());
                    return Ok(score);
                }
            }
        }

        let score = shell.game().map_or(0, |g| g.session().score);
        log::info!("Autopilot survived the whole run");
        Ok(score)
    }

    /// Step away from the nearest obstacle above the avatar
    fn steer(shell: &mut GameShell) {
        let Some(game) = shell.game() else { return };
        let session = game.session();
        let avatar = session.avatar.bounds(&session.field);

        let threat = session.obstacles.iter().find(|o| {
            let b = o.bounds();
            b.max().y > avatar.min.y - LOOKAHEAD
                && b.min.y < avatar.max().y
                && b.min.x < avatar.max().x + 10.0
                && b.max().x > avatar.min.x - 10.0
        });

        let (left, right) = match threat {
            Some(o) => {
                let room_left = o.pos.x;
                let room_right = session.field.width - (o.pos.x + o.size.x);
                (room_left > room_right, room_left <= room_right)
            }
            None => (false, false),
        };

        for (key, pressed) in [("ArrowLeft", left), ("ArrowRight", right)] {
            if pressed {
                shell.key_down(key);
            } else {
                shell.key_up(key);
            }
        }
    }
}
