//! Starfield entry point
//!
//! In the browser: mounts the engine on the `#starfield` canvas, wires input,
//! the portrait widget and page analytics, and runs the frame loop.
//! Natively: runs a headless session and prints a JSON summary.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod page {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{Element, HtmlCanvasElement, HtmlElement, PointerEvent};

    use starfield::analytics::{self, BeaconSink, PageTracker};
    use starfield::audio::AudioManager;
    use starfield::error::{CaptureError, SurfaceError};
    use starfield::navigation::LocationNavigator;
    use starfield::portrait::{DragController, PointerCapture};
    use starfield::renderer::Canvas2d;
    use starfield::{Collaborators, Engine, EngineConfig, GameMode, Settings};

    const CANVAS_ID: &str = "starfield";
    const PORTRAIT_ID: &str = "portrait";
    const ANALYTICS_ENDPOINT: &str = "/api/analytics";

    /// Pointer capture on the portrait element
    struct ElementCapture(Element);

    impl PointerCapture for ElementCapture {
        fn capture(&mut self, pointer_id: i32) -> Result<(), CaptureError> {
            self.0
                .set_pointer_capture(pointer_id)
                .map_err(|e| CaptureError::Rejected(format!("{e:?}")))
        }

        fn release(&mut self, pointer_id: i32) -> Result<(), CaptureError> {
            self.0
                .release_pointer_capture(pointer_id)
                .map_err(|e| CaptureError::Rejected(format!("{e:?}")))
        }
    }

    struct Portrait {
        element: HtmlElement,
        capture: ElementCapture,
        drag: DragController,
    }

    impl Portrait {
        fn apply_transform(&self) {
            let _ = self
                .element
                .style()
                .set_property("transform", &self.drag.css_transform());
        }
    }

    /// Everything mounted on the page
    struct Page {
        engine: Engine,
        canvas: HtmlCanvasElement,
        portrait: Option<Portrait>,
        audio: Rc<RefCell<AudioManager>>,
        settings: Settings,
        tracker: PageTracker,
        raf_id: Option<i32>,
        torn_down: bool,
    }

    impl Page {
        fn frame(&mut self, now: f64) -> bool {
            if self.torn_down {
                return false;
            }

            if let Some(portrait) = self.portrait.as_mut() {
                portrait.drag.tick(now);
                portrait.apply_transform();
            }

            let outcome = match Canvas2d::from_canvas(&self.canvas) {
                Ok(mut surface) => self.engine.frame(now, Ok(&mut surface)),
                Err(e) => self.engine.frame(now, Err(e)),
            };
            outcome.keep_running()
        }

        fn observe_path(&mut self) {
            let Some(path) = web_sys::window().and_then(|w| w.location().pathname().ok()) else {
                return;
            };
            for event in self.tracker.observe(&path) {
                self.engine.report(&event);
            }
        }

        fn teardown(&mut self) {
            if self.torn_down {
                return;
            }
            self.torn_down = true;
            self.engine.teardown();
            if let Some(portrait) = self.portrait.as_mut() {
                portrait.drag.teardown();
            }
            if let (Some(id), Some(window)) = (self.raf_id.take(), web_sys::window()) {
                let _ = window.cancel_animation_frame(id);
            }
            log::info!("Starfield torn down");
        }
    }

    /// Engine config from the canvas `data-*` attributes
    fn read_config(canvas: &HtmlCanvasElement) -> EngineConfig {
        let mut config = EngineConfig::default();
        if let Some(mode) = canvas.get_attribute("data-mode") {
            match GameMode::from_str(&mode) {
                Some(mode) => config.mode = mode,
                None => log::warn!("Unknown data-mode {mode:?}, using game"),
            }
        }
        if let Some(goal) = canvas.get_attribute("data-target-goal") {
            config.target_goal = goal.trim().parse().unwrap_or(f64::NAN);
        }
        if let Some(path) = canvas.get_attribute("data-redirect-path") {
            config.redirect_path = path;
        }
        config.seed = Some(js_sys::Date::now() as u64);
        config
    }

    fn viewport_size(window: &web_sys::Window) -> Vec2 {
        let w = window
            .inner_width()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0);
        let h = window
            .inner_height()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0);
        Vec2::new(w as f32, h as f32)
    }

    fn prefers_reduced_motion(window: &web_sys::Window) -> bool {
        window
            .match_media("(prefers-reduced-motion: reduce)")
            .ok()
            .flatten()
            .is_some_and(|m| m.matches())
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let Some(canvas) = document
            .get_element_by_id(CANVAS_ID)
            .and_then(|e| e.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::warn!("{}", SurfaceError::MissingCanvas);
            return;
        };

        let size = viewport_size(&window);
        canvas.set_width(size.x as u32);
        canvas.set_height(size.y as u32);

        let settings = Settings::load();
        let audio = Rc::new(RefCell::new(AudioManager::new(&settings)));
        let collab = Collaborators {
            analytics: Box::new(BeaconSink::new(ANALYTICS_ENDPOINT)),
            sound: Box::new(audio.clone()),
            navigator: Box::new(LocationNavigator),
        };

        let mut engine = Engine::new(read_config(&canvas), size, collab);
        engine.set_reduced_motion(settings.reduced_motion || prefers_reduced_motion(&window));

        let portrait = document
            .get_element_by_id(PORTRAIT_ID)
            .and_then(|e| e.dyn_into::<HtmlElement>().ok())
            .map(|element| Portrait {
                capture: ElementCapture(element.clone().into()),
                element,
                drag: DragController::new(),
            });

        let page = Rc::new(RefCell::new(Page {
            engine,
            canvas,
            portrait,
            audio,
            settings,
            tracker: PageTracker::new(),
            raf_id: None,
            torn_down: false,
        }));

        page.borrow_mut().observe_path();

        let canvas = page.borrow().canvas.clone();
        setup_pointer_handlers(&canvas, page.clone());
        setup_portrait_handlers(page.clone());
        setup_page_handlers(&window, page.clone());
        setup_social_links(&document, page.clone());

        request_animation_frame(page);
        log::info!("Starfield running");
    }

    /// Gameplay input comes from the canvas only, so page content never fires
    fn setup_pointer_handlers(canvas: &HtmlCanvasElement, page: Rc<RefCell<Page>>) {
        {
            let page = page.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                let pos = Vec2::new(event.client_x() as f32, event.client_y() as f32);
                page.borrow_mut().engine.pointer_move(pos);
            });
            let _ = canvas
                .add_event_listener_with_callback("pointermove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let page = page.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: PointerEvent| {
                let mut p = page.borrow_mut();
                // First gesture unlocks audio
                p.audio.borrow_mut().unlock();
                p.engine.pointer_down();
            });
            let _ = canvas
                .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        for name in ["pointerup", "pointercancel", "pointerleave"] {
            let page = page.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: PointerEvent| {
                page.borrow_mut().engine.pointer_up();
            });
            let _ = canvas.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_portrait_handlers(page: Rc<RefCell<Page>>) {
        let Some(element) = page.borrow().portrait.as_ref().map(|p| p.element.clone()) else {
            return;
        };

        {
            let page = page.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                let pos = Vec2::new(event.client_x() as f32, event.client_y() as f32);
                let mut p = page.borrow_mut();
                if let Some(portrait) = p.portrait.as_mut() {
                    let Portrait { drag, capture, .. } = portrait;
                    drag.pointer_down(pos, event.pointer_id(), capture);
                }
            });
            let _ = element
                .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Captured pointer keeps delivering moves here
        {
            let page = page.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                let pos = Vec2::new(event.client_x() as f32, event.client_y() as f32);
                if let Some(portrait) = page.borrow_mut().portrait.as_mut() {
                    portrait.drag.pointer_move(pos);
                }
            });
            let _ = element
                .add_event_listener_with_callback("pointermove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        for name in ["pointerup", "pointerleave"] {
            let page = page.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                let mut p = page.borrow_mut();
                if let Some(portrait) = p.portrait.as_mut() {
                    let Portrait { drag, capture, .. } = portrait;
                    drag.pointer_up(event.pointer_id(), capture);
                }
            });
            let _ = element.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_page_handlers(window: &web_sys::Window, page: Rc<RefCell<Page>>) {
        // Resize re-seeds stars and re-centers the ship
        {
            let page = page.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let Some(window) = web_sys::window() else {
                    return;
                };
                let size = viewport_size(&window);
                let mut p = page.borrow_mut();
                p.canvas.set_width(size.x as u32);
                p.canvas.set_height(size.y as u32);
                p.engine.resize(size);
            });
            let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // History navigation
        {
            let page = page.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::PopStateEvent| {
                page.borrow_mut().observe_path();
            });
            let _ =
                window.add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Navigation timing once the page has loaded
        {
            let page = page.clone();
            let report = move || {
                if let Some(timing) = analytics::navigation_timing() {
                    page.borrow_mut()
                        .engine
                        .report(&analytics::AnalyticsEvent::PerfNavigation(timing));
                }
            };
            let loaded = window
                .document()
                .is_some_and(|d| d.ready_state() == "complete");
            if loaded {
                report();
            } else {
                let closure = Closure::once(move |_event: web_sys::Event| report());
                let _ =
                    window.add_event_listener_with_callback("load", closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }

        // M toggles sound; the choice persists
        {
            let page = page.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                if !event.key().eq_ignore_ascii_case("m") {
                    return;
                }
                let mut p = page.borrow_mut();
                let muted = p.audio.borrow_mut().toggle_mute();
                p.settings.muted = muted;
                p.settings.save();
                log::info!("Sound {}", if muted { "muted" } else { "on" });
            });
            let _ =
                window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Unmount
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                page.borrow_mut().teardown();
            });
            let _ =
                window.add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// `<a data-social="github" href="...">` links report their clicks
    fn setup_social_links(document: &web_sys::Document, page: Rc<RefCell<Page>>) {
        let Ok(links) = document.query_selector_all("[data-social]") else {
            return;
        };
        for i in 0..links.length() {
            let Some(link) = links.item(i).and_then(|n| n.dyn_into::<Element>().ok()) else {
                continue;
            };
            let network = link.get_attribute("data-social").unwrap_or_default();
            let href = link.get_attribute("href").unwrap_or_default();
            let page = page.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                page.borrow_mut()
                    .engine
                    .report(&analytics::social_click(&network, &href));
            });
            let _ = link.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(page: Rc<RefCell<Page>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let handle = page.clone();
        let closure = Closure::once(move |time: f64| {
            game_loop(page, time);
        });
        let id = window
            .request_animation_frame(closure.as_ref().unchecked_ref())
            .ok();
        handle.borrow_mut().raf_id = id;
        closure.forget();
    }

    fn game_loop(page: Rc<RefCell<Page>>, time: f64) {
        let keep_running = {
            let mut p = page.borrow_mut();
            p.raf_id = None;
            p.frame(time)
        };

        if keep_running {
            request_animation_frame(page);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    page::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Starfield (native) starting headless run...");

    let mut args = std::env::args().skip(1);
    let frames: u32 = args.next().and_then(|a| a.parse().ok()).unwrap_or(3600);
    let config = args
        .next()
        .map(|path| load_config(&path))
        .unwrap_or_default();

    let summary = headless::run(config, frames);
    match serde_json::to_string_pretty(&summary) {
        Ok(json) => println!("{json}"),
        Err(e) => log::error!("Failed to serialize summary: {e}"),
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn load_config(path: &str) -> starfield::EngineConfig {
    use starfield::EngineConfig;

    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            log::warn!("Cannot read {path}: {e}, using defaults");
            return EngineConfig::default();
        }
    };
    EngineConfig::from_json(&text).unwrap_or_else(|e| {
        log::warn!("{e}, using defaults");
        EngineConfig::default()
    })
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use glam::Vec2;
    use serde_json::{Value, json};

    use starfield::analytics::LogSink;
    use starfield::audio::Silent;
    use starfield::navigation::LogNavigator;
    use starfield::renderer::RecordingCanvas;
    use starfield::{Collaborators, Engine, EngineConfig, FrameOutcome};

    const SIZE: Vec2 = Vec2::new(1280.0, 720.0);
    const FRAME_MS: f64 = 1000.0 / 60.0;

    /// Run `frames` frames with the pointer circling the center, trigger held
    pub fn run(config: EngineConfig, frames: u32) -> Value {
        let collab = Collaborators {
            analytics: Box::new(LogSink),
            sound: Box::new(Silent),
            navigator: Box::new(LogNavigator),
        };
        let mut engine = Engine::new(config, SIZE, collab);
        let mut canvas = RecordingCanvas::counting();

        engine.pointer_down();
        let mut ran = 0;
        let mut outcome = FrameOutcome::Continue;
        for i in 0..frames {
            let t = i as f32 * 0.01;
            let pointer = SIZE / 2.0 + Vec2::new(t.cos(), t.sin()) * 200.0;
            engine.pointer_move(pointer);

            outcome = engine.frame(i as f64 * FRAME_MS, Ok(&mut canvas));
            ran += 1;
            if !outcome.keep_running() {
                break;
            }
        }
        engine.pointer_up();

        let state = engine.state();
        json!({
            "mode": engine.config().mode.as_str(),
            "frames": ran,
            "outcome": format!("{outcome:?}"),
            "kills": state.kills,
            "goal": engine.goal(),
            "spawned": state.spawned,
            "live_targets": state.targets.len(),
            "projectiles": state.projectiles.len(),
            "particles": state.particles.len(),
            "shooting_stars": state.shooting_stars.len(),
            "ship": { "x": state.ship.pos.x, "y": state.ship.pos.y, "angle": state.ship.angle },
            "draw": canvas.stats(),
        })
    }
}
