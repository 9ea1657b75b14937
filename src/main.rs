//! Shrimp Run entry point
//!
//! Handles platform-specific initialization and runs the game loop. On the
//! web this wires the canvas, page buttons and audio to the simulation; on
//! native it plays a headless autopilot run and logs the result.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{
        CanvasRenderingContext2d, EventTarget, HtmlCanvasElement, HtmlImageElement,
        KeyboardEvent, PointerEvent, Window,
    };

    use shrimp_run::Settings;
    use shrimp_run::audio::AudioManager;
    use shrimp_run::platform::{Button, InputRouter};
    use shrimp_run::renderer::{PickupSprite, RenderState, build_scene};
    use shrimp_run::sim::{GameState, Hud, TickInput, choose_command, tick, viewport_for_window};

    const SPRITE_URL: &str = "shrimp.png";

    fn window() -> Result<Window, JsValue> {
        web_sys::window().ok_or_else(|| JsValue::from_str("no window"))
    }

    /// Game instance holding all state
    struct Game {
        state: GameState,
        render_state: Option<RenderState>,
        input: TickInput,
        router: InputRouter,
        audio: AudioManager,
        settings: Settings,
        canvas: HtmlCanvasElement,
        /// Last HUD written to the DOM
        shown: Option<(Hud, bool)>,
    }

    impl Game {
        fn new(seed: u64, canvas: HtmlCanvasElement, viewport: (f32, f32)) -> Self {
            let settings = Settings::load();
            Self {
                state: GameState::new(seed, viewport.0, viewport.1),
                render_state: None,
                input: TickInput::default(),
                router: InputRouter::new(),
                audio: AudioManager::new(&settings),
                settings,
                canvas,
                shown: None,
            }
        }

        /// Fit the canvas to the window and recompute the lane layout
        fn resize(&mut self) -> Result<(), JsValue> {
            let window = window()?;
            let inner_w = window.inner_width()?.as_f64().unwrap_or(0.0) as f32;
            let inner_h = window.inner_height()?.as_f64().unwrap_or(0.0) as f32;
            let (w, h) = viewport_for_window(inner_w, inner_h);
            let (pw, ph) = size_canvas(&self.canvas, &window, (w, h))?;

            self.state.relayout(w, h);
            if let Some(render_state) = self.render_state.as_mut() {
                render_state.resize(pw, ph, (w, h));
            }
            Ok(())
        }

        /// One animation frame: input, simulation, audio, draw, HUD
        fn frame(&mut self, now: f64) {
            if self.router.autopilot {
                if let Some(command) = choose_command(&self.state) {
                    self.input.push(command);
                }
            }

            tick(&mut self.state, &self.input, now);
            self.input.clear();

            for event in self.state.drain_events() {
                self.audio.handle_event(&event);
            }

            self.render();
            self.update_hud();
        }

        fn render(&mut self) {
            let Some(render_state) = self.render_state.as_mut() else {
                return;
            };
            let vertices = build_scene(&self.state, render_state.pickup_art());
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
        }

        /// Update HUD elements in DOM (only when something changed)
        fn update_hud(&mut self) {
            let hud = self.state.hud();
            let muted = self.audio.muted();
            if self.shown == Some((hud, muted)) {
                return;
            }
            self.shown = Some((hud, muted));

            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };

            if let Some(el) = document.get_element_by_id("score") {
                el.set_text_content(Some(&format!("Shrimps: {}", hud.score)));
            }

            if let Some(el) = document.get_element_by_id("overlay") {
                match self.state.overlay_message() {
                    Some(message) => {
                        el.set_text_content(Some(message));
                        let _ = el.set_attribute("class", "");
                    }
                    None => {
                        let _ = el.set_attribute("class", "hidden");
                    }
                }
            }

            if let Some(el) = document.get_element_by_id(Button::Mute.element_id()) {
                el.set_text_content(Some(if muted { "Unmute" } else { "Mute" }));
            }
        }

        fn press(&mut self, button: Button) {
            match button.command() {
                Some(command) => self.input.push(command),
                None => {
                    let muted = self.settings.toggle_muted();
                    self.settings.save();
                    self.audio.set_muted(muted, self.state.is_running());
                    log::info!("Muted: {}", muted);
                }
            }
        }
    }

    /// Set the canvas CSS size and its device-pixel backing size
    fn size_canvas(
        canvas: &HtmlCanvasElement,
        window: &Window,
        (w, h): (f32, f32),
    ) -> Result<(u32, u32), JsValue> {
        let dpr = window.device_pixel_ratio().max(1.0);
        canvas.set_attribute("style", &format!("width:{}px;height:{}px", w, h))?;
        let pw = (w as f64 * dpr).floor() as u32;
        let ph = (h as f64 * dpr).floor() as u32;
        canvas.set_width(pw);
        canvas.set_height(ph);
        Ok((pw, ph))
    }

    /// A DOM listener that unregisters itself when dropped
    struct Listener {
        target: EventTarget,
        event: &'static str,
        closure: Closure<dyn FnMut(web_sys::Event)>,
    }

    impl Listener {
        fn add(
            target: &EventTarget,
            event: &'static str,
            handler: impl FnMut(web_sys::Event) + 'static,
        ) -> Result<Self, JsValue> {
            let closure = Closure::<dyn FnMut(web_sys::Event)>::new(handler);
            target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
            Ok(Self {
                target: target.clone(),
                event,
                closure,
            })
        }
    }

    impl Drop for Listener {
        fn drop(&mut self) {
            let _ = self.target.remove_event_listener_with_callback(
                self.event,
                self.closure.as_ref().unchecked_ref(),
            );
        }
    }

    /// Self-rescheduling requestAnimationFrame loop
    struct FrameLoop {
        callback: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>,
        handle: Rc<Cell<Option<i32>>>,
    }

    impl FrameLoop {
        fn start(game: Rc<RefCell<Game>>) -> Result<Self, JsValue> {
            let callback: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> =
                Rc::new(RefCell::new(None));
            let handle = Rc::new(Cell::new(None));

            let next = callback.clone();
            let next_handle = handle.clone();
            *callback.borrow_mut() = Some(Closure::new(move |now: f64| {
                game.borrow_mut().frame(now);
                // Taken on teardown, which ends the loop
                if let Some(cb) = next.borrow().as_ref() {
                    next_handle.set(request_frame(cb).ok());
                }
            }));

            if let Some(cb) = callback.borrow().as_ref() {
                handle.set(Some(request_frame(cb)?));
            }
            Ok(Self { callback, handle })
        }

        fn cancel(&self) {
            if let (Some(id), Some(window)) = (self.handle.take(), web_sys::window()) {
                let _ = window.cancel_animation_frame(id);
            }
            // Drops the closure and the cycle through `next`
            self.callback.borrow_mut().take();
        }
    }

    fn request_frame(cb: &Closure<dyn FnMut(f64)>) -> Result<i32, JsValue> {
        window()?.request_animation_frame(cb.as_ref().unchecked_ref())
    }

    /// Everything that keeps the game alive in the page
    struct Runtime {
        game: Rc<RefCell<Game>>,
        frame_loop: FrameLoop,
        listeners: Vec<Listener>,
    }

    impl Runtime {
        fn shutdown(self) {
            self.frame_loop.cancel();
            drop(self.listeners);
            self.game.borrow().audio.silence();
            log::info!("Shrimp Run stopped");
        }
    }

    thread_local! {
        static RUNTIME: RefCell<Option<Runtime>> = const { RefCell::new(None) };
    }

    /// Cancel the frame loop and remove every listener; no tick runs after this
    pub fn teardown() {
        if let Some(runtime) = RUNTIME.with(|rt| rt.borrow_mut().take()) {
            runtime.shutdown();
        }
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        // Fails only if a previous run already installed the logger
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Shrimp Run starting...");
        teardown();

        let window = window()?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or_else(|| JsValue::from_str("no canvas"))?
            .dyn_into()
            .map_err(|_| JsValue::from_str("#canvas is not a canvas"))?;

        let inner_w = window.inner_width()?.as_f64().unwrap_or(0.0) as f32;
        let inner_h = window.inner_height()?.as_f64().unwrap_or(0.0) as f32;
        let viewport = viewport_for_window(inner_w, inner_h);
        size_canvas(&canvas, &window, viewport)?;

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed, canvas.clone(), viewport)));
        log::info!("Game initialized with seed: {}", seed);

        // Without a GPU the page still runs the game and HUD
        match RenderState::for_canvas(canvas.clone(), viewport).await {
            Ok(render_state) => game.borrow_mut().render_state = Some(render_state),
            Err(e) => log::error!("Renderer unavailable: {}", e),
        }

        let mut listeners = setup_input_handlers(&window, &canvas, &game)?;
        listeners.extend(setup_buttons(&document, &game)?);
        listeners.extend(load_sprite(&document, &game)?);

        let frame_loop = FrameLoop::start(game.clone())?;
        RUNTIME.with(|rt| {
            *rt.borrow_mut() = Some(Runtime {
                game,
                frame_loop,
                listeners,
            })
        });

        log::info!("Shrimp Run running!");
        Ok(())
    }

    fn setup_input_handlers(
        window: &Window,
        canvas: &HtmlCanvasElement,
        game: &Rc<RefCell<Game>>,
    ) -> Result<Vec<Listener>, JsValue> {
        let mut listeners = Vec::new();

        // Keyboard
        {
            let game = game.clone();
            listeners.push(Listener::add(window, "keydown", move |event| {
                let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
                    return;
                };
                let mut g = game.borrow_mut();
                if let Some(command) = g.router.key_down(&event.key()) {
                    // Arrows and space would otherwise scroll the page
                    event.prevent_default();
                    g.input.push(command);
                }
            })?);
        }

        // Gesture start on the canvas
        {
            let game = game.clone();
            listeners.push(Listener::add(canvas, "pointerdown", move |event| {
                if let Some(event) = event.dyn_ref::<PointerEvent>() {
                    game.borrow_mut().router.pointer_down(event.client_x() as f32);
                }
            })?);
        }

        // Gesture end anywhere
        {
            let game = game.clone();
            listeners.push(Listener::add(window, "pointerup", move |event| {
                let Some(event) = event.dyn_ref::<PointerEvent>() else {
                    return;
                };
                let mut g = game.borrow_mut();
                if let Some(command) = g.router.pointer_up(event.client_x() as f32) {
                    g.input.push(command);
                }
            })?);
        }

        {
            let game = game.clone();
            listeners.push(Listener::add(window, "pointercancel", move |_| {
                game.borrow_mut().router.pointer_cancel();
            })?);
        }

        // Resize never touches run state, only geometry
        {
            let game = game.clone();
            listeners.push(Listener::add(window, "resize", move |_| {
                if let Err(e) = game.borrow_mut().resize() {
                    log::warn!("Resize failed: {:?}", e);
                }
            })?);
        }

        Ok(listeners)
    }

    fn setup_buttons(
        document: &web_sys::Document,
        game: &Rc<RefCell<Game>>,
    ) -> Result<Vec<Listener>, JsValue> {
        let mut listeners = Vec::new();
        for button in Button::ALL {
            let Some(el) = document.get_element_by_id(button.element_id()) else {
                log::warn!("Missing button #{}", button.element_id());
                continue;
            };
            let game = game.clone();
            listeners.push(Listener::add(&el, "click", move |_| {
                game.borrow_mut().press(button);
            })?);
        }
        Ok(listeners)
    }

    /// Start loading the pickup sprite; the procedural shrimp is drawn until
    /// (and unless) it decodes
    fn load_sprite(
        document: &web_sys::Document,
        game: &Rc<RefCell<Game>>,
    ) -> Result<Vec<Listener>, JsValue> {
        let img = HtmlImageElement::new()?;
        let mut listeners = Vec::new();

        {
            let game = game.clone();
            let img_loaded = img.clone();
            let document = document.clone();
            listeners.push(Listener::add(&img, "load", move |_| {
                match decode_sprite(&document, &img_loaded) {
                    Ok(sprite) => {
                        if let Some(render_state) = game.borrow_mut().render_state.as_mut() {
                            render_state.set_pickup_sprite(&sprite);
                        }
                    }
                    Err(e) => log::warn!("Pickup sprite unusable, using fallback: {:?}", e),
                }
            })?);
        }

        listeners.push(Listener::add(&img, "error", |_| {
            log::warn!("Pickup sprite failed to load, using fallback");
        })?);

        img.set_src(SPRITE_URL);
        Ok(listeners)
    }

    /// Draw the image into an offscreen canvas and read back RGBA8
    fn decode_sprite(
        document: &web_sys::Document,
        img: &HtmlImageElement,
    ) -> Result<PickupSprite, JsValue> {
        let (w, h) = (img.natural_width(), img.natural_height());
        let canvas: HtmlCanvasElement = document
            .create_element("canvas")?
            .dyn_into()
            .map_err(|_| JsValue::from_str("not a canvas"))?;
        canvas.set_width(w);
        canvas.set_height(h);

        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("no 2d context"))?
            .dyn_into()
            .map_err(|_| JsValue::from_str("not a 2d context"))?;
        ctx.draw_image_with_html_image_element(img, 0.0, 0.0)?;
        let data = ctx.get_image_data(0.0, 0.0, w as f64, h as f64)?;

        PickupSprite::new(w, h, data.data().0).ok_or_else(|| JsValue::from_str("empty image"))
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    if let Err(e) = wasm_game::run().await {
        log::error!("Failed to start: {:?}", e);
    }
}

/// Stop the game loop and remove all input listeners
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn teardown() {
    wasm_game::teardown();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Shrimp Run (native) starting...");
    log::info!("Native mode runs a headless demo - run with `trunk serve` for the web version");

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(2024);
    let summary = demo::run(seed, 120_000.0);

    println!(
        "\nSeed {}: {:.1}s survived, {} shrimp ({} golden), {} points, top speed {:.1}{}",
        seed,
        summary.survived_ms / 1000.0,
        summary.collected,
        summary.golden,
        summary.points,
        summary.top_speed,
        if summary.crashed { " (crashed)" } else { "" },
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use shrimp_run::sim::{GameEvent, GameState, TickInput, choose_command, tick};

    const FRAME_MS: f64 = 1000.0 / 60.0;

    #[derive(Debug, Default)]
    pub struct Summary {
        pub survived_ms: f64,
        pub collected: u32,
        pub golden: u32,
        pub points: u32,
        pub top_speed: f32,
        pub crashed: bool,
    }

    /// Let the autopilot play one run at 60 fps for up to `limit_ms`
    pub fn run(seed: u64, limit_ms: f64) -> Summary {
        let mut state = GameState::new(seed, 1000.0, 800.0);
        let mut input = TickInput::default();
        let mut summary = Summary::default();
        let mut now = 0.0;

        while now <= limit_ms {
            if let Some(command) = choose_command(&state) {
                input.push(command);
            }
            tick(&mut state, &input, now);
            input.clear();

            for event in state.drain_events() {
                match event {
                    GameEvent::Collected { points, bonus } => {
                        summary.collected += 1;
                        summary.points += points;
                        if bonus {
                            summary.golden += 1;
                        }
                    }
                    GameEvent::Crashed { score } => {
                        log::info!("Crashed holding {} points", score);
                        summary.crashed = true;
                    }
                    GameEvent::Started | GameEvent::Stopped => {}
                }
            }
            summary.top_speed = summary.top_speed.max(state.speed);
            if summary.crashed {
                break;
            }
            now += FRAME_MS;
        }

        summary.survived_ms = state.elapsed_ms;
        summary
    }
}
