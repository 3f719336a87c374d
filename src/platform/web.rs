//! Browser host: a canvas 2D surface, requestAnimationFrame scheduling and
//! DOM input listeners, plus the `WebGame` handle exported to JavaScript.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use glam::Vec2;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    CanvasRenderingContext2d, Document, Element, Event, EventTarget, HtmlCanvasElement,
    HtmlElement, KeyboardEvent, TouchEvent, Window,
};

use crate::config::EngineConfig;
use crate::engine::{FrameHandle, GameLoopEngine, Host};
use crate::error::{EngineError, Result};
use crate::games::{GameKind, create_game};
use crate::render::{Color, RenderSink, TextAlign, css_color};
use crate::sim::Aabb;

type Engine = GameLoopEngine<WebHost>;

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    // A second engine on the same page finds the logger already installed
    let _ = console_log::init_with_level(log::Level::Info);
}

/// Where the canvas gets mounted
#[derive(Debug, Clone)]
pub enum Container {
    Element(HtmlElement),
    Selector(String),
}

impl Container {
    /// A selector string or an element handle
    pub fn from_js(value: JsValue) -> Result<Self> {
        if let Some(selector) = value.as_string() {
            return Ok(Container::Selector(selector));
        }
        value
            .dyn_into::<HtmlElement>()
            .map(Container::Element)
            .map_err(|_| EngineError::ContainerNotFound("not an element or selector".into()))
    }

    fn resolve(&self, document: &Document) -> Result<Element> {
        match self {
            Container::Element(element) => Ok(element.clone().into()),
            Container::Selector(selector) => document
                .query_selector(selector)
                .ok()
                .flatten()
                .ok_or_else(|| EngineError::ContainerNotFound(selector.clone())),
        }
    }
}

/// `RenderSink` over a canvas 2D context
pub struct CanvasSink {
    ctx: CanvasRenderingContext2d,
    size: Vec2,
}

impl CanvasSink {
    fn arc_path(&self, center: Vec2, radius: f32, start: f32, end: f32) {
        self.ctx.begin_path();
        let _ = self.ctx.arc(
            center.x as f64,
            center.y as f64,
            radius as f64,
            start as f64,
            end as f64,
        );
    }
}

impl RenderSink for CanvasSink {
    fn clear(&mut self, color: Color) {
        self.ctx.set_fill_style_str(&css_color(color));
        self.ctx
            .fill_rect(0.0, 0.0, self.size.x as f64, self.size.y as f64);
    }

    fn fill_rect(&mut self, rect: Aabb, color: Color) {
        self.ctx.set_fill_style_str(&css_color(color));
        self.ctx.fill_rect(
            rect.x as f64,
            rect.y as f64,
            rect.width as f64,
            rect.height as f64,
        );
    }

    fn stroke_rect(&mut self, rect: Aabb, color: Color, line_width: f32) {
        self.ctx.set_stroke_style_str(&css_color(color));
        self.ctx.set_line_width(line_width as f64);
        self.ctx.stroke_rect(
            rect.x as f64,
            rect.y as f64,
            rect.width as f64,
            rect.height as f64,
        );
    }

    fn fill_arc(&mut self, center: Vec2, radius: f32, start: f32, end: f32, color: Color) {
        self.ctx.set_fill_style_str(&css_color(color));
        self.arc_path(center, radius, start, end);
        self.ctx.fill();
    }

    fn stroke_arc(
        &mut self,
        center: Vec2,
        radius: f32,
        start: f32,
        end: f32,
        color: Color,
        line_width: f32,
    ) {
        self.ctx.set_stroke_style_str(&css_color(color));
        self.ctx.set_line_width(line_width as f64);
        self.arc_path(center, radius, start, end);
        self.ctx.stroke();
    }

    fn stroke_path(&mut self, points: &[Vec2], closed: bool, color: Color, line_width: f32) {
        let Some((first, rest)) = points.split_first() else {
            return;
        };
        self.ctx.set_stroke_style_str(&css_color(color));
        self.ctx.set_line_width(line_width as f64);
        self.ctx.begin_path();
        self.ctx.move_to(first.x as f64, first.y as f64);
        for p in rest {
            self.ctx.line_to(p.x as f64, p.y as f64);
        }
        if closed {
            self.ctx.close_path();
        }
        self.ctx.stroke();
    }

    fn fill_text(&mut self, text: &str, pos: Vec2, size: f32, align: TextAlign, color: Color) {
        self.ctx.set_fill_style_str(&css_color(color));
        self.ctx.set_font(&format!("{}px monospace", size.round()));
        self.ctx.set_text_align(align.as_str());
        let _ = self.ctx.fill_text(text, pos.x as f64, pos.y as f64);
    }

    fn save(&mut self) {
        self.ctx.save();
    }

    fn restore(&mut self) {
        self.ctx.restore();
    }

    fn translate(&mut self, offset: Vec2) {
        let _ = self.ctx.translate(offset.x as f64, offset.y as f64);
    }

    fn rotate(&mut self, angle: f32) {
        let _ = self.ctx.rotate(angle as f64);
    }
}

/// A DOM listener removed again when dropped
struct EventListener {
    target: EventTarget,
    event: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl EventListener {
    fn new(
        target: &EventTarget,
        event: &'static str,
        handler: impl FnMut(Event) + 'static,
    ) -> Result<Self> {
        let callback = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        target
            .add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())
            .map_err(|_| EngineError::Listener { event })?;
        Ok(Self {
            target: target.clone(),
            event,
            callback,
        })
    }
}

impl Drop for EventListener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.event, self.callback.as_ref().unchecked_ref());
    }
}

/// Canvas mounted in a container element
pub struct WebHost {
    window: Window,
    canvas: HtmlCanvasElement,
    sink: CanvasSink,
    frame_callback: Option<Closure<dyn FnMut(f64)>>,
    listeners: Vec<EventListener>,
    attached: bool,
}

impl WebHost {
    /// Create the canvas and mount it. Nothing is added to the page unless
    /// every step succeeds.
    pub fn mount(container: &Container, config: &EngineConfig) -> Result<Self> {
        let window = web_sys::window()
            .ok_or_else(|| EngineError::SurfaceUnavailable("no window".into()))?;
        let document = window
            .document()
            .ok_or_else(|| EngineError::SurfaceUnavailable("no document".into()))?;
        let parent = container.resolve(&document)?;

        let canvas: HtmlCanvasElement = document
            .create_element("canvas")
            .ok()
            .and_then(|el| el.dyn_into().ok())
            .ok_or_else(|| EngineError::SurfaceUnavailable("cannot create canvas".into()))?;
        canvas.set_width(config.width);
        canvas.set_height(config.height);

        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .and_then(|ctx| ctx.dyn_into().ok())
            .ok_or_else(|| EngineError::SurfaceUnavailable("2d context".into()))?;

        parent
            .append_child(&canvas)
            .map_err(|_| EngineError::SurfaceUnavailable("cannot append canvas".into()))?;
        log::info!("Canvas {}x{} mounted", config.width, config.height);

        Ok(Self {
            window,
            canvas,
            sink: CanvasSink {
                ctx,
                size: config.size(),
            },
            frame_callback: None,
            listeners: Vec::new(),
            attached: true,
        })
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    /// Client coordinates → canvas pixels
    fn surface_point(canvas: &HtmlCanvasElement, client_x: i32, client_y: i32) -> Vec2 {
        let rect = canvas.get_bounding_client_rect();
        let scale_x = if rect.width() > 0.0 {
            canvas.width() as f64 / rect.width()
        } else {
            1.0
        };
        let scale_y = if rect.height() > 0.0 {
            canvas.height() as f64 / rect.height()
        } else {
            1.0
        };
        Vec2::new(
            ((client_x as f64 - rect.left()) * scale_x) as f32,
            ((client_y as f64 - rect.top()) * scale_y) as f32,
        )
    }
}

impl Host for WebHost {
    fn request_frame(&mut self) -> Option<FrameHandle> {
        let callback = self.frame_callback.as_ref()?;
        self.window
            .request_animation_frame(callback.as_ref().unchecked_ref())
            .ok()
            .map(FrameHandle)
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        let _ = self.window.cancel_animation_frame(handle.0);
    }

    fn sink(&mut self) -> &mut dyn RenderSink {
        &mut self.sink
    }

    fn detach(&mut self) {
        if !self.attached {
            return;
        }
        self.listeners.clear();
        self.canvas.remove();
        self.attached = false;
        log::debug!("Canvas and listeners removed");
    }
}

impl Drop for WebHost {
    fn drop(&mut self) {
        self.detach();
    }
}

/// Run `f` on the engine if it is still alive and not already borrowed
fn with_engine<R>(engine: &Weak<RefCell<Engine>>, f: impl FnOnce(&mut Engine) -> R) -> Option<R> {
    let engine = engine.upgrade()?;
    let mut engine = engine.try_borrow_mut().ok()?;
    Some(f(&mut engine))
}

fn install_frame_callback(engine: &Rc<RefCell<Engine>>) {
    let weak = Rc::downgrade(engine);
    let callback = Closure::wrap(Box::new(move |time: f64| {
        with_engine(&weak, |engine| engine.frame(time));
    }) as Box<dyn FnMut(f64)>);
    engine.borrow_mut().host_mut().frame_callback = Some(callback);
}

fn install_listeners(engine: &Rc<RefCell<Engine>>) -> Result<()> {
    let (window, canvas, config) = {
        let engine = engine.borrow();
        (
            engine.host().window.clone(),
            engine.host().canvas.clone(),
            engine.config().clone(),
        )
    };
    let mut listeners = Vec::new();

    if config.use_keyboard {
        let weak = Rc::downgrade(engine);
        listeners.push(EventListener::new(&window, "keydown", move |event| {
            let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
                return;
            };
            if with_engine(&weak, |engine| engine.key_down(&event.key())) == Some(true) {
                event.prevent_default();
            }
        })?);

        let weak = Rc::downgrade(engine);
        listeners.push(EventListener::new(&window, "keyup", move |event| {
            let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
                return;
            };
            if with_engine(&weak, |engine| engine.key_up(&event.key())) == Some(true) {
                event.prevent_default();
            }
        })?);
    }

    if config.use_mobile {
        let touch_events: [(&'static str, fn(&mut Engine, Vec2) -> bool); 3] = [
            ("touchstart", Engine::touch_start),
            ("touchmove", Engine::touch_move),
            ("touchend", Engine::touch_end),
        ];
        for (name, handler) in touch_events {
            let weak = Rc::downgrade(engine);
            let surface = canvas.clone();
            listeners.push(EventListener::new(&canvas, name, move |event| {
                let Some(event) = event.dyn_ref::<TouchEvent>() else {
                    return;
                };
                let Some(touch) = event.changed_touches().get(0) else {
                    return;
                };
                let point = WebHost::surface_point(&surface, touch.client_x(), touch.client_y());
                if with_engine(&weak, |engine| handler(engine, point)) == Some(true) {
                    event.prevent_default();
                }
            })?);
        }
    }

    // Auto-pause when the player looks away
    let weak = Rc::downgrade(engine);
    listeners.push(EventListener::new(&window, "blur", move |_| {
        with_engine(&weak, |engine| {
            if engine.is_running() && !engine.is_paused() {
                log::info!("Auto-paused (window blur)");
                engine.pause();
            }
        });
    })?);

    if let Some(document) = window.document() {
        let weak = Rc::downgrade(engine);
        let doc = document.clone();
        listeners.push(EventListener::new(&document, "visibilitychange", move |_| {
            if doc.visibility_state() != web_sys::VisibilityState::Hidden {
                return;
            }
            with_engine(&weak, |engine| {
                if engine.is_running() && !engine.is_paused() {
                    log::info!("Auto-paused (tab hidden)");
                    engine.pause();
                }
            });
        })?);
    }

    engine.borrow_mut().host_mut().listeners = listeners;
    Ok(())
}

/// A game mounted in the page
#[wasm_bindgen]
pub struct WebGame {
    engine: Rc<RefCell<Engine>>,
}

#[wasm_bindgen]
impl WebGame {
    /// `container` is an element or a CSS selector; `config_json` is a partial
    /// options object
    #[wasm_bindgen(constructor)]
    pub fn new(
        container: JsValue,
        kind: &str,
        config_json: Option<String>,
    ) -> std::result::Result<WebGame, JsValue> {
        let config = match config_json {
            Some(json) => EngineConfig::from_json(&json)?,
            None => EngineConfig::default(),
        };
        let kind: GameKind = kind.parse()?;
        let container = Container::from_js(container)?;

        let host = WebHost::mount(&container, &config)?;
        let game = create_game(kind, &config);
        let engine = Rc::new(RefCell::new(GameLoopEngine::new(host, game, config)));
        install_frame_callback(&engine);
        // On failure the engine drops here and the host removes whatever was attached
        install_listeners(&engine)?;
        Ok(WebGame { engine })
    }

    pub fn start(&self) {
        self.with(Engine::start);
    }

    pub fn stop(&self) {
        self.with(Engine::stop);
    }

    pub fn pause(&self) {
        self.with(Engine::pause);
    }

    pub fn resume(&self) {
        self.with(Engine::resume);
    }

    pub fn destroy(&self) {
        self.with(Engine::destroy);
    }

    /// Frames per second over the last second or so
    #[wasm_bindgen(getter)]
    pub fn fps(&self) -> u32 {
        self.engine.try_borrow().map(|e| e.fps()).unwrap_or(0)
    }
}

impl WebGame {
    fn with(&self, f: impl FnOnce(&mut Engine)) {
        match self.engine.try_borrow_mut() {
            Ok(mut engine) => f(&mut engine),
            Err(_) => log::warn!("Engine busy; call ignored"),
        }
    }
}

impl Drop for WebGame {
    fn drop(&mut self) {
        self.with(Engine::destroy);
    }
}
