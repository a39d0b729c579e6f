//! Browser host: mounts the globe on a canvas and drives it from
//! `requestAnimationFrame`.
//!
//! The module's start function mounts on `#globeCanvas` when the page has
//! one and silently does nothing otherwise. Pages that want another canvas
//! or custom options call [`mount_with_options`] from JavaScript.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::convert::FromWasmAbi;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

use crate::error::GlobeError;
use crate::options::Options;
use crate::util::viewport::{
    canvas_style, container_size, pixel_ratio, ScaledViewport,
};
use crate::{GlobeEngine, InputEvent, MouseButton};

/// Canvas the start function looks for.
pub const CANVAS_ID: &str = "globeCanvas";

/// The engine plus the mount it belongs to. Listeners registered by an
/// earlier mount ignore a later engine.
struct Mounted {
    engine: GlobeEngine,
    generation: u32,
}

thread_local! {
    static MOUNTED: RefCell<Option<Mounted>> = const { RefCell::new(None) };
    static GENERATION: Cell<u32> = const { Cell::new(0) };
    static LOOP_RUNNING: Cell<bool> = const { Cell::new(false) };
}

fn host_err(what: &'static str) -> impl Fn(JsValue) -> GlobeError {
    move |e| GlobeError::Host(format!("{what}: {e:?}"))
}

/// Module entry point.
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    spawn_local(async {
        if let Err(e) = mount(CANVAS_ID, Options::default()).await {
            log::debug!("globe not mounted: {e}");
        }
    });
}

/// Mount the globe on the canvas with id `canvas_id`, configured by a TOML
/// options document (empty for defaults). Replaces any globe mounted
/// earlier.
///
/// # Errors
///
/// Returns a JS error string if the options do not parse. Mount failures
/// (missing canvas, no GPU) are logged at debug level and leave the page
/// untouched.
#[wasm_bindgen]
pub fn mount_with_options(canvas_id: String, toml: &str) -> Result<(), JsValue> {
    let options = Options::from_toml_str(toml)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    spawn_local(async move {
        if let Err(e) = mount(&canvas_id, options).await {
            log::debug!("globe not mounted on #{canvas_id}: {e}");
        }
    });
    Ok(())
}

/// Size of the canvas' container in CSS pixels.
fn canvas_container_size(canvas: &web_sys::HtmlCanvasElement) -> (u32, u32) {
    let (w, h) = canvas.parent_element().map_or_else(
        || (canvas.client_width(), canvas.client_height()),
        |parent| (parent.client_width(), parent.client_height()),
    );
    container_size(w.max(0) as u32, h.max(0) as u32)
}

fn device_pixel_ratio() -> f64 {
    pixel_ratio(web_sys::window().map_or(1.0, |w| w.device_pixel_ratio()))
}

/// Fit the canvas to its container: CSS size equal to the container, touch
/// gestures claimed for the orbit controls, and a drawing buffer scaled by
/// the device pixel ratio.
fn fit_canvas(
    canvas: &web_sys::HtmlCanvasElement,
) -> Result<ScaledViewport, GlobeError> {
    let (css_width, css_height) = canvas_container_size(canvas);
    let viewport =
        ScaledViewport::new(css_width, css_height, device_pixel_ratio());
    let style = canvas.style();
    for (property, value) in canvas_style(css_width, css_height) {
        style
            .set_property(property, &value)
            .map_err(host_err("canvas style"))?;
    }
    canvas.set_width(viewport.width);
    canvas.set_height(viewport.height);
    Ok(viewport)
}

/// Pointer position in drawing-buffer pixels, the unit the engine measures
/// drags against.
fn pointer_position(e: &web_sys::MouseEvent) -> InputEvent {
    let ratio = device_pixel_ratio();
    InputEvent::CursorMoved {
        x: (f64::from(e.offset_x()) * ratio) as f32,
        y: (f64::from(e.offset_y()) * ratio) as f32,
    }
}

async fn mount(canvas_id: &str, options: Options) -> Result<(), GlobeError> {
    let window =
        web_sys::window().ok_or_else(|| GlobeError::Host("no window".into()))?;
    let document = window
        .document()
        .ok_or_else(|| GlobeError::Host("no document".into()))?;
    let canvas = document
        .get_element_by_id(canvas_id)
        .ok_or_else(|| GlobeError::Host(format!("no #{canvas_id} element")))?
        .dyn_into::<web_sys::HtmlCanvasElement>()
        .map_err(|_| GlobeError::Host(format!("#{canvas_id} is not a canvas")))?;

    let viewport = fit_canvas(&canvas)?;
    let (width, height) = (viewport.width, viewport.height);

    let mut engine = GlobeEngine::new_with_options(
        wgpu::SurfaceTarget::Canvas(canvas.clone()),
        (width, height),
        options,
    )
    .await?;
    engine.resize_scaled(viewport);

    let generation = GENERATION.with(|g| {
        g.set(g.get().wrapping_add(1));
        g.get()
    });
    MOUNTED.with(|m| {
        *m.borrow_mut() = Some(Mounted { engine, generation });
    });

    install_listeners(&window, &canvas, generation)?;
    start_loop(&window)?;
    log::debug!("globe mounted on #{canvas_id} ({width}x{height})");
    Ok(())
}

/// Run `f` against the engine if `generation` is still the live mount.
fn with_engine(generation: u32, f: impl FnOnce(&mut GlobeEngine)) {
    MOUNTED.with(|m| {
        if let Some(mounted) = m.borrow_mut().as_mut() {
            if mounted.generation == generation {
                f(&mut mounted.engine);
            }
        }
    });
}

fn listen<E>(
    target: &web_sys::EventTarget,
    name: &str,
    generation: u32,
    mut handler: impl FnMut(E, &mut GlobeEngine) + 'static,
) -> Result<(), GlobeError>
where
    E: FromWasmAbi + 'static,
{
    let closure = Closure::<dyn FnMut(E)>::new(move |event: E| {
        with_engine(generation, |engine| handler(event, engine));
    });
    target
        .add_event_listener_with_callback(
            name,
            closure.as_ref().unchecked_ref(),
        )
        .map_err(host_err("add_event_listener"))?;
    closure.forget();
    Ok(())
}

fn install_listeners(
    window: &web_sys::Window,
    canvas: &web_sys::HtmlCanvasElement,
    generation: u32,
) -> Result<(), GlobeError> {
    let resize_canvas = canvas.clone();
    listen(
        window,
        "resize",
        generation,
        move |_: web_sys::Event, engine| {
            match fit_canvas(&resize_canvas) {
                Ok(viewport) => engine.resize_scaled(viewport),
                Err(e) => log::warn!("{e}"),
            }
        },
    )?;

    let capture_canvas = canvas.clone();
    listen(
        canvas,
        "pointerdown",
        generation,
        move |e: web_sys::PointerEvent, engine| {
            let _ = capture_canvas.set_pointer_capture(e.pointer_id());
            let _ = engine.handle_input(InputEvent::ModifiersChanged {
                shift: e.shift_key(),
            });
            let _ = engine.handle_input(pointer_position(&e));
            if let Some(button) = MouseButton::from_dom(e.button()) {
                let _ = engine
                    .handle_input(InputEvent::MouseButton { button, pressed: true });
            }
        },
    )?;

    listen(
        canvas,
        "pointermove",
        generation,
        |e: web_sys::PointerEvent, engine| {
            let _ = engine.handle_input(pointer_position(&e));
        },
    )?;

    for name in ["pointerup", "pointercancel"] {
        listen(
            canvas,
            name,
            generation,
            |e: web_sys::PointerEvent, engine| {
                let button =
                    MouseButton::from_dom(e.button()).unwrap_or(MouseButton::Left);
                let _ = engine
                    .handle_input(InputEvent::MouseButton { button, pressed: false });
            },
        )?;
    }

    listen(
        canvas,
        "wheel",
        generation,
        |e: web_sys::WheelEvent, engine| {
            if !engine.options().controls.enable_zoom {
                return;
            }
            e.prevent_default();
            // Wheel down moves away from the globe.
            let delta = -(e.delta_y().signum() as f32);
            let _ = engine.handle_input(InputEvent::Scroll { delta });
        },
    )?;

    listen(
        canvas,
        "contextmenu",
        generation,
        |e: web_sys::MouseEvent, _| e.prevent_default(),
    )
}

fn request_animation_frame(
    window: &web_sys::Window,
    callback: &Closure<dyn FnMut()>,
) -> Result<i32, GlobeError> {
    window
        .request_animation_frame(callback.as_ref().unchecked_ref())
        .map_err(host_err("requestAnimationFrame"))
}

/// One displayed frame for whichever engine is mounted.
fn frame() {
    MOUNTED.with(|m| {
        let mut mounted = m.borrow_mut();
        let Some(Mounted { engine, .. }) = mounted.as_mut() else {
            return;
        };
        match engine.frame() {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Outdated | wgpu::SurfaceError::Lost) => {
                let (w, h) = engine.size();
                engine.resize(w, h);
            }
            Err(e) => log::error!("render error: {e:?}"),
        }
    });
}

/// Start the self-rescheduling frame callback. Runs for the page's
/// lifetime; later mounts reuse it.
fn start_loop(window: &web_sys::Window) -> Result<(), GlobeError> {
    if LOOP_RUNNING.with(Cell::get) {
        return Ok(());
    }

    let callback: Rc<RefCell<Option<Closure<dyn FnMut()>>>> =
        Rc::new(RefCell::new(None));
    let next = Rc::clone(&callback);
    let loop_window = window.clone();
    *callback.borrow_mut() = Some(Closure::<dyn FnMut()>::new(move || {
        frame();
        if let Some(cb) = next.borrow().as_ref() {
            if let Err(e) = request_animation_frame(&loop_window, cb) {
                log::error!("{e}");
            }
        }
    }));

    if let Some(cb) = callback.borrow().as_ref() {
        let _ = request_animation_frame(window, cb)?;
    }
    LOOP_RUNNING.with(|r| r.set(true));
    Ok(())
}
