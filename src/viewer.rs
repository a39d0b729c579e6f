//! Standalone globe window backed by winit.
//!
//! ```no_run
//! # use earthglow::Viewer;
//! Viewer::builder()
//!     .with_title("Night Earth")
//!     .build()
//!     .run()
//!     .unwrap();
//! ```

use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalSize},
    event::{ElementState, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowAttributes, WindowId},
};

use crate::{
    error::GlobeError, options::Options, util::viewport::container_size,
    GlobeEngine, InputEvent, MouseButton,
};

/// Share of the monitor's shorter side the initial window covers.
const WINDOW_FRACTION: f64 = 0.6;

/// Fallback window edge in logical pixels when no monitor is reported.
const DEFAULT_EDGE: f64 = 720.0;

/// Pixel wheel deltas are scaled to roughly one line per 100 px.
const PIXELS_PER_LINE: f64 = 100.0;

/// Fluent builder for [`Viewer`].
pub struct ViewerBuilder {
    options: Option<Options>,
    title: String,
}

impl ViewerBuilder {
    fn new() -> Self {
        Self {
            options: None,
            title: "Earthglow".into(),
        }
    }

    /// Override the default options.
    #[must_use]
    pub fn with_options(mut self, options: Options) -> Self {
        self.options = Some(options);
        self
    }

    /// Set the window title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Consume the builder and produce a [`Viewer`].
    #[must_use]
    pub fn build(self) -> Viewer {
        Viewer {
            options: self.options.unwrap_or_default(),
            title: self.title,
        }
    }
}

/// A transparent window with the globe in it.
///
/// Construct via [`Viewer::builder`], then call [`run`](Self::run) to
/// enter the event loop.
pub struct Viewer {
    options: Options,
    title: String,
}

impl Viewer {
    /// Start a new builder.
    #[must_use]
    pub fn builder() -> ViewerBuilder {
        ViewerBuilder::new()
    }

    /// Open the window and run the event loop. Blocks until the window is
    /// closed.
    ///
    /// # Errors
    ///
    /// Returns [`GlobeError::Viewer`] if the event loop cannot be created
    /// or exits with an error.
    pub fn run(self) -> Result<(), GlobeError> {
        let event_loop =
            EventLoop::new().map_err(|e| GlobeError::Viewer(e.to_string()))?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut app = GlobeWindow {
            window: None,
            engine: None,
            pending_options: Some(self.options),
            title: self.title,
        };
        event_loop
            .run_app(&mut app)
            .map_err(|e| GlobeError::Viewer(e.to_string()))
    }
}

/// Square window sized from the primary monitor, transparent so the
/// cleared background shows the desktop.
fn window_attributes(
    event_loop: &ActiveEventLoop,
    title: &str,
) -> WindowAttributes {
    let edge = event_loop
        .primary_monitor()
        .or_else(|| event_loop.available_monitors().next())
        .map_or(DEFAULT_EDGE, |monitor| {
            let logical: LogicalSize<f64> =
                monitor.size().to_logical(monitor.scale_factor());
            logical.width.min(logical.height) * WINDOW_FRACTION
        });

    Window::default_attributes()
        .with_title(title)
        .with_transparent(true)
        .with_inner_size(LogicalSize::new(edge, edge))
}

fn surface_size(inner: PhysicalSize<u32>) -> (u32, u32) {
    container_size(inner.width, inner.height)
}

fn wheel_lines(delta: MouseScrollDelta) -> f32 {
    match delta {
        MouseScrollDelta::LineDelta(_, y) => y,
        MouseScrollDelta::PixelDelta(pos) => (pos.y / PIXELS_PER_LINE) as f32,
    }
}

/// winit handler owning the window and the engine drawn into it.
struct GlobeWindow {
    window: Option<Arc<Window>>,
    engine: Option<GlobeEngine>,
    /// Options waiting for the first `resumed`.
    pending_options: Option<Options>,
    title: String,
}

impl GlobeWindow {
    fn redraw(&mut self) {
        let Some(engine) = &mut self.engine else {
            return;
        };
        match engine.frame() {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Outdated | wgpu::SurfaceError::Lost) => {
                self.fit_to_window();
            }
            Err(e) => log::error!("render error: {e:?}"),
        }
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    /// Resize the surface and camera to the window's current inner size.
    fn fit_to_window(&mut self) {
        let (Some(window), Some(engine)) = (&self.window, &mut self.engine)
        else {
            return;
        };
        let (width, height) = surface_size(window.inner_size());
        engine.resize(width, height);
    }

    fn forward(&mut self, event: InputEvent) {
        if let Some(engine) = &mut self.engine {
            let _ = engine.handle_input(event);
        }
    }

    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<(), String> {
        let window = event_loop
            .create_window(window_attributes(event_loop, &self.title))
            .map_err(|e| format!("failed to create window: {e}"))?;
        let window = Arc::new(window);

        let options = self.pending_options.take().unwrap_or_default();
        let engine = pollster::block_on(GlobeEngine::new_with_options(
            Arc::clone(&window),
            surface_size(window.inner_size()),
            options,
        ))
        .map_err(|e| format!("failed to initialize engine: {e}"))?;

        log::info!("globe window {:?}", engine.size());
        window.request_redraw();
        self.window = Some(window);
        self.engine = Some(engine);
        Ok(())
    }
}

impl ApplicationHandler for GlobeWindow {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.start(event_loop) {
            log::error!("{e}");
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(_)
            | WindowEvent::ScaleFactorChanged { .. } => self.fit_to_window(),
            WindowEvent::RedrawRequested => self.redraw(),
            WindowEvent::MouseInput { button, state, .. } => {
                self.forward(InputEvent::MouseButton {
                    button: MouseButton::from(button),
                    pressed: state == ElementState::Pressed,
                });
            }
            // Same as the browser's pointercancel: a drag ends when the
            // pointer leaves the window.
            WindowEvent::CursorLeft { .. } => {
                self.forward(InputEvent::MouseButton {
                    button: MouseButton::Left,
                    pressed: false,
                });
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.forward(InputEvent::CursorMoved {
                    x: position.x as f32,
                    y: position.y as f32,
                });
            }
            WindowEvent::MouseWheel { delta, .. } => {
                self.forward(InputEvent::Scroll {
                    delta: wheel_lines(delta),
                });
            }
            WindowEvent::ModifiersChanged(modifiers) => {
                self.forward(InputEvent::ModifiersChanged {
                    shift: modifiers.state().shift_key(),
                });
            }
            _ => (),
        }
    }
}

#[cfg(test)]
mod tests {
    use winit::dpi::PhysicalPosition;

    use super::*;

    #[test]
    fn collapsed_window_keeps_a_square_surface() {
        assert_eq!(surface_size(PhysicalSize::new(800, 0)), (800, 800));
        assert_eq!(surface_size(PhysicalSize::new(640, 480)), (640, 480));
    }

    #[test]
    fn pixel_wheel_deltas_scale_to_lines() {
        let lines = wheel_lines(MouseScrollDelta::PixelDelta(
            PhysicalPosition::new(0.0, -250.0),
        ));
        assert!((lines + 2.5).abs() < 1e-6);
        assert_eq!(wheel_lines(MouseScrollDelta::LineDelta(0.0, 1.0)), 1.0);
    }
}
