//! Input methods for GlobeEngine

use super::GlobeEngine;
use crate::input::InputEvent;

impl GlobeEngine {
    /// Process a platform-agnostic input event.
    ///
    /// Consumers forward raw window or DOM events as [`InputEvent`]
    /// variants; the engine turns them into orbit-control rotation (and
    /// zoom/pan when enabled in the options).
    ///
    /// Returns `true` if the camera consumed the event.
    ///
    /// # Example
    ///
    /// ```ignore
    /// engine.handle_input(InputEvent::CursorMoved { x, y });
    /// engine.handle_input(InputEvent::Scroll { delta: 1.0 });
    /// ```
    pub fn handle_input(&mut self, event: InputEvent) -> bool {
        let element_height = self.context.config.height as f32;
        self.input
            .handle_event(&mut self.camera_controller, event, element_height)
    }
}
