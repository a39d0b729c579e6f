use glam::Vec2;

use super::controller::CameraController;
use crate::input::{InputEvent, MouseButton};

/// Turns platform-agnostic pointer events into orbit-control calls.
#[derive(Debug, Default)]
pub struct InputHandler {
    last_mouse_pos: Option<Vec2>,
    shift_pressed: bool,
}

impl InputHandler {
    /// Handler with no pointer history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one event. `element_height` is the height in pixels of the
    /// surface receiving pointer input. Returns true if the event was
    /// consumed by the camera.
    pub fn handle_event(
        &mut self,
        controller: &mut CameraController,
        event: InputEvent,
        element_height: f32,
    ) -> bool {
        let controls = &mut controller.controls;
        match event {
            InputEvent::MouseButton {
                button: MouseButton::Left,
                pressed: true,
            } => {
                controls.begin_drag(self.shift_pressed);
                true
            }
            InputEvent::MouseButton {
                button: MouseButton::Right,
                pressed: true,
            } => {
                controls.begin_drag(true);
                true
            }
            InputEvent::MouseButton { pressed: false, .. } => {
                controls.end_drag();
                true
            }
            InputEvent::MouseButton { .. } => false,
            InputEvent::ModifiersChanged { shift } => {
                self.shift_pressed = shift;
                false
            }
            InputEvent::CursorMoved { x, y } => {
                let current = Vec2::new(x, y);
                let delta = self
                    .last_mouse_pos
                    .map_or(Vec2::ZERO, |last| current - last);
                self.last_mouse_pos = Some(current);
                controls.drag(delta, element_height, &controller.camera);
                true
            }
            InputEvent::Scroll { delta } => {
                controls.zoom(delta);
                true
            }
        }
    }
}
