//! Input handling: platform-agnostic pointer event types shared by the
//! native and web hosts.

pub mod event;

pub use event::{InputEvent, MouseButton};
