//! Crate-level error types.

use std::fmt;

use crate::gpu::render_context::RenderContextError;

/// Errors produced by the earthglow crate.
#[derive(Debug)]
pub enum GlobeError {
    /// GPU context initialization failure.
    Gpu(RenderContextError),
    /// WGSL composition failure (bad `#import` or syntax).
    Shader(String),
    /// Failed to load or decode the Earth texture.
    Texture(String),
    /// Generic I/O failure.
    Io(std::io::Error),
    /// Failed to spawn a background thread.
    ThreadSpawn(std::io::Error),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
    /// Viewer event-loop failure.
    Viewer(String),
    /// The hosting page lacks something required (canvas, window).
    Host(String),
}

impl fmt::Display for GlobeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gpu(e) => write!(f, "GPU error: {e}"),
            Self::Shader(msg) => write!(f, "shader error: {msg}"),
            Self::Texture(msg) => write!(f, "texture error: {msg}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::ThreadSpawn(e) => {
                write!(f, "failed to spawn thread: {e}")
            }
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
            Self::Viewer(msg) => write!(f, "viewer error: {msg}"),
            Self::Host(msg) => write!(f, "host error: {msg}"),
        }
    }
}

impl std::error::Error for GlobeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Gpu(e) => Some(e),
            Self::Io(e) | Self::ThreadSpawn(e) => Some(e),
            _ => None,
        }
    }
}

impl From<RenderContextError> for GlobeError {
    fn from(e: RenderContextError) -> Self {
        Self::Gpu(e)
    }
}

impl From<std::io::Error> for GlobeError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<image::ImageError> for GlobeError {
    fn from(e: image::ImageError) -> Self {
        Self::Texture(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_variant() {
        let err = GlobeError::Host("canvas missing".into());
        assert_eq!(err.to_string(), "host error: canvas missing");

        let err = GlobeError::Texture("bad header".into());
        assert_eq!(err.to_string(), "texture error: bad header");
    }

    #[test]
    fn io_error_is_the_source() {
        use std::error::Error as _;
        let err = GlobeError::from(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "earth_night.jpg",
        ));
        assert!(matches!(err, GlobeError::Io(_)));
        assert!(err.source().is_some());
    }
}
