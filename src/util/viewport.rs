//! Container sizing for the drawing surface.

/// Surface size for a container of `width` x `height` pixels.
///
/// A container that has not been laid out yet reports a zero height; the
/// surface then falls back to a square of `width`. Both sides are at least
/// one pixel so the result is always a valid surface size.
#[must_use]
pub fn container_size(width: u32, height: u32) -> (u32, u32) {
    let height = if height == 0 { width } else { height };
    (width.max(1), height.max(1))
}

/// Usable device pixel ratio. Browsers report 0 or NaN in some headless
/// setups; those count as 1.
#[must_use]
pub fn pixel_ratio(ratio: f64) -> f64 {
    if ratio.is_finite() && ratio > 0.0 {
        ratio
    } else {
        1.0
    }
}

/// Drawing-buffer size and camera aspect for a container measured in CSS
/// pixels on a display with the given device pixel ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaledViewport {
    /// Buffer width in physical pixels.
    pub width: u32,
    /// Buffer height in physical pixels.
    pub height: u32,
    /// Camera aspect, taken from the CSS size so rounding of the buffer
    /// never skews it.
    pub aspect: f32,
}

impl ScaledViewport {
    /// Scale a CSS container size (already passed through
    /// [`container_size`]) by `ratio`.
    #[must_use]
    pub fn new(css_width: u32, css_height: u32, ratio: f64) -> Self {
        let (css_width, css_height) = container_size(css_width, css_height);
        let ratio = pixel_ratio(ratio);
        let scale = |v: u32| ((f64::from(v) * ratio).round() as u32).max(1);
        Self {
            width: scale(css_width),
            height: scale(css_height),
            aspect: css_width as f32 / css_height as f32,
        }
    }
}

/// Inline CSS the canvas carries for a container of `css_width` x
/// `css_height`: its layout size, and `touch-action: none` so touch drags
/// reach the orbit controls instead of scrolling the page.
#[must_use]
pub fn canvas_style(
    css_width: u32,
    css_height: u32,
) -> [(&'static str, String); 3] {
    let (width, height) = container_size(css_width, css_height);
    [
        ("width", format!("{width}px")),
        ("height", format!("{height}px")),
        ("touch-action", "none".to_owned()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passes_through_laid_out_sizes() {
        assert_eq!(container_size(800, 600), (800, 600));
    }

    #[test]
    fn zero_height_falls_back_to_width() {
        assert_eq!(container_size(500, 0), (500, 500));
    }

    #[test]
    fn never_zero() {
        assert_eq!(container_size(0, 0), (1, 1));
    }

    #[test]
    fn aspect_of_container_is_exact() {
        let (w, h) = container_size(1920, 1080);
        assert_eq!(w as f32 / h as f32, 1920.0 / 1080.0);
    }

    #[test]
    fn hidpi_buffer_is_scaled_by_pixel_ratio() {
        let vp = ScaledViewport::new(400, 300, 2.0);
        assert_eq!((vp.width, vp.height), (800, 600));
        assert_eq!(vp.aspect, 400.0 / 300.0);
    }

    #[test]
    fn fractional_ratio_keeps_css_aspect() {
        let vp = ScaledViewport::new(333, 251, 1.25);
        assert_eq!((vp.width, vp.height), (416, 314));
        assert_eq!(vp.aspect, 333.0 / 251.0);
    }

    #[test]
    fn bogus_ratio_counts_as_one() {
        assert_eq!(pixel_ratio(0.0), 1.0);
        assert_eq!(pixel_ratio(f64::NAN), 1.0);
        assert_eq!(pixel_ratio(-2.0), 1.0);
        let vp = ScaledViewport::new(640, 0, f64::NAN);
        assert_eq!((vp.width, vp.height), (640, 640));
    }

    #[test]
    fn canvas_style_sizes_in_css_pixels_and_claims_touch() {
        let style = canvas_style(480, 0);
        assert_eq!(style[0], ("width", "480px".to_owned()));
        assert_eq!(style[1], ("height", "480px".to_owned()));
        assert!(style.contains(&("touch-action", "none".to_owned())));
    }
}
