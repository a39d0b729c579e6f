//! Hex color helpers.
//!
//! Options carry colors as sRGB hex integers (`0xffddaa`); shaders work in
//! linear space and render into an sRGB surface, so everything is decoded
//! once on the way to the GPU.

/// Split `0xRRGGBB` into sRGB channels in [0, 1].
#[must_use]
pub fn hex_to_srgb(hex: u32) -> [f32; 3] {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    ]
}

/// sRGB transfer function inverse for one channel.
#[must_use]
pub fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.040_45 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Decode `0xRRGGBB` into linear RGB.
#[must_use]
pub fn hex_to_linear(hex: u32) -> [f32; 3] {
    hex_to_srgb(hex).map(srgb_to_linear)
}

/// Decode `0xRRGGBB` into linear RGB scaled by `intensity`.
#[must_use]
pub fn hex_to_linear_scaled(hex: u32, intensity: f32) -> [f32; 3] {
    hex_to_linear(hex).map(|c| c * intensity)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn white_and_black_are_fixed_points() {
        assert_eq!(hex_to_linear(0xff_ff_ff), [1.0, 1.0, 1.0]);
        assert_eq!(hex_to_linear(0x00_00_00), [0.0, 0.0, 0.0]);
    }

    #[test]
    fn channels_unpack_in_order() {
        assert_eq!(hex_to_srgb(0xff_00_00), [1.0, 0.0, 0.0]);
        assert_eq!(hex_to_srgb(0x00_ff_00), [0.0, 1.0, 0.0]);
        assert_eq!(hex_to_srgb(0x00_00_ff), [0.0, 0.0, 1.0]);
    }

    #[test]
    fn mid_gray_is_darker_in_linear() {
        // 0x40 = 64/255 ~ 0.251 sRGB ~ 0.0513 linear
        let [r, g, b] = hex_to_linear(0x40_40_40);
        assert!((r - 0.0513).abs() < 1e-3);
        assert_eq!(r, g);
        assert_eq!(g, b);
    }

    #[test]
    fn intensity_scales_linearly() {
        let base = hex_to_linear(0x28_58_ff);
        let scaled = hex_to_linear_scaled(0x28_58_ff, 0.75);
        for (b, s) in base.iter().zip(scaled) {
            assert!((b * 0.75 - s).abs() < 1e-7);
        }
    }
}
