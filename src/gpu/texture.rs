//! Texture resources: sampled color images and render attachments.

use crate::error::GlobeError;

/// Depth format used by every pass that tests depth.
pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Check that `data` is exactly one RGBA8 image of `width` x `height`.
///
/// # Errors
///
/// Returns [`GlobeError::Texture`] for zero dimensions or a length mismatch.
pub fn validate_rgba(
    data: &[u8],
    width: u32,
    height: u32,
) -> Result<(), GlobeError> {
    if width == 0 || height == 0 {
        return Err(GlobeError::Texture(format!(
            "invalid texture dimensions {width}x{height}"
        )));
    }
    let expected = width as usize * height as usize * 4;
    if data.len() != expected {
        return Err(GlobeError::Texture(format!(
            "expected {expected} bytes of RGBA8 for {width}x{height}, got {}",
            data.len()
        )));
    }
    Ok(())
}

/// Number of mip levels in a full chain down to 1x1.
#[must_use]
pub fn mip_level_count(width: u32, height: u32) -> u32 {
    32 - width.max(height).max(1).leading_zeros()
}

/// One reduced level of a mip chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MipLevel {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Tightly packed RGBA8 rows.
    pub rgba: Vec<u8>,
}

/// Every level below the base image, each half the size of the one above
/// (at least one pixel), filtered from its parent. Empty for a 1x1 image or
/// for data that is not `width` x `height` RGBA8.
#[must_use]
pub fn build_mip_chain(data: &[u8], width: u32, height: u32) -> Vec<MipLevel> {
    type Borrowed<'a> = image::ImageBuffer<image::Rgba<u8>, &'a [u8]>;
    let Some(base) = Borrowed::from_raw(width, height, data) else {
        return Vec::new();
    };
    let filter = image::imageops::FilterType::Triangle;
    let (mut w, mut h) = (width, height);
    let mut levels: Vec<image::RgbaImage> = Vec::new();
    for _ in 1..mip_level_count(width, height) {
        w = (w / 2).max(1);
        h = (h / 2).max(1);
        let next = levels.last().map_or_else(
            || image::imageops::resize(&base, w, h, filter),
            |parent| image::imageops::resize(parent, w, h, filter),
        );
        levels.push(next);
    }
    levels
        .into_iter()
        .map(|img| {
            let (width, height) = img.dimensions();
            MipLevel {
                width,
                height,
                rgba: img.into_raw(),
            }
        })
        .collect()
}

fn write_level(
    queue: &wgpu::Queue,
    texture: &wgpu::Texture,
    mip_level: u32,
    data: &[u8],
    (width, height): (u32, u32),
) {
    queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture,
            mip_level,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        data,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(width * 4),
            rows_per_image: None,
        },
        wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
    );
}

/// A sampled 2D color texture with its view and sampler.
pub struct SampledTexture {
    /// The underlying GPU texture.
    pub texture: wgpu::Texture,
    /// A default full-texture view.
    pub view: wgpu::TextureView,
    /// Linear, repeat-in-U sampler.
    pub sampler: wgpu::Sampler,
    /// Pixel size.
    pub size: (u32, u32),
}

impl SampledTexture {
    /// Upload an sRGB RGBA8 image plus the reduced levels below it (from
    /// [`build_mip_chain`]; empty for a single-level texture).
    ///
    /// # Errors
    ///
    /// Returns [`GlobeError::Texture`] if `data` or a mip level does not
    /// match its size.
    pub fn from_rgba(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        label: &str,
        data: &[u8],
        width: u32,
        height: u32,
        mips: &[MipLevel],
    ) -> Result<Self, GlobeError> {
        validate_rgba(data, width, height)?;
        for mip in mips {
            validate_rgba(&mip.rgba, mip.width, mip.height)?;
        }
        let mip_level_count = 1 + mips.len() as u32;

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING
                | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        write_level(queue, &texture, 0, data, (width, height));
        for (level, mip) in (1..).zip(mips) {
            let size = (mip.width, mip.height);
            write_level(queue, &texture, level, &mip.rgba, size);
        }

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        // Longitude wraps, latitude does not.
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(label),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        log::debug!(
            "Uploaded texture '{label}' ({width}x{height}, {mip_level_count} mips)"
        );

        Ok(Self {
            texture,
            view,
            sampler,
            size: (width, height),
        })
    }

    /// A 1x1 opaque white texture, sampled until the real image arrives.
    ///
    /// # Errors
    ///
    /// Never fails in practice; shares the fallible upload path.
    pub fn placeholder(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
    ) -> Result<Self, GlobeError> {
        Self::from_rgba(
            device,
            queue,
            "Placeholder Texture",
            &[255, 255, 255, 255],
            1,
            1,
            &[],
        )
    }
}

/// A render-attachment texture and its default view.
///
/// Covers the multisampled color buffer and the depth buffer; both are
/// recreated whenever the surface is resized.
pub struct RenderTarget {
    /// The underlying GPU texture.
    pub texture: wgpu::Texture,
    /// A default full-texture view.
    pub view: wgpu::TextureView,
}

impl RenderTarget {
    /// Create a new render target with the given size, format and sample
    /// count.
    #[must_use]
    pub fn new(
        device: &wgpu::Device,
        label: &str,
        (width, height): (u32, u32),
        format: wgpu::TextureFormat,
        sample_count: u32,
    ) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self { texture, view }
    }

    /// Depth buffer matching the color target.
    #[must_use]
    pub fn depth(
        device: &wgpu::Device,
        size: (u32, u32),
        sample_count: u32,
    ) -> Self {
        Self::new(device, "Depth Target", size, DEPTH_FORMAT, sample_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_exact_rgba() {
        assert!(validate_rgba(&[0; 16], 2, 2).is_ok());
    }

    #[test]
    fn rejects_short_buffer() {
        let err = validate_rgba(&[0; 12], 2, 2).unwrap_err();
        assert!(matches!(err, GlobeError::Texture(_)));
    }

    #[test]
    fn rejects_empty_image() {
        assert!(validate_rgba(&[], 0, 4).is_err());
    }

    #[test]
    fn mip_count_reaches_one_pixel() {
        assert_eq!(mip_level_count(1, 1), 1);
        assert_eq!(mip_level_count(2048, 1024), 12);
        assert_eq!(mip_level_count(5, 3), 3);
    }

    #[test]
    fn mip_chain_halves_down_to_one_pixel() {
        let data = vec![200u8; 8 * 4 * 4];
        let chain = build_mip_chain(&data, 8, 4);
        let sizes: Vec<(u32, u32)> =
            chain.iter().map(|m| (m.width, m.height)).collect();
        assert_eq!(sizes, [(4, 2), (2, 1), (1, 1)]);
        for mip in &chain {
            assert!(validate_rgba(&mip.rgba, mip.width, mip.height).is_ok());
        }
    }

    #[test]
    fn mip_chain_averages_city_lights() {
        // One lit pixel in a dark 2x2 tile blends into a dim 1x1 level.
        let mut data = vec![0u8; 2 * 2 * 4];
        data[..4].copy_from_slice(&[255, 255, 255, 255]);
        data[7] = 255;
        data[11] = 255;
        data[15] = 255;
        let chain = build_mip_chain(&data, 2, 2);
        assert_eq!(chain.len(), 1);
        let red = chain[0].rgba[0];
        assert!(red > 0 && red < 255, "got {red}");
    }

    #[test]
    fn single_pixel_and_bad_data_have_no_chain() {
        assert!(build_mip_chain(&[1, 2, 3, 4], 1, 1).is_empty());
        assert!(build_mip_chain(&[0; 3], 2, 2).is_empty());
    }
}
