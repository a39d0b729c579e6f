//! Asynchronous loading of the night-lights image.
//!
//! Loading never blocks a frame. Native builds decode on a background
//! thread, web builds fetch and decode in a local future; either way the
//! result arrives over a channel that the engine polls once per frame.

use std::sync::mpsc;

use super::texture::{build_mip_chain, MipLevel};
use crate::error::GlobeError;

/// A decoded RGBA8 image ready for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Tightly packed RGBA8 rows, top row first.
    pub rgba: Vec<u8>,
    /// Reduced levels below `rgba`, largest first.
    pub mips: Vec<MipLevel>,
}

/// Decode an encoded PNG or JPEG image and build its mip chain, so the
/// expensive work happens on the loader rather than the frame loop.
///
/// # Errors
///
/// Returns [`GlobeError::Texture`] if the bytes are not a supported image.
pub fn decode(bytes: &[u8]) -> Result<DecodedImage, GlobeError> {
    let rgba = image::load_from_memory(bytes)?.to_rgba8();
    let (width, height) = rgba.dimensions();
    let rgba = rgba.into_raw();
    let mips = build_mip_chain(&rgba, width, height);
    Ok(DecodedImage {
        width,
        height,
        rgba,
        mips,
    })
}

/// An in-flight image load.
pub struct TextureLoader {
    source: String,
    rx: Option<mpsc::Receiver<Result<DecodedImage, GlobeError>>>,
}

impl TextureLoader {
    /// Start loading `source` (a file path natively, a URL on the web).
    #[must_use]
    pub fn start(source: &str) -> Self {
        let (tx, rx) = mpsc::channel();
        log::debug!("Loading texture '{source}'");
        spawn_load(source, &tx);
        Self {
            source: source.to_owned(),
            rx: Some(rx),
        }
    }

    /// Whether a result is still expected.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.rx.is_some()
    }

    /// Take the result if it has arrived. Yields at most one result.
    pub fn poll(&mut self) -> Option<Result<DecodedImage, GlobeError>> {
        let rx = self.rx.as_ref()?;
        let result = match rx.try_recv() {
            Ok(result) => result,
            Err(mpsc::TryRecvError::Empty) => return None,
            Err(mpsc::TryRecvError::Disconnected) => {
                Err(GlobeError::Texture(format!(
                    "loader for '{}' stopped without a result",
                    self.source
                )))
            }
        };
        self.rx = None;
        Some(result)
    }
}

type Sender = mpsc::Sender<Result<DecodedImage, GlobeError>>;

#[cfg(not(all(target_arch = "wasm32", feature = "web")))]
fn spawn_load(source: &str, tx: &Sender) {
    let spawned = std::thread::Builder::new()
        .name("texture-loader".into())
        .spawn({
            let tx = tx.clone();
            let source = source.to_owned();
            move || {
                let result = std::fs::read(&source)
                    .map_err(|e| {
                        GlobeError::Texture(format!("{source}: {e}"))
                    })
                    .and_then(|bytes| decode(&bytes));
                let _ = tx.send(result);
            }
        });
    if let Err(e) = spawned {
        let _ = tx.send(Err(GlobeError::ThreadSpawn(e)));
    }
}

#[cfg(all(target_arch = "wasm32", feature = "web"))]
fn spawn_load(source: &str, tx: &Sender) {
    let (source, tx) = (source.to_owned(), tx.clone());
    wasm_bindgen_futures::spawn_local(async move {
        let result = fetch_bytes(&source)
            .await
            .and_then(|bytes| decode(&bytes));
        let _ = tx.send(result);
    });
}

#[cfg(all(target_arch = "wasm32", feature = "web"))]
async fn fetch_bytes(url: &str) -> Result<Vec<u8>, GlobeError> {
    use wasm_bindgen::JsCast;
    use wasm_bindgen_futures::JsFuture;

    let js_err = |what: &str, e: wasm_bindgen::JsValue| {
        GlobeError::Texture(format!("{url}: {what} failed: {e:?}"))
    };

    let window = web_sys::window()
        .ok_or_else(|| GlobeError::Host("no window".into()))?;
    let response = JsFuture::from(window.fetch_with_str(url))
        .await
        .map_err(|e| js_err("fetch", e))?;
    let response: web_sys::Response = response
        .dyn_into()
        .map_err(|e| js_err("response cast", e))?;
    if !response.ok() {
        return Err(GlobeError::Texture(format!(
            "{url}: HTTP {}",
            response.status()
        )));
    }
    let promise =
        response.array_buffer().map_err(|e| js_err("array_buffer", e))?;
    let buffer = JsFuture::from(promise)
        .await
        .map_err(|e| js_err("read body", e))?;
    Ok(js_sys::Uint8Array::new(&buffer).to_vec())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::time::{Duration, Instant};

    use super::*;

    fn encoded_png(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(
            width,
            height,
            image::Rgba([10, 20, 30, 255]),
        );
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    }

    fn wait(loader: &mut TextureLoader) -> Result<DecodedImage, GlobeError> {
        let deadline = Instant::now() + Duration::from_secs(10);
        loop {
            if let Some(result) = loader.poll() {
                return result;
            }
            assert!(Instant::now() < deadline, "loader never finished");
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn decodes_png() {
        let img = decode(&encoded_png(3, 2)).unwrap();
        assert_eq!((img.width, img.height), (3, 2));
        assert_eq!(img.rgba.len(), 3 * 2 * 4);
        assert_eq!(&img.rgba[..4], &[10, 20, 30, 255]);
        let sizes: Vec<(u32, u32)> =
            img.mips.iter().map(|m| (m.width, m.height)).collect();
        assert_eq!(sizes, [(1, 1)]);
    }

    #[test]
    fn garbage_is_a_texture_error() {
        let err = decode(b"not an image").unwrap_err();
        assert!(matches!(err, GlobeError::Texture(_)));
    }

    #[test]
    fn loads_from_disk_in_background() {
        let dir = std::env::temp_dir().join("earthglow-loader-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("night.png");
        std::fs::write(&path, encoded_png(4, 4)).unwrap();

        let mut loader = TextureLoader::start(path.to_str().unwrap());
        let img = wait(&mut loader).unwrap();
        assert_eq!(img.width, 4);
        assert!(!loader.is_pending());
        assert!(loader.poll().is_none());
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn missing_file_reports_error_once() {
        let mut loader = TextureLoader::start("/nonexistent/earth_night.jpg");
        assert!(matches!(wait(&mut loader), Err(GlobeError::Texture(_))));
        assert!(loader.poll().is_none());
    }
}
