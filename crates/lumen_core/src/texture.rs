//! Texture image loading and caching.
//!
//! Decoding is delegated to the `image` crate. The renderer only ever sees a
//! pre-decoded RGB byte buffer addressed by clamped integer coordinates.

use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;

/// Environment variable naming an extra directory to search for images.
pub const IMAGE_DIR_ENV: &str = "LUMEN_IMAGES";

/// Pixel returned when no image data could be loaded.
pub const MISSING_PIXEL: [u8; 3] = [255, 0, 255];

const BYTES_PER_PIXEL: usize = 3;

/// Errors that can occur during texture loading.
#[derive(Error, Debug)]
pub enum TextureError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image decoding error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("Could not find image '{name}' (tried {tried:?})")]
    NotFound { name: String, tried: Vec<PathBuf> },
}

pub type TextureResult<T> = Result<T, TextureError>;

/// A decoded 8-bit RGB image in row-major order.
///
/// Bytes hold linear values: sRGB input is linearized on load so that
/// the renderer's output gamma round-trips to the source image.
#[derive(Clone, Debug, Default)]
pub struct TextureImage {
    width: u32,
    height: u32,
    bytes: Vec<u8>,
}

impl TextureImage {
    /// Build an image from raw RGB bytes.
    ///
    /// Returns `None` when the buffer length disagrees with the dimensions.
    pub fn from_rgb_bytes(width: u32, height: u32, bytes: Vec<u8>) -> Option<Self> {
        if bytes.len() != width as usize * height as usize * BYTES_PER_PIXEL {
            return None;
        }
        Some(Self {
            width,
            height,
            bytes,
        })
    }

    /// An image with no pixels; every lookup yields [`MISSING_PIXEL`].
    pub fn missing() -> Self {
        Self::default()
    }

    /// Decode an image file.
    pub fn load(path: impl AsRef<Path>) -> TextureResult<Self> {
        let rgb = image::open(path.as_ref())?.to_rgb8();
        let (width, height) = rgb.dimensions();
        let bytes = rgb
            .into_raw()
            .into_iter()
            .map(|b| float_to_byte(srgb_to_linear(b)))
            .collect();

        Ok(Self {
            width,
            height,
            bytes,
        })
    }

    /// Look for `name` in `$LUMEN_IMAGES`, the working directory, `images/`
    /// and `../images/`, returning the first image that decodes.
    pub fn find(name: &str) -> TextureResult<Self> {
        let mut tried = Vec::new();
        for candidate in search_paths(name) {
            match Self::load(&candidate) {
                Ok(image) => {
                    log::debug!(
                        "Loaded image {} ({}x{})",
                        candidate.display(),
                        image.width,
                        image.height
                    );
                    return Ok(image);
                }
                Err(err) => {
                    log::trace!("{}: {}", candidate.display(), err);
                    tried.push(candidate);
                }
            }
        }
        Err(TextureError::NotFound {
            name: name.to_string(),
            tried,
        })
    }

    /// Like [`TextureImage::find`], but a failure is logged and replaced by
    /// an empty image so rendering can continue.
    pub fn find_or_missing(name: &str) -> Self {
        Self::find(name).unwrap_or_else(|err| {
            log::error!("could not load image file '{}': {}", name, err);
            Self::missing()
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_missing(&self) -> bool {
        self.bytes.is_empty()
    }

    /// RGB bytes at `(x, y)`, clamped to the image bounds.
    pub fn pixel(&self, x: i64, y: i64) -> [u8; 3] {
        if self.is_missing() {
            return MISSING_PIXEL;
        }
        let x = clamp_index(x, self.width);
        let y = clamp_index(y, self.height);
        let idx = (y * self.width as usize + x) * BYTES_PER_PIXEL;
        [self.bytes[idx], self.bytes[idx + 1], self.bytes[idx + 2]]
    }

    /// Get total size in bytes.
    pub fn size_bytes(&self) -> usize {
        self.bytes.len()
    }
}

/// Cache for loaded images, keyed by the name they were requested under.
///
/// Several materials can reference the same file; it is decoded once.
pub struct TextureCache {
    images: HashMap<String, Arc<TextureImage>>,
    base_dir: Option<PathBuf>,
}

impl TextureCache {
    pub fn new() -> Self {
        Self {
            images: HashMap::new(),
            base_dir: None,
        }
    }

    /// Create a cache that resolves relative paths against `base_dir`.
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            images: HashMap::new(),
            base_dir: Some(base_dir.into()),
        }
    }

    /// Load an image, using the cache if available.
    pub fn load(&mut self, path: &str) -> TextureResult<Arc<TextureImage>> {
        if let Some(image) = self.images.get(path) {
            log::debug!("Texture cache hit: {}", path);
            return Ok(image.clone());
        }

        let image = match &self.base_dir {
            Some(_) => TextureImage::load(self.resolve_path(path))?,
            None => TextureImage::find(path)?,
        };
        let image = Arc::new(image);
        self.images.insert(path.to_string(), image.clone());

        log::debug!(
            "Cached texture: {} ({}x{}, {:.1} KB)",
            path,
            image.width,
            image.height,
            image.size_bytes() as f32 / 1024.0
        );

        Ok(image)
    }

    /// Load an image, substituting the magenta placeholder on failure.
    ///
    /// The placeholder is cached too, so the error is reported once per path.
    pub fn load_or_missing(&mut self, path: &str) -> Arc<TextureImage> {
        self.load(path).unwrap_or_else(|err| {
            log::error!("could not load image file '{}': {}", path, err);
            let missing = Arc::new(TextureImage::missing());
            self.images.insert(path.to_string(), missing.clone());
            missing
        })
    }

    pub fn is_cached(&self, path: &str) -> bool {
        self.images.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    fn resolve_path(&self, path: &str) -> PathBuf {
        let path = Path::new(path);

        match &self.base_dir {
            Some(base) if !path.is_absolute() => base.join(path),
            _ => path.to_path_buf(),
        }
    }
}

impl Default for TextureCache {
    fn default() -> Self {
        Self::new()
    }
}

fn search_paths(name: &str) -> Vec<PathBuf> {
    let mut paths = Vec::with_capacity(4);
    if let Some(dir) = env::var_os(IMAGE_DIR_ENV) {
        paths.push(PathBuf::from(dir).join(name));
    }
    paths.push(PathBuf::from(name));
    paths.push(Path::new("images").join(name));
    paths.push(Path::new("../images").join(name));
    paths
}

/// Clamp to `[0, len)`.
fn clamp_index(i: i64, len: u32) -> usize {
    i.clamp(0, len as i64 - 1) as usize
}

/// Convert sRGB byte value to linear float.
fn srgb_to_linear(value: u8) -> f32 {
    let v = value as f32 / 255.0;
    if v <= 0.04045 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}

fn float_to_byte(value: f32) -> u8 {
    if value <= 0.0 {
        0
    } else if value >= 1.0 {
        255
    } else {
        (256.0 * value) as u8
    }
}
