//! Lumen Core - renderer-agnostic plumbing.
//!
//! This crate provides:
//!
//! - **Texture images**: decoding via the `image` crate, a path-keyed cache,
//!   and a magenta placeholder for files that fail to load
//! - **Configuration**: the flat camera description and render scheduler
//!   settings, loadable from JSON
//!
//! # Example
//!
//! ```ignore
//! use lumen_core::SceneConfig;
//!
//! let config = SceneConfig::from_json_file("cornell.json")?;
//! println!("{} spp", config.camera.samples_per_pixel);
//! ```

pub mod config;
pub mod texture;

pub use config::{
    CameraConfig, ConfigError, ConfigResult, RenderSettings, SceneConfig, DEFAULT_BUCKET_SIZE,
};
pub use texture::{TextureCache, TextureError, TextureImage, TextureResult, MISSING_PIXEL};
