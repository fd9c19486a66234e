//! Image buffer and PPM output.
//!
//! Pixels stay linear until written; gamma and quantization happen here.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::bucket::BucketResult;
use crate::error::RenderResult;
use lumen_math::{Color, Interval};

/// Linear-space image, row-major.
#[derive(Debug, Clone)]
pub struct ImageBuffer {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[self.index(x, y)]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        let index = self.index(x, y);
        self.pixels[index] = color;
    }

    /// Copy a rendered bucket into place.
    pub fn write_bucket(&mut self, result: &BucketResult) {
        let bucket = &result.bucket;
        for (row, line) in result.pixels.chunks(bucket.width as usize).enumerate() {
            let start = self.index(bucket.x, bucket.y + row as u32);
            self.pixels[start..start + line.len()].copy_from_slice(line);
        }
    }

    /// Write as a plain-text PPM file.
    pub fn save_ppm(&self, path: impl AsRef<Path>) -> RenderResult<()> {
        let path = path.as_ref();
        let mut writer = BufWriter::new(File::create(path)?);
        write_ppm(&mut writer, self)?;
        writer.flush()?;
        log::info!("Wrote {}", path.display());
        Ok(())
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }
}

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Quantize a linear color to 8-bit sRGB-ish bytes.
///
/// NaN channels become 0.
pub fn color_to_rgb8(color: Color) -> [u8; 3] {
    const INTENSITY: Interval = Interval::new(0.0, 0.999);

    color.to_array().map(|channel| {
        let channel = if channel.is_nan() { 0.0 } else { channel };
        (256.0 * INTENSITY.clamp(linear_to_gamma(channel))) as u8
    })
}

/// Plain-text PPM (`P3`): header, then one `R G B` line per pixel.
pub fn write_ppm<W: Write>(writer: &mut W, image: &ImageBuffer) -> std::io::Result<()> {
    writeln!(writer, "P3\n{} {}\n255", image.width, image.height)?;
    for &color in &image.pixels {
        let [r, g, b] = color_to_rgb8(color);
        writeln!(writer, "{} {} {}", r, g, b)?;
    }
    Ok(())
}
