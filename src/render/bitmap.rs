//! # Monochrome Images
//!
//! [`Image`] holds a printed/not-printed grid derived from decoded pixels,
//! and packs it into either layout the printer accepts.
//!
//! ## Threshold
//!
//! No dithering. A pixel is left white when it is fully transparent, or when
//! red, green and blue are all above 200. Everything else prints.
//!
//! | Channels | Interpretation |
//! |----------|----------------|
//! | 1 | grey |
//! | 2 | grey + alpha |
//! | 3 | RGB, opaque |
//! | 4 | RGBA |
//!
//! ## Bitmap Bands
//!
//! ```text
//! density 24, n = 3 bytes per column
//!
//! band 0  rows  0-23   col0[b0 b1 b2] col1[b0 b1 b2] ...
//! band 1  rows 24-47   ...
//! last    rows past the image height are zero
//! ```
//!
//! ## Raster
//!
//! `ceil(width / 8)` bytes per row, MSB = leftmost pixel, padding bits zero.

use std::path::Path;

use image::DynamicImage;
use rayon::prelude::*;

use crate::error::{Result, TintaError};

/// Channel value above which a colour component counts as "light".
pub const WHITE_THRESHOLD: u8 = 200;

/// Monochrome bit grid. `true` = printed (black).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    width: usize,
    height: usize,
    pixels: Vec<bool>,
}

/// Column-major bands for the bit-image command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    /// Band height in dots (8, 16 or 24)
    pub density: usize,
    /// One entry per band, `width * density / 8` bytes each
    pub bands: Vec<Vec<u8>>,
}

/// Row-major packed image for the raster command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    pub width_bytes: usize,
    pub height: usize,
    pub data: Vec<u8>,
}

/// Whether an RGBA sample prints.
#[inline]
fn is_printed(r: u8, g: u8, b: u8, a: u8) -> bool {
    let white = a == 0 || (r > WHITE_THRESHOLD && g > WHITE_THRESHOLD && b > WHITE_THRESHOLD);
    !white
}

impl Image {
    /// Build from an interleaved pixel buffer with 1-4 channels per pixel.
    pub fn from_pixels(width: usize, height: usize, channels: usize, data: &[u8]) -> Result<Self> {
        if !(1..=4).contains(&channels) {
            return Err(TintaError::Image(format!(
                "unsupported channel count {}",
                channels
            )));
        }
        let expected = width * height * channels;
        if data.len() != expected {
            return Err(TintaError::Image(format!(
                "pixel buffer is {} bytes, expected {} ({}x{}x{})",
                data.len(),
                expected,
                width,
                height,
                channels
            )));
        }

        let pixels = data
            .chunks_exact(channels)
            .map(|px| match *px {
                [v] => is_printed(v, v, v, 255),
                [v, a] => is_printed(v, v, v, a),
                [r, g, b] => is_printed(r, g, b, 255),
                [r, g, b, a] => is_printed(r, g, b, a),
                _ => unreachable!("chunks_exact yields 1-4 channels"),
            })
            .collect();

        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Threshold an image decoded by the `image` crate.
    pub fn from_dynamic(img: &DynamicImage) -> Self {
        let rgba = img.to_rgba8();
        let pixels = rgba
            .pixels()
            .map(|p| is_printed(p[0], p[1], p[2], p[3]))
            .collect();
        Self {
            width: rgba.width() as usize,
            height: rgba.height() as usize,
            pixels,
        }
    }

    /// Decode and threshold an image file (PNG, JPEG, GIF, BMP, ...).
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let img = image::open(path)
            .map_err(|e| TintaError::Image(format!("{}: {}", path.display(), e)))?;
        Ok(Self::from_dynamic(&img))
    }

    /// Decode and threshold an encoded image held in memory.
    pub fn load_from_memory(bytes: &[u8]) -> Result<Self> {
        let img = image::load_from_memory(bytes).map_err(|e| TintaError::Image(e.to_string()))?;
        Ok(Self::from_dynamic(&img))
    }

    /// Wrap an already-thresholded grid (row-major, `true` = printed).
    pub fn from_bits(width: usize, height: usize, pixels: Vec<bool>) -> Result<Self> {
        if pixels.len() != width * height {
            return Err(TintaError::Image(format!(
                "bit grid has {} cells, expected {}x{}",
                pixels.len(),
                width,
                height
            )));
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Whether the dot at (x, y) prints. Out of bounds is white.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height && self.pixels[y * self.width + x]
    }

    /// Pack into `ceil(height / density)` column-major bands.
    ///
    /// `density` is the band height in dots: 8, 16 or 24.
    pub fn to_bitmap(&self, density: usize) -> Result<Bitmap> {
        if !matches!(density, 8 | 16 | 24) {
            return Err(TintaError::Image(format!(
                "bitmap density must be 8, 16 or 24, got {}",
                density
            )));
        }
        let n = density / 8;
        let band_count = self.height.div_ceil(density);

        let bands = (0..band_count)
            .into_par_iter()
            .map(|band| {
                let top = band * density;
                let mut line = vec![0u8; self.width * n];
                for x in 0..self.width {
                    for dy in 0..density {
                        if self.get(x, top + dy) {
                            line[x * n + dy / 8] |= 0x80 >> (dy % 8);
                        }
                    }
                }
                line
            })
            .collect();

        Ok(Bitmap { density, bands })
    }

    /// Pack into row-major raster data.
    pub fn to_raster(&self) -> Raster {
        let width_bytes = self.width.div_ceil(8);
        let data = if self.width == 0 {
            Vec::new()
        } else {
            self.pixels
                .par_chunks(self.width)
                .flat_map_iter(pack_row)
                .collect()
        };
        Raster {
            width_bytes,
            height: self.height,
            data,
        }
    }
}

/// Pack a row of dots into bytes, MSB first, zero-padded to a byte boundary.
///
/// ```
/// use tinta::render::bitmap::pack_row;
///
/// // 12 pixels pack into 2 bytes (4 bits padding)
/// let row = vec![true; 12];
/// assert_eq!(pack_row(&row), vec![0xFF, 0xF0]);
/// ```
pub fn pack_row(pixels: &[bool]) -> Vec<u8> {
    let mut bytes = vec![0u8; pixels.len().div_ceil(8)];
    for (i, _) in pixels.iter().enumerate().filter(|(_, p)| **p) {
        bytes[i / 8] |= 0x80 >> (i % 8);
    }
    bytes
}

// ============================================================================
// TESTS
// ============================================================================
