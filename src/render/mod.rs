//! # Rendering Module
//!
//! Turns decoded pixels into the packed bit layouts the printer consumes.
//!
//! ## Modules
//!
//! - [`bitmap`]: Monochrome thresholding, band (ESC *) and raster (GS v 0) packing
//!
//! ## Usage Example
//!
//! ```
//! use tinta::render::bitmap::Image;
//!
//! // 2×1 RGB image: one black pixel, one white pixel
//! let image = Image::from_pixels(2, 1, 3, &[0, 0, 0, 255, 255, 255]).unwrap();
//!
//! let raster = image.to_raster();
//! assert_eq!(raster.data, vec![0b1000_0000]);
//! ```

pub mod bitmap;

pub use bitmap::{Bitmap, Image, Raster};
