//! # ESC/POS Protocol Implementation
//!
//! Low-level command builders for ESC/POS thermal receipt printers and the
//! Bematech, Daruma and QS printer dialects.
//!
//! ## Module Structure
//!
//! - [`commands`]: Opcode table, dialect overrides, parameterized commands
//! - [`checksum`]: EAN/UPC check digits and length prefixes
//! - [`charset`]: Unicode to printer charset encoding
//! - [`text`]: Alignment, fonts, styles, sizes, display width
//! - [`barcode`]: 1D barcodes and QR codes
//! - [`graphics`]: Bit image bands and raster images
//!
//! ## Usage Example
//!
//! ```
//! use tinta::protocol::commands::{self, Command, Dialect};
//! use tinta::protocol::text::Style;
//!
//! let dialect = Dialect::Generic;
//! let mut data = Vec::new();
//!
//! data.extend_from_slice(commands::resolve(dialect, Command::HardwareInit).unwrap());
//! data.extend_from_slice(commands::resolve(dialect, Command::AlignCenter).unwrap());
//! data.extend(Style::new().bold().encode(dialect).unwrap());
//! data.extend_from_slice(b"RECEIPT\n");
//! data.extend(Style::NORMAL.encode(dialect).unwrap());
//! data.extend_from_slice(commands::resolve(dialect, Command::PaperFullCut).unwrap());
//!
//! assert_eq!(&data[..2], &[0x1B, 0x40]);
//! ```

pub mod barcode;
pub mod charset;
pub mod checksum;
pub mod commands;
pub mod graphics;
pub mod text;
