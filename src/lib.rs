//! # Tinta - ESC/POS Receipt Printer Library
//!
//! Tinta builds the byte streams thermal receipt printers understand. It
//! provides:
//!
//! - **Protocol implementation**: ESC/POS command table with Bematech, Daruma
//!   and QS printer dialects
//! - **Command builder**: fluent [`Printer`] for text, tables, barcodes, QR
//!   codes, images, cuts and the cash drawer
//! - **Image conversion**: monochrome thresholding with band and raster packing
//! - **Status decoding**: the four DLE EOT real-time status replies
//! - **Transport**: device files, raw TCP, console hex dump, in-memory
//!
//! ## Quick Start
//!
//! ```no_run
//! use tinta::{
//!     printer::{Printer, PrinterOptions},
//!     protocol::barcode::barcode1d::{BarcodeOptions, Symbology},
//!     protocol::text::{Alignment, Style},
//!     transport::NetworkAdapter,
//! };
//!
//! # async fn demo() -> tinta::Result<()> {
//! let adapter = NetworkAdapter::new("192.168.1.50", 9100);
//! let mut printer = Printer::new(adapter, PrinterOptions::default())?;
//!
//! printer.open().await?;
//! printer
//!     .align(Alignment::Center)?
//!     .style(Style::new().bold())?
//!     .text("CAFÉ TINTA")?
//!     .style(Style::NORMAL)?
//!     .barcode("471234567890", Symbology::Ean13, &BarcodeOptions::default())?
//!     .cut(false, 3)?;
//! printer.close().await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`protocol`] | Opcode table and command encoders |
//! | [`printer`] | Command builder, options, table layout |
//! | [`render`] | Pixel to bit-grid conversion |
//! | [`status`] | Status byte decoding |
//! | [`transport`] | Communication backends |
//! | [`error`] | Error types |

pub mod error;
pub mod printer;
pub mod protocol;
pub mod render;
pub mod status;
pub mod transport;

// Re-exports for convenience
pub use error::{Result, TintaError};
pub use printer::{Printer, PrinterOptions};
pub use protocol::commands::Dialect;
pub use status::{DeviceStatus, StatusClass};
pub use transport::Adapter;
