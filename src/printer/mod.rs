//! # Printer Module
//!
//! The command builder and what it is configured with.
//!
//! ## Modules
//!
//! - [`builder`]: [`Printer`], the fluent command builder
//! - [`config`]: [`PrinterOptions`]
//! - [`table`]: column layout for `table` / `table_custom`
//! - [`buffer`]: the output buffer drained by `flush`

pub mod buffer;
pub mod builder;
pub mod config;
pub mod table;

pub use builder::{Printer, QrImageOptions};
pub use config::PrinterOptions;
pub use table::{Cell, CellWidth, TableOptions};
