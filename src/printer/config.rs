//! # Printer Configuration
//!
//! Options a [`Printer`](super::Printer) is created with.
//!
//! | Field | Default | Meaning |
//! |-------|---------|---------|
//! | `encoding` | `"GB18030"` | charset label for encoded text |
//! | `width` | unset (48) | characters per line; pins the width across font changes |
//! | `dialect` | `generic` | opcode table variant |
//!
//! Loadable from JSON:
//!
//! ```
//! use tinta::printer::PrinterOptions;
//! use tinta::protocol::commands::Dialect;
//!
//! let opts = PrinterOptions::from_json(r#"{ "dialect": "daruma", "width": 32 }"#).unwrap();
//! assert_eq!(opts.dialect, Dialect::Daruma);
//! assert_eq!(opts.width, Some(32));
//! assert_eq!(opts.encoding, "GB18030");
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TintaError};
use crate::protocol::charset::DEFAULT_ENCODING;
use crate::protocol::commands::Dialect;

/// Characters per line when no width is configured.
pub const DEFAULT_WIDTH: usize = 48;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrinterOptions {
    /// Charset label (`"GB18030"`, `"cp437"`, `"windows-1252"`, ...)
    pub encoding: String,

    /// Fixed characters per line. When unset, font selection picks 42 or 56.
    pub width: Option<usize>,

    pub dialect: Dialect,
}

impl Default for PrinterOptions {
    fn default() -> Self {
        Self {
            encoding: DEFAULT_ENCODING.to_string(),
            width: None,
            dialect: Dialect::Generic,
        }
    }
}

impl PrinterOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set the charset label.
    pub fn with_encoding(mut self, encoding: impl Into<String>) -> Self {
        self.encoding = encoding.into();
        self
    }

    /// Builder: pin the line width.
    pub fn with_width(mut self, width: usize) -> Self {
        self.width = Some(width);
        self
    }

    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    /// Width in effect before any font change.
    pub fn initial_width(&self) -> usize {
        self.width.unwrap_or(DEFAULT_WIDTH)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| TintaError::InvalidCommand(format!("invalid printer options: {}", e)))
    }

    /// Read options from a JSON file. Missing fields take their defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }
}
