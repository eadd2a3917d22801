//! # Console Transport
//!
//! Prints every block as a hex dump instead of sending it anywhere, eight
//! bytes per line followed by a blank line:
//!
//! ```text
//! 1B 40 48 65 6C 6C 6F 0A
//! 1D 56 00
//!
//! ```

use std::io::{self, Write};

use async_trait::async_trait;

use super::Adapter;
use crate::error::{Result, TintaError};

const BYTES_PER_LINE: usize = 8;

/// Format `data` as uppercase hex, [`BYTES_PER_LINE`] bytes per line.
pub fn hex_dump(data: &[u8]) -> String {
    let mut out = String::with_capacity(data.len() * 3 + 1);
    for line in data.chunks(BYTES_PER_LINE) {
        let hex: Vec<String> = line.iter().map(|b| format!("{:02X}", b)).collect();
        out.push_str(&hex.join(" "));
        out.push('\n');
    }
    out.push('\n');
    out
}

pub struct ConsoleAdapter {
    out: Box<dyn Write + Send>,
}

impl ConsoleAdapter {
    /// Dump to stdout.
    pub fn new() -> Self {
        Self::with_writer(io::stdout())
    }

    pub fn with_writer<W: Write + Send + 'static>(out: W) -> Self {
        Self { out: Box::new(out) }
    }
}

impl Default for ConsoleAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Adapter for ConsoleAdapter {
    async fn open(&mut self) -> Result<()> {
        Ok(())
    }

    async fn write(&mut self, data: &[u8]) -> Result<()> {
        self.out.write_all(hex_dump(data).as_bytes())?;
        self.out.flush()?;
        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }

    async fn read(&mut self) -> Result<Vec<u8>> {
        Err(TintaError::Transport("console adapter cannot read".into()))
    }
}
