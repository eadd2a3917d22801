//! # Printer Transport Layer
//!
//! Byte transports the [`Printer`](crate::printer::Printer) flushes into.
//!
//! ## Available Transports
//!
//! - [`device`]: tty / device file (serial, Bluetooth RFCOMM, USB `lp`)
//! - [`network`]: raw TCP, port 9100 by default
//! - [`console`]: hex dump to stdout or any writer
//! - [`memory`]: records writes, serves scripted replies
//!
//! ## Contract
//!
//! | Method | Meaning |
//! |--------|---------|
//! | `open` | acquire the device; idempotent adapters may do nothing |
//! | `write` | deliver one contiguous block |
//! | `read` | wait for the next inbound bytes (status replies) |
//! | `close` | release the device; later reads fail |
//!
//! Adapters never retry. Errors are returned as reported.

use async_trait::async_trait;

use crate::error::Result;

pub mod console;
pub mod device;
pub mod memory;
pub mod network;

pub use console::ConsoleAdapter;
pub use device::DeviceAdapter;
pub use memory::MemoryAdapter;
pub use network::NetworkAdapter;

/// Minimal byte transport consumed by the printer.
#[async_trait]
pub trait Adapter: Send {
    /// Acquire the underlying device.
    async fn open(&mut self) -> Result<()>;

    /// Write one block of bytes.
    async fn write(&mut self, data: &[u8]) -> Result<()>;

    /// Release the device. Pending and later reads fail.
    async fn close(&mut self) -> Result<()>;

    /// Wait for the next chunk of inbound bytes.
    ///
    /// Returns an error on end of stream or when the adapter cannot read.
    async fn read(&mut self) -> Result<Vec<u8>>;
}

#[async_trait]
impl<A: Adapter + ?Sized> Adapter for Box<A> {
    async fn open(&mut self) -> Result<()> {
        (**self).open().await
    }

    async fn write(&mut self, data: &[u8]) -> Result<()> {
        (**self).write(data).await
    }

    async fn close(&mut self) -> Result<()> {
        (**self).close().await
    }

    async fn read(&mut self) -> Result<Vec<u8>> {
        (**self).read().await
    }
}
