//! # Device File Transport
//!
//! Talks to a printer exposed as a character device: a USB-serial adapter
//! (`/dev/ttyUSB0`), a Bluetooth RFCOMM binding (`/dev/rfcomm0`) or a USB
//! printer class device (`/dev/usb/lp0`).
//!
//! ## Bluetooth Setup (Linux)
//!
//! ```bash
//! $ bluetoothctl pair 00:11:62:XX:XX:XX
//! $ sudo rfcomm bind 0 00:11:62:XX:XX:XX
//! # This creates /dev/rfcomm0
//! ```
//!
//! ## TTY Configuration
//!
//! When the device is a terminal it is switched to raw mode so binary data
//! passes through unmodified:
//!
//! - **No input processing**: IGNBRK, BRKINT, PARMRK, ISTRIP, INLCR, IGNCR, ICRNL
//! - **No software flow control**: IXON, IXOFF, IXANY
//! - **No output processing**: OPOST (no CR/LF translation)
//! - **8-bit characters**: CS8, no parity
//! - **Non-canonical, no echo**: ICANON, ECHO, ECHONL, ISIG, IEXTEN
//!
//! Plain device files (`lp`) are used as they are.
//!
//! ## Chunked Writes
//!
//! Large blocks are written in 4096-byte chunks with a 2 ms pause between
//! them so slow links do not overflow the printer's receive buffer.

use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

use super::Adapter;
use crate::error::{Result, TintaError};

/// Default RFCOMM device path
pub const DEFAULT_DEVICE: &str = "/dev/rfcomm0";

/// Default chunk size for writes (bytes)
const CHUNK_SIZE: usize = 4096;

/// Delay between chunks (milliseconds)
const CHUNK_DELAY_MS: u64 = 2;

/// Read buffer for status replies
const READ_BUFFER: usize = 64;

/// # Device File Transport
///
/// ## Example
///
/// ```no_run
/// use tinta::printer::{Printer, PrinterOptions};
/// use tinta::transport::DeviceAdapter;
///
/// # async fn demo() -> tinta::error::Result<()> {
/// let adapter = DeviceAdapter::new("/dev/rfcomm0");
/// let mut printer = Printer::new(adapter, PrinterOptions::default())?;
/// printer.open().await?;
/// printer.text("Hello")?;
/// printer.close().await?;
/// # Ok(())
/// # }
/// ```
pub struct DeviceAdapter {
    path: PathBuf,
    file: Option<File>,
    chunk_size: usize,
    chunk_delay: Duration,
}

impl DeviceAdapter {
    pub fn new<P: AsRef<Path>>(device: P) -> Self {
        Self {
            path: device.as_ref().to_path_buf(),
            file: None,
            chunk_size: CHUNK_SIZE,
            chunk_delay: Duration::from_millis(CHUNK_DELAY_MS),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Set the chunk size for large writes. Default is 4096 bytes.
    pub fn set_chunk_size(&mut self, size: usize) {
        self.chunk_size = size.max(1);
    }

    /// Set the delay between chunks. Default is 2ms.
    pub fn set_chunk_delay(&mut self, delay: Duration) {
        self.chunk_delay = delay;
    }

    fn file(&mut self) -> Result<&mut File> {
        let path = &self.path;
        self.file
            .as_mut()
            .ok_or_else(|| TintaError::Transport(format!("{} is not open", path.display())))
    }
}

#[async_trait]
impl Adapter for DeviceAdapter {
    async fn open(&mut self) -> Result<()> {
        if self.file.is_some() {
            return Ok(());
        }
        let path = &self.path;
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .map_err(|e| {
                TintaError::Transport(format!("Failed to open {}: {}", path.display(), e))
            })?;

        prepare_device(&file)?;

        tracing::info!(device = %path.display(), "Opened printer device");
        self.file = Some(File::from_std(file));
        Ok(())
    }

    async fn write(&mut self, data: &[u8]) -> Result<()> {
        if data.is_empty() {
            return Ok(());
        }
        let chunk_size = self.chunk_size;
        let chunk_delay = self.chunk_delay;
        let file = self.file()?;

        if data.len() <= chunk_size {
            file.write_all(data)
                .await
                .map_err(|e| TintaError::Transport(format!("Write failed: {}", e)))?;
        } else {
            for chunk in data.chunks(chunk_size) {
                file.write_all(chunk)
                    .await
                    .map_err(|e| TintaError::Transport(format!("Write failed: {}", e)))?;
                if !chunk_delay.is_zero() {
                    tokio::time::sleep(chunk_delay).await;
                }
            }
        }

        file.flush()
            .await
            .map_err(|e| TintaError::Transport(format!("Flush failed: {}", e)))
    }

    async fn close(&mut self) -> Result<()> {
        if let Some(mut file) = self.file.take() {
            file.flush()
                .await
                .map_err(|e| TintaError::Transport(format!("Flush failed: {}", e)))?;
            tracing::info!(device = %self.path.display(), "Closed printer device");
        }
        Ok(())
    }

    async fn read(&mut self) -> Result<Vec<u8>> {
        let file = self.file()?;
        let mut buf = [0u8; READ_BUFFER];
        let n = file
            .read(&mut buf)
            .await
            .map_err(|e| TintaError::Transport(format!("Read failed: {}", e)))?;
        if n == 0 {
            return Err(TintaError::Transport("device closed the connection".into()));
        }
        Ok(buf[..n].to_vec())
    }
}

#[cfg(unix)]
fn prepare_device(file: &std::fs::File) -> Result<()> {
    use std::os::unix::io::AsRawFd;

    let fd = file.as_raw_fd();
    // SAFETY: fd is a valid descriptor owned by `file`
    if unsafe { libc::isatty(fd) } == 1 {
        configure_tty_raw(fd)?;
    }
    Ok(())
}

#[cfg(not(unix))]
fn prepare_device(_file: &std::fs::File) -> Result<()> {
    Ok(())
}

/// Configure a file descriptor for raw TTY mode.
///
/// IXON/IXOFF/IXANY are cleared because 0x11 (XON) and 0x13 (XOFF) appear
/// in image data.
#[cfg(unix)]
fn configure_tty_raw(fd: i32) -> Result<()> {
    use std::mem::MaybeUninit;

    let mut termios = MaybeUninit::uninit();
    // SAFETY: tcgetattr initializes termios on success
    let result = unsafe { libc::tcgetattr(fd, termios.as_mut_ptr()) };
    if result != 0 {
        return Err(TintaError::Transport(format!(
            "tcgetattr failed: {}",
            io::Error::last_os_error()
        )));
    }
    let mut termios = unsafe { termios.assume_init() };

    termios.c_iflag &= !(libc::IGNBRK
        | libc::BRKINT
        | libc::PARMRK
        | libc::ISTRIP
        | libc::INLCR
        | libc::IGNCR
        | libc::ICRNL
        | libc::IXON
        | libc::IXOFF
        | libc::IXANY);
    termios.c_oflag &= !libc::OPOST;
    termios.c_lflag &= !(libc::ECHO | libc::ECHONL | libc::ICANON | libc::ISIG | libc::IEXTEN);
    termios.c_cflag &= !(libc::CSIZE | libc::PARENB);
    termios.c_cflag |= libc::CS8;

    // Reads return as soon as one byte is available
    termios.c_cc[libc::VMIN] = 1;
    termios.c_cc[libc::VTIME] = 0;

    let result = unsafe { libc::tcsetattr(fd, libc::TCSANOW, &termios) };
    if result != 0 {
        return Err(TintaError::Transport(format!(
            "tcsetattr failed: {}",
            io::Error::last_os_error()
        )));
    }

    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_device_path() {
        assert_eq!(DEFAULT_DEVICE, "/dev/rfcomm0");
    }

    #[tokio::test]
    async fn test_write_before_open_fails() {
        let mut adapter = DeviceAdapter::new("/dev/rfcomm9");
        let err = adapter.write(b"x").await.unwrap_err();
        assert!(matches!(err, TintaError::Transport(_)));
    }

    #[tokio::test]
    async fn test_open_missing_device_fails() {
        let mut adapter = DeviceAdapter::new("/nonexistent/printer");
        assert!(adapter.open().await.is_err());
    }

    #[tokio::test]
    async fn test_plain_file_roundtrip() {
        // A regular file stands in for an lp device: no tty setup, chunked writes land in order
        let path = std::env::temp_dir().join(format!("tinta-device-{}", std::process::id()));
        std::fs::write(&path, b"").unwrap();

        let mut adapter = DeviceAdapter::new(&path);
        adapter.set_chunk_size(3);
        adapter.set_chunk_delay(Duration::ZERO);
        adapter.open().await.unwrap();
        adapter.write(b"\x1b@hello").await.unwrap();
        adapter.close().await.unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), b"\x1b@hello");
        std::fs::remove_file(&path).unwrap();
    }

    #[tokio::test]
    async fn test_close_is_idempotent() {
        let mut adapter = DeviceAdapter::new("/dev/null");
        adapter.close().await.unwrap();
        adapter.close().await.unwrap();
    }
}
