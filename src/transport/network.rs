//! # Raw TCP Transport
//!
//! Network printers listen for raw ESC/POS on TCP port 9100 ("JetDirect").
//! Status replies come back on the same socket.

use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use super::Adapter;
use crate::error::{Result, TintaError};

/// Raw printing port
pub const DEFAULT_PORT: u16 = 9100;

/// Connect timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const READ_BUFFER: usize = 64;

pub struct NetworkAdapter {
    host: String,
    port: u16,
    timeout: Duration,
    stream: Option<TcpStream>,
}

impl NetworkAdapter {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            timeout: DEFAULT_TIMEOUT,
            stream: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    fn stream(&mut self) -> Result<&mut TcpStream> {
        let address = format!("{}:{}", self.host, self.port);
        self.stream
            .as_mut()
            .ok_or_else(|| TintaError::Transport(format!("{} is not connected", address)))
    }
}

#[async_trait]
impl Adapter for NetworkAdapter {
    async fn open(&mut self) -> Result<()> {
        if self.stream.is_some() {
            return Ok(());
        }
        let address = self.address();
        let connect = TcpStream::connect((self.host.as_str(), self.port));
        let stream = tokio::time::timeout(self.timeout, connect)
            .await
            .map_err(|_| {
                TintaError::Transport(format!(
                    "printer connection timeout after {}ms",
                    self.timeout.as_millis()
                ))
            })?
            .map_err(|e| {
                TintaError::Transport(format!("Failed to connect to {}: {}", address, e))
            })?;
        stream.set_nodelay(true)?;

        tracing::info!(%address, "Connected to network printer");
        self.stream = Some(stream);
        Ok(())
    }

    async fn write(&mut self, data: &[u8]) -> Result<()> {
        let stream = self.stream()?;
        stream
            .write_all(data)
            .await
            .map_err(|e| TintaError::Transport(format!("Write failed: {}", e)))
    }

    async fn close(&mut self) -> Result<()> {
        if let Some(mut stream) = self.stream.take() {
            // the socket is dropped either way
            stream.shutdown().await.map_err(close_error)?;
            tracing::info!(address = %self.address(), "Disconnected from network printer");
        }
        Ok(())
    }

    async fn read(&mut self) -> Result<Vec<u8>> {
        let stream = self.stream()?;
        let mut buf = [0u8; READ_BUFFER];
        let n = stream
            .read(&mut buf)
            .await
            .map_err(|e| TintaError::Transport(format!("Read failed: {}", e)))?;
        if n == 0 {
            return Err(TintaError::Transport("printer closed the connection".into()));
        }
        Ok(buf[..n].to_vec())
    }
}

fn close_error(e: std::io::Error) -> TintaError {
    TintaError::Transport(format!("Close failed: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn test_write_and_read_over_loopback() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut query = [0u8; 3];
            socket.read_exact(&mut query).await.unwrap();
            socket.write_all(&[0x12]).await.unwrap();
            query
        });

        let mut adapter = NetworkAdapter::new("127.0.0.1", port);
        adapter.open().await.unwrap();
        adapter.write(&[0x10, 0x04, 0x01]).await.unwrap();
        assert_eq!(adapter.read().await.unwrap(), vec![0x12]);
        adapter.close().await.unwrap();

        assert_eq!(server.await.unwrap(), [0x10, 0x04, 0x01]);
    }

    #[tokio::test]
    async fn test_read_after_peer_close_fails() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let server = tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            drop(socket);
        });

        let mut adapter = NetworkAdapter::new("127.0.0.1", port);
        adapter.open().await.unwrap();
        server.await.unwrap();
        assert!(adapter.read().await.is_err());
    }

    #[tokio::test]
    async fn test_write_without_open_fails() {
        let mut adapter = NetworkAdapter::new("127.0.0.1", DEFAULT_PORT);
        assert!(matches!(adapter.write(b"x").await, Err(TintaError::Transport(_))));
    }

    #[test]
    fn test_shutdown_failure_is_transport_error() {
        let err = close_error(std::io::Error::from(std::io::ErrorKind::NotConnected));
        assert!(matches!(err, TintaError::Transport(msg) if msg.starts_with("Close failed")));
    }

    #[tokio::test]
    async fn test_close_is_idempotent() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let server = tokio::spawn(async move { listener.accept().await.map(|_| ()) });

        let mut adapter = NetworkAdapter::new("127.0.0.1", port);
        adapter.open().await.unwrap();
        adapter.close().await.unwrap();
        adapter.close().await.unwrap();
        assert!(adapter.read().await.is_err());
        server.await.unwrap().unwrap();
    }
}
