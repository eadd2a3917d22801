//! # Error Types
//!
//! This module defines error types used throughout the tinta library.
//!
//! Builder calls fail with [`TintaError::InvalidCommand`], [`TintaError::Barcode`]
//! or [`TintaError::Image`] before touching the output buffer. Transport and
//! codec failures are passed through to the caller as they were reported.

use thiserror::Error;

/// Main error type for tinta operations
#[derive(Debug, Error)]
pub enum TintaError {
    /// Transport-level errors (connection, write, read, close)
    #[error("Transport error: {0}")]
    Transport(String),

    /// Invalid command or parameter, or an opcode the active dialect lacks
    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    /// Barcode payload rejected before encoding
    #[error("Barcode error: {0}")]
    Barcode(String),

    /// Text could not be represented in the active charset
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// Image decoding or conversion error
    #[error("Image error: {0}")]
    Image(String),

    /// Status reply could not be decoded
    #[error("Status error: {0}")]
    Status(String),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, TintaError>;
