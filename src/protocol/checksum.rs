//! # Barcode Check Digits and Length Prefixes
//!
//! ## EAN/UPC Check Digit
//!
//! ```text
//! code      4 7 1 2 3 4 5 6 7 8 9 0
//! reversed  0 9 8 7 6 5 4 3 2 1 7 4
//! weight    3 1 3 1 3 1 3 1 3 1 3 1
//! check     (10 - sum % 10) % 10
//! ```

use crate::error::{Result, TintaError};

/// Compute the EAN/UPC check digit of a numeric code, as an ASCII digit.
///
/// ```
/// use tinta::protocol::checksum::parity_digit;
///
/// assert_eq!(parity_digit("590123412345").unwrap(), b'7');
/// ```
pub fn parity_digit(code: &str) -> Result<u8> {
    let mut sum = 0u32;
    for (i, ch) in code.chars().rev().enumerate() {
        let digit = ch.to_digit(10).ok_or_else(|| {
            TintaError::Barcode(format!("check digit needs a numeric code, got '{}'", code))
        })?;
        let weight = if i % 2 == 0 { 3 } else { 1 };
        sum += digit * weight;
    }
    let check = (10 - sum % 10) % 10;
    Ok(b'0' + check as u8)
}

/// Length prefix for CODE128 / CODE93: one raw byte holding the character count.
pub fn code_length(code: &str) -> Result<u8> {
    let len = code.chars().count();
    u8::try_from(len).map_err(|_| {
        TintaError::Barcode(format!("barcode payload too long ({} characters, max 255)", len))
    })
}
