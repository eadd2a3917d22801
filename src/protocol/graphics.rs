//! # Bit Image and Raster Graphics Commands
//!
//! Two ways to print pixels:
//!
//! | Command | Layout | Use |
//! |---------|--------|-----|
//! | ESC * m nL nH | Column-major bands, 8 or 24 dots tall | `image` |
//! | GS v 0 m xL xH yL yH | Row-major, whole image at once | `raster`, `qrimage` |
//!
//! ## Band Layout (ESC *)
//!
//! ```text
//! column:   0      1      2     ...
//! byte 0: [b0-7] [b0-7] [b0-7]      rows 0-7   (MSB = top)
//! byte 1: [b0-7] [b0-7] [b0-7]      rows 8-15  (24-dot only)
//! byte 2: [b0-7] [b0-7] [b0-7]      rows 16-23 (24-dot only)
//! ```
//!
//! ## Raster Layout (GS v 0)
//!
//! ```text
//! Row 0: [byte0][byte1]...[byteN-1]   MSB = leftmost pixel
//! Row 1: [byte0][byte1]...[byteN-1]
//! ```

use std::str::FromStr;

use super::commands::{self, Command, Dialect, EOL, u16_le};
use crate::error::{Result, TintaError};

// ============================================================================
// BIT IMAGE (ESC *)
// ============================================================================

/// Bit-image density: single/double horizontal density, 8 or 24 dots tall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BitmapDensity {
    /// 8-dot single density
    S8,
    /// 8-dot double density
    D8,
    /// 24-dot single density
    S24,
    /// 24-dot double density (default)
    #[default]
    D24,
}

impl BitmapDensity {
    pub fn command(self) -> Command {
        match self {
            BitmapDensity::S8 => Command::BitmapS8,
            BitmapDensity::D8 => Command::BitmapD8,
            BitmapDensity::S24 => Command::BitmapS24,
            BitmapDensity::D24 => Command::BitmapD24,
        }
    }

    /// Bytes per pixel column within a band (1 or 3).
    pub fn bytes_per_column(self) -> usize {
        match self {
            BitmapDensity::S8 | BitmapDensity::D8 => 1,
            BitmapDensity::S24 | BitmapDensity::D24 => 3,
        }
    }

    /// Band height in dots (8 or 24).
    pub fn dots(self) -> usize {
        self.bytes_per_column() * 8
    }
}

impl FromStr for BitmapDensity {
    type Err = TintaError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "s8" => Ok(BitmapDensity::S8),
            "d8" => Ok(BitmapDensity::D8),
            "s24" => Ok(BitmapDensity::S24),
            "d24" => Ok(BitmapDensity::D24),
            other => Err(TintaError::InvalidCommand(format!("unknown bitmap density '{}'", other))),
        }
    }
}

/// # One Bit-Image Band (ESC * m nL nH d1...dk LF)
///
/// `nL nH` is the column count, `data.len() / bytes_per_column`. The band is
/// terminated with a line feed so the next one starts below it.
///
/// ```
/// use tinta::protocol::commands::Dialect;
/// use tinta::protocol::graphics::{bit_image_band, BitmapDensity};
///
/// let cmd = bit_image_band(Dialect::Generic, BitmapDensity::D8, &[0xFF, 0x81]).unwrap();
/// assert_eq!(cmd, vec![0x1B, 0x2A, 0x01, 2, 0, 0xFF, 0x81, b'\n']);
/// ```
pub fn bit_image_band(dialect: Dialect, density: BitmapDensity, data: &[u8]) -> Result<Vec<u8>> {
    let n = density.bytes_per_column();
    debug_assert!(
        data.len() % n == 0,
        "Band data must be a multiple of {} bytes, got {}",
        n,
        data.len()
    );
    let columns = u16::try_from(data.len() / n).map_err(|_| {
        TintaError::Image(format!("band is {} columns wide, max {}", data.len() / n, u16::MAX))
    })?;

    let header = commands::resolve(dialect, density.command())?;
    let mut cmd = Vec::with_capacity(header.len() + 3 + data.len());
    cmd.extend_from_slice(header);
    cmd.extend_from_slice(&u16_le(columns));
    cmd.extend_from_slice(data);
    cmd.extend_from_slice(EOL);
    Ok(cmd)
}

// ============================================================================
// RASTER (GS v 0)
// ============================================================================

/// Raster scaling mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RasterMode {
    #[default]
    Normal,
    DoubleWidth,
    DoubleHeight,
    /// Double width and double height
    Quadruple,
}

impl RasterMode {
    pub fn command(self) -> Command {
        match self {
            RasterMode::Normal => Command::RasterNormal,
            RasterMode::DoubleWidth => Command::RasterDoubleWidth,
            RasterMode::DoubleHeight => Command::RasterDoubleHeight,
            RasterMode::Quadruple => Command::RasterQuadruple,
        }
    }
}

impl FromStr for RasterMode {
    type Err = TintaError;

    /// `normal`, `dw`, `dh`, and `dwdh` with its aliases `dhdw`, `dwh`, `dhw`.
    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "normal" => Ok(RasterMode::Normal),
            "dw" => Ok(RasterMode::DoubleWidth),
            "dh" => Ok(RasterMode::DoubleHeight),
            "dwdh" | "dhdw" | "dwh" | "dhw" => Ok(RasterMode::Quadruple),
            other => Err(TintaError::InvalidCommand(format!("unknown raster mode '{}'", other))),
        }
    }
}

/// # Print Raster Image (GS v 0 m xL xH yL yH d1...dk)
///
/// | Param | Meaning |
/// |-------|---------|
/// | m | scaling mode |
/// | xL xH | bytes per row |
/// | yL yH | rows |
///
/// ```
/// use tinta::protocol::commands::Dialect;
/// use tinta::protocol::graphics::{raster, RasterMode};
///
/// let cmd = raster(Dialect::Generic, RasterMode::Normal, 1, 2, &[0x80, 0x01]).unwrap();
/// assert_eq!(cmd, vec![0x1D, 0x76, 0x30, 0x00, 1, 0, 2, 0, 0x80, 0x01]);
/// ```
pub fn raster(
    dialect: Dialect,
    mode: RasterMode,
    width_bytes: u16,
    height: u16,
    data: &[u8],
) -> Result<Vec<u8>> {
    debug_assert!(
        data.len() == width_bytes as usize * height as usize,
        "Raster data length mismatch. Expected {} ({} bytes × {} rows), got {}",
        width_bytes as usize * height as usize,
        width_bytes,
        height,
        data.len()
    );

    let header = commands::resolve(dialect, mode.command())?;
    let mut cmd = Vec::with_capacity(header.len() + 4 + data.len());
    cmd.extend_from_slice(header);
    cmd.extend_from_slice(&u16_le(width_bytes));
    cmd.extend_from_slice(&u16_le(height));
    cmd.extend_from_slice(data);
    Ok(cmd)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_density_geometry() {
        assert_eq!(BitmapDensity::S8.dots(), 8);
        assert_eq!(BitmapDensity::D8.bytes_per_column(), 1);
        assert_eq!(BitmapDensity::S24.dots(), 24);
        assert_eq!(BitmapDensity::D24.bytes_per_column(), 3);
    }

    #[test]
    fn test_band_header_d24() {
        let data = vec![0xAA; 3 * 300];
        let cmd = bit_image_band(Dialect::Generic, BitmapDensity::D24, &data).unwrap();
        assert_eq!(&cmd[..5], &[0x1B, 0x2A, 0x21, 0x2C, 0x01]); // 300 columns
        assert_eq!(cmd.len(), 5 + 900 + 1);
        assert_eq!(cmd.last(), Some(&b'\n'));
    }

    #[test]
    fn test_band_header_bematech() {
        let cmd = bit_image_band(Dialect::Bematech, BitmapDensity::S8, &[0x01]).unwrap();
        assert_eq!(cmd, vec![0x1B, 0x4B, 1, 0, 0x01, b'\n']);
    }

    #[test]
    fn test_raster_modes() {
        let cmd = raster(Dialect::Generic, RasterMode::Quadruple, 0, 0, &[]).unwrap();
        assert_eq!(cmd, vec![0x1D, 0x76, 0x30, 0x03, 0, 0, 0, 0]);

        let cmd = raster(Dialect::Daruma, RasterMode::DoubleWidth, 0, 0, &[]).unwrap();
        assert_eq!(&cmd[..3], &[0x10, 0x58, 0x01]);
    }

    #[test]
    fn test_raster_mode_aliases() {
        for alias in ["dwdh", "DHDW", "dwh", "dhw"] {
            assert_eq!(alias.parse::<RasterMode>().unwrap(), RasterMode::Quadruple, "{}", alias);
        }
        assert_eq!("dw".parse::<RasterMode>().unwrap(), RasterMode::DoubleWidth);
        assert!("triple".parse::<RasterMode>().is_err());
    }

    #[test]
    fn test_density_parse() {
        assert_eq!("S24".parse::<BitmapDensity>().unwrap(), BitmapDensity::S24);
        assert!("d16".parse::<BitmapDensity>().is_err());
    }
}
