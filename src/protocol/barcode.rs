//! # Barcode and QR Code Commands
//!
//! ## Supported 1D Symbologies
//!
//! | Type | Generic selector | Daruma selector | Payload |
//! |------|------------------|-----------------|---------|
//! | UPC-A | GS k 00 | 8 | 11 digits |
//! | UPC-E | GS k 01 | - | digits |
//! | EAN13 | GS k 02 | 1 | 12 digits + check |
//! | EAN8 | GS k 03 | 2 | 7 digits + check |
//! | CODE39 | GS k 04 | 6 | A-Z 0-9 -.$/+% |
//! | ITF | GS k 05 | 4 | digit pairs |
//! | NW7 | GS k 06 | 9 | Codabar |
//! | CODE93 | GS k 48 | 7 | length-prefixed |
//! | CODE128 | GS k 49 | 5 | length-prefixed |
//!
//! ## 1D Wire Format
//!
//! ```text
//! [GS w n] [GS h n] [GS f n] [GS H n]  GS k m [len] code [check] NUL
//! ```
//!
//! The QS printer model brackets this with its barcode-mode switch and has
//! neither the width nor the HRI font selector. Daruma uses its own
//! `ESC b` command.
//!
//! ## QR Codes
//!
//! ```
//! use tinta::protocol::barcode::qr::{self, QrOptions};
//! use tinta::protocol::commands::Dialect;
//!
//! let bytes = qr::encode(Dialect::Generic, "hi", &QrOptions::default()).unwrap();
//! assert_eq!(bytes, vec![0x1D, b'Z', 0x02, 0x1B, b'Z', 3, b'L', 6, 2, 0, b'h', b'i']);
//! ```

use super::commands::NUL;

// ============================================================================
// 1D BARCODES
// ============================================================================

/// 1D barcode command builders
pub mod barcode1d {
    use std::str::FromStr;

    use tracing::warn;

    use super::super::checksum::{code_length, parity_digit};
    use super::super::commands::{self, Command, Dialect, ESC};
    use super::NUL;
    use crate::error::{Result, TintaError};

    /// 1D barcode symbology
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum Symbology {
        /// UPC-A (11 digits, printer computes check)
        UpcA,
        /// UPC-E (compressed UPC-A)
        UpcE,
        /// EAN-13 / JAN-13 (12 digits + check digit)
        Ean13,
        /// EAN-8 / JAN-8 (7 digits + check digit)
        Ean8,
        /// Code39 (A-Z, 0-9, space, -.$/%+)
        Code39,
        /// ITF (Interleaved 2 of 5, numeric pairs)
        Itf,
        /// NW-7 / Codabar
        Nw7,
        /// Code93 (full ASCII)
        Code93,
        /// Code128 (full ASCII)
        Code128,
    }

    impl Symbology {
        pub fn command(self) -> Command {
            match self {
                Symbology::UpcA => Command::BarcodeUpcA,
                Symbology::UpcE => Command::BarcodeUpcE,
                Symbology::Ean13 => Command::BarcodeEan13,
                Symbology::Ean8 => Command::BarcodeEan8,
                Symbology::Code39 => Command::BarcodeCode39,
                Symbology::Itf => Command::BarcodeItf,
                Symbology::Nw7 => Command::BarcodeNw7,
                Symbology::Code93 => Command::BarcodeCode93,
                Symbology::Code128 => Command::BarcodeCode128,
            }
        }

        /// Symbologies sent with a one-byte character count before the data.
        pub fn length_prefixed(self) -> bool {
            matches!(self, Symbology::Code93 | Symbology::Code128)
        }

        /// Digits the caller supplies when the printer expects a check digit appended.
        pub fn required_digits(self) -> Option<usize> {
            match self {
                Symbology::Ean13 => Some(12),
                Symbology::Ean8 => Some(7),
                _ => None,
            }
        }
    }

    impl FromStr for Symbology {
        type Err = TintaError;

        fn from_str(s: &str) -> Result<Self> {
            match s.to_ascii_uppercase().replace('-', "_").as_str() {
                "UPC_A" | "UPCA" => Ok(Symbology::UpcA),
                "UPC_E" | "UPCE" => Ok(Symbology::UpcE),
                "EAN13" => Ok(Symbology::Ean13),
                "EAN8" => Ok(Symbology::Ean8),
                "CODE39" => Ok(Symbology::Code39),
                "ITF" => Ok(Symbology::Itf),
                "NW7" | "CODABAR" => Ok(Symbology::Nw7),
                "CODE93" => Ok(Symbology::Code93),
                "CODE128" => Ok(Symbology::Code128),
                _ => Err(TintaError::Barcode(format!("unknown barcode type '{}'", s))),
            }
        }
    }

    /// HRI (Human Readable Interpretation) position
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub enum HriPosition {
        /// No HRI text printed
        Off,
        /// HRI above barcode
        Above,
        /// HRI below barcode (default)
        #[default]
        Below,
        /// HRI both above and below
        Both,
    }

    impl HriPosition {
        pub fn command(self) -> Command {
            match self {
                HriPosition::Off => Command::BarcodeHriOff,
                HriPosition::Above => Command::BarcodeHriAbove,
                HriPosition::Below => Command::BarcodeHriBelow,
                HriPosition::Both => Command::BarcodeHriBoth,
            }
        }
    }

    impl FromStr for HriPosition {
        type Err = TintaError;

        fn from_str(s: &str) -> Result<Self> {
            match s.to_ascii_lowercase().as_str() {
                "off" | "none" => Ok(HriPosition::Off),
                "abv" | "above" => Ok(HriPosition::Above),
                "blw" | "below" => Ok(HriPosition::Below),
                "bth" | "both" => Ok(HriPosition::Both),
                other => Err(TintaError::InvalidCommand(format!(
                    "unknown HRI position '{}'",
                    other
                ))),
            }
        }
    }

    /// HRI font selection
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub enum HriFont {
        #[default]
        A,
        B,
    }

    impl HriFont {
        pub fn command(self) -> Command {
            match self {
                HriFont::A => Command::BarcodeFontA,
                HriFont::B => Command::BarcodeFontB,
            }
        }
    }

    /// Rendering options for [`encode`].
    ///
    /// `None` fields fall back to the printer defaults. An unset `position`
    /// means HRI below the bars, except on Daruma where it means no HRI.
    /// `include_parity` defaults to appending the EAN check digit, except on
    /// Bematech where the printer computes it itself.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct BarcodeOptions {
        /// Module width step, 1-5
        pub width: Option<u8>,
        /// Bar height in dots, 1-255
        pub height: Option<u16>,
        pub position: Option<HriPosition>,
        pub font: HriFont,
        pub include_parity: Option<bool>,
    }

    impl BarcodeOptions {
        pub fn with_width(mut self, width: u8) -> Self {
            self.width = Some(width);
            self
        }

        pub fn with_height(mut self, height: u16) -> Self {
            self.height = Some(height);
            self
        }

        pub fn with_position(mut self, position: HriPosition) -> Self {
            self.position = Some(position);
            self
        }

        pub fn with_font(mut self, font: HriFont) -> Self {
            self.font = font;
            self
        }

        pub fn with_parity(mut self, include: bool) -> Self {
            self.include_parity = Some(include);
            self
        }
    }

    /// Reject payloads the printer would misprint. Runs before any bytes are built.
    pub fn validate(code: &str, symbology: Symbology) -> Result<()> {
        if let Some(digits) = symbology.required_digits() {
            let count = code.chars().count();
            if count != digits {
                return Err(TintaError::Barcode(format!(
                    "{:?} requires code length {}, got {}",
                    symbology, digits, count
                )));
            }
            if !code.chars().all(|c| c.is_ascii_digit()) {
                return Err(TintaError::Barcode(format!(
                    "{:?} accepts digits only, got '{}'",
                    symbology, code
                )));
            }
        }
        if !code.is_ascii() {
            return Err(TintaError::Barcode(format!(
                "barcode data must be ASCII, got '{}'",
                code
            )));
        }
        Ok(())
    }

    /// Full barcode sequence for `dialect`, including the format selectors.
    pub fn encode(
        dialect: Dialect,
        code: &str,
        symbology: Symbology,
        options: &BarcodeOptions,
    ) -> Result<Vec<u8>> {
        validate(code, symbology)?;
        match dialect {
            Dialect::Daruma => encode_daruma(code, symbology, options),
            _ => encode_escpos(dialect, code, symbology, options),
        }
    }

    /// # GS k (ESC/POS, Bematech, QS printers)
    fn encode_escpos(
        dialect: Dialect,
        code: &str,
        symbology: Symbology,
        options: &BarcodeOptions,
    ) -> Result<Vec<u8>> {
        let qs = dialect == Dialect::QsPrinter;
        let mut out = Vec::with_capacity(code.len() + 24);

        if qs {
            out.extend_from_slice(commands::resolve(dialect, Command::BarcodeModeOn)?);
        } else {
            match options.width.and_then(commands::barcode_width) {
                Some(width) => out.extend(width),
                None => {
                    if let Some(width) = options.width {
                        warn!(width, "barcode width out of range 1-5, using printer default");
                    }
                    let default = commands::resolve(dialect, Command::BarcodeWidthDefault)?;
                    out.extend_from_slice(default);
                }
            }
        }

        match options.height {
            Some(height @ 1..=255) => out.extend(commands::barcode_height(height as u8)),
            other => {
                if let Some(height) = other {
                    warn!(height, "barcode height out of range 1-255, using printer default");
                }
                out.extend_from_slice(commands::resolve(dialect, Command::BarcodeHeightDefault)?);
            }
        }

        if !qs {
            out.extend_from_slice(commands::resolve(dialect, options.font.command())?);
        }
        let position = options.position.unwrap_or_default();
        out.extend_from_slice(commands::resolve(dialect, position.command())?);
        out.extend_from_slice(commands::resolve(dialect, symbology.command())?);

        if symbology.length_prefixed() {
            out.push(code_length(code)?);
        }
        out.extend_from_slice(code.as_bytes());

        let include_parity = options
            .include_parity
            .unwrap_or(dialect != Dialect::Bematech);
        if include_parity && symbology.required_digits().is_some() {
            out.push(parity_digit(code)?);
        }
        out.push(NUL);

        if qs {
            out.extend_from_slice(commands::resolve(dialect, Command::BarcodeModeOff)?);
        }
        Ok(out)
    }

    /// # ESC b t w h p data NUL (Daruma)
    ///
    /// | Field | Values |
    /// |-------|--------|
    /// | t | EAN13 1, EAN8 2, ITF 4, CODE128 5, CODE39 6, CODE93 7, UPC-A 8, NW7 9 |
    /// | w | 2 normal, 3 double, 5 quadruple |
    /// | h | 50-255 dots |
    /// | p | 1 = HRI below, 0 = none (default) |
    ///
    /// The printer computes check digits itself.
    fn encode_daruma(
        code: &str,
        symbology: Symbology,
        options: &BarcodeOptions,
    ) -> Result<Vec<u8>> {
        let kind = match symbology {
            Symbology::Ean13 => 1,
            Symbology::Ean8 => 2,
            Symbology::Itf => 4,
            Symbology::Code128 => 5,
            Symbology::Code39 => 6,
            Symbology::Code93 => 7,
            Symbology::UpcA => 8,
            Symbology::Nw7 => 9,
            Symbology::UpcE => {
                return Err(TintaError::Barcode(
                    "UPC-E is not available for daruma printers".into(),
                ));
            }
        };
        let width = match options.width.unwrap_or(1) {
            0 | 1 => 2,
            2 => 3,
            _ => 5,
        };
        let height = options.height.unwrap_or(50).clamp(50, 255) as u8;
        let hri = u8::from(options.position == Some(HriPosition::Below));

        let mut out = Vec::with_capacity(code.len() + 7);
        out.extend_from_slice(&[ESC, 0x62, kind, width, height, hri]);
        out.extend_from_slice(code.as_bytes());
        out.push(NUL);
        Ok(out)
    }

}

// ============================================================================
// QR CODES
// ============================================================================

/// QR code command builders
///
/// ## Generic (GS Z / ESC Z)
///
/// ```text
/// GS Z 02   ESC Z   v   level   size   nL nH   data
/// ```
///
/// ## QS printers (three phases)
///
/// | Phase | Bytes |
/// |-------|-------|
/// | Pixel size | 1B 23 23 51 50 49 58 n (1-24, default 12) |
/// | Version | 1D 28 6B 03 00 31 43 v (1-16, default 3) |
/// | Level | 1D 28 6B 03 00 31 45 (48 + L/M/Q/H) |
/// | Store | 1D 28 6B pL pH 31 50 30 data |
/// | Print | 1D 28 6B pL pH 31 51 30 |
///
/// `pL pH` is the little-endian data length plus 3.
///
/// ## Bematech (GS k Q)
///
/// ```text
/// 1D 6B 51 03 08 08 01 nL nH data
/// ```
///
/// ## Daruma (ESC 81)
///
/// ```text
/// 1B 81 (n & 0xFF) + 2  n >> 8  module  ecc  data
/// ```
pub mod qr {
    use std::str::FromStr;

    use tracing::warn;

    use super::super::commands::{self, Command, Dialect, GS, u16_le};
    use crate::error::{Result, TintaError};

    /// QS printer payload limit in bytes
    pub const QSPRINTER_MAX_DATA: usize = 2710;

    /// Daruma payload limit in bytes
    pub const DARUMA_MAX_DATA: usize = 700;

    /// QR error correction level
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub enum QrLevel {
        /// ~7% recovery
        #[default]
        L,
        /// ~15% recovery
        M,
        /// ~25% recovery
        Q,
        /// ~30% recovery
        H,
    }

    impl QrLevel {
        fn letter(self) -> u8 {
            match self {
                QrLevel::L => b'L',
                QrLevel::M => b'M',
                QrLevel::Q => b'Q',
                QrLevel::H => b'H',
            }
        }

        /// Level as understood by the `qrcode` crate.
        pub fn ec_level(self) -> qrcode::EcLevel {
            match self {
                QrLevel::L => qrcode::EcLevel::L,
                QrLevel::M => qrcode::EcLevel::M,
                QrLevel::Q => qrcode::EcLevel::Q,
                QrLevel::H => qrcode::EcLevel::H,
            }
        }
    }

    impl FromStr for QrLevel {
        type Err = TintaError;

        fn from_str(s: &str) -> Result<Self> {
            match s.to_ascii_uppercase().as_str() {
                "L" => Ok(QrLevel::L),
                "M" => Ok(QrLevel::M),
                "Q" => Ok(QrLevel::Q),
                "H" => Ok(QrLevel::H),
                other => Err(TintaError::InvalidCommand(format!("unknown QR level '{}'", other))),
            }
        }
    }

    /// QR parameters; `None` picks the dialect's default.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct QrOptions {
        pub version: Option<u8>,
        pub level: Option<QrLevel>,
        /// Module (cell) size
        pub size: Option<u8>,
    }

    impl QrOptions {
        pub fn with_version(mut self, version: u8) -> Self {
            self.version = Some(version);
            self
        }

        pub fn with_level(mut self, level: QrLevel) -> Self {
            self.level = Some(level);
            self
        }

        pub fn with_size(mut self, size: u8) -> Self {
            self.size = Some(size);
            self
        }
    }

    /// Encode a QR code for `dialect`.
    pub fn encode(dialect: Dialect, content: &str, options: &QrOptions) -> Result<Vec<u8>> {
        match dialect {
            Dialect::Generic => encode_generic(content, options),
            Dialect::QsPrinter => encode_qsprinter(content, options),
            Dialect::Bematech => encode_bematech(content),
            Dialect::Daruma => encode_daruma(content, options),
        }
    }

    fn payload_len(content: &str, max: usize) -> Result<u16> {
        let len = content.len();
        if len > max {
            return Err(TintaError::Barcode(format!(
                "QR payload is {} bytes, max {}",
                len, max
            )));
        }
        u16::try_from(len)
            .map_err(|_| {
                TintaError::Barcode(format!("QR payload is {} bytes, max {}", len, u16::MAX))
            })
    }

    fn encode_generic(content: &str, options: &QrOptions) -> Result<Vec<u8>> {
        let len = payload_len(content, u16::MAX as usize)?;
        let mut out = Vec::with_capacity(content.len() + 10);
        out.extend_from_slice(commands::resolve(Dialect::Generic, Command::Code2dQr)?);
        out.extend_from_slice(commands::resolve(Dialect::Generic, Command::Code2dPrint)?);
        out.push(options.version.unwrap_or(3));
        out.push(options.level.unwrap_or_default().letter());
        out.push(options.size.unwrap_or(6));
        out.extend_from_slice(&u16_le(len));
        out.extend_from_slice(content.as_bytes());
        Ok(out)
    }

    /// Clamp a QS printer parameter; 0 and `None` mean "default".
    fn qs_param(param: &str, value: Option<u8>, min: u8, max: u8, default: u8) -> u8 {
        match value {
            None | Some(0) => default,
            Some(v) if v < min || v > max => {
                let clamped = v.clamp(min, max);
                warn!(param, value = v, clamped, "QR parameter out of range");
                clamped
            }
            Some(v) => v,
        }
    }

    fn encode_qsprinter(content: &str, options: &QrOptions) -> Result<Vec<u8>> {
        if content.is_empty() {
            return Err(TintaError::Barcode(format!(
                "QR payload must be between 1 and {} bytes",
                QSPRINTER_MAX_DATA
            )));
        }
        let len = payload_len(content, QSPRINTER_MAX_DATA)? + 3;

        let size = qs_param("size", options.size, 1, 24, 12);
        let version = qs_param("version", options.version, 1, 16, 3);
        let level = 48 + options.level.unwrap_or_default() as u8;

        let mut out = Vec::with_capacity(content.len() + 40);
        out.extend_from_slice(&[0x1B, 0x23, 0x23, 0x51, 0x50, 0x49, 0x58, size]);
        out.extend_from_slice(&[GS, 0x28, 0x6B, 0x03, 0x00, 0x31, 0x43, version]);
        out.extend_from_slice(&[GS, 0x28, 0x6B, 0x03, 0x00, 0x31, 0x45, level]);

        out.extend_from_slice(&[GS, 0x28, 0x6B]);
        out.extend_from_slice(&u16_le(len));
        out.extend_from_slice(&[0x31, 0x50, 0x30]);
        out.extend_from_slice(content.as_bytes());

        out.extend_from_slice(&[GS, 0x28, 0x6B]);
        out.extend_from_slice(&u16_le(len));
        out.extend_from_slice(&[0x31, 0x51, 0x30]);
        Ok(out)
    }

    fn encode_bematech(content: &str) -> Result<Vec<u8>> {
        let len = payload_len(content, u16::MAX as usize)?;
        let mut out = Vec::with_capacity(content.len() + 9);
        out.extend_from_slice(&[GS, 0x6B, 0x51, 0x03, 0x08, 0x08, 0x01]);
        out.extend_from_slice(&u16_le(len));
        out.extend_from_slice(content.as_bytes());
        Ok(out)
    }

    fn encode_daruma(content: &str, options: &QrOptions) -> Result<Vec<u8>> {
        let len = payload_len(content, DARUMA_MAX_DATA)?;
        let ecc = match options.level {
            None => 0,
            Some(QrLevel::L) | Some(QrLevel::M) => 77,
            Some(QrLevel::Q) => 81,
            Some(QrLevel::H) => 72,
        };
        let module = options.size.map_or(7, |s| s.clamp(4, 7));

        let mut out = Vec::with_capacity(content.len() + 6);
        // Length field counts the two option bytes that follow it.
        let header_len = len + 2;
        out.extend_from_slice(&[0x1B, 0x81]);
        out.extend_from_slice(&u16_le(header_len));
        out.extend_from_slice(&[module, ecc]);
        out.extend_from_slice(content.as_bytes());
        Ok(out)
    }

}
