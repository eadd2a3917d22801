//! # ESC/POS Command Table
//!
//! Symbolic opcodes for ESC/POS thermal printers and the brand dialects that
//! diverge from it (Bematech, Daruma and the "qsprinter" model).
//!
//! ## Resolution
//!
//! Dialect differences are data, not subclasses. Every [`Command`] has an
//! entry in the generic table unless it only exists on one model; a dialect
//! carries a flat override table that is consulted first:
//!
//! ```text
//! lookup(dialect, cmd) = overrides(dialect)[cmd] or generic[cmd]
//! ```
//!
//! ## Byte Order
//!
//! Multi-byte integers use **little-endian** encoding:
//! - `u16` value 0x1234 is sent as bytes `[0x34, 0x12]`
//!
//! ## Example
//!
//! ```
//! use tinta::protocol::commands::{self, Command, Dialect};
//!
//! let generic = commands::lookup(Dialect::Generic, Command::AlignCenter);
//! assert_eq!(generic, Some(&[0x1B, 0x61, 0x01][..]));
//! let daruma = commands::lookup(Dialect::Daruma, Command::AlignCenter);
//! assert_eq!(daruma, Some(&[0x1B, 0x6A, 0x01][..]));
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TintaError};

// ============================================================================
// CONTROL BYTES
// ============================================================================

/// LF (Line Feed) - Print and advance one line
pub const LF: u8 = 0x0A;

/// FF (Form Feed)
pub const FF: u8 = 0x0C;

/// CR (Carriage Return)
pub const CR: u8 = 0x0D;

/// HT (Horizontal Tab)
pub const HT: u8 = 0x09;

/// VT (Vertical Tab)
pub const VT: u8 = 0x0B;

/// FS (File Separator) - Kanji/extended command prefix
pub const FS: u8 = 0x1C;

/// GS (Group Separator) - Extended command prefix
///
/// Used for barcodes, raster graphics, character size and paper cut.
pub const GS: u8 = 0x1D;

/// DLE (Data Link Escape) - Real-time command prefix
pub const DLE: u8 = 0x10;

/// EOT (End of Transmission) - Second byte of the status queries
pub const EOT: u8 = 0x04;

/// NUL - Barcode payload terminator
pub const NUL: u8 = 0x00;

/// ESC (Escape) - Command prefix byte
pub const ESC: u8 = 0x1B;

/// Line terminator appended by `text`/`println`.
pub const EOL: &[u8] = b"\n";

// ============================================================================
// DIALECTS
// ============================================================================

/// Brand or model specific variant of the opcode table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// Plain ESC/POS (Epson-compatible)
    #[default]
    Generic,
    /// Bematech ESC/Bema printers
    Bematech,
    /// Daruma printers
    Daruma,
    /// QS printers: ESC/POS with their own barcode and QR command families
    #[serde(rename = "qsprinter")]
    QsPrinter,
}

impl Dialect {
    /// All dialects, in declaration order.
    pub const ALL: [Dialect; 4] = [
        Dialect::Generic,
        Dialect::Bematech,
        Dialect::Daruma,
        Dialect::QsPrinter,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Dialect::Generic => "generic",
            Dialect::Bematech => "bematech",
            Dialect::Daruma => "daruma",
            Dialect::QsPrinter => "qsprinter",
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Dialect {
    type Err = TintaError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "generic" | "escpos" => Ok(Dialect::Generic),
            "bematech" => Ok(Dialect::Bematech),
            "daruma" => Ok(Dialect::Daruma),
            "qsprinter" | "qs" => Ok(Dialect::QsPrinter),
            other => Err(TintaError::InvalidCommand(format!(
                "unknown dialect '{}'",
                other
            ))),
        }
    }
}

// ============================================================================
// SYMBOLIC COMMANDS
// ============================================================================

/// Symbolic name of a fixed opcode sequence.
///
/// Parameterized opcodes (sizes, heights, spacing values) are functions in
/// this module instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    // Feed control
    FeedLf,
    FeedGlf,
    FeedFf,
    FeedCr,
    FeedHt,
    FeedVt,

    // Spacing defaults
    CharacterSpacingDefault,
    LineSpacingDefault,

    // Hardware
    HardwareInit,
    HardwareSelect,
    HardwareReset,

    // Cash drawer
    CashDrawerKick2,
    CashDrawerKick5,

    // Paper
    PaperFullCut,
    PaperPartialCut,

    // Text format
    TextNormal,
    TextDoubleHeight,
    TextDoubleWidth,
    TextQuadruple,
    UnderlineOff,
    UnderlineOn,
    Underline2On,
    BoldOff,
    BoldOn,
    ItalicOff,
    ItalicOn,
    FontA,
    FontB,
    FontC,
    AlignLeft,
    AlignCenter,
    AlignRight,

    // Barcode format
    BarcodeHriOff,
    BarcodeHriAbove,
    BarcodeHriBelow,
    BarcodeHriBoth,
    BarcodeFontA,
    BarcodeFontB,
    BarcodeHeightDefault,
    BarcodeWidthDefault,
    BarcodeUpcA,
    BarcodeUpcE,
    BarcodeEan13,
    BarcodeEan8,
    BarcodeCode39,
    BarcodeItf,
    BarcodeNw7,
    BarcodeCode93,
    BarcodeCode128,
    /// QS printers only
    BarcodeModeOn,
    /// QS printers only
    BarcodeModeOff,

    // 2D codes
    Code2dQr,
    Code2dPrint,

    // Raster (GS v 0)
    RasterNormal,
    RasterDoubleWidth,
    RasterDoubleHeight,
    RasterQuadruple,

    // Bit image (ESC *)
    BitmapS8,
    BitmapD8,
    BitmapS24,
    BitmapD24,

    Beep,

    // Color
    ColorBlack,
    ColorRed,
    ReverseOn,
    ReverseOff,
}

impl Command {
    /// Every symbolic command, used to check table coverage.
    pub const ALL: &'static [Command] = &[
        Command::FeedLf,
        Command::FeedGlf,
        Command::FeedFf,
        Command::FeedCr,
        Command::FeedHt,
        Command::FeedVt,
        Command::CharacterSpacingDefault,
        Command::LineSpacingDefault,
        Command::HardwareInit,
        Command::HardwareSelect,
        Command::HardwareReset,
        Command::CashDrawerKick2,
        Command::CashDrawerKick5,
        Command::PaperFullCut,
        Command::PaperPartialCut,
        Command::TextNormal,
        Command::TextDoubleHeight,
        Command::TextDoubleWidth,
        Command::TextQuadruple,
        Command::UnderlineOff,
        Command::UnderlineOn,
        Command::Underline2On,
        Command::BoldOff,
        Command::BoldOn,
        Command::ItalicOff,
        Command::ItalicOn,
        Command::FontA,
        Command::FontB,
        Command::FontC,
        Command::AlignLeft,
        Command::AlignCenter,
        Command::AlignRight,
        Command::BarcodeHriOff,
        Command::BarcodeHriAbove,
        Command::BarcodeHriBelow,
        Command::BarcodeHriBoth,
        Command::BarcodeFontA,
        Command::BarcodeFontB,
        Command::BarcodeHeightDefault,
        Command::BarcodeWidthDefault,
        Command::BarcodeUpcA,
        Command::BarcodeUpcE,
        Command::BarcodeEan13,
        Command::BarcodeEan8,
        Command::BarcodeCode39,
        Command::BarcodeItf,
        Command::BarcodeNw7,
        Command::BarcodeCode93,
        Command::BarcodeCode128,
        Command::BarcodeModeOn,
        Command::BarcodeModeOff,
        Command::Code2dQr,
        Command::Code2dPrint,
        Command::RasterNormal,
        Command::RasterDoubleWidth,
        Command::RasterDoubleHeight,
        Command::RasterQuadruple,
        Command::BitmapS8,
        Command::BitmapD8,
        Command::BitmapS24,
        Command::BitmapD24,
        Command::Beep,
        Command::ColorBlack,
        Command::ColorRed,
        Command::ReverseOn,
        Command::ReverseOff,
    ];
}

// ============================================================================
// TABLES
// ============================================================================

/// Generic ESC/POS opcodes. `None` marks model-only commands.
fn generic(cmd: Command) -> Option<&'static [u8]> {
    use Command::*;
    let bytes: &'static [u8] = match cmd {
        FeedLf => &[LF],
        FeedGlf => &[0x4A, 0x00],
        FeedFf => &[FF],
        FeedCr => &[CR],
        FeedHt => &[HT],
        FeedVt => &[VT],

        CharacterSpacingDefault => &[ESC, 0x20, 0x00],
        LineSpacingDefault => &[ESC, 0x32],

        HardwareInit => &[ESC, 0x40],
        HardwareSelect => &[ESC, 0x3D, 0x01],
        HardwareReset => &[ESC, 0x3F, 0x0A, 0x00],

        CashDrawerKick2 => &[ESC, 0x70, 0x00, 0x19, 0xFA],
        CashDrawerKick5 => &[ESC, 0x70, 0x01, 0x19, 0xFA],

        PaperFullCut => &[GS, 0x56, 0x00],
        PaperPartialCut => &[GS, 0x56, 0x01],

        TextNormal => &[ESC, 0x21, 0x00],
        TextDoubleHeight => &[ESC, 0x21, 0x10],
        TextDoubleWidth => &[ESC, 0x21, 0x20],
        TextQuadruple => &[ESC, 0x21, 0x30],
        UnderlineOff => &[ESC, 0x2D, 0x00],
        UnderlineOn => &[ESC, 0x2D, 0x01],
        Underline2On => &[ESC, 0x2D, 0x02],
        BoldOff => &[ESC, 0x45, 0x00],
        BoldOn => &[ESC, 0x45, 0x01],
        ItalicOff => &[ESC, 0x35],
        ItalicOn => &[ESC, 0x34],
        FontA => &[ESC, 0x4D, 0x00],
        FontB => &[ESC, 0x4D, 0x01],
        FontC => &[ESC, 0x4D, 0x02],
        AlignLeft => &[ESC, 0x61, 0x00],
        AlignCenter => &[ESC, 0x61, 0x01],
        AlignRight => &[ESC, 0x61, 0x02],

        BarcodeHriOff => &[GS, 0x48, 0x00],
        BarcodeHriAbove => &[GS, 0x48, 0x01],
        BarcodeHriBelow => &[GS, 0x48, 0x02],
        BarcodeHriBoth => &[GS, 0x48, 0x03],
        BarcodeFontA => &[GS, 0x66, 0x00],
        BarcodeFontB => &[GS, 0x66, 0x01],
        BarcodeHeightDefault => &[GS, 0x68, 0x64],
        BarcodeWidthDefault => &[GS, 0x77, 0x01],
        BarcodeUpcA => &[GS, 0x6B, 0x00],
        BarcodeUpcE => &[GS, 0x6B, 0x01],
        BarcodeEan13 => &[GS, 0x6B, 0x02],
        BarcodeEan8 => &[GS, 0x6B, 0x03],
        BarcodeCode39 => &[GS, 0x6B, 0x04],
        BarcodeItf => &[GS, 0x6B, 0x05],
        BarcodeNw7 => &[GS, 0x6B, 0x06],
        BarcodeCode93 => &[GS, 0x6B, 0x48],
        BarcodeCode128 => &[GS, 0x6B, 0x49],
        BarcodeModeOn | BarcodeModeOff => return None,

        Code2dQr => &[GS, b'Z', 0x02],
        Code2dPrint => &[ESC, b'Z'],

        RasterNormal => &[GS, 0x76, 0x30, 0x00],
        RasterDoubleWidth => &[GS, 0x76, 0x30, 0x01],
        RasterDoubleHeight => &[GS, 0x76, 0x30, 0x02],
        RasterQuadruple => &[GS, 0x76, 0x30, 0x03],

        BitmapS8 => &[ESC, 0x2A, 0x00],
        BitmapD8 => &[ESC, 0x2A, 0x01],
        BitmapS24 => &[ESC, 0x2A, 0x20],
        BitmapD24 => &[ESC, 0x2A, 0x21],

        Beep => &[ESC, 0x42],

        ColorBlack => &[ESC, 0x72, 0x00],
        ColorRed => &[ESC, 0x72, 0x01],
        ReverseOn => &[GS, b'B', b'1'],
        ReverseOff => &[GS, b'B', b'0'],
    };
    Some(bytes)
}

type OverrideTable = &'static [(Command, &'static [u8])];

const BEMATECH: OverrideTable = &[
    (Command::PaperFullCut, &[ESC, 0x69]),
    (Command::PaperPartialCut, &[ESC, 0x6D]),
    (Command::TextDoubleHeight, &[ESC, 0x64, 0x31]),
    (Command::TextDoubleWidth, &[ESC, 0x57, 0x31]),
    (Command::TextQuadruple, &[ESC, 0x57, 0x31, ESC, 0x64, 0x31]),
    (Command::BitmapS8, &[ESC, 0x4B]),
    (Command::BitmapD8, &[ESC, 0x4B]),
    (Command::BitmapS24, &[ESC, 0x2A, 0x21]),
    (Command::BitmapD24, &[ESC, 0x2A, 0x21]),
];

const DARUMA: OverrideTable = &[
    (Command::Beep, &[ESC, 0x07]),
    (Command::PaperFullCut, &[ESC, 0x6D]),
    (Command::PaperPartialCut, &[ESC, 0x6D]),
    (Command::AlignLeft, &[ESC, 0x6A, 0x00]),
    (Command::AlignCenter, &[ESC, 0x6A, 0x01]),
    (Command::AlignRight, &[ESC, 0x6A, 0x02]),
    (Command::TextNormal, &[ESC, 0x14]),
    (Command::TextDoubleWidth, &[ESC, 0x0E]),
    (Command::TextDoubleHeight, &[ESC, 0x77]),
    (Command::TextQuadruple, &[ESC, 0x0E]),
    (Command::BoldOn, &[ESC, 0x45]),
    (Command::BoldOff, &[ESC, 0x46]),
    (Command::ItalicOff, &[ESC, 0x34, 0x00]),
    (Command::ItalicOn, &[ESC, 0x34, 0x01]),
    (Command::FontA, &[ESC, 0x21, 0x00, 0x00]),
    (Command::FontB, &[ESC, 0x21, 0x00, 0x01]),
    (Command::RasterNormal, &[DLE, 0x58, 0x00]),
    (Command::RasterDoubleWidth, &[DLE, 0x58, 0x01]),
    (Command::RasterDoubleHeight, &[DLE, 0x58, 0x02]),
    (Command::RasterQuadruple, &[DLE, 0x58, 0x03]),
];

const QSPRINTER: OverrideTable = &[
    (Command::BarcodeModeOn, &[GS, 0x45, 0x43, 0x01]),
    (Command::BarcodeModeOff, &[GS, 0x45, 0x43, 0x00]),
    // Default height 162 dots
    (Command::BarcodeHeightDefault, &[GS, 0x68, 0xA2]),
];

fn overrides(dialect: Dialect) -> OverrideTable {
    match dialect {
        Dialect::Generic => &[],
        Dialect::Bematech => BEMATECH,
        Dialect::Daruma => DARUMA,
        Dialect::QsPrinter => QSPRINTER,
    }
}

/// Commands a dialect does not support even though the generic table has them.
fn unsupported(dialect: Dialect, cmd: Command) -> bool {
    matches!((dialect, cmd), (Dialect::Daruma, Command::FontC))
}

/// Resolve a symbolic command in the given dialect.
///
/// Returns `None` when the dialect has no such opcode.
pub fn lookup(dialect: Dialect, cmd: Command) -> Option<&'static [u8]> {
    if unsupported(dialect, cmd) {
        return None;
    }
    overrides(dialect)
        .iter()
        .find(|(key, _)| *key == cmd)
        .map(|(_, bytes)| *bytes)
        .or_else(|| generic(cmd))
}

/// Resolve a symbolic command, turning a miss into [`TintaError::InvalidCommand`].
pub fn resolve(dialect: Dialect, cmd: Command) -> Result<&'static [u8]> {
    lookup(dialect, cmd).ok_or_else(|| {
        TintaError::InvalidCommand(format!("{:?} is not available for {} printers", cmd, dialect))
    })
}

// ============================================================================
// PARAMETERIZED COMMANDS
// ============================================================================

/// # Custom Character Size (GS ! n)
///
/// `n = width * 16 + height`, where both components are 0-based magnification
/// steps (0 = 1x, 7 = 8x). Out-of-range components clamp to [0, 7].
///
/// ```
/// use tinta::protocol::commands::custom_size;
///
/// assert_eq!(custom_size(1, 1), vec![0x1D, 0x21, 0x11]);
/// assert_eq!(custom_size(9, 3), vec![0x1D, 0x21, 0x73]);
/// ```
pub fn custom_size(width: u8, height: u8) -> Vec<u8> {
    let width = width.min(7);
    let height = height.min(7);
    vec![GS, 0x21, width * 16 + height]
}

/// # Barcode Height (GS h n)
///
/// `height` is in dots, 1-255.
#[inline]
pub fn barcode_height(height: u8) -> Vec<u8> {
    vec![GS, 0x68, height]
}

/// # Barcode Module Width (GS w n)
///
/// Width steps 1-5 map to `n = 2..=6`. Returns `None` outside that range so
/// the caller can fall back to [`Command::BarcodeWidthDefault`].
pub fn barcode_width(width: u8) -> Option<Vec<u8>> {
    match width {
        1..=5 => Some(vec![GS, 0x77, width + 1]),
        _ => None,
    }
}

/// Set right-side character spacing (ESC SP n)
#[inline]
pub fn character_spacing(n: u8) -> Vec<u8> {
    vec![ESC, 0x20, n]
}

/// Set line spacing to `n` dots (ESC 3 n)
#[inline]
pub fn line_spacing(n: u8) -> Vec<u8> {
    vec![ESC, 0x33, n]
}

/// Select character code table (ESC t n)
#[inline]
pub fn code_table(n: u8) -> Vec<u8> {
    vec![ESC, 0x74, n]
}

/// Page margins
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Margin {
    Bottom,
    Left,
    Right,
}

/// Fix a margin (ESC O n / ESC l n / ESC Q n)
pub fn margin(side: Margin, n: u8) -> Vec<u8> {
    let op = match side {
        Margin::Bottom => 0x4F,
        Margin::Left => 0x6C,
        Margin::Right => 0x51,
    };
    vec![ESC, op, n]
}

/// Buzzer: `times` beeps of `duration * 100` ms (ESC B n t)
///
/// Daruma's buzzer takes no parameters.
pub fn beep(dialect: Dialect, times: u8, duration: u8) -> Result<Vec<u8>> {
    let mut cmd = resolve(dialect, Command::Beep)?.to_vec();
    if dialect != Dialect::Daruma {
        cmd.push(times);
        cmd.push(duration);
    }
    Ok(cmd)
}

/// # Transmit Real-Time Status (DLE EOT n)
///
/// `n` selects the class: 1 printer, 2 offline cause, 3 error cause,
/// 4 roll paper sensor.
#[inline]
pub const fn status_query(n: u8) -> [u8; 3] {
    [DLE, EOT, n]
}

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

/// Encode a u16 value as little-endian bytes [low, high]
///
/// ```
/// use tinta::protocol::commands::u16_le;
///
/// assert_eq!(u16_le(0x1234), [0x34, 0x12]);
/// assert_eq!(u16_le(576), [0x40, 0x02]);
/// ```
#[inline]
pub const fn u16_le(value: u16) -> [u8; 2] {
    [value as u8, (value >> 8) as u8]
}

/// Parse a space- or colon-separated hex dump into bytes.
///
/// Accepts `"1d:77:06"`, `"1d 77 06"` and `"1d7706"`.
pub fn parse_hex(s: &str) -> Result<Vec<u8>> {
    let digits: Vec<char> = s
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ':')
        .collect();
    if digits.len() % 2 != 0 {
        return Err(TintaError::InvalidCommand(format!(
            "hex string has an odd number of digits: '{}'",
            s
        )));
    }
    digits
        .chunks(2)
        .map(|pair| {
            let hi = pair[0].to_digit(16);
            let lo = pair[1].to_digit(16);
            match (hi, lo) {
                (Some(hi), Some(lo)) => Ok((hi * 16 + lo) as u8),
                _ => Err(TintaError::InvalidCommand(format!(
                    "invalid hex byte '{}{}'",
                    pair[0], pair[1]
                ))),
            }
        })
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================
