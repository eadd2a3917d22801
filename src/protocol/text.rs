//! # Text Formatting
//!
//! Alignment, font, style and size selectors, plus the double-byte aware
//! length arithmetic used to lay out fixed-width columns.
//!
//! ## Text Styling Overview
//!
//! | Style | Generic | Daruma |
//! |-------|---------|--------|
//! | Bold | ESC E 1 / ESC E 0 | ESC E / ESC F |
//! | Italic | ESC 4 / ESC 5 | ESC 4 1 / ESC 4 0 |
//! | Underline | ESC - n (0, 1, 2 dots) | same |
//! | Size | ESC ! n, GS ! n | ESC 0E, ESC w, ESC 14 |
//!
//! ## Text Alignment
//!
//! ```text
//! Left aligned (default)    |LEFT TEXT
//! Center aligned            |  CENTER TEXT
//! Right aligned             |      RIGHT TEXT
//! ```
//!
//! ## Display Width
//!
//! Code points above 0x7F (and inside the BMP) occupy two columns, the way
//! CJK glyphs do on these printers. Everything else occupies one.
//!
//! ```text
//! "ab中"   a=1  b=1  中=2   total 4
//! ```

use std::fmt;
use std::str::FromStr;

use super::commands::{self, Command, Dialect};
use crate::error::{Result, TintaError};

// ============================================================================
// TEXT ALIGNMENT
// ============================================================================

/// Text alignment options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

impl Alignment {
    pub fn command(self) -> Command {
        match self {
            Alignment::Left => Command::AlignLeft,
            Alignment::Center => Command::AlignCenter,
            Alignment::Right => Command::AlignRight,
        }
    }
}

impl FromStr for Alignment {
    type Err = TintaError;

    /// Accepts `left`/`lt`, `center`/`ct`, `right`/`rt` in any case.
    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "left" | "lt" => Ok(Alignment::Left),
            "center" | "ct" => Ok(Alignment::Center),
            "right" | "rt" => Ok(Alignment::Right),
            other => Err(TintaError::InvalidCommand(format!("unknown alignment '{}'", other))),
        }
    }
}

// ============================================================================
// FONT SELECTION
// ============================================================================

/// Available fonts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Font {
    /// Font A: 12×24 dots
    #[default]
    A,
    /// Font B: 9×17 dots
    B,
    /// Font C (not on Daruma)
    C,
}

impl Font {
    pub fn command(self) -> Command {
        match self {
            Font::A => Command::FontA,
            Font::B => Command::FontB,
            Font::C => Command::FontC,
        }
    }

    /// Characters per line when no explicit width is configured.
    pub fn default_columns(self) -> usize {
        match self {
            Font::A => 42,
            Font::B | Font::C => 56,
        }
    }
}

impl FromStr for Font {
    type Err = TintaError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "a" => Ok(Font::A),
            "b" => Ok(Font::B),
            "c" => Ok(Font::C),
            other => Err(TintaError::InvalidCommand(format!("unknown font '{}'", other))),
        }
    }
}

// ============================================================================
// TEXT STYLE
// ============================================================================

/// Underline thickness
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Underline {
    #[default]
    Off,
    /// 1-dot underline
    Single,
    /// 2-dot underline
    Double,
}

/// Combined bold / italic / underline state.
///
/// Applying a style always emits all three selectors, so a style also turns
/// off whatever it does not mention.
///
/// ## Example
///
/// ```
/// use tinta::protocol::text::{Style, Underline};
///
/// let style: Style = "bu2".parse().unwrap();
/// assert!(style.bold);
/// assert!(!style.italic);
/// assert_eq!(style.underline, Underline::Double);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Style {
    pub bold: bool,
    pub italic: bool,
    pub underline: Underline,
}

impl Style {
    pub const NORMAL: Style = Style {
        bold: false,
        italic: false,
        underline: Underline::Off,
    };

    pub fn new() -> Self {
        Self::default()
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    pub fn underline(mut self, underline: Underline) -> Self {
        self.underline = underline;
        self
    }

    /// Opcodes selecting this style in `dialect`.
    pub fn encode(&self, dialect: Dialect) -> Result<Vec<u8>> {
        let bold = if self.bold { Command::BoldOn } else { Command::BoldOff };
        let italic = if self.italic { Command::ItalicOn } else { Command::ItalicOff };
        let underline = match self.underline {
            Underline::Off => Command::UnderlineOff,
            Underline::Single => Command::UnderlineOn,
            Underline::Double => Command::Underline2On,
        };

        let mut out = Vec::with_capacity(9);
        for cmd in [bold, italic, underline] {
            out.extend_from_slice(commands::resolve(dialect, cmd)?);
        }
        Ok(out)
    }
}

impl FromStr for Style {
    type Err = TintaError;

    /// Parses combinations of `b`, `i`, `u` and `u2` (`"bi"`, `"BIU2"`,
    /// `"iu"`), or `normal`.
    fn from_str(s: &str) -> Result<Self> {
        let lower = s.trim().to_ascii_lowercase();
        if lower.is_empty() || lower == "normal" {
            return Ok(Style::NORMAL);
        }

        let mut style = Style::NORMAL;
        let mut chars = lower.chars().peekable();
        while let Some(ch) = chars.next() {
            match ch {
                'b' if !style.bold => style.bold = true,
                'i' if !style.italic => style.italic = true,
                'u' if style.underline == Underline::Off => {
                    style.underline = if chars.peek() == Some(&'2') {
                        chars.next();
                        Underline::Double
                    } else {
                        Underline::Single
                    };
                }
                _ => {
                    return Err(TintaError::InvalidCommand(format!("unknown style '{}'", s)));
                }
            }
        }
        Ok(style)
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == Style::NORMAL {
            return f.write_str("normal");
        }
        if self.bold {
            f.write_str("b")?;
        }
        if self.italic {
            f.write_str("i")?;
        }
        match self.underline {
            Underline::Off => Ok(()),
            Underline::Single => f.write_str("u"),
            Underline::Double => f.write_str("u2"),
        }
    }
}

// ============================================================================
// CHARACTER SIZE
// ============================================================================

/// # Character Size
///
/// Magnifications 1 and 2 in both directions map onto the dialect's fixed
/// normal / double-width / double-height / quadruple selectors. Anything
/// larger goes through `GS ! n` with 0-based steps, clamped to 8x.
///
/// ```
/// use tinta::protocol::commands::Dialect;
/// use tinta::protocol::text::size;
///
/// assert_eq!(size(Dialect::Generic, 2, 2).unwrap(), vec![0x1B, 0x21, 0x30]);
/// assert_eq!(size(Dialect::Generic, 3, 1).unwrap(), vec![0x1D, 0x21, 0x20]);
/// assert_eq!(size(Dialect::Daruma, 2, 1).unwrap(), vec![0x1B, 0x0E]);
/// ```
pub fn size(dialect: Dialect, width: u8, height: u8) -> Result<Vec<u8>> {
    let fixed = match (width, height) {
        (0 | 1, 0 | 1) => Some(Command::TextNormal),
        (2, 0 | 1) => Some(Command::TextDoubleWidth),
        (0 | 1, 2) => Some(Command::TextDoubleHeight),
        (2, 2) => Some(Command::TextQuadruple),
        _ => None,
    };
    match fixed {
        Some(cmd) => Ok(commands::resolve(dialect, cmd)?.to_vec()),
        None => Ok(commands::custom_size(
            width.saturating_sub(1),
            height.saturating_sub(1),
        )),
    }
}

// ============================================================================
// FEED CONTROL & HARDWARE
// ============================================================================

/// Single-byte feed controls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedControl {
    /// Print and line feed
    Lf,
    /// Print and feed paper (ESC J 0)
    Glf,
    /// Form feed
    Ff,
    /// Carriage return
    Cr,
    /// Horizontal tab
    Ht,
    /// Vertical tab
    Vt,
}

impl FeedControl {
    pub fn command(self) -> Command {
        match self {
            FeedControl::Lf => Command::FeedLf,
            FeedControl::Glf => Command::FeedGlf,
            FeedControl::Ff => Command::FeedFf,
            FeedControl::Cr => Command::FeedCr,
            FeedControl::Ht => Command::FeedHt,
            FeedControl::Vt => Command::FeedVt,
        }
    }
}

impl FromStr for FeedControl {
    type Err = TintaError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "lf" => Ok(FeedControl::Lf),
            "glf" => Ok(FeedControl::Glf),
            "ff" => Ok(FeedControl::Ff),
            "cr" => Ok(FeedControl::Cr),
            "ht" => Ok(FeedControl::Ht),
            "vt" => Ok(FeedControl::Vt),
            other => Err(TintaError::InvalidCommand(format!("unknown feed control '{}'", other))),
        }
    }
}

/// Printer-level hardware commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hardware {
    /// ESC @ - clear buffer, reset modes
    Init,
    /// ESC = 1 - select peripheral
    Select,
    /// Reset
    Reset,
}

impl Hardware {
    pub fn command(self) -> Command {
        match self {
            Hardware::Init => Command::HardwareInit,
            Hardware::Select => Command::HardwareSelect,
            Hardware::Reset => Command::HardwareReset,
        }
    }
}

impl FromStr for Hardware {
    type Err = TintaError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "init" => Ok(Hardware::Init),
            "select" => Ok(Hardware::Select),
            "reset" => Ok(Hardware::Reset),
            other => Err(TintaError::InvalidCommand(format!(
                "unknown hardware command '{}'",
                other
            ))),
        }
    }
}

// ============================================================================
// DISPLAY WIDTH
// ============================================================================

/// Columns a character occupies: 2 for BMP code points above 0x7F, else 1.
#[inline]
pub fn char_width(ch: char) -> usize {
    let code = ch as u32;
    if code > 0x7F && code <= 0xFFFF { 2 } else { 1 }
}

/// Display width of `text` in columns.
///
/// ```
/// use tinta::protocol::text::text_length;
///
/// assert_eq!(text_length("Total"), 5);
/// assert_eq!(text_length("合计 12"), 7);
/// ```
pub fn text_length(text: &str) -> usize {
    text.chars().map(char_width).sum()
}

/// Characters whose running display width falls in `(start, end]`.
///
/// Walks `text` accumulating [`char_width`]; a character is kept when the
/// width *after* it is past `start` and not past `end`. With `end = None`
/// everything after `start` is kept, so
/// `text_substring(s, 0, Some(n)) + text_substring(s, n, None) == s`.
pub fn text_substring(text: &str, start: usize, end: Option<usize>) -> String {
    let mut width = 0;
    let mut out = String::new();
    for ch in text.chars() {
        width += char_width(ch);
        if width > start && end.is_none_or(|end| width <= end) {
            out.push(ch);
        }
    }
    out
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alignment_parse() {
        assert_eq!("CT".parse::<Alignment>().unwrap(), Alignment::Center);
        assert_eq!("right".parse::<Alignment>().unwrap(), Alignment::Right);
        assert!("middle".parse::<Alignment>().is_err());
    }

    #[test]
    fn test_font_default_columns() {
        assert_eq!(Font::A.default_columns(), 42);
        assert_eq!(Font::B.default_columns(), 56);
        assert_eq!(Font::C.default_columns(), 56);
    }

    #[test]
    fn test_style_parse_combinations() {
        let cases = [
            ("b", true, false, Underline::Off),
            ("I", false, true, Underline::Off),
            ("u", false, false, Underline::Single),
            ("U2", false, false, Underline::Double),
            ("bi", true, true, Underline::Off),
            ("biu2", true, true, Underline::Double),
            ("iu", false, true, Underline::Single),
            ("normal", false, false, Underline::Off),
        ];
        for (input, bold, italic, underline) in cases {
            let style: Style = input.parse().unwrap();
            assert_eq!(style, Style { bold, italic, underline }, "{}", input);
        }
        assert!("bx".parse::<Style>().is_err());
        assert!("bb".parse::<Style>().is_err());
    }

    #[test]
    fn test_style_display_roundtrips() {
        for input in ["b", "i", "u", "u2", "biu", "normal"] {
            let style: Style = input.parse().unwrap();
            assert_eq!(style.to_string(), input);
        }
    }

    #[test]
    fn test_style_encode_generic() {
        let style = Style::new().bold().underline(Underline::Double);
        assert_eq!(
            style.encode(Dialect::Generic).unwrap(),
            vec![0x1B, 0x45, 0x01, 0x1B, 0x35, 0x1B, 0x2D, 0x02]
        );
    }

    #[test]
    fn test_style_encode_daruma() {
        let style = Style::new().italic();
        assert_eq!(
            style.encode(Dialect::Daruma).unwrap(),
            vec![0x1B, 0x46, 0x1B, 0x34, 0x01, 0x1B, 0x2D, 0x00]
        );
    }

    #[test]
    fn test_size_fixed_and_custom() {
        assert_eq!(size(Dialect::Generic, 1, 1).unwrap(), vec![0x1B, 0x21, 0x00]);
        assert_eq!(size(Dialect::Generic, 2, 1).unwrap(), vec![0x1B, 0x21, 0x20]);
        assert_eq!(size(Dialect::Generic, 1, 2).unwrap(), vec![0x1B, 0x21, 0x10]);
        assert_eq!(size(Dialect::Bematech, 1, 2).unwrap(), vec![0x1B, 0x64, 0x31]);
        assert_eq!(size(Dialect::Generic, 3, 3).unwrap(), vec![0x1D, 0x21, 0x22]);
        // clamped to 8x
        assert_eq!(size(Dialect::Generic, 20, 1).unwrap(), vec![0x1D, 0x21, 0x70]);
    }

    #[test]
    fn test_text_length_mixed() {
        assert_eq!(text_length(""), 0);
        assert_eq!(text_length("abc"), 3);
        assert_eq!(text_length("abc中"), 5);
        assert_eq!(text_length("é"), 2);
        // outside the BMP counts as one column
        assert_eq!(text_length("😀"), 1);
    }

    #[test]
    fn test_text_substring_ranges() {
        assert_eq!(text_substring("abcdef", 0, Some(3)), "abc");
        assert_eq!(text_substring("abcdef", 3, None), "def");
        assert_eq!(text_substring("中文字", 0, Some(4)), "中文");
        assert_eq!(text_substring("中文字", 4, None), "字");
    }

    #[test]
    fn test_text_substring_split_wide_char() {
        // a wide char straddling the boundary goes to the second half
        let text = "ab中d";
        assert_eq!(text_substring(text, 0, Some(3)), "ab");
        assert_eq!(text_substring(text, 3, None), "中d");
    }

    #[test]
    fn test_text_substring_partitions() {
        let text = "x中y文z";
        for cut in 0..=text_length(text) {
            let head = text_substring(text, 0, Some(cut));
            let tail = text_substring(text, cut, None);
            assert_eq!(format!("{}{}", head, tail), text, "cut {}", cut);
        }
    }

    #[test]
    fn test_feed_control_and_hardware_parse() {
        assert_eq!("GLF".parse::<FeedControl>().unwrap(), FeedControl::Glf);
        assert_eq!("init".parse::<Hardware>().unwrap(), Hardware::Init);
        assert!("tab".parse::<FeedControl>().is_err());
        assert!("reboot".parse::<Hardware>().is_err());
    }
}
