//! # Text Charsets
//!
//! Turns Unicode strings into the single- or multi-byte encoding the printer
//! has been told to expect. Any label known to the WHATWG Encoding Standard
//! works (`GB18030`, `Shift_JIS`, `EUC-KR`, `Big5`, `windows-1252`, ...),
//! plus IBM Code Page 437, which most ESC/POS printers ship as table 0.
//!
//! Characters the charset cannot represent are an error, never a silent `?`.

use encoding_rs::Encoding;

use crate::error::{Result, TintaError};

/// Default charset label, matching the printers this crate grew up with.
pub const DEFAULT_ENCODING: &str = "GB18030";

/// CP437 upper half: the characters at bytes 0x80..=0xFF, in order.
const CP437_HIGH: [char; 128] = [
    'Ç', 'ü', 'é', 'â', 'ä', 'à', 'å', 'ç', 'ê', 'ë', 'è', 'ï', 'î', 'ì', 'Ä', 'Å', //
    'É', 'æ', 'Æ', 'ô', 'ö', 'ò', 'û', 'ù', 'ÿ', 'Ö', 'Ü', '¢', '£', '¥', '₧', 'ƒ', //
    'á', 'í', 'ó', 'ú', 'ñ', 'Ñ', 'ª', 'º', '¿', '⌐', '¬', '½', '¼', '¡', '«', '»', //
    '░', '▒', '▓', '│', '┤', '╡', '╢', '╖', '╕', '╣', '║', '╗', '╝', '╜', '╛', '┐', //
    '└', '┴', '┬', '├', '─', '┼', '╞', '╟', '╚', '╔', '╩', '╦', '╠', '═', '╬', '╧', //
    '╨', '╤', '╥', '╙', '╘', '╒', '╓', '╫', '╪', '┘', '┌', '█', '▄', '▌', '▐', '▀', //
    'α', 'ß', 'Γ', 'π', 'Σ', 'σ', 'µ', 'τ', 'Φ', 'Θ', 'Ω', 'δ', '∞', 'φ', 'ε', '∩', //
    '≡', '±', '≥', '≤', '⌠', '⌡', '÷', '≈', '°', '∙', '·', '√', 'ⁿ', '²', '■', '\u{A0}',
];

/// A text encoding the printer understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Charset {
    /// IBM Code Page 437
    Cp437,
    /// Any encoder provided by `encoding_rs`
    Codec(&'static Encoding),
}

impl Charset {
    /// Look a charset up by label (case-insensitive).
    ///
    /// ```
    /// use tinta::protocol::charset::Charset;
    ///
    /// assert_eq!(Charset::for_label("cp437").unwrap(), Charset::Cp437);
    /// assert_eq!(Charset::for_label("gb18030").unwrap().name(), "GB18030");
    /// assert!(Charset::for_label("klingon").is_err());
    /// ```
    pub fn for_label(label: &str) -> Result<Self> {
        let normalized = label.trim().to_ascii_lowercase();
        if matches!(normalized.as_str(), "cp437" | "ibm437" | "pc437" | "437") {
            return Ok(Charset::Cp437);
        }
        let encoding = Encoding::for_label(normalized.as_bytes()).ok_or_else(|| {
            TintaError::Encoding(format!("unknown encoding '{}'", label))
        })?;
        // UTF-16 labels decode fine but encode to UTF-8; refuse them up front
        if encoding.output_encoding() != encoding {
            return Err(TintaError::Encoding(format!(
                "encoding '{}' cannot be used for output",
                label
            )));
        }
        Ok(Charset::Codec(encoding))
    }

    /// Canonical name (`IBM437`, `GB18030`, `Shift_JIS`, ...).
    pub fn name(&self) -> &'static str {
        match self {
            Charset::Cp437 => "IBM437",
            Charset::Codec(encoding) => encoding.name(),
        }
    }

    /// Encode `text`, failing on the first character the charset lacks.
    pub fn encode(&self, text: &str) -> Result<Vec<u8>> {
        match self {
            Charset::Cp437 => encode_cp437(text),
            Charset::Codec(encoding) => {
                let (bytes, _, had_errors) = encoding.encode(text);
                if had_errors {
                    let bad = text
                        .chars()
                        .find(|c| encoding.encode(c.encode_utf8(&mut [0; 4])).2)
                        .unwrap_or('\u{FFFD}');
                    return Err(unmappable(bad, encoding.name()));
                }
                Ok(bytes.into_owned())
            }
        }
    }
}

impl Default for Charset {
    fn default() -> Self {
        Charset::Codec(encoding_rs::GB18030)
    }
}

fn unmappable(ch: char, charset: &str) -> TintaError {
    TintaError::Encoding(format!(
        "character '{}' (U+{:04X}) cannot be represented in {}",
        ch, ch as u32, charset
    ))
}

fn encode_cp437(text: &str) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(text.len());
    for ch in text.chars() {
        if (ch as u32) < 0x80 {
            out.push(ch as u8);
        } else if let Some(pos) = CP437_HIGH.iter().position(|&c| c == ch) {
            out.push(0x80 + pos as u8);
        } else {
            return Err(unmappable(ch, Charset::Cp437.name()));
        }
    }
    Ok(out)
}
