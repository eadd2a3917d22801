//! # Table Layout
//!
//! Fixed-width column layout for receipt lines, aware of double-byte
//! characters (see [`text_length`]).
//!
//! ## Column Budgets
//!
//! ```text
//! base   = line_width / size_w
//! auto   = base / cells            (per Auto cell)
//! frac   = floor(base * fraction)
//! cols   = cols                   (magnified characters, like base)
//! spare  = base - auto * cells     (padding for the last Auto cell that is
//!                                   not centered; 0 when any cell is Cols)
//! ```
//!
//! ## Overflow
//!
//! A cell whose text is longer than its budget shows the first `budget`
//! columns and carries the remainder to a continuation line. Continuation
//! lines repeat until every cell is exhausted; each pass consumes at least
//! one character per non-empty cell.
//!
//! ```text
//! | Espresso dop|   2|  3.50|
//! | pio         |    |      |
//! ```

use crate::error::{Result, TintaError};
use crate::protocol::charset::Charset;
use crate::protocol::commands::{self, Command, Dialect, EOL};
use crate::protocol::text::{self, text_length, text_substring, Alignment, Style};

/// Column width rule.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum CellWidth {
    /// Equal share of the line
    #[default]
    Auto,
    /// Fraction of the line (0.0..=1.0)
    Fraction(f32),
    /// Absolute character columns, counted at the table's size
    Cols(usize),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub text: String,
    pub align: Alignment,
    pub width: CellWidth,
    pub style: Option<Style>,
}

impl Cell {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            align: Alignment::Left,
            width: CellWidth::Auto,
            style: None,
        }
    }

    pub fn align(mut self, align: Alignment) -> Self {
        self.align = align;
        self
    }

    pub fn width(mut self, fraction: f32) -> Self {
        self.width = CellWidth::Fraction(fraction);
        self
    }

    pub fn cols(mut self, cols: usize) -> Self {
        self.width = CellWidth::Cols(cols);
        self
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = Some(style);
        self
    }
}

impl From<&str> for Cell {
    fn from(text: &str) -> Self {
        Cell::new(text)
    }
}

impl From<String> for Cell {
    fn from(text: String) -> Self {
        Cell::new(text)
    }
}

/// Options for [`Printer::table_custom`](super::Printer::table_custom).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableOptions {
    /// Character size multiplier (width, height), 1..=8
    pub size: (u8, u8),
    /// Charset label overriding the printer's
    pub encoding: Option<String>,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            size: (1, 1),
            encoding: None,
        }
    }
}

impl TableOptions {
    pub fn with_size(mut self, width: u8, height: u8) -> Self {
        self.size = (width, height);
        self
    }

    pub fn with_encoding(mut self, encoding: impl Into<String>) -> Self {
        self.encoding = Some(encoding.into());
        self
    }
}

fn spaces(out: &mut Vec<u8>, n: usize) {
    out.resize(out.len() + n, b' ');
}

/// One line with every value padded to `line_width / values.len()` columns.
///
/// Values longer than their share are not truncated.
pub fn simple_row<S: AsRef<str>>(
    values: &[S],
    line_width: usize,
    charset: &Charset,
) -> Result<Vec<u8>> {
    let mut line = String::with_capacity(line_width + 1);
    let n = values.len();
    for value in values {
        let value = value.as_ref();
        line.push_str(value);
        // share may be fractional: round the padding up
        let used = text_length(value) * n;
        let pad = if line_width > used {
            (line_width - used).div_ceil(n)
        } else {
            0
        };
        line.extend(std::iter::repeat_n(' ', pad));
    }
    line.push('\n');
    charset.encode(&line)
}

/// Per-line layout shared by every pass of one table.
struct Layout {
    budgets: Vec<usize>,
    spare: usize,
    spare_cell: Option<usize>,
}

impl Layout {
    fn new(cells: &[Cell], line_width: usize, size_w: usize) -> Self {
        let base = line_width / size_w;
        let auto = base / cells.len();
        let any_cols = cells.iter().any(|c| matches!(c.width, CellWidth::Cols(_)));

        let budgets = cells
            .iter()
            .map(|cell| {
                let budget = match cell.width {
                    CellWidth::Auto => auto,
                    CellWidth::Fraction(f) => (base as f32 * f).floor().max(0.0) as usize,
                    CellWidth::Cols(cols) => cols,
                };
                budget.max(1)
            })
            .collect();

        let spare = if any_cols { 0 } else { base - auto * cells.len() };
        let spare_cell = cells
            .iter()
            .rposition(|c| c.width == CellWidth::Auto && c.align != Alignment::Center);

        Self {
            budgets,
            spare,
            spare_cell,
        }
    }
}

/// Lay out `cells` over as many lines as their overflow needs.
pub fn custom_rows(
    cells: &[Cell],
    options: &TableOptions,
    line_width: usize,
    dialect: Dialect,
    charset: &Charset,
) -> Result<Vec<u8>> {
    if cells.is_empty() {
        return Err(TintaError::InvalidCommand("table needs at least one cell".into()));
    }
    let charset = match &options.encoding {
        Some(label) => Charset::for_label(label)?,
        None => *charset,
    };
    let (size_w, size_h) = options.size;
    let layout = Layout::new(cells, line_width, usize::from(size_w.max(1)));

    let scaled = size_w > 1 || size_h > 1;
    let (size_on, size_off) = if scaled {
        (
            text::size(dialect, size_w, size_h)?,
            commands::resolve(dialect, Command::TextNormal)?.to_vec(),
        )
    } else {
        (Vec::new(), Vec::new())
    };
    let styles: Vec<Option<Vec<u8>>> = cells
        .iter()
        .map(|c| c.style.map(|s| s.encode(dialect)).transpose())
        .collect::<Result<_>>()?;
    let normal = Style::NORMAL.encode(dialect)?;

    let mut remaining: Vec<String> = cells.iter().map(|c| c.text.clone()).collect();
    let mut out = Vec::new();

    loop {
        let mut line = size_on.clone();
        let mut carry = Vec::with_capacity(cells.len());

        for (i, cell) in cells.iter().enumerate() {
            let budget = layout.budgets[i];
            let current = &remaining[i];

            let (shown, rest) = if text_length(current) > budget {
                let mut shown = text_substring(current, 0, Some(budget));
                let mut rest = text_substring(current, budget, None);
                if shown.is_empty() {
                    // a double-width char wider than the whole column
                    let mut chars = current.chars();
                    shown = chars.next().map(String::from).unwrap_or_default();
                    rest = chars.collect();
                }
                (shown, rest)
            } else {
                (current.clone(), String::new())
            };

            let pad = budget.saturating_sub(text_length(&shown));
            let spare = if layout.spare_cell == Some(i) { layout.spare } else { 0 };

            let mut body = Vec::new();
            if !shown.is_empty() {
                match &styles[i] {
                    Some(style) => {
                        body.extend_from_slice(style);
                        body.extend(charset.encode(&shown)?);
                        body.extend_from_slice(&normal);
                    }
                    None => body.extend(charset.encode(&shown)?),
                }
            }

            match cell.align {
                Alignment::Left => {
                    line.extend(body);
                    spaces(&mut line, pad + spare);
                }
                Alignment::Right => {
                    spaces(&mut line, pad + spare);
                    line.extend(body);
                }
                Alignment::Center => {
                    let left = pad.div_ceil(2);
                    spaces(&mut line, left);
                    line.extend(body);
                    spaces(&mut line, pad - left);
                }
            }

            carry.push(rest);
        }

        line.extend_from_slice(&size_off);
        line.extend_from_slice(EOL);
        out.extend(line);

        if carry.iter().all(String::is_empty) {
            return Ok(out);
        }
        remaining = carry;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(bytes: &[u8]) -> Vec<String> {
        String::from_utf8(bytes.to_vec())
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    fn utf8() -> Charset {
        Charset::for_label("utf-8").unwrap()
    }

    fn rows(cells: &[Cell], width: usize, charset: &Charset) -> Vec<u8> {
        custom_rows(cells, &TableOptions::default(), width, Dialect::Generic, charset).unwrap()
    }

    #[test]
    fn test_simple_row_padding() {
        let out = simple_row(&["a", "bb", "c"], 12, &Charset::Cp437).unwrap();
        assert_eq!(out, b"a   bb  c   \n");
    }

    #[test]
    fn test_simple_row_fractional_share() {
        // 10 / 3 = 3.33 columns per cell, padding rounds up
        let out = simple_row(&["a", "b", "c"], 10, &Charset::Cp437).unwrap();
        assert_eq!(out, b"a   b   c   \n");
    }

    #[test]
    fn test_three_equal_columns() {
        let cells = [
            Cell::new("L"),
            Cell::new("C").align(Alignment::Center),
            Cell::new("R").align(Alignment::Right),
        ];
        let out = rows(&cells, 12, &Charset::Cp437);
        assert_eq!(out, b"L     C    R\n");
    }

    #[test]
    fn test_center_padding_even_gap() {
        let cells = [Cell::new("ab").align(Alignment::Center)];
        let out = rows(&cells, 6, &Charset::Cp437);
        assert_eq!(out, b"  ab  \n");
    }

    #[test]
    fn test_spare_goes_to_last_auto_cell() {
        // base 10, 3 cells of 3, one spare column
        let cells = [
            Cell::new("a"),
            Cell::new("b"),
            Cell::new("c").align(Alignment::Right),
        ];
        let out = rows(&cells, 10, &Charset::Cp437);
        assert_eq!(out, b"a  b     c\n");
    }

    #[test]
    fn test_overflow_continuation() {
        let cells = [Cell::new("abcdefgh"), Cell::new("x"), Cell::new("y")];
        let out = rows(&cells, 12, &Charset::Cp437);
        assert_eq!(lines(&out), vec!["abcdx   y   ", "efgh        "]);
    }

    #[test]
    fn test_overflow_longer_than_two_lines_terminates() {
        let cells = [Cell::new("0123456789abcdef"), Cell::new("z"), Cell::new("")];
        let out = rows(&cells, 9, &Charset::Cp437);
        let expected: Vec<String> = ["012z", "345", "678", "9ab", "cde", "f"]
            .iter()
            .map(|l| format!("{:<9}", l))
            .collect();
        assert_eq!(lines(&out), expected);
    }

    #[test]
    fn test_double_byte_overflow() {
        // budget 3: "中" (2) + "a" (1) fit, "b文" carries over
        let cells = [Cell::new("中ab文"), Cell::new("x")];
        let out = rows(&cells, 6, &utf8());
        assert_eq!(lines(&out), vec!["中ax  ", "b文   "]);
    }

    #[test]
    fn test_wide_char_in_narrow_column() {
        let cells = [Cell::new("中文").cols(1), Cell::new("x").cols(1)];
        let out = rows(&cells, 2, &utf8());
        assert_eq!(lines(&out), vec!["中x", "文 "]);
    }

    #[test]
    fn test_fraction_width() {
        let cells = [
            Cell::new("ab").width(0.25),
            Cell::new("cd").width(0.75).align(Alignment::Right),
        ];
        let out = rows(&cells, 8, &Charset::Cp437);
        assert_eq!(out, b"ab    cd\n");
    }

    #[test]
    fn test_styled_cell() {
        let cells = [Cell::new("b").style(Style::new().bold())];
        let out = rows(&cells, 3, &Charset::Cp437);
        let mut expected = Style::new().bold().encode(Dialect::Generic).unwrap();
        expected.push(b'b');
        expected.extend(Style::NORMAL.encode(Dialect::Generic).unwrap());
        expected.extend(b"  \n");
        assert_eq!(out, expected);
    }

    #[test]
    fn test_scaled_line() {
        let cells = [Cell::new("ab")];
        let opts = TableOptions::default().with_size(2, 2);
        let out = custom_rows(&cells, &opts, 8, Dialect::Generic, &Charset::Cp437).unwrap();

        let mut expected = text::size(Dialect::Generic, 2, 2).unwrap();
        expected.extend(b"ab  ");
        expected.extend(commands::resolve(Dialect::Generic, Command::TextNormal).unwrap());
        expected.push(b'\n');
        assert_eq!(out, expected);
    }

    #[test]
    fn test_cols_count_magnified_characters() {
        let cells = [Cell::new("abcdefghij").cols(10), Cell::new("x").cols(5)];
        let opts = TableOptions::default().with_size(2, 1);
        let out = custom_rows(&cells, &opts, 48, Dialect::Generic, &Charset::Cp437).unwrap();

        let mut expected = text::size(Dialect::Generic, 2, 1).unwrap();
        expected.extend(b"abcdefghijx    ");
        expected.extend(commands::resolve(Dialect::Generic, Command::TextNormal).unwrap());
        expected.push(b'\n');
        assert_eq!(out, expected);
    }

    #[test]
    fn test_empty_table_rejected() {
        let err = custom_rows(&[], &TableOptions::default(), 48, Dialect::Generic, &Charset::Cp437);
        assert!(matches!(err, Err(TintaError::InvalidCommand(_))));
    }
}
