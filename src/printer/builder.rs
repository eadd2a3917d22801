//! # Command Builder
//!
//! [`Printer`] accumulates the byte stream for a print job and hands it to an
//! [`Adapter`] on [`flush`](Printer::flush).
//!
//! ## Buffer Discipline
//!
//! Every builder call assembles its complete opcode sequence in a local
//! `Vec<u8>` and appends it only once nothing else can fail. A call that
//! returns an error leaves the buffer exactly as it was.
//!
//! ## Example
//!
//! ```
//! use tinta::printer::{Printer, PrinterOptions};
//! use tinta::protocol::text::{Alignment, Style};
//! use tinta::transport::MemoryAdapter;
//!
//! let mut printer = Printer::new(MemoryAdapter::new(), PrinterOptions::default()).unwrap();
//! printer
//!     .align(Alignment::Center).unwrap()
//!     .style(Style::new().bold()).unwrap()
//!     .text("RECEIPT").unwrap()
//!     .cut(false, 3).unwrap();
//! assert!(!printer.buffer().is_empty());
//! ```

use tracing::{debug, trace, warn};

use super::buffer::OutputBuffer;
use super::config::PrinterOptions;
use super::table::{self, Cell, TableOptions};
use crate::error::{Result, TintaError};
use crate::protocol::barcode::barcode1d::{self, BarcodeOptions, Symbology};
use crate::protocol::barcode::qr::{self, QrLevel, QrOptions};
use crate::protocol::charset::Charset;
use crate::protocol::commands::{self, Command, Dialect, Margin, EOL};
use crate::protocol::graphics::{self, BitmapDensity, RasterMode};
use crate::protocol::text::{self, Alignment, FeedControl, Font, Hardware, Style};
use crate::render::Image;
use crate::status::{DeviceStatus, StatusClass};
use crate::transport::Adapter;

/// Options for [`Printer::qrimage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QrImageOptions {
    pub level: QrLevel,
    /// Pixels per module
    pub scale: usize,
    /// Quiet zone in modules
    pub margin: usize,
    pub mode: RasterMode,
}

impl Default for QrImageOptions {
    fn default() -> Self {
        Self {
            level: QrLevel::M,
            scale: 5,
            margin: 4,
            mode: RasterMode::Quadruple,
        }
    }
}

impl QrImageOptions {
    pub fn with_level(mut self, level: QrLevel) -> Self {
        self.level = level;
        self
    }

    pub fn with_scale(mut self, scale: usize) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_margin(mut self, margin: usize) -> Self {
        self.margin = margin;
        self
    }

    pub fn with_mode(mut self, mode: RasterMode) -> Self {
        self.mode = mode;
        self
    }
}

/// Render `content` as a QR symbol, one bit per output pixel.
pub fn qr_to_image(content: &str, options: &QrImageOptions) -> Result<Image> {
    let code = qrcode::QrCode::with_error_correction_level(content, options.level.ec_level())
        .map_err(|e| TintaError::Barcode(format!("QR code generation failed: {}", e)))?;

    let scale = options.scale.max(1);
    let modules = code.width();
    let side = (modules + 2 * options.margin) * scale;
    let mut pixels = vec![false; side * side];

    for qy in 0..modules {
        for qx in 0..modules {
            if code[(qx, qy)] != qrcode::Color::Dark {
                continue;
            }
            let x0 = (qx + options.margin) * scale;
            let y0 = (qy + options.margin) * scale;
            for y in y0..y0 + scale {
                pixels[y * side + x0..y * side + x0 + scale].fill(true);
            }
        }
    }

    Image::from_bits(side, side, pixels)
}

/// # ESC/POS Command Builder
///
/// Owns its output buffer and transport. Methods append to the buffer and
/// return `&mut Self` for chaining; fallible ones wrap it in a `Result`.
#[derive(Debug)]
pub struct Printer<A: Adapter> {
    adapter: A,
    options: PrinterOptions,
    dialect: Dialect,
    charset: Charset,
    width: usize,
    buffer: OutputBuffer,
}

impl<A: Adapter> Printer<A> {
    /// Create a printer. Fails if `options.encoding` is not a known charset.
    pub fn new(adapter: A, options: PrinterOptions) -> Result<Self> {
        let charset = Charset::for_label(&options.encoding)?;
        Ok(Self {
            adapter,
            dialect: options.dialect,
            charset,
            width: options.initial_width(),
            options,
            buffer: OutputBuffer::new(),
        })
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn charset(&self) -> Charset {
        self.charset
    }

    /// Characters per line used by tables and [`draw_line`](Self::draw_line).
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn options(&self) -> &PrinterOptions {
        &self.options
    }

    /// Bytes appended since the last flush.
    pub fn buffer(&self) -> &[u8] {
        self.buffer.as_slice()
    }

    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    pub fn adapter_mut(&mut self) -> &mut A {
        &mut self.adapter
    }

    pub fn into_adapter(self) -> A {
        self.adapter
    }

    fn command(&self, cmd: Command) -> Result<&'static [u8]> {
        commands::resolve(self.dialect, cmd)
    }

    fn emit(&mut self, bytes: &[u8]) -> &mut Self {
        self.buffer.extend(bytes);
        self
    }

    fn emit_command(&mut self, cmd: Command) -> Result<&mut Self> {
        let bytes = self.command(cmd)?;
        Ok(self.emit(bytes))
    }

    // ========================================================================
    // SETUP
    // ========================================================================

    /// Switch the opcode dialect for subsequent calls.
    pub fn model(&mut self, dialect: Dialect) -> &mut Self {
        self.dialect = dialect;
        self
    }

    /// Switch the charset used for encoded text.
    pub fn encode(&mut self, label: &str) -> Result<&mut Self> {
        self.charset = Charset::for_label(label)?;
        Ok(self)
    }

    /// Select a character code table on the printer (ESC t n).
    pub fn set_character_code_table(&mut self, table: u8) -> &mut Self {
        self.emit(&commands::code_table(table))
    }

    pub fn margin_bottom(&mut self, size: u8) -> &mut Self {
        self.emit(&commands::margin(Margin::Bottom, size))
    }

    pub fn margin_left(&mut self, size: u8) -> &mut Self {
        self.emit(&commands::margin(Margin::Left, size))
    }

    pub fn margin_right(&mut self, size: u8) -> &mut Self {
        self.emit(&commands::margin(Margin::Right, size))
    }

    // ========================================================================
    // TEXT
    // ========================================================================

    /// Append bytes as they are.
    pub fn print(&mut self, content: impl AsRef<[u8]>) -> &mut Self {
        self.emit(content.as_ref())
    }

    /// Line counterpart of [`print`](Self::print); same bytes as [`text`](Self::text).
    pub fn println(&mut self, content: &str) -> Result<&mut Self> {
        self.text(content)
    }

    pub fn new_line(&mut self) -> &mut Self {
        self.emit(EOL)
    }

    /// Encoded text followed by a line feed.
    pub fn text(&mut self, content: &str) -> Result<&mut Self> {
        let mut bytes = self.charset.encode(content)?;
        bytes.extend_from_slice(EOL);
        Ok(self.emit(&bytes))
    }

    /// Like [`text`](Self::text) with a one-off charset.
    pub fn text_with(&mut self, content: &str, encoding: &str) -> Result<&mut Self> {
        let mut bytes = Charset::for_label(encoding)?.encode(content)?;
        bytes.extend_from_slice(EOL);
        Ok(self.emit(&bytes))
    }

    /// Encoded text without a line feed.
    pub fn pure_text(&mut self, content: &str) -> Result<&mut Self> {
        let bytes = self.charset.encode(content)?;
        Ok(self.emit(&bytes))
    }

    /// A full-width rule of `ch`.
    pub fn draw_line(&mut self, ch: char) -> Result<&mut Self> {
        let mut bytes = self.charset.encode(&ch.to_string().repeat(self.width))?;
        bytes.extend_from_slice(EOL);
        Ok(self.emit(&bytes))
    }

    /// `n` line feeds.
    pub fn feed(&mut self, n: usize) -> &mut Self {
        let bytes = EOL.repeat(n);
        self.emit(&bytes)
    }

    pub fn control(&mut self, ctrl: FeedControl) -> Result<&mut Self> {
        self.emit_command(ctrl.command())
    }

    // ========================================================================
    // FORMATTING
    // ========================================================================

    pub fn align(&mut self, align: Alignment) -> Result<&mut Self> {
        self.emit_command(align.command())
    }

    /// Select a font. Unless a width is pinned in the options, the line
    /// width follows the font (A: 42, B/C: 56).
    pub fn font(&mut self, font: Font) -> Result<&mut Self> {
        let bytes = self.command(font.command())?;
        self.width = self.options.width.unwrap_or(font.default_columns());
        Ok(self.emit(bytes))
    }

    pub fn style(&mut self, style: Style) -> Result<&mut Self> {
        let bytes = style.encode(self.dialect)?;
        Ok(self.emit(&bytes))
    }

    /// Character magnification. 1 and 2 use the fixed double-width/height
    /// opcodes, larger values the proportional custom size.
    pub fn size(&mut self, width: u8, height: u8) -> Result<&mut Self> {
        let bytes = text::size(self.dialect, width, height)?;
        Ok(self.emit(&bytes))
    }

    /// Character spacing in dots; `None` restores the default.
    pub fn spacing(&mut self, n: Option<u8>) -> Result<&mut Self> {
        if self.dialect == Dialect::Daruma {
            warn!(dialect = %self.dialect, "character spacing is not supported");
            return Ok(self);
        }
        match n {
            Some(n) => Ok(self.emit(&commands::character_spacing(n))),
            None => self.emit_command(Command::CharacterSpacingDefault),
        }
    }

    /// Line spacing in dots; `None` restores the default.
    pub fn line_space(&mut self, n: Option<u8>) -> Result<&mut Self> {
        match n {
            Some(n) => Ok(self.emit(&commands::line_spacing(n))),
            None => self.emit_command(Command::LineSpacingDefault),
        }
    }

    /// Print colour: 0 black, 1 red. Anything else falls back to black.
    pub fn color(&mut self, color: u8) -> Result<&mut Self> {
        let cmd = match color {
            0 => Command::ColorBlack,
            1 => Command::ColorRed,
            other => {
                warn!(color = other, "unknown color, using black");
                Command::ColorBlack
            }
        };
        self.emit_command(cmd)
    }

    pub fn set_reverse_colors(&mut self, reverse: bool) -> Result<&mut Self> {
        self.emit_command(if reverse {
            Command::ReverseOn
        } else {
            Command::ReverseOff
        })
    }

    // ========================================================================
    // TABLES
    // ========================================================================

    /// One line, values in equal columns.
    pub fn table<S: AsRef<str>>(&mut self, values: &[S]) -> Result<&mut Self> {
        if values.is_empty() {
            return Err(TintaError::InvalidCommand("table needs at least one value".into()));
        }
        let bytes = table::simple_row(values, self.width, &self.charset)?;
        Ok(self.emit(&bytes))
    }

    /// Cells with alignment, width and style, wrapping overflow onto
    /// continuation lines.
    pub fn table_custom(&mut self, cells: &[Cell], options: &TableOptions) -> Result<&mut Self> {
        let bytes = table::custom_rows(cells, options, self.width, self.dialect, &self.charset)?;
        Ok(self.emit(&bytes))
    }

    // ========================================================================
    // BARCODES
    // ========================================================================

    pub fn barcode(
        &mut self,
        code: &str,
        symbology: Symbology,
        options: &BarcodeOptions,
    ) -> Result<&mut Self> {
        let bytes = barcode1d::encode(self.dialect, code, symbology, options)?;
        Ok(self.emit(&bytes))
    }

    /// Native QR command of the active dialect.
    pub fn qrcode(&mut self, content: &str, options: &QrOptions) -> Result<&mut Self> {
        let bytes = qr::encode(self.dialect, content, options)?;
        Ok(self.emit(&bytes))
    }

    /// QR code rendered on the host and sent as a raster image, for
    /// printers without a QR command.
    pub fn qrimage(&mut self, content: &str, options: &QrImageOptions) -> Result<&mut Self> {
        let image = qr_to_image(content, options)?;
        self.raster(&image, options.mode)
    }

    // ========================================================================
    // IMAGES
    // ========================================================================

    /// Bit-image bands between line spacing 0 and the default line spacing,
    /// so adjacent bands print without gaps.
    pub fn image(&mut self, image: &Image, density: BitmapDensity) -> Result<&mut Self> {
        let bitmap = image.to_bitmap(density.dots())?;
        let restore = self.command(Command::LineSpacingDefault)?;

        let mut bytes = commands::line_spacing(0);
        for band in &bitmap.bands {
            bytes.extend(graphics::bit_image_band(self.dialect, density, band)?);
        }
        bytes.extend_from_slice(restore);
        Ok(self.emit(&bytes))
    }

    /// Image as one raster block (GS v 0).
    pub fn raster(&mut self, image: &Image, mode: RasterMode) -> Result<&mut Self> {
        let raster = image.to_raster();
        let width_bytes = u16::try_from(raster.width_bytes)
            .map_err(|_| {
                TintaError::Image(format!("image too wide: {} bytes", raster.width_bytes))
            })?;
        let height = u16::try_from(raster.height)
            .map_err(|_| TintaError::Image(format!("image too tall: {} rows", raster.height)))?;
        let bytes = graphics::raster(self.dialect, mode, width_bytes, height, &raster.data)?;
        Ok(self.emit(&bytes))
    }

    // ========================================================================
    // HARDWARE
    // ========================================================================

    pub fn hardware(&mut self, hw: Hardware) -> Result<&mut Self> {
        self.emit_command(hw.command())
    }

    /// Kick the cash drawer on connector pin 2 or 5.
    pub fn cashdraw(&mut self, pin: u8) -> Result<&mut Self> {
        self.emit_command(if pin == 5 {
            Command::CashDrawerKick5
        } else {
            Command::CashDrawerKick2
        })
    }

    /// `times` beeps of `duration * 100` ms.
    pub fn beep(&mut self, times: u8, duration: u8) -> Result<&mut Self> {
        let bytes = commands::beep(self.dialect, times, duration)?;
        Ok(self.emit(&bytes))
    }

    /// Feed `feed` lines, then cut.
    pub fn cut(&mut self, partial: bool, feed: usize) -> Result<&mut Self> {
        let cut = self.command(if partial {
            Command::PaperPartialCut
        } else {
            Command::PaperFullCut
        })?;
        let mut bytes = EOL.repeat(feed);
        bytes.extend_from_slice(cut);
        Ok(self.emit(&bytes))
    }

    /// Append raw bytes.
    pub fn raw(&mut self, data: &[u8]) -> &mut Self {
        self.emit(data)
    }

    /// Append a hex dump such as `"1d:77:06"` or `"1d 77 06"`.
    pub fn raw_hex(&mut self, hex: &str) -> Result<&mut Self> {
        let bytes = commands::parse_hex(hex)?;
        Ok(self.emit(&bytes))
    }

    // ========================================================================
    // TRANSPORT
    // ========================================================================

    pub async fn open(&mut self) -> Result<&mut Self> {
        self.adapter.open().await?;
        Ok(self)
    }

    /// Remove and return the buffered bytes without sending them.
    pub fn take_buffer(&mut self) -> Vec<u8> {
        self.buffer.take()
    }

    /// Send everything buffered as a single write.
    ///
    /// The buffer is emptied before the write is attempted.
    pub async fn flush(&mut self) -> Result<&mut Self> {
        let data = self.take_buffer();
        debug!(bytes = data.len(), "Flushing output buffer");
        self.adapter.write(&data).await?;
        Ok(self)
    }

    /// Flush, then close the transport.
    pub async fn close(&mut self) -> Result<&mut Self> {
        self.flush().await?;
        self.adapter.close().await?;
        Ok(self)
    }

    /// Query one status class (DLE EOT n) and decode the reply.
    ///
    /// The query bypasses the output buffer.
    pub async fn get_status(&mut self, class: StatusClass) -> Result<DeviceStatus> {
        self.adapter.write(&class.query()).await?;
        let reply = self.adapter.read().await?;
        let byte = *reply
            .first()
            .ok_or_else(|| TintaError::Status(format!("empty reply to {} query", class)))?;
        trace!(class = %class, byte, "Status reply");
        Ok(DeviceStatus::decode(class, byte))
    }

    /// Query all four classes and decode them in [`StatusClass::ALL`] order:
    /// printer, roll paper sensor, offline cause, error cause.
    pub async fn get_statuses(&mut self) -> Result<Vec<DeviceStatus>> {
        for class in StatusClass::ALL {
            self.adapter.write(&class.query()).await?;
        }

        let mut replies: Vec<u8> = Vec::with_capacity(StatusClass::ALL.len());
        while replies.len() < StatusClass::ALL.len() {
            let chunk = self.adapter.read().await?;
            trace!(bytes = ?chunk, "Status bytes received");
            replies.extend(chunk);
        }

        Ok(StatusClass::ALL
            .iter()
            .zip(&replies)
            .map(|(class, byte)| DeviceStatus::decode(*class, *byte))
            .collect())
    }
}
