//! # Printer Tests
//!
//! Drive the command builder end to end against the in-memory transport and
//! compare the exact bytes that reach it.

use pretty_assertions::assert_eq;

use tinta::printer::{Cell, Printer, PrinterOptions, TableOptions};
use tinta::protocol::barcode::barcode1d::{BarcodeOptions, HriPosition, Symbology};
use tinta::protocol::barcode::qr::{QrLevel, QrOptions};
use tinta::protocol::commands::{self, Command, Dialect};
use tinta::protocol::text::{Alignment, Style, Underline};
use tinta::render::Image;
use tinta::status::Severity;
use tinta::transport::memory::{Fail, MemoryAdapter, MemoryHandle};
use tinta::{StatusClass, TintaError};

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

fn printer_with(options: PrinterOptions) -> (Printer<MemoryAdapter>, MemoryHandle) {
    let adapter = MemoryAdapter::new();
    let handle = adapter.handle();
    (Printer::new(adapter, options).unwrap(), handle)
}

fn printer() -> (Printer<MemoryAdapter>, MemoryHandle) {
    printer_with(PrinterOptions::default())
}

fn cmd(dialect: Dialect, command: Command) -> Vec<u8> {
    commands::resolve(dialect, command).unwrap().to_vec()
}

// ============================================================================
// BUFFER AND FLUSH
// ============================================================================

#[tokio::test]
async fn flush_delivers_everything_in_call_order() {
    let (mut p, handle) = printer();
    p.open().await.unwrap();
    p.align(Alignment::Center).unwrap()
        .text("Total").unwrap()
        .raw(&[0xAA])
        .feed(2);

    let mut expected = cmd(Dialect::Generic, Command::AlignCenter);
    expected.extend(b"Total\n");
    expected.push(0xAA);
    expected.extend(b"\n\n");

    p.flush().await.unwrap();
    assert_eq!(handle.writes(), vec![expected]);
    assert!(p.buffer().is_empty());

    p.text("next").unwrap();
    p.flush().await.unwrap();
    assert_eq!(handle.writes().len(), 2);
    assert_eq!(handle.writes()[1], b"next\n".to_vec());
}

#[tokio::test]
async fn close_flushes_then_closes() {
    let (mut p, handle) = printer();
    p.open().await.unwrap();
    p.text("bye").unwrap();
    p.close().await.unwrap();
    assert_eq!(handle.bytes(), b"bye\n".to_vec());
    assert!(handle.is_closed());
}

#[tokio::test]
async fn write_error_reaches_caller() {
    let adapter = MemoryAdapter::new().failing(Fail::Write);
    let mut p = Printer::new(adapter, PrinterOptions::default()).unwrap();
    p.text("lost").unwrap();
    let err = p.flush().await.unwrap_err();
    assert!(matches!(err, TintaError::Transport(_)));
}

#[tokio::test]
async fn close_error_reaches_caller() {
    let adapter = MemoryAdapter::new().failing(Fail::Close);
    let handle = adapter.handle();
    let mut p = Printer::new(adapter, PrinterOptions::default()).unwrap();
    p.text("kept").unwrap();
    assert!(p.close().await.is_err());
    // the flush before the close still went through
    assert_eq!(handle.bytes(), b"kept\n".to_vec());
}

#[tokio::test]
async fn open_error_reaches_caller() {
    let adapter = MemoryAdapter::new().failing(Fail::Open);
    let mut p = Printer::new(adapter, PrinterOptions::default()).unwrap();
    assert!(p.open().await.is_err());
}

// ============================================================================
// REJECTIONS LEAVE THE BUFFER UNCHANGED
// ============================================================================

#[test]
fn ean13_with_thirteen_digits_is_rejected() {
    let (mut p, _) = printer();
    p.text("header").unwrap();
    let before = p.buffer().to_vec();

    let err = p
        .barcode("4712345678901", Symbology::Ean13, &BarcodeOptions::default())
        .unwrap_err();
    assert!(matches!(err, TintaError::Barcode(_)));
    assert_eq!(p.buffer(), before.as_slice());
}

#[test]
fn ean8_with_wrong_length_is_rejected() {
    let (mut p, _) = printer();
    assert!(p.barcode("123", Symbology::Ean8, &BarcodeOptions::default()).is_err());
    assert!(p.buffer().is_empty());
}

#[test]
fn unknown_symbolic_names_are_rejected() {
    assert!("justify".parse::<Alignment>().is_err());
    assert!("z".parse::<tinta::protocol::text::Font>().is_err());
    assert!("explode".parse::<tinta::protocol::text::Hardware>().is_err());
    assert!("xx".parse::<tinta::protocol::text::FeedControl>().is_err());
}

#[test]
fn unencodable_text_is_rejected() {
    let (mut p, _) = printer_with(PrinterOptions::new().with_encoding("cp437"));
    p.text("ok").unwrap();
    assert!(matches!(p.text("日本"), Err(TintaError::Encoding(_))));
    assert_eq!(p.buffer(), b"ok\n");
}

// ============================================================================
// BARCODES
// ============================================================================

#[test]
fn ean13_generic_sequence() {
    let (mut p, _) = printer();
    let opts = BarcodeOptions::default().with_width(3).with_height(80);
    p.barcode("471234567890", Symbology::Ean13, &opts).unwrap();

    let mut expected = commands::barcode_width(3).unwrap();
    expected.extend(commands::barcode_height(80));
    expected.extend(cmd(Dialect::Generic, Command::BarcodeFontA));
    expected.extend(cmd(Dialect::Generic, Command::BarcodeHriBelow));
    expected.extend(cmd(Dialect::Generic, Command::BarcodeEan13));
    expected.extend(b"4712345678900\x00");
    assert_eq!(p.buffer(), expected.as_slice());
}

#[test]
fn code128_carries_length_prefix() {
    let (mut p, _) = printer();
    let opts = BarcodeOptions::default().with_position(HriPosition::Off);
    p.barcode("ABC-12", Symbology::Code128, &opts).unwrap();
    assert!(p.buffer().ends_with(&[0x06, b'A', b'B', b'C', b'-', b'1', b'2', 0x00]));
}

#[test]
fn parity_can_be_suppressed() {
    let (mut p, _) = printer();
    let opts = BarcodeOptions::default().with_parity(false);
    p.barcode("1234567", Symbology::Ean8, &opts).unwrap();
    assert!(p.buffer().ends_with(b"1234567\x00"));
}

// ============================================================================
// 2D CODES
// ============================================================================

#[test]
fn generic_qr_wire_format() {
    let (mut p, _) = printer();
    let opts = QrOptions::default().with_version(4).with_level(QrLevel::M).with_size(5);
    p.qrcode("tinta", &opts).unwrap();
    assert_eq!(
        p.buffer(),
        &[0x1D, b'Z', 0x02, 0x1B, b'Z', 4, b'M', 5, 5, 0, b't', b'i', b'n', b't', b'a']
    );
}

#[test]
fn qsprinter_qr_stores_then_prints() {
    let (mut p, _) = printer_with(PrinterOptions::new().with_dialect(Dialect::QsPrinter));
    p.qrcode("Z", &QrOptions::default()).unwrap();
    let buf = p.buffer();

    let store = [0x1D, 0x28, 0x6B, 4, 0, 0x31, 0x50, 0x30, b'Z'];
    let print = [0x1D, 0x28, 0x6B, 4, 0, 0x31, 0x51, 0x30];
    let store_at = buf.windows(store.len()).position(|w| w == store).unwrap();
    let print_at = buf.windows(print.len()).position(|w| w == print).unwrap();
    assert!(store_at < print_at);
    assert!(buf.ends_with(&print));
}

// ============================================================================
// TABLES
// ============================================================================

#[test]
fn table_overflow_emits_remainder_line() {
    let (mut p, _) = printer_with(PrinterOptions::new().with_width(30));
    let cells = [
        Cell::new("Cappuccino grande"),
        Cell::new("x2").align(Alignment::Center),
        Cell::new("7.00").align(Alignment::Right),
    ];
    p.table_custom(&cells, &TableOptions::default()).unwrap();

    let text = String::from_utf8(p.buffer().to_vec()).unwrap();
    let lines: Vec<String> = text.lines().map(str::to_string).collect();
    assert_eq!(
        lines,
        vec![
            "Cappuccino    x2          7.00".to_string(),
            format!("{:<30}", " grande"),
        ]
    );
}

#[test]
fn table_overflow_across_many_lines_terminates() {
    let (mut p, _) = printer_with(PrinterOptions::new().with_width(6));
    let long = "a".repeat(50);
    let cells = [Cell::new(long.as_str()), Cell::new("b"), Cell::new("c")];
    p.table_custom(&cells, &TableOptions::default()).unwrap();

    let text = String::from_utf8(p.buffer().to_vec()).unwrap();
    assert_eq!(text.lines().count(), 25);
    assert!(text.lines().all(|l| l.len() == 6));
}

#[test]
fn simple_table() {
    let (mut p, _) = printer_with(PrinterOptions::new().with_width(12));
    p.table(&["Qty", "Item", "$"]).unwrap();
    assert_eq!(p.buffer(), b"Qty Item$   \n");
}

// ============================================================================
// IMAGES
// ============================================================================

#[test]
fn raster_of_threshold_image() {
    // 9×1 RGBA: dark, light grey, transparent black, then six whites
    let mut pixels = vec![
        10, 10, 10, 255, //
        201, 201, 201, 255, //
        0, 0, 0, 0,
    ];
    for _ in 0..6 {
        pixels.extend([255, 255, 255, 255]);
    }
    let image = Image::from_pixels(9, 1, 4, &pixels).unwrap();

    let (mut p, _) = printer();
    p.raster(&image, "dhdw".parse().unwrap()).unwrap();
    let mut expected = cmd(Dialect::Generic, Command::RasterQuadruple);
    expected.extend([2, 0, 1, 0, 0b1000_0000, 0]);
    assert_eq!(p.buffer(), expected.as_slice());
}

#[test]
fn image_bands_with_zero_line_spacing() {
    let (mut p, _) = printer();
    let image = Image::from_bits(1, 8, vec![true; 8]).unwrap();
    p.image(&image, "s8".parse().unwrap()).unwrap();

    let mut expected = commands::line_spacing(0);
    expected.extend(cmd(Dialect::Generic, Command::BitmapS8));
    expected.extend([1, 0, 0xFF, b'\n']);
    expected.extend(cmd(Dialect::Generic, Command::LineSpacingDefault));
    assert_eq!(p.buffer(), expected.as_slice());
}

// ============================================================================
// DIALECTS
// ============================================================================

#[test]
fn dialect_overrides_reach_the_buffer() {
    for dialect in Dialect::ALL {
        let (mut p, _) = printer_with(PrinterOptions::new().with_dialect(dialect));
        p.align(Alignment::Right).unwrap().cut(false, 0).unwrap();

        let mut expected = cmd(dialect, Command::AlignRight);
        expected.extend(cmd(dialect, Command::PaperFullCut));
        assert_eq!(p.buffer(), expected.as_slice(), "dialect {}", dialect);
    }
}

#[test]
fn style_composes_all_three() {
    let (mut p, _) = printer();
    p.style("biu2".parse().unwrap()).unwrap();

    let style = Style::new().bold().italic().underline(Underline::Double);
    assert_eq!(p.buffer(), style.encode(Dialect::Generic).unwrap().as_slice());
}

// ============================================================================
// STATUS
// ============================================================================

#[tokio::test]
async fn single_status_query() {
    let adapter = MemoryAdapter::new().with_reply(&[0x08]);
    let handle = adapter.handle();
    let mut p = Printer::new(adapter, PrinterOptions::default()).unwrap();
    p.text("queued").unwrap();

    let status = p.get_status(StatusClass::Printer).await.unwrap();
    assert_eq!(handle.writes(), vec![vec![0x10, 0x04, 0x01]]);
    // query does not touch the buffer
    assert_eq!(p.buffer(), b"queued\n");

    let offline = status.statuses.iter().find(|s| s.label == "Offline").unwrap();
    assert_eq!(offline.status, Severity::Error);
}

#[tokio::test]
async fn all_statuses_accumulate_split_replies() {
    let adapter = MemoryAdapter::new().with_reply(&[0x16, 0x00]).with_reply(&[0x12, 0x00]);
    let handle = adapter.handle();
    let mut p = Printer::new(adapter, PrinterOptions::default()).unwrap();

    let statuses = p.get_statuses().await.unwrap();
    assert_eq!(
        handle.writes(),
        vec![
            vec![0x10, 0x04, 0x01],
            vec![0x10, 0x04, 0x04],
            vec![0x10, 0x04, 0x02],
            vec![0x10, 0x04, 0x03],
        ]
    );

    let classes: Vec<StatusClass> = statuses.iter().map(|s| s.class_name).collect();
    assert_eq!(
        classes,
        vec![
            StatusClass::Printer,
            StatusClass::RollPaperSensor,
            StatusClass::OfflineCause,
            StatusClass::ErrorCause,
        ]
    );
    let bytes: Vec<u8> = statuses.iter().map(|s| s.byte).collect();
    assert_eq!(bytes, vec![0x16, 0x00, 0x12, 0x00]);
}

#[tokio::test]
async fn status_read_fails_after_close() {
    let adapter = MemoryAdapter::new().with_reply(&[0x00]);
    let mut p = Printer::new(adapter, PrinterOptions::default()).unwrap();
    p.close().await.unwrap();
    assert!(p.get_status(StatusClass::ErrorCause).await.is_err());
}
