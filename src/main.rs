//! # Tinta CLI
//!
//! Command-line interface for ESC/POS receipt printers.
//!
//! ## Usage
//!
//! ```bash
//! # Dump the bytes for a line of text as hex (no printer needed)
//! tinta text "Hello"
//!
//! # Print centered bold text on a USB printer and cut
//! tinta --device /dev/usb/lp0 text --align center --style b --cut "Hello"
//!
//! # EAN13 barcode on a network printer
//! tinta --host 192.168.1.50 barcode --type ean13 471234567890
//!
//! # QR code rendered as an image, for printers without a QR command
//! tinta --device /dev/rfcomm0 qr --image "https://example.com"
//!
//! # Query every status class
//! tinta --host 192.168.1.50 status
//! ```
//!
//! Logging goes to stderr and is controlled by `RUST_LOG` (default `warn`).

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use tinta::{
    Adapter, DeviceStatus, Dialect, Printer, PrinterOptions, StatusClass, TintaError,
    printer::QrImageOptions,
    protocol::barcode::barcode1d::{BarcodeOptions, HriPosition, Symbology},
    protocol::barcode::qr::{QrLevel, QrOptions},
    protocol::graphics::{BitmapDensity, RasterMode},
    protocol::text::{Alignment, Font, Style},
    render::Image,
    transport::{ConsoleAdapter, DeviceAdapter, NetworkAdapter, network::DEFAULT_PORT},
};

/// Tinta - ESC/POS receipt printer utility
#[derive(Parser, Debug)]
#[command(name = "tinta")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Printer device path (tty, rfcomm or lp)
    #[arg(long, global = true, conflicts_with = "host")]
    device: Option<PathBuf>,

    /// Network printer host
    #[arg(long, global = true)]
    host: Option<String>,

    /// Network printer port
    #[arg(long, global = true, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Options file (JSON), overridden by the flags below
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Command dialect: generic, bematech, daruma, qsprinter
    #[arg(long, global = true)]
    dialect: Option<Dialect>,

    /// Text encoding label (GB18030, cp437, windows-1252, ...)
    #[arg(long, global = true)]
    encoding: Option<String>,

    /// Characters per line
    #[arg(long, global = true)]
    width: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print lines of text
    Text {
        /// Lines to print
        #[arg(required = true)]
        lines: Vec<String>,

        /// left, center or right
        #[arg(long)]
        align: Option<Alignment>,

        /// Style letters: b, i, u, u2 (e.g. "bu2")
        #[arg(long)]
        style: Option<Style>,

        /// Font a, b or c
        #[arg(long)]
        font: Option<Font>,

        /// Character size as WxH (e.g. 2x2)
        #[arg(long, value_parser = parse_size)]
        size: Option<(u8, u8)>,

        /// Feed and cut after printing
        #[arg(long)]
        cut: bool,
    },

    /// Print a 1D barcode
    Barcode {
        code: String,

        /// Symbology (ean13, ean8, upc-a, upc-e, code39, itf, nw7, code93, code128)
        #[arg(long = "type", default_value = "ean13")]
        symbology: Symbology,

        /// Module width 1-5
        #[arg(long)]
        bar_width: Option<u8>,

        /// Height in dots 1-255
        #[arg(long)]
        height: Option<u16>,

        /// HRI position: off, above, below, both
        #[arg(long)]
        position: Option<HriPosition>,

        /// Omit the EAN check digit
        #[arg(long)]
        no_parity: bool,
    },

    /// Print a QR code
    Qr {
        content: String,

        /// Error correction level L, M, Q or H
        #[arg(long)]
        level: Option<QrLevel>,

        /// Module size
        #[arg(long)]
        size: Option<u8>,

        /// Symbol version
        #[arg(long = "symbol-version")]
        version: Option<u8>,

        /// Render on the host and send as a raster image
        #[arg(long)]
        image: bool,
    },

    /// Print an image file
    Image {
        file: PathBuf,

        /// Send as a single raster block instead of bit-image bands
        #[arg(long)]
        raster: bool,

        /// Band density: s8, d8, s24, d24
        #[arg(long, default_value = "d24")]
        density: BitmapDensity,

        /// Raster mode: normal, dw, dh, dwdh
        #[arg(long, default_value = "normal")]
        mode: RasterMode,
    },

    /// Query printer status and print it as JSON
    Status {
        #[arg(long, value_enum, default_value_t = StatusArg::All)]
        class: StatusArg,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum StatusArg {
    All,
    Printer,
    Offline,
    Error,
    Paper,
}

fn parse_size(s: &str) -> Result<(u8, u8), String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WxH, got '{}'", s))?;
    let w = w.trim().parse::<u8>().map_err(|e| e.to_string())?;
    let h = h.trim().parse::<u8>().map_err(|e| e.to_string())?;
    Ok((w, h))
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), TintaError> {
    let cli = Cli::parse();

    let mut options = match &cli.config {
        Some(path) => PrinterOptions::load(path)?,
        None => PrinterOptions::default(),
    };
    if let Some(dialect) = cli.dialect {
        options.dialect = dialect;
    }
    if let Some(encoding) = &cli.encoding {
        options.encoding = encoding.clone();
    }
    if let Some(width) = cli.width {
        options.width = Some(width);
    }

    let adapter: Box<dyn Adapter> = match (&cli.device, &cli.host) {
        (Some(device), _) => Box::new(DeviceAdapter::new(device)),
        (None, Some(host)) => Box::new(NetworkAdapter::new(host.clone(), cli.port)),
        (None, None) => Box::new(ConsoleAdapter::new()),
    };

    let mut printer = Printer::new(adapter, options)?;
    printer.open().await?;

    match cli.command {
        Commands::Text {
            lines,
            align,
            style,
            font,
            size,
            cut,
        } => {
            if let Some(font) = font {
                printer.font(font)?;
            }
            if let Some(align) = align {
                printer.align(align)?;
            }
            if let Some(style) = style {
                printer.style(style)?;
            }
            if let Some((w, h)) = size {
                printer.size(w, h)?;
            }
            for line in &lines {
                printer.text(line)?;
            }
            if style.is_some() {
                printer.style(Style::NORMAL)?;
            }
            if size.is_some() {
                printer.size(1, 1)?;
            }
            if cut {
                printer.cut(false, 3)?;
            }
        }

        Commands::Barcode {
            code,
            symbology,
            bar_width,
            height,
            position,
            no_parity,
        } => {
            let mut opts = BarcodeOptions::default();
            if let Some(position) = position {
                opts = opts.with_position(position);
            }
            if let Some(width) = bar_width {
                opts = opts.with_width(width);
            }
            if let Some(height) = height {
                opts = opts.with_height(height);
            }
            if no_parity {
                opts = opts.with_parity(false);
            }
            printer.barcode(&code, symbology, &opts)?.new_line();
        }

        Commands::Qr {
            content,
            level,
            size,
            version,
            image,
        } => {
            if image {
                let mut opts = QrImageOptions::default();
                if let Some(level) = level {
                    opts = opts.with_level(level);
                }
                printer.qrimage(&content, &opts)?;
            } else {
                let mut opts = QrOptions::default();
                if let Some(level) = level {
                    opts = opts.with_level(level);
                }
                if let Some(size) = size {
                    opts = opts.with_size(size);
                }
                if let Some(version) = version {
                    opts = opts.with_version(version);
                }
                printer.qrcode(&content, &opts)?;
            }
            printer.new_line();
        }

        Commands::Image {
            file,
            raster,
            density,
            mode,
        } => {
            let image = Image::open(&file)?;
            if raster {
                printer.raster(&image, mode)?;
            } else {
                printer.image(&image, density)?;
            }
        }

        Commands::Status { class } => {
            let statuses: Vec<DeviceStatus> = match class {
                StatusArg::All => printer.get_statuses().await?,
                StatusArg::Printer => vec![printer.get_status(StatusClass::Printer).await?],
                StatusArg::Offline => vec![printer.get_status(StatusClass::OfflineCause).await?],
                StatusArg::Error => vec![printer.get_status(StatusClass::ErrorCause).await?],
                StatusArg::Paper => vec![printer.get_status(StatusClass::RollPaperSensor).await?],
            };
            let json = serde_json::to_string_pretty(&statuses)
                .map_err(|e| TintaError::Status(format!("Failed to serialize status: {}", e)))?;
            println!("{}", json);
        }
    }

    printer.close().await?;
    Ok(())
}
