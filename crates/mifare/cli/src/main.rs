use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use mifare_apdu_transport_pcsc::{MonitorConfig, PcscDeviceManager};
use mifare_card::{KeyLocation, KeyType};
use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

mod commands;
mod utils;

use commands::*;
use utils::reader;

#[derive(Parser)]
#[command(version, about = "Watch PC/SC readers and talk to MIFARE cards")]
struct Cli {
    /// Reader name to use; repeat to monitor several (auto-detect if not given)
    #[arg(short, long, global = true)]
    reader: Vec<String>,

    /// Debug level output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List available readers
    List,

    /// Watch readers for card insertion and removal
    ///
    /// Press Enter to pause or resume, `q` then Enter to quit.
    Monitor {
        /// Delay between reader polls in milliseconds
        #[arg(long, default_value_t = 250)]
        poll_ms: u64,
    },

    /// Print the UID of the card in the reader
    Uid,

    /// Load a key, authenticate and read a block
    Read {
        /// Block number (low byte)
        #[arg(long, default_value_t = 4)]
        block: u8,

        /// Block number (high byte)
        #[arg(long, default_value_t = 0)]
        msb: u8,

        /// Number of bytes to read
        #[arg(long, default_value_t = 16)]
        length: u8,

        /// Sector key as 12 hex digits
        #[arg(long, default_value = "FFFFFFFFFFFF")]
        key: String,

        /// Which sector key to authenticate with
        #[arg(long, value_enum, default_value_t = KeyTypeArg::A)]
        key_type: KeyTypeArg,

        /// Reader key slot to load the key into
        #[arg(long, default_value_t = 0)]
        slot: u8,

        /// Reader memory to load the key into
        #[arg(long, value_enum, default_value_t = LocationArg::NonVolatile)]
        location: LocationArg,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum KeyTypeArg {
    /// Key A
    A,
    /// Key B
    B,
}

impl From<KeyTypeArg> for KeyType {
    fn from(arg: KeyTypeArg) -> Self {
        match arg {
            KeyTypeArg::A => Self::KeyA,
            KeyTypeArg::B => Self::KeyB,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LocationArg {
    /// Reader RAM
    Volatile,
    /// Reader non-volatile memory
    NonVolatile,
}

impl From<LocationArg> for KeyLocation {
    fn from(arg: LocationArg) -> Self {
        match arg {
            LocationArg::Volatile => Self::Volatile,
            LocationArg::NonVolatile => Self::NonVolatile,
        }
    }
}

fn main() {
    // Parse command line arguments
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("{} {e}", "error:".red().bold());
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    // Create a PC/SC device manager
    let manager = PcscDeviceManager::new()?;

    match cli.command {
        Commands::List => reader::list_readers(&manager),
        Commands::Monitor { poll_ms } => {
            let readers = if cli.reader.is_empty() {
                reader::all_reader_names(&manager)?
            } else {
                cli.reader
            };
            let config =
                MonitorConfig::default().with_poll_interval(Duration::from_millis(poll_ms));
            monitor_command(&manager, &readers, config)
        }
        Commands::Uid => {
            let reader = reader::select_reader(&manager, cli.reader.first())?;
            info!("Using reader: {}", reader);
            uid_command(&manager, &reader)
        }
        Commands::Read {
            block,
            msb,
            length,
            key,
            key_type,
            slot,
            location,
        } => {
            let reader = reader::select_reader(&manager, cli.reader.first())?;
            info!("Using reader: {}", reader);
            read_command(
                &manager,
                &reader,
                ReadArgs {
                    msb,
                    block,
                    length,
                    key: &key,
                    key_type: key_type.into(),
                    slot,
                    location: location.into(),
                },
            )
        }
    }
}

fn setup_logging(verbose: bool) {
    let directives = std::env::var(EnvFilter::DEFAULT_ENV).unwrap_or_default();

    tracing_subscriber::fmt()
        .with_env_filter(log_filter(verbose, &directives))
        .with_ansi(true)
        .init();
}

/// `RUST_LOG`-style directives on top of the level picked by `--verbose`
fn log_filter(verbose: bool, directives: &str) -> EnvFilter {
    let level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };

    EnvFilter::builder()
        .with_default_directive(level.into())
        .parse_lossy(directives)
}
