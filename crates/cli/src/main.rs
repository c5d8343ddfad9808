use std::io;

use cardshell_apdu_core::CardShell;
use cardshell_transport_pcsc::{PcscConfig, PcscDeviceManager};
use clap::Parser;
use colored::Colorize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

mod commands;
mod utils;

use commands::{Reply, select_terminal_by_name};
use utils::{ShareModeArg, display, session};

#[derive(Parser)]
#[command(version, about = "Interactive shell for exchanging APDUs with smart cards")]
struct Cli {
    /// Card terminal to select at startup
    #[arg(short, long)]
    reader: Option<String>,

    /// PC/SC share mode for card connections
    #[arg(long, value_enum, default_value_t = ShareModeArg::Shared)]
    share_mode: ShareModeArg,

    /// Debug level output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command line arguments
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose);

    // Create a PC/SC device manager
    let config = PcscConfig::new().with_share_mode(cli.share_mode.into());
    let manager = PcscDeviceManager::with_config(config)?;
    let mut shell = CardShell::new(Box::new(manager));

    if let Some(reader) = &cli.reader {
        match select_terminal_by_name(&mut shell, reader) {
            Reply::Silent => info!("Using reader: {}", reader),
            _ => warn!("Reader {} not found, starting without a terminal", reader),
        }
    }

    println!("{}", display::BANNER.bold());
    println!("{}", display::WELCOME);

    session::run(&mut shell, io::stdin().lock(), io::stdout().lock())?;
    Ok(())
}

fn setup_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };

    // RUST_LOG takes precedence over the verbosity flag
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(true)
        .with_writer(io::stderr)
        .init();
}
