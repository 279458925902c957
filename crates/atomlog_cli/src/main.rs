//! atomlog CLI
//!
//! Command-line tools for atomlog feed directories.
//!
//! # Commands
//!
//! - `pages` - List the page chain of a stream
//! - `verify` - Check the chain invariants of a stream
//! - `dump` - Print a stored document

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// atomlog command-line feed tools.
#[derive(Parser)]
#[command(name = "atomlog")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the feed directory
    #[arg(global = true, short, long)]
    path: Option<PathBuf>,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the pages of a stream, oldest first
    Pages {
        /// Stream identifier (urn:uuid:... or bare UUID)
        stream: String,
    },

    /// Check the page chain of a stream
    Verify {
        /// Stream identifier (urn:uuid:... or bare UUID)
        stream: String,

        /// Expected entries per full page (inferred from the oldest page if
        /// omitted)
        #[arg(long)]
        page_size: Option<usize>,
    },

    /// Print a stored document
    Dump {
        /// Document address (<uuid> or <segment>/<uuid>)
        address: String,

        /// Print a summary of the entries instead of the raw document
        #[arg(short, long)]
        summary: bool,
    },

    /// Show version information
    Version,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Commands::Pages { stream } => {
            let path = cli.path.ok_or("Feed directory required for pages")?;
            commands::pages::run(&path, &stream)?;
        }
        Commands::Verify { stream, page_size } => {
            let path = cli.path.ok_or("Feed directory required for verify")?;
            commands::verify::run(&path, &stream, page_size)?;
        }
        Commands::Dump { address, summary } => {
            let path = cli.path.ok_or("Feed directory required for dump")?;
            commands::dump::run(&path, &address, summary)?;
        }
        Commands::Version => {
            println!("atomlog CLI v{}", env!("CARGO_PKG_VERSION"));
            println!("atomlog Core v{}", atomlog_core::VERSION);
        }
    }

    Ok(())
}
