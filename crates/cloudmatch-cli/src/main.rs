//! cloudmatch-cli: Command-line interface for 2D point-set registration.
//!
//! This tool wraps the cloudmatch library for scripting: inspect point files,
//! and register one cloud against another using externally produced
//! triangulations.
//!
//! # Logging
//!
//! Set the `RUST_LOG` environment variable to control log output:
//! - `RUST_LOG=cloudmatch=info` - Basic operation logging
//! - `RUST_LOG=cloudmatch=debug` - Detailed progress logging
//! - `RUST_LOG=cloudmatch::timing=debug` - Performance timing
//!
//! # Example
//!
//! ```bash
//! cloudmatch info robot0_map.txt
//! cloudmatch register robot0_map.txt robot0_tris.txt robot1_map.txt robot1_tris.txt \
//!     --threshold 0.1 --format json
//! ```

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod commands;
mod output;

use commands::{info, register};

/// cloudmatch - register 2D point clouds by triangle matching.
#[derive(Parser)]
#[command(name = "cloudmatch")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format for results
    #[arg(long, global = true, default_value = "text")]
    format: OutputFormat,

    /// Suppress all non-error output
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Increase output verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(long, short, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    Text,
    /// JSON output for scripting
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Display point-set statistics
    Info {
        /// Input point file (one `x,y` pair per line)
        input: PathBuf,
    },

    /// Estimate the rigid transform aligning a data cloud to a model cloud
    Register {
        /// Model point file
        model: PathBuf,

        /// Model triangulation file (one `i,j,k` triple per line)
        model_triangles: PathBuf,

        /// Data point file
        data: PathBuf,

        /// Data triangulation file
        data_triangles: PathBuf,

        /// Triangle matching threshold
        #[arg(long, default_value = "0.1")]
        threshold: f64,

        /// Drop repeated candidate correspondences before pruning
        #[arg(long)]
        dedup: bool,

        /// Noise sigma passed through to the consistency stage
        #[arg(long, default_value = "0.1")]
        sigma: f64,

        /// Outlier epsilon passed through to the consistency stage
        #[arg(long, default_value = "0.3")]
        epsilon: f64,

        /// Write the aligned model points to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn init_tracing(verbose: u8, quiet: bool) {
    if quiet {
        return;
    }

    let default_filter = match verbose {
        0 => "warn",
        1 => "cloudmatch=info",
        2 => "cloudmatch=debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    match &cli.command {
        Commands::Info { input } => info::run(input, &cli),
        Commands::Register {
            model,
            model_triangles,
            data,
            data_triangles,
            threshold,
            dedup,
            sigma,
            epsilon,
            output,
        } => register::run(
            &register::RegisterArgs {
                model: model.clone(),
                model_triangles: model_triangles.clone(),
                data: data.clone(),
                data_triangles: data_triangles.clone(),
                threshold: *threshold,
                dedup: *dedup,
                sigma: *sigma,
                epsilon: *epsilon,
                output: output.clone(),
            },
            &cli,
        ),
    }
}
