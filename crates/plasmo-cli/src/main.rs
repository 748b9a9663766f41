//! Plasmo CLI - Command-line interface for transport network simulations.

mod commands;
mod config;

use anyhow::Result;
use clap::{Parser, Subcommand};
use plasmo::prelude::Scenario;

#[derive(Parser)]
#[command(name = "plasmo")]
#[command(author, version, about = "Plasmo - Adaptive transport networks", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new Plasmo project
    Init {
        /// Project directory (default: current directory)
        #[arg(short, long)]
        path: Option<String>,
    },

    /// Start a fresh simulation
    Run {
        /// Number of nodes (default: from plasmo.toml)
        #[arg(short, long)]
        nodes: Option<usize>,

        /// Fraction of node pairs joined at start, 0.0-1.0
        #[arg(short, long)]
        connectivity: Option<f64>,

        /// Scenario: balanced, hotspot, migration, failure, growth
        #[arg(short, long)]
        scenario: Option<Scenario>,

        /// Number of ticks to run
        #[arg(short, long)]
        ticks: Option<u64>,

        /// RNG seed for a reproducible run
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Continue the saved simulation
    Resume {
        /// Number of ticks to run
        #[arg(short, long)]
        ticks: Option<u64>,
    },

    /// Show network statistics for the saved simulation
    Stats,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Init { path } => commands::init::run(path),
        Commands::Run {
            nodes,
            connectivity,
            scenario,
            ticks,
            seed,
        } => commands::run::run(
            commands::run::RunOverrides {
                nodes,
                connectivity,
                scenario,
                ticks,
                seed,
            },
            cli.verbose,
        ),
        Commands::Resume { ticks } => commands::resume::run(ticks, cli.verbose),
        Commands::Stats => commands::stats::run(),
    }
}
