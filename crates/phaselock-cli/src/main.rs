//! Phaselock Command-Line Interface
//!
//! Runs the paired baseline/stabilized benchmark on the local statevector
//! simulator and reports whether signal-derived counter-rotations change the
//! error rate.
//!
//! ```text
//! phaselock run --trials 100 --shots 1024 --seed 42 --plot results.svg
//! phaselock signal --seed 7 --format json
//! phaselock init-config --output bench.yaml
//! ```

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use clap::{Parser, Subcommand};
use console::style;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{init_config, run, signal, version};

/// Phaselock - paired error-rate benchmark for signal-derived phase corrections
#[derive(Parser)]
#[command(name = "phaselock")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the paired benchmark
    Run(run::RunArgs),

    /// Generate and print one synthetic signal
    Signal(signal::SignalArgs),

    /// Write a default configuration file
    InitConfig {
        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Show version information
    Version,
}

fn main() {
    let cli = Cli::parse();

    // Setup logging
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Execute command
    let result = match cli.command {
        Commands::Run(args) => run::execute(&args),
        Commands::Signal(args) => signal::execute(&args),
        Commands::InitConfig { output, force } => init_config::execute(output.as_deref(), force),
        Commands::Version => {
            version::execute();
            Ok(())
        }
    };

    // Handle errors
    if let Err(e) = result {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }
}
