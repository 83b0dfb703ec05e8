//! Run command implementation.

use anyhow::{Context, Result};
use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

use phaselock_adapter_sim::SimulatorBackend;
use phaselock_bench::plot::render_svg;
use phaselock_bench::{BenchConfig, BenchReport, BenchmarkRunner, Placement, Verdict};
use phaselock_hal::Backend;

use super::common::{ReportFormat, load_config, write_file};

/// Arguments of the run command.
#[derive(Debug, Args)]
pub struct RunArgs {
    /// Configuration file (YAML or JSON)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Number of paired trials
    #[arg(short, long)]
    pub trials: Option<usize>,

    /// Shots per circuit execution
    #[arg(short, long)]
    pub shots: Option<u32>,

    /// Qubits per circuit
    #[arg(short, long)]
    pub qubits: Option<u32>,

    /// Echo layers per circuit
    #[arg(short, long)]
    pub depth: Option<usize>,

    /// Base seed (drawn from entropy if omitted)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Signal noise amplitude
    #[arg(long)]
    pub noise_amplitude: Option<f64>,

    /// Signal oscillation frequency in Hz
    #[arg(long)]
    pub target_frequency: Option<f64>,

    /// Bound of the coherent drift per echo layer, in radians
    #[arg(long)]
    pub coherent_noise: Option<f64>,

    /// Per-qubit readout flip probability
    #[arg(long)]
    pub readout_error: Option<f64>,

    /// Correction placement: interleaved repeats the full angle after every noise channel
    /// (depth times per qubit); terminal applies it once before measurement, where it
    /// cannot change Z-basis outcomes
    #[arg(long)]
    pub placement: Option<Placement>,

    /// Write the JSON report to this file
    #[arg(short, long)]
    pub output: Option<String>,

    /// Write an SVG plot to this file
    #[arg(long)]
    pub plot: Option<String>,

    /// Include per-trial rows in the JSON report
    #[arg(long)]
    pub include_trials: bool,

    /// Output format on stdout
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: ReportFormat,

    /// Disable the progress bar
    #[arg(long)]
    pub no_progress: bool,
}

impl RunArgs {
    /// Apply command-line overrides, the highest-precedence layer.
    fn apply(&self, config: &mut BenchConfig) {
        if let Some(v) = self.trials {
            config.trials = v;
        }
        if let Some(v) = self.shots {
            config.shots_per_trial = v;
        }
        if let Some(v) = self.qubits {
            config.qubits = v;
        }
        if let Some(v) = self.depth {
            config.depth = v;
        }
        if let Some(v) = self.seed {
            config.seed = Some(v);
        }
        if let Some(v) = self.noise_amplitude {
            config.signal.noise_amplitude = v;
        }
        if let Some(v) = self.target_frequency {
            config.signal.target_frequency = v;
        }
        if let Some(v) = self.coherent_noise {
            config.coherent_noise = v;
        }
        if let Some(v) = self.readout_error {
            config.readout_error = v;
        }
        if let Some(v) = self.placement {
            config.placement = v;
        }
    }
}

/// Execute the run command.
pub fn execute(args: &RunArgs) -> Result<()> {
    let mut config = load_config(args.config.as_deref())?;
    args.apply(&mut config);
    config.validate().context("Invalid configuration")?;

    let backend = SimulatorBackend::new()
        .with_readout_error(config.readout_error)
        .context("Failed to configure simulator")?;
    let runner = BenchmarkRunner::new(&config, &backend)?;
    let text = args.format == ReportFormat::Text;

    if text {
        println!(
            "{} Running {} trials on {} ({} qubits, depth {}, {} shots, seed {})",
            style("→").cyan().bold(),
            config.trials,
            style(backend.name()).yellow(),
            config.qubits,
            config.depth,
            config.shots_per_trial,
            style(runner.seed()).dim()
        );
    }

    let progress = if args.no_progress || config.trials == 0 {
        ProgressBar::hidden()
    } else {
        let bar = ProgressBar::new(config.trials as u64);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} trials ({eta})")
                .context("Invalid progress template")?
                .progress_chars("=> "),
        );
        bar
    };

    let table = runner.run_with_progress(|done, _| progress.set_position(done as u64));
    progress.finish_and_clear();
    debug!("{} records, {} failures", table.successful(), table.failed());

    let mut report = BenchReport::new(&config, backend.name(), &table);
    if args.include_trials {
        report = report.with_trials(&table);
    }

    if let Some(path) = &args.output {
        report
            .write_json(path)
            .with_context(|| format!("Failed to write report: {path}"))?;
    }

    if let Some(path) = &args.plot {
        write_file(path, &render_svg(&table, &report.summary))?;
    }

    match args.format {
        ReportFormat::Json => {
            if args.output.is_none() {
                println!("{}", report.to_json()?);
            }
        }
        ReportFormat::Text => {
            println!("{}", report.render_text());
            print_verdict(report.summary.verdict);
            if let Some(path) = &args.output {
                println!("{} Report written to {}", style("✓").green().bold(), path);
            }
            if let Some(path) = &args.plot {
                println!("{} Plot written to {}", style("✓").green().bold(), path);
            }
        }
    }

    Ok(())
}

fn print_verdict(verdict: Verdict) {
    let line = match verdict {
        Verdict::TargetReached => style(format!("✓ {verdict}")).green().bold(),
        Verdict::Partial => style(format!("⚠ {verdict}")).yellow().bold(),
        Verdict::NeedsAdjustment => style(format!("✗ {verdict}")).red().bold(),
        Verdict::InsufficientData => style(format!("⚠ {verdict}")).yellow(),
    };
    println!("{line}");
}
