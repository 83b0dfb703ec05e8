//! Signal command implementation.

use anyhow::{Context, Result};
use clap::Args;
use console::style;
use serde_json::json;

use phaselock_bench::seed::entropy_seed;
use phaselock_bench::{SignalGenerator, SignalParams, map_signal};

use super::common::{SignalFormat, load_config};

/// Arguments of the signal command.
#[derive(Debug, Args)]
pub struct SignalArgs {
    /// Configuration file (YAML or JSON) supplying signal parameters and mapping scale
    #[arg(short, long)]
    pub config: Option<String>,

    /// Seed for the noise (drawn from entropy if omitted)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Length in seconds
    #[arg(long)]
    pub duration: Option<f64>,

    /// Samples per second
    #[arg(long)]
    pub sample_rate: Option<f64>,

    /// Noise amplitude
    #[arg(long)]
    pub noise_amplitude: Option<f64>,

    /// Oscillation frequency in Hz
    #[arg(long)]
    pub target_frequency: Option<f64>,

    /// Maximum correction angle in radians
    #[arg(long)]
    pub mapping_scale: Option<f64>,

    /// Keep the raw samples instead of dividing by the peak magnitude
    #[arg(long)]
    pub no_normalize: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: SignalFormat,
}

impl SignalArgs {
    fn apply(&self, params: &mut SignalParams) {
        if let Some(v) = self.duration {
            params.duration = v;
        }
        if let Some(v) = self.sample_rate {
            params.sample_rate = v;
        }
        if let Some(v) = self.noise_amplitude {
            params.noise_amplitude = v;
        }
        if let Some(v) = self.target_frequency {
            params.target_frequency = v;
        }
        if self.no_normalize {
            params.normalize = false;
        }
    }
}

/// Execute the signal command.
///
/// Uses the same configuration layers as `run`, so the printed angles are
/// the ones a trial would apply for the same signal seed.
pub fn execute(args: &SignalArgs) -> Result<()> {
    let mut config = load_config(args.config.as_deref())?;
    args.apply(&mut config.signal);
    if let Some(v) = args.mapping_scale {
        config.mapping_scale = v;
    }
    config.validate().context("Invalid signal parameters")?;
    let params = config.signal;

    let seed = args.seed.unwrap_or_else(entropy_seed);
    let raw = SignalGenerator::new(params).generate(seed);
    let signal = if params.normalize {
        raw.normalized()
    } else {
        raw
    };
    let angles = map_signal(&signal, config.mapping_scale);

    match args.format {
        SignalFormat::Json => {
            let doc = json!({
                "seed": seed,
                "params": params,
                "mapping_scale": config.mapping_scale,
                "times": signal.times().collect::<Vec<_>>(),
                "samples": signal.samples(),
                "angles": angles,
            });
            let json =
                serde_json::to_string_pretty(&doc).context("JSON serialization failed")?;
            println!("{json}");
        }
        SignalFormat::Table => {
            println!(
                "{} {} samples at {} Hz, seed {}",
                style("→").cyan().bold(),
                signal.len(),
                params.sample_rate,
                style(seed).dim()
            );
            println!("{:>6}  {:>8}  {:>10}  {:>10}", "k", "t (s)", "sample", "angle");
            for (k, ((t, x), a)) in signal
                .times()
                .zip(signal.samples())
                .zip(&angles)
                .enumerate()
            {
                println!("{k:>6}  {t:>8.3}  {x:>10.6}  {a:>10.6}");
            }
        }
    }

    Ok(())
}
