//! Synthetic signal generator.
//!
//! Produces a short time series with one dominant low-frequency oscillation
//! plus additive Gaussian noise:
//!
//! ```text
//! x_k = amplitude · sin(2π f t_k + φ) + noise_amplitude · z_k,   t_k = k / sample_rate
//! ```
//!
//! With `endpoint` set the grid includes `t = duration`, so the defaults give
//! `t = [0, 0.75, 1.5]`.
//!
//! All randomness comes from the seed passed to [`SignalGenerator::generate`].

use rand::distributions::Open01;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, Normal};
use std::f64::consts::PI;

/// Parameters of the synthetic signal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalParams {
    /// Samples per second.
    pub sample_rate: f64,
    /// Length of the series in seconds.
    pub duration: f64,
    /// Frequency of the dominant oscillation in Hz.
    pub target_frequency: f64,
    /// Oscillation amplitude.
    pub amplitude: f64,
    /// Standard deviation multiplier of the additive noise.
    pub noise_amplitude: f64,
    /// Phase offset in radians.
    pub phase_offset: f64,
    /// Divide the series by its peak magnitude before mapping.
    pub normalize: bool,
    /// Include a final sample at `t = duration`.
    pub endpoint: bool,
}

impl Default for SignalParams {
    fn default() -> Self {
        Self {
            sample_rate: 4.0 / 3.0,
            duration: 1.5,
            target_frequency: 0.67,
            amplitude: 0.95,
            noise_amplitude: 0.05,
            phase_offset: 0.0,
            normalize: true,
            endpoint: true,
        }
    }
}

impl SignalParams {
    /// Number of samples, `round(duration · sample_rate)`, plus one when
    /// `endpoint` is set. A non-positive duration yields no samples.
    pub fn num_samples(&self) -> usize {
        let n = (self.duration * self.sample_rate).round();
        if !(n.is_finite() && self.duration > 0.0) {
            return 0;
        }
        n.max(0.0) as usize + usize::from(self.endpoint)
    }
}

/// A generated time series. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    sample_rate: f64,
    samples: Vec<f64>,
}

impl Signal {
    /// Wrap existing samples.
    pub fn from_samples(sample_rate: f64, samples: Vec<f64>) -> Self {
        Self {
            sample_rate,
            samples,
        }
    }

    /// The sample values.
    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    /// Samples per second.
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the series is empty.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Sample timestamps in seconds.
    pub fn times(&self) -> impl Iterator<Item = f64> + '_ {
        (0..self.samples.len()).map(|k| k as f64 / self.sample_rate)
    }

    /// Largest absolute sample value, `0` for an empty series.
    pub fn peak(&self) -> f64 {
        self.samples.iter().fold(0.0, |m, x| m.max(x.abs()))
    }

    /// Copy scaled so the peak magnitude is 1. An all-zero series is returned as is.
    pub fn normalized(&self) -> Signal {
        let peak = self.peak();
        if peak == 0.0 {
            return self.clone();
        }
        Signal {
            sample_rate: self.sample_rate,
            samples: self.samples.iter().map(|x| x / peak).collect(),
        }
    }
}

/// Seeded generator for [`Signal`]s.
#[derive(Debug, Clone)]
pub struct SignalGenerator {
    params: SignalParams,
    normal: Normal,
}

impl SignalGenerator {
    /// Create a generator for the given parameters.
    pub fn new(params: SignalParams) -> Self {
        Self {
            params,
            normal: Normal::standard(),
        }
    }

    /// Generator parameters.
    pub fn params(&self) -> &SignalParams {
        &self.params
    }

    /// Generate a series. The same seed always yields the same samples.
    pub fn generate(&self, seed: u64) -> Signal {
        let p = &self.params;
        let mut rng = StdRng::seed_from_u64(seed);
        let omega = 2.0 * PI * p.target_frequency;

        let samples = (0..p.num_samples())
            .map(|k| {
                let t = k as f64 / p.sample_rate;
                // Drawn even when noise is off so the stream stays aligned.
                let u: f64 = rng.sample(Open01);
                let z = self.normal.inverse_cdf(u);
                p.amplitude * (omega * t + p.phase_offset).sin() + p.noise_amplitude * z
            })
            .collect();

        Signal::from_samples(p.sample_rate, samples)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_grid_includes_endpoint() {
        let params = SignalParams::default();
        assert_eq!(params.num_samples(), 3);
        let signal = SignalGenerator::new(params).generate(1);
        assert_eq!(signal.len(), 3);
        let times: Vec<f64> = signal.times().collect();
        for (t, expected) in times.iter().zip([0.0, 0.75, 1.5]) {
            assert!((t - expected).abs() < 1e-12, "t = {t}");
        }
    }

    #[test]
    fn test_default_noise_free_samples() {
        let params = SignalParams {
            noise_amplitude: 0.0,
            ..SignalParams::default()
        };
        let signal = SignalGenerator::new(params).generate(4);
        let expected = [0.0, -0.014_922, 0.029_840];
        for (x, e) in signal.samples().iter().zip(expected) {
            assert!((x - e).abs() < 1e-5, "x = {x}, expected {e}");
        }
    }

    #[test]
    fn test_endpoint_flag() {
        let open = SignalParams {
            endpoint: false,
            duration: 3.0,
            sample_rate: 2.0,
            ..SignalParams::default()
        };
        assert_eq!(open.num_samples(), 6);
        let closed = SignalParams {
            endpoint: true,
            ..open
        };
        assert_eq!(closed.num_samples(), 7);
        let last = SignalGenerator::new(closed).generate(0).times().last().unwrap();
        assert!((last - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_same_seed_same_bytes() {
        let generator = SignalGenerator::new(SignalParams {
            duration: 30.0,
            ..SignalParams::default()
        });
        let a = generator.generate(1234);
        let b = generator.generate(1234);
        let bits = |s: &Signal| s.samples().iter().map(|x| x.to_bits()).collect::<Vec<_>>();
        assert_eq!(bits(&a), bits(&b));
        assert_ne!(a, generator.generate(1235));
    }

    #[test]
    fn test_noise_free_is_pure_oscillation() {
        let params = SignalParams {
            noise_amplitude: 0.0,
            duration: 10.0,
            sample_rate: 8.0,
            ..SignalParams::default()
        };
        let signal = SignalGenerator::new(params).generate(9);
        for (k, x) in signal.samples().iter().enumerate() {
            let t = k as f64 / params.sample_rate;
            let expected = params.amplitude * (2.0 * PI * params.target_frequency * t).sin();
            assert_eq!(*x, expected);
        }
    }

    #[test]
    fn test_noise_is_finite_and_roughly_standard() {
        let params = SignalParams {
            amplitude: 0.0,
            noise_amplitude: 1.0,
            duration: 5000.0,
            sample_rate: 1.0,
            ..SignalParams::default()
        };
        let signal = SignalGenerator::new(params).generate(77);
        assert!(signal.samples().iter().all(|x| x.is_finite()));
        let n = signal.len() as f64;
        let mean = signal.samples().iter().sum::<f64>() / n;
        let var = signal.samples().iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1.0);
        assert!(mean.abs() < 0.1, "mean = {mean}");
        assert!((var - 1.0).abs() < 0.1, "var = {var}");
    }

    #[test]
    fn test_normalized() {
        let signal = Signal::from_samples(1.0, vec![0.5, -2.0, 1.0]);
        assert_eq!(signal.normalized().samples(), &[0.25, -1.0, 0.5]);

        let flat = Signal::from_samples(1.0, vec![0.0, 0.0]);
        assert_eq!(flat.normalized(), flat);
        assert_eq!(Signal::from_samples(1.0, vec![]).peak(), 0.0);
    }

    #[test]
    fn test_zero_duration() {
        let params = SignalParams {
            duration: 0.0,
            ..SignalParams::default()
        };
        assert!(SignalGenerator::new(params).generate(0).is_empty());
    }
}
