//! Seed derivation.
//!
//! Every trial gets its own explicit seeds, derived from the run's base seed
//! and the trial index with SplitMix64. Trials therefore do not depend on the
//! order in which they run.

use serde::{Deserialize, Serialize};

const GOLDEN_GAMMA: u64 = 0x9E37_79B9_7F4A_7C15;

/// One SplitMix64 step.
pub fn splitmix64(x: u64) -> u64 {
    let mut z = x.wrapping_add(GOLDEN_GAMMA);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Draw a fresh base seed from OS entropy.
pub fn entropy_seed() -> u64 {
    rand::random()
}

/// Seeds for the independent random streams of one trial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialSeeds {
    /// Trial seed all others are derived from.
    pub trial: u64,
    /// Circuit generation.
    pub circuit: u64,
    /// Signal noise.
    pub signal: u64,
    /// Shot sampling, shared by the baseline and stabilized runs.
    pub shots: u64,
}

impl TrialSeeds {
    /// Derive the seeds for trial `index` of a run seeded with `base`.
    pub fn derive(base: u64, index: usize) -> Self {
        let trial = splitmix64(base ^ splitmix64(index as u64));
        Self {
            trial,
            circuit: splitmix64(trial.wrapping_add(1)),
            signal: splitmix64(trial.wrapping_add(2)),
            shots: splitmix64(trial.wrapping_add(3)),
        }
    }
}
