//! Noise channel types.
//!
//! Noise is a first-class instruction in the circuit, so the same circuit can
//! be simulated either as written (noisy) or with every channel skipped
//! (ideal). The ideal run defines the expected outcome a noisy run is scored
//! against.
//!
//! Only coherent channels are modelled here. They are unitary, which keeps the
//! statevector interpreter exact; stochastic readout error lives in the
//! simulator backend instead.

use serde::{Deserialize, Serialize};

/// A coherent noise channel on a single qubit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum NoiseModel {
    /// Unwanted Z rotation (dephasing drift) by `angle` radians.
    CoherentZ {
        /// Drift angle in radians.
        angle: f64,
    },

    /// Unwanted X rotation (over-rotation) by `angle` radians.
    CoherentX {
        /// Drift angle in radians.
        angle: f64,
    },
}

impl NoiseModel {
    /// Get a human-readable name for this noise model.
    pub fn name(&self) -> &'static str {
        match self {
            NoiseModel::CoherentZ { .. } => "coherent_z",
            NoiseModel::CoherentX { .. } => "coherent_x",
        }
    }

    /// Get the drift angle of this channel.
    pub fn angle(&self) -> f64 {
        match self {
            NoiseModel::CoherentZ { angle } | NoiseModel::CoherentX { angle } => *angle,
        }
    }
}

impl std::fmt::Display for NoiseModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NoiseModel::CoherentZ { angle } => write!(f, "coherent_z(θ={angle:.4})"),
            NoiseModel::CoherentX { angle } => write!(f, "coherent_x(θ={angle:.4})"),
        }
    }
}
