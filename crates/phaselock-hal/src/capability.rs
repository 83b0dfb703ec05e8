//! Backend capability description.

use serde::{Deserialize, Serialize};

/// Static description of what a backend accepts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Capabilities {
    /// Backend name.
    pub name: String,
    /// Maximum number of qubits.
    pub num_qubits: u32,
    /// Maximum shots per execution.
    pub max_shots: u32,
    /// Whether this backend is a simulator.
    pub is_simulator: bool,
    /// Whether the backend can report the noiseless outcome of a circuit.
    pub supports_ideal_outcome: bool,
    /// Symmetric per-qubit readout flip probability applied to every shot.
    #[serde(default)]
    pub readout_error: f64,
    /// Free-form feature tags.
    pub features: Vec<String>,
}

impl Capabilities {
    /// Create capabilities for a statevector simulator.
    pub fn simulator(num_qubits: u32) -> Self {
        Self {
            name: "simulator".into(),
            num_qubits,
            max_shots: 1_000_000,
            is_simulator: true,
            supports_ideal_outcome: true,
            readout_error: 0.0,
            features: vec!["statevector".into(), "coherent_noise".into()],
        }
    }

    /// Set the shot limit.
    #[must_use]
    pub fn with_max_shots(mut self, max_shots: u32) -> Self {
        self.max_shots = max_shots;
        self
    }

    /// Set the readout error probability.
    #[must_use]
    pub fn with_readout_error(mut self, probability: f64) -> Self {
        self.readout_error = probability;
        self
    }

    /// Add a feature tag.
    #[must_use]
    pub fn with_feature(mut self, feature: impl Into<String>) -> Self {
        self.features.push(feature.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simulator_capabilities() {
        let caps = Capabilities::simulator(20).with_max_shots(4096);
        assert_eq!(caps.num_qubits, 20);
        assert_eq!(caps.max_shots, 4096);
        assert!(caps.is_simulator);
        assert!(caps.supports_ideal_outcome);
        assert_eq!(caps.readout_error, 0.0);
        assert!(caps.features.iter().any(|f| f == "statevector"));
    }

    #[test]
    fn test_readout_error_defaults_when_missing() {
        let json = r#"{"name":"sim","num_qubits":2,"max_shots":10,"is_simulator":true,
            "supports_ideal_outcome":false,"features":[]}"#;
        let caps: Capabilities = serde_json::from_str(json).unwrap();
        assert_eq!(caps.readout_error, 0.0);
        assert_eq!(
            Capabilities::simulator(2).with_readout_error(0.25).readout_error,
            0.25
        );
    }
}
