//! Phase mapping from signal samples to rotation angles.

use std::f64::consts::PI;

use crate::signal::Signal;

/// Default mapping scale: a full-scale sample maps to π/12 radians.
pub const DEFAULT_SCALE: f64 = PI / 12.0;

/// Map a sample to a rotation angle in `[-scale, scale]`.
///
/// Linear in the sample, clamped at the bounds, so the map is monotone and the
/// result never exceeds `scale` in magnitude. `scale` must be non-negative.
pub fn map_phase(sample: f64, scale: f64) -> f64 {
    (sample * scale).clamp(-scale, scale)
}

/// Map every sample of a signal.
pub fn map_signal(signal: &Signal, scale: f64) -> Vec<f64> {
    signal.samples().iter().map(|&x| map_phase(x, scale)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_region() {
        assert_eq!(map_phase(0.0, DEFAULT_SCALE), 0.0);
        assert_eq!(map_phase(0.5, 0.2), 0.1);
        assert_eq!(map_phase(-1.0, DEFAULT_SCALE), -DEFAULT_SCALE);
    }

    #[test]
    fn test_clamps_out_of_range() {
        assert_eq!(map_phase(100.0, 0.3), 0.3);
        assert_eq!(map_phase(-1e300, 0.3), -0.3);
        assert_eq!(map_phase(5.0, 0.0), 0.0);
    }

    #[test]
    fn test_map_signal() {
        let signal = Signal::from_samples(2.0, vec![1.0, -0.5, 3.0]);
        assert_eq!(map_signal(&signal, 0.4), vec![0.4, -0.2, 0.4]);
    }
}
