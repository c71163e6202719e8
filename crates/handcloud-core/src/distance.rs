//! Normalized hand proximity.

use serde::{Deserialize, Serialize};

/// Hand proximity normalized to [0, 1], produced by exactly one active source.
///
/// Construction clamps; non-finite input collapses to [`DistanceSignal::FALLBACK`].
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(from = "f32", into = "f32")]
pub struct DistanceSignal(f32);

impl DistanceSignal {
    /// Value used before any source reports and after the camera stops
    pub const FALLBACK: f32 = 0.5;
    /// Lower bound of the canonical range
    pub const MIN: f32 = 0.0;
    /// Upper bound of the canonical range
    pub const MAX: f32 = 1.0;

    /// Clamp `value` into the canonical range
    pub fn new(value: f32) -> Self {
        if value.is_finite() {
            Self(value.clamp(Self::MIN, Self::MAX))
        } else {
            Self(Self::FALLBACK)
        }
    }

    /// The clamped value
    pub fn value(self) -> f32 {
        self.0
    }
}

impl Default for DistanceSignal {
    fn default() -> Self {
        Self(Self::FALLBACK)
    }
}

impl From<f32> for DistanceSignal {
    fn from(value: f32) -> Self {
        Self::new(value)
    }
}

impl From<DistanceSignal> for f32 {
    fn from(signal: DistanceSignal) -> Self {
        signal.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamps_into_range() {
        assert_eq!(DistanceSignal::new(-3.0).value(), 0.0);
        assert_eq!(DistanceSignal::new(0.25).value(), 0.25);
        assert_eq!(DistanceSignal::new(42.0).value(), 1.0);
    }

    #[test]
    fn test_non_finite_falls_back() {
        assert_eq!(DistanceSignal::new(f32::NAN).value(), DistanceSignal::FALLBACK);
        assert_eq!(
            DistanceSignal::new(f32::INFINITY).value(),
            DistanceSignal::FALLBACK
        );
    }

    #[test]
    fn test_default_is_fallback() {
        assert_eq!(DistanceSignal::default().value(), 0.5);
    }
}
