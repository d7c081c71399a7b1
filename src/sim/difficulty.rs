//! Forward-speed difficulty curve

use crate::RunConfig;

/// Saturating speed-vs-distance curve.
///
/// `speed(d) = base + extra * d^2 / (half_max^2 + d^2)`: starts at `base`,
/// approaches `base + extra` asymptotically and passes through half the
/// extra speed at `d == half_max`.
#[derive(Debug, Clone, Copy)]
pub struct DifficultyCurve {
    base_speed: f32,
    max_additional_speed: f32,
    half_maximum: f32,
}

impl DifficultyCurve {
    pub fn new(base_speed: f32, max_additional_speed: f32, half_maximum: f32) -> Self {
        Self {
            base_speed,
            max_additional_speed,
            half_maximum,
        }
    }

    pub fn from_config(config: &RunConfig) -> Self {
        Self::new(
            config.base_speed,
            config.max_additional_speed,
            config.half_maximum,
        )
    }

    /// Forward speed after `distance` units traveled.
    pub fn speed(&self, distance: f32) -> f32 {
        let d2 = distance * distance;
        self.base_speed + (self.max_additional_speed * d2) / (self.half_maximum * self.half_maximum + d2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const CURVE: DifficultyCurve = DifficultyCurve {
        base_speed: 10.0,
        max_additional_speed: 20.0,
        half_maximum: 1000.0,
    };

    #[test]
    fn test_speed_at_start_is_base_speed() {
        assert_eq!(CURVE.speed(0.0), 10.0);
    }

    #[test]
    fn test_speed_at_half_maximum_is_half_the_extra() {
        assert!((CURVE.speed(1000.0) - 20.0).abs() < 1e-4);
    }

    proptest! {
        #[test]
        fn prop_speed_is_increasing_and_bounded(
            d in 0.0f32..10_000.0,
            step in 1.0f32..500.0,
        ) {
            let near = CURVE.speed(d);
            let far = CURVE.speed(d + step);
            prop_assert!(far > near, "speed fell from {near} to {far}");
            prop_assert!(far < 30.0);
            prop_assert!(near >= 10.0);
        }
    }
}
