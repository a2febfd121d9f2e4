//! Exponential (first-order IIR) smoothing
//!
//! ```text
//! state₀ = seed                       (outlier population mean)
//! stateₙ = w·sampleₙ + (1 - w)·stateₙ₋₁
//! ```
//!
//! For a constant input `v` the error `|stateₙ - v|` shrinks by `(1 - w)`
//! every call.

use crate::constants::DEFAULT_IIR_NEW_SAMPLE_WEIGHT;
use crate::errors::{ConfigError, ConfigResult, EstimateError, EstimateResult};
use crate::features::FeatureFrame;

/// Smoothing filter parameters
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SmoothingConfig {
    /// Weight of the newest sample, strictly inside (0, 1)
    pub new_sample_weight: f64,
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            new_sample_weight: DEFAULT_IIR_NEW_SAMPLE_WEIGHT,
        }
    }
}

impl SmoothingConfig {
    pub fn with_weight(new_sample_weight: f64) -> Self {
        Self { new_sample_weight }
    }

    pub fn validate(&self) -> ConfigResult<()> {
        let w = self.new_sample_weight;
        if !(w > 0.0 && w < 1.0) {
            return Err(ConfigError::InvalidSmoothingWeight { weight: w });
        }
        Ok(())
    }
}

/// Exponential moving average over feature frames
#[derive(Debug, Clone)]
pub struct SmoothingFilter {
    weight: f64,
    state: Option<FeatureFrame>,
}

impl SmoothingFilter {
    pub fn new(config: SmoothingConfig) -> ConfigResult<Self> {
        config.validate()?;

        Ok(Self {
            weight: config.new_sample_weight,
            state: None,
        })
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// Current accumulator, `None` before the first call
    pub fn state(&self) -> Option<&FeatureFrame> {
        self.state.as_ref()
    }

    /// Blend `frame` into the accumulator and return the new state
    ///
    /// `seed` initialises the accumulator on the first call; without one the
    /// first frame itself is the starting state.
    pub fn smooth(
        &mut self,
        frame: &FeatureFrame,
        seed: Option<FeatureFrame>,
    ) -> EstimateResult<FeatureFrame> {
        let previous = match self.state.take() {
            Some(state) => state,
            None => seed.unwrap_or_else(|| frame.clone()),
        };

        if previous.len() != frame.len() {
            let expected = previous.len();
            self.state = Some(previous);
            return Err(EstimateError::FrameShapeMismatch {
                expected,
                provided: frame.len(),
            });
        }

        let w = self.weight;
        let next = frame.zip_map(&previous, |sample, state| w * sample + (1.0 - w) * state);
        self.state = Some(next.clone());
        Ok(next)
    }

    /// Drop the accumulator; the next call re-seeds
    pub fn reset(&mut self) {
        self.state = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::FeatureVector;
    use proptest::prelude::*;

    fn frame(value: f64) -> FeatureFrame {
        FeatureFrame::new(vec![FeatureVector::new([value; 12])])
    }

    #[test]
    fn rejects_weights_outside_open_interval() {
        for weight in [0.0, 1.0, -0.1, 1.5, f64::NAN] {
            assert!(matches!(
                SmoothingFilter::new(SmoothingConfig::with_weight(weight)),
                Err(ConfigError::InvalidSmoothingWeight { .. })
            ));
        }
    }

    #[test]
    fn first_call_blends_with_seed() {
        let mut filter = SmoothingFilter::new(SmoothingConfig::with_weight(0.25)).unwrap();
        let out = filter.smooth(&frame(4.0), Some(frame(0.0))).unwrap();
        assert!(out.values().all(|v| (v - 1.0).abs() < 1e-12));
    }

    #[test]
    fn seed_is_ignored_once_running() {
        let mut filter = SmoothingFilter::new(SmoothingConfig::with_weight(0.5)).unwrap();
        filter.smooth(&frame(2.0), None).unwrap();
        let out = filter.smooth(&frame(4.0), Some(frame(1000.0))).unwrap();
        assert!(out.values().all(|v| (v - 3.0).abs() < 1e-12));
    }

    #[test]
    fn shape_mismatch_keeps_state() {
        let mut filter = SmoothingFilter::new(SmoothingConfig::default()).unwrap();
        filter.smooth(&frame(1.0), None).unwrap();

        let err = filter.smooth(&FeatureFrame::zeros(3), None).unwrap_err();
        assert_eq!(err, EstimateError::FrameShapeMismatch { expected: 1, provided: 3 });
        assert_eq!(filter.state(), Some(&frame(1.0)));
    }

    proptest! {
        #[test]
        fn converges_geometrically(
            weight in 0.05f64..0.95,
            seed in -1e-2f64..1e-2,
            target in -1e-2f64..1e-2,
            steps in 1usize..40,
        ) {
            let mut filter = SmoothingFilter::new(SmoothingConfig::with_weight(weight)).unwrap();
            let initial_error = (seed - target).abs();

            let mut out = filter.smooth(&frame(target), Some(frame(seed))).unwrap();
            for _ in 1..steps {
                out = filter.smooth(&frame(target), None).unwrap();
            }

            let bound = initial_error * (1.0 - weight).powi(steps as i32) + 1e-15;
            prop_assert!(out.values().all(|v| (v - target).abs() <= bound));
        }
    }
}
