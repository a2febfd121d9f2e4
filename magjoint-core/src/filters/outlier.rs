//! Population-based sigma clipping
//!
//! ## Algorithm
//!
//! ```text
//! μ[i] = mean over population of frame[i]
//! σ[i] = sqrt(mean over population of (frame[i] - μ[i])²)      (population σ)
//! out[i] = clamp(sample[i], μ[i] - k·σ[i], μ[i] + k·σ[i])
//! ```
//!
//! The population stores the *unclipped* sample after each call, so a real
//! step change in the field widens σ over the following calls and is passed
//! through once it persists.

use super::Readiness;
use crate::buffer::PopulationBuffer;
use crate::constants::{DEFAULT_OUTLIER_POPULATION, DEFAULT_OUTLIER_SIGMA};
use crate::errors::{ConfigError, ConfigResult, EstimateError, EstimateResult};
use crate::features::FeatureFrame;

/// Outlier filter parameters
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct OutlierConfig {
    /// Frames kept as the reference population (≥ 1); also the warm-up length
    pub population: usize,
    /// Clipping half-width in standard deviations (finite, > 0)
    pub sigma: f64,
}

impl Default for OutlierConfig {
    fn default() -> Self {
        Self {
            population: DEFAULT_OUTLIER_POPULATION,
            sigma: DEFAULT_OUTLIER_SIGMA,
        }
    }
}

impl OutlierConfig {
    pub fn with_population(mut self, population: usize) -> Self {
        self.population = population;
        self
    }

    pub fn with_sigma(mut self, sigma: f64) -> Self {
        self.sigma = sigma;
        self
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.population == 0 {
            return Err(ConfigError::InvalidPopulation {
                population: self.population,
            });
        }
        if !(self.sigma.is_finite() && self.sigma > 0.0) {
            return Err(ConfigError::InvalidSigma { sigma: self.sigma });
        }
        Ok(())
    }
}

/// Per-element mean and population standard deviation
#[derive(Debug, Clone, PartialEq)]
pub struct PopulationStats {
    pub mean: FeatureFrame,
    pub std_dev: FeatureFrame,
}

/// Rolling-population sigma clipper
#[derive(Debug, Clone)]
pub struct OutlierFilter {
    config: OutlierConfig,
    population: PopulationBuffer<FeatureFrame>,
}

impl OutlierFilter {
    pub fn new(config: OutlierConfig) -> ConfigResult<Self> {
        config.validate()?;

        Ok(Self {
            population: PopulationBuffer::new(config.population),
            config,
        })
    }

    pub fn config(&self) -> &OutlierConfig {
        &self.config
    }

    /// Frames collected so far
    pub fn collected(&self) -> usize {
        self.population.len()
    }

    /// Frames needed before output starts
    pub fn required(&self) -> usize {
        self.population.capacity()
    }

    pub fn is_ready(&self) -> bool {
        self.population.is_full()
    }

    /// Clip `frame` against the population and record it
    ///
    /// During warm-up the frame is only recorded. The call that completes the
    /// population clips against the completed population (which includes the
    /// frame itself); later calls clip against the preceding `P` frames.
    pub fn filter(&mut self, frame: &FeatureFrame) -> EstimateResult<Readiness<FeatureFrame>> {
        self.check_shape(frame)?;

        if !self.population.is_full() {
            self.population.push(frame.clone());
            if !self.population.is_full() {
                return Ok(Readiness::WarmingUp {
                    collected: self.population.len(),
                    required: self.population.capacity(),
                });
            }

            log_debug!(
                "Outlier population complete after {} frames",
                self.population.len()
            );
            return Ok(Readiness::Ready(self.clip_against_population(frame)));
        }

        let clipped = self.clip_against_population(frame);
        self.population.push(frame.clone());
        Ok(Readiness::Ready(clipped))
    }

    /// Mean and standard deviation of the current population
    pub fn statistics(&self) -> Option<PopulationStats> {
        let first = self.population.iter().next()?;
        let count = self.population.len() as f64;

        let mut sum = FeatureFrame::zeros(first.len());
        for frame in self.population.iter() {
            sum = sum.zip_map(frame, |acc, v| acc + v);
        }
        let mean = sum.zip_map(&sum, |s, _| s / count);

        let mut squares = FeatureFrame::zeros(first.len());
        for frame in self.population.iter() {
            let deviation = frame.zip_map(&mean, |v, m| v - m);
            squares = squares.zip_map(&deviation, |acc, d| acc + d * d);
        }
        let std_dev = squares.zip_map(&squares, |s, _| (s / count).sqrt());

        Some(PopulationStats { mean, std_dev })
    }

    /// Mean of the current population, used to seed the smoother
    pub fn population_mean(&self) -> Option<FeatureFrame> {
        self.statistics().map(|stats| stats.mean)
    }

    /// Forget all collected frames; the next call starts a new warm-up
    pub fn reset(&mut self) {
        self.population.clear();
    }

    fn check_shape(&self, frame: &FeatureFrame) -> EstimateResult<()> {
        match self.population.last() {
            Some(last) if last.len() != frame.len() => Err(EstimateError::FrameShapeMismatch {
                expected: last.len(),
                provided: frame.len(),
            }),
            _ => Ok(()),
        }
    }

    fn clip_against_population(&self, frame: &FeatureFrame) -> FeatureFrame {
        match self.statistics() {
            Some(stats) => clip(frame, &stats, self.config.sigma),
            None => frame.clone(),
        }
    }
}

fn clip(frame: &FeatureFrame, stats: &PopulationStats, sigma: f64) -> FeatureFrame {
    let lower = stats.mean.zip_map(&stats.std_dev, |m, s| m - sigma * s);
    let upper = stats.mean.zip_map(&stats.std_dev, |m, s| m + sigma * s);

    frame
        .zip_map(&lower, |v, lo| if v < lo { lo } else { v })
        .zip_map(&upper, |v, hi| if v > hi { hi } else { v })
}
