//! Snapshot-to-angle estimation
//!
//! ## Per-call flow
//!
//! ```text
//! [SensorSnapshot; joints]
//!     │ count check (no state touched on mismatch)
//!     ▼
//! per joint: remap pixels → calibrate → remap axes → aggregate
//!     │ FeatureFrame
//!     ▼
//! OutlierFilter ──WarmingUp──► return WarmingUp
//!     │ Ready(clipped)
//!     ▼
//! SmoothingFilter (seeded from population mean)
//!     │
//!     ▼
//! AngleInterpolator, one joint per slot ──► Ready(Vec<JointAngle>)
//! ```
//!
//! Either filter can be switched off in [`EstimatorConfig`]. With both off
//! the estimator is stateless apart from the reported temperatures.

use std::sync::Arc;

use crate::calibration::{HardwareConfig, PixelCalibrator, RawPixelSample};
use crate::constants::PIXELS_PER_SENSOR;
use crate::errors::{ConfigError, ConfigResult, EstimateError, EstimateResult};
use crate::features::{FeatureAggregator, FeatureFrame, FeatureVector};
use crate::filters::{OutlierConfig, OutlierFilter, SmoothingConfig, SmoothingFilter};
use crate::geometry::GeometryProfile;
use crate::interpolation::{AngleInterpolator, CalibrationTable, JointAngle, PolynomialTail};

pub use crate::filters::Readiness;

/// Everything needed to build an [`AngleEstimator`] besides calibration data
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EstimatorConfig {
    pub hardware: HardwareConfig,
    pub geometry: GeometryProfile,
    /// `None` disables sigma clipping and warm-up
    pub outlier: Option<OutlierConfig>,
    /// `None` disables IIR smoothing
    pub smoothing: Option<SmoothingConfig>,
    pub polynomial_tail: PolynomialTail,
    /// Served joints in telemetry order; defaults to every calibrated joint
    /// ascending. Only used when the estimator fits its own interpolator.
    pub joint_order: Option<Vec<usize>>,
    /// Sensor packages the rig carries, checked against the fitted joints
    pub expected_joints: Option<usize>,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            hardware: HardwareConfig::default(),
            geometry: GeometryProfile::default(),
            outlier: Some(OutlierConfig::default()),
            smoothing: Some(SmoothingConfig::default()),
            polynomial_tail: PolynomialTail::Auto,
            joint_order: None,
            expected_joints: None,
        }
    }
}

impl EstimatorConfig {
    /// Both filters off: every call produces angles straight from the
    /// current snapshot
    pub fn unfiltered() -> Self {
        Self {
            outlier: None,
            smoothing: None,
            ..Self::default()
        }
    }

    pub fn with_hardware(mut self, hardware: HardwareConfig) -> Self {
        self.hardware = hardware;
        self
    }

    pub fn with_geometry(mut self, geometry: GeometryProfile) -> Self {
        self.geometry = geometry;
        self
    }

    pub fn with_outlier(mut self, outlier: Option<OutlierConfig>) -> Self {
        self.outlier = outlier;
        self
    }

    pub fn with_smoothing(mut self, smoothing: Option<SmoothingConfig>) -> Self {
        self.smoothing = smoothing;
        self
    }

    pub fn with_polynomial_tail(mut self, tail: PolynomialTail) -> Self {
        self.polynomial_tail = tail;
        self
    }

    pub fn with_joint_order(mut self, order: Vec<usize>) -> Self {
        self.joint_order = Some(order);
        self
    }

    pub fn with_expected_joints(mut self, joints: usize) -> Self {
        self.expected_joints = Some(joints);
        self
    }

    /// Check every parameter that does not depend on calibration data
    pub fn validate(&self) -> ConfigResult<()> {
        self.hardware.validate()?;
        self.geometry.validate()?;
        if let Some(outlier) = &self.outlier {
            outlier.validate()?;
        }
        if let Some(smoothing) = &self.smoothing {
            smoothing.validate()?;
        }
        Ok(())
    }
}

/// Raw counts of one joint's sensor package
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SensorSnapshot {
    /// Pixels in wiring order
    pub pixels: [RawPixelSample; PIXELS_PER_SENSOR],
}

impl SensorSnapshot {
    pub fn new(pixels: [RawPixelSample; PIXELS_PER_SENSOR]) -> Self {
        Self { pixels }
    }

    /// Build from per-pixel `[x, y, z]` counts and the package temperature
    /// count, which is stamped onto every pixel
    pub fn from_package(counts: [[i32; 3]; PIXELS_PER_SENSOR], temperature: i32) -> Self {
        Self {
            pixels: counts.map(|[x, y, z]| RawPixelSample::new(x, y, z, temperature)),
        }
    }
}

/// Joint angle estimator for one rig
///
/// Owns its filter state; the fitted interpolator may be shared.
#[derive(Debug, Clone)]
pub struct AngleEstimator {
    calibrator: PixelCalibrator,
    geometry: GeometryProfile,
    aggregator: FeatureAggregator,
    interpolator: Arc<AngleInterpolator>,
    outlier: Option<OutlierFilter>,
    smoothing: Option<SmoothingFilter>,
    last_temperatures: Vec<f64>,
}

impl AngleEstimator {
    /// Fit interpolants from `table` and build the estimator
    pub fn new(table: &CalibrationTable, config: EstimatorConfig) -> ConfigResult<Self> {
        config.validate()?;
        let interpolator =
            AngleInterpolator::fit(table, config.joint_order.as_deref(), config.polynomial_tail)?;
        Self::with_interpolator(Arc::new(interpolator), config)
    }

    /// Build around an already fitted interpolator
    ///
    /// `config.joint_order` and `config.polynomial_tail` are ignored; the
    /// interpolator fixes both.
    pub fn with_interpolator(
        interpolator: Arc<AngleInterpolator>,
        config: EstimatorConfig,
    ) -> ConfigResult<Self> {
        config.validate()?;

        let joints = interpolator.len();
        if joints == 0 {
            return Err(ConfigError::EmptyCalibration);
        }
        if let Some(expected) = config.expected_joints {
            if expected != joints {
                return Err(ConfigError::JointCountMismatch {
                    expected,
                    calibrated: joints,
                });
            }
        }
        config.geometry.baseline.check_joint_count(joints)?;

        let outlier = config.outlier.map(OutlierFilter::new).transpose()?;
        let smoothing = config.smoothing.map(SmoothingFilter::new).transpose()?;

        log_debug!(
            "Angle estimator ready: joints {:?}, outlier {:?}, smoothing {:?}",
            interpolator.joint_ids(),
            config.outlier,
            config.smoothing
        );

        Ok(Self {
            calibrator: PixelCalibrator::new(config.hardware)?,
            aggregator: FeatureAggregator::new(config.geometry.baseline.clone()),
            geometry: config.geometry,
            interpolator,
            outlier,
            smoothing,
            last_temperatures: Vec::new(),
        })
    }

    /// Angles of every served joint, in sensor order
    ///
    /// `snapshots` must hold one package per served joint, in the order of
    /// [`joint_ids`](Self::joint_ids). While the outlier population is
    /// filling the call returns [`Readiness::WarmingUp`].
    pub fn get_angles(
        &mut self,
        snapshots: &[SensorSnapshot],
    ) -> EstimateResult<Readiness<Vec<JointAngle>>> {
        match self.estimate_features(snapshots)? {
            Readiness::Ready(frame) => Ok(Readiness::Ready(self.interpolator.evaluate_frame(&frame)?)),
            Readiness::WarmingUp { collected, required } => {
                Ok(Readiness::WarmingUp { collected, required })
            }
        }
    }

    /// Filtered feature frame, without interpolation
    pub fn estimate_features(
        &mut self,
        snapshots: &[SensorSnapshot],
    ) -> EstimateResult<Readiness<FeatureFrame>> {
        let (frame, temperatures) = self.extract(snapshots)?;
        self.last_temperatures = temperatures;

        let frame = match self.outlier.as_mut() {
            Some(outlier) => match outlier.filter(&frame)? {
                Readiness::Ready(clipped) => clipped,
                warming => return Ok(warming),
            },
            None => frame,
        };

        let frame = match self.smoothing.as_mut() {
            Some(smoothing) => {
                let seed = match (smoothing.state(), self.outlier.as_ref()) {
                    (None, Some(outlier)) => outlier.population_mean(),
                    _ => None,
                };
                smoothing.smooth(&frame, seed)?
            }
            None => frame,
        };

        Ok(Readiness::Ready(frame))
    }

    /// Unfiltered features of `snapshots`; leaves filter state untouched
    pub fn features(&self, snapshots: &[SensorSnapshot]) -> EstimateResult<FeatureFrame> {
        self.extract(snapshots).map(|(frame, _)| frame)
    }

    /// Package temperature (°C) of each served joint from the last accepted
    /// call, empty before the first
    pub fn last_temperatures(&self) -> &[f64] {
        &self.last_temperatures
    }

    /// Drop all filter state; the next call starts a new warm-up
    pub fn reset(&mut self) {
        if let Some(outlier) = self.outlier.as_mut() {
            outlier.reset();
        }
        if let Some(smoothing) = self.smoothing.as_mut() {
            smoothing.reset();
        }
        self.last_temperatures.clear();
    }

    /// Served joint indices in sensor order
    pub fn joint_ids(&self) -> Vec<usize> {
        self.interpolator.joint_ids()
    }

    pub fn joint_count(&self) -> usize {
        self.interpolator.len()
    }

    /// True once a call would produce angles
    pub fn is_warmed_up(&self) -> bool {
        self.outlier.as_ref().map_or(true, OutlierFilter::is_ready)
    }

    pub fn interpolator(&self) -> &Arc<AngleInterpolator> {
        &self.interpolator
    }

    pub fn hardware(&self) -> &HardwareConfig {
        self.calibrator.config()
    }

    pub fn geometry(&self) -> &GeometryProfile {
        &self.geometry
    }

    fn extract(&self, snapshots: &[SensorSnapshot]) -> EstimateResult<(FeatureFrame, Vec<f64>)> {
        let expected = self.interpolator.len();
        if snapshots.len() != expected {
            log_warn!(
                "Number of sensors ({}) does not match number of interpolators ({})",
                snapshots.len(),
                expected
            );
            return Err(EstimateError::SensorCountMismatch {
                expected,
                provided: snapshots.len(),
            });
        }

        let mut features = Vec::with_capacity(expected);
        let mut temperatures = Vec::with_capacity(expected);
        for (slot, snapshot) in snapshots.iter().enumerate() {
            let (feature, temperature) = self.extract_joint(slot, snapshot);
            features.push(feature);
            temperatures.push(temperature);
        }

        Ok((FeatureFrame::new(features), temperatures))
    }

    fn extract_joint(&self, slot: usize, snapshot: &SensorSnapshot) -> (FeatureVector, f64) {
        let pixels = self.geometry.remap_pixels(&snapshot.pixels);
        let readings = pixels.map(|raw| self.calibrator.calibrate(&raw));

        let flux = self.geometry.remap_axes(&readings.map(|r| r.flux));
        let temperature =
            readings.iter().map(|r| r.temperature_c).sum::<f64>() / PIXELS_PER_SENSOR as f64;

        (self.aggregator.aggregate(slot, &flux), temperature)
    }
}
