//! Joint angle estimation from hall-effect magnetometer arrays
//!
//! Every instrumented joint of the hand carries one sensor package with four
//! magnetic pixels. Each pixel reports raw ADC counts for the three field axes
//! and the package reports a raw temperature count. This crate turns one
//! telemetry snapshot of those counts into joint angles:
//!
//! ```text
//! raw counts ──► PixelCalibrator ──► GeometryProfile ──► FeatureAggregator
//!                (°C, Tesla)         (pixel order, axes)  (12 values / joint)
//!                                                               │
//!      angles ◄── AngleInterpolator ◄── SmoothingFilter ◄── OutlierFilter
//!                 (linear RBF)          (IIR)                (sigma clip)
//! ```
//!
//! Only the two filters keep state between calls. The fitted interpolators are
//! immutable and can be shared between estimators through an `Arc`.
//!
//! ```no_run
//! use magjoint_core::{AngleEstimator, CalibrationTable, EstimatorConfig, Readiness, SensorSnapshot};
//!
//! # fn table() -> CalibrationTable { unimplemented!() }
//! # fn telemetry() -> Vec<SensorSnapshot> { unimplemented!() }
//! let mut estimator = AngleEstimator::new(&table(), EstimatorConfig::default())?;
//!
//! match estimator.get_angles(&telemetry())? {
//!     Readiness::Ready(angles) => println!("{:?}", angles),
//!     Readiness::WarmingUp { collected, required } => {
//!         println!("warming up {}/{}", collected, required);
//!     }
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

// Logging compiles away when the `log` feature is disabled.
#[cfg(feature = "log")]
macro_rules! log_debug {
    ($($arg:tt)*) => { log::debug!($($arg)*) };
}

#[cfg(not(feature = "log"))]
macro_rules! log_debug {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "log")]
macro_rules! log_warn {
    ($($arg:tt)*) => { log::warn!($($arg)*) };
}

#[cfg(not(feature = "log"))]
macro_rules! log_warn {
    ($($arg:tt)*) => {};
}

pub mod buffer;
pub mod calibration;
pub mod constants;
pub mod errors;
pub mod estimator;
pub mod features;
pub mod filters;
pub mod geometry;
pub mod interpolation;
pub mod stream;

// Public API
pub use calibration::{HardwareConfig, PixelCalibrator, PixelReading, RawPixelSample};
pub use errors::{
    CalibrationError, ConfigError, ConfigResult, EstimateError, EstimateResult,
};
pub use estimator::{AngleEstimator, EstimatorConfig, Readiness, SensorSnapshot};
pub use features::{FeatureAggregator, FeatureFrame, FeatureVector, FluxVector};
pub use filters::{OutlierConfig, OutlierFilter, SmoothingConfig, SmoothingFilter};
pub use geometry::{AxisMap, BaselineOffsets, GeometryProfile};
pub use interpolation::{
    AngleInterpolator, CalibrationSample, CalibrationTable, JointAngle, JointInterpolator,
    PolynomialTail,
};
pub use stream::{poll_angles, ReplaySource, SnapshotSource, StreamError};

/// Crate version, as published in `Cargo.toml`
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
