//! Error Types for Angle Estimation
//!
//! ## Error Categories
//!
//! Failures fall into three groups, matching when they can happen:
//!
//! ### Configuration (`ConfigError`)
//! Raised while building an estimator. Invalid filter parameters, hardware
//! constants that would divide by zero, a geometry profile that is not a
//! permutation, or a calibration table that cannot serve the requested joints.
//! An estimator is never built in a degraded mode.
//!
//! ### Calibration fitting (`CalibrationError`)
//! Raised while fitting one joint's interpolant from its calibration samples.
//! Always surfaces wrapped in `ConfigError::Calibration`.
//!
//! ### Per-call validation (`EstimateError`)
//! Raised by a single `get_angles` call when the snapshot does not match the
//! estimator's shape. The call produces no output and filter state is left
//! untouched, so the next well-formed snapshot proceeds normally.
//!
//! Warm-up is *not* an error: it is reported as
//! [`Readiness::WarmingUp`](crate::estimator::Readiness).
//!
//! ```rust
//! use magjoint_core::{EstimateError, Readiness};
//!
//! fn report(result: Result<Readiness<Vec<f64>>, EstimateError>) {
//!     match result {
//!         Ok(Readiness::Ready(angles)) => {
//!             // forward to the controller
//!             let _ = angles;
//!         }
//!         Ok(Readiness::WarmingUp { .. }) => {
//!             // skip this tick
//!         }
//!         Err(EstimateError::SensorCountMismatch { expected, provided }) => {
//!             eprintln!("telemetry carried {} packages, expected {}", provided, expected);
//!         }
//!         Err(e) => eprintln!("{}", e),
//!     }
//! }
//! ```

use thiserror_no_std::Error;

/// Result type for estimator construction
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type for per-call estimation
pub type EstimateResult<T> = Result<T, EstimateError>;

/// Estimator construction failures
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    /// Outlier population must hold at least one frame
    #[error("Outlier population must be at least 1, got {population}")]
    InvalidPopulation {
        /// Requested population size
        population: usize,
    },

    /// Sigma multiplier must be finite and positive
    #[error("Outlier sigma multiplier must be finite and > 0, got {sigma}")]
    InvalidSigma {
        /// Requested multiplier
        sigma: f64,
    },

    /// IIR weight must lie strictly between 0 and 1
    #[error("IIR new sample weight must be in (0, 1), got {weight}")]
    InvalidSmoothingWeight {
        /// Requested weight
        weight: f64,
    },

    /// Hardware constants would produce a zero or non-finite ratio
    #[error("Invalid hardware configuration: {reason}")]
    InvalidHardware {
        reason: &'static str,
    },

    /// Geometry profile is not a valid remapping
    #[error("Invalid geometry profile: {reason}")]
    InvalidGeometry {
        reason: &'static str,
    },

    /// Calibration table contains no calibrated joints
    #[error("Calibration table has no calibrated joints")]
    EmptyCalibration,

    /// A served joint is not in the calibration table at all
    #[error("Joint {joint} is not present in the calibration table")]
    UnknownJoint {
        /// Joint index as used in the calibration mapping
        joint: usize,
    },

    /// A served joint is in the table but has no calibration samples
    #[error("Joint {joint} has no calibration")]
    UncalibratedJoint {
        /// Joint index as used in the calibration mapping
        joint: usize,
    },

    /// The same joint was requested twice
    #[error("Joint {joint} is listed more than once")]
    DuplicateJoint {
        /// Joint index as used in the calibration mapping
        joint: usize,
    },

    /// Declared sensor count differs from the number of fitted joints
    #[error("Expected {expected} joints, calibration provides {calibrated}")]
    JointCountMismatch {
        /// Count declared in the configuration
        expected: usize,
        /// Joints with a fitted interpolant
        calibrated: usize,
    },

    /// Per-joint baseline table does not cover the served joints
    #[error("Baseline offsets cover {offsets} joints, estimator serves {joints}")]
    BaselineMismatch {
        /// Entries in the baseline table
        offsets: usize,
        /// Joints served by the estimator
        joints: usize,
    },

    /// Fitting a joint's interpolant failed
    #[error("Calibration failed: {0}")]
    Calibration(#[from] CalibrationError),
}

/// Failures while fitting one joint's interpolant
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum CalibrationError {
    /// Joint has an empty sample list
    #[error("Joint {joint} has no calibration samples")]
    NoSamples {
        joint: usize,
    },

    /// Samples of one joint disagree on the number of angle components
    #[error("Joint {joint}: sample {sample} has {found} angle components, expected {expected}")]
    InconsistentAngleShape {
        joint: usize,
        /// Offending sample position
        sample: usize,
        /// Components in the first sample
        expected: usize,
        /// Components in the offending sample
        found: usize,
    },

    /// NaN or infinity in a feature vector or angle
    #[error("Joint {joint}: sample {sample} contains a non-finite value")]
    NonFiniteSample {
        joint: usize,
        sample: usize,
    },

    /// Two samples share the same feature vector
    #[error("Joint {joint}: samples {first} and {second} have identical features")]
    DuplicateSample {
        joint: usize,
        first: usize,
        second: usize,
    },

    /// Interpolation system has no unique solution
    #[error("Joint {joint}: interpolation system is singular")]
    SingularSystem {
        joint: usize,
    },
}

/// Per-call estimation failures
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum EstimateError {
    /// Snapshot carries a different number of sensor packages than calibrated
    #[error("Number of sensors ({provided}) does not match number of interpolators ({expected})")]
    SensorCountMismatch {
        /// Joints served by the estimator
        expected: usize,
        /// Packages in the snapshot
        provided: usize,
    },

    /// Frame joint count differs from the filter population
    #[error("Feature frame has {provided} joints, filter population has {expected}")]
    FrameShapeMismatch {
        expected: usize,
        provided: usize,
    },

    /// Evaluation requested for a joint without an interpolant
    #[error("No interpolant for joint {joint}")]
    UnknownJoint {
        joint: usize,
    },
}
