//! Constants for magjoint
//!
//! Every numeric value the pipeline depends on is defined here, with its unit
//! and source. Code elsewhere refers to these names instead of literals.
//!
//! ## Organization
//!
//! - **Sensors**: FH3D04 magnetometer datasheet values and compensation
//!   polynomials, sensor package layout
//! - **Filters**: default filter parameters and their valid ranges

/// FH3D04 datasheet constants and sensor package layout.
pub mod sensors;

/// Default parameters for the outlier and smoothing filters.
pub mod filters;

pub use sensors::{
    AXES_PER_PIXEL, FEATURES_PER_JOINT, PIXELS_PER_SENSOR,
    FH3D04_BASE_DECIMATION_LENGTH, FH3D04_BASE_GAIN_XY, FH3D04_BASE_GAIN_Z,
    FH3D04_BASE_SUPPLY_V, FH3D04_TEMP_DIGIT_TO_CELSIUS,
};

pub use filters::{
    DEFAULT_IIR_NEW_SAMPLE_WEIGHT, DEFAULT_OUTLIER_POPULATION, DEFAULT_OUTLIER_SIGMA,
};
