//! FH3D04 Sensor Specifications
//!
//! Datasheet constants for the FH3D04 3-axis hall-effect sensor used in every
//! joint package, plus the physical layout of a package.
//!
//! The "base" values describe the reference configuration the sensitivity
//! polynomials were characterised at. Any other gain, decimation length or
//! supply voltage is compensated by a ratio against these values.

// ===== PACKAGE LAYOUT =====

/// Magnetic pixels per joint sensor package.
pub const PIXELS_PER_SENSOR: usize = 4;

/// Field axes reported by each pixel (x, y, z).
pub const AXES_PER_PIXEL: usize = 3;

/// Length of one joint's feature vector (pixels × axes).
pub const FEATURES_PER_JOINT: usize = PIXELS_PER_SENSOR * AXES_PER_PIXEL;

// ===== SENSITIVITY =====

/// Nominal X/Y sensitivity (mV/mT).
///
/// Source: FH3D04 datasheet
pub const FH3D04_XY_MV_PER_MT: f64 = 54.0;

/// Nominal Z sensitivity (mV/mT).
///
/// The Z plate is more sensitive than the lateral axes.
///
/// Source: FH3D04 datasheet
pub const FH3D04_Z_MV_PER_MT: f64 = 94.0;

// ===== TEMPERATURE =====

/// Temperature slope (°C per digit, after decimation normalisation).
///
/// Source: FH3D04 datasheet
pub const FH3D04_TEMP_DIGIT_TO_CELSIUS: f64 = 0.072484471;

/// Temperature reported when the raw count equals the configured offset (°C).
pub const FH3D04_REFERENCE_TEMP_C: f64 = 25.0;

/// Raw temperature count at the reference temperature on the deployed rigs.
pub const DEFAULT_TEMPERATURE_OFFSET: i32 = 4000;

// ===== REFERENCE CONFIGURATION =====

/// Reference X/Y gain setting.
pub const FH3D04_BASE_GAIN_XY: f64 = 128.0;

/// Reference Z gain setting.
pub const FH3D04_BASE_GAIN_Z: f64 = 64.0;

/// Reference decimation filter length.
pub const FH3D04_BASE_DECIMATION_LENGTH: u32 = 512;

/// Reference supply voltage (V).
pub const FH3D04_BASE_SUPPLY_V: f64 = 2.6;

/// X/Y gain programmed by the hand firmware.
pub const DEFAULT_GAIN_XY: f64 = 1024.0;

/// Z gain programmed by the hand firmware.
pub const DEFAULT_GAIN_Z: f64 = 512.0;

// ===== COMPENSATION POLYNOMIALS =====

/// Z-axis sensitivity polynomial in the normalised temperature count,
/// highest power first: `a·t³ + b·t² + c·t + d` (Tesla per digit).
///
/// Source: FH3D04 application note, temperature characterisation
pub const SENSITIVITY_Z_COEFFS: [f64; 4] = [2.6029e-14, 5.6780e-10, -4.3553e-6, 0.011187];

/// X/Y-axis sensitivity polynomial, highest power first (Tesla per digit).
///
/// Source: FH3D04 application note, temperature characterisation
pub const SENSITIVITY_XY_COEFFS: [f64; 4] = [2.4864e-14, 5.4240e-10, 4.1604e-6, 0.010687];
