//! Raw count to Tesla conversion
//!
//! ## Overview
//!
//! Each FH3D04 pixel reports signed ADC counts for its three hall plates. The
//! count-to-field factor depends on three things:
//!
//! 1. **Front-end configuration**: programmable gain, decimation filter length
//!    and supply voltage scale every count linearly. These are folded into
//!    two ratios (X/Y and Z) against the datasheet reference configuration
//!    and computed once per [`HardwareConfig`].
//! 2. **Temperature**: hall sensitivity drifts with die temperature. The
//!    drift is characterised by a cubic polynomial in the offset-corrected,
//!    decimation-normalised temperature count `t_pp`.
//! 3. **Axis**: the Z plate has its own gain and polynomial.
//!
//! ```text
//! t_pp        = (T_raw - T_offset) · 512 / dec_len
//! T[°C]       = t_pp · 0.072484471 + 25
//! B_xy[T]     = count · ratio_xy · s_xy(t_pp)
//! B_z[T]      = count · ratio_z  · s_z(t_pp)
//! ```
//!
//! [`model`] holds the pure formulas; [`PixelCalibrator`] caches the ratios
//! for one configuration and applies them.

pub mod model;
pub mod pixel;

pub use model::HardwareConfig;
pub use pixel::{PixelCalibrator, PixelReading, RawPixelSample};
