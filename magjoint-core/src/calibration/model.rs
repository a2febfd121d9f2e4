//! Hardware constants and compensation polynomials
//!
//! Everything here is a pure function of its arguments.

use crate::constants::sensors::{
    DEFAULT_GAIN_XY, DEFAULT_GAIN_Z, DEFAULT_TEMPERATURE_OFFSET, FH3D04_BASE_DECIMATION_LENGTH,
    FH3D04_BASE_GAIN_XY, FH3D04_BASE_GAIN_Z, FH3D04_BASE_SUPPLY_V, FH3D04_REFERENCE_TEMP_C,
    FH3D04_TEMP_DIGIT_TO_CELSIUS, SENSITIVITY_XY_COEFFS, SENSITIVITY_Z_COEFFS,
};
use crate::errors::{ConfigError, ConfigResult};

/// Front-end configuration of the sensor packages
///
/// Immutable for the lifetime of an estimator. [`validate`](Self::validate)
/// guarantees every ratio derived from it is finite and nonzero.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct HardwareConfig {
    /// Raw temperature count at 25 °C
    pub temperature_offset: i32,
    /// Decimation filter length (samples)
    pub decimation_length: u32,
    /// Programmed X/Y gain
    pub gain_xy: f64,
    /// Programmed Z gain
    pub gain_z: f64,
    /// Package supply voltage (V)
    pub supply_voltage: f64,
}

impl Default for HardwareConfig {
    /// Values programmed by the hand firmware
    fn default() -> Self {
        Self {
            temperature_offset: DEFAULT_TEMPERATURE_OFFSET,
            decimation_length: FH3D04_BASE_DECIMATION_LENGTH,
            gain_xy: DEFAULT_GAIN_XY,
            gain_z: DEFAULT_GAIN_Z,
            supply_voltage: FH3D04_BASE_SUPPLY_V,
        }
    }
}

impl HardwareConfig {
    /// Datasheet reference configuration, where both gain ratios equal 1
    pub fn reference() -> Self {
        Self {
            gain_xy: FH3D04_BASE_GAIN_XY,
            gain_z: FH3D04_BASE_GAIN_Z,
            ..Self::default()
        }
    }

    pub fn with_temperature_offset(mut self, offset: i32) -> Self {
        self.temperature_offset = offset;
        self
    }

    pub fn with_gains(mut self, gain_xy: f64, gain_z: f64) -> Self {
        self.gain_xy = gain_xy;
        self.gain_z = gain_z;
        self
    }

    pub fn with_decimation_length(mut self, decimation_length: u32) -> Self {
        self.decimation_length = decimation_length;
        self
    }

    pub fn with_supply_voltage(mut self, supply_voltage: f64) -> Self {
        self.supply_voltage = supply_voltage;
        self
    }

    /// Reject values that would make a compensation ratio zero or undefined
    pub fn validate(&self) -> ConfigResult<()> {
        if self.decimation_length == 0 {
            return Err(ConfigError::InvalidHardware {
                reason: "decimation length must be nonzero",
            });
        }
        if !(self.gain_xy.is_finite() && self.gain_xy > 0.0) {
            return Err(ConfigError::InvalidHardware {
                reason: "X/Y gain must be finite and positive",
            });
        }
        if !(self.gain_z.is_finite() && self.gain_z > 0.0) {
            return Err(ConfigError::InvalidHardware {
                reason: "Z gain must be finite and positive",
            });
        }
        if !(self.supply_voltage.is_finite() && self.supply_voltage > 0.0) {
            return Err(ConfigError::InvalidHardware {
                reason: "supply voltage must be finite and positive",
            });
        }
        Ok(())
    }

    /// Scale applied to temperature counts: `512 / decimation_length`
    pub fn decimation_factor(&self) -> f64 {
        f64::from(FH3D04_BASE_DECIMATION_LENGTH) / f64::from(self.decimation_length)
    }

    /// Count-to-field scale for the X/Y plates relative to the reference
    pub fn ratio_xy(&self) -> f64 {
        1.0 / (self.gain_xy / FH3D04_BASE_GAIN_XY * self.front_end_scale())
    }

    /// Count-to-field scale for the Z plate relative to the reference
    pub fn ratio_z(&self) -> f64 {
        1.0 / (self.gain_z / FH3D04_BASE_GAIN_Z * self.front_end_scale())
    }

    fn front_end_scale(&self) -> f64 {
        f64::from(self.decimation_length) / f64::from(FH3D04_BASE_DECIMATION_LENGTH)
            * (self.supply_voltage / FH3D04_BASE_SUPPLY_V)
    }
}

/// Offset-corrected, decimation-normalised temperature count
pub fn normalized_temperature(raw_temperature: i32, config: &HardwareConfig) -> f64 {
    let counts = i64::from(raw_temperature) - i64::from(config.temperature_offset);
    counts as f64 * config.decimation_factor()
}

/// Die temperature in °C from the normalised count
pub fn temperature_celsius(t_pp: f64) -> f64 {
    t_pp * FH3D04_TEMP_DIGIT_TO_CELSIUS + FH3D04_REFERENCE_TEMP_C
}

/// Z sensitivity `s_z(t_pp)` in Tesla per count
pub fn sensitivity_z(t_pp: f64) -> f64 {
    horner(&SENSITIVITY_Z_COEFFS, t_pp)
}

/// X/Y sensitivity `s_xy(t_pp)` in Tesla per count
pub fn sensitivity_xy(t_pp: f64) -> f64 {
    horner(&SENSITIVITY_XY_COEFFS, t_pp)
}

/// Polynomial with coefficients highest power first
fn horner(coeffs: &[f64], x: f64) -> f64 {
    coeffs.iter().fold(0.0, |acc, c| acc * x + c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_ratios_are_unity() {
        let config = HardwareConfig::reference();
        assert_eq!(config.ratio_xy(), 1.0);
        assert_eq!(config.ratio_z(), 1.0);
        assert_eq!(config.decimation_factor(), 1.0);
    }

    #[test]
    fn firmware_gains_scale_down_by_eight() {
        let config = HardwareConfig::default();
        assert!((config.ratio_xy() - 0.125).abs() < 1e-15);
        assert!((config.ratio_z() - 0.125).abs() < 1e-15);
    }

    #[test]
    fn polynomials_at_zero_are_constant_terms() {
        assert_eq!(sensitivity_z(0.0), 0.011187);
        assert_eq!(sensitivity_xy(0.0), 0.010687);
    }

    #[test]
    fn polynomial_matches_expanded_form() {
        let t: f64 = 1234.5;
        let expanded = 2.6029e-14 * t.powi(3) + 5.6780e-10 * t.powi(2) - 4.3553e-6 * t + 0.011187;
        assert!((sensitivity_z(t) - expanded).abs() < 1e-15);
    }

    #[test]
    fn temperature_offset_reads_reference() {
        let config = HardwareConfig::default();
        let t_pp = normalized_temperature(config.temperature_offset, &config);
        assert_eq!(t_pp, 0.0);
        assert_eq!(temperature_celsius(t_pp), 25.0);
    }

    #[test]
    fn halving_decimation_doubles_temperature_scale() {
        let config = HardwareConfig::default().with_decimation_length(256);
        let t_pp = normalized_temperature(config.temperature_offset + 10, &config);
        assert_eq!(t_pp, 20.0);
    }

    #[test]
    fn rejects_zero_decimation() {
        let config = HardwareConfig::default().with_decimation_length(0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidHardware { .. })
        ));
    }

    #[test]
    fn rejects_non_positive_supply() {
        let config = HardwareConfig::default().with_supply_voltage(0.0);
        assert!(config.validate().is_err());
        let config = HardwareConfig::default().with_gains(f64::NAN, 64.0);
        assert!(config.validate().is_err());
    }
}
