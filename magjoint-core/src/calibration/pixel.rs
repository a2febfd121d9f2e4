//! Per-pixel calibration

use super::model::{self, HardwareConfig};
use crate::errors::ConfigResult;
use crate::features::FluxVector;

/// Raw ADC counts of one magnetic pixel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RawPixelSample {
    pub x: i32,
    pub y: i32,
    pub z: i32,
    /// Raw temperature count (usually the package reading)
    pub temperature: i32,
}

impl RawPixelSample {
    pub const fn new(x: i32, y: i32, z: i32, temperature: i32) -> Self {
        Self { x, y, z, temperature }
    }
}

/// Calibrated output of one pixel
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelReading {
    /// Die temperature (°C)
    pub temperature_c: f64,
    /// Temperature-compensated field (Tesla)
    pub flux: FluxVector,
}

/// Converts raw pixel counts to Tesla for one hardware configuration
///
/// The gain ratios are computed once here; [`calibrate`](Self::calibrate)
/// only evaluates the temperature polynomials.
#[derive(Debug, Clone, Copy)]
pub struct PixelCalibrator {
    config: HardwareConfig,
    ratio_xy: f64,
    ratio_z: f64,
}

impl PixelCalibrator {
    /// Validate `config` and cache its compensation ratios
    pub fn new(config: HardwareConfig) -> ConfigResult<Self> {
        config.validate()?;

        Ok(Self {
            ratio_xy: config.ratio_xy(),
            ratio_z: config.ratio_z(),
            config,
        })
    }

    pub fn config(&self) -> &HardwareConfig {
        &self.config
    }

    /// Temperature-compensated field and die temperature for one pixel
    pub fn calibrate(&self, raw: &RawPixelSample) -> PixelReading {
        let t_pp = model::normalized_temperature(raw.temperature, &self.config);
        let scale_xy = self.ratio_xy * model::sensitivity_xy(t_pp);
        let scale_z = self.ratio_z * model::sensitivity_z(t_pp);

        PixelReading {
            temperature_c: model::temperature_celsius(t_pp),
            flux: FluxVector::new(
                f64::from(raw.x) * scale_xy,
                f64::from(raw.y) * scale_xy,
                f64::from(raw.z) * scale_z,
            ),
        }
    }

    /// Die temperature (°C) for a raw temperature count
    pub fn temperature(&self, raw_temperature: i32) -> f64 {
        model::temperature_celsius(model::normalized_temperature(raw_temperature, &self.config))
    }
}
