//! Estimator settings file
//!
//! Every field is optional and falls back to [`EstimatorConfig::default`].
//! `null` switches a filter off.
//!
//! ```json
//! {
//!   "hardware": { "gain_xy": 1024.0, "gain_z": 512.0 },
//!   "geometry": {
//!     "pixel_order": [3, 0, 2, 1],
//!     "axes": { "order": [0, 1, 2], "sign": [1.0, 1.0, 1.0] },
//!     "baseline": "none"
//!   },
//!   "outlier": { "population": 10, "sigma": 3.0 },
//!   "smoothing": null,
//!   "joint_order": [1, 2, 0]
//! }
//! ```

use magjoint_core::EstimatorConfig;

use crate::SchemaResult;

/// Parse and validate settings
pub fn config_from_json(json: &str) -> SchemaResult<EstimatorConfig> {
    let config: EstimatorConfig = serde_json::from_str(json)?;
    config.validate()?;
    Ok(config)
}

/// Serialize settings with every field written out
pub fn config_to_json(config: &EstimatorConfig) -> SchemaResult<String> {
    Ok(serde_json::to_string_pretty(config)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use magjoint_core::{ConfigError, GeometryProfile, OutlierConfig};

    use crate::SchemaError;

    #[test]
    fn empty_object_is_the_default() {
        assert_eq!(config_from_json("{}").unwrap(), EstimatorConfig::default());
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let config = config_from_json(
            r#"{"outlier": {"population": 4}, "smoothing": null, "hardware": {"gain_xy": 128.0}}"#,
        )
        .unwrap();

        assert_eq!(config.outlier, Some(OutlierConfig::default().with_population(4)));
        assert_eq!(config.smoothing, None);
        assert_eq!(config.hardware.gain_xy, 128.0);
        assert_eq!(config.hardware.gain_z, 512.0);
    }

    #[test]
    fn geometry_and_joint_order_are_read() {
        let config = config_from_json(
            r#"{
                "geometry": {
                    "pixel_order": [3, 0, 2, 1],
                    "axes": {"order": [0, 1, 2], "sign": [1.0, 1.0, 1.0]}
                },
                "joint_order": [2, 0],
                "polynomial_tail": "constant"
            }"#,
        )
        .unwrap();

        assert_eq!(config.geometry, GeometryProfile::identity().with_pixel_order([3, 0, 2, 1]));
        assert_eq!(config.joint_order, Some(vec![2, 0]));
        assert_eq!(config.polynomial_tail, magjoint_core::PolynomialTail::Constant);
    }

    #[test]
    fn invalid_values_are_rejected_on_load() {
        assert!(matches!(
            config_from_json(r#"{"smoothing": {"new_sample_weight": 1.5}}"#),
            Err(SchemaError::Config(ConfigError::InvalidSmoothingWeight { .. }))
        ));
        assert!(matches!(
            config_from_json(r#"{"outlier": {"population": 0}}"#),
            Err(SchemaError::Config(ConfigError::InvalidPopulation { population: 0 }))
        ));
    }

    #[test]
    fn malformed_json_is_a_json_error() {
        assert!(matches!(config_from_json("{"), Err(SchemaError::Json(_))));
    }

    #[test]
    fn written_settings_read_back() {
        let config = EstimatorConfig::unfiltered().with_joint_order(vec![1, 0]);
        let json = config_to_json(&config).unwrap();
        assert_eq!(config_from_json(&json).unwrap(), config);
    }
}
