//! Persisted calibration data and settings for magjoint
//!
//! Two JSON files feed an estimator:
//!
//! - the **calibration mapping**, recorded once per hand by sweeping each
//!   joint through known angles ([`mapping`])
//! - an optional **settings file** overriding hardware constants, geometry
//!   and filter parameters ([`config`])
//!
//! Shapes and settings are checked while loading. Problems that need the
//! fit itself (repeated feature vectors, a served joint missing from the
//! mapping) surface as [`SchemaError::Config`] when the estimator is built.
//!
//! ```no_run
//! use magjoint_schemas::estimator_from_files;
//!
//! let estimator = estimator_from_files("hand_mapping.json", Some("settings.json"))?;
//! println!("serving joints {:?}", estimator.joint_ids());
//! # Ok::<(), magjoint_schemas::SchemaError>(())
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use magjoint_core::{AngleEstimator, CalibrationTable, ConfigError, EstimatorConfig};
use thiserror_no_std::Error;

pub mod config;
pub mod mapping;

pub use config::{config_from_json, config_to_json};
pub use mapping::{records_from_table, table_from_records, MappingFile};

/// Result type for file loading
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Loading and conversion failures
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("Failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Mapping key {0:?} is not a joint index")]
    InvalidJointKey(String),

    #[error("Joint {joint}, sample {sample}: invalid angle ({reason})")]
    InvalidAngle {
        joint: usize,
        sample: usize,
        reason: &'static str,
    },

    #[error("Joint {joint}, sample {sample}: invalid feature ({reason})")]
    InvalidFeature {
        joint: usize,
        sample: usize,
        reason: &'static str,
    },

    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

fn read(path: &Path) -> SchemaResult<String> {
    fs::read_to_string(path).map_err(|source| SchemaError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn write(path: &Path, contents: &str) -> SchemaResult<()> {
    fs::write(path, contents).map_err(|source| SchemaError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse a calibration mapping from JSON text
pub fn parse_table(json: &str) -> SchemaResult<CalibrationTable> {
    let file: MappingFile = serde_json::from_str(json)?;
    table_from_records(&file)
}

/// Load a calibration mapping file
pub fn load_table(path: impl AsRef<Path>) -> SchemaResult<CalibrationTable> {
    let path = path.as_ref();
    let table = parse_table(&read(path)?)?;
    log::debug!(
        "Loaded calibration mapping {}: {} joints, {} calibrated",
        path.display(),
        table.len(),
        table.calibrated_joints().count()
    );
    Ok(table)
}

/// Write a calibration table in the mapping format
pub fn save_table(table: &CalibrationTable, path: impl AsRef<Path>) -> SchemaResult<()> {
    let json = serde_json::to_string(&records_from_table(table))?;
    write(path.as_ref(), &json)
}

/// Load and validate a settings file
pub fn load_config(path: impl AsRef<Path>) -> SchemaResult<EstimatorConfig> {
    config_from_json(&read(path.as_ref())?)
}

pub fn save_config(config: &EstimatorConfig, path: impl AsRef<Path>) -> SchemaResult<()> {
    write(path.as_ref(), &config_to_json(config)?)
}

/// Build an estimator from a mapping file and optional settings file
pub fn estimator_from_files(
    mapping: impl AsRef<Path>,
    settings: Option<impl AsRef<Path>>,
) -> SchemaResult<AngleEstimator> {
    let table = load_table(mapping)?;
    let config = match settings {
        Some(path) => load_config(path)?,
        None => EstimatorConfig::default(),
    };
    Ok(AngleEstimator::new(&table, config)?)
}
