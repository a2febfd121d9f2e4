//! Calibration mapping file
//!
//! ```json
//! {
//!   "0": [[10.0, [12 floats]], [20.0, [12 floats]]],
//!   "1": null,
//!   "4": [[[5.0, 30.0], [[x, y, z], [x, y, z], [x, y, z], [x, y, z]]]]
//! }
//! ```
//!
//! Keys are joint indices. `null` marks a joint that is present on the hand
//! but was not calibrated. Each sample is an `[angle, feature]` pair where
//! the angle is a number or a one- or two-element array, and the feature
//! is either the flat 12-value vector or four `[x, y, z]` pixel rows.

use std::collections::BTreeMap;

use magjoint_core::constants::{AXES_PER_PIXEL, FEATURES_PER_JOINT, PIXELS_PER_SENSOR};
use magjoint_core::{CalibrationSample, CalibrationTable, FeatureVector, JointAngle};
use serde::{Deserialize, Serialize};

use crate::{SchemaError, SchemaResult};

/// Joint angle as written in the file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AngleRecord {
    Scalar(f64),
    Components(Vec<f64>),
}

/// Feature vector as written in the file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureRecord {
    Flat(Vec<f64>),
    Pixels(Vec<Vec<f64>>),
}

/// One `[angle, feature]` pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleRecord(pub AngleRecord, pub FeatureRecord);

/// Whole mapping file, keyed by joint index string
pub type MappingFile = BTreeMap<String, Option<Vec<SampleRecord>>>;

impl AngleRecord {
    fn to_angle(&self, joint: usize, sample: usize) -> SchemaResult<JointAngle> {
        match self {
            Self::Scalar(value) => Ok(JointAngle::Single(*value)),
            Self::Components(values) => {
                JointAngle::from_slice(values).ok_or(SchemaError::InvalidAngle {
                    joint,
                    sample,
                    reason: "expected one or two components",
                })
            }
        }
    }
}

impl From<JointAngle> for AngleRecord {
    fn from(angle: JointAngle) -> Self {
        match angle {
            JointAngle::Single(value) => Self::Scalar(value),
            JointAngle::Pair(values) => Self::Components(values.to_vec()),
        }
    }
}

impl FeatureRecord {
    fn to_feature(&self, joint: usize, sample: usize) -> SchemaResult<FeatureVector> {
        let invalid = |reason| SchemaError::InvalidFeature { joint, sample, reason };

        match self {
            Self::Flat(values) => {
                FeatureVector::from_slice(values).ok_or(invalid("expected 12 values"))
            }
            Self::Pixels(rows) => {
                if rows.len() != PIXELS_PER_SENSOR {
                    return Err(invalid("expected 4 pixel rows"));
                }
                let mut values = [0.0; FEATURES_PER_JOINT];
                for (chunk, row) in values.chunks_exact_mut(AXES_PER_PIXEL).zip(rows) {
                    if row.len() != AXES_PER_PIXEL {
                        return Err(invalid("expected 3 axes per pixel"));
                    }
                    chunk.copy_from_slice(row);
                }
                Ok(FeatureVector::new(values))
            }
        }
    }
}

impl From<FeatureVector> for FeatureRecord {
    fn from(feature: FeatureVector) -> Self {
        Self::Flat(feature.as_slice().to_vec())
    }
}

/// Convert a parsed mapping file into a calibration table
pub fn table_from_records(file: &MappingFile) -> SchemaResult<CalibrationTable> {
    let mut table = CalibrationTable::new();

    for (key, records) in file {
        let joint: usize = key
            .trim()
            .parse()
            .map_err(|_| SchemaError::InvalidJointKey(key.clone()))?;

        let Some(records) = records else {
            log::debug!("Joint {} is not calibrated", joint);
            table.insert_uncalibrated(joint);
            continue;
        };

        let samples = records
            .iter()
            .enumerate()
            .map(|(index, SampleRecord(angle, feature))| {
                Ok(CalibrationSample {
                    angle: angle.to_angle(joint, index)?,
                    feature: feature.to_feature(joint, index)?,
                })
            })
            .collect::<SchemaResult<Vec<_>>>()?;

        log::debug!("Joint {}: {} calibration samples", joint, samples.len());
        table.insert(joint, samples);
    }

    Ok(table)
}

/// Convert a calibration table into the file representation
///
/// Features are written flat.
pub fn records_from_table(table: &CalibrationTable) -> MappingFile {
    table
        .iter()
        .map(|(joint, samples)| {
            let records = samples.map(|samples| {
                samples
                    .iter()
                    .map(|s| SampleRecord(s.angle.into(), s.feature.into()))
                    .collect()
            });
            (joint.to_string(), records)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> SchemaResult<CalibrationTable> {
        let file: MappingFile = serde_json::from_str(json)?;
        table_from_records(&file)
    }

    #[test]
    fn accepts_flat_and_nested_features() {
        let json = r#"{
            "0": [[10.0, [1,2,3,4,5,6,7,8,9,10,11,12]]],
            "2": [[[5.0, 6.0], [[1,2,3],[4,5,6],[7,8,9],[10,11,12]]]],
            "3": null
        }"#;
        let table = parse(json).unwrap();

        let flat = table.samples(0).unwrap()[0];
        let nested = table.samples(2).unwrap()[0];
        assert_eq!(flat.feature, nested.feature);
        assert_eq!(flat.angle, JointAngle::Single(10.0));
        assert_eq!(nested.angle, JointAngle::Pair([5.0, 6.0]));
        assert!(table.contains(3));
        assert!(!table.is_calibrated(3));
    }

    #[test]
    fn single_element_angle_array_is_a_single_angle() {
        let table = parse(r#"{"1": [[[7.5], [0,0,0,0,0,0,0,0,0,0,0,0]]]}"#).unwrap();
        assert_eq!(table.samples(1).unwrap()[0].angle, JointAngle::Single(7.5));
    }

    #[test]
    fn rejects_bad_keys() {
        assert!(matches!(
            parse(r#"{"thumb": null}"#),
            Err(SchemaError::InvalidJointKey(key)) if key == "thumb"
        ));
    }

    #[test]
    fn rejects_bad_angles() {
        assert!(matches!(
            parse(r#"{"0": [[[1, 2, 3], [0,0,0,0,0,0,0,0,0,0,0,0]]]}"#),
            Err(SchemaError::InvalidAngle { joint: 0, sample: 0, .. })
        ));
    }

    #[test]
    fn rejects_bad_features() {
        assert!(matches!(
            parse(r#"{"0": [[1.0, [0,0,0]]]}"#),
            Err(SchemaError::InvalidFeature { joint: 0, sample: 0, .. })
        ));
        assert!(matches!(
            parse(r#"{"5": [[1.0, [0,0,0,0,0,0,0,0,0,0,0,0]], [2.0, [[1,2],[3,4],[5,6],[7,8]]]]}"#),
            Err(SchemaError::InvalidFeature { joint: 5, sample: 1, .. })
        ));
    }

    #[test]
    fn written_records_read_back_identically() {
        let mut table = CalibrationTable::new();
        table.insert(
            1,
            vec![
                CalibrationSample::new(10.0, [0.5; 12]),
                CalibrationSample::new([1.0, 2.0], [0.25; 12]),
            ],
        );
        table.insert_uncalibrated(4);

        let json = serde_json::to_string(&records_from_table(&table)).unwrap();
        assert_eq!(parse(&json).unwrap(), table);
    }
}
