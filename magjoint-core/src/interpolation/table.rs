//! Calibration samples keyed by joint index

use std::collections::BTreeMap;

use crate::features::FeatureVector;

/// Angle of one joint (degrees)
///
/// Most joints bend on one axis. Joints with two degrees of freedom (the
/// thumb base, for example) carry a pair.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum JointAngle {
    Single(f64),
    Pair([f64; 2]),
}

impl JointAngle {
    /// Build from one or two components
    pub fn from_slice(values: &[f64]) -> Option<Self> {
        match *values {
            [a] => Some(Self::Single(a)),
            [a, b] => Some(Self::Pair([a, b])),
            _ => None,
        }
    }

    pub fn components(&self) -> &[f64] {
        match self {
            Self::Single(value) => core::slice::from_ref(value),
            Self::Pair(values) => values,
        }
    }

    /// Number of components (1 or 2)
    pub fn dims(&self) -> usize {
        self.components().len()
    }

    pub fn is_finite(&self) -> bool {
        self.components().iter().all(|v| v.is_finite())
    }

    /// Single-axis value, `None` for pairs
    pub fn single(&self) -> Option<f64> {
        match self {
            Self::Single(value) => Some(*value),
            Self::Pair(_) => None,
        }
    }
}

impl From<f64> for JointAngle {
    fn from(value: f64) -> Self {
        Self::Single(value)
    }
}

impl From<[f64; 2]> for JointAngle {
    fn from(values: [f64; 2]) -> Self {
        Self::Pair(values)
    }
}

/// One recorded pose: the known angle and the feature vector measured at it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibrationSample {
    pub angle: JointAngle,
    pub feature: FeatureVector,
}

impl CalibrationSample {
    pub fn new(angle: impl Into<JointAngle>, feature: impl Into<FeatureVector>) -> Self {
        Self {
            angle: angle.into(),
            feature: feature.into(),
        }
    }
}

/// Calibration samples for every joint of the hand
///
/// A joint can be present without samples: the mapping file lists every
/// joint of the hand and marks the uninstrumented ones `null`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CalibrationTable {
    joints: BTreeMap<usize, Option<Vec<CalibrationSample>>>,
}

impl CalibrationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the samples of `joint`, replacing any previous entry
    pub fn insert(&mut self, joint: usize, samples: Vec<CalibrationSample>) {
        self.joints.insert(joint, Some(samples));
    }

    /// Record `joint` as present but uncalibrated
    pub fn insert_uncalibrated(&mut self, joint: usize) {
        self.joints.insert(joint, None);
    }

    /// Builder form of [`insert`](Self::insert)
    pub fn with_joint(mut self, joint: usize, samples: Vec<CalibrationSample>) -> Self {
        self.insert(joint, samples);
        self
    }

    pub fn contains(&self, joint: usize) -> bool {
        self.joints.contains_key(&joint)
    }

    pub fn is_calibrated(&self, joint: usize) -> bool {
        matches!(self.joints.get(&joint), Some(Some(_)))
    }

    /// Samples of `joint`; `None` when absent or uncalibrated
    pub fn samples(&self, joint: usize) -> Option<&[CalibrationSample]> {
        self.joints.get(&joint)?.as_deref()
    }

    /// Every listed joint in ascending order, with its samples if calibrated
    pub fn iter(&self) -> impl Iterator<Item = (usize, Option<&[CalibrationSample]>)> + '_ {
        self.joints
            .iter()
            .map(|(joint, samples)| (*joint, samples.as_deref()))
    }

    /// Calibrated joints in ascending order
    pub fn calibrated_joints(&self) -> impl Iterator<Item = usize> + '_ {
        self.iter()
            .filter_map(|(joint, samples)| samples.map(|_| joint))
    }

    /// Number of listed joints, calibrated or not
    pub fn len(&self) -> usize {
        self.joints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.joints.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn angle_from_slice() {
        assert_eq!(JointAngle::from_slice(&[1.0]), Some(JointAngle::Single(1.0)));
        assert_eq!(JointAngle::from_slice(&[1.0, 2.0]), Some(JointAngle::Pair([1.0, 2.0])));
        assert_eq!(JointAngle::from_slice(&[]), None);
        assert_eq!(JointAngle::from_slice(&[1.0, 2.0, 3.0]), None);
    }

    #[test]
    fn angle_components() {
        assert_eq!(JointAngle::Single(4.0).components(), &[4.0]);
        assert_eq!(JointAngle::Pair([1.0, 2.0]).dims(), 2);
        assert_eq!(JointAngle::Pair([1.0, 2.0]).single(), None);
    }

    #[test]
    fn calibrated_joints_skip_null_entries() {
        let mut table = CalibrationTable::new();
        table.insert(4, vec![CalibrationSample::new(0.0, [0.0; 12])]);
        table.insert_uncalibrated(1);
        table.insert(2, vec![CalibrationSample::new(0.0, [0.0; 12])]);

        assert_eq!(table.len(), 3);
        assert_eq!(table.calibrated_joints().collect::<Vec<_>>(), vec![2, 4]);
        assert!(table.contains(1));
        assert!(!table.is_calibrated(1));
        assert!(table.samples(1).is_none());
        assert!(table.samples(7).is_none());
    }
}
