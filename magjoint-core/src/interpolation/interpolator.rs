//! Per-joint interpolants and the set serving an estimator

use nalgebra::DMatrix;

use super::rbf::{PolynomialTail, RbfInterpolator, TailDegree};
use super::table::{CalibrationSample, CalibrationTable, JointAngle};
use crate::constants::FEATURES_PER_JOINT;
use crate::errors::{
    CalibrationError, ConfigError, ConfigResult, EstimateError, EstimateResult,
};
use crate::features::{FeatureFrame, FeatureVector};

/// Fitted interpolant mapping one joint's feature vector to its angle
#[derive(Debug, Clone)]
pub struct JointInterpolator {
    joint: usize,
    angle_dims: usize,
    rbf: RbfInterpolator,
}

impl JointInterpolator {
    /// Fit `samples` of `joint`
    ///
    /// Fails on an empty list, mixed angle shapes, non-finite values,
    /// repeated feature vectors, or a system without a unique solution.
    pub fn fit(
        joint: usize,
        samples: &[CalibrationSample],
        tail: PolynomialTail,
    ) -> Result<Self, CalibrationError> {
        let first = samples.first().ok_or(CalibrationError::NoSamples { joint })?;
        let angle_dims = first.angle.dims();

        for (index, sample) in samples.iter().enumerate() {
            if sample.angle.dims() != angle_dims {
                return Err(CalibrationError::InconsistentAngleShape {
                    joint,
                    sample: index,
                    expected: angle_dims,
                    found: sample.angle.dims(),
                });
            }
            if !sample.angle.is_finite() || !sample.feature.is_finite() {
                return Err(CalibrationError::NonFiniteSample { joint, sample: index });
            }
        }

        if let Some((first, second)) = find_duplicate(samples) {
            return Err(CalibrationError::DuplicateSample { joint, first, second });
        }

        let n = samples.len();
        let centers = DMatrix::from_fn(n, FEATURES_PER_JOINT, |i, j| samples[i].feature[j]);
        let values = DMatrix::from_fn(n, angle_dims, |i, k| samples[i].angle.components()[k]);

        let rbf = RbfInterpolator::fit(centers, values, tail)
            .ok_or(CalibrationError::SingularSystem { joint })?;

        if tail == PolynomialTail::Auto
            && n > FEATURES_PER_JOINT
            && rbf.tail_degree() == TailDegree::Constant
        {
            log_warn!(
                "Joint {}: affine tail is singular over {} samples, using constant tail",
                joint,
                n
            );
        }
        log_debug!(
            "Joint {}: fitted {} samples, {} angle component(s), {:?} tail",
            joint,
            n,
            angle_dims,
            rbf.tail_degree()
        );

        Ok(Self { joint, angle_dims, rbf })
    }

    /// Joint index in the calibration table
    pub fn joint(&self) -> usize {
        self.joint
    }

    /// Components of the returned angle
    pub fn angle_dims(&self) -> usize {
        self.angle_dims
    }

    /// Calibration samples the interpolant was fitted on
    pub fn sample_count(&self) -> usize {
        self.rbf.len()
    }

    pub fn tail_degree(&self) -> TailDegree {
        self.rbf.tail_degree()
    }

    pub fn evaluate(&self, feature: &FeatureVector) -> JointAngle {
        let values = self.rbf.evaluate(feature.as_slice());
        match *values.as_slice() {
            [a, b] => JointAngle::Pair([a, b]),
            [a, ..] => JointAngle::Single(a),
            [] => JointAngle::Single(f64::NAN),
        }
    }
}

fn find_duplicate(samples: &[CalibrationSample]) -> Option<(usize, usize)> {
    for (i, a) in samples.iter().enumerate() {
        for (offset, b) in samples[i + 1..].iter().enumerate() {
            if a.feature == b.feature {
                return Some((i, i + 1 + offset));
            }
        }
    }
    None
}

/// Interpolants for every joint an estimator serves, in sensor order
///
/// Immutable once fitted; estimators share one through an `Arc`.
#[derive(Debug, Clone)]
pub struct AngleInterpolator {
    joints: Vec<JointInterpolator>,
}

impl AngleInterpolator {
    /// Fit the joints of `table`
    ///
    /// `order` lists the served joints in the order their sensor packages
    /// arrive. Without it every calibrated joint is served in ascending
    /// index order. A listed joint that is missing or uncalibrated in the
    /// table is rejected here rather than at evaluation time.
    pub fn fit(
        table: &CalibrationTable,
        order: Option<&[usize]>,
        tail: PolynomialTail,
    ) -> ConfigResult<Self> {
        let order: Vec<usize> = match order {
            Some(order) => order.to_vec(),
            None => table.calibrated_joints().collect(),
        };
        if order.is_empty() {
            return Err(ConfigError::EmptyCalibration);
        }

        let mut joints = Vec::with_capacity(order.len());
        for (slot, &joint) in order.iter().enumerate() {
            if order[..slot].contains(&joint) {
                return Err(ConfigError::DuplicateJoint { joint });
            }
            let samples = match table.samples(joint) {
                Some(samples) => samples,
                None if table.contains(joint) => {
                    return Err(ConfigError::UncalibratedJoint { joint })
                }
                None => return Err(ConfigError::UnknownJoint { joint }),
            };
            joints.push(JointInterpolator::fit(joint, samples, tail)?);
        }

        Ok(Self { joints })
    }

    /// Number of served joints
    pub fn len(&self) -> usize {
        self.joints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.joints.is_empty()
    }

    /// Served joint indices in sensor order
    pub fn joint_ids(&self) -> Vec<usize> {
        self.joints.iter().map(JointInterpolator::joint).collect()
    }

    /// Sensor slot serving `joint`
    pub fn slot_of(&self, joint: usize) -> Option<usize> {
        self.joints.iter().position(|j| j.joint() == joint)
    }

    pub fn joint(&self, slot: usize) -> Option<&JointInterpolator> {
        self.joints.get(slot)
    }

    pub fn iter(&self) -> core::slice::Iter<'_, JointInterpolator> {
        self.joints.iter()
    }

    /// Evaluate the interpolant of joint index `joint`
    pub fn evaluate(&self, joint: usize, feature: &FeatureVector) -> EstimateResult<JointAngle> {
        let slot = self
            .slot_of(joint)
            .ok_or(EstimateError::UnknownJoint { joint })?;
        self.evaluate_slot(slot, feature)
    }

    /// Evaluate the interpolant in sensor slot `slot`
    pub fn evaluate_slot(&self, slot: usize, feature: &FeatureVector) -> EstimateResult<JointAngle> {
        self.joints
            .get(slot)
            .map(|j| j.evaluate(feature))
            .ok_or(EstimateError::UnknownJoint { joint: slot })
    }

    /// Evaluate every served joint on its slice of `frame`
    pub fn evaluate_frame(&self, frame: &FeatureFrame) -> EstimateResult<Vec<JointAngle>> {
        if frame.len() != self.joints.len() {
            return Err(EstimateError::SensorCountMismatch {
                expected: self.joints.len(),
                provided: frame.len(),
            });
        }

        Ok(self
            .joints
            .iter()
            .zip(frame.iter())
            .map(|(joint, feature)| joint.evaluate(feature))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feature(seed: f64) -> [f64; 12] {
        let mut values = [0.0; 12];
        for (i, v) in values.iter_mut().enumerate() {
            *v = seed * (i as f64 + 1.0) + (seed * i as f64).sin() * 1e-3;
        }
        values
    }

    fn sweep(count: usize) -> Vec<CalibrationSample> {
        (0..count)
            .map(|i| CalibrationSample::new(i as f64 * 5.0, feature(i as f64 * 1e-3)))
            .collect()
    }

    #[test]
    fn exact_at_training_points() {
        let samples = sweep(20);
        let joint = JointInterpolator::fit(0, &samples, PolynomialTail::Auto).unwrap();

        for sample in &samples {
            let angle = joint.evaluate(&sample.feature).single().unwrap();
            let expected = sample.angle.single().unwrap();
            assert!((angle - expected).abs() < 1e-6, "{} vs {}", angle, expected);
        }
    }

    #[test]
    fn two_samples_interpolate_midpoint() {
        let samples = vec![
            CalibrationSample::new(0.0, [0.0; 12]),
            CalibrationSample::new(20.0, [1e-3; 12]),
        ];
        let joint = JointInterpolator::fit(3, &samples, PolynomialTail::Auto).unwrap();

        assert_eq!(joint.tail_degree(), TailDegree::Constant);
        let mid = joint.evaluate(&FeatureVector::new([5e-4; 12]));
        assert!((mid.single().unwrap() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn pair_angles_keep_both_components() {
        let samples = vec![
            CalibrationSample::new([0.0, 10.0], [0.0; 12]),
            CalibrationSample::new([20.0, 30.0], [1e-3; 12]),
        ];
        let joint = JointInterpolator::fit(0, &samples, PolynomialTail::Auto).unwrap();

        assert_eq!(joint.angle_dims(), 2);
        match joint.evaluate(&FeatureVector::new([1e-3; 12])) {
            JointAngle::Pair([a, b]) => {
                assert!((a - 20.0).abs() < 1e-9);
                assert!((b - 30.0).abs() < 1e-9);
            }
            other => panic!("expected pair, got {:?}", other),
        }
    }

    #[test]
    fn empty_joint_is_rejected() {
        assert_eq!(
            JointInterpolator::fit(2, &[], PolynomialTail::Auto).unwrap_err(),
            CalibrationError::NoSamples { joint: 2 }
        );
    }

    #[test]
    fn mixed_angle_shapes_are_rejected() {
        let samples = vec![
            CalibrationSample::new(0.0, [0.0; 12]),
            CalibrationSample::new([1.0, 2.0], [1.0; 12]),
        ];
        assert_eq!(
            JointInterpolator::fit(1, &samples, PolynomialTail::Auto).unwrap_err(),
            CalibrationError::InconsistentAngleShape { joint: 1, sample: 1, expected: 1, found: 2 }
        );
    }

    #[test]
    fn non_finite_values_are_rejected() {
        let mut bad = [0.0; 12];
        bad[4] = f64::NAN;
        let samples = vec![
            CalibrationSample::new(0.0, [1.0; 12]),
            CalibrationSample::new(1.0, bad),
        ];
        assert_eq!(
            JointInterpolator::fit(0, &samples, PolynomialTail::Auto).unwrap_err(),
            CalibrationError::NonFiniteSample { joint: 0, sample: 1 }
        );
    }

    #[test]
    fn duplicate_features_are_rejected() {
        let samples = vec![
            CalibrationSample::new(0.0, [1.0; 12]),
            CalibrationSample::new(1.0, [2.0; 12]),
            CalibrationSample::new(2.0, [1.0; 12]),
        ];
        assert_eq!(
            JointInterpolator::fit(5, &samples, PolynomialTail::Auto).unwrap_err(),
            CalibrationError::DuplicateSample { joint: 5, first: 0, second: 2 }
        );
    }

    #[test]
    fn explicit_affine_with_too_few_samples_is_singular() {
        assert_eq!(
            JointInterpolator::fit(0, &sweep(3), PolynomialTail::Affine).unwrap_err(),
            CalibrationError::SingularSystem { joint: 0 }
        );
    }

    fn table() -> CalibrationTable {
        let mut table = CalibrationTable::new();
        table.insert(0, sweep(4));
        table.insert_uncalibrated(1);
        table.insert(6, sweep(5));
        table
    }

    #[test]
    fn default_order_is_ascending_calibrated_joints() {
        let interpolator = AngleInterpolator::fit(&table(), None, PolynomialTail::Auto).unwrap();
        assert_eq!(interpolator.joint_ids(), vec![0, 6]);
        assert_eq!(interpolator.slot_of(6), Some(1));
    }

    #[test]
    fn explicit_order_is_kept() {
        let interpolator =
            AngleInterpolator::fit(&table(), Some(&[6, 0]), PolynomialTail::Auto).unwrap();
        assert_eq!(interpolator.joint_ids(), vec![6, 0]);
    }

    #[test]
    fn served_joint_must_be_calibrated() {
        assert_eq!(
            AngleInterpolator::fit(&table(), Some(&[0, 1]), PolynomialTail::Auto).unwrap_err(),
            ConfigError::UncalibratedJoint { joint: 1 }
        );
        assert_eq!(
            AngleInterpolator::fit(&table(), Some(&[9]), PolynomialTail::Auto).unwrap_err(),
            ConfigError::UnknownJoint { joint: 9 }
        );
        assert_eq!(
            AngleInterpolator::fit(&table(), Some(&[0, 0]), PolynomialTail::Auto).unwrap_err(),
            ConfigError::DuplicateJoint { joint: 0 }
        );
    }

    #[test]
    fn empty_table_is_rejected() {
        let mut table = CalibrationTable::new();
        table.insert_uncalibrated(0);
        assert_eq!(
            AngleInterpolator::fit(&table, None, PolynomialTail::Auto).unwrap_err(),
            ConfigError::EmptyCalibration
        );
    }

    #[test]
    fn fitting_errors_are_wrapped() {
        let mut table = CalibrationTable::new();
        table.insert(3, Vec::new());
        assert_eq!(
            AngleInterpolator::fit(&table, None, PolynomialTail::Auto).unwrap_err(),
            ConfigError::Calibration(CalibrationError::NoSamples { joint: 3 })
        );
    }

    #[test]
    fn evaluate_unknown_joint_is_an_error() {
        let interpolator = AngleInterpolator::fit(&table(), None, PolynomialTail::Auto).unwrap();
        assert_eq!(
            interpolator.evaluate(1, &FeatureVector::zeros()).unwrap_err(),
            EstimateError::UnknownJoint { joint: 1 }
        );
        assert!(interpolator.evaluate(6, &FeatureVector::zeros()).is_ok());
    }

    #[test]
    fn evaluate_frame_checks_joint_count() {
        let interpolator = AngleInterpolator::fit(&table(), None, PolynomialTail::Auto).unwrap();
        assert_eq!(
            interpolator.evaluate_frame(&FeatureFrame::zeros(3)).unwrap_err(),
            EstimateError::SensorCountMismatch { expected: 2, provided: 3 }
        );
        assert_eq!(interpolator.evaluate_frame(&FeatureFrame::zeros(2)).unwrap().len(), 2);
    }
}
