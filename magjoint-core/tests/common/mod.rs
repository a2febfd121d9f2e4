//! Shared fixtures for integration tests
//!
//! - `SyntheticRig`: raw package counts for a hand with a smooth, known
//!   field-versus-angle response per joint
//! - calibration tables recorded through the estimator's own feature
//!   extraction, so table features match what `get_angles` sees
//! - a deterministic noise source

#![allow(dead_code)]

use magjoint_core::{
    AngleEstimator, CalibrationSample, CalibrationTable, EstimatorConfig, FeatureVector,
    SensorSnapshot,
};

/// Raw temperature count at 25 °C for the default hardware config
pub const TEMPERATURE_OFFSET: i32 = 4000;

/// Deterministic linear congruential generator
pub struct TestRng {
    state: u32,
}

impl TestRng {
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Uniform in [0, 1)
    pub fn next_f64(&mut self) -> f64 {
        self.state = self.state.wrapping_mul(1_103_515_245).wrapping_add(12_345);
        f64::from((self.state >> 16) & 0x7fff) / 32_768.0
    }

    /// Uniform in [-amplitude, amplitude)
    pub fn noise(&mut self, amplitude: f64) -> f64 {
        (self.next_f64() * 2.0 - 1.0) * amplitude
    }
}

/// Hand whose pixel counts follow smooth functions of the joint angle
pub struct SyntheticRig {
    pub joints: Vec<usize>,
    pub temperature: i32,
}

impl SyntheticRig {
    pub fn new(joints: Vec<usize>) -> Self {
        Self {
            joints,
            temperature: TEMPERATURE_OFFSET,
        }
    }

    /// Package counts for joint index `joint` bent to `angle` degrees
    pub fn package(&self, joint: usize, angle: f64) -> SensorSnapshot {
        let theta = angle.to_radians();
        let mut counts = [[0i32; 3]; 4];
        for (p, pixel) in counts.iter_mut().enumerate() {
            for (a, count) in pixel.iter_mut().enumerate() {
                let phase = 0.7 * p as f64 + 0.3 * joint as f64 + a as f64;
                let value = 800.0 * (theta * (1.0 + 0.1 * a as f64) + phase).sin()
                    + 200.0 * (0.5 * theta + a as f64).cos();
                *count = value.round() as i32;
            }
        }
        SensorSnapshot::from_package(counts, self.temperature)
    }

    /// One tick with every joint at the matching angle
    pub fn tick(&self, angles: &[f64]) -> Vec<SensorSnapshot> {
        self.joints
            .iter()
            .zip(angles)
            .map(|(&joint, &angle)| self.package(joint, angle))
            .collect()
    }

    /// One tick with every joint at the same angle
    pub fn uniform_tick(&self, angle: f64) -> Vec<SensorSnapshot> {
        self.tick(&vec![angle; self.joints.len()])
    }

    /// Same as `tick`, with uniform count noise added to every axis
    pub fn noisy_tick(&self, angles: &[f64], rng: &mut TestRng, amplitude: f64) -> Vec<SensorSnapshot> {
        self.tick(angles)
            .into_iter()
            .map(|mut snapshot| {
                for pixel in snapshot.pixels.iter_mut() {
                    pixel.x += rng.noise(amplitude).round() as i32;
                    pixel.y += rng.noise(amplitude).round() as i32;
                    pixel.z += rng.noise(amplitude).round() as i32;
                }
                snapshot
            })
            .collect()
    }

    /// Record a calibration table by sweeping every joint through `angles`
    ///
    /// Features are extracted with an unfiltered estimator built from
    /// `config`, so they match what the estimator under test computes.
    pub fn record_table(&self, config: &EstimatorConfig, angles: &[f64]) -> CalibrationTable {
        let probe = AngleEstimator::new(
            &probe_table(&self.joints),
            config
                .clone()
                .with_outlier(None)
                .with_smoothing(None)
                .with_joint_order(self.joints.clone()),
        )
        .expect("probe estimator");

        let mut table = CalibrationTable::new();
        for (slot, &joint) in self.joints.iter().enumerate() {
            let samples = angles
                .iter()
                .map(|&angle| {
                    let frame = probe.features(&self.uniform_tick(angle)).expect("features");
                    CalibrationSample::new(angle, frame[slot])
                })
                .collect();
            table.insert(joint, samples);
        }
        table
    }
}

/// Two-point table for `joints`, used only to build feature probes
pub fn probe_table(joints: &[usize]) -> CalibrationTable {
    let mut table = CalibrationTable::new();
    for &joint in joints {
        table.insert(
            joint,
            vec![
                CalibrationSample::new(0.0, FeatureVector::zeros()),
                CalibrationSample::new(1.0, [1.0; 12]),
            ],
        );
    }
    table
}

/// 0° to 90° in 5° steps
pub fn sweep_angles() -> Vec<f64> {
    (0..=18).map(|i| f64::from(i) * 5.0).collect()
}

pub fn assert_close(actual: f64, expected: f64, tolerance: f64) {
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {} ± {}, got {}",
        expected,
        tolerance,
        actual
    );
}
