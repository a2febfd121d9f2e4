//! Flux vectors, feature vectors and feature frames
//!
//! A [`FluxVector`] is one pixel's calibrated field in Tesla. The four flux
//! vectors of a sensor package are flattened pixel-major, axis-minor into a
//! [`FeatureVector`]:
//!
//! ```text
//! [p0.x, p0.y, p0.z, p1.x, p1.y, p1.z, p2.x, p2.y, p2.z, p3.x, p3.y, p3.z]
//! ```
//!
//! One feature vector per served joint, in sensor order, forms a
//! [`FeatureFrame`]. Filters operate on whole frames; interpolators consume
//! one joint's vector at a time.

use core::ops::{Index, IndexMut};

use crate::constants::{AXES_PER_PIXEL, FEATURES_PER_JOINT, PIXELS_PER_SENSOR};
use crate::geometry::BaselineOffsets;

/// Calibrated 3-axis field of one pixel (Tesla)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FluxVector {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl FluxVector {
    /// Zero field
    pub const ZERO: Self = Self { x: 0.0, y: 0.0, z: 0.0 };

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Components in x, y, z order
    pub fn to_array(self) -> [f64; AXES_PER_PIXEL] {
        [self.x, self.y, self.z]
    }

    pub fn from_array(values: [f64; AXES_PER_PIXEL]) -> Self {
        Self::new(values[0], values[1], values[2])
    }

    /// Component-wise difference
    pub fn minus(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }
}

/// One joint's flattened pixel fluxes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector([f64; FEATURES_PER_JOINT]);

impl FeatureVector {
    pub const fn new(values: [f64; FEATURES_PER_JOINT]) -> Self {
        Self(values)
    }

    pub const fn zeros() -> Self {
        Self([0.0; FEATURES_PER_JOINT])
    }

    /// Build from a slice, `None` unless it has exactly 12 elements
    pub fn from_slice(values: &[f64]) -> Option<Self> {
        let array: [f64; FEATURES_PER_JOINT] = values.try_into().ok()?;
        Some(Self(array))
    }

    /// Flatten four pixel fluxes pixel-major
    pub fn from_pixels(pixels: &[FluxVector; PIXELS_PER_SENSOR]) -> Self {
        let mut values = [0.0; FEATURES_PER_JOINT];
        for (chunk, flux) in values.chunks_exact_mut(AXES_PER_PIXEL).zip(pixels) {
            chunk.copy_from_slice(&flux.to_array());
        }
        Self(values)
    }

    /// Flux of pixel `index`
    pub fn pixel(&self, index: usize) -> FluxVector {
        let base = index * AXES_PER_PIXEL;
        FluxVector::new(self.0[base], self.0[base + 1], self.0[base + 2])
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn as_array(&self) -> &[f64; FEATURES_PER_JOINT] {
        &self.0
    }

    pub fn is_finite(&self) -> bool {
        self.0.iter().all(|v| v.is_finite())
    }

    /// Euclidean distance to another vector
    pub fn distance(&self, other: &Self) -> f64 {
        self.0
            .iter()
            .zip(other.0.iter())
            .map(|(a, b)| (a - b) * (a - b))
            .sum::<f64>()
            .sqrt()
    }
}

impl Default for FeatureVector {
    fn default() -> Self {
        Self::zeros()
    }
}

impl Index<usize> for FeatureVector {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        &self.0[index]
    }
}

impl IndexMut<usize> for FeatureVector {
    fn index_mut(&mut self, index: usize) -> &mut f64 {
        &mut self.0[index]
    }
}

impl From<[f64; FEATURES_PER_JOINT]> for FeatureVector {
    fn from(values: [f64; FEATURES_PER_JOINT]) -> Self {
        Self(values)
    }
}

/// Feature vectors of every served joint for one snapshot
///
/// The outlier and smoothing filters treat a frame as a single
/// `joints × 12` sample.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeatureFrame {
    joints: Vec<FeatureVector>,
}

impl FeatureFrame {
    pub fn new(joints: Vec<FeatureVector>) -> Self {
        Self { joints }
    }

    /// Frame of `joints` zero vectors
    pub fn zeros(joints: usize) -> Self {
        Self {
            joints: vec![FeatureVector::zeros(); joints],
        }
    }

    /// Number of joints in the frame
    pub fn len(&self) -> usize {
        self.joints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.joints.is_empty()
    }

    pub fn joint(&self, slot: usize) -> Option<&FeatureVector> {
        self.joints.get(slot)
    }

    pub fn iter(&self) -> core::slice::Iter<'_, FeatureVector> {
        self.joints.iter()
    }

    pub fn as_slice(&self) -> &[FeatureVector] {
        &self.joints
    }

    pub fn into_inner(self) -> Vec<FeatureVector> {
        self.joints
    }

    /// All components, joint-major
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.joints.iter().flat_map(|v| v.as_slice().iter().copied())
    }

    /// Combine two frames of equal shape element by element
    pub fn zip_map(&self, other: &Self, mut f: impl FnMut(f64, f64) -> f64) -> Self {
        let joints = self
            .joints
            .iter()
            .zip(other.joints.iter())
            .map(|(a, b)| {
                let mut out = FeatureVector::zeros();
                for i in 0..FEATURES_PER_JOINT {
                    out[i] = f(a[i], b[i]);
                }
                out
            })
            .collect();
        Self { joints }
    }
}

impl From<Vec<FeatureVector>> for FeatureFrame {
    fn from(joints: Vec<FeatureVector>) -> Self {
        Self::new(joints)
    }
}

impl Index<usize> for FeatureFrame {
    type Output = FeatureVector;

    fn index(&self, slot: usize) -> &FeatureVector {
        &self.joints[slot]
    }
}

impl IndexMut<usize> for FeatureFrame {
    fn index_mut(&mut self, slot: usize) -> &mut FeatureVector {
        &mut self.joints[slot]
    }
}

/// Turns a joint's remapped pixel fluxes into its feature vector
///
/// Hardware revisions that carry a rig-specific magnetic baseline subtract it
/// per pixel before flattening.
#[derive(Debug, Clone, Default)]
pub struct FeatureAggregator {
    baseline: BaselineOffsets,
}

impl FeatureAggregator {
    pub fn new(baseline: BaselineOffsets) -> Self {
        Self { baseline }
    }

    /// Feature vector for the joint in sensor slot `slot`
    pub fn aggregate(&self, slot: usize, pixels: &[FluxVector; PIXELS_PER_SENSOR]) -> FeatureVector {
        match self.baseline.for_slot(slot) {
            Some(offsets) => {
                let mut corrected = *pixels;
                for (flux, offset) in corrected.iter_mut().zip(offsets) {
                    *flux = flux.minus(*offset);
                }
                FeatureVector::from_pixels(&corrected)
            }
            None => FeatureVector::from_pixels(pixels),
        }
    }

    pub fn baseline(&self) -> &BaselineOffsets {
        &self.baseline
    }
}
