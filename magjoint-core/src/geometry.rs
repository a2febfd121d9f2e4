//! Sensor package geometry profiles
//!
//! The logical wiring order of a package's pixels does not match their
//! physical placement, and the package frame does not match the joint frame.
//! A [`GeometryProfile`] captures both corrections for one hardware revision:
//!
//! - `pixel_order`: `out[i] = in[pixel_order[i]]`, applied to raw samples
//! - `axes`: per-pixel axis permutation and sign, applied after calibration
//! - `baseline`: rig-specific field subtracted before flattening
//!
//! Known revisions disagree on all three, and the canonical mapping for the
//! current revision has not been confirmed on a physical rig. Profiles are
//! therefore plain data, chosen when the estimator is built, never branches in
//! the pipeline.
//!
//! ```rust
//! use magjoint_core::{AxisMap, GeometryProfile, FluxVector};
//!
//! let profile = GeometryProfile::full_remap();
//! let remapped = profile.remap_axes(&[FluxVector::new(1.0, 2.0, 3.0); 4]);
//! assert_eq!(remapped[0], FluxVector::new(-1.0, -3.0, -2.0));
//! ```

use crate::calibration::RawPixelSample;
use crate::constants::{AXES_PER_PIXEL, PIXELS_PER_SENSOR};
use crate::errors::{ConfigError, ConfigResult};
use crate::features::FluxVector;

/// Axis permutation plus sign, applied to every pixel
///
/// `out[a] = sign[a] * in[order[a]]` with axes indexed x = 0, y = 1, z = 2.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AxisMap {
    pub order: [usize; AXES_PER_PIXEL],
    pub sign: [f64; AXES_PER_PIXEL],
}

impl AxisMap {
    /// Package frame equals joint frame
    pub const IDENTITY: Self = Self {
        order: [0, 1, 2],
        sign: [1.0, 1.0, 1.0],
    };

    /// All axes negated, Y and Z swapped: `-[x, z, y]`
    pub const NEGATED_YZ_SWAP: Self = Self {
        order: [0, 2, 1],
        sign: [-1.0, -1.0, -1.0],
    };

    pub fn apply(&self, flux: FluxVector) -> FluxVector {
        let input = flux.to_array();
        let mut out = [0.0; AXES_PER_PIXEL];
        for (axis, value) in out.iter_mut().enumerate() {
            *value = self.sign[axis] * input[self.order[axis]];
        }
        FluxVector::from_array(out)
    }

    fn validate(&self) -> ConfigResult<()> {
        if !is_permutation(&self.order) {
            return Err(ConfigError::InvalidGeometry {
                reason: "axis order is not a permutation of x, y, z",
            });
        }
        if self.sign.iter().any(|s| *s != 1.0 && *s != -1.0) {
            return Err(ConfigError::InvalidGeometry {
                reason: "axis signs must be +1 or -1",
            });
        }
        Ok(())
    }
}

impl Default for AxisMap {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Static field subtracted from every pixel before flattening
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum BaselineOffsets {
    /// No subtraction
    #[default]
    None,
    /// Same four offsets for every joint
    Uniform([FluxVector; PIXELS_PER_SENSOR]),
    /// One set of offsets per served joint, in sensor order
    PerJoint(Vec<[FluxVector; PIXELS_PER_SENSOR]>),
}

impl BaselineOffsets {
    /// Offsets for the joint in sensor slot `slot`, if any
    pub fn for_slot(&self, slot: usize) -> Option<&[FluxVector; PIXELS_PER_SENSOR]> {
        match self {
            Self::None => None,
            Self::Uniform(offsets) => Some(offsets),
            Self::PerJoint(table) => table.get(slot),
        }
    }

    /// Check the table covers exactly `joints` served joints
    pub fn check_joint_count(&self, joints: usize) -> ConfigResult<()> {
        match self {
            Self::PerJoint(table) if table.len() != joints => Err(ConfigError::BaselineMismatch {
                offsets: table.len(),
                joints,
            }),
            _ => Ok(()),
        }
    }
}

/// Pixel order, axis map and baseline for one hardware revision
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeometryProfile {
    /// `out[i] = in[pixel_order[i]]`
    pub pixel_order: [usize; PIXELS_PER_SENSOR],
    pub axes: AxisMap,
    #[cfg_attr(feature = "serde", serde(default))]
    pub baseline: BaselineOffsets,
}

impl Default for GeometryProfile {
    fn default() -> Self {
        Self::full_remap()
    }
}

impl GeometryProfile {
    /// No reordering, no axis change, no baseline
    pub fn identity() -> Self {
        Self {
            pixel_order: [0, 1, 2, 3],
            axes: AxisMap::IDENTITY,
            baseline: BaselineOffsets::None,
        }
    }

    /// Revision with full pixel and axis remapping
    ///
    /// Pixel order `[3, 2, 0, 1]`, axes `-[x, z, y]`. This is the mapping the
    /// shipped calibration tables were recorded with.
    pub fn full_remap() -> Self {
        Self {
            pixel_order: [3, 2, 0, 1],
            axes: AxisMap::NEGATED_YZ_SWAP,
            baseline: BaselineOffsets::None,
        }
    }

    /// Earlier revision: pixel order `[3, 0, 2, 1]`, package axes kept,
    /// rig baseline subtracted
    pub fn baseline_only(baseline: BaselineOffsets) -> Self {
        Self {
            pixel_order: [3, 0, 2, 1],
            axes: AxisMap::IDENTITY,
            baseline,
        }
    }

    pub fn with_pixel_order(mut self, pixel_order: [usize; PIXELS_PER_SENSOR]) -> Self {
        self.pixel_order = pixel_order;
        self
    }

    pub fn with_axes(mut self, axes: AxisMap) -> Self {
        self.axes = axes;
        self
    }

    pub fn with_baseline(mut self, baseline: BaselineOffsets) -> Self {
        self.baseline = baseline;
        self
    }

    /// Reject orders that are not permutations and signs other than ±1
    pub fn validate(&self) -> ConfigResult<()> {
        if !is_permutation(&self.pixel_order) {
            return Err(ConfigError::InvalidGeometry {
                reason: "pixel order is not a permutation of the four pixels",
            });
        }
        self.axes.validate()
    }

    /// Reorder raw pixel samples from wiring order to physical order
    pub fn remap_pixels(
        &self,
        pixels: &[RawPixelSample; PIXELS_PER_SENSOR],
    ) -> [RawPixelSample; PIXELS_PER_SENSOR] {
        let mut out = *pixels;
        for (slot, &source) in out.iter_mut().zip(self.pixel_order.iter()) {
            *slot = pixels[source];
        }
        out
    }

    /// Apply the axis map to every pixel
    pub fn remap_axes(
        &self,
        flux: &[FluxVector; PIXELS_PER_SENSOR],
    ) -> [FluxVector; PIXELS_PER_SENSOR] {
        let mut out = *flux;
        for value in out.iter_mut() {
            *value = self.axes.apply(*value);
        }
        out
    }
}

fn is_permutation<const N: usize>(order: &[usize; N]) -> bool {
    let mut seen = [false; N];
    for &index in order {
        if index >= N || seen[index] {
            return false;
        }
        seen[index] = true;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(tag: i32) -> RawPixelSample {
        RawPixelSample { x: tag, y: 0, z: 0, temperature: 0 }
    }

    #[test]
    fn full_remap_pixel_order() {
        let profile = GeometryProfile::full_remap();
        let out = profile.remap_pixels(&[raw(0), raw(1), raw(2), raw(3)]);
        let tags: Vec<i32> = out.iter().map(|p| p.x).collect();
        assert_eq!(tags, vec![3, 2, 0, 1]);
    }

    #[test]
    fn baseline_only_keeps_axes() {
        let profile = GeometryProfile::baseline_only(BaselineOffsets::None);
        let flux = [FluxVector::new(1.0, 2.0, 3.0); 4];
        assert_eq!(profile.remap_axes(&flux), flux);

        let out = profile.remap_pixels(&[raw(0), raw(1), raw(2), raw(3)]);
        let tags: Vec<i32> = out.iter().map(|p| p.x).collect();
        assert_eq!(tags, vec![3, 0, 2, 1]);
    }

    #[test]
    fn negated_swap_axis_map() {
        let out = AxisMap::NEGATED_YZ_SWAP.apply(FluxVector::new(1.0, 2.0, 3.0));
        assert_eq!(out, FluxVector::new(-1.0, -3.0, -2.0));
    }

    #[test]
    fn rejects_repeated_pixel() {
        let profile = GeometryProfile::identity().with_pixel_order([0, 1, 1, 3]);
        assert!(matches!(
            profile.validate(),
            Err(ConfigError::InvalidGeometry { .. })
        ));
    }

    #[test]
    fn rejects_bad_axis_sign() {
        let axes = AxisMap { order: [0, 1, 2], sign: [1.0, 0.5, 1.0] };
        let profile = GeometryProfile::identity().with_axes(axes);
        assert!(profile.validate().is_err());
    }

    #[test]
    fn per_joint_baseline_must_cover_joints() {
        let baseline = BaselineOffsets::PerJoint(vec![[FluxVector::ZERO; 4]; 2]);
        assert!(baseline.check_joint_count(2).is_ok());
        assert_eq!(
            baseline.check_joint_count(3),
            Err(ConfigError::BaselineMismatch { offsets: 2, joints: 3 })
        );
    }
}
