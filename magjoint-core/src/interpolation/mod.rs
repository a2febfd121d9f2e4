//! Feature-to-angle interpolation
//!
//! Each calibrated joint gets its own interpolant, fitted once from the
//! `(angle, feature)` pairs recorded while the joint was swept through known
//! poses. Interpolants use a linear radial basis kernel with no smoothing, so
//! a feature vector equal to a calibration sample returns that sample's angle
//! exactly.
//!
//! ```text
//! CalibrationTable ──fit──► AngleInterpolator ──► [JointInterpolator; joints]
//!   joint → samples          (sensor order)         12 features → angle
//! ```
//!
//! Inside the convex hull of a joint's samples the result blends neighbouring
//! calibration poses. Outside it the interpolant extrapolates linearly and
//! carries no accuracy guarantee.

mod interpolator;
pub mod rbf;
mod table;

pub use interpolator::{AngleInterpolator, JointInterpolator};
pub use rbf::{PolynomialTail, TailDegree};
pub use table::{CalibrationSample, CalibrationTable, JointAngle};
