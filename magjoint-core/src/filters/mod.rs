//! Stream filters over feature frames
//!
//! ## Overview
//!
//! Two stateful stages sit between feature extraction and interpolation:
//!
//! 1. [`OutlierFilter`] keeps the last `P` frames and clips each new frame,
//!    element by element, to `mean ± k·σ` of that population. Readings are
//!    clipped, never dropped, so a transient spike cannot push the
//!    interpolator far outside its calibrated region while the population
//!    still follows slow drift.
//! 2. [`SmoothingFilter`] is a first-order IIR (exponential moving average)
//!    seeded from the outlier population mean.
//!
//! Both filters see the whole frame (every served joint) as one sample, so
//! warm-up is global to an estimator rather than per joint.
//!
//! ## Warm-up
//!
//! ```text
//! call:        1      2    ...   P-1      P        P+1
//! population:  1      2    ...   P-1      P        P (oldest evicted)
//! result:    WarmingUp ─────────────────► Ready    Ready
//! ```

mod outlier;
mod smoothing;

pub use outlier::{OutlierConfig, OutlierFilter, PopulationStats};
pub use smoothing::{SmoothingConfig, SmoothingFilter};

/// Outcome of a stage that needs history before producing output
#[derive(Debug, Clone, PartialEq)]
pub enum Readiness<T> {
    /// Output is available
    Ready(T),
    /// Population still filling; nothing is produced for this call
    WarmingUp {
        /// Frames collected so far, including this call's
        collected: usize,
        /// Frames needed before output starts
        required: usize,
    },
}

impl<T> Readiness<T> {
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    /// The value, discarding warm-up progress
    pub fn ready(self) -> Option<T> {
        match self {
            Self::Ready(value) => Some(value),
            Self::WarmingUp { .. } => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Readiness<U> {
        match self {
            Self::Ready(value) => Readiness::Ready(f(value)),
            Self::WarmingUp { collected, required } => Readiness::WarmingUp { collected, required },
        }
    }
}
