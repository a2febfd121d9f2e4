//! Pull-based telemetry sources
//!
//! Telemetry arrives as one vector of [`SensorSnapshot`]s per tick, one
//! package per served joint. Sources follow the `nb` model:
//!
//! - `Ok(snapshots)`: next tick available
//! - `Err(nb::Error::WouldBlock)`: nothing yet, poll again later
//! - `Err(nb::Error::Other(e))`: transport failure or end of stream
//!
//! ```rust
//! use magjoint_core::stream::{poll_angles, SnapshotSource, StreamError};
//! use magjoint_core::{AngleEstimator, Readiness};
//!
//! fn drain<S, E>(estimator: &mut AngleEstimator, source: &mut S) -> Result<usize, StreamError<E>>
//! where
//!     S: SnapshotSource<Error = StreamError<E>>,
//! {
//!     let mut produced = 0;
//!     loop {
//!         match poll_angles(estimator, source) {
//!             Ok(Readiness::Ready(_)) => produced += 1,
//!             Ok(Readiness::WarmingUp { .. }) => {}
//!             Err(nb::Error::WouldBlock) => return Ok(produced),
//!             Err(nb::Error::Other(StreamError::EndOfStream)) => return Ok(produced),
//!             Err(nb::Error::Other(e)) => return Err(e),
//!         }
//!     }
//! }
//! ```

use core::convert::Infallible;
use core::fmt;

use crate::errors::EstimateError;
use crate::estimator::{AngleEstimator, Readiness, SensorSnapshot};
use crate::interpolation::JointAngle;

/// Telemetry stream failures
#[derive(Debug, Clone, PartialEq)]
pub enum StreamError<E> {
    /// Transport-level error of the underlying source
    Transport(E),
    /// Snapshot rejected by the estimator
    Estimate(EstimateError),
    /// Source is exhausted; sticky
    EndOfStream,
}

impl<E: fmt::Display> fmt::Display for StreamError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(e) => write!(f, "Transport error: {}", e),
            Self::Estimate(e) => write!(f, "Estimation error: {}", e),
            Self::EndOfStream => write!(f, "End of stream"),
        }
    }
}

impl<E: fmt::Debug + fmt::Display> std::error::Error for StreamError<E> {}

impl<E> From<EstimateError> for StreamError<E> {
    fn from(e: EstimateError) -> Self {
        Self::Estimate(e)
    }
}

/// Source of per-tick sensor snapshots
pub trait SnapshotSource {
    type Error;

    /// Pull the next tick's snapshots, one per served joint
    fn poll_snapshots(&mut self) -> nb::Result<Vec<SensorSnapshot>, Self::Error>;

    /// Bounds on the remaining ticks, as `Iterator::size_hint`
    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, None)
    }
}

/// Replays recorded ticks from memory
#[derive(Debug, Clone, Default)]
pub struct ReplaySource {
    ticks: Vec<Vec<SensorSnapshot>>,
    position: usize,
}

impl ReplaySource {
    pub fn new(ticks: Vec<Vec<SensorSnapshot>>) -> Self {
        Self { ticks, position: 0 }
    }

    /// Rewind to the first tick
    pub fn reset(&mut self) {
        self.position = 0;
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn is_exhausted(&self) -> bool {
        self.position >= self.ticks.len()
    }
}

impl SnapshotSource for ReplaySource {
    type Error = StreamError<Infallible>;

    fn poll_snapshots(&mut self) -> nb::Result<Vec<SensorSnapshot>, Self::Error> {
        let tick = self
            .ticks
            .get(self.position)
            .ok_or(nb::Error::Other(StreamError::EndOfStream))?
            .clone();
        self.position += 1;
        Ok(tick)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.ticks.len().saturating_sub(self.position);
        (remaining, Some(remaining))
    }
}

/// Pull one tick from `source` and run it through `estimator`
pub fn poll_angles<S, E>(
    estimator: &mut AngleEstimator,
    source: &mut S,
) -> nb::Result<Readiness<Vec<JointAngle>>, StreamError<E>>
where
    S: SnapshotSource<Error = StreamError<E>>,
{
    let snapshots = source.poll_snapshots()?;
    estimator
        .get_angles(&snapshots)
        .map_err(|e| nb::Error::Other(StreamError::Estimate(e)))
}
