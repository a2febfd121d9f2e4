//! Filter Parameters
//!
//! Defaults for the outlier clipping and IIR smoothing stages. The hand
//! streams telemetry at roughly 150 Hz, so the default population covers the
//! last ~65 ms of readings.

/// Number of feature frames kept as the outlier reference population.
///
/// Also the warm-up length: no estimate is produced before this many
/// snapshots have been seen.
pub const DEFAULT_OUTLIER_POPULATION: usize = 10;

/// Half-width of the clipping band in population standard deviations.
///
/// 3σ keeps ~99.7% of normally distributed readings untouched.
pub const DEFAULT_OUTLIER_SIGMA: f64 = 3.0;

/// Weight of the newest sample in the exponential smoother.
///
/// Valid range is the open interval (0, 1). At 0.3 a step change reaches
/// 97% of its final value after 10 samples.
pub const DEFAULT_IIR_NEW_SAMPLE_WEIGHT: f64 = 0.3;
