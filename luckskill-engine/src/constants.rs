//! Centralized constants for the selection simulator.
//!
//! Score bounds, the sweep grid, and parameter defaults live here so the
//! numeric contract of the engine can only change through reviewed code.

// Score domain -------------------------------------------------------------
pub const SCORE_MIN: u8 = 0;
pub const SCORE_MAX: u8 = 100;
pub(crate) const SCORE_MIN_F64: f64 = 0.0;
pub(crate) const SCORE_MAX_F64: f64 = 100.0;

// Luck-weight sweep --------------------------------------------------------
pub const SWEEP_POINTS: usize = 21;
/// Number of equal steps between the first and last sweep weight.
pub(crate) const SWEEP_DIVISIONS: u32 = 20;
pub const CONFIDENCE_LEVEL: f64 = 0.95;
pub const MIN_INTERVAL_SAMPLES: usize = 2;

// Parameter defaults -------------------------------------------------------
pub const DEFAULT_NUM_APPLICANTS: usize = 18_300;
pub const DEFAULT_NUM_SELECTED: usize = 10;
pub const DEFAULT_LUCK_WEIGHT: f64 = 0.05;
pub const DEFAULT_NUM_SIMULATIONS: usize = 500;
pub const DEFAULT_NORMAL_LOC: f64 = 85.0;
pub const DEFAULT_NORMAL_SCALE: f64 = 10.0;
pub const DEFAULT_SEED: u64 = 1337;
pub const DEFAULT_HISTOGRAM_BINS: usize = 20;

// Stream domain tags -------------------------------------------------------
pub(crate) const STREAM_TAG_TRIALS: &[u8] = b"luckskill/trials";
pub(crate) const STREAM_TAG_SWEEP: &[u8] = b"luckskill/sweep";
