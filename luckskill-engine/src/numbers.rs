//! Numeric conversion helpers centralizing safe numeric casts.

use num_traits::cast::cast;

use crate::constants::{SCORE_MAX_F64, SCORE_MIN_F64};

/// Convert a count to f64 while allowing precision loss in a single location.
#[must_use]
pub fn usize_to_f64(value: usize) -> f64 {
    cast::<usize, f64>(value).unwrap_or(0.0)
}

/// Convert a running total to f64 while allowing precision loss in a single location.
#[must_use]
pub fn u64_to_f64(value: u64) -> f64 {
    cast::<u64, f64>(value).unwrap_or(0.0)
}

/// Widen an index to a stream counter; saturates on targets wider than 64 bits.
#[must_use]
pub fn usize_to_u64(value: usize) -> u64 {
    u64::try_from(value).unwrap_or(u64::MAX)
}

/// Clamp a raw draw into the score domain and truncate toward zero.
///
/// NaN maps to the lowest score.
#[must_use]
pub fn truncate_score(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    let clamped = value.clamp(SCORE_MIN_F64, SCORE_MAX_F64).trunc();
    cast::<f64, u8>(clamped).unwrap_or(0)
}
