//! Numeric conversion helpers centralizing safe money casts.

use num_traits::cast::cast;

/// Round a f64 half away from zero and clamp it to the i64 range.
///
/// Non-finite inputs collapse to 0 so a bad price never leaks into a total.
#[must_use]
pub fn round_f64_to_i64(value: f64) -> i64 {
    if !value.is_finite() {
        return 0;
    }
    let min = cast::<i64, f64>(i64::MIN).unwrap_or(f64::MIN);
    let max = cast::<i64, f64>(i64::MAX).unwrap_or(f64::MAX);
    let clamped = value.clamp(min, max).round();
    cast::<f64, i64>(clamped).unwrap_or(0)
}

/// Floor a f64 and clamp it to the i64 range, returning 0 for non-finite values.
#[must_use]
pub fn floor_f64_to_i64(value: f64) -> i64 {
    if !value.is_finite() {
        return 0;
    }
    let min = cast::<i64, f64>(i64::MIN).unwrap_or(f64::MIN);
    let max = cast::<i64, f64>(i64::MAX).unwrap_or(f64::MAX);
    let clamped = value.clamp(min, max).floor();
    cast::<f64, i64>(clamped).unwrap_or(0)
}

/// Convert i64 to f64 while allowing precision loss in a single location.
#[must_use]
pub fn i64_to_f64(value: i64) -> f64 {
    cast::<i64, f64>(value).unwrap_or(0.0)
}

/// Convert a count into i64, saturating at `i64::MAX`.
#[must_use]
pub fn usize_to_i64(value: usize) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounding_handles_non_finite() {
        assert_eq!(round_f64_to_i64(f64::NAN), 0);
        assert_eq!(round_f64_to_i64(f64::INFINITY), 0);
        assert_eq!(floor_f64_to_i64(f64::NEG_INFINITY), 0);
    }

    #[test]
    fn rounding_goes_half_away_from_zero() {
        assert_eq!(round_f64_to_i64(2.5), 3);
        assert_eq!(round_f64_to_i64(-2.5), -3);
        assert_eq!(round_f64_to_i64(12_345.4), 12_345);
        assert_eq!(floor_f64_to_i64(9.99), 9);
    }

    #[test]
    fn counts_convert_without_wrapping() {
        assert_eq!(usize_to_i64(7), 7);
        assert!((i64_to_f64(150_000) - 150_000.0).abs() < f64::EPSILON);
    }
}
