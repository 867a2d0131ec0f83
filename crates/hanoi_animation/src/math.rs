//! Numeric helpers
//!
//! Snapping values to a multiple of a precision step. Every helper rounds its
//! result to 12 significant digits so that remainders like `0.30000000000000004`
//! collapse back onto the grid.

/// Significant digits kept by the snapping helpers
pub const SIGNIFICANT_DIGITS: usize = 12;

/// Round `n` to `digits` significant digits
pub fn to_precision(n: f64, digits: usize) -> f64 {
    if n == 0.0 || !n.is_finite() || digits == 0 {
        return n;
    }
    format!("{:.*e}", digits - 1, n).parse().unwrap_or(n)
}

fn step_or_one(precision: f64) -> f64 {
    if precision == 0.0 || precision.is_nan() {
        1.0
    } else {
        precision
    }
}

/// Snap `n` down (toward zero) to a multiple of `precision`
///
/// A zero precision means 1.
pub fn floor_to(n: f64, precision: f64) -> f64 {
    let p = step_or_one(precision);
    to_precision(n - n % p, SIGNIFICANT_DIGITS)
}

/// Snap `n` to the nearest multiple of `precision`, halves rounding up
pub fn round_to(n: f64, precision: f64) -> f64 {
    let p = step_or_one(precision);
    let mut n = n;
    if n % p >= p / 2.0 {
        n += p;
    }
    to_precision(n - n % p, SIGNIFICANT_DIGITS)
}

/// Snap `n` up to a multiple of `precision`
///
/// Values already on the grid are returned unchanged.
pub fn ceil_to(n: f64, precision: f64) -> f64 {
    let p = step_or_one(precision);
    let rem = n % p;
    if rem == 0.0 {
        return to_precision(n, SIGNIFICANT_DIGITS);
    }
    to_precision(n - rem + p, SIGNIFICANT_DIGITS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_precision_scrubs_noise() {
        assert_eq!(to_precision(0.1 + 0.2, 12), 0.3);
        assert_eq!(to_precision(123456.789, 3), 123000.0);
        assert_eq!(to_precision(0.0, 12), 0.0);
        assert!(to_precision(f64::NAN, 12).is_nan());
    }

    #[test]
    fn test_floor_to() {
        assert_eq!(floor_to(0.37, 0.1), 0.3);
        assert_eq!(floor_to(250.0, 100.0), 200.0);
        assert_eq!(floor_to(7.9, 0.0), 7.0);
        assert_eq!(floor_to(-1.5, 1.0), -1.0);
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(0.36, 0.1), 0.4);
        assert_eq!(round_to(0.34, 0.1), 0.3);
        assert_eq!(round_to(5.0, 10.0), 10.0);
        assert_eq!(round_to(4.9, 10.0), 0.0);
    }

    #[test]
    fn test_ceil_to() {
        assert_eq!(ceil_to(0.31, 0.1), 0.4);
        assert_eq!(ceil_to(2.0, 1.0), 2.0);
        assert_eq!(ceil_to(2.1, 1.0), 3.0);
    }
}
