//! Cubic-bezier timing curves
//!
//! A [`CubicBezier`] is the CSS `cubic-bezier(x1, y1, x2, y2)` timing function:
//! a parametric curve `(x(u), y(u))` running from (0, 0) to (1, 1). Evaluating
//! it at a progress value means inverting `x(u) = progress` with a bounded
//! Newton-Raphson search and reading `y` at the root.
//!
//! Compiled curves are memoized in a [`BezierCache`] owned by the easing table.

use std::sync::{Arc, Mutex, PoisonError};

use rustc_hash::FxHashMap;

/// Newton-Raphson iteration cap (the counter starts at 1, so 13 refinements)
pub const NEWTON_ITERATIONS: usize = 14;

/// Stop refining once `|x(u) - progress|` drops below this
pub const NEWTON_TOLERANCE: f64 = 0.001;

/// Slopes flatter than this would send the next guess to infinity
const MIN_SLOPE: f64 = 1e-6;

/// CSS `ease`, also the fallback for missing or malformed control points
pub const EASE: [f64; 4] = [0.25, 0.1, 0.25, 1.0];
/// CSS `ease-in`
pub const EASE_IN: [f64; 4] = [0.42, 0.0, 1.0, 1.0];
/// CSS `ease-out`
pub const EASE_OUT: [f64; 4] = [0.0, 0.0, 0.58, 1.0];
/// CSS `ease-in-out`
pub const EASE_IN_OUT: [f64; 4] = [0.42, 0.0, 0.58, 1.0];

/// Power-basis coefficients of one axis: `u * (c + u * (b + u * a))`
#[derive(Clone, Copy, Debug, PartialEq)]
struct Axis {
    a: f64,
    b: f64,
    c: f64,
}

impl Axis {
    fn new(p1: f64, p2: f64) -> Self {
        let c = 3.0 * p1;
        let b = 3.0 * (p2 - p1) - c;
        let a = 1.0 - c - b;
        Self { a, b, c }
    }

    fn sample(&self, u: f64) -> f64 {
        u * (self.c + u * (self.b + u * self.a))
    }

    fn slope(&self, u: f64) -> f64 {
        self.c + u * (2.0 * self.b + 3.0 * self.a * u)
    }
}

/// A compiled cubic-bezier timing curve
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CubicBezier {
    x: Axis,
    y: Axis,
}

impl CubicBezier {
    /// Compile a curve from `[x1, y1, x2, y2]`
    pub fn new(points: [f64; 4]) -> Self {
        let [x1, y1, x2, y2] = points;
        Self {
            x: Axis::new(x1, x2),
            y: Axis::new(y1, y2),
        }
    }

    pub fn x_at(&self, u: f64) -> f64 {
        self.x.sample(u)
    }

    pub fn y_at(&self, u: f64) -> f64 {
        self.y.sample(u)
    }

    /// Find the curve parameter whose x equals `x`
    ///
    /// Best effort: after the iteration cap (or on a flat slope) the current
    /// estimate is returned as is.
    pub fn solve_x(&self, x: f64) -> f64 {
        let mut u = x;
        for _ in 1..NEWTON_ITERATIONS {
            let err = self.x.sample(u) - x;
            if err.abs() < NEWTON_TOLERANCE {
                break;
            }
            let slope = self.x.slope(u);
            if slope.abs() < MIN_SLOPE {
                break;
            }
            u -= err / slope;
        }
        u
    }

    /// Eased output for a normalized progress value
    pub fn ease(&self, progress: f64) -> f64 {
        self.y.sample(self.solve_x(progress))
    }
}

/// Value-equality key over a control-point tuple
///
/// Compares bit patterns, with `-0.0` folded onto `0.0` and every NaN onto
/// one canonical NaN.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BezierKey([u64; 4]);

impl BezierKey {
    pub fn new(points: [f64; 4]) -> Self {
        Self(points.map(|p| {
            if p == 0.0 {
                0.0f64.to_bits()
            } else if p.is_nan() {
                f64::NAN.to_bits()
            } else {
                p.to_bits()
            }
        }))
    }
}

/// Memo table of compiled curves
///
/// Entries are compiled on first use and kept for the lifetime of the cache.
#[derive(Debug, Default)]
pub struct BezierCache {
    curves: Mutex<FxHashMap<BezierKey, Arc<CubicBezier>>>,
}

impl BezierCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the compiled curve for `points`, compiling it if needed
    pub fn get_or_insert(&self, points: [f64; 4]) -> Arc<CubicBezier> {
        let mut curves = self.curves.lock().unwrap_or_else(PoisonError::into_inner);
        curves
            .entry(BezierKey::new(points))
            .or_insert_with(|| {
                tracing::trace!(?points, "compiling cubic-bezier curve");
                Arc::new(CubicBezier::new(points))
            })
            .clone()
    }

    /// Number of compiled curves
    pub fn len(&self) -> usize {
        self.curves
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints_are_fixed() {
        for points in [EASE, EASE_IN, EASE_OUT, EASE_IN_OUT] {
            let curve = CubicBezier::new(points);
            assert_eq!(curve.ease(0.0), 0.0);
            assert!((curve.ease(1.0) - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_identity_like_curve_tracks_linear() {
        let curve = CubicBezier::new([0.0, 0.0, 1.0, 1.0]);
        for i in 0..=20 {
            let p = i as f64 / 20.0;
            assert!((curve.ease(p) - p).abs() < 1e-3, "p = {p}");
        }
    }

    #[test]
    fn test_solve_x_inverts_within_tolerance() {
        let curve = CubicBezier::new(EASE_IN_OUT);
        for i in 1..10 {
            let x = i as f64 / 10.0;
            let u = curve.solve_x(x);
            assert!((curve.x_at(u) - x).abs() < NEWTON_TOLERANCE);
        }
    }

    #[test]
    fn test_css_ease_midpoint() {
        // cubic-bezier(.25, .1, .25, 1) is ahead of linear at the midpoint
        let v = CubicBezier::new(EASE).ease(0.5);
        assert!((v - 0.8024).abs() < 5e-3, "v = {v}");
    }

    #[test]
    fn test_newton_search_stops_at_iteration_cap() {
        // x1 > 1 folds x(u) back on itself; from u = 0.6 the search keeps
        // overshooting and never gets within tolerance of x = 0.6
        let curve = CubicBezier::new([2.0, 0.0, 1.0, 1.0]);
        let x = 0.6;

        let mut u = x;
        for _ in 0..13 {
            let err = curve.x_at(u) - x;
            assert!(err.abs() >= NEWTON_TOLERANCE);
            let slope = curve.x.slope(u);
            assert!(slope.abs() >= MIN_SLOPE);
            u -= err / slope;
        }

        let solved = curve.solve_x(x);
        assert_eq!(solved, u);
        assert!((solved - 0.82466).abs() < 1e-4, "solved = {solved}");
        assert!((curve.x_at(solved) - x).abs() >= NEWTON_TOLERANCE);
        assert_eq!(curve.ease(x), curve.y_at(solved));
        assert!(curve.ease(x).is_finite());

        // A fourteenth refinement would have moved the estimate
        let next = u - (curve.x_at(u) - x) / curve.x.slope(u);
        assert!((next - solved).abs() > 0.1);
    }

    #[test]
    fn test_non_convergent_search_returns_estimate() {
        // Extreme control points: the search may stop early but stays finite
        let curve = CubicBezier::new([1.0, 0.0, 0.0, 1.0]);
        for i in 0..=10 {
            assert!(curve.ease(i as f64 / 10.0).is_finite());
        }
    }

    #[test]
    fn test_cache_reuses_compiled_curves() {
        let cache = BezierCache::new();
        assert!(cache.is_empty());

        let a = cache.get_or_insert(EASE);
        let b = cache.get_or_insert(EASE);
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.len(), 1);

        cache.get_or_insert(EASE_OUT);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_key_folds_negative_zero() {
        assert_eq!(
            BezierKey::new([0.6, -0.0, 0.73, 0.05]),
            BezierKey::new([0.6, 0.0, 0.73, 0.05])
        );
        assert_ne!(
            BezierKey::new([0.6, -0.1, 0.73, 0.05]),
            BezierKey::new([0.6, 0.1, 0.73, 0.05])
        );
    }
}
