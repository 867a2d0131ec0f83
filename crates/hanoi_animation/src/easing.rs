//! Easing functions for animations
//!
//! Every curve has the tweening signature `f(t, b, c, d, s)`:
//!
//! - `t`: elapsed time
//! - `b`: start value
//! - `c`: total change (end - start)
//! - `d`: duration, in the same unit as `t`
//! - `s`: optional [`Shape`] parameter (step count, elastic period, back
//!   overshoot or bezier control points)
//!
//! Curves are identified by the [`Easing`] enum and evaluated through an
//! [`EasingTable`], which owns the cache of compiled cubic-bezier curves.
//!
//! ```
//! use hanoi_animation::{Easing, EasingTable};
//!
//! let table = EasingTable::new();
//! let x = table.evaluate(Easing::Linear, 500.0, 0.0, 100.0, 1000.0, None);
//! assert_eq!(x, 50.0);
//! ```

use std::f64::consts::{PI, TAU};
use std::fmt;
use std::str::FromStr;

use crate::bezier::{self, BezierCache};
use crate::error::AnimationError;
use crate::math::floor_to;

/// Default plateau count of [`Easing::Step`]
pub const DEFAULT_STEPS: f64 = 10.0;
/// Default period of `elasticIn`/`elasticOut`, as a fraction of the duration
pub const DEFAULT_ELASTIC_PERIOD: f64 = 0.3;
/// Default period of `elasticInOut`, as a fraction of the duration
pub const DEFAULT_ELASTIC_IN_OUT_PERIOD: f64 = 0.2;
/// Default overshoot of the `back` curves
pub const DEFAULT_BACK_OVERSHOOT: f64 = 0.275;

/// Curve-specific tuning input
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Shape {
    /// Step count, elastic period fraction or back overshoot
    Scalar(f64),
    /// Cubic-bezier control points `[x1, y1, x2, y2]`
    Bezier([f64; 4]),
}

impl From<f64> for Shape {
    fn from(value: f64) -> Self {
        Shape::Scalar(value)
    }
}

impl From<[f64; 4]> for Shape {
    fn from(points: [f64; 4]) -> Self {
        Shape::Bezier(points)
    }
}

/// Scalar shape, or `default` when absent, zero, NaN or not a scalar
fn scalar_or(shape: Option<Shape>, default: f64) -> f64 {
    match shape {
        Some(Shape::Scalar(s)) if s != 0.0 && !s.is_nan() => s,
        _ => default,
    }
}

/// Easing curve identifier
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Easing {
    #[default]
    Linear,
    Step,
    Bezier,
    Ease,
    EaseIn,
    EaseOut,
    EaseInOut,
    QuadIn,
    QuadOut,
    QuadInOut,
    CubicIn,
    CubicOut,
    CubicInOut,
    QuartIn,
    QuartOut,
    QuartInOut,
    QuintIn,
    QuintOut,
    QuintInOut,
    SineIn,
    SineOut,
    SineInOut,
    ExpoIn,
    ExpoOut,
    ExpoInOut,
    CircIn,
    CircOut,
    CircInOut,
    ElasticIn,
    ElasticOut,
    ElasticInOut,
    BackIn,
    BackOut,
    BackInOut,
    BounceIn,
    BounceOut,
    BounceInOut,
}

impl Easing {
    /// Every curve, in table order
    pub const ALL: [Easing; 37] = [
        Easing::Linear,
        Easing::Step,
        Easing::Bezier,
        Easing::Ease,
        Easing::EaseIn,
        Easing::EaseOut,
        Easing::EaseInOut,
        Easing::QuadIn,
        Easing::QuadOut,
        Easing::QuadInOut,
        Easing::CubicIn,
        Easing::CubicOut,
        Easing::CubicInOut,
        Easing::QuartIn,
        Easing::QuartOut,
        Easing::QuartInOut,
        Easing::QuintIn,
        Easing::QuintOut,
        Easing::QuintInOut,
        Easing::SineIn,
        Easing::SineOut,
        Easing::SineInOut,
        Easing::ExpoIn,
        Easing::ExpoOut,
        Easing::ExpoInOut,
        Easing::CircIn,
        Easing::CircOut,
        Easing::CircInOut,
        Easing::ElasticIn,
        Easing::ElasticOut,
        Easing::ElasticInOut,
        Easing::BackIn,
        Easing::BackOut,
        Easing::BackInOut,
        Easing::BounceIn,
        Easing::BounceOut,
        Easing::BounceInOut,
    ];

    /// Canonical curve name
    pub fn name(self) -> &'static str {
        match self {
            Easing::Linear => "linear",
            Easing::Step => "step",
            Easing::Bezier => "bezier",
            Easing::Ease => "ease",
            Easing::EaseIn => "easeIn",
            Easing::EaseOut => "easeOut",
            Easing::EaseInOut => "easeInOut",
            Easing::QuadIn => "quadIn",
            Easing::QuadOut => "quadOut",
            Easing::QuadInOut => "quadInOut",
            Easing::CubicIn => "cubicIn",
            Easing::CubicOut => "cubicOut",
            Easing::CubicInOut => "cubicInOut",
            Easing::QuartIn => "quartIn",
            Easing::QuartOut => "quartOut",
            Easing::QuartInOut => "quartInOut",
            Easing::QuintIn => "quintIn",
            Easing::QuintOut => "quintOut",
            Easing::QuintInOut => "quintInOut",
            Easing::SineIn => "sineIn",
            Easing::SineOut => "sineOut",
            Easing::SineInOut => "sineInOut",
            Easing::ExpoIn => "expoIn",
            Easing::ExpoOut => "expoOut",
            Easing::ExpoInOut => "expoInOut",
            Easing::CircIn => "circIn",
            Easing::CircOut => "circOut",
            Easing::CircInOut => "circInOut",
            Easing::ElasticIn => "elasticIn",
            Easing::ElasticOut => "elasticOut",
            Easing::ElasticInOut => "elasticInOut",
            Easing::BackIn => "backIn",
            Easing::BackOut => "backOut",
            Easing::BackInOut => "backInOut",
            Easing::BounceIn => "bounceIn",
            Easing::BounceOut => "bounceOut",
            Easing::BounceInOut => "bounceInOut",
        }
    }
}

impl fmt::Display for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Easing {
    type Err = AnimationError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Easing::ALL
            .into_iter()
            .find(|easing| easing.name() == name)
            .ok_or_else(|| AnimationError::UnknownEasing(name.to_string()))
    }
}

/// Evaluates easing curves
///
/// Owns the memo table of compiled cubic-bezier curves used by `bezier`, the
/// CSS presets and the `back` family.
#[derive(Debug, Default)]
pub struct EasingTable {
    bezier_cache: BezierCache,
}

impl EasingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The compiled-curve cache
    pub fn bezier_cache(&self) -> &BezierCache {
        &self.bezier_cache
    }

    /// Interpolated value of `easing` at time `t`
    pub fn evaluate(
        &self,
        easing: Easing,
        t: f64,
        b: f64,
        c: f64,
        d: f64,
        shape: Option<Shape>,
    ) -> f64 {
        match easing {
            Easing::Linear => linear(t, b, c, d),
            Easing::Step => step(t, b, c, d, scalar_or(shape, DEFAULT_STEPS)),
            Easing::Bezier => {
                let points = match shape {
                    Some(Shape::Bezier(points)) => points,
                    _ => bezier::EASE,
                };
                self.bezier(t, b, c, d, points)
            }
            Easing::Ease => self.bezier(t, b, c, d, bezier::EASE),
            Easing::EaseIn => self.bezier(t, b, c, d, bezier::EASE_IN),
            Easing::EaseOut => self.bezier(t, b, c, d, bezier::EASE_OUT),
            Easing::EaseInOut => self.bezier(t, b, c, d, bezier::EASE_IN_OUT),
            Easing::QuadIn => quad_in(t, b, c, d),
            Easing::QuadOut => quad_out(t, b, c, d),
            Easing::QuadInOut => quad_in_out(t, b, c, d),
            Easing::CubicIn => cubic_in(t, b, c, d),
            Easing::CubicOut => cubic_out(t, b, c, d),
            Easing::CubicInOut => cubic_in_out(t, b, c, d),
            Easing::QuartIn => quart_in(t, b, c, d),
            Easing::QuartOut => quart_out(t, b, c, d),
            Easing::QuartInOut => quart_in_out(t, b, c, d),
            Easing::QuintIn => quint_in(t, b, c, d),
            Easing::QuintOut => quint_out(t, b, c, d),
            Easing::QuintInOut => quint_in_out(t, b, c, d),
            Easing::SineIn => -c * (t / d * PI / 2.0).cos() + c + b,
            Easing::SineOut => c * (t / d * PI / 2.0).sin() + b,
            Easing::SineInOut => -c / 2.0 * ((PI * t / d).cos() - 1.0) + b,
            Easing::ExpoIn => expo_in(t, b, c, d),
            Easing::ExpoOut => expo_out(t, b, c, d),
            Easing::ExpoInOut => expo_in_out(t, b, c, d),
            Easing::CircIn => circ_in(t, b, c, d),
            Easing::CircOut => circ_out(t, b, c, d),
            Easing::CircInOut => circ_in_out(t, b, c, d),
            Easing::ElasticIn => {
                elastic_in(t, b, c, d, scalar_or(shape, DEFAULT_ELASTIC_PERIOD))
            }
            Easing::ElasticOut => {
                elastic_out(t, b, c, d, scalar_or(shape, DEFAULT_ELASTIC_PERIOD))
            }
            Easing::ElasticInOut => {
                elastic_in_out(t, b, c, d, scalar_or(shape, DEFAULT_ELASTIC_IN_OUT_PERIOD))
            }
            Easing::BackIn => {
                let s = back_overshoot(shape);
                self.bezier(t, b, c, d, [0.6, -s, 0.73, 0.05])
            }
            Easing::BackOut => {
                let s = back_overshoot(shape);
                self.bezier(t, b, c, d, [0.175, 0.885, 0.32, 1.0 + s])
            }
            Easing::BackInOut => {
                let s = back_overshoot(shape);
                self.bezier(t, b, c, d, [0.68, -s * 2.0, 0.265, 1.0 + s * 2.0])
            }
            Easing::BounceIn => bounce_in(t, b, c, d),
            Easing::BounceOut => bounce_out(t, b, c, d),
            Easing::BounceInOut => bounce_in_out(t, b, c, d),
        }
    }

    /// Look a curve up by name and evaluate it
    ///
    /// Unknown names are an error, never a silent fallback.
    pub fn evaluate_named(
        &self,
        name: &str,
        t: f64,
        b: f64,
        c: f64,
        d: f64,
        shape: Option<Shape>,
    ) -> crate::Result<f64> {
        let easing: Easing = name.parse()?;
        Ok(self.evaluate(easing, t, b, c, d, shape))
    }

    /// Normalized curve: progress in `[0, 1]` mapped onto `[0, 1]`
    pub fn apply(&self, easing: Easing, progress: f64) -> f64 {
        self.evaluate(easing, progress, 0.0, 1.0, 1.0, None)
    }

    fn bezier(&self, t: f64, b: f64, c: f64, d: f64, points: [f64; 4]) -> f64 {
        c * self.bezier_cache.get_or_insert(points).ease(t / d) + b
    }
}

fn back_overshoot(shape: Option<Shape>) -> f64 {
    match shape {
        Some(Shape::Scalar(s)) if !s.is_nan() => s,
        _ => DEFAULT_BACK_OVERSHOOT,
    }
}

// ============================================================================
// Linear & Step
// ============================================================================

fn linear(t: f64, b: f64, c: f64, d: f64) -> f64 {
    c * t / d + b
}

fn step(t: f64, b: f64, c: f64, d: f64, steps: f64) -> f64 {
    if t == d {
        return c + b;
    }
    floor_to(t, d / steps) / d * c + b
}

// ============================================================================
// Polynomial
// ============================================================================
//
// The InOut halves keep their historical algebra: the second half of each
// curve multiplies by a default-squared power (e.g. `t * t^2` for cubic)
// rather than a single explicit power.

fn quad_in(t: f64, b: f64, c: f64, d: f64) -> f64 {
    let t = t / d;
    c * t * t + b
}

fn quad_out(t: f64, b: f64, c: f64, d: f64) -> f64 {
    let t = t / d;
    -c * t * (t - 2.0) + b
}

fn quad_in_out(t: f64, b: f64, c: f64, d: f64) -> f64 {
    let t = t / (d / 2.0);
    if t < 1.0 {
        return c / 2.0 * t.powi(2) + b;
    }
    let t = t - 1.0;
    -c / 2.0 * (t * (t - 2.0) - 1.0) + b
}

fn cubic_in(t: f64, b: f64, c: f64, d: f64) -> f64 {
    let t = t / d;
    c * t * t.powi(2) + b
}

fn cubic_out(t: f64, b: f64, c: f64, d: f64) -> f64 {
    let t = t / d - 1.0;
    c * (t * t.powi(2) + 1.0) + b
}

fn cubic_in_out(t: f64, b: f64, c: f64, d: f64) -> f64 {
    let t = t / (d / 2.0);
    if t < 1.0 {
        return c / 2.0 * t.powi(3) + b;
    }
    let t = t - 2.0;
    c / 2.0 * (t * t.powi(2) + 2.0) + b
}

fn quart_in(t: f64, b: f64, c: f64, d: f64) -> f64 {
    let t = t / d;
    c * t * t.powi(3) + b
}

fn quart_out(t: f64, b: f64, c: f64, d: f64) -> f64 {
    let t = t / d - 1.0;
    -c * (t * t.powi(3) - 1.0) + b
}

fn quart_in_out(t: f64, b: f64, c: f64, d: f64) -> f64 {
    let t = t / (d / 2.0);
    if t < 1.0 {
        return c / 2.0 * t.powi(4) + b;
    }
    let t = t - 2.0;
    -c / 2.0 * (t * t.powi(3) - 2.0) + b
}

fn quint_in(t: f64, b: f64, c: f64, d: f64) -> f64 {
    let t = t / d;
    c * t * t.powi(4) + b
}

fn quint_out(t: f64, b: f64, c: f64, d: f64) -> f64 {
    let t = t / d - 1.0;
    c * (t * t.powi(4) + 1.0) + b
}

fn quint_in_out(t: f64, b: f64, c: f64, d: f64) -> f64 {
    let t = t / (d / 2.0);
    if t < 1.0 {
        return c / 2.0 * t.powi(5) + b;
    }
    let t = t - 2.0;
    c / 2.0 * (t * t.powi(4) + 2.0) + b
}

// ============================================================================
// Exponential & Circular
// ============================================================================

/// `base^exp`, except that a zero exponent squares instead of giving 1
///
/// The second halves of `expoInOut` and `elasticInOut` go through this, so at
/// exactly `t = d/2` they land on `b - c` rather than the curve midpoint.
fn pow_or_square(base: f64, exp: f64) -> f64 {
    if exp == 0.0 {
        base * base
    } else {
        base.powf(exp)
    }
}

fn expo_in(t: f64, b: f64, c: f64, d: f64) -> f64 {
    if t == 0.0 {
        return b;
    }
    c * 2f64.powf(10.0 * (t / d - 1.0)) + b
}

fn expo_out(t: f64, b: f64, c: f64, d: f64) -> f64 {
    if t == d {
        return b + c;
    }
    c * (-(2f64.powf(-10.0 * t / d)) + 1.0) + b
}

fn expo_in_out(t: f64, b: f64, c: f64, d: f64) -> f64 {
    if t == 0.0 {
        return b;
    }
    if t == d {
        return b + c;
    }
    let t = t / (d / 2.0);
    if t < 1.0 {
        return c / 2.0 * 2f64.powf(10.0 * (t - 1.0)) + b;
    }
    let t = t - 1.0;
    c / 2.0 * (-pow_or_square(2.0, -10.0 * t) + 2.0) + b
}

fn circ_in(t: f64, b: f64, c: f64, d: f64) -> f64 {
    let t = t / d;
    -c * ((1.0 - t * t).sqrt() - 1.0) + b
}

fn circ_out(t: f64, b: f64, c: f64, d: f64) -> f64 {
    let t = t / d - 1.0;
    c * (1.0 - t * t).sqrt() + b
}

fn circ_in_out(t: f64, b: f64, c: f64, d: f64) -> f64 {
    let t = t / (d / 2.0);
    if t < 1.0 {
        return -c / 2.0 * ((1.0 - t.powi(2)).sqrt() - 1.0) + b;
    }
    let t = t - 2.0;
    c / 2.0 * ((1.0 - t * t).sqrt() + 1.0) + b
}

// ============================================================================
// Elastic
// ============================================================================

fn elastic_in(t: f64, b: f64, c: f64, d: f64, period: f64) -> f64 {
    let p = d * period;
    let q = p / 4.0;
    if t == 0.0 {
        return b;
    }
    let t = t / d;
    if t == 1.0 {
        return b + c;
    }
    let t = t - 1.0;
    -(c * 2f64.powf(10.0 * t) * ((t * d - q) * TAU / p).sin()) + b
}

fn elastic_out(t: f64, b: f64, c: f64, d: f64, period: f64) -> f64 {
    let p = d * period;
    let q = p / 4.0;
    if t == 0.0 {
        return b;
    }
    let t = t / d;
    if t == 1.0 {
        return b + c;
    }
    c * 2f64.powf(-10.0 * t) * ((t * d - q) * TAU / p).sin() + c + b
}

fn elastic_in_out(t: f64, b: f64, c: f64, d: f64, period: f64) -> f64 {
    if t == 0.0 {
        return b;
    }
    let t = t / (d / 2.0);
    if t == 2.0 {
        return b + c;
    }
    let p = d * period;
    let q = p / 4.0;
    let half = t < 1.0;
    let t = t - 1.0;
    let wave = ((t * d - q) * TAU / p).sin();
    if half {
        return -0.5 * (c * 2f64.powf(10.0 * t) * wave) + b;
    }
    c * pow_or_square(2.0, -10.0 * t) * wave * 0.5 + c + b
}

// ============================================================================
// Bounce
// ============================================================================

fn bounce_out(t: f64, b: f64, c: f64, d: f64) -> f64 {
    const K: f64 = 7.5625;
    let t = t / d;
    if t < 1.0 / 2.75 {
        c * (K * t * t) + b
    } else if t < 2.0 / 2.75 {
        let t = t - 1.5 / 2.75;
        c * (K * t * t + (1.0 - 1.0 / 4.0)) + b
    } else if t < 2.5 / 2.75 {
        let t = t - 2.25 / 2.75;
        c * (K * t * t + (1.0 - 1.0 / 16.0)) + b
    } else {
        let t = t - 2.625 / 2.75;
        c * (K * t * t + (1.0 - 1.0 / 64.0)) + b
    }
}

fn bounce_in(t: f64, b: f64, c: f64, d: f64) -> f64 {
    c - bounce_out(d - t, 0.0, c, d) + b
}

fn bounce_in_out(t: f64, b: f64, c: f64, d: f64) -> f64 {
    if t < d / 2.0 {
        return bounce_in(t * 2.0, 0.0, c, d) * 0.5 + b;
    }
    bounce_out(t * 2.0 - d, 0.0, c, d) * 0.5 + c * 0.5 + b
}
