//! Hanoi Animation System
//!
//! Easing curves and a frame-driven property animator.
//!
//! # Features
//!
//! - **Easing Table**: linear, step, polynomial, sine, expo, circ, elastic,
//!   back and bounce curves with the `f(t, b, c, d, s)` signature
//! - **Cubic Bezier**: CSS timing curves solved by bounded Newton-Raphson,
//!   memoized per control-point tuple
//! - **Animator**: cancellable tweens writing to arbitrary numeric properties
//! - **Frame Loop**: millisecond clocks and a fixed-rate frame driver

pub mod animator;
pub mod bezier;
pub mod easing;
pub mod error;
pub mod frame;
pub mod math;

pub use animator::{
    Animatable, Animation, AnimationId, AnimationState, AnimationTarget, Animator, Property, Tween,
};
pub use bezier::{BezierCache, BezierKey, CubicBezier};
pub use easing::{Easing, EasingTable, Shape};
pub use error::{AnimationError, Result};
pub use frame::{Clock, FrameLoop, ManualClock, SystemClock};
