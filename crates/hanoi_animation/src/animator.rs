//! Property animator
//!
//! Drives numeric properties along easing curves. Each running animation is a
//! [`Tween`] bound to an [`AnimationTarget`], registered with an [`Animator`]
//! and identified by an [`AnimationId`]. The caller owns the frame loop and
//! calls [`Animator::tick`] once per frame:
//!
//! - the first tick captures the start time (unless the tween fixes one)
//! - while `elapsed <= duration` the curve value at `elapsed` is written
//! - the first tick with `elapsed > duration` writes the exact end value and
//!   the animation is dropped; nothing is written to it afterwards
//!
//! Animations can be cancelled at any time through their id.

use std::cell::RefCell;
use std::rc::Rc;

use rustc_hash::FxHashMap;
use slotmap::{new_key_type, SlotMap};

use crate::easing::{Easing, EasingTable, Shape};
use crate::error::{AnimationError, Result};

new_key_type! {
    /// Handle to a running animation
    pub struct AnimationId;
}

/// Something an animation writes its value to
pub trait AnimationTarget {
    fn write(&mut self, value: f64);
}

impl<F: FnMut(f64)> AnimationTarget for F {
    fn write(&mut self, value: f64) {
        self(value)
    }
}

/// An object with named numeric properties
pub trait Animatable {
    fn set_property(&mut self, name: &str, value: f64);
}

impl Animatable for FxHashMap<String, f64> {
    fn set_property(&mut self, name: &str, value: f64) {
        self.insert(name.to_string(), value);
    }
}

/// A named property on a shared object
pub struct Property<T> {
    object: Rc<RefCell<T>>,
    name: String,
}

impl<T: Animatable> Property<T> {
    pub fn new(object: Rc<RefCell<T>>, name: impl Into<String>) -> Self {
        Self {
            object,
            name: name.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl<T: Animatable> AnimationTarget for Property<T> {
    fn write(&mut self, value: f64) {
        self.object.borrow_mut().set_property(&self.name, value);
    }
}

/// Whether an animation wants more ticks
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnimationState {
    Running,
    Done,
}

/// One interpolation run: from `start` to `start + change` over `duration`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tween {
    pub start: f64,
    pub change: f64,
    /// Duration in milliseconds
    pub duration: f64,
    pub easing: Easing,
    /// Added to every interpolated value
    pub offset: f64,
    pub shape: Option<Shape>,
    /// Fixed start timestamp; captured on the first tick when `None`
    pub start_time: Option<f64>,
}

impl Tween {
    pub fn new(start: f64, change: f64, duration: f64, easing: Easing) -> Self {
        Self {
            start,
            change,
            duration,
            easing,
            offset: 0.0,
            shape: None,
            start_time: None,
        }
    }

    /// Set the additive offset (builder pattern)
    pub fn offset(mut self, offset: f64) -> Self {
        self.offset = offset;
        self
    }

    /// Set the curve shape parameter
    pub fn shape(mut self, shape: impl Into<Shape>) -> Self {
        self.shape = Some(shape.into());
        self
    }

    /// Pin the start timestamp instead of using the first tick's time
    pub fn start_time(mut self, start_ms: f64) -> Self {
        self.start_time = Some(start_ms);
        self
    }

    /// Reject tweens that can only produce NaN or infinities
    pub fn validate(&self) -> Result<()> {
        if !self.duration.is_finite() || self.duration <= 0.0 {
            return Err(AnimationError::InvalidDuration(self.duration));
        }
        for (field, value) in [
            ("start", self.start),
            ("change", self.change),
            ("offset", self.offset),
        ] {
            if !value.is_finite() {
                return Err(AnimationError::InvalidValue { field, value });
            }
        }
        Ok(())
    }

    /// Value written at `elapsed` milliseconds and the state that follows
    pub fn sample(&self, table: &EasingTable, elapsed: f64) -> (f64, AnimationState) {
        let (t, state) = if elapsed > self.duration {
            (self.duration, AnimationState::Done)
        } else {
            (elapsed, AnimationState::Running)
        };
        let value = table.evaluate(
            self.easing,
            t,
            self.start,
            self.change,
            self.duration,
            self.shape,
        );
        (value + self.offset, state)
    }
}

/// A tween bound to its target
pub struct Animation {
    tween: Tween,
    target: Box<dyn AnimationTarget>,
    start_time: Option<f64>,
    state: AnimationState,
}

impl Animation {
    pub fn new(tween: Tween, target: impl AnimationTarget + 'static) -> Self {
        Self {
            tween,
            target: Box::new(target),
            start_time: tween.start_time,
            state: AnimationState::Running,
        }
    }

    pub fn state(&self) -> AnimationState {
        self.state
    }

    /// Write the value for time `now` to the target
    ///
    /// Once done, further ticks are no-ops.
    pub fn tick(&mut self, now: f64, table: &EasingTable) -> AnimationState {
        if self.state == AnimationState::Done {
            return AnimationState::Done;
        }
        let start = *self.start_time.get_or_insert(now);
        let (value, state) = self.tween.sample(table, now - start);
        self.target.write(value);
        self.state = state;
        state
    }
}

impl std::fmt::Debug for Animation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Animation")
            .field("tween", &self.tween)
            .field("start_time", &self.start_time)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

/// Owns the easing table and every running animation
#[derive(Debug, Default)]
pub struct Animator {
    table: EasingTable,
    animations: SlotMap<AnimationId, Animation>,
}

impl Animator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn table(&self) -> &EasingTable {
        &self.table
    }

    /// Register a tween writing to `target`
    pub fn start(
        &mut self,
        target: impl AnimationTarget + 'static,
        tween: Tween,
    ) -> Result<AnimationId> {
        tween.validate()?;
        let id = self.animations.insert(Animation::new(tween, target));
        tracing::debug!(?id, easing = %tween.easing, duration = tween.duration, "animation started");
        Ok(id)
    }

    /// Animate `property` of `object` with a curve looked up by name
    #[allow(clippy::too_many_arguments)]
    pub fn animate<T: Animatable + 'static>(
        &mut self,
        object: &Rc<RefCell<T>>,
        property: &str,
        start: f64,
        change: f64,
        duration: f64,
        easing: &str,
        offset: f64,
        shape: Option<Shape>,
    ) -> Result<AnimationId> {
        let easing: Easing = easing.parse()?;
        let mut tween = Tween::new(start, change, duration, easing).offset(offset);
        tween.shape = shape;
        self.start(Property::new(Rc::clone(object), property), tween)
    }

    /// Tick every animation at time `now`
    ///
    /// Finished animations are removed. Returns true if any are still running.
    pub fn tick(&mut self, now: f64) -> bool {
        let table = &self.table;
        self.animations.retain(|id, animation| {
            let running = animation.tick(now, table) == AnimationState::Running;
            if !running {
                tracing::trace!(?id, "animation finished");
            }
            running
        });
        !self.animations.is_empty()
    }

    /// Stop an animation without a final write
    ///
    /// Returns false if it had already finished or been cancelled.
    pub fn cancel(&mut self, id: AnimationId) -> bool {
        let removed = self.animations.remove(id).is_some();
        if removed {
            tracing::debug!(?id, "animation cancelled");
        }
        removed
    }

    pub fn is_running(&self, id: AnimationId) -> bool {
        self.animations.contains_key(id)
    }

    /// Number of running animations
    pub fn len(&self) -> usize {
        self.animations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.animations.is_empty()
    }
}
