//! Frame clock and loop
//!
//! The host side of animation: a time source in milliseconds and a loop that
//! invokes a callback once per display refresh at a target frame rate.

use std::cell::Cell;
use std::ops::ControlFlow;
use std::thread;
use std::time::{Duration, Instant};

/// Default frame rate of a [`FrameLoop`]
pub const DEFAULT_FPS: u32 = 60;

/// Millisecond time source
pub trait Clock {
    /// Milliseconds since an arbitrary, fixed epoch
    fn now_ms(&self) -> f64;

    /// Block until `duration` has passed on this clock
    fn sleep(&self, duration: Duration) {
        thread::sleep(duration);
    }
}

/// Monotonic wall clock, epoch at construction
#[derive(Clone, Copy, Debug)]
pub struct SystemClock {
    epoch: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> f64 {
        self.epoch.elapsed().as_secs_f64() * 1000.0
    }
}

/// Hand-driven clock for tests and offline rendering
///
/// Sleeping advances the clock instead of blocking.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<f64>,
}

impl ManualClock {
    pub fn new(start_ms: f64) -> Self {
        Self {
            now: Cell::new(start_ms),
        }
    }

    pub fn set(&self, now_ms: f64) {
        self.now.set(now_ms);
    }

    pub fn advance(&self, ms: f64) {
        self.now.set(self.now.get() + ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now.get()
    }

    fn sleep(&self, duration: Duration) {
        self.advance(duration.as_secs_f64() * 1000.0);
    }
}

/// Calls a frame callback once per refresh
///
/// No frame-rate guarantee: a slow callback eats into the next frame's sleep
/// and frames are effectively skipped.
#[derive(Clone, Copy, Debug)]
pub struct FrameLoop {
    frame_duration: Duration,
}

impl FrameLoop {
    /// Create a loop running at `fps` frames per second (0 means the default)
    pub fn new(fps: u32) -> Self {
        let fps = if fps == 0 { DEFAULT_FPS } else { fps };
        Self {
            frame_duration: Duration::from_micros(1_000_000 / fps as u64),
        }
    }

    pub fn frame_duration(&self) -> Duration {
        self.frame_duration
    }

    /// Run `frame` with the current time until it breaks
    ///
    /// Returns the number of frames run.
    pub fn run<C, F>(&self, clock: &C, mut frame: F) -> u64
    where
        C: Clock + ?Sized,
        F: FnMut(f64) -> ControlFlow<()>,
    {
        let frame_ms = self.frame_duration.as_secs_f64() * 1000.0;
        let mut frames = 0;

        loop {
            let start = clock.now_ms();
            frames += 1;
            if frame(start).is_break() {
                break;
            }

            let elapsed = clock.now_ms() - start;
            if elapsed < frame_ms {
                clock.sleep(Duration::from_secs_f64((frame_ms - elapsed) / 1000.0));
            }
        }

        tracing::debug!(frames, "frame loop finished");
        frames
    }
}

impl Default for FrameLoop {
    fn default() -> Self {
        Self::new(DEFAULT_FPS)
    }
}
