//! Damped-spring interpolation for programmatic viewport transitions.
//!
//! Animations are driven by the host's frame clock: the host calls
//! [`AnimationController::tick`] once per frame with the current time and
//! applies the returned values. Each animation is keyed by the value it
//! drives; starting a new animation on a key stops the old one.

use std::fmt::Debug;

#[cfg(target_arch = "wasm32")]
pub use web_time::{Duration, Instant};
#[cfg(not(target_arch = "wasm32"))]
pub use std::time::{Duration, Instant};

/// Default damping ratio (moderate bounce).
pub const DEFAULT_DAMPING_RATIO: f64 = 0.7;

/// Default oscillation frequency.
pub const DEFAULT_FREQUENCY: f64 = 20.0;

/// A damped harmonic oscillator moving a scalar from `from` to `to`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spring {
    pub from: f64,
    pub to: f64,
    pub duration: Duration,
    /// Bounciness: 0.8-1.0 is a slight bounce, 0.5-0.8 a moderate one.
    pub damping_ratio: f64,
    /// Oscillation speed.
    pub frequency: f64,
}

impl Spring {
    /// Create a spring with the default damping and frequency.
    pub fn new(from: f64, to: f64, duration: Duration) -> Self {
        Self {
            from,
            to,
            duration,
            damping_ratio: DEFAULT_DAMPING_RATIO,
            frequency: DEFAULT_FREQUENCY,
        }
    }

    /// Override damping ratio and frequency.
    pub fn with_damping(mut self, damping_ratio: f64, frequency: f64) -> Self {
        self.damping_ratio = damping_ratio;
        self.frequency = frequency;
        self
    }

    /// Normalized progress in `[0, 1]` after `elapsed`.
    pub fn progress(&self, elapsed: Duration) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
    }

    /// Value at normalized progress `t`. Exactly `to` once `t >= 1`.
    pub fn value_at_progress(&self, t: f64) -> f64 {
        if t >= 1.0 {
            return self.to;
        }
        let decay = (-self.damping_ratio * self.frequency * t).exp();
        let phase = self.frequency * t;
        self.to + (self.from - self.to) * (decay * phase.cos() + decay * phase.sin())
    }

    /// Value after `elapsed` time.
    pub fn value_at(&self, elapsed: Duration) -> f64 {
        self.value_at_progress(self.progress(elapsed))
    }
}

/// Handle to a running animation, used to stop it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnimationHandle(u64);

/// One value produced by a frame tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame<K> {
    pub key: K,
    pub value: f64,
    /// True on the final frame, whose value is exactly the target.
    pub finished: bool,
}

#[derive(Debug, Clone)]
struct ActiveAnimation<K> {
    handle: AnimationHandle,
    key: K,
    spring: Spring,
    started: Instant,
}

/// Runs any number of independent, uncoupled spring animations.
#[derive(Debug, Clone)]
pub struct AnimationController<K> {
    active: Vec<ActiveAnimation<K>>,
    next_handle: u64,
}

impl<K> Default for AnimationController<K> {
    fn default() -> Self {
        Self {
            active: Vec::new(),
            next_handle: 1,
        }
    }
}

impl<K: Copy + Eq + Debug> AnimationController<K> {
    /// Create an idle controller.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start animating `key`, replacing any animation already driving it.
    pub fn animate(&mut self, key: K, spring: Spring, now: Instant) -> AnimationHandle {
        if self.stop_key(key) {
            log::debug!("replacing in-flight animation on {:?}", key);
        }
        let handle = AnimationHandle(self.next_handle);
        self.next_handle += 1;
        self.active.push(ActiveAnimation {
            handle,
            key,
            spring,
            started: now,
        });
        handle
    }

    /// Stop an animation. Returns false if it already finished or was stopped.
    pub fn stop(&mut self, handle: AnimationHandle) -> bool {
        let before = self.active.len();
        self.active.retain(|a| a.handle != handle);
        self.active.len() != before
    }

    /// Stop whatever animation drives `key`.
    pub fn stop_key(&mut self, key: K) -> bool {
        let before = self.active.len();
        self.active.retain(|a| a.key != key);
        self.active.len() != before
    }

    /// Stop everything.
    pub fn stop_all(&mut self) {
        self.active.clear();
    }

    /// Check whether an animation is still running.
    pub fn is_running(&self, handle: AnimationHandle) -> bool {
        self.active.iter().any(|a| a.handle == handle)
    }

    /// Check whether any animation is running.
    pub fn is_animating(&self) -> bool {
        !self.active.is_empty()
    }

    /// Advance all animations to `now`.
    ///
    /// Finished animations emit their exact target once and are dropped.
    pub fn tick(&mut self, now: Instant) -> Vec<Frame<K>> {
        let mut frames = Vec::with_capacity(self.active.len());
        self.active.retain(|anim| {
            let elapsed = now.saturating_duration_since(anim.started);
            let t = anim.spring.progress(elapsed);
            let finished = t >= 1.0;
            frames.push(Frame {
                key: anim.key,
                value: anim.spring.value_at_progress(t),
                finished,
            });
            !finished
        });
        frames
    }
}
