//! First-order lag followers.
//!
//! Every smoothed quantity in the cursor avatar and the scene is a
//! [`Follower`]: each [`Follower::step`] moves `current` a fixed fraction
//! (`gain`) of the remaining distance toward `target`. With `gain` in
//! `(0, 1]` the value converges geometrically and never overshoots.

use glam::{Vec2, Vec3};

/// Values a [`Follower`] can smooth.
pub trait Lerp: Copy {
    fn lerp_toward(self, target: Self, t: f32) -> Self;
    fn distance_to(self, other: Self) -> f32;
}

impl Lerp for f32 {
    #[inline]
    fn lerp_toward(self, target: Self, t: f32) -> Self {
        self + (target - self) * t
    }
    #[inline]
    fn distance_to(self, other: Self) -> f32 {
        (other - self).abs()
    }
}

impl Lerp for Vec2 {
    #[inline]
    fn lerp_toward(self, target: Self, t: f32) -> Self {
        self + (target - self) * t
    }
    #[inline]
    fn distance_to(self, other: Self) -> f32 {
        self.distance(other)
    }
}

impl Lerp for Vec3 {
    #[inline]
    fn lerp_toward(self, target: Self, t: f32) -> Self {
        self + (target - self) * t
    }
    #[inline]
    fn distance_to(self, other: Self) -> f32 {
        self.distance(other)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Follower<T: Lerp> {
    current: T,
    target: T,
    gain: f32,
}

impl<T: Lerp> Follower<T> {
    /// Start at rest on `value`. `gain` is clamped into `(0, 1]`.
    pub fn new(value: T, gain: f32) -> Self {
        Self {
            current: value,
            target: value,
            gain: clamp_gain(gain),
        }
    }

    #[inline]
    pub fn current(&self) -> T {
        self.current
    }

    #[inline]
    pub fn target(&self) -> T {
        self.target
    }

    #[inline]
    pub fn gain(&self) -> f32 {
        self.gain
    }

    /// Latest value wins.
    #[inline]
    pub fn set_target(&mut self, target: T) {
        self.target = target;
    }

    /// Advance one tick and return the new current value.
    #[inline]
    pub fn step(&mut self) -> T {
        self.current = self.current.lerp_toward(self.target, self.gain);
        self.current
    }

    /// Set target and advance in one call; used for targets recomputed every frame.
    #[inline]
    pub fn step_toward(&mut self, target: T) -> T {
        self.target = target;
        self.step()
    }

    /// Jump both current and target to `value`.
    pub fn snap(&mut self, value: T) {
        self.current = value;
        self.target = value;
    }

    #[inline]
    pub fn remaining(&self) -> f32 {
        self.current.distance_to(self.target)
    }

    pub fn is_settled(&self, epsilon: f32) -> bool {
        self.remaining() <= epsilon
    }
}

#[inline]
fn clamp_gain(gain: f32) -> f32 {
    if gain.is_nan() || gain <= 0.0 {
        f32::EPSILON
    } else {
        gain.min(1.0)
    }
}

/// Symmetric clamp used for velocity-derived targets.
#[inline]
pub fn clamp_symmetric(value: f32, limit: f32) -> f32 {
    value.clamp(-limit, limit)
}
