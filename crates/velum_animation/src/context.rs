//! Animation context
//!
//! While a context is attached to an element, property writes on that element
//! become timed transitions instead of immediate stores.

use serde::{Deserialize, Serialize};

use crate::easing::Easing;

/// Duration and easing applied to animated property writes
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationContext {
    /// Transition length in seconds
    pub duration_secs: f64,
    pub easing: Easing,
}

impl AnimationContext {
    pub const fn new(duration_secs: f64, easing: Easing) -> Self {
        Self {
            duration_secs,
            easing,
        }
    }

    pub const fn linear(duration_secs: f64) -> Self {
        Self::new(duration_secs, Easing::Linear)
    }

    /// Duration in whole milliseconds. Negative or non-finite durations are zero.
    pub fn duration_ms(&self) -> u64 {
        let ms = (self.duration_secs * 1000.0).round();
        if ms.is_finite() && ms > 0.0 {
            ms as u64
        } else {
            0
        }
    }
}

impl Default for AnimationContext {
    fn default() -> Self {
        Self::new(0.3, Easing::EaseOutCubic)
    }
}
