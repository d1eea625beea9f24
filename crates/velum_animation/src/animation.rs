//! Single-property tweens

use velum_core::{ElementId, Property};

use crate::easing::Easing;

/// Identity of an animation: one live tween per element property
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AnimationKey {
    pub element: ElementId,
    pub property: Property,
}

impl AnimationKey {
    pub const fn new(element: ElementId, property: Property) -> Self {
        Self { element, property }
    }
}

/// Result of sampling an animation
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Sample {
    /// Interpolated value, more frames to come
    Running(f64),
    /// Final value; the animation is done
    Finished(f64),
}

impl Sample {
    pub fn value(self) -> f64 {
        match self {
            Sample::Running(v) | Sample::Finished(v) => v,
        }
    }
}

/// Interpolation of one property from a start value to a target
#[derive(Clone, Debug)]
pub struct Animation {
    key: AnimationKey,
    /// `None` once finished
    started_ms: Option<u64>,
    duration_ms: u64,
    start_value: f64,
    target_value: f64,
    last_value: f64,
    easing: Easing,
}

impl Animation {
    /// An idle animation resting at `current`
    pub fn new(key: AnimationKey, current: f64) -> Self {
        Self {
            key,
            started_ms: None,
            duration_ms: 0,
            start_value: current,
            target_value: current,
            last_value: current,
            easing: Easing::Linear,
        }
    }

    /// Restart toward `target` from the last written value.
    ///
    /// Works the same whether the animation is running or finished, so a
    /// retarget mid-flight continues from where the property is now.
    pub fn retarget(&mut self, target: f64, duration_ms: u64, easing: Easing, now_ms: u64) {
        self.start_value = self.last_value;
        self.target_value = target;
        self.started_ms = Some(now_ms);
        self.duration_ms = duration_ms;
        self.easing = easing;
    }

    /// Advance to `now_ms` and return the value to write.
    ///
    /// Progress of 1.0 or more, or a non-finite progress (zero duration),
    /// snaps to the target and finishes.
    pub fn sample(&mut self, now_ms: u64) -> Sample {
        let Some(started) = self.started_ms else {
            return Sample::Finished(self.last_value);
        };

        let elapsed = now_ms.saturating_sub(started) as f64;
        let progress = elapsed / self.duration_ms as f64;

        if progress.is_finite() && progress < 1.0 {
            let eased = self.easing.apply(progress);
            let value = self.start_value + (self.target_value - self.start_value) * eased;
            self.last_value = value;
            Sample::Running(value)
        } else {
            self.started_ms = None;
            self.last_value = self.target_value;
            Sample::Finished(self.target_value)
        }
    }

    pub fn key(&self) -> AnimationKey {
        self.key
    }

    pub fn is_active(&self) -> bool {
        self.started_ms.is_some()
    }

    pub fn started_ms(&self) -> Option<u64> {
        self.started_ms
    }

    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    pub fn start_value(&self) -> f64 {
        self.start_value
    }

    pub fn target_value(&self) -> f64 {
        self.target_value
    }

    pub fn last_value(&self) -> f64 {
        self.last_value
    }

    pub fn easing(&self) -> Easing {
        self.easing
    }
}
