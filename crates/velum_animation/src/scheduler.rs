//! Animation scheduler
//!
//! Owns every in-flight tween and advances them once per frame. The scheduler
//! is an explicit object owned by the update loop; there is no process-wide
//! registry.

use rustc_hash::FxHashMap;
use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;
use velum_core::ElementId;

use crate::animation::{Animation, AnimationKey, Sample};
use crate::clock::{Clock, SystemClock};
use crate::context::AnimationContext;

new_key_type! {
    pub struct AnimationId;
}

/// What a single tick did
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Animations that wrote an interpolated value and keep running
    pub advanced: usize,
    /// Animations that wrote their target and were removed
    pub finished: usize,
    /// Animations removed because their element no longer exists
    pub dropped: usize,
}

/// The animation scheduler that ticks all active animations
pub struct AnimationScheduler {
    animations: SlotMap<AnimationId, Animation>,
    by_key: FxHashMap<AnimationKey, AnimationId>,
    clock: Box<dyn Clock>,
}

impl AnimationScheduler {
    pub fn new() -> Self {
        Self::with_clock(SystemClock::new())
    }

    pub fn with_clock(clock: impl Clock + 'static) -> Self {
        Self {
            animations: SlotMap::with_key(),
            by_key: FxHashMap::default(),
            clock: Box::new(clock),
        }
    }

    /// Current reading of the scheduler clock
    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    /// Point the animation for `key` at `target`, creating it if needed.
    ///
    /// A new animation starts from `current`, the property's stored value.
    /// An existing one, running or not, restarts from its last written value.
    pub fn retarget(
        &mut self,
        key: AnimationKey,
        current: f64,
        target: f64,
        context: &AnimationContext,
    ) -> AnimationId {
        let now = self.clock.now_ms();
        let id = match self.by_key.get(&key) {
            Some(&id) => id,
            None => {
                let id = self.animations.insert(Animation::new(key, current));
                self.by_key.insert(key, id);
                id
            }
        };

        let duration_ms = context.duration_ms();
        if let Some(animation) = self.animations.get_mut(id) {
            tracing::debug!(
                "Animation: {:?} {:?} -> {} over {}ms",
                key.property,
                key.element,
                target,
                duration_ms
            );
            animation.retarget(target, duration_ms, context.easing, now);
        }
        id
    }

    /// Advance every animation to the scheduler clock's current time
    pub fn tick(&mut self, write: impl FnMut(AnimationKey, f64) -> bool) -> TickReport {
        let now = self.clock.now_ms();
        self.tick_at(now, write)
    }

    /// Advance every animation to `now_ms`.
    ///
    /// `write` stores a value into the target element and returns `false` if
    /// the element is gone. Finished animations write their target once and
    /// are removed in the same tick.
    pub fn tick_at(
        &mut self,
        now_ms: u64,
        mut write: impl FnMut(AnimationKey, f64) -> bool,
    ) -> TickReport {
        let mut report = TickReport::default();
        let mut removed: SmallVec<[AnimationId; 8]> = SmallVec::new();

        for (id, animation) in self.animations.iter_mut() {
            let key = animation.key();
            let sample = animation.sample(now_ms);
            if !write(key, sample.value()) {
                report.dropped += 1;
                removed.push(id);
                continue;
            }
            match sample {
                Sample::Running(_) => report.advanced += 1,
                Sample::Finished(value) => {
                    tracing::trace!("Animation: {:?} finished at {}", key.property, value);
                    report.finished += 1;
                    removed.push(id);
                }
            }
        }

        for id in removed {
            if let Some(animation) = self.animations.remove(id) {
                self.by_key.remove(&animation.key());
            }
        }

        if report.finished + report.dropped > 0 {
            tracing::debug!(
                "Animation: pruned {} finished, {} orphaned, {} still running",
                report.finished,
                report.dropped,
                report.advanced
            );
        }
        report
    }

    pub fn get(&self, key: AnimationKey) -> Option<&Animation> {
        self.by_key.get(&key).and_then(|&id| self.animations.get(id))
    }

    /// Stop the animation for `key` where it stands
    pub fn cancel(&mut self, key: AnimationKey) -> Option<Animation> {
        let id = self.by_key.remove(&key)?;
        self.animations.remove(id)
    }

    /// Stop every animation targeting `element`; returns how many were removed
    pub fn cancel_element(&mut self, element: ElementId) -> usize {
        let before = self.animations.len();
        let by_key = &mut self.by_key;
        self.animations.retain(|_, animation| {
            let key = animation.key();
            if key.element == element {
                by_key.remove(&key);
                false
            } else {
                true
            }
        });
        before - self.animations.len()
    }

    /// Check if any animations are still active
    pub fn has_active_animations(&self) -> bool {
        self.animations.values().any(Animation::is_active)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Animation> {
        self.animations.values()
    }

    pub fn len(&self) -> usize {
        self.animations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.animations.is_empty()
    }
}

impl Default for AnimationScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for AnimationScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnimationScheduler")
            .field("animations", &self.animations.len())
            .field("now_ms", &self.clock.now_ms())
            .finish()
    }
}
