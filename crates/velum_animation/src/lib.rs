//! Velum Animation System
//!
//! Timed, single-property interpolation for element properties.
//!
//! # Features
//!
//! - **Easing**: polynomial, back, elastic, bounce and CSS cubic-bezier curves
//! - **Animation contexts**: a duration and easing that turn property writes
//!   into transitions
//! - **Scheduler**: one tween per element property, retargeted in place and
//!   pruned as soon as it completes
//! - **Clocks**: monotonic system time, or a manual clock for tests

pub mod animation;
pub mod clock;
pub mod context;
pub mod easing;
pub mod scheduler;

pub use animation::{Animation, AnimationKey, Sample};
pub use clock::{Clock, ManualClock, SystemClock};
pub use context::AnimationContext;
pub use easing::Easing;
pub use scheduler::{AnimationId, AnimationScheduler, TickReport};
