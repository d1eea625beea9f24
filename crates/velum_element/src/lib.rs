//! Velum Element Engine
//!
//! Retained-mode elements whose numeric properties can be written directly or
//! animated, with transform matrices derived lazily from those properties.
//!
//! # Features
//!
//! - **Write gateway**: every property write, raw or through a proxy view,
//!   either stores the value and marks dependent matrices dirty or retargets
//!   an animation when a context is attached
//! - **Matrix cache**: align, rotation, offset, scale and origin matrices are
//!   rebuilt only when the properties feeding them change
//! - **Render traversal**: color and matrices are applied to a backend
//!   transform stack around the element's draw logic, with a guaranteed pop
//!
//! # Example
//!
//! ```rust
//! use velum_animation::{AnimationContext, ManualClock};
//! use velum_core::{Property, Vec3};
//! use velum_element::{Element, NoContent, Stage};
//!
//! let clock = ManualClock::new(0);
//! let mut stage = Stage::with_clock(clock.clone());
//! let id = stage.insert(Element::new(NoContent));
//!
//! if let Some(mut el) = stage.element_mut(id) {
//!     el.animate(AnimationContext::linear(1.0), |el| {
//!         el.offset_mut().set_x(10.0);
//!     });
//! }
//!
//! clock.advance(500);
//! stage.tick();
//! let x = stage.get(id).map(|e| e.property(Property::OffsetX));
//! assert!((x.unwrap_or_default() - 5.0).abs() < 1e-9);
//! ```

pub mod backend;
pub mod config;
pub mod element;
pub mod error;
pub mod handle;
pub mod matrix_cache;
pub mod proxy;
pub mod stage;

pub use backend::{GpuCommand, GpuState, RecordingBackend, TransformScope};
pub use config::StageConfig;
pub use element::{ClickHandler, DrawContext, Element, ElementBuilder, HoverHandler, NoContent, Render};
pub use error::{ConfigError, RenderError, Result};
pub use handle::ElementMut;
pub use matrix_cache::MatrixCache;
pub use proxy::{ColorView, RotationView, Vec3View};
pub use stage::Stage;
