//! Velum Core
//!
//! Foundational types shared by the Velum element engine:
//!
//! - **Properties**: the fixed, ordered set of numeric slots every element
//!   carries, and the static table of which cached matrices each slot feeds
//! - **Geometry**: `Vec3`, `Rotation`, column-major `Mat4` and its GPU form
//! - **Color**: float channels with packed hex conversions
//!
//! # Example
//!
//! ```rust
//! use velum_core::{MatrixKind, Property, PropertyStore};
//!
//! let mut store = PropertyStore::new();
//! store.set(Property::OffsetX, 10.0);
//! assert_eq!(store[Property::OffsetX], 10.0);
//! assert_eq!(Property::OffsetX.matrix_influence(), &[MatrixKind::Offset]);
//! ```

pub mod color;
pub mod geometry;
pub mod id;
pub mod input;
pub mod property;

pub use color::Color;
pub use geometry::{GpuMatrix, Mat4, Rotation, Vec3};
pub use id::ElementId;
pub use input::MouseButton;
pub use property::{MatrixKind, Property, PropertyStore, UnknownProperty};
