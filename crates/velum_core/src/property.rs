//! Per-element numeric properties
//!
//! Every element stores the same fixed set of numeric slots. Each slot has a
//! stable ordinal shared by all elements, and statically declares which
//! cached matrices it feeds.

use std::ops::{Index, IndexMut};

use thiserror::Error;

/// Returned when an untyped ordinal does not name a property
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("unknown property ordinal {0} (expected < {count})", count = Property::COUNT)]
pub struct UnknownProperty(pub usize);

/// A named numeric slot on an element
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(usize)]
pub enum Property {
    OffsetX,
    OffsetY,
    OffsetZ,
    ScaleX,
    ScaleY,
    ScaleZ,
    AlignX,
    AlignY,
    AlignZ,
    OriginX,
    OriginY,
    OriginZ,
    RotationAngle,
    RotationX,
    RotationY,
    RotationZ,
    ColorR,
    ColorG,
    ColorB,
    ColorA,
    SizeX,
    SizeY,
    SizeZ,
    ParentSizeX,
    ParentSizeY,
    ParentSizeZ,
}

impl Property {
    /// Number of property slots
    pub const COUNT: usize = 26;

    /// All properties in ordinal order
    pub const ALL: [Property; Property::COUNT] = [
        Property::OffsetX,
        Property::OffsetY,
        Property::OffsetZ,
        Property::ScaleX,
        Property::ScaleY,
        Property::ScaleZ,
        Property::AlignX,
        Property::AlignY,
        Property::AlignZ,
        Property::OriginX,
        Property::OriginY,
        Property::OriginZ,
        Property::RotationAngle,
        Property::RotationX,
        Property::RotationY,
        Property::RotationZ,
        Property::ColorR,
        Property::ColorG,
        Property::ColorB,
        Property::ColorA,
        Property::SizeX,
        Property::SizeY,
        Property::SizeZ,
        Property::ParentSizeX,
        Property::ParentSizeY,
        Property::ParentSizeZ,
    ];

    #[inline]
    pub const fn ordinal(self) -> usize {
        self as usize
    }

    /// The property `n` slots after this one.
    ///
    /// Proxy views address their fields this way. Running off the end of the
    /// enumeration is a programming error and panics.
    #[inline]
    pub const fn offset_by(self, n: usize) -> Property {
        Property::ALL[self as usize + n]
    }

    /// Matrix kinds that must be recomputed when this property changes
    pub const fn matrix_influence(self) -> &'static [MatrixKind] {
        use Property::*;
        match self {
            OffsetX | OffsetY | OffsetZ => &[MatrixKind::Offset],
            ScaleX | ScaleY | ScaleZ => &[MatrixKind::Scale],
            AlignX | AlignY | AlignZ => &[MatrixKind::Align],
            ParentSizeX | ParentSizeY | ParentSizeZ => &[MatrixKind::Align],
            OriginX | OriginY | OriginZ => &[MatrixKind::Origin],
            SizeX | SizeY | SizeZ => &[MatrixKind::Origin],
            RotationAngle | RotationX | RotationY | RotationZ => &[MatrixKind::Rotation],
            ColorR | ColorG | ColorB | ColorA => &[MatrixKind::Color],
        }
    }
}

impl TryFrom<usize> for Property {
    type Error = UnknownProperty;

    fn try_from(ordinal: usize) -> Result<Self, Self::Error> {
        Property::ALL
            .get(ordinal)
            .copied()
            .ok_or(UnknownProperty(ordinal))
    }
}

/// A cached transform contribution, or the color pseudo-kind
///
/// The first five variants are real matrices and are composed in declaration
/// order: align, rotation, offset, scale, origin. `Color` produces no matrix;
/// marking it dirty refreshes the element's cached packed color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MatrixKind {
    Align,
    Rotation,
    Offset,
    Scale,
    Origin,
    Color,
}

impl MatrixKind {
    /// Number of kinds that produce a matrix
    pub const MATRIX_COUNT: usize = 5;

    /// Matrix-producing kinds in composition order
    pub const TRANSFORMS: [MatrixKind; MatrixKind::MATRIX_COUNT] = [
        MatrixKind::Align,
        MatrixKind::Rotation,
        MatrixKind::Offset,
        MatrixKind::Scale,
        MatrixKind::Origin,
    ];

    /// Slot in the matrix array, or `None` for the color pseudo-kind
    #[inline]
    pub const fn slot(self) -> Option<usize> {
        match self {
            MatrixKind::Align => Some(0),
            MatrixKind::Rotation => Some(1),
            MatrixKind::Offset => Some(2),
            MatrixKind::Scale => Some(3),
            MatrixKind::Origin => Some(4),
            MatrixKind::Color => None,
        }
    }
}

/// Raw property values of one element
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PropertyStore {
    values: [f64; Property::COUNT],
}

impl PropertyStore {
    pub const fn new() -> Self {
        Self {
            values: [0.0; Property::COUNT],
        }
    }

    #[inline]
    pub fn get(&self, property: Property) -> f64 {
        self.values[property.ordinal()]
    }

    /// Store a raw value. Dirty tracking is the caller's job.
    #[inline]
    pub fn set(&mut self, property: Property, value: f64) {
        self.values[property.ordinal()] = value;
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }
}

impl Default for PropertyStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Index<Property> for PropertyStore {
    type Output = f64;

    fn index(&self, property: Property) -> &f64 {
        &self.values[property.ordinal()]
    }
}

impl IndexMut<Property> for PropertyStore {
    fn index_mut(&mut self, property: Property) -> &mut f64 {
        &mut self.values[property.ordinal()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordinals_match_table() {
        assert_eq!(Property::ALL.len(), Property::COUNT);
        for (i, p) in Property::ALL.iter().enumerate() {
            assert_eq!(p.ordinal(), i);
            assert_eq!(Property::try_from(i), Ok(*p));
        }
        assert_eq!(Property::ParentSizeZ.ordinal(), Property::COUNT - 1);
    }

    #[test]
    fn test_unknown_ordinal() {
        assert_eq!(
            Property::try_from(Property::COUNT),
            Err(UnknownProperty(Property::COUNT))
        );
    }

    #[test]
    fn test_unknown_ordinal_message() {
        let err = UnknownProperty(40);
        assert_eq!(
            err.to_string(),
            "unknown property ordinal 40 (expected < 26)"
        );
    }

    #[test]
    fn test_offset_by_addresses_fields() {
        assert_eq!(Property::OffsetX.offset_by(2), Property::OffsetZ);
        assert_eq!(Property::ColorR.offset_by(3), Property::ColorA);
        assert_eq!(Property::RotationAngle.offset_by(1), Property::RotationX);
    }

    #[test]
    #[should_panic]
    fn test_offset_by_out_of_range_panics() {
        let _ = Property::ParentSizeZ.offset_by(1);
    }

    #[test]
    fn test_influence_table() {
        assert_eq!(Property::OffsetX.matrix_influence(), &[MatrixKind::Offset]);
        assert_eq!(Property::ColorA.matrix_influence(), &[MatrixKind::Color]);
        assert_eq!(Property::SizeY.matrix_influence(), &[MatrixKind::Origin]);
        assert_eq!(Property::ParentSizeZ.matrix_influence(), &[MatrixKind::Align]);
        assert_eq!(Property::RotationY.matrix_influence(), &[MatrixKind::Rotation]);
        for p in Property::ALL {
            assert!(!p.matrix_influence().is_empty());
        }
    }

    #[test]
    fn test_transform_slots_follow_composition_order() {
        for (i, kind) in MatrixKind::TRANSFORMS.iter().enumerate() {
            assert_eq!(kind.slot(), Some(i));
        }
        assert_eq!(MatrixKind::Color.slot(), None);
    }

    #[test]
    fn test_store_index() {
        let mut store = PropertyStore::new();
        store[Property::ScaleY] = 2.5;
        store.set(Property::ColorA, 0.5);
        assert_eq!(store.get(Property::ScaleY), 2.5);
        assert_eq!(store[Property::ColorA], 0.5);
        assert_eq!(store.get(Property::OffsetX), 0.0);
    }
}
