//! Lazily recomputed transform matrices
//!
//! Property writes only mark matrix kinds dirty. The matrices themselves are
//! rebuilt from the property store on the next `clean`, so any number of
//! writes between frames costs one recompute per affected kind.

use smallvec::SmallVec;
use velum_core::{Color, Mat4, MatrixKind, Property, PropertyStore, Vec3};

/// Per-element matrix slots plus the pending dirty list
#[derive(Clone, Debug, Default)]
pub struct MatrixCache {
    matrices: [Option<Mat4>; MatrixKind::MATRIX_COUNT],
    /// `None` when clean
    dirty: Option<SmallVec<[MatrixKind; 6]>>,
    packed_color: u32,
}

impl MatrixCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `kind` for recomputation
    pub fn mark_dirty(&mut self, kind: MatrixKind) {
        let dirty = self.dirty.get_or_insert_with(SmallVec::new);
        if !dirty.contains(&kind) {
            dirty.push(kind);
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty.is_some()
    }

    /// Pending kinds in the order they were marked
    pub fn dirty_kinds(&self) -> &[MatrixKind] {
        self.dirty.as_deref().unwrap_or(&[])
    }

    /// Recompute every pending kind from `props`; returns how many were rebuilt
    pub fn clean(&mut self, props: &PropertyStore) -> usize {
        let Some(dirty) = self.dirty.take() else {
            return 0;
        };
        for &kind in &dirty {
            self.recompute(kind, props);
        }
        dirty.len()
    }

    /// Rebuild one kind from `props`, replacing any cached value
    pub fn recompute(&mut self, kind: MatrixKind, props: &PropertyStore) {
        let vec = |x: Property| {
            Vec3::new(props[x], props[x.offset_by(1)], props[x.offset_by(2)])
        };

        let matrix = match kind {
            MatrixKind::Color => {
                self.packed_color = Color::new(
                    props[Property::ColorR],
                    props[Property::ColorG],
                    props[Property::ColorB],
                    props[Property::ColorA],
                )
                .to_packed_rgba();
                tracing::trace!("MatrixCache: color -> {:#010x}", self.packed_color);
                return;
            }
            MatrixKind::Align => {
                Mat4::translation(vec(Property::AlignX).mul_elem(vec(Property::ParentSizeX)))
            }
            MatrixKind::Rotation => {
                Mat4::rotation(props[Property::RotationAngle], vec(Property::RotationX))
            }
            MatrixKind::Offset => Mat4::translation(vec(Property::OffsetX)),
            MatrixKind::Scale => Mat4::scale(vec(Property::ScaleX)),
            MatrixKind::Origin => {
                Mat4::translation(-vec(Property::OriginX).mul_elem(vec(Property::SizeX)))
            }
        };

        if let Some(slot) = kind.slot() {
            tracing::trace!("MatrixCache: recomputed {:?}", kind);
            self.matrices[slot] = Some(matrix);
        }
    }

    pub fn matrix(&self, kind: MatrixKind) -> Option<&Mat4> {
        kind.slot().and_then(|slot| self.matrices[slot].as_ref())
    }

    /// Computed matrices in composition order; never-computed slots are skipped
    pub fn present(&self) -> impl Iterator<Item = &Mat4> {
        self.matrices.iter().flatten()
    }

    /// Product of the present matrices in composition order
    pub fn compose(&self) -> Mat4 {
        self.present()
            .fold(Mat4::IDENTITY, |acc, matrix| acc.mul(matrix))
    }

    /// Color packed as `0xRRGGBBAA` at the last clean
    pub fn packed_color(&self) -> u32 {
        self.packed_color
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(values: &[(Property, f64)]) -> PropertyStore {
        let mut store = PropertyStore::new();
        for &(p, v) in values {
            store.set(p, v);
        }
        store
    }

    #[test]
    fn test_mark_dirty_dedups() {
        let mut cache = MatrixCache::new();
        assert!(!cache.is_dirty());
        cache.mark_dirty(MatrixKind::Offset);
        cache.mark_dirty(MatrixKind::Offset);
        cache.mark_dirty(MatrixKind::Scale);
        assert_eq!(cache.dirty_kinds(), &[MatrixKind::Offset, MatrixKind::Scale]);
    }

    #[test]
    fn test_clean_is_idempotent() {
        let props = store(&[(Property::OffsetX, 3.0)]);
        let mut cache = MatrixCache::new();
        cache.mark_dirty(MatrixKind::Offset);

        assert_eq!(cache.clean(&props), 1);
        let first = cache.matrix(MatrixKind::Offset).copied();
        assert_eq!(cache.clean(&props), 0);
        assert_eq!(cache.matrix(MatrixKind::Offset).copied(), first);
        assert!(!cache.is_dirty());
    }

    #[test]
    fn test_align_scales_by_parent_size() {
        let props = store(&[
            (Property::AlignX, 0.5),
            (Property::AlignY, 1.0),
            (Property::ParentSizeX, 200.0),
            (Property::ParentSizeY, 80.0),
        ]);
        let mut cache = MatrixCache::new();
        cache.recompute(MatrixKind::Align, &props);
        let m = cache.matrix(MatrixKind::Align).copied().unwrap_or_default();
        assert_eq!(m.transform_point(Vec3::ZERO), Vec3::new(100.0, 80.0, 0.0));
    }

    #[test]
    fn test_origin_shifts_by_negative_own_size() {
        let props = store(&[
            (Property::OriginX, 0.5),
            (Property::OriginY, 0.5),
            (Property::SizeX, 40.0),
            (Property::SizeY, 20.0),
        ]);
        let mut cache = MatrixCache::new();
        cache.recompute(MatrixKind::Origin, &props);
        let m = cache.matrix(MatrixKind::Origin).copied().unwrap_or_default();
        assert_eq!(m.transform_point(Vec3::ZERO), Vec3::new(-20.0, -10.0, 0.0));
    }

    #[test]
    fn test_color_kind_has_no_matrix() {
        let props = store(&[(Property::ColorR, 1.0), (Property::ColorA, 1.0)]);
        let mut cache = MatrixCache::new();
        cache.mark_dirty(MatrixKind::Color);
        cache.clean(&props);
        assert_eq!(cache.packed_color(), 0xFF0000FF);
        assert!(cache.matrix(MatrixKind::Color).is_none());
        assert_eq!(cache.present().count(), 0);
    }

    #[test]
    fn test_compose_follows_declared_order() {
        let props = store(&[
            (Property::OffsetX, 10.0),
            (Property::ScaleX, 2.0),
            (Property::ScaleY, 2.0),
            (Property::ScaleZ, 2.0),
        ]);
        let mut cache = MatrixCache::new();
        // Marked out of order on purpose
        cache.mark_dirty(MatrixKind::Scale);
        cache.mark_dirty(MatrixKind::Offset);
        cache.clean(&props);

        // Scale applies to the point first, then the offset
        let p = cache.compose().transform_point(Vec3::new(1.0, 1.0, 0.0));
        assert_eq!(p, Vec3::new(12.0, 2.0, 0.0));
    }
}
