//! Mutable element handle
//!
//! `ElementMut` pairs an element with the stage's scheduler so that every
//! write, whether through a raw property or a proxy view, goes through one
//! gateway that either stores the value or starts an animation.

use velum_animation::{AnimationContext, AnimationKey, AnimationScheduler};
use velum_core::{ElementId, Property};

use crate::element::Element;
use crate::proxy::{ColorView, RotationView, Vec3View};

pub struct ElementMut<'a> {
    id: ElementId,
    element: &'a mut Element,
    scheduler: &'a mut AnimationScheduler,
    default_context: &'a AnimationContext,
}

impl<'a> ElementMut<'a> {
    pub(crate) fn new(
        id: ElementId,
        element: &'a mut Element,
        scheduler: &'a mut AnimationScheduler,
        default_context: &'a AnimationContext,
    ) -> Self {
        Self {
            id,
            element,
            scheduler,
            default_context,
        }
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn element(&self) -> &Element {
        &*self.element
    }

    pub fn element_mut(&mut self) -> &mut Element {
        &mut *self.element
    }

    pub fn property(&self, property: Property) -> f64 {
        self.element.property(property)
    }

    /// Write gateway for every property change.
    ///
    /// With an animation context attached, retargets the element's animation
    /// for `property` toward `value`. Otherwise stores `value` and marks the
    /// dependent matrices dirty.
    pub fn change_property(&mut self, property: Property, value: f64) {
        match self.element.animation_context {
            Some(context) => {
                let current = self.element.property(property);
                self.scheduler.retarget(
                    AnimationKey::new(self.id, property),
                    current,
                    value,
                    &context,
                );
            }
            None => self.element.write_direct(property, value),
        }
    }

    /// Run `f` with `context` attached, then restore whatever was attached
    /// before. The restore also runs if `f` unwinds.
    pub fn animate<R>(&mut self, context: AnimationContext, f: impl FnOnce(&mut Self) -> R) -> R {
        let previous = self.element.animation_context.replace(context);
        let guard = RestoreContext {
            handle: self,
            previous,
        };
        f(&mut *guard.handle)
    }

    /// `animate` with the stage's configured default context
    pub fn animate_default<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        let context = *self.default_context;
        self.animate(context, f)
    }

    pub fn set_animation_context(&mut self, context: Option<AnimationContext>) {
        self.element.set_animation_context(context);
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.element.set_enabled(enabled);
    }

    pub fn offset_mut(&mut self) -> Vec3View<'_, 'a> {
        Vec3View::new(self, Property::OffsetX)
    }

    pub fn scale_mut(&mut self) -> Vec3View<'_, 'a> {
        Vec3View::new(self, Property::ScaleX)
    }

    pub fn align_mut(&mut self) -> Vec3View<'_, 'a> {
        Vec3View::new(self, Property::AlignX)
    }

    pub fn origin_mut(&mut self) -> Vec3View<'_, 'a> {
        Vec3View::new(self, Property::OriginX)
    }

    pub fn size_mut(&mut self) -> Vec3View<'_, 'a> {
        Vec3View::new(self, Property::SizeX)
    }

    pub fn parent_size_mut(&mut self) -> Vec3View<'_, 'a> {
        Vec3View::new(self, Property::ParentSizeX)
    }

    pub fn color_mut(&mut self) -> ColorView<'_, 'a> {
        ColorView::new(self)
    }

    pub fn rotation_mut(&mut self) -> RotationView<'_, 'a> {
        RotationView::new(self)
    }
}

/// Puts back the element's previous animation context on drop
struct RestoreContext<'h, 'a> {
    handle: &'h mut ElementMut<'a>,
    previous: Option<AnimationContext>,
}

impl Drop for RestoreContext<'_, '_> {
    fn drop(&mut self) {
        self.handle.element.animation_context = self.previous.take();
    }
}
