//! Elements
//!
//! An element is one visual node: a fixed property store, the matrices
//! derived from it, an optional animation context, input callbacks, and the
//! draw logic supplied by the concrete element kind.

use velum_animation::AnimationContext;
use velum_core::{Color, Mat4, MatrixKind, MouseButton, Property, PropertyStore, Rotation, Vec3};

use crate::backend::{GpuState, TransformScope};
use crate::error::RenderError;
use crate::handle::ElementMut;
use crate::matrix_cache::MatrixCache;

/// Called with `(element, pressed, button)` when the element is clicked
pub type ClickHandler = Box<dyn FnMut(&mut ElementMut<'_>, bool, MouseButton)>;

/// Called with `(element, hovered)` when the hover state changes
pub type HoverHandler = Box<dyn FnMut(&mut ElementMut<'_>, bool)>;

/// State handed to an element's draw logic
pub struct DrawContext<'a> {
    pub size: Vec3,
    pub color: Color,
    /// Color packed as `0xRRGGBBAA`
    pub packed_color: u32,
    pub backend: &'a mut dyn GpuState,
}

/// Draw logic of a concrete element kind.
///
/// Runs with the element's transforms and color already applied.
pub trait Render {
    fn render(&mut self, ctx: &mut DrawContext<'_>) -> Result<(), RenderError>;
}

/// Draws nothing; for elements that only carry transforms
#[derive(Clone, Copy, Debug, Default)]
pub struct NoContent;

impl Render for NoContent {
    fn render(&mut self, _ctx: &mut DrawContext<'_>) -> Result<(), RenderError> {
        Ok(())
    }
}

/// A visual node
pub struct Element {
    pub(crate) properties: PropertyStore,
    pub(crate) matrices: MatrixCache,
    pub(crate) animation_context: Option<AnimationContext>,
    pub(crate) enabled: bool,
    pub(crate) hovered: bool,
    pub(crate) on_click: Option<ClickHandler>,
    pub(crate) on_hover: Option<HoverHandler>,
    /// Bumped by the handler setters so dispatch can tell a slot was rewritten mid-call
    pub(crate) click_generation: u64,
    pub(crate) hover_generation: u64,
    pub(crate) content: Box<dyn Render>,
}

impl Element {
    pub fn new(content: impl Render + 'static) -> Self {
        Self::builder().build(content)
    }

    pub fn builder() -> ElementBuilder {
        ElementBuilder::new()
    }

    pub fn property(&self, property: Property) -> f64 {
        self.properties[property]
    }

    pub fn properties(&self) -> &PropertyStore {
        &self.properties
    }

    /// Store `value` immediately and mark the matrices it feeds dirty.
    ///
    /// Bypasses any animation context; the scheduler writes through here.
    pub fn write_direct(&mut self, property: Property, value: f64) {
        tracing::trace!("Element: {:?} = {}", property, value);
        self.properties[property] = value;
        for &kind in property.matrix_influence() {
            self.matrices.mark_dirty(kind);
        }
    }

    fn vec3(&self, base: Property) -> Vec3 {
        Vec3::new(
            self.properties[base],
            self.properties[base.offset_by(1)],
            self.properties[base.offset_by(2)],
        )
    }

    pub fn offset(&self) -> Vec3 {
        self.vec3(Property::OffsetX)
    }

    pub fn scale(&self) -> Vec3 {
        self.vec3(Property::ScaleX)
    }

    pub fn align(&self) -> Vec3 {
        self.vec3(Property::AlignX)
    }

    pub fn origin(&self) -> Vec3 {
        self.vec3(Property::OriginX)
    }

    pub fn size(&self) -> Vec3 {
        self.vec3(Property::SizeX)
    }

    pub fn parent_size(&self) -> Vec3 {
        self.vec3(Property::ParentSizeX)
    }

    pub fn color(&self) -> Color {
        Color::new(
            self.properties[Property::ColorR],
            self.properties[Property::ColorG],
            self.properties[Property::ColorB],
            self.properties[Property::ColorA],
        )
    }

    pub fn rotation(&self) -> Rotation {
        Rotation::new(
            self.properties[Property::RotationAngle],
            self.vec3(Property::RotationX),
        )
    }

    pub fn matrices(&self) -> &MatrixCache {
        &self.matrices
    }

    pub fn mark_dirty(&mut self, kind: MatrixKind) {
        self.matrices.mark_dirty(kind);
    }

    /// Recompute dirty matrices; returns how many were rebuilt
    pub fn clean_matrices(&mut self) -> usize {
        self.matrices.clean(&self.properties)
    }

    /// Local transform (align · rotation · offset · scale · origin) after cleaning
    pub fn local_transform(&mut self) -> Mat4 {
        self.clean_matrices();
        self.matrices.compose()
    }

    pub fn animation_context(&self) -> Option<&AnimationContext> {
        self.animation_context.as_ref()
    }

    /// Attach or detach the context that turns writes into animations
    pub fn set_animation_context(&mut self, context: Option<AnimationContext>) {
        self.animation_context = context;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    pub fn set_on_click(&mut self, handler: Option<ClickHandler>) {
        self.on_click = handler;
        self.click_generation = self.click_generation.wrapping_add(1);
    }

    pub fn set_on_hover(&mut self, handler: Option<HoverHandler>) {
        self.on_hover = handler;
        self.hover_generation = self.hover_generation.wrapping_add(1);
    }

    /// Clean matrices, set the color, and multiply every computed matrix onto
    /// the backend's current transform in composition order.
    pub fn apply_transformations(&mut self, backend: &mut dyn GpuState) {
        if !self.enabled {
            return;
        }

        self.clean_matrices();

        let c = self.color();
        backend.color(c.r as f32, c.g as f32, c.b as f32, c.a as f32);

        for matrix in self.matrices.present() {
            backend.mult_matrix(&matrix.to_gpu());
        }
    }

    /// Push the transform stack, apply transformations, draw, and pop.
    ///
    /// Disabled elements touch nothing. The pop happens even when drawing fails.
    pub fn transform_and_render(&mut self, backend: &mut dyn GpuState) -> Result<(), RenderError> {
        if !self.enabled {
            return Ok(());
        }

        let mut scope = TransformScope::push(backend);
        self.apply_transformations(scope.backend());

        let mut ctx = DrawContext {
            size: self.size(),
            color: self.color(),
            packed_color: self.matrices.packed_color(),
            backend: scope.backend(),
        };
        let result = self.content.render(&mut ctx);
        if let Err(err) = &result {
            tracing::warn!("Element: draw failed: {}", err);
        }
        result
    }
}

impl std::fmt::Debug for Element {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Element")
            .field("offset", &self.offset())
            .field("scale", &self.scale())
            .field("color", &self.color())
            .field("enabled", &self.enabled)
            .field("animating", &self.animation_context.is_some())
            .field("dirty", &self.matrices.dirty_kinds())
            .finish_non_exhaustive()
    }
}

/// Builder for elements with non-default initial properties
///
/// Defaults: scale 1, every other vector 0, transparent color, no rotation
/// (about +Z), enabled.
pub struct ElementBuilder {
    properties: PropertyStore,
    enabled: bool,
    on_click: Option<ClickHandler>,
    on_hover: Option<HoverHandler>,
}

impl ElementBuilder {
    pub fn new() -> Self {
        Self {
            properties: PropertyStore::new(),
            enabled: true,
            on_click: None,
            on_hover: None,
        }
        .scale(Vec3::ONE)
        .color(Color::TRANSPARENT)
        .rotation(Rotation::default())
    }

    fn vec3(mut self, base: Property, v: Vec3) -> Self {
        for (i, value) in v.to_array().into_iter().enumerate() {
            self.properties.set(base.offset_by(i), value);
        }
        self
    }

    pub fn offset(self, v: Vec3) -> Self {
        self.vec3(Property::OffsetX, v)
    }

    pub fn scale(self, v: Vec3) -> Self {
        self.vec3(Property::ScaleX, v)
    }

    pub fn align(self, v: Vec3) -> Self {
        self.vec3(Property::AlignX, v)
    }

    pub fn origin(self, v: Vec3) -> Self {
        self.vec3(Property::OriginX, v)
    }

    pub fn size(self, v: Vec3) -> Self {
        self.vec3(Property::SizeX, v)
    }

    pub fn parent_size(self, v: Vec3) -> Self {
        self.vec3(Property::ParentSizeX, v)
    }

    pub fn color(mut self, color: Color) -> Self {
        for (i, value) in color.to_array().into_iter().enumerate() {
            self.properties.set(Property::ColorR.offset_by(i), value);
        }
        self
    }

    pub fn rotation(mut self, rotation: Rotation) -> Self {
        self.properties.set(Property::RotationAngle, rotation.angle);
        self.vec3(Property::RotationX, rotation.axis)
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn on_click(
        mut self,
        handler: impl FnMut(&mut ElementMut<'_>, bool, MouseButton) + 'static,
    ) -> Self {
        self.on_click = Some(Box::new(handler));
        self
    }

    pub fn on_hover(mut self, handler: impl FnMut(&mut ElementMut<'_>, bool) + 'static) -> Self {
        self.on_hover = Some(Box::new(handler));
        self
    }

    /// Finish the element. Every matrix kind starts dirty, so the first
    /// clean computes all of them.
    pub fn build(self, content: impl Render + 'static) -> Element {
        let mut matrices = MatrixCache::new();
        for kind in MatrixKind::TRANSFORMS {
            matrices.mark_dirty(kind);
        }
        matrices.mark_dirty(MatrixKind::Color);

        Element {
            properties: self.properties,
            matrices,
            animation_context: None,
            enabled: self.enabled,
            hovered: false,
            on_click: self.on_click,
            on_hover: self.on_hover,
            click_generation: 0,
            hover_generation: 0,
            content: Box::new(content),
        }
    }
}

impl Default for ElementBuilder {
    fn default() -> Self {
        Self::new()
    }
}
