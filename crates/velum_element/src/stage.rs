//! Stage
//!
//! Owns the elements of one render loop together with the animation
//! scheduler that drives them. Property writes that animate, the per-frame
//! tick, rendering, and input callbacks all go through the stage, so no
//! animation state lives outside it.

use slotmap::SlotMap;
use velum_animation::{AnimationScheduler, Clock, TickReport};
use velum_core::{ElementId, MouseButton};

use crate::backend::GpuState;
use crate::config::StageConfig;
use crate::element::Element;
use crate::error::{RenderError, Result};
use crate::handle::ElementMut;

pub struct Stage {
    elements: SlotMap<ElementId, Element>,
    scheduler: AnimationScheduler,
    config: StageConfig,
}

impl Stage {
    /// Stage timed by the system clock
    pub fn new() -> Self {
        Self::with_scheduler(AnimationScheduler::new())
    }

    pub fn with_clock(clock: impl Clock + 'static) -> Self {
        Self::with_scheduler(AnimationScheduler::with_clock(clock))
    }

    pub fn with_scheduler(scheduler: AnimationScheduler) -> Self {
        Self {
            elements: SlotMap::with_key(),
            scheduler,
            config: StageConfig::default(),
        }
    }

    pub fn with_config(mut self, config: StageConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &StageConfig {
        &self.config
    }

    pub fn insert(&mut self, element: Element) -> ElementId {
        let id = self.elements.insert(element);
        tracing::debug!("Stage: inserted element {:?}", id);
        id
    }

    /// Remove an element and cancel its animations
    pub fn remove(&mut self, id: ElementId) -> Option<Element> {
        let element = self.elements.remove(id)?;
        let cancelled = self.scheduler.cancel_element(id);
        tracing::debug!(
            "Stage: removed element {:?}, cancelled {} animations",
            id,
            cancelled
        );
        Some(element)
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.elements.contains_key(id)
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(id)
    }

    /// Handle for writing properties; writes animate when a context is attached
    pub fn element_mut(&mut self, id: ElementId) -> Option<ElementMut<'_>> {
        let element = self.elements.get_mut(id)?;
        Some(ElementMut::new(
            id,
            element,
            &mut self.scheduler,
            &self.config.animation,
        ))
    }

    pub fn ids(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.elements.keys()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn scheduler(&self) -> &AnimationScheduler {
        &self.scheduler
    }

    /// Advance animations to the scheduler clock's current time
    pub fn tick(&mut self) -> TickReport {
        let now = self.scheduler.now_ms();
        self.tick_at(now)
    }

    /// Advance animations to `now_ms`, writing values through each element's
    /// direct path
    pub fn tick_at(&mut self, now_ms: u64) -> TickReport {
        let elements = &mut self.elements;
        self.scheduler
            .tick_at(now_ms, |key, value| match elements.get_mut(key.element) {
                Some(element) => {
                    element.write_direct(key.property, value);
                    true
                }
                None => false,
            })
    }

    pub fn render(&mut self, id: ElementId, backend: &mut dyn GpuState) -> Result<()> {
        let element = self
            .elements
            .get_mut(id)
            .ok_or(RenderError::UnknownElement(id))?;
        let before = backend.depth();
        element.transform_and_render(backend)?;
        check_balanced(before, backend)
    }

    /// Render every element on the stage.
    ///
    /// A failed draw does not stop the frame; the first error is returned
    /// after all elements have drawn. A stack left at a different depth than
    /// the frame started with is reported as `UnbalancedStack`.
    pub fn render_all(&mut self, backend: &mut dyn GpuState) -> Result<()> {
        let before = backend.depth();
        let mut first_error = None;
        for (id, element) in self.elements.iter_mut() {
            if let Err(err) = element.transform_and_render(backend) {
                tracing::debug!("Stage: element {:?} failed to render", id);
                first_error.get_or_insert(err);
            }
        }
        check_balanced(before, backend)?;
        first_error.map_or(Ok(()), Err)
    }

    /// Forward a click to the element's handler; returns whether one ran
    pub fn dispatch_click(&mut self, id: ElementId, pressed: bool, button: MouseButton) -> bool {
        let Some(element) = self.elements.get_mut(id) else {
            return false;
        };
        let Some(mut handler) = element.on_click.take() else {
            return false;
        };
        let generation = element.click_generation;

        let mut handle = ElementMut::new(id, element, &mut self.scheduler, &self.config.animation);
        handler(&mut handle, pressed, button);

        // Reinstall unless the callback replaced or cleared its slot
        let element = handle.element_mut();
        if element.click_generation == generation {
            element.on_click = Some(handler);
        }
        true
    }

    /// Update hover state and call the hover handler if it changed
    pub fn dispatch_hover(&mut self, id: ElementId, hovered: bool) -> bool {
        let Some(element) = self.elements.get_mut(id) else {
            return false;
        };
        if element.hovered == hovered {
            return false;
        }
        element.hovered = hovered;
        let Some(mut handler) = element.on_hover.take() else {
            return false;
        };
        let generation = element.hover_generation;

        let mut handle = ElementMut::new(id, element, &mut self.scheduler, &self.config.animation);
        handler(&mut handle, hovered);

        let element = handle.element_mut();
        if element.hover_generation == generation {
            element.on_hover = Some(handler);
        }
        true
    }
}

fn check_balanced(before: usize, backend: &dyn GpuState) -> Result<()> {
    let after = backend.depth();
    if after == before {
        Ok(())
    } else {
        tracing::warn!("Stage: transform stack depth {} -> {}", before, after);
        Err(RenderError::UnbalancedStack { before, after })
    }
}

impl Default for Stage {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{GpuCommand, RecordingBackend};
    use crate::element::{ClickHandler, DrawContext, NoContent, Render};
    use std::cell::Cell;
    use std::panic::{catch_unwind, AssertUnwindSafe};
    use std::rc::Rc;
    use velum_animation::{AnimationContext, AnimationKey, ManualClock};
    use velum_core::{MatrixKind, Property, Vec3};

    /// Pushes the transform stack and never pops it
    struct LeakyContent;

    impl Render for LeakyContent {
        fn render(&mut self, ctx: &mut DrawContext<'_>) -> Result<()> {
            ctx.backend.push_matrix();
            Ok(())
        }
    }

    struct FailingContent;

    impl Render for FailingContent {
        fn render(&mut self, _ctx: &mut DrawContext<'_>) -> Result<()> {
            Err(RenderError::Draw("no surface".into()))
        }
    }

    #[test]
    fn test_immediate_write_through_handle() {
        let mut stage = Stage::with_clock(ManualClock::new(0));
        let id = stage.insert(Element::new(NoContent));

        let mut el = stage.element_mut(id).unwrap();
        el.element_mut().clean_matrices();
        el.offset_mut().set(Vec3::new(1.0, 2.0, 3.0));

        let element = stage.get(id).unwrap();
        assert_eq!(element.offset(), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(element.matrices().dirty_kinds(), &[MatrixKind::Offset]);
        assert!(stage.scheduler().is_empty());
    }

    #[test]
    fn test_animated_write_does_not_touch_store() {
        let mut stage = Stage::with_clock(ManualClock::new(0));
        let id = stage.insert(Element::new(NoContent));

        let mut el = stage.element_mut(id).unwrap();
        el.element_mut().clean_matrices();
        el.animate(AnimationContext::linear(1.0), |el| {
            el.scale_mut().set_x(4.0);
        });
        assert!(el.element().animation_context().is_none());

        let element = stage.get(id).unwrap();
        assert_eq!(element.property(Property::ScaleX), 1.0);
        assert!(!element.matrices().is_dirty());
        assert_eq!(stage.scheduler().len(), 1);
    }

    #[test]
    fn test_remove_cancels_animations() {
        let mut stage = Stage::with_clock(ManualClock::new(0));
        let id = stage.insert(Element::new(NoContent));
        let mut el = stage.element_mut(id).unwrap();
        el.animate_default(|el| {
            el.color_mut().set_packed(0xFFFFFFFF);
        });
        assert_eq!(stage.scheduler().len(), 4);

        assert!(stage.remove(id).is_some());
        assert!(stage.scheduler().is_empty());
        assert!(!stage.contains(id));
        assert!(stage.element_mut(id).is_none());
    }

    #[test]
    fn test_render_unknown_element() {
        let mut stage = Stage::with_clock(ManualClock::new(0));
        let id = stage.insert(Element::new(NoContent));
        stage.remove(id);

        let mut backend = crate::backend::RecordingBackend::new();
        assert!(matches!(
            stage.render(id, &mut backend),
            Err(RenderError::UnknownElement(_))
        ));
    }

    #[test]
    fn test_hover_handler_only_on_change() {
        let mut stage = Stage::with_clock(ManualClock::new(0));
        let id = stage.insert(
            Element::builder()
                .on_hover(|el, hovered| {
                    let alpha = if hovered { 1.0 } else { 0.5 };
                    el.change_property(Property::ColorA, alpha);
                })
                .build(NoContent),
        );

        assert!(stage.dispatch_hover(id, true));
        assert!(!stage.dispatch_hover(id, true));
        assert_eq!(stage.get(id).unwrap().property(Property::ColorA), 1.0);
        assert!(stage.get(id).unwrap().is_hovered());

        assert!(stage.dispatch_hover(id, false));
        assert_eq!(stage.get(id).unwrap().property(Property::ColorA), 0.5);
    }

    #[test]
    fn test_click_handler_can_animate() {
        let clock = ManualClock::new(0);
        let mut stage = Stage::with_clock(clock.clone());
        let id = stage.insert(
            Element::builder()
                .on_click(|el, pressed, _button| {
                    if pressed {
                        el.animate(AnimationContext::linear(0.2), |el| {
                            el.offset_mut().set_y(-5.0);
                        });
                    }
                })
                .build(NoContent),
        );

        assert!(stage.dispatch_click(id, true, MouseButton::Left));
        assert!(stage
            .scheduler()
            .get(AnimationKey::new(id, Property::OffsetY))
            .is_some());

        clock.advance(200);
        stage.tick();
        assert_eq!(stage.get(id).unwrap().property(Property::OffsetY), -5.0);

        // Handler survives the dispatch
        assert!(stage.dispatch_click(id, false, MouseButton::Right));
    }

    #[test]
    fn test_click_without_handler() {
        let mut stage = Stage::with_clock(ManualClock::new(0));
        let id = stage.insert(Element::new(NoContent));
        assert!(!stage.dispatch_click(id, true, MouseButton::Left));
    }

    #[test]
    fn test_click_handler_can_remove_itself() {
        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();
        let mut stage = Stage::with_clock(ManualClock::new(0));
        let id = stage.insert(
            Element::builder()
                .on_click(move |el, _pressed, _button| {
                    counter.set(counter.get() + 1);
                    el.element_mut().set_on_click(None);
                })
                .build(NoContent),
        );

        assert!(stage.dispatch_click(id, true, MouseButton::Left));
        assert!(!stage.dispatch_click(id, true, MouseButton::Left));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_click_handler_can_replace_itself() {
        let replaced = Rc::new(Cell::new(false));
        let flag = replaced.clone();
        let mut stage = Stage::with_clock(ManualClock::new(0));
        let id = stage.insert(
            Element::builder()
                .on_click(move |el, _pressed, _button| {
                    let flag = flag.clone();
                    let replacement: ClickHandler = Box::new(move |_, _, _| flag.set(true));
                    el.element_mut().set_on_click(Some(replacement));
                })
                .build(NoContent),
        );

        assert!(stage.dispatch_click(id, true, MouseButton::Left));
        assert!(!replaced.get());
        assert!(stage.dispatch_click(id, true, MouseButton::Left));
        assert!(replaced.get());
    }

    #[test]
    fn test_hover_handler_can_remove_itself() {
        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();
        let mut stage = Stage::with_clock(ManualClock::new(0));
        let id = stage.insert(
            Element::builder()
                .on_hover(move |el, _hovered| {
                    counter.set(counter.get() + 1);
                    el.element_mut().set_on_hover(None);
                })
                .build(NoContent),
        );

        assert!(stage.dispatch_hover(id, true));
        assert!(!stage.dispatch_hover(id, false));
        assert_eq!(calls.get(), 1);
        assert!(!stage.get(id).unwrap().is_hovered());
    }

    #[test]
    fn test_animate_restores_context_on_unwind() {
        let mut stage = Stage::with_clock(ManualClock::new(0));
        let id = stage.insert(Element::new(NoContent));
        let mut el = stage.element_mut(id).unwrap();

        let outcome = catch_unwind(AssertUnwindSafe(|| {
            el.animate(AnimationContext::linear(1.0), |_| panic!("draw code bailed"));
        }));
        assert!(outcome.is_err());
        assert!(el.element().animation_context().is_none());

        el.offset_mut().set_x(2.0);
        assert_eq!(stage.get(id).unwrap().offset().x, 2.0);
        assert!(stage.scheduler().is_empty());
    }

    #[test]
    fn test_render_all_draws_every_element() {
        let mut stage = Stage::with_clock(ManualClock::new(0));
        stage.insert(Element::new(NoContent));
        stage.insert(Element::new(NoContent));
        let hidden = stage.insert(Element::new(NoContent));
        stage.element_mut(hidden).unwrap().set_enabled(false);

        let mut backend = RecordingBackend::new();
        stage.render_all(&mut backend).unwrap();

        assert_eq!(backend.count(|c| matches!(c, GpuCommand::PushMatrix)), 2);
        assert!(backend.is_balanced());
    }

    #[test]
    fn test_render_all_reports_first_error_and_keeps_going() {
        let mut stage = Stage::with_clock(ManualClock::new(0));
        stage.insert(Element::new(FailingContent));
        stage.insert(Element::new(NoContent));

        let mut backend = RecordingBackend::new();
        let result = stage.render_all(&mut backend);

        assert!(matches!(result, Err(RenderError::Draw(_))));
        assert_eq!(backend.count(|c| matches!(c, GpuCommand::PushMatrix)), 2);
        assert!(backend.is_balanced());
    }

    #[test]
    fn test_unbalanced_stack_is_reported() {
        let mut stage = Stage::with_clock(ManualClock::new(0));
        let id = stage.insert(Element::new(LeakyContent));

        let mut backend = RecordingBackend::new();
        assert!(matches!(
            stage.render(id, &mut backend),
            Err(RenderError::UnbalancedStack { before: 0, after: 1 })
        ));

        let mut backend = RecordingBackend::new();
        assert!(matches!(
            stage.render_all(&mut backend),
            Err(RenderError::UnbalancedStack { before: 0, after: 1 })
        ));
    }
}
