//! GPU state facade
//!
//! The element engine never talks to a graphics API directly. It drives a
//! small fixed-function style interface: a transform stack, matrix
//! multiplication onto the top of that stack, and a current color.

use velum_core::{GpuMatrix, Mat4};

/// Transform-stack and color state of the rendering backend
pub trait GpuState {
    fn push_matrix(&mut self);
    fn pop_matrix(&mut self);
    /// Multiply the top of the stack by `matrix` (`top = top * matrix`)
    fn mult_matrix(&mut self, matrix: &GpuMatrix);
    fn color(&mut self, r: f32, g: f32, b: f32, a: f32);
    /// Pushes not yet matched by a pop
    fn depth(&self) -> usize;
}

/// Pushes the transform stack on creation and pops it on drop.
///
/// The pop runs on early return and on unwind, so the stack stays balanced
/// whatever the draw code does.
pub struct TransformScope<'a> {
    backend: &'a mut dyn GpuState,
}

impl<'a> TransformScope<'a> {
    pub fn push(backend: &'a mut dyn GpuState) -> Self {
        backend.push_matrix();
        Self { backend }
    }

    pub fn backend(&mut self) -> &mut dyn GpuState {
        self.backend
    }
}

impl Drop for TransformScope<'_> {
    fn drop(&mut self) {
        self.backend.pop_matrix();
    }
}

/// A recorded backend call
#[derive(Clone, Debug, PartialEq)]
pub enum GpuCommand {
    PushMatrix,
    PopMatrix,
    MultMatrix(GpuMatrix),
    Color([f32; 4]),
}

/// Backend that records calls and tracks the resulting transform stack.
///
/// Used for headless runs and tests.
#[derive(Debug)]
pub struct RecordingBackend {
    commands: Vec<GpuCommand>,
    stack: Vec<Mat4>,
    color: [f32; 4],
    underflows: usize,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
            stack: vec![Mat4::IDENTITY],
            color: [1.0; 4],
            underflows: 0,
        }
    }

    /// Get all recorded commands
    pub fn commands(&self) -> &[GpuCommand] {
        &self.commands
    }

    /// Take ownership of recorded commands
    pub fn take_commands(&mut self) -> Vec<GpuCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn is_balanced(&self) -> bool {
        self.depth() == 0 && self.underflows == 0
    }

    /// Current top of the transform stack
    pub fn transform(&self) -> Mat4 {
        self.stack.last().copied().unwrap_or(Mat4::IDENTITY)
    }

    pub fn current_color(&self) -> [f32; 4] {
        self.color
    }

    pub fn count(&self, pred: impl Fn(&GpuCommand) -> bool) -> usize {
        self.commands.iter().filter(|c| pred(*c)).count()
    }
}

impl Default for RecordingBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl GpuState for RecordingBackend {
    fn push_matrix(&mut self) {
        self.stack.push(self.transform());
        self.commands.push(GpuCommand::PushMatrix);
    }

    fn pop_matrix(&mut self) {
        if self.stack.len() > 1 {
            self.stack.pop();
        } else {
            self.underflows += 1;
            tracing::warn!("RecordingBackend: transform stack underflow");
        }
        self.commands.push(GpuCommand::PopMatrix);
    }

    fn mult_matrix(&mut self, matrix: &GpuMatrix) {
        if let Some(top) = self.stack.last_mut() {
            *top = top.mul(&Mat4::from(*matrix));
        }
        self.commands.push(GpuCommand::MultMatrix(*matrix));
    }

    fn color(&mut self, r: f32, g: f32, b: f32, a: f32) {
        self.color = [r, g, b, a];
        self.commands.push(GpuCommand::Color(self.color));
    }

    fn depth(&self) -> usize {
        self.stack.len() - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use velum_core::Vec3;

    #[test]
    fn test_scope_pops_on_drop() {
        let mut backend = RecordingBackend::new();
        {
            let mut scope = TransformScope::push(&mut backend);
            scope
                .backend()
                .mult_matrix(&Mat4::translation(Vec3::new(1.0, 0.0, 0.0)).to_gpu());
        }
        assert!(backend.is_balanced());
        assert_eq!(backend.transform(), Mat4::IDENTITY);
        assert_eq!(
            backend.commands().first(),
            Some(&GpuCommand::PushMatrix)
        );
        assert_eq!(backend.commands().last(), Some(&GpuCommand::PopMatrix));
    }

    #[test]
    fn test_mult_accumulates_on_top() {
        let mut backend = RecordingBackend::new();
        backend.push_matrix();
        backend.mult_matrix(&Mat4::translation(Vec3::new(2.0, 0.0, 0.0)).to_gpu());
        backend.mult_matrix(&Mat4::scale(Vec3::splat(3.0)).to_gpu());
        let p = backend.transform().transform_point(Vec3::new(1.0, 1.0, 0.0));
        assert_eq!(p, Vec3::new(5.0, 3.0, 0.0));
        assert_eq!(backend.depth(), 1);
    }

    #[test]
    fn test_underflow_is_reported() {
        let mut backend = RecordingBackend::new();
        backend.pop_matrix();
        assert!(!backend.is_balanced());
    }
}
