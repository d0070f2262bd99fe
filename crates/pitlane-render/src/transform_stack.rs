//! CPU matrix stack with push/pop scoping
//!
//! Every transform call post-multiplies the top matrix, so calls compose in
//! the order they are written: `translate` then `rotate` places a rotated
//! model at the translated origin.

use pitlane_core::math::{mat4_mul, mat4_rotation, mat4_scale, mat4_translation};
use pitlane_core::{Mat4, Vec3, MAT4_IDENTITY};

#[derive(Debug, Clone)]
pub struct TransformStack {
    base: Mat4,
    stack: Vec<Mat4>,
}

impl Default for TransformStack {
    fn default() -> Self {
        Self::new()
    }
}

impl TransformStack {
    pub fn new() -> Self {
        Self {
            base: MAT4_IDENTITY,
            stack: Vec::new(),
        }
    }

    /// Number of saved levels above the base
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn top(&self) -> Mat4 {
        *self.stack.last().unwrap_or(&self.base)
    }

    fn top_mut(&mut self) -> &mut Mat4 {
        self.stack.last_mut().unwrap_or(&mut self.base)
    }

    /// Save the current matrix
    pub fn push(&mut self) {
        let top = self.top();
        self.stack.push(top);
    }

    /// Restore the last saved matrix. Popping at the base is a no-op.
    pub fn pop(&mut self) {
        if self.stack.pop().is_none() {
            log::error!("Transform stack underflow");
        }
    }

    /// Run `f` between a push and its matching pop
    pub fn scoped<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        self.push();
        let depth = self.depth();
        let result = f(self);
        debug_assert_eq!(self.depth(), depth, "unbalanced push/pop inside scope");
        self.pop();
        result
    }

    pub fn multiply(&mut self, m: &Mat4) {
        let top = self.top_mut();
        *top = mat4_mul(top, m);
    }

    pub fn translate(&mut self, t: Vec3) {
        self.multiply(&mat4_translation(t));
    }

    /// Rotate `degrees` about `axis`
    pub fn rotate(&mut self, degrees: f32, axis: Vec3) {
        if degrees != 0.0 {
            self.multiply(&mat4_rotation(degrees, axis));
        }
    }

    pub fn scale(&mut self, s: Vec3) {
        self.multiply(&mat4_scale(s));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pitlane_core::math::{mat4_origin, mat4_transform_point};

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-4
    }

    #[test]
    fn test_push_pop_restores() {
        let mut stack = TransformStack::new();
        stack.translate(Vec3::new(1.0, 0.0, 0.0));
        let before = stack.top();

        stack.push();
        stack.translate(Vec3::new(0.0, 5.0, 0.0));
        assert_eq!(stack.depth(), 1);
        stack.pop();

        assert_eq!(stack.depth(), 0);
        assert_eq!(stack.top(), before);
    }

    #[test]
    fn test_pop_at_base_is_harmless() {
        let mut stack = TransformStack::new();
        stack.pop();
        assert_eq!(stack.depth(), 0);
        assert_eq!(stack.top(), MAT4_IDENTITY);
    }

    #[test]
    fn test_scoped_balances() {
        let mut stack = TransformStack::new();
        let origin = stack.scoped(|s| {
            s.translate(Vec3::new(3.0, 4.0, 5.0));
            mat4_origin(&s.top())
        });
        assert_eq!(origin, Vec3::new(3.0, 4.0, 5.0));
        assert_eq!(stack.depth(), 0);
        assert_eq!(stack.top(), MAT4_IDENTITY);
    }

    #[test]
    fn test_composition_order() {
        let mut stack = TransformStack::new();
        stack.translate(Vec3::new(10.0, 0.0, 0.0));
        stack.rotate(90.0, Vec3::Z);
        stack.scale(Vec3::new(2.0, 2.0, 2.0));

        // Local +X is scaled, then turned to +Y, then moved
        let p = mat4_transform_point(&stack.top(), Vec3::X);
        assert!(approx(p, Vec3::new(10.0, 2.0, 0.0)));
    }
}
