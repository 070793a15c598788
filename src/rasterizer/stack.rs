//! Matrix stack
//!
//! The top slot is the current transform. Every elementary operation
//! composes onto it so that the new transform reaches geometry first.

use super::error::RenderError;
use super::math::Mat4;

#[derive(Debug, Clone)]
pub struct MatrixStack {
    slots: Vec<Mat4>,
    capacity: usize,
}

impl MatrixStack {
    /// `capacity` counts the base slot; it is raised to at least 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let mut slots = Vec::with_capacity(capacity);
        slots.push(Mat4::IDENTITY);
        Self { slots, capacity }
    }

    pub fn top(&self) -> &Mat4 {
        // The base slot is never popped
        &self.slots[self.slots.len() - 1]
    }

    fn top_mut(&mut self) -> &mut Mat4 {
        let last = self.slots.len() - 1;
        &mut self.slots[last]
    }

    pub fn depth(&self) -> usize {
        self.slots.len()
    }

    /// Duplicate the current matrix into a new slot
    pub fn push(&mut self) -> Result<(), RenderError> {
        if self.slots.len() == self.capacity {
            return Err(RenderError::MatrixStackOverflow { capacity: self.capacity });
        }
        let top = *self.top();
        self.slots.push(top);
        Ok(())
    }

    /// Discard the current slot, restoring the one below
    pub fn pop(&mut self) -> Result<(), RenderError> {
        if self.slots.len() == 1 {
            return Err(RenderError::MatrixStackUnderflow);
        }
        self.slots.pop();
        Ok(())
    }

    pub fn load_identity(&mut self) {
        *self.top_mut() = Mat4::IDENTITY;
    }

    /// Compose `m` onto the current matrix
    pub fn multiply(&mut self, m: &Mat4) {
        let top = self.top_mut();
        *top = top.mul(m);
    }

    pub fn scale(&mut self, x: f32, y: f32, z: f32) {
        self.multiply(&Mat4::scaling(x, y, z));
    }

    /// Translate; `y` is negated so that positive y moves geometry up on screen
    pub fn translate(&mut self, x: f32, y: f32, z: f32) {
        self.multiply(&Mat4::translation(x, -y, z));
    }

    /// Rotate by Euler angles in degrees (X, then Y, then Z)
    pub fn rotate(&mut self, x: f32, y: f32, z: f32) {
        self.multiply(&Mat4::rotation_x(x.to_radians()));
        self.multiply(&Mat4::rotation_y(y.to_radians()));
        self.multiply(&Mat4::rotation_z(z.to_radians()));
    }
}

impl Default for MatrixStack {
    fn default() -> Self {
        Self::new(100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rasterizer::math::Vec3;

    #[test]
    fn test_pop_restores_pushed_matrix() {
        let mut stack = MatrixStack::new(8);
        stack.scale(2.0, 3.0, 4.0);
        stack.rotate(12.0, 34.0, 56.0);
        let before = *stack.top();

        stack.push().unwrap();
        stack.translate(5.0, 6.0, 7.0);
        stack.rotate(-90.0, 45.0, 10.0);
        stack.push().unwrap();
        stack.scale(0.5, 0.5, 0.5);
        stack.pop().unwrap();
        stack.load_identity();
        stack.pop().unwrap();

        assert_eq!(*stack.top(), before);
    }

    #[test]
    fn test_overflow_and_underflow() {
        let mut stack = MatrixStack::new(2);
        assert_eq!(stack.pop(), Err(RenderError::MatrixStackUnderflow));
        stack.push().unwrap();
        assert_eq!(stack.push(), Err(RenderError::MatrixStackOverflow { capacity: 2 }));
        assert_eq!(stack.depth(), 2);
    }

    #[test]
    fn test_translate_negates_y() {
        let mut stack = MatrixStack::default();
        stack.translate(1.0, 2.0, 3.0);
        assert_eq!(stack.top().origin(), Vec3::new(1.0, -2.0, 3.0));
    }

    #[test]
    fn test_translate_is_in_scaled_units() {
        let mut stack = MatrixStack::default();
        stack.scale(50.0, 50.0, 50.0);
        stack.translate(0.0, 0.0, 8.0);
        let p = stack.top().transform_point(Vec3::new(1.0, 0.0, 0.0));
        assert!((p - Vec3::new(50.0, 0.0, 400.0)).len() < 1e-3);
    }

    #[test]
    fn test_rotate_matches_euler_matrix() {
        let mut stack = MatrixStack::default();
        stack.rotate(-30.0, 75.0, 10.0);
        let expected = Mat4::rotation(-30.0, 75.0, 10.0);
        for (a, b) in stack.top().m.iter().zip(expected.m.iter()) {
            assert!((a - b).abs() < 1e-6);
        }
    }
}
