//! Projection and scanline triangle rasterization
//!
//! Triangles are split at the middle vertex into a top and a bottom half
//! and walked one scanline at a time. Attributes are divided by depth at
//! projection time and carried next to 1/z, so plain linear stepping along
//! edges and spans stays perspective-correct once each pixel divides the
//! attributes back by its interpolated 1/z.

use super::math::{Vec2, Vec3};
use super::pixel::{Fragment, PixelPipeline};
use super::surface::{DepthBuffer, Framebuffer};
use super::types::{Rgba, Vertex};

const X: usize = 0;
const INV_Z: usize = 1;
const U: usize = 2;
const V: usize = 3;
const R: usize = 4;
const G: usize = 5;
const B: usize = 6;
const A: usize = 7;
const COUNT: usize = 8;

/// Projected coordinates are clamped to this before conversion to pixels,
/// keeping every row and column difference well inside `i64`
const COORD_LIMIT: f32 = (1u64 << 40) as f32;

fn pixel_coord(v: f32) -> i64 {
    v.clamp(-COORD_LIMIT, COORD_LIMIT) as i64
}

/// Linearly interpolated quantities: screen x, 1/z and attributes over z
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct Varyings([f32; COUNT]);

impl Varyings {
    /// Per-step delta to get from `from` to `to` in `steps` steps
    fn step(from: &Varyings, to: &Varyings, steps: i64) -> Varyings {
        let n = steps as f32;
        let mut out = [0.0; COUNT];
        for (i, o) in out.iter_mut().enumerate() {
            *o = (to.0[i] - from.0[i]) / n;
        }
        Varyings(out)
    }

    fn advance(&mut self, step: &Varyings) {
        for (v, s) in self.0.iter_mut().zip(step.0.iter()) {
            *v += s;
        }
    }

    fn advanced(mut self, step: &Varyings, times: i64) -> Varyings {
        if times != 0 {
            let k = times as f32;
            for (v, s) in self.0.iter_mut().zip(step.0.iter()) {
                *v += k * s;
            }
        }
        self
    }

    fn fragment(&self) -> Fragment {
        let inv_z = self.0[INV_Z];
        let z = 1.0 / inv_z;
        Fragment {
            inv_z,
            uv: Vec2::new(self.0[U] * z, self.0[V] * z),
            color: Rgba::new(self.0[R] * z, self.0[G] * z, self.0[B] * z, self.0[A] * z),
        }
    }
}

/// A vertex in screen space
#[derive(Debug, Clone, Copy)]
struct Projected {
    y: f32,
    v: Varyings,
}

impl Projected {
    fn x(&self) -> f32 {
        self.v.0[X]
    }
}

/// Screen position of a view-space point: a fixed perspective whose scale is
/// `(width + height) / 2` pixels per unit of x/z, centered on the surface,
/// with y flipped to a top-left origin.
pub fn screen_position(p: Vec3, width: usize, height: usize) -> (f32, f32) {
    let inv_z = 1.0 / p.z;
    let (w, h) = (width as f32, height as f32);
    let x = (w + (w + h) * p.x * inv_z) * 0.5;
    let y = (h + (w + h) * -p.y * inv_z) * 0.5;
    (x, y)
}

fn project(vertex: &Vertex, width: usize, height: usize) -> Projected {
    let inv_z = 1.0 / vertex.pos.z;
    let (x, y) = screen_position(vertex.pos, width, height);

    let mut v = [0.0; COUNT];
    v[X] = x;
    v[INV_Z] = inv_z;
    v[U] = vertex.uv.x * inv_z;
    v[V] = vertex.uv.y * inv_z;
    v[R] = vertex.color.r * inv_z;
    v[G] = vertex.color.g * inv_z;
    v[B] = vertex.color.b * inv_z;
    v[A] = vertex.color.a * inv_z;

    Projected { y, v: Varyings(v) }
}

/// Rasterize one view-space triangle (already clipped to the near plane).
///
/// Returns false when the triangle was rejected without touching any pixel
/// row: entirely off either side, a single pixel column wide, or flat in y.
pub fn draw_triangle(
    fb: &mut Framebuffer,
    depth: &mut DepthBuffer,
    pipeline: &PixelPipeline,
    p: &Vertex,
    q: &Vertex,
    r: &Vertex,
) -> bool {
    let width = fb.width as i64;
    let height = fb.height as i64;

    let mut a = project(p, fb.width, fb.height);
    let mut b = project(q, fb.width, fb.height);
    let mut c = project(r, fb.width, fb.height);

    // Trivial rejects
    if a.x() < 0.0 && b.x() < 0.0 && c.x() < 0.0 {
        return false;
    }
    let w = width as f32;
    if a.x() >= w && b.x() >= w && c.x() >= w {
        return false;
    }
    if pixel_coord(a.x()) == pixel_coord(b.x()) && pixel_coord(a.x()) == pixel_coord(c.x()) {
        return false;
    }

    // Sort top to bottom
    if a.y > b.y {
        std::mem::swap(&mut a, &mut b);
    }
    if a.y > c.y {
        std::mem::swap(&mut a, &mut c);
    }
    if b.y > c.y {
        std::mem::swap(&mut b, &mut c);
    }

    let beg_y = pixel_coord(a.y);
    let cen_y = pixel_coord(b.y);
    let end_y = pixel_coord(c.y);

    if end_y == beg_y || end_y < 0 || beg_y >= height {
        return false;
    }

    // Long edge a -> c spans the whole triangle
    let long_step = Varyings::step(&a.v, &c.v, end_y - beg_y);
    let (mut long, mut y) = if beg_y < 0 {
        (a.v.advanced(&long_step, -beg_y), 0)
    } else {
        (a.v, beg_y)
    };

    // Top half: a -> b
    if y < cen_y {
        let short_step = Varyings::step(&a.v, &b.v, cen_y - beg_y);
        let mut short = a.v.advanced(&short_step, y - beg_y);
        let stop = cen_y.min(height);
        while y < stop {
            draw_span(fb, depth, pipeline, y, &short, &long);
            short.advance(&short_step);
            long.advance(&long_step);
            y += 1;
        }
    }

    // Bottom half: b -> c
    if cen_y < end_y {
        let short_step = Varyings::step(&b.v, &c.v, end_y - cen_y);
        let mut short = b.v.advanced(&short_step, y - cen_y);
        let stop = end_y.min(height);
        while y < stop {
            draw_span(fb, depth, pipeline, y, &short, &long);
            short.advance(&short_step);
            long.advance(&long_step);
            y += 1;
        }
    }

    true
}

/// Fill one scanline between two edge positions
fn draw_span(
    fb: &mut Framebuffer,
    depth: &mut DepthBuffer,
    pipeline: &PixelPipeline,
    y: i64,
    e0: &Varyings,
    e1: &Varyings,
) {
    let (left, right) = if e0.0[X] > e1.0[X] { (e1, e0) } else { (e0, e1) };

    let start_x = pixel_coord(left.0[X]);
    let end_x = pixel_coord(right.0[X]);
    if start_x >= end_x {
        return;
    }

    let step = Varyings::step(left, right, end_x - start_x);
    let (mut cur, mut x) = if start_x < 0 {
        (left.advanced(&step, -start_x), 0)
    } else {
        (*left, start_x)
    };
    let end_x = end_x.min(fb.width as i64);

    while x < end_x {
        let frag = cur.fragment();
        pipeline.write(fb, depth, x as usize, y as usize, &frag);
        cur.advance(&step);
        x += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rasterizer::types::{Color, RenderFlags, SamplingMode};

    const W: usize = 64;
    const H: usize = 48;

    fn solid() -> PixelPipeline<'static> {
        PixelPipeline::new(RenderFlags::empty(), SamplingMode::Solid, None, Rgba::WHITE)
    }

    fn colored(x: f32, y: f32, z: f32, color: Rgba) -> Vertex {
        let mut v = Vertex::from_pos(x, y, z);
        v.color = color;
        v
    }

    fn count_color(fb: &Framebuffer, color: Color) -> usize {
        let mut n = 0;
        for y in 0..fb.height {
            for x in 0..fb.width {
                if fb.get_pixel(x, y) == color {
                    n += 1;
                }
            }
        }
        n
    }

    #[test]
    fn test_center_axis_maps_to_screen_center() {
        let (x, y) = screen_position(Vec3::new(0.0, 0.0, 250.0), W, H);
        assert_eq!((x, y), (32.0, 24.0));
    }

    #[test]
    fn test_near_plane_vertex_projects_finite_and_signed() {
        let (x, y) = screen_position(Vec3::new(10.0, 10.0, 100.0), W, H);
        assert!(x.is_finite() && y.is_finite());
        // Right of center, and above it since y grows downward on screen
        assert!(x > 32.0);
        assert!(y < 24.0);
    }

    #[test]
    fn test_triangle_fills_pixels() {
        let mut fb = Framebuffer::new(W, H);
        let mut depth = DepthBuffer::new(W, H);
        let red = Rgba::rgb(1.0, 0.0, 0.0);
        let drawn = draw_triangle(
            &mut fb,
            &mut depth,
            &solid(),
            &colored(-40.0, -40.0, 200.0, red),
            &colored(40.0, -40.0, 200.0, red),
            &colored(0.0, 40.0, 200.0, red),
        );
        assert!(drawn);
        assert!(count_color(&fb, Color::new(255, 0, 0)) > 50);
    }

    #[test]
    fn test_offscreen_triangle_is_rejected() {
        let mut fb = Framebuffer::new(W, H);
        let mut depth = DepthBuffer::new(W, H);
        let white = Rgba::WHITE;
        let drawn = draw_triangle(
            &mut fb,
            &mut depth,
            &solid(),
            &colored(-900.0, 0.0, 200.0, white),
            &colored(-800.0, 10.0, 200.0, white),
            &colored(-850.0, 40.0, 200.0, white),
        );
        assert!(!drawn);
        assert_eq!(count_color(&fb, Color::WHITE), 0);
    }

    #[test]
    fn test_extreme_height_triangle_is_clamped() {
        // Projected y lands billions of pixels off screen in both directions
        let mut fb = Framebuffer::new(W, H);
        let mut depth = DepthBuffer::new(W, H);
        let white = Rgba::WHITE;
        let drawn = draw_triangle(
            &mut fb,
            &mut depth,
            &solid(),
            &colored(0.0, 1e10, 200.0, white),
            &colored(10.0, 0.0, 200.0, white),
            &colored(0.0, -1e10, 200.0, white),
        );
        assert!(drawn);
        // The sliver between x = 32 and x ~ 34.8 covers every row
        assert_eq!(fb.get_pixel(32, 10), Color::WHITE);
        assert_eq!(fb.get_pixel(32, 40), Color::WHITE);
        assert_eq!(fb.get_pixel(40, 10), Color::TRANSPARENT);
    }

    #[test]
    fn test_pixel_coord_saturates() {
        assert_eq!(pixel_coord(f32::MAX), COORD_LIMIT as i64);
        assert_eq!(pixel_coord(f32::MIN), -(COORD_LIMIT as i64));
        assert_eq!(pixel_coord(-0.5), 0);
        assert_eq!(pixel_coord(31.9), 31);
    }

    #[test]
    fn test_perspective_correct_midpoint() {
        // Edge from z = 100 to z = 300; halfway on screen is at 1/z midway,
        // i.e. z = 150, where u is 0.25 rather than the affine 0.5.
        let mut near = Vertex::from_pos(0.0, 0.0, 100.0);
        near.uv = Vec2::new(0.0, 0.0);
        let mut far = Vertex::from_pos(0.0, 0.0, 300.0);
        far.uv = Vec2::new(1.0, 0.0);

        let a = project(&near, W, H);
        let b = project(&far, W, H);
        let mid = a.v.advanced(&Varyings::step(&a.v, &b.v, 2), 1);
        let frag = mid.fragment();
        assert!((1.0 / frag.inv_z - 150.0).abs() < 1e-2);
        assert!((frag.uv.x - 0.25).abs() < 1e-5);
    }
}
