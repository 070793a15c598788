//! Per-pixel pipeline: depth test, texture sampling, lighting combine, blending
//!
//! Everything here is plain `f32` arithmetic on normalized channels.

use super::math::Vec2;
use super::surface::{DepthBuffer, Framebuffer};
use super::types::{Color, RenderFlags, Rgba, SamplingMode, Texture};

/// Interpolated, perspective-restored values at one pixel
#[derive(Debug, Clone, Copy)]
pub struct Fragment {
    pub inv_z: f32,
    pub uv: Vec2,
    pub color: Rgba,
}

/// Render state snapshot used while rasterizing one batch
#[derive(Debug, Clone, Copy)]
pub struct PixelPipeline<'a> {
    pub flags: RenderFlags,
    pub sampling: SamplingMode,
    pub texture: Option<&'a Texture>,
    pub ambient: Rgba,
}

impl<'a> PixelPipeline<'a> {
    pub fn new(flags: RenderFlags, sampling: SamplingMode, texture: Option<&'a Texture>, ambient: Rgba) -> Self {
        Self { flags, sampling, texture, ambient }
    }

    /// Sampling mode actually in effect; no usable texture means solid
    pub fn effective_sampling(&self) -> SamplingMode {
        match self.texture {
            Some(tex) if !tex.is_empty() => self.sampling,
            _ => SamplingMode::Solid,
        }
    }

    pub fn sample(&self, uv: Vec2) -> Rgba {
        match (self.effective_sampling(), self.texture) {
            (SamplingMode::Nearest, Some(tex)) => tex.sample_nearest(uv.x, uv.y).to_rgba(),
            (SamplingMode::Bilinear, Some(tex)) => tex.sample_bilinear(uv.x, uv.y),
            _ => Rgba::WHITE,
        }
    }

    /// Source color of a fragment before blending, channels clamped to [0, 1].
    ///
    /// Unlit, the texel is modulated by the vertex color: a white pen passes
    /// the texture through unmodified, a solid fill takes the pen color.
    pub fn shade(&self, frag: &Fragment) -> Rgba {
        let texel = self.sample(frag.uv);
        let c = frag.color;

        let (r, g, b) = if self.flags.contains(RenderFlags::LIGHTING) {
            let a = self.ambient;
            (
                texel.r * c.r + texel.r * a.r,
                texel.g * c.g + texel.g * a.g,
                texel.b * c.b + texel.b * a.b,
            )
        } else {
            (texel.r * c.r, texel.g * c.g, texel.b * c.b)
        };

        Rgba {
            r: r.clamp(0.0, 1.0),
            g: g.clamp(0.0, 1.0),
            b: b.clamp(0.0, 1.0),
            a: (texel.a * c.a).clamp(0.0, 1.0),
        }
    }

    /// `src * alpha + dst * (1 - alpha)` on every channel
    pub fn blend(src: Rgba, dst: Color) -> Rgba {
        let d = dst.to_rgba();
        let a = src.a;
        Rgba {
            r: src.r * a + d.r * (1.0 - a),
            g: src.g * a + d.g * (1.0 - a),
            b: src.b * a + d.b * (1.0 - a),
            a: src.a * a + d.a * (1.0 - a),
        }
    }

    /// Run the whole pipeline for one pixel. Returns false if the depth test rejected it.
    pub fn write(&self, fb: &mut Framebuffer, depth: &mut DepthBuffer, x: usize, y: usize, frag: &Fragment) -> bool {
        if self.flags.contains(RenderFlags::DEPTH_TEST) && !depth.test_and_set(x, y, frag.inv_z) {
            return false;
        }

        let src = self.shade(frag);
        let out = if self.flags.contains(RenderFlags::BLENDING) {
            Self::blend(src, fb.get_pixel(x, y))
        } else {
            src
        };

        fb.set_pixel(x, y, out.to_color());
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frag(color: Rgba) -> Fragment {
        Fragment { inv_z: 0.01, uv: Vec2::new(0.0, 0.0), color }
    }

    #[test]
    fn test_solid_unlit_uses_vertex_color() {
        let p = PixelPipeline::new(RenderFlags::empty(), SamplingMode::Solid, None, Rgba::WHITE);
        assert_eq!(p.shade(&frag(Rgba::new(0.2, 0.4, 0.6, 1.0))).to_color(), Color::new(51, 102, 153));
    }

    #[test]
    fn test_unlit_white_pen_passes_texture_through() {
        let tex = Texture::solid(4, 4, Color::with_alpha(10, 200, 30, 255));
        let p = PixelPipeline::new(RenderFlags::empty(), SamplingMode::Nearest, Some(&tex), Rgba::BLACK);
        assert_eq!(p.shade(&frag(Rgba::WHITE)).to_color(), Color::new(10, 200, 30));
    }

    #[test]
    fn test_lit_sums_light_and_ambient_and_clamps() {
        let tex = Texture::solid(2, 2, Color::WHITE);
        let p = PixelPipeline::new(RenderFlags::LIGHTING, SamplingMode::Nearest, Some(&tex), Rgba::rgb(0.2, 0.2, 0.2));
        let out = p.shade(&frag(Rgba::new(0.4, 0.9, 0.0, 1.0)));
        assert!((out.r - 0.6).abs() < 1e-6);
        assert_eq!(out.g, 1.0);
        assert!((out.b - 0.2).abs() < 1e-6);
        assert_eq!(out.a, 1.0);
    }

    #[test]
    fn test_missing_texture_falls_back_to_solid() {
        let p = PixelPipeline::new(RenderFlags::empty(), SamplingMode::Bilinear, None, Rgba::WHITE);
        assert_eq!(p.effective_sampling(), SamplingMode::Solid);
    }

    #[test]
    fn test_blend_extremes() {
        let dst = Color::new(12, 34, 56);
        let opaque = PixelPipeline::blend(Rgba::new(0.2, 0.4, 0.6, 1.0), dst).to_color();
        assert_eq!(opaque, Color::new(51, 102, 153));
        let clear = PixelPipeline::blend(Rgba::new(0.2, 0.4, 0.6, 0.0), dst).to_color();
        assert_eq!(clear, dst);
    }

    #[test]
    fn test_depth_rejects_farther_fragment() {
        let mut fb = Framebuffer::new(1, 1);
        let mut depth = DepthBuffer::new(1, 1);
        let p = PixelPipeline::new(RenderFlags::DEPTH_TEST, SamplingMode::Solid, None, Rgba::WHITE);

        let near = Fragment { inv_z: 1.0 / 100.0, uv: Vec2::default(), color: Rgba::rgb(1.0, 0.0, 0.0) };
        let far = Fragment { inv_z: 1.0 / 300.0, uv: Vec2::default(), color: Rgba::rgb(0.0, 0.0, 1.0) };
        assert!(p.write(&mut fb, &mut depth, 0, 0, &near));
        assert!(!p.write(&mut fb, &mut depth, 0, 0, &far));
        assert_eq!(fb.get_pixel(0, 0), Color::new(255, 0, 0));
    }
}
