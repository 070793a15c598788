//! Core types for the rasterizer

use super::math::{Vec2, Vec3};
use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// RGBA color (0-255 per channel), the texel and pixel representation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0, a: 255 };
    pub const WHITE: Color = Color { r: 255, g: 255, b: 255, a: 255 };
    pub const TRANSPARENT: Color = Color { r: 0, g: 0, b: 0, a: 0 };

    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub fn with_alpha(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Normalized float channels
    pub fn to_rgba(self) -> Rgba {
        Rgba {
            r: self.r as f32 / 255.0,
            g: self.g as f32 / 255.0,
            b: self.b as f32 / 255.0,
            a: self.a as f32 / 255.0,
        }
    }

    /// Convert to [u8; 4] in RGBA order
    pub fn to_bytes(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Floating-point color used for vertex attributes, lights and ambient glow.
///
/// Channels are not clamped; lighting accumulates past 1.0 and the pixel
/// pipeline saturates on write.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Default for Rgba {
    fn default() -> Self {
        Self::WHITE
    }
}

impl Rgba {
    pub const WHITE: Rgba = Rgba { r: 1.0, g: 1.0, b: 1.0, a: 1.0 };
    pub const BLACK: Rgba = Rgba { r: 0.0, g: 0.0, b: 0.0, a: 1.0 };

    pub fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub fn lerp(self, other: Rgba, t: f32) -> Rgba {
        Rgba {
            r: self.r + (other.r - self.r) * t,
            g: self.g + (other.g - self.g) * t,
            b: self.b + (other.b - self.b) * t,
            a: self.a + (other.a - self.a) * t,
        }
    }

    /// Quantize to 8 bits per channel, saturating
    pub fn to_color(self) -> Color {
        fn quantize(c: f32) -> u8 {
            (c.clamp(0.0, 1.0) * 255.0).round() as u8
        }
        Color {
            r: quantize(self.r),
            g: quantize(self.g),
            b: quantize(self.b),
            a: quantize(self.a),
        }
    }
}

/// A vertex in view space with everything the rasterizer interpolates
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vertex {
    pub pos: Vec3,
    pub normal: Vec3,
    pub color: Rgba,
    pub uv: Vec2,
}

impl Vertex {
    pub fn new(pos: Vec3, normal: Vec3, color: Rgba, uv: Vec2) -> Self {
        Self { pos, normal, color, uv }
    }

    pub fn from_pos(x: f32, y: f32, z: f32) -> Self {
        Self {
            pos: Vec3::new(x, y, z),
            normal: Vec3::ZERO,
            color: Rgba::WHITE,
            uv: Vec2::default(),
        }
    }

    /// Interpolate every attribute at parameter `t` (0 = self, 1 = other)
    pub fn lerp(&self, other: &Vertex, t: f32) -> Vertex {
        Vertex {
            pos: self.pos.lerp(other.pos, t),
            normal: self.normal.lerp(other.normal, t),
            color: self.color.lerp(other.color, t),
            uv: self.uv.lerp(other.uv, t),
        }
    }
}

/// A triangle face (indices into the batch's vertex array)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Face {
    pub v0: usize,
    pub v1: usize,
    pub v2: usize,
    /// Filled in by the culling stage
    pub normal: Vec3,
}

impl Face {
    pub fn new(v0: usize, v1: usize, v2: usize) -> Self {
        Self {
            v0,
            v1,
            v2,
            normal: Vec3::ZERO,
        }
    }

    pub fn indices(&self) -> [usize; 3] {
        [self.v0, self.v1, self.v2]
    }
}

/// Point light; position is fixed when the light is declared
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    pub position: Vec3,
    pub color: Rgba,
}

/// How a primitive batch is grouped into triangles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Topology {
    None,
    Points,
    Lines,
    Triangles,
    TriangleStrip,
    TriangleFan,
    Quads,
    /// Assembled exactly like `TriangleStrip`
    QuadStrip,
}

/// Texture sampling mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SamplingMode {
    Solid,    // Opaque white, texture ignored
    Nearest,  // Point sampling with wraparound
    Bilinear, // 2x2 filter with wraparound
}

/// Where the lighting stage gets vertex normals from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum NormalMode {
    /// Direction from the batch centroid to the vertex
    #[default]
    Auto,
    /// The pen normal, rotated by the matrix current at `vertex()`
    Explicit,
}

/// Per-batch options passed to `Renderer::begin_with`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BatchOptions {
    pub normals: NormalMode,
}

bitflags! {
    /// Render state toggles, read at `end()`
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct RenderFlags: u32 {
        const DEPTH_TEST = 0x01;
        const LIGHTING   = 0x02;
        const BLENDING   = 0x04;
        const CULLING    = 0x08;
    }
}

/// Simple texture (array of colors)
#[derive(Debug, Clone)]
pub struct Texture {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<Color>,
    pub name: String,
}

impl Texture {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::WHITE; width * height],
            name: String::new(),
        }
    }

    /// Single-color texture
    pub fn solid(width: usize, height: usize, color: Color) -> Self {
        Self {
            width,
            height,
            pixels: vec![color; width * height],
            name: "solid".to_string(),
        }
    }

    /// Load texture from an image file (PNG, JPEG or BMP)
    pub fn from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, String> {
        let path = path.as_ref();
        let img = image::open(path)
            .map_err(|e| format!("Failed to load {}: {}", path.display(), e))?;

        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();

        Ok(Self::from_image(img, name))
    }

    /// Load texture from raw encoded image bytes
    pub fn from_bytes(bytes: &[u8], name: String) -> Result<Self, String> {
        let img = image::load_from_memory(bytes)
            .map_err(|e| format!("Failed to decode image: {}", e))?;
        Ok(Self::from_image(img, name))
    }

    fn from_image(img: image::DynamicImage, name: String) -> Self {
        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();

        let pixels: Vec<Color> = rgba
            .pixels()
            .map(|p| Color::with_alpha(p[0], p[1], p[2], p[3]))
            .collect();

        Self {
            width: width as usize,
            height: height as usize,
            pixels,
            name,
        }
    }

    /// Create a checkerboard test texture
    pub fn checkerboard(width: usize, height: usize, color1: Color, color2: Color) -> Self {
        let mut pixels = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                let checker = ((x / 4) + (y / 4)) % 2 == 0;
                pixels.push(if checker { color1 } else { color2 });
            }
        }
        Self { width, height, pixels, name: "checkerboard".to_string() }
    }

    /// Texel with wraparound in both directions
    pub fn texel_wrapped(&self, x: i64, y: i64) -> Color {
        let tx = x.rem_euclid(self.width as i64) as usize;
        let ty = y.rem_euclid(self.height as i64) as usize;
        self.pixels[ty * self.width + tx]
    }

    /// Nearest-neighbor sample; `u`, `v` in [0, 1] span the texture once
    pub fn sample_nearest(&self, u: f32, v: f32) -> Color {
        let tx = (u * (self.width - 1) as f32).floor() as i64;
        let ty = (v * (self.height - 1) as f32).floor() as i64;
        self.texel_wrapped(tx, ty)
    }

    /// Bilinear sample over the same texel grid as `sample_nearest`
    pub fn sample_bilinear(&self, u: f32, v: f32) -> Rgba {
        let fx = u * (self.width - 1) as f32;
        let fy = v * (self.height - 1) as f32;
        let x0 = fx.floor();
        let y0 = fy.floor();
        let xd = fx - x0;
        let yd = fy - y0;
        let (x0, y0) = (x0 as i64, y0 as i64);

        let c00 = self.texel_wrapped(x0, y0).to_rgba();
        let c10 = self.texel_wrapped(x0 + 1, y0).to_rgba();
        let c01 = self.texel_wrapped(x0, y0 + 1).to_rgba();
        let c11 = self.texel_wrapped(x0 + 1, y0 + 1).to_rgba();

        let top = c00.lerp(c10, xd);
        let bottom = c01.lerp(c11, xd);
        top.lerp(bottom, yd)
    }

    /// Get pixel at x,y coordinates
    pub fn get_pixel(&self, x: usize, y: usize) -> Color {
        if x < self.width && y < self.height {
            self.pixels[y * self.width + x]
        } else {
            Color::BLACK
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgba_quantize_saturates() {
        let c = Rgba::new(1.7, -0.2, 0.2, 1.0).to_color();
        assert_eq!(c, Color::with_alpha(255, 0, 51, 255));
    }

    #[test]
    fn test_vertex_lerp_all_attributes() {
        let a = Vertex::new(Vec3::new(0.0, 0.0, 10.0), Vec3::new(1.0, 0.0, 0.0), Rgba::BLACK, Vec2::new(0.0, 0.0));
        let b = Vertex::new(Vec3::new(2.0, 4.0, 20.0), Vec3::new(0.0, 1.0, 0.0), Rgba::WHITE, Vec2::new(1.0, 2.0));
        let m = a.lerp(&b, 0.5);
        assert_eq!(m.pos, Vec3::new(1.0, 2.0, 15.0));
        assert_eq!(m.normal, Vec3::new(0.5, 0.5, 0.0));
        assert!((m.color.r - 0.5).abs() < 1e-6);
        assert_eq!(m.uv, Vec2::new(0.5, 1.0));
    }

    #[test]
    fn test_nearest_wraps() {
        let mut tex = Texture::new(4, 4);
        tex.pixels[0] = Color::new(9, 9, 9);
        assert_eq!(tex.sample_nearest(0.0, 0.0), Color::new(9, 9, 9));
        assert_eq!(tex.texel_wrapped(4, -4), Color::new(9, 9, 9));
        assert_eq!(tex.texel_wrapped(-1, 0), tex.pixels[3]);
    }

    #[test]
    fn test_bilinear_midpoint() {
        let mut tex = Texture::solid(2, 2, Color::BLACK);
        tex.pixels[1] = Color::WHITE;
        // Halfway between texel (0,0) and (1,0) on the top row
        let c = tex.sample_bilinear(0.5, 0.0);
        assert!((c.r - 0.5).abs() < 1e-3);
    }

    #[test]
    fn test_checkerboard_pattern() {
        let tex = Texture::checkerboard(8, 8, Color::WHITE, Color::BLACK);
        assert_eq!(tex.get_pixel(0, 0), Color::WHITE);
        assert_eq!(tex.get_pixel(4, 0), Color::BLACK);
        assert_eq!(tex.get_pixel(100, 0), Color::BLACK);
    }
}
