//! Render targets: the color surface and the inverse-depth buffer

use super::types::Color;
use serde::{Deserialize, Serialize};

/// Channel order and size of one pixel in a `Framebuffer`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PixelFormat {
    Rgba8888,
    Bgra8888,
    Rgb888,
}

impl PixelFormat {
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            PixelFormat::Rgba8888 | PixelFormat::Bgra8888 => 4,
            PixelFormat::Rgb888 => 3,
        }
    }

    /// Write `color` into the first `bytes_per_pixel` bytes of `dst`
    pub fn pack(self, color: Color, dst: &mut [u8]) {
        match self {
            PixelFormat::Rgba8888 => dst[..4].copy_from_slice(&[color.r, color.g, color.b, color.a]),
            PixelFormat::Bgra8888 => dst[..4].copy_from_slice(&[color.b, color.g, color.r, color.a]),
            PixelFormat::Rgb888 => dst[..3].copy_from_slice(&[color.r, color.g, color.b]),
        }
    }

    pub fn unpack(self, src: &[u8]) -> Color {
        match self {
            PixelFormat::Rgba8888 => Color::with_alpha(src[0], src[1], src[2], src[3]),
            PixelFormat::Bgra8888 => Color::with_alpha(src[2], src[1], src[0], src[3]),
            PixelFormat::Rgb888 => Color::new(src[0], src[1], src[2]),
        }
    }
}

/// Framebuffer for software rendering
#[derive(Debug, Clone)]
pub struct Framebuffer {
    pub pixels: Vec<u8>,
    pub width: usize,
    pub height: usize,
    /// Bytes per row, at least `width * bytes_per_pixel`
    pub pitch: usize,
    pub format: PixelFormat,
}

impl Framebuffer {
    /// Tightly packed RGBA surface
    pub fn new(width: usize, height: usize) -> Self {
        Self::with_format(width, height, PixelFormat::Rgba8888)
    }

    pub fn with_format(width: usize, height: usize, format: PixelFormat) -> Self {
        Self::with_pitch(width, height, width * format.bytes_per_pixel(), format)
    }

    /// Surface with padded rows; `pitch` is raised to the packed row size if smaller
    pub fn with_pitch(width: usize, height: usize, pitch: usize, format: PixelFormat) -> Self {
        let pitch = pitch.max(width * format.bytes_per_pixel());
        Self {
            pixels: vec![0; pitch * height],
            width,
            height,
            pitch,
            format,
        }
    }

    /// Rows fit their pitch and the storage holds every row
    pub fn is_well_formed(&self) -> bool {
        self.pitch >= self.width * self.format.bytes_per_pixel()
            && self.pixels.len() >= self.pitch * self.height
    }

    fn offset(&self, x: usize, y: usize) -> usize {
        y * self.pitch + x * self.format.bytes_per_pixel()
    }

    pub fn clear(&mut self, color: Color) {
        let bpp = self.format.bytes_per_pixel();
        for y in 0..self.height {
            let row = y * self.pitch;
            for x in 0..self.width {
                let idx = row + x * bpp;
                self.format.pack(color, &mut self.pixels[idx..idx + bpp]);
            }
        }
    }

    pub fn set_pixel(&mut self, x: usize, y: usize, color: Color) {
        if x < self.width && y < self.height {
            let idx = self.offset(x, y);
            let bpp = self.format.bytes_per_pixel();
            self.format.pack(color, &mut self.pixels[idx..idx + bpp]);
        }
    }

    pub fn get_pixel(&self, x: usize, y: usize) -> Color {
        if x < self.width && y < self.height {
            let idx = self.offset(x, y);
            self.format.unpack(&self.pixels[idx..])
        } else {
            Color::BLACK
        }
    }

    /// Tightly packed RGBA copy, e.g. for uploading to a GPU texture
    pub fn to_rgba8(&self) -> Vec<u8> {
        if self.format == PixelFormat::Rgba8888 && self.pitch == self.width * 4 {
            return self.pixels.clone();
        }
        let mut out = Vec::with_capacity(self.width * self.height * 4);
        for y in 0..self.height {
            for x in 0..self.width {
                out.extend_from_slice(&self.get_pixel(x, y).to_bytes());
            }
        }
        out
    }
}

/// Per-pixel inverse depth; larger values are closer, 0 is "nothing drawn"
#[derive(Debug, Clone, Default)]
pub struct DepthBuffer {
    values: Vec<f32>,
    width: usize,
    height: usize,
}

impl DepthBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            values: vec![0.0; width * height],
            width,
            height,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.values.clear();
        self.values.resize(width * height, 0.0);
    }

    pub fn clear(&mut self) {
        self.values.fill(0.0);
    }

    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.values[y * self.width + x]
    }

    /// Closer-wins test; stores `inv_z` and returns true if it passes
    pub fn test_and_set(&mut self, x: usize, y: usize, inv_z: f32) -> bool {
        let slot = &mut self.values[y * self.width + x];
        if *slot <= inv_z {
            *slot = inv_z;
            true
        } else {
            false
        }
    }
}
