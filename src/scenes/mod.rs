//! Demo scenes driven through the immediate-mode API

mod crate_scene;
mod stars;

pub use crate_scene::CrateScene;
pub use stars::StarsScene;

use std::path::Path;
use std::rc::Rc;

use log::{info, warn};

use crate::rasterizer::{Color, RenderError, Renderer, Texture};

/// Something that draws one frame into a renderer
pub trait Scene {
    fn name(&self) -> &'static str;

    /// Draw a frame. `time` is seconds since the scene started.
    fn draw(&mut self, r: &mut Renderer, time: f32) -> Result<(), RenderError>;
}

/// Scene names accepted by `scene_by_name`
pub const SCENE_NAMES: &[&str] = &["crate", "stars"];

pub fn scene_by_name(name: &str) -> Option<Box<dyn Scene>> {
    match name {
        "crate" => Some(Box::new(CrateScene::new())),
        "stars" => Some(Box::new(StarsScene::new())),
        _ => None,
    }
}

/// Load an image from disk, or build `fallback` if it cannot be read
pub fn load_texture_or<P: AsRef<Path>>(path: P, fallback: impl FnOnce() -> Texture) -> Rc<Texture> {
    match Texture::from_file(path.as_ref()) {
        Ok(tex) => {
            info!("Loaded texture {} ({}x{})", path.as_ref().display(), tex.width, tex.height);
            Rc::new(tex)
        }
        Err(e) => {
            warn!("{}, using generated texture", e);
            Rc::new(fallback())
        }
    }
}

/// Soft round sprite: white, alpha falling off from the center
pub fn glow_texture(size: usize) -> Texture {
    let mut tex = Texture::new(size, size);
    let half = size as f32 * 0.5;
    for y in 0..size {
        for x in 0..size {
            let dx = (x as f32 + 0.5 - half) / half;
            let dy = (y as f32 + 0.5 - half) / half;
            let d = (dx * dx + dy * dy).sqrt();
            let a = (1.0 - d).clamp(0.0, 1.0);
            // Squared falloff keeps a bright core
            let a = (a * a * 255.0).round() as u8;
            tex.pixels[y * size + x] = Color::with_alpha(255, 255, 255, a);
        }
    }
    tex.name = "glow".to_string();
    tex
}

/// Wood-ish checkerboard standing in for the crate image
pub fn crate_texture(size: usize) -> Texture {
    let mut tex = Texture::checkerboard(size, size, Color::new(168, 120, 60), Color::new(120, 80, 36));
    // Dark frame around the border
    let border = (size / 16).max(1);
    for y in 0..size {
        for x in 0..size {
            if x < border || y < border || x >= size - border || y >= size - border {
                tex.pixels[y * size + x] = Color::new(60, 40, 20);
            }
        }
    }
    tex.name = "crate".to_string();
    tex
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scene_lookup() {
        for name in SCENE_NAMES {
            assert_eq!(scene_by_name(name).map(|s| s.name()), Some(*name));
        }
        assert!(scene_by_name("teapot").is_none());
    }

    #[test]
    fn test_glow_fades_to_transparent_edge() {
        let tex = glow_texture(16);
        assert_eq!(tex.get_pixel(0, 0).a, 0);
        assert!(tex.get_pixel(8, 8).a > 200);
    }

    #[test]
    fn test_missing_file_uses_fallback() {
        let tex = load_texture_or("does/not/exist.png", || crate_texture(32));
        assert_eq!(tex.name, "crate");
        assert_eq!(tex.width, 32);
    }
}
