//! Blended star field spiralling into the center

use std::rc::Rc;

use macroquad::rand::gen_range;

use super::{glow_texture, load_texture_or, Scene};
use crate::rasterizer::{RenderError, RenderFlags, Renderer, SamplingMode, Texture, Topology};

const STAR_COUNT: usize = 20;
const MAX_DIST: f32 = 5.0;
const ZOOM: f32 = -15.0;
const TILT: f32 = 25.0;

#[derive(Debug, Clone, Copy)]
struct Star {
    color: [f32; 3],
    dist: f32,
    start: f32,
    angle: f32,
}

fn random_color() -> [f32; 3] {
    [gen_range(0.0, 1.0), gen_range(0.0, 1.0), gen_range(0.0, 1.0)]
}

pub struct StarsScene {
    texture: Rc<Texture>,
    stars: Vec<Star>,
    spin: f32,
    frame: u32,
    /// Draw a second, unspun copy of each star in another star's color
    pub twinkle: bool,
}

impl StarsScene {
    pub fn new() -> Self {
        let stars = (0..STAR_COUNT)
            .map(|i| {
                let dist = i as f32 / STAR_COUNT as f32 * MAX_DIST;
                Star { color: random_color(), dist, start: dist, angle: 0.0 }
            })
            .collect();

        Self {
            texture: load_texture_or("assets/textures/star.png", || glow_texture(32)),
            stars,
            spin: 0.0,
            frame: 0,
            twinkle: false,
        }
    }

    /// Advance one star along its spiral, respawning it at the rim
    fn step_star(&mut self, i: usize) {
        self.spin += 0.01;
        let star = &mut self.stars[i];
        star.angle += i as f32 / STAR_COUNT as f32;
        star.dist -= 0.01;
        if star.dist < 0.0 {
            star.dist += MAX_DIST;
            star.start = star.dist;
            star.color = random_color();
        }
    }
}

impl Default for StarsScene {
    fn default() -> Self {
        Self::new()
    }
}

fn draw_sprite(r: &mut Renderer) -> Result<(), RenderError> {
    r.begin(Topology::Quads)?;
    r.tex_coord(0.0, 0.0);
    r.vertex(-1.0, -1.0, 0.0)?;
    r.tex_coord(1.0, 0.0);
    r.vertex(1.0, -1.0, 0.0)?;
    r.tex_coord(1.0, 1.0);
    r.vertex(1.0, 1.0, 0.0)?;
    r.tex_coord(0.0, 1.0);
    r.vertex(-1.0, 1.0, 0.0)?;
    r.end()?;
    Ok(())
}

impl Scene for StarsScene {
    fn name(&self) -> &'static str {
        "stars"
    }

    fn draw(&mut self, r: &mut Renderer, _time: f32) -> Result<(), RenderError> {
        let frame = self.frame as f32;

        r.set_sampling(SamplingMode::Nearest);
        r.set_texture(Some(Rc::clone(&self.texture)));
        r.enable(RenderFlags::BLENDING);
        r.disable(RenderFlags::LIGHTING | RenderFlags::CULLING | RenderFlags::DEPTH_TEST);

        r.clear_screen(0.0, 0.0, 0.0)?;
        r.clear_depth();

        r.load_identity();
        r.translate(0.0, 0.0, 1400.0);
        r.set_ambient(0.0, 0.0, 0.0);
        r.scale(50.0, 50.0, 50.0);

        for i in 0..STAR_COUNT {
            let star = self.stars[i];
            r.push()?;

            r.translate(0.0, 0.0, ZOOM);

            // Whole field tumbles
            r.rotate(0.0, 0.0, frame / 4.0);
            r.rotate(0.0, frame, 0.0);
            r.rotate(frame / 2.0, 0.0, 0.0);

            r.rotate(TILT, 0.0, 0.0);
            r.rotate(0.0, star.angle, 0.0);
            r.translate(star.dist, 0.0, 0.0);

            // Undo every rotation so the sprite faces the viewer
            r.rotate(0.0, -star.angle, 0.0);
            r.rotate(-TILT, 0.0, 0.0);
            r.rotate(-frame / 2.0, 0.0, 0.0);
            r.rotate(0.0, -frame, 0.0);
            r.rotate(0.0, 0.0, -frame / 4.0);

            if self.twinkle {
                let [cr, cg, cb] = self.stars[STAR_COUNT - i - 1].color;
                r.color(cr, cg, cb);
                draw_sprite(r)?;
            }

            r.rotate(0.0, 0.0, self.spin);

            // Fade in at the rim and out at the center
            let brightness = ((star.start - star.dist) * star.dist).min(1.0);
            let [cr, cg, cb] = star.color;
            r.color4(cr, cg, cb, brightness);
            draw_sprite(r)?;

            self.step_star(i);
            r.pop()?;
        }

        self.frame += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RenderConfig;
    use crate::rasterizer::Framebuffer;

    #[test]
    fn test_stars_spiral_inward_and_respawn() {
        let mut scene = StarsScene::new();
        scene.stars[0].dist = 0.005;
        scene.step_star(0);
        assert!((scene.stars[0].dist - (MAX_DIST - 0.005)).abs() < 1e-4);
        assert_eq!(scene.stars[0].start, scene.stars[0].dist);

        let before = scene.stars[3].dist;
        scene.step_star(3);
        assert!((scene.stars[3].dist - (before - 0.01)).abs() < 1e-6);
    }

    #[test]
    fn test_frame_renders_without_error() {
        let mut r = Renderer::new(RenderConfig::default());
        r.set_screen(Framebuffer::new(160, 120)).unwrap();
        let mut scene = StarsScene::new();
        scene.twinkle = true;
        for _ in 0..5 {
            scene.draw(&mut r, 0.0).unwrap();
        }
        assert_eq!(r.stack_depth(), 1);
        assert_eq!(scene.frame, 5);
        assert_eq!(r.stats().batches, 5 * STAR_COUNT * 2);
    }
}
