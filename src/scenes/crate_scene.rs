//! Rotating lit crate with an orbiting light sprite

use std::rc::Rc;

use macroquad::rand::gen_range;

use super::{crate_texture, glow_texture, load_texture_or, Scene};
use crate::rasterizer::{RenderError, RenderFlags, Renderer, Texture, Topology};

const LIGHT_COUNT: usize = 1;

/// Degrees of rotation per second
const SPIN_RATE: f32 = 16.0;

pub struct CrateScene {
    crate_tex: Rc<Texture>,
    light_tex: Rc<Texture>,
    lights: Vec<[f32; 3]>,
}

impl CrateScene {
    pub fn new() -> Self {
        let lights = (0..LIGHT_COUNT)
            .map(|_| [10.0 * (1.5 - gen_range(0.0f32, 1.0)), 0.0, 0.0])
            .collect();

        Self {
            crate_tex: load_texture_or("assets/textures/crate.jpg", || crate_texture(64)),
            light_tex: load_texture_or("assets/textures/star.png", || glow_texture(32)),
            lights,
        }
    }
}

impl Default for CrateScene {
    fn default() -> Self {
        Self::new()
    }
}

/// Unit square in the XY plane, facing the viewer
fn draw_quad(r: &mut Renderer) -> Result<(), RenderError> {
    r.begin(Topology::TriangleStrip)?;
    r.tex_coord(0.0, 1.0);
    r.vertex(-1.0, 1.0, 0.0)?;
    r.tex_coord(0.0, 0.0);
    r.vertex(-1.0, -1.0, 0.0)?;
    r.tex_coord(1.0, 1.0);
    r.vertex(1.0, 1.0, 0.0)?;
    r.tex_coord(1.0, 0.0);
    r.vertex(1.0, -1.0, 0.0)?;
    r.end()?;
    Ok(())
}

/// Cube of side 2: four walls as a quad strip, then top and bottom as quads
fn draw_cube(r: &mut Renderer) -> Result<(), RenderError> {
    const WALLS: [([f32; 2], [f32; 3]); 10] = [
        ([0.0, 0.0], [-1.0, -1.0, -1.0]),
        ([0.0, 1.0], [-1.0, 1.0, -1.0]),
        ([1.0, 0.0], [1.0, -1.0, -1.0]),
        ([1.0, 1.0], [1.0, 1.0, -1.0]),
        ([0.0, 0.0], [1.0, -1.0, 1.0]),
        ([0.0, 1.0], [1.0, 1.0, 1.0]),
        ([1.0, 0.0], [-1.0, -1.0, 1.0]),
        ([1.0, 1.0], [-1.0, 1.0, 1.0]),
        ([0.0, 0.0], [-1.0, -1.0, -1.0]),
        ([0.0, 1.0], [-1.0, 1.0, -1.0]),
    ];
    const CAPS: [([f32; 2], [f32; 3]); 8] = [
        ([1.0, 0.0], [1.0, 1.0, -1.0]),
        ([0.0, 0.0], [-1.0, 1.0, -1.0]),
        ([0.0, 1.0], [-1.0, 1.0, 1.0]),
        ([1.0, 1.0], [1.0, 1.0, 1.0]),
        ([1.0, 0.0], [1.0, -1.0, -1.0]),
        ([0.0, 0.0], [-1.0, -1.0, -1.0]),
        ([0.0, 1.0], [-1.0, -1.0, 1.0]),
        ([1.0, 1.0], [1.0, -1.0, 1.0]),
    ];

    // Unlit base color; all shading comes from lights and ambient
    r.color4(0.0, 0.0, 0.0, 1.0);
    for (topology, verts) in [(Topology::QuadStrip, &WALLS[..]), (Topology::Quads, &CAPS[..])] {
        r.begin(topology)?;
        for ([u, v], [x, y, z]) in verts {
            r.tex_coord(*u, *v);
            r.vertex(*x, *y, *z)?;
        }
        r.end()?;
    }
    Ok(())
}

impl Scene for CrateScene {
    fn name(&self) -> &'static str {
        "crate"
    }

    fn draw(&mut self, r: &mut Renderer, time: f32) -> Result<(), RenderError> {
        let ticks = time * SPIN_RATE;

        r.clear_screen(0.0, 0.0, 0.0)?;
        r.clear_depth();
        r.clear_lights();

        r.load_identity();
        r.scale(50.0, 50.0, 50.0);
        r.translate(0.0, 0.0, 8.0);

        // Lights orbit the crate
        r.push()?;
        r.rotate(0.0, ticks, 0.0);
        for &[x, y, z] in &self.lights {
            r.push()?;
            r.translate(x, y, z);
            r.light(1.0, 1.0, 1.0)?;
            r.pop()?;
        }
        r.pop()?;

        r.push()?;
        r.rotate(-30.0, ticks, 0.0);
        r.disable(RenderFlags::BLENDING);
        r.enable(RenderFlags::LIGHTING | RenderFlags::CULLING | RenderFlags::DEPTH_TEST);
        r.set_ambient(0.1, 0.1, 0.1);
        r.set_texture(Some(Rc::clone(&self.crate_tex)));
        draw_cube(r)?;
        r.pop()?;

        // Sprites at the light positions, turned back to face the viewer
        r.push()?;
        r.rotate(0.0, ticks, 0.0);
        for &[x, y, z] in &self.lights {
            r.push()?;
            r.translate(x, y, z);
            r.rotate(0.0, -ticks, 0.0);
            r.scale(0.5, 0.5, 0.5);
            r.disable(RenderFlags::CULLING | RenderFlags::LIGHTING);
            r.enable(RenderFlags::BLENDING | RenderFlags::DEPTH_TEST);
            r.set_ambient(1.0, 1.0, 1.0);
            r.set_texture(Some(Rc::clone(&self.light_tex)));
            r.color(1.0, 1.0, 1.0);
            draw_quad(r)?;
            r.pop()?;
        }
        r.pop()?;

        Ok(())
    }
}
