//! Immediate-mode renderer
//!
//! `Renderer` owns every piece of mutable render state: the matrix stack,
//! the pen, the batch being built, the lights, the target surface and its
//! depth buffer. Drawing follows the begin / vertex* / end pattern; all the
//! heavy lifting (assembly, lighting, culling, clipping, rasterization)
//! happens in `end()`.

use std::rc::Rc;

use log::{debug, info, trace, warn};

use super::assemble::{assemble, used_vertices, validate_batch};
use super::clip::{clip_near, Clipped};
use super::error::RenderError;
use super::lighting::{apply_lighting, centroid, cull_back_faces};
use super::math::{Mat4, Vec2, Vec3};
use super::pixel::PixelPipeline;
use super::raster::draw_triangle;
use super::stack::MatrixStack;
use super::surface::{DepthBuffer, Framebuffer};
use super::types::{
    BatchOptions, Color, Face, Light, NormalMode, RenderFlags, Rgba, SamplingMode, Texture, Topology,
    Vertex,
};
use crate::config::RenderConfig;

/// Attributes stamped onto the next emitted vertex
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pen {
    pub color: Rgba,
    pub normal: Vec3,
    pub uv: Vec2,
}

impl Default for Pen {
    fn default() -> Self {
        Self {
            color: Rgba::WHITE,
            normal: Vec3::ZERO,
            uv: Vec2::default(),
        }
    }
}

/// Counters accumulated across batches until `reset_stats`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub batches: usize,
    pub faces: usize,
    pub culled: usize,
    pub clipped_away: usize,
    pub triangles: usize,
}

#[derive(Debug, Clone, Copy)]
struct OpenBatch {
    topology: Topology,
    options: BatchOptions,
}

pub struct Renderer {
    config: RenderConfig,
    stack: MatrixStack,
    pen: Pen,
    flags: RenderFlags,
    ambient: Rgba,
    near_clip: f32,
    sampling: SamplingMode,
    texture: Option<Rc<Texture>>,
    lights: Vec<Light>,
    batch: Option<OpenBatch>,
    vertices: Vec<Vertex>,
    faces: Vec<Face>,
    screen: Option<Framebuffer>,
    depth: DepthBuffer,
    stats: FrameStats,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(RenderConfig::default())
    }
}

impl Renderer {
    pub fn new(config: RenderConfig) -> Self {
        info!(
            "renderer: {} vertices, {} faces, {} matrices, {} lights",
            config.max_vertices,
            config.max_faces(),
            config.max_matrices,
            config.max_lights
        );
        Self {
            stack: MatrixStack::new(config.max_matrices),
            pen: Pen::default(),
            flags: config.flags,
            ambient: Rgba::rgb(config.ambient[0], config.ambient[1], config.ambient[2]),
            near_clip: config.near_clip,
            sampling: config.sampling,
            texture: None,
            lights: Vec::new(),
            batch: None,
            vertices: Vec::new(),
            faces: Vec::new(),
            screen: None,
            depth: DepthBuffer::default(),
            stats: FrameStats::default(),
            config,
        }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    // ---------------------------------------------------------------
    // Matrix stack
    // ---------------------------------------------------------------

    pub fn push(&mut self) -> Result<(), RenderError> {
        self.stack.push()
    }

    pub fn pop(&mut self) -> Result<(), RenderError> {
        self.stack.pop()
    }

    pub fn load_identity(&mut self) {
        self.stack.load_identity();
    }

    pub fn scale(&mut self, x: f32, y: f32, z: f32) {
        self.stack.scale(x, y, z);
    }

    pub fn translate(&mut self, x: f32, y: f32, z: f32) {
        self.stack.translate(x, y, z);
    }

    /// Euler rotation in degrees
    pub fn rotate(&mut self, x: f32, y: f32, z: f32) {
        self.stack.rotate(x, y, z);
    }

    pub fn matrix(&self) -> &Mat4 {
        self.stack.top()
    }

    pub fn stack_depth(&self) -> usize {
        self.stack.depth()
    }

    // ---------------------------------------------------------------
    // Frame state
    // ---------------------------------------------------------------

    /// Attach the target surface; the depth buffer follows its size.
    ///
    /// Rejects a surface whose pixel storage is too short for its
    /// width, height and pitch.
    pub fn set_screen(&mut self, screen: Framebuffer) -> Result<(), RenderError> {
        if !screen.is_well_formed() {
            return Err(RenderError::BadSurface {
                width: screen.width,
                height: screen.height,
                pitch: screen.pitch,
                len: screen.pixels.len(),
            });
        }
        if screen.width == 0 || screen.height == 0 {
            warn!("renderer: zero-area surface {}x{}", screen.width, screen.height);
        }
        if self.depth.width() != screen.width || self.depth.height() != screen.height {
            info!("renderer: target resized to {}x{}", screen.width, screen.height);
            self.depth.resize(screen.width, screen.height);
        }
        self.screen = Some(screen);
        Ok(())
    }

    pub fn screen(&self) -> Option<&Framebuffer> {
        self.screen.as_ref()
    }

    pub fn take_screen(&mut self) -> Option<Framebuffer> {
        self.screen.take()
    }

    pub fn depth(&self) -> &DepthBuffer {
        &self.depth
    }

    pub fn clear_screen(&mut self, r: f32, g: f32, b: f32) -> Result<(), RenderError> {
        let screen = self.screen.as_mut().ok_or(RenderError::NoScreen)?;
        screen.clear(Rgba::rgb(r, g, b).to_color());
        Ok(())
    }

    pub fn clear_depth(&mut self) {
        self.depth.clear();
    }

    pub fn clear_lights(&mut self) {
        self.lights.clear();
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    pub fn set_ambient(&mut self, r: f32, g: f32, b: f32) {
        self.ambient = Rgba::rgb(r, g, b);
    }

    pub fn ambient(&self) -> Rgba {
        self.ambient
    }

    pub fn set_near_clip(&mut self, z: f32) {
        self.near_clip = z;
    }

    pub fn near_clip(&self) -> f32 {
        self.near_clip
    }

    pub fn set_texture(&mut self, texture: Option<Rc<Texture>>) {
        self.texture = texture;
    }

    pub fn set_sampling(&mut self, mode: SamplingMode) {
        self.sampling = mode;
    }

    pub fn sampling(&self) -> SamplingMode {
        self.sampling
    }

    pub fn enable(&mut self, flags: RenderFlags) {
        self.flags.insert(flags);
    }

    pub fn disable(&mut self, flags: RenderFlags) {
        self.flags.remove(flags);
    }

    pub fn flags(&self) -> RenderFlags {
        self.flags
    }

    pub fn is_enabled(&self, flags: RenderFlags) -> bool {
        self.flags.contains(flags)
    }

    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats = FrameStats::default();
    }

    // ---------------------------------------------------------------
    // Pen
    // ---------------------------------------------------------------

    /// Set the pen color; alpha goes back to 1
    pub fn color(&mut self, r: f32, g: f32, b: f32) {
        self.pen.color = Rgba::rgb(r, g, b);
    }

    pub fn color4(&mut self, r: f32, g: f32, b: f32, a: f32) {
        self.pen.color = Rgba::new(r, g, b, a);
    }

    pub fn normal(&mut self, x: f32, y: f32, z: f32) {
        self.pen.normal = Vec3::new(x, y, z);
    }

    pub fn tex_coord(&mut self, u: f32, v: f32) {
        self.pen.uv = Vec2::new(u, v);
    }

    pub fn pen(&self) -> &Pen {
        &self.pen
    }

    /// Declare a light at the origin of the current matrix
    pub fn light(&mut self, r: f32, g: f32, b: f32) -> Result<(), RenderError> {
        if self.lights.len() >= self.config.max_lights {
            return Err(RenderError::LightOverflow { capacity: self.config.max_lights });
        }
        self.lights.push(Light {
            position: self.stack.top().origin(),
            color: Rgba::rgb(r, g, b),
        });
        Ok(())
    }

    // ---------------------------------------------------------------
    // Primitive batches
    // ---------------------------------------------------------------

    pub fn begin(&mut self, topology: Topology) -> Result<(), RenderError> {
        self.begin_with(topology, BatchOptions::default())
    }

    pub fn begin_with(&mut self, topology: Topology, options: BatchOptions) -> Result<(), RenderError> {
        if self.batch.is_some() {
            return Err(RenderError::BatchInProgress);
        }
        self.vertices.clear();
        self.faces.clear();
        self.batch = Some(OpenBatch { topology, options });
        Ok(())
    }

    /// Explicit normals on a batch; shorthand for `begin_with`
    pub fn begin_explicit_normals(&mut self, topology: Topology) -> Result<(), RenderError> {
        self.begin_with(topology, BatchOptions { normals: NormalMode::Explicit })
    }

    /// Transform a point by the current matrix and add it to the batch
    pub fn vertex(&mut self, x: f32, y: f32, z: f32) -> Result<(), RenderError> {
        if self.batch.is_none() {
            return Err(RenderError::NotInBatch);
        }
        if self.vertices.len() >= self.config.max_vertices {
            self.abort_batch();
            return Err(RenderError::VertexOverflow { capacity: self.config.max_vertices });
        }

        let m = self.stack.top();
        self.vertices.push(Vertex {
            pos: m.transform_point(Vec3::new(x, y, z)),
            normal: m.transform_dir(self.pen.normal).normalize(),
            color: self.pen.color,
            uv: self.pen.uv,
        });
        Ok(())
    }

    /// Number of vertices in the open batch
    pub fn batch_len(&self) -> usize {
        self.vertices.len()
    }

    fn abort_batch(&mut self) {
        self.batch = None;
        self.vertices.clear();
        self.faces.clear();
    }

    /// Close the batch and draw it. Returns the number of triangles rasterized.
    pub fn end(&mut self) -> Result<usize, RenderError> {
        let batch = self.batch.ok_or(RenderError::NotInBatch)?;
        let result = self.draw_batch(batch);
        self.abort_batch();
        result
    }

    fn draw_batch(&mut self, batch: OpenBatch) -> Result<usize, RenderError> {
        let count = self.vertices.len();
        validate_batch(batch.topology, count)?;

        let total = assemble(batch.topology, count, &mut self.faces, self.config.max_faces())?;
        self.stats.batches += 1;
        self.stats.faces += total;
        if total == 0 {
            return Ok(0);
        }

        let screen = self.screen.as_mut().ok_or(RenderError::NoScreen)?;

        // Incomplete trailing primitives do not count toward the centroid
        self.vertices.truncate(used_vertices(batch.topology, count));
        let center = centroid(&self.vertices);

        if self.flags.contains(RenderFlags::LIGHTING) {
            apply_lighting(&mut self.vertices, &self.lights, batch.options.normals, center);
        }

        let culled = if self.flags.contains(RenderFlags::CULLING) {
            cull_back_faces(&mut self.faces, &self.vertices, center)
        } else {
            0
        };

        if self.sampling != SamplingMode::Solid && self.texture.is_none() {
            warn!("renderer: {:?} sampling without a texture, drawing solid", self.sampling);
        }
        let pipeline = PixelPipeline::new(self.flags, self.sampling, self.texture.as_deref(), self.ambient);

        let mut drawn = 0;
        let mut clipped_away = 0;
        for face in &self.faces {
            let clipped = clip_near(
                &self.vertices[face.v0],
                &self.vertices[face.v1],
                &self.vertices[face.v2],
                self.near_clip,
            );
            match &clipped {
                Clipped::Discarded => {
                    clipped_away += 1;
                    continue;
                }
                Clipped::Two(_) => trace!("renderer: face {:?} split at near plane", face.indices()),
                Clipped::One(_) => {}
            }
            for [p, q, r] in clipped.triangles() {
                if draw_triangle(screen, &mut self.depth, &pipeline, p, q, r) {
                    drawn += 1;
                }
            }
        }

        self.stats.culled += culled;
        self.stats.clipped_away += clipped_away;
        self.stats.triangles += drawn;

        debug!(
            "renderer: {:?} batch, {} vertices, {} faces, {} culled, {} clipped away, {} drawn",
            batch.topology, count, total, culled, clipped_away, drawn
        );
        Ok(drawn)
    }

    /// Color currently stored at a pixel of the target surface
    pub fn pixel(&self, x: usize, y: usize) -> Option<Color> {
        self.screen.as_ref().map(|s| s.get_pixel(x, y))
    }
}
