//! Immediate-mode software rasterizer
//!
//! Features:
//! - Matrix stack with scale / translate / rotate
//! - Triangles, strips, fans, quads and quad strips
//! - Per-vertex Lambertian lighting with auto or explicit normals
//! - Back-face culling and near-plane clipping
//! - Perspective-correct scanline rasterization
//! - Inverse-depth test, nearest / bilinear sampling, alpha blending

mod assemble;
mod clip;
mod error;
mod lighting;
mod math;
mod pixel;
mod raster;
mod renderer;
mod stack;
mod surface;
mod types;

pub use assemble::*;
pub use clip::*;
pub use error::*;
pub use lighting::*;
pub use math::*;
pub use pixel::*;
pub use raster::*;
pub use renderer::*;
pub use stack::*;
pub use surface::*;
pub use types::*;

/// Default window size of the demo host
pub const WIDTH: usize = 640;
pub const HEIGHT: usize = 480;
