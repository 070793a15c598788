//! immediate3d: an immediate-mode software 3D renderer
//!
//! Geometry is submitted one vertex at a time between `begin` and `end`,
//! transformed by a matrix stack, lit, culled, clipped against a near
//! plane and scan-converted into a caller-owned pixel surface.
//!
//! ```no_run
//! use immediate3d::{Framebuffer, RenderConfig, Renderer, Topology};
//!
//! let mut r = Renderer::new(RenderConfig::default());
//! r.set_screen(Framebuffer::new(64, 48))?;
//! r.translate(0.0, 0.0, 250.0);
//! r.begin(Topology::Triangles)?;
//! r.vertex(-10.0, -10.0, 0.0)?;
//! r.vertex(10.0, -10.0, 0.0)?;
//! r.vertex(0.0, 10.0, 0.0)?;
//! r.end()?;
//! # Ok::<(), immediate3d::RenderError>(())
//! ```

pub mod config;
pub mod rasterizer;
pub mod scenes;

pub use config::{load_config, load_config_from_str, save_config, ConfigError, RenderConfig};
pub use rasterizer::*;
