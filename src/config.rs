//! Renderer configuration
//!
//! Uses RON (Rusty Object Notation) for human-readable config files.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::rasterizer::{RenderFlags, SamplingMode};

/// Error type for config loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("Serialize error: {0}")]
    Serialize(#[from] ron::Error),
}

/// Capacities and initial render state for a `Renderer`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Vertices accepted between `begin` and `end`
    pub max_vertices: usize,
    /// Faces per batch; defaults to `max_vertices - 2`
    pub max_faces: Option<usize>,
    /// Matrix stack slots, base slot included
    pub max_matrices: usize,
    pub max_lights: usize,
    pub near_clip: f32,
    pub ambient: [f32; 3],
    pub sampling: SamplingMode,
    pub flags: RenderFlags,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            max_vertices: 100_000,
            max_faces: None,
            max_matrices: 100,
            max_lights: 1000,
            near_clip: 100.0,
            ambient: [1.0, 1.0, 1.0],
            sampling: SamplingMode::Bilinear,
            flags: RenderFlags::empty(),
        }
    }
}

impl RenderConfig {
    pub fn max_faces(&self) -> usize {
        self.max_faces
            .unwrap_or_else(|| self.max_vertices.saturating_sub(2))
    }
}

/// Load a config from a RON file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<RenderConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    load_config_from_str(&contents)
}

/// Save a config to a RON file
pub fn save_config<P: AsRef<Path>>(config: &RenderConfig, path: P) -> Result<(), ConfigError> {
    fs::write(path, config_to_string(config)?)?;
    Ok(())
}

/// Load a config from a RON string (missing fields take their defaults)
pub fn load_config_from_str(s: &str) -> Result<RenderConfig, ConfigError> {
    Ok(ron::from_str(s)?)
}

pub fn config_to_string(config: &RenderConfig) -> Result<String, ConfigError> {
    let pretty = ron::ser::PrettyConfig::new()
        .depth_limit(2)
        .indentor("  ".to_string());
    Ok(ron::ser::to_string_pretty(config, pretty)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = RenderConfig::default();
        assert_eq!(cfg.max_faces(), 99_998);
        assert_eq!(cfg.near_clip, 100.0);
        assert!(cfg.flags.is_empty());
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let cfg = load_config_from_str("(max_lights: 4, near_clip: 50.0, sampling: Nearest)").unwrap();
        assert_eq!(cfg.max_lights, 4);
        assert_eq!(cfg.near_clip, 50.0);
        assert_eq!(cfg.sampling, SamplingMode::Nearest);
        assert_eq!(cfg.max_vertices, 100_000);
    }

    #[test]
    fn test_string_round_trip() {
        let mut cfg = RenderConfig::default();
        cfg.flags = RenderFlags::DEPTH_TEST | RenderFlags::CULLING;
        cfg.max_faces = Some(12);
        let text = config_to_string(&cfg).unwrap();
        assert_eq!(load_config_from_str(&text).unwrap(), cfg);
    }

    #[test]
    fn test_bad_config_is_parse_error() {
        assert!(matches!(load_config_from_str("(max_lights: \"many\")"), Err(ConfigError::Parse(_))));
    }
}
