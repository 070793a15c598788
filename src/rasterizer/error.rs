//! Errors reported by the renderer

use super::types::Topology;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum RenderError {
    #[error("vertex buffer overflow (capacity {capacity})")]
    VertexOverflow { capacity: usize },

    #[error("face buffer overflow (capacity {capacity})")]
    FaceOverflow { capacity: usize },

    #[error("matrix stack overflow (capacity {capacity})")]
    MatrixStackOverflow { capacity: usize },

    #[error("matrix stack underflow")]
    MatrixStackUnderflow,

    #[error("light buffer overflow (capacity {capacity})")]
    LightOverflow { capacity: usize },

    #[error("primitive batch ended with no vertices")]
    EmptyBatch,

    #[error("{vertices} vertices cannot form a {topology:?} batch")]
    TopologyMismatch { topology: Topology, vertices: usize },

    #[error("vertex submitted outside begin/end")]
    NotInBatch,

    #[error("begin called while a batch is already open")]
    BatchInProgress,

    #[error("no target surface set")]
    NoScreen,

    #[error("{width}x{height} surface with pitch {pitch} does not fit in {len} bytes")]
    BadSurface { width: usize, height: usize, pitch: usize, len: usize },
}
