//! Primitive assembly: turns a vertex batch into triangle faces

use super::error::RenderError;
use super::types::{Face, Topology};

/// Check that `count` vertices make sense for `topology`
pub fn validate_batch(topology: Topology, count: usize) -> Result<(), RenderError> {
    match (count, topology) {
        (0, _) => Err(RenderError::EmptyBatch),
        (1, Topology::Points | Topology::None) => Ok(()),
        (2, Topology::Lines | Topology::None) => Ok(()),
        (1 | 2, _) => Err(RenderError::TopologyMismatch { topology, vertices: count }),
        _ => Ok(()),
    }
}

/// Number of faces `assemble` produces for a batch
pub fn face_count(topology: Topology, count: usize) -> usize {
    match topology {
        Topology::None | Topology::Points | Topology::Lines => 0,
        Topology::Triangles => count / 3,
        Topology::TriangleFan | Topology::TriangleStrip | Topology::QuadStrip => {
            count.saturating_sub(2)
        }
        Topology::Quads => (count / 4) * 2,
    }
}

/// Number of vertices that take part in the batch after truncating
/// incomplete trailing triangles or quads.
pub fn used_vertices(topology: Topology, count: usize) -> usize {
    match topology {
        Topology::Triangles => count - count % 3,
        Topology::Quads => count - count % 4,
        _ => count,
    }
}

/// Append the faces for a batch of `count` vertices to `faces`.
///
/// Fails without touching `faces` if the result would exceed `max_faces`.
pub fn assemble(
    topology: Topology,
    count: usize,
    faces: &mut Vec<Face>,
    max_faces: usize,
) -> Result<usize, RenderError> {
    validate_batch(topology, count)?;

    let total = face_count(topology, count);
    if faces.len() + total > max_faces {
        return Err(RenderError::FaceOverflow { capacity: max_faces });
    }

    let n = used_vertices(topology, count);
    match topology {
        Topology::None | Topology::Points | Topology::Lines => {}
        Topology::Triangles => {
            for i in (0..n).step_by(3) {
                faces.push(Face::new(i, i + 1, i + 2));
            }
        }
        Topology::TriangleFan => {
            for i in 2..n {
                faces.push(Face::new(0, i - 1, i));
            }
        }
        // Quad strips reuse the triangle strip pattern
        Topology::TriangleStrip | Topology::QuadStrip => {
            for i in 2..n {
                faces.push(Face::new(i, i - 1, i - 2));
            }
        }
        Topology::Quads => {
            for i in (0..n).step_by(4) {
                faces.push(Face::new(i, i + 1, i + 2));
                faces.push(Face::new(i, i + 2, i + 3));
            }
        }
    }

    Ok(total)
}
