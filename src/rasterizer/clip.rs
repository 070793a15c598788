//! Near-plane clipping
//!
//! Only the near plane is clipped against; the rasterizer handles the
//! screen edges by skipping and trimming spans.

use super::types::Vertex;

/// Result of clipping one triangle against the near plane
#[derive(Debug, Clone, PartialEq)]
pub enum Clipped {
    /// Every vertex is nearer than the plane
    Discarded,
    One([Vertex; 3]),
    Two([[Vertex; 3]; 2]),
}

impl Clipped {
    pub fn triangles(&self) -> &[[Vertex; 3]] {
        match self {
            Clipped::Discarded => &[],
            Clipped::One(t) => std::slice::from_ref(t),
            Clipped::Two(ts) => ts,
        }
    }
}

/// Point where the edge from `far` to `near` crosses the plane `z = plane`.
/// All attributes are interpolated with the same parameter.
pub fn intersect(far: &Vertex, near: &Vertex, plane: f32) -> Vertex {
    let t = (plane - far.pos.z) / (near.pos.z - far.pos.z);
    far.lerp(near, t)
}

/// Clip a triangle against the near plane at `z = plane`.
///
/// Vertices are ordered by depth so that `a` is nearest and `c` farthest.
/// Output triangles always start from the farthest vertex.
pub fn clip_near(p: &Vertex, q: &Vertex, r: &Vertex, plane: f32) -> Clipped {
    let (mut a, mut b, mut c) = (p, q, r);
    if a.pos.z > c.pos.z {
        std::mem::swap(&mut a, &mut c);
    }
    if a.pos.z > b.pos.z {
        std::mem::swap(&mut a, &mut b);
    }
    if b.pos.z > c.pos.z {
        std::mem::swap(&mut b, &mut c);
    }

    if c.pos.z < plane {
        return Clipped::Discarded;
    }

    if a.pos.z >= plane {
        return Clipped::One([*c, *b, *a]);
    }

    let ca = intersect(c, a, plane);
    if b.pos.z < plane {
        let cb = intersect(c, b, plane);
        Clipped::One([*c, cb, ca])
    } else {
        let ba = intersect(b, a, plane);
        Clipped::Two([[*c, *b, ba], [*c, ba, ca]])
    }
}
