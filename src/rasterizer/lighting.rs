//! Per-vertex lighting and back-face culling
//!
//! Both stages work on a whole batch and share its centroid. Lighting is
//! plain Lambertian accumulation into the vertex color: no specular, no
//! distance attenuation, no clamping (the pixel pipeline saturates).

use super::math::Vec3;
use super::types::{Face, Light, NormalMode, Vertex};

/// Average position of the batch
pub fn centroid(vertices: &[Vertex]) -> Vec3 {
    if vertices.is_empty() {
        return Vec3::ZERO;
    }
    let sum = vertices.iter().fold(Vec3::ZERO, |acc, v| acc + v.pos);
    sum * (1.0 / vertices.len() as f32)
}

/// Diffuse contribution of all lights, added onto each vertex color.
///
/// With `NormalMode::Auto` every vertex normal is first replaced by the
/// direction from `center` to the vertex.
pub fn apply_lighting(vertices: &mut [Vertex], lights: &[Light], normals: NormalMode, center: Vec3) {
    for v in vertices.iter_mut() {
        if normals == NormalMode::Auto {
            v.normal = (v.pos - center).normalize();
        }

        for light in lights {
            let dir = (light.position - v.pos).normalize();
            let d = v.normal.dot(dir);
            if d > 0.0 {
                v.color.r += d * light.color.r;
                v.color.g += d * light.color.g;
                v.color.b += d * light.color.b;
            }
        }
    }
}

/// Perspective-divided position used by the culling normal
fn warped(p: Vec3) -> Vec3 {
    Vec3::new(p.x / p.z, p.y / p.z, p.z)
}

/// Face normal in (x/z, y/z, z) space, oriented away from the batch center.
///
/// When the center gives no orientation (flat batches) the winding decides.
pub fn face_normal(face: &Face, vertices: &[Vertex], center: Vec3) -> Vec3 {
    let a = warped(vertices[face.v0].pos);
    let b = warped(vertices[face.v1].pos);
    let c = warped(vertices[face.v2].pos);

    let normal = (c - a).cross(c - b).normalize();

    let offset = a - warped(center);
    if offset.dot(normal) < 0.0 {
        normal * -1.0
    } else {
        normal
    }
}

/// A face is visible when its normal points toward the viewer (negative z)
pub fn is_front_facing(normal: Vec3) -> bool {
    normal.z < 0.0
}

/// Compute normals for every face and keep only the visible ones.
/// Returns how many faces were culled.
pub fn cull_back_faces(faces: &mut Vec<Face>, vertices: &[Vertex], center: Vec3) -> usize {
    let before = faces.len();
    for face in faces.iter_mut() {
        face.normal = face_normal(face, vertices, center);
    }
    faces.retain(|f| is_front_facing(f.normal));
    before - faces.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rasterizer::types::Rgba;

    fn black(x: f32, y: f32, z: f32) -> Vertex {
        let mut v = Vertex::from_pos(x, y, z);
        v.color = Rgba::BLACK;
        v
    }

    #[test]
    fn test_centroid() {
        let verts = [black(0.0, 0.0, 0.0), black(3.0, 0.0, 0.0), black(0.0, 3.0, 6.0)];
        assert_eq!(centroid(&verts), Vec3::new(1.0, 1.0, 2.0));
        assert_eq!(centroid(&[]), Vec3::ZERO);
    }

    #[test]
    fn test_auto_normals_point_away_from_center() {
        let mut verts = [black(-1.0, 0.0, 10.0), black(1.0, 0.0, 10.0)];
        let c = centroid(&verts);
        apply_lighting(&mut verts, &[], NormalMode::Auto, c);
        assert_eq!(verts[0].normal, Vec3::new(-1.0, 0.0, 0.0));
        assert_eq!(verts[1].normal, Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_lambert_accumulates_per_light() {
        let mut verts = [black(-1.0, 0.0, 10.0), black(1.0, 0.0, 10.0)];
        let c = centroid(&verts);
        let lights = [
            Light { position: Vec3::new(-5.0, 0.0, 10.0), color: Rgba::rgb(0.5, 0.25, 1.0) },
            Light { position: Vec3::new(-1.0, 4.0, 10.0), color: Rgba::rgb(1.0, 1.0, 1.0) },
        ];
        apply_lighting(&mut verts, &lights, NormalMode::Auto, c);

        // Left vertex faces the first light head-on; the second is perpendicular
        assert!((verts[0].color.r - 0.5).abs() < 1e-5);
        assert!((verts[0].color.b - 1.0).abs() < 1e-5);
        // Right vertex faces away from the first light and gets nothing from it
        let d = Vec3::new(1.0, 0.0, 0.0).dot((Vec3::new(-1.0, 4.0, 10.0) - verts[1].pos).normalize());
        assert!(d < 0.0);
        assert_eq!(verts[1].color.r, 0.0);
        assert_eq!(verts[1].color.a, 1.0);
    }

    #[test]
    fn test_explicit_normals_are_kept() {
        let mut verts = [black(-1.0, 0.0, 10.0), black(1.0, 0.0, 10.0)];
        for v in &mut verts {
            v.normal = Vec3::new(0.0, 0.0, -1.0);
        }
        let c = centroid(&verts);
        let lights = [Light { position: Vec3::new(0.0, 0.0, 0.0), color: Rgba::WHITE }];
        apply_lighting(&mut verts, &lights, NormalMode::Explicit, c);
        assert_eq!(verts[0].normal, Vec3::new(0.0, 0.0, -1.0));
        assert!(verts[0].color.g > 0.9);
    }

    #[test]
    fn test_winding_decides_for_flat_batch() {
        let verts = [
            Vertex::from_pos(0.0, 40.0, 200.0),
            Vertex::from_pos(40.0, 0.0, 200.0),
            Vertex::from_pos(0.0, 0.0, 200.0),
        ];
        let c = centroid(&verts);
        let front = Face::new(0, 1, 2);
        let back = Face::new(2, 1, 0);
        assert!(is_front_facing(face_normal(&front, &verts, c)));
        assert!(!is_front_facing(face_normal(&back, &verts, c)));
    }

    #[test]
    fn test_closed_mesh_orients_by_center() {
        // Two faces of a box around z = 100, both wound the same way.
        let verts = [
            Vertex::from_pos(-10.0, -10.0, 90.0),
            Vertex::from_pos(10.0, -10.0, 90.0),
            Vertex::from_pos(0.0, 10.0, 90.0),
            Vertex::from_pos(-10.0, -10.0, 110.0),
            Vertex::from_pos(10.0, -10.0, 110.0),
            Vertex::from_pos(0.0, 10.0, 110.0),
        ];
        let c = centroid(&verts);
        let mut faces = vec![Face::new(0, 1, 2), Face::new(3, 4, 5)];
        let culled = cull_back_faces(&mut faces, &verts, c);
        assert_eq!(culled, 1);
        assert_eq!(faces[0].indices(), [0, 1, 2]);
        assert!(faces[0].normal.z < 0.0);
    }
}
