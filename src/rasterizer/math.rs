//! Vector and matrix math for the transform pipeline
//!
//! Matrices are stored as 16 floats in OpenGL order: element (row, col) lives
//! at `m[col * 4 + row]`, so the translation occupies `m[12..15]`. Read as a
//! row-major array the same data is the row-vector form (`v' = v * M`).

use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Sub};

/// 3D Vector
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 { x: 0.0, y: 0.0, z: 0.0 };

    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn dot(self, other: Vec3) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(self, other: Vec3) -> Vec3 {
        Vec3 {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    pub fn len(self) -> f32 {
        self.dot(self).sqrt()
    }

    /// Unit vector in the same direction; the zero vector stays zero
    pub fn normalize(self) -> Vec3 {
        let l = self.len();
        if l == 0.0 {
            return Vec3::ZERO;
        }
        Vec3 {
            x: self.x / l,
            y: self.y / l,
            z: self.z / l,
        }
    }

    pub fn scale(self, s: f32) -> Vec3 {
        Vec3 {
            x: self.x * s,
            y: self.y * s,
            z: self.z * s,
        }
    }

    pub fn lerp(self, other: Vec3, t: f32) -> Vec3 {
        self + (other - self) * t
    }
}

impl Add for Vec3 {
    type Output = Vec3;
    fn add(self, other: Vec3) -> Vec3 {
        Vec3 {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }
}

impl Sub for Vec3 {
    type Output = Vec3;
    fn sub(self, other: Vec3) -> Vec3 {
        Vec3 {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }
}

impl Mul<f32> for Vec3 {
    type Output = Vec3;
    fn mul(self, s: f32) -> Vec3 {
        self.scale(s)
    }
}

/// 2D Vector (for texture coordinates)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn lerp(self, other: Vec2, t: f32) -> Vec2 {
        Vec2 {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
        }
    }
}

/// 4x4 affine/projective transform
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Mat4 {
    pub m: [f32; 16],
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mat4 {
    pub const IDENTITY: Mat4 = Mat4 {
        m: [
            1.0, 0.0, 0.0, 0.0, //
            0.0, 1.0, 0.0, 0.0, //
            0.0, 0.0, 1.0, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        ],
    };

    pub fn from_array(m: [f32; 16]) -> Self {
        Self { m }
    }

    pub fn translation(x: f32, y: f32, z: f32) -> Self {
        let mut r = Self::IDENTITY;
        r.m[12] = x;
        r.m[13] = y;
        r.m[14] = z;
        r
    }

    pub fn scaling(x: f32, y: f32, z: f32) -> Self {
        let mut r = Self::IDENTITY;
        r.m[0] = x;
        r.m[5] = y;
        r.m[10] = z;
        r
    }

    /// Rotation about the X axis (radians)
    pub fn rotation_x(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        let mut r = Self::IDENTITY;
        r.m[5] = c;
        r.m[6] = s;
        r.m[9] = -s;
        r.m[10] = c;
        r
    }

    /// Rotation about the Y axis (radians)
    pub fn rotation_y(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        let mut r = Self::IDENTITY;
        r.m[0] = c;
        r.m[2] = -s;
        r.m[8] = s;
        r.m[10] = c;
        r
    }

    /// Rotation about the Z axis (radians)
    pub fn rotation_z(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        let mut r = Self::IDENTITY;
        r.m[0] = c;
        r.m[1] = s;
        r.m[4] = -s;
        r.m[5] = c;
        r
    }

    /// Euler rotation in degrees, composed as X, then Y, then Z.
    ///
    /// The three factors are multiplied one after another rather than
    /// through a closed-form matrix; the order is part of the contract.
    pub fn rotation(x_deg: f32, y_deg: f32, z_deg: f32) -> Self {
        Self::IDENTITY
            .mul(&Self::rotation_x(x_deg.to_radians()))
            .mul(&Self::rotation_y(y_deg.to_radians()))
            .mul(&Self::rotation_z(z_deg.to_radians()))
    }

    /// Matrix product. The result applies `rhs` to a point first, then `self`.
    pub fn mul(&self, rhs: &Mat4) -> Mat4 {
        let a = &self.m;
        let b = &rhs.m;
        let mut r = [0.0f32; 16];
        for i in 0..4 {
            for j in (0..16).step_by(4) {
                let mut sum = 0.0;
                for t in 0..4 {
                    sum += a[i + t * 4] * b[j + t];
                }
                r[i + j] = sum;
            }
        }
        Mat4 { m: r }
    }

    /// Matrix times homogeneous vector
    pub fn transform(&self, v: [f32; 4]) -> [f32; 4] {
        let m = &self.m;
        [
            m[0] * v[0] + m[4] * v[1] + m[8] * v[2] + m[12] * v[3],
            m[1] * v[0] + m[5] * v[1] + m[9] * v[2] + m[13] * v[3],
            m[2] * v[0] + m[6] * v[1] + m[10] * v[2] + m[14] * v[3],
            m[3] * v[0] + m[7] * v[1] + m[11] * v[2] + m[15] * v[3],
        ]
    }

    /// Transform a point (w = 1), dropping the projective row
    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        let m = &self.m;
        Vec3 {
            x: m[0] * p.x + m[4] * p.y + m[8] * p.z + m[12],
            y: m[1] * p.x + m[5] * p.y + m[9] * p.z + m[13],
            z: m[2] * p.x + m[6] * p.y + m[10] * p.z + m[14],
        }
    }

    /// Transform a direction by the upper 3x3 only
    pub fn transform_dir(&self, d: Vec3) -> Vec3 {
        let m = &self.m;
        Vec3 {
            x: m[0] * d.x + m[4] * d.y + m[8] * d.z,
            y: m[1] * d.x + m[5] * d.y + m[9] * d.z,
            z: m[2] * d.x + m[6] * d.y + m[10] * d.z,
        }
    }

    /// Translation column, i.e. where the local origin lands
    pub fn origin(&self) -> Vec3 {
        Vec3::new(self.m[12], self.m[13], self.m[14])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).len() < 0.001
    }

    #[test]
    fn test_vec3_dot() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, 5.0, 6.0);
        assert!((a.dot(b) - 32.0).abs() < 0.001);
    }

    #[test]
    fn test_vec3_cross() {
        let a = Vec3::new(1.0, 0.0, 0.0);
        let b = Vec3::new(0.0, 1.0, 0.0);
        let c = a.cross(b);
        assert!((c.z - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_normalize_zero_stays_zero() {
        assert_eq!(Vec3::ZERO.normalize(), Vec3::ZERO);
    }

    #[test]
    fn test_identity_is_neutral() {
        let t = Mat4::translation(1.0, 2.0, 3.0).mul(&Mat4::rotation(10.0, 20.0, 30.0));
        assert_eq!(Mat4::IDENTITY.mul(&t), t);
        assert_eq!(t.mul(&Mat4::IDENTITY), t);
    }

    #[test]
    fn test_mul_applies_rhs_first() {
        // scale then translate: (1,0,0) -> (2,0,0) -> (2,0,5)
        let m = Mat4::translation(0.0, 0.0, 5.0).mul(&Mat4::scaling(2.0, 2.0, 2.0));
        let p = m.transform_point(Vec3::new(1.0, 0.0, 0.0));
        assert!(approx(p, Vec3::new(2.0, 0.0, 5.0)));
    }

    #[test]
    fn test_transform_matches_transform_point() {
        let m = Mat4::rotation(15.0, -40.0, 70.0).mul(&Mat4::translation(3.0, -1.0, 9.0));
        let p = Vec3::new(0.5, 2.0, -3.0);
        let h = m.transform([p.x, p.y, p.z, 1.0]);
        assert!(approx(m.transform_point(p), Vec3::new(h[0], h[1], h[2])));
        assert!((h[3] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_rotation_y_quarter_turn() {
        let p = Mat4::rotation(0.0, 90.0, 0.0).transform_point(Vec3::new(1.0, 0.0, 0.0));
        assert!(approx(p, Vec3::new(0.0, 0.0, -1.0)));
    }

    #[test]
    fn test_rotation_order_is_x_then_y_then_z() {
        let composed = Mat4::rotation_x(0.3)
            .mul(&Mat4::rotation_y(0.7))
            .mul(&Mat4::rotation_z(-1.1));
        let euler = Mat4::rotation(0.3f32.to_degrees(), 0.7f32.to_degrees(), (-1.1f32).to_degrees());
        for (a, b) in composed.m.iter().zip(euler.m.iter()) {
            assert!((a - b).abs() < 1e-5);
        }
        let reversed = Mat4::rotation_z(-1.1)
            .mul(&Mat4::rotation_y(0.7))
            .mul(&Mat4::rotation_x(0.3));
        assert!(composed.m.iter().zip(reversed.m.iter()).any(|(a, b)| (a - b).abs() > 1e-3));
    }

    #[test]
    fn test_transform_dir_ignores_translation() {
        let m = Mat4::translation(10.0, 20.0, 30.0);
        assert!(approx(m.transform_dir(Vec3::new(0.0, 1.0, 0.0)), Vec3::new(0.0, 1.0, 0.0)));
        assert!(approx(m.origin(), Vec3::new(10.0, 20.0, 30.0)));
    }
}
