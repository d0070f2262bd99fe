//! Spatial and common types

use crate::math::{mat4_mul, mat4_rotation, Mat4};
use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Sub};

/// A 3D vector
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);
    pub const ONE: Self = Self::new(1.0, 1.0, 1.0);
    pub const X: Self = Self::new(1.0, 0.0, 0.0);
    pub const Y: Self = Self::new(0.0, 1.0, 0.0);
    pub const Z: Self = Self::new(0.0, 0.0, 1.0);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn from_array(arr: [f32; 3]) -> Self {
        Self::new(arr[0], arr[1], arr[2])
    }

    pub fn to_array(&self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }

    pub fn length(&self) -> f32 {
        self.dot(self).sqrt()
    }

    /// Unit vector in the same direction, or zero for a zero-length vector
    pub fn normalized(&self) -> Self {
        let len = self.length();
        if len > 0.0 {
            *self * (1.0 / len)
        } else {
            Self::ZERO
        }
    }

    pub fn dot(&self, other: &Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(&self, other: &Self) -> Self {
        Self {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    pub fn lerp(&self, other: &Self, t: f32) -> Self {
        *self + (*other - *self) * t
    }
}

impl Add for Vec3 {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }
}

impl Sub for Vec3 {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }
}

impl Mul<f32> for Vec3 {
    type Output = Self;
    fn mul(self, scalar: f32) -> Self {
        Self::new(self.x * scalar, self.y * scalar, self.z * scalar)
    }
}

/// Per-axis rotation angles in degrees, as stored in the course.
///
/// The direction matrix is always derived from these three angles and is
/// never kept around separately, so editing an angle in a panel is the only
/// way the orientation changes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rotation {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Rotation {
    pub const IDENTITY: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// World-space rotation matrix (column-major).
    ///
    /// Composed as `x` about world X, then `y` about world Z, then `z` about
    /// world Y, matching the authoring tool's axis order after the swap.
    pub fn matrix(&self) -> Mat4 {
        let rx = mat4_rotation(self.x, Vec3::X);
        let rz = mat4_rotation(self.y, Vec3::Z);
        let ry = mat4_rotation(self.z, Vec3::Y);
        mat4_mul(&mat4_mul(&rx, &rz), &ry)
    }
}

/// RGBA color
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn to_array(&self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::mat4_transform_point;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-4
    }

    #[test]
    fn test_vec3_operations() {
        let v1 = Vec3::new(1.0, 2.0, 3.0);
        let v2 = Vec3::new(4.0, 5.0, 6.0);

        assert_eq!(v1 + v2, Vec3::new(5.0, 7.0, 9.0));
        assert_eq!(v2 - v1, Vec3::new(3.0, 3.0, 3.0));
        assert_eq!(v1 * 2.0, Vec3::new(2.0, 4.0, 6.0));
        assert_eq!(Vec3::ZERO.normalized(), Vec3::ZERO);
    }

    #[test]
    fn test_rotation_identity() {
        let m = Rotation::IDENTITY.matrix();
        let p = Vec3::new(3.0, -2.0, 7.0);
        assert!(approx(mat4_transform_point(&m, p), p));
    }

    #[test]
    fn test_rotation_single_axes() {
        // 90 degrees about X takes +Y to +Z
        let m = Rotation::new(90.0, 0.0, 0.0).matrix();
        assert!(approx(mat4_transform_point(&m, Vec3::Y), Vec3::Z));

        // the stored y angle turns about world Z: +X to +Y
        let m = Rotation::new(0.0, 90.0, 0.0).matrix();
        assert!(approx(mat4_transform_point(&m, Vec3::X), Vec3::Y));

        // the stored z angle turns about world Y: +Z to +X
        let m = Rotation::new(0.0, 0.0, 90.0).matrix();
        assert!(approx(mat4_transform_point(&m, Vec3::Z), Vec3::X));
    }

    #[test]
    fn test_rotation_composition_order() {
        // Y rotation applies to the vertex first, then Z, then X
        let m = Rotation::new(90.0, 90.0, 90.0).matrix();
        // +Z -> (Ry) +X -> (Rz) +Y -> (Rx) +Z
        assert!(approx(mat4_transform_point(&m, Vec3::Z), Vec3::Z));
    }
}
