//! Column-major 4x4 matrix helpers and the authoring-to-world convention
//!
//! Matrices are `[[f32; 4]; 4]` indexed `m[column][row]`, which is the layout
//! WGSL `mat4x4<f32>` expects in a uniform buffer.

use crate::Vec3;

/// A column-major 4x4 matrix
pub type Mat4 = [[f32; 4]; 4];

pub const MAT4_IDENTITY: Mat4 = [
    [1.0, 0.0, 0.0, 0.0],
    [0.0, 1.0, 0.0, 0.0],
    [0.0, 0.0, 1.0, 0.0],
    [0.0, 0.0, 0.0, 1.0],
];

/// Map an authoring-space position to world space: (x, y, z) -> (x, -z, y)
pub fn authoring_to_world(p: Vec3) -> Vec3 {
    Vec3::new(p.x, -p.z, p.y)
}

/// Map an authoring-space scale to world axes: (sx, sy, sz) -> (sx, sz, sy)
pub fn authoring_scale_to_world(s: Vec3) -> Vec3 {
    Vec3::new(s.x, s.z, s.y)
}

/// Multiply two 4x4 column-major matrices (`a * b`)
pub fn mat4_mul(a: &Mat4, b: &Mat4) -> Mat4 {
    let mut result = [[0.0; 4]; 4];
    for (i, col) in result.iter_mut().enumerate() {
        for (j, out) in col.iter_mut().enumerate() {
            for k in 0..4 {
                *out += a[k][j] * b[i][k];
            }
        }
    }
    result
}

pub fn mat4_translation(t: Vec3) -> Mat4 {
    let mut m = MAT4_IDENTITY;
    m[3] = [t.x, t.y, t.z, 1.0];
    m
}

pub fn mat4_scale(s: Vec3) -> Mat4 {
    [
        [s.x, 0.0, 0.0, 0.0],
        [0.0, s.y, 0.0, 0.0],
        [0.0, 0.0, s.z, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ]
}

/// Rotation of `degrees` about an arbitrary axis (right-handed)
pub fn mat4_rotation(degrees: f32, axis: Vec3) -> Mat4 {
    let a = axis.normalized();
    let (s, c) = degrees.to_radians().sin_cos();
    let t = 1.0 - c;
    let (x, y, z) = (a.x, a.y, a.z);

    [
        [t * x * x + c, t * x * y + s * z, t * x * z - s * y, 0.0],
        [t * x * y - s * z, t * y * y + c, t * y * z + s * x, 0.0],
        [t * x * z + s * y, t * y * z - s * x, t * z * z + c, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ]
}

/// Transform a point (w = 1) by a matrix
pub fn mat4_transform_point(m: &Mat4, p: Vec3) -> Vec3 {
    let x = m[0][0] * p.x + m[1][0] * p.y + m[2][0] * p.z + m[3][0];
    let y = m[0][1] * p.x + m[1][1] * p.y + m[2][1] * p.z + m[3][1];
    let z = m[0][2] * p.x + m[1][2] * p.y + m[2][2] * p.z + m[3][2];
    let w = m[0][3] * p.x + m[1][3] * p.y + m[2][3] * p.z + m[3][3];
    if w.abs() > f32::EPSILON && (w - 1.0).abs() > f32::EPSILON {
        Vec3::new(x / w, y / w, z / w)
    } else {
        Vec3::new(x, y, z)
    }
}

/// World-space translation carried by a matrix
pub fn mat4_origin(m: &Mat4) -> Vec3 {
    Vec3::new(m[3][0], m[3][1], m[3][2])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_swap() {
        let w = authoring_to_world(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(w, Vec3::new(1.0, -3.0, 2.0));

        let s = authoring_scale_to_world(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(s, Vec3::new(1.0, 3.0, 2.0));
    }

    #[test]
    fn test_mul_identity() {
        let t = mat4_translation(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(mat4_mul(&MAT4_IDENTITY, &t), t);
        assert_eq!(mat4_mul(&t, &MAT4_IDENTITY), t);
    }

    #[test]
    fn test_translate_then_scale() {
        // T * S applies the scale first
        let m = mat4_mul(
            &mat4_translation(Vec3::new(10.0, 0.0, 0.0)),
            &mat4_scale(Vec3::new(2.0, 2.0, 2.0)),
        );
        let p = mat4_transform_point(&m, Vec3::new(1.0, 1.0, 1.0));
        assert_eq!(p, Vec3::new(12.0, 2.0, 2.0));
        assert_eq!(mat4_origin(&m), Vec3::new(10.0, 0.0, 0.0));
    }

    #[test]
    fn test_rotation_about_arbitrary_axis() {
        let m = mat4_rotation(120.0, Vec3::new(1.0, 1.0, 1.0));
        let p = mat4_transform_point(&m, Vec3::X);
        assert!((p - Vec3::Y).length() < 1e-4);
    }
}
