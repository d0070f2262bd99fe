//! Orbit camera over a Z-up course

use pitlane_core::{Mat4, Vec3};

/// An orbit camera looking at a target point
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    /// Vertical field of view in degrees
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    /// Aspect ratio (width / height)
    pub aspect: f32,

    /// Distance from target
    pub distance: f32,
    /// Horizontal angle in radians, 0 looks along -X
    pub yaw: f32,
    /// Elevation angle in radians
    pub pitch: f32,

    /// Orthographic projection, sized so `distance` frames like the perspective view
    pub orthographic: bool,
}

impl Default for Camera {
    fn default() -> Self {
        let mut camera = Self {
            position: Vec3::ZERO,
            target: Vec3::ZERO,
            up: Vec3::Z,
            fov: 60.0,
            near: 10.0,
            far: 200_000.0,
            aspect: 16.0 / 9.0,
            distance: 20_000.0,
            yaw: std::f32::consts::FRAC_PI_4,
            pitch: std::f32::consts::FRAC_PI_4,
            orthographic: false,
        };
        camera.update_orbit();
        camera
    }
}

impl Camera {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recompute position from target, distance, yaw and pitch
    pub fn update_orbit(&mut self) {
        let horizontal = self.distance * self.pitch.cos();
        self.position = Vec3::new(
            self.target.x + horizontal * self.yaw.cos(),
            self.target.y + horizontal * self.yaw.sin(),
            self.target.z + self.distance * self.pitch.sin(),
        );
    }

    pub fn orbit_horizontal(&mut self, delta: f32) {
        self.yaw += delta;
        self.update_orbit();
    }

    pub fn orbit_vertical(&mut self, delta: f32) {
        self.pitch = (self.pitch + delta).clamp(-1.56, 1.56);
        self.update_orbit();
    }

    pub fn zoom(&mut self, delta: f32) {
        self.distance = (self.distance - delta).max(self.near * 2.0);
        self.update_orbit();
    }

    /// Aim at the centre of a world-space box and back off far enough to see all of it
    pub fn frame_bounds(&mut self, min: Vec3, max: Vec3) {
        self.target = (min + max) * 0.5;
        let radius = ((max - min).length() * 0.5).max(500.0);
        // A sphere of this radius fits the view cone at radius / sin(fov / 2)
        let half_fov = (self.fov.to_radians() / 2.0).sin().max(0.1);
        self.distance = radius / half_fov * 1.05;
        self.far = self.far.max(self.distance + radius * 2.0);
        self.update_orbit();
    }

    /// View matrix (column-major)
    pub fn view_matrix(&self) -> Mat4 {
        let f = (self.target - self.position).normalized();
        let s = f.cross(&self.up).normalized();
        let u = s.cross(&f);

        [
            [s.x, u.x, -f.x, 0.0],
            [s.y, u.y, -f.y, 0.0],
            [s.z, u.z, -f.z, 0.0],
            [
                -s.dot(&self.position),
                -u.dot(&self.position),
                f.dot(&self.position),
                1.0,
            ],
        ]
    }

    /// Projection matrix with wgpu's [0, 1] depth range (column-major)
    pub fn projection_matrix(&self) -> Mat4 {
        let depth = self.near - self.far;
        if self.orthographic {
            let half_h = self.distance * (self.fov.to_radians() / 2.0).tan();
            let half_w = half_h * self.aspect;
            [
                [1.0 / half_w, 0.0, 0.0, 0.0],
                [0.0, 1.0 / half_h, 0.0, 0.0],
                [0.0, 0.0, 1.0 / depth, 0.0],
                [0.0, 0.0, self.near / depth, 1.0],
            ]
        } else {
            let f = 1.0 / (self.fov.to_radians() / 2.0).tan();
            [
                [f / self.aspect, 0.0, 0.0, 0.0],
                [0.0, f, 0.0, 0.0],
                [0.0, 0.0, self.far / depth, -1.0],
                [0.0, 0.0, self.near * self.far / depth, 0.0],
            ]
        }
    }

    pub fn view_projection_matrix(&self) -> Mat4 {
        pitlane_core::math::mat4_mul(&self.projection_matrix(), &self.view_matrix())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pitlane_core::math::mat4_transform_point;

    #[test]
    fn test_orbit_keeps_distance() {
        let mut camera = Camera::new();
        camera.target = Vec3::new(100.0, 200.0, 0.0);
        camera.orbit_horizontal(1.0);
        camera.orbit_vertical(0.3);
        let d = (camera.position - camera.target).length();
        assert!((d - camera.distance).abs() < 0.5);
        assert!(camera.position.z > camera.target.z);
    }

    #[test]
    fn test_target_projects_to_center() {
        let mut camera = Camera::new();
        camera.target = Vec3::new(500.0, -300.0, 20.0);
        camera.update_orbit();
        let ndc = mat4_transform_point(&camera.view_projection_matrix(), camera.target);
        assert!(ndc.x.abs() < 1e-3 && ndc.y.abs() < 1e-3);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }

    #[test]
    fn test_depth_range() {
        let mut camera = Camera::new();
        camera.pitch = 0.5;
        camera.update_orbit();
        let forward = (camera.target - camera.position).normalized();
        let vp = camera.view_projection_matrix();

        let near = mat4_transform_point(&vp, camera.position + forward * camera.near);
        let far = mat4_transform_point(&vp, camera.position + forward * camera.far);
        assert!(near.z.abs() < 1e-3);
        assert!((far.z - 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_frame_bounds_sees_corners() {
        let mut camera = Camera::new();
        camera.aspect = 1.0;
        let (min, max) = (Vec3::new(-5000.0, -5000.0, 0.0), Vec3::new(5000.0, 5000.0, 1000.0));
        camera.frame_bounds(min, max);

        let vp = camera.view_projection_matrix();
        for corner in [min, max, Vec3::new(min.x, max.y, 0.0), Vec3::new(max.x, min.y, 0.0)] {
            let ndc = mat4_transform_point(&vp, corner);
            assert!(ndc.x.abs() <= 1.0 && ndc.y.abs() <= 1.0, "corner {:?} off screen", corner);
        }
    }
}
