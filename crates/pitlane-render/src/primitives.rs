//! Mesh primitives and the generic placeholder silhouettes
//!
//! All procedural shapes are built in world axes (Z up). Sizes are in course
//! units, where a kart is roughly 100 units long.

use bytemuck::{Pod, Zeroable};
use pitlane_core::math::{mat4_mul, mat4_scale, mat4_transform_point, mat4_translation};
use pitlane_core::{Mat4, Vec3};
use std::f32::consts::{PI, TAU};

/// A vertex with position, normal, color, and UV coordinates
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub color: [f32; 4],
    pub uv: [f32; 2],
}

impl Vertex {
    const ATTRIBS: [wgpu::VertexAttribute; 4] = wgpu::vertex_attr_array![
        0 => Float32x3,
        1 => Float32x3,
        2 => Float32x4,
        3 => Float32x2,
    ];

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }

    /// Vertex for line overlays, where only position and color matter
    pub fn line(position: Vec3, color: [f32; 4]) -> Self {
        Self {
            position: position.to_array(),
            normal: [0.0, 0.0, 1.0],
            color,
            uv: [0.0, 0.0],
        }
    }
}

/// A triangle mesh with vertices and indices
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Append another mesh, rebasing its indices
    pub fn append(&mut self, other: &Mesh) {
        let base = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&other.vertices);
        self.indices.extend(other.indices.iter().map(|i| i + base));
    }

    /// Append another mesh after transforming it by `m`
    pub fn append_transformed(&mut self, other: &Mesh, m: &Mat4) {
        self.append(&other.transformed(m));
    }

    /// Copy of this mesh with positions and normals transformed by `m`
    pub fn transformed(&self, m: &Mat4) -> Mesh {
        let vertices = self
            .vertices
            .iter()
            .map(|v| {
                let position = mat4_transform_point(m, Vec3::from_array(v.position));
                let n = Vec3::from_array(v.normal);
                let normal = Vec3::new(
                    m[0][0] * n.x + m[1][0] * n.y + m[2][0] * n.z,
                    m[0][1] * n.x + m[1][1] * n.y + m[2][1] * n.z,
                    m[0][2] * n.x + m[1][2] * n.y + m[2][2] * n.z,
                )
                .normalized();
                Vertex {
                    position: position.to_array(),
                    normal: normal.to_array(),
                    ..*v
                }
            })
            .collect();

        Mesh {
            vertices,
            indices: self.indices.clone(),
        }
    }

    /// Convert a Y-up authored mesh into world axes: (x, y, z) -> (x, -z, y)
    pub fn convert_y_up_to_z_up(&mut self) {
        for v in &mut self.vertices {
            let [x, y, z] = v.position;
            v.position = [x, -z, y];
            let [nx, ny, nz] = v.normal;
            v.normal = [nx, -nz, ny];
        }
    }

    pub fn set_color(&mut self, color: [f32; 4]) {
        for v in &mut self.vertices {
            v.color = color;
        }
    }

    /// Axis-aligned bounds as (min, max), or `None` for an empty mesh
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let first = self.vertices.first()?;
        let mut min = Vec3::from_array(first.position);
        let mut max = min;
        for v in &self.vertices {
            let [x, y, z] = v.position;
            min = Vec3::new(min.x.min(x), min.y.min(y), min.z.min(z));
            max = Vec3::new(max.x.max(x), max.y.max(y), max.z.max(z));
        }
        Some((min, max))
    }

    /// Push a flat-shaded triangle with counter-clockwise winding
    fn push_triangle(&mut self, a: Vec3, b: Vec3, c: Vec3, color: [f32; 4]) {
        let normal = (b - a).cross(&(c - a)).normalized().to_array();
        let base = self.vertices.len() as u32;
        for (p, uv) in [(a, [0.0, 0.0]), (b, [1.0, 0.0]), (c, [0.0, 1.0])] {
            self.vertices.push(Vertex {
                position: p.to_array(),
                normal,
                color,
                uv,
            });
        }
        self.indices.extend_from_slice(&[base, base + 1, base + 2]);
    }
}

/// Create a box mesh centered on the origin with the given dimensions and color
pub fn create_box_mesh(width: f32, height: f32, depth: f32, color: [f32; 4]) -> Mesh {
    let h = Vec3::new(width / 2.0, height / 2.0, depth / 2.0);

    // (normal, u axis, v axis); u x v == normal keeps the winding CCW from outside
    let faces = [
        (Vec3::X, Vec3::Y, Vec3::Z),
        (Vec3::X * -1.0, Vec3::Z, Vec3::Y),
        (Vec3::Y, Vec3::Z, Vec3::X),
        (Vec3::Y * -1.0, Vec3::X, Vec3::Z),
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::Z * -1.0, Vec3::Y, Vec3::X),
    ];

    let scale = |v: Vec3| Vec3::new(v.x * h.x, v.y * h.y, v.z * h.z);

    let mut mesh = Mesh::new();
    for (normal, u, v) in faces {
        let base = mesh.vertices.len() as u32;
        let corners = [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)];
        for (cu, cv) in corners {
            let p = scale(normal + u * cu + v * cv);
            mesh.vertices.push(Vertex {
                position: p.to_array(),
                normal: normal.to_array(),
                color,
                uv: [(cu + 1.0) / 2.0, (1.0 - cv) / 2.0],
            });
        }
        mesh.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
    mesh
}

/// UV sphere centered on the origin, poles on the Z axis
pub fn create_sphere_mesh(radius: f32, segments: u32, rings: u32, color: [f32; 4]) -> Mesh {
    let segments = segments.max(3);
    let rings = rings.max(2);
    let mut mesh = Mesh::new();

    for ring in 0..=rings {
        let phi = PI * ring as f32 / rings as f32;
        let (ring_radius, z) = (phi.sin(), phi.cos());
        for seg in 0..=segments {
            let theta = TAU * seg as f32 / segments as f32;
            let n = Vec3::new(ring_radius * theta.cos(), ring_radius * theta.sin(), z);
            mesh.vertices.push(Vertex {
                position: (n * radius).to_array(),
                normal: n.to_array(),
                color,
                uv: [seg as f32 / segments as f32, ring as f32 / rings as f32],
            });
        }
    }

    let stride = segments + 1;
    for ring in 0..rings {
        for seg in 0..segments {
            let a = ring * stride + seg;
            let b = a + stride;
            mesh.indices.extend_from_slice(&[a, b, a + 1, a + 1, b, b + 1]);
        }
    }
    mesh
}

/// Closed cylinder standing on the origin, extending `height` along +Z
pub fn create_cylinder_mesh(radius: f32, height: f32, segments: u32, color: [f32; 4]) -> Mesh {
    let segments = segments.max(3);
    let mut mesh = Mesh::new();

    let ring: Vec<(f32, f32)> = (0..=segments)
        .map(|seg| {
            let theta = TAU * seg as f32 / segments as f32;
            (theta.cos(), theta.sin())
        })
        .collect();

    // Sides: bottom/top vertex pairs
    for (i, (c, s)) in ring.iter().enumerate() {
        let u = i as f32 / segments as f32;
        for (z, v) in [(0.0, 1.0), (height, 0.0)] {
            mesh.vertices.push(Vertex {
                position: [radius * c, radius * s, z],
                normal: [*c, *s, 0.0],
                color,
                uv: [u, v],
            });
        }
    }
    for seg in 0..segments {
        let b0 = seg * 2;
        let (t0, b1, t1) = (b0 + 1, b0 + 2, b0 + 3);
        mesh.indices.extend_from_slice(&[b0, b1, t1, b0, t1, t0]);
    }

    // Caps
    for (z, up) in [(0.0, false), (height, true)] {
        let normal = if up { [0.0, 0.0, 1.0] } else { [0.0, 0.0, -1.0] };
        let center = mesh.vertices.len() as u32;
        mesh.vertices.push(Vertex {
            position: [0.0, 0.0, z],
            normal,
            color,
            uv: [0.5, 0.5],
        });
        for (c, s) in &ring {
            mesh.vertices.push(Vertex {
                position: [radius * c, radius * s, z],
                normal,
                color,
                uv: [0.5 + c / 2.0, 0.5 - s / 2.0],
            });
        }
        for seg in 0..segments {
            let (i, j) = (center + 1 + seg, center + 2 + seg);
            if up {
                mesh.indices.extend_from_slice(&[center, i, j]);
            } else {
                mesh.indices.extend_from_slice(&[center, j, i]);
            }
        }
    }
    mesh
}

/// Cone with its tip at the origin, opening back along -X
pub fn create_cone_mesh(radius: f32, length: f32, segments: u32, color: [f32; 4]) -> Mesh {
    let segments = segments.max(3);
    let tip = Vec3::ZERO;
    let center = Vec3::new(-length, 0.0, 0.0);
    let ring: Vec<Vec3> = (0..=segments)
        .map(|seg| {
            let theta = TAU * seg as f32 / segments as f32;
            Vec3::new(-length, radius * theta.cos(), radius * theta.sin())
        })
        .collect();

    let mut mesh = Mesh::new();
    for pair in ring.windows(2) {
        mesh.push_triangle(tip, pair[0], pair[1], color);
        mesh.push_triangle(center, pair[1], pair[0], color);
    }
    mesh
}

/// Category-level placeholder silhouettes
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GenericShape {
    /// Fallback for any unmapped type name
    Object,
    Flyer,
    LongLegs,
    Chappy,
    Snakecrow,
    Swimmer,
}

impl GenericShape {
    pub const ALL: [GenericShape; 6] = [
        GenericShape::Object,
        GenericShape::Flyer,
        GenericShape::LongLegs,
        GenericShape::Chappy,
        GenericShape::Snakecrow,
        GenericShape::Swimmer,
    ];

    /// Category name as used in the enemy model mapping, if the shape has one
    pub fn category(&self) -> Option<&'static str> {
        match self {
            GenericShape::Object => None,
            GenericShape::Flyer => Some("Flyer"),
            GenericShape::LongLegs => Some("Longlegs"),
            GenericShape::Chappy => Some("Chappy"),
            GenericShape::Snakecrow => Some("Snakecrow"),
            GenericShape::Swimmer => Some("Swimmer"),
        }
    }

    pub fn from_category(category: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|shape| shape.category() == Some(category))
    }

    pub fn mesh(&self) -> Mesh {
        match self {
            GenericShape::Object => generic_object(),
            GenericShape::Flyer => generic_flyer(),
            GenericShape::LongLegs => generic_longlegs(),
            GenericShape::Chappy => generic_chappy(),
            GenericShape::Snakecrow => generic_snakecrow(),
            GenericShape::Swimmer => generic_swimmer(),
        }
    }
}

fn placed(mesh: Mesh, at: Vec3) -> Mesh {
    mesh.transformed(&mat4_translation(at))
}

fn generic_object() -> Mesh {
    let mut mesh = create_box_mesh(100.0, 100.0, 100.0, [0.55, 0.55, 0.6, 1.0]);
    // Nose marks the facing direction (+X)
    mesh.append(&placed(
        create_box_mesh(40.0, 30.0, 30.0, [0.2, 0.2, 0.25, 1.0]),
        Vec3::new(70.0, 0.0, 0.0),
    ));
    mesh
}

fn generic_flyer() -> Mesh {
    let body = [0.6, 0.3, 0.8, 1.0];
    let wing = [0.8, 0.6, 0.95, 1.0];
    let mut mesh = placed(create_sphere_mesh(60.0, 16, 8, body), Vec3::new(0.0, 0.0, 200.0));
    for side in [-1.0, 1.0] {
        mesh.append(&placed(
            create_box_mesh(60.0, 140.0, 8.0, wing),
            Vec3::new(0.0, side * 120.0, 210.0),
        ));
    }
    mesh
}

fn generic_longlegs() -> Mesh {
    let body = [0.9, 0.55, 0.2, 1.0];
    let leg = [0.45, 0.3, 0.15, 1.0];
    let mut mesh = placed(create_sphere_mesh(80.0, 16, 8, body), Vec3::new(0.0, 0.0, 320.0));
    for (x, y) in [(1.0, 1.0), (1.0, -1.0), (-1.0, 1.0), (-1.0, -1.0)] {
        mesh.append(&placed(
            create_box_mesh(14.0, 14.0, 300.0, leg),
            Vec3::new(x * 90.0, y * 90.0, 150.0),
        ));
    }
    mesh
}

fn generic_chappy() -> Mesh {
    let body = [0.85, 0.2, 0.2, 1.0];
    let mouth = [0.95, 0.9, 0.85, 1.0];
    let squash = mat4_mul(
        &mat4_translation(Vec3::new(0.0, 0.0, 110.0)),
        &mat4_scale(Vec3::new(1.2, 1.0, 0.9)),
    );
    let mut mesh = create_sphere_mesh(120.0, 20, 10, body).transformed(&squash);
    mesh.append(&placed(
        create_box_mesh(30.0, 160.0, 40.0, mouth),
        Vec3::new(135.0, 0.0, 110.0),
    ));
    mesh
}

fn generic_snakecrow() -> Mesh {
    let body = [0.3, 0.65, 0.3, 1.0];
    let head = [0.15, 0.15, 0.15, 1.0];
    let mut mesh = Mesh::new();
    for i in 0..4 {
        let r = 45.0 - i as f32 * 6.0;
        mesh.append(&placed(
            create_sphere_mesh(r, 12, 6, body),
            Vec3::new(-(i as f32) * 70.0, 0.0, 60.0 + i as f32 * 20.0),
        ));
    }
    mesh.append(&placed(
        create_cone_mesh(30.0, 60.0, 12, head),
        Vec3::new(110.0, 0.0, 70.0),
    ));
    mesh
}

fn generic_swimmer() -> Mesh {
    let body = [0.2, 0.7, 0.8, 1.0];
    let fin = [0.1, 0.4, 0.5, 1.0];
    let flatten = mat4_mul(
        &mat4_translation(Vec3::new(0.0, 0.0, 40.0)),
        &mat4_scale(Vec3::new(1.6, 0.8, 0.5)),
    );
    let mut mesh = create_sphere_mesh(80.0, 16, 8, body).transformed(&flatten);
    mesh.append(&placed(
        create_box_mesh(50.0, 8.0, 70.0, fin),
        Vec3::new(-150.0, 0.0, 50.0),
    ));
    mesh
}
