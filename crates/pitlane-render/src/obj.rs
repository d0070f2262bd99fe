//! Wavefront OBJ loading for model and utility meshes
//!
//! Parsing is done by `tobj`, triangulated and flattened to a single index
//! buffer. Every object and group in the file is merged into one mesh and
//! materials are ignored. Meshes come back exactly as authored; callers decide
//! whether to convert them to world axes.

use crate::primitives::{Mesh, Vertex};
use pitlane_core::{PitlaneError, Result};
use std::io::BufReader;
use std::path::Path;

const OBJ_COLOR: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

fn load_options() -> tobj::LoadOptions {
    tobj::LoadOptions {
        triangulate: true,
        single_index: true,
        ignore_points: true,
        ignore_lines: true,
        ..Default::default()
    }
}

/// Parse OBJ text into a triangle mesh
pub fn parse_obj(text: &str) -> Result<Mesh> {
    let mut reader = BufReader::new(text.as_bytes());
    let (models, _materials) = tobj::load_obj_buf(&mut reader, &load_options(), |_| {
        Err(tobj::LoadError::OpenFileFailed)
    })
    .map_err(|e| PitlaneError::ObjLoadError(e.to_string()))?;
    build_mesh(models).map_err(PitlaneError::ObjLoadError)
}

/// Load and parse an OBJ file
pub fn load_obj(path: &Path) -> Result<Mesh> {
    let (models, _materials) = tobj::load_obj(path, &load_options())
        .map_err(|e| PitlaneError::ObjLoadError(format!("{}: {}", path.display(), e)))?;
    build_mesh(models).map_err(|e| PitlaneError::ObjLoadError(format!("{}: {}", path.display(), e)))
}

/// Merge tobj models into one mesh
fn build_mesh(models: Vec<tobj::Model>) -> std::result::Result<Mesh, String> {
    let mut mesh = Mesh::new();
    let mut needs_normals = false;

    for model in models {
        let m = model.mesh;
        let base = mesh.vertices.len() as u32;
        let count = m.positions.len() / 3;

        for i in 0..count {
            let normal = if m.normals.len() >= (i + 1) * 3 {
                [m.normals[i * 3], m.normals[i * 3 + 1], m.normals[i * 3 + 2]]
            } else {
                needs_normals = true;
                [0.0, 0.0, 0.0]
            };
            // V is flipped for a top-left texture origin
            let uv = if m.texcoords.len() >= (i + 1) * 2 {
                [m.texcoords[i * 2], 1.0 - m.texcoords[i * 2 + 1]]
            } else {
                [0.0, 0.0]
            };
            mesh.vertices.push(Vertex {
                position: [m.positions[i * 3], m.positions[i * 3 + 1], m.positions[i * 3 + 2]],
                normal,
                color: OBJ_COLOR,
                uv,
            });
        }

        mesh.indices.extend(m.indices.iter().map(|i| base + i));
    }

    if mesh.is_empty() {
        return Err("no faces found".to_string());
    }
    if needs_normals {
        fill_face_normals(&mut mesh);
    }
    Ok(mesh)
}

/// Give vertices without a normal the normal of their triangle
fn fill_face_normals(mesh: &mut Mesh) {
    for tri in mesh.indices.chunks(3) {
        if tri.len() < 3 {
            continue;
        }
        let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| mesh.vertices[i as usize].position);
        let e1 = [b[0] - a[0], b[1] - a[1], b[2] - a[2]];
        let e2 = [c[0] - a[0], c[1] - a[1], c[2] - a[2]];
        let n = [
            e1[1] * e2[2] - e1[2] * e2[1],
            e1[2] * e2[0] - e1[0] * e2[2],
            e1[0] * e2[1] - e1[1] * e2[0],
        ];
        let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
        if len <= f32::EPSILON {
            continue;
        }
        for &i in tri {
            let v = &mut mesh.vertices[i as usize];
            if v.normal == [0.0, 0.0, 0.0] {
                v.normal = [n[0] / len, n[1] / len, n[2] / len];
            }
        }
    }
}
