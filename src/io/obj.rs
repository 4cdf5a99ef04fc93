//! Wavefront OBJ ingestion.
//!
//! Only the subset the simulation needs is read: `v` vertex records and
//! `f` face records (with optional `/vt` and `/vn` parts, which are
//! dropped). Faces with more than three vertices are fan-triangulated.
//! Everything else (normals, texture coordinates, groups, materials) is
//! ignored.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::Point;
use crate::error::{Error, Result};
use crate::geom::mesh::{Mesh, TriangleIndex};

/// Reads a triangle mesh from a Wavefront OBJ file.
///
/// Malformed or missing files fail with `Error::AssetLoad` before any
/// simulation starts; so do files containing no vertices or no faces.
pub fn read_obj(path: &Path) -> Result<Mesh> {
    let file = File::open(path).map_err(|e| load_error(path, 0, &e.to_string()))?;
    let reader = BufReader::new(file);

    let mut vertices: Vec<Point> = Vec::new();
    let mut faces: Vec<TriangleIndex> = Vec::new();

    for (i, line) in reader.lines().enumerate() {
        let lineno = i + 1;
        let line = line.map_err(|e| load_error(path, lineno, &e.to_string()))?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let mut parts = trimmed.split_whitespace();
        match parts.next() {
            Some("v") => {
                let coords: Vec<&str> = parts.collect();
                if coords.len() < 3 {
                    return Err(load_error(path, lineno, "vertex needs 3 coordinates"));
                }
                let mut xyz = [0.0f64; 3];
                for (slot, token) in xyz.iter_mut().zip(&coords) {
                    *slot = token
                        .parse()
                        .map_err(|_| load_error(path, lineno, "invalid vertex coordinate"))?;
                }
                vertices.push(Point::new(xyz[0], xyz[1], xyz[2]));
            }
            Some("f") => {
                let indices: Vec<usize> = parts
                    .map(|token| parse_face_index(token, vertices.len(), path, lineno))
                    .collect::<Result<_>>()?;
                if indices.len() < 3 {
                    return Err(load_error(path, lineno, "face needs at least 3 vertices"));
                }
                // Fan triangulation around the first vertex
                for k in 1..indices.len() - 1 {
                    faces.push(TriangleIndex(indices[0], indices[k], indices[k + 1]));
                }
            }
            // vn, vt, o, g, s, usemtl, mtllib and friends
            _ => {}
        }
    }

    if vertices.is_empty() || faces.is_empty() {
        return Err(load_error(path, 0, "file contains no triangle geometry"));
    }
    Ok(Mesh::new(vertices, faces))
}

/// Parses one face vertex token (`v`, `v/vt`, `v//vn` or `v/vt/vn`) into
/// a zero-based vertex index. Negative indices are relative to the
/// vertices read so far.
fn parse_face_index(
    token: &str,
    num_vertices: usize,
    path: &Path,
    lineno: usize,
) -> Result<usize> {
    let vertex_part = token.split('/').next().unwrap_or("");
    let value: i64 = vertex_part
        .parse()
        .map_err(|_| load_error(path, lineno, "invalid face index"))?;

    let index = if value < 0 {
        num_vertices as i64 + value
    } else {
        value - 1 // OBJ indices are 1-based
    };

    if index < 0 || index >= num_vertices as i64 {
        return Err(load_error(path, lineno, "face index out of range"));
    }
    Ok(index as usize)
}

fn load_error(path: &Path, lineno: usize, message: &str) -> Error {
    let reason = if lineno > 0 {
        format!("line {lineno}: {message}")
    } else {
        message.to_string()
    };
    Error::AssetLoad {
        path: path.to_path_buf(),
        reason,
    }
}
