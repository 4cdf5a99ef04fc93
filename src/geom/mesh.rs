use crate::{Point, Triangle};

/// Type for holding vertex indices for a triangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriangleIndex(pub usize, pub usize, pub usize);

/// A flat triangle mesh: a vertex list plus triangulated faces.
///
/// This is all the simulation needs from an ingested model: the triangles
/// to collide with and the vertex set the scene bounds are derived from.
#[derive(Debug, Clone)]
pub struct Mesh {
    pub vertices: Vec<Point>,
    pub faces: Vec<TriangleIndex>,
}

impl Mesh {
    pub fn new(vertices: Vec<Point>, faces: Vec<TriangleIndex>) -> Self {
        Self { vertices, faces }
    }

    /// Materializes the faces as triangles.
    ///
    /// # Panics
    /// Panics if a face references a vertex that does not exist.
    pub fn triangles(&self) -> Vec<Triangle> {
        self.faces
            .iter()
            .map(|f| Triangle::new(self.vertices[f.0], self.vertices[f.1], self.vertices[f.2]))
            .collect()
    }

    /// Builds a closed box room of 12 triangles with the given edge lengths.
    ///
    /// The box spans `[0, dx] x [0, dy] x [0, dz]`, optionally shifted by
    /// `origin`.
    pub fn from_box(dx: f64, dy: f64, dz: f64, origin: Option<(f64, f64, f64)>) -> Self {
        let (ox, oy, oz) = origin.unwrap_or((0.0, 0.0, 0.0));

        // Corner (i, j, k) sits at the min (0) or max (1) end of each axis.
        let mut vertices = Vec::with_capacity(8);
        for i in 0..2 {
            for j in 0..2 {
                for k in 0..2 {
                    vertices.push(Point::new(
                        ox + if i == 1 { dx } else { 0.0 },
                        oy + if j == 1 { dy } else { 0.0 },
                        oz + if k == 1 { dz } else { 0.0 },
                    ));
                }
            }
        }

        // Index of corner (i, j, k) in `vertices`
        let at = |i: usize, j: usize, k: usize| -> usize { (i * 2 + j) * 2 + k };

        let faces = vec![
            // x = min and x = max walls
            TriangleIndex(at(0, 0, 0), at(0, 0, 1), at(0, 1, 0)),
            TriangleIndex(at(0, 1, 1), at(0, 0, 1), at(0, 1, 0)),
            TriangleIndex(at(1, 0, 0), at(1, 0, 1), at(1, 1, 0)),
            TriangleIndex(at(1, 1, 1), at(1, 0, 1), at(1, 1, 0)),
            // y = min and y = max walls
            TriangleIndex(at(0, 0, 0), at(0, 0, 1), at(1, 0, 0)),
            TriangleIndex(at(1, 0, 1), at(0, 0, 1), at(1, 0, 0)),
            TriangleIndex(at(0, 1, 0), at(0, 1, 1), at(1, 1, 0)),
            TriangleIndex(at(1, 1, 1), at(0, 1, 1), at(1, 1, 0)),
            // floor (z = min) and roof (z = max)
            TriangleIndex(at(0, 0, 0), at(0, 1, 0), at(1, 0, 0)),
            TriangleIndex(at(1, 1, 0), at(0, 1, 0), at(1, 0, 0)),
            TriangleIndex(at(0, 0, 1), at(0, 1, 1), at(1, 0, 1)),
            TriangleIndex(at(1, 1, 1), at(0, 1, 1), at(1, 0, 1)),
        ];

        Self { vertices, faces }
    }
}
