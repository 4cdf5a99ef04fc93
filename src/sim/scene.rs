//! The scene: immutable mesh geometry plus the mutable signal grid.

use crate::error::{Error, Result};
use crate::geom::bboxes::BoundingBox;
use crate::geom::mesh::Mesh;
use crate::sim::emitter::Emitter;
use crate::sim::grid::{GridDims, VoxelGrid};
use crate::{Point, Triangle, Vector};

/// Padding added around the mesh bounding box.
const BBOX_PADDING: f64 = 1e-4;

/// Immutable geometry snapshot shared by tracers and the camera.
///
/// Fixed at scene construction; requires no synchronization.
pub struct SceneGeometry {
    triangles: Vec<Triangle>,
    bounds: BoundingBox,
    mesh_max_z: f64,
}

impl SceneGeometry {
    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    /// Padded axis-aligned bounds derived from the mesh vertices.
    pub fn bounds(&self) -> &BoundingBox {
        &self.bounds
    }

    /// Highest Z among mesh vertices, before bbox padding.
    ///
    /// The renderer compares against this to classify roof surfaces; the
    /// padded maximum would sit strictly above every vertex and never
    /// match.
    pub fn mesh_max_z(&self) -> f64 {
        self.mesh_max_z
    }
}

/// A simulation scene.
///
/// Geometry and grid are kept as two separate substructures so the
/// read-only / read-write split is visible in the types: tracers borrow
/// `geometry` immutably while depositing into grids merged into `grid`,
/// and the camera takes the whole scene by shared reference.
pub struct Scene {
    pub emitter: Emitter,
    pub geometry: SceneGeometry,
    pub grid: VoxelGrid,
}

impl Scene {
    /// Builds a scene from an ingested mesh.
    ///
    /// The bounding box is derived from the mesh vertices with a small
    /// padding; the voxel grid covers that box and starts at zero.
    pub fn new(emitter: Emitter, mesh: &Mesh, dims: GridDims) -> Result<Self> {
        if mesh.vertices.is_empty() || mesh.faces.is_empty() {
            return Err(Error::InvalidConfiguration(
                "mesh has no geometry".to_string(),
            ));
        }
        for face in &mesh.faces {
            let n = mesh.vertices.len();
            if face.0 >= n || face.1 >= n || face.2 >= n {
                return Err(Error::InvalidConfiguration(format!(
                    "face ({}, {}, {}) references a vertex outside the mesh",
                    face.0, face.1, face.2
                )));
            }
        }

        let raw = BoundingBox::from_points(&mesh.vertices).ok_or_else(|| {
            Error::InvalidConfiguration("mesh has no vertices".to_string())
        })?;
        let bounds = raw.padded(BBOX_PADDING);

        let geometry = SceneGeometry {
            triangles: mesh.triangles(),
            bounds,
            mesh_max_z: raw.max.z,
        };
        let grid = VoxelGrid::new(dims, bounds);

        Ok(Self {
            emitter,
            geometry,
            grid,
        })
    }

    /// Checks whether a point lies inside the scene bounding box.
    pub fn in_bounds(&self, point: Point) -> bool {
        self.geometry.bounds.contains(point)
    }

    /// Extent of one voxel along each axis.
    pub fn voxel_size(&self) -> Vector {
        self.grid.voxel_size()
    }

    /// Deposits a power sample at `point` (write-if-greater).
    pub fn update_voxel(&mut self, point: Point, value: f64) -> Result<()> {
        self.grid.update(point, value)
    }

    /// Reads the raw signal value at `point`.
    pub fn voxel_value(&self, point: Point) -> Result<f64> {
        self.grid.value_at(point)
    }

    /// Smoothing barrier between tracing and rendering.
    ///
    /// Must complete before any camera reads the grid.
    pub fn apply_box_filter(&mut self, radius: usize) -> Result<()> {
        self.grid.apply_box_filter(radius)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::mesh::TriangleIndex;

    fn test_emitter() -> Emitter {
        Emitter::new(Point::new(5., 5., 5.), 1.0, 1000.0).unwrap()
    }

    #[test]
    fn test_scene_from_box_mesh() {
        let mesh = Mesh::from_box(10.0, 10.0, 10.0, None);
        let scene = Scene::new(test_emitter(), &mesh, GridDims::new(1, 1, 1).unwrap()).unwrap();

        // Bounds are padded, so the voxel size is 10 up to the padding
        let size = scene.voxel_size();
        assert!((size.dx - 10.0).abs() < 1e-3);
        assert!((size.dy - 10.0).abs() < 1e-3);
        assert!((size.dz - 10.0).abs() < 1e-3);

        assert!((scene.geometry.mesh_max_z() - 10.0).abs() < 1e-12);
        assert_eq!(scene.geometry.triangles().len(), 12);
    }

    #[test]
    fn test_in_bounds_with_padding() {
        let mesh = Mesh::from_box(10.0, 10.0, 10.0, None);
        let scene = Scene::new(test_emitter(), &mesh, GridDims::new(4, 4, 4).unwrap()).unwrap();

        assert!(scene.in_bounds(Point::new(5., 5., 5.)));
        // Mesh corners fall inside the padded box
        assert!(scene.in_bounds(Point::new(0., 0., 0.)));
        assert!(scene.in_bounds(Point::new(10., 10., 10.)));
        assert!(!scene.in_bounds(Point::new(10.1, 5., 5.)));
    }

    #[test]
    fn test_update_and_read() {
        let mesh = Mesh::from_box(10.0, 10.0, 10.0, None);
        let mut scene = Scene::new(test_emitter(), &mesh, GridDims::new(4, 4, 4).unwrap()).unwrap();

        let p = Point::new(5., 5., 5.);
        scene.update_voxel(p, 123.0).unwrap();
        assert!((scene.voxel_value(p).unwrap() - 123.0).abs() < 1e-12);

        assert!(matches!(
            scene.update_voxel(Point::new(50., 5., 5.), 1.0),
            Err(Error::OutOfBounds(_))
        ));
    }

    #[test]
    fn test_empty_mesh_is_rejected() {
        let mesh = Mesh::new(vec![], vec![]);
        let result = Scene::new(test_emitter(), &mesh, GridDims::new(4, 4, 4).unwrap());
        assert!(matches!(result, Err(Error::InvalidConfiguration(_))));
    }

    #[test]
    fn test_bad_face_index_is_rejected() {
        let mesh = Mesh::new(
            vec![
                Point::new(0., 0., 0.),
                Point::new(1., 0., 0.),
                Point::new(0., 1., 0.),
            ],
            vec![TriangleIndex(0, 1, 9)],
        );
        let result = Scene::new(test_emitter(), &mesh, GridDims::new(4, 4, 4).unwrap());
        assert!(matches!(result, Err(Error::InvalidConfiguration(_))));
    }
}
