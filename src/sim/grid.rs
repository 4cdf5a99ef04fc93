//! Voxel grid accumulating signal-strength samples.

use crate::error::{Error, Result};
use crate::geom::bboxes::BoundingBox;
use crate::{Point, Vector};

/// Grid resolution along each axis. Every dimension must be positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridDims {
    pub x: usize,
    pub y: usize,
    pub z: usize,
}

impl GridDims {
    pub fn new(x: usize, y: usize, z: usize) -> Result<Self> {
        if x == 0 || y == 0 || z == 0 {
            return Err(Error::InvalidConfiguration(
                "grid dimensions must be positive".to_string(),
            ));
        }
        Ok(Self { x, y, z })
    }

    pub fn cell_count(&self) -> usize {
        self.x * self.y * self.z
    }
}

/// Discretized signal-strength field over the scene bounding box.
///
/// Each cell holds the maximum power ever deposited at its location
/// (write-if-greater), so concurrent tracing partitions can be merged with
/// an element-wise max in any order. The one-shot box filter is the only
/// operation allowed to lower a cell.
#[derive(Debug, Clone)]
pub struct VoxelGrid {
    dims: GridDims,
    bounds: BoundingBox,
    values: Vec<f64>,
}

impl VoxelGrid {
    pub fn new(dims: GridDims, bounds: BoundingBox) -> Self {
        let values = vec![0.0; dims.cell_count()];
        Self {
            dims,
            bounds,
            values,
        }
    }

    pub fn dims(&self) -> GridDims {
        self.dims
    }

    pub fn bounds(&self) -> &BoundingBox {
        &self.bounds
    }

    /// Extent of one voxel along each axis.
    pub fn voxel_size(&self) -> Vector {
        let size = self.bounds.size();
        Vector::new(
            size.dx / self.dims.x as f64,
            size.dy / self.dims.y as f64,
            size.dz / self.dims.z as f64,
        )
    }

    pub fn contains(&self, point: Point) -> bool {
        self.bounds.contains(point)
    }

    /// Maps a point inside the bounds to its cell indices.
    ///
    /// Linear interpolation per axis, floored and clamped to `[0, dim-1]`,
    /// so the min corner maps to 0 and the max corner to the last cell.
    pub fn voxel_index(&self, point: Point) -> Result<(usize, usize, usize)> {
        if !self.bounds.contains(point) {
            return Err(Error::OutOfBounds(point));
        }
        Ok((
            Self::axis_index(point.x, self.bounds.min.x, self.bounds.max.x, self.dims.x),
            Self::axis_index(point.y, self.bounds.min.y, self.bounds.max.y, self.dims.y),
            Self::axis_index(point.z, self.bounds.min.z, self.bounds.max.z, self.dims.z),
        ))
    }

    fn axis_index(value: f64, min: f64, max: f64, dim: usize) -> usize {
        let t = (value - min) / (max - min);
        let idx = (t * dim as f64).floor() as i64;
        idx.clamp(0, dim as i64 - 1) as usize
    }

    fn flat(&self, x: usize, y: usize, z: usize) -> usize {
        (x * self.dims.y + y) * self.dims.z + z
    }

    /// Raw value of cell (x, y, z), or None outside the grid.
    pub fn cell(&self, x: usize, y: usize, z: usize) -> Option<f64> {
        if x >= self.dims.x || y >= self.dims.y || z >= self.dims.z {
            return None;
        }
        Some(self.values[self.flat(x, y, z)])
    }

    /// Deposits `value` into the cell containing `point` if it is greater
    /// than the stored value. Rejects points outside the bounds.
    pub fn update(&mut self, point: Point, value: f64) -> Result<()> {
        let (x, y, z) = self.voxel_index(point)?;
        let i = self.flat(x, y, z);
        if value > self.values[i] {
            self.values[i] = value;
        }
        Ok(())
    }

    /// Value of the cell containing `point`.
    pub fn value_at(&self, point: Point) -> Result<f64> {
        let (x, y, z) = self.voxel_index(point)?;
        Ok(self.values[self.flat(x, y, z)])
    }

    /// Largest value stored anywhere in the grid.
    pub fn max_value(&self) -> f64 {
        self.values.iter().cloned().fold(0.0, f64::max)
    }

    /// One-shot box blur with the given radius.
    ///
    /// Each interior cell becomes the unweighted mean of the `(2r+1)^3`
    /// cube around it; a border of `radius` cells per axis is left
    /// untouched. Averages are computed from a snapshot of the pre-filter
    /// values, never from partially filtered neighbors.
    pub fn apply_box_filter(&mut self, radius: usize) -> Result<()> {
        if radius == 0 {
            return Err(Error::InvalidConfiguration(
                "box filter radius must be positive".to_string(),
            ));
        }

        let snapshot = self.values.clone();
        let (nx, ny, nz) = (self.dims.x, self.dims.y, self.dims.z);
        let cube = ((2 * radius + 1) as f64).powi(3);

        for x in radius..nx.saturating_sub(radius) {
            for y in radius..ny.saturating_sub(radius) {
                for z in radius..nz.saturating_sub(radius) {
                    let mut sum = 0.0;
                    for xx in (x - radius)..=(x + radius) {
                        for yy in (y - radius)..=(y + radius) {
                            for zz in (z - radius)..=(z + radius) {
                                sum += snapshot[(xx * ny + yy) * nz + zz];
                            }
                        }
                    }
                    let i = self.flat(x, y, z);
                    self.values[i] = sum / cube;
                }
            }
        }
        Ok(())
    }

    /// A zeroed grid with the same dimensions and bounds.
    pub fn empty_like(&self) -> Self {
        Self::new(self.dims, self.bounds)
    }

    /// Element-wise max merge of a partition grid into this one.
    pub fn merge_max(&mut self, other: &VoxelGrid) {
        debug_assert_eq!(self.dims, other.dims);
        for (a, b) in self.values.iter_mut().zip(&other.values) {
            if *b > *a {
                *a = *b;
            }
        }
    }
}
