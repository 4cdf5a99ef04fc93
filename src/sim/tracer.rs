//! Per-ray propagation loop.

use crate::error::Result;
use crate::sim::emitter::Emitter;
use crate::sim::grid::VoxelGrid;
use crate::sim::ray::SignalRay;
use crate::sim::scene::SceneGeometry;

/// Hits closer than this are ignored when searching for the next
/// reflective surface, so a ray does not re-select the surface it just
/// bounced off.
const MIN_HIT_DISTANCE: f64 = 1e-3;

/// A ray advances by the smallest voxel extent divided by this, fine
/// enough that no voxel along the path is skipped.
const STEPS_PER_VOXEL: f64 = 10.0;

/// Drives single rays from the emitter through the scene, depositing
/// power samples into a voxel grid.
///
/// Holds only shared references to immutable scene data plus the bounce
/// budget, so one tracer can serve many parallel invocations. Each traced
/// ray is owned exclusively by the call driving it.
pub struct Tracer<'a> {
    geometry: &'a SceneGeometry,
    emitter: &'a Emitter,
    max_reflections: Option<u32>,
}

impl<'a> Tracer<'a> {
    /// `max_reflections: None` removes the bounce budget.
    pub fn new(
        geometry: &'a SceneGeometry,
        emitter: &'a Emitter,
        max_reflections: Option<u32>,
    ) -> Self {
        Self {
            geometry,
            emitter,
            max_reflections,
        }
    }

    /// Power below which a trace is considered exhausted.
    pub fn power_floor(transmit_power: f64) -> f64 {
        (transmit_power / 10_000.0).min(1.0)
    }

    /// Finds the globally nearest triangle ahead of the ray and arms its
    /// reflection. Leaves the ray going straight if nothing is hit.
    fn arm_reflection(&self, ray: &mut SignalRay) {
        let mut nearest: Option<(usize, f64)> = None;
        for (idx, triangle) in self.geometry.triangles().iter().enumerate() {
            if let Some(distance) = ray.check_intersection(triangle) {
                if distance < MIN_HIT_DISTANCE {
                    continue;
                }
                match nearest {
                    None => nearest = Some((idx, distance)),
                    Some((_, best)) if distance < best => nearest = Some((idx, distance)),
                    _ => {}
                }
            }
        }
        if let Some((idx, distance)) = nearest {
            ray.set_reflection(&self.geometry.triangles()[idx], distance);
        }
    }

    /// Emits one random ray from the emitter and traces it into `grid`.
    ///
    /// Returns the number of reflections the ray underwent.
    pub fn trace_emitted_ray(&self, grid: &mut VoxelGrid) -> Result<u32> {
        self.trace_ray(self.emitter.emit_ray(), grid)
    }

    /// Traces `ray` until its power drops to the floor, it leaves the
    /// scene bounds, or the bounce budget runs out.
    pub fn trace_ray(&self, mut ray: SignalRay, grid: &mut VoxelGrid) -> Result<u32> {
        let size = grid.voxel_size();
        let step_size = size.dx.min(size.dy).min(size.dz) / STEPS_PER_VOXEL;
        let floor = Self::power_floor(self.emitter.power());

        self.arm_reflection(&mut ray);

        while ray.power() > floor && self.geometry.bounds().contains(ray.position()) {
            grid.update(ray.position(), ray.power())?;

            if ray.make_step(step_size) {
                let within_budget = match self.max_reflections {
                    None => true,
                    Some(max) => ray.reflections() <= max,
                };
                if !within_budget {
                    // Budget exhausted: normal early termination, even
                    // though the ray may still be in bounds with power left.
                    return Ok(ray.reflections());
                }
                // The cached surface was consumed; find the next one.
                self.arm_reflection(&mut ray);
            }
        }
        Ok(ray.reflections())
    }
}
