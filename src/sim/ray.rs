//! The propagation ray and its pending-reflection state machine.

use crate::geom::ray::intersect_triangle;
use crate::{Point, Triangle, Vector};

/// Reflection state carried by a ray between steps.
///
/// The armed intersection point and outgoing direction travel together in
/// the `Pending` variant, so a stale cached point with a cleared flag is
/// unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReflectionState {
    Straight,
    Pending { point: Point, direction: Vector },
}

/// A signal ray stepping through the scene.
///
/// Remaining power is `initial power - traveled distance`. The units do
/// not match (power vs. length); this linear attenuation is deliberately
/// non-physical and kept for compatibility with the reference output.
#[derive(Debug, Clone)]
pub struct SignalRay {
    origin: Point,
    direction: Vector,
    power: f64,
    traveled: f64,
    reflections: u32,
    state: ReflectionState,
}

impl SignalRay {
    /// Creates a ray at `origin` moving along `direction` (normalized here).
    ///
    /// Returns None for a zero-length direction.
    pub fn new(origin: Point, direction: Vector, power: f64) -> Option<Self> {
        let direction = direction.normalize()?;
        Some(Self {
            origin,
            direction,
            power,
            traveled: 0.0,
            reflections: 0,
            state: ReflectionState::Straight,
        })
    }

    /// Current position.
    pub fn position(&self) -> Point {
        self.origin
    }

    /// Current unit direction.
    pub fn direction(&self) -> Vector {
        self.direction
    }

    /// Remaining power: initial power minus traveled distance.
    pub fn power(&self) -> f64 {
        self.power - self.traveled
    }

    pub fn traveled_distance(&self) -> f64 {
        self.traveled
    }

    /// Number of completed bounces.
    pub fn reflections(&self) -> u32 {
        self.reflections
    }

    pub fn is_reflection_pending(&self) -> bool {
        matches!(self.state, ReflectionState::Pending { .. })
    }

    /// Distance to the triangle along the ray, if it is hit in front of
    /// the origin.
    pub fn check_intersection(&self, triangle: &Triangle) -> Option<f64> {
        intersect_triangle(self.origin, self.direction, triangle)
    }

    /// Arms the pending reflection against a triangle hit at `distance`.
    ///
    /// The ray does not move yet; `make_step` snaps onto the cached point
    /// once it is within reach. Degenerate triangles leave the ray going
    /// straight.
    pub fn set_reflection(&mut self, triangle: &Triangle, distance: f64) {
        let Some(normal) = triangle.normal() else {
            return;
        };
        let Some(direction) = self.direction.reflect(&normal).normalize() else {
            return;
        };
        let point = self.origin + self.direction * distance;
        self.state = ReflectionState::Pending { point, direction };
    }

    /// Advances the ray by one step. Returns true if the ray bounced.
    ///
    /// With a pending reflection within `step_size`, the ray lands exactly
    /// on the cached intersection point (never partway, so it cannot drift
    /// past the surface), adopts the cached direction, and clears the
    /// pending state; the caller must then arm the next reflection.
    pub fn make_step(&mut self, step_size: f64) -> bool {
        if let ReflectionState::Pending { point, direction } = self.state {
            let remaining = self.origin.distance_to(&point);
            if remaining <= step_size {
                self.origin = point;
                self.direction = direction;
                self.traveled += remaining;
                self.reflections += 1;
                self.state = ReflectionState::Straight;
                return true;
            }
        }
        self.origin = self.origin + self.direction * step_size;
        self.traveled += step_size;
        false
    }
}
