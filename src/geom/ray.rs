//! Ray-geometry intersection tests.
//!
//! These are the pure primitives the simulation and the renderer are built
//! on: Moller-Trumbore ray/triangle intersection and a ray/sphere test for
//! the emitter's emission volume.

use crate::{Point, Triangle, Vector};

/// Determinant threshold below which the ray is treated as parallel to the
/// triangle plane.
const DET_EPS: f64 = 1e-10;

/// Moller-Trumbore ray/triangle intersection.
///
/// `direction` must be a unit vector so the returned parameter is the
/// distance along the ray. The test is two-sided (no backface culling).
/// Returns None for parallel rays, intersections outside the triangle,
/// and intersections behind the origin.
pub fn moller_trumbore(
    origin: Point,
    direction: Vector,
    p0: Point,
    p1: Point,
    p2: Point,
) -> Option<f64> {
    let edge1 = p1 - p0;
    let edge2 = p2 - p0;

    let pvec = direction.cross(&edge2);
    let det = edge1.dot(&pvec);
    if det.abs() < DET_EPS {
        return None; // Ray parallel to the triangle plane
    }
    let inv_det = 1.0 / det;

    let tvec = origin - p0;
    let u = tvec.dot(&pvec) * inv_det;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let qvec = tvec.cross(&edge1);
    let v = direction.dot(&qvec) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = edge2.dot(&qvec) * inv_det;
    if t <= 0.0 {
        return None; // Intersection behind the ray origin
    }
    Some(t)
}

/// Distance to the triangle along a unit direction, if hit in front of the origin.
pub fn intersect_triangle(origin: Point, direction: Vector, triangle: &Triangle) -> Option<f64> {
    moller_trumbore(
        origin,
        direction,
        triangle.v[0],
        triangle.v[1],
        triangle.v[2],
    )
}

/// Nearest intersection of a ray with a sphere.
///
/// `direction` must be a unit vector. Returns the distance, the
/// intersection point, and the outward unit normal at that point.
pub fn intersect_sphere(
    origin: Point,
    direction: Vector,
    center: Point,
    radius: f64,
) -> Option<(f64, Point, Vector)> {
    let oc = origin - center;
    let b = oc.dot(&direction);
    let c = oc.dot(&oc) - radius * radius;

    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }
    let sqrt_disc = disc.sqrt();

    // Nearest intersection in front of the origin; the farther root covers
    // origins inside the sphere.
    let mut t = -b - sqrt_disc;
    if t <= 0.0 {
        t = -b + sqrt_disc;
    }
    if t <= 0.0 {
        return None;
    }

    let point = origin + direction * t;
    let normal = (point - center).normalize()?;
    Some((t, point, normal))
}
