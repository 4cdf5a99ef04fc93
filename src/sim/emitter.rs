use rand::Rng;

use crate::error::{Error, Result};
use crate::sim::ray::SignalRay;
use crate::{Point, Vector};

/// A point signal source with a spherical emission volume.
///
/// Immutable after construction; produces rays on demand and owns no
/// mutable state, so it can be shared freely between tracing tasks.
#[derive(Debug, Clone, Copy)]
pub struct Emitter {
    origin: Point,
    radius: f64,
    power: f64,
}

impl Emitter {
    pub fn new(origin: Point, radius: f64, power: f64) -> Result<Self> {
        if radius <= 0.0 {
            return Err(Error::InvalidConfiguration(
                "emitter radius must be positive".to_string(),
            ));
        }
        if power <= 0.0 {
            return Err(Error::InvalidConfiguration(
                "transmit power must be positive".to_string(),
            ));
        }
        Ok(Self {
            origin,
            radius,
            power,
        })
    }

    pub fn origin(&self) -> Point {
        self.origin
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn power(&self) -> f64 {
        self.power
    }

    /// Emits a ray from the emitter center in a uniformly random direction,
    /// carrying the full transmit power.
    pub fn emit_ray(&self) -> SignalRay {
        let mut rng = rand::thread_rng();
        // Rejection-sample the unit ball and normalize, which is uniform
        // on the sphere.
        loop {
            let candidate = Vector::new(
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
            );
            let len2 = candidate.dot(&candidate);
            if len2 < 1e-6 || len2 > 1.0 {
                continue;
            }
            if let Some(ray) = SignalRay::new(self.origin, candidate, self.power) {
                return ray;
            }
        }
    }
}
