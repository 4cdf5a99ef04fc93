//! Pinhole camera rendering of the traced signal field.
//!
//! The camera reuses the simulation's intersection and stepping machinery:
//! per-pixel view rays are cast against the mesh and the emitter sphere,
//! and a secondary ray is walked back through the voxel grid to composite
//! a false-color overlay onto a simple diffuse shading term.

use std::f64::consts::PI;

use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::geom::ray::intersect_sphere;
use crate::render::colors::{Color, power_color};
use crate::render::photo::Photo;
use crate::sim::ray::SignalRay;
use crate::sim::scene::Scene;
use crate::{Point, Vector};

/// Blend weight of one back-trace sample.
const BLEND_ALPHA: f64 = 0.02;
/// Step used to walk a back ray into the scene bounds.
const ENTRY_STEP: f64 = 0.01;
/// The back-trace advances by the smallest voxel extent divided by this.
const STEPS_PER_VOXEL: f64 = 2.0;
/// Power carried by view rays. They are never deposited, so any positive
/// value works.
const VIEW_RAY_POWER: f64 = 1000.0;

/// Camera placement and imaging parameters.
#[derive(Debug, Clone)]
pub struct CameraConfig {
    pub position: Point,
    pub view_dir: Vector,
    pub up: Vector,
    pub right: Vector,
    /// Vertical field of view in radians, in (0, pi).
    pub height_angle: f64,
    /// Horizontal field of view in radians, in (0, pi).
    pub width_angle: f64,
    /// The smaller image side gets this many pixels (bumped to even).
    pub least_dim: usize,
    /// Skip triangles lying at the mesh max Z when looking for hits.
    ///
    /// A heuristic from the original room convention (roof as the topmost
    /// flat surface); disable for meshes authored differently.
    pub ignore_roof: bool,
    /// Tolerance for classifying a vertex as part of the roof.
    pub roof_epsilon: f64,
}

impl CameraConfig {
    pub fn new() -> Self {
        Self {
            position: Point::new(0.0, 0.0, 0.0),
            view_dir: Vector::new(0.0, 0.0, -1.0),
            up: Vector::new(0.0, 1.0, 0.0),
            right: Vector::new(1.0, 0.0, 0.0),
            height_angle: PI / 2.0,
            width_angle: PI / 2.0,
            least_dim: 512,
            ignore_roof: true,
            roof_epsilon: 1e-4,
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// A pinhole camera with a fixed pixel raster.
pub struct Camera {
    position: Point,
    view_dir: Vector,
    up: Vector,
    right: Vector,
    dim_h: usize,
    dim_w: usize,
    /// Image plane height at unit distance: 2 * tan(height_angle / 2).
    height: f64,
    width: f64,
    ignore_roof: bool,
    roof_epsilon: f64,
}

impl Camera {
    pub fn new(config: CameraConfig) -> Result<Self> {
        if config.least_dim == 0 {
            return Err(Error::InvalidConfiguration(
                "least_dim must be positive".to_string(),
            ));
        }
        for (name, angle) in [
            ("height angle", config.height_angle),
            ("width angle", config.width_angle),
        ] {
            if angle <= 0.0 {
                return Err(Error::InvalidConfiguration(format!(
                    "{name} must be positive"
                )));
            }
            if angle >= PI {
                return Err(Error::InvalidConfiguration(format!(
                    "{name} must be less than pi"
                )));
            }
        }

        let view_dir = config.view_dir.normalize().ok_or_else(|| {
            Error::InvalidConfiguration("view direction must be non-zero".to_string())
        })?;
        let up = config
            .up
            .normalize()
            .ok_or_else(|| Error::InvalidConfiguration("up direction must be non-zero".to_string()))?;
        let right = config.right.normalize().ok_or_else(|| {
            Error::InvalidConfiguration("right direction must be non-zero".to_string())
        })?;

        let mut least_dim = config.least_dim;
        if least_dim % 2 != 0 {
            least_dim += 1;
        }

        // The smaller angle's side gets least_dim pixels; the other side
        // follows from the square-pixel constraint.
        let (dim_h, dim_w, height, width) = if config.height_angle < config.width_angle {
            let height = 2.0 * (config.height_angle / 2.0).tan();
            let pixel_side = height / least_dim as f64;
            let raw_width = 2.0 * (config.width_angle / 2.0).tan();
            let dim_w = (raw_width / pixel_side).ceil() as usize;
            (least_dim, dim_w, height, dim_w as f64 * pixel_side)
        } else {
            let width = 2.0 * (config.width_angle / 2.0).tan();
            let pixel_side = width / least_dim as f64;
            let raw_height = 2.0 * (config.height_angle / 2.0).tan();
            let dim_h = (raw_height / pixel_side).ceil() as usize;
            (dim_h, least_dim, dim_h as f64 * pixel_side, width)
        };

        Ok(Self {
            position: config.position,
            view_dir,
            up,
            right,
            dim_h,
            dim_w,
            height,
            width,
            ignore_roof: config.ignore_roof,
            roof_epsilon: config.roof_epsilon,
        })
    }

    /// Image dimensions as (height, width) in pixels.
    pub fn image_dims(&self) -> (usize, usize) {
        (self.dim_h, self.dim_w)
    }

    /// View ray through the center of pixel (h, w).
    pub fn emit_ray_through_pixel(&self, h: usize, w: usize) -> Result<SignalRay> {
        if h > self.dim_h {
            return Err(Error::InvalidConfiguration(format!(
                "pixel row {h} is outside the image (height {})",
                self.dim_h
            )));
        }
        if w > self.dim_w {
            return Err(Error::InvalidConfiguration(format!(
                "pixel column {w} is outside the image (width {})",
                self.dim_w
            )));
        }

        let x = (self.width / self.dim_w as f64)
            * ((w as i64 - self.dim_w as i64 / 2) as f64 + 0.5);
        let y = (self.height / self.dim_h as f64)
            * ((self.dim_h as i64 / 2 - h as i64) as f64 - 0.5);

        let direction = self.view_dir + self.right * x + self.up * y;
        SignalRay::new(self.position, direction, VIEW_RAY_POWER).ok_or_else(|| {
            Error::InvalidConfiguration("degenerate view ray direction".to_string())
        })
    }

    /// Color seen through pixel (h, w). Reads the scene grid only.
    pub fn pixel_color(&self, scene: &Scene, h: usize, w: usize) -> Result<Color> {
        let ray = self.emit_ray_through_pixel(h, w)?;
        let mesh_max_z = scene.geometry.mesh_max_z();

        // Nearest mesh hit, skipping roof surfaces so the camera can look
        // into rooms from above.
        let mut hit: Option<(f64, Vector)> = None;
        for triangle in scene.geometry.triangles() {
            if self.ignore_roof
                && triangle
                    .vertices()
                    .iter()
                    .all(|v| mesh_max_z - v.z < self.roof_epsilon)
            {
                continue;
            }
            let Some(normal) = triangle.normal() else {
                continue;
            };
            if let Some(distance) = ray.check_intersection(triangle) {
                match hit {
                    None => hit = Some((distance, normal)),
                    Some((best, _)) if distance < best => hit = Some((distance, normal)),
                    _ => {}
                }
            }
        }

        // The emitter's emission sphere may be closer than any mesh surface.
        if let Some((distance, _, normal)) = intersect_sphere(
            ray.position(),
            ray.direction(),
            scene.emitter.origin(),
            scene.emitter.radius(),
        ) {
            match hit {
                None => hit = Some((distance, normal)),
                Some((best, _)) if distance < best => hit = Some((distance, normal)),
                _ => {}
            }
        }

        let Some((distance, normal)) = hit else {
            return Ok(Color::BLACK);
        };

        let hit_point = ray.position() + ray.direction() * distance;
        let Some(mut back) = SignalRay::new(hit_point, self.position - hit_point, VIEW_RAY_POWER)
        else {
            // The camera sits exactly on the surface
            return Ok(Color::BLACK);
        };

        // Diffuse-like shading from the angle between the surface normal
        // and the direction back toward the camera.
        let intensity = back.direction().dot(&normal).abs() * 255.0;
        let mut color = Color::gray(intensity);

        // The hit may lie on the padded boundary or on the emitter sphere
        // outside the bounds; walk inward first. Give up once the walk
        // would pass the camera.
        let max_entry_steps = (self.position.distance_to(&hit_point) / ENTRY_STEP).ceil() as u64;
        let mut entry_steps = 0u64;
        while !scene.in_bounds(back.position()) {
            if entry_steps >= max_entry_steps {
                return Ok(color);
            }
            back.make_step(ENTRY_STEP);
            entry_steps += 1;
        }

        // Composite the signal field along the path back to the camera.
        let size = scene.voxel_size();
        let step_size = size.dx.min(size.dy).min(size.dz) / STEPS_PER_VOXEL;
        let power = scene.emitter.power();
        let threshold = (power / 1000.0).min(1.0);
        while scene.in_bounds(back.position()) {
            let value = scene.voxel_value(back.position())?;
            if value >= threshold {
                color = color.blend(&power_color(value, power), BLEND_ALPHA);
            }
            back.make_step(step_size);
        }

        Ok(color)
    }

    /// Renders the whole raster. Pixel rows are rendered in parallel; the
    /// grid must be frozen (filtered) before this is called.
    pub fn render(&self, scene: &Scene) -> Result<Photo> {
        let rows: Vec<Vec<[u8; 3]>> = (0..self.dim_h)
            .into_par_iter()
            .map(|h| {
                (0..self.dim_w)
                    .map(|w| Ok(self.pixel_color(scene, h, w)?.to_rgb8()))
                    .collect::<Result<Vec<_>>>()
            })
            .collect::<Result<Vec<_>>>()?;

        let pixels = rows.into_iter().flatten().collect();
        Ok(Photo::new(self.dim_w, self.dim_h, pixels))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::mesh::{Mesh, TriangleIndex};
    use crate::sim::emitter::Emitter;
    use crate::sim::grid::GridDims;

    fn simple_camera(least_dim: usize) -> Camera {
        let mut config = CameraConfig::new();
        config.least_dim = least_dim;
        Camera::new(config).unwrap()
    }

    #[test]
    fn test_validation() {
        let mut config = CameraConfig::new();
        config.least_dim = 0;
        assert!(matches!(
            Camera::new(config),
            Err(Error::InvalidConfiguration(_))
        ));

        let mut config = CameraConfig::new();
        config.height_angle = 0.0;
        assert!(matches!(
            Camera::new(config),
            Err(Error::InvalidConfiguration(_))
        ));

        let mut config = CameraConfig::new();
        config.width_angle = PI;
        assert!(matches!(
            Camera::new(config),
            Err(Error::InvalidConfiguration(_))
        ));

        let mut config = CameraConfig::new();
        config.view_dir = Vector::new(0., 0., 0.);
        assert!(matches!(
            Camera::new(config),
            Err(Error::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_equal_angles_give_square_image() {
        let camera = simple_camera(16);
        assert_eq!(camera.image_dims(), (16, 16));
    }

    #[test]
    fn test_odd_least_dim_is_bumped_to_even() {
        let camera = simple_camera(15);
        assert_eq!(camera.image_dims(), (16, 16));
    }

    #[test]
    fn test_wider_angle_gives_wider_image() {
        let mut config = CameraConfig::new();
        config.least_dim = 16;
        config.height_angle = PI / 3.0;
        config.width_angle = PI / 2.0;
        let camera = Camera::new(config).unwrap();
        let (h, w) = camera.image_dims();
        assert_eq!(h, 16);
        assert!(w > h);
    }

    #[test]
    fn test_pixel_rays() {
        let camera = simple_camera(16);

        let ray = camera.emit_ray_through_pixel(8, 8).unwrap();
        assert!(ray.position().is_close(&Point::new(0., 0., 0.)));
        assert!((ray.direction().length() - 1.0).abs() < 1e-10);
        // Looking along -z, the center pixels stay near the view axis
        assert!(ray.direction().dz < -0.9);

        // Out-of-image pixel indices are rejected
        assert!(matches!(
            camera.emit_ray_through_pixel(99, 0),
            Err(Error::InvalidConfiguration(_))
        ));
        assert!(matches!(
            camera.emit_ray_through_pixel(0, 99),
            Err(Error::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_corner_pixels_diverge() {
        let camera = simple_camera(16);
        let top_left = camera.emit_ray_through_pixel(0, 0).unwrap();
        let bottom_right = camera.emit_ray_through_pixel(15, 15).unwrap();
        assert!(top_left.direction().dx < 0.0);
        assert!(top_left.direction().dy > 0.0);
        assert!(bottom_right.direction().dx > 0.0);
        assert!(bottom_right.direction().dy < 0.0);
    }

    /// A single flat triangle at z = 5 spanning the view of a downward
    /// camera. All its vertices sit at the mesh max Z, so it counts as
    /// the roof.
    fn roof_only_scene() -> Scene {
        let mesh = Mesh::new(
            vec![
                Point::new(-20.0, -20.0, 5.0),
                Point::new(20.0, -20.0, 5.0),
                Point::new(0.0, 30.0, 5.0),
            ],
            vec![TriangleIndex(0, 1, 2)],
        );
        // Emitter far off to the side so it does not block the view
        let emitter = Emitter::new(Point::new(500.0, 500.0, 500.0), 0.1, 1000.0).unwrap();
        Scene::new(emitter, &mesh, GridDims::new(1, 1, 1).unwrap()).unwrap()
    }

    #[test]
    fn test_roof_is_ignored_by_default() {
        let scene = roof_only_scene();
        let mut config = CameraConfig::new();
        config.position = Point::new(0.0, 0.0, 20.0);
        config.least_dim = 4;
        let camera = Camera::new(config).unwrap();

        // The only surface is the roof, so every pixel falls through
        let color = camera.pixel_color(&scene, 2, 2).unwrap();
        assert_eq!(color.to_rgb8(), [0, 0, 0]);
    }

    #[test]
    fn test_roof_hit_when_classification_disabled() {
        let scene = roof_only_scene();
        let mut config = CameraConfig::new();
        config.position = Point::new(0.0, 0.0, 20.0);
        config.least_dim = 4;
        config.ignore_roof = false;
        let camera = Camera::new(config).unwrap();

        // Looking straight down at a horizontal surface: strong shading
        let color = camera.pixel_color(&scene, 2, 2).unwrap();
        let [r, g, b] = color.to_rgb8();
        assert!(r > 200 && g > 200 && b > 200);
    }

    #[test]
    fn test_emitter_sphere_is_visible() {
        // No mesh surface in view except walls far away; the emitter
        // sphere sits right in front of the camera.
        let mesh = Mesh::from_box(100.0, 100.0, 100.0, None);
        let emitter = Emitter::new(Point::new(50.0, 50.0, 50.0), 10.0, 1000.0).unwrap();
        let scene = Scene::new(emitter, &mesh, GridDims::new(4, 4, 4).unwrap()).unwrap();

        let mut config = CameraConfig::new();
        config.position = Point::new(50.0, 50.0, 80.0);
        config.least_dim = 16;
        let camera = Camera::new(config).unwrap();

        // Center pixel looks almost straight down onto the sphere
        let color = camera.pixel_color(&scene, 8, 8).unwrap();
        let [r, g, b] = color.to_rgb8();
        assert!(r > 100 && g > 100 && b > 100);
    }

    #[test]
    fn test_render_dims_match() {
        let scene = roof_only_scene();
        let mut config = CameraConfig::new();
        config.position = Point::new(0.0, 0.0, 20.0);
        config.least_dim = 8;
        let camera = Camera::new(config).unwrap();

        let photo = camera.render(&scene).unwrap();
        assert_eq!(photo.height(), 8);
        assert_eq!(photo.width(), 8);
        assert_eq!(photo.pixels().len(), 64);
    }
}
