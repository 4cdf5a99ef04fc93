use std::path::Path;

use anyhow::{Result, anyhow};
use log::info;

use signal3d::io::{read_obj, write_photo};
use signal3d::sim::simulation;
use signal3d::{
    BoundingBox, Camera, CameraConfig, Emitter, GridDims, Mesh, Point, Scene, SimulationConfig,
    Vector,
};

fn main() -> Result<()> {
    env_logger::init();

    // Usage: signal3d [model.obj] [photo.png]
    let args: Vec<String> = std::env::args().collect();
    let mesh = match args.get(1) {
        Some(path) => read_obj(Path::new(path))?,
        None => Mesh::from_box(10.0, 10.0, 3.0, None),
    };
    let output = args.get(2).map(String::as_str).unwrap_or("photo.png");

    let bbox = BoundingBox::from_points(&mesh.vertices)
        .ok_or_else(|| anyhow!("model has no vertices"))?;
    let center = Point::new(
        (bbox.min.x + bbox.max.x) / 2.0,
        (bbox.min.y + bbox.max.y) / 2.0,
        (bbox.min.z + bbox.max.z) / 2.0,
    );
    let diagonal = bbox.min.distance_to(&bbox.max);

    let emitter = Emitter::new(center, diagonal / 20.0, 1000.0)?;
    let mut scene = Scene::new(emitter, &mesh, GridDims::new(100, 100, 20)?)?;

    let config = SimulationConfig::new();
    let summary = simulation::run_with_progress(&mut scene, &config, 1, |p| {
        info!("traced {}/{} rays", p.rays_done, p.num_rays);
    })?;
    info!(
        "tracing finished: {} rays, {} reflections",
        summary.rays_traced, summary.reflections
    );

    info!("applying box filter (radius {})", config.filter_radius);
    scene.apply_box_filter(config.filter_radius)?;

    info!("rendering");
    let mut camera_config = CameraConfig::new();
    camera_config.position = Point::new(center.x, center.y, bbox.max.z + diagonal / 2.0);
    camera_config.view_dir = Vector::new(0.0, 0.0, -1.0);
    let camera = Camera::new(camera_config)?;
    let photo = camera.render(&scene)?;

    write_photo(Path::new(output), &photo)?;
    info!("wrote {output}");
    Ok(())
}
