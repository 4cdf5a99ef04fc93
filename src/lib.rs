pub mod error;
pub mod geom;
pub mod io;
pub mod render;
pub mod sim;

// Prelude
pub use error::{Error, Result};
pub use geom::bboxes::BoundingBox;
pub use geom::mesh::Mesh;
pub use geom::point::Point;
pub use geom::triangle::Triangle;
pub use geom::vector::Vector;
pub use render::camera::{Camera, CameraConfig};
pub use render::photo::Photo;
pub use sim::config::SimulationConfig;
pub use sim::emitter::Emitter;
pub use sim::grid::{GridDims, VoxelGrid};
pub use sim::scene::Scene;
pub use sim::tracer::Tracer;
