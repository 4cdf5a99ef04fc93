//! File I/O: mesh ingestion and image output.
//!
//! The simulation core only consumes a `Mesh` and produces a `Photo`;
//! everything about file formats lives here.

pub mod obj;
pub mod photo;

pub use obj::read_obj;
pub use photo::write_photo;
