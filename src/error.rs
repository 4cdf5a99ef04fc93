//! Error types for signal3d.

use std::path::PathBuf;

use thiserror::Error;

use crate::Point;

#[derive(Error, Debug)]
pub enum Error {
    /// A constructor or operation received a value outside its domain,
    /// e.g. a non-positive radius, power, grid dimension or filter radius,
    /// a camera angle outside (0, pi), or a pixel index outside the image.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A voxel access was attempted for a point outside the scene bounds.
    #[error("point {0} is outside the scene bounds")]
    OutOfBounds(Point),

    /// Mesh ingestion failed. Raised before any simulation starts.
    #[error("failed to load asset {}: {}", .path.display(), .reason)]
    AssetLoad { path: PathBuf, reason: String },
}

pub type Result<T> = std::result::Result<T, Error>;
