/// Error types for wire3d
use thiserror::Error;

use crate::geometry::PointId;

/// Errors raised while building meshes, loading files or validating config.
///
/// Rotation and drawing never fail; only construction does.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("segment references point {0} which is not in the mesh")]
    UnknownPoint(PointId),

    #[error("segment uses point {0} for both endpoints")]
    DegenerateSegment(PointId),

    #[error("invalid render configuration: {0}")]
    InvalidConfig(String),

    #[error("STL error: {0}")]
    Stl(String),
}

/// Result type alias for wire3d operations
pub type Result<T> = std::result::Result<T, Error>;
