/// wire3d Core Library - Wireframe geometry, rotation and projection
///
/// This library provides the renderer-agnostic core: the point/segment/mesh
/// model, rotation about the X and Y axes, orthographic projection, and the
/// pointer-driven interaction loop. Front ends supply a `DrawSurface`.

pub mod config;
pub mod error;
pub mod geometry;
pub mod interaction;
pub mod projection;
pub mod stl;
pub mod surface;
pub mod transform;

// Re-export commonly used types
pub use config::{Color, RenderConfig, Style};
pub use error::{Error, Result};
pub use geometry::{Mesh, Point3D, PointId, Segment, Wireframe};
pub use interaction::{DragController, DragRotation, PointerEvent, PointerState, Viewer};
pub use projection::Orthographic;
pub use surface::{DrawCommand, DrawSurface, RecordingSurface};
pub use transform::{OrientedMesh, Rotate};
