use crate::buffer::{FaceId, VertexId};

/// Errors raised by mesh buffer operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MeshError {
    #[error("face needs at least 3 vertices, got {0}")]
    TooFewVertices(usize),

    #[error("unknown vertex {0}")]
    UnknownVertex(VertexId),

    #[error("vertex {0} appears more than once in a face")]
    RepeatedVertex(VertexId),

    #[error("unknown or deleted face {0}")]
    UnknownFace(FaceId),

    #[error("extrusion region is empty")]
    EmptyRegion,
}
