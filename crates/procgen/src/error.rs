use mesh::MeshError;

/// Errors raised while generating a tree.
#[derive(Debug, thiserror::Error)]
pub enum ProcgenError {
    /// A parameter is outside its documented range. Raised before any mesh is touched.
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    /// An extrusion step averaged its face normals to zero. Only the
    /// affected branch or twig is abandoned.
    #[error("extrusion step {step} collapsed to a zero normal")]
    DegenerateGeometry { step: u32 },

    #[error(transparent)]
    Mesh(#[from] MeshError),

    #[error("parameter file parse error: {0}")]
    Config(#[from] ron::error::SpannedError),
}

impl ProcgenError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}
