//! Random per-vertex color gradients.

use crate::error::ProcgenError;
use glam::Vec4;
use mesh::{MeshBuffer, VertexId};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Two RGBA endpoints. Each vertex gets a random point between them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorRange {
    pub a: [f32; 4],
    pub b: [f32; 4],
}

impl ColorRange {
    pub const BARK: ColorRange = ColorRange {
        a: [0.20, 0.12, 0.06, 1.0],
        b: [0.35, 0.22, 0.12, 1.0],
    };

    pub const FOLIAGE: ColorRange = ColorRange {
        a: [0.05, 0.25, 0.08, 1.0],
        b: [0.15, 0.45, 0.12, 1.0],
    };

    /// `a * r + b * (1 - r)`.
    pub fn mix(&self, r: f32) -> Vec4 {
        Vec4::from_array(self.a) * r + Vec4::from_array(self.b) * (1.0 - r)
    }

    pub fn is_finite(&self) -> bool {
        self.a.iter().chain(&self.b).all(|c| c.is_finite())
    }
}

/// Give every vertex of `mesh` an independently drawn color from `colors`.
/// Face corners share their vertex's color.
pub fn paint_vertices(
    mesh: &mut MeshBuffer,
    colors: &ColorRange,
    rng: &mut impl Rng,
) -> Result<(), ProcgenError> {
    for i in 0..mesh.vertex_count() {
        let r: f32 = rng.gen();
        mesh.set_color(VertexId(i as u32), colors.mix(r))?;
    }
    Ok(())
}
