//! Leaf planes: mirrored quad pairs hung off twig tip faces.

use crate::error::ProcgenError;
use crate::growth::Span;
use geometry::LocalFrame;
use glam::Vec3;
use mesh::{FaceId, MeshBuffer};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

/// Where along a twig leaves are attached.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LeafPlacement {
    /// A pair at every twig step, like needles along a pine twig.
    #[default]
    EveryStep,
    /// A single pair at the finished tip.
    TipOnly,
}

/// Size and orientation ranges for one leaf quad.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeafShape {
    /// Extent along the local y axis.
    pub width: f32,
    /// Extent along the local x axis (outward from the twig).
    pub height: f32,
    /// Spin about local x.
    pub spin: Span,
    /// Tilt about local y, mirrored per wing.
    pub tilt_y: Span,
    /// Tilt about local z, mirrored per wing.
    pub tilt_z: Span,
}

impl Default for LeafShape {
    fn default() -> Self {
        Self {
            width: 0.01,
            height: 0.08,
            spin: Span(-PI, PI),
            tilt_y: Span(PI / 7.0, PI / 6.0),
            tilt_z: Span(PI / 5.0, PI / 4.0),
        }
    }
}

impl LeafShape {
    pub fn is_valid(&self) -> bool {
        self.width.is_finite()
            && self.height.is_finite()
            && self.width >= 0.0
            && self.height >= 0.0
            && self.spin.is_finite()
            && self.tilt_y.is_finite()
            && self.tilt_z.is_finite()
    }
}

/// Add one leaf quad rooted at `center`. `wing` is `1.0` or `-1.0` and
/// mirrors the y/z tilt so paired leaves spread apart.
pub fn add_leaf(
    leaves: &mut MeshBuffer,
    center: Vec3,
    frame: &LocalFrame,
    shape: &LeafShape,
    wing: f32,
    rng: &mut impl Rng,
) -> Result<FaceId, ProcgenError> {
    let corners = [
        Vec3::ZERO,
        frame.x * shape.height,
        frame.x * shape.height + frame.y * shape.width,
        frame.y * shape.width,
    ];

    let spin = shape.spin.sample(rng);
    let tilt_z = wing * shape.tilt_z.sample(rng);
    let tilt_y = wing * shape.tilt_y.sample(rng);
    let rotation = frame.rotation(spin, tilt_y, tilt_z);

    let vertices: Vec<_> = corners
        .iter()
        .map(|&c| leaves.add_vertex(center + rotation.transform_vector(c)))
        .collect();
    Ok(leaves.add_face(&vertices)?)
}

/// Hang a mirrored leaf pair on each face of `tip`. Faces whose normal has
/// collapsed get no leaves. Returns the number of leaf quads added.
pub fn attach_leaves(
    tree: &MeshBuffer,
    tip: &[FaceId],
    leaves: &mut MeshBuffer,
    shape: &LeafShape,
    rng: &mut impl Rng,
) -> Result<usize, ProcgenError> {
    let mut added = 0;
    for &face in tip {
        let Some(frame) = LocalFrame::from_direction(tree.face_normal(face)?) else {
            log::debug!("skipping leaves on collapsed face {face}");
            continue;
        };
        let center = tree.face_centroid(face)?;
        for wing in [1.0, -1.0] {
            add_leaf(leaves, center, &frame, shape, wing, rng)?;
            added += 1;
        }
    }
    Ok(added)
}
