//! Trunk lofting: stacked rings joined into a capped, tapering cylinder.

use crate::branch_faces::BranchFaceList;
use crate::error::ProcgenError;
use glam::Vec3;
use mesh::{MeshBuffer, VertexId};
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

/// Inputs to the radius law at one ring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingSample {
    pub index: usize,
    /// `index / height_segments`, 0 at the base, 1 at the top.
    pub t: f32,
    pub radius_bottom: f32,
    /// Bottom radius after `index` rounds of per-ring reduction.
    pub decayed_bottom: f32,
    pub radius_top: f32,
}

/// Radius law for trunk rings.
pub trait RadiusProfile {
    fn ring_radius(&self, ring: RingSample) -> f32;
}

impl<F> RadiusProfile for F
where
    F: Fn(RingSample) -> f32,
{
    fn ring_radius(&self, ring: RingSample) -> f32 {
        self(ring)
    }
}

/// Built-in radius laws.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RadiusProfileKind {
    /// Blend the decayed bottom radius toward the top radius. Strong decay
    /// can pinch the middle below the top radius.
    #[default]
    DecayBlend,
    /// Straight taper from bottom to top; reduction is ignored.
    Linear,
}

impl RadiusProfile for RadiusProfileKind {
    fn ring_radius(&self, ring: RingSample) -> f32 {
        let bottom = match self {
            RadiusProfileKind::DecayBlend => ring.decayed_bottom,
            RadiusProfileKind::Linear => ring.radius_bottom,
        };
        (1.0 - ring.t) * bottom + ring.t * ring.radius_top
    }
}

/// Trunk dimensions and the branch band, already validated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrunkShape {
    pub radius_bottom: f32,
    pub radius_top: f32,
    /// Percentage the bottom radius shrinks by after each ring.
    pub reduction_percent: f32,
    pub height: f32,
    pub segments: usize,
    /// Branch band as percentages of trunk height, in either order.
    pub band_percent: (f32, f32),
}

impl TrunkShape {
    /// Ring count chosen so ring spacing roughly matches the width of one
    /// segment at the mean radius.
    pub fn height_segments(&self) -> usize {
        let mean_radius = (self.radius_bottom + self.radius_top) / 2.0;
        let segment_width = TAU / self.segments as f32 * mean_radius;
        ((self.height / segment_width).ceil() as usize).max(1)
    }

    fn band(&self) -> (f32, f32) {
        let (a, b) = self.band_percent;
        (a.min(b) / 100.0, a.max(b) / 100.0)
    }
}

/// Result of lofting the trunk.
#[derive(Debug, Clone)]
pub struct Trunk {
    pub branch_faces: BranchFaceList,
    /// Face count when the trunk was finished; branch output starts here.
    pub branch_start: usize,
    pub height_segments: usize,
    /// Radius of each ring, bottom to top.
    pub ring_radii: Vec<f32>,
}

/// Loft the trunk into `mesh`.
pub fn build_trunk(
    mesh: &mut MeshBuffer,
    shape: &TrunkShape,
    profile: &dyn RadiusProfile,
) -> Result<Trunk, ProcgenError> {
    let segments = shape.segments;
    let height_segments = shape.height_segments();
    let angle_delta = TAU / segments as f32;
    let height_delta = shape.height / height_segments as f32;
    let decay = 1.0 - shape.reduction_percent / 100.0;
    let (band_low, band_high) = shape.band();

    let mut decayed_bottom = shape.radius_bottom;
    let mut last_ring: Vec<VertexId> = Vec::new();
    let mut eligible = Vec::new();
    let mut ring_radii = Vec::with_capacity(height_segments + 1);

    for n in 0..=height_segments {
        let t = n as f32 / height_segments as f32;
        let radius = profile
            .ring_radius(RingSample {
                index: n,
                t,
                radius_bottom: shape.radius_bottom,
                decayed_bottom,
                radius_top: shape.radius_top,
            })
            .max(0.0);
        ring_radii.push(radius);

        let z = n as f32 * height_delta;
        let ring: Vec<VertexId> = (0..segments)
            .map(|i| {
                let (sin, cos) = (i as f32 * angle_delta).sin_cos();
                mesh.add_vertex(Vec3::new(radius * cos, radius * sin, z))
            })
            .collect();

        if n == 0 {
            // Reversed so the base faces down.
            let base: Vec<VertexId> = ring.iter().rev().copied().collect();
            mesh.add_face(&base)?;
        } else {
            let in_band = band_low < t && t < band_high;
            for i in 0..segments {
                let next = (i + 1) % segments;
                let face = mesh.add_face(&[last_ring[i], last_ring[next], ring[next], ring[i]])?;
                if in_band {
                    eligible.push(face);
                }
            }
            if n == height_segments {
                mesh.add_face(&ring)?;
            }
        }

        last_ring = ring;
        decayed_bottom *= decay;
    }

    log::debug!(
        "trunk: {} rings x {} segments, {} branch-eligible faces",
        height_segments + 1,
        segments,
        eligible.len()
    );

    Ok(Trunk {
        branch_faces: BranchFaceList::new(eligible, segments),
        branch_start: mesh.face_count(),
        height_segments,
        ring_radii,
    })
}
