//! Branch and twig growth by repeated face-region extrusion.
//!
//! Each step pushes the current tip faces out along their averaged normal,
//! then bends and tapers the new tip with a small random rotation and scale
//! about its own centroid. Branches and twigs share this engine and differ
//! only in step lengths and jitter.

use crate::error::ProcgenError;
use geometry::{LocalFrame, Transform};
use glam::Vec3;
use mesh::{FaceId, MeshBuffer};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Averaged normals shorter than this count as collapsed.
const MIN_NORMAL_LENGTH: f32 = 1e-6;

/// Closed interval sampled uniformly. Bounds may be given in either order;
/// a collapsed span always yields its single value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Span(pub f32, pub f32);

impl Span {
    pub const ZERO: Span = Span(0.0, 0.0);
    pub const ONE: Span = Span(1.0, 1.0);

    pub fn sample(&self, rng: &mut impl Rng) -> f32 {
        let (lo, hi) = (self.0.min(self.1), self.0.max(self.1));
        if lo == hi {
            lo
        } else {
            rng.gen_range(lo..=hi)
        }
    }

    pub fn is_finite(&self) -> bool {
        self.0.is_finite() && self.1.is_finite()
    }
}

/// Per-step random bend (radians about the local axes) and taper.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GrowthJitter {
    /// Spin about the growth direction.
    pub rotate_x: Span,
    pub rotate_y: Span,
    pub rotate_z: Span,
    pub scale: Span,
    /// Replaces `scale` on the first step when set.
    #[serde(default)]
    pub first_scale: Option<Span>,
}

impl GrowthJitter {
    /// No rotation, no taper: growth is a straight prism.
    pub const NONE: GrowthJitter = GrowthJitter {
        rotate_x: Span::ZERO,
        rotate_y: Span::ZERO,
        rotate_z: Span::ZERO,
        scale: Span::ONE,
        first_scale: None,
    };

    pub fn branch() -> Self {
        Self {
            rotate_x: Span(-0.05, 0.05),
            rotate_y: Span(-0.025, 0.075),
            rotate_z: Span(-0.05, 0.05),
            scale: Span(0.9, 0.95),
            first_scale: None,
        }
    }

    /// Branch jitter with a hard pinch on the first step, so twigs start thin.
    pub fn twig() -> Self {
        Self {
            first_scale: Some(Span(0.05, 0.1)),
            ..Self::branch()
        }
    }

    fn scale_for(&self, step: u32) -> Span {
        match (step, self.first_scale) {
            (0, Some(first)) => first,
            _ => self.scale,
        }
    }

    pub fn is_finite(&self) -> bool {
        [self.rotate_x, self.rotate_y, self.rotate_z, self.scale]
            .iter()
            .chain(self.first_scale.iter())
            .all(Span::is_finite)
    }
}

impl Default for GrowthJitter {
    fn default() -> Self {
        Self::branch()
    }
}

/// Distance moved per step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum StepLength {
    Uniform(f32),
    /// `first` on step 0, `rest` afterwards.
    Tapered { first: f32, rest: f32 },
}

impl StepLength {
    pub fn at(&self, step: u32) -> f32 {
        match *self {
            StepLength::Uniform(length) => length,
            StepLength::Tapered { first, .. } if step == 0 => first,
            StepLength::Tapered { rest, .. } => rest,
        }
    }

    pub fn is_finite(&self) -> bool {
        match *self {
            StepLength::Uniform(length) => length.is_finite(),
            StepLength::Tapered { first, rest } => first.is_finite() && rest.is_finite(),
        }
    }
}

/// What a single extrusion step produced.
#[derive(Debug, Clone, PartialEq)]
pub struct StepOutcome {
    /// The new tip faces.
    pub faces: Vec<FaceId>,
    /// Translation applied before jitter.
    pub direction: Vec3,
    /// Tip centroid the jitter pivoted about.
    pub centroid: Vec3,
    pub frame: LocalFrame,
}

/// An in-progress branch or twig. Holds the current tip faces.
#[derive(Debug, Clone)]
pub struct Extrusion {
    tip: Vec<FaceId>,
    steps_taken: u32,
}

impl Extrusion {
    pub fn new(seed: Vec<FaceId>) -> Self {
        Self {
            tip: seed,
            steps_taken: 0,
        }
    }

    pub fn tip(&self) -> &[FaceId] {
        &self.tip
    }

    pub fn steps_taken(&self) -> u32 {
        self.steps_taken
    }

    /// Extrude the tip once, move it `length` along its averaged normal and
    /// apply jitter about the new tip centroid.
    ///
    /// Fails with [`ProcgenError::DegenerateGeometry`] before touching the
    /// mesh when the tip normals average to zero.
    pub fn step(
        &mut self,
        mesh: &mut MeshBuffer,
        length: f32,
        jitter: &GrowthJitter,
        rng: &mut impl Rng,
    ) -> Result<StepOutcome, ProcgenError> {
        let step = self.steps_taken;
        let normal = mesh.average_normal(&self.tip)?;
        if normal.length() < MIN_NORMAL_LENGTH {
            return Err(ProcgenError::DegenerateGeometry { step });
        }

        let extruded = mesh.extrude_face_region(&self.tip)?;
        let direction = normal * length;
        mesh.translate_vertices(&extruded.vertices, direction)?;

        let centroid = mesh.region_centroid(&extruded.faces)?;
        let frame = LocalFrame::from_direction(direction)
            .or_else(|| LocalFrame::from_direction(normal))
            .ok_or(ProcgenError::DegenerateGeometry { step })?;

        let scale = jitter.scale_for(step).sample(rng);
        let angle_x = jitter.rotate_x.sample(rng);
        let angle_y = jitter.rotate_y.sample(rng);
        let angle_z = jitter.rotate_z.sample(rng);
        let transform = frame.rotation(angle_x, angle_y, angle_z) * Transform::from_scale(scale);
        mesh.transform_vertices(&extruded.vertices, &transform.about_pivot(centroid))?;

        self.tip = extruded.faces;
        self.steps_taken += 1;
        Ok(StepOutcome {
            faces: self.tip.clone(),
            direction,
            centroid,
            frame,
        })
    }
}

/// Run `steps` extrusion steps from `seed` and return the final tip faces.
pub fn grow(
    mesh: &mut MeshBuffer,
    seed: Vec<FaceId>,
    steps: u32,
    length: StepLength,
    jitter: &GrowthJitter,
    rng: &mut impl Rng,
) -> Result<Vec<FaceId>, ProcgenError> {
    let mut extrusion = Extrusion::new(seed);
    for step in 0..steps {
        extrusion.step(mesh, length.at(step), jitter, rng)?;
    }
    Ok(extrusion.tip)
}
