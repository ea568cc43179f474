//! Generation parameters. Loaded from RON; every field has a default.

use crate::coloring::ColorRange;
use crate::error::ProcgenError;
use crate::growth::{GrowthJitter, StepLength};
use crate::leaves::{LeafPlacement, LeafShape};
use crate::trunk::{RadiusProfileKind, TrunkShape};
use serde::{Deserialize, Serialize};

/// Largest ring segment count accepted.
pub const MAX_SEGMENTS: u32 = 256;
/// Largest number of rings the trunk may resolve to.
pub const MAX_HEIGHT_SEGMENTS: usize = 4096;

/// Everything one generation run reads. Read-only once the run starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationParameters {
    /// Seed for the random source. `None` draws a fresh seed per run.
    pub seed: Option<u64>,

    /// Trunk radius at the base.
    pub radius_bottom: f32,
    /// Trunk radius at the top.
    pub radius_top: f32,
    /// Percentage the base radius shrinks by after each ring.
    pub radius_reduction: f32,
    pub radius_profile: RadiusProfileKind,
    pub height: f32,
    /// Vertices per ring.
    pub segments: u32,

    /// Branch band bounds as percentages of trunk height.
    pub branch_lower: f32,
    pub branch_upper: f32,
    /// Branch placement attempts. Overlapping seeds are skipped, so fewer
    /// branches may be built.
    pub branch_count: u32,
    /// Length of a branch grown from the very base; shorter higher up.
    pub branch_length: f32,
    pub branch_steps: u32,
    pub branch_jitter: GrowthJitter,

    pub twig_count: u32,
    pub twig_steps: u32,
    pub twig_length: StepLength,
    pub twig_jitter: GrowthJitter,

    pub leaf: LeafShape,
    pub leaf_placement: LeafPlacement,

    pub bark_colors: ColorRange,
    pub foliage_colors: ColorRange,
}

impl Default for GenerationParameters {
    fn default() -> Self {
        Self {
            seed: None,
            radius_bottom: 0.15,
            radius_top: 0.02,
            radius_reduction: 1.0,
            radius_profile: RadiusProfileKind::DecayBlend,
            height: 3.0,
            segments: 16,
            branch_lower: 15.0,
            branch_upper: 95.0,
            branch_count: 40,
            branch_length: 2.0,
            branch_steps: 8,
            branch_jitter: GrowthJitter::branch(),
            twig_count: 0,
            twig_steps: 16,
            twig_length: StepLength::Tapered {
                first: 0.001,
                rest: 0.0125,
            },
            twig_jitter: GrowthJitter::twig(),
            leaf: LeafShape::default(),
            leaf_placement: LeafPlacement::EveryStep,
            bark_colors: ColorRange::BARK,
            foliage_colors: ColorRange::FOLIAGE,
        }
    }
}

impl GenerationParameters {
    /// Parse from RON and validate.
    pub fn from_ron_str(source: &str) -> Result<Self, ProcgenError> {
        let params: Self = ron::from_str(source)?;
        params.validate()?;
        Ok(params)
    }

    pub fn to_ron_string(&self) -> Result<String, ron::Error> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
    }

    pub fn trunk_shape(&self) -> TrunkShape {
        TrunkShape {
            radius_bottom: self.radius_bottom,
            radius_top: self.radius_top,
            reduction_percent: self.radius_reduction,
            height: self.height,
            segments: self.segments as usize,
            band_percent: (self.branch_lower, self.branch_upper),
        }
    }

    /// Check every documented range. Nothing is built if this fails.
    pub fn validate(&self) -> Result<(), ProcgenError> {
        if !(3..=MAX_SEGMENTS).contains(&self.segments) {
            return Err(ProcgenError::invalid(
                "segments",
                format!("must be in 3..={MAX_SEGMENTS}, got {}", self.segments),
            ));
        }
        positive("radius_bottom", self.radius_bottom)?;
        non_negative("radius_top", self.radius_top)?;
        positive("height", self.height)?;
        if !(self.radius_reduction.is_finite() && (0.0..100.0).contains(&self.radius_reduction)) {
            return Err(ProcgenError::invalid(
                "radius_reduction",
                format!("must be a percentage in [0, 100), got {}", self.radius_reduction),
            ));
        }
        percentage("branch_lower", self.branch_lower)?;
        percentage("branch_upper", self.branch_upper)?;
        non_negative("branch_length", self.branch_length)?;

        if self.branch_count > 0 && self.branch_steps == 0 {
            return Err(ProcgenError::invalid("branch_steps", "must be at least 1 when branches are requested"));
        }
        if self.twig_count > 0 && self.twig_steps == 0 {
            return Err(ProcgenError::invalid("twig_steps", "must be at least 1 when twigs are requested"));
        }
        if !self.twig_length.is_finite() {
            return Err(ProcgenError::invalid("twig_length", "must be finite"));
        }
        if !self.branch_jitter.is_finite() {
            return Err(ProcgenError::invalid("branch_jitter", "bounds must be finite"));
        }
        if !self.twig_jitter.is_finite() {
            return Err(ProcgenError::invalid("twig_jitter", "bounds must be finite"));
        }
        if !self.leaf.is_valid() {
            return Err(ProcgenError::invalid("leaf", "sizes must be finite and non-negative"));
        }
        if !self.bark_colors.is_finite() {
            return Err(ProcgenError::invalid("bark_colors", "components must be finite"));
        }
        if !self.foliage_colors.is_finite() {
            return Err(ProcgenError::invalid("foliage_colors", "components must be finite"));
        }

        let rings = self.trunk_shape().height_segments();
        if rings > MAX_HEIGHT_SEGMENTS {
            return Err(ProcgenError::invalid(
                "height",
                format!("resolves to {rings} rings, limit is {MAX_HEIGHT_SEGMENTS}; raise the radii or lower the height"),
            ));
        }
        Ok(())
    }
}

fn positive(name: &'static str, value: f32) -> Result<(), ProcgenError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ProcgenError::invalid(name, format!("must be positive, got {value}")))
    }
}

fn non_negative(name: &'static str, value: f32) -> Result<(), ProcgenError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ProcgenError::invalid(name, format!("must be non-negative, got {value}")))
    }
}

fn percentage(name: &'static str, value: f32) -> Result<(), ProcgenError> {
    if value.is_finite() && (0.0..=100.0).contains(&value) {
        Ok(())
    } else {
        Err(ProcgenError::invalid(name, format!("must be in [0, 100], got {value}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rejected(params: GenerationParameters) -> &'static str {
        match params.validate() {
            Err(ProcgenError::InvalidParameter { name, .. }) => name,
            other => panic!("expected InvalidParameter, got {other:?}"),
        }
    }

    #[test]
    fn defaults_are_valid() {
        GenerationParameters::default().validate().unwrap();
    }

    #[test]
    fn range_violations_name_the_field() {
        let d = GenerationParameters::default;
        assert_eq!(rejected(GenerationParameters { segments: 2, ..d() }), "segments");
        assert_eq!(rejected(GenerationParameters { height: -1.0, ..d() }), "height");
        assert_eq!(rejected(GenerationParameters { radius_bottom: 0.0, ..d() }), "radius_bottom");
        assert_eq!(rejected(GenerationParameters { radius_top: f32::NAN, ..d() }), "radius_top");
        assert_eq!(rejected(GenerationParameters { radius_reduction: 100.0, ..d() }), "radius_reduction");
        assert_eq!(rejected(GenerationParameters { branch_upper: 120.0, ..d() }), "branch_upper");
        assert_eq!(rejected(GenerationParameters { branch_steps: 0, ..d() }), "branch_steps");
        assert_eq!(
            rejected(GenerationParameters { twig_count: 3, twig_steps: 0, ..d() }),
            "twig_steps"
        );
    }

    #[test]
    fn zero_steps_allowed_without_instances() {
        let params = GenerationParameters {
            branch_count: 0,
            branch_steps: 0,
            ..Default::default()
        };
        params.validate().unwrap();
    }

    #[test]
    fn runaway_ring_count_is_rejected() {
        let params = GenerationParameters {
            radius_bottom: 0.001,
            radius_top: 0.0,
            height: 100.0,
            ..Default::default()
        };
        assert_eq!(rejected(params), "height");
    }

    #[test]
    fn partial_ron_fills_defaults() {
        let params = GenerationParameters::from_ron_str("(seed: Some(42), segments: 8, twig_count: 12)").unwrap();
        assert_eq!(params.seed, Some(42));
        assert_eq!(params.segments, 8);
        assert_eq!(params.twig_count, 12);
        assert_eq!(params.height, GenerationParameters::default().height);
    }

    #[test]
    fn ron_round_trip() {
        let params = GenerationParameters {
            seed: Some(9),
            ..Default::default()
        };
        let text = params.to_ron_string().unwrap();
        assert_eq!(GenerationParameters::from_ron_str(&text).unwrap(), params);
    }

    #[test]
    fn invalid_values_in_ron_are_rejected() {
        let err = GenerationParameters::from_ron_str("(segments: 1)").unwrap_err();
        assert!(matches!(err, ProcgenError::InvalidParameter { name: "segments", .. }));

        let err = GenerationParameters::from_ron_str("(segments: \"many\")").unwrap_err();
        assert!(matches!(err, ProcgenError::Config(_)));
    }
}
