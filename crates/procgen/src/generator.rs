//! One generation run: trunk, branches, twigs with leaves, then coloring.

use crate::adjacency::AdjacencyIndex;
use crate::branch_faces::BranchFaceList;
use crate::coloring::paint_vertices;
use crate::error::ProcgenError;
use crate::growth::{grow, Extrusion, StepLength};
use crate::leaves::{attach_leaves, LeafPlacement};
use crate::params::GenerationParameters;
use crate::trunk::{build_trunk, RadiusProfile};
use mesh::{FaceId, MeshBuffer, MeshData};
use rand::prelude::*;
use std::ops::Range;

/// Progress of a run. Stages only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Idle,
    TrunkBuilt,
    BranchesBuilt,
    TwigsBuilt,
    Colored,
    Finalized,
}

/// What a run produced compared to what was asked for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationSummary {
    /// Seed the random source was started from; replays the run exactly.
    pub seed: u64,
    pub height_segments: usize,
    pub branch_faces: usize,
    pub branches_requested: u32,
    pub branches_built: u32,
    /// Attempts whose seed cluster overlapped an earlier branch, or that had
    /// no room to seed at all.
    pub branches_skipped: u32,
    /// Branches that collapsed mid-growth. Steps completed before the
    /// collapse are kept in the tree mesh.
    pub branches_degenerate: u32,
    pub twigs_requested: u32,
    pub twigs_built: u32,
    /// Twigs that found no branch face to grow from.
    pub twigs_skipped: u32,
    /// Twigs that collapsed mid-growth, partial geometry kept.
    pub twigs_degenerate: u32,
    pub leaves: u32,
}

impl GenerationSummary {
    /// True when fewer branches or twigs were built than requested.
    pub fn is_short(&self) -> bool {
        self.branches_built < self.branches_requested || self.twigs_built < self.twigs_requested
    }
}

/// Exported mesh pair for the host.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TreeMeshes {
    /// Trunk, branches and twigs.
    pub tree: MeshData,
    pub leaves: MeshData,
}

/// Finished run, still in editable buffers.
#[derive(Debug, Clone)]
pub struct GeneratedTree {
    pub tree: MeshBuffer,
    pub leaves: MeshBuffer,
    pub branch_faces: BranchFaceList,
    /// Face ids created by branch growth.
    pub branch_range: Range<usize>,
    pub summary: GenerationSummary,
    pub stage: Stage,
}

impl GeneratedTree {
    pub fn export(&self) -> TreeMeshes {
        TreeMeshes {
            tree: MeshData::from(&self.tree),
            leaves: MeshData::from(&self.leaves),
        }
    }
}

/// Seeded tree generator.
pub struct TreeGenerator {
    params: GenerationParameters,
    profile: Box<dyn RadiusProfile>,
    rng: StdRng,
    seed: u64,
    stage: Stage,
}

impl TreeGenerator {
    /// Validate `params` and seed the random source. Fails before any mesh
    /// exists if a parameter is out of range.
    pub fn new(params: GenerationParameters) -> Result<Self, ProcgenError> {
        params.validate()?;
        let seed = params.seed.unwrap_or_else(rand::random);
        Ok(Self {
            profile: Box::new(params.radius_profile),
            params,
            rng: StdRng::seed_from_u64(seed),
            seed,
            stage: Stage::Idle,
        })
    }

    /// Replace the trunk radius law.
    pub fn with_radius_profile(mut self, profile: impl RadiusProfile + 'static) -> Self {
        self.profile = Box::new(profile);
        self
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn params(&self) -> &GenerationParameters {
        &self.params
    }

    /// Run into fresh buffers.
    pub fn generate(self) -> Result<GeneratedTree, ProcgenError> {
        self.generate_into(MeshBuffer::new(), MeshBuffer::new())
    }

    /// Run into host-supplied buffers, which must be empty.
    pub fn generate_into(
        mut self,
        mut tree: MeshBuffer,
        mut leaves: MeshBuffer,
    ) -> Result<GeneratedTree, ProcgenError> {
        if !tree.is_empty() || !leaves.is_empty() {
            return Err(ProcgenError::invalid("meshes", "host must supply empty mesh buffers"));
        }
        log::debug!("generating tree with seed {}", self.seed);

        let mut summary = GenerationSummary {
            seed: self.seed,
            branches_requested: self.params.branch_count,
            twigs_requested: self.params.twig_count,
            ..Default::default()
        };

        let trunk = build_trunk(&mut tree, &self.params.trunk_shape(), self.profile.as_ref())?;
        summary.height_segments = trunk.height_segments;
        summary.branch_faces = trunk.branch_faces.len();
        self.advance(Stage::TrunkBuilt);

        let mut branch_faces = trunk.branch_faces;
        let branch_range = self.grow_branches(&mut tree, &mut branch_faces, trunk.branch_start, &mut summary)?;
        self.advance(Stage::BranchesBuilt);

        self.grow_twigs(&mut tree, &mut leaves, branch_range.clone(), &mut summary)?;
        self.advance(Stage::TwigsBuilt);

        tree.set_smooth_all(true);
        paint_vertices(&mut tree, &self.params.bark_colors, &mut self.rng)?;
        paint_vertices(&mut leaves, &self.params.foliage_colors, &mut self.rng)?;
        self.advance(Stage::Colored);

        log::info!(
            "tree seed {}: {}/{} branches ({} skipped, {} degenerate), {}/{} twigs, {} leaves, {} faces",
            summary.seed,
            summary.branches_built,
            summary.branches_requested,
            summary.branches_skipped,
            summary.branches_degenerate,
            summary.twigs_built,
            summary.twigs_requested,
            summary.leaves,
            tree.live_face_count(),
        );
        self.advance(Stage::Finalized);

        Ok(GeneratedTree {
            tree,
            leaves,
            branch_faces,
            branch_range,
            summary,
            stage: self.stage,
        })
    }

    fn advance(&mut self, next: Stage) {
        debug_assert!(next > self.stage);
        log::debug!("stage {:?} -> {:?}", self.stage, next);
        self.stage = next;
    }

    fn grow_branches(
        &mut self,
        tree: &mut MeshBuffer,
        faces: &mut BranchFaceList,
        branch_start: usize,
        summary: &mut GenerationSummary,
    ) -> Result<Range<usize>, ProcgenError> {
        let requested = self.params.branch_count;
        if requested == 0 {
            return Ok(branch_start..branch_start);
        }

        let index = AdjacencyIndex::for_list(faces);
        let seed_bound = index.seed_bound();
        if seed_bound == 0 {
            log::warn!(
                "branch band holds {} faces, not enough for a 2x2 seed; no branches",
                faces.len()
            );
            summary.branches_skipped = requested;
            return Ok(branch_start..tree.face_count());
        }

        for _ in 0..requested {
            let n = self.rng.gen_range(0..seed_bound);
            let Some(cluster) = index.cluster(n) else {
                summary.branches_skipped += 1;
                continue;
            };
            if !faces.try_claim(&cluster) {
                summary.branches_skipped += 1;
                continue;
            }

            let seed: Vec<FaceId> = cluster.iter().filter_map(|&p| faces.face(p)).collect();
            let height_fraction = (tree.region_centroid(&seed)?.z / self.params.height).clamp(0.0, 1.0);
            let steps = self.params.branch_steps;
            let length = (1.0 - height_fraction) * self.params.branch_length / steps as f32;

            match grow(
                tree,
                seed,
                steps,
                StepLength::Uniform(length),
                &self.params.branch_jitter,
                &mut self.rng,
            ) {
                Ok(_) => summary.branches_built += 1,
                Err(ProcgenError::DegenerateGeometry { step }) => {
                    log::warn!("branch at band position {n} collapsed on step {step}; stopped");
                    summary.branches_degenerate += 1;
                }
                Err(e) => return Err(e),
            }
        }

        if summary.branches_built < requested {
            log::debug!("built {} of {} requested branches", summary.branches_built, requested);
        }
        Ok(branch_start..tree.face_count())
    }

    fn grow_twigs(
        &mut self,
        tree: &mut MeshBuffer,
        leaves: &mut MeshBuffer,
        branch_range: Range<usize>,
        summary: &mut GenerationSummary,
    ) -> Result<(), ProcgenError> {
        let steps = self.params.twig_steps;
        for twig in 0..self.params.twig_count {
            let candidates = tree.live_faces_in(branch_range.start, branch_range.end);
            let Some(&seed) = candidates.choose(&mut self.rng) else {
                let remaining = self.params.twig_count - twig;
                log::warn!("no branch faces to grow twigs from; skipping {remaining} twigs");
                summary.twigs_skipped += remaining;
                break;
            };

            let mut extrusion = Extrusion::new(vec![seed]);
            let mut collapsed = false;
            for step in 0..steps {
                let outcome = match extrusion.step(
                    tree,
                    self.params.twig_length.at(step),
                    &self.params.twig_jitter,
                    &mut self.rng,
                ) {
                    Ok(outcome) => outcome,
                    Err(ProcgenError::DegenerateGeometry { step }) => {
                        log::warn!("twig from face {seed} collapsed on step {step}; stopped");
                        collapsed = true;
                        break;
                    }
                    Err(e) => return Err(e),
                };

                let hang = match self.params.leaf_placement {
                    LeafPlacement::EveryStep => true,
                    LeafPlacement::TipOnly => step + 1 == steps,
                };
                if hang {
                    let added = attach_leaves(tree, &outcome.faces, leaves, &self.params.leaf, &mut self.rng)?;
                    summary.leaves += added as u32;
                }
            }

            if collapsed {
                summary.twigs_degenerate += 1;
            } else {
                summary.twigs_built += 1;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::growth::GrowthJitter;
    use crate::trunk::RingSample;
    use glam::Vec3;

    fn params() -> GenerationParameters {
        GenerationParameters {
            seed: Some(1234),
            segments: 8,
            radius_bottom: 0.3,
            radius_top: 0.1,
            height: 2.0,
            branch_count: 6,
            branch_steps: 4,
            twig_count: 10,
            twig_steps: 3,
            ..Default::default()
        }
    }

    #[test]
    fn invalid_parameters_fail_before_building() {
        let result = TreeGenerator::new(GenerationParameters {
            segments: 2,
            ..params()
        });
        assert!(matches!(result, Err(ProcgenError::InvalidParameter { name: "segments", .. })));
    }

    #[test]
    fn host_buffers_must_be_empty() {
        let mut tree = MeshBuffer::new();
        tree.add_vertex(Vec3::ZERO);
        let result = TreeGenerator::new(params()).unwrap().generate_into(tree, MeshBuffer::new());
        assert!(matches!(result, Err(ProcgenError::InvalidParameter { name: "meshes", .. })));
    }

    #[test]
    fn bare_trunk_without_branches_or_twigs() {
        let p = GenerationParameters {
            branch_count: 0,
            twig_count: 0,
            ..params()
        };
        let shape = p.trunk_shape();
        let out = TreeGenerator::new(p).unwrap().generate().unwrap();

        let hs = shape.height_segments();
        assert_eq!(out.tree.live_face_count(), shape.segments * hs + 2);
        assert_eq!(out.tree.vertex_count(), shape.segments * (hs + 1));
        assert!(out.leaves.is_empty());
        assert!(out.branch_range.is_empty());
        assert_eq!(out.branch_faces.claimed_count(), 0);
        assert_eq!(out.stage, Stage::Finalized);
        assert!(!out.summary.is_short());

        let export = out.export();
        assert!(export.leaves.is_empty());
        assert!(export.tree.smooth.iter().all(|&s| s));
    }

    #[test]
    fn each_branch_claims_exactly_four_faces() {
        for seed in 0..20 {
            let out = TreeGenerator::new(GenerationParameters {
                seed: Some(seed),
                branch_count: 12,
                twig_count: 0,
                ..params()
            })
            .unwrap()
            .generate()
            .unwrap();

            let s = &out.summary;
            let accepted = s.branches_built + s.branches_degenerate;
            assert_eq!(out.branch_faces.claimed_count(), 4 * accepted as usize);
            assert_eq!(accepted + s.branches_skipped, s.branches_requested);
        }
    }

    #[test]
    fn branches_add_geometry_after_trunk() {
        let out = TreeGenerator::new(GenerationParameters {
            twig_count: 0,
            ..params()
        })
        .unwrap()
        .generate()
        .unwrap();

        assert!(out.summary.branches_built > 0);
        assert!(!out.branch_range.is_empty());
        // Claimed trunk faces were replaced by branches.
        for (p, &claimed) in out.branch_faces.claim_mask().iter().enumerate() {
            let face = out.branch_faces.face(p).unwrap();
            assert_eq!(out.tree.is_live(face), !claimed);
        }
    }

    #[test]
    fn twigs_grow_from_branches_and_carry_leaves() {
        let p = params();
        let steps = p.twig_steps;
        let out = TreeGenerator::new(p).unwrap().generate().unwrap();
        let s = &out.summary;

        assert!(s.branches_built > 0);
        assert_eq!(s.twigs_built + s.twigs_degenerate + s.twigs_skipped, s.twigs_requested);
        assert_eq!(s.leaves, s.twigs_built * steps * 2);
        assert_eq!(out.leaves.live_face_count() as u32, s.leaves);
        assert!(out.leaves.faces().all(|(_, f)| f.len() == 4 && !f.smooth));
    }

    #[test]
    fn tip_only_leaves() {
        let p = GenerationParameters {
            leaf_placement: LeafPlacement::TipOnly,
            ..params()
        };
        let out = TreeGenerator::new(p).unwrap().generate().unwrap();
        assert_eq!(out.summary.leaves, out.summary.twigs_built * 2);
    }

    #[test]
    fn twigs_without_branches_are_skipped() {
        let out = TreeGenerator::new(GenerationParameters {
            branch_count: 0,
            twig_count: 5,
            ..params()
        })
        .unwrap()
        .generate()
        .unwrap();
        assert_eq!(out.summary.twigs_skipped, 5);
        assert_eq!(out.summary.twigs_built, 0);
        assert!(out.leaves.is_empty());
        assert!(out.summary.is_short());
    }

    #[test]
    fn narrow_band_skips_all_branches() {
        let out = TreeGenerator::new(GenerationParameters {
            branch_lower: 0.0,
            branch_upper: 0.0,
            twig_count: 0,
            ..params()
        })
        .unwrap()
        .generate()
        .unwrap();
        assert_eq!(out.summary.branch_faces, 0);
        assert_eq!(out.summary.branches_built, 0);
        assert_eq!(out.summary.branches_skipped, out.summary.branches_requested);
    }

    #[test]
    fn fixed_seed_reproduces_everything() {
        let run = || TreeGenerator::new(params()).unwrap().generate().unwrap().export();
        let (a, b) = (run(), run());
        assert_eq!(a, b);
        let bits = |m: &MeshData| m.loop_colors.iter().flatten().map(|c| c.to_bits()).collect::<Vec<_>>();
        assert_eq!(bits(&a.tree), bits(&b.tree));
        assert_eq!(bits(&a.leaves), bits(&b.leaves));
    }

    #[test]
    fn unseeded_runs_report_their_seed() {
        let generator = TreeGenerator::new(GenerationParameters {
            seed: None,
            ..params()
        })
        .unwrap();
        let seed = generator.seed();
        let first = generator.generate().unwrap();
        assert_eq!(first.summary.seed, seed);

        let replay = TreeGenerator::new(GenerationParameters {
            seed: Some(seed),
            ..params()
        })
        .unwrap()
        .generate()
        .unwrap();
        assert_eq!(first.export(), replay.export());
    }

    #[test]
    fn custom_radius_profile_replaces_default() {
        let out = TreeGenerator::new(GenerationParameters {
            branch_count: 0,
            ..params()
        })
        .unwrap()
        .with_radius_profile(|_: RingSample| 0.25)
        .generate()
        .unwrap();
        for p in out.tree.positions() {
            assert!((p.truncate().length() - 0.25).abs() < 1e-5);
        }
    }

    #[test]
    fn single_straight_branch_tip_lands_on_normal() {
        let p = GenerationParameters {
            segments: 12,
            radius_bottom: 0.5,
            radius_top: 0.5,
            radius_reduction: 0.0,
            height: 3.0,
            ..params()
        };
        let mut tree = MeshBuffer::new();
        let trunk = build_trunk(&mut tree, &p.trunk_shape(), &p.radius_profile).unwrap();
        let mut faces = trunk.branch_faces;
        let index = AdjacencyIndex::for_list(&faces);

        let n = faces.segments() * 2 + faces.segments() - 1; // last column, wraps
        let cluster = index.cluster(n).unwrap();
        assert!(faces.try_claim(&cluster));
        let seed: Vec<FaceId> = cluster.iter().map(|&i| faces.face(i).unwrap()).collect();

        let seed_centroid = tree.region_centroid(&seed).unwrap();
        let normal = tree.average_normal(&seed).unwrap();
        let length = 0.4;
        let mut rng = StdRng::seed_from_u64(0);
        let tip = grow(&mut tree, seed, 1, StepLength::Uniform(length), &GrowthJitter::NONE, &mut rng).unwrap();

        let tip_centroid = tree.region_centroid(&tip).unwrap();
        assert!((tip_centroid - (seed_centroid + normal * length)).length() < 1e-5);
        assert_eq!(faces.claimed_count(), 4);
    }

    #[test]
    fn branch_length_shrinks_with_seed_height() {
        let p = GenerationParameters {
            segments: 12,
            radius_bottom: 0.5,
            radius_top: 0.5,
            radius_reduction: 0.0,
            height: 3.0,
            branch_count: 1,
            branch_steps: 5,
            branch_length: 2.0,
            branch_jitter: GrowthJitter::NONE,
            twig_count: 0,
            ..params()
        };
        let out = TreeGenerator::new(p.clone()).unwrap().generate().unwrap();
        assert_eq!(out.summary.branches_built, 1);

        // Rebuild the untouched trunk to read the seed faces before extrusion.
        let mut trunk_mesh = MeshBuffer::new();
        build_trunk(&mut trunk_mesh, &p.trunk_shape(), &p.radius_profile).unwrap();
        let seed: Vec<FaceId> = out
            .branch_faces
            .claim_mask()
            .iter()
            .enumerate()
            .filter(|&(_, &claimed)| claimed)
            .map(|(i, _)| out.branch_faces.face(i).unwrap())
            .collect();
        assert_eq!(seed.len(), 4);

        let seed_centroid = trunk_mesh.region_centroid(&seed).unwrap();
        let normal = trunk_mesh.average_normal(&seed).unwrap();
        let height_fraction = seed_centroid.z / p.height;
        assert!(height_fraction > 0.0 && height_fraction < 1.0);
        let expected = seed_centroid + normal * (1.0 - height_fraction) * p.branch_length;

        // The last extrusion adds four caps, then eight walls.
        let end = out.branch_range.end as u32;
        let tip: Vec<FaceId> = (end - 12..end - 8).map(FaceId).collect();
        assert!(tip.iter().all(|&f| out.tree.is_live(f)));
        let tip_centroid = out.tree.region_centroid(&tip).unwrap();
        assert!(
            (tip_centroid - expected).length() < 1e-4,
            "tip {tip_centroid} expected {expected}"
        );
    }
}
