//! The host application seam: scene reset, buffer allocation, and handoff.

use crate::generator::{GenerationSummary, TreeGenerator, TreeMeshes};
use crate::params::GenerationParameters;
use mesh::MeshBuffer;

/// An application that receives generated trees.
pub trait MeshHost {
    /// Remove whatever a previous run left in the host scene.
    fn clear_scene(&mut self) {}

    /// Empty containers for the tree and leaf meshes.
    fn allocate(&mut self) -> (MeshBuffer, MeshBuffer) {
        (MeshBuffer::new(), MeshBuffer::new())
    }

    /// Take ownership of the finished meshes.
    fn accept(&mut self, meshes: TreeMeshes) -> anyhow::Result<()>;
}

/// Run one generation against `host`. Parameters are validated before the
/// host is touched.
pub fn run<H: MeshHost + ?Sized>(host: &mut H, params: GenerationParameters) -> anyhow::Result<GenerationSummary> {
    let generator = TreeGenerator::new(params)?;
    host.clear_scene();
    let (tree, leaves) = host.allocate();
    let generated = generator.generate_into(tree, leaves)?;
    host.accept(generated.export())?;
    Ok(generated.summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingHost {
        cleared: usize,
        received: Vec<TreeMeshes>,
    }

    impl MeshHost for RecordingHost {
        fn clear_scene(&mut self) {
            self.cleared += 1;
        }

        fn accept(&mut self, meshes: TreeMeshes) -> anyhow::Result<()> {
            self.received.push(meshes);
            Ok(())
        }
    }

    #[test]
    fn run_hands_meshes_to_host() {
        let mut host = RecordingHost::default();
        let params = GenerationParameters {
            seed: Some(3),
            branch_count: 4,
            twig_count: 4,
            twig_steps: 2,
            ..Default::default()
        };
        let summary = run(&mut host, params).unwrap();

        assert_eq!(host.cleared, 1);
        assert_eq!(host.received.len(), 1);
        let meshes = &host.received[0];
        assert!(!meshes.tree.is_empty());
        assert_eq!(meshes.leaves.faces.len() as u32, summary.leaves);
        assert_eq!(meshes.tree.loop_colors.len(), meshes.tree.loop_count());
    }

    #[test]
    fn invalid_parameters_never_reach_host() {
        let mut host = RecordingHost::default();
        let params = GenerationParameters {
            height: 0.0,
            ..Default::default()
        };
        assert!(run(&mut host, params).is_err());
        assert_eq!(host.cleared, 0);
        assert!(host.received.is_empty());
    }
}
