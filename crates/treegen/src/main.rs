//! treegen - headless tree generator. Reads parameters from a RON file and
//! logs what one run produced.

use anyhow::{Context, Result};
use procgen::{GenerationParameters, MeshHost, TreeMeshes};
use std::path::{Path, PathBuf};

/// Host that keeps nothing and logs mesh sizes.
#[derive(Default)]
struct LogHost;

impl MeshHost for LogHost {
    fn clear_scene(&mut self) {
        log::debug!("clearing scene");
    }

    fn accept(&mut self, meshes: TreeMeshes) -> Result<()> {
        log::info!(
            "tree: {} vertices, {} faces, {} triangles",
            meshes.tree.positions.len(),
            meshes.tree.faces.len(),
            meshes.tree.triangulate().len() / 3
        );
        log::info!(
            "leaves: {} vertices, {} faces ({} bytes of loop color)",
            meshes.leaves.positions.len(),
            meshes.leaves.faces.len(),
            meshes.leaves.loop_color_bytes().len()
        );
        Ok(())
    }
}

/// Load parameters from `path`. If the file is missing or invalid, returns defaults.
fn load_params(path: &Path) -> GenerationParameters {
    match std::fs::read_to_string(path) {
        Ok(data) => match GenerationParameters::from_ron_str(&data) {
            Ok(params) => return params,
            Err(e) => log::warn!("Invalid parameters at {:?}: {}, using defaults", path, e),
        },
        Err(e) => log::warn!("Could not read {:?}: {}, using defaults", path, e),
    }
    GenerationParameters::default()
}

fn params_path() -> PathBuf {
    std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            std::env::current_dir()
                .unwrap_or_else(|_| PathBuf::from("."))
                .join("tree.ron")
        })
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let path = params_path();
    let params = load_params(&path);
    log::info!("Generating tree from {:?}", path);

    let summary = procgen::run(&mut LogHost, params).context("tree generation failed")?;
    if summary.is_short() {
        log::warn!(
            "placed {}/{} branches and {}/{} twigs (seed {})",
            summary.branches_built,
            summary.branches_requested,
            summary.twigs_built,
            summary.twigs_requested,
            summary.seed
        );
    }
    Ok(())
}
