//! Host-facing mesh data: compacted vertices, polygons, per-loop colors.

use crate::buffer::MeshBuffer;
use bytemuck::{Pod, Zeroable};
use std::collections::HashMap;

/// Position plus color, one per face corner, for hosts that upload flat
/// vertex streams.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct LoopVertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
}

/// Mesh data ready to hand to the host application.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    /// Vertex positions. Only vertices referenced by a face are kept.
    pub positions: Vec<[f32; 3]>,
    /// Polygons as indices into `positions`.
    pub faces: Vec<Vec<u32>>,
    /// Smoothing flag per polygon.
    pub smooth: Vec<bool>,
    /// One color per face corner, in face order.
    pub loop_colors: Vec<[f32; 4]>,
}

impl MeshData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Total number of face corners.
    pub fn loop_count(&self) -> usize {
        self.faces.iter().map(Vec::len).sum()
    }

    /// Fan-triangulated index list (polygons here are convex or nearly so).
    pub fn triangulate(&self) -> Vec<u32> {
        let mut indices = Vec::new();
        for face in &self.faces {
            for i in 1..face.len().saturating_sub(1) {
                indices.extend_from_slice(&[face[0], face[i], face[i + 1]]);
            }
        }
        indices
    }

    /// Flat per-corner vertex stream matching `loop_colors`.
    pub fn loop_vertices(&self) -> Vec<LoopVertex> {
        self.faces
            .iter()
            .flatten()
            .zip(&self.loop_colors)
            .map(|(&i, &color)| LoopVertex {
                position: self.positions[i as usize],
                color,
            })
            .collect()
    }

    pub fn position_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.positions)
    }

    pub fn loop_color_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.loop_colors)
    }
}

impl From<&MeshBuffer> for MeshData {
    fn from(mesh: &MeshBuffer) -> Self {
        let mut data = MeshData::new();
        let mut remap: HashMap<usize, u32> = HashMap::new();

        for (_, face) in mesh.faces() {
            let mut indices = Vec::with_capacity(face.len());
            for v in face.vertices() {
                let next = data.positions.len() as u32;
                let index = *remap.entry(v.index()).or_insert_with(|| {
                    data.positions.push(mesh.positions()[v.index()].to_array());
                    next
                });
                indices.push(index);
                data.loop_colors.push(mesh.colors()[v.index()].to_array());
            }
            data.faces.push(indices);
            data.smooth.push(face.smooth);
        }
        data
    }
}
