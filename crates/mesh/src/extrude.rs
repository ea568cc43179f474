//! Extrude-face-region.

use crate::buffer::{FaceId, MeshBuffer, VertexId};
use crate::error::MeshError;
use std::collections::{HashMap, HashSet};

/// Geometry created by [`MeshBuffer::extrude_face_region`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtrudeResult {
    /// Duplicated vertices of the new cap, in first-seen order.
    pub vertices: Vec<VertexId>,
    /// New cap faces, one per input face, in input order.
    pub faces: Vec<FaceId>,
    /// Side walls joining the old region boundary to the new cap.
    pub side_faces: Vec<FaceId>,
}

impl MeshBuffer {
    /// Lift a connected face region into a new cap joined by side walls.
    ///
    /// Every vertex of the region is duplicated in place, each face is
    /// replaced by a copy over the duplicates, and each boundary edge `a -> b`
    /// gains a wall quad `(a, b, b', a')`. The original faces are deleted; their
    /// vertices stay, still referenced by the walls and by neighbouring faces.
    /// The new cap sits on top of the old one until the caller moves it.
    pub fn extrude_face_region(&mut self, region: &[FaceId]) -> Result<ExtrudeResult, MeshError> {
        let mut unique = HashSet::new();
        let region: Vec<FaceId> = region.iter().copied().filter(|f| unique.insert(*f)).collect();
        if region.is_empty() {
            return Err(MeshError::EmptyRegion);
        }

        let mut loops = Vec::with_capacity(region.len());
        let mut smooth = Vec::with_capacity(region.len());
        for &id in &region {
            let face = self.face(id).ok_or(MeshError::UnknownFace(id))?;
            loops.push(face.vertices().to_vec());
            smooth.push(face.smooth);
        }

        // An edge is interior when its twin (reverse direction) is also in the region.
        let directed: HashSet<(VertexId, VertexId)> = loops
            .iter()
            .flat_map(|l| (0..l.len()).map(move |i| (l[i], l[(i + 1) % l.len()])))
            .collect();
        let boundary: Vec<(VertexId, VertexId)> = loops
            .iter()
            .flat_map(|l| (0..l.len()).map(move |i| (l[i], l[(i + 1) % l.len()])))
            .filter(|&(a, b)| !directed.contains(&(b, a)))
            .collect();

        let mut result = ExtrudeResult::default();
        let mut copies: HashMap<VertexId, VertexId> = HashMap::new();
        for &v in loops.iter().flatten() {
            if copies.contains_key(&v) {
                continue;
            }
            let position = self.position(v).ok_or(MeshError::UnknownVertex(v))?;
            let color = self.color(v).ok_or(MeshError::UnknownVertex(v))?;
            let copy = self.add_vertex(position);
            self.set_color(copy, color)?;
            copies.insert(v, copy);
            result.vertices.push(copy);
        }

        for &id in &region {
            self.remove_face(id)?;
        }

        for (l, smooth) in loops.iter().zip(smooth) {
            let cap: Vec<VertexId> = l.iter().map(|v| copies[v]).collect();
            let id = self.add_face(&cap)?;
            if smooth {
                self.set_smooth(id, true)?;
            }
            result.faces.push(id);
        }

        for (a, b) in boundary {
            let wall = [a, b, copies[&b], copies[&a]];
            result.side_faces.push(self.add_face(&wall)?);
        }

        Ok(result)
    }
}
