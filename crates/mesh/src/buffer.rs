//! Mesh buffer: append-only vertices, tombstoned faces.

use crate::error::MeshError;
use geometry::{mean, polygon_normal};
use glam::{Mat4, Vec3, Vec4};
use std::collections::HashSet;
use std::fmt;

/// Handle to a vertex owned by a [`MeshBuffer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VertexId(pub u32);

/// Handle to a face owned by a [`MeshBuffer`]. Handles are issued in creation
/// order and never reused, so a range of ids identifies everything created
/// between two points in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FaceId(pub u32);

impl VertexId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl FaceId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

impl fmt::Display for FaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "f{}", self.0)
    }
}

/// Default vertex color before any painting.
pub const WHITE: Vec4 = Vec4::ONE;

/// A polygon over 3+ distinct vertices. Winding gives the normal direction.
#[derive(Debug, Clone, PartialEq)]
pub struct Face {
    vertices: Vec<VertexId>,
    pub smooth: bool,
}

impl Face {
    pub fn vertices(&self) -> &[VertexId] {
        &self.vertices
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Directed edges in winding order, closing back to the first vertex.
    pub fn edges(&self) -> impl Iterator<Item = (VertexId, VertexId)> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| (self.vertices[i], self.vertices[(i + 1) % n]))
    }
}

/// Indexed vertex/face store.
#[derive(Debug, Clone, Default)]
pub struct MeshBuffer {
    positions: Vec<Vec3>,
    colors: Vec<Vec4>,
    faces: Vec<Option<Face>>,
    live_faces: usize,
}

impl MeshBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_vertex(&mut self, position: Vec3) -> VertexId {
        let id = VertexId(self.positions.len() as u32);
        self.positions.push(position);
        self.colors.push(WHITE);
        id
    }

    /// Insert a face over existing vertices.
    pub fn add_face(&mut self, vertices: &[VertexId]) -> Result<FaceId, MeshError> {
        if vertices.len() < 3 {
            return Err(MeshError::TooFewVertices(vertices.len()));
        }
        let mut seen = HashSet::with_capacity(vertices.len());
        for &v in vertices {
            if v.index() >= self.positions.len() {
                return Err(MeshError::UnknownVertex(v));
            }
            if !seen.insert(v) {
                return Err(MeshError::RepeatedVertex(v));
            }
        }

        let id = FaceId(self.faces.len() as u32);
        self.faces.push(Some(Face {
            vertices: vertices.to_vec(),
            smooth: false,
        }));
        self.live_faces += 1;
        Ok(id)
    }

    /// Delete a face. Its vertices stay in the buffer.
    pub fn remove_face(&mut self, id: FaceId) -> Result<Face, MeshError> {
        let face = self
            .faces
            .get_mut(id.index())
            .and_then(Option::take)
            .ok_or(MeshError::UnknownFace(id))?;
        self.live_faces -= 1;
        Ok(face)
    }

    pub fn face(&self, id: FaceId) -> Option<&Face> {
        self.faces.get(id.index()).and_then(Option::as_ref)
    }

    pub fn is_live(&self, id: FaceId) -> bool {
        self.face(id).is_some()
    }

    pub fn position(&self, id: VertexId) -> Option<Vec3> {
        self.positions.get(id.index()).copied()
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn color(&self, id: VertexId) -> Option<Vec4> {
        self.colors.get(id.index()).copied()
    }

    pub fn colors(&self) -> &[Vec4] {
        &self.colors
    }

    pub fn set_color(&mut self, id: VertexId, color: Vec4) -> Result<(), MeshError> {
        let slot = self
            .colors
            .get_mut(id.index())
            .ok_or(MeshError::UnknownVertex(id))?;
        *slot = color;
        Ok(())
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of face handles ever issued, including deleted ones. The next
    /// face created receives `FaceId(face_count())`.
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    pub fn live_face_count(&self) -> usize {
        self.live_faces
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty() && self.live_faces == 0
    }

    /// Live faces in creation order.
    pub fn faces(&self) -> impl Iterator<Item = (FaceId, &Face)> + '_ {
        self.faces
            .iter()
            .enumerate()
            .filter_map(|(i, f)| f.as_ref().map(|f| (FaceId(i as u32), f)))
    }

    /// Live faces whose ids fall in `[start, end)`.
    pub fn live_faces_in(&self, start: usize, end: usize) -> Vec<FaceId> {
        let end = end.min(self.faces.len());
        (start.min(end)..end)
            .filter(|&i| self.faces[i].is_some())
            .map(|i| FaceId(i as u32))
            .collect()
    }

    pub fn set_smooth(&mut self, id: FaceId, smooth: bool) -> Result<(), MeshError> {
        let face = self
            .faces
            .get_mut(id.index())
            .and_then(Option::as_mut)
            .ok_or(MeshError::UnknownFace(id))?;
        face.smooth = smooth;
        Ok(())
    }

    pub fn set_smooth_all(&mut self, smooth: bool) {
        for face in self.faces.iter_mut().flatten() {
            face.smooth = smooth;
        }
    }

    fn live_face(&self, id: FaceId) -> Result<&Face, MeshError> {
        self.face(id).ok_or(MeshError::UnknownFace(id))
    }

    fn face_points(&self, face: &Face) -> Vec<Vec3> {
        face.vertices.iter().map(|v| self.positions[v.index()]).collect()
    }

    /// Unit normal from the current vertex positions (zero if collapsed).
    pub fn face_normal(&self, id: FaceId) -> Result<Vec3, MeshError> {
        let face = self.live_face(id)?;
        Ok(polygon_normal(&self.face_points(face)))
    }

    /// Median center of a face's corners.
    pub fn face_centroid(&self, id: FaceId) -> Result<Vec3, MeshError> {
        let face = self.live_face(id)?;
        Ok(mean(self.face_points(face)).unwrap_or(Vec3::ZERO))
    }

    /// Mean of the unit normals of `faces`, not renormalized. The result is
    /// zero when the normals cancel or every face is collapsed.
    pub fn average_normal(&self, faces: &[FaceId]) -> Result<Vec3, MeshError> {
        let normals = faces
            .iter()
            .map(|&f| self.face_normal(f))
            .collect::<Result<Vec<_>, _>>()?;
        mean(normals).ok_or(MeshError::EmptyRegion)
    }

    /// Distinct vertices used by `faces`, in first-seen order.
    pub fn region_vertices(&self, faces: &[FaceId]) -> Result<Vec<VertexId>, MeshError> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for &f in faces {
            for &v in self.live_face(f)?.vertices() {
                if seen.insert(v) {
                    out.push(v);
                }
            }
        }
        Ok(out)
    }

    /// Center of the distinct vertices used by `faces`.
    pub fn region_centroid(&self, faces: &[FaceId]) -> Result<Vec3, MeshError> {
        let verts = self.region_vertices(faces)?;
        mean(verts.iter().map(|v| self.positions[v.index()])).ok_or(MeshError::EmptyRegion)
    }

    pub fn translate_vertices(&mut self, vertices: &[VertexId], delta: Vec3) -> Result<(), MeshError> {
        for &v in vertices {
            let p = self
                .positions
                .get_mut(v.index())
                .ok_or(MeshError::UnknownVertex(v))?;
            *p += delta;
        }
        Ok(())
    }

    pub fn transform_vertices(&mut self, vertices: &[VertexId], matrix: &Mat4) -> Result<(), MeshError> {
        for &v in vertices {
            let p = self
                .positions
                .get_mut(v.index())
                .ok_or(MeshError::UnknownVertex(v))?;
            *p = matrix.transform_point3(*p);
        }
        Ok(())
    }
}
