//! Branch-eligible trunk faces and their claim mask.

use mesh::FaceId;

/// Side faces inside the branch height band, in creation order.
///
/// The list always holds whole rings (`segments` faces per ring), so position
/// `n` sits in band row `n / segments` and column `n % segments`. The claim
/// mask (the "extrudable" mask) has one entry per position and only ever
/// flips from free to claimed.
#[derive(Debug, Clone, Default)]
pub struct BranchFaceList {
    faces: Vec<FaceId>,
    claimed: Vec<bool>,
    segments: usize,
}

impl BranchFaceList {
    pub fn new(faces: Vec<FaceId>, segments: usize) -> Self {
        debug_assert!(segments == 0 || faces.len() % segments == 0);
        Self {
            claimed: vec![false; faces.len()],
            faces,
            segments,
        }
    }

    pub fn len(&self) -> usize {
        self.faces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    pub fn segments(&self) -> usize {
        self.segments
    }

    /// Number of complete rings in the band.
    pub fn rows(&self) -> usize {
        if self.segments == 0 {
            0
        } else {
            self.faces.len() / self.segments
        }
    }

    pub fn face(&self, position: usize) -> Option<FaceId> {
        self.faces.get(position).copied()
    }

    pub fn faces(&self) -> &[FaceId] {
        &self.faces
    }

    pub fn is_claimed(&self, position: usize) -> bool {
        self.claimed.get(position).copied().unwrap_or(false)
    }

    pub fn claim_mask(&self) -> &[bool] {
        &self.claimed
    }

    pub fn claimed_count(&self) -> usize {
        self.claimed.iter().filter(|&&c| c).count()
    }

    /// Claim every position in `cluster`, or none of them if any is already
    /// claimed or out of range. Claims are permanent for the run.
    pub fn try_claim(&mut self, cluster: &[usize]) -> bool {
        if cluster
            .iter()
            .any(|&p| p >= self.claimed.len() || self.claimed[p])
        {
            return false;
        }
        for &p in cluster {
            self.claimed[p] = true;
        }
        true
    }
}
