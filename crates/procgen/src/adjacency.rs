//! Toroidal neighbour lookup over the branch face list.

use crate::branch_faces::BranchFaceList;

/// Maps a branch-list position to the 2x2 block of faces rooted at it.
///
/// Columns wrap around the ring: in the last column the "next column" face
/// is the first face of the same ring (`n - segments + 1`) and the diagonal
/// is the first face of the next ring (`n + 1`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdjacencyIndex {
    segments: usize,
    len: usize,
}

impl AdjacencyIndex {
    /// `segments` must be at least 3; parameter validation guarantees it for
    /// generated trunks.
    pub fn new(segments: usize, len: usize) -> Self {
        debug_assert!(segments >= 3, "rings need at least 3 segments");
        Self { segments, len }
    }

    pub fn for_list(list: &BranchFaceList) -> Self {
        Self::new(list.segments(), list.len())
    }

    fn is_last_column(&self, n: usize) -> bool {
        n % self.segments == self.segments - 1
    }

    /// Same ring, next column.
    pub fn next_column(&self, n: usize) -> usize {
        if self.is_last_column(n) {
            n + 1 - self.segments
        } else {
            n + 1
        }
    }

    /// Next ring, same column.
    pub fn next_ring(&self, n: usize) -> usize {
        n + self.segments
    }

    /// Next ring, next column.
    pub fn diagonal(&self, n: usize) -> usize {
        if self.is_last_column(n) {
            n + 1
        } else {
            n + self.segments + 1
        }
    }

    /// `[n, next column, next ring, diagonal]`, without range checks.
    pub fn neighbors(&self, n: usize) -> [usize; 4] {
        [n, self.next_column(n), self.next_ring(n), self.diagonal(n)]
    }

    /// The 2x2 cluster rooted at `n`, or `None` if any member would fall
    /// outside the list.
    pub fn cluster(&self, n: usize) -> Option<[usize; 4]> {
        let cluster = self.neighbors(n);
        cluster.iter().all(|&p| p < self.len).then_some(cluster)
    }

    /// Exclusive upper bound of positions whose whole cluster is in range.
    ///
    /// The list holds whole rings, so every position below the top ring of
    /// the band qualifies and nothing in the top ring does.
    pub fn seed_bound(&self) -> usize {
        self.len.saturating_sub(self.segments)
    }
}
