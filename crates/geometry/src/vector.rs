//! Vector helpers.

use glam::Vec3;

/// Arithmetic mean of a set of vectors, or `None` when the set is empty.
pub fn mean<I>(vectors: I) -> Option<Vec3>
where
    I: IntoIterator<Item = Vec3>,
{
    let (sum, count) = vectors
        .into_iter()
        .fold((Vec3::ZERO, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f32)
}

/// Polygon normal by Newell's method. Robust for non-planar quads; returns
/// the zero vector for collapsed polygons.
pub fn polygon_normal(points: &[Vec3]) -> Vec3 {
    let mut normal = Vec3::ZERO;
    for (i, current) in points.iter().enumerate() {
        let next = points[(i + 1) % points.len()];
        normal.x += (current.y - next.y) * (current.z + next.z);
        normal.y += (current.z - next.z) * (current.x + next.x);
        normal.z += (current.x - next.x) * (current.y + next.y);
    }
    normal.normalize_or_zero()
}
