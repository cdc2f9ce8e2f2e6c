use glam::DVec3;

/// Strict per-axis overlap of two cubes given by center and half-extent.
#[inline]
pub fn overlaps(center1: DVec3, extent1: f64, center2: DVec3, extent2: f64) -> bool {
  let gap = (center1 - center2).abs();
  let reach = extent1 + extent2;
  gap.x < reach && gap.y < reach && gap.z < reach
}

/// Half-extent covering the expanded cube of every node in a subtree whose
/// root has width `width`.
///
/// A descendant at width `w'` sits at most `(width - w') / 2` from the root
/// center and reaches `radius * w' / 2` past its own center, which is bounded
/// by `max(radius, 1) * width / 2`.
#[inline]
pub fn subtree_reach(radius: f64, width: f64) -> f64 {
  radius.max(1.0) * width * 0.5
}

/// Half-extent of a node's own expanded cube.
#[inline]
pub fn node_reach(radius: f64, width: f64) -> f64 {
  radius * width * 0.5
}
