use glam::DVec3;

use super::overlap::{node_reach, subtree_reach};
use super::{AdjacencyStats, PointAdjacency, Probe};
use crate::octree::{NodeAllocator, NodeId, Octree};

/// Visit every node below `probe.node`, at any depth, whose expanded cube
/// strictly contains `point`.
///
/// The point itself has no extent. Nodes are visited parent before child.
/// With `process_current == false` the starting node is skipped but its
/// subtree is still searched.
#[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "octree::process_point_adjacent_nodes"))]
pub fn process_point_adjacent_nodes<T, A, V>(
  point: DVec3,
  probe: Probe<'_, T, A>,
  process_current: bool,
  mut visitor: V,
) -> AdjacencyStats
where
  A: NodeAllocator,
  V: PointAdjacency,
{
  let mut stats = AdjacencyStats::default();
  let mut stack = vec![probe.node];
  while let Some(id) = stack.pop() {
    stats.tested += 1;
    let (center, width) = probe.tree.center_and_width(id);
    let gap = (point - center).abs();
    if gap.max_element() >= subtree_reach(probe.radius, width) {
      stats.pruned += 1;
      continue;
    }
    if gap.max_element() < node_reach(probe.radius, width) && (process_current || id != probe.node) {
      stats.visited += 1;
      visitor.visit(id);
    }
    push_children_reversed(probe.tree, id, &mut stack);
  }
  stats
}

/// Push children so that they pop in corner order.
fn push_children_reversed<T, A: NodeAllocator>(tree: &Octree<T, A>, id: NodeId, stack: &mut Vec<NodeId>) {
  if let Some(children) = tree.children(id) {
    stack.extend(children.into_iter().rev());
  }
}
