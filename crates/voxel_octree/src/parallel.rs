//! Read-only neighbor sweeps across rayon workers.
//!
//! A tree that is not being mutated can be shared between threads; the
//! per-traversal state lives in [`NeighborKey`]s, and every worker owns one.

use rayon::prelude::*;

use crate::octree::{NeighborKey, Neighbors, NodeAllocator, NodeId, Octree};

/// Call `f` with the read-only neighbors of every node at `depth`.
///
/// Calls arrive in no particular order and from several threads.
#[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "octree::for_each_node_neighbors"))]
pub fn for_each_node_neighbors<T, A, F>(tree: &Octree<T, A>, depth: u8, f: F)
where
  T: Sync,
  A: NodeAllocator + Sync,
  F: Fn(NodeId, &Neighbors) + Sync + Send,
{
  let nodes = tree.nodes_at_depth(tree.root(), depth);
  nodes
    .par_iter()
    .for_each_init(|| NeighborKey::new(depth), |key, &id| f(id, key.get_neighbors(tree, id)));
}

/// Neighbors of every node at `depth`, in pre-order.
#[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "octree::collect_node_neighbors"))]
pub fn collect_node_neighbors<T, A>(tree: &Octree<T, A>, depth: u8) -> Vec<(NodeId, Neighbors)>
where
  T: Sync,
  A: NodeAllocator + Sync,
{
  let nodes = tree.nodes_at_depth(tree.root(), depth);
  nodes
    .par_iter()
    .map_init(
      || NeighborKey::new(depth),
      |key, &id| (id, *key.get_neighbors(tree, id)),
    )
    .collect()
}

#[cfg(test)]
#[path = "parallel_test.rs"]
mod parallel_test;
