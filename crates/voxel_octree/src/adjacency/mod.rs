//! Pairwise overlap traversal over one or two trees.
//!
//! Every walk takes its inputs as [`Probe`]s: a tree, the node to start at,
//! and a radius multiplier. A node at width `w` probed with radius `r` covers
//! the cube of half-extent `r * w / 2` around its center, so `r = 1` is the
//! node's own cell and larger radii reach into the neighborhood.
//!
//! # Overlap
//!
//! Two expanded cubes overlap when, on every axis,
//!
//! ```text
//! |c1 - c2| < (r1 * w1 + r2 * w2) / 2
//! ```
//!
//! The inequality is strict. Whole subtrees are pruned with the bound
//! `max(r, 1) * w / 2`, which covers every descendant's expanded cube.
//!
//! # Walks
//!
//! | entry point                                | visits                              |
//! |--------------------------------------------|-------------------------------------|
//! | [`process_node_adjacent_nodes`]            | overlapping leaf pairs              |
//! | [`process_terminating_node_adjacent_nodes`]| overlapping pairs at any depth      |
//! | [`process_fixed_depth_node_adjacent_nodes`]| overlapping pairs at one depth      |
//! | [`process_max_depth_node_adjacent_nodes`]  | overlapping leaf pairs, depth-capped|
//! | [`process_point_adjacent_nodes`]           | nodes whose cube contains a point   |
//!
//! The per-node helpers in [`local`] enumerate the descendants touching one
//! face, edge or corner without any geometry.
//!
//! Visitors are plain closures. Panics raised inside a visitor unwind out of
//! the walk; the trees are only borrowed, so nothing is left half-updated.

mod dual;
pub mod local;
mod overlap;
mod point;

use std::ops::AddAssign;

use crate::octree::{BlockAllocator, NodeAllocator, NodeId, Octree};

pub use dual::{
  process_fixed_depth_node_adjacent_nodes, process_max_depth_node_adjacent_nodes,
  process_node_adjacent_nodes, process_terminating_node_adjacent_nodes,
};
pub use local::{
  common_edge, process_corner_adjacent_nodes, process_edge_adjacent_nodes, process_face_adjacent_nodes,
  process_node_corners, process_node_edges, process_node_faces, process_node_nodes,
};
pub use overlap::{node_reach, overlaps, subtree_reach};
pub use point::process_point_adjacent_nodes;

/// Callback for node pairs.
pub trait NodeAdjacency {
  fn visit(&mut self, first: NodeId, second: NodeId);
}

impl<F: FnMut(NodeId, NodeId)> NodeAdjacency for F {
  #[inline]
  fn visit(&mut self, first: NodeId, second: NodeId) {
    self(first, second)
  }
}

/// Callback for node pairs that decides whether the walk continues below
/// the pair. Returning `false` stops descent under both nodes of this pair.
pub trait TerminatingNodeAdjacency {
  fn visit(&mut self, first: NodeId, second: NodeId) -> bool;
}

impl<F: FnMut(NodeId, NodeId) -> bool> TerminatingNodeAdjacency for F {
  #[inline]
  fn visit(&mut self, first: NodeId, second: NodeId) -> bool {
    self(first, second)
  }
}

/// Callback for nodes near a point.
pub trait PointAdjacency {
  fn visit(&mut self, node: NodeId);
}

impl<F: FnMut(NodeId)> PointAdjacency for F {
  #[inline]
  fn visit(&mut self, node: NodeId) {
    self(node)
  }
}

/// Visitor that only counts what it is handed.
///
/// ```
/// use voxel_octree::adjacency::AdjacencyCounter;
/// use voxel_octree::{process_node_adjacent_nodes, Octree, Probe};
///
/// let mut tree = Octree::<()>::new();
/// let root = tree.root();
/// tree.init_children(root).unwrap();
///
/// let mut counter = AdjacencyCounter::default();
/// process_node_adjacent_nodes(Probe::root(&tree, 1.5), Probe::root(&tree, 1.5), false, counter.pairs());
/// assert_eq!(counter.count, 56);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AdjacencyCounter {
  pub count: usize,
}

impl AdjacencyCounter {
  /// Pair visitor adding one per call.
  pub fn pairs(&mut self) -> impl FnMut(NodeId, NodeId) + '_ {
    move |_, _| self.count += 1
  }

  /// Point visitor adding one per call.
  pub fn nodes(&mut self) -> impl FnMut(NodeId) + '_ {
    move |_| self.count += 1
  }
}

/// One side of an adjacency walk.
pub struct Probe<'a, T, A: NodeAllocator = BlockAllocator> {
  pub tree: &'a Octree<T, A>,
  pub node: NodeId,
  /// Width multiplier of each node's cube; `1.0` is the node's own cell.
  pub radius: f64,
}

impl<'a, T, A: NodeAllocator> Probe<'a, T, A> {
  pub fn new(tree: &'a Octree<T, A>, node: NodeId, radius: f64) -> Self {
    Self { tree, node, radius }
  }

  /// Probe starting at the tree's root.
  pub fn root(tree: &'a Octree<T, A>, radius: f64) -> Self {
    Self::new(tree, tree.root(), radius)
  }

  /// Whether both probes address the same node of the same tree.
  fn same_node<U, B: NodeAllocator>(&self, node: NodeId, other: &Probe<'_, U, B>, other_node: NodeId) -> bool {
    node == other_node && std::ptr::eq(self.tree as *const _ as *const u8, other.tree as *const _ as *const u8)
  }
}

impl<T, A: NodeAllocator> Clone for Probe<'_, T, A> {
  fn clone(&self) -> Self {
    *self
  }
}

impl<T, A: NodeAllocator> Copy for Probe<'_, T, A> {}

impl<T, A: NodeAllocator> std::fmt::Debug for Probe<'_, T, A> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Probe")
      .field("node", &self.node)
      .field("radius", &self.radius)
      .finish_non_exhaustive()
  }
}

/// Counters from one walk.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AdjacencyStats {
  /// Pairs (or nodes, for point walks) checked against the subtree bound.
  pub tested: usize,
  /// Checks that failed the bound and cut a subtree.
  pub pruned: usize,
  /// Visitor calls.
  pub visited: usize,
}

impl AddAssign for AdjacencyStats {
  fn add_assign(&mut self, rhs: Self) {
    self.tested += rhs.tested;
    self.pruned += rhs.pruned;
    self.visited += rhs.visited;
  }
}
