//! Octree - arena-backed adaptive octree over the unit cube.
//!
//! The root occupies arena slot 0 and belongs to the tree itself. Every other
//! node is created as part of an eight-child block obtained from the
//! [`NodeAllocator`]; releasing a node's children returns the whole block (and
//! every block below it) at once.

use std::cmp::Ordering;
use std::ops::{Index, IndexMut};

use glam::DVec3;

use super::allocator::{BlockAllocator, NodeAllocator};
use super::config::OctreeConfig;
use super::node::{Node, NodeId};
use crate::coord::{corner_index, Coord, MAX_DEPTH};
use crate::error::OctreeError;

/// Adaptive octree generic over its payload `T` and slot allocator `A`.
#[derive(Clone, Debug)]
pub struct Octree<T, A: NodeAllocator = BlockAllocator> {
  nodes: Vec<Node<T>>,
  allocator: A,
  root: NodeId,
  max_depth: u8,
}

impl<T: Default> Octree<T> {
  /// Single-node tree with the default configuration.
  pub fn new() -> Self {
    let config = OctreeConfig::DEFAULT;
    Self::from_parts(T::default(), config.allocator(), config.max_depth)
  }

  /// Single-node tree built from `config`.
  pub fn with_config(config: OctreeConfig) -> Result<Self, OctreeError> {
    config.validate()?;
    Ok(Self::from_parts(
      T::default(),
      config.allocator(),
      config.max_depth,
    ))
  }
}

impl<T: Default> Default for Octree<T> {
  fn default() -> Self {
    Self::new()
  }
}

impl<T, A: NodeAllocator> Octree<T, A> {
  /// Single-node tree using a caller-supplied allocator.
  pub fn with_allocator(root_data: T, allocator: A, max_depth: u8) -> Result<Self, OctreeError> {
    if max_depth > MAX_DEPTH {
      return Err(OctreeError::DepthExceeded {
        depth: max_depth as u32,
        limit: MAX_DEPTH,
      });
    }
    Ok(Self::from_parts(root_data, allocator, max_depth))
  }

  fn from_parts(root_data: T, allocator: A, max_depth: u8) -> Self {
    Self {
      nodes: vec![Node::new(None, Coord::ROOT, root_data)],
      allocator,
      root: NodeId(0),
      max_depth,
    }
  }

  /// Handle of the root node.
  #[inline]
  pub fn root(&self) -> NodeId {
    self.root
  }

  /// Deepest level this tree may create nodes at.
  #[inline]
  pub fn depth_limit(&self) -> u8 {
    self.max_depth
  }

  /// The slot allocator.
  pub fn allocator(&self) -> &A {
    &self.allocator
  }

  /// Node behind a handle.
  #[inline]
  pub fn node(&self, id: NodeId) -> &Node<T> {
    &self.nodes[id.index()]
  }

  /// Mutable node behind a handle.
  #[inline]
  pub fn node_mut(&mut self, id: NodeId) -> &mut Node<T> {
    &mut self.nodes[id.index()]
  }

  /// Payload of a node.
  #[inline]
  pub fn data(&self, id: NodeId) -> &T {
    &self.nodes[id.index()].data
  }

  /// Mutable payload of a node.
  #[inline]
  pub fn data_mut(&mut self, id: NodeId) -> &mut T {
    &mut self.nodes[id.index()].data
  }

  #[inline]
  pub fn parent(&self, id: NodeId) -> Option<NodeId> {
    self.nodes[id.index()].parent
  }

  #[inline]
  pub fn child(&self, id: NodeId, corner: u8) -> Option<NodeId> {
    self.nodes[id.index()].child(corner)
  }

  #[inline]
  pub fn children(&self, id: NodeId) -> Option<[NodeId; 8]> {
    self.nodes[id.index()].children()
  }

  #[inline]
  pub(crate) fn first_child(&self, id: NodeId) -> Option<NodeId> {
    self.nodes[id.index()].children
  }

  #[inline]
  pub fn is_leaf(&self, id: NodeId) -> bool {
    self.nodes[id.index()].is_leaf()
  }

  #[inline]
  pub fn depth(&self, id: NodeId) -> u8 {
    self.nodes[id.index()].depth
  }

  #[inline]
  pub fn depth_and_offset(&self, id: NodeId) -> (u8, [u32; 3]) {
    self.nodes[id.index()].depth_and_offset()
  }

  #[inline]
  pub fn coord(&self, id: NodeId) -> Coord {
    self.nodes[id.index()].coord()
  }

  #[inline]
  pub fn center_and_width(&self, id: NodeId) -> (DVec3, f64) {
    self.nodes[id.index()].center_and_width()
  }

  /// Top of the parent chain starting at `id`.
  pub fn root_of(&self, id: NodeId) -> NodeId {
    let mut current = id;
    while let Some(parent) = self.nodes[current.index()].parent {
      current = parent;
    }
    current
  }

  /// Number of leaves in the subtree (1 if `id` is itself a leaf).
  pub fn leaves(&self, id: NodeId) -> usize {
    match self.children(id) {
      None => 1,
      Some(children) => children.iter().map(|&c| self.leaves(c)).sum(),
    }
  }

  /// Leaves of the subtree, ignoring nodes deeper than `max_depth`.
  ///
  /// A node at exactly `max_depth` counts as a leaf even if it has children.
  pub fn max_depth_leaves(&self, id: NodeId, max_depth: u8) -> usize {
    let node = &self.nodes[id.index()];
    if node.depth > max_depth {
      return 0;
    }
    match node.children() {
      Some(children) if node.depth < max_depth => children
        .iter()
        .map(|&c| self.max_depth_leaves(c, max_depth))
        .sum(),
      _ => 1,
    }
  }

  /// Number of nodes in the subtree, including `id`.
  pub fn nodes(&self, id: NodeId) -> usize {
    match self.children(id) {
      None => 1,
      Some(children) => 1 + children.iter().map(|&c| self.nodes(c)).sum::<usize>(),
    }
  }

  /// Levels below `id` (0 for a leaf).
  pub fn max_depth(&self, id: NodeId) -> u8 {
    match self.children(id) {
      None => 0,
      Some(children) => 1 + children.iter().map(|&c| self.max_depth(c)).max().unwrap_or(0),
    }
  }

  /// Descend from `id` to the leaf whose cube contains `point`.
  ///
  /// Returns `None` only when `point` lies outside the closed cube of `id`.
  pub fn get_nearest_leaf(&self, id: NodeId, point: DVec3) -> Option<NodeId> {
    if !point.is_finite() {
      return None;
    }
    let (center, width) = self.center_and_width(id);
    if (point - center).abs().max_element() > width * 0.5 {
      return None;
    }
    let mut current = id;
    while let Some(first) = self.first_child(current) {
      let (center, _) = self.center_and_width(current);
      current = first.offset_by(corner_index(center, point));
    }
    Some(current)
  }

  /// Orders nodes by ascending depth, for `sort_by` on node lists.
  pub fn cmp_depth_forward(&self, a: NodeId, b: NodeId) -> Ordering {
    self.depth(a).cmp(&self.depth(b))
  }

  /// Orders nodes by descending depth, deepest first.
  pub fn cmp_depth_backward(&self, a: NodeId, b: NodeId) -> Ordering {
    self.depth(b).cmp(&self.depth(a))
  }

  /// Destroy every descendant of `id`, returning their blocks to the
  /// allocator. Handles into the released subtree become invalid.
  pub fn release_children(&mut self, id: NodeId) {
    let Some(first) = self.nodes[id.index()].children.take() else {
      return;
    };
    let mut blocks = vec![first];
    while let Some(block) = blocks.pop() {
      for corner in 0..8u8 {
        let slot = block.offset_by(corner).index();
        if let Some(grand) = self.nodes[slot].children.take() {
          blocks.push(grand);
        }
        self.nodes[slot].parent = None;
      }
      self.allocator.release(block.0 - 1, 8);
    }
  }

  /// Structural copy with every payload passed through `f`.
  ///
  /// Node handles are preserved, so handles and neighbor keys taken on this
  /// tree remain meaningful on the copy.
  pub fn map<U, F>(&self, mut f: F) -> Octree<U, A>
  where
    A: Clone,
    F: FnMut(&T) -> U,
  {
    Octree {
      nodes: self
        .nodes
        .iter()
        .map(|n| Node {
          parent: n.parent,
          children: n.children,
          depth: n.depth,
          offset: n.offset,
          data: f(&n.data),
        })
        .collect(),
      allocator: self.allocator.clone(),
      root: self.root,
      max_depth: self.max_depth,
    }
  }

  /// Structural copy converting every payload with `U: From<T>`.
  pub fn convert<U>(&self) -> Octree<U, A>
  where
    A: Clone,
    T: Clone,
    U: From<T>,
  {
    self.map(|data| U::from(data.clone()))
  }
}

impl<T: Default, A: NodeAllocator> Octree<T, A> {
  /// Subdivide `id` into eight children with default payloads.
  ///
  /// A no-op when the children already exist. Fails without touching the tree
  /// when `id` sits at the depth limit or the allocator is exhausted.
  pub fn init_children(&mut self, id: NodeId) -> Result<(), OctreeError> {
    self.ensure_children(id).map(|_| ())
  }

  /// First child of `id`, subdividing it first if it is a leaf.
  pub(crate) fn ensure_children(&mut self, id: NodeId) -> Result<NodeId, OctreeError> {
    let node = &self.nodes[id.index()];
    if let Some(first) = node.children {
      return Ok(first);
    }
    if node.depth >= self.max_depth {
      return Err(OctreeError::DepthExceeded {
        depth: node.depth as u32 + 1,
        limit: self.max_depth,
      });
    }
    let coord = node.coord();

    let Some(first) = self.allocator.allocate(8).and_then(|s| s.checked_add(1)) else {
      #[cfg(feature = "tracing")]
      tracing::warn!(depth = coord.depth, "node allocator exhausted");
      return Err(OctreeError::AllocationFailed { requested: 8 });
    };
    let first = NodeId(first);
    self.place_block(first, id, coord);
    self.nodes[id.index()].children = Some(first);
    Ok(first)
  }

  fn place_block(&mut self, first: NodeId, parent: NodeId, coord: Coord) {
    let start = first.index();
    let end = start + 8;
    if end > self.nodes.len() {
      let growth = (end - self.nodes.len()).max(self.allocator.block_size() * 8);
      self.nodes.reserve(growth);
      // Custom allocators may skip ahead of the arena.
      while self.nodes.len() < start {
        self.nodes.push(Node::new(None, Coord::ROOT, T::default()));
      }
    }
    for corner in 0..8u8 {
      let node = Node::new(Some(parent), coord.child(corner), T::default());
      let slot = start + corner as usize;
      if slot < self.nodes.len() {
        self.nodes[slot] = node;
      } else {
        self.nodes.push(node);
      }
    }
  }

  /// Subdivide every node of the subtree until all leaves sit at the
  /// absolute depth `max_depth`.
  ///
  /// Each subdivision is atomic; on failure the nodes created so far remain.
  #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "octree::set_full_depth"))]
  pub fn set_full_depth(&mut self, id: NodeId, max_depth: u8) -> Result<(), OctreeError> {
    if max_depth > self.max_depth {
      return Err(OctreeError::DepthExceeded {
        depth: max_depth as u32,
        limit: self.max_depth,
      });
    }
    self.fill_to(id, max_depth)
  }

  fn fill_to(&mut self, id: NodeId, max_depth: u8) -> Result<(), OctreeError> {
    if self.nodes[id.index()].depth >= max_depth {
      return Ok(());
    }
    let first = self.ensure_children(id)?;
    for corner in 0..8u8 {
      self.fill_to(first.offset_by(corner), max_depth)?;
    }
    Ok(())
  }
}

impl<T, A: NodeAllocator> Index<NodeId> for Octree<T, A> {
  type Output = Node<T>;

  fn index(&self, id: NodeId) -> &Node<T> {
    &self.nodes[id.index()]
  }
}

impl<T, A: NodeAllocator> IndexMut<NodeId> for Octree<T, A> {
  fn index_mut(&mut self, id: NodeId) -> &mut Node<T> {
    &mut self.nodes[id.index()]
  }
}

#[cfg(test)]
#[path = "tree_test.rs"]
mod tree_test;
