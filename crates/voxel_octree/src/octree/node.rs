//! Node storage and handles.
//!
//! Nodes live in the tree's arena and are addressed by [`NodeId`]. A node owns
//! either zero children or one contiguous block of eight; the parent link is a
//! plain back-reference and never counts toward ownership.

use glam::DVec3;

use crate::coord::{corner_from_bits, Coord};

/// Handle to a node slot in an [`Octree`](super::Octree) arena.
///
/// Handles stay valid until the node's subtree is released. Children of one
/// node occupy eight consecutive slots in corner order, so sibling handles
/// differ by their corner index.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
  /// Raw arena slot.
  #[inline]
  pub fn index(self) -> usize {
    self.0 as usize
  }

  /// Handle of the `corner`-th slot of a block starting at `self`.
  #[inline]
  pub(crate) fn offset_by(self, corner: u8) -> Self {
    Self(self.0 + corner as u32)
  }
}

/// One occupied cell of the tree.
///
/// Depth and offset are stored directly so coordinate access is O(1).
#[derive(Clone, Debug)]
pub struct Node<T> {
  pub(crate) parent: Option<NodeId>,
  /// First slot of the eight-child block.
  pub(crate) children: Option<NodeId>,
  pub(crate) depth: u8,
  pub(crate) offset: [u32; 3],
  /// Opaque payload; the index never reads it.
  pub data: T,
}

impl<T> Node<T> {
  pub(crate) fn new(parent: Option<NodeId>, coord: Coord, data: T) -> Self {
    Self {
      parent,
      children: None,
      depth: coord.depth,
      offset: coord.offset,
      data,
    }
  }

  /// Subdivision level of the node.
  #[inline]
  pub fn depth(&self) -> u8 {
    self.depth
  }

  /// Per-axis cell offset at the node's depth.
  #[inline]
  pub fn offset(&self) -> [u32; 3] {
    self.offset
  }

  /// Depth and offset as a pair.
  #[inline]
  pub fn depth_and_offset(&self) -> (u8, [u32; 3]) {
    (self.depth, self.offset)
  }

  /// Coordinate of the node's cell.
  #[inline]
  pub fn coord(&self) -> Coord {
    Coord::new(self.depth, self.offset)
  }

  /// Packed coordinate index.
  #[inline]
  pub fn index(&self) -> u64 {
    self.coord().index()
  }

  /// Center and width of the node's cell.
  #[inline]
  pub fn center_and_width(&self) -> (DVec3, f64) {
    self.coord().center_and_width()
  }

  /// Parent handle, `None` for the root.
  #[inline]
  pub fn parent(&self) -> Option<NodeId> {
    self.parent
  }

  /// Whether the node has no children.
  #[inline]
  pub fn is_leaf(&self) -> bool {
    self.children.is_none()
  }

  /// Handle of the child at `corner` (0-7).
  #[inline]
  pub fn child(&self, corner: u8) -> Option<NodeId> {
    debug_assert!(corner < 8, "corner index out of range");
    self.children.map(|first| first.offset_by(corner))
  }

  /// Handles of all eight children in corner order.
  pub fn children(&self) -> Option<[NodeId; 8]> {
    self
      .children
      .map(|first| std::array::from_fn(|c| first.offset_by(c as u8)))
  }

  /// Corner this node occupies inside its parent (0 for the root).
  #[inline]
  pub fn corner(&self) -> u8 {
    corner_from_bits(self.offset[0], self.offset[1], self.offset[2])
  }
}

#[cfg(test)]
#[path = "node_test.rs"]
mod node_test;
