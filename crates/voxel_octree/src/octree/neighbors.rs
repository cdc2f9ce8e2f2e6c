//! Same-depth neighbor resolution by ancestor climb and descent.
//!
//! A neighbor in direction `delta` (each axis in `{-1, 0, 1}`) is found by
//! flipping the node's corner bits on every moving axis. Axes where the flip
//! stays inside the parent resolve to a sibling; the axes that leave the parent
//! are handed to the parent as a smaller delta, and the result is mirrored
//! back down one level. Faces, edges and corners all go through that one walk.
//!
//! ```text
//!   depth d-1:  ┌───────┬───────┐
//!               │ P     │ P'    │   P' = neighbor(P, +X)
//!   depth d:    │ ┌─┬─┐ │ ┌─┬─┐ │
//!               │ │ │n│→│m│ │ │ │   n at corner x=1 exits P on +X,
//!               │ └─┴─┘ │ └─┴─┘ │   m = child of P' at corner x=0
//!               └───────┴───────┘
//! ```
//!
//! The read-only forms return `None` when no node exists at the same depth.
//! The `*_or_create` forms subdivide whatever is missing on the way down and
//! only return `None` when the neighbor lies outside the root cube.

use super::allocator::NodeAllocator;
use super::node::NodeId;
use super::tree::Octree;
use crate::cube::{corner_delta, edge_delta, face_delta};
use crate::error::OctreeError;

/// Split `delta` at a node sitting at `corner` of its parent.
///
/// Returns the sibling corner reached by flipping every moving axis and the
/// delta the parent must move by (zero when the target is a sibling).
#[inline]
pub(crate) fn climb(corner: u8, delta: [i8; 3]) -> (u8, [i8; 3]) {
  let mut flip = 0u8;
  let mut up = [0i8; 3];
  for axis in 0..3 {
    let d = delta[axis];
    if d == 0 {
      continue;
    }
    flip |= 1 << axis;
    let upper = (corner >> axis) & 1 == 1;
    // Moving up from the upper half (or down from the lower) leaves the parent.
    if (d > 0) == upper {
      up[axis] = d;
    }
  }
  (corner ^ flip, up)
}

impl<T, A: NodeAllocator> Octree<T, A> {
  /// Same-depth neighbor of `id` offset by `delta` cells.
  pub fn neighbor(&self, id: NodeId, delta: [i8; 3]) -> Option<NodeId> {
    debug_assert!(
      delta.iter().all(|d| (-1..=1).contains(d)),
      "neighbor delta must be in -1..=1"
    );
    if delta == [0; 3] {
      return Some(id);
    }
    let node = self.node(id);
    let parent = node.parent()?;
    let (target, up) = climb(node.corner(), delta);
    let base = if up == [0; 3] {
      parent
    } else {
      self.neighbor(parent, up)?
    };
    self.child(base, target)
  }

  /// Neighbor across face `face` (0-5).
  pub fn face_neighbor(&self, id: NodeId, face: usize) -> Option<NodeId> {
    self.neighbor(id, face_delta(face))
  }

  /// Neighbor across edge `edge` (0-11).
  pub fn edge_neighbor(&self, id: NodeId, edge: usize) -> Option<NodeId> {
    self.neighbor(id, edge_delta(edge))
  }

  /// Neighbor across corner `corner` (0-7).
  pub fn corner_neighbor(&self, id: NodeId, corner: usize) -> Option<NodeId> {
    self.neighbor(id, corner_delta(corner))
  }
}

impl<T: Default, A: NodeAllocator> Octree<T, A> {
  /// Same-depth neighbor of `id`, subdividing missing ancestors of the
  /// neighbor as needed.
  ///
  /// `Ok(None)` means the neighbor falls outside the root cube.
  pub fn neighbor_or_create(
    &mut self,
    id: NodeId,
    delta: [i8; 3],
  ) -> Result<Option<NodeId>, OctreeError> {
    if delta == [0; 3] {
      return Ok(Some(id));
    }
    let node = self.node(id);
    let Some(parent) = node.parent() else {
      return Ok(None);
    };
    let (target, up) = climb(node.corner(), delta);
    let base = if up == [0; 3] {
      parent
    } else {
      match self.neighbor_or_create(parent, up)? {
        Some(base) => base,
        None => return Ok(None),
      }
    };
    let first = self.ensure_children(base)?;
    Ok(Some(first.offset_by(target)))
  }

  /// Forced neighbor across face `face` (0-5).
  pub fn face_neighbor_or_create(
    &mut self,
    id: NodeId,
    face: usize,
  ) -> Result<Option<NodeId>, OctreeError> {
    self.neighbor_or_create(id, face_delta(face))
  }

  /// Forced neighbor across edge `edge` (0-11).
  pub fn edge_neighbor_or_create(
    &mut self,
    id: NodeId,
    edge: usize,
  ) -> Result<Option<NodeId>, OctreeError> {
    self.neighbor_or_create(id, edge_delta(edge))
  }

  /// Forced neighbor across corner `corner` (0-7).
  pub fn corner_neighbor_or_create(
    &mut self,
    id: NodeId,
    corner: usize,
  ) -> Result<Option<NodeId>, OctreeError> {
    self.neighbor_or_create(id, corner_delta(corner))
  }
}

#[cfg(test)]
#[path = "neighbors_test.rs"]
mod neighbors_test;
