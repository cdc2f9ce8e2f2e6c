//! Per-node enumeration of the descendants touching one face, edge or corner.
//!
//! These walks use only child indices: a descendant touches face `f` when
//! every step down picks one of the four children on that face. Mesh
//! extraction uses them to stitch a node to the finer nodes across its
//! boundary.
//!
//! Every helper pairs each enumerated node with a fixed `other` node and
//! returns the number of visitor calls.

use super::NodeAdjacency;
use crate::coord::Coord;
use crate::cube::{
  edge_corners, face_corners, factor_edge, opposite_corner, opposite_edge, opposite_face, other_axes,
};
use crate::octree::{NodeAllocator, NodeId, Octree};

fn walk<T, A, V>(
  tree: &Octree<T, A>,
  node: NodeId,
  other: NodeId,
  corners: &[u8],
  process_current: bool,
  visitor: &mut V,
) -> usize
where
  A: NodeAllocator,
  V: NodeAdjacency,
{
  let mut visited = 0;
  if process_current {
    visitor.visit(node, other);
    visited += 1;
  }
  let mut stack = vec![node];
  while let Some(id) = stack.pop() {
    let Some(children) = tree.children(id) else {
      continue;
    };
    for &corner in corners {
      let child = children[corner as usize];
      visitor.visit(child, other);
      visited += 1;
      stack.push(child);
    }
  }
  visited
}

/// Visit `node` and its descendants touching face `face`, each with `other`.
pub fn process_node_faces<T, A, V>(
  tree: &Octree<T, A>,
  node: NodeId,
  other: NodeId,
  face: usize,
  process_current: bool,
  mut visitor: V,
) -> usize
where
  A: NodeAllocator,
  V: NodeAdjacency,
{
  walk(tree, node, other, &face_corners(face), process_current, &mut visitor)
}

/// Visit `node` and its descendants touching edge `edge`, each with `other`.
pub fn process_node_edges<T, A, V>(
  tree: &Octree<T, A>,
  node: NodeId,
  other: NodeId,
  edge: usize,
  process_current: bool,
  mut visitor: V,
) -> usize
where
  A: NodeAllocator,
  V: NodeAdjacency,
{
  walk(tree, node, other, &edge_corners(edge), process_current, &mut visitor)
}

/// Visit `node` and its descendants touching corner `corner`, each with
/// `other`.
pub fn process_node_corners<T, A, V>(
  tree: &Octree<T, A>,
  node: NodeId,
  other: NodeId,
  corner: usize,
  process_current: bool,
  mut visitor: V,
) -> usize
where
  A: NodeAllocator,
  V: NodeAdjacency,
{
  walk(tree, node, other, &[corner as u8], process_current, &mut visitor)
}

/// Visit `node` and all its descendants, each with `other`.
pub fn process_node_nodes<T, A, V>(
  tree: &Octree<T, A>,
  node: NodeId,
  other: NodeId,
  process_current: bool,
  mut visitor: V,
) -> usize
where
  A: NodeAllocator,
  V: NodeAdjacency,
{
  walk(tree, node, other, &[0, 1, 2, 3, 4, 5, 6, 7], process_current, &mut visitor)
}

/// Visit the same-depth neighbor across face `face` and its descendants on
/// the shared face, each paired with `node`.
///
/// Returns 0 when there is no neighbor at the node's depth.
pub fn process_face_adjacent_nodes<T, A, V>(tree: &Octree<T, A>, node: NodeId, face: usize, visitor: V) -> usize
where
  A: NodeAllocator,
  V: NodeAdjacency,
{
  match tree.face_neighbor(node, face) {
    Some(across) => process_node_faces(tree, across, node, opposite_face(face), true, visitor),
    None => 0,
  }
}

/// Edge counterpart of [`process_face_adjacent_nodes`].
pub fn process_edge_adjacent_nodes<T, A, V>(tree: &Octree<T, A>, node: NodeId, edge: usize, visitor: V) -> usize
where
  A: NodeAllocator,
  V: NodeAdjacency,
{
  match tree.edge_neighbor(node, edge) {
    Some(across) => process_node_edges(tree, across, node, opposite_edge(edge), true, visitor),
    None => 0,
  }
}

/// Corner counterpart of [`process_face_adjacent_nodes`].
pub fn process_corner_adjacent_nodes<T, A, V>(
  tree: &Octree<T, A>,
  node: NodeId,
  corner: usize,
  visitor: V,
) -> usize
where
  A: NodeAllocator,
  V: NodeAdjacency,
{
  match tree.corner_neighbor(node, corner) {
    Some(across) => process_node_corners(tree, across, node, opposite_corner(corner), true, visitor),
    None => 0,
  }
}

/// Whether edge `edge_a` of cell `a` and edge `edge_b` of cell `b` lie on the
/// same axis-aligned line. The cells may sit at different depths; the extent
/// along the edge is not compared.
pub fn common_edge(a: Coord, edge_a: usize, b: Coord, edge_b: usize) -> bool {
  let (axis_a, ia, ja) = factor_edge(edge_a);
  let (axis_b, ib, jb) = factor_edge(edge_b);
  if axis_a != axis_b {
    return false;
  }
  let depth = a.depth.max(b.depth);
  // Grid line index of each edge at the finer depth.
  let line = |coord: Coord, axis: usize, side: usize| -> u64 {
    (coord.offset[axis] as u64 + side as u64) << (depth - coord.depth)
  };
  let [u, v] = other_axes(axis_a);
  line(a, u, ia) == line(b, u, ib) && line(a, v, ja) == line(b, v, jb)
}
