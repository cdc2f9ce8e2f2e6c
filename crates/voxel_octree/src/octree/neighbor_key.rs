//! NeighborKey - per-depth cache of 3×3×3 neighbor grids.
//!
//! Resolving a node's neighbors from scratch climbs toward the root once per
//! direction. A key instead keeps the grid of every ancestor on the most
//! recently resolved path: a node's 27 neighbors are exactly the children of
//! its parent's 27 neighbors that sit next to it, so each step down the tree
//! costs one pass over the parent's grid.
//!
//! ```text
//!  parent grid (depth d-1)        fine cells (depth d) around node n
//!  ┌─────┬─────┬─────┐           fine index f in -1..=2 per axis
//!  │     │     │     │           parent cell  = floor(f / 2) + 1
//!  ├─────┼─────┼─────┤           child corner = f mod 2
//!  │     │ P n │     │
//!  ├─────┼─────┼─────┤
//!  │     │     │     │
//!  └─────┴─────┴─────┘
//! ```
//!
//! # Contract
//!
//! The cache is only valid for the root-to-node path last resolved. Resolving
//! a node re-validates its ancestors by handle, so walking a tree top-down in
//! any order is correct; mutating the tree afterwards (other than through
//! [`NeighborKey::set_neighbors`] on this key) leaves stale entries that are
//! not detected. Call [`NeighborKey::set`] to start over.

use std::convert::Infallible;

use super::allocator::NodeAllocator;
use super::node::NodeId;
use super::tree::Octree;
use crate::coord::{corner_from_bits, corner_offset};
use crate::error::OctreeError;

/// Neighbor handles around one node; index `[x][y][z]`, where 0/1/2 map to a
/// -1/0/+1 cell offset and `[1][1][1]` is the node itself.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Neighbors {
  pub nodes: [[[Option<NodeId>; 3]; 3]; 3],
}

impl Neighbors {
  /// Reset every entry to `None`.
  pub fn clear(&mut self) {
    *self = Self::default();
  }

  /// The node the grid is centered on.
  #[inline]
  pub fn center(&self) -> Option<NodeId> {
    self.nodes[1][1][1]
  }

  /// Neighbor at cell offset `(dx, dy, dz)`, each in `-1..=1`.
  #[inline]
  pub fn get(&self, dx: i8, dy: i8, dz: i8) -> Option<NodeId> {
    debug_assert!(
      [dx, dy, dz].iter().all(|d| (-1..=1).contains(d)),
      "neighbor offset must be in -1..=1"
    );
    self.nodes[(dx + 1) as usize][(dy + 1) as usize][(dz + 1) as usize]
  }

  /// Present entries with their cell offsets.
  pub fn iter(&self) -> impl Iterator<Item = ([i8; 3], NodeId)> + '_ {
    (0..27usize).filter_map(move |n| {
      let (i, j, k) = (n / 9, (n / 3) % 3, n % 3);
      self.nodes[i][j][k].map(|id| ([i as i8 - 1, j as i8 - 1, k as i8 - 1], id))
    })
  }
}

#[derive(Clone, Copy, Debug, Default)]
struct Level {
  neighbors: Neighbors,
  /// Resolved with creation, so no entry inside the root cube is missing.
  forced: bool,
}

/// Per-depth neighbor cache owned by one traversal.
///
/// Keys are cheap, caller-owned state: concurrent read-only traversals each
/// need their own.
#[derive(Clone, Debug, Default)]
pub struct NeighborKey {
  levels: Vec<Level>,
}

impl NeighborKey {
  /// Key with cleared levels for depths `0..=depth`.
  pub fn new(depth: u8) -> Self {
    let mut key = Self::default();
    key.set(depth);
    key
  }

  /// Clear the key and size it for depths `0..=depth`.
  pub fn set(&mut self, depth: u8) {
    self.levels.clear();
    self.levels.resize(depth as usize + 1, Level::default());
  }

  /// Deepest level the key currently holds.
  pub fn depth(&self) -> Option<u8> {
    self.levels.len().checked_sub(1).map(|d| d as u8)
  }

  /// Cached grid at `depth`, as left by the last resolution.
  pub fn neighbors(&self, depth: u8) -> Option<&Neighbors> {
    self.levels.get(depth as usize).map(|l| &l.neighbors)
  }

  /// Resolve all 27 neighbors of `id`, creating any missing node inside the
  /// root cube.
  pub fn set_neighbors<T: Default, A: NodeAllocator>(
    &mut self,
    tree: &mut Octree<T, A>,
    id: NodeId,
  ) -> Result<&Neighbors, OctreeError> {
    let depth = self.resolve(&mut Forcing(tree), id)?;
    Ok(&self.levels[depth].neighbors)
  }

  /// Resolve the neighbors of `id` that exist; missing ones stay `None`.
  pub fn get_neighbors<T, A: NodeAllocator>(&mut self, tree: &Octree<T, A>, id: NodeId) -> &Neighbors {
    let depth = match self.resolve(&mut ReadOnly(tree), id) {
      Ok(depth) => depth,
      Err(never) => match never {},
    };
    &self.levels[depth].neighbors
  }

  fn resolve<E: Expand>(&mut self, tree: &mut E, id: NodeId) -> Result<usize, E::Error> {
    let depth = tree.depth(id) as usize;
    if self.levels.len() <= depth {
      self.levels.resize(depth + 1, Level::default());
    }
    let level = &self.levels[depth];
    if level.neighbors.center() == Some(id) && (level.forced || !E::FORCED) {
      return Ok(depth);
    }

    let mut grid = Neighbors::default();
    match tree.parent(id) {
      None => grid.nodes[1][1][1] = Some(id),
      Some(parent) => {
        let parent_depth = self.resolve(tree, parent)?;
        let parent_grid = self.levels[parent_depth].neighbors;
        let bits = corner_offset(tree.corner(id));
        for i in 0..3 {
          for j in 0..3 {
            for k in 0..3 {
              let fine = [
                bits[0] as i32 + i as i32 - 1,
                bits[1] as i32 + j as i32 - 1,
                bits[2] as i32 + k as i32 - 1,
              ];
              let [px, py, pz] = fine.map(|f| (f.div_euclid(2) + 1) as usize);
              let Some(across) = parent_grid.nodes[px][py][pz] else {
                continue;
              };
              if let Some(first) = tree.children_of(across)? {
                let [cx, cy, cz] = fine.map(|f| f.rem_euclid(2) as u32);
                grid.nodes[i][j][k] = Some(first.offset_by(corner_from_bits(cx, cy, cz)));
              }
            }
          }
        }
      }
    }

    self.levels[depth] = Level {
      neighbors: grid,
      forced: E::FORCED,
    };
    Ok(depth)
  }
}

/// Tree access used while filling a grid: read-only or creating.
trait Expand {
  type Error;
  const FORCED: bool;

  fn depth(&self, id: NodeId) -> u8;
  fn parent(&self, id: NodeId) -> Option<NodeId>;
  fn corner(&self, id: NodeId) -> u8;
  fn children_of(&mut self, id: NodeId) -> Result<Option<NodeId>, Self::Error>;
}

struct ReadOnly<'a, T, A: NodeAllocator>(&'a Octree<T, A>);

struct Forcing<'a, T, A: NodeAllocator>(&'a mut Octree<T, A>);

impl<T, A: NodeAllocator> Expand for ReadOnly<'_, T, A> {
  type Error = Infallible;
  const FORCED: bool = false;

  fn depth(&self, id: NodeId) -> u8 {
    self.0.depth(id)
  }

  fn parent(&self, id: NodeId) -> Option<NodeId> {
    self.0.parent(id)
  }

  fn corner(&self, id: NodeId) -> u8 {
    self.0.node(id).corner()
  }

  fn children_of(&mut self, id: NodeId) -> Result<Option<NodeId>, Infallible> {
    Ok(self.0.first_child(id))
  }
}

impl<T: Default, A: NodeAllocator> Expand for Forcing<'_, T, A> {
  type Error = OctreeError;
  const FORCED: bool = true;

  fn depth(&self, id: NodeId) -> u8 {
    self.0.depth(id)
  }

  fn parent(&self, id: NodeId) -> Option<NodeId> {
    self.0.parent(id)
  }

  fn corner(&self, id: NodeId) -> u8 {
    self.0.node(id).corner()
  }

  fn children_of(&mut self, id: NodeId) -> Result<Option<NodeId>, OctreeError> {
    self.0.ensure_children(id).map(Some)
  }
}

#[cfg(test)]
#[path = "neighbor_key_test.rs"]
mod neighbor_key_test;
