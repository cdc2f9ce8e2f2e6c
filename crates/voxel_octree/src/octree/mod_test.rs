use super::*;
use crate::coord::Coord;
use crate::error::OctreeError;

/// Allocator that leaves a gap before every block it hands out.
#[derive(Debug, Default)]
struct SpacedAllocator {
  next: u32,
  released: usize,
}

impl NodeAllocator for SpacedAllocator {
  fn allocate(&mut self, count: usize) -> Option<u32> {
    let start = self.next + 3;
    self.next = start + count as u32;
    Some(start)
  }

  fn release(&mut self, _start: u32, count: usize) {
    self.released += count;
  }

  fn set_block_size(&mut self, _block_size: usize) {}

  fn block_size(&self) -> usize {
    1
  }
}

// =========================================================================
// Batch 1: Whole-tree properties
// =========================================================================

/// Leaves of any adaptive tree tile the unit cube.
#[test]
fn test_leaves_tile_unit_cube() {
  let mut tree = Octree::<()>::new();
  let root = tree.root();
  tree.init_children(root).expect("root");
  for corner in [1u8, 6] {
    let child = tree.child(root, corner).expect("child");
    tree.set_full_depth(child, 3).expect("refine");
  }
  let volume: f64 = tree
    .iter_leaves(root)
    .map(|id| tree.center_and_width(id).1.powi(3))
    .sum();
  assert!((volume - 1.0).abs() < 1e-12);
  assert_eq!(tree.leaves(root), 6 + 2 * 64);
}

/// Cached neighbors stay consistent with the resolver after forced creation.
#[test]
fn test_key_and_resolver_agree_after_forcing() {
  let mut tree = Octree::<u16>::new();
  let root = tree.root();
  tree.init_children(root).expect("root");
  let child = tree.child(root, 3).expect("child");
  tree.init_children(child).expect("child");
  let fine = tree.child(child, 4).expect("fine");

  let mut key = NeighborKey::new(2);
  let forced = *key.set_neighbors(&mut tree, fine).expect("allocation");
  let mut fresh = NeighborKey::new(2);
  let read = *fresh.get_neighbors(&tree, fine);
  assert_eq!(forced, read);
  for ([dx, dy, dz], id) in read.iter() {
    assert_eq!(tree.neighbor(fine, [dx, dy, dz]), Some(id));
  }
}

// =========================================================================
// Batch 2: Injected allocators
// =========================================================================

#[test]
fn test_custom_allocator_with_gaps() {
  let mut tree = Octree::with_allocator(0u8, SpacedAllocator::default(), 4).expect("valid depth");
  let root = tree.root();
  tree.set_full_depth(root, 2).expect("full depth");
  assert_eq!(tree.nodes(root), 1 + 8 + 64);

  for id in tree.iter_nodes(root) {
    if let Some(parent) = tree.parent(id) {
      let corner = tree.node(id).corner();
      assert_eq!(tree.child(parent, corner), Some(id));
      assert_eq!(tree.coord(id), tree.coord(parent).child(corner));
    }
  }

  let child = tree.child(root, 0).expect("child");
  tree.release_children(child);
  assert_eq!(tree.allocator().released, 8);
  assert!(tree.is_leaf(child));
}

#[test]
fn test_custom_allocator_respects_depth_limit() {
  let mut tree = Octree::with_allocator((), SpacedAllocator::default(), 1).expect("valid depth");
  let root = tree.root();
  tree.init_children(root).expect("root");
  let child = tree.child(root, 0).expect("child");
  let err = tree.init_children(child).expect_err("at limit");
  assert!(matches!(err, OctreeError::DepthExceeded { depth: 2, limit: 1 }));
  assert_eq!(tree.coord(child), Coord::new(1, [0, 0, 0]));
}
