use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::*;
use crate::coord::Coord;

fn random_tree(seed: u64, max_depth: u8) -> Octree<()> {
  let mut rng = StdRng::seed_from_u64(seed);
  let mut tree = Octree::<()>::new();
  let mut frontier = vec![tree.root()];
  while let Some(id) = frontier.pop() {
    if tree.depth(id) < max_depth && (tree.depth(id) == 0 || rng.random_bool(0.5)) {
      tree.init_children(id).expect("subdivide");
      frontier.extend(tree.children(id).expect("children"));
    }
  }
  tree
}

fn assert_matches_resolver<T>(tree: &Octree<T>, id: NodeId, grid: &Neighbors) {
  for dx in -1i8..=1 {
    for dy in -1i8..=1 {
      for dz in -1i8..=1 {
        assert_eq!(
          grid.get(dx, dy, dz),
          tree.neighbor(id, [dx, dy, dz]),
          "{:?} offset {:?}",
          tree.coord(id),
          [dx, dy, dz]
        );
      }
    }
  }
}

// =========================================================================
// Batch 1: Neighbors grid
// =========================================================================

#[test]
fn test_grid_accessors() {
  let mut grid = Neighbors::default();
  assert_eq!(grid.center(), None);
  grid.nodes[1][1][1] = Some(NodeId(0));
  grid.nodes[2][0][1] = Some(NodeId(9));
  assert_eq!(grid.center(), Some(NodeId(0)));
  assert_eq!(grid.get(1, -1, 0), Some(NodeId(9)));

  let present: Vec<_> = grid.iter().collect();
  assert_eq!(present, vec![([0, 0, 0], NodeId(0)), ([1, -1, 0], NodeId(9))]);

  grid.clear();
  assert_eq!(grid, Neighbors::default());
}

#[test]
fn test_key_sizing() {
  let mut key = NeighborKey::default();
  assert_eq!(key.depth(), None);
  key.set(4);
  assert_eq!(key.depth(), Some(4));
  assert!(key.neighbors(4).is_some());
  assert!(key.neighbors(5).is_none());
}

// =========================================================================
// Batch 2: Read-only resolution
// =========================================================================

#[test]
fn test_get_neighbors_matches_resolver_on_full_tree() {
  let mut tree = Octree::<()>::new();
  let root = tree.root();
  tree.set_full_depth(root, 3).expect("full depth");
  let mut key = NeighborKey::new(3);
  for id in tree.iter_nodes(root) {
    let grid = *key.get_neighbors(&tree, id);
    assert_eq!(grid.center(), Some(id));
    assert_matches_resolver(&tree, id, &grid);
  }
}

#[test]
fn test_get_neighbors_matches_resolver_on_adaptive_tree() {
  for seed in 0..3 {
    let tree = random_tree(seed, 4);
    let mut key = NeighborKey::new(0);
    for id in tree.iter_nodes(tree.root()) {
      let grid = *key.get_neighbors(&tree, id);
      assert_matches_resolver(&tree, id, &grid);
    }
  }
}

/// Jumping between unrelated branches re-validates the ancestor levels.
#[test]
fn test_get_neighbors_out_of_order() {
  let tree = random_tree(11, 4);
  let mut nodes: Vec<_> = tree.iter_nodes(tree.root()).collect();
  nodes.reverse();
  let mut key = NeighborKey::new(2);
  for id in nodes {
    let grid = *key.get_neighbors(&tree, id);
    assert_matches_resolver(&tree, id, &grid);
  }
  assert!(key.depth() >= Some(2));
}

#[test]
fn test_get_neighbors_does_not_create() {
  let mut tree = Octree::<()>::new();
  let root = tree.root();
  tree.init_children(root).expect("root");
  let child = tree.child(root, 0).expect("child");
  tree.init_children(child).expect("child");
  let fine = tree.child(child, 7).expect("fine");

  let before = tree.nodes(root);
  let mut key = NeighborKey::new(2);
  let grid = *key.get_neighbors(&tree, fine);
  assert_eq!(tree.nodes(root), before);
  // Siblings exist, cousins across the parent's faces do not.
  assert_eq!(grid.get(-1, 0, 0), tree.child(child, 6));
  assert_eq!(grid.get(1, 0, 0), None);
}

// =========================================================================
// Batch 3: Forced resolution
// =========================================================================

#[test]
fn test_set_neighbors_fills_interior_grid() {
  let mut tree = Octree::<()>::new();
  let root = tree.root();
  tree.init_children(root).expect("root");
  let child = tree.child(root, 0).expect("child");
  tree.init_children(child).expect("child");
  let fine = tree.child(child, 7).expect("fine");

  let mut key = NeighborKey::new(2);
  let grid = *key.set_neighbors(&mut tree, fine).expect("allocation succeeds");
  // (1,1,1) at depth 2 is interior, so every neighbor exists.
  assert_eq!(grid.iter().count(), 27);
  for ([dx, dy, dz], id) in grid.iter() {
    assert_eq!(tree.coord(id), Coord::new(2, [(1 + dx) as u32, (1 + dy) as u32, (1 + dz) as u32]));
  }
  assert_matches_resolver(&tree, fine, &grid);
}

#[test]
fn test_set_neighbors_on_boundary_leaves_outside_empty() {
  let mut tree = Octree::<()>::new();
  let root = tree.root();
  tree.init_children(root).expect("root");
  let corner = tree.child(root, 0).expect("child");

  let mut key = NeighborKey::new(1);
  let grid = *key.set_neighbors(&mut tree, corner).expect("allocation succeeds");
  // Only the +++ octant of offsets lies inside the root.
  assert_eq!(grid.iter().count(), 8);
  assert!(grid.iter().all(|(d, _)| d.iter().all(|&c| c >= 0)));
}

/// A read-only resolution of the same node does not satisfy a later forced one.
#[test]
fn test_set_after_get_upgrades_cache() {
  let mut tree = Octree::<()>::new();
  let root = tree.root();
  tree.init_children(root).expect("root");
  let child = tree.child(root, 0).expect("child");
  tree.init_children(child).expect("child");
  let fine = tree.child(child, 7).expect("fine");

  let mut key = NeighborKey::new(2);
  assert!(key.get_neighbors(&tree, fine).iter().count() < 27);
  assert_eq!(key.set_neighbors(&mut tree, fine).expect("allocation").iter().count(), 27);
  // Cached forced grid answers the read-only query too.
  assert_eq!(key.get_neighbors(&tree, fine).iter().count(), 27);
}

#[test]
fn test_set_neighbors_reports_allocation_failure() {
  let config = crate::octree::OctreeConfig::COMPACT.with_node_limit(16);
  let mut tree = Octree::<()>::with_config(config).expect("valid config");
  let root = tree.root();
  tree.init_children(root).expect("root");
  let child = tree.child(root, 0).expect("child");
  tree.init_children(child).expect("child");
  let fine = tree.child(child, 7).expect("fine");

  let mut key = NeighborKey::new(2);
  let err = key.set_neighbors(&mut tree, fine).expect_err("limit reached");
  assert!(matches!(err, OctreeError::AllocationFailed { .. }));
}
