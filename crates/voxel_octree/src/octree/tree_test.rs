use super::*;

/// Root subdivided once, then child `corner` subdivided again.
fn two_level_tree(corner: u8) -> (Octree<u32>, NodeId) {
  let mut tree = Octree::<u32>::new();
  let root = tree.root();
  tree.init_children(root).expect("root subdivides");
  let child = tree.child(root, corner).expect("child exists");
  tree.init_children(child).expect("child subdivides");
  (tree, child)
}

// =========================================================================
// Batch 1: Construction and subdivision
// =========================================================================

#[test]
fn test_new_tree_is_single_root_leaf() {
  let tree = Octree::<()>::new();
  let root = tree.root();
  assert!(tree.is_leaf(root));
  assert_eq!(tree.depth(root), 0);
  assert_eq!(tree.parent(root), None);
  assert_eq!(tree.leaves(root), 1);
  assert_eq!(tree.nodes(root), 1);
  assert_eq!(tree.max_depth(root), 0);
}

/// Children carry derived coordinates and link back to the parent.
#[test]
fn test_init_children_derives_coordinates() {
  let (tree, child) = two_level_tree(5);
  let parent_coord = tree.coord(child);
  assert_eq!(parent_coord, Coord::new(1, [1, 0, 1]));

  for corner in 0..8u8 {
    let grandchild = tree.child(child, corner).expect("grandchild");
    assert_eq!(tree.parent(grandchild), Some(child));
    assert_eq!(tree.coord(grandchild), parent_coord.child(corner));
    assert_eq!(tree[grandchild].corner(), corner);
    assert_eq!(*tree.data(grandchild), 0, "payload starts at default");
  }
}

#[test]
fn test_init_children_twice_is_noop() {
  let mut tree = Octree::<()>::new();
  let root = tree.root();
  tree.init_children(root).expect("first subdivision");
  let before = tree.children(root);
  tree.init_children(root).expect("second call is a no-op");
  assert_eq!(tree.children(root), before);
  assert_eq!(tree.nodes(root), 9);
}

/// Scenario: root plus one subdivided child.
#[test]
fn test_two_level_counts() {
  let (tree, _) = two_level_tree(3);
  let root = tree.root();
  assert_eq!(tree.leaves(root), 15);
  assert_eq!(tree.nodes(root), 17);
  assert_eq!(tree.max_depth(root), 2);
}

#[test]
fn test_max_depth_leaves_truncates() {
  let (tree, _) = two_level_tree(3);
  let root = tree.root();
  assert_eq!(tree.max_depth_leaves(root, 0), 1);
  assert_eq!(tree.max_depth_leaves(root, 1), 8);
  assert_eq!(tree.max_depth_leaves(root, 2), 15);
}

#[test]
fn test_root_of_walks_to_top() {
  let (tree, child) = two_level_tree(6);
  let grandchild = tree.child(child, 2).expect("grandchild");
  assert_eq!(tree.root_of(grandchild), tree.root());
  assert_eq!(tree.root_of(tree.root()), tree.root());
}

// =========================================================================
// Batch 2: Limits and failures
// =========================================================================

#[test]
fn test_depth_limit_rejects_subdivision() {
  let mut tree = Octree::<()>::with_config(OctreeConfig::COMPACT.with_max_depth(1))
    .expect("valid config");
  let root = tree.root();
  tree.init_children(root).expect("depth 1 allowed");
  let child = tree.child(root, 0).expect("child");
  let err = tree.init_children(child).expect_err("depth 2 rejected");
  assert!(matches!(err, OctreeError::DepthExceeded { depth: 2, limit: 1 }));
  assert!(tree.is_leaf(child));
}

#[test]
fn test_allocation_failure_leaves_tree_unmodified() {
  let config = OctreeConfig::COMPACT.with_node_limit(8);
  let mut tree = Octree::<()>::with_config(config).expect("valid config");
  let root = tree.root();
  tree.init_children(root).expect("first block fits");

  let child = tree.child(root, 1).expect("child");
  let err = tree.init_children(child).expect_err("second block exceeds limit");
  assert!(matches!(err, OctreeError::AllocationFailed { requested: 8 }));
  assert!(tree.is_leaf(child));
  assert_eq!(tree.nodes(root), 9);
}

#[test]
fn test_with_allocator_rejects_depth_beyond_codec() {
  let result = Octree::with_allocator((), BlockAllocator::new(1), MAX_DEPTH + 1);
  assert!(matches!(result, Err(OctreeError::DepthExceeded { .. })));
}

// =========================================================================
// Batch 3: Full depth, nearest leaf, release
// =========================================================================

#[test]
fn test_set_full_depth_builds_complete_tree() {
  let mut tree = Octree::<()>::new();
  let root = tree.root();
  tree.set_full_depth(root, 3).expect("full depth");
  assert_eq!(tree.leaves(root), 512);
  assert_eq!(tree.nodes(root), 1 + 8 + 64 + 512);
  assert_eq!(tree.max_depth(root), 3);
}

#[test]
fn test_set_full_depth_keeps_existing_nodes() {
  let (mut tree, child) = two_level_tree(0);
  let grandchild = tree.child(child, 4).expect("grandchild");
  *tree.data_mut(grandchild) = 42;

  let root = tree.root();
  tree.set_full_depth(root, 2).expect("full depth");
  assert_eq!(tree.leaves(root), 64);
  assert_eq!(tree.child(child, 4), Some(grandchild));
  assert_eq!(*tree.data(grandchild), 42);
}

#[test]
fn test_set_full_depth_beyond_limit_fails_upfront() {
  let mut tree = Octree::<()>::with_config(OctreeConfig::COMPACT.with_max_depth(2))
    .expect("valid config");
  let root = tree.root();
  assert!(tree.set_full_depth(root, 3).is_err());
  assert!(tree.is_leaf(root), "nothing created on rejected request");
}

/// Scenario: query at the center of the subdivided child.
#[test]
fn test_get_nearest_leaf_in_subdivided_child() {
  let (tree, child) = two_level_tree(3);
  let (center, _) = tree.center_and_width(child);

  let leaf = tree.get_nearest_leaf(tree.root(), center).expect("point inside");
  assert_eq!(tree.parent(leaf), Some(child));
  assert_eq!(tree.depth(leaf), 2);

  let (leaf_center, leaf_width) = tree.center_and_width(leaf);
  assert!((center - leaf_center).abs().max_element() <= leaf_width * 0.5);
}

#[test]
fn test_get_nearest_leaf_outside_is_none() {
  let (tree, child) = two_level_tree(3);
  assert_eq!(tree.get_nearest_leaf(tree.root(), DVec3::splat(1.5)), None);
  // Point in the root cube but outside the child's cube.
  assert_eq!(tree.get_nearest_leaf(child, DVec3::splat(0.1)), None);
  // Coarse leaf when the point falls in an unsubdivided sibling.
  let leaf = tree
    .get_nearest_leaf(tree.root(), DVec3::splat(0.1))
    .expect("point inside");
  assert_eq!(tree.depth(leaf), 1);
}

#[test]
fn test_get_nearest_leaf_rejects_non_finite_points() {
  let (tree, _) = two_level_tree(3);
  for point in [
    DVec3::new(f64::NAN, 0.5, 0.5),
    DVec3::splat(f64::NAN),
    DVec3::new(0.5, f64::INFINITY, 0.5),
  ] {
    assert_eq!(tree.get_nearest_leaf(tree.root(), point), None, "{point:?}");
  }
}

#[test]
fn test_depth_orderings_sort_nodes() {
  let (tree, _) = two_level_tree(5);
  let mut nodes: Vec<_> = tree.iter_nodes(tree.root()).collect();
  nodes.reverse();

  nodes.sort_by(|&a, &b| tree.cmp_depth_forward(a, b));
  assert_eq!(nodes[0], tree.root());
  assert!(nodes.windows(2).all(|w| tree.depth(w[0]) <= tree.depth(w[1])));

  nodes.sort_by(|&a, &b| tree.cmp_depth_backward(a, b));
  assert_eq!(nodes.last(), Some(&tree.root()));
  assert!(nodes.windows(2).all(|w| tree.depth(w[0]) >= tree.depth(w[1])));
  assert_eq!(tree.depth(nodes[0]), 2);
}

#[test]
fn test_release_children_frees_subtree() {
  let mut tree = Octree::<()>::with_config(OctreeConfig::COMPACT).expect("valid config");
  let root = tree.root();
  tree.set_full_depth(root, 2).expect("full depth");
  assert_eq!(tree.allocator().live(), 72);

  let child = tree.child(root, 7).expect("child");
  tree.release_children(child);
  assert!(tree.is_leaf(child));
  assert_eq!(tree.nodes(root), 1 + 8 + 56);
  assert_eq!(tree.allocator().live(), 64);

  // The freed block is reused for the next subdivision.
  tree.init_children(child).expect("regrow");
  assert_eq!(tree.allocator().live(), 72);
  assert_eq!(tree.nodes(root), 73);
}

// =========================================================================
// Batch 4: Payload conversion
// =========================================================================

#[test]
fn test_convert_preserves_topology_and_payload() {
  let (mut tree, child) = two_level_tree(2);
  let grandchild = tree.child(child, 1).expect("grandchild");
  *tree.data_mut(grandchild) = 7;

  let converted: Octree<u64> = tree.convert();
  let root = converted.root();
  assert_eq!(converted.nodes(root), 17);
  assert_eq!(converted.leaves(root), 15);
  assert_eq!(*converted.data(grandchild), 7u64);
  assert_eq!(converted.coord(grandchild), tree.coord(grandchild));

  let doubled = tree.map(|&v| f64::from(v) * 2.0);
  assert_eq!(*doubled.data(grandchild), 14.0);
}
