//! voxel_octree - adaptive octree index for multi-resolution solvers and
//! isosurface extraction
//!
//! The unit cube is recursively split into eight children. Each node carries
//! a packed (depth, offset) coordinate and a caller payload, and the crate
//! answers the questions a solver or mesher keeps asking of such a tree: who
//! are my neighbors, which nodes overlap which, and which leaf holds a point.
//!
//! # Features
//!
//! - **Packed coordinates**: depth and per-axis offsets in one `u64`
//! - **Arena storage**: child blocks of eight from a pluggable allocator
//! - **Neighbors**: same-depth face, edge and corner lookup, read-only or
//!   creating, plus a per-depth `NeighborKey` cache
//! - **Adjacency walks**: dual-tree overlap traversal with leaf, terminating,
//!   fixed-depth, max-depth and point variants
//! - **Persistence**: a flat pre-order topology stream
//!
//! # Example
//!
//! ```
//! use voxel_octree::{Octree, NeighborKey};
//!
//! let mut tree = Octree::<f32>::new();
//! let root = tree.root();
//! tree.set_full_depth(root, 2).unwrap();
//! assert_eq!(tree.leaves(root), 64);
//!
//! let node = tree.child(tree.child(root, 0).unwrap(), 7).unwrap();
//! let mut key = NeighborKey::new(2);
//! let neighbors = key.get_neighbors(&tree, node);
//! assert_eq!(neighbors.get(1, 0, 0), tree.face_neighbor(node, 1));
//! ```

pub mod adjacency;
pub mod coord;
pub mod cube;
pub mod error;
pub mod octree;
pub mod parallel;
pub mod persist;

// Re-export commonly used items
pub use adjacency::{
  common_edge, process_fixed_depth_node_adjacent_nodes, process_max_depth_node_adjacent_nodes,
  process_node_adjacent_nodes, process_point_adjacent_nodes,
  process_terminating_node_adjacent_nodes, AdjacencyCounter, AdjacencyStats, Probe,
};
pub use coord::{Coord, MAX_DEPTH};
pub use error::OctreeError;
pub use octree::{
  BlockAllocator, NeighborKey, Neighbors, Node, NodeAllocator, NodeId, Octree, OctreeConfig,
};
