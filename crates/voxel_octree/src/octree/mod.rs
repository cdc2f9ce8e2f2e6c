//! Arena-backed octree and its neighbor machinery.
//!
//! # Layout
//!
//! ```text
//! nodes: [ root | c0 c1 c2 c3 c4 c5 c6 c7 | c0 .. c7 | ... ]
//!          slot 0  └──── block of 8 ────┘
//! ```
//!
//! The root lives in slot 0. Every subdivision takes one contiguous block of
//! eight slots from the [`NodeAllocator`], so a child is always
//! `first_child + corner` and siblings are adjacent in memory. Parent links
//! are plain [`NodeId`]s and never own anything.
//!
//! # Module Structure
//!
//! - [`allocator`]: `NodeAllocator` trait and the default `BlockAllocator`
//! - [`config`]: `OctreeConfig` - depth limit and allocator policy
//! - [`node`]: `Node` and the `NodeId` handle
//! - [`tree`]: `Octree` - construction, subdivision, aggregate queries
//! - [`neighbors`]: same-depth face/edge/corner neighbors
//! - [`neighbor_key`]: `NeighborKey` - cached 3×3×3 neighbor grids
//! - [`traversal`]: pre-order successors and iterators

pub mod allocator;
pub mod config;
pub mod neighbor_key;
pub mod neighbors;
pub mod node;
pub mod traversal;
pub mod tree;

// Re-exports
pub use allocator::{BlockAllocator, NodeAllocator};
pub use config::{OctreeConfig, DEFAULT_BLOCK_SIZE};
pub use neighbor_key::{NeighborKey, Neighbors};
pub use node::{Node, NodeId};
pub use traversal::{Leaves, Nodes};
pub use tree::Octree;

#[cfg(test)]
#[path = "mod_test.rs"]
mod mod_test;
