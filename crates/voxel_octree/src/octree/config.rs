//! OctreeConfig - depth limit and allocation policy for a tree.

use super::allocator::BlockAllocator;
use crate::coord::MAX_DEPTH;
use crate::error::OctreeError;

/// Default number of eight-node blocks reserved whenever the arena grows.
pub const DEFAULT_BLOCK_SIZE: usize = 1024;

/// Configuration consumed when a tree is constructed.
///
/// The block size is fixed for the lifetime of the allocator it builds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OctreeConfig {
  /// Deepest level nodes may be created at. Must not exceed [`MAX_DEPTH`].
  pub max_depth: u8,

  /// Number of eight-node blocks reserved per arena growth step.
  pub block_size: usize,

  /// Hard cap on live child slots, root excluded (`None` = unlimited).
  pub node_limit: Option<usize>,
}

impl OctreeConfig {
  /// Full codec depth, default growth, no node cap.
  pub const DEFAULT: Self = Self {
    max_depth: MAX_DEPTH,
    block_size: DEFAULT_BLOCK_SIZE,
    node_limit: None,
  };

  /// Small growth steps for tiny trees (tests, tools).
  pub const COMPACT: Self = Self {
    max_depth: MAX_DEPTH,
    block_size: 1,
    node_limit: None,
  };

  /// Same configuration with a different depth limit.
  pub const fn with_max_depth(mut self, max_depth: u8) -> Self {
    self.max_depth = max_depth;
    self
  }

  /// Same configuration with a node cap.
  pub const fn with_node_limit(mut self, limit: usize) -> Self {
    self.node_limit = Some(limit);
    self
  }

  /// Check the configuration against the codec limits.
  pub fn validate(&self) -> Result<(), OctreeError> {
    if self.max_depth > MAX_DEPTH {
      return Err(OctreeError::DepthExceeded {
        depth: self.max_depth as u32,
        limit: MAX_DEPTH,
      });
    }
    Ok(())
  }

  /// Build the default allocator for this configuration.
  pub fn allocator(&self) -> BlockAllocator {
    let mut allocator = BlockAllocator::new(self.block_size);
    if let Some(limit) = self.node_limit {
      allocator = allocator.with_limit(limit);
    }
    allocator
  }
}

impl Default for OctreeConfig {
  fn default() -> Self {
    Self::DEFAULT
  }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;
