//! Error type shared by every fallible octree operation.

use thiserror::Error;

/// Failures surfaced by tree mutation, checked coordinate construction and
/// persistence.
///
/// All failures are local and synchronous: nothing is retried internally.
#[derive(Debug, Error)]
pub enum OctreeError {
  /// The node allocator could not supply a contiguous block of slots.
  ///
  /// The tree is left exactly as it was before the failing call.
  #[error("node allocator could not supply a block of {requested} nodes")]
  AllocationFailed {
    /// Number of contiguous slots that were requested.
    requested: usize,
  },

  /// A depth beyond the tree's (or the codec's) depth limit was requested.
  #[error("depth {depth} exceeds the depth limit {limit}")]
  DepthExceeded {
    /// The offending depth.
    depth: u32,
    /// The limit that was exceeded.
    limit: u8,
  },

  /// An offset lies outside `[0, 2^depth)` on some axis.
  #[error("offset {offset:?} is outside the grid at depth {depth}")]
  InvalidOffset {
    /// Depth of the rejected coordinate.
    depth: u8,
    /// The rejected per-axis offset.
    offset: [u32; 3],
  },

  /// A persisted topology stream is malformed or truncated.
  #[error("corrupt octree stream: {0}")]
  CorruptTree(String),

  /// The underlying byte stream failed.
  #[error(transparent)]
  Io(#[from] std::io::Error),
}

impl OctreeError {
  pub(crate) fn corrupt(reason: impl Into<String>) -> Self {
    let reason = reason.into();
    #[cfg(feature = "tracing")]
    tracing::debug!(%reason, "rejecting octree stream");
    Self::CorruptTree(reason)
  }
}
