//! Node slot allocation for the octree arena.
//!
//! The tree stores every node in one contiguous arena. An allocator decides
//! which slot range a new block of nodes occupies; the tree only ever asks for
//! blocks of eight children. The root lives outside the allocator.

/// Slot allocation capability consumed by [`Octree`](super::Octree).
///
/// Implementations hand out contiguous slot ranges and take them back when a
/// subtree is released. Returned ranges must not overlap any live range.
pub trait NodeAllocator {
  /// Reserve `count` contiguous slots, returning the first slot index, or
  /// `None` when the request cannot be satisfied.
  fn allocate(&mut self, count: usize) -> Option<u32>;

  /// Return a range previously obtained from [`allocate`](Self::allocate).
  fn release(&mut self, start: u32, count: usize);

  /// Set how many eight-node blocks the arena grows by at a time.
  ///
  /// Must be called before any slot is handed out.
  fn set_block_size(&mut self, block_size: usize);

  /// Current growth granularity, in eight-node blocks.
  fn block_size(&self) -> usize;
}

/// Bump allocator with exact-size reuse of released ranges.
///
/// Released blocks are recycled LIFO, so a tree that repeatedly prunes and
/// regrows the same region reuses the same slots.
#[derive(Clone, Debug)]
pub struct BlockAllocator {
  /// First slot never handed out.
  next: u32,
  /// Slots currently handed out.
  live: usize,
  /// Optional cap on live slots.
  limit: Option<usize>,
  /// Growth granularity in eight-node blocks.
  block_size: usize,
  /// Released `(start, count)` ranges awaiting reuse.
  free: Vec<(u32, usize)>,
}

impl BlockAllocator {
  /// Create an unlimited allocator with the given growth granularity.
  pub fn new(block_size: usize) -> Self {
    Self {
      next: 0,
      live: 0,
      limit: None,
      block_size: block_size.max(1),
      free: Vec::new(),
    }
  }

  /// Cap the number of live slots.
  pub fn with_limit(mut self, limit: usize) -> Self {
    self.limit = Some(limit);
    self
  }

  /// Slots currently handed out.
  pub fn live(&self) -> usize {
    self.live
  }

  /// Number of released ranges waiting to be reused.
  pub fn free_ranges(&self) -> usize {
    self.free.len()
  }
}

impl Default for BlockAllocator {
  fn default() -> Self {
    Self::new(super::config::DEFAULT_BLOCK_SIZE)
  }
}

impl NodeAllocator for BlockAllocator {
  fn allocate(&mut self, count: usize) -> Option<u32> {
    debug_assert!(count > 0, "zero-sized node allocation");
    if let Some(limit) = self.limit {
      if self.live + count > limit {
        return None;
      }
    }

    if let Some(pos) = self.free.iter().rposition(|&(_, n)| n == count) {
      let (start, _) = self.free.swap_remove(pos);
      self.live += count;
      return Some(start);
    }

    let start = self.next;
    self.next = start.checked_add(u32::try_from(count).ok()?)?;
    self.live += count;
    Some(start)
  }

  fn release(&mut self, start: u32, count: usize) {
    debug_assert!(count <= self.live, "releasing more slots than are live");
    self.live -= count;
    self.free.push((start, count));
  }

  fn set_block_size(&mut self, block_size: usize) {
    debug_assert!(
      self.live == 0,
      "block size must be fixed before nodes are allocated"
    );
    self.block_size = block_size.max(1);
  }

  fn block_size(&self) -> usize {
    self.block_size
  }
}

#[cfg(test)]
#[path = "allocator_test.rs"]
mod allocator_test;
