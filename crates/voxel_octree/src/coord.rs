//! Packed depth/offset coordinates for octree cells.
//!
//! A cell at depth `d` is one cube of the uniform `2^d`-per-axis grid that
//! tiles the unit cube. Its offset is the per-axis integer cell position.
//!
//! # Packed Layout
//!
//! ```text
//!  63 62          44 43          25 24           5 4       0
//! ┌─────┬──────────────┬──────────────┬──────────────┬─────────┐
//! │ 0 0 │   offset z   │   offset y   │   offset x   │  depth  │
//! │     │   19 bits    │   19 bits    │   19 bits    │ 5 bits  │
//! └─────┴──────────────┴──────────────┴──────────────┴─────────┘
//! ```
//!
//! # Continuous Mapping
//!
//! ```text
//! width  = 1 / 2^depth
//! center = (offset + 0.5) * width      (per axis)
//! ```
//!
//! Cells at the same depth are disjoint half-open cubes
//! `[offset * width, (offset + 1) * width)` that exactly tile `[0, 1)^3`.
//!
//! # Child Corners
//!
//! ```text
//! Corner indices (binary: ZYX), bit i set = upper half on axis i:
//!   0 = (0,0,0)    4 = (0,0,1)
//!   1 = (1,0,0)    5 = (1,0,1)
//!   2 = (0,1,0)    6 = (0,1,1)
//!   3 = (1,1,0)    7 = (1,1,1)
//! ```

use glam::DVec3;

use crate::error::OctreeError;

/// Bits reserved for the depth field.
pub const DEPTH_BITS: u32 = 5;

/// Bits reserved for each offset field.
pub const OFFSET_BITS: u32 = 19;

/// Deepest level whose offsets still fit in [`OFFSET_BITS`].
pub const MAX_DEPTH: u8 = OFFSET_BITS as u8;

/// Mask for the depth field (0x1F).
pub const DEPTH_MASK: u64 = (1 << DEPTH_BITS) - 1;

/// Mask for a single offset field.
pub const OFFSET_MASK: u64 = (1 << OFFSET_BITS) - 1;

/// Bit position of each offset field.
pub const OFFSET_SHIFTS: [u32; 3] = [
  DEPTH_BITS,
  DEPTH_BITS + OFFSET_BITS,
  DEPTH_BITS + 2 * OFFSET_BITS,
];

/// Pack a depth and offset into a single index.
///
/// Depths beyond [`MAX_DEPTH`] or offsets outside `[0, 2^depth)` are caller
/// errors; use [`Coord::checked`] to validate untrusted input first.
#[inline(always)]
pub const fn index(depth: u8, offset: [u32; 3]) -> u64 {
  (depth as u64 & DEPTH_MASK)
    | ((offset[0] as u64 & OFFSET_MASK) << OFFSET_SHIFTS[0])
    | ((offset[1] as u64 & OFFSET_MASK) << OFFSET_SHIFTS[1])
    | ((offset[2] as u64 & OFFSET_MASK) << OFFSET_SHIFTS[2])
}

/// Depth field of a packed index.
#[inline(always)]
pub const fn depth(index: u64) -> u8 {
  (index & DEPTH_MASK) as u8
}

/// Unpack an index into its depth and offset.
#[inline(always)]
pub const fn depth_and_offset(index: u64) -> (u8, [u32; 3]) {
  (
    depth(index),
    [
      ((index >> OFFSET_SHIFTS[0]) & OFFSET_MASK) as u32,
      ((index >> OFFSET_SHIFTS[1]) & OFFSET_MASK) as u32,
      ((index >> OFFSET_SHIFTS[2]) & OFFSET_MASK) as u32,
    ],
  )
}

/// Width of a cell at `depth` in the unit cube.
#[inline]
pub fn width(depth: u8) -> f64 {
  1.0 / (1u64 << depth) as f64
}

/// Center and width of the cell a packed index names.
///
/// Reads the bit fields directly rather than going through [`Coord`].
#[inline]
pub fn center_and_width(index: u64) -> (DVec3, f64) {
  let w = width(depth(index));
  let axis = |a: usize| (((index >> OFFSET_SHIFTS[a]) & OFFSET_MASK) as f64 + 0.5) * w;
  (DVec3::new(axis(0), axis(1), axis(2)), w)
}

/// Which child of a cell centered at `center` contains `point`.
///
/// Bit `i` is set when the point lies on or above the center on axis `i`.
#[inline]
pub fn corner_index(center: DVec3, point: DVec3) -> u8 {
  let mut corner = 0u8;
  if point.x >= center.x {
    corner |= 1;
  }
  if point.y >= center.y {
    corner |= 2;
  }
  if point.z >= center.z {
    corner |= 4;
  }
  corner
}

/// Per-axis 0/1 offset of a child corner inside its parent.
#[inline(always)]
pub const fn corner_offset(corner: u8) -> [u32; 3] {
  [
    (corner & 1) as u32,
    ((corner >> 1) & 1) as u32,
    ((corner >> 2) & 1) as u32,
  ]
}

/// Inverse of [`corner_offset`] for 0/1 axis bits.
#[inline(always)]
pub const fn corner_from_bits(x: u32, y: u32, z: u32) -> u8 {
  ((x & 1) | ((y & 1) << 1) | ((z & 1) << 2)) as u8
}

/// A cell of the uniform grid at some depth.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct Coord {
  /// Subdivision level, 0 is the root cell.
  pub depth: u8,
  /// Per-axis cell position in `[0, 2^depth)`.
  pub offset: [u32; 3],
}

impl Coord {
  /// The single depth-0 cell.
  pub const ROOT: Self = Self {
    depth: 0,
    offset: [0; 3],
  };

  /// Create a coordinate without validation.
  pub const fn new(depth: u8, offset: [u32; 3]) -> Self {
    Self { depth, offset }
  }

  /// Create a coordinate, rejecting depths beyond [`MAX_DEPTH`] and offsets
  /// outside the grid.
  pub fn checked(depth: u8, offset: [u32; 3]) -> Result<Self, OctreeError> {
    if depth > MAX_DEPTH {
      return Err(OctreeError::DepthExceeded {
        depth: depth as u32,
        limit: MAX_DEPTH,
      });
    }
    let cells = 1u32 << depth;
    if offset.iter().any(|&o| o >= cells) {
      return Err(OctreeError::InvalidOffset { depth, offset });
    }
    Ok(Self { depth, offset })
  }

  /// Rebuild a coordinate from a packed index.
  pub const fn from_index(index: u64) -> Self {
    let (depth, offset) = depth_and_offset(index);
    Self { depth, offset }
  }

  /// Packed index of this coordinate.
  pub const fn index(&self) -> u64 {
    index(self.depth, self.offset)
  }

  /// Child cell at `corner` (0-7).
  pub const fn child(&self, corner: u8) -> Self {
    let bits = corner_offset(corner);
    Self {
      depth: self.depth + 1,
      offset: [
        (self.offset[0] << 1) | bits[0],
        (self.offset[1] << 1) | bits[1],
        (self.offset[2] << 1) | bits[2],
      ],
    }
  }

  /// Parent cell, `None` at the root.
  pub const fn parent(&self) -> Option<Self> {
    if self.depth == 0 {
      return None;
    }
    Some(Self {
      depth: self.depth - 1,
      offset: [self.offset[0] >> 1, self.offset[1] >> 1, self.offset[2] >> 1],
    })
  }

  /// Corner this cell occupies inside its parent.
  pub const fn corner(&self) -> u8 {
    corner_from_bits(self.offset[0], self.offset[1], self.offset[2])
  }

  /// Width of the cell.
  #[inline]
  pub fn width(&self) -> f64 {
    width(self.depth)
  }

  /// Center and width computed from the stored depth and offset.
  #[inline]
  pub fn center_and_width(&self) -> (DVec3, f64) {
    let w = width(self.depth);
    let center = DVec3::new(
      self.offset[0] as f64 + 0.5,
      self.offset[1] as f64 + 0.5,
      self.offset[2] as f64 + 0.5,
    ) * w;
    (center, w)
  }

  /// Minimum corner of the cell.
  #[inline]
  pub fn min(&self) -> DVec3 {
    let w = width(self.depth);
    DVec3::new(
      self.offset[0] as f64,
      self.offset[1] as f64,
      self.offset[2] as f64,
    ) * w
  }

  /// Half-open containment test `[min, min + width)` on every axis.
  #[inline]
  pub fn contains(&self, point: DVec3) -> bool {
    let min = self.min();
    let max = min + DVec3::splat(self.width());
    point.cmpge(min).all() && point.cmplt(max).all()
  }
}

#[cfg(test)]
#[path = "coord_test.rs"]
mod coord_test;
