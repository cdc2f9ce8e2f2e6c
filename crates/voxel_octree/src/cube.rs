//! Face, edge and corner indexing for a single cube.
//!
//! # Cube Topology
//!
//! ```text
//!       6──────7         Corners (binary ZYX):
//!      /│     /│           0=(0,0,0)  1=(1,0,0)  2=(0,1,0)  3=(1,1,0)
//!     4─┼────5 │           4=(0,0,1)  5=(1,0,1)  6=(0,1,1)  7=(1,1,1)
//!     │ 2────┼─3
//!     │/     │/          +Y
//!     0──────1            │  +Z
//!                         │ /
//!                         └───+X
//! ```
//!
//! # Faces
//!
//! ```text
//! face = axis * 2 + side        side 0 = negative, 1 = positive
//!   0 = -X   1 = +X   2 = -Y   3 = +Y   4 = -Z   5 = +Z
//! ```
//!
//! # Edges
//!
//! ```text
//! edge = axis * 4 + j * 2 + i
//!   axis: the axis the edge runs parallel to
//!   i:    side on the lower of the two remaining axes
//!   j:    side on the higher of the two remaining axes
//!
//! X-parallel: 0..4 (i = Y side, j = Z side)
//! Y-parallel: 4..8 (i = X side, j = Z side)
//! Z-parallel: 8..12 (i = X side, j = Y side)
//! ```
//!
//! Corner `c` has bit `i` set when it sits on the positive side of axis `i`.
//!
//! Directions are expressed as deltas in `{-1, 0, 1}^3`; a face flips one axis,
//! an edge two, a corner all three.

/// Number of cube faces.
pub const FACES: usize = 6;

/// Number of cube edges.
pub const EDGES: usize = 12;

/// Number of cube corners (and children per node).
pub const CORNERS: usize = 8;

/// The two axes perpendicular to `axis`, ascending.
#[inline(always)]
pub const fn other_axes(axis: usize) -> [usize; 2] {
  match axis {
    0 => [1, 2],
    1 => [0, 2],
    _ => [0, 1],
  }
}

#[inline(always)]
const fn side_delta(side: usize) -> i8 {
  if side == 0 {
    -1
  } else {
    1
  }
}

/// Face index for an axis and side.
#[inline(always)]
pub const fn face_index(axis: usize, side: usize) -> usize {
  (axis << 1) | (side & 1)
}

/// Split a face index into `(axis, side)`.
#[inline(always)]
pub const fn factor_face(face: usize) -> (usize, usize) {
  (face >> 1, face & 1)
}

/// Face on the other side of the cube.
#[inline(always)]
pub const fn opposite_face(face: usize) -> usize {
  face ^ 1
}

/// Direction delta of a face.
pub const fn face_delta(face: usize) -> [i8; 3] {
  let (axis, side) = factor_face(face);
  let mut delta = [0i8; 3];
  delta[axis] = side_delta(side);
  delta
}

/// Edge index for a parallel axis and the two perpendicular sides.
#[inline(always)]
pub const fn edge_index(axis: usize, i: usize, j: usize) -> usize {
  (axis << 2) | ((j & 1) << 1) | (i & 1)
}

/// Split an edge index into `(axis, i, j)`.
#[inline(always)]
pub const fn factor_edge(edge: usize) -> (usize, usize, usize) {
  (edge >> 2, edge & 1, (edge >> 1) & 1)
}

/// Edge diagonally across the cube.
#[inline(always)]
pub const fn opposite_edge(edge: usize) -> usize {
  edge ^ 3
}

/// Direction delta of an edge.
pub const fn edge_delta(edge: usize) -> [i8; 3] {
  let (axis, i, j) = factor_edge(edge);
  let [a, b] = other_axes(axis);
  let mut delta = [0i8; 3];
  delta[a] = side_delta(i);
  delta[b] = side_delta(j);
  delta
}

/// Corner diagonally across the cube.
#[inline(always)]
pub const fn opposite_corner(corner: usize) -> usize {
  corner ^ 7
}

/// Direction delta of a corner.
pub const fn corner_delta(corner: usize) -> [i8; 3] {
  [
    side_delta(corner & 1),
    side_delta((corner >> 1) & 1),
    side_delta((corner >> 2) & 1),
  ]
}

/// The four child corners touching a face.
pub const fn face_corners(face: usize) -> [u8; 4] {
  let (axis, side) = factor_face(face);
  let mut out = [0u8; 4];
  let mut n = 0;
  let mut c = 0;
  while c < CORNERS {
    if (c >> axis) & 1 == side {
      out[n] = c as u8;
      n += 1;
    }
    c += 1;
  }
  out
}

/// The two child corners touching an edge.
pub const fn edge_corners(edge: usize) -> [u8; 2] {
  let (axis, i, j) = factor_edge(edge);
  let [a, b] = other_axes(axis);
  let base = (i << a) | (j << b);
  [base as u8, (base | (1 << axis)) as u8]
}

#[cfg(test)]
#[path = "cube_test.rs"]
mod cube_test;
