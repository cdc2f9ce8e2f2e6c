//! Dual-tree recursion shared by the pairwise walks.
//!
//! Each pair that survives the subtree bound is handed to a [`Rule`], which
//! may visit it and decides which side (if any) to split next. Splitting
//! always prefers the coarser side; equal widths split both sides at once.

use smallvec::SmallVec;

use super::overlap::{node_reach, overlaps, subtree_reach};
use super::{AdjacencyStats, NodeAdjacency, Probe, TerminatingNodeAdjacency};
use crate::octree::{NodeAllocator, NodeId};

#[derive(Clone, Copy, Debug)]
struct Cell {
  id: NodeId,
  depth: u8,
  width: f64,
  leaf: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Side {
  First,
  Second,
  Both,
}

trait Rule {
  /// Visit the pair if appropriate and pick the side to split.
  fn step(&mut self, a: Cell, b: Cell, hit: bool, stats: &mut AdjacencyStats) -> Option<Side>;
}

/// Split the coarser of the sides that are not done.
fn coarser(a: Cell, a_done: bool, b: Cell, b_done: bool) -> Option<Side> {
  match (a_done, b_done) {
    (true, true) => None,
    (true, false) => Some(Side::Second),
    (false, true) => Some(Side::First),
    (false, false) if a.width > b.width => Some(Side::First),
    (false, false) if b.width > a.width => Some(Side::Second),
    (false, false) => Some(Side::Both),
  }
}

struct Leaves<V>(V);

impl<V: NodeAdjacency> Rule for Leaves<V> {
  fn step(&mut self, a: Cell, b: Cell, hit: bool, stats: &mut AdjacencyStats) -> Option<Side> {
    let side = coarser(a, a.leaf, b, b.leaf);
    if side.is_none() && hit {
      stats.visited += 1;
      self.0.visit(a.id, b.id);
    }
    side
  }
}

struct MaxDepth<V> {
  visitor: V,
  depth: u8,
}

impl<V: NodeAdjacency> Rule for MaxDepth<V> {
  fn step(&mut self, a: Cell, b: Cell, hit: bool, stats: &mut AdjacencyStats) -> Option<Side> {
    let a_done = a.leaf || a.depth >= self.depth;
    let b_done = b.leaf || b.depth >= self.depth;
    let side = coarser(a, a_done, b, b_done);
    if side.is_none() && hit {
      stats.visited += 1;
      self.visitor.visit(a.id, b.id);
    }
    side
  }
}

struct Terminating<V>(V);

impl<V: TerminatingNodeAdjacency> Rule for Terminating<V> {
  fn step(&mut self, a: Cell, b: Cell, hit: bool, stats: &mut AdjacencyStats) -> Option<Side> {
    if hit {
      stats.visited += 1;
      if !self.0.visit(a.id, b.id) {
        return None;
      }
    }
    coarser(a, a.leaf, b, b.leaf)
  }
}

struct FixedDepth<V> {
  visitor: V,
  depth: u8,
}

impl<V: NodeAdjacency> Rule for FixedDepth<V> {
  fn step(&mut self, a: Cell, b: Cell, hit: bool, stats: &mut AdjacencyStats) -> Option<Side> {
    let depth = self.depth;
    if a.depth > depth || b.depth > depth {
      return None;
    }
    if a.depth == depth && b.depth == depth {
      if hit {
        stats.visited += 1;
        self.visitor.visit(a.id, b.id);
      }
      return None;
    }
    // A leaf above the target depth can never produce a qualifying pair.
    if (a.depth < depth && a.leaf) || (b.depth < depth && b.leaf) {
      return None;
    }
    Some(match a.depth.cmp(&b.depth) {
      std::cmp::Ordering::Less => Side::First,
      std::cmp::Ordering::Greater => Side::Second,
      std::cmp::Ordering::Equal => Side::Both,
    })
  }
}

struct Walk<'a, 'b, T1, A1: NodeAllocator, T2, A2: NodeAllocator, R> {
  first: Probe<'a, T1, A1>,
  second: Probe<'b, T2, A2>,
  skip_self: bool,
  rule: R,
  stats: AdjacencyStats,
}

impl<'a, 'b, T1, A1: NodeAllocator, T2, A2: NodeAllocator, R: Rule> Walk<'a, 'b, T1, A1, T2, A2, R> {
  fn new(first: Probe<'a, T1, A1>, second: Probe<'b, T2, A2>, process_current: bool, rule: R) -> Self {
    Self {
      first,
      second,
      skip_self: !process_current,
      rule,
      stats: AdjacencyStats::default(),
    }
  }

  fn run(mut self) -> AdjacencyStats {
    let (a, b) = (self.first.node, self.second.node);
    if self.admit(a, b) {
      self.walk(a, b);
    }
    self.stats
  }

  /// Subtree-bound test; counts the check and any prune.
  fn admit(&mut self, a: NodeId, b: NodeId) -> bool {
    self.stats.tested += 1;
    let (ca, wa) = self.first.tree.center_and_width(a);
    let (cb, wb) = self.second.tree.center_and_width(b);
    let near = overlaps(
      ca,
      subtree_reach(self.first.radius, wa),
      cb,
      subtree_reach(self.second.radius, wb),
    );
    if !near {
      self.stats.pruned += 1;
    }
    near
  }

  fn walk(&mut self, a: NodeId, b: NodeId) {
    let (ca, wa) = self.first.tree.center_and_width(a);
    let (cb, wb) = self.second.tree.center_and_width(b);
    let hit = overlaps(ca, node_reach(self.first.radius, wa), cb, node_reach(self.second.radius, wb))
      && !(self.skip_self && self.first.same_node(a, &self.second, b));
    let cell_a = Cell {
      id: a,
      depth: self.first.tree.depth(a),
      width: wa,
      leaf: self.first.tree.is_leaf(a),
    };
    let cell_b = Cell {
      id: b,
      depth: self.second.tree.depth(b),
      width: wb,
      leaf: self.second.tree.is_leaf(b),
    };

    match self.rule.step(cell_a, cell_b, hit, &mut self.stats) {
      None => {}
      Some(Side::First) => {
        let Some(children) = self.first.tree.children(a) else {
          return;
        };
        for child in children {
          if self.admit(child, b) {
            self.walk(child, b);
          }
        }
      }
      Some(Side::Second) => {
        let Some(children) = self.second.tree.children(b) else {
          return;
        };
        for child in children {
          if self.admit(a, child) {
            self.walk(a, child);
          }
        }
      }
      Some(Side::Both) => {
        let (Some(first_children), Some(second_children)) =
          (self.first.tree.children(a), self.second.tree.children(b))
        else {
          return;
        };
        let near_first: SmallVec<[NodeId; 8]> =
          first_children.into_iter().filter(|&c| self.admit(c, b)).collect();
        let near_second: SmallVec<[NodeId; 8]> =
          second_children.into_iter().filter(|&c| self.admit(a, c)).collect();
        for &x in &near_first {
          for &y in &near_second {
            if self.admit(x, y) {
              self.walk(x, y);
            }
          }
        }
      }
    }
  }
}

/// Visit every overlapping pair of leaves below `first` and `second`.
///
/// With `process_current == false` a node is never paired with itself, which
/// is what a tree walked against itself usually wants.
#[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "octree::process_node_adjacent_nodes"))]
pub fn process_node_adjacent_nodes<T1, A1, T2, A2, V>(
  first: Probe<'_, T1, A1>,
  second: Probe<'_, T2, A2>,
  process_current: bool,
  visitor: V,
) -> AdjacencyStats
where
  A1: NodeAllocator,
  A2: NodeAllocator,
  V: NodeAdjacency,
{
  Walk::new(first, second, process_current, Leaves(visitor)).run()
}

/// Visit overlapping pairs at every depth, coarse to fine.
///
/// The visitor's return value controls descent: `false` stops the walk below
/// that pair, so far-field pairs can be handled coarsely.
#[cfg_attr(
  feature = "tracing",
  tracing::instrument(skip_all, name = "octree::process_terminating_node_adjacent_nodes")
)]
pub fn process_terminating_node_adjacent_nodes<T1, A1, T2, A2, V>(
  first: Probe<'_, T1, A1>,
  second: Probe<'_, T2, A2>,
  process_current: bool,
  visitor: V,
) -> AdjacencyStats
where
  A1: NodeAllocator,
  A2: NodeAllocator,
  V: TerminatingNodeAdjacency,
{
  Walk::new(first, second, process_current, Terminating(visitor)).run()
}

/// Visit overlapping pairs whose nodes both sit at exactly `depth`.
///
/// Nothing below `depth` is entered. Starting nodes deeper than `depth`
/// produce no visits.
#[cfg_attr(
  feature = "tracing",
  tracing::instrument(skip_all, name = "octree::process_fixed_depth_node_adjacent_nodes")
)]
pub fn process_fixed_depth_node_adjacent_nodes<T1, A1, T2, A2, V>(
  first: Probe<'_, T1, A1>,
  second: Probe<'_, T2, A2>,
  depth: u8,
  process_current: bool,
  visitor: V,
) -> AdjacencyStats
where
  A1: NodeAllocator,
  A2: NodeAllocator,
  V: NodeAdjacency,
{
  Walk::new(first, second, process_current, FixedDepth { visitor, depth }).run()
}

/// Like [`process_node_adjacent_nodes`], but a node at `depth` or deeper is
/// treated as a leaf.
#[cfg_attr(
  feature = "tracing",
  tracing::instrument(skip_all, name = "octree::process_max_depth_node_adjacent_nodes")
)]
pub fn process_max_depth_node_adjacent_nodes<T1, A1, T2, A2, V>(
  first: Probe<'_, T1, A1>,
  second: Probe<'_, T2, A2>,
  depth: u8,
  process_current: bool,
  visitor: V,
) -> AdjacencyStats
where
  A1: NodeAllocator,
  A2: NodeAllocator,
  V: NodeAdjacency,
{
  Walk::new(first, second, process_current, MaxDepth { visitor, depth }).run()
}
