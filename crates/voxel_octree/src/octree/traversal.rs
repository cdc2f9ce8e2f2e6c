//! Stateless pre-order successor functions and the iterators built on them.
//!
//! All walks visit children in increasing corner order. The `scope` argument
//! bounds the walk to one subtree; passing `None` as the current position
//! starts at the top of that subtree.

use super::allocator::NodeAllocator;
use super::node::NodeId;
use super::tree::Octree;

impl<T, A: NodeAllocator> Octree<T, A> {
  /// Next node after `current` in pre-order within `scope`.
  pub fn next_node(&self, scope: NodeId, current: Option<NodeId>) -> Option<NodeId> {
    match current {
      None => Some(scope),
      Some(id) => match self.first_child(id) {
        Some(first) => Some(first),
        None => self.next_branch(scope, id),
      },
    }
  }

  /// Next leaf after `current` within `scope`.
  pub fn next_leaf(&self, scope: NodeId, current: Option<NodeId>) -> Option<NodeId> {
    let start = match current {
      None => scope,
      Some(id) if !self.is_leaf(id) => id,
      Some(id) => self.next_branch(scope, id)?,
    };
    Some(self.first_leaf(start))
  }

  /// Root of the next subtree after `current`, skipping everything below
  /// `current`.
  pub fn next_branch(&self, scope: NodeId, current: NodeId) -> Option<NodeId> {
    let mut id = current;
    loop {
      if id == scope {
        return None;
      }
      let parent = self.parent(id)?;
      let first = self.first_child(parent)?;
      let corner = id.index() - first.index();
      if corner < 7 {
        return Some(NodeId(id.0 + 1));
      }
      id = parent;
    }
  }

  fn first_leaf(&self, from: NodeId) -> NodeId {
    let mut id = from;
    while let Some(first) = self.first_child(id) {
      id = first;
    }
    id
  }

  /// Every node of the subtree in pre-order.
  pub fn iter_nodes(&self, scope: NodeId) -> Nodes<'_, T, A> {
    Nodes {
      tree: self,
      scope,
      next: Some(scope),
    }
  }

  /// Every leaf of the subtree in pre-order.
  pub fn iter_leaves(&self, scope: NodeId) -> Leaves<'_, T, A> {
    Leaves {
      tree: self,
      scope,
      next: Some(self.first_leaf(scope)),
    }
  }

  /// Every node of the subtree at exactly `depth`.
  pub fn nodes_at_depth(&self, scope: NodeId, depth: u8) -> Vec<NodeId> {
    let mut out = Vec::new();
    let mut current = Some(scope);
    while let Some(id) = current {
      if self.depth(id) == depth {
        out.push(id);
        current = self.next_branch(scope, id);
      } else {
        current = self.next_node(scope, Some(id));
      }
    }
    out
  }
}

/// Pre-order node iterator, see [`Octree::iter_nodes`].
#[derive(Debug)]
pub struct Nodes<'a, T, A: NodeAllocator> {
  tree: &'a Octree<T, A>,
  scope: NodeId,
  next: Option<NodeId>,
}

impl<T, A: NodeAllocator> Iterator for Nodes<'_, T, A> {
  type Item = NodeId;

  fn next(&mut self) -> Option<NodeId> {
    let current = self.next?;
    self.next = self.tree.next_node(self.scope, Some(current));
    Some(current)
  }
}

/// Pre-order leaf iterator, see [`Octree::iter_leaves`].
#[derive(Debug)]
pub struct Leaves<'a, T, A: NodeAllocator> {
  tree: &'a Octree<T, A>,
  scope: NodeId,
  next: Option<NodeId>,
}

impl<T, A: NodeAllocator> Iterator for Leaves<'_, T, A> {
  type Item = NodeId;

  fn next(&mut self) -> Option<NodeId> {
    let current = self.next?;
    self.next = self.tree.next_leaf(self.scope, Some(current));
    Some(current)
  }
}

#[cfg(test)]
#[path = "traversal_test.rs"]
mod traversal_test;
