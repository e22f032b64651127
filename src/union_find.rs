//! A disjoint-set forest (union-find) with union by rank and path
//! compression, after the description in "Introduction to Algorithms"
//! by Cormen et.al.
//!
//! Nodes live in an arena and refer to their parents by index, never by
//! pointer; each node is wrapped in a [`Cell`] so that `find` can
//! re-parent compressed nodes through a shared reference. The arena is
//! never exposed: callers see only opaque [`NodeIndex`] representatives.
//!
//! Amortized cost over m operations on n elements is O(m * alpha(n)),
//! the standard inverse-Ackermann bound.

use std::cell::Cell;
use std::hash::Hash;

use indexmap::IndexMap;
use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisjointSetError {
    /// `make_set` on a value that already belongs to a set. Silently
    /// replacing the node would discard every union the value took part
    /// in, so this is rejected instead; remove-and-recreate semantics
    /// must be explicit at the call site.
    #[error("value already belongs to a set")]
    AlreadyPresent,
    /// `find` or `union` on a value never passed to `make_set`.
    #[error("value was never added with make_set")]
    NotPresent,
}

/// Position of a node in the forest arena. Two values are in the same
/// set exactly when `find` returns the same `NodeIndex` for both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeIndex(usize);

/// A node is either a root carrying its union-by-rank value, or a child
/// pointing at its parent. The rank is an upper bound on the height of
/// the subtree below the root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UfNode {
    Root { rank: usize },
    Child(NodeIndex),
}

/// A partition of values into disjoint sets.
///
/// Every value starts in a singleton set created by [`make_set`];
/// [`union`] merges two sets and [`find`] names a set by its current
/// root. Parent chains always terminate: `union` only ever attaches one
/// root beneath another, so no cycle can form.
///
/// [`make_set`]: DisjointSet::make_set
/// [`union`]: DisjointSet::union
/// [`find`]: DisjointSet::find
#[derive(Debug, Clone)]
pub struct DisjointSet<T> {
    nodes: Vec<Cell<UfNode>>,
    index: IndexMap<T, NodeIndex>,
}

impl<T> Default for DisjointSet<T> {
    fn default() -> Self {
        DisjointSet {
            nodes: Vec::new(),
            index: IndexMap::new(),
        }
    }
}

impl<T: Eq + Hash> DisjointSet<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new singleton set containing `value`.
    pub fn make_set(&mut self, value: T) -> Result<NodeIndex, DisjointSetError> {
        match self.index.entry(value) {
            indexmap::map::Entry::Occupied(_) => Err(DisjointSetError::AlreadyPresent),
            indexmap::map::Entry::Vacant(slot) => {
                let node = NodeIndex(self.nodes.len());
                slot.insert(node);
                self.nodes.push(Cell::new(UfNode::Root { rank: 0 }));
                Ok(node)
            }
        }
    }

    /// Returns the representative of the set containing `value`,
    /// re-parenting every node on the walked chain directly to the root
    /// so that repeated finds amortize to near O(1).
    pub fn find(&self, value: &T) -> Result<NodeIndex, DisjointSetError> {
        let node = self
            .index
            .get(value)
            .copied()
            .ok_or(DisjointSetError::NotPresent)?;
        Ok(self.find_root(node))
    }

    /// Merges the sets containing `x` and `y`, returning the surviving
    /// root. A no-op when they are already in the same set, so a second
    /// identical union changes nothing.
    pub fn union(&mut self, x: &T, y: &T) -> Result<NodeIndex, DisjointSetError> {
        let root_x = self.find(x)?;
        let root_y = self.find(y)?;
        if root_x == root_y {
            return Ok(root_x);
        }
        let rank_x = self.rank(root_x);
        let rank_y = self.rank(root_y);
        // The lower-rank root goes beneath the higher-rank one; only a
        // tie grows the surviving rank.
        let (winner, loser) = if rank_x < rank_y {
            (root_y, root_x)
        } else {
            (root_x, root_y)
        };
        if rank_x == rank_y {
            self.nodes[winner.0].set(UfNode::Root { rank: rank_x + 1 });
        }
        self.nodes[loser.0].set(UfNode::Child(winner));
        Ok(winner)
    }

    /// Whether `x` and `y` currently belong to the same set.
    pub fn same_set(&self, x: &T, y: &T) -> Result<bool, DisjointSetError> {
        Ok(self.find(x)? == self.find(y)?)
    }

    pub fn contains(&self, value: &T) -> bool {
        self.index.contains_key(value)
    }

    /// The number of values across all sets.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    fn find_root(&self, node: NodeIndex) -> NodeIndex {
        match self.nodes[node.0].get() {
            UfNode::Root { .. } => node,
            UfNode::Child(parent) => {
                let root = self.find_root(parent);
                // Path compression: point directly at the root.
                self.nodes[node.0].set(UfNode::Child(root));
                root
            }
        }
    }

    fn rank(&self, root: NodeIndex) -> usize {
        match self.nodes[root.0].get() {
            UfNode::Root { rank } => rank,
            UfNode::Child(_) => unreachable!("find always returns a root"),
        }
    }
}

impl<T: Eq + Hash> FromIterator<T> for DisjointSet<T> {
    /// Collects each distinct value into its own singleton set;
    /// duplicates are ignored.
    fn from_iter<I: IntoIterator<Item = T>>(values: I) -> Self {
        let mut sets = DisjointSet::new();
        for value in values {
            let _ = sets.make_set(value);
        }
        sets
    }
}
