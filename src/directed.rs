//! Directed graphs: adjacency-list storage, the [`Adjacency`] storage
//! contract, and the algorithms layered on top of it.
//!
//! The storage keeps vertices and out-edge lists in insertion order, so
//! every enumeration (and therefore every traversal) is deterministic for
//! a given construction sequence.

use std::hash::Hash;
use std::iter::Flatten;
use std::option::IntoIter;

use indexmap::{map::Keys, set::Iter, IndexMap, IndexSet};

pub mod path;
pub mod scc;
pub mod topological;
pub mod walk;

/// The storage contract consumed by the traversal engine.
///
/// Only four primitives are required: vertex enumeration, out-edge
/// enumeration, vertex membership and edge membership. Everything in
/// [`walk`], [`topological`], [`path`] and [`scc`] is generic over this
/// trait, so any adjacency representation can be walked.
pub trait Adjacency {
    /// Vertex identity. Anything usable as a map key; the graph never
    /// owns a payload beyond the identity itself.
    type Vertex: Eq + Hash;
    type Vertices<'a>: Iterator<Item = &'a Self::Vertex>
    where
        Self: 'a;
    type OutEdges<'a>: Iterator<Item = &'a Self::Vertex>
    where
        Self: 'a;

    /// All vertices, in storage-enumeration order.
    fn vertices(&self) -> Self::Vertices<'_>;

    /// Targets of the out-edges of `vertex`, in storage-enumeration
    /// order. Empty for a vertex not in the graph.
    fn out_neighbors(&self, vertex: &Self::Vertex) -> Self::OutEdges<'_>;

    fn has_vertex(&self, vertex: &Self::Vertex) -> bool;

    fn has_edge(&self, source: &Self::Vertex, target: &Self::Vertex) -> bool;
}

/// An in-memory directed graph over arbitrary hashable vertex identities.
///
/// Edges are ordered pairs; duplicate edges are rejected (insertion is
/// idempotent) and self-loops are permitted. Vertices and out-edges
/// enumerate in insertion order.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DiGraph<V> {
    adjacency: IndexMap<V, IndexSet<V>>,
    edge_count: usize,
}

impl<V> Default for DiGraph<V> {
    fn default() -> Self {
        DiGraph {
            adjacency: IndexMap::new(),
            edge_count: 0,
        }
    }
}

impl<V: Eq + Hash> DiGraph<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a vertex with no in- or out-edges. Returns `false` if the
    /// vertex already existed.
    pub fn add_vertex(&mut self, vertex: V) -> bool {
        match self.adjacency.entry(vertex) {
            indexmap::map::Entry::Occupied(_) => false,
            indexmap::map::Entry::Vacant(slot) => {
                slot.insert(IndexSet::new());
                true
            }
        }
    }

    /// Adds an edge, inserting missing endpoints. Returns `false` if the
    /// edge already existed (a second insert is a no-op).
    pub fn add_edge(&mut self, source: V, target: V) -> bool
    where
        V: Clone,
    {
        self.add_vertex(target.clone());
        let added = self
            .adjacency
            .entry(source)
            .or_default()
            .insert(target);
        if added {
            self.edge_count += 1;
        }
        added
    }

    /// Removes an edge, leaving its endpoints in place. Returns `false`
    /// if the edge was not present.
    pub fn remove_edge(&mut self, source: &V, target: &V) -> bool {
        let removed = self
            .adjacency
            .get_mut(source)
            .is_some_and(|out| out.shift_remove(target));
        if removed {
            self.edge_count -= 1;
        }
        removed
    }

    /// Removes a vertex together with all of its in- and out-edges.
    /// Returns `false` if the vertex was not present. Enumeration order
    /// of the remaining vertices is preserved.
    pub fn remove_vertex(&mut self, vertex: &V) -> bool {
        let Some(out) = self.adjacency.shift_remove(vertex) else {
            return false;
        };
        self.edge_count -= out.len();
        for targets in self.adjacency.values_mut() {
            if targets.shift_remove(vertex) {
                self.edge_count -= 1;
            }
        }
        true
    }

    pub fn has_vertex(&self, vertex: &V) -> bool {
        self.adjacency.contains_key(vertex)
    }

    pub fn has_edge(&self, source: &V, target: &V) -> bool {
        self.adjacency
            .get(source)
            .is_some_and(|out| out.contains(target))
    }

    /// The order of the graph: its number of vertices.
    pub fn order(&self) -> usize {
        self.adjacency.len()
    }

    /// The size of the graph: its number of edges.
    pub fn size(&self) -> usize {
        self.edge_count
    }

    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }

    pub fn vertices(&self) -> impl Iterator<Item = &V> {
        self.adjacency.keys()
    }

    pub fn out_neighbors(&self, vertex: &V) -> impl Iterator<Item = &V> {
        self.adjacency.get(vertex).map(IndexSet::iter).into_iter().flatten()
    }

    /// All edges as `(source, target)` pairs, grouped by source in
    /// enumeration order.
    pub fn edges(&self) -> impl Iterator<Item = (&V, &V)> {
        self.adjacency
            .iter()
            .flat_map(|(source, out)| out.iter().map(move |target| (source, target)))
    }
}

impl<V: Eq + Hash + Clone> Extend<(V, V)> for DiGraph<V> {
    fn extend<I: IntoIterator<Item = (V, V)>>(&mut self, edges: I) {
        for (source, target) in edges {
            self.add_edge(source, target);
        }
    }
}

impl<V: Eq + Hash + Clone> FromIterator<(V, V)> for DiGraph<V> {
    fn from_iter<I: IntoIterator<Item = (V, V)>>(edges: I) -> Self {
        let mut graph = DiGraph::new();
        graph.extend(edges);
        graph
    }
}

impl<V: Eq + Hash> Adjacency for DiGraph<V> {
    type Vertex = V;
    type Vertices<'a>
        = Keys<'a, V, IndexSet<V>>
    where
        Self: 'a;
    type OutEdges<'a>
        = Flatten<IntoIter<Iter<'a, V>>>
    where
        Self: 'a;

    fn vertices(&self) -> Self::Vertices<'_> {
        self.adjacency.keys()
    }

    fn out_neighbors(&self, vertex: &V) -> Self::OutEdges<'_> {
        self.adjacency.get(vertex).map(IndexSet::iter).into_iter().flatten()
    }

    fn has_vertex(&self, vertex: &V) -> bool {
        DiGraph::has_vertex(self, vertex)
    }

    fn has_edge(&self, source: &V, target: &V) -> bool {
        DiGraph::has_edge(self, source, target)
    }
}
