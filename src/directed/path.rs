//! Unweighted shortest paths via breadth-first search.

use std::hash::Hash;
use std::ops::ControlFlow;

use ahash::AHashMap;
use thiserror::Error;

use super::walk::{Walk, Walker};
use super::Adjacency;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathError {
    #[error("no path between the requested vertices")]
    NoPath,
}

/// Records, for every finished vertex, the parent through which it was
/// first discovered, and aborts the walk as soon as the target finishes.
struct ShortestPathWalker<V> {
    parent_of: AHashMap<V, Option<V>>,
    target: V,
}

impl<V: Clone + Eq + Hash> Walker<V> for ShortestPathWalker<V> {
    type Break = ();

    fn on_finish(&mut self, parent: Option<&V>, vertex: &V) -> ControlFlow<()> {
        self.parent_of.insert(vertex.clone(), parent.cloned());
        if *vertex == self.target {
            return ControlFlow::Break(());
        }
        ControlFlow::Continue(())
    }
}

/// Finds a shortest path (by hop count) from `source` to `target`,
/// returned in source-to-target order.
///
/// Runs a single breadth-first search; the first time the target
/// finishes it was reached along a minimal-hop path, and the search is
/// aborted. The path is reconstructed by walking recorded parents
/// backward from the target. `source == target` yields a single-vertex
/// path. Complexity O(|V| + |E|).
pub fn shortest_path<S>(
    graph: &S,
    source: &S::Vertex,
    target: &S::Vertex,
) -> Result<Vec<S::Vertex>, PathError>
where
    S: Adjacency,
    S::Vertex: Clone,
{
    let mut walker = ShortestPathWalker {
        parent_of: AHashMap::new(),
        target: target.clone(),
    };
    let _ = graph.walk_breadth_first_from(source, &mut walker);

    let mut path = vec![target.clone()];
    let mut last = target.clone();
    while last != *source {
        match walker.parent_of.get(&last) {
            Some(Some(parent)) => {
                last = parent.clone();
                path.push(last.clone());
            }
            // Either the target never finished, or a parent link is
            // missing mid-chain; both mean there is no route.
            _ => return Err(PathError::NoPath),
        }
    }
    path.reverse();
    Ok(path)
}
