//! Topological ordering via the depth-first walker protocol.

use std::collections::VecDeque;
use std::ops::ControlFlow;

use super::walk::{Walk, Walker};
use super::Adjacency;

/// Prepends every finished vertex, so reading front to back yields
/// reverse finishing order.
struct TopologicalWalker<V> {
    order: VecDeque<V>,
}

impl<V: Clone> Walker<V> for TopologicalWalker<V> {
    type Break = ();

    fn on_finish(&mut self, _parent: Option<&V>, vertex: &V) -> ControlFlow<()> {
        self.order.push_front(vertex.clone());
        ControlFlow::Continue(())
    }
}

/// Returns the vertices in topological order: for every edge `(u, v)` of
/// an acyclic graph, `u` appears before `v`.
///
/// The walk always terminates, but the order is unspecified when the
/// graph contains a cycle; no cycle check is performed here. A caller
/// that cares can watch for back edges with its own walker, or use
/// [`super::scc`].
pub fn topological_order<S>(graph: &S) -> Vec<S::Vertex>
where
    S: Adjacency,
    S::Vertex: Clone,
{
    let mut walker = TopologicalWalker {
        order: VecDeque::new(),
    };
    let _ = graph.walk_depth_first(&mut walker);
    walker.order.into()
}
