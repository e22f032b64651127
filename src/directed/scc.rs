//! Strongly connected components via Tarjan's algorithm, expressed as a
//! walker over the depth-first driver.
//!
//! The intended use is cycle discovery, so trivial singleton components
//! are suppressed by default: on a DAG every vertex is its own SCC and
//! reporting them all would defeat the purpose. Whether a lone self-loop
//! counts as a cycle is an explicit [`SelfLoopPolicy`].

use std::marker::PhantomData;
use std::ops::ControlFlow;

use ahash::AHashMap;

use super::walk::{Walk, Walker};
use super::{Adjacency, DiGraph};

/// What to do with a component consisting of a single vertex that
/// carries a self-loop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SelfLoopPolicy {
    /// Report only components with more than one vertex.
    #[default]
    Suppress,
    /// Additionally report a singleton whose vertex has an edge to
    /// itself; it is a 1-cycle.
    ReportSelfLoops,
}

/// Tarjan bookkeeping for one vertex. `low <= number` always; a vertex
/// roots a component exactly when they are equal at finish time.
#[derive(Debug, Clone, Copy)]
struct SccInfo {
    number: usize,
    low: usize,
    on_stack: bool,
}

struct SccWalker<'g, S: Adjacency, F, B> {
    graph: &'g S,
    clock: usize,
    info: AHashMap<S::Vertex, SccInfo>,
    stack: Vec<S::Vertex>,
    policy: SelfLoopPolicy,
    on_component: F,
    _break: PhantomData<fn() -> B>,
}

impl<S, F, B> SccWalker<'_, S, F, B>
where
    S: Adjacency,
    S::Vertex: Clone,
{
    fn tighten(&mut self, vertex: &S::Vertex, low: usize) {
        if let Some(info) = self.info.get_mut(vertex) {
            if low < info.low {
                info.low = low;
            }
        }
    }

    fn should_report(&self, members: &[S::Vertex]) -> bool {
        match members {
            [] => false,
            [lone] => {
                self.policy == SelfLoopPolicy::ReportSelfLoops && self.graph.has_edge(lone, lone)
            }
            _ => true,
        }
    }
}

impl<S, F, B> Walker<S::Vertex> for SccWalker<'_, S, F, B>
where
    S: Adjacency,
    S::Vertex: Clone,
    F: FnMut(DiGraph<S::Vertex>) -> ControlFlow<B>,
{
    type Break = B;

    fn on_discover(&mut self, parent: Option<&S::Vertex>, vertex: &S::Vertex) -> ControlFlow<B> {
        self.clock += 1;
        self.info.insert(
            vertex.clone(),
            SccInfo {
                number: self.clock,
                low: self.clock,
                on_stack: true,
            },
        );
        self.stack.push(vertex.clone());
        if let Some(parent) = parent {
            let low = self.clock;
            self.tighten(parent, low);
        }
        ControlFlow::Continue(())
    }

    fn on_back_edge(&mut self, source: &S::Vertex, target: &S::Vertex) -> ControlFlow<B> {
        // A back edge target is GREY, hence still awaiting component
        // assignment on the stack.
        if let Some(low) = self.info.get(target).map(|info| info.low) {
            self.tighten(source, low);
        }
        ControlFlow::Continue(())
    }

    fn on_cross_edge(&mut self, source: &S::Vertex, target: &S::Vertex) -> ControlFlow<B> {
        // A finished target still on the stack belongs to a component
        // whose root is an open ancestor, so the edge stays inside the
        // pending component.
        if let Some(low) = self
            .info
            .get(target)
            .filter(|info| info.on_stack)
            .map(|info| info.low)
        {
            self.tighten(source, low);
        }
        ControlFlow::Continue(())
    }

    fn on_finish(&mut self, parent: Option<&S::Vertex>, vertex: &S::Vertex) -> ControlFlow<B> {
        let Some(SccInfo { number, low, .. }) = self.info.get(vertex).copied() else {
            return ControlFlow::Continue(());
        };
        if let Some(parent) = parent {
            self.tighten(parent, low);
        }
        if number != low {
            return ControlFlow::Continue(());
        }
        // This vertex roots a component: pop the stack down to and
        // including it, never past its discovery index.
        let mut members = Vec::new();
        while let Some(member) = self.stack.pop() {
            if let Some(info) = self.info.get_mut(&member) {
                info.on_stack = false;
            }
            let is_root = member == *vertex;
            members.push(member);
            if is_root {
                break;
            }
        }
        if self.should_report(&members) {
            return (self.on_component)(induced_subgraph(self.graph, &members));
        }
        ControlFlow::Continue(())
    }
}

/// The subgraph over `members` holding exactly the original edges whose
/// both endpoints lie in the component.
fn induced_subgraph<S>(graph: &S, members: &[S::Vertex]) -> DiGraph<S::Vertex>
where
    S: Adjacency,
    S::Vertex: Clone,
{
    let mut component = DiGraph::new();
    for member in members {
        component.add_vertex(member.clone());
    }
    for member in members {
        for target in graph.out_neighbors(member) {
            if component.has_vertex(target) {
                component.add_edge(member.clone(), target.clone());
            }
        }
    }
    component
}

/// Calls `f` with each strongly connected component of more than one
/// vertex, as an induced subgraph. Singletons are suppressed, self-loops
/// included; use [`for_each_cycle_component_with`] to report 1-cycles.
///
/// `f` may abort the decomposition by returning
/// [`ControlFlow::Break`]; the break value is propagated to the caller.
/// One depth-first sweep, O(|V| + |E|).
pub fn for_each_cycle_component<S, F, B>(graph: &S, f: F) -> ControlFlow<B>
where
    S: Adjacency,
    S::Vertex: Clone,
    F: FnMut(DiGraph<S::Vertex>) -> ControlFlow<B>,
{
    for_each_cycle_component_with(graph, SelfLoopPolicy::default(), f)
}

/// [`for_each_cycle_component`] with an explicit [`SelfLoopPolicy`].
pub fn for_each_cycle_component_with<S, F, B>(
    graph: &S,
    policy: SelfLoopPolicy,
    f: F,
) -> ControlFlow<B>
where
    S: Adjacency,
    S::Vertex: Clone,
    F: FnMut(DiGraph<S::Vertex>) -> ControlFlow<B>,
{
    let mut walker = SccWalker {
        graph,
        clock: 0,
        info: AHashMap::new(),
        stack: Vec::new(),
        policy,
        on_component: f,
        _break: PhantomData,
    };
    graph.walk_depth_first(&mut walker)
}

/// Collects the cycle components under the default policy.
pub fn cycle_components<S>(graph: &S) -> Vec<DiGraph<S::Vertex>>
where
    S: Adjacency,
    S::Vertex: Clone,
{
    let mut components = Vec::new();
    let _: ControlFlow<()> = for_each_cycle_component(graph, |component| {
        components.push(component);
        ControlFlow::Continue(())
    });
    components
}
