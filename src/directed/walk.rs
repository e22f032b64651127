//! The traversal engine: depth-first and breadth-first drivers
//! parametrized by a [`Walker`].
//!
//! Both drivers share the same coloring discipline. A vertex is WHITE
//! (absent from the color map) until discovered, GREY while its subtree
//! is open, and BLACK once finished; a color never regresses. The
//! depth-first driver additionally classifies every non-tree edge it
//! encounters: an edge to a GREY vertex is a back edge (the target is an
//! ancestor on the open path), an edge to a BLACK vertex is a cross
//! edge. Forward edges are not distinguished from cross edges.
//!
//! Any callback may abort the whole traversal by returning
//! [`ControlFlow::Break`]; the break value is propagated verbatim to the
//! caller, which decides whether it means "found, stop early" or
//! failure.

use std::collections::VecDeque;
use std::hash::Hash;
use std::ops::ControlFlow;

use ahash::AHashMap;

use super::Adjacency;

/// Per-traversal vertex mark. WHITE is represented by absence from the
/// color map, so a fresh map resets every vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    White,
    Grey,
    Black,
}

/// The callback set a traversal is specialized with.
///
/// Every callback defaults to a no-op, so a walker only implements the
/// events it cares about. The breadth-first driver invokes only
/// `on_discover` and `on_finish`; edge classification is specific to
/// depth-first walks.
pub trait Walker<V> {
    /// Value carried out of the traversal on an abort.
    type Break;

    /// A tree edge reached a WHITE vertex. `parent` is `None` for the
    /// root of a traversal tree.
    fn on_discover(&mut self, parent: Option<&V>, vertex: &V) -> ControlFlow<Self::Break> {
        let _ = (parent, vertex);
        ControlFlow::Continue(())
    }

    /// The subtree below `vertex` is complete (DFS), or `vertex` was
    /// dequeued and its neighbors enqueued (BFS).
    fn on_finish(&mut self, parent: Option<&V>, vertex: &V) -> ControlFlow<Self::Break> {
        let _ = (parent, vertex);
        ControlFlow::Continue(())
    }

    /// An edge to a GREY ancestor on the open depth-first path.
    fn on_back_edge(&mut self, source: &V, target: &V) -> ControlFlow<Self::Break> {
        let _ = (source, target);
        ControlFlow::Continue(())
    }

    /// An edge to an already finished (BLACK) vertex.
    fn on_cross_edge(&mut self, source: &V, target: &V) -> ControlFlow<Self::Break> {
        let _ = (source, target);
        ControlFlow::Continue(())
    }
}

/// Traversal drivers, available on every [`Adjacency`] storage.
pub trait Walk: Adjacency {
    /// Walks the whole graph depth-first.
    ///
    /// Vertices are taken as roots in storage-enumeration order,
    /// skipping any vertex already visited from an earlier root, so the
    /// walk covers every vertex exactly once across the resulting
    /// depth-first forest.
    fn walk_depth_first<W>(&self, walker: &mut W) -> ControlFlow<W::Break>
    where
        W: Walker<Self::Vertex>,
        Self: Sized,
    {
        let mut colors = AHashMap::new();
        for root in self.vertices() {
            if !colors.contains_key(root) {
                depth_first_visit(self, &mut colors, walker, root)?;
            }
        }
        ControlFlow::Continue(())
    }

    /// Walks breadth-first from `start`. Vertices with no path from
    /// `start` are never visited; a `start` not in the graph visits
    /// nothing.
    fn walk_breadth_first_from<W>(
        &self,
        start: &Self::Vertex,
        walker: &mut W,
    ) -> ControlFlow<W::Break>
    where
        W: Walker<Self::Vertex>,
        Self: Sized,
    {
        if !self.has_vertex(start) {
            return ControlFlow::Continue(());
        }
        let mut colors = AHashMap::new();
        breadth_first_visit(self, &mut colors, walker, start)
    }

    /// Walks the whole graph breadth-first, starting a new search from
    /// each yet-unvisited vertex in storage-enumeration order. The color
    /// map is shared across searches, so every vertex is discovered and
    /// finished exactly once.
    fn walk_breadth_first<W>(&self, walker: &mut W) -> ControlFlow<W::Break>
    where
        W: Walker<Self::Vertex>,
        Self: Sized,
    {
        let mut colors = AHashMap::new();
        for start in self.vertices() {
            if !colors.contains_key(start) {
                breadth_first_visit(self, &mut colors, walker, start)?;
            }
        }
        ControlFlow::Continue(())
    }
}

impl<S: Adjacency> Walk for S {}

/// One open vertex on the explicit depth-first work stack, with its
/// out-edge iteration position. Replacing recursion with this stack
/// keeps the call depth independent of the input, while reproducing the
/// exact discover/finish order of the recursive formulation.
struct Frame<'g, S: Adjacency + 'g> {
    vertex: &'g S::Vertex,
    parent: Option<&'g S::Vertex>,
    out: S::OutEdges<'g>,
}

fn depth_first_visit<'g, S, W>(
    store: &'g S,
    colors: &mut AHashMap<&'g S::Vertex, Color>,
    walker: &mut W,
    root: &'g S::Vertex,
) -> ControlFlow<W::Break>
where
    S: Adjacency,
    W: Walker<S::Vertex>,
{
    colors.insert(root, Color::Grey);
    walker.on_discover(None, root)?;
    let mut stack = vec![Frame::<S> {
        vertex: root,
        parent: None,
        out: store.out_neighbors(root),
    }];
    while !stack.is_empty() {
        let top = stack.len() - 1;
        let source = stack[top].vertex;
        match stack[top].out.next() {
            Some(target) => match colors.get(target).copied().unwrap_or(Color::White) {
                Color::White => {
                    colors.insert(target, Color::Grey);
                    walker.on_discover(Some(source), target)?;
                    stack.push(Frame {
                        vertex: target,
                        parent: Some(source),
                        out: store.out_neighbors(target),
                    });
                }
                Color::Grey => walker.on_back_edge(source, target)?,
                Color::Black => walker.on_cross_edge(source, target)?,
            },
            None => {
                colors.insert(source, Color::Black);
                let parent = stack[top].parent;
                walker.on_finish(parent, source)?;
                stack.pop();
            }
        }
    }
    ControlFlow::Continue(())
}

fn breadth_first_visit<'g, S, W>(
    store: &'g S,
    colors: &mut AHashMap<&'g S::Vertex, Color>,
    walker: &mut W,
    start: &'g S::Vertex,
) -> ControlFlow<W::Break>
where
    S: Adjacency,
    W: Walker<S::Vertex>,
{
    colors.insert(start, Color::Grey);
    walker.on_discover(None, start)?;
    let mut queue = VecDeque::new();
    queue.push_back((None, start));
    while let Some((parent, vertex)) = queue.pop_front() {
        for target in store.out_neighbors(vertex) {
            if !colors.contains_key(target) {
                colors.insert(target, Color::Grey);
                walker.on_discover(Some(vertex), target)?;
                queue.push_back((Some(vertex), target));
            }
        }
        colors.insert(vertex, Color::Black);
        walker.on_finish(parent, vertex)?;
    }
    ControlFlow::Continue(())
}

/// Discovery and finishing time of one vertex, drawn from the logical
/// clock shared across a whole depth-first walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WalkInfo {
    pub discover: usize,
    pub finish: usize,
}

/// A walker that records per-vertex [`WalkInfo`].
///
/// The recorded intervals satisfy the parenthesis theorem: for any two
/// vertices the `[discover, finish]` intervals are either disjoint or
/// one nests entirely inside the other.
#[derive(Debug, Clone)]
pub struct WalkTimes<V> {
    clock: usize,
    info: AHashMap<V, WalkInfo>,
}

impl<V> WalkTimes<V> {
    pub fn new() -> Self {
        WalkTimes {
            clock: 0,
            info: AHashMap::new(),
        }
    }

    pub fn info(&self, vertex: &V) -> Option<&WalkInfo>
    where
        V: Eq + Hash,
    {
        self.info.get(vertex)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&V, &WalkInfo)> + Clone {
        self.info.iter()
    }

    pub fn len(&self) -> usize {
        self.info.len()
    }

    pub fn is_empty(&self) -> bool {
        self.info.is_empty()
    }
}

impl<V> Default for WalkTimes<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Clone + Eq + Hash> Walker<V> for WalkTimes<V> {
    type Break = ();

    fn on_discover(&mut self, _parent: Option<&V>, vertex: &V) -> ControlFlow<()> {
        self.clock += 1;
        self.info.insert(
            vertex.clone(),
            WalkInfo {
                discover: self.clock,
                finish: 0,
            },
        );
        ControlFlow::Continue(())
    }

    fn on_finish(&mut self, _parent: Option<&V>, vertex: &V) -> ControlFlow<()> {
        self.clock += 1;
        if let Some(info) = self.info.get_mut(vertex) {
            info.finish = self.clock;
        }
        ControlFlow::Continue(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::directed::DiGraph;
    use itertools::Itertools;
    use proptest::prelude::*;

    /// The depth-first example graph from Cormen et.al.
    fn cormen_graph() -> DiGraph<i32> {
        [(1, 2), (1, 4), (2, 5), (3, 5), (3, 6), (4, 2), (5, 4), (6, 6)]
            .into_iter()
            .collect()
    }

    fn nests_or_disjoint(x: &WalkInfo, y: &WalkInfo) -> bool {
        let disjoint = x.finish < y.discover || y.finish < x.discover;
        let x_in_y = y.discover < x.discover && x.finish < y.finish;
        let y_in_x = x.discover < y.discover && y.finish < x.finish;
        disjoint || x_in_y || y_in_x
    }

    #[derive(Default)]
    struct EventLog {
        discovered: Vec<(Option<i32>, i32)>,
        finished: Vec<i32>,
        back: Vec<(i32, i32)>,
        cross: Vec<(i32, i32)>,
    }

    impl Walker<i32> for EventLog {
        type Break = ();

        fn on_discover(&mut self, parent: Option<&i32>, vertex: &i32) -> ControlFlow<()> {
            self.discovered.push((parent.copied(), *vertex));
            ControlFlow::Continue(())
        }

        fn on_finish(&mut self, _parent: Option<&i32>, vertex: &i32) -> ControlFlow<()> {
            self.finished.push(*vertex);
            ControlFlow::Continue(())
        }

        fn on_back_edge(&mut self, source: &i32, target: &i32) -> ControlFlow<()> {
            self.back.push((*source, *target));
            ControlFlow::Continue(())
        }

        fn on_cross_edge(&mut self, source: &i32, target: &i32) -> ControlFlow<()> {
            self.cross.push((*source, *target));
            ControlFlow::Continue(())
        }
    }

    #[test]
    fn depth_first_satisfies_parenthesis_theorem() {
        let graph = cormen_graph();
        let mut times = WalkTimes::new();
        let _ = graph.walk_depth_first(&mut times);
        for ((_, x), (_, y)) in times.iter().tuple_combinations() {
            assert!(nests_or_disjoint(x, y), "overlapping intervals {x:?} {y:?}");
        }
    }

    #[test]
    fn depth_first_visits_every_vertex_once() {
        let graph = cormen_graph();
        let mut log = EventLog::default();
        let _ = graph.walk_depth_first(&mut log);
        assert_eq!(log.discovered.len(), graph.order());
        assert_eq!(log.finished.len(), graph.order());
        let unique: Vec<_> = log.discovered.iter().map(|(_, v)| *v).sorted().collect();
        similar_asserts::assert_eq!(unique, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn depth_first_classifies_edges() {
        let graph = cormen_graph();
        let mut log = EventLog::default();
        let _ = graph.walk_depth_first(&mut log);
        // Roots in insertion order: 1 covers {1,2,5,4}, then 3 covers
        // {3,6}. 4->2 closes a cycle, 6->6 is a self-loop.
        similar_asserts::assert_eq!(log.back, vec![(4, 2), (6, 6)]);
        similar_asserts::assert_eq!(log.cross, vec![(1, 4), (3, 5)]);
    }

    #[test]
    fn circular_graph_terminates() {
        let graph: DiGraph<_> = [(1, 2), (2, 1)].into_iter().collect();
        let mut log = EventLog::default();
        let _ = graph.walk_depth_first(&mut log);
        assert_eq!(log.discovered.len(), 2);
        similar_asserts::assert_eq!(log.back, vec![(2, 1)]);
    }

    struct BreakOn {
        vertex: i32,
        seen: Vec<i32>,
    }

    impl Walker<i32> for BreakOn {
        type Break = i32;

        fn on_discover(&mut self, _parent: Option<&i32>, vertex: &i32) -> ControlFlow<i32> {
            if *vertex == self.vertex {
                return ControlFlow::Break(*vertex);
            }
            self.seen.push(*vertex);
            ControlFlow::Continue(())
        }
    }

    #[test]
    fn abort_stops_depth_first_walk() {
        let graph: DiGraph<_> = [(1, 2), (2, 3), (3, 4)].into_iter().collect();
        let mut walker = BreakOn {
            vertex: 3,
            seen: Vec::new(),
        };
        let outcome = graph.walk_depth_first(&mut walker);
        assert_eq!(outcome, ControlFlow::Break(3));
        similar_asserts::assert_eq!(walker.seen, vec![1, 2]);
    }

    #[test]
    fn abort_stops_breadth_first_walk() {
        let graph: DiGraph<_> = [(1, 2), (1, 3), (2, 4)].into_iter().collect();
        let mut walker = BreakOn {
            vertex: 3,
            seen: Vec::new(),
        };
        let outcome = graph.walk_breadth_first_from(&1, &mut walker);
        assert_eq!(outcome, ControlFlow::Break(3));
        similar_asserts::assert_eq!(walker.seen, vec![1, 2]);
    }

    /// Records the order in which a breadth-first walk finishes
    /// vertices.
    #[derive(Default)]
    struct FinishOrder {
        order: Vec<&'static str>,
    }

    impl Walker<&'static str> for FinishOrder {
        type Break = ();

        fn on_finish(
            &mut self,
            _parent: Option<&&'static str>,
            vertex: &&'static str,
        ) -> ControlFlow<()> {
            self.order.push(*vertex);
            ControlFlow::Continue(())
        }
    }

    /// The Wikipedia BFS example graph, plus an isolated 1->2 component.
    fn wikipedia_graph() -> DiGraph<&'static str> {
        [
            ("a", "b"),
            ("a", "c"),
            ("b", "d"),
            ("b", "e"),
            ("e", "h"),
            ("c", "f"),
            ("c", "g"),
            ("1", "2"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn breadth_first_finishes_in_level_order() {
        let graph = wikipedia_graph();
        let mut walker = FinishOrder::default();
        let _ = graph.walk_breadth_first_from(&"a", &mut walker);

        let rank = |v: &str| {
            walker
                .order
                .iter()
                .position(|w| *w == v)
                .unwrap_or_else(|| panic!("{v} never finished"))
        };
        for (earlier, later) in [
            ("a", "b"),
            ("a", "c"),
            ("b", "d"),
            ("b", "e"),
            ("c", "f"),
            ("c", "g"),
            ("d", "h"),
            ("e", "h"),
            ("f", "h"),
            ("g", "h"),
        ] {
            assert!(rank(earlier) < rank(later), "{earlier} must finish before {later}");
        }
        assert!(!walker.order.contains(&"1"), "unreachable vertex visited");
        assert!(!walker.order.contains(&"2"), "unreachable vertex visited");
    }

    #[test]
    fn breadth_first_order_survives_added_cycle() {
        let mut graph = wikipedia_graph();
        graph.add_edge("h", "a");
        let mut walker = FinishOrder::default();
        let _ = graph.walk_breadth_first_from(&"a", &mut walker);
        let rank = |v: &str| walker.order.iter().position(|w| *w == v).unwrap();
        assert!(rank("a") < rank("b"));
        assert!(rank("a") < rank("c"));
        assert!(rank("b") < rank("d"));
        assert!(rank("e") < rank("h"));
    }

    #[test]
    fn full_breadth_first_finishes_every_vertex_once() {
        let graph = wikipedia_graph();
        let mut walker = FinishOrder::default();
        let _ = graph.walk_breadth_first(&mut walker);
        assert_eq!(walker.order.len(), graph.order());
        let unique: Vec<_> = walker.order.iter().copied().sorted().dedup().collect();
        assert_eq!(unique.len(), graph.order());
    }

    #[test]
    fn breadth_first_from_missing_vertex_visits_nothing() {
        let graph = wikipedia_graph();
        let mut walker = FinishOrder::default();
        let _ = graph.walk_breadth_first_from(&"zzz", &mut walker);
        assert!(walker.order.is_empty());
    }

    fn arbitrary_graph() -> impl Strategy<Value = DiGraph<u8>> {
        proptest::collection::vec((0u8..12, 0u8..12), 0..80)
            .prop_map(|edges| edges.into_iter().collect())
    }

    proptest! {
        #[test]
        fn parenthesis_theorem_holds(graph in arbitrary_graph()) {
            let mut times = WalkTimes::new();
            let _ = graph.walk_depth_first(&mut times);
            prop_assert_eq!(times.len(), graph.order());
            for (_, info) in times.iter() {
                prop_assert!(info.discover < info.finish);
            }
            for ((_, x), (_, y)) in times.iter().tuple_combinations() {
                prop_assert!(nests_or_disjoint(x, y));
            }
        }
    }
}
