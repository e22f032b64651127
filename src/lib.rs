//! # Graphwalk
//!
//! Graphwalk is a library for working with directed graphs. A single
//! generalized traversal engine drives depth-first and breadth-first
//! walks through a walker callback protocol, and the classic algorithms
//! are thin specializations of it: topological sorting, unweighted
//! shortest paths, and strongly-connected-component decomposition via
//! Tarjan's algorithm.
//!
//! A standalone disjoint-set forest is included for equivalence-class
//! bookkeeping, for example when post-processing component results.

pub mod directed;
pub mod union_find;
