//! Centralized limits for type graph construction.
//!
//! The inference algorithm itself needs no limits: path discovery only walks
//! the finite generic-argument tree of a template, and ancestor lookup only
//! walks an acyclic base chain. The limits below bound the *builder*, which
//! expands base and interface links of generic definitions into concrete
//! instantiations.

/// Maximum generic nesting depth of an instantiation created by substitution.
///
/// A definition such as `class Node<T> : Base<Node<Node<T>>>` would otherwise
/// expand forever while its base links are materialized. Exceeding this depth
/// makes `TypeGraphBuilder::finish` fail with `GraphError::InstantiationTooDeep`.
pub const MAX_INSTANTIATION_DEPTH: u32 = 50;

/// Maximum number of instantiations materialized by one `finish` call.
pub const MAX_INSTANTIATIONS: usize = 100_000;
