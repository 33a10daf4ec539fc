//! Type-parameter occurrence paths.
//!
//! An `ArgumentPath` says how to reach one occurrence of a type parameter
//! inside a formal parameter type: the root shape in which the occurrence
//! was found, and the generic-argument indices to descend through. For the
//! formal type `Dictionary<K, List<V>>` the occurrence of `V` has path
//! `[1, 0]` rooted at `Dictionary<K, List<V>>`.
//!
//! Paths only descend into generic-argument positions of the template.
//! Base types and interfaces of the template are never visited; widening to
//! ancestors happens when a path is evaluated against a concrete type.

use crate::db::TypeDatabase;
use crate::types::TypeId;
use smallvec::SmallVec;

pub type PathIndices = SmallVec<[u32; 4]>;

/// Occurrence path of a type parameter inside one unbound type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ArgumentPath {
    root: TypeId,
    indices: PathIndices,
}

impl ArgumentPath {
    pub fn new(root: TypeId, indices: impl IntoIterator<Item = u32>) -> Self {
        Self {
            root,
            indices: indices.into_iter().collect(),
        }
    }

    /// The top-level unbound type the path was found in.
    pub fn root(&self) -> TypeId {
        self.root
    }

    /// Generic-argument indices, root to leaf.
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// True when the root itself is the type parameter.
    pub fn is_bare(&self) -> bool {
        self.indices.is_empty()
    }
}

/// An `ArgumentPath` tagged with the formal parameter it belongs to.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PositionedPath {
    pub parameter_index: usize,
    pub path: ArgumentPath,
}

/// Find every occurrence of `target` inside `unbound`.
///
/// Uses an explicit work-stack so arbitrarily deep generic nesting cannot
/// exhaust the call stack. Paths come out in depth-first, left-to-right
/// order of the generic arguments.
pub fn find_paths(db: &dyn TypeDatabase, unbound: TypeId, target: TypeId) -> Vec<ArgumentPath> {
    if unbound == target {
        return vec![ArgumentPath::new(target, [])];
    }

    let mut paths = Vec::new();
    let mut stack: Vec<(TypeId, PathIndices)> = vec![(unbound, PathIndices::new())];
    while let Some((ty, prefix)) = stack.pop() {
        if ty == target {
            paths.push(ArgumentPath {
                root: unbound,
                indices: prefix,
            });
            continue;
        }

        // Reverse push keeps the first argument on top of the stack.
        for (index, &arg) in db.generic_args(ty).iter().enumerate().rev() {
            let mut indices = prefix.clone();
            indices.push(index as u32);
            stack.push((arg, indices));
        }
    }
    paths
}

/// Find every occurrence of `target` across a list of formal parameter types.
pub fn find_positioned_paths(
    db: &dyn TypeDatabase,
    formal_types: &[TypeId],
    target: TypeId,
) -> Vec<PositionedPath> {
    formal_types
        .iter()
        .enumerate()
        .flat_map(|(parameter_index, &formal)| {
            find_paths(db, formal, target)
                .into_iter()
                .map(move |path| PositionedPath {
                    parameter_index,
                    path,
                })
        })
        .collect()
}

#[cfg(test)]
#[path = "../tests/path_tests.rs"]
mod tests;
