//! Path evaluation against concrete argument types.

use crate::ancestor::{as_unbound, get_ancestor};
use crate::db::TypeDatabase;
use crate::path::{ArgumentPath, PositionedPath};
use crate::types::TypeId;
use tracing::trace;

/// Why a single path could not be evaluated.
///
/// Carries raw `TypeId`s; the inferer renders them into a `FailureReason`
/// once it knows which type parameter the path belonged to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PathError {
    /// No ancestor of `concrete` has the shape of the path's root.
    NoMatchingAncestor { concrete: TypeId, shape: TypeId },
    /// Several ancestors of `concrete` have the shape of the path's root.
    AmbiguousAncestor {
        concrete: TypeId,
        shape: TypeId,
        matches: Vec<TypeId>,
    },
    /// The path steps into the generic arguments of a non-generic type.
    NotGeneric { ty: TypeId, depth: usize },
    /// The path index lies beyond the type's generic arity.
    ArityMismatch { ty: TypeId, index: u32 },
}

/// Resolve the concrete type reached by following `path` into `concrete`.
///
/// The root shape is first matched against the ancestors of `concrete`, so
/// `Box<T>` evaluated against `DerivedBox<string>` walks from `Box<string>`.
pub fn evaluate_path(
    db: &dyn TypeDatabase,
    path: &ArgumentPath,
    concrete: TypeId,
) -> Result<TypeId, PathError> {
    let shape = as_unbound(db, path.root());
    let ancestor = get_ancestor(db, concrete, shape)?
        .ok_or(PathError::NoMatchingAncestor { concrete, shape })?;

    let mut current = ancestor;
    for (depth, &index) in path.indices().iter().enumerate() {
        let args = db.generic_args(current);
        if args.is_empty() {
            return Err(PathError::NotGeneric { ty: current, depth });
        }
        current = *args
            .get(index as usize)
            .ok_or(PathError::ArityMismatch { ty: current, index })?;
    }

    trace!(
        concrete = concrete.0,
        ancestor = ancestor.0,
        result = current.0,
        "evaluate_path"
    );
    Ok(current)
}

impl PositionedPath {
    /// Evaluate against the argument type at this path's parameter index.
    /// Returns `None` when the index is outside `argument_types`.
    pub fn evaluate(
        &self,
        db: &dyn TypeDatabase,
        argument_types: &[TypeId],
    ) -> Option<Result<TypeId, PathError>> {
        let concrete = *argument_types.get(self.parameter_index)?;
        Some(evaluate_path(db, &self.path, concrete))
    }
}

#[cfg(test)]
#[path = "../tests/evaluate_tests.rs"]
mod tests;
