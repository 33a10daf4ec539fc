//! Ancestor resolution.
//!
//! The ancestors of a concrete type are the type itself, every type on its
//! base chain and every interface it implements. `get_ancestor` picks the
//! single ancestor that has a required shape: a specific type, or any
//! instantiation of an open generic definition.

use crate::FxIndexSet;
use crate::db::TypeDatabase;
use crate::evaluate::PathError;
use crate::types::TypeId;
use smallvec::SmallVec;

/// Strip the generic arguments of an instantiation: `Box<T>` becomes `Box<_>`.
pub fn as_unbound(db: &dyn TypeDatabase, ty: TypeId) -> TypeId {
    if db.is_generic(ty) {
        db.generic_definition(ty).unwrap_or(ty)
    } else {
        ty
    }
}

/// Iterator over the base chain of a type, nearest base first.
pub struct BaseChain<'a> {
    db: &'a dyn TypeDatabase,
    next: Option<TypeId>,
    /// Steps left before giving up; a finished graph is acyclic, so this
    /// only matters for a database that was never validated.
    remaining: usize,
}

impl Iterator for BaseChain<'_> {
    type Item = TypeId;

    fn next(&mut self) -> Option<TypeId> {
        let current = self.next?;
        if self.remaining == 0 {
            self.next = None;
            return None;
        }
        self.remaining -= 1;
        self.next = self.db.base_type(current);
        Some(current)
    }
}

/// The base chain of `ty`, excluding `ty` itself.
pub fn base_chain(db: &dyn TypeDatabase, ty: TypeId) -> BaseChain<'_> {
    BaseChain {
        db,
        next: db.base_type(ty),
        remaining: db.type_count(),
    }
}

/// `ty` followed by its base chain.
pub fn self_and_bases(db: &dyn TypeDatabase, ty: TypeId) -> impl Iterator<Item = TypeId> + '_ {
    std::iter::once(ty).chain(base_chain(db, ty))
}

/// Find the unique ancestor of `concrete` matching `shape`.
///
/// - A type-parameter shape places no constraint: `concrete` is returned.
/// - A non-generic shape matches by identity.
/// - An open generic definition matches every ancestor instantiating it.
///
/// Returns `Ok(None)` when nothing matches and `PathError::AmbiguousAncestor`
/// when more than one ancestor does, e.g. a type implementing both
/// `IEnumerable<int>` and `IEnumerable<string>` against `IEnumerable<_>`.
pub fn get_ancestor(
    db: &dyn TypeDatabase,
    concrete: TypeId,
    shape: TypeId,
) -> Result<Option<TypeId>, PathError> {
    if db.is_type_parameter(shape) {
        return Ok(Some(concrete));
    }

    let open_shape = db.is_generic_definition(shape);
    let matches_shape = |candidate: TypeId| {
        if open_shape {
            db.is_generic(candidate) && db.generic_definition(candidate) == Some(shape)
        } else {
            candidate == shape
        }
    };

    let mut candidates: FxIndexSet<TypeId> = FxIndexSet::default();
    candidates.extend(self_and_bases(db, concrete));
    candidates.extend(db.interfaces(concrete).iter().copied());

    let matches: SmallVec<[TypeId; 2]> = candidates
        .into_iter()
        .filter(|&candidate| matches_shape(candidate))
        .collect();
    match matches.as_slice() {
        [] => Ok(None),
        [single] => Ok(Some(*single)),
        _ => Err(PathError::AmbiguousAncestor {
            concrete,
            shape,
            matches: matches.into_vec(),
        }),
    }
}

#[cfg(test)]
#[path = "../tests/ancestor_tests.rs"]
mod tests;
