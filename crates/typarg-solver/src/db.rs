//! Read-only query surface shared by the finished graph and the builder.

use crate::types::{TypeData, TypeFlags, TypeId};
use typarg_common::Atom;

/// Read access to a type graph.
///
/// Every inference component takes `&dyn TypeDatabase`, so the algorithm
/// never depends on how the graph was produced. Unknown ids behave like an
/// unnamed, non-generic type with no ancestors.
pub trait TypeDatabase {
    fn lookup(&self, id: TypeId) -> Option<&TypeData>;

    fn resolve_atom(&self, atom: Atom) -> &str;

    /// Number of nodes in the graph.
    fn type_count(&self) -> usize;

    fn flags(&self, id: TypeId) -> TypeFlags {
        self.lookup(id).map(|data| data.flags).unwrap_or_default()
    }

    fn generic_args(&self, id: TypeId) -> &[TypeId] {
        self.lookup(id)
            .map(|data| data.generic_args.as_slice())
            .unwrap_or(&[])
    }

    fn base_type(&self, id: TypeId) -> Option<TypeId> {
        self.lookup(id).and_then(|data| data.base)
    }

    fn interfaces(&self, id: TypeId) -> &[TypeId] {
        self.lookup(id)
            .map(|data| data.interfaces.as_slice())
            .unwrap_or(&[])
    }

    fn generic_definition(&self, id: TypeId) -> Option<TypeId> {
        self.lookup(id).and_then(|data| data.generic_definition)
    }

    fn is_generic(&self, id: TypeId) -> bool {
        !self.generic_args(id).is_empty()
    }

    fn is_type_parameter(&self, id: TypeId) -> bool {
        self.flags(id).contains(TypeFlags::TYPE_PARAMETER)
    }

    fn is_generic_definition(&self, id: TypeId) -> bool {
        self.flags(id).contains(TypeFlags::GENERIC_DEFINITION)
    }

    fn type_name(&self, id: TypeId) -> &str {
        self.lookup(id)
            .map(|data| self.resolve_atom(data.name))
            .unwrap_or("")
    }
}
