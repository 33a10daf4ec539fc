//! Immutable type graph and its builder.
//!
//! The graph is the read-only snapshot every inference call works against.
//! It is produced once by `TypeGraphBuilder::finish`, which
//!
//! 1. rejects inheritance cycles,
//! 2. gives every instantiation the base type and interfaces of its
//!    definition, with the definition's type parameters substituted
//!    (`DerivedBox<string>` gets base `Box<string>` from `DerivedBox<T> : Box<T>`),
//! 3. flattens interface sets so each type lists every interface it
//!    implements, directly or through its base chain.
//!
//! After `finish` nothing is ever mutated, so a `TypeGraph` can be shared
//! freely between threads.

use crate::FxIndexSet;
use crate::db::TypeDatabase;
use crate::format::TypeFormatter;
use crate::types::{TypeData, TypeFlags, TypeId, TypeList};
use rustc_hash::FxHashMap;
use thiserror::Error;
use tracing::{debug, trace};
use typarg_common::limits::{MAX_INSTANTIATION_DEPTH, MAX_INSTANTIATIONS};
use typarg_common::{Atom, Interner};

/// Errors raised while building a type graph.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("{0:?} does not belong to this graph")]
    UnknownType(TypeId),

    #[error("`{name}` is not an open generic definition")]
    NotGenericDefinition { name: String },

    #[error("`{name}` expects {expected} generic argument(s), found {actual}")]
    ArityMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },

    #[error("`{base}` cannot be the base type of `{ty}`: {reason}")]
    InvalidBase {
        ty: String,
        base: String,
        reason: &'static str,
    },

    #[error("`{interface}` cannot be implemented by `{ty}`: {reason}")]
    InvalidInterface {
        ty: String,
        interface: String,
        reason: &'static str,
    },

    #[error("inheritance cycle through `{name}`")]
    InheritanceCycle { name: String },

    #[error("instantiating `{name}` exceeds the generic nesting limit of {limit}")]
    InstantiationTooDeep { name: String, limit: u32 },

    #[error("more than {limit} instantiations were materialized")]
    TooManyInstantiations { limit: usize },
}

// =============================================================================
// TypeGraph
// =============================================================================

/// Finished, immutable type graph.
#[derive(Clone, Debug)]
pub struct TypeGraph {
    types: Vec<TypeData>,
    names: Interner,
    /// Named declarations (classes, interfaces, generic definitions).
    declared: FxHashMap<Atom, TypeId>,
    instantiations: FxHashMap<(TypeId, TypeList), TypeId>,
}

impl TypeGraph {
    pub fn get(&self, id: TypeId) -> Option<&TypeData> {
        self.types.get(id.index())
    }

    /// Look up a declared class, interface or generic definition by name.
    pub fn lookup_name(&self, name: &str) -> Option<TypeId> {
        let atom = self.names.get(name)?;
        self.declared.get(&atom).copied()
    }

    /// Look up an existing instantiation of `definition`.
    ///
    /// Passing the definition's own type parameters yields the definition.
    pub fn instantiation(&self, definition: TypeId, args: &[TypeId]) -> Option<TypeId> {
        if self.type_params(definition) == args && !args.is_empty() {
            return Some(definition);
        }
        self.instantiations
            .get(&(definition, TypeList::from_slice(args)))
            .copied()
    }

    /// Type parameters of an open generic definition (empty otherwise).
    pub fn type_params(&self, definition: TypeId) -> &[TypeId] {
        match self.get(definition) {
            Some(data) if data.is_generic_definition() => &data.generic_args,
            _ => &[],
        }
    }

    pub fn display(&self, id: TypeId) -> String {
        TypeFormatter::new(self).format(id)
    }
}

impl TypeDatabase for TypeGraph {
    fn lookup(&self, id: TypeId) -> Option<&TypeData> {
        self.types.get(id.index())
    }

    fn resolve_atom(&self, atom: Atom) -> &str {
        self.names.resolve(atom)
    }

    fn type_count(&self) -> usize {
        self.types.len()
    }
}

// =============================================================================
// TypeGraphBuilder
// =============================================================================

/// Builder for a `TypeGraph`.
///
/// ```
/// use typarg_solver::TypeGraphBuilder;
///
/// let mut builder = TypeGraphBuilder::new();
/// let string = builder.class("string");
/// let boxed = builder.generic_class("Box", &["T"]);
/// let derived = builder.generic_class("DerivedBox", &["T"]);
/// let derived_t = builder.type_params(derived)[0];
/// let box_of_t = builder.instantiate(boxed, &[derived_t]).unwrap();
/// builder.set_base(derived, box_of_t).unwrap();
/// let derived_string = builder.instantiate(derived, &[string]).unwrap();
///
/// let graph = builder.finish().unwrap();
/// assert_eq!(graph.display(derived_string), "DerivedBox<string>");
/// ```
#[derive(Debug, Default)]
pub struct TypeGraphBuilder {
    types: Vec<TypeData>,
    /// Generic nesting depth per type, parallel to `types`.
    depths: Vec<u32>,
    names: Interner,
    declared: FxHashMap<Atom, TypeId>,
    instantiations: FxHashMap<(TypeId, TypeList), TypeId>,
}

impl TypeGraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, data: TypeData, depth: u32) -> TypeId {
        let id = TypeId(self.types.len() as u32);
        self.types.push(data);
        self.depths.push(depth);
        id
    }

    fn data(&self, id: TypeId) -> Result<&TypeData, GraphError> {
        self.types.get(id.index()).ok_or(GraphError::UnknownType(id))
    }

    fn display(&self, id: TypeId) -> String {
        TypeFormatter::new(self).format(id)
    }

    fn declare(&mut self, name: &str, flags: TypeFlags, params: &[&str]) -> TypeId {
        let atom = self.names.intern(name);
        let id = self.push(TypeData::declared(atom, flags), 0);
        if !params.is_empty() {
            let args: TypeList = params
                .iter()
                .enumerate()
                .map(|(position, param)| self.type_parameter(param, position as u32))
                .collect();
            let data = &mut self.types[id.index()];
            data.flags |= TypeFlags::GENERIC_DEFINITION;
            data.generic_args = args;
            data.generic_definition = Some(id);
        }
        // First declaration wins for name lookup.
        self.declared.entry(atom).or_insert(id);
        id
    }

    /// Declare a non-generic class.
    pub fn class(&mut self, name: &str) -> TypeId {
        self.declare(name, TypeFlags::empty(), &[])
    }

    /// Declare a non-generic interface.
    pub fn interface(&mut self, name: &str) -> TypeId {
        self.declare(name, TypeFlags::INTERFACE, &[])
    }

    /// Declare an open generic class definition with the given type parameters.
    pub fn generic_class(&mut self, name: &str, params: &[&str]) -> TypeId {
        self.declare(name, TypeFlags::empty(), params)
    }

    /// Declare an open generic interface definition with the given type parameters.
    pub fn generic_interface(&mut self, name: &str, params: &[&str]) -> TypeId {
        self.declare(name, TypeFlags::INTERFACE, params)
    }

    /// Create a bare type-parameter placeholder.
    pub fn type_parameter(&mut self, name: &str, position: u32) -> TypeId {
        let atom = self.names.intern(name);
        let mut data = TypeData::declared(atom, TypeFlags::TYPE_PARAMETER);
        data.position = Some(position);
        self.push(data, 0)
    }

    /// Create the type parameters of a generic method, in declaration order.
    pub fn method_type_params(&mut self, names: &[&str]) -> Vec<TypeId> {
        names
            .iter()
            .enumerate()
            .map(|(position, name)| self.type_parameter(name, position as u32))
            .collect()
    }

    /// Type parameters of an open generic definition (empty otherwise).
    pub fn type_params(&self, definition: TypeId) -> &[TypeId] {
        match self.types.get(definition.index()) {
            Some(data) if data.is_generic_definition() => &data.generic_args,
            _ => &[],
        }
    }

    pub fn lookup_name(&self, name: &str) -> Option<TypeId> {
        let atom = self.names.get(name)?;
        self.declared.get(&atom).copied()
    }

    /// Instantiate an open generic definition. Instantiations are
    /// deduplicated: the same definition and arguments always yield the
    /// same `TypeId`.
    pub fn instantiate(&mut self, definition: TypeId, args: &[TypeId]) -> Result<TypeId, GraphError> {
        let def = self.data(definition)?;
        if !def.is_generic_definition() {
            return Err(GraphError::NotGenericDefinition {
                name: self.display(definition),
            });
        }
        if def.generic_args.len() != args.len() {
            return Err(GraphError::ArityMismatch {
                name: self.display(definition),
                expected: def.generic_args.len(),
                actual: args.len(),
            });
        }
        if def.generic_args.as_slice() == args {
            return Ok(definition);
        }
        let (name, flags) = (def.name, def.flags - TypeFlags::GENERIC_DEFINITION);

        let mut depth = 0;
        for &arg in args {
            self.data(arg)?;
            depth = depth.max(self.depths[arg.index()]);
        }
        let key = (definition, TypeList::from_slice(args));
        if let Some(&existing) = self.instantiations.get(&key) {
            return Ok(existing);
        }

        let depth = depth + 1;
        if depth > MAX_INSTANTIATION_DEPTH {
            return Err(GraphError::InstantiationTooDeep {
                name: self.display(definition),
                limit: MAX_INSTANTIATION_DEPTH,
            });
        }
        if self.instantiations.len() >= MAX_INSTANTIATIONS {
            return Err(GraphError::TooManyInstantiations {
                limit: MAX_INSTANTIATIONS,
            });
        }

        let data = TypeData {
            name,
            flags,
            position: None,
            generic_args: key.1.clone(),
            base: None,
            interfaces: TypeList::new(),
            generic_definition: Some(definition),
        };
        let id = self.push(data, depth);
        self.instantiations.insert(key, id);
        trace!(id = id.0, depth, "TypeGraphBuilder::instantiate");
        Ok(id)
    }

    /// Set the direct base type of a declared class or generic class
    /// definition. The base of a generic definition may mention the
    /// definition's own type parameters.
    pub fn set_base(&mut self, ty: TypeId, base: TypeId) -> Result<(), GraphError> {
        let data = self.data(ty)?;
        let base_data = self.data(base)?;
        let reason = if data.is_interface() {
            Some("interfaces have no base type")
        } else if data.is_type_parameter() {
            Some("type parameters have no base type")
        } else if data.is_instantiation() {
            Some("instantiations inherit the base type of their definition")
        } else if base_data.is_interface() {
            Some("an interface cannot be a base type")
        } else if base_data.is_type_parameter() {
            Some("a type parameter cannot be a base type")
        } else if base_data.is_generic_definition() {
            Some("an open generic definition cannot be a base type")
        } else {
            None
        };
        if let Some(reason) = reason {
            return Err(GraphError::InvalidBase {
                ty: self.display(ty),
                base: self.display(base),
                reason,
            });
        }

        self.types[ty.index()].base = Some(base);
        Ok(())
    }

    /// Declare that `ty` directly implements (or, for an interface, extends)
    /// `interface`.
    pub fn add_interface(&mut self, ty: TypeId, interface: TypeId) -> Result<(), GraphError> {
        let data = self.data(ty)?;
        let iface = self.data(interface)?;
        let reason = if data.is_type_parameter() {
            Some("type parameters implement nothing")
        } else if data.is_instantiation() {
            Some("instantiations inherit the interfaces of their definition")
        } else if !iface.is_interface() {
            Some("not an interface")
        } else if iface.is_generic_definition() {
            Some("an open generic definition cannot be implemented")
        } else {
            None
        };
        if let Some(reason) = reason {
            return Err(GraphError::InvalidInterface {
                ty: self.display(ty),
                interface: self.display(interface),
                reason,
            });
        }

        let interfaces = &mut self.types[ty.index()].interfaces;
        if !interfaces.contains(&interface) {
            interfaces.push(interface);
        }
        Ok(())
    }

    /// Validate and freeze the graph.
    pub fn finish(mut self) -> Result<TypeGraph, GraphError> {
        self.check_inheritance_cycles()?;
        self.materialize_instantiations()?;

        let flattened = self.flatten_interfaces();
        for (data, interfaces) in self.types.iter_mut().zip(flattened) {
            data.interfaces = interfaces;
        }

        debug!(
            types = self.types.len(),
            instantiations = self.instantiations.len(),
            "TypeGraphBuilder::finish"
        );
        Ok(TypeGraph {
            types: self.types,
            names: self.names,
            declared: self.declared,
            instantiations: self.instantiations,
        })
    }

    fn definition_of(&self, id: TypeId) -> TypeId {
        self.types[id.index()].generic_definition.unwrap_or(id)
    }

    /// Declared supertypes of a node, mapped to their definitions.
    fn declared_supertypes(&self, index: usize) -> Vec<usize> {
        let data = &self.types[index];
        data.base
            .iter()
            .chain(data.interfaces.iter())
            .map(|&ty| self.definition_of(ty).index())
            .collect()
    }

    /// Inheritance links are declared on definitions only, so a cycle among
    /// instantiations always shows up as a cycle among definitions.
    fn check_inheritance_cycles(&self) -> Result<(), GraphError> {
        #[derive(Clone, Copy, PartialEq, Eq)]
        enum Mark {
            Unvisited,
            Active,
            Done,
        }

        let mut marks = vec![Mark::Unvisited; self.types.len()];
        for start in 0..self.types.len() {
            if marks[start] != Mark::Unvisited {
                continue;
            }
            marks[start] = Mark::Active;
            let mut stack = vec![(start, self.declared_supertypes(start))];
            while let Some((node, pending)) = stack.last_mut() {
                let node = *node;
                match pending.pop() {
                    Some(next) => match marks[next] {
                        Mark::Active => {
                            return Err(GraphError::InheritanceCycle {
                                name: self.display(TypeId(next as u32)),
                            });
                        }
                        Mark::Unvisited => {
                            marks[next] = Mark::Active;
                            stack.push((next, self.declared_supertypes(next)));
                        }
                        Mark::Done => {}
                    },
                    None => {
                        marks[node] = Mark::Done;
                        stack.pop();
                    }
                }
            }
        }
        Ok(())
    }

    /// Give every instantiation the substituted base type and interfaces of
    /// its definition. Substitution can create further instantiations; they
    /// are appended to `types` and picked up by the same loop.
    fn materialize_instantiations(&mut self) -> Result<(), GraphError> {
        let mut index = 0;
        while index < self.types.len() {
            let data = &self.types[index];
            if let (true, Some(definition)) = (data.is_instantiation(), data.generic_definition) {
                let def = &self.types[definition.index()];
                let substitution: FxHashMap<TypeId, TypeId> = def
                    .generic_args
                    .iter()
                    .copied()
                    .zip(data.generic_args.iter().copied())
                    .collect();
                let declared_base = def.base;
                let declared_interfaces = def.interfaces.clone();

                let base = match declared_base {
                    Some(base) => Some(self.substitute(base, &substitution)?),
                    None => None,
                };
                let mut interfaces = TypeList::with_capacity(declared_interfaces.len());
                for iface in declared_interfaces {
                    interfaces.push(self.substitute(iface, &substitution)?);
                }

                let data = &mut self.types[index];
                data.base = base;
                data.interfaces = interfaces;
            }
            index += 1;
        }
        Ok(())
    }

    fn substitute(
        &mut self,
        ty: TypeId,
        substitution: &FxHashMap<TypeId, TypeId>,
    ) -> Result<TypeId, GraphError> {
        if let Some(&mapped) = substitution.get(&ty) {
            return Ok(mapped);
        }
        // A definition used as a type denotes itself applied to its own
        // parameters, so its arguments are substituted like any other.
        let data = self.data(ty)?;
        let (definition, args) = match data.generic_definition {
            Some(definition) => (definition, data.generic_args.clone()),
            None => return Ok(ty),
        };

        let mut changed = false;
        let mut substituted = TypeList::with_capacity(args.len());
        for arg in args {
            let new_arg = self.substitute(arg, substitution)?;
            changed |= new_arg != arg;
            substituted.push(new_arg);
        }
        if !changed {
            return Ok(ty);
        }
        self.instantiate(definition, &substituted)
    }

    /// Every type's interfaces, direct and inherited, in first-seen order.
    ///
    /// Supertypes are flattened before their subtypes using an explicit
    /// stack. Runs after `check_inheritance_cycles`, so the links form a DAG.
    fn flatten_interfaces(&self) -> Vec<TypeList> {
        let mut memo: Vec<Option<TypeList>> = vec![None; self.types.len()];
        let mut stack: Vec<(usize, bool)> = Vec::new();
        for root in 0..self.types.len() {
            stack.push((root, false));
            while let Some((index, supertypes_done)) = stack.pop() {
                if memo[index].is_some() {
                    continue;
                }
                let data = &self.types[index];
                if !supertypes_done {
                    stack.push((index, true));
                    let pending = data
                        .interfaces
                        .iter()
                        .chain(data.base.iter())
                        .filter(|ty| memo[ty.index()].is_none())
                        .map(|ty| (ty.index(), false));
                    stack.extend(pending);
                    continue;
                }

                let mut set: FxIndexSet<TypeId> = FxIndexSet::default();
                set.extend(data.interfaces.iter().copied());
                for iface in &data.interfaces {
                    set.extend(memo[iface.index()].iter().flatten().copied());
                }
                if let Some(base) = data.base {
                    set.extend(memo[base.index()].iter().flatten().copied());
                }
                memo[index] = Some(set.into_iter().collect());
            }
        }
        memo.into_iter().map(Option::unwrap_or_default).collect()
    }
}

impl TypeDatabase for TypeGraphBuilder {
    fn lookup(&self, id: TypeId) -> Option<&TypeData> {
        self.types.get(id.index())
    }

    fn resolve_atom(&self, atom: Atom) -> &str {
        self.names.resolve(atom)
    }

    fn type_count(&self) -> usize {
        self.types.len()
    }
}

#[cfg(test)]
#[path = "../tests/graph_tests.rs"]
mod tests;
