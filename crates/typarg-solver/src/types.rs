//! Type graph node representation.
//!
//! A `TypeId` is a handle into a `TypeGraph`. Two handles are equal exactly
//! when they denote the same type, so identity comparison is an integer
//! comparison. The payload behind a handle is a `TypeData` node.

use bitflags::bitflags;
use smallvec::SmallVec;
use typarg_common::Atom;

/// Handle to a node of a type graph.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(pub u32);

impl TypeId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Inline storage for generic argument lists; almost every generic type has
/// one to three arguments.
pub type TypeList = SmallVec<[TypeId; 4]>;

bitflags! {
    /// Classification bits of a type node.
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
    pub struct TypeFlags: u8 {
        /// The type is an interface (can only appear in interface sets).
        const INTERFACE = 1 << 0;
        /// The type is a bare type-parameter placeholder.
        const TYPE_PARAMETER = 1 << 1;
        /// The type is an open generic definition (`Box<_>`). Its generic
        /// arguments are its own type parameters.
        const GENERIC_DEFINITION = 1 << 2;
    }
}

/// One node of the type graph.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeData {
    /// Simple name used for diagnostics.
    pub name: Atom,
    pub flags: TypeFlags,
    /// Declaration position for type parameters.
    pub position: Option<u32>,
    /// Generic arguments, in declaration order. Empty for non-generic types.
    pub generic_args: TypeList,
    /// Direct base type. Interfaces and type parameters have none.
    pub base: Option<TypeId>,
    /// Implemented interfaces. In a finished graph this set is flattened:
    /// it includes interfaces inherited through the base chain and through
    /// other interfaces.
    pub interfaces: TypeList,
    /// The open generic definition this type instantiates. An open
    /// definition points at itself.
    pub generic_definition: Option<TypeId>,
}

impl TypeData {
    pub(crate) fn declared(name: Atom, flags: TypeFlags) -> Self {
        Self {
            name,
            flags,
            position: None,
            generic_args: TypeList::new(),
            base: None,
            interfaces: TypeList::new(),
            generic_definition: None,
        }
    }

    #[inline]
    pub fn is_generic(&self) -> bool {
        !self.generic_args.is_empty()
    }

    #[inline]
    pub fn is_type_parameter(&self) -> bool {
        self.flags.contains(TypeFlags::TYPE_PARAMETER)
    }

    #[inline]
    pub fn is_interface(&self) -> bool {
        self.flags.contains(TypeFlags::INTERFACE)
    }

    #[inline]
    pub fn is_generic_definition(&self) -> bool {
        self.flags.contains(TypeFlags::GENERIC_DEFINITION)
    }

    /// True for a closed or partially bound instantiation of a definition.
    #[inline]
    pub fn is_instantiation(&self) -> bool {
        self.generic_definition.is_some() && !self.is_generic_definition()
    }
}
