//! Generic type argument inference over an immutable type graph.
//!
//! Given a generic method template and the concrete types of the arguments
//! at a call site, infer one concrete type per type parameter, the way a
//! compiler infers unannotated generic calls, but against type metadata
//! gathered at runtime.
//!
//! - **`TypeGraph`**: immutable snapshot of types, their generic arguments,
//!   base chains and flattened interface sets (`TypeGraphBuilder`, `schema`)
//! - **PathFinder** (`path`): where each type parameter occurs in the formal
//!   parameter types
//! - **AncestorResolver** (`ancestor`): which ancestor of a concrete type has
//!   the shape of a formal type
//! - **PathEvaluator** (`evaluate`): the concrete type an occurrence maps to
//! - **Inferer** (`infer`): reconciles all occurrences into one binding per
//!   type parameter
//!
//! Inference is a pure function of its inputs. The graph is never mutated
//! after `finish`, so any number of threads may infer against it at once.

pub mod ancestor;
mod db;
mod diagnostics;
pub mod evaluate;
mod format;
pub mod graph;
pub mod infer;
pub mod path;
pub mod schema;
pub mod types;

pub use ancestor::{as_unbound, base_chain, get_ancestor};
pub use db::TypeDatabase;
pub use diagnostics::{ErrorKind, FailureReason, InferenceError, ParameterFailure};
pub use evaluate::{PathError, evaluate_path};
pub use format::TypeFormatter;
pub use graph::{GraphError, TypeGraph, TypeGraphBuilder};
pub use infer::{
    InferenceOptions, InferenceResult, MethodTemplate, Reconciliation, TypeArgumentInferer,
    infer_type_arguments, nearest_common_base,
};
pub use path::{ArgumentPath, PositionedPath, find_paths, find_positioned_paths};
pub use schema::{LoadedSchema, SchemaError, SchemaLoader, TypeExpr, TypeSchema};
pub use types::{TypeData, TypeFlags, TypeId, TypeList};

pub(crate) type FxIndexSet<T> = indexmap::IndexSet<T, rustc_hash::FxBuildHasher>;

#[cfg(test)]
#[path = "../tests/test_support.rs"]
mod test_support;
