//! Generic type argument inference over reflected type metadata.
//!
//! This crate bundles the workspace crates behind one import:
//!
//! - [`typarg_solver`]: the type graph, path finding, ancestor resolution
//!   and the inferer itself
//! - [`typarg_common`]: name interning and graph limits
//! - [`tracing_config`]: opt-in log output for hosts and tests
//!
//! ```
//! use typarg::{MethodTemplate, TypeGraphBuilder, infer_type_arguments};
//!
//! let mut builder = TypeGraphBuilder::new();
//! let int = builder.class("int");
//! let t = builder.method_type_params(&["T"]);
//! let identity = MethodTemplate::new("Identity", t.clone(), vec![t[0]]);
//! let graph = builder.finish().unwrap();
//!
//! let result = infer_type_arguments(&graph, &identity, &[int]).unwrap();
//! assert_eq!(result.type_arguments(), vec![int]);
//! ```

// Re-export the solver as the public inference API
pub use typarg_solver::*;

// Shared primitives
pub use typarg_common::{Atom, Interner, limits};

// Log output (TYPARG_LOG / TYPARG_LOG_FORMAT)
pub mod tracing_config;
pub use tracing_config::{LogFormat, init_tracing};
