//! Inference diagnostics.
//!
//! Every failure is rendered with type names rather than raw ids, so an
//! error outlives the graph it was produced from and can be logged or
//! returned to a caller as is.

use crate::db::TypeDatabase;
use crate::evaluate::PathError;
use crate::format::TypeFormatter;
use std::fmt;
use thiserror::Error;

/// Coarse classification of an inference failure.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    ArgumentCount,
    NoMatchingAncestor,
    AmbiguousAncestor,
    NotGeneric,
    ArityMismatch,
    AmbiguousInference,
    UnresolvableInference,
}

/// Why one type parameter could not be bound.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum FailureReason {
    #[error("`{argument}` has no ancestor matching `{shape}`")]
    NoMatchingAncestor { argument: String, shape: String },

    #[error("`{argument}` has several ancestors matching `{shape}`: {}", .matches.join(", "))]
    AmbiguousAncestor {
        argument: String,
        shape: String,
        matches: Vec<String>,
    },

    #[error("`{ty}` is not generic but the occurrence lies {depth} level(s) below it")]
    NotGeneric { ty: String, depth: usize },

    #[error("generic argument {index} is out of range for `{ty}`")]
    ArityMismatch { ty: String, index: u32 },

    #[error("conflicting inferences {}", .candidates.join(", "))]
    AmbiguousInference { candidates: Vec<String> },

    #[error("does not occur in any parameter type")]
    UnresolvableInference,
}

impl FailureReason {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NoMatchingAncestor { .. } => ErrorKind::NoMatchingAncestor,
            Self::AmbiguousAncestor { .. } => ErrorKind::AmbiguousAncestor,
            Self::NotGeneric { .. } => ErrorKind::NotGeneric,
            Self::ArityMismatch { .. } => ErrorKind::ArityMismatch,
            Self::AmbiguousInference { .. } => ErrorKind::AmbiguousInference,
            Self::UnresolvableInference => ErrorKind::UnresolvableInference,
        }
    }

    pub(crate) fn from_path_error(db: &dyn TypeDatabase, error: PathError) -> Self {
        let formatter = TypeFormatter::new(db);
        match error {
            PathError::NoMatchingAncestor { concrete, shape } => Self::NoMatchingAncestor {
                argument: formatter.format(concrete),
                shape: formatter.format(shape),
            },
            PathError::AmbiguousAncestor {
                concrete,
                shape,
                matches,
            } => Self::AmbiguousAncestor {
                argument: formatter.format(concrete),
                shape: formatter.format(shape),
                matches: formatter.format_list(&matches),
            },
            PathError::NotGeneric { ty, depth } => Self::NotGeneric {
                ty: formatter.format(ty),
                depth,
            },
            PathError::ArityMismatch { ty, index } => Self::ArityMismatch {
                ty: formatter.format(ty),
                index,
            },
        }
    }
}

/// A type parameter that could not be bound.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParameterFailure {
    /// Name of the type parameter.
    pub parameter: String,
    /// Declaration position of the type parameter.
    pub position: usize,
    pub reason: FailureReason,
}

impl fmt::Display for ParameterFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "`{}`: {}", self.parameter, self.reason)
    }
}

fn join_failures(failures: &[ParameterFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Failure of a whole inference call. No partial binding is ever returned.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum InferenceError {
    #[error("`{template}` declares {expected} parameter(s) but {actual} argument type(s) were supplied")]
    ArgumentCount {
        template: String,
        expected: usize,
        actual: usize,
    },

    #[error(
        "the type arguments of `{template}` cannot be inferred from ({}): {}",
        .argument_types.join(", "),
        join_failures(.failures)
    )]
    Failed {
        template: String,
        argument_types: Vec<String>,
        failures: Vec<ParameterFailure>,
    },
}

impl InferenceError {
    /// Kind of the first failure.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ArgumentCount { .. } => ErrorKind::ArgumentCount,
            Self::Failed { failures, .. } => failures
                .first()
                .map(|failure| failure.reason.kind())
                .unwrap_or(ErrorKind::UnresolvableInference),
        }
    }

    /// Kinds of every failure, in type-parameter order.
    pub fn kinds(&self) -> Vec<ErrorKind> {
        match self {
            Self::ArgumentCount { .. } => vec![ErrorKind::ArgumentCount],
            Self::Failed { failures, .. } => failures.iter().map(|f| f.reason.kind()).collect(),
        }
    }

    pub fn failures(&self) -> &[ParameterFailure] {
        match self {
            Self::ArgumentCount { .. } => &[],
            Self::Failed { failures, .. } => failures,
        }
    }

    pub fn template(&self) -> &str {
        match self {
            Self::ArgumentCount { template, .. } | Self::Failed { template, .. } => template,
        }
    }
}

#[cfg(test)]
#[path = "../tests/diagnostics_tests.rs"]
mod tests;
