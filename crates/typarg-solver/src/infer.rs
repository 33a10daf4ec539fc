//! Type argument inference for generic method templates.
//!
//! For each type parameter of a template:
//!
//! 1. find every occurrence of the parameter in the formal parameter types,
//! 2. evaluate each occurrence against the matching argument type,
//! 3. reconcile the results into exactly one concrete type.
//!
//! All parameters are processed even after one fails, so the error names
//! every parameter that could not be bound. A call yields either a complete
//! binding or an error, never a partial binding.

use crate::FxIndexSet;
use crate::ancestor::self_and_bases;
use crate::db::TypeDatabase;
use crate::diagnostics::{FailureReason, InferenceError, ParameterFailure};
use crate::format::TypeFormatter;
use crate::path::find_positioned_paths;
use crate::types::TypeId;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// A generic method declaration: its type parameters and formal parameter
/// types. Formal types may mention the type parameters at any depth.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MethodTemplate {
    pub name: String,
    pub type_params: Vec<TypeId>,
    pub params: Vec<TypeId>,
}

impl MethodTemplate {
    pub fn new(name: impl Into<String>, type_params: Vec<TypeId>, params: Vec<TypeId>) -> Self {
        Self {
            name: name.into(),
            type_params,
            params,
        }
    }

    pub fn is_generic(&self) -> bool {
        !self.type_params.is_empty()
    }
}

/// How several distinct candidates for one type parameter are handled.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reconciliation {
    /// Distinct candidates are an `AmbiguousInference` failure.
    #[default]
    Exact,
    /// Distinct candidates bind to their nearest shared base class, if any.
    /// `(Cat, Mouse)` binds to `Animal` when both derive from it.
    NearestCommonBase,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InferenceOptions {
    pub reconciliation: Reconciliation,
}

/// Successful inference: one concrete type per type parameter, in
/// declaration order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InferenceResult {
    template: String,
    bindings: Vec<(TypeId, TypeId)>,
}

impl InferenceResult {
    pub fn template(&self) -> &str {
        &self.template
    }

    /// `(type parameter, concrete type)` pairs in declaration order.
    pub fn bindings(&self) -> &[(TypeId, TypeId)] {
        &self.bindings
    }

    pub fn type_arguments(&self) -> Vec<TypeId> {
        self.bindings.iter().map(|&(_, ty)| ty).collect()
    }

    pub fn get(&self, type_param: TypeId) -> Option<TypeId> {
        self.bindings
            .iter()
            .find(|&&(param, _)| param == type_param)
            .map(|&(_, ty)| ty)
    }

    /// True when the template was not generic and was returned unchanged.
    pub fn is_passthrough(&self) -> bool {
        self.bindings.is_empty()
    }
}

/// Infers the type arguments of method templates against one type graph.
pub struct TypeArgumentInferer<'a> {
    db: &'a dyn TypeDatabase,
    options: InferenceOptions,
}

impl<'a> TypeArgumentInferer<'a> {
    pub fn new(db: &'a dyn TypeDatabase) -> Self {
        Self::with_options(db, InferenceOptions::default())
    }

    pub fn with_options(db: &'a dyn TypeDatabase, options: InferenceOptions) -> Self {
        Self { db, options }
    }

    pub fn options(&self) -> InferenceOptions {
        self.options
    }

    pub fn infer(
        &self,
        template: &MethodTemplate,
        argument_types: &[TypeId],
    ) -> Result<InferenceResult, InferenceError> {
        // A non-generic template is returned as is, whatever the arguments.
        if !template.is_generic() {
            trace!(template = %template.name, "non-generic template, nothing to infer");
            return Ok(InferenceResult {
                template: template.name.clone(),
                bindings: Vec::new(),
            });
        }
        if template.params.len() != argument_types.len() {
            return Err(InferenceError::ArgumentCount {
                template: template.name.clone(),
                expected: template.params.len(),
                actual: argument_types.len(),
            });
        }

        debug!(
            template = %template.name,
            type_params = template.type_params.len(),
            arguments = argument_types.len(),
            "inferring type arguments"
        );

        let mut bindings = Vec::with_capacity(template.type_params.len());
        let mut failures = Vec::new();
        for (position, &type_param) in template.type_params.iter().enumerate() {
            match self.infer_parameter(template, type_param, argument_types) {
                Ok(ty) => {
                    trace!(
                        param = self.db.type_name(type_param),
                        bound = ty.0,
                        "type parameter bound"
                    );
                    bindings.push((type_param, ty));
                }
                Err(reason) => {
                    debug!(
                        param = self.db.type_name(type_param),
                        %reason,
                        "type parameter not inferable"
                    );
                    failures.push(ParameterFailure {
                        parameter: self.db.type_name(type_param).to_string(),
                        position,
                        reason,
                    });
                }
            }
        }

        if !failures.is_empty() {
            return Err(InferenceError::Failed {
                template: template.name.clone(),
                argument_types: TypeFormatter::new(self.db).format_list(argument_types),
                failures,
            });
        }
        Ok(InferenceResult {
            template: template.name.clone(),
            bindings,
        })
    }

    fn infer_parameter(
        &self,
        template: &MethodTemplate,
        type_param: TypeId,
        argument_types: &[TypeId],
    ) -> Result<TypeId, FailureReason> {
        let paths = find_positioned_paths(self.db, &template.params, type_param);

        let mut candidates: FxIndexSet<TypeId> = FxIndexSet::default();
        for positioned in &paths {
            // `infer` checked the argument count, so every index is in range.
            let Some(evaluated) = positioned.evaluate(self.db, argument_types) else {
                continue;
            };
            let ty = evaluated.map_err(|error| FailureReason::from_path_error(self.db, error))?;
            candidates.insert(ty);
        }

        let mut distinct = candidates.iter().copied();
        match (distinct.next(), distinct.next()) {
            (None, _) => Err(FailureReason::UnresolvableInference),
            (Some(only), None) => Ok(only),
            _ => self.reconcile(&candidates),
        }
    }

    fn reconcile(&self, candidates: &FxIndexSet<TypeId>) -> Result<TypeId, FailureReason> {
        let candidates: Vec<TypeId> = candidates.iter().copied().collect();
        if self.options.reconciliation == Reconciliation::NearestCommonBase {
            if let Some(common) = nearest_common_base(self.db, &candidates) {
                trace!(common = common.0, "candidates reconciled to common base");
                return Ok(common);
            }
        }
        Err(FailureReason::AmbiguousInference {
            candidates: TypeFormatter::new(self.db).format_list(&candidates),
        })
    }
}

/// Nearest type that is `self` or a base of every candidate.
///
/// Interfaces are not considered: two unrelated interfaces shared by the
/// candidates would give no unique answer.
pub fn nearest_common_base(db: &dyn TypeDatabase, candidates: &[TypeId]) -> Option<TypeId> {
    let (&first, rest) = candidates.split_first()?;
    let others: Vec<FxHashSet<TypeId>> = rest
        .iter()
        .map(|&candidate| self_and_bases(db, candidate).collect())
        .collect();
    self_and_bases(db, first).find(|ty| others.iter().all(|chain| chain.contains(ty)))
}

/// Infer with default options.
pub fn infer_type_arguments(
    db: &dyn TypeDatabase,
    template: &MethodTemplate,
    argument_types: &[TypeId],
) -> Result<InferenceResult, InferenceError> {
    TypeArgumentInferer::new(db).infer(template, argument_types)
}

#[cfg(test)]
#[path = "../tests/infer_tests.rs"]
mod tests;
