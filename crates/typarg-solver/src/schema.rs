//! Authored JSON type schemas.
//!
//! Lets a host describe its type metadata as data instead of building a
//! graph by hand:
//!
//! ```json
//! {
//!   "types": [
//!     { "name": "Animal" },
//!     { "name": "Cat", "base": "Animal" },
//!     { "name": "IEnumerable", "kind": "interface", "params": ["T"] },
//!     { "name": "List", "params": ["T"], "interfaces": ["IEnumerable<T>"] }
//!   ],
//!   "methods": [
//!     { "name": "First", "type_params": ["T"], "params": ["IEnumerable<T>"] }
//!   ],
//!   "options": { "reconciliation": "exact" }
//! }
//! ```
//!
//! Type expressions are `Name` or `Name<Expr, ...>`. Inside a declaration,
//! names resolve against its own type parameters first, then against the
//! declared types.

use crate::diagnostics::InferenceError;
use crate::graph::{GraphError, TypeGraph, TypeGraphBuilder};
use crate::infer::{InferenceOptions, InferenceResult, MethodTemplate, TypeArgumentInferer};
use crate::types::TypeId;
use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tracing::debug;
use typarg_common::limits::MAX_INSTANTIATION_DEPTH;

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("invalid schema JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed type expression `{expr}` at offset {offset}: {message}")]
    Parse {
        expr: String,
        offset: usize,
        message: &'static str,
    },

    #[error("unknown type `{name}` in `{expr}`")]
    UnknownType { name: String, expr: String },

    #[error("unknown method `{name}`")]
    UnknownMethod { name: String },

    #[error("type `{name}` is declared more than once")]
    DuplicateType { name: String },

    #[error("method `{name}` is declared more than once")]
    DuplicateMethod { name: String },

    #[error("type parameter `{name}` cannot take generic arguments")]
    ParameterWithArguments { name: String },

    #[error("`{expr}` was never instantiated in the finished graph")]
    NotMaterialized { expr: String },

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Inference(#[from] InferenceError),
}

// =============================================================================
// Serialized form
// =============================================================================

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TypeSchema {
    #[serde(default)]
    pub types: Vec<TypeDecl>,
    #[serde(default)]
    pub methods: Vec<MethodDecl>,
    #[serde(default)]
    pub options: InferenceOptions,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeclKind {
    #[default]
    Class,
    Interface,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TypeDecl {
    pub name: String,
    #[serde(default)]
    pub kind: DeclKind,
    #[serde(default)]
    pub params: Vec<String>,
    #[serde(default)]
    pub base: Option<String>,
    #[serde(default)]
    pub interfaces: Vec<String>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MethodDecl {
    pub name: String,
    #[serde(default)]
    pub type_params: Vec<String>,
    #[serde(default)]
    pub params: Vec<String>,
}

// =============================================================================
// Type expressions
// =============================================================================

/// Parsed type expression such as `Dictionary<string, List<T>>`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeExpr {
    pub name: String,
    pub args: Vec<TypeExpr>,
}

impl TypeExpr {
    pub fn parse(text: &str) -> Result<Self, SchemaError> {
        let mut parser = ExprParser { text, pos: 0 };
        let expr = parser.parse_expr(0)?;
        parser.skip_whitespace();
        if parser.pos != text.len() {
            return Err(parser.error("unexpected trailing input"));
        }
        Ok(expr)
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if let Some((first, rest)) = self.args.split_first() {
            write!(f, "<{first}")?;
            for arg in rest {
                write!(f, ", {arg}")?;
            }
            f.write_str(">")?;
        }
        Ok(())
    }
}

struct ExprParser<'s> {
    text: &'s str,
    pos: usize,
}

impl ExprParser<'_> {
    fn error(&self, message: &'static str) -> SchemaError {
        SchemaError::Parse {
            expr: self.text.to_string(),
            offset: self.pos,
            message,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.text.as_bytes().get(self.pos).copied()
    }

    fn eat(&mut self, byte: u8) -> bool {
        if self.peek() == Some(byte) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(|b| b.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    fn parse_ident(&mut self) -> Result<String, SchemaError> {
        let start = self.pos;
        match self.peek() {
            Some(b) if b.is_ascii_alphabetic() || b == b'_' => self.pos += 1,
            _ => return Err(self.error("expected a type name")),
        }
        while self
            .peek()
            .is_some_and(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'.')
        {
            self.pos += 1;
        }
        Ok(self.text[start..self.pos].to_string())
    }

    fn parse_expr(&mut self, depth: u32) -> Result<TypeExpr, SchemaError> {
        if depth > MAX_INSTANTIATION_DEPTH {
            return Err(self.error("generic nesting is too deep"));
        }
        self.skip_whitespace();
        let name = self.parse_ident()?;
        self.skip_whitespace();

        let mut args = Vec::new();
        if self.eat(b'<') {
            loop {
                args.push(self.parse_expr(depth + 1)?);
                self.skip_whitespace();
                if self.eat(b',') {
                    continue;
                }
                if self.eat(b'>') {
                    break;
                }
                return Err(self.error("expected `,` or `>`"));
            }
        }
        Ok(TypeExpr { name, args })
    }
}

type Scope<'s> = FxHashMap<&'s str, TypeId>;

fn resolve_in_builder(
    builder: &mut TypeGraphBuilder,
    expr: &TypeExpr,
    scope: &Scope<'_>,
    source: &str,
) -> Result<TypeId, SchemaError> {
    if let Some(&param) = scope.get(expr.name.as_str()) {
        if !expr.args.is_empty() {
            return Err(SchemaError::ParameterWithArguments {
                name: expr.name.clone(),
            });
        }
        return Ok(param);
    }

    let ty = builder
        .lookup_name(&expr.name)
        .ok_or_else(|| SchemaError::UnknownType {
            name: expr.name.clone(),
            expr: source.to_string(),
        })?;
    if expr.args.is_empty() {
        return Ok(ty);
    }
    let args = expr
        .args
        .iter()
        .map(|arg| resolve_in_builder(builder, arg, scope, source))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(builder.instantiate(ty, &args)?)
}

fn resolve_in_graph(graph: &TypeGraph, expr: &TypeExpr, source: &str) -> Result<TypeId, SchemaError> {
    let ty = graph
        .lookup_name(&expr.name)
        .ok_or_else(|| SchemaError::UnknownType {
            name: expr.name.clone(),
            expr: source.to_string(),
        })?;
    if expr.args.is_empty() {
        return Ok(ty);
    }

    let expected = graph.type_params(ty).len();
    if expected == 0 {
        return Err(GraphError::NotGenericDefinition {
            name: graph.display(ty),
        }
        .into());
    }
    if expected != expr.args.len() {
        return Err(GraphError::ArityMismatch {
            name: graph.display(ty),
            expected,
            actual: expr.args.len(),
        }
        .into());
    }
    let args = expr
        .args
        .iter()
        .map(|arg| resolve_in_graph(graph, arg, source))
        .collect::<Result<Vec<_>, _>>()?;
    graph
        .instantiation(ty, &args)
        .ok_or_else(|| SchemaError::NotMaterialized {
            expr: source.to_string(),
        })
}

// =============================================================================
// Loading
// =============================================================================

/// A schema whose declarations are loaded but whose graph is not frozen yet.
///
/// Argument types that need new instantiations (`DerivedBox<string>`) are
/// resolved here, before `finish`.
#[derive(Debug)]
pub struct SchemaLoader {
    builder: TypeGraphBuilder,
    methods: IndexMap<String, MethodTemplate>,
    options: InferenceOptions,
}

impl SchemaLoader {
    pub fn from_json(text: &str) -> Result<Self, SchemaError> {
        let schema: TypeSchema = serde_json::from_str(text)?;
        Self::from_schema(&schema)
    }

    pub fn from_schema(schema: &TypeSchema) -> Result<Self, SchemaError> {
        let mut builder = TypeGraphBuilder::new();

        // Declare every type first so declarations can refer to each other
        // regardless of order.
        let mut declared = Vec::with_capacity(schema.types.len());
        for decl in &schema.types {
            if builder.lookup_name(&decl.name).is_some() {
                return Err(SchemaError::DuplicateType {
                    name: decl.name.clone(),
                });
            }
            let params: Vec<&str> = decl.params.iter().map(String::as_str).collect();
            let id = match (decl.kind, params.is_empty()) {
                (DeclKind::Class, true) => builder.class(&decl.name),
                (DeclKind::Class, false) => builder.generic_class(&decl.name, &params),
                (DeclKind::Interface, true) => builder.interface(&decl.name),
                (DeclKind::Interface, false) => builder.generic_interface(&decl.name, &params),
            };
            declared.push(id);
        }

        for (decl, &id) in schema.types.iter().zip(&declared) {
            let scope: Scope<'_> = decl
                .params
                .iter()
                .map(String::as_str)
                .zip(builder.type_params(id).iter().copied())
                .collect();
            if let Some(base) = &decl.base {
                let expr = TypeExpr::parse(base)?;
                let base = resolve_in_builder(&mut builder, &expr, &scope, base)?;
                builder.set_base(id, base)?;
            }
            for interface in &decl.interfaces {
                let expr = TypeExpr::parse(interface)?;
                let interface = resolve_in_builder(&mut builder, &expr, &scope, interface)?;
                builder.add_interface(id, interface)?;
            }
        }

        let mut methods = IndexMap::with_capacity(schema.methods.len());
        for method in &schema.methods {
            if methods.contains_key(&method.name) {
                return Err(SchemaError::DuplicateMethod {
                    name: method.name.clone(),
                });
            }
            let names: Vec<&str> = method.type_params.iter().map(String::as_str).collect();
            let type_params = builder.method_type_params(&names);
            let scope: Scope<'_> = names.iter().copied().zip(type_params.iter().copied()).collect();
            let mut params = Vec::with_capacity(method.params.len());
            for param in &method.params {
                let expr = TypeExpr::parse(param)?;
                params.push(resolve_in_builder(&mut builder, &expr, &scope, param)?);
            }
            methods.insert(
                method.name.clone(),
                MethodTemplate::new(method.name.clone(), type_params, params),
            );
        }

        debug!(
            types = schema.types.len(),
            methods = methods.len(),
            "schema loaded"
        );
        Ok(Self {
            builder,
            methods,
            options: schema.options,
        })
    }

    /// Resolve a type expression against the declared types, creating
    /// instantiations as needed.
    pub fn resolve(&mut self, text: &str) -> Result<TypeId, SchemaError> {
        let expr = TypeExpr::parse(text)?;
        resolve_in_builder(&mut self.builder, &expr, &Scope::default(), text)
    }

    pub fn method(&self, name: &str) -> Option<&MethodTemplate> {
        self.methods.get(name)
    }

    pub fn options(&self) -> InferenceOptions {
        self.options
    }

    pub fn finish(self) -> Result<LoadedSchema, SchemaError> {
        Ok(LoadedSchema {
            graph: self.builder.finish()?,
            methods: self.methods,
            options: self.options,
        })
    }
}

/// A frozen graph with its named method templates.
#[derive(Clone, Debug)]
pub struct LoadedSchema {
    pub graph: TypeGraph,
    pub methods: IndexMap<String, MethodTemplate>,
    pub options: InferenceOptions,
}

impl LoadedSchema {
    pub fn from_json(text: &str) -> Result<Self, SchemaError> {
        SchemaLoader::from_json(text)?.finish()
    }

    pub fn method(&self, name: &str) -> Option<&MethodTemplate> {
        self.methods.get(name)
    }

    /// Resolve a type expression against the finished graph. Only
    /// instantiations that already exist can be resolved.
    pub fn resolve(&self, text: &str) -> Result<TypeId, SchemaError> {
        let expr = TypeExpr::parse(text)?;
        resolve_in_graph(&self.graph, &expr, text)
    }

    /// Infer the type arguments of `method` for textual argument types.
    pub fn infer(&self, method: &str, arguments: &[&str]) -> Result<InferenceResult, SchemaError> {
        let template = self
            .method(method)
            .ok_or_else(|| SchemaError::UnknownMethod {
                name: method.to_string(),
            })?;
        let argument_types = arguments
            .iter()
            .map(|text| self.resolve(text))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(TypeArgumentInferer::with_options(&self.graph, self.options)
            .infer(template, &argument_types)?)
    }
}

#[cfg(test)]
#[path = "../tests/schema_tests.rs"]
mod tests;
