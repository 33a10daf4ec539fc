//! Loading type schemas from JSON and inferring through them.

use serde_json::json;
use typarg::{ErrorKind, LoadedSchema, Reconciliation, SchemaError, SchemaLoader, TypeSchema};

fn collections_schema() -> serde_json::Value {
    json!({
        "types": [
            { "name": "object" },
            { "name": "int", "base": "object" },
            { "name": "string", "base": "object" },
            { "name": "IEnumerable", "kind": "interface", "params": ["T"] },
            { "name": "ICollection", "kind": "interface", "params": ["T"], "interfaces": ["IEnumerable<T>"] },
            { "name": "List", "params": ["T"], "interfaces": ["ICollection<T>"] },
            { "name": "KeyValuePair", "params": ["K", "V"] },
            {
                "name": "Dictionary",
                "params": ["K", "V"],
                "interfaces": ["IEnumerable<KeyValuePair<K, V>>"]
            },
            { "name": "Names", "base": "List<string>" },
            {
                "name": "Mixed",
                "interfaces": ["IEnumerable<int>", "IEnumerable<string>"]
            }
        ],
        "methods": [
            { "name": "First", "type_params": ["T"], "params": ["IEnumerable<T>"] },
            { "name": "Keys", "type_params": ["K", "V"], "params": ["IEnumerable<KeyValuePair<K, V>>"] },
            { "name": "Add", "type_params": ["T"], "params": ["ICollection<T>", "T"] }
        ]
    })
}

fn load(arguments: &[&str]) -> LoadedSchema {
    let schema: TypeSchema = serde_json::from_value(collections_schema()).unwrap();
    let mut loader = SchemaLoader::from_schema(&schema).unwrap();
    for text in arguments {
        loader.resolve(text).unwrap();
    }
    loader.finish().unwrap()
}

fn bound_names(schema: &LoadedSchema, method: &str, arguments: &[&str]) -> Vec<String> {
    schema
        .infer(method, arguments)
        .unwrap()
        .type_arguments()
        .into_iter()
        .map(|ty| schema.graph.display(ty))
        .collect()
}

#[test]
fn test_inherited_interfaces_are_matched() {
    let schema = load(&["List<int>"]);
    assert_eq!(bound_names(&schema, "First", &["List<int>"]), vec!["int"]);
    // Names : List<string> : ICollection<string> : IEnumerable<string>
    assert_eq!(bound_names(&schema, "First", &["Names"]), vec!["string"]);
}

#[test]
fn test_nested_interface_arguments() {
    let schema = load(&["Dictionary<string, List<int>>"]);
    assert_eq!(
        bound_names(&schema, "Keys", &["Dictionary<string, List<int>>"]),
        vec!["string", "List<int>"]
    );
}

#[test]
fn test_parameter_across_two_arguments() {
    let schema = load(&["List<int>"]);
    assert_eq!(bound_names(&schema, "Add", &["List<int>", "int"]), vec!["int"]);

    match schema.infer("Add", &["List<int>", "string"]) {
        Err(SchemaError::Inference(err)) => {
            assert_eq!(err.kind(), ErrorKind::AmbiguousInference);
            assert_eq!(
                err.to_string(),
                "the type arguments of `Add` cannot be inferred from (List<int>, string): \
                 `T`: conflicting inferences int, string"
            );
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn test_same_interface_twice_is_ambiguous() {
    let schema = load(&[]);
    match schema.infer("First", &["Mixed"]) {
        Err(SchemaError::Inference(err)) => {
            assert_eq!(err.kind(), ErrorKind::AmbiguousAncestor);
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn test_options_default_to_exact() {
    let schema = load(&[]);
    assert_eq!(schema.options.reconciliation, Reconciliation::Exact);

    let err = LoadedSchema::from_json(r#"{ "options": { "reconciliation": "widest" } }"#).unwrap_err();
    assert!(matches!(err, SchemaError::Json(_)));
}

#[test]
fn test_schema_errors_render() {
    let err = LoadedSchema::from_json(
        r#"{ "types": [{ "name": "List", "params": ["T"] }], "methods": [{ "name": "M", "params": ["List<Missing>"] }] }"#,
    )
    .unwrap_err();
    assert_eq!(err.to_string(), "unknown type `Missing` in `List<Missing>`");

    let err = LoadedSchema::from_json(
        r#"{ "types": [{ "name": "List", "params": ["T"] }, { "name": "int" }], "methods": [{ "name": "M", "params": ["List<int, int>"] }] }"#,
    )
    .unwrap_err();
    assert_eq!(
        err.to_string(),
        "`List<_>` expects 1 generic argument(s), found 2"
    );
}
