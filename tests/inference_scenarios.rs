//! End-to-end inference scenarios through the public `typarg` API.
//!
//! Each scenario builds a small class library, declares a generic method
//! template against it and checks what the inferer binds.

use typarg::{
    ErrorKind, InferenceOptions, MethodTemplate, Reconciliation, TypeArgumentInferer, TypeGraph,
    TypeGraphBuilder, TypeId, infer_type_arguments,
};

/// A class library with primitives, an animal hierarchy and a few generics.
struct Library {
    graph: TypeGraph,
    primitives: Vec<(&'static str, TypeId)>,
    int: TypeId,
    long: TypeId,
    string: TypeId,
    animal: TypeId,
    cat: TypeId,
    mouse: TypeId,
    derived_box_string: TypeId,
    list_int: TypeId,
    /// `Identity<T>(T)`
    identity: MethodTemplate,
    /// `Pair<T>(T, T)`
    pair: MethodTemplate,
    /// `Unwrap<T>(Box<T>)`
    unwrap: MethodTemplate,
    /// `Partial<T, U, V>(T, U)`
    partial: MethodTemplate,
    /// `Head<T>(List<T>)`
    head: MethodTemplate,
}

fn library() -> Library {
    let mut b = TypeGraphBuilder::new();
    let object = b.class("object");
    let primitives: Vec<(&'static str, TypeId)> = ["int", "long", "decimal", "float", "double", "string"]
        .into_iter()
        .map(|name| {
            let id = b.class(name);
            b.set_base(id, object).unwrap();
            (name, id)
        })
        .collect();
    let int = primitives[0].1;
    let long = primitives[1].1;
    let string = primitives[5].1;

    let animal = b.class("Animal");
    b.set_base(animal, object).unwrap();
    let cat = b.class("Cat");
    b.set_base(cat, animal).unwrap();
    let mouse = b.class("Mouse");
    b.set_base(mouse, animal).unwrap();

    let boxed = b.generic_class("Box", &["T"]);
    let derived_box = b.generic_class("DerivedBox", &["T"]);
    let derived_t = b.type_params(derived_box)[0];
    let box_of_derived_t = b.instantiate(boxed, &[derived_t]).unwrap();
    b.set_base(derived_box, box_of_derived_t).unwrap();
    let derived_box_string = b.instantiate(derived_box, &[string]).unwrap();

    let list = b.generic_class("List", &["T"]);
    let list_int = b.instantiate(list, &[int]).unwrap();

    let t = b.method_type_params(&["T"]);
    let identity = MethodTemplate::new("Identity", t.clone(), vec![t[0]]);
    let t = b.method_type_params(&["T"]);
    let pair = MethodTemplate::new("Pair", t.clone(), vec![t[0], t[0]]);
    let t = b.method_type_params(&["T"]);
    let box_t = b.instantiate(boxed, &[t[0]]).unwrap();
    let unwrap = MethodTemplate::new("Unwrap", t, vec![box_t]);
    let tuv = b.method_type_params(&["T", "U", "V"]);
    let partial = MethodTemplate::new("Partial", tuv.clone(), vec![tuv[0], tuv[1]]);
    let t = b.method_type_params(&["T"]);
    let list_t = b.instantiate(list, &[t[0]]).unwrap();
    let head = MethodTemplate::new("Head", t, vec![list_t]);

    Library {
        graph: b.finish().unwrap(),
        primitives,
        int,
        long,
        string,
        animal,
        cat,
        mouse,
        derived_box_string,
        list_int,
        identity,
        pair,
        unwrap,
        partial,
        head,
    }
}

#[test]
fn test_bare_parameter_binds_argument_type() {
    let lib = library();
    for &(name, ty) in &lib.primitives {
        let result = infer_type_arguments(&lib.graph, &lib.identity, &[ty]).unwrap();
        assert_eq!(result.type_arguments(), vec![ty], "{name}");
    }
}

#[test]
fn test_repeated_parameter() {
    let lib = library();
    let result = infer_type_arguments(&lib.graph, &lib.pair, &[lib.int, lib.int]).unwrap();
    assert_eq!(result.type_arguments(), vec![lib.int]);

    // No numeric widening: int and long stay distinct.
    let err = infer_type_arguments(&lib.graph, &lib.pair, &[lib.int, lib.long]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AmbiguousInference);
}

#[test]
fn test_siblings_bind_to_shared_base() {
    let lib = library();
    let inferer = TypeArgumentInferer::with_options(
        &lib.graph,
        InferenceOptions {
            reconciliation: Reconciliation::NearestCommonBase,
        },
    );
    let result = inferer.infer(&lib.pair, &[lib.cat, lib.mouse]).unwrap();
    assert_eq!(result.type_arguments(), vec![lib.animal]);
    assert_eq!(lib.graph.display(result.type_arguments()[0]), "Animal");
}

#[test]
fn test_generic_base_class_is_matched() {
    let lib = library();
    let result = infer_type_arguments(&lib.graph, &lib.unwrap, &[lib.derived_box_string]).unwrap();
    assert_eq!(result.type_arguments(), vec![lib.string]);
}

#[test]
fn test_unused_parameter_fails() {
    let lib = library();
    let err = infer_type_arguments(&lib.graph, &lib.partial, &[lib.int, lib.long]).unwrap_err();
    assert_eq!(err.kinds(), vec![ErrorKind::UnresolvableInference]);
    assert_eq!(err.failures()[0].parameter, "V");
    assert!(err.to_string().contains("`V`: does not occur in any parameter type"));
}

#[test]
fn test_missing_ancestor_fails() {
    let lib = library();
    let err = infer_type_arguments(&lib.graph, &lib.head, &[lib.cat]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NoMatchingAncestor);
    assert!(err.to_string().contains("`Cat` has no ancestor matching `List<_>`"));

    let result = infer_type_arguments(&lib.graph, &lib.head, &[lib.list_int]).unwrap();
    assert_eq!(result.type_arguments(), vec![lib.int]);
}

#[test]
fn test_results_are_identical_across_threads() {
    use rayon::prelude::*;

    let lib = library();
    let calls: Vec<(&MethodTemplate, Vec<TypeId>)> = vec![
        (&lib.identity, vec![lib.string]),
        (&lib.pair, vec![lib.int, lib.long]),
        (&lib.unwrap, vec![lib.derived_box_string]),
        (&lib.partial, vec![lib.int, lib.int]),
        (&lib.head, vec![lib.cat]),
    ];
    let sequential: Vec<_> = calls
        .iter()
        .map(|(template, args)| infer_type_arguments(&lib.graph, template, args))
        .collect();

    for _ in 0..8 {
        let parallel: Vec<_> = calls
            .par_iter()
            .map(|(template, args)| infer_type_arguments(&lib.graph, template, args))
            .collect();
        assert_eq!(parallel, sequential);
    }
}
