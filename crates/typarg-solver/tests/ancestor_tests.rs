use super::*;
use crate::graph::TypeGraphBuilder;
use crate::test_support::Corlib;

#[test]
fn test_type_parameter_shape_accepts_anything() {
    let mut builder = TypeGraphBuilder::new();
    let lib = Corlib::declare(&mut builder);
    let t = builder.method_type_params(&["T"])[0];
    let graph = builder.finish().unwrap();

    assert_eq!(get_ancestor(&graph, lib.cat, t), Ok(Some(lib.cat)));
    assert_eq!(get_ancestor(&graph, lib.int, t), Ok(Some(lib.int)));
}

#[test]
fn test_identity_matching_walks_base_chain() {
    let mut builder = TypeGraphBuilder::new();
    let lib = Corlib::declare(&mut builder);
    let graph = builder.finish().unwrap();

    assert_eq!(get_ancestor(&graph, lib.cat, lib.cat), Ok(Some(lib.cat)));
    assert_eq!(get_ancestor(&graph, lib.cat, lib.animal), Ok(Some(lib.animal)));
    assert_eq!(get_ancestor(&graph, lib.cat, lib.object), Ok(Some(lib.object)));
    // Ancestry is one-directional.
    assert_eq!(get_ancestor(&graph, lib.animal, lib.cat), Ok(None));
    assert_eq!(get_ancestor(&graph, lib.cat, lib.mouse), Ok(None));
}

#[test]
fn test_open_definition_matches_generic_base() {
    let mut builder = TypeGraphBuilder::new();
    let lib = Corlib::declare(&mut builder);
    let derived_string = builder.instantiate(lib.derived_box, &[lib.string]).unwrap();
    let graph = builder.finish().unwrap();

    let box_string = graph.instantiation(lib.boxed, &[lib.string]).unwrap();
    assert_eq!(
        get_ancestor(&graph, derived_string, lib.boxed),
        Ok(Some(box_string))
    );
    assert_eq!(graph.display(box_string), "Box<string>");
}

#[test]
fn test_open_definition_matches_self() {
    let mut builder = TypeGraphBuilder::new();
    let lib = Corlib::declare(&mut builder);
    let list_int = builder.instantiate(lib.list, &[lib.int]).unwrap();
    let graph = builder.finish().unwrap();

    assert_eq!(get_ancestor(&graph, list_int, lib.list), Ok(Some(list_int)));
    assert_eq!(get_ancestor(&graph, lib.int, lib.list), Ok(None));
}

#[test]
fn test_open_definition_matches_interface() {
    let mut builder = TypeGraphBuilder::new();
    let lib = Corlib::declare(&mut builder);
    let list_int = builder.instantiate(lib.list, &[lib.int]).unwrap();
    let graph = builder.finish().unwrap();

    let enumerable_int = graph.instantiation(lib.enumerable, &[lib.int]).unwrap();
    assert_eq!(
        get_ancestor(&graph, list_int, lib.enumerable),
        Ok(Some(enumerable_int))
    );
}

#[test]
fn test_interface_inherited_through_base_class() {
    let mut builder = TypeGraphBuilder::new();
    let lib = Corlib::declare(&mut builder);
    let list_int = builder.instantiate(lib.list, &[lib.int]).unwrap();
    let int_list = builder.class("IntList");
    builder.set_base(int_list, list_int).unwrap();
    let graph = builder.finish().unwrap();

    let enumerable_int = graph.instantiation(lib.enumerable, &[lib.int]).unwrap();
    assert_eq!(
        get_ancestor(&graph, int_list, lib.enumerable),
        Ok(Some(enumerable_int))
    );
}

#[test]
fn test_same_open_interface_twice_is_ambiguous() {
    let mut builder = TypeGraphBuilder::new();
    let lib = Corlib::declare(&mut builder);
    let enumerable_int = builder.instantiate(lib.enumerable, &[lib.int]).unwrap();
    let enumerable_string = builder.instantiate(lib.enumerable, &[lib.string]).unwrap();
    let multi = builder.class("Multi");
    builder.add_interface(multi, enumerable_int).unwrap();
    builder.add_interface(multi, enumerable_string).unwrap();
    let graph = builder.finish().unwrap();

    assert_eq!(
        get_ancestor(&graph, multi, lib.enumerable),
        Err(PathError::AmbiguousAncestor {
            concrete: multi,
            shape: lib.enumerable,
            matches: vec![enumerable_int, enumerable_string],
        })
    );
    // A closed shape still resolves unambiguously.
    assert_eq!(
        get_ancestor(&graph, multi, enumerable_string),
        Ok(Some(enumerable_string))
    );
}

#[test]
fn test_as_unbound() {
    let mut builder = TypeGraphBuilder::new();
    let lib = Corlib::declare(&mut builder);
    let box_int = builder.instantiate(lib.boxed, &[lib.int]).unwrap();
    let t = builder.method_type_params(&["T"])[0];

    assert_eq!(as_unbound(&builder, box_int), lib.boxed);
    assert_eq!(as_unbound(&builder, lib.boxed), lib.boxed);
    assert_eq!(as_unbound(&builder, lib.int), lib.int);
    assert_eq!(as_unbound(&builder, t), t);
}

#[test]
fn test_base_chain_order() {
    let mut builder = TypeGraphBuilder::new();
    let lib = Corlib::declare(&mut builder);
    let graph = builder.finish().unwrap();

    let chain: Vec<TypeId> = base_chain(&graph, lib.cat).collect();
    assert_eq!(chain, vec![lib.animal, lib.object]);
    assert_eq!(base_chain(&graph, lib.object).count(), 0);
}
