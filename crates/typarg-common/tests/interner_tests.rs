use super::*;

#[test]
fn test_intern_dedup() {
    let mut interner = Interner::new();
    let a = interner.intern("IEnumerable");
    let b = interner.intern("IEnumerable");
    let c = interner.intern("List");

    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_eq!(interner.resolve(a), "IEnumerable");
    assert_eq!(interner.resolve(c), "List");
}

#[test]
fn test_empty_string_is_none_atom() {
    let mut interner = Interner::new();
    assert!(interner.is_empty());
    assert_eq!(interner.intern(""), Atom::NONE);
    assert!(Atom::NONE.is_none());
}

#[test]
fn test_get_does_not_intern() {
    let mut interner = Interner::new();
    assert_eq!(interner.get("T"), None);
    let t = interner.intern("T");
    assert_eq!(interner.get("T"), Some(t));
    assert_eq!(interner.len(), 2);
}

#[test]
fn test_resolve_out_of_bounds() {
    let interner = Interner::new();
    assert_eq!(interner.resolve(Atom(99)), "");
    assert_eq!(interner.try_resolve(Atom(99)), None);
}
