use crate::{ClassInfo, MethodSig, Type, TypeTable};

fn table() -> TypeTable {
    TypeTable::new()
        .with(ClassInfo::new("java.io.Closeable").extends("java.lang.AutoCloseable"))
        .with(ClassInfo::new("java.io.InputStream").extends("java.io.Closeable"))
        .with(ClassInfo::new("demo.Handle").method(MethodSig::new(
            "",
            "close",
            vec![],
            Type::Void,
        )))
        .with(ClassInfo::new("demo.Animal"))
        .with(ClassInfo::new("demo.Dog").extends("demo.Animal"))
        .with(
            ClassInfo::new("demo.Printer")
                .method(MethodSig::new("", "print", vec![Type::class("java.lang.String")], Type::Void))
                .method(MethodSig::new("", "print", vec![Type::int()], Type::Void)),
        )
        .with(ClassInfo::new("demo.FancyPrinter").extends("demo.Printer").method(
            MethodSig::new("", "print", vec![Type::int()], Type::Void),
        ))
}

#[test]
fn subtyping_is_nominal_and_transitive() {
    let types = table();
    assert!(types.is_subtype(&Type::class("java.io.InputStream"), &Type::class("java.lang.AutoCloseable")));
    assert!(types.is_subtype(&Type::class("demo.Dog"), &Type::class("demo.Animal")));
    assert!(!types.is_subtype(&Type::class("demo.Animal"), &Type::class("demo.Dog")));
}

#[test]
fn object_and_null_rules() {
    let types = table();
    let object = Type::class("java.lang.Object");
    assert!(types.is_subtype(&Type::class("demo.Dog"), &object));
    assert!(types.is_subtype(&Type::Null, &Type::class("demo.Dog")));
    assert!(!types.is_subtype(&Type::int(), &object));
    assert!(!types.is_subtype(&Type::Null, &Type::int()));
}

#[test]
fn primitives_only_match_themselves() {
    let types = table();
    assert!(types.is_subtype(&Type::int(), &Type::int()));
    assert!(!types.is_subtype(&Type::int(), &Type::parse("long")));
}

#[test]
fn type_arguments_must_match() {
    let types = table();
    let dogs = Type::generic("java.util.List", vec![Type::class("demo.Dog")]);
    let animals = Type::generic("java.util.List", vec![Type::class("demo.Animal")]);
    let raw = Type::class("java.util.List");
    assert!(!types.is_subtype(&dogs, &animals));
    assert!(types.is_subtype(&dogs, &raw));
}

#[test]
fn closeable_detection() {
    let types = table();
    assert!(types.is_closeable(&Type::class("java.io.InputStream")));
    assert!(types.is_closeable(&Type::class("demo.Handle")));
    assert!(!types.is_closeable(&Type::class("demo.Dog")));
    assert!(!types.is_closeable(&Type::int()));
}

#[test]
fn inherited_methods_are_deduplicated_by_signature() {
    let types = table();
    let found = types.methods_named(&"demo.FancyPrinter".into(), "print");
    assert_eq!(found.len(), 2);
    assert_eq!(found[0].declaring_type, "demo.FancyPrinter");
}

#[test]
fn parse_spelled_types() {
    assert_eq!(Type::parse("int"), Type::int());
    assert_eq!(Type::parse("void"), Type::Void);
    assert_eq!(
        Type::parse("java.lang.String[]"),
        Type::Array(Box::new(Type::class("java.lang.String")))
    );
}

#[test]
fn lineage_survives_cycles() {
    let types = TypeTable::new()
        .with(ClassInfo::new("a.A").extends("a.B"))
        .with(ClassInfo::new("a.B").extends("a.A"));
    let lineage = types.lineage(&"a.A".into());
    assert_eq!(lineage.len(), 2);
}
