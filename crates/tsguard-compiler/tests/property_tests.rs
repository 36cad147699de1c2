use super::*;
use tsguard_types::TypeTable;

fn symbol(name: &str, declaration: Option<Declaration>, ty: Option<TypeId>, flags: SymbolFlags) -> SymbolData {
    SymbolData {
        name: name.to_string(),
        flags,
        declaration,
        ty,
    }
}

#[test]
fn test_declaration_backed_optional_property() {
    let data = symbol(
        "age",
        Some(Declaration::PropertySignature {
            type_annotation: Some(TypeId(3)),
            question_token: true,
        }),
        None,
        SymbolFlags::PROPERTY,
    );
    assert_eq!(
        get_property_info(&data).unwrap(),
        PropertyInfo {
            name: "age".to_string(),
            ty: TypeId(3),
            optional: true,
        }
    );
}

#[test]
fn test_declaration_optionality_ignores_flags() {
    let data = symbol(
        "age",
        Some(Declaration::PropertySignature {
            type_annotation: Some(TypeId(3)),
            question_token: false,
        }),
        None,
        SymbolFlags::PROPERTY | SymbolFlags::OPTIONAL,
    );
    assert!(!get_property_info(&data).unwrap().optional);
}

#[test]
fn test_synthetic_property_reads_optional_flag() {
    let data = symbol(
        "name",
        None,
        Some(TypeId(1)),
        SymbolFlags::PROPERTY | SymbolFlags::OPTIONAL,
    );
    let info = get_property_info(&data).unwrap();
    assert_eq!(info.ty, TypeId(1));
    assert!(info.optional);
}

#[test]
fn test_missing_type_annotation() {
    let data = symbol(
        "x",
        Some(Declaration::PropertySignature {
            type_annotation: None,
            question_token: false,
        }),
        Some(TypeId(1)),
        SymbolFlags::PROPERTY,
    );
    assert_eq!(
        get_property_info(&data).unwrap_err(),
        CompileError::MissingPropertyType {
            name: "x".to_string()
        }
    );
}

#[test]
fn test_unexpected_declaration_kind() {
    let data = symbol(
        "x",
        Some(Declaration::Other {
            kind: "GetAccessor".to_string(),
        }),
        Some(TypeId(1)),
        SymbolFlags::PROPERTY,
    );
    assert_eq!(
        get_property_info(&data).unwrap_err(),
        CompileError::UnexpectedDeclaration {
            name: "x".to_string(),
            kind: "GetAccessor".to_string(),
        }
    );
}

#[test]
fn test_neither_declaration_nor_type() {
    let data = symbol("ghost", None, None, SymbolFlags::PROPERTY);
    assert_eq!(
        get_property_info(&data).unwrap_err(),
        CompileError::UnresolvedProperty {
            name: "ghost".to_string()
        }
    );
}

#[test]
fn test_members_include_inherited_and_hide_overridden() {
    let mut table = TypeTable::new();
    let string = table.string();
    let number = table.number();
    let base = table.interface("Base", vec![]);
    table.property(base, "id", number, false);
    table.property(base, "label", number, false);
    let derived = table.interface("Derived", vec![]);
    table.extend(derived, base);
    table.property(derived, "label", string, true);
    table.method(derived, "render");

    let collected = collect_object_members(&table, derived).unwrap();
    let names: Vec<_> = collected.members.keys().cloned().collect();
    assert_eq!(names, vec!["label", "render", "id"]);

    match &collected.members["label"] {
        ObjectMember::Property(info) => {
            assert_eq!(info.ty, string);
            assert!(info.optional);
        }
        other => panic!("unexpected member {other:?}"),
    }
    assert!(matches!(
        collected.members["render"],
        ObjectMember::Method { .. }
    ));
}

#[test]
fn test_members_through_generic_base_reference() {
    let mut table = TypeTable::new();
    let t = table.type_parameter("T", None);
    let base = table.interface("Base", vec![t]);
    table.property(base, "value", t, false);
    table.set_string_index(base, t);
    let derived = table.interface("Derived", vec![]);
    let string = table.string();
    let base_string = table.reference(base, vec![string]);
    table.extend(derived, base_string);

    let collected = collect_object_members(&table, derived).unwrap();
    assert!(collected.members.contains_key("value"));
    assert_eq!(collected.string_index, Some(t));
}
