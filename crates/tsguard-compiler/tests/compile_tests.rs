use super::*;
use crate::call_site::{CompiledModule, ValidatorCompiler};
use crate::options::{FunctionBehavior, ValidatorOptions};
use serde_json::{Value, json};
use tsguard_types::{TupleElement, TypeTable};

fn compile_with(table: &TypeTable, options: ValidatorOptions, ty: TypeId) -> (CompiledModule, String) {
    let mut compiler = ValidatorCompiler::new(table, options);
    let name = compiler.compile_validator(ty).unwrap();
    (compiler.finish(), name)
}

fn compile(table: &TypeTable, ty: TypeId) -> (CompiledModule, String) {
    compile_with(table, ValidatorOptions::default(), ty)
}

fn check(module: &CompiledModule, name: &str, input: Value) -> Option<String> {
    module.validate(name, &input).unwrap()
}

fn failure(at: &str, reason: &str) -> Option<String> {
    Some(format!("validation failed at {at}: {reason}"))
}

fn element(ty: TypeId) -> TupleElement {
    TupleElement {
        ty,
        optional: false,
        rest: false,
    }
}

/// interface User { name: string; age?: number }
fn user(table: &mut TypeTable) -> TypeId {
    let user = table.interface("User", vec![]);
    let string = table.string();
    let number = table.number();
    table.property(user, "name", string, false);
    table.property(user, "age", number, true);
    user
}

// =============================================================================
// Objects
// =============================================================================

#[test]
fn test_object_properties() {
    let mut table = TypeTable::new();
    let user = user(&mut table);
    let (module, name) = compile(&table, user);

    assert_eq!(check(&module, &name, json!({"name": "Ada"})), None);
    assert_eq!(check(&module, &name, json!({"name": "Ada", "age": 36})), None);
    assert_eq!(check(&module, &name, json!({"name": "Ada", "extra": true})), None);
    assert_eq!(
        check(&module, &name, json!({})),
        failure("$", "expected 'name' in object")
    );
    assert_eq!(
        check(&module, &name, json!({"name": 1})),
        failure("$.name", "expected a string")
    );
}

#[test]
fn test_optional_property_absent_passes_and_wrong_type_fails() {
    let mut table = TypeTable::new();
    let user = user(&mut table);
    let (module, name) = compile(&table, user);

    assert_eq!(check(&module, &name, json!({"name": "Ada"})), None);
    assert_eq!(
        check(&module, &name, json!({"name": "Ada", "age": "old"})),
        failure("$.age", "expected a number")
    );
}

#[test]
fn test_object_rejects_non_objects() {
    let mut table = TypeTable::new();
    let user = user(&mut table);
    let (module, name) = compile(&table, user);

    for input in [json!(null), json!([]), json!("Ada"), json!(7)] {
        assert_eq!(check(&module, &name, input), failure("$", "expected an object"));
    }
}

#[test]
fn test_nested_paths() {
    // interface Outer { inner: { values: number[] } }
    let mut table = TypeTable::new();
    let number = table.number();
    let values = table.array(number);
    let inner = table.object_literal();
    table.property(inner, "values", values, false);
    let outer = table.interface("Outer", vec![]);
    table.property(outer, "inner", inner, false);
    let (module, name) = compile(&table, outer);

    assert_eq!(check(&module, &name, json!({"inner": {"values": [1, 2]}})), None);
    assert_eq!(
        check(&module, &name, json!({"inner": {"values": [1, "two"]}})),
        failure("$.inner.values.[1]", "expected a number")
    );
}

#[test]
fn test_non_identifier_property_key() {
    let mut table = TypeTable::new();
    let string = table.string();
    let record = table.interface("Record", vec![]);
    table.property(record, "first-name", string, false);
    let (module, name) = compile(&table, record);

    assert_eq!(check(&module, &name, json!({"first-name": "Ada"})), None);
    assert_eq!(
        check(&module, &name, json!({"first-name": 1})),
        failure("$.first-name", "expected a string")
    );
    let printed = module.print();
    assert!(printed.contains("object[\"first-name\"]"));
}

#[test]
fn test_shared_type_compiles_once() {
    // interface Pair { left: Point; right: Point }
    let mut table = TypeTable::new();
    let number = table.number();
    let point = table.interface("Point", vec![]);
    table.property(point, "x", number, false);
    let pair = table.interface("Pair", vec![]);
    table.property(pair, "left", point, false);
    table.property(pair, "right", point, false);
    let (module, name) = compile(&table, pair);

    let point_name = format!("_{point}");
    let names: Vec<&str> = module.function_names().collect();
    assert_eq!(names.iter().filter(|n| **n == point_name).count(), 1);
    assert_eq!(names.iter().filter(|n| **n == "_plain_object").count(), 1);
    assert_eq!(names[0], name);
    assert_eq!(
        check(&module, &name, json!({"left": {"x": 1}, "right": {"x": "1"}})),
        failure("$.right.x", "expected a number")
    );
}

// =============================================================================
// Unions, intersections, arrays, tuples
// =============================================================================

#[test]
fn test_union() {
    let mut table = TypeTable::new();
    let string = table.string();
    let number = table.number();
    let union = table.union(vec![string, number]);
    let (module, name) = compile(&table, union);

    assert_eq!(check(&module, &name, json!("a")), None);
    assert_eq!(check(&module, &name, json!(1)), None);
    assert_eq!(
        check(&module, &name, json!(true)),
        failure("$", "there are no valid alternatives.")
    );
}

#[test]
fn test_literal_union() {
    let mut table = TypeTable::new();
    let red = table.string_literal("red");
    let green = table.string_literal("green");
    let color = table.union(vec![red, green]);
    let (module, name) = compile(&table, color);

    assert_eq!(check(&module, &name, json!("green")), None);
    assert!(check(&module, &name, json!("blue")).is_some());
}

#[test]
fn test_intersection() {
    let mut table = TypeTable::new();
    let string = table.string();
    let number = table.number();
    let left = table.object_literal();
    table.property(left, "a", string, false);
    let right = table.object_literal();
    table.property(right, "b", number, false);
    let both = table.intersection(vec![left, right]);
    let (module, name) = compile(&table, both);

    assert_eq!(check(&module, &name, json!({"a": "x", "b": 1})), None);
    assert_eq!(
        check(&module, &name, json!({"a": "x"})),
        failure("$", "expected 'b' in object")
    );
}

#[test]
fn test_array() {
    let mut table = TypeTable::new();
    let string = table.string();
    let strings = table.array(string);
    let (module, name) = compile(&table, strings);

    assert_eq!(check(&module, &name, json!([])), None);
    assert_eq!(check(&module, &name, json!(["a", "b"])), None);
    assert_eq!(
        check(&module, &name, json!({"0": "a"})),
        failure("$", "expected an array")
    );
    assert_eq!(
        check(&module, &name, json!(["a", 2])),
        failure("$.[1]", "expected a string")
    );
}

#[test]
fn test_fixed_tuple() {
    let mut table = TypeTable::new();
    let string = table.string();
    let number = table.number();
    let pair = table.tuple(vec![element(string), element(number)]);
    let (module, name) = compile(&table, pair);

    assert_eq!(check(&module, &name, json!(["a", 1])), None);
    assert_eq!(
        check(&module, &name, json!(["a"])),
        failure("$", "expected at least 2 elements")
    );
    assert_eq!(
        check(&module, &name, json!(["a", 1, 2])),
        failure("$", "expected at most 2 elements")
    );
    assert_eq!(
        check(&module, &name, json!([1, 1])),
        failure("$.[0]", "expected a string")
    );
}

#[test]
fn test_tuple_with_optional_and_rest_elements() {
    // [string, number?, ...boolean[]]
    let mut table = TypeTable::new();
    let string = table.string();
    let number = table.number();
    let boolean = table.boolean();
    let tuple = table.tuple(vec![
        element(string),
        TupleElement {
            ty: number,
            optional: true,
            rest: false,
        },
        TupleElement {
            ty: boolean,
            optional: false,
            rest: true,
        },
    ]);
    let (module, name) = compile(&table, tuple);

    assert_eq!(check(&module, &name, json!(["a"])), None);
    assert_eq!(check(&module, &name, json!(["a", 1])), None);
    assert_eq!(check(&module, &name, json!(["a", 1, true, false])), None);
    assert_eq!(
        check(&module, &name, json!([])),
        failure("$", "expected at least 1 elements")
    );
    assert_eq!(
        check(&module, &name, json!(["a", "b"])),
        failure("$.[1]", "expected a number")
    );
    assert_eq!(
        check(&module, &name, json!(["a", 1, true, 0])),
        failure("$.[3]", "expected a boolean")
    );
}

#[test]
fn test_rest_element_must_be_last() {
    let mut table = TypeTable::new();
    let string = table.string();
    let number = table.number();
    let tuple = table.tuple(vec![
        TupleElement {
            ty: string,
            optional: false,
            rest: true,
        },
        element(number),
    ]);

    let mut compiler = ValidatorCompiler::new(&table, ValidatorOptions::default());
    let err = compiler.compile_validator(tuple).unwrap_err();
    assert!(matches!(err, CompileError::UnsupportedType { kind: "tuple", .. }));
}

// =============================================================================
// Recursion and generics
// =============================================================================

#[test]
fn test_recursive_interface() {
    // interface Node { value: number; children: Node[] }
    let mut table = TypeTable::new();
    let number = table.number();
    let node = table.interface("Node", vec![]);
    table.property(node, "value", number, false);
    let children = table.array(node);
    table.property(node, "children", children, false);
    let (module, name) = compile(&table, node);

    let tree = json!({"value": 1, "children": [{"value": 2, "children": []}]});
    assert_eq!(check(&module, &name, tree), None);
    let bad = json!({"value": 1, "children": [{"value": 2, "children": [{"value": "3", "children": []}]}]});
    assert_eq!(
        check(&module, &name, bad),
        failure("$.children.[0].children.[0].value", "expected a number")
    );
}

#[test]
fn test_recursive_generic_interface_terminates() {
    // interface List<T> { value: T; next?: List<T> }
    let mut table = TypeTable::new();
    let t = table.type_parameter("T", None);
    let list = table.interface("List", vec![t]);
    table.property(list, "value", t, false);
    let list_t = table.reference(list, vec![t]);
    table.property(list, "next", list_t, true);
    let string = table.string();
    let list_string = table.reference(list, vec![string]);
    let (module, name) = compile(&table, list_string);

    assert_eq!(name, format!("_{list}L_stringR"));
    assert_eq!(
        check(&module, &name, json!({"value": "a", "next": {"value": "b"}})),
        None
    );
    assert_eq!(
        check(&module, &name, json!({"value": "a", "next": {"value": 2}})),
        failure("$.next.value", "expected a string")
    );
}

#[test]
fn test_generic_instantiations_are_distinct() {
    let mut table = TypeTable::new();
    let t = table.type_parameter("T", None);
    let boxed = table.interface("Box", vec![t]);
    table.property(boxed, "value", t, false);
    let string = table.string();
    let number = table.number();
    let box_string = table.reference(boxed, vec![string]);
    let box_number = table.reference(boxed, vec![number]);

    let mut compiler = ValidatorCompiler::new(&table, ValidatorOptions::default());
    let string_name = compiler.compile_validator(box_string).unwrap();
    let number_name = compiler.compile_validator(box_number).unwrap();
    let module = compiler.finish();

    assert_ne!(string_name, number_name);
    assert_eq!(check(&module, &string_name, json!({"value": "a"})), None);
    assert_eq!(
        check(&module, &string_name, json!({"value": 1})),
        failure("$.value", "expected a string")
    );
    assert_eq!(check(&module, &number_name, json!({"value": 1})), None);
}

#[test]
fn test_type_parameter_default() {
    // interface Wrapper<T = number> { value: T }, referenced without arguments
    let mut table = TypeTable::new();
    let number = table.number();
    let t = table.type_parameter("T", Some(number));
    let wrapper = table.interface("Wrapper", vec![t]);
    table.property(wrapper, "value", t, false);
    let bare = table.reference(wrapper, vec![]);
    let (module, name) = compile(&table, bare);

    assert_eq!(check(&module, &name, json!({"value": 3})), None);
    assert_eq!(
        check(&module, &name, json!({"value": "3"})),
        failure("$.value", "expected a number")
    );
}

#[test]
fn test_generic_base_type() {
    // interface A<T> { a: T }  interface B<U> extends A<U> { b: U }  B<number>
    let mut table = TypeTable::new();
    let t = table.type_parameter("T", None);
    let a = table.interface("A", vec![t]);
    table.property(a, "a", t, false);
    let u = table.type_parameter("U", None);
    let b = table.interface("B", vec![u]);
    let a_of_u = table.reference(a, vec![u]);
    table.extend(b, a_of_u);
    table.property(b, "b", u, false);
    let number = table.number();
    let b_number = table.reference(b, vec![number]);
    let (module, name) = compile(&table, b_number);

    assert_eq!(check(&module, &name, json!({"a": 1, "b": 2})), None);
    assert_eq!(
        check(&module, &name, json!({"a": "1", "b": 2})),
        failure("$.a", "expected a number")
    );
    assert_eq!(
        check(&module, &name, json!({"b": 2})),
        failure("$", "expected 'a' in object")
    );
}

#[test]
fn test_non_generic_base_type() {
    let mut table = TypeTable::new();
    let string = table.string();
    let base = table.interface("Base", vec![]);
    table.property(base, "id", string, false);
    let derived = table.interface("Derived", vec![]);
    table.extend(derived, base);
    table.property(derived, "name", string, false);
    let (module, name) = compile(&table, derived);

    assert_eq!(check(&module, &name, json!({"id": "1", "name": "n"})), None);
    assert_eq!(
        check(&module, &name, json!({"name": "n"})),
        failure("$", "expected 'id' in object")
    );
}

#[test]
fn test_expanding_generic_is_rejected() {
    // interface Tree<T> { value: T; child?: Tree<T[]> }
    let mut table = TypeTable::new();
    let t = table.type_parameter("T", None);
    let tree = table.interface("Tree", vec![t]);
    table.property(tree, "value", t, false);
    let t_array = table.array(t);
    let tree_of_array = table.reference(tree, vec![t_array]);
    table.property(tree, "child", tree_of_array, true);
    let string = table.string();
    let tree_string = table.reference(tree, vec![string]);

    let mut compiler = ValidatorCompiler::new(&table, ValidatorOptions::default());
    let err = compiler.compile_validator(tree_string).unwrap_err();
    assert!(matches!(err, CompileError::InstantiationTooDeep { .. }));
    assert_eq!(compiler.context().mapper().depth(), 0);
}

// =============================================================================
// keyof and indexed access
// =============================================================================

/// interface Shape { a: string; b: number }
fn shape(table: &mut TypeTable) -> TypeId {
    let shape = table.interface("Shape", vec![]);
    let string = table.string();
    let number = table.number();
    table.property(shape, "a", string, false);
    table.property(shape, "b", number, false);
    shape
}

#[test]
fn test_keyof() {
    let mut table = TypeTable::new();
    let shape = shape(&mut table);
    let keys = table.keyof(shape);
    let (module, name) = compile(&table, keys);

    assert_eq!(name, format!("_{shape}K"));
    assert_eq!(check(&module, &name, json!("a")), None);
    assert_eq!(check(&module, &name, json!("b")), None);
    assert_eq!(
        check(&module, &name, json!("c")),
        failure("$", "expected \"a\" | \"b\"")
    );
}

#[test]
fn test_keyof_numeric_key_accepts_number() {
    // keyof { 0: string; "01": string; a: string }
    let mut table = TypeTable::new();
    let string = table.string();
    let tuple_like = table.interface("Pair", vec![]);
    table.property(tuple_like, "0", string, false);
    table.property(tuple_like, "01", string, false);
    table.property(tuple_like, "a", string, false);
    let keys = table.keyof(tuple_like);
    let (module, name) = compile(&table, keys);

    assert_eq!(check(&module, &name, json!(0)), None);
    assert_eq!(check(&module, &name, json!("0")), None);
    assert_eq!(check(&module, &name, json!("01")), None);
    assert_eq!(check(&module, &name, json!("a")), None);
    assert_eq!(
        check(&module, &name, json!(1)),
        failure("$", "expected \"0\" | 0 | \"01\" | \"a\"")
    );
}

#[test]
fn test_keyof_string_index_is_string() {
    let mut table = TypeTable::new();
    let number = table.number();
    let dict = table.interface("Dict", vec![]);
    table.set_string_index(dict, number);
    let keys = table.keyof(dict);
    let (_, name) = compile(&table, keys);
    assert_eq!(name, "_string");
}

#[test]
fn test_indexed_access_single_key() {
    let mut table = TypeTable::new();
    let shape = shape(&mut table);
    let key = table.string_literal("a");
    let access = table.indexed_access(shape, key);
    let (module, name) = compile(&table, access);

    assert_eq!(check(&module, &name, json!("text")), None);
    assert_eq!(check(&module, &name, json!(1)), failure("$", "expected a string"));
}

#[test]
fn test_indexed_access_union_key() {
    let mut table = TypeTable::new();
    let shape = shape(&mut table);
    let a = table.string_literal("a");
    let b = table.string_literal("b");
    let key = table.union(vec![a, b]);
    let access = table.indexed_access(shape, key);
    let (module, name) = compile(&table, access);

    assert_eq!(check(&module, &name, json!("text")), None);
    assert_eq!(check(&module, &name, json!(1)), None);
    assert_eq!(
        check(&module, &name, json!(true)),
        failure("$", "there are no valid alternatives.")
    );
}

#[test]
fn test_indexed_access_by_keyof() {
    // Shape[keyof Shape]
    let mut table = TypeTable::new();
    let shape = shape(&mut table);
    let keys = table.keyof(shape);
    let access = table.indexed_access(shape, keys);
    let (module, name) = compile(&table, access);

    assert_eq!(check(&module, &name, json!(1)), None);
    assert_eq!(check(&module, &name, json!("x")), None);
    assert!(check(&module, &name, json!(null)).is_some());
}

#[test]
fn test_indexed_access_through_type_parameter() {
    // interface Picker<K> { value: Shape[K] }  Picker<"a">
    let mut table = TypeTable::new();
    let shape = shape(&mut table);
    let k = table.type_parameter("K", None);
    let picker = table.interface("Picker", vec![k]);
    let access = table.indexed_access(shape, k);
    table.property(picker, "value", access, false);
    let a = table.string_literal("a");
    let picker_a = table.reference(picker, vec![a]);
    let (module, name) = compile(&table, picker_a);

    assert_eq!(check(&module, &name, json!({"value": "x"})), None);
    assert_eq!(
        check(&module, &name, json!({"value": 1})),
        failure("$.value", "expected a string")
    );
}

#[test]
fn test_indexed_access_missing_key() {
    let mut table = TypeTable::new();
    let shape = shape(&mut table);
    let key = table.string_literal("missing");
    let access = table.indexed_access(shape, key);

    let mut compiler = ValidatorCompiler::new(&table, ValidatorOptions::default());
    let err = compiler.compile_validator(access).unwrap_err();
    assert!(matches!(err, CompileError::InvalidIndexType { .. }));
    assert!(compiler.context().registry().is_empty());
}

#[test]
fn test_invalid_index_type() {
    let mut table = TypeTable::new();
    let shape = shape(&mut table);
    let number = table.number();
    let access = table.indexed_access(shape, number);

    let mut compiler = ValidatorCompiler::new(&table, ValidatorOptions::default());
    assert!(matches!(
        compiler.compile_validator(access),
        Err(CompileError::InvalidIndexType { .. })
    ));
}

/// { x: string } and { y: number; k: string }
fn halves(table: &mut TypeTable) -> (TypeId, TypeId) {
    let string = table.string();
    let number = table.number();
    let left = table.object_literal();
    table.property(left, "x", string, false);
    let right = table.object_literal();
    table.property(right, "y", number, false);
    table.property(right, "k", string, false);
    (left, right)
}

#[test]
fn test_indexed_access_on_intersection() {
    let mut table = TypeTable::new();
    let (left, right) = halves(&mut table);
    let both = table.intersection(vec![left, right]);
    let y = table.string_literal("y");
    let access = table.indexed_access(both, y);
    let (module, name) = compile(&table, access);

    assert_eq!(check(&module, &name, json!(1)), None);
    assert_eq!(check(&module, &name, json!("a")), failure("$", "expected a number"));
}

#[test]
fn test_indexed_access_on_intersection_union_key() {
    let mut table = TypeTable::new();
    let (left, right) = halves(&mut table);
    let both = table.intersection(vec![left, right]);
    let x = table.string_literal("x");
    let y = table.string_literal("y");
    let key = table.union(vec![x, y]);
    let access = table.indexed_access(both, key);
    let (module, name) = compile(&table, access);

    assert_eq!(check(&module, &name, json!("a")), None);
    assert_eq!(check(&module, &name, json!(1)), None);
    assert!(check(&module, &name, json!(true)).is_some());
}

#[test]
fn test_indexed_access_on_intersection_shared_key() {
    // ({ k: string } & { k: "a" | "b" })["k"] only accepts "a" and "b"
    let mut table = TypeTable::new();
    let string = table.string();
    let a = table.string_literal("a");
    let b = table.string_literal("b");
    let narrow = table.union(vec![a, b]);
    let wide = table.object_literal();
    table.property(wide, "k", string, false);
    let tight = table.object_literal();
    table.property(tight, "k", narrow, false);
    let both = table.intersection(vec![wide, tight]);
    let k = table.string_literal("k");
    let access = table.indexed_access(both, k);
    let (module, name) = compile(&table, access);

    assert_eq!(check(&module, &name, json!("a")), None);
    assert!(check(&module, &name, json!("c")).is_some());
    assert!(check(&module, &name, json!(1)).is_some());
}

#[test]
fn test_indexed_access_on_intersection_missing_key() {
    let mut table = TypeTable::new();
    let (left, right) = halves(&mut table);
    let both = table.intersection(vec![left, right]);
    let z = table.string_literal("z");
    let access = table.indexed_access(both, z);

    let mut compiler = ValidatorCompiler::new(&table, ValidatorOptions::default());
    let err = compiler.compile_validator(access).unwrap_err();
    assert!(matches!(err, CompileError::InvalidIndexType { .. }));
    assert!(compiler.context().registry().is_empty());
}

#[test]
fn test_indexed_access_on_union() {
    // ({ x: string; k: string } | { y: number; k: number })["k"]
    let mut table = TypeTable::new();
    let string = table.string();
    let number = table.number();
    let left = table.object_literal();
    table.property(left, "x", string, false);
    table.property(left, "k", string, false);
    let right = table.object_literal();
    table.property(right, "y", number, false);
    table.property(right, "k", number, false);
    let either = table.union(vec![left, right]);
    let k = table.string_literal("k");
    let access = table.indexed_access(either, k);
    let (module, name) = compile(&table, access);

    assert_eq!(check(&module, &name, json!("a")), None);
    assert_eq!(check(&module, &name, json!(1)), None);
    assert_eq!(
        check(&module, &name, json!(null)),
        failure("$", "there are no valid alternatives.")
    );

    let x = table.string_literal("x");
    let access = table.indexed_access(either, x);
    let mut compiler = ValidatorCompiler::new(&table, ValidatorOptions::default());
    assert!(matches!(
        compiler.compile_validator(access),
        Err(CompileError::InvalidIndexType { .. })
    ));
}

// =============================================================================
// Index signatures and options
// =============================================================================

#[test]
fn test_string_index_signature() {
    // interface Counts { total: number; [key: string]: number }
    let mut table = TypeTable::new();
    let number = table.number();
    let counts = table.interface("Counts", vec![]);
    table.property(counts, "total", number, false);
    table.set_string_index(counts, number);
    let (module, name) = compile(&table, counts);

    assert_eq!(check(&module, &name, json!({"total": 2, "a": 1, "b": 1})), None);
    assert_eq!(
        check(&module, &name, json!({"total": 2, "a": "1"})),
        failure("$.a", "expected a number")
    );
}

#[test]
fn test_disallow_superfluous_properties() {
    let mut table = TypeTable::new();
    let user = user(&mut table);
    let options = ValidatorOptions {
        disallow_superfluous_object_properties: true,
        ..ValidatorOptions::default()
    };
    let (module, name) = compile_with(&table, options, user);

    assert_eq!(check(&module, &name, json!({"name": "Ada", "age": 1})), None);
    assert_eq!(
        check(&module, &name, json!({"name": "Ada", "extra": 1})),
        failure("$", "superfluous property 'extra' in object")
    );
}

/// interface Greeter { name: string; greet(): string }
fn greeter(table: &mut TypeTable) -> TypeId {
    let greeter = table.interface("Greeter", vec![]);
    let string = table.string();
    table.property(greeter, "name", string, false);
    table.method(greeter, "greet");
    greeter
}

#[test]
fn test_methods_follow_function_behavior() {
    let mut table = TypeTable::new();
    let greeter = greeter(&mut table);

    let mut compiler = ValidatorCompiler::new(&table, ValidatorOptions::default());
    assert_eq!(
        compiler.compile_validator(greeter),
        Err(CompileError::FunctionNotAllowed {
            location: "method 'greet'".to_string()
        })
    );

    let options = ValidatorOptions {
        function_behavior: FunctionBehavior::Basic,
        ..ValidatorOptions::default()
    };
    let (module, name) = compile_with(&table, options, greeter);
    assert_eq!(
        check(&module, &name, json!({"name": "n"})),
        failure("$", "expected 'greet' in object")
    );
    assert_eq!(
        check(&module, &name, json!({"name": "n", "greet": 1})),
        failure("$.greet", "expected a function")
    );
}

#[test]
fn test_ignore_methods() {
    let mut table = TypeTable::new();
    let greeter = greeter(&mut table);
    let options = ValidatorOptions {
        ignore_methods: true,
        ..ValidatorOptions::default()
    };
    let (module, name) = compile_with(&table, options, greeter);
    assert_eq!(check(&module, &name, json!({"name": "n"})), None);
}

#[test]
fn test_ignore_classes() {
    let mut table = TypeTable::new();
    let string = table.string();
    let widget = table.class("Widget", vec![]);
    table.property(widget, "id", string, false);
    let options = ValidatorOptions {
        ignore_classes: true,
        ..ValidatorOptions::default()
    };
    let (module, name) = compile_with(&table, options, widget);
    assert_eq!(name, "_any");
    assert_eq!(check(&module, &name, json!(42)), None);
}

#[test]
fn test_short_circuit() {
    let mut table = TypeTable::new();
    let user = user(&mut table);
    let options = ValidatorOptions {
        short_circuit: true,
        ..ValidatorOptions::default()
    };
    let (module, name) = compile_with(&table, options, user);
    assert_eq!(name, "_any");
    assert_eq!(module.functions.len(), 1);
}

#[test]
fn test_plain_messages_without_detail() {
    let mut table = TypeTable::new();
    let user = user(&mut table);
    let options = ValidatorOptions {
        emit_detailed_errors: false,
        ..ValidatorOptions::default()
    };
    let (module, name) = compile_with(&table, options, user);
    assert_eq!(
        check(&module, &name, json!({"name": 1})).as_deref(),
        Some("validation failed")
    );
    assert!(!module.print().contains("path.join"));
}

#[test]
fn test_failed_compile_leaves_no_reservations() {
    let mut table = TypeTable::new();
    let function = table.function();
    let holder = table.interface("Holder", vec![]);
    table.property(holder, "callback", function, false);

    let mut compiler = ValidatorCompiler::new(&table, ValidatorOptions::default());
    assert!(compiler.compile_validator(holder).is_err());
    let holder_name = format!("_{holder}");
    assert!(!compiler.context().registry().contains(&holder_name));
}
