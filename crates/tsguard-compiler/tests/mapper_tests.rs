use super::*;
use tsguard_types::TypeTable;

fn push_reference(stack: &mut TypeMapperStack, table: &TypeTable, reference: TypeId) {
    let frame = get_type_reference_mapping(table, reference, stack.depth()).unwrap();
    stack.push(frame, reference).unwrap();
}

#[test]
fn test_instantiated_parameter_resolves_to_argument() {
    let mut table = TypeTable::new();
    let t = table.type_parameter("T", None);
    let boxed = table.interface("Box", vec![t]);
    table.property(boxed, "value", t, false);
    let string = table.string();
    let box_string = table.reference(boxed, vec![string]);

    let mut stack = TypeMapperStack::new();
    push_reference(&mut stack, &table, box_string);

    let resolved = stack.get_resolved_type_parameter(&table, t).unwrap();
    assert_eq!(resolved.ty, string);
    assert_eq!(resolved.scope, 0);
}

#[test]
fn test_unbound_parameter_falls_back_to_default() {
    let mut table = TypeTable::new();
    let number = table.number();
    let t = table.type_parameter("T", Some(number));

    let stack = TypeMapperStack::new();
    let resolved = stack.get_resolved_type_parameter(&table, t).unwrap();
    assert_eq!(resolved.ty, number);
}

#[test]
fn test_unbound_parameter_without_default_is_an_error() {
    let mut table = TypeTable::new();
    let t = table.type_parameter("T", None);

    let stack = TypeMapperStack::new();
    let err = stack.get_resolved_type_parameter(&table, t).unwrap_err();
    assert_eq!(
        err,
        CompileError::UnboundTypeParameter {
            name: "T".to_string()
        }
    );
}

#[test]
fn test_base_type_parameter_resolves_through_extends_clause() {
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

    let mapping = get_type_reference_mapping(&table, b_number, 0).unwrap();
    assert_eq!(mapping.get(&u), Some(&Binding { ty: number, scope: 0 }));
    assert_eq!(mapping.get(&t), Some(&Binding { ty: u, scope: 1 }));

    let mut stack = TypeMapperStack::new();
    stack.push(mapping, b_number).unwrap();
    let resolved = stack.get_resolved_type_parameter(&table, t).unwrap();
    assert_eq!(resolved.ty, number);
}

#[test]
fn test_deep_base_chain_is_walked() {
    // C<V> extends B<V>, B<U> extends A<U>, A<T>
    let mut table = TypeTable::new();
    let t = table.type_parameter("T", None);
    let a = table.interface("A", vec![t]);
    let u = table.type_parameter("U", None);
    let b = table.interface("B", vec![u]);
    let a_of_u = table.reference(a, vec![u]);
    table.extend(b, a_of_u);
    let v = table.type_parameter("V", None);
    let c = table.interface("C", vec![v]);
    let b_of_v = table.reference(b, vec![v]);
    table.extend(c, b_of_v);
    let string = table.string();
    let c_string = table.reference(c, vec![string]);

    let mut stack = TypeMapperStack::new();
    push_reference(&mut stack, &table, c_string);
    assert_eq!(
        stack.get_resolved_type_parameter(&table, t).unwrap().ty,
        string
    );
}

#[test]
fn test_self_mapped_parameter_is_skipped() {
    // interface Node<T> { next: Node<T> }
    let mut table = TypeTable::new();
    let t = table.type_parameter("T", None);
    let node = table.interface("Node", vec![t]);
    let inner = table.reference(node, vec![t]);
    table.property(node, "next", inner, false);

    let mapping = get_type_reference_mapping(&table, inner, 1).unwrap();
    assert!(mapping.is_empty());
}

#[test]
fn test_argument_is_read_in_its_own_scope() {
    // interface Tree<T> { children: Tree<T[]> }  Tree<string>
    let mut table = TypeTable::new();
    let t = table.type_parameter("T", None);
    let tree = table.interface("Tree", vec![t]);
    let t_array = table.array(t);
    let inner = table.reference(tree, vec![t_array]);
    table.property(tree, "children", inner, false);
    let string = table.string();
    let outer = table.reference(tree, vec![string]);

    let mut stack = TypeMapperStack::new();
    push_reference(&mut stack, &table, outer);
    push_reference(&mut stack, &table, inner);

    let resolved = stack.get_resolved_type_parameter(&table, t).unwrap();
    assert_eq!(resolved, Binding { ty: t_array, scope: 1 });

    let detached = stack.detach_above(resolved.scope);
    assert_eq!(
        stack.get_resolved_type_parameter(&table, t).unwrap().ty,
        string
    );
    stack.reattach(detached);
    assert_eq!(stack.depth(), 2);
}

#[test]
fn test_inner_frame_shadows_outer() {
    let mut table = TypeTable::new();
    let t = table.type_parameter("T", None);
    let boxed = table.interface("Box", vec![t]);
    let string = table.string();
    let number = table.number();
    let box_string = table.reference(boxed, vec![string]);
    let box_number = table.reference(boxed, vec![number]);

    let mut stack = TypeMapperStack::new();
    push_reference(&mut stack, &table, box_string);
    push_reference(&mut stack, &table, box_number);
    assert_eq!(
        stack.get_resolved_type_parameter(&table, t).unwrap().ty,
        number
    );
    stack.pop();
    assert_eq!(
        stack.get_resolved_type_parameter(&table, t).unwrap().ty,
        string
    );
}

#[test]
fn test_push_is_bounded() {
    let mut table = TypeTable::new();
    let string = table.string();
    let mut stack = TypeMapperStack::new();
    for _ in 0..MAX_INSTANTIATION_DEPTH {
        stack.push(TypeMapping::default(), string).unwrap();
    }
    let err = stack.push(TypeMapping::default(), string).unwrap_err();
    assert!(matches!(err, CompileError::InstantiationTooDeep { .. }));
}

#[test]
fn test_mapping_of_non_reference_is_rejected() {
    let mut table = TypeTable::new();
    let string = table.string();
    let err = get_type_reference_mapping(&table, string, 0).unwrap_err();
    assert!(matches!(err, CompileError::UnsupportedType { .. }));
}
