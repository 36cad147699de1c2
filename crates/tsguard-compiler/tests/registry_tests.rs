use super::*;

fn accept(name: &str) -> IRNode {
    IRNode::func_decl(name, vec![], vec![IRNode::ret(Some(IRNode::NullLiteral))])
}

#[test]
fn test_reserved_name_is_visible_before_definition() {
    let mut registry = FunctionRegistry::new();
    assert!(registry.reserve("_1"));
    assert!(!registry.reserve("_1"));
    assert!(registry.contains("_1"));
    assert!(registry.get("_1").is_none());

    registry.define("_1", accept("_1"));
    assert!(registry.get("_1").is_some());
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_release_drops_pending_reservation() {
    let mut registry = FunctionRegistry::new();
    registry.reserve("_1");
    registry.release("_1");
    assert!(!registry.contains("_1"));
    assert!(registry.reserve("_1"));
}

#[test]
fn test_functions_keep_reservation_order() {
    let mut registry = FunctionRegistry::new();
    registry.reserve("_outer");
    registry.reserve("_inner");
    registry.define("_inner", accept("_inner"));
    registry.define("_outer", accept("_outer"));

    let names: Vec<_> = registry
        .into_functions()
        .iter()
        .filter_map(|f| f.function_name().map(str::to_string))
        .collect();
    assert_eq!(names, vec!["_outer", "_inner"]);
}

#[test]
fn test_release_keeps_defined_functions() {
    let mut registry = FunctionRegistry::new();
    registry.reserve("_1");
    registry.define("_1", accept("_1"));
    registry.release("_1");
    assert!(registry.contains("_1"));
}
