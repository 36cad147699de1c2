//! Code-emission primitives.
//!
//! Every generated validator has the shape
//!
//! ```javascript
//! function _name(object, path) { ... }
//! ```
//!
//! and returns `null` when `object` conforms or a failure message string
//! otherwise. `path` is an array of segments describing where `object` sits
//! in the value under validation; the root is `["$"]`.

use tsguard_emitter::{IRNode, IRParam};

/// Name of the parameter holding the value under validation.
pub const VALUE_PARAM: &str = "object";
/// Name of the parameter holding the traversal path.
pub const PATH_PARAM: &str = "path";
/// Segment that starts every path.
pub const ROOT_SEGMENT: &str = "$";

const FAILURE_PREFIX: &str = "validation failed at ";
const PLAIN_FAILURE: &str = "validation failed";
const NO_ALTERNATIVES: &str = "there are no valid alternatives.";

pub fn validator_params() -> Vec<IRParam> {
    vec![IRParam::new(VALUE_PARAM), IRParam::new(PATH_PARAM)]
}

pub fn value() -> IRNode {
    IRNode::id(VALUE_PARAM)
}

pub fn path() -> IRNode {
    IRNode::id(PATH_PARAM)
}

/// `["$"]`
pub fn root_path() -> IRNode {
    IRNode::array(vec![IRNode::string(ROOT_SEGMENT)])
}

/// `path.concat(segment)`
pub fn child_path(segment: IRNode) -> IRNode {
    IRNode::call(IRNode::prop(path(), "concat"), vec![segment])
}

/// `"[" + index + "]"`, the path segment of an array element.
pub fn element_segment(index: IRNode) -> IRNode {
    match index {
        IRNode::NumericLiteral(n) => IRNode::string(format!("[{n}]")),
        other => IRNode::binary(
            IRNode::binary(IRNode::string("["), "+", other),
            "+",
            IRNode::string("]"),
        ),
    }
}

/// `name(value, path)`
pub fn call_validator(name: &str, value: IRNode, path: IRNode) -> IRNode {
    IRNode::call(IRNode::id(name), vec![value, path])
}

/// Failure message for a fixed reason.
pub fn failure(reason: &str, detailed: bool) -> IRNode {
    failure_with(vec![IRNode::string(reason)], detailed)
}

/// Failure message whose reason is the concatenation of `reason_parts`:
/// `"validation failed at " + path.join(".") + ": " + reason`.
pub fn failure_with(reason_parts: Vec<IRNode>, detailed: bool) -> IRNode {
    if !detailed {
        return IRNode::string(PLAIN_FAILURE);
    }
    let located = IRNode::binary(
        IRNode::string(FAILURE_PREFIX),
        "+",
        IRNode::call(IRNode::prop(path(), "join"), vec![IRNode::string(".")]),
    );

    let mut parts = reason_parts.into_iter();
    let first = match parts.next() {
        Some(IRNode::StringLiteral(s)) => IRNode::string(format!(": {s}")),
        Some(other) => IRNode::binary(IRNode::string(": "), "+", other),
        None => IRNode::string(":"),
    };
    let head = IRNode::binary(located, "+", first);
    parts.fold(head, |acc, part| IRNode::binary(acc, "+", part))
}

fn return_null() -> IRNode {
    IRNode::ret(Some(IRNode::NullLiteral))
}

/// `var error = <call>; if (error !== null) return error;`
fn propagate(call: IRNode) -> [IRNode; 2] {
    [
        IRNode::var_decl("error", Some(call)),
        IRNode::if_stmt(
            IRNode::strict_ne(IRNode::id("error"), IRNode::NullLiteral),
            IRNode::ret(Some(IRNode::id("error"))),
            None,
        ),
    ]
}

/// Statements that call `validator` on `value` at `path` and return its
/// failure, if any.
pub fn check_and_propagate(validator: &str, value: IRNode, path: IRNode) -> [IRNode; 2] {
    propagate(call_validator(validator, value, path))
}

/// `function name(object, path) { return null; }`
pub fn accepting_function(name: &str) -> IRNode {
    IRNode::func_decl(name, validator_params(), vec![return_null()])
}

/// A validator that always fails with `reason`.
pub fn rejecting_function(name: &str, reason: &str, detailed: bool) -> IRNode {
    IRNode::func_decl(
        name,
        validator_params(),
        vec![IRNode::ret(Some(failure(reason, detailed)))],
    )
}

/// A validator that fails with `reason` when `condition` holds.
pub fn assertion_function(name: &str, condition: IRNode, reason: &str, detailed: bool) -> IRNode {
    IRNode::func_decl(
        name,
        validator_params(),
        vec![
            IRNode::if_stmt(
                condition,
                IRNode::ret(Some(failure(reason, detailed))),
                None,
            ),
            return_null(),
        ],
    )
}

fn validators_loop(names: &[String], on_result: IRNode) -> Vec<IRNode> {
    let list = names.iter().map(|n| IRNode::id(n.as_str())).collect();
    vec![
        IRNode::var_decl("validators", Some(IRNode::array(list))),
        IRNode::for_count(
            "i",
            IRNode::number("0"),
            IRNode::prop(IRNode::id("validators"), "length"),
            vec![
                IRNode::var_decl(
                    "error",
                    Some(IRNode::call(
                        IRNode::elem(IRNode::id("validators"), IRNode::id("i")),
                        vec![value(), path()],
                    )),
                ),
                on_result,
            ],
        ),
    ]
}

/// A validator that passes only if every validator in `names` passes. The
/// first failure is returned and the rest are not run.
pub fn conjunction_function(name: &str, names: &[String]) -> IRNode {
    if names.is_empty() {
        return accepting_function(name);
    }
    let mut body = validators_loop(
        names,
        IRNode::if_stmt(
            IRNode::strict_ne(IRNode::id("error"), IRNode::NullLiteral),
            IRNode::ret(Some(IRNode::id("error"))),
            None,
        ),
    );
    body.push(return_null());
    IRNode::func_decl(name, validator_params(), body)
}

/// A validator that passes as soon as one validator in `names` passes.
pub fn disjunction_function(name: &str, names: &[String], detailed: bool) -> IRNode {
    let mut body = validators_loop(
        names,
        IRNode::if_stmt(
            IRNode::strict_eq(IRNode::id("error"), IRNode::NullLiteral),
            return_null(),
            None,
        ),
    );
    body.push(IRNode::ret(Some(failure(NO_ALTERNATIVES, detailed))));
    IRNode::func_decl(name, validator_params(), body)
}

#[cfg(test)]
#[path = "../tests/emit_tests.rs"]
mod tests;
