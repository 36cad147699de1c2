//! Direct interpreter for generated validator IR.
//!
//! Validators are emitted as a small, closed subset of JavaScript: function
//! declarations, `var`, `if`, counting `for` loops, `return`, `throw`, and a
//! handful of operators and builtins (`Array.isArray`, `Object.keys`,
//! `Array.prototype.{join,concat,indexOf}`, `new Error`). `IREvaluator` runs
//! that subset over [`JsValue`]s so the output of the compiler can be checked
//! without an external JavaScript engine. Anything outside the subset is
//! reported as [`EvalError::Unsupported`].

mod value;

pub use value::{Builtin, JsFunction, JsValue, Method};

use std::rc::Rc;

use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use tracing::trace;
use tsguard_common::limits::MAX_EVAL_CALL_DEPTH;

use crate::transforms::ir::IRNode;
use value::join_values;

#[derive(Debug, thiserror::Error)]
pub enum EvalError {
    #[error("call to undeclared function `{0}`")]
    UnknownFunction(String),
    #[error("`{0}` is not defined")]
    UnknownIdentifier(String),
    #[error("unsupported construct: {0}")]
    Unsupported(String),
    #[error("TypeError: {0}")]
    TypeError(String),
    #[error("maximum call depth of {0} exceeded")]
    CallDepthExceeded(usize),
    #[error("uncaught exception: {}", thrown_message(.0))]
    Thrown(JsValue),
    #[error("`{0}` is not a function")]
    NotCallable(String),
}

impl EvalError {
    /// The `message` of a thrown `Error`, or the thrown value itself.
    pub fn thrown_message(&self) -> Option<String> {
        match self {
            Self::Thrown(value) => Some(thrown_message(value)),
            _ => None,
        }
    }
}

fn thrown_message(value: &JsValue) -> String {
    value
        .get("message")
        .map_or_else(|| value.to_js_string(), JsValue::to_js_string)
}

enum Completion {
    Normal,
    Return(JsValue),
}

type Locals = FxHashMap<String, JsValue>;

/// Stack left before a validator call switches to a fresh segment. One call
/// nests roughly ten interpreter frames before it reaches the next call.
const STACK_RED_ZONE: usize = 256 * 1024;
const STACK_GROWTH: usize = 2 * 1024 * 1024;

/// Interpreter over a set of top-level function declarations.
pub struct IREvaluator {
    functions: FxHashMap<String, Rc<(Vec<String>, Vec<IRNode>)>>,
    globals: FxHashMap<String, JsValue>,
    depth: usize,
}

impl IREvaluator {
    /// Register every `FunctionDecl` in `program`, including those nested in
    /// `Sequence` nodes. Other top-level nodes are ignored.
    pub fn new(program: &[IRNode]) -> Self {
        let mut evaluator = Self {
            functions: FxHashMap::default(),
            globals: FxHashMap::default(),
            depth: 0,
        };
        evaluator.declare_all(program);
        evaluator
    }

    fn declare_all(&mut self, nodes: &[IRNode]) {
        for node in nodes {
            match node {
                IRNode::FunctionDecl {
                    name,
                    parameters,
                    body,
                } => {
                    let params = parameters.iter().map(|p| p.name.clone()).collect();
                    self.functions
                        .insert(name.clone(), Rc::new((params, body.clone())));
                }
                IRNode::Sequence(inner) => self.declare_all(inner),
                _ => {}
            }
        }
    }

    pub fn has_function(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    /// Bind a global identifier visible to every function.
    pub fn set_global(&mut self, name: impl Into<String>, value: JsValue) {
        self.globals.insert(name.into(), value);
    }

    /// Call a declared function by name.
    pub fn call(&mut self, name: &str, args: Vec<JsValue>) -> Result<JsValue, EvalError> {
        let decl = self
            .functions
            .get(name)
            .cloned()
            .ok_or_else(|| EvalError::UnknownFunction(name.to_string()))?;
        self.invoke(name, &decl.0, &decl.1, args)
    }

    /// Evaluate a standalone expression with an empty local scope.
    pub fn eval_expression(&mut self, expr: &IRNode) -> Result<JsValue, EvalError> {
        let mut locals = Locals::default();
        self.eval(expr, &mut locals)
    }

    /// Call any function value (declared, closure, builtin or method).
    pub fn call_value(&mut self, callee: &JsValue, args: Vec<JsValue>) -> Result<JsValue, EvalError> {
        let JsValue::Function(function) = callee else {
            return Err(EvalError::NotCallable(callee.to_js_string()));
        };
        match function.as_ref() {
            JsFunction::Declared(name) => self.call(name, args),
            JsFunction::Closure { params, body } => self.invoke("<anonymous>", params, body, args),
            JsFunction::Builtin(builtin) => call_builtin(*builtin, args),
            JsFunction::Method { receiver, method } => call_method(receiver, *method, args),
        }
    }

    fn invoke(
        &mut self,
        name: &str,
        params: &[String],
        body: &[IRNode],
        args: Vec<JsValue>,
    ) -> Result<JsValue, EvalError> {
        if self.depth >= MAX_EVAL_CALL_DEPTH {
            return Err(EvalError::CallDepthExceeded(MAX_EVAL_CALL_DEPTH));
        }
        trace!(function = name, depth = self.depth, "eval call");
        let mut locals = Locals::default();
        let mut args = args.into_iter();
        for param in params {
            locals.insert(param.clone(), args.next().unwrap_or(JsValue::Undefined));
        }

        self.depth += 1;
        let result = stacker::maybe_grow(STACK_RED_ZONE, STACK_GROWTH, || {
            self.exec_all(body, &mut locals)
        });
        self.depth -= 1;

        match result? {
            Completion::Return(value) => Ok(value),
            Completion::Normal => Ok(JsValue::Undefined),
        }
    }

    // =========================================================================
    // Statements
    // =========================================================================

    fn exec_all(&mut self, stmts: &[IRNode], locals: &mut Locals) -> Result<Completion, EvalError> {
        for stmt in stmts {
            if let Completion::Return(value) = self.exec(stmt, locals)? {
                return Ok(Completion::Return(value));
            }
        }
        Ok(Completion::Normal)
    }

    fn exec(&mut self, stmt: &IRNode, locals: &mut Locals) -> Result<Completion, EvalError> {
        match stmt {
            IRNode::VarDecl { name, initializer } => {
                let value = match initializer {
                    Some(init) => self.eval(init, locals)?,
                    None => JsValue::Undefined,
                };
                locals.insert(name.clone(), value);
                Ok(Completion::Normal)
            }
            IRNode::ExpressionStatement(expr) => {
                self.eval(expr, locals)?;
                Ok(Completion::Normal)
            }
            IRNode::ReturnStatement(expr) => {
                let value = match expr {
                    Some(e) => self.eval(e, locals)?,
                    None => JsValue::Undefined,
                };
                Ok(Completion::Return(value))
            }
            IRNode::IfStatement {
                condition,
                then_branch,
                else_branch,
            } => {
                if self.eval(condition, locals)?.truthy() {
                    self.exec(then_branch, locals)
                } else if let Some(else_b) = else_branch {
                    self.exec(else_b, locals)
                } else {
                    Ok(Completion::Normal)
                }
            }
            IRNode::Block(stmts) | IRNode::Sequence(stmts) => self.exec_all(stmts, locals),
            IRNode::ForStatement {
                initializer,
                condition,
                incrementor,
                body,
            } => {
                if let Some(init) = initializer {
                    self.exec_or_eval(init, locals)?;
                }
                loop {
                    if let Some(cond) = condition {
                        if !self.eval(cond, locals)?.truthy() {
                            break;
                        }
                    }
                    if let Completion::Return(value) = self.exec(body, locals)? {
                        return Ok(Completion::Return(value));
                    }
                    if let Some(incr) = incrementor {
                        self.eval(incr, locals)?;
                    }
                }
                Ok(Completion::Normal)
            }
            IRNode::ThrowStatement(expr) => Err(EvalError::Thrown(self.eval(expr, locals)?)),
            IRNode::Comment(_) => Ok(Completion::Normal),
            IRNode::FunctionDecl { name, .. } => Err(EvalError::Unsupported(format!(
                "nested function declaration `{name}`"
            ))),
            expr => {
                self.eval(expr, locals)?;
                Ok(Completion::Normal)
            }
        }
    }

    fn exec_or_eval(&mut self, node: &IRNode, locals: &mut Locals) -> Result<(), EvalError> {
        if matches!(node, IRNode::VarDecl { .. }) {
            self.exec(node, locals)?;
        } else {
            self.eval(node, locals)?;
        }
        Ok(())
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    fn eval(&mut self, expr: &IRNode, locals: &mut Locals) -> Result<JsValue, EvalError> {
        match expr {
            IRNode::NumericLiteral(text) => text
                .parse::<f64>()
                .map(JsValue::Number)
                .map_err(|_| EvalError::Unsupported(format!("numeric literal `{text}`"))),
            IRNode::StringLiteral(s) => Ok(JsValue::string(s)),
            IRNode::BooleanLiteral(b) => Ok(JsValue::Bool(*b)),
            IRNode::NullLiteral => Ok(JsValue::Null),
            IRNode::Undefined => Ok(JsValue::Undefined),
            IRNode::Identifier(name) => self.lookup(name, locals),

            IRNode::LogicalAnd { left, right } => {
                let l = self.eval(left, locals)?;
                if l.truthy() {
                    self.eval(right, locals)
                } else {
                    Ok(l)
                }
            }
            IRNode::LogicalOr { left, right } => {
                let l = self.eval(left, locals)?;
                if l.truthy() {
                    Ok(l)
                } else {
                    self.eval(right, locals)
                }
            }

            IRNode::BinaryExpr {
                left,
                operator,
                right,
            } => {
                if operator == "=" {
                    let value = self.eval(right, locals)?;
                    self.assign(left, value.clone(), locals)?;
                    return Ok(value);
                }
                let l = self.eval(left, locals)?;
                let r = self.eval(right, locals)?;
                binary_op(operator, &l, &r)
            }
            IRNode::PrefixUnaryExpr { operator, operand } => {
                let value = self.eval(operand, locals)?;
                match operator.as_str() {
                    "!" => Ok(JsValue::Bool(!value.truthy())),
                    "typeof" => Ok(JsValue::string(value.type_of())),
                    "-" => match value {
                        JsValue::Number(n) => Ok(JsValue::Number(-n)),
                        other => Err(EvalError::Unsupported(format!(
                            "unary minus on {}",
                            other.type_of()
                        ))),
                    },
                    "void" => Ok(JsValue::Undefined),
                    op => Err(EvalError::Unsupported(format!("prefix operator `{op}`"))),
                }
            }
            IRNode::PostfixUnaryExpr { operand, operator } => {
                if operator != "++" {
                    return Err(EvalError::Unsupported(format!(
                        "postfix operator `{operator}`"
                    )));
                }
                let JsValue::Number(old) = self.eval(operand, locals)? else {
                    return Err(EvalError::Unsupported("increment of a non-number".into()));
                };
                self.assign(operand, JsValue::Number(old + 1.0), locals)?;
                Ok(JsValue::Number(old))
            }

            IRNode::CallExpr { callee, arguments } => {
                let callee_value = self.eval(callee, locals)?;
                let args = self.eval_list(arguments, locals)?;
                if !matches!(callee_value, JsValue::Function(_)) {
                    return Err(EvalError::NotCallable(describe_callee(callee)));
                }
                self.call_value(&callee_value, args)
            }
            IRNode::NewExpr { callee, arguments } => {
                let callee_value = self.eval(callee, locals)?;
                let args = self.eval_list(arguments, locals)?;
                match &callee_value {
                    JsValue::Function(f)
                        if matches!(f.as_ref(), JsFunction::Builtin(Builtin::ErrorConstructor)) =>
                    {
                        call_builtin(Builtin::ErrorConstructor, args)
                    }
                    _ => Err(EvalError::Unsupported(format!(
                        "new {}",
                        describe_callee(callee)
                    ))),
                }
            }
            IRNode::PropertyAccess { object, property } => {
                let receiver = self.eval(object, locals)?;
                get_property(&receiver, property)
            }
            IRNode::ElementAccess { object, index } => {
                let receiver = self.eval(object, locals)?;
                let key = self.eval(index, locals)?;
                get_element(&receiver, &key)
            }
            IRNode::ArrayLiteral(elements) => Ok(JsValue::array(self.eval_list(elements, locals)?)),
            IRNode::FunctionExpr {
                parameters, body, ..
            } => Ok(JsValue::function(JsFunction::Closure {
                params: parameters.iter().map(|p| p.name.clone()).collect(),
                body: body.clone(),
            })),
            other => Err(EvalError::Unsupported(format!(
                "statement in expression position: {other:?}"
            ))),
        }
    }

    fn eval_list(&mut self, nodes: &[IRNode], locals: &mut Locals) -> Result<Vec<JsValue>, EvalError> {
        nodes.iter().map(|n| self.eval(n, locals)).collect()
    }

    fn lookup(&self, name: &str, locals: &Locals) -> Result<JsValue, EvalError> {
        if let Some(value) = locals.get(name) {
            return Ok(value.clone());
        }
        if let Some(value) = self.globals.get(name) {
            return Ok(value.clone());
        }
        if self.functions.contains_key(name) {
            return Ok(JsValue::function(JsFunction::Declared(name.to_string())));
        }
        match name {
            "undefined" => Ok(JsValue::Undefined),
            "Array" => Ok(JsValue::function(JsFunction::Builtin(
                Builtin::ArrayConstructor,
            ))),
            "Object" => Ok(JsValue::function(JsFunction::Builtin(
                Builtin::ObjectConstructor,
            ))),
            "Error" => Ok(JsValue::function(JsFunction::Builtin(
                Builtin::ErrorConstructor,
            ))),
            _ => Err(EvalError::UnknownIdentifier(name.to_string())),
        }
    }

    fn assign(&mut self, target: &IRNode, value: JsValue, locals: &mut Locals) -> Result<(), EvalError> {
        match target {
            IRNode::Identifier(name) => {
                if locals.contains_key(name) {
                    locals.insert(name.clone(), value);
                } else {
                    self.globals.insert(name.clone(), value);
                }
                Ok(())
            }
            other => Err(EvalError::Unsupported(format!(
                "assignment to {}",
                describe_callee(other)
            ))),
        }
    }
}

fn describe_callee(node: &IRNode) -> String {
    match node {
        IRNode::Identifier(name) => name.clone(),
        IRNode::PropertyAccess { object, property } => {
            format!("{}.{property}", describe_callee(object))
        }
        _ => "expression".to_string(),
    }
}

fn binary_op(operator: &str, l: &JsValue, r: &JsValue) -> Result<JsValue, EvalError> {
    let result = match operator {
        "===" => JsValue::Bool(l.strict_equals(r)),
        "!==" => JsValue::Bool(!l.strict_equals(r)),
        "+" => match (l, r) {
            (JsValue::Number(a), JsValue::Number(b)) => JsValue::Number(a + b),
            (JsValue::String(_), _) | (_, JsValue::String(_)) => {
                JsValue::string(&format!("{}{}", l.to_js_string(), r.to_js_string()))
            }
            _ => {
                return Err(EvalError::Unsupported(format!(
                    "{} + {}",
                    l.type_of(),
                    r.type_of()
                )));
            }
        },
        "-" => match (l, r) {
            (JsValue::Number(a), JsValue::Number(b)) => JsValue::Number(a - b),
            _ => return Err(EvalError::Unsupported("subtraction of non-numbers".into())),
        },
        "<" | ">" | "<=" | ">=" => {
            let ordering = match (l, r) {
                (JsValue::Number(a), JsValue::Number(b)) => a.partial_cmp(b),
                (JsValue::String(a), JsValue::String(b)) => Some(a.cmp(b)),
                _ => {
                    return Err(EvalError::Unsupported(format!(
                        "comparison of {} and {}",
                        l.type_of(),
                        r.type_of()
                    )));
                }
            };
            let Some(ordering) = ordering else {
                return Ok(JsValue::Bool(false));
            };
            JsValue::Bool(match operator {
                "<" => ordering.is_lt(),
                ">" => ordering.is_gt(),
                "<=" => ordering.is_le(),
                _ => ordering.is_ge(),
            })
        }
        "in" => {
            let key = l.to_js_string();
            match r.has_key(&key) {
                Some(found) => JsValue::Bool(found),
                None => {
                    return Err(EvalError::TypeError(format!(
                        "cannot use 'in' operator to search for '{key}' in {}",
                        r.to_js_string()
                    )));
                }
            }
        }
        op => return Err(EvalError::Unsupported(format!("binary operator `{op}`"))),
    };
    Ok(result)
}

fn get_property(receiver: &JsValue, property: &str) -> Result<JsValue, EvalError> {
    match (receiver, property) {
        (JsValue::Undefined | JsValue::Null, _) => Err(EvalError::TypeError(format!(
            "cannot read properties of {} (reading '{property}')",
            receiver.to_js_string()
        ))),
        (JsValue::Array(items), "length") => Ok(JsValue::Number(items.len() as f64)),
        (JsValue::String(s), "length") => Ok(JsValue::Number(s.encode_utf16().count() as f64)),
        (JsValue::Array(_), "join" | "concat" | "indexOf") => {
            let method = match property {
                "join" => Method::Join,
                "concat" => Method::Concat,
                _ => Method::IndexOf,
            };
            Ok(JsValue::function(JsFunction::Method {
                receiver: receiver.clone(),
                method,
            }))
        }
        (JsValue::Function(f), _) => match (f.as_ref(), property) {
            (JsFunction::Builtin(Builtin::ArrayConstructor), "isArray") => {
                Ok(JsValue::function(JsFunction::Builtin(Builtin::IsArray)))
            }
            (JsFunction::Builtin(Builtin::ObjectConstructor), "keys") => {
                Ok(JsValue::function(JsFunction::Builtin(Builtin::ObjectKeys)))
            }
            _ => Err(EvalError::Unsupported(format!(
                "property `{property}` of a function"
            ))),
        },
        (JsValue::Object(map), _) => Ok(map.get(property).cloned().unwrap_or(JsValue::Undefined)),
        _ => Ok(JsValue::Undefined),
    }
}

fn get_element(receiver: &JsValue, key: &JsValue) -> Result<JsValue, EvalError> {
    match (receiver, key) {
        (JsValue::Array(items), JsValue::Number(n)) => {
            if *n >= 0.0 && n.fract() == 0.0 {
                Ok(items.get(*n as usize).cloned().unwrap_or(JsValue::Undefined))
            } else {
                Ok(JsValue::Undefined)
            }
        }
        (JsValue::Array(items), JsValue::String(s)) => match s.parse::<usize>() {
            Ok(i) => Ok(items.get(i).cloned().unwrap_or(JsValue::Undefined)),
            Err(_) => get_property(receiver, s),
        },
        _ => get_property(receiver, &key.to_js_string()),
    }
}

fn call_builtin(builtin: Builtin, args: Vec<JsValue>) -> Result<JsValue, EvalError> {
    let first = args.into_iter().next().unwrap_or(JsValue::Undefined);
    match builtin {
        Builtin::IsArray => Ok(JsValue::Bool(matches!(first, JsValue::Array(_)))),
        Builtin::ObjectKeys => match &first {
            JsValue::Object(map) => Ok(JsValue::array(
                map.keys().map(|k| JsValue::string(k)).collect(),
            )),
            JsValue::Array(items) => Ok(JsValue::array(
                (0..items.len())
                    .map(|i| JsValue::string(&i.to_string()))
                    .collect(),
            )),
            JsValue::Undefined | JsValue::Null => Err(EvalError::TypeError(
                "cannot convert undefined or null to object".into(),
            )),
            _ => Ok(JsValue::array(Vec::new())),
        },
        Builtin::ErrorConstructor => {
            let mut fields = IndexMap::new();
            fields.insert("name".to_string(), JsValue::string("Error"));
            let message = match first {
                JsValue::Undefined => String::new(),
                other => other.to_js_string(),
            };
            fields.insert("message".to_string(), JsValue::string(&message));
            Ok(JsValue::object(fields))
        }
        Builtin::ArrayConstructor | Builtin::ObjectConstructor => Err(EvalError::Unsupported(
            "calling Array or Object directly".into(),
        )),
    }
}

fn call_method(receiver: &JsValue, method: Method, args: Vec<JsValue>) -> Result<JsValue, EvalError> {
    let JsValue::Array(items) = receiver else {
        return Err(EvalError::TypeError(format!(
            "{method:?} called on {}",
            receiver.type_of()
        )));
    };
    match method {
        Method::Join => {
            let separator = match args.first() {
                None | Some(JsValue::Undefined) => ",".to_string(),
                Some(sep) => sep.to_js_string(),
            };
            Ok(JsValue::string(&join_values(items, &separator)))
        }
        Method::Concat => {
            let mut out: Vec<JsValue> = items.as_ref().clone();
            for arg in args {
                match arg {
                    JsValue::Array(more) => out.extend(more.iter().cloned()),
                    other => out.push(other),
                }
            }
            Ok(JsValue::array(out))
        }
        Method::IndexOf => {
            let needle = args.first().cloned().unwrap_or(JsValue::Undefined);
            let index = items
                .iter()
                .position(|item| item.strict_equals(&needle))
                .map_or(-1.0, |i| i as f64);
            Ok(JsValue::Number(index))
        }
    }
}

#[cfg(test)]
#[path = "../../tests/eval_tests.rs"]
mod tests;
