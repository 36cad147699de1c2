//! IR Printer - Emits IR nodes to JavaScript strings
//!
//! This module takes IR nodes produced by the validator compiler and emits
//! them as JavaScript source code.
//!
//! # Example
//!
//! ```rust,ignore
//! let ir = IRNode::ret(Some(IRNode::NullLiteral));
//! assert_eq!(IRPrinter::emit_to_string(&ir), "return null;");
//! ```
//!
//! Parentheses are inserted from operator precedence, so a tree built as
//! `!(a in b)` prints with its parentheses.

use crate::transforms::emit_utils::quote_string;
use crate::transforms::ir::{IRNode, IRParam};

const PREC_ASSIGNMENT: u8 = 2;
const PREC_LOGICAL_OR: u8 = 4;
const PREC_LOGICAL_AND: u8 = 5;
const PREC_EQUALITY: u8 = 9;
const PREC_RELATIONAL: u8 = 10;
const PREC_ADDITIVE: u8 = 12;
const PREC_MULTIPLICATIVE: u8 = 13;
const PREC_PREFIX: u8 = 15;
const PREC_POSTFIX: u8 = 16;
const PREC_CALL: u8 = 18;
const PREC_PRIMARY: u8 = 20;

/// IR Printer - converts IR nodes to JavaScript strings
pub struct IRPrinter {
    output: String,
    indent_level: u32,
    indent_str: &'static str,
}

impl IRPrinter {
    /// Create a new IR printer
    pub fn new() -> Self {
        Self {
            output: String::with_capacity(1024),
            indent_level: 0,
            indent_str: "    ",
        }
    }

    /// Emit an IR node to a string
    pub fn emit_to_string(node: &IRNode) -> String {
        let mut printer = Self::new();
        printer.emit_node(node);
        printer.output
    }

    /// Emit a list of top-level statements, one per line
    pub fn emit_program(nodes: &[IRNode]) -> String {
        let mut printer = Self::new();
        for node in nodes {
            printer.emit_node(node);
            printer.write_line();
        }
        printer.output
    }

    /// Get the output
    pub fn get_output(&self) -> &str {
        &self.output
    }

    /// Take the output
    pub fn take_output(self) -> String {
        self.output
    }

    /// Emit a node
    pub fn emit(&mut self, node: &IRNode) -> &mut Self {
        self.emit_node(node);
        self
    }

    fn emit_node(&mut self, node: &IRNode) {
        match node {
            IRNode::NumericLiteral(n) => self.write(n),
            IRNode::StringLiteral(s) => self.write(&quote_string(s)),
            IRNode::BooleanLiteral(b) => self.write(if *b { "true" } else { "false" }),
            IRNode::NullLiteral => self.write("null"),
            IRNode::Undefined => self.write("void 0"),
            IRNode::Identifier(name) => self.write(name),

            IRNode::BinaryExpr {
                left,
                operator,
                right,
            } => {
                let prec = binary_precedence(operator);
                if operator == "=" {
                    // right-associative
                    self.emit_operand(left, prec + 1);
                    self.write(" = ");
                    self.emit_operand(right, prec);
                } else {
                    self.emit_operand(left, prec);
                    self.write(" ");
                    self.write(operator);
                    self.write(" ");
                    self.emit_operand(right, prec + 1);
                }
            }
            IRNode::PrefixUnaryExpr { operator, operand } => {
                self.write(operator);
                if operator.chars().all(char::is_alphabetic) {
                    self.write(" ");
                }
                self.emit_operand(operand, PREC_PREFIX);
            }
            IRNode::PostfixUnaryExpr { operand, operator } => {
                self.emit_operand(operand, PREC_POSTFIX + 1);
                self.write(operator);
            }
            IRNode::CallExpr { callee, arguments } => {
                self.emit_callee(callee);
                self.write("(");
                self.emit_comma_separated(arguments);
                self.write(")");
            }
            IRNode::NewExpr { callee, arguments } => {
                self.write("new ");
                self.emit_callee(callee);
                self.write("(");
                self.emit_comma_separated(arguments);
                self.write(")");
            }
            IRNode::PropertyAccess { object, property } => {
                self.emit_callee(object);
                self.write(".");
                self.write(property);
            }
            IRNode::ElementAccess { object, index } => {
                self.emit_callee(object);
                self.write("[");
                self.emit_node(index);
                self.write("]");
            }
            IRNode::ArrayLiteral(elements) => {
                self.write("[");
                self.emit_comma_separated(elements);
                self.write("]");
            }
            IRNode::FunctionExpr {
                name,
                parameters,
                body,
            } => {
                self.write("function ");
                if let Some(name) = name {
                    self.write(name);
                }
                self.write("(");
                self.emit_parameters(parameters);
                self.write(") ");
                self.emit_function_body(body);
            }
            IRNode::LogicalOr { left, right } => {
                self.emit_operand(left, PREC_LOGICAL_OR);
                self.write(" || ");
                self.emit_operand(right, PREC_LOGICAL_OR + 1);
            }
            IRNode::LogicalAnd { left, right } => {
                self.emit_operand(left, PREC_LOGICAL_AND);
                self.write(" && ");
                self.emit_operand(right, PREC_LOGICAL_AND + 1);
            }

            IRNode::VarDecl { name, initializer } => {
                self.emit_var_decl_head(name, initializer.as_deref());
                self.write(";");
            }
            IRNode::ExpressionStatement(expr) => {
                // A leading `function` keyword would be parsed as a declaration
                if matches!(**expr, IRNode::FunctionExpr { .. }) {
                    self.write("(");
                    self.emit_node(expr);
                    self.write(")");
                } else {
                    self.emit_node(expr);
                }
                self.write(";");
            }
            IRNode::ReturnStatement(expr) => {
                self.write("return");
                if let Some(e) = expr {
                    self.write(" ");
                    self.emit_node(e);
                }
                self.write(";");
            }
            IRNode::IfStatement {
                condition,
                then_branch,
                else_branch,
            } => {
                self.write("if (");
                self.emit_node(condition);
                self.write(") ");
                self.emit_node(then_branch);
                if let Some(else_b) = else_branch {
                    self.write(" else ");
                    self.emit_node(else_b);
                }
            }
            IRNode::Block(stmts) => self.emit_block(stmts),
            IRNode::ForStatement {
                initializer,
                condition,
                incrementor,
                body,
            } => {
                self.write("for (");
                if let Some(init) = initializer {
                    match init.as_ref() {
                        IRNode::VarDecl { name, initializer } => {
                            self.emit_var_decl_head(name, initializer.as_deref());
                        }
                        other => self.emit_node(other),
                    }
                }
                self.write(";");
                if let Some(cond) = condition {
                    self.write(" ");
                    self.emit_node(cond);
                }
                self.write(";");
                if let Some(incr) = incrementor {
                    self.write(" ");
                    self.emit_node(incr);
                }
                self.write(") ");
                self.emit_node(body);
            }
            IRNode::ThrowStatement(expr) => {
                self.write("throw ");
                self.emit_node(expr);
                self.write(";");
            }

            IRNode::FunctionDecl {
                name,
                parameters,
                body,
            } => {
                self.write("function ");
                self.write(name);
                self.write("(");
                self.emit_parameters(parameters);
                self.write(") ");
                self.emit_function_body(body);
            }

            IRNode::Comment(text) => {
                self.write("/* ");
                self.write(text);
                self.write(" */");
            }
            IRNode::Sequence(nodes) => {
                for (i, node) in nodes.iter().enumerate() {
                    if i > 0 {
                        self.write_line();
                        self.write_indent();
                    }
                    self.emit_node(node);
                }
            }
        }
    }

    /// Emit `node`, parenthesized when it binds looser than `min_prec`.
    fn emit_operand(&mut self, node: &IRNode, min_prec: u8) {
        if expression_precedence(node) < min_prec {
            self.write("(");
            self.emit_node(node);
            self.write(")");
        } else {
            self.emit_node(node);
        }
    }

    /// Callee and member-access receivers need a left-hand-side expression.
    fn emit_callee(&mut self, node: &IRNode) {
        match node {
            IRNode::FunctionExpr { .. } | IRNode::NumericLiteral(_) => {
                self.write("(");
                self.emit_node(node);
                self.write(")");
            }
            _ => self.emit_operand(node, PREC_CALL),
        }
    }

    fn emit_var_decl_head(&mut self, name: &str, initializer: Option<&IRNode>) {
        self.write("var ");
        self.write(name);
        if let Some(init) = initializer {
            self.write(" = ");
            self.emit_operand(init, PREC_ASSIGNMENT);
        }
    }

    fn emit_block(&mut self, stmts: &[IRNode]) {
        if stmts.is_empty() {
            self.write("{ }");
            return;
        }
        self.write("{");
        self.write_line();
        self.increase_indent();
        for stmt in stmts {
            self.write_indent();
            self.emit_node(stmt);
            self.write_line();
        }
        self.decrease_indent();
        self.write_indent();
        self.write("}");
    }

    fn emit_function_body(&mut self, body: &[IRNode]) {
        self.emit_block(body);
    }

    fn emit_comma_separated(&mut self, nodes: &[IRNode]) {
        for (i, node) in nodes.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            self.emit_operand(node, PREC_ASSIGNMENT);
        }
    }

    fn emit_parameters(&mut self, params: &[IRParam]) {
        for (i, param) in params.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            self.write(&param.name);
        }
    }

    // =========================================================================
    // Output helpers
    // =========================================================================

    fn write(&mut self, s: &str) {
        self.output.push_str(s);
    }

    fn write_line(&mut self) {
        self.output.push('\n');
    }

    fn write_indent(&mut self) {
        for _ in 0..self.indent_level {
            self.output.push_str(self.indent_str);
        }
    }

    const fn increase_indent(&mut self) {
        self.indent_level += 1;
    }

    const fn decrease_indent(&mut self) {
        if self.indent_level > 0 {
            self.indent_level -= 1;
        }
    }
}

impl Default for IRPrinter {
    fn default() -> Self {
        Self::new()
    }
}

fn binary_precedence(operator: &str) -> u8 {
    match operator {
        "=" => PREC_ASSIGNMENT,
        "===" | "!==" | "==" | "!=" => PREC_EQUALITY,
        "<" | ">" | "<=" | ">=" | "in" | "instanceof" => PREC_RELATIONAL,
        "+" | "-" => PREC_ADDITIVE,
        "*" | "/" | "%" => PREC_MULTIPLICATIVE,
        _ => PREC_ASSIGNMENT,
    }
}

fn expression_precedence(node: &IRNode) -> u8 {
    match node {
        IRNode::BinaryExpr { operator, .. } => binary_precedence(operator),
        IRNode::LogicalOr { .. } => PREC_LOGICAL_OR,
        IRNode::LogicalAnd { .. } => PREC_LOGICAL_AND,
        IRNode::PrefixUnaryExpr { .. } => PREC_PREFIX,
        IRNode::PostfixUnaryExpr { .. } => PREC_POSTFIX,
        IRNode::CallExpr { .. }
        | IRNode::NewExpr { .. }
        | IRNode::PropertyAccess { .. }
        | IRNode::ElementAccess { .. } => PREC_CALL,
        IRNode::FunctionExpr { .. } => PREC_ASSIGNMENT,
        _ => PREC_PRIMARY,
    }
}

#[cfg(test)]
#[path = "../../tests/ir_printer.rs"]
mod tests;
