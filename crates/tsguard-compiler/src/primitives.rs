//! Validators for intrinsic, literal and function types.
//!
//! Intrinsic validators are singletons: every occurrence of `string` in a
//! pass resolves to the one `_string` function.

use tsguard_emitter::IRNode;
use tsguard_emitter::emit_utils::{format_number, quote_string};
use tsguard_types::{IntrinsicKind, LiteralValue, TypeId};

use crate::context::CompilationContext;
use crate::emit::value;
use crate::error::{CompileError, CompileResult};
use crate::naming::{NameMode, intrinsic_name};
use crate::options::FunctionBehavior;

/// `typeof object !== "<kind>"`
fn typeof_is_not(kind: &str) -> IRNode {
    IRNode::strict_ne(IRNode::type_of(value()), IRNode::string(kind))
}

impl CompilationContext<'_> {
    /// Shared validator for an intrinsic kind.
    pub fn compile_intrinsic(&mut self, kind: IntrinsicKind) -> String {
        let name = intrinsic_name(kind);
        match kind {
            IntrinsicKind::Any | IntrinsicKind::Unknown => self.create_accepting_function(&name),
            IntrinsicKind::Never => self.create_rejecting_function("expected never", &name),
            IntrinsicKind::Void | IntrinsicKind::Undefined => self.create_assertion_function(
                IRNode::strict_ne(value(), IRNode::Undefined),
                "expected undefined",
                &name,
            ),
            IntrinsicKind::Null => self.create_assertion_function(
                IRNode::strict_ne(value(), IRNode::NullLiteral),
                "expected null",
                &name,
            ),
            IntrinsicKind::Boolean
            | IntrinsicKind::Number
            | IntrinsicKind::String
            | IntrinsicKind::BigInt
            | IntrinsicKind::Symbol => {
                let keyword = kind.keyword();
                self.create_assertion_function(
                    typeof_is_not(keyword),
                    &format!("expected a {keyword}"),
                    &name,
                )
            }
            IntrinsicKind::Object => {
                // (typeof object !== "object" || object === null) && typeof object !== "function"
                let not_object = IRNode::logical_or(
                    typeof_is_not("object"),
                    IRNode::strict_eq(value(), IRNode::NullLiteral),
                );
                self.create_assertion_function(
                    IRNode::logical_and(not_object, typeof_is_not("function")),
                    "expected a non-primitive",
                    &name,
                )
            }
        }
    }

    pub(crate) fn compile_literal(&mut self, ty: TypeId, literal: &LiteralValue) -> CompileResult<String> {
        let name = self.name_for(ty, &NameMode::Plain)?;
        let (condition, reason) = match literal {
            LiteralValue::String(s) => (
                IRNode::strict_ne(value(), IRNode::string(s.as_str())),
                format!("expected {}", quote_string(s)),
            ),
            LiteralValue::Number(n) => {
                let text = format_number(*n);
                (
                    IRNode::strict_ne(value(), IRNode::number(text.as_str())),
                    format!("expected {text}"),
                )
            }
            LiteralValue::Boolean(b) => (
                IRNode::strict_ne(value(), IRNode::BooleanLiteral(*b)),
                format!("expected {b}"),
            ),
            LiteralValue::BigInt(digits) => (
                IRNode::logical_or(
                    typeof_is_not("bigint"),
                    IRNode::strict_ne(value(), IRNode::number(format!("{digits}n"))),
                ),
                format!("expected {digits}n"),
            ),
        };
        Ok(self.create_assertion_function(condition, &reason, &name))
    }

    /// Validator for a function-typed value found at `location`.
    pub(crate) fn compile_function(&mut self, location: &str) -> CompileResult<String> {
        match self.options.function_behavior {
            FunctionBehavior::Error => Err(CompileError::FunctionNotAllowed {
                location: location.to_string(),
            }),
            FunctionBehavior::Ignore => Ok(self.compile_intrinsic(IntrinsicKind::Any)),
            FunctionBehavior::Basic => Ok(self.create_assertion_function(
                typeof_is_not("function"),
                "expected a function",
                "_function",
            )),
        }
    }
}

#[cfg(test)]
#[path = "../tests/primitives_tests.rs"]
mod tests;
