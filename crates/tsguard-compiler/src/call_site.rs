//! Compilation passes and call-site rewriting.
//!
//! A pass compiles the type argument of every call site in one unit into a
//! shared set of validators and replaces each call with an expression that
//! invokes the top-level validator:
//!
//! | Call | Rewritten to |
//! |------|--------------|
//! | `is<T>(x)` | `_N(x, ["$"]) === null` |
//! | `validate<T>(x)` | `_N(x, ["$"])` |
//! | `assertType<T>(x)` | `__tsguardAssert(_N, x)` |
//! | `createIs<T>()` | `function (object) { return _N(object, ["$"]) === null; }` |
//! | `createAssertType<T>()` | `function (object) { return __tsguardAssert(_N, object); }` |

use serde::{Deserialize, Serialize};
use tracing::{Level, debug, span};
use tsguard_emitter::{EvalError, IREvaluator, IRNode, IRParam, IRPrinter, JsValue};
use tsguard_types::{IntrinsicKind, TypeDatabase, TypeId};

use crate::context::CompilationContext;
use crate::emit::{self, VALUE_PARAM};
use crate::error::CompileResult;
use crate::options::ValidatorOptions;

/// Name of the helper that turns a failure into a thrown `Error`.
pub const ASSERT_HELPER: &str = "__tsguardAssert";

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CallKind {
    Is,
    Validate,
    AssertType,
    CreateIs,
    CreateAssertType,
}

impl CallKind {
    pub const fn function_name(self) -> &'static str {
        match self {
            Self::Is => "is",
            Self::Validate => "validate",
            Self::AssertType => "assertType",
            Self::CreateIs => "createIs",
            Self::CreateAssertType => "createAssertType",
        }
    }

    const fn uses_assert_helper(self) -> bool {
        matches!(self, Self::AssertType | Self::CreateAssertType)
    }
}

/// One `is<T>(x)`-style call found by the host.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallSite {
    pub kind: CallKind,
    #[serde(rename = "type")]
    pub ty: TypeId,
    /// Source text of the checked expression. Ignored by the `create*` kinds.
    #[serde(default)]
    pub argument: Option<String>,
}

impl CallSite {
    pub fn new(kind: CallKind, ty: TypeId) -> Self {
        Self {
            kind,
            ty,
            argument: None,
        }
    }

    pub fn with_argument(mut self, argument: impl Into<String>) -> Self {
        self.argument = Some(argument.into());
        self
    }

    fn argument_node(&self) -> IRNode {
        IRNode::id(self.argument.as_deref().unwrap_or("value"))
    }
}

/// Output of one pass: the validator declarations in registration order and
/// one rewritten expression per call site.
#[derive(Clone, Debug, Default)]
pub struct CompiledModule {
    pub functions: Vec<IRNode>,
    pub call_sites: Vec<IRNode>,
}

impl CompiledModule {
    /// Render the module as JavaScript text.
    pub fn print(&self) -> String {
        let mut out = IRPrinter::emit_program(&self.functions);
        let sites: Vec<IRNode> = self
            .call_sites
            .iter()
            .enumerate()
            .map(|(index, expression)| {
                IRNode::sequence(vec![
                    IRNode::Comment(format!("call site {index}")),
                    IRNode::expr_stmt(expression.clone()),
                ])
            })
            .collect();
        out.push_str(&IRPrinter::emit_program(&sites));
        out
    }

    pub fn function_names(&self) -> impl Iterator<Item = &str> {
        self.functions.iter().filter_map(IRNode::function_name)
    }

    /// An interpreter loaded with this module's functions.
    pub fn evaluator(&self) -> IREvaluator {
        IREvaluator::new(&self.functions)
    }

    /// Run validator `name` on `input`. Returns `None` when the value
    /// conforms and the failure message otherwise.
    pub fn validate(&self, name: &str, input: &serde_json::Value) -> Result<Option<String>, EvalError> {
        let mut evaluator = self.evaluator();
        let root = JsValue::array(vec![JsValue::string(emit::ROOT_SEGMENT)]);
        match evaluator.call(name, vec![JsValue::from(input), root])? {
            JsValue::Null => Ok(None),
            JsValue::String(message) => Ok(Some(message.to_string())),
            other => Err(EvalError::TypeError(format!(
                "validator `{name}` returned {other} instead of null or a string"
            ))),
        }
    }
}

/// One compilation pass.
pub struct ValidatorCompiler<'a> {
    ctx: CompilationContext<'a>,
    call_sites: Vec<IRNode>,
    uses_assert_helper: bool,
}

impl<'a> ValidatorCompiler<'a> {
    pub fn new(db: &'a dyn TypeDatabase, options: ValidatorOptions) -> Self {
        Self {
            ctx: CompilationContext::new(db, options),
            call_sites: Vec::new(),
            uses_assert_helper: false,
        }
    }

    pub fn context(&self) -> &CompilationContext<'a> {
        &self.ctx
    }

    /// Compile the top-level validator for `ty` and return its name.
    pub fn compile_validator(&mut self, ty: TypeId) -> CompileResult<String> {
        if self.ctx.options().short_circuit {
            return Ok(self.ctx.compile_intrinsic(IntrinsicKind::Any));
        }
        self.ctx.compile_type(ty)
    }

    /// Compile the validator of `site` and return the expression replacing
    /// the call. The expression is also kept for [`finish`](Self::finish).
    pub fn rewrite_call_site(&mut self, site: &CallSite) -> CompileResult<IRNode> {
        let span = span!(Level::DEBUG, "call_site", kind = site.kind.function_name(), ty = site.ty.0);
        let _enter = span.enter();

        let validator = self.compile_validator(site.ty)?;
        debug!(validator = validator.as_str(), "rewrite call site");
        if site.kind.uses_assert_helper() {
            self.uses_assert_helper = true;
        }

        let expression = match site.kind {
            CallKind::Is => is_valid(&validator, site.argument_node()),
            CallKind::Validate => {
                emit::call_validator(&validator, site.argument_node(), emit::root_path())
            }
            CallKind::AssertType => assert_valid(&validator, site.argument_node()),
            CallKind::CreateIs => wrap_in_function(is_valid(&validator, emit::value())),
            CallKind::CreateAssertType => wrap_in_function(assert_valid(&validator, emit::value())),
        };
        self.call_sites.push(expression.clone());
        Ok(expression)
    }

    pub fn finish(self) -> CompiledModule {
        let registry = self.ctx.into_registry();
        let mut functions = Vec::with_capacity(registry.len() + 1);
        if self.uses_assert_helper {
            functions.push(assert_helper());
        }
        functions.extend(registry.into_functions());
        debug!(functions = functions.len(), call_sites = self.call_sites.len(), "pass finished");
        CompiledModule {
            functions,
            call_sites: self.call_sites,
        }
    }
}

/// Compile every call site of one unit in a single pass.
pub fn compile_module(
    db: &dyn TypeDatabase,
    options: ValidatorOptions,
    sites: &[CallSite],
) -> CompileResult<CompiledModule> {
    let span = span!(Level::DEBUG, "compile_module", call_sites = sites.len());
    let _enter = span.enter();

    let mut compiler = ValidatorCompiler::new(db, options);
    for site in sites {
        compiler.rewrite_call_site(site)?;
    }
    Ok(compiler.finish())
}

/// `_N(x, ["$"]) === null`
fn is_valid(validator: &str, argument: IRNode) -> IRNode {
    IRNode::strict_eq(
        emit::call_validator(validator, argument, emit::root_path()),
        IRNode::NullLiteral,
    )
}

/// `__tsguardAssert(_N, x)`
fn assert_valid(validator: &str, argument: IRNode) -> IRNode {
    IRNode::call(IRNode::id(ASSERT_HELPER), vec![IRNode::id(validator), argument])
}

fn wrap_in_function(body: IRNode) -> IRNode {
    IRNode::func_expr(None, vec![IRParam::new(VALUE_PARAM)], vec![IRNode::ret(Some(body))])
}

/// ```javascript
/// function __tsguardAssert(validator, object) {
///     var error = validator(object, ["$"]);
///     if (error !== null) throw new Error(error);
///     return object;
/// }
/// ```
fn assert_helper() -> IRNode {
    let error = IRNode::id("error");
    IRNode::func_decl(
        ASSERT_HELPER,
        vec![IRParam::new("validator"), IRParam::new(VALUE_PARAM)],
        vec![
            IRNode::var_decl(
                "error",
                Some(IRNode::call(
                    IRNode::id("validator"),
                    vec![emit::value(), emit::root_path()],
                )),
            ),
            IRNode::if_stmt(
                IRNode::strict_ne(error.clone(), IRNode::NullLiteral),
                IRNode::throw(IRNode::new_expr(IRNode::id("Error"), vec![error])),
                None,
            ),
            IRNode::ret(Some(emit::value())),
        ],
    )
}

#[cfg(test)]
#[path = "../tests/call_site_tests.rs"]
mod tests;
