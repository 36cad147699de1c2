//! JavaScript emission for the tsguard validator compiler.
//!
//! - [`transforms::ir`]: tree IR for the generated JavaScript
//! - [`transforms::ir_printer`]: renders IR trees to JavaScript text
//! - [`eval`]: interprets the validator subset of the IR over JSON values,
//!   so generated validators can run without a JavaScript engine

pub mod eval;
pub mod transforms;

pub use eval::{EvalError, IREvaluator, JsValue};
pub use transforms::emit_utils;
pub use transforms::ir::{IRNode, IRParam};
pub use transforms::ir_printer::IRPrinter;
