//! Validator code emission
//!
//! Emission follows a two-phase approach:
//!
//! 1. **Build Phase**: the compiler produces IR (Intermediate Representation)
//!    nodes for every generated validator function and call-site rewrite.
//!
//! 2. **Print Phase**: the printer walks IR trees and emits JavaScript strings.
//!
//! This separation keeps generated code testable independently of its text
//! form; the same trees are executed directly by [`crate::eval`].

pub mod emit_utils;
pub mod ir;
pub mod ir_printer;
