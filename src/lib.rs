//! tsguard: runtime validators compiled from TypeScript types.
//!
//! A host semantic analyzer resolves the type argument of every
//! `is<T>(x)`, `assertType<T>(x)`, `validate<T>(x)`, `createIs<T>()` and
//! `createAssertType<T>()` call and hands the resolved types over through
//! [`types::TypeDatabase`]. The [`compiler`] turns each of them into a family
//! of JavaScript validator functions, shared by canonical name across the
//! whole pass, and rewrites the call sites to use them.
//!
//! # Crates
//!
//! - [`common`]: limits and JavaScript identifier helpers
//! - [`types`]: the host type contract and the in-memory [`types::TypeTable`]
//! - [`emitter`]: JavaScript IR, printer and evaluator
//! - [`compiler`]: the validator compiler
//!
//! The [`cli`] module backs the `tsguard` binary, which runs the compiler
//! over a JSON snapshot of host output.

pub use tsguard_common as common;
pub use tsguard_compiler as compiler;
pub use tsguard_emitter as emitter;
pub use tsguard_types as types;

pub use tsguard_compiler::{
    CallKind, CallSite, CompileError, CompiledModule, FunctionBehavior, ValidatorCompiler,
    ValidatorOptions, compile_module,
};
pub use tsguard_types::{TypeDatabase, TypeId, TypeTable};

pub mod cli;
pub mod tracing_config;
