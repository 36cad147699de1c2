//! Type-to-validator compiler.
//!
//! Given a resolved type from a [`TypeDatabase`](tsguard_types::TypeDatabase),
//! the compiler produces a set of named JavaScript validator functions and
//! the expressions that replace `is<T>(x)`-style call sites.
//!
//! # Architecture
//!
//! - [`naming`]: canonical validator names, the deduplication key
//! - [`registry`]: the name → function cache of a pass
//! - [`property`]: property symbol resolution and member collection
//! - [`mapper`]: the generic type-parameter stack
//! - [`emit`]: code-emission primitives (accept, reject, assert, all-of, any-of)
//! - `primitives`, `compile`, `compile_object`, `compile_access`: the
//!   structural compiler, implemented on [`CompilationContext`]
//! - [`call_site`]: passes, call-site rewriting and module output
//!
//! ```ignore
//! let mut table = TypeTable::new();
//! let user = table.interface("User", vec![]);
//! let string = table.string();
//! table.property(user, "name", string, false);
//!
//! let module = compile_module(&table, ValidatorOptions::default(), &[
//!     CallSite::new(CallKind::Is, user).with_argument("input"),
//! ])?;
//! println!("{}", module.print());
//! ```

pub mod call_site;
mod compile;
mod compile_access;
mod compile_object;
pub mod context;
pub mod emit;
pub mod error;
pub mod mapper;
pub mod naming;
pub mod options;
mod primitives;
pub mod property;
pub mod registry;

pub use call_site::{CallKind, CallSite, CompiledModule, ValidatorCompiler, compile_module};
pub use compile_access::KeySet;
pub use context::CompilationContext;
pub use error::{CompileError, CompileResult};
pub use mapper::{Binding, TypeMapperStack, TypeMapping, get_base_type_mapping, get_type_reference_mapping};
pub use naming::NameMode;
pub use options::{FunctionBehavior, ValidatorOptions};
pub use property::{ObjectMember, ObjectMembers, PropertyInfo, collect_object_members, get_property_info};
pub use registry::FunctionRegistry;
