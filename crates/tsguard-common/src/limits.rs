//! Centralized limits and thresholds for the validator compiler.
//!
//! Every recursive algorithm in the workspace that can be driven by user
//! types (generic instantiation, naming, type-parameter resolution) or by
//! user data (evaluating generated validators) is bounded by one of the
//! constants below. Exceeding a compile-time limit is a fatal compile error;
//! exceeding the evaluation limit is an evaluation error.

// =============================================================================
// Compile-time limits
// =============================================================================

/// Maximum nesting of generic instantiation scopes.
///
/// Each time the structural compiler enters the body of a generic type
/// reference it pushes one frame on the type-mapper stack. Expanding generics
/// such as
///
/// ```typescript
/// interface Tree<T> { child: Tree<T[]> }
/// ```
///
/// never reach a fixed point, so the stack grows without bound. The compiler
/// reports `InstantiationTooDeep` once this depth is reached. The same limit
/// bounds the recursion of the naming engine.
pub const MAX_INSTANTIATION_DEPTH: u32 = 50;

/// Maximum number of hops when a type parameter resolves to another type
/// parameter (`A<T>` → `B<U = T>` → ...).
pub const MAX_TYPE_PARAMETER_CHAIN: u32 = 100;

// =============================================================================
// Evaluation limits
// =============================================================================

/// Maximum depth of nested function calls while evaluating generated
/// validators. Deeply nested input values recurse once per level.
pub const MAX_EVAL_CALL_DEPTH: usize = 512;
