//! The query interface between the compiler and the host semantic analyzer.

use crate::types::{SymbolData, SymbolId, TypeData, TypeId};

/// Read-only access to resolved types and symbols.
///
/// Implemented by whatever owns the host analyzer's output. The compiler only
/// ever holds a shared reference, so a database outlives every compilation
/// pass that reads it.
pub trait TypeDatabase {
    /// Structural data for `id`, or `None` if the id is unknown.
    fn lookup(&self, id: TypeId) -> Option<&TypeData>;

    /// Property symbol data for `id`, or `None` if the id is unknown.
    fn symbol(&self, id: SymbolId) -> Option<&SymbolData>;

    /// Resolve a declared (exported) type name to its type.
    fn declaration(&self, name: &str) -> Option<TypeId>;
}
