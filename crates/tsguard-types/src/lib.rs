//! Host type-analyzer contract for the tsguard validator compiler.
//!
//! The compiler never builds types itself: it consumes resolved types from a
//! host semantic analyzer through the [`TypeDatabase`] query trait. This crate
//! defines that contract:
//!
//! - **Identity**: [`TypeId`] and [`SymbolId`] are stable, cheap handles
//! - **Structure**: [`TypeData`] describes one type constructor and its parts
//! - **Symbols**: [`SymbolData`] describes a property symbol, either
//!   declaration-backed or synthetic
//! - **Storage**: [`TypeTable`] is an arena implementation used by tests and
//!   by the CLI, with a builder API and a serde snapshot format
//! - **Traversal**: free type-parameter collection in [`visitor`]

mod db;
mod table;
pub mod types;
pub mod visitor;

pub use db::TypeDatabase;
pub use table::{TableError, TypeTable};
pub use types::*;
pub use visitor::collect_free_type_parameters;
