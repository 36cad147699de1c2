//! Compile errors.
//!
//! Every variant is an internal-consistency failure: the host handed the
//! compiler a type graph it cannot turn into a validator. They are fatal to
//! the pass. Values that fail validation are never errors; generated
//! validators report those as strings.

use thiserror::Error;
use tsguard_types::TypeId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    #[error("property '{name}' is declared without a type annotation")]
    MissingPropertyType { name: String },

    #[error("property '{name}' has an unexpected declaration of kind '{kind}'")]
    UnexpectedDeclaration { name: String, kind: String },

    #[error("property '{name}' has neither a declaration nor an attached type")]
    UnresolvedProperty { name: String },

    #[error("type parameter '{name}' is not bound at this site and has no default")]
    UnboundTypeParameter { name: String },

    #[error("generic instantiation of type {ty} exceeds the depth limit of {limit}")]
    InstantiationTooDeep { ty: TypeId, limit: u32 },

    #[error("cannot generate a validator for {kind} type {ty}: {reason}")]
    UnsupportedType {
        ty: TypeId,
        kind: &'static str,
        reason: String,
    },

    #[error(
        "encountered a function type at {location}; set functionBehavior to 'ignore' or 'basic' to allow it"
    )]
    FunctionNotAllowed { location: String },

    #[error("type {ty} cannot be used as an index: {reason}")]
    InvalidIndexType { ty: TypeId, reason: String },

    #[error("unknown type {0}")]
    UnknownType(TypeId),

    #[error("unknown property symbol {0}")]
    UnknownSymbol(u32),
}

pub type CompileResult<T> = Result<T, CompileError>;
