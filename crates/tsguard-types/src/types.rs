//! Structural type representation consumed by the compiler.
//!
//! Types are addressed by [`TypeId`]; the data behind an id never changes once
//! the host has produced it. Recursive types are expressed through ids (an
//! interface whose property refers back to the interface's own id), never
//! through inline recursion.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identity of a resolved type.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeId(pub u32);

impl TypeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stable identity of a property symbol.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SymbolId(pub u32);

impl SymbolId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Atomic type kinds.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IntrinsicKind {
    Any,
    Unknown,
    Never,
    Void,
    Undefined,
    Null,
    Boolean,
    Number,
    String,
    #[serde(rename = "bigint")]
    BigInt,
    Symbol,
    /// The non-primitive `object` type.
    Object,
}

impl IntrinsicKind {
    /// The keyword spelling of this kind.
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Any => "any",
            Self::Unknown => "unknown",
            Self::Never => "never",
            Self::Void => "void",
            Self::Undefined => "undefined",
            Self::Null => "null",
            Self::Boolean => "boolean",
            Self::Number => "number",
            Self::String => "string",
            Self::BigInt => "bigint",
            Self::Symbol => "symbol",
            Self::Object => "object",
        }
    }
}

/// Literal type values.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LiteralValue {
    String(String),
    Number(f64),
    Boolean(bool),
    /// Decimal digits of a bigint literal, without the `n` suffix.
    #[serde(rename = "bigint")]
    BigInt(String),
}

bitflags! {
    /// Flags describing where an object type came from.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct ObjectFlags: u32 {
        const INTERFACE = 1 << 0;
        const CLASS = 1 << 1;
        const ANONYMOUS = 1 << 2;
    }
}

bitflags! {
    /// Flags carried by property symbols.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct SymbolFlags: u32 {
        const PROPERTY = 1 << 0;
        const METHOD = 1 << 1;
        const OPTIONAL = 1 << 2;
    }
}

/// An object, interface or class type.
///
/// `properties` lists the members declared on this type only; inherited
/// members are reached through `base_types`, which are usually generic
/// references (`interface B<U> extends A<U>`).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectType {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub flags: ObjectFlags,
    #[serde(default)]
    pub type_parameters: Vec<TypeId>,
    #[serde(default)]
    pub properties: Vec<SymbolId>,
    #[serde(default)]
    pub base_types: Vec<TypeId>,
    /// Value type of a `[key: string]: T` index signature.
    #[serde(default)]
    pub string_index: Option<TypeId>,
}

/// One element of a tuple type.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TupleElement {
    #[serde(rename = "type")]
    pub ty: TypeId,
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub rest: bool,
}

/// Generic type parameter declaration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TypeParamInfo {
    pub name: String,
    #[serde(default)]
    pub constraint: Option<TypeId>,
    #[serde(default)]
    pub default: Option<TypeId>,
}

/// Structural description of one type constructor.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum TypeData {
    Intrinsic(IntrinsicKind),
    Literal(LiteralValue),
    Object(ObjectType),
    /// Instantiation of a generic object type: `Box<string>`.
    Reference {
        target: TypeId,
        type_arguments: Vec<TypeId>,
    },
    Union(Vec<TypeId>),
    Intersection(Vec<TypeId>),
    Array(TypeId),
    Tuple(Vec<TupleElement>),
    TypeParameter(TypeParamInfo),
    /// `T[K]`
    IndexedAccess {
        object: TypeId,
        index: TypeId,
    },
    /// `keyof T`
    KeyOf(TypeId),
    /// Any callable type. Signatures are not validated.
    Function,
}

impl TypeData {
    /// Short kind label used in logs and error messages.
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Intrinsic(_) => "intrinsic",
            Self::Literal(_) => "literal",
            Self::Object(_) => "object",
            Self::Reference { .. } => "reference",
            Self::Union(_) => "union",
            Self::Intersection(_) => "intersection",
            Self::Array(_) => "array",
            Self::Tuple(_) => "tuple",
            Self::TypeParameter(_) => "type parameter",
            Self::IndexedAccess { .. } => "indexed access",
            Self::KeyOf(_) => "keyof",
            Self::Function => "function",
        }
    }
}

/// Syntactic declaration backing a property symbol.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Declaration {
    /// `name?: Type`
    PropertySignature {
        #[serde(default)]
        type_annotation: Option<TypeId>,
        #[serde(default)]
        question_token: bool,
    },
    /// `name(): Type`
    MethodSignature,
    /// Any other declaration kind, e.g. a get accessor.
    Other { kind: String },
}

/// A property symbol.
///
/// Declaration-backed symbols carry a `declaration`; synthetic symbols (made
/// by the host when it instantiates or maps types) carry `ty` directly and
/// signal optionality through [`SymbolFlags::OPTIONAL`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SymbolData {
    pub name: String,
    #[serde(default)]
    pub flags: SymbolFlags,
    #[serde(default)]
    pub declaration: Option<Declaration>,
    #[serde(default, rename = "type")]
    pub ty: Option<TypeId>,
}

impl SymbolData {
    pub fn is_method(&self) -> bool {
        self.flags.contains(SymbolFlags::METHOD)
            || matches!(self.declaration, Some(Declaration::MethodSignature))
    }
}
