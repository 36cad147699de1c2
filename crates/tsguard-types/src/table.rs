//! In-memory arena implementation of [`TypeDatabase`].
//!
//! `TypeTable` plays the host analyzer in tests and in the CLI. Types and
//! symbols live in two vectors and are addressed by index, so cyclic type
//! graphs are built by creating an object first and attaching members that
//! point back at it afterwards.

use crate::db::TypeDatabase;
use crate::types::*;
use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Malformed snapshot data.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TableError {
    #[error("type {owner} refers to unknown type {target}")]
    DanglingType { owner: TypeId, target: TypeId },
    #[error("type {owner} refers to unknown symbol {symbol}")]
    DanglingSymbol { owner: TypeId, symbol: u32 },
    #[error("symbol '{name}' refers to unknown type {target}")]
    DanglingSymbolType { name: String, target: TypeId },
    #[error("declaration '{name}' refers to unknown type {target}")]
    DanglingDeclaration { name: String, target: TypeId },
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TypeTable {
    #[serde(default)]
    types: Vec<TypeData>,
    #[serde(default)]
    symbols: Vec<SymbolData>,
    /// Exported type names, in declaration order.
    #[serde(default)]
    declarations: IndexMap<String, TypeId>,
    #[serde(skip)]
    intrinsics: FxHashMap<IntrinsicKind, TypeId>,
}

impl TypeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a table from its JSON snapshot form. Ids are not checked until
    /// [`validate`](Self::validate) runs.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn declarations(&self) -> impl Iterator<Item = (&str, TypeId)> {
        self.declarations.iter().map(|(name, id)| (name.as_str(), *id))
    }

    // =========================================================================
    // Raw insertion
    // =========================================================================

    /// Append a type and return its id. Intrinsics are deduplicated.
    pub fn add_type(&mut self, data: TypeData) -> TypeId {
        if let TypeData::Intrinsic(kind) = data {
            if let Some(&existing) = self.intrinsics.get(&kind) {
                return existing;
            }
        }
        let id = TypeId(self.types.len() as u32);
        if let TypeData::Intrinsic(kind) = data {
            self.intrinsics.insert(kind, id);
        }
        self.types.push(data);
        id
    }

    pub fn add_symbol(&mut self, data: SymbolData) -> SymbolId {
        let id = SymbolId(self.symbols.len() as u32);
        self.symbols.push(data);
        id
    }

    /// Export `id` under `name`.
    pub fn declare(&mut self, name: impl Into<String>, id: TypeId) {
        self.declarations.insert(name.into(), id);
    }

    // =========================================================================
    // Builder helpers
    // =========================================================================

    pub fn intrinsic(&mut self, kind: IntrinsicKind) -> TypeId {
        self.add_type(TypeData::Intrinsic(kind))
    }

    pub fn string(&mut self) -> TypeId {
        self.intrinsic(IntrinsicKind::String)
    }

    pub fn number(&mut self) -> TypeId {
        self.intrinsic(IntrinsicKind::Number)
    }

    pub fn boolean(&mut self) -> TypeId {
        self.intrinsic(IntrinsicKind::Boolean)
    }

    pub fn literal(&mut self, value: LiteralValue) -> TypeId {
        self.add_type(TypeData::Literal(value))
    }

    pub fn string_literal(&mut self, value: impl Into<String>) -> TypeId {
        self.literal(LiteralValue::String(value.into()))
    }

    pub fn number_literal(&mut self, value: f64) -> TypeId {
        self.literal(LiteralValue::Number(value))
    }

    /// Declare an exported interface with the given type parameters.
    pub fn interface(&mut self, name: &str, type_parameters: Vec<TypeId>) -> TypeId {
        let id = self.add_type(TypeData::Object(ObjectType {
            name: Some(name.to_string()),
            flags: ObjectFlags::INTERFACE,
            type_parameters,
            ..ObjectType::default()
        }));
        self.declare(name, id);
        id
    }

    /// Declare an exported class instance type.
    pub fn class(&mut self, name: &str, type_parameters: Vec<TypeId>) -> TypeId {
        let id = self.add_type(TypeData::Object(ObjectType {
            name: Some(name.to_string()),
            flags: ObjectFlags::CLASS,
            type_parameters,
            ..ObjectType::default()
        }));
        self.declare(name, id);
        id
    }

    /// An anonymous object literal type: `{ ... }`.
    pub fn object_literal(&mut self) -> TypeId {
        self.add_type(TypeData::Object(ObjectType {
            flags: ObjectFlags::ANONYMOUS,
            ..ObjectType::default()
        }))
    }

    pub fn type_parameter(&mut self, name: &str, default: Option<TypeId>) -> TypeId {
        self.add_type(TypeData::TypeParameter(TypeParamInfo {
            name: name.to_string(),
            constraint: None,
            default,
        }))
    }

    pub fn reference(&mut self, target: TypeId, type_arguments: Vec<TypeId>) -> TypeId {
        self.add_type(TypeData::Reference {
            target,
            type_arguments,
        })
    }

    pub fn union(&mut self, members: Vec<TypeId>) -> TypeId {
        self.add_type(TypeData::Union(members))
    }

    pub fn intersection(&mut self, members: Vec<TypeId>) -> TypeId {
        self.add_type(TypeData::Intersection(members))
    }

    pub fn array(&mut self, element: TypeId) -> TypeId {
        self.add_type(TypeData::Array(element))
    }

    pub fn tuple(&mut self, elements: Vec<TupleElement>) -> TypeId {
        self.add_type(TypeData::Tuple(elements))
    }

    pub fn indexed_access(&mut self, object: TypeId, index: TypeId) -> TypeId {
        self.add_type(TypeData::IndexedAccess { object, index })
    }

    pub fn keyof(&mut self, target: TypeId) -> TypeId {
        self.add_type(TypeData::KeyOf(target))
    }

    pub fn function(&mut self) -> TypeId {
        self.add_type(TypeData::Function)
    }

    /// Add a declaration-backed property `name[?]: ty` to an object type.
    pub fn property(&mut self, object: TypeId, name: &str, ty: TypeId, optional: bool) -> SymbolId {
        let mut flags = SymbolFlags::PROPERTY;
        if optional {
            flags |= SymbolFlags::OPTIONAL;
        }
        let symbol = self.add_symbol(SymbolData {
            name: name.to_string(),
            flags,
            declaration: Some(Declaration::PropertySignature {
                type_annotation: Some(ty),
                question_token: optional,
            }),
            ty: None,
        });
        self.attach(object, symbol);
        symbol
    }

    /// Add a synthetic property (attached type, no declaration) to an object type.
    pub fn synthetic_property(
        &mut self,
        object: TypeId,
        name: &str,
        ty: TypeId,
        optional: bool,
    ) -> SymbolId {
        let mut flags = SymbolFlags::PROPERTY;
        if optional {
            flags |= SymbolFlags::OPTIONAL;
        }
        let symbol = self.add_symbol(SymbolData {
            name: name.to_string(),
            flags,
            declaration: None,
            ty: Some(ty),
        });
        self.attach(object, symbol);
        symbol
    }

    /// Add a method signature `name(): ...` to an object type.
    pub fn method(&mut self, object: TypeId, name: &str) -> SymbolId {
        let function = self.function();
        let symbol = self.add_symbol(SymbolData {
            name: name.to_string(),
            flags: SymbolFlags::METHOD,
            declaration: Some(Declaration::MethodSignature),
            ty: Some(function),
        });
        self.attach(object, symbol);
        symbol
    }

    /// Attach an existing symbol to an object type's own members.
    pub fn attach(&mut self, object: TypeId, symbol: SymbolId) {
        if let Some(TypeData::Object(shape)) = self.types.get_mut(object.index()) {
            shape.properties.push(symbol);
        }
    }

    /// Record `base` (usually a reference) as a base type of `object`.
    pub fn extend(&mut self, object: TypeId, base: TypeId) {
        if let Some(TypeData::Object(shape)) = self.types.get_mut(object.index()) {
            shape.base_types.push(base);
        }
    }

    pub fn set_string_index(&mut self, object: TypeId, value: TypeId) {
        if let Some(TypeData::Object(shape)) = self.types.get_mut(object.index()) {
            shape.string_index = Some(value);
        }
    }

    // =========================================================================
    // Validation
    // =========================================================================

    /// Check that every id stored in the table points at an existing entry.
    pub fn validate(&self) -> Result<(), TableError> {
        let type_count = self.types.len();
        let check = |owner: TypeId, target: TypeId| {
            if target.index() < type_count {
                Ok(())
            } else {
                Err(TableError::DanglingType { owner, target })
            }
        };

        for (index, data) in self.types.iter().enumerate() {
            let owner = TypeId(index as u32);
            match data {
                TypeData::Intrinsic(_) | TypeData::Literal(_) | TypeData::Function => {}
                TypeData::Object(object) => {
                    for &param in &object.type_parameters {
                        check(owner, param)?;
                    }
                    for &base in &object.base_types {
                        check(owner, base)?;
                    }
                    if let Some(index) = object.string_index {
                        check(owner, index)?;
                    }
                    for &symbol in &object.properties {
                        if symbol.index() >= self.symbols.len() {
                            return Err(TableError::DanglingSymbol {
                                owner,
                                symbol: symbol.0,
                            });
                        }
                    }
                }
                TypeData::Reference {
                    target,
                    type_arguments,
                } => {
                    check(owner, *target)?;
                    for &arg in type_arguments {
                        check(owner, arg)?;
                    }
                }
                TypeData::Union(members) | TypeData::Intersection(members) => {
                    for &member in members {
                        check(owner, member)?;
                    }
                }
                TypeData::Array(element) | TypeData::KeyOf(element) => check(owner, *element)?,
                TypeData::Tuple(elements) => {
                    for element in elements {
                        check(owner, element.ty)?;
                    }
                }
                TypeData::TypeParameter(param) => {
                    if let Some(default) = param.default {
                        check(owner, default)?;
                    }
                    if let Some(constraint) = param.constraint {
                        check(owner, constraint)?;
                    }
                }
                TypeData::IndexedAccess { object, index } => {
                    check(owner, *object)?;
                    check(owner, *index)?;
                }
            }
        }

        for symbol in &self.symbols {
            let annotated = match &symbol.declaration {
                Some(Declaration::PropertySignature {
                    type_annotation, ..
                }) => *type_annotation,
                _ => None,
            };
            for target in [annotated, symbol.ty].into_iter().flatten() {
                if target.index() >= type_count {
                    return Err(TableError::DanglingSymbolType {
                        name: symbol.name.clone(),
                        target,
                    });
                }
            }
        }

        for (name, &target) in &self.declarations {
            if target.index() >= type_count {
                return Err(TableError::DanglingDeclaration {
                    name: name.clone(),
                    target,
                });
            }
        }

        debug!(
            types = self.types.len(),
            symbols = self.symbols.len(),
            "type table validated"
        );
        Ok(())
    }
}

impl TypeDatabase for TypeTable {
    fn lookup(&self, id: TypeId) -> Option<&TypeData> {
        self.types.get(id.index())
    }

    fn symbol(&self, id: SymbolId) -> Option<&SymbolData> {
        self.symbols.get(id.index())
    }

    fn declaration(&self, name: &str) -> Option<TypeId> {
        self.declarations.get(name).copied()
    }
}

#[cfg(test)]
#[path = "../tests/table_tests.rs"]
mod tests;
