//! Property resolution.

use indexmap::IndexMap;
use tsguard_common::limits::MAX_INSTANTIATION_DEPTH;
use tsguard_types::{Declaration, SymbolData, SymbolFlags, SymbolId, TypeData, TypeDatabase, TypeId};

use crate::error::{CompileError, CompileResult};

/// Resolved view of a property symbol.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PropertyInfo {
    pub name: String,
    pub ty: TypeId,
    pub optional: bool,
}

/// Resolve a property symbol to its name, type and optionality.
///
/// Declaration-backed symbols must be property signatures with a type
/// annotation; optionality is the presence of `?`. Synthetic symbols carry
/// their type directly and mark optionality with [`SymbolFlags::OPTIONAL`].
pub fn get_property_info(symbol: &SymbolData) -> CompileResult<PropertyInfo> {
    match &symbol.declaration {
        Some(Declaration::PropertySignature {
            type_annotation,
            question_token,
        }) => {
            let ty = type_annotation.ok_or_else(|| CompileError::MissingPropertyType {
                name: symbol.name.clone(),
            })?;
            Ok(PropertyInfo {
                name: symbol.name.clone(),
                ty,
                optional: *question_token,
            })
        }
        Some(Declaration::MethodSignature) => Err(CompileError::UnexpectedDeclaration {
            name: symbol.name.clone(),
            kind: "MethodSignature".to_string(),
        }),
        Some(Declaration::Other { kind }) => Err(CompileError::UnexpectedDeclaration {
            name: symbol.name.clone(),
            kind: kind.clone(),
        }),
        None => match symbol.ty {
            Some(ty) => Ok(PropertyInfo {
                name: symbol.name.clone(),
                ty,
                optional: symbol.flags.contains(SymbolFlags::OPTIONAL),
            }),
            None => Err(CompileError::UnresolvedProperty {
                name: symbol.name.clone(),
            }),
        },
    }
}

/// A member of an object type as the structural compiler sees it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ObjectMember {
    Property(PropertyInfo),
    /// A method. Its signature is never inspected.
    Method { name: String, optional: bool },
}

impl ObjectMember {
    pub fn name(&self) -> &str {
        match self {
            Self::Property(info) => &info.name,
            Self::Method { name, .. } => name,
        }
    }
}

/// Members of an object type including those inherited through its base
/// types, plus the nearest string index signature.
#[derive(Clone, Debug, Default)]
pub struct ObjectMembers {
    pub members: IndexMap<String, ObjectMember>,
    pub string_index: Option<TypeId>,
}

/// Collect own and inherited members of `object`. A member declared on a
/// derived type hides the same-named member of its bases.
pub fn collect_object_members(db: &dyn TypeDatabase, object: TypeId) -> CompileResult<ObjectMembers> {
    let mut out = ObjectMembers::default();
    collect_into(db, object, &mut out, 0)?;
    Ok(out)
}

fn collect_into(
    db: &dyn TypeDatabase,
    object: TypeId,
    out: &mut ObjectMembers,
    level: u32,
) -> CompileResult<()> {
    if level >= MAX_INSTANTIATION_DEPTH {
        return Err(CompileError::InstantiationTooDeep {
            ty: object,
            limit: MAX_INSTANTIATION_DEPTH,
        });
    }
    let shape = match db.lookup(object) {
        Some(TypeData::Object(shape)) => shape,
        Some(TypeData::Reference { target, .. }) => return collect_into(db, *target, out, level + 1),
        Some(other) => {
            return Err(CompileError::UnsupportedType {
                ty: object,
                kind: other.kind_name(),
                reason: "only object types can be extended".to_string(),
            });
        }
        None => return Err(CompileError::UnknownType(object)),
    };

    for &symbol_id in &shape.properties {
        let symbol = lookup_symbol(db, symbol_id)?;
        if out.members.contains_key(&symbol.name) {
            continue;
        }
        let member = if symbol.is_method() {
            ObjectMember::Method {
                name: symbol.name.clone(),
                optional: symbol.flags.contains(SymbolFlags::OPTIONAL),
            }
        } else {
            ObjectMember::Property(get_property_info(symbol)?)
        };
        out.members.insert(symbol.name.clone(), member);
    }
    if out.string_index.is_none() {
        out.string_index = shape.string_index;
    }

    for &base in &shape.base_types {
        collect_into(db, base, out, level + 1)?;
    }
    Ok(())
}

fn lookup_symbol(db: &dyn TypeDatabase, id: SymbolId) -> CompileResult<&SymbolData> {
    db.symbol(id).ok_or(CompileError::UnknownSymbol(id.0))
}

#[cfg(test)]
#[path = "../tests/property_tests.rs"]
mod tests;
