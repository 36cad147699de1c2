//! Type traversal helpers.
//!
//! The naming engine needs to know which generic type parameters a type
//! depends on, so that two occurrences of the same type under different
//! generic bindings receive different canonical names. This module computes
//! that set.
//!
//! # Free type parameters
//!
//! A parameter is *free* in a type when the type's meaning changes with the
//! parameter's binding:
//!
//! | Type | Free parameters |
//! |------|-----------------|
//! | `T` | `T` |
//! | `{ a: T; b: U[] }` | `T`, `U` |
//! | `interface Box<T> { value: T }` (the declaration) | `T` |
//! | `Box<string>` (a reference) | none: only the arguments are walked |
//! | `Box<U>` | `U` |
//!
//! References never descend into their target: the target's own parameters
//! are bound by the reference's arguments.

use crate::db::TypeDatabase;
use crate::types::{Declaration, TypeData, TypeId};
use rustc_hash::FxHashSet;
use smallvec::SmallVec;

/// Collect the free type parameters of `root`, sorted by id and deduplicated.
///
/// Cycles through recursive object types are cut with a visited set. Unknown
/// ids are skipped; reporting them is the compiler's job.
pub fn collect_free_type_parameters(
    db: &dyn TypeDatabase,
    root: TypeId,
) -> SmallVec<[TypeId; 4]> {
    let mut collector = FreeParamCollector {
        db,
        visited: FxHashSet::default(),
        found: SmallVec::new(),
    };
    collector.visit(root);
    collector.found.sort_unstable();
    collector.found.dedup();
    collector.found
}

struct FreeParamCollector<'a> {
    db: &'a dyn TypeDatabase,
    visited: FxHashSet<TypeId>,
    found: SmallVec<[TypeId; 4]>,
}

impl FreeParamCollector<'_> {
    fn visit(&mut self, id: TypeId) {
        if !self.visited.insert(id) {
            return;
        }
        let Some(data) = self.db.lookup(id) else {
            return;
        };

        match data {
            TypeData::Intrinsic(_) | TypeData::Literal(_) | TypeData::Function => {}
            TypeData::TypeParameter(_) => self.found.push(id),
            TypeData::Object(object) => {
                for &param in &object.type_parameters {
                    self.visit(param);
                }
                for &symbol in &object.properties {
                    if let Some(ty) = self.property_type(symbol) {
                        self.visit(ty);
                    }
                }
                for &base in &object.base_types {
                    self.visit(base);
                }
                if let Some(index) = object.string_index {
                    self.visit(index);
                }
            }
            TypeData::Reference { type_arguments, .. } => {
                for &arg in type_arguments {
                    self.visit(arg);
                }
            }
            TypeData::Union(members) | TypeData::Intersection(members) => {
                for &member in members {
                    self.visit(member);
                }
            }
            TypeData::Array(element) | TypeData::KeyOf(element) => self.visit(*element),
            TypeData::Tuple(elements) => {
                for element in elements {
                    self.visit(element.ty);
                }
            }
            TypeData::IndexedAccess { object, index } => {
                self.visit(*object);
                self.visit(*index);
            }
        }
    }

    fn property_type(&self, symbol: crate::types::SymbolId) -> Option<TypeId> {
        let data = self.db.symbol(symbol)?;
        match &data.declaration {
            Some(Declaration::PropertySignature {
                type_annotation: Some(ty),
                ..
            }) => Some(*ty),
            _ => data.ty,
        }
    }
}

#[cfg(test)]
#[path = "../tests/visitor_tests.rs"]
mod tests;
