//! `keyof T` and `T[K]`.
//!
//! Both need the key set of an object type. Index types are resolved to
//! their literal keys up front, so `T["a" | "b"]` names and compiles the same
//! as `T[K]` with `K` bound to `"a" | "b"`.

use indexmap::IndexSet;
use tracing::trace;
use tsguard_emitter::IRNode;
use tsguard_emitter::emit_utils::{format_number, quote_string};
use tsguard_types::{IntrinsicKind, LiteralValue, TypeData, TypeId};

use crate::context::CompilationContext;
use crate::emit::{self, value};
use crate::error::{CompileError, CompileResult};
use crate::mapper::get_base_type_mapping;
use crate::naming::NameMode;
use crate::property::{ObjectMember, collect_object_members};

/// Keys of a type as seen by `keyof`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KeySet {
    pub names: IndexSet<String>,
    /// The type accepts arbitrary string keys.
    pub string_index: bool,
}

impl CompilationContext<'_> {
    /// Resolve an index type to the property names it selects, in first-seen
    /// order and without duplicates.
    pub fn resolve_index_keys(&mut self, index: TypeId) -> CompileResult<Vec<String>> {
        let mut keys = IndexSet::new();
        self.collect_index_keys(index, &mut keys)?;
        Ok(keys.into_iter().collect())
    }

    fn collect_index_keys(&mut self, index: TypeId, keys: &mut IndexSet<String>) -> CompileResult<()> {
        match self.lookup(index)? {
            TypeData::Literal(LiteralValue::String(s)) => {
                keys.insert(s.clone());
            }
            TypeData::Literal(LiteralValue::Number(n)) => {
                keys.insert(format_number(*n));
            }
            TypeData::Union(members) => {
                for &member in members {
                    self.collect_index_keys(member, keys)?;
                }
            }
            TypeData::TypeParameter(_) => {
                let binding = self.get_resolved_type_parameter(index)?;
                self.with_scope(binding.scope, |ctx| ctx.collect_index_keys(binding.ty, keys))?;
            }
            TypeData::KeyOf(target) => {
                let set = self.collect_keys(*target)?;
                if set.string_index {
                    return Err(CompileError::InvalidIndexType {
                        ty: index,
                        reason: "keyof a type with a string index selects every key".to_string(),
                    });
                }
                keys.extend(set.names);
            }
            other => {
                return Err(CompileError::InvalidIndexType {
                    ty: index,
                    reason: format!("{} types cannot select properties", other.kind_name()),
                });
            }
        }
        Ok(())
    }

    /// Keys of `ty`. A union keeps only keys common to every member; an
    /// intersection keeps the keys of any member.
    pub fn collect_keys(&mut self, ty: TypeId) -> CompileResult<KeySet> {
        match self.lookup(ty)? {
            TypeData::TypeParameter(_) => {
                let binding = self.get_resolved_type_parameter(ty)?;
                self.with_scope(binding.scope, |ctx| ctx.collect_keys(binding.ty))
            }
            TypeData::Reference { target, .. } => self.collect_keys(*target),
            TypeData::Object(_) => {
                let members = collect_object_members(self.db, ty)?;
                Ok(KeySet {
                    names: members.members.into_keys().collect(),
                    string_index: members.string_index.is_some(),
                })
            }
            TypeData::Union(members) => {
                let mut result: Option<KeySet> = None;
                for &member in members {
                    let set = self.collect_keys(member)?;
                    result = Some(match result {
                        None => set,
                        Some(acc) => KeySet {
                            names: acc.names.intersection(&set.names).cloned().collect(),
                            string_index: acc.string_index && set.string_index,
                        },
                    });
                }
                Ok(result.unwrap_or_default())
            }
            TypeData::Intersection(members) => {
                let mut acc = KeySet::default();
                for &member in members {
                    let set = self.collect_keys(member)?;
                    acc.names.extend(set.names);
                    acc.string_index |= set.string_index;
                }
                Ok(acc)
            }
            TypeData::Intrinsic(IntrinsicKind::Any) => Ok(KeySet {
                names: IndexSet::new(),
                string_index: true,
            }),
            other => Err(CompileError::UnsupportedType {
                ty,
                kind: other.kind_name(),
                reason: "keyof is only supported on object types".to_string(),
            }),
        }
    }

    /// Validator for `keyof ty`.
    pub(crate) fn compile_keyof(&mut self, ty: TypeId) -> CompileResult<String> {
        let set = self.collect_keys(ty)?;
        if set.string_index {
            return Ok(self.compile_intrinsic(IntrinsicKind::String));
        }
        if set.names.is_empty() {
            return Ok(self.compile_intrinsic(IntrinsicKind::Never));
        }
        let name = self.name_for(ty, &NameMode::KeyOf)?;
        trace!(name = name.as_str(), keys = set.names.len(), "compile keyof");

        // A numeric key such as `0` is accepted as a number as well as a string.
        let mut list = Vec::with_capacity(set.names.len());
        let mut expected = Vec::with_capacity(set.names.len());
        for key in &set.names {
            list.push(IRNode::string(key.as_str()));
            expected.push(quote_string(key));
            if is_canonical_number(key) {
                list.push(IRNode::number(key.as_str()));
                expected.push(key.clone());
            }
        }
        let condition = IRNode::strict_eq(
            IRNode::call(IRNode::prop(IRNode::array(list), "indexOf"), vec![value()]),
            IRNode::number("-1"),
        );
        let reason = format!("expected {}", expected.join(" | "));
        Ok(self.create_assertion_function(condition, &reason, &name))
    }

    /// Validator for `ty[keys]`.
    ///
    /// `(A | B)[K]` is `A[K] | B[K]`. For `(A & B)[K]` each key is read from
    /// every member that declares it and the results are intersected.
    pub(crate) fn compile_indexed_access(&mut self, ty: TypeId, keys: &[String]) -> CompileResult<String> {
        if keys.is_empty() {
            return Ok(self.compile_intrinsic(IntrinsicKind::Never));
        }
        let name = match self.lookup(ty)? {
            TypeData::Object(object) => {
                let name = self.name_for(ty, &NameMode::IndexedAccess(keys.to_vec()))?;
                let has_bases = !object.base_types.is_empty();
                self.set_function_if_not_exists(&name, |ctx| {
                    trace!(name = name.as_str(), keys = keys.len(), "compile indexed access");
                    if has_bases {
                        let frame = get_base_type_mapping(ctx.db, ty, ctx.mapper.depth())?;
                        ctx.with_frame(frame, ty, |ctx| ctx.indexed_access_body(ty, keys, &name))
                    } else {
                        ctx.indexed_access_body(ty, keys, &name)
                    }
                })?
            }
            TypeData::Union(members) => {
                let name = self.name_for(ty, &NameMode::IndexedAccess(keys.to_vec()))?;
                self.set_function_if_not_exists(&name, |ctx| {
                    trace!(name = name.as_str(), members = members.len(), "compile union indexed access");
                    let mode = NameMode::IndexedAccess(keys.to_vec());
                    let mut alternatives: IndexSet<String> = IndexSet::new();
                    for &member in members {
                        alternatives.insert(ctx.compile_with_mode(member, &mode)?);
                    }
                    Ok(ctx.combine_alternatives(&name, alternatives))
                })?
            }
            TypeData::Intersection(members) => {
                let name = self.name_for(ty, &NameMode::IndexedAccess(keys.to_vec()))?;
                self.set_function_if_not_exists(&name, |ctx| {
                    trace!(name = name.as_str(), keys = keys.len(), "compile intersection indexed access");
                    if let [key] = keys {
                        let owners = ctx.intersection_key_owners(ty, members, key)?;
                        let mode = NameMode::IndexedAccess(vec![key.clone()]);
                        let mut parts: IndexSet<String> = IndexSet::new();
                        for member in owners {
                            parts.insert(ctx.compile_with_mode(member, &mode)?);
                        }
                        let parts: Vec<String> = parts.into_iter().collect();
                        return Ok(emit::conjunction_function(&name, &parts));
                    }
                    let mut alternatives: IndexSet<String> = IndexSet::new();
                    for key in keys {
                        alternatives.insert(ctx.compile_indexed_access(ty, std::slice::from_ref(key))?);
                    }
                    Ok(ctx.combine_alternatives(&name, alternatives))
                })?
            }
            TypeData::Intrinsic(IntrinsicKind::Any) => self.compile_intrinsic(IntrinsicKind::Any),
            other => {
                return Err(CompileError::UnsupportedType {
                    ty,
                    kind: other.kind_name(),
                    reason: "indexed access is only supported on object types".to_string(),
                });
            }
        };
        Ok(name)
    }

    /// Members of the intersection `ty` that can supply `key`, either as a
    /// declared property or through a string index.
    fn intersection_key_owners(&mut self, ty: TypeId, members: &[TypeId], key: &str) -> CompileResult<Vec<TypeId>> {
        let mut owners = Vec::new();
        for &member in members {
            let set = self.collect_keys(member)?;
            if set.string_index || set.names.contains(key) {
                owners.push(member);
            }
        }
        if owners.is_empty() {
            return Err(CompileError::InvalidIndexType {
                ty,
                reason: format!("property '{key}' does not exist"),
            });
        }
        Ok(owners)
    }

    fn combine_alternatives(&self, name: &str, alternatives: IndexSet<String>) -> IRNode {
        let alternatives: Vec<String> = alternatives.into_iter().collect();
        if alternatives.len() == 1 {
            emit::conjunction_function(name, &alternatives)
        } else {
            emit::disjunction_function(name, &alternatives, self.detailed())
        }
    }

    fn indexed_access_body(&mut self, ty: TypeId, keys: &[String], name: &str) -> CompileResult<IRNode> {
        let members = collect_object_members(self.db, ty)?;
        let mut alternatives: IndexSet<String> = IndexSet::new();
        for key in keys {
            match members.members.get(key) {
                Some(ObjectMember::Property(info)) => {
                    alternatives.insert(self.compile_type(info.ty)?);
                    if info.optional {
                        alternatives.insert(self.compile_intrinsic(IntrinsicKind::Undefined));
                    }
                }
                Some(ObjectMember::Method { name: method, .. }) => {
                    alternatives.insert(self.compile_function(&format!("method '{method}'"))?);
                }
                None => match members.string_index {
                    Some(index) => {
                        alternatives.insert(self.compile_type(index)?);
                    }
                    None => {
                        return Err(CompileError::InvalidIndexType {
                            ty,
                            reason: format!("property '{key}' does not exist"),
                        });
                    }
                },
            }
        }

        Ok(self.combine_alternatives(name, alternatives))
    }
}

/// `key` is the canonical spelling of a finite number, as `"0"` or `"1.5"`
/// are and `"01"` or `"1e3"` are not.
fn is_canonical_number(key: &str) -> bool {
    key.parse::<f64>()
        .is_ok_and(|n| n.is_finite() && format_number(n) == key)
}
