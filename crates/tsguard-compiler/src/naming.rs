//! Canonical validator names.
//!
//! A validator's name is its deduplication key, so two type occurrences get
//! the same name exactly when they validate the same values under the active
//! generic bindings. Names are built from this grammar:
//!
//! | Part | Meaning |
//! |------|---------|
//! | `_string`, `_number`, ... | shared intrinsic validators |
//! | `_<id>` | type with arena id `<id>` |
//! | `K` | keyof mode: validates the keys of the type |
//! | `I<keys>J` | indexed-access mode for the listed keys, each written as `<len>_<escaped>` |
//! | `L<names>R` | resolved names of the type's free type parameters, in id order |
//!
//! References never get a name of their own: `Box<string>` is named as
//! `Box`'s declaration under the binding `T = string`, which makes a
//! recursive reference that re-binds nothing land on its enclosing name.
//! Type parameters are named as whatever they resolve to.

use tsguard_common::escape_identifier_segment;
use tsguard_types::{IntrinsicKind, ObjectFlags, TypeData, TypeId, collect_free_type_parameters};

use crate::context::CompilationContext;
use crate::error::CompileResult;
use crate::mapper::get_type_reference_mapping;
use crate::options::FunctionBehavior;

/// Which aspect of a type a validator checks.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum NameMode {
    /// Values of the type itself.
    Plain,
    /// Values of `keyof T`.
    KeyOf,
    /// Values of `T[K]`, with `K` already resolved to its literal keys.
    IndexedAccess(Vec<String>),
}

/// Name of the shared validator for an intrinsic kind.
pub fn intrinsic_name(kind: IntrinsicKind) -> String {
    match kind {
        IntrinsicKind::Void => "_undefined".to_string(),
        other => format!("_{}", other.keyword()),
    }
}

fn encode_keys(keys: &[String]) -> String {
    let mut out = String::from("I");
    for key in keys {
        let escaped = escape_identifier_segment(key);
        out.push_str(&escaped.len().to_string());
        out.push('_');
        out.push_str(&escaped);
    }
    out.push('J');
    out
}

impl CompilationContext<'_> {
    /// Canonical name of the validator for `ty` in `mode` under the active
    /// bindings. Calling it twice with the same inputs yields the same name;
    /// the mapper stack is left as it was found.
    pub fn name_for(&mut self, ty: TypeId, mode: &NameMode) -> CompileResult<String> {
        self.enter_naming(ty)?;
        let result = self.name_for_inner(ty, mode);
        self.leave_naming();
        result
    }

    fn name_for_inner(&mut self, ty: TypeId, mode: &NameMode) -> CompileResult<String> {
        let data = self.lookup(ty)?;
        match (data, mode) {
            (TypeData::TypeParameter(_), _) => {
                let binding = self.get_resolved_type_parameter(ty)?;
                self.with_scope(binding.scope, |ctx| ctx.name_for(binding.ty, mode))
            }
            (TypeData::Reference { target, .. }, _) => {
                let frame = get_type_reference_mapping(self.db, ty, self.mapper.depth())?;
                let target = *target;
                self.with_frame(frame, ty, |ctx| ctx.name_for(target, mode))
            }
            (TypeData::Intrinsic(kind), NameMode::Plain) => Ok(intrinsic_name(*kind)),
            (TypeData::KeyOf(inner), NameMode::Plain) => self.name_for(*inner, &NameMode::KeyOf),
            (TypeData::IndexedAccess { object, index }, NameMode::Plain) => {
                let keys = self.resolve_index_keys(*index)?;
                self.name_for(*object, &NameMode::IndexedAccess(keys))
            }
            (TypeData::Function, NameMode::Plain) => Ok(match self.options.function_behavior {
                FunctionBehavior::Basic => "_function".to_string(),
                FunctionBehavior::Ignore => intrinsic_name(IntrinsicKind::Any),
                FunctionBehavior::Error => format!("_{ty}"),
            }),
            (TypeData::Object(object), NameMode::Plain)
                if self.options.ignore_classes && object.flags.contains(ObjectFlags::CLASS) =>
            {
                Ok(intrinsic_name(IntrinsicKind::Any))
            }
            _ => self.structural_name(ty, mode),
        }
    }

    fn structural_name(&mut self, ty: TypeId, mode: &NameMode) -> CompileResult<String> {
        let mut name = format!("_{ty}");
        match mode {
            NameMode::Plain => {}
            NameMode::KeyOf => name.push('K'),
            NameMode::IndexedAccess(keys) => name.push_str(&encode_keys(keys)),
        }

        let free = collect_free_type_parameters(self.db, ty);
        if !free.is_empty() {
            name.push('L');
            for param in free {
                let resolved = self.name_for(param, &NameMode::Plain)?;
                name.push_str(&resolved);
            }
            name.push('R');
        }
        Ok(name)
    }
}

#[cfg(test)]
#[path = "../tests/naming_tests.rs"]
mod tests;
