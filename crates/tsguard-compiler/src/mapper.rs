//! Generic type-parameter resolution.
//!
//! Entering the body of a generic instantiation pushes one frame that maps
//! the target's type parameters to the arguments given at that site. Frames
//! are searched innermost first.
//!
//! Each binding records the *scope* its argument was written in: the number
//! of frames that were active there. An argument is always interpreted with
//! the stack cut back to its scope, so in
//!
//! ```typescript
//! interface Tree<T> { value: T; children: Tree<T[]> }
//! ```
//!
//! the `T` inside `T[]` resolves against the outer instantiation rather than
//! against the frame that binds `T` to `T[]` itself.

use rustc_hash::FxHashMap;
use tsguard_common::limits::{MAX_INSTANTIATION_DEPTH, MAX_TYPE_PARAMETER_CHAIN};
use tsguard_types::{TypeData, TypeDatabase, TypeId};

use crate::error::{CompileError, CompileResult};

/// A type argument together with the stack depth it must be read at.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Binding {
    pub ty: TypeId,
    pub scope: usize,
}

/// Type-parameter to type-argument mapping of one instantiation site.
pub type TypeMapping = FxHashMap<TypeId, Binding>;

/// Stack of [`TypeMapping`] frames, one per entered generic body.
#[derive(Debug, Default)]
pub struct TypeMapperStack {
    frames: Vec<TypeMapping>,
}

impl TypeMapperStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn frames(&self) -> &[TypeMapping] {
        &self.frames
    }

    /// Push a frame for entering the body of `owner`.
    pub fn push(&mut self, frame: TypeMapping, owner: TypeId) -> CompileResult<()> {
        if self.frames.len() >= MAX_INSTANTIATION_DEPTH as usize {
            return Err(CompileError::InstantiationTooDeep {
                ty: owner,
                limit: MAX_INSTANTIATION_DEPTH,
            });
        }
        self.frames.push(frame);
        Ok(())
    }

    pub fn pop(&mut self) -> Option<TypeMapping> {
        self.frames.pop()
    }

    /// Remove every frame above `scope` and return them for [`reattach`].
    ///
    /// [`reattach`]: Self::reattach
    pub fn detach_above(&mut self, scope: usize) -> Vec<TypeMapping> {
        let scope = scope.min(self.frames.len());
        self.frames.split_off(scope)
    }

    pub fn reattach(&mut self, frames: Vec<TypeMapping>) {
        self.frames.extend(frames);
    }

    /// Resolve `param` to the type it stands for and the scope that type
    /// must be read at.
    ///
    /// Searches the frames from innermost to outermost. A parameter bound to
    /// another parameter continues the search within the binding's scope.
    /// A parameter bound nowhere falls back to its declared default, read at
    /// the scope where the search ended.
    pub fn get_resolved_type_parameter(
        &self,
        db: &dyn TypeDatabase,
        param: TypeId,
    ) -> CompileResult<Binding> {
        let mut current = param;
        let mut limit = self.frames.len();
        let mut hops = 0u32;

        loop {
            let info = match db.lookup(current) {
                Some(TypeData::TypeParameter(info)) => info,
                Some(_) => {
                    return Ok(Binding {
                        ty: current,
                        scope: limit,
                    });
                }
                None => return Err(CompileError::UnknownType(current)),
            };

            let found = self.frames[..limit]
                .iter()
                .rev()
                .find_map(|frame| frame.get(&current).copied());

            let next = match found {
                Some(binding) => binding,
                None => match info.default {
                    Some(default) => Binding {
                        ty: default,
                        scope: limit,
                    },
                    None => {
                        return Err(CompileError::UnboundTypeParameter {
                            name: info.name.clone(),
                        });
                    }
                },
            };

            hops += 1;
            if hops > MAX_TYPE_PARAMETER_CHAIN {
                return Err(CompileError::InstantiationTooDeep {
                    ty: param,
                    limit: MAX_TYPE_PARAMETER_CHAIN,
                });
            }
            current = next.ty;
            limit = next.scope.min(limit);
        }
    }
}

/// Collect the mapping for entering the body of the generic reference
/// `reference` while `depth` frames are active.
///
/// The target's own parameters bind to the reference's arguments. Then every
/// base type of the target is walked recursively and its parameters bind to
/// the arguments written in the `extends` clause. A parameter mapped to
/// itself is not recorded.
pub fn get_type_reference_mapping(
    db: &dyn TypeDatabase,
    reference: TypeId,
    depth: usize,
) -> CompileResult<TypeMapping> {
    let (target, args) = match db.lookup(reference) {
        Some(TypeData::Reference {
            target,
            type_arguments,
        }) => (*target, type_arguments.as_slice()),
        Some(other) => {
            return Err(CompileError::UnsupportedType {
                ty: reference,
                kind: other.kind_name(),
                reason: "expected a generic reference".to_string(),
            });
        }
        None => return Err(CompileError::UnknownType(reference)),
    };

    let mut mapping = TypeMapping::default();
    collect_mapping(db, target, args, depth, depth + 1, &mut mapping, 0)?;
    Ok(mapping)
}

/// Mapping for the base types of a non-generic-reference object type, used
/// when its inherited members are compiled.
pub fn get_base_type_mapping(
    db: &dyn TypeDatabase,
    object: TypeId,
    depth: usize,
) -> CompileResult<TypeMapping> {
    let mut mapping = TypeMapping::default();
    collect_bases(db, object, depth, depth + 1, &mut mapping, 0)?;
    Ok(mapping)
}

fn collect_mapping(
    db: &dyn TypeDatabase,
    target: TypeId,
    args: &[TypeId],
    arg_scope: usize,
    base_scope: usize,
    mapping: &mut TypeMapping,
    level: u32,
) -> CompileResult<()> {
    let object = match db.lookup(target) {
        Some(TypeData::Object(object)) => object,
        Some(other) => {
            return Err(CompileError::UnsupportedType {
                ty: target,
                kind: other.kind_name(),
                reason: "generic target is not an object type".to_string(),
            });
        }
        None => return Err(CompileError::UnknownType(target)),
    };

    for (&param, &arg) in object.type_parameters.iter().zip(args) {
        if param == arg {
            continue;
        }
        mapping.entry(param).or_insert(Binding {
            ty: arg,
            scope: arg_scope,
        });
    }

    collect_bases(db, target, base_scope, base_scope, mapping, level)
}

fn collect_bases(
    db: &dyn TypeDatabase,
    object: TypeId,
    arg_scope: usize,
    base_scope: usize,
    mapping: &mut TypeMapping,
    level: u32,
) -> CompileResult<()> {
    if level >= MAX_INSTANTIATION_DEPTH {
        return Err(CompileError::InstantiationTooDeep {
            ty: object,
            limit: MAX_INSTANTIATION_DEPTH,
        });
    }
    let Some(TypeData::Object(shape)) = db.lookup(object) else {
        return Ok(());
    };

    for &base in &shape.base_types {
        match db.lookup(base) {
            Some(TypeData::Reference {
                target,
                type_arguments,
            }) => collect_mapping(
                db,
                *target,
                type_arguments,
                arg_scope,
                base_scope,
                mapping,
                level + 1,
            )?,
            Some(TypeData::Object(_)) => {
                collect_bases(db, base, base_scope, base_scope, mapping, level + 1)?;
            }
            Some(_) => {}
            None => return Err(CompileError::UnknownType(base)),
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../tests/mapper_tests.rs"]
mod tests;
