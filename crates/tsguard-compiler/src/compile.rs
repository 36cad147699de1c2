//! Structural compiler.
//!
//! [`CompilationContext::compile_type`] walks a type and returns the name of
//! its validator, creating that validator and everything it calls on first
//! use. Composite validators only ever call other validators by name, so a
//! recursive type compiles to a finite set of functions: the second visit of
//! a type under the same bindings finds its name already reserved.

use tracing::{Level, span, trace};
use tsguard_emitter::IRNode;
use tsguard_types::{TupleElement, TypeData, TypeId};

use crate::context::CompilationContext;
use crate::emit::{self, value};
use crate::error::{CompileError, CompileResult};
use crate::mapper::get_type_reference_mapping;
use crate::naming::NameMode;

impl CompilationContext<'_> {
    /// Return the name of the validator for `ty`, compiling it if needed.
    pub fn compile_type(&mut self, ty: TypeId) -> CompileResult<String> {
        self.compile_with_mode(ty, &NameMode::Plain)
    }

    pub(crate) fn compile_with_mode(&mut self, ty: TypeId, mode: &NameMode) -> CompileResult<String> {
        let data = self.lookup(ty)?;
        let span = span!(Level::TRACE, "compile_type", ty = ty.0, kind = data.kind_name());
        let _enter = span.enter();

        match (data, mode) {
            (TypeData::TypeParameter(_), _) => {
                let binding = self.get_resolved_type_parameter(ty)?;
                trace!(param = ty.0, resolved = binding.ty.0, scope = binding.scope, "resolve type parameter");
                self.with_scope(binding.scope, |ctx| ctx.compile_with_mode(binding.ty, mode))
            }
            (TypeData::Reference { target, .. }, _) => {
                let frame = get_type_reference_mapping(self.db, ty, self.mapper.depth())?;
                let target = *target;
                self.with_frame(frame, ty, |ctx| ctx.compile_with_mode(target, mode))
            }
            (_, NameMode::KeyOf) => self.compile_keyof(ty),
            (_, NameMode::IndexedAccess(keys)) => self.compile_indexed_access(ty, keys),
            (TypeData::Intrinsic(kind), NameMode::Plain) => Ok(self.compile_intrinsic(*kind)),
            (TypeData::Literal(literal), NameMode::Plain) => self.compile_literal(ty, literal),
            (TypeData::Object(object), NameMode::Plain) => self.compile_object(ty, object),
            (TypeData::Union(members), NameMode::Plain) => self.compile_union(ty, members),
            (TypeData::Intersection(members), NameMode::Plain) => {
                self.compile_intersection(ty, members)
            }
            (TypeData::Array(element), NameMode::Plain) => self.compile_array(ty, *element),
            (TypeData::Tuple(elements), NameMode::Plain) => self.compile_tuple(ty, elements),
            (TypeData::IndexedAccess { object, index }, NameMode::Plain) => {
                let keys = self.resolve_index_keys(*index)?;
                self.compile_with_mode(*object, &NameMode::IndexedAccess(keys))
            }
            (TypeData::KeyOf(inner), NameMode::Plain) => {
                self.compile_with_mode(*inner, &NameMode::KeyOf)
            }
            (TypeData::Function, NameMode::Plain) => self.compile_function(&format!("type {ty}")),
        }
    }

    fn compile_members(&mut self, members: &[TypeId]) -> CompileResult<Vec<String>> {
        let mut names: Vec<String> = Vec::with_capacity(members.len());
        for &member in members {
            let name = self.compile_type(member)?;
            if !names.contains(&name) {
                names.push(name);
            }
        }
        Ok(names)
    }

    fn compile_union(&mut self, ty: TypeId, members: &[TypeId]) -> CompileResult<String> {
        let name = self.name_for(ty, &NameMode::Plain)?;
        self.set_function_if_not_exists(&name, |ctx| {
            let names = ctx.compile_members(members)?;
            Ok(emit::disjunction_function(&name, &names, ctx.detailed()))
        })
    }

    fn compile_intersection(&mut self, ty: TypeId, members: &[TypeId]) -> CompileResult<String> {
        let name = self.name_for(ty, &NameMode::Plain)?;
        self.set_function_if_not_exists(&name, |ctx| {
            let names = ctx.compile_members(members)?;
            Ok(emit::conjunction_function(&name, &names))
        })
    }

    fn compile_array(&mut self, ty: TypeId, element: TypeId) -> CompileResult<String> {
        let name = self.name_for(ty, &NameMode::Plain)?;
        self.set_function_if_not_exists(&name, |ctx| {
            let validator = ctx.compile_type(element)?;
            let detailed = ctx.detailed();
            let body = vec![
                not_an_array(detailed),
                rest_loop(&validator, IRNode::number("0")),
                IRNode::ret(Some(IRNode::NullLiteral)),
            ];
            Ok(IRNode::func_decl(&name, emit::validator_params(), body))
        })
    }

    fn compile_tuple(&mut self, ty: TypeId, elements: &[TupleElement]) -> CompileResult<String> {
        let (fixed, rest) = match elements.split_last() {
            Some((last, init)) if last.rest => (init, Some(last)),
            _ => (elements, None),
        };
        if fixed.iter().any(|e| e.rest) {
            return Err(CompileError::UnsupportedType {
                ty,
                kind: "tuple",
                reason: "a rest element must be the last element".to_string(),
            });
        }

        let name = self.name_for(ty, &NameMode::Plain)?;
        self.set_function_if_not_exists(&name, |ctx| {
            let detailed = ctx.detailed();
            let min = fixed.iter().filter(|e| !e.optional).count();
            let max = fixed.len();

            let mut body = vec![not_an_array(detailed)];
            if min > 0 {
                body.push(length_check("<", min, &format!("expected at least {min} elements"), detailed));
            }
            if rest.is_none() {
                body.push(length_check(">", max, &format!("expected at most {max} elements"), detailed));
            }

            for (index, element) in fixed.iter().enumerate() {
                let validator = ctx.compile_type(element.ty)?;
                let position = IRNode::number(index.to_string());
                let check = emit::check_and_propagate(
                    &validator,
                    IRNode::elem(value(), position.clone()),
                    emit::child_path(emit::element_segment(position.clone())),
                );
                if element.optional {
                    body.push(IRNode::if_stmt(
                        IRNode::strict_ne(IRNode::elem(value(), position), IRNode::void_0()),
                        IRNode::block(check.to_vec()),
                        None,
                    ));
                } else {
                    body.extend(check);
                }
            }

            if let Some(rest) = rest {
                let validator = ctx.compile_type(rest.ty)?;
                body.push(rest_loop(&validator, IRNode::number(max.to_string())));
            }
            body.push(IRNode::ret(Some(IRNode::NullLiteral)));
            Ok(IRNode::func_decl(&name, emit::validator_params(), body))
        })
    }
}

/// `if (!Array.isArray(object)) return <failure>;`
fn not_an_array(detailed: bool) -> IRNode {
    IRNode::if_stmt(
        IRNode::not(IRNode::call(
            IRNode::prop(IRNode::id("Array"), "isArray"),
            vec![value()],
        )),
        IRNode::ret(Some(emit::failure("expected an array", detailed))),
        None,
    )
}

/// `if (object.length <op> bound) return <failure>;`
fn length_check(operator: &str, bound: usize, reason: &str, detailed: bool) -> IRNode {
    IRNode::if_stmt(
        IRNode::binary(
            IRNode::prop(value(), "length"),
            operator,
            IRNode::number(bound.to_string()),
        ),
        IRNode::ret(Some(emit::failure(reason, detailed))),
        None,
    )
}

/// Check every element from `start` on with `validator`.
fn rest_loop(validator: &str, start: IRNode) -> IRNode {
    let index = IRNode::id("i");
    let check = emit::check_and_propagate(
        validator,
        IRNode::elem(value(), index.clone()),
        emit::child_path(emit::element_segment(index)),
    );
    IRNode::for_count("i", start, IRNode::prop(value(), "length"), check.to_vec())
}

#[cfg(test)]
#[path = "../tests/compile_tests.rs"]
mod tests;
