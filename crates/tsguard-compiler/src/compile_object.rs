//! Object, interface and class validators.
//!
//! An object validator is a conjunction of:
//!
//! 1. the shared shape check (a non-null, non-array object),
//! 2. one validator per own or inherited member,
//! 3. either a string-index check over undeclared keys, or, when
//!    `disallowSuperfluousObjectProperties` is set, a check rejecting them.

use tsguard_common::{escape_identifier_segment, is_valid_identifier};
use tsguard_emitter::IRNode;
use tsguard_types::{IntrinsicKind, ObjectFlags, ObjectType, TypeId};
use tracing::trace;

use crate::context::CompilationContext;
use crate::emit::{self, value};
use crate::error::CompileResult;
use crate::mapper::get_base_type_mapping;
use crate::naming::NameMode;
use crate::property::{ObjectMember, collect_object_members};

const OBJECT_SHAPE: &str = "_plain_object";

/// `object.key` when `key` is a plain identifier, `object["key"]` otherwise.
fn member_access(object: IRNode, key: &str) -> IRNode {
    if is_valid_identifier(key) {
        IRNode::prop(object, key)
    } else {
        IRNode::elem(object, IRNode::string(key))
    }
}

/// `[k1, k2].indexOf(key) === -1`
fn is_undeclared(declared: &[String], key: IRNode) -> IRNode {
    let list = declared.iter().map(|k| IRNode::string(k.as_str())).collect();
    IRNode::strict_eq(
        IRNode::call(IRNode::prop(IRNode::array(list), "indexOf"), vec![key]),
        IRNode::number("-1"),
    )
}

/// `for (var i = 0; i < keys.length; i++) { body }` over `Object.keys(object)`
fn for_each_key(body: Vec<IRNode>) -> [IRNode; 2] {
    [
        IRNode::var_decl(
            "keys",
            Some(IRNode::call(
                IRNode::prop(IRNode::id("Object"), "keys"),
                vec![value()],
            )),
        ),
        IRNode::for_count(
            "i",
            IRNode::number("0"),
            IRNode::prop(IRNode::id("keys"), "length"),
            body,
        ),
    ]
}

fn current_key() -> IRNode {
    IRNode::elem(IRNode::id("keys"), IRNode::id("i"))
}

impl CompilationContext<'_> {
    pub(crate) fn compile_object(&mut self, ty: TypeId, object: &ObjectType) -> CompileResult<String> {
        if self.options.ignore_classes && object.flags.contains(ObjectFlags::CLASS) {
            return Ok(self.compile_intrinsic(IntrinsicKind::Any));
        }
        let name = self.name_for(ty, &NameMode::Plain)?;
        let has_bases = !object.base_types.is_empty();
        self.set_function_if_not_exists(&name, |ctx| {
            trace!(name = name.as_str(), members = object.properties.len(), "compile object");
            if has_bases {
                let frame = get_base_type_mapping(ctx.db, ty, ctx.mapper.depth())?;
                ctx.with_frame(frame, ty, |ctx| ctx.object_body(ty, &name))
            } else {
                ctx.object_body(ty, &name)
            }
        })
    }

    fn object_body(&mut self, ty: TypeId, name: &str) -> CompileResult<IRNode> {
        let collected = collect_object_members(self.db, ty)?;
        let declared: Vec<String> = collected.members.keys().cloned().collect();

        let mut validators = vec![self.object_shape_check()];
        for member in collected.members.values() {
            let (key, validator, optional) = match member {
                ObjectMember::Method { name: key, optional } => {
                    if self.options.ignore_methods {
                        continue;
                    }
                    let validator = self.compile_function(&format!("method '{key}'"))?;
                    (key.as_str(), validator, *optional)
                }
                ObjectMember::Property(info) => {
                    let validator = self.compile_type(info.ty)?;
                    (info.name.as_str(), validator, info.optional)
                }
            };
            validators.push(self.property_function(name, key, &validator, optional));
        }

        if let Some(index) = collected.string_index {
            let validator = self.compile_type(index)?;
            validators.push(self.string_index_function(name, &validator, &declared));
        } else if self.options.disallow_superfluous_object_properties {
            validators.push(self.superfluous_keys_function(name, &declared));
        }

        Ok(emit::conjunction_function(name, &validators))
    }

    /// `typeof object !== "object" || object === null || Array.isArray(object)`
    fn object_shape_check(&mut self) -> String {
        let condition = IRNode::any_of(vec![
            IRNode::strict_ne(IRNode::type_of(value()), IRNode::string("object")),
            IRNode::strict_eq(value(), IRNode::NullLiteral),
            IRNode::call(IRNode::prop(IRNode::id("Array"), "isArray"), vec![value()]),
        ]);
        self.create_assertion_function(condition, "expected an object", OBJECT_SHAPE)
    }

    fn property_function(&mut self, object_name: &str, key: &str, validator: &str, optional: bool) -> String {
        let name = format!("{object_name}P{}", escape_identifier_segment(key));
        self.define_function(&name, |detailed| {
            let check = IRNode::ret(Some(emit::call_validator(
                validator,
                member_access(value(), key),
                emit::child_path(IRNode::string(key)),
            )));
            let guard = if optional {
                IRNode::if_stmt(
                    IRNode::strict_eq(member_access(value(), key), IRNode::void_0()),
                    IRNode::ret(Some(IRNode::NullLiteral)),
                    None,
                )
            } else {
                IRNode::if_stmt(
                    IRNode::not(IRNode::binary(IRNode::string(key), "in", value())),
                    IRNode::ret(Some(emit::failure(
                        &format!("expected '{key}' in object"),
                        detailed,
                    ))),
                    None,
                )
            };
            IRNode::func_decl(&name, emit::validator_params(), vec![guard, check])
        })
    }

    fn string_index_function(&mut self, object_name: &str, validator: &str, declared: &[String]) -> String {
        let name = format!("{object_name}X");
        self.define_function(&name, |_| {
            let check = emit::check_and_propagate(
                validator,
                IRNode::elem(value(), current_key()),
                emit::child_path(current_key()),
            );
            let body = if declared.is_empty() {
                check.to_vec()
            } else {
                vec![IRNode::if_stmt(
                    is_undeclared(declared, current_key()),
                    IRNode::block(check.to_vec()),
                    None,
                )]
            };
            let mut statements = for_each_key(body).to_vec();
            statements.push(IRNode::ret(Some(IRNode::NullLiteral)));
            IRNode::func_decl(&name, emit::validator_params(), statements)
        })
    }

    fn superfluous_keys_function(&mut self, object_name: &str, declared: &[String]) -> String {
        let name = format!("{object_name}S");
        self.define_function(&name, |detailed| {
            let reject = IRNode::if_stmt(
                is_undeclared(declared, current_key()),
                IRNode::ret(Some(emit::failure_with(
                    vec![
                        IRNode::string("superfluous property '"),
                        current_key(),
                        IRNode::string("' in object"),
                    ],
                    detailed,
                ))),
                None,
            );
            let mut statements = for_each_key(vec![reject]).to_vec();
            statements.push(IRNode::ret(Some(IRNode::NullLiteral)));
            IRNode::func_decl(&name, emit::validator_params(), statements)
        })
    }
}
