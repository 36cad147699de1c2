//! Per-pass compilation state.

use tsguard_emitter::IRNode;
use tsguard_types::{TypeData, TypeDatabase, TypeId};

use crate::emit;
use crate::error::{CompileError, CompileResult};
use crate::mapper::{Binding, TypeMapperStack, TypeMapping};
use crate::options::ValidatorOptions;
use crate::registry::FunctionRegistry;

/// Mutable state shared by the whole structural-compiler recursion of one
/// pass. Created fresh per pass and consumed when the pass finishes.
pub struct CompilationContext<'a> {
    pub(crate) db: &'a dyn TypeDatabase,
    pub(crate) options: ValidatorOptions,
    pub(crate) registry: FunctionRegistry,
    pub(crate) mapper: TypeMapperStack,
    naming_depth: u32,
}

impl<'a> CompilationContext<'a> {
    pub fn new(db: &'a dyn TypeDatabase, options: ValidatorOptions) -> Self {
        Self {
            db,
            options,
            registry: FunctionRegistry::new(),
            mapper: TypeMapperStack::new(),
            naming_depth: 0,
        }
    }

    pub fn options(&self) -> &ValidatorOptions {
        &self.options
    }

    pub fn registry(&self) -> &FunctionRegistry {
        &self.registry
    }

    pub fn mapper(&self) -> &TypeMapperStack {
        &self.mapper
    }

    pub fn into_registry(self) -> FunctionRegistry {
        self.registry
    }

    pub(crate) fn lookup(&self, ty: TypeId) -> CompileResult<&'a TypeData> {
        self.db.lookup(ty).ok_or(CompileError::UnknownType(ty))
    }

    pub(crate) const fn detailed(&self) -> bool {
        self.options.emit_detailed_errors
    }

    // =========================================================================
    // Scope management
    // =========================================================================

    /// Run `f` with `frame` pushed. The frame is popped on every path,
    /// including when `f` fails.
    pub(crate) fn with_frame<R>(
        &mut self,
        frame: TypeMapping,
        owner: TypeId,
        f: impl FnOnce(&mut Self) -> CompileResult<R>,
    ) -> CompileResult<R> {
        self.mapper.push(frame, owner)?;
        let result = f(self);
        self.mapper.pop();
        result
    }

    /// Run `f` with the mapper stack cut back to `scope` frames. The detached
    /// frames are restored on every path.
    pub(crate) fn with_scope<R>(
        &mut self,
        scope: usize,
        f: impl FnOnce(&mut Self) -> CompileResult<R>,
    ) -> CompileResult<R> {
        let detached = self.mapper.detach_above(scope);
        let result = f(self);
        self.mapper.reattach(detached);
        result
    }

    /// Resolve a type parameter against the active bindings.
    pub fn get_resolved_type_parameter(&self, param: TypeId) -> CompileResult<Binding> {
        self.mapper.get_resolved_type_parameter(self.db, param)
    }

    /// Guard for the naming recursion.
    pub(crate) fn enter_naming(&mut self, ty: TypeId) -> CompileResult<()> {
        let limit = tsguard_common::limits::MAX_INSTANTIATION_DEPTH * 4;
        if self.naming_depth >= limit {
            return Err(CompileError::InstantiationTooDeep { ty, limit });
        }
        self.naming_depth += 1;
        Ok(())
    }

    pub(crate) fn leave_naming(&mut self) {
        self.naming_depth = self.naming_depth.saturating_sub(1);
    }

    // =========================================================================
    // Registry
    // =========================================================================

    /// Return `name`, building its function with `factory` if the name is
    /// new. The name is reserved while the factory runs, so the factory may
    /// compile types that refer back to `name`. A failing factory releases
    /// the name.
    pub fn set_function_if_not_exists(
        &mut self,
        name: &str,
        factory: impl FnOnce(&mut Self) -> CompileResult<IRNode>,
    ) -> CompileResult<String> {
        if !self.registry.reserve(name) {
            return Ok(name.to_string());
        }
        match factory(self) {
            Ok(function) => {
                self.registry.define(name, function);
                Ok(name.to_string())
            }
            Err(err) => {
                self.registry.release(name);
                Err(err)
            }
        }
    }

    // =========================================================================
    // Emission primitives
    // =========================================================================

    pub fn create_accepting_function(&mut self, name: &str) -> String {
        self.define_function(name, |_| emit::accepting_function(name))
    }

    pub fn create_rejecting_function(&mut self, reason: &str, name: &str) -> String {
        self.define_function(name, |detailed| emit::rejecting_function(name, reason, detailed))
    }

    pub fn create_assertion_function(&mut self, condition: IRNode, reason: &str, name: &str) -> String {
        self.define_function(name, |detailed| {
            emit::assertion_function(name, condition, reason, detailed)
        })
    }

    pub fn create_conjunction_function(&mut self, names: &[String], name: &str) -> String {
        self.define_function(name, |_| emit::conjunction_function(name, names))
    }

    pub fn create_disjunction_function(&mut self, names: &[String], name: &str) -> String {
        self.define_function(name, |detailed| {
            emit::disjunction_function(name, names, detailed)
        })
    }

    pub(crate) fn define_function(&mut self, name: &str, build: impl FnOnce(bool) -> IRNode) -> String {
        if self.registry.reserve(name) {
            let function = build(self.detailed());
            self.registry.define(name, function);
        }
        name.to_string()
    }
}
