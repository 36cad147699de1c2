//! Function registry: the deduplication cache of a compilation pass.
//!
//! Every generated validator is stored under its canonical name. A name is
//! reserved *before* its body is built, so a type that refers back to itself
//! finds its own name already present and emits a call instead of recursing
//! forever. Declaration order is reservation order, which puts a validator
//! before the validators it calls.

use indexmap::IndexMap;
use tracing::trace;
use tsguard_emitter::IRNode;

#[derive(Debug, Default)]
pub struct FunctionRegistry {
    functions: IndexMap<String, Option<IRNode>>,
}

impl FunctionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    /// Claim `name`. Returns `false` if it was already claimed.
    pub fn reserve(&mut self, name: &str) -> bool {
        if self.functions.contains_key(name) {
            return false;
        }
        trace!(name, "reserve validator name");
        self.functions.insert(name.to_string(), None);
        true
    }

    /// Attach the body of a reserved name.
    pub fn define(&mut self, name: &str, function: IRNode) {
        self.functions.insert(name.to_string(), Some(function));
    }

    /// Drop a reservation whose body could not be built.
    pub fn release(&mut self, name: &str) {
        if matches!(self.functions.get(name), Some(None)) {
            self.functions.shift_remove(name);
        }
    }

    pub fn get(&self, name: &str) -> Option<&IRNode> {
        self.functions.get(name).and_then(Option::as_ref)
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.functions.keys().map(String::as_str)
    }

    /// Consume the registry, yielding the defined functions in order.
    pub fn into_functions(self) -> Vec<IRNode> {
        self.functions.into_values().flatten().collect()
    }
}

#[cfg(test)]
#[path = "../tests/registry_tests.rs"]
mod tests;
