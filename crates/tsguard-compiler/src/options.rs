//! Compiler options.
//!
//! Deserialized from the same camelCase keys a transformer plugin entry in a
//! tsconfig uses. Every key is optional.

use serde::{Deserialize, Serialize};

/// What to do when a function type has to be validated.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FunctionBehavior {
    /// Fail compilation with `FunctionNotAllowed`.
    #[default]
    Error,
    /// Accept any value.
    Ignore,
    /// Only check `typeof value === "function"`.
    Basic,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ValidatorOptions {
    /// Replace every top-level validator with one that accepts everything.
    pub short_circuit: bool,
    /// Accept any value for object types declared as classes.
    pub ignore_classes: bool,
    /// Skip method members of object types.
    pub ignore_methods: bool,
    pub function_behavior: FunctionBehavior,
    /// Reject keys that are not declared on the object type.
    pub disallow_superfluous_object_properties: bool,
    /// Include the path and reason in failure messages. When off every
    /// failure reads `validation failed`.
    pub emit_detailed_errors: bool,
}

impl Default for ValidatorOptions {
    fn default() -> Self {
        Self {
            short_circuit: false,
            ignore_classes: false,
            ignore_methods: false,
            function_behavior: FunctionBehavior::default(),
            disallow_superfluous_object_properties: false,
            emit_detailed_errors: true,
        }
    }
}
