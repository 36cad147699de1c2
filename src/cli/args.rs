use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use tsguard_compiler::{FunctionBehavior, ValidatorOptions};

/// CLI arguments for the tsguard binary.
#[derive(Parser, Debug)]
#[command(
    name = "tsguard",
    version,
    about = "Compile TypeScript types into runtime validator functions"
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compile every call site of a snapshot and print the JavaScript module.
    Emit(EmitArgs),
    /// Compile the validator for one declared type and run it against a JSON value.
    Check(CheckArgs),
}

#[derive(Args, Debug)]
pub struct EmitArgs {
    /// Type snapshot produced by the host analyzer.
    pub snapshot: PathBuf,

    /// Options file: a bare options object, or a tsconfig-style plugin list.
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Write the module here instead of stdout.
    #[arg(short = 'o', long)]
    pub out: Option<PathBuf>,

    #[command(flatten)]
    pub options: OptionFlags,
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Type snapshot produced by the host analyzer.
    pub snapshot: PathBuf,

    /// Name of the declared type to validate against.
    #[arg(long = "type")]
    pub type_name: String,

    /// JSON file holding the value to validate.
    #[arg(long)]
    pub value: PathBuf,

    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub options: OptionFlags,
}

/// Command-line overrides for [`ValidatorOptions`]. A flag only ever turns a
/// behavior on; options left unset keep the value from the config file.
#[derive(Args, Debug, Default, Clone)]
pub struct OptionFlags {
    /// Replace every validator with one that accepts any value.
    #[arg(long = "shortCircuit", alias = "short-circuit")]
    pub short_circuit: bool,

    /// Accept any value for class types.
    #[arg(long = "ignoreClasses", alias = "ignore-classes")]
    pub ignore_classes: bool,

    /// Skip method members of object types.
    #[arg(long = "ignoreMethods", alias = "ignore-methods")]
    pub ignore_methods: bool,

    /// How function types are validated.
    #[arg(
        long = "functionBehavior",
        alias = "function-behavior",
        value_enum,
        ignore_case = true
    )]
    pub function_behavior: Option<FunctionBehaviorArg>,

    /// Reject object keys that the type does not declare.
    #[arg(
        long = "disallowSuperfluousObjectProperties",
        alias = "disallow-superfluous-object-properties"
    )]
    pub disallow_superfluous_object_properties: bool,

    /// Emit a fixed failure message without path or reason.
    #[arg(long = "noDetailedErrors", alias = "no-detailed-errors")]
    pub no_detailed_errors: bool,
}

impl OptionFlags {
    pub fn apply(&self, options: &mut ValidatorOptions) {
        if self.short_circuit {
            options.short_circuit = true;
        }
        if self.ignore_classes {
            options.ignore_classes = true;
        }
        if self.ignore_methods {
            options.ignore_methods = true;
        }
        if let Some(behavior) = self.function_behavior {
            options.function_behavior = behavior.into();
        }
        if self.disallow_superfluous_object_properties {
            options.disallow_superfluous_object_properties = true;
        }
        if self.no_detailed_errors {
            options.emit_detailed_errors = false;
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum FunctionBehaviorArg {
    Error,
    Ignore,
    Basic,
}

impl From<FunctionBehaviorArg> for FunctionBehavior {
    fn from(value: FunctionBehaviorArg) -> Self {
        match value {
            FunctionBehaviorArg::Error => FunctionBehavior::Error,
            FunctionBehaviorArg::Ignore => FunctionBehavior::Ignore,
            FunctionBehaviorArg::Basic => FunctionBehavior::Basic,
        }
    }
}
