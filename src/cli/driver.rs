use anyhow::{Context, Result, anyhow, bail};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info_span};

use crate::cli::args::{CheckArgs, EmitArgs, OptionFlags};
use crate::cli::config::load_options;
use tsguard_compiler::{CallSite, ValidatorCompiler, ValidatorOptions, compile_module};
use tsguard_types::{TypeDatabase, TypeId, TypeTable};

/// Host analyzer output: the type table plus the call sites found in one unit.
#[derive(Debug, Default, Deserialize)]
pub struct Snapshot {
    #[serde(flatten)]
    pub table: TypeTable,
    #[serde(default, rename = "callSites")]
    pub call_sites: Vec<CallSite>,
}

impl Snapshot {
    pub fn parse(source: &str) -> Result<Self> {
        let snapshot: Snapshot = serde_json::from_str(source).context("invalid snapshot JSON")?;
        snapshot.table.validate()?;
        for (index, site) in snapshot.call_sites.iter().enumerate() {
            if site.ty.index() >= snapshot.table.len() {
                bail!("call site {index} refers to unknown type {}", site.ty);
            }
        }
        Ok(snapshot)
    }
}

pub fn load_snapshot(path: &Path) -> Result<Snapshot> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read snapshot {}", path.display()))?;
    Snapshot::parse(&source).with_context(|| format!("failed to load snapshot {}", path.display()))
}

/// Options from the config file (if any) with command-line flags applied on top.
pub fn resolve_options(config: Option<&Path>, flags: &OptionFlags) -> Result<ValidatorOptions> {
    let mut options = match config {
        Some(path) => load_options(path)?,
        None => ValidatorOptions::default(),
    };
    flags.apply(&mut options);
    Ok(options)
}

#[derive(Debug, Clone)]
pub struct EmitOutcome {
    pub output: String,
    pub functions: usize,
    pub call_sites: usize,
    pub written: Option<PathBuf>,
}

pub fn run_emit(args: &EmitArgs) -> Result<EmitOutcome> {
    let span = info_span!("emit", snapshot = %args.snapshot.display());
    let _enter = span.enter();

    let snapshot = load_snapshot(&args.snapshot)?;
    let options = resolve_options(args.config.as_deref(), &args.options)?;
    debug!(?options, call_sites = snapshot.call_sites.len(), "compiling snapshot");

    let module = compile_module(&snapshot.table, options, &snapshot.call_sites)
        .context("validator compilation failed")?;
    let output = module.print();

    if let Some(out) = &args.out {
        std::fs::write(out, &output)
            .with_context(|| format!("failed to write {}", out.display()))?;
    }

    Ok(EmitOutcome {
        output,
        functions: module.functions.len(),
        call_sites: module.call_sites.len(),
        written: args.out.clone(),
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOutcome {
    pub type_name: String,
    pub validator: String,
    /// `None` when the value conforms.
    pub failure: Option<String>,
}

impl CheckOutcome {
    pub fn is_valid(&self) -> bool {
        self.failure.is_none()
    }
}

pub fn run_check(args: &CheckArgs) -> Result<CheckOutcome> {
    let span = info_span!("check", type_name = args.type_name.as_str());
    let _enter = span.enter();

    let snapshot = load_snapshot(&args.snapshot)?;
    let options = resolve_options(args.config.as_deref(), &args.options)?;
    let ty = resolve_declaration(&snapshot.table, &args.type_name)?;

    let source = std::fs::read_to_string(&args.value)
        .with_context(|| format!("failed to read value {}", args.value.display()))?;
    let value: serde_json::Value = serde_json::from_str(&source)
        .with_context(|| format!("failed to parse value {}", args.value.display()))?;

    let mut compiler = ValidatorCompiler::new(&snapshot.table, options);
    let validator = compiler
        .compile_validator(ty)
        .with_context(|| format!("failed to compile a validator for '{}'", args.type_name))?;
    let module = compiler.finish();
    debug!(validator = validator.as_str(), functions = module.functions.len(), "running validator");

    let failure = module
        .validate(&validator, &value)
        .map_err(|e| anyhow!("{e}"))
        .with_context(|| format!("validator '{validator}' failed to run"))?;

    Ok(CheckOutcome {
        type_name: args.type_name.clone(),
        validator,
        failure,
    })
}

fn resolve_declaration(table: &TypeTable, name: &str) -> Result<TypeId> {
    if let Some(ty) = table.declaration(name) {
        return Ok(ty);
    }
    let known: Vec<&str> = table.declarations().map(|(name, _)| name).collect();
    if known.is_empty() {
        bail!("type '{name}' is not declared; the snapshot has no declarations");
    }
    bail!("type '{name}' is not declared; known types: {}", known.join(", "))
}
