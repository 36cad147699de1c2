//! Loading [`ValidatorOptions`] from disk.
//!
//! Three layouts are accepted:
//!
//! - a bare options object: `{ "ignoreMethods": true }`
//! - a plugin list: `{ "plugins": [{ "transform": "tsguard", ... }] }`
//! - a tsconfig: `{ "compilerOptions": { "plugins": [...] } }`
//!
//! Comments and trailing commas are allowed, as in tsconfig files.

use anyhow::{Context, Result, bail};
use serde_json::Value;
use std::path::Path;

use tsguard_compiler::ValidatorOptions;

const PLUGIN_NAME: &str = "tsguard";

pub fn load_options(path: &Path) -> Result<ValidatorOptions> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read options file {}", path.display()))?;
    parse_options(&source)
        .with_context(|| format!("failed to parse options file {}", path.display()))
}

pub fn parse_options(source: &str) -> Result<ValidatorOptions> {
    let stripped = strip_jsonc(source);
    let normalized = remove_trailing_commas(&stripped);
    let root: Value = serde_json::from_str(&normalized).context("invalid JSON")?;
    let entry = select_entry(root)?;
    let options = serde_json::from_value(entry).context("invalid validator options")?;
    Ok(options)
}

/// Pick the object holding the options out of one of the accepted layouts.
fn select_entry(root: Value) -> Result<Value> {
    let Value::Object(mut map) = root else {
        bail!("expected a JSON object");
    };

    let plugins = match map.remove("compilerOptions") {
        Some(Value::Object(mut compiler_options)) => compiler_options.remove("plugins"),
        Some(_) => bail!("'compilerOptions' must be an object"),
        None => map.remove("plugins"),
    };

    let Some(plugins) = plugins else {
        return Ok(Value::Object(map));
    };
    let Value::Array(entries) = plugins else {
        bail!("'plugins' must be an array");
    };

    let mut fallback = None;
    for entry in entries {
        let names_us = entry
            .get("transform")
            .and_then(Value::as_str)
            .is_some_and(|transform| transform.contains(PLUGIN_NAME));
        if names_us {
            return Ok(entry);
        }
        if fallback.is_none() {
            fallback = Some(entry);
        }
    }
    fallback.context("'plugins' is empty")
}

fn strip_jsonc(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    let mut in_string = false;
    let mut escape = false;
    let mut in_line_comment = false;
    let mut in_block_comment = false;

    while let Some(ch) = chars.next() {
        if in_line_comment {
            if ch == '\n' {
                in_line_comment = false;
                out.push(ch);
            }
            continue;
        }

        if in_block_comment {
            if ch == '*' && chars.peek() == Some(&'/') {
                chars.next();
                in_block_comment = false;
            }
            continue;
        }

        if in_string {
            out.push(ch);
            if escape {
                escape = false;
            } else if ch == '\\' {
                escape = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }

        match (ch, chars.peek().copied()) {
            ('"', _) => {
                in_string = true;
                out.push(ch);
            }
            ('/', Some('/')) => {
                chars.next();
                in_line_comment = true;
            }
            ('/', Some('*')) => {
                chars.next();
                in_block_comment = true;
            }
            _ => out.push(ch),
        }
    }

    out
}

fn remove_trailing_commas(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    let mut in_string = false;
    let mut escape = false;

    while let Some(ch) = chars.next() {
        if in_string {
            out.push(ch);
            if escape {
                escape = false;
            } else if ch == '\\' {
                escape = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }

        if ch == '"' {
            in_string = true;
        } else if ch == ',' {
            let mut lookahead = chars.clone();
            let next = lookahead.find(|c| !c.is_whitespace());
            if matches!(next, Some('}' | ']')) {
                continue;
            }
        }
        out.push(ch);
    }

    out
}
