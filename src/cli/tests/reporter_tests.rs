use super::driver::{CheckOutcome, EmitOutcome};
use super::reporter::Reporter;
use anyhow::{Context, anyhow};
use std::path::PathBuf;

fn outcome(failure: Option<&str>) -> CheckOutcome {
    CheckOutcome {
        type_name: "User".to_string(),
        validator: "_3".to_string(),
        failure: failure.map(str::to_string),
    }
}

#[test]
fn formats_valid_without_color() {
    let reporter = Reporter::new(false);
    assert_eq!(reporter.format_check(&outcome(None)), "valid");
}

#[test]
fn formats_failure_message() {
    let reporter = Reporter::new(false);
    assert_eq!(
        reporter.format_check(&outcome(Some("validation failed at $.name: expected a string"))),
        "invalid: validation failed at $.name: expected a string"
    );
}

#[test]
fn formats_emit_summary() {
    let reporter = Reporter::new(false);
    let summary = reporter.format_emit_summary(&EmitOutcome {
        output: String::new(),
        functions: 4,
        call_sites: 2,
        written: Some(PathBuf::from("out.js")),
    });
    assert_eq!(summary, "wrote out.js (4 functions, 2 call sites)");
}

#[test]
fn formats_error_chain() {
    let reporter = Reporter::new(false);
    let error = Err::<(), _>(anyhow!("unknown type 9"))
        .context("failed to load snapshot a.json")
        .unwrap_err();
    assert_eq!(
        reporter.format_error(&error),
        "error: failed to load snapshot a.json\n  caused by: unknown type 9"
    );
}
