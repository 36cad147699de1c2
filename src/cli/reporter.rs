use colored::Colorize;

use crate::cli::driver::{CheckOutcome, EmitOutcome};

pub struct Reporter {
    color: bool,
}

impl Reporter {
    pub fn new(color: bool) -> Self {
        Reporter { color }
    }

    pub fn format_check(&self, outcome: &CheckOutcome) -> String {
        match &outcome.failure {
            None => self.paint("valid", |s| s.green().bold().to_string()),
            Some(message) => {
                let label = self.paint("invalid", |s| s.red().bold().to_string());
                format!("{label}: {message}")
            }
        }
    }

    /// One-line summary for stderr after the module was written to a file.
    pub fn format_emit_summary(&self, outcome: &EmitOutcome) -> String {
        let target = outcome
            .written
            .as_ref()
            .map(|path| path.display().to_string())
            .unwrap_or_else(|| "stdout".to_string());
        let counts = format!(
            "({} functions, {} call sites)",
            outcome.functions, outcome.call_sites
        );
        format!(
            "wrote {} {}",
            self.paint(&target, |s| s.bold().to_string()),
            self.paint(&counts, |s| s.dimmed().to_string())
        )
    }

    /// The error and each of its causes, one per line.
    pub fn format_error(&self, error: &anyhow::Error) -> String {
        let mut out = format!("{}: {error}", self.paint("error", |s| s.red().bold().to_string()));
        for cause in error.chain().skip(1) {
            out.push_str("\n  ");
            out.push_str(&self.paint("caused by", |s| s.dimmed().to_string()));
            out.push_str(&format!(": {cause}"));
        }
        out
    }

    fn paint(&self, text: &str, style: impl Fn(&str) -> String) -> String {
        if self.color {
            style(text)
        } else {
            text.to_string()
        }
    }
}
