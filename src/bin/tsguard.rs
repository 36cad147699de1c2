#![allow(clippy::print_stderr)]

use anyhow::{Context, Result};
use clap::Parser;
use std::io::{IsTerminal, Write};

use tsguard::cli::args::{CliArgs, Command};
use tsguard::cli::driver;
use tsguard::cli::reporter::Reporter;

const EXIT_SUCCESS: i32 = 0;
const EXIT_INVALID: i32 = 1;
const EXIT_ERROR: i32 = 2;

fn main() {
    // Zero cost unless TSGUARD_LOG or RUST_LOG is set.
    tsguard::tracing_config::init_tracing();

    let args = CliArgs::parse();
    let reporter = Reporter::new(std::io::stderr().is_terminal());

    let code = match run(&args, &reporter) {
        Ok(code) => code,
        Err(error) => {
            eprintln!("{}", reporter.format_error(&error));
            EXIT_ERROR
        }
    };
    std::process::exit(code);
}

fn run(args: &CliArgs, reporter: &Reporter) -> Result<i32> {
    match &args.command {
        Command::Emit(emit) => {
            let outcome = driver::run_emit(emit)?;
            if outcome.written.is_some() {
                eprintln!("{}", reporter.format_emit_summary(&outcome));
            } else {
                std::io::stdout()
                    .write_all(outcome.output.as_bytes())
                    .context("failed to write module to stdout")?;
            }
            Ok(EXIT_SUCCESS)
        }
        Command::Check(check) => {
            let outcome = driver::run_check(check)?;
            let stdout = Reporter::new(std::io::stdout().is_terminal());
            println!("{}", stdout.format_check(&outcome));
            Ok(if outcome.is_valid() {
                EXIT_SUCCESS
            } else {
                EXIT_INVALID
            })
        }
    }
}
