//! Main CLI application
//!
//! A thin harness around the library: load a clause file, evaluate it
//! against the host, and report through the exit code.

use crate::config::parse_clause_file;
use crate::runner::SystemProbe;
use anyhow::Context;
use clap::{Arg, ArgAction, ArgMatches, Command};
use colored::Colorize;
use std::collections::HashMap;
use std::path::PathBuf;

/// Build the clap command
fn build_command() -> Command {
    Command::new("taskgate")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Check whether a task's when conditions hold")
        .arg(
            Arg::new("file")
                .value_name("FILE")
                .required(true)
                .help("YAML file containing a when clause"),
        )
        .arg(
            Arg::new("var")
                .long("var")
                .value_name("KEY=VALUE")
                .action(ArgAction::Append)
                .help("Resolved option value for equal/not-equal clauses"),
        )
        .arg(
            Arg::new("env-file")
                .long("env-file")
                .value_name("FILE")
                .help("Load environment variables from this file before evaluating"),
        )
        .arg(
            Arg::new("deps")
                .long("deps")
                .action(ArgAction::SetTrue)
                .help("Print the option names the clause depends on instead of evaluating"),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .action(ArgAction::SetTrue)
                .help("Only report through the exit code"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::SetTrue)
                .help("Print the parsed clause before evaluating"),
        )
}

/// Run the CLI application
///
/// Returns `Ok(true)` when the clause is satisfied and `Ok(false)` when a
/// condition failed (the task would be skipped). Hard errors propagate.
pub fn run() -> anyhow::Result<bool> {
    let matches = build_command().get_matches();
    run_with_matches(&matches)
}

fn run_with_matches(matches: &ArgMatches) -> anyhow::Result<bool> {
    let file = matches
        .get_one::<String>("file")
        .map(PathBuf::from)
        .context("FILE argument is required")?;
    let quiet = matches.get_flag("quiet");

    let when = parse_clause_file(&file)
        .with_context(|| format!("failed to load {}", file.display()))?;

    if matches.get_flag("deps") {
        let mut deps: Vec<String> = when.dependencies().into_iter().collect();
        deps.sort();
        for dep in deps {
            println!("{}", dep);
        }
        return Ok(true);
    }

    if let Some(path) = matches.get_one::<String>("env-file") {
        dotenvy::from_path(path)
            .with_context(|| format!("failed to load env file {}", path))?;
    } else {
        dotenvy::dotenv().ok();
    }

    if matches.get_flag("verbose") {
        eprintln!("[DEBUG] {}", when);
    }

    let vars = parse_vars(matches)?;
    let probe = SystemProbe;

    match when.validate(&probe, &vars) {
        Ok(()) => {
            if !quiet {
                println!("{}", "conditions satisfied".green());
            }
            Ok(true)
        }
        Err(err) if err.is_failed_condition() => {
            if !quiet {
                println!("{}", format!("task skipped: {}", err).yellow());
            }
            Ok(false)
        }
        Err(err) => Err(err.into()),
    }
}

/// Parse repeated `--var KEY=VALUE` bindings into a resolved-options map
fn parse_vars(matches: &ArgMatches) -> anyhow::Result<HashMap<String, String>> {
    let mut vars = HashMap::new();

    if let Some(values) = matches.get_many::<String>("var") {
        for pair in values {
            let (key, value) = pair
                .split_once('=')
                .with_context(|| format!("invalid --var '{}': expected KEY=VALUE", pair))?;
            vars.insert(key.to_string(), value.to_string());
        }
    }

    Ok(vars)
}
