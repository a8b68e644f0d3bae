//! When clause evaluation
//!
//! This module decides whether a clause set lets a task run. Each category is
//! checked independently; the categories form a disjunction, so one holding
//! category is enough.

use crate::config::types::{bracket_list, When};
use crate::error::{EvalError, EvalResult};
use crate::runner::probe::HostProbe;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

impl When {
    /// Evaluate the clause set against the host and resolved option values
    ///
    /// All six categories are checked in the fixed order {os, equal,
    /// not-equal, environment, exists, command}, even once one has already
    /// held, because the exists and command categories carry real side
    /// effects that callers rely on. The clause set is satisfied when any
    /// category holds, or when every category is unspecified. Otherwise the
    /// first non-unspecified failure in that order is returned.
    ///
    /// A probe failure other than "not found" halts evaluation immediately
    /// and surfaces as [`EvalError::Probe`]; it is never folded into a
    /// failed condition.
    pub fn validate(
        &self,
        probe: &dyn HostProbe,
        vars: &HashMap<String, String>,
    ) -> EvalResult<()> {
        let mut outcomes = Vec::with_capacity(6);

        outcomes.push(self.check_os(probe));
        outcomes.push(self.check_equal(vars));
        outcomes.push(self.check_not_equal(vars));
        outcomes.push(self.check_env(probe));

        // Exists is the one category that can fail hard; that aborts the
        // sequence before the command category spawns anything.
        let exists = self.check_exists(probe);
        if matches!(exists, Err(EvalError::Probe(_))) {
            return exists;
        }
        outcomes.push(exists);

        outcomes.push(self.check_command(probe));

        validate_any(outcomes)
    }

    /// Any command exiting 0 satisfies this category
    fn check_command(&self, probe: &dyn HostProbe) -> EvalResult<()> {
        if self.command.is_empty() {
            return Err(EvalError::Unspecified("command"));
        }

        for command in &self.command {
            // A spawn failure counts the same as a non-zero exit
            if probe.run_command(command).unwrap_or(false) {
                return Ok(());
            }
        }

        Err(EvalError::cond_fail(format!(
            "no commands exited successfully: {}",
            bracket_list(&self.command)
        )))
    }

    /// Any existing path satisfies this category
    fn check_exists(&self, probe: &dyn HostProbe) -> EvalResult<()> {
        if self.exists.is_empty() {
            return Err(EvalError::Unspecified("exists"));
        }

        for path in &self.exists {
            if probe.path_exists(Path::new(path))? {
                return Ok(());
            }
        }

        Err(EvalError::cond_fail(format!(
            "no required file existed: {}",
            bracket_list(&self.exists)
        )))
    }

    /// Any identifier naming the host OS satisfies this category
    fn check_os(&self, probe: &dyn HostProbe) -> EvalResult<()> {
        if self.os.is_empty() {
            return Err(EvalError::Unspecified("os"));
        }

        match_one_of(
            "current OS",
            probe.current_os(),
            &self.os,
            |expected, actual| normalize_os(expected) == actual,
        )
    }

    /// Any variable matching one of its entries satisfies this category
    ///
    /// An absence-marker entry accepts the variable being unset. A variable
    /// that is unset without an absence marker, or set to an unexpected
    /// value, does not fail the category by itself; the next variable is
    /// tried.
    fn check_env(&self, probe: &dyn HostProbe) -> EvalResult<()> {
        if self.environment.is_empty() {
            return Err(EvalError::Unspecified("env"));
        }

        for (name, entries) in &self.environment {
            let expected: Vec<&str> = entries.iter().flatten().map(String::as_str).collect();
            let null_allowed = expected.len() != entries.len();

            match probe.env_var(name) {
                None if null_allowed => return Ok(()),
                None => {}
                Some(actual) => {
                    if expected.iter().any(|value| *value == actual) {
                        return Ok(());
                    }
                }
            }
        }

        Err(EvalError::cond_fail("no environment variables matched"))
    }

    /// Any option equal to one of its expected values satisfies this category
    fn check_equal(&self, vars: &HashMap<String, String>) -> EvalResult<()> {
        if self.equal.is_empty() {
            return Err(EvalError::Unspecified("equal"));
        }

        check_options(&self.equal, vars, |expected, actual| expected == actual)
    }

    /// Any option differing from one of its expected values satisfies this category
    fn check_not_equal(&self, vars: &HashMap<String, String>) -> EvalResult<()> {
        if self.not_equal.is_empty() {
            return Err(EvalError::Unspecified("not-equal"));
        }

        check_options(&self.not_equal, vars, |expected, actual| expected != actual)
    }
}

/// Combine per-category outcomes into one decision
///
/// Success if any outcome succeeded; otherwise the first non-unspecified
/// failure; success again if every category was unspecified.
fn validate_any(outcomes: Vec<EvalResult<()>>) -> EvalResult<()> {
    let mut failure = None;

    for outcome in outcomes {
        match outcome {
            Ok(()) => return Ok(()),
            Err(err) => {
                if failure.is_none() && !err.is_unspecified() {
                    failure = Some(err);
                }
            }
        }
    }

    match failure {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

/// Test a value against a list of candidates, any of which may match
fn match_one_of(
    desc: &str,
    value: &str,
    required: &[String],
    matches: impl Fn(&str, &str) -> bool,
) -> EvalResult<()> {
    for expected in required {
        if matches(expected, value) {
            return Ok(());
        }
    }

    Err(EvalError::cond_fail(format!(
        "{} ({}) not listed in {}",
        desc,
        value,
        bracket_list(required)
    )))
}

/// Test resolved options against an equal / not-equal clause map
///
/// Options missing from the supplied values are skipped, not failed: an
/// unresolved option cannot be compared.
fn check_options(
    cases: &BTreeMap<String, Vec<String>>,
    vars: &HashMap<String, String>,
    matches: impl Fn(&str, &str) -> bool,
) -> EvalResult<()> {
    for (name, values) in cases {
        let actual = match vars.get(name) {
            Some(value) => value,
            None => continue,
        };

        let desc = format!("option \"{}\"", name);
        if match_one_of(&desc, actual, values, &matches).is_ok() {
            return Ok(());
        }
    }

    Err(EvalError::cond_fail("no options matched"))
}

/// Normalize an OS identifier to the kernel-family name the host reports
fn normalize_os(identifier: &str) -> String {
    let lower = identifier.to_lowercase();

    match lower.as_str() {
        "mac" | "macos" | "osx" => "darwin".to_string(),
        "win" => "windows".to_string(),
        _ => lower,
    }
}
