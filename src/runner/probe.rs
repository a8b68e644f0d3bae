//! Host probes consulted during clause evaluation
//!
//! Evaluators never touch the operating system directly; they go through a
//! probe so tests can substitute deterministic fakes.

use std::fs;
use std::io;
use std::path::Path;
use std::process::{Command as StdCommand, Stdio};

/// Ambient host state consulted during clause evaluation
///
/// Implementations must be safe to share across threads: a clause set is
/// read-only after decoding, and independent evaluations may run
/// concurrently against one probe.
pub trait HostProbe: Send + Sync {
    /// Run a command through the host shell, discarding its output
    ///
    /// Returns `Ok(true)` when the command exits 0. This executes arbitrary
    /// shell commands taken from task configuration; only evaluate clause
    /// sets from trusted configuration files.
    fn run_command(&self, command: &str) -> io::Result<bool>;

    /// Probe a path for existence
    ///
    /// Returns `Ok(false)` only for "not found"; any other probe failure
    /// (permissions, I/O) is an error for the caller to surface.
    fn path_exists(&self, path: &Path) -> io::Result<bool>;

    /// Identifier for the current kernel family (e.g. "linux", "darwin")
    fn current_os(&self) -> &str;

    /// Look up a variable in the ambient process environment
    fn env_var(&self, name: &str) -> Option<String>;
}

/// Production probe backed by the operating system
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemProbe;

impl HostProbe for SystemProbe {
    fn run_command(&self, command: &str) -> io::Result<bool> {
        // TODO: add a bounded timeout so a hung probe command cannot stall
        // the calling task.
        let status = StdCommand::new("sh")
            .arg("-c")
            .arg(command)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()?;

        Ok(status.success())
    }

    fn path_exists(&self, path: &Path) -> io::Result<bool> {
        match fs::metadata(path) {
            Ok(_) => Ok(true),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(err),
        }
    }

    fn current_os(&self) -> &str {
        std::env::consts::OS
    }

    fn env_var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}
