//! Common test utilities

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use taskgate::HostProbe;

/// Deterministic host probe for exercising evaluation without touching
/// the real system
pub struct FakeProbe {
    os: String,
    env: HashMap<String, String>,
    existing: Vec<PathBuf>,
    denied: Vec<PathBuf>,
    passing: Vec<String>,
}

impl FakeProbe {
    pub fn new() -> Self {
        FakeProbe {
            os: "linux".to_string(),
            env: HashMap::new(),
            existing: Vec::new(),
            denied: Vec::new(),
            passing: Vec::new(),
        }
    }

    /// Report this OS identifier
    pub fn with_os(mut self, os: &str) -> Self {
        self.os = os.to_string();
        self
    }

    /// Treat this environment variable as set
    pub fn with_env(mut self, name: &str, value: &str) -> Self {
        self.env.insert(name.to_string(), value.to_string());
        self
    }

    /// Treat this path as existing
    pub fn with_path(mut self, path: &str) -> Self {
        self.existing.push(PathBuf::from(path));
        self
    }

    /// Fail stat probes for this path with a permission error
    pub fn with_denied_path(mut self, path: &str) -> Self {
        self.denied.push(PathBuf::from(path));
        self
    }

    /// Treat this command as exiting 0
    pub fn with_command(mut self, command: &str) -> Self {
        self.passing.push(command.to_string());
        self
    }
}

impl HostProbe for FakeProbe {
    fn run_command(&self, command: &str) -> io::Result<bool> {
        Ok(self.passing.iter().any(|passing| passing == command))
    }

    fn path_exists(&self, path: &Path) -> io::Result<bool> {
        if self.denied.iter().any(|denied| denied == path) {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"));
        }
        Ok(self.existing.iter().any(|existing| existing == path))
    }

    fn current_os(&self) -> &str {
        &self.os
    }

    fn env_var(&self, name: &str) -> Option<String> {
        self.env.get(name).cloned()
    }
}
