//! Clause file parsing

use crate::config::types::When;
use crate::error::Result;
use std::fs;
use std::path::Path;

/// Parse a when clause from a YAML string
pub fn parse_clause(yaml: &str) -> Result<When> {
    let when: When = serde_yaml::from_str(yaml)?;
    Ok(when)
}

/// Parse a when clause from a file
pub fn parse_clause_file(path: &Path) -> Result<When> {
    let contents = fs::read_to_string(path)?;
    parse_clause(&contents)
}
