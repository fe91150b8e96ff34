use crate::error::{Result, TrainingError};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const TRAINING_DIR: &str = ".training";
pub const CONFIG_FILE: &str = ".training/config.yaml";
pub const DATABASE_FILE: &str = ".training/db.yaml";

/// Maximum length of lookup codes and names.
pub const CODE_MAX_LEN: usize = 32;

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn training_dir(root: &Path) -> PathBuf {
    root.join(TRAINING_DIR)
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

pub fn database_path(root: &Path) -> PathBuf {
    root.join(DATABASE_FILE)
}

// ---------------------------------------------------------------------------
// Code validation
// ---------------------------------------------------------------------------

static CODE_RE: OnceLock<Regex> = OnceLock::new();

fn code_re() -> &'static Regex {
    CODE_RE.get_or_init(|| Regex::new(r"^[a-z0-9][a-z0-9_\-]*$").unwrap())
}

pub fn validate_code(code: &str) -> Result<()> {
    if code.is_empty() || code.len() > CODE_MAX_LEN || !code_re().is_match(code) {
        return Err(TrainingError::InvalidCode(code.to_string()));
    }
    Ok(())
}

pub fn validate_name(name: &str) -> Result<()> {
    let len = name.trim().chars().count();
    if len == 0 || name.chars().count() > CODE_MAX_LEN {
        return Err(TrainingError::InvalidName(name.to_string()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
