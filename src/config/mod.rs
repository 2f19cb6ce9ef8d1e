mod originator;

pub use originator::{Config, FileSettings, Originator};

use crate::batch::PaymentBatch;
use crate::error::{AbaError, Result};
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};

/// Get the config directory path (~/.abafile/)
pub fn config_dir() -> Result<PathBuf> {
    // First try XDG-style directories
    if let Some(proj_dirs) = ProjectDirs::from("", "", "abafile") {
        return Ok(proj_dirs.config_dir().to_path_buf());
    }

    // Fallback to ~/.abafile/
    let home = dirs_home().ok_or_else(|| {
        AbaError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Could not determine home directory",
        ))
    })?;

    Ok(home.join(".abafile"))
}

fn dirs_home() -> Option<PathBuf> {
    std::env::var_os("HOME").map(PathBuf::from)
}

/// Expand ~ in paths
pub fn expand_path(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs_home() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

/// Output directory from config; relative paths resolve against the config dir
pub fn resolve_output_dir(output_dir: &str, config_dir: &Path) -> PathBuf {
    let path = expand_path(output_dir);
    if path.is_relative() {
        config_dir.join(path)
    } else {
        path
    }
}

/// Load the main config.toml
pub fn load_config(config_dir: &Path) -> Result<Config> {
    let path = config_dir.join("config.toml");
    if !path.exists() {
        return Err(AbaError::ConfigFileNotFound(path));
    }
    let content = fs::read_to_string(&path)?;
    toml::from_str(&content).map_err(|e| AbaError::ConfigParse { path, source: e })
}

/// Load a batch snapshot from a .toml or .json file
pub fn load_batch(path: &Path) -> Result<PaymentBatch> {
    if !path.exists() {
        return Err(AbaError::BatchFileNotFound(path.to_path_buf()));
    }
    let content = fs::read_to_string(path)?;

    let parse_err = |reason: String| AbaError::BatchParse {
        path: path.to_path_buf(),
        reason,
    };

    match path.extension().and_then(|e| e.to_str()) {
        Some("toml") => toml::from_str(&content).map_err(|e| parse_err(e.to_string())),
        Some("json") => serde_json::from_str(&content).map_err(|e| parse_err(e.to_string())),
        _ => Err(AbaError::UnsupportedBatchFormat(path.to_path_buf())),
    }
}

/// Template content for config.toml
pub const CONFIG_TEMPLATE: &str = r#"[originator]
name = "Your Plan Management Pty Ltd"
routing_code = "062-000"       # your BSB, DDD-DDD
account_number = "12345678"
description = "NDIS PAYMENT"   # header description, max 12 characters
# institution = "CBA"          # optional, 3-letter bank mnemonic
# user_id = 301500             # optional, APCA user id (6 digits)

[file]
output_dir = "output"          # relative to this config directory
line_ending = "crlf"           # "crlf" or "lf"
uppercase = false
ascii_only = true              # replace non-ASCII characters with spaces
"#;

/// Example batch snapshot written by init
pub const BATCH_TEMPLATE: &str = r#"# A payment batch snapshot. Items are written in the order listed.
id = "example"
number = "PB-0001"
processing_date = "2026-01-15"

[[items]]
id = "item-1"
payee_id = "prov-1"
payee_name = "Allied Health Partners"
amount = 250000                # cents
reference = "INV-1001"
bank = { routing_code = "082-001", account_number = "123456789", account_name = "Allied Health Partners" }

[[items]]
id = "item-2"
payee_id = "prov-2"
payee_name = "Community Support Co"
amount = 175050
reference = "INV-1002 INV-1003"
bank = { routing_code = "033-000", account_number = "98765432", account_name = "Community Support Co" }
"#;
