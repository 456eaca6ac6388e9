//! Action logging for Gripe commands.
//!
//! This module provides logging of all gripe commands and operations to a
//! structured log file in JSONL format, read back by `gripe log`.

use crate::storage::Storage;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

/// Represents a single action log entry.
#[derive(Debug, Serialize, Deserialize)]
pub struct ActionLog {
    /// ISO 8601 timestamp when the action occurred
    pub timestamp: DateTime<Utc>,

    /// Command name (e.g., "submit", "respond", "status")
    pub command: String,

    /// Command arguments as JSON
    pub args: serde_json::Value,

    /// Whether the command succeeded
    pub success: bool,

    /// Error message if the command failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Command execution duration in milliseconds
    pub duration_ms: u64,

    /// User who executed the command
    pub user: String,
}

/// Log an action to the configured log file.
///
/// This function never fails - it will silently fall back on errors to avoid
/// breaking commands due to logging issues.
pub fn log_action(
    data_dir: &Path,
    command: &str,
    args: serde_json::Value,
    success: bool,
    error: Option<String>,
    duration_ms: u64,
) -> Result<(), Box<dyn std::error::Error>> {
    // Check if logging is enabled
    let enabled = match get_config_bool(data_dir, "action_log_enabled") {
        Ok(Some(val)) => val,
        Ok(None) => true, // Default: enabled
        Err(_) => true,   // On error, assume enabled
    };

    if !enabled {
        return Ok(());
    }

    let log_path = get_log_path(data_dir);

    // Sanitize arguments if enabled
    let sanitize = match get_config_bool(data_dir, "action_log_sanitize") {
        Ok(Some(val)) => val,
        Ok(None) => true, // Default: enabled
        Err(_) => true,   // On error, assume enabled
    };

    let sanitized_args = if sanitize { sanitize_args(&args) } else { args };

    let entry = ActionLog {
        timestamp: Utc::now(),
        command: command.to_string(),
        args: sanitized_args,
        success,
        error,
        duration_ms,
        user: get_current_user(),
    };

    if let Err(e) = write_log_entry(&log_path, &entry) {
        eprintln!("Warning: Failed to write action log: {}", e);
    }

    Ok(())
}

/// Read all entries from the action log, oldest first.
///
/// Lines that fail to parse are skipped.
pub fn read_entries(data_dir: &Path) -> crate::Result<Vec<ActionLog>> {
    let log_path = get_log_path(data_dir);
    if !log_path.exists() {
        return Ok(Vec::new());
    }

    let file = File::open(&log_path)?;
    let reader = BufReader::new(file);

    let mut entries = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        if let Ok(entry) = serde_json::from_str::<ActionLog>(&line) {
            entries.push(entry);
        }
    }
    Ok(entries)
}

/// Get the log file path, honoring the `action_log_path` config override.
fn get_log_path(data_dir: &Path) -> PathBuf {
    let custom_path = match Storage::open_at(data_dir) {
        Ok(storage) => storage.get_config("action_log_path").ok().flatten(),
        Err(_) => None,
    };

    match custom_path {
        Some(path_str) => expand_home(Path::new(&path_str)),
        None => data_dir.join("action.log"),
    }
}

/// Expand ~ in path to home directory.
fn expand_home(path: &Path) -> PathBuf {
    if let Ok(stripped) = path.strip_prefix("~") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    path.to_path_buf()
}

/// Write a log entry to the log file.
fn write_log_entry(path: &Path, entry: &ActionLog) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string(entry)?;

    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{}", json)?;

    Ok(())
}

/// Sanitize arguments to remove sensitive data.
fn sanitize_args(args: &serde_json::Value) -> serde_json::Value {
    match args {
        serde_json::Value::Object(map) => {
            let mut sanitized = serde_json::Map::new();
            for (key, value) in map {
                // Check if key contains sensitive keywords
                let key_lower = key.to_lowercase();
                if key_lower.contains("password")
                    || key_lower.contains("token")
                    || key_lower.contains("secret")
                {
                    sanitized.insert(
                        key.clone(),
                        serde_json::Value::String("[REDACTED]".to_string()),
                    );
                } else {
                    sanitized.insert(key.clone(), sanitize_args(value));
                }
            }
            serde_json::Value::Object(sanitized)
        }
        serde_json::Value::Array(arr) => {
            if arr.len() > 10 {
                // Summarize large arrays
                serde_json::Value::String(format!("[Array with {} items]", arr.len()))
            } else {
                serde_json::Value::Array(arr.iter().map(sanitize_args).collect())
            }
        }
        serde_json::Value::String(s) => {
            // Reduce filesystem paths to their basename; leave message text
            // (which may contain slashes) alone
            let sanitized = if looks_like_path(s) {
                s.rsplit(['/', '\\']).next().unwrap_or(s).to_string()
            } else {
                s.clone()
            };

            // Truncate long strings
            if sanitized.len() > 100 {
                serde_json::Value::String(format!(
                    "{}... ({} chars)",
                    &sanitized[..97],
                    sanitized.len()
                ))
            } else {
                serde_json::Value::String(sanitized)
            }
        }
        _ => args.clone(),
    }
}

/// Returns true for strings that are plainly filesystem paths.
fn looks_like_path(s: &str) -> bool {
    s.starts_with('/') || s.starts_with("~/") || s.contains(":\\")
}

/// Get a boolean configuration value.
fn get_config_bool(
    data_dir: &Path,
    key: &str,
) -> Result<Option<bool>, Box<dyn std::error::Error>> {
    let storage = Storage::open_at(data_dir)?;
    if let Some(value_str) = storage.get_config(key)? {
        let parsed = value_str.to_lowercase();
        let bool_val = parsed == "true" || parsed == "1" || parsed == "yes";
        Ok(Some(bool_val))
    } else {
        Ok(None)
    }
}

/// Get the current user's username.
fn get_current_user() -> String {
    std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "unknown".to_string())
}
