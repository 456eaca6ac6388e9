//! Gripe - a complaint tracking library for students and staff.
//!
//! This library provides the core functionality for the `gripe` CLI tool,
//! including complaint submission, staff responses, and status tracking.

pub mod action_log;
pub mod cli;
pub mod commands;
pub mod models;
pub mod storage;


/// Library-level error type for Gripe operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Not initialized: run `gripe system init` first")]
    NotInitialized,

    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Invalid ID format: {0}")]
    InvalidId(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not permitted: {0}")]
    NotPermitted(String),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for Gripe operations.
pub type Result<T> = std::result::Result<T, Error>;
