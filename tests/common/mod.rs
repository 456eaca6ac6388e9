//! Common test utilities for gripe integration tests.
//!
//! Provides `TestEnv` for isolated test environments that don't pollute
//! the user's `~/.local/share/gripe/` directory.

#![allow(dead_code)]

use assert_cmd::Command;
pub use tempfile::TempDir;

/// A test environment with isolated data storage.
///
/// The `gripe()` method returns a `Command` that sets `GRIPE_DATA_DIR`
/// per-invocation, making tests parallel-safe.
pub struct TestEnv {
    pub data_dir: TempDir,
}

impl TestEnv {
    /// Create a new test environment with an isolated data directory.
    pub fn new() -> Self {
        Self {
            data_dir: TempDir::new().unwrap(),
        }
    }

    /// Create a new test environment and initialize the store.
    pub fn init() -> Self {
        let env = Self::new();
        env.gripe().args(["system", "init"]).assert().success();
        env
    }

    /// Get a Command for the gripe binary with isolated data directory.
    ///
    /// Sets `GRIPE_DATA_DIR` per-command for parallel safety.
    pub fn gripe(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_gripe"));
        cmd.env("GRIPE_DATA_DIR", self.data_dir.path());
        cmd
    }

    /// Get the path to the data directory.
    pub fn data_path(&self) -> &std::path::Path {
        self.data_dir.path()
    }

    /// Register a profile and return its ID.
    pub fn register(&self, full_name: &str, email: &str, role: &str) -> String {
        let output = self
            .gripe()
            .args(["profile", "register", full_name, "-e", email, "-r", role])
            .output()
            .unwrap();
        assert!(output.status.success(), "profile register failed");
        let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        json["id"].as_str().unwrap().to_string()
    }

    /// Submit a complaint as the given profile and return its ID.
    pub fn submit(&self, actor: &str, title: &str, category: &str, description: &str) -> String {
        let output = self
            .gripe()
            .args([
                "submit",
                title,
                "-c",
                category,
                "-d",
                description,
                "--as",
                actor,
            ])
            .output()
            .unwrap();
        assert!(output.status.success(), "submit failed");
        let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        json["id"].as_str().unwrap().to_string()
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}
