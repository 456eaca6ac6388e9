//! Storage layer for Gripe data.
//!
//! This module handles persistence of complaints, responses, and profiles.
//!
//! ## Layout
//!
//! All data lives in a single data directory (default
//! `~/.local/share/gripe/`, overridable via `GRIPE_DATA_DIR` or
//! `--data-dir`):
//!
//! - JSONL journals for append-only data (complaints.jsonl, responses.jsonl,
//!   profiles.jsonl) - the source of truth, latest line per id wins
//! - SQLite for indexed queries (cache.db)
//!
//! Updates append a new version of the row to the journal; concurrent
//! writers resolve last-writer-wins by construction. Responses are
//! insert-only and never rewritten.

use crate::models::{
    Complaint, ComplaintCategory, ComplaintDetail, ComplaintResponse, ComplaintStatus, Profile,
    Role,
};
use crate::{Error, Result};
use rusqlite::{Connection, params};
use sha2::{Digest, Sha256};
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

/// Storage manager for a single data directory.
pub struct Storage {
    /// Root directory for this store's data
    pub root: PathBuf,
    /// SQLite connection for indexed queries
    conn: Connection,
}

impl Storage {
    /// Open storage at the default data directory.
    pub fn open() -> Result<Self> {
        Self::open_at(&default_data_dir()?)
    }

    /// Initialize storage at the default data directory.
    pub fn init() -> Result<Self> {
        Self::init_at(&default_data_dir()?)
    }

    /// Check if storage exists at the default data directory.
    pub fn exists() -> Result<bool> {
        Ok(Self::exists_at(&default_data_dir()?))
    }

    /// Open existing storage rooted at the given directory.
    pub fn open_at(root: &Path) -> Result<Self> {
        if !Self::exists_at(root) {
            return Err(Error::NotInitialized);
        }

        let conn = Connection::open(root.join("cache.db"))?;
        Self::init_schema(&conn)?;

        Ok(Self {
            root: root.to_path_buf(),
            conn,
        })
    }

    /// Initialize storage rooted at the given directory.
    pub fn init_at(root: &Path) -> Result<Self> {
        fs::create_dir_all(root)?;

        // Create empty journals
        for file in ["complaints.jsonl", "responses.jsonl", "profiles.jsonl"] {
            let path = root.join(file);
            if !path.exists() {
                File::create(&path)?;
            }
        }

        let conn = Connection::open(root.join("cache.db"))?;
        Self::init_schema(&conn)?;

        Ok(Self {
            root: root.to_path_buf(),
            conn,
        })
    }

    /// Check if storage exists at the given directory.
    pub fn exists_at(root: &Path) -> bool {
        root.join("cache.db").exists() && root.join("complaints.jsonl").exists()
    }

    /// Get the storage root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Initialize the SQLite schema.
    fn init_schema(conn: &Connection) -> Result<()> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS complaints (
                id TEXT PRIMARY KEY,
                student_id TEXT NOT NULL,
                title TEXT NOT NULL,
                description TEXT NOT NULL,
                category TEXT NOT NULL,
                status TEXT NOT NULL DEFAULT 'open',
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS complaint_responses (
                id TEXT PRIMARY KEY,
                complaint_id TEXT NOT NULL,
                responder_id TEXT NOT NULL,
                message TEXT NOT NULL,
                created_at TEXT NOT NULL,
                FOREIGN KEY (complaint_id) REFERENCES complaints(id) ON DELETE CASCADE
            );

            CREATE TABLE IF NOT EXISTS profiles (
                id TEXT PRIMARY KEY,
                full_name TEXT NOT NULL,
                email TEXT NOT NULL,
                role TEXT NOT NULL DEFAULT 'student',
                created_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_complaints_status ON complaints(status);
            CREATE INDEX IF NOT EXISTS idx_complaints_student ON complaints(student_id);
            CREATE INDEX IF NOT EXISTS idx_complaints_category ON complaints(category);
            CREATE INDEX IF NOT EXISTS idx_responses_complaint ON complaint_responses(complaint_id);
            CREATE INDEX IF NOT EXISTS idx_profiles_email ON profiles(email);
            CREATE INDEX IF NOT EXISTS idx_profiles_role ON profiles(role);

            -- Configuration table
            CREATE TABLE IF NOT EXISTS config (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );
            "#,
        )?;

        Ok(())
    }

    /// Rebuild the SQLite cache from the JSONL journals.
    ///
    /// Journal lines that no longer decode (unknown status or category
    /// strings, truncated writes) are skipped; they remain in the journal
    /// but are invisible to queries.
    pub fn rebuild_cache(&mut self) -> Result<()> {
        self.conn.execute("PRAGMA foreign_keys = OFF", [])?;

        self.conn.execute_batch(
            r#"
            DELETE FROM complaint_responses;
            DELETE FROM complaints;
            DELETE FROM profiles;
            "#,
        )?;

        for line in read_journal_lines(&self.root.join("profiles.jsonl"))? {
            if let Ok(profile) = serde_json::from_str::<Profile>(&line) {
                self.cache_profile(&profile)?;
            }
        }

        for line in read_journal_lines(&self.root.join("complaints.jsonl"))? {
            if let Ok(complaint) = serde_json::from_str::<Complaint>(&line) {
                self.cache_complaint(&complaint)?;
            }
        }

        for line in read_journal_lines(&self.root.join("responses.jsonl"))? {
            if let Ok(response) = serde_json::from_str::<ComplaintResponse>(&line) {
                self.cache_response(&response)?;
            }
        }

        self.conn.execute("PRAGMA foreign_keys = ON", [])?;

        Ok(())
    }

    /// Append an entity to a journal file.
    fn append_journal<T: serde::Serialize>(&self, filename: &str, entity: &T) -> Result<()> {
        let path = self.root.join(filename);
        let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
        let json = serde_json::to_string(entity)?;
        writeln!(file, "{}", json)?;
        Ok(())
    }

    /// Cache a complaint in SQLite for fast querying.
    fn cache_complaint(&self, complaint: &Complaint) -> Result<()> {
        self.conn.execute(
            r#"
            INSERT OR REPLACE INTO complaints
            (id, student_id, title, description, category, status, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                complaint.id,
                complaint.student_id,
                complaint.title,
                complaint.description,
                complaint.category.to_string(),
                complaint.status.to_string(),
                complaint.created_at.to_rfc3339(),
                complaint.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Cache a response in SQLite for fast querying.
    fn cache_response(&self, response: &ComplaintResponse) -> Result<()> {
        self.conn.execute(
            r#"
            INSERT OR REPLACE INTO complaint_responses
            (id, complaint_id, responder_id, message, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                response.id,
                response.complaint_id,
                response.responder_id,
                response.message,
                response.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Cache a profile in SQLite for fast querying.
    fn cache_profile(&self, profile: &Profile) -> Result<()> {
        self.conn.execute(
            r#"
            INSERT OR REPLACE INTO profiles
            (id, full_name, email, role, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                profile.id,
                profile.full_name,
                profile.email,
                profile.role.to_string(),
                profile.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    // === Complaint Operations ===

    /// Create a new complaint.
    pub fn create_complaint(&mut self, complaint: &Complaint) -> Result<()> {
        self.append_journal("complaints.jsonl", complaint)?;
        self.cache_complaint(complaint)?;
        Ok(())
    }

    /// Get a complaint by ID.
    ///
    /// Reads the journal so the latest appended version wins.
    pub fn get_complaint(&self, id: &str) -> Result<Complaint> {
        let mut latest: Option<Complaint> = None;
        for line in read_journal_lines(&self.root.join("complaints.jsonl"))? {
            if let Ok(complaint) = serde_json::from_str::<Complaint>(&line) {
                if complaint.id == id {
                    latest = Some(complaint);
                }
            }
        }

        latest.ok_or_else(|| Error::NotFound(format!("Complaint not found: {}", id)))
    }

    /// List complaints, optionally filtered, newest first.
    pub fn list_complaints(
        &self,
        student_id: Option<&str>,
        status: Option<ComplaintStatus>,
        category: Option<ComplaintCategory>,
    ) -> Result<Vec<Complaint>> {
        let mut sql = String::from("SELECT id FROM complaints WHERE 1=1");
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(sid) = student_id {
            sql.push_str(" AND student_id = ?");
            params_vec.push(Box::new(sid.to_string()));
        }
        if let Some(s) = status {
            sql.push_str(" AND status = ?");
            params_vec.push(Box::new(s.to_string()));
        }
        if let Some(c) = category {
            sql.push_str(" AND category = ?");
            params_vec.push(Box::new(c.to_string()));
        }

        sql.push_str(" ORDER BY created_at DESC");

        let params_refs: Vec<&dyn rusqlite::ToSql> =
            params_vec.iter().map(|p| p.as_ref()).collect();

        let mut stmt = self.conn.prepare(&sql)?;
        let ids: Vec<String> = stmt
            .query_map(params_refs.as_slice(), |row| row.get(0))?
            .filter_map(|r| r.ok())
            .collect();

        // Fetch full complaint objects from the journal
        let mut complaints = Vec::new();
        for id in ids {
            if let Ok(complaint) = self.get_complaint(&id) {
                complaints.push(complaint);
            }
        }

        Ok(complaints)
    }

    /// Update a complaint by appending a new version to the journal.
    pub fn update_complaint(&mut self, complaint: &Complaint) -> Result<()> {
        // Verify complaint exists
        self.get_complaint(&complaint.id)?;

        self.append_journal("complaints.jsonl", complaint)?;
        self.cache_complaint(complaint)?;

        Ok(())
    }

    // === Response Operations ===

    /// Record a response. Responses are append-only; there is no update path.
    pub fn add_response(&mut self, response: &ComplaintResponse) -> Result<()> {
        // Verify parent complaint exists
        self.get_complaint(&response.complaint_id)?;

        self.append_journal("responses.jsonl", response)?;
        self.cache_response(response)?;

        Ok(())
    }

    /// List responses for a complaint, oldest first.
    pub fn list_responses(&self, complaint_id: &str) -> Result<Vec<ComplaintResponse>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, complaint_id, responder_id, message, created_at
             FROM complaint_responses WHERE complaint_id = ?1
             ORDER BY created_at ASC",
        )?;

        let responses: Vec<ComplaintResponse> = stmt
            .query_map([complaint_id], |row| {
                Ok(ComplaintResponse {
                    id: row.get(0)?,
                    entity_type: "response".to_string(),
                    complaint_id: row.get(1)?,
                    responder_id: row.get(2)?,
                    message: row.get(3)?,
                    created_at: parse_timestamp(row.get::<_, String>(4)?),
                })
            })?
            .filter_map(|r| r.ok())
            .collect();

        Ok(responses)
    }

    // === Profile Operations ===

    /// Register a new profile.
    pub fn create_profile(&mut self, profile: &Profile) -> Result<()> {
        self.append_journal("profiles.jsonl", profile)?;
        self.cache_profile(profile)?;
        Ok(())
    }

    /// Get a profile by ID.
    pub fn get_profile(&self, id: &str) -> Result<Profile> {
        let mut latest: Option<Profile> = None;
        for line in read_journal_lines(&self.root.join("profiles.jsonl"))? {
            if let Ok(profile) = serde_json::from_str::<Profile>(&line) {
                if profile.id == id {
                    latest = Some(profile);
                }
            }
        }

        latest.ok_or_else(|| Error::NotFound(format!("Profile not found: {}", id)))
    }

    /// Find a profile by email, if registered.
    pub fn find_profile_by_email(&self, email: &str) -> Result<Option<Profile>> {
        let id: Option<String> = self
            .conn
            .query_row(
                "SELECT id FROM profiles WHERE email = ?1",
                [email],
                |row| row.get(0),
            )
            .map(Some)
            .or_else(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => Ok(None),
                other => Err(other),
            })?;

        match id {
            Some(id) => Ok(Some(self.get_profile(&id)?)),
            None => Ok(None),
        }
    }

    /// List profiles, optionally filtered by role, oldest first.
    pub fn list_profiles(&self, role: Option<Role>) -> Result<Vec<Profile>> {
        let mut sql = String::from("SELECT id FROM profiles WHERE 1=1");
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(r) = role {
            sql.push_str(" AND role = ?");
            params_vec.push(Box::new(r.to_string()));
        }

        sql.push_str(" ORDER BY created_at ASC");

        let params_refs: Vec<&dyn rusqlite::ToSql> =
            params_vec.iter().map(|p| p.as_ref()).collect();

        let mut stmt = self.conn.prepare(&sql)?;
        let ids: Vec<String> = stmt
            .query_map(params_refs.as_slice(), |row| row.get(0))?
            .filter_map(|r| r.ok())
            .collect();

        let mut profiles = Vec::new();
        for id in ids {
            if let Ok(profile) = self.get_profile(&id) {
                profiles.push(profile);
            }
        }

        Ok(profiles)
    }

    // === Joined Views ===

    /// Hydrate a complaint with its author and responses.
    pub fn hydrate_complaint(&self, complaint: Complaint) -> Result<ComplaintDetail> {
        let author = self.get_profile(&complaint.student_id).ok();
        let responses = self.list_responses(&complaint.id)?;
        Ok(ComplaintDetail {
            complaint,
            author,
            responses,
        })
    }

    /// Get a single complaint with author and responses joined.
    pub fn get_complaint_detail(&self, id: &str) -> Result<ComplaintDetail> {
        let complaint = self.get_complaint(id)?;
        self.hydrate_complaint(complaint)
    }

    /// List complaints with author and responses joined, newest first.
    pub fn list_complaint_details(
        &self,
        student_id: Option<&str>,
        status: Option<ComplaintStatus>,
        category: Option<ComplaintCategory>,
    ) -> Result<Vec<ComplaintDetail>> {
        let complaints = self.list_complaints(student_id, status, category)?;
        let mut details = Vec::with_capacity(complaints.len());
        for complaint in complaints {
            details.push(self.hydrate_complaint(complaint)?);
        }
        Ok(details)
    }

    // === Config Operations ===

    /// Get a configuration value.
    pub fn get_config(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM config WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .map(Some)
            .or_else(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => Ok(None),
                other => Err(other),
            })?;
        Ok(value)
    }

    /// Set a configuration value.
    pub fn set_config(&mut self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO config (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    /// List all configuration values.
    pub fn list_configs(&self) -> Result<Vec<(String, String)>> {
        let mut stmt = self
            .conn
            .prepare("SELECT key, value FROM config ORDER BY key")?;
        let configs: Vec<(String, String)> = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .filter_map(|r| r.ok())
            .collect();
        Ok(configs)
    }
}

/// Read all non-empty lines from a journal file.
fn read_journal_lines(path: &Path) -> Result<Vec<String>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let file = File::open(path)?;
    let reader = BufReader::new(file);

    let mut lines = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if !line.trim().is_empty() {
            lines.push(line);
        }
    }
    Ok(lines)
}

/// Parse an RFC 3339 timestamp stored in the cache.
fn parse_timestamp(s: String) -> chrono::DateTime<chrono::Utc> {
    chrono::DateTime::parse_from_rfc3339(&s)
        .map(|dt| dt.with_timezone(&chrono::Utc))
        .unwrap_or_default()
}

/// Get the default data directory.
///
/// Priority: `GRIPE_DATA_DIR` env var > `~/.local/share/gripe/`.
pub fn default_data_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("GRIPE_DATA_DIR") {
        if !dir.is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }

    let data_dir = dirs::data_dir()
        .ok_or_else(|| Error::Other("Could not determine data directory".to_string()))?;
    Ok(data_dir.join("gripe"))
}

/// Generate a unique ID for a complaint or profile.
///
/// Format: `<prefix>-<4 hex chars>`
/// - Complaint prefix: "gr"
/// - Profile prefix: "grp"
pub fn generate_id(prefix: &str, seed: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(seed.as_bytes());
    hasher.update(
        chrono::Utc::now()
            .timestamp_nanos_opt()
            .unwrap_or(0)
            .to_le_bytes(),
    );
    let hash = hasher.finalize();
    let hash_hex = format!("{:x}", hash);
    format!("{}-{}", prefix, &hash_hex[..4])
}

/// Validate that an ID matches the expected format.
pub fn validate_id(id: &str, prefix: &str) -> Result<()> {
    if !id.starts_with(&format!("{}-", prefix)) {
        return Err(Error::InvalidId(format!(
            "ID must start with '{}-', got: {}",
            prefix, id
        )));
    }

    let suffix = &id[prefix.len() + 1..];
    if suffix.len() != 4 || !suffix.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(Error::InvalidId(format!(
            "ID suffix must be 4 hex characters, got: {}",
            suffix
        )));
    }

    Ok(())
}

/// Validate a complaint ID (gr-xxxx format).
pub fn validate_complaint_id(id: &str) -> Result<()> {
    validate_id(id, "gr")
}

/// Validate a profile ID (grp-xxxx format).
pub fn validate_profile_id(id: &str) -> Result<()> {
    validate_id(id, "grp")
}

/// Parse a status string into ComplaintStatus.
pub fn parse_status(s: &str) -> Result<ComplaintStatus> {
    s.parse::<ComplaintStatus>().map_err(Error::InvalidInput)
}

/// Parse a category string into ComplaintCategory.
pub fn parse_category(s: &str) -> Result<ComplaintCategory> {
    s.parse::<ComplaintCategory>().map_err(Error::InvalidInput)
}

/// Parse a role string into Role.
pub fn parse_role(s: &str) -> Result<Role> {
    s.parse::<Role>().map_err(Error::InvalidInput)
}
