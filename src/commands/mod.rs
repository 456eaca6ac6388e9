//! Command implementations for the Gripe CLI.
//!
//! This module contains the business logic for each CLI command.
//! Commands are organized by flow:
//! - `system` - Initialize and inspect the store
//! - `profile` - Identity registration and lookup
//! - student flow - `complaint_submit`, `complaint_mine`
//! - staff flow - `complaint_list`, `complaint_set_status`, `complaint_respond`
//! - `config` / `log` - Key/value configuration and the action audit trail
//!
//! Every command takes the resolved data directory; storage is re-opened and
//! re-queried per invocation, so the store stays the single source of truth.

use crate::action_log::{self, ActionLog};
use crate::models::buckets::{self, StatusCounts};
use crate::models::{
    Complaint, ComplaintDetail, ComplaintResponse, ComplaintStatus, Profile, Role,
};
use crate::storage::{self, Storage};
use crate::{Error, Result};
use serde::Serialize;
use std::path::Path;

/// Command results that can be serialized to JSON or formatted for humans.
pub trait Output: Serialize {
    /// Format for human-readable output.
    fn to_human(&self) -> String;

    /// Serialize to a JSON string.
    fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

// === System ===

/// Result of `gripe system init`.
#[derive(Debug, Serialize)]
pub struct InitResult {
    pub initialized: bool,
    pub location: String,
}

impl Output for InitResult {
    fn to_human(&self) -> String {
        if self.initialized {
            format!("Initialized gripe storage at {}", self.location)
        } else {
            format!("Already initialized at {}", self.location)
        }
    }
}

/// Initialize storage, or report that it already exists.
pub fn system_init(data_dir: &Path) -> Result<InitResult> {
    if Storage::exists_at(data_dir) {
        return Ok(InitResult {
            initialized: false,
            location: data_dir.display().to_string(),
        });
    }

    let storage = Storage::init_at(data_dir)?;
    Ok(InitResult {
        initialized: true,
        location: storage.root().display().to_string(),
    })
}

/// Result of `gripe system info`.
#[derive(Debug, Serialize)]
pub struct InfoResult {
    pub version: String,
    pub build_timestamp: String,
    pub git_commit: String,
    pub location: String,
    pub complaints: usize,
    pub profiles: usize,
}

impl Output for InfoResult {
    fn to_human(&self) -> String {
        format!(
            "gripe {} (built {} from {})\nStorage: {}\nComplaints: {}\nProfiles: {}",
            self.version,
            self.build_timestamp,
            self.git_commit,
            self.location,
            self.complaints,
            self.profiles
        )
    }
}

/// Report version, build info, and store counts.
pub fn system_info(data_dir: &Path) -> Result<InfoResult> {
    let storage = Storage::open_at(data_dir)?;
    let complaints = storage.list_complaints(None, None, None)?.len();
    let profiles = storage.list_profiles(None)?.len();

    Ok(InfoResult {
        version: env!("CARGO_PKG_VERSION").to_string(),
        build_timestamp: env!("GRIPE_BUILD_TIMESTAMP").to_string(),
        git_commit: env!("GRIPE_GIT_COMMIT").to_string(),
        location: storage.root().display().to_string(),
        complaints,
        profiles,
    })
}

/// Result of `gripe system rebuild`.
#[derive(Debug, Serialize)]
pub struct RebuildResult {
    pub complaints: usize,
    pub profiles: usize,
}

impl Output for RebuildResult {
    fn to_human(&self) -> String {
        format!(
            "Rebuilt index: {} complaints, {} profiles",
            self.complaints, self.profiles
        )
    }
}

/// Rebuild the SQLite index from the JSONL journals.
pub fn system_rebuild(data_dir: &Path) -> Result<RebuildResult> {
    let mut storage = Storage::open_at(data_dir)?;
    storage.rebuild_cache()?;

    let complaints = storage.list_complaints(None, None, None)?.len();
    let profiles = storage.list_profiles(None)?.len();
    Ok(RebuildResult {
        complaints,
        profiles,
    })
}

// === Profiles ===

/// Result of profile register/show.
#[derive(Debug, Serialize)]
pub struct ProfileResult {
    #[serde(flatten)]
    pub profile: Profile,
}

impl Output for ProfileResult {
    fn to_human(&self) -> String {
        format!(
            "{}  {}  {} <{}>",
            self.profile.id, self.profile.role, self.profile.full_name, self.profile.email
        )
    }
}

/// Result of `gripe profile list`.
#[derive(Debug, Serialize)]
pub struct ProfileListResult {
    pub count: usize,
    pub profiles: Vec<Profile>,
}

impl Output for ProfileListResult {
    fn to_human(&self) -> String {
        if self.profiles.is_empty() {
            return "No profiles registered".to_string();
        }
        let mut out = format!("{} profiles:\n", self.count);
        for p in &self.profiles {
            out.push_str(&format!(
                "  {}  {:<8} {} <{}>\n",
                p.id, p.role.to_string(), p.full_name, p.email
            ));
        }
        out.trim_end().to_string()
    }
}

/// Register a new profile.
pub fn profile_register(
    data_dir: &Path,
    full_name: &str,
    email: &str,
    role: &str,
) -> Result<ProfileResult> {
    let full_name = full_name.trim();
    let email = email.trim();
    if full_name.is_empty() {
        return Err(Error::InvalidInput("Profile name must not be empty".to_string()));
    }
    if email.is_empty() {
        return Err(Error::InvalidInput("Profile email must not be empty".to_string()));
    }
    let role = storage::parse_role(role)?;

    let mut store = Storage::open_at(data_dir)?;
    if store.find_profile_by_email(email)?.is_some() {
        return Err(Error::InvalidInput(format!(
            "A profile with email {} is already registered",
            email
        )));
    }

    let profile = Profile::new(
        storage::generate_id("grp", email),
        full_name.to_string(),
        email.to_string(),
        role,
    );
    store.create_profile(&profile)?;

    Ok(ProfileResult { profile })
}

/// List profiles, optionally filtered by role.
pub fn profile_list(data_dir: &Path, role: Option<&str>) -> Result<ProfileListResult> {
    let role = role.map(storage::parse_role).transpose()?;
    let store = Storage::open_at(data_dir)?;
    let profiles = store.list_profiles(role)?;
    Ok(ProfileListResult {
        count: profiles.len(),
        profiles,
    })
}

/// Show a single profile.
pub fn profile_show(data_dir: &Path, id: &str) -> Result<ProfileResult> {
    storage::validate_profile_id(id)?;
    let store = Storage::open_at(data_dir)?;
    let profile = store.get_profile(id)?;
    Ok(ProfileResult { profile })
}

/// Resolve the acting profile: explicit `--as` id, falling back to the
/// `default_profile` config key.
fn resolve_actor(store: &Storage, explicit: Option<&str>) -> Result<Profile> {
    let id = match explicit {
        Some(id) => id.to_string(),
        None => store.get_config("default_profile")?.ok_or_else(|| {
            Error::InvalidInput(
                "No acting profile: pass --as <profile-id> or set the default_profile config key"
                    .to_string(),
            )
        })?,
    };
    storage::validate_profile_id(&id)?;
    store.get_profile(&id)
}

// === Student Flow ===

/// Result of `gripe submit`.
#[derive(Debug, Serialize)]
pub struct SubmitResult {
    #[serde(flatten)]
    pub complaint: Complaint,
}

impl Output for SubmitResult {
    fn to_human(&self) -> String {
        format!(
            "Created complaint {}: \"{}\" [{}] ({})",
            self.complaint.id, self.complaint.title, self.complaint.category, self.complaint.status
        )
    }
}

/// Submit a new complaint. Status is always `open` on creation; the caller
/// has no way to supply one.
pub fn complaint_submit(
    data_dir: &Path,
    actor: Option<&str>,
    title: &str,
    category: &str,
    description: &str,
) -> Result<SubmitResult> {
    let title = title.trim();
    let description = description.trim();
    if title.is_empty() {
        return Err(Error::InvalidInput("Complaint title must not be empty".to_string()));
    }
    if description.is_empty() {
        return Err(Error::InvalidInput(
            "Complaint description must not be empty".to_string(),
        ));
    }
    let category = storage::parse_category(category)?;

    let mut store = Storage::open_at(data_dir)?;
    let student = resolve_actor(&store, actor)?;
    if student.role != Role::Student {
        return Err(Error::NotPermitted(format!(
            "Only students submit complaints; {} has role {}",
            student.id, student.role
        )));
    }

    let complaint = Complaint::new(
        storage::generate_id("gr", title),
        student.id,
        title.to_string(),
        category,
        description.to_string(),
    );
    store.create_complaint(&complaint)?;

    Ok(SubmitResult { complaint })
}

/// Result of complaint listings (`gripe mine` / `gripe list`).
#[derive(Debug, Serialize)]
pub struct ComplaintListResult {
    pub counts: StatusCounts,
    pub complaints: Vec<ComplaintDetail>,
}

impl Output for ComplaintListResult {
    fn to_human(&self) -> String {
        let c = &self.counts;
        let mut out = format!(
            "{} complaints ({} open, {} in progress, {} resolved)\n",
            c.total, c.open, c.in_progress, c.resolved
        );
        for detail in &self.complaints {
            let complaint = &detail.complaint;
            let author = detail
                .author
                .as_ref()
                .map(|a| a.full_name.as_str())
                .unwrap_or(complaint.student_id.as_str());
            out.push_str(&format!(
                "  {}  {:<11} {:<14} {}  ({}, {} responses)\n",
                complaint.id,
                complaint.status.to_string(),
                complaint.category.to_string(),
                complaint.title,
                author,
                detail.responses.len()
            ));
        }
        out.trim_end().to_string()
    }
}

fn list_result(details: Vec<ComplaintDetail>) -> ComplaintListResult {
    let complaints: Vec<Complaint> = details.iter().map(|d| d.complaint.clone()).collect();
    let counts = buckets::partition_by_status(&complaints).counts();
    ComplaintListResult {
        counts,
        complaints: details,
    }
}

/// List the acting student's own complaints, with responses, newest first.
pub fn complaint_mine(data_dir: &Path, actor: Option<&str>) -> Result<ComplaintListResult> {
    let store = Storage::open_at(data_dir)?;
    let student = resolve_actor(&store, actor)?;
    let details = store.list_complaint_details(Some(&student.id), None, None)?;
    Ok(list_result(details))
}

// === Staff Flow ===

/// List all complaints with author and responses joined, newest first.
pub fn complaint_list(
    data_dir: &Path,
    status: Option<&str>,
    category: Option<&str>,
) -> Result<ComplaintListResult> {
    let status = status.map(storage::parse_status).transpose()?;
    let category = category.map(storage::parse_category).transpose()?;
    let store = Storage::open_at(data_dir)?;
    let details = store.list_complaint_details(None, status, category)?;
    Ok(list_result(details))
}

/// Result of `gripe show`.
#[derive(Debug, Serialize)]
pub struct ShowResult {
    #[serde(flatten)]
    pub detail: ComplaintDetail,
}

impl Output for ShowResult {
    fn to_human(&self) -> String {
        let complaint = &self.detail.complaint;
        let mut out = format!(
            "{}  {}  [{}]\n{}\n",
            complaint.id, complaint.status, complaint.category, complaint.title
        );
        if let Some(author) = &self.detail.author {
            out.push_str(&format!("From: {} <{}>\n", author.full_name, author.email));
        }
        out.push_str(&format!("Submitted: {}\n\n{}\n", complaint.created_at, complaint.description));
        if !self.detail.responses.is_empty() {
            out.push_str("\nResponses:\n");
            for response in &self.detail.responses {
                out.push_str(&format!(
                    "  [{}] {}: {}\n",
                    response.created_at, response.responder_id, response.message
                ));
            }
        }
        out.trim_end().to_string()
    }
}

/// Show a single complaint with author and responses.
pub fn complaint_show(data_dir: &Path, id: &str) -> Result<ShowResult> {
    storage::validate_complaint_id(id)?;
    let store = Storage::open_at(data_dir)?;
    let detail = store.get_complaint_detail(id)?;
    Ok(ShowResult { detail })
}

/// Result of `gripe status`.
#[derive(Debug, Serialize)]
pub struct StatusUpdateResult {
    pub complaint_id: String,
    pub previous_status: ComplaintStatus,
    pub status: ComplaintStatus,
}

impl Output for StatusUpdateResult {
    fn to_human(&self) -> String {
        format!(
            "Updated {}: {} -> {}",
            self.complaint_id, self.previous_status, self.status
        )
    }
}

/// Overwrite a complaint's status. No transition guard: any status may
/// replace any other, and concurrent writers resolve last-writer-wins.
pub fn complaint_set_status(
    data_dir: &Path,
    id: &str,
    status: &str,
    actor: Option<&str>,
) -> Result<StatusUpdateResult> {
    storage::validate_complaint_id(id)?;
    let status = storage::parse_status(status)?;

    let mut store = Storage::open_at(data_dir)?;
    let staff = resolve_actor(&store, actor)?;
    if !staff.role.can_triage() {
        return Err(Error::NotPermitted(format!(
            "Only staff update complaint status; {} has role {}",
            staff.id, staff.role
        )));
    }

    let mut complaint = store.get_complaint(id)?;
    let previous_status = complaint.status;
    complaint.status = status;
    complaint.updated_at = chrono::Utc::now();
    store.update_complaint(&complaint)?;

    Ok(StatusUpdateResult {
        complaint_id: complaint.id,
        previous_status,
        status,
    })
}

/// Result of `gripe respond`.
#[derive(Debug, Serialize)]
pub struct RespondResult {
    pub complaint_id: String,
    pub response_id: String,
    pub status: ComplaintStatus,
    pub status_changed: bool,
}

impl Output for RespondResult {
    fn to_human(&self) -> String {
        let mut out = format!(
            "Recorded response {} on {}",
            self.response_id, self.complaint_id
        );
        if self.status_changed {
            out.push_str(&format!("\nStatus is now {}", self.status));
        }
        out
    }
}

/// Record a staff response, optionally bundling a status change.
///
/// The message is validated before any store write. The response insert and
/// the status update are two independent store operations: a failure between
/// them leaves the response recorded and the status unchanged. When the
/// requested status equals the current one, no status write is issued.
pub fn complaint_respond(
    data_dir: &Path,
    id: &str,
    actor: Option<&str>,
    message: &str,
    new_status: Option<&str>,
) -> Result<RespondResult> {
    storage::validate_complaint_id(id)?;
    let message = message.trim();
    if message.is_empty() {
        return Err(Error::InvalidInput(
            "Response message must not be empty".to_string(),
        ));
    }
    let new_status = new_status.map(storage::parse_status).transpose()?;

    let mut store = Storage::open_at(data_dir)?;
    let staff = resolve_actor(&store, actor)?;
    if !staff.role.can_triage() {
        return Err(Error::NotPermitted(format!(
            "Only staff respond to complaints; {} has role {}",
            staff.id, staff.role
        )));
    }

    let mut complaint = store.get_complaint(id)?;

    let response = ComplaintResponse::new(
        uuid::Uuid::new_v4().to_string(),
        complaint.id.clone(),
        staff.id,
        message.to_string(),
    );
    store.add_response(&response)?;

    let status_changed = match new_status {
        Some(status) if status != complaint.status => {
            complaint.status = status;
            complaint.updated_at = chrono::Utc::now();
            store.update_complaint(&complaint)?;
            true
        }
        _ => false,
    };

    Ok(RespondResult {
        complaint_id: complaint.id,
        response_id: response.id,
        status: complaint.status,
        status_changed,
    })
}

/// Result of `gripe summary`.
#[derive(Debug, Serialize)]
pub struct SummaryResult {
    #[serde(flatten)]
    pub counts: StatusCounts,
}

impl Output for SummaryResult {
    fn to_human(&self) -> String {
        format!(
            "Open: {}\nIn progress: {}\nResolved: {}\nTotal: {}",
            self.counts.open, self.counts.in_progress, self.counts.resolved, self.counts.total
        )
    }
}

/// Report the three status counters over the full collection.
pub fn complaint_summary(data_dir: &Path) -> Result<SummaryResult> {
    let store = Storage::open_at(data_dir)?;
    let complaints = store.list_complaints(None, None, None)?;
    let counts = buckets::partition_by_status(&complaints).counts();
    Ok(SummaryResult { counts })
}

// === Config ===

/// A single configuration entry.
#[derive(Debug, Serialize)]
pub struct ConfigEntry {
    pub key: String,
    pub value: String,
}

/// Result of `gripe config get`.
#[derive(Debug, Serialize)]
pub struct ConfigGetResult {
    pub key: String,
    pub value: Option<String>,
}

impl Output for ConfigGetResult {
    fn to_human(&self) -> String {
        match &self.value {
            Some(value) => format!("{} = {}", self.key, value),
            None => format!("{} is not set", self.key),
        }
    }
}

/// Result of `gripe config set`.
#[derive(Debug, Serialize)]
pub struct ConfigSetResult {
    pub key: String,
    pub value: String,
}

impl Output for ConfigSetResult {
    fn to_human(&self) -> String {
        format!("Set {} = {}", self.key, self.value)
    }
}

/// Result of `gripe config list`.
#[derive(Debug, Serialize)]
pub struct ConfigListResult {
    pub configs: Vec<ConfigEntry>,
}

impl Output for ConfigListResult {
    fn to_human(&self) -> String {
        if self.configs.is_empty() {
            return "No configuration set".to_string();
        }
        self.configs
            .iter()
            .map(|c| format!("{} = {}", c.key, c.value))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Get a configuration value.
pub fn config_get(data_dir: &Path, key: &str) -> Result<ConfigGetResult> {
    let store = Storage::open_at(data_dir)?;
    let value = store.get_config(key)?;
    Ok(ConfigGetResult {
        key: key.to_string(),
        value,
    })
}

/// Set a configuration value.
pub fn config_set(data_dir: &Path, key: &str, value: &str) -> Result<ConfigSetResult> {
    let mut store = Storage::open_at(data_dir)?;
    store.set_config(key, value)?;
    Ok(ConfigSetResult {
        key: key.to_string(),
        value: value.to_string(),
    })
}

/// List all configuration values.
pub fn config_list(data_dir: &Path) -> Result<ConfigListResult> {
    let store = Storage::open_at(data_dir)?;
    let configs = store
        .list_configs()?
        .into_iter()
        .map(|(key, value)| ConfigEntry { key, value })
        .collect();
    Ok(ConfigListResult { configs })
}

// === Action Log ===

/// Result of `gripe log`.
#[derive(Debug, Serialize)]
pub struct LogListResult {
    pub count: usize,
    pub entries: Vec<ActionLog>,
}

impl Output for LogListResult {
    fn to_human(&self) -> String {
        if self.entries.is_empty() {
            return "No log entries".to_string();
        }
        let mut out = format!("{} entries:\n", self.count);
        for entry in &self.entries {
            let outcome = if entry.success { "ok" } else { "failed" };
            out.push_str(&format!(
                "  [{}] {} ({}, {}ms)\n",
                entry.timestamp, entry.command, outcome, entry.duration_ms
            ));
        }
        out.trim_end().to_string()
    }
}

/// Read the action audit trail, optionally filtered by an ID appearing in
/// the logged command arguments.
pub fn log_list(data_dir: &Path, filter: Option<&str>) -> Result<LogListResult> {
    let entries = action_log::read_entries(data_dir)?;
    let entries: Vec<ActionLog> = match filter {
        Some(needle) => entries
            .into_iter()
            .filter(|e| {
                e.command.contains(needle)
                    || serde_json::to_string(&e.args)
                        .map(|s| s.contains(needle))
                        .unwrap_or(false)
            })
            .collect(),
        None => entries,
    };
    Ok(LogListResult {
        count: entries.len(),
        entries,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestEnv;

    /// Register a profile and return its id.
    fn register(env: &TestEnv, name: &str, email: &str, role: &str) -> String {
        profile_register(env.data_path(), name, email, role)
            .unwrap()
            .profile
            .id
    }

    fn setup() -> (TestEnv, String, String) {
        let env = TestEnv::new();
        system_init(env.data_path()).unwrap();
        let student = register(&env, "Sam Student", "sam@example.edu", "student");
        let staff = register(&env, "Tara Staff", "tara@example.edu", "staff");
        (env, student, staff)
    }

    fn journal_len(env: &TestEnv, file: &str) -> usize {
        let content = std::fs::read_to_string(env.data_path().join(file)).unwrap();
        content.lines().filter(|l| !l.trim().is_empty()).count()
    }

    #[test]
    fn test_init_is_idempotent() {
        let env = TestEnv::new();
        let first = system_init(env.data_path()).unwrap();
        assert!(first.initialized);
        let second = system_init(env.data_path()).unwrap();
        assert!(!second.initialized);
    }

    #[test]
    fn test_submit_forces_open_status() {
        let (env, student, _) = setup();
        let result = complaint_submit(
            env.data_path(),
            Some(&student),
            "Wifi down",
            "technical",
            "No connectivity in block C",
        )
        .unwrap();
        assert_eq!(result.complaint.status, ComplaintStatus::Open);
        assert_eq!(result.complaint.student_id, student);
    }

    #[test]
    fn test_submit_rejects_empty_fields() {
        let (env, student, _) = setup();
        assert!(matches!(
            complaint_submit(env.data_path(), Some(&student), "  ", "technical", "desc"),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            complaint_submit(env.data_path(), Some(&student), "Title", "technical", ""),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            complaint_submit(env.data_path(), Some(&student), "Title", "sports", "desc"),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_submit_requires_student_role() {
        let (env, _, staff) = setup();
        let result = complaint_submit(
            env.data_path(),
            Some(&staff),
            "Title",
            "other",
            "Description",
        );
        assert!(matches!(result, Err(Error::NotPermitted(_))));
    }

    #[test]
    fn test_status_update_requires_staff_role() {
        let (env, student, _) = setup();
        let complaint = complaint_submit(
            env.data_path(),
            Some(&student),
            "Wifi down",
            "technical",
            "desc",
        )
        .unwrap()
        .complaint;

        let result = complaint_set_status(
            env.data_path(),
            &complaint.id,
            "in_progress",
            Some(&student),
        );
        assert!(matches!(result, Err(Error::NotPermitted(_))));
    }

    #[test]
    fn test_wifi_scenario_end_to_end() {
        let (env, student, staff) = setup();

        // Submit -> open / technical
        let complaint = complaint_submit(
            env.data_path(),
            Some(&student),
            "Wifi down",
            "technical",
            "No connectivity in block C",
        )
        .unwrap()
        .complaint;
        assert_eq!(complaint.status, ComplaintStatus::Open);

        // Staff moves it to in_progress
        let update = complaint_set_status(
            env.data_path(),
            &complaint.id,
            "in_progress",
            Some(&staff),
        )
        .unwrap();
        assert_eq!(update.previous_status, ComplaintStatus::Open);
        assert_eq!(update.status, ComplaintStatus::InProgress);

        // Respond bundling a resolve
        let respond = complaint_respond(
            env.data_path(),
            &complaint.id,
            Some(&staff),
            "Looking into it",
            Some("resolved"),
        )
        .unwrap();
        assert!(respond.status_changed);
        assert_eq!(respond.status, ComplaintStatus::Resolved);

        let detail = complaint_show(env.data_path(), &complaint.id).unwrap().detail;
        assert_eq!(detail.complaint.status, ComplaintStatus::Resolved);
        assert_eq!(detail.responses.len(), 1);
        assert_eq!(detail.responses[0].message, "Looking into it");
    }

    #[test]
    fn test_respond_empty_message_rejected_before_writes() {
        let (env, student, staff) = setup();
        let complaint = complaint_submit(
            env.data_path(),
            Some(&student),
            "Wifi down",
            "technical",
            "desc",
        )
        .unwrap()
        .complaint;
        let complaints_before = journal_len(&env, "complaints.jsonl");

        let result = complaint_respond(
            env.data_path(),
            &complaint.id,
            Some(&staff),
            "   ",
            Some("resolved"),
        );
        assert!(matches!(result, Err(Error::InvalidInput(_))));

        // Nothing was written: no response, no orphan status change
        assert_eq!(journal_len(&env, "responses.jsonl"), 0);
        assert_eq!(journal_len(&env, "complaints.jsonl"), complaints_before);
        let detail = complaint_show(env.data_path(), &complaint.id).unwrap().detail;
        assert_eq!(detail.complaint.status, ComplaintStatus::Open);
    }

    #[test]
    fn test_respond_equal_status_is_noop_on_status() {
        let (env, student, staff) = setup();
        let complaint = complaint_submit(
            env.data_path(),
            Some(&student),
            "Wifi down",
            "technical",
            "desc",
        )
        .unwrap()
        .complaint;
        let complaints_before = journal_len(&env, "complaints.jsonl");

        let respond = complaint_respond(
            env.data_path(),
            &complaint.id,
            Some(&staff),
            "Noted",
            Some("open"),
        )
        .unwrap();
        assert!(!respond.status_changed);
        assert_eq!(respond.status, ComplaintStatus::Open);

        // Response recorded, zero status-update writes issued
        assert_eq!(journal_len(&env, "responses.jsonl"), 1);
        assert_eq!(journal_len(&env, "complaints.jsonl"), complaints_before);
    }

    #[test]
    fn test_respond_without_status_leaves_status_alone() {
        let (env, student, staff) = setup();
        let complaint = complaint_submit(
            env.data_path(),
            Some(&student),
            "Wifi down",
            "technical",
            "desc",
        )
        .unwrap()
        .complaint;

        let respond =
            complaint_respond(env.data_path(), &complaint.id, Some(&staff), "Noted", None)
                .unwrap();
        assert!(!respond.status_changed);
        assert_eq!(respond.status, ComplaintStatus::Open);
    }

    #[test]
    fn test_status_last_writer_wins() {
        let (env, student, staff) = setup();
        let complaint = complaint_submit(
            env.data_path(),
            Some(&student),
            "Wifi down",
            "technical",
            "desc",
        )
        .unwrap()
        .complaint;

        // Two competing updates; no conflict error, the later write lands
        complaint_set_status(env.data_path(), &complaint.id, "in_progress", Some(&staff)).unwrap();
        complaint_set_status(env.data_path(), &complaint.id, "resolved", Some(&staff)).unwrap();

        let detail = complaint_show(env.data_path(), &complaint.id).unwrap().detail;
        assert_eq!(detail.complaint.status, ComplaintStatus::Resolved);
    }

    #[test]
    fn test_staff_can_reopen_resolved() {
        let (env, student, staff) = setup();
        let complaint = complaint_submit(
            env.data_path(),
            Some(&student),
            "Wifi down",
            "technical",
            "desc",
        )
        .unwrap()
        .complaint;

        complaint_set_status(env.data_path(), &complaint.id, "resolved", Some(&staff)).unwrap();
        let update =
            complaint_set_status(env.data_path(), &complaint.id, "open", Some(&staff)).unwrap();
        assert_eq!(update.status, ComplaintStatus::Open);
    }

    #[test]
    fn test_mine_lists_only_own_complaints() {
        let (env, student, _) = setup();
        let other = register(&env, "Omar Other", "omar@example.edu", "student");

        complaint_submit(env.data_path(), Some(&student), "Mine", "other", "d").unwrap();
        complaint_submit(env.data_path(), Some(&other), "Theirs", "other", "d").unwrap();

        let mine = complaint_mine(env.data_path(), Some(&student)).unwrap();
        assert_eq!(mine.counts.total, 1);
        assert_eq!(mine.complaints[0].complaint.title, "Mine");
    }

    #[test]
    fn test_list_joins_author_and_filters() {
        let (env, student, staff) = setup();
        let complaint = complaint_submit(
            env.data_path(),
            Some(&student),
            "Wifi down",
            "technical",
            "desc",
        )
        .unwrap()
        .complaint;
        complaint_respond(env.data_path(), &complaint.id, Some(&staff), "On it", None).unwrap();

        let all = complaint_list(env.data_path(), None, None).unwrap();
        assert_eq!(all.counts.total, 1);
        assert_eq!(all.counts.open, 1);
        let detail = &all.complaints[0];
        assert_eq!(detail.author.as_ref().unwrap().full_name, "Sam Student");
        assert_eq!(detail.responses.len(), 1);

        let resolved = complaint_list(env.data_path(), Some("resolved"), None).unwrap();
        assert_eq!(resolved.counts.total, 0);
    }

    #[test]
    fn test_default_profile_config_fallback() {
        let (env, student, _) = setup();
        config_set(env.data_path(), "default_profile", &student).unwrap();

        let result =
            complaint_submit(env.data_path(), None, "Wifi down", "technical", "desc").unwrap();
        assert_eq!(result.complaint.student_id, student);
    }

    #[test]
    fn test_missing_actor_is_rejected() {
        let env = TestEnv::new();
        system_init(env.data_path()).unwrap();
        let result = complaint_submit(env.data_path(), None, "T", "other", "d");
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_summary_counts() {
        let (env, student, staff) = setup();
        for i in 0..3 {
            complaint_submit(
                env.data_path(),
                Some(&student),
                &format!("Complaint {}", i),
                "other",
                "d",
            )
            .unwrap();
        }
        let ids: Vec<String> = complaint_list(env.data_path(), None, None)
            .unwrap()
            .complaints
            .iter()
            .map(|d| d.complaint.id.clone())
            .collect();
        complaint_set_status(env.data_path(), &ids[0], "resolved", Some(&staff)).unwrap();

        let summary = complaint_summary(env.data_path()).unwrap();
        assert_eq!(summary.counts.open, 2);
        assert_eq!(summary.counts.resolved, 1);
        assert_eq!(summary.counts.total, 3);
    }

    #[test]
    fn test_profile_duplicate_email_rejected() {
        let (env, _, _) = setup();
        let result = profile_register(env.data_path(), "Dup", "sam@example.edu", "student");
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_uninitialized_store_errors() {
        let env = TestEnv::new();
        let result = complaint_list(env.data_path(), None, None);
        assert!(matches!(result, Err(Error::NotInitialized)));
    }
}
