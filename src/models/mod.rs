//! Data models for Gripe entities.
//!
//! This module defines the core data structures:
//! - `Complaint` - Student-submitted issues with category and status
//! - `ComplaintResponse` - Staff replies attached to a complaint (append-only)
//! - `Profile` - Identities that submit complaints and author responses
//! - `ComplaintDetail` - A complaint hydrated with its author and responses

pub mod buckets;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Complaint status in the workflow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplaintStatus {
    #[default]
    Open,
    InProgress,
    Resolved,
}

impl ComplaintStatus {
    /// Get all statuses in workflow order.
    pub fn all() -> &'static [ComplaintStatus] {
        &[
            ComplaintStatus::Open,
            ComplaintStatus::InProgress,
            ComplaintStatus::Resolved,
        ]
    }
}

impl fmt::Display for ComplaintStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ComplaintStatus::Open => "open",
            ComplaintStatus::InProgress => "in_progress",
            ComplaintStatus::Resolved => "resolved",
        };
        write!(f, "{}", s)
    }
}

impl std::str::FromStr for ComplaintStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "open" => Ok(ComplaintStatus::Open),
            "in_progress" | "in-progress" | "inprogress" => Ok(ComplaintStatus::InProgress),
            "resolved" => Ok(ComplaintStatus::Resolved),
            _ => Err(format!("Unknown status: {}", s)),
        }
    }
}

/// Complaint category, fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplaintCategory {
    Academics,
    Administration,
    Facilities,
    Technical,
    Other,
}

impl ComplaintCategory {
    /// Get all categories.
    pub fn all() -> &'static [ComplaintCategory] {
        &[
            ComplaintCategory::Academics,
            ComplaintCategory::Administration,
            ComplaintCategory::Facilities,
            ComplaintCategory::Technical,
            ComplaintCategory::Other,
        ]
    }
}

impl fmt::Display for ComplaintCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ComplaintCategory::Academics => "academics",
            ComplaintCategory::Administration => "administration",
            ComplaintCategory::Facilities => "facilities",
            ComplaintCategory::Technical => "technical",
            ComplaintCategory::Other => "other",
        };
        write!(f, "{}", s)
    }
}

impl std::str::FromStr for ComplaintCategory {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "academics" => Ok(ComplaintCategory::Academics),
            "administration" => Ok(ComplaintCategory::Administration),
            "facilities" => Ok(ComplaintCategory::Facilities),
            "technical" => Ok(ComplaintCategory::Technical),
            "other" => Ok(ComplaintCategory::Other),
            _ => Err(format!("Unknown category: {}", s)),
        }
    }
}

/// Profile role. Staff and admins triage complaints; students submit them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[default]
    Student,
    Staff,
    Admin,
}

impl Role {
    /// Returns true if this role may update status and respond to complaints.
    pub fn can_triage(&self) -> bool {
        matches!(self, Role::Staff | Role::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Role::Student => "student",
            Role::Staff => "staff",
            Role::Admin => "admin",
        };
        write!(f, "{}", s)
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "student" => Ok(Role::Student),
            "staff" => Ok(Role::Staff),
            "admin" => Ok(Role::Admin),
            _ => Err(format!("Unknown role: {}", s)),
        }
    }
}

/// A complaint tracked by Gripe.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Complaint {
    /// Unique identifier (e.g., "gr-a1b2")
    pub id: String,

    /// Entity type marker
    #[serde(rename = "type")]
    pub entity_type: String,

    /// Owning student profile ID, immutable after creation
    pub student_id: String,

    /// Complaint title
    pub title: String,

    /// Detailed description
    pub description: String,

    /// Category, fixed at creation
    pub category: ComplaintCategory,

    /// Current status
    #[serde(default)]
    pub status: ComplaintStatus,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Complaint {
    /// Create a new complaint. Status always starts at `open`; there is no
    /// way for a caller to supply a different one.
    pub fn new(
        id: String,
        student_id: String,
        title: String,
        category: ComplaintCategory,
        description: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            entity_type: "complaint".to_string(),
            student_id,
            title,
            description,
            category,
            status: ComplaintStatus::default(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// A staff response attached to a complaint. Append-only: responses are
/// never edited or deleted once recorded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplaintResponse {
    /// Unique identifier (UUID)
    pub id: String,

    /// Entity type marker
    #[serde(rename = "type")]
    pub entity_type: String,

    /// Parent complaint ID, immutable
    pub complaint_id: String,

    /// Responding profile ID
    pub responder_id: String,

    /// Response text
    pub message: String,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl ComplaintResponse {
    /// Create a new response with the given ID, parent, responder, and message.
    pub fn new(id: String, complaint_id: String, responder_id: String, message: String) -> Self {
        Self {
            id,
            entity_type: "response".to_string(),
            complaint_id,
            responder_id,
            message,
            created_at: Utc::now(),
        }
    }
}

/// An identity known to Gripe.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    /// Unique identifier (e.g., "grp-a1b2")
    pub id: String,

    /// Entity type marker
    #[serde(rename = "type")]
    pub entity_type: String,

    /// Display name
    pub full_name: String,

    /// Contact email
    pub email: String,

    /// Role
    #[serde(default)]
    pub role: Role,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Profile {
    /// Create a new profile with the given ID, name, email, and role.
    pub fn new(id: String, full_name: String, email: String, role: Role) -> Self {
        Self {
            id,
            entity_type: "profile".to_string(),
            full_name,
            email,
            role,
            created_at: Utc::now(),
        }
    }
}

/// A complaint hydrated with its author and responses for display.
///
/// The author is `None` when the owning profile is missing from the store
/// (imported data); responses are ordered oldest-first.
#[derive(Debug, Clone, Serialize)]
pub struct ComplaintDetail {
    /// The underlying complaint, serialized at the top level
    #[serde(flatten)]
    pub complaint: Complaint,
    /// Owning student profile, if known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<Profile>,
    /// Responses, oldest first
    pub responses: Vec<ComplaintResponse>,
}
