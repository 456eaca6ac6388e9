//! Status bucket aggregation for complaint collections.
//!
//! This module provides the pure partition behind `gripe summary` and the
//! staff list header: complaints grouped into open / in_progress / resolved
//! buckets by status equality, with per-bucket counts.

use serde::Serialize;

use super::{Complaint, ComplaintStatus};

/// Complaints partitioned by status.
///
/// Partitioning is by enum equality, so every complaint lands in exactly
/// one bucket and the union of the buckets equals the input collection.
#[derive(Debug, Clone, Default)]
pub struct StatusBuckets {
    /// Complaints with status `open`
    pub open: Vec<Complaint>,
    /// Complaints with status `in_progress`
    pub in_progress: Vec<Complaint>,
    /// Complaints with status `resolved`
    pub resolved: Vec<Complaint>,
}

impl StatusBuckets {
    /// Get the bucket for a status.
    pub fn bucket(&self, status: ComplaintStatus) -> &[Complaint] {
        match status {
            ComplaintStatus::Open => &self.open,
            ComplaintStatus::InProgress => &self.in_progress,
            ComplaintStatus::Resolved => &self.resolved,
        }
    }

    /// Per-bucket counts.
    pub fn counts(&self) -> StatusCounts {
        StatusCounts {
            open: self.open.len(),
            in_progress: self.in_progress.len(),
            resolved: self.resolved.len(),
            total: self.open.len() + self.in_progress.len() + self.resolved.len(),
        }
    }
}

/// Per-status complaint counts, as shown on the staff dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub open: usize,
    pub in_progress: usize,
    pub resolved: usize,
    pub total: usize,
}

/// Partition a complaint collection into status buckets.
///
/// Pure and deterministic: no mutation of the input, same input yields the
/// same buckets. Input order is preserved within each bucket.
pub fn partition_by_status(complaints: &[Complaint]) -> StatusBuckets {
    let mut buckets = StatusBuckets::default();
    for complaint in complaints {
        match complaint.status {
            ComplaintStatus::Open => buckets.open.push(complaint.clone()),
            ComplaintStatus::InProgress => buckets.in_progress.push(complaint.clone()),
            ComplaintStatus::Resolved => buckets.resolved.push(complaint.clone()),
        }
    }
    buckets
}
