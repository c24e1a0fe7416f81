//! crates/campus_portal_core/src/domain.rs
//!
//! Defines the pure, core data structures for the portal client.
//! These structs are independent of any transport or serialization format.

use chrono::{DateTime, NaiveDate, Utc};

/// The role carried by an authenticated portal session.
///
/// The portal recognises exactly these three roles; every dispatch over
/// them is an exhaustive match so a new role cannot be added silently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Student,
    Staff,
    Principal,
}

impl Role {
    /// Parses the wire representation of a role.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "student" => Some(Role::Student),
            "staff" => Some(Role::Staff),
            "principal" => Some(Role::Principal),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Staff => "staff",
            Role::Principal => "principal",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The client's evidence of an authenticated identity.
///
/// Created by decoding the credential token handed out at login (external);
/// invalidated by clearing it from the store on logout or expiry detection.
#[derive(Debug, Clone)]
pub struct Session {
    /// The opaque credential token, attached to every portal request.
    pub token: String,
    /// Expiry instant derived from the token's claims.
    pub expires_at: DateTime<Utc>,
    pub role: Role,
}

impl Session {
    /// A session is valid at `now` iff a token is present and `now` is
    /// before the expiry instant. Callers must re-evaluate at use time;
    /// a single evaluation does not stay true.
    pub fn valid_at(&self, now: DateTime<Utc>) -> bool {
        !self.token.is_empty() && now < self.expires_at
    }

    pub fn is_valid(&self) -> bool {
        self.valid_at(Utc::now())
    }
}

/// Status of an attendance task.
///
/// `Overdue` is supplied by the source of truth and is opaque to the
/// client: the only transition the client ever requests is
/// `Pending -> Completed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    Pending,
    Completed,
    Overdue,
}

impl TaskStatus {
    /// Parses the wire representation of a task status.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(TaskStatus::Pending),
            "completed" => Some(TaskStatus::Completed),
            "overdue" => Some(TaskStatus::Overdue),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Completed => "completed",
            TaskStatus::Overdue => "overdue",
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An assigned attendance-recording duty for a specific class and date.
#[derive(Debug, Clone)]
pub struct Task {
    pub id: i64,
    pub branch: String,
    pub medium: String,
    pub academic_year: String,
    pub target_date: NaiveDate,
    pub assigned_by: String,
    /// Total students in the class, when the assignor recorded it.
    pub total_students: Option<u32>,
    pub status: TaskStatus,
    /// Present only once the task is completed.
    pub students_present: Option<u32>,
    pub completion_notes: Option<String>,
    /// Present only once the task is completed.
    pub completed_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Invariant check: `status == Completed` iff `completed_at` is set,
    /// and a known headcount never exceeds a known class size.
    pub fn is_consistent(&self) -> bool {
        let completion_matches =
            (self.status == TaskStatus::Completed) == self.completed_at.is_some();
        let within_class_size = match (self.students_present, self.total_students) {
            (Some(present), Some(total)) => present <= total,
            _ => true,
        };
        completion_matches && within_class_size
    }
}

/// The payload sent when completing a task.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub students_present: u32,
    pub completion_notes: Option<String>,
}

/// Transient, per-task completion form state. Holds raw user input;
/// validation is deferred to submission so partial input is always
/// representable. Never persisted.
#[derive(Debug, Clone, Default)]
pub struct CompletionForm {
    pub students_present: String,
    pub notes: String,
}

/// The authenticated user's profile, as reported by the portal.
#[derive(Debug, Clone)]
pub struct UserProfile {
    pub username: String,
    pub email: String,
    pub role: Role,
}

/// Institution-wide statistics shown on the principal dashboard.
#[derive(Debug, Clone)]
pub struct PrincipalStatistics {
    pub total_students: u32,
    pub total_staff: u32,
    pub total_announcements: u32,
}

/// The profile card shown above a staff member's task list.
#[derive(Debug, Clone)]
pub struct StaffHome {
    pub display_name: String,
    pub department: Option<String>,
}
