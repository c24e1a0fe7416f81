//! services/client/src/adapters/http.rs
//!
//! This module contains the HTTP adapter, which is the concrete implementation
//! of the `PortalService` port from the `core` crate. It handles all requests
//! to the portal's REST API using `reqwest`.

use std::time::Duration;

use async_trait::async_trait;
use campus_portal_core::domain::{
    CompletionRequest, PrincipalStatistics, Role, StaffHome, Task, TaskStatus, UserProfile,
};
use campus_portal_core::ports::{PortError, PortResult, PortalService};
use campus_portal_core::session::SessionReader;
use chrono::{DateTime, NaiveDate, Utc};
use reqwest::StatusCode;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::warn;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An HTTP adapter that implements the `PortalService` port.
///
/// The bearer token is read from the session store at call time, so a
/// cleared session fails fast without touching the network.
#[derive(Clone)]
pub struct HttpPortalAdapter {
    client: reqwest::Client,
    base_url: String,
    session: SessionReader,
}

impl HttpPortalAdapter {
    /// Creates a new `HttpPortalAdapter`.
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        session: SessionReader,
    ) -> PortResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PortError::Unexpected(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// The current credential, re-read on every call.
    fn bearer(&self) -> PortResult<String> {
        self.session
            .current()
            .map(|s| s.token)
            .ok_or(PortError::Unauthorized)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, what: &str) -> PortResult<T> {
        let response = self
            .client
            .get(self.url(path))
            .bearer_auth(self.bearer()?)
            .send()
            .await
            .map_err(|e| PortError::Network(e.to_string()))?;
        read_json(response, what).await
    }
}

/// Parses a response body after mapping non-success statuses to port errors.
async fn read_json<T: DeserializeOwned>(response: reqwest::Response, what: &str) -> PortResult<T> {
    let status = response.status();
    if !status.is_success() {
        return Err(error_for(status, response, what).await);
    }
    response
        .json::<T>()
        .await
        .map_err(|e| PortError::Unexpected(format!("Malformed {} response: {}", what, e)))
}

/// Maps a non-success status to the port error taxonomy, pulling the
/// server's `detail` message out of the body when one is present.
async fn error_for(status: StatusCode, response: reqwest::Response, what: &str) -> PortError {
    match status {
        StatusCode::UNAUTHORIZED => PortError::Unauthorized,
        StatusCode::FORBIDDEN => PortError::Forbidden,
        StatusCode::NOT_FOUND => PortError::NotFound(what.to_string()),
        _ => {
            let detail = response
                .json::<ErrorBody>()
                .await
                .ok()
                .map(|body| body.detail);
            PortError::Api(
                detail.unwrap_or_else(|| format!("{} failed with status {}", what, status)),
            )
        }
    }
}

//=========================================================================================
// "Impure" Wire Record Structs
//=========================================================================================

/// The error payload the portal returns on failed requests.
#[derive(Deserialize)]
struct ErrorBody {
    detail: String,
}

#[derive(Deserialize)]
struct UserProfileRecord {
    username: String,
    email: String,
    role: String,
}

impl UserProfileRecord {
    fn to_domain(self) -> PortResult<UserProfile> {
        let role = Role::parse(&self.role)
            .ok_or_else(|| PortError::Unexpected(format!("Unknown role '{}'", self.role)))?;
        Ok(UserProfile {
            username: self.username,
            email: self.email,
            role,
        })
    }
}

#[derive(Deserialize)]
struct PrincipalDashboardRecord {
    statistics: PrincipalStatisticsRecord,
}

#[derive(Deserialize)]
struct PrincipalStatisticsRecord {
    total_students: u32,
    total_staff: u32,
    #[serde(default)]
    total_announcements: u32,
}

impl PrincipalDashboardRecord {
    fn to_domain(self) -> PrincipalStatistics {
        PrincipalStatistics {
            total_students: self.statistics.total_students,
            total_staff: self.statistics.total_staff,
            total_announcements: self.statistics.total_announcements,
        }
    }
}

#[derive(Deserialize)]
struct StaffHomeRecord {
    display_name: String,
    department: Option<String>,
}

impl StaffHomeRecord {
    fn to_domain(self) -> StaffHome {
        StaffHome {
            display_name: self.display_name,
            department: self.department,
        }
    }
}

#[derive(Deserialize)]
struct TaskRecord {
    id: i64,
    branch: String,
    medium: String,
    academic_year: String,
    target_date: NaiveDate,
    assigned_by: String,
    total_students: Option<u32>,
    status: String,
    students_present: Option<u32>,
    completion_notes: Option<String>,
    completed_at: Option<DateTime<Utc>>,
}

impl TaskRecord {
    fn to_domain(self) -> PortResult<Task> {
        let status = TaskStatus::parse(&self.status).ok_or_else(|| {
            PortError::Unexpected(format!("Unknown task status '{}'", self.status))
        })?;
        let task = Task {
            id: self.id,
            branch: self.branch,
            medium: self.medium,
            academic_year: self.academic_year,
            target_date: self.target_date,
            assigned_by: self.assigned_by,
            total_students: self.total_students,
            status,
            students_present: self.students_present,
            completion_notes: self.completion_notes,
            completed_at: self.completed_at,
        };
        if !task.is_consistent() {
            // The server is the source of truth; pass the record through
            // but leave a trace for the inevitable support ticket.
            warn!(task_id = task.id, status = %task.status, "task record violates completion invariant");
        }
        Ok(task)
    }
}

#[derive(Serialize)]
struct CompleteTaskBody<'a> {
    students_present: u32,
    completion_notes: Option<&'a str>,
}

//=========================================================================================
// `PortalService` Trait Implementation
//=========================================================================================

#[async_trait]
impl PortalService for HttpPortalAdapter {
    async fn current_user(&self) -> PortResult<UserProfile> {
        let record: UserProfileRecord = self.get_json("/users/me", "user profile").await?;
        record.to_domain()
    }

    async fn principal_dashboard(&self) -> PortResult<PrincipalStatistics> {
        let record: PrincipalDashboardRecord = self
            .get_json("/dashboards/principal", "principal dashboard")
            .await?;
        Ok(record.to_domain())
    }

    async fn staff_home(&self) -> PortResult<StaffHome> {
        let record: StaffHomeRecord = self.get_json("/dashboards/staff", "staff dashboard").await?;
        Ok(record.to_domain())
    }

    async fn list_my_tasks(&self) -> PortResult<Vec<Task>> {
        let records: Vec<TaskRecord> = self.get_json("/attendance/tasks", "task list").await?;
        records.into_iter().map(TaskRecord::to_domain).collect()
    }

    async fn complete_task(&self, task_id: i64, request: CompletionRequest) -> PortResult<Task> {
        let body = CompleteTaskBody {
            students_present: request.students_present,
            completion_notes: request.completion_notes.as_deref(),
        };
        let response = self
            .client
            .post(self.url(&format!("/attendance/tasks/{}/complete", task_id)))
            .bearer_auth(self.bearer()?)
            .json(&body)
            .send()
            .await
            .map_err(|e| PortError::Network(e.to_string()))?;
        let record: TaskRecord = read_json(response, "task completion").await?;
        record.to_domain()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn task_record_parses_a_completed_task() {
        let record: TaskRecord = serde_json::from_value(json!({
            "id": 7,
            "branch": "Grade 8A",
            "medium": "English",
            "academic_year": "2024-25",
            "target_date": "2024-07-01",
            "assigned_by": "principal",
            "total_students": 40,
            "status": "completed",
            "students_present": 36,
            "completion_notes": "two absentees reported sick",
            "completed_at": "2024-07-01T10:15:00Z"
        }))
        .unwrap();

        let task = record.to_domain().unwrap();
        assert_eq!(task.id, 7);
        assert_eq!(task.status, TaskStatus::Completed);
        assert_eq!(task.students_present, Some(36));
        assert!(task.completed_at.is_some());
        assert!(task.is_consistent());
    }

    #[test]
    fn task_record_parses_a_pending_task_with_sparse_fields() {
        let record: TaskRecord = serde_json::from_value(json!({
            "id": 8,
            "branch": "Grade 9B",
            "medium": "Gujarati",
            "academic_year": "2024-25",
            "target_date": "2024-07-02",
            "assigned_by": "principal",
            "total_students": null,
            "status": "pending",
            "students_present": null,
            "completion_notes": null,
            "completed_at": null
        }))
        .unwrap();

        let task = record.to_domain().unwrap();
        assert_eq!(task.status, TaskStatus::Pending);
        assert_eq!(task.total_students, None);
        assert!(task.is_consistent());
    }

    #[test]
    fn unknown_task_status_is_rejected() {
        let record: TaskRecord = serde_json::from_value(json!({
            "id": 9,
            "branch": "Grade 9B",
            "medium": "English",
            "academic_year": "2024-25",
            "target_date": "2024-07-02",
            "assigned_by": "principal",
            "total_students": null,
            "status": "archived",
            "students_present": null,
            "completion_notes": null,
            "completed_at": null
        }))
        .unwrap();

        assert!(matches!(record.to_domain(), Err(PortError::Unexpected(_))));
    }

    #[test]
    fn profile_record_rejects_unknown_roles() {
        let record: UserProfileRecord = serde_json::from_value(json!({
            "username": "asha",
            "email": "asha@school.example",
            "role": "superuser"
        }))
        .unwrap();
        assert!(matches!(record.to_domain(), Err(PortError::Unexpected(_))));
    }

    #[test]
    fn principal_dashboard_record_unwraps_the_statistics_envelope() {
        let record: PrincipalDashboardRecord = serde_json::from_value(json!({
            "statistics": {"total_students": 412, "total_staff": 28}
        }))
        .unwrap();
        let stats = record.to_domain();
        assert_eq!(stats.total_students, 412);
        assert_eq!(stats.total_staff, 28);
        // Absent in older portal versions.
        assert_eq!(stats.total_announcements, 0);
    }
}
