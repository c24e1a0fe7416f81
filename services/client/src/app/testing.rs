//! services/client/src/app/testing.rs
//!
//! Shared fakes for the app-layer tests: an in-memory portal with call
//! counters, a recording navigator, and session/task fixtures.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use campus_portal_core::domain::{
    CompletionRequest, PrincipalStatistics, Role, Session, StaffHome, Task, TaskStatus,
    UserProfile,
};
use campus_portal_core::ports::{Destination, Navigator, PortError, PortResult, PortalService};
use campus_portal_core::session::SessionStore;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use tokio::sync::Notify;

use crate::app::guard::{Clearance, GuardConfig, GuardDecision, RouteGuard};

/// An in-memory `PortalService` whose task list can be swapped, gated, or
/// made to fail, with per-operation call counters.
#[derive(Default)]
pub(crate) struct MockPortal {
    tasks: Mutex<Vec<Task>>,
    gate: Mutex<Option<Arc<Notify>>>,
    listing_error: Mutex<Option<String>>,
    completion_error: Mutex<Option<String>>,
    pub list_calls: AtomicUsize,
    pub complete_calls: AtomicUsize,
    pub user_calls: AtomicUsize,
    pub principal_calls: AtomicUsize,
    pub staff_calls: AtomicUsize,
}

impl MockPortal {
    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        let portal = Self::default();
        *portal.tasks.lock().unwrap() = tasks;
        portal
    }

    pub fn set_tasks(&self, tasks: Vec<Task>) {
        *self.tasks.lock().unwrap() = tasks;
    }

    /// Makes every subsequent task listing suspend until the gate is
    /// notified, so tests can observe in-flight refreshes.
    pub fn set_gate(&self, gate: Arc<Notify>) {
        *self.gate.lock().unwrap() = Some(gate);
    }

    pub fn fail_listing(&self, message: &str) {
        *self.listing_error.lock().unwrap() = Some(message.to_string());
    }

    pub fn fail_completion(&self, message: &str) {
        *self.completion_error.lock().unwrap() = Some(message.to_string());
    }

    pub fn total_fetches(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
            + self.user_calls.load(Ordering::SeqCst)
            + self.principal_calls.load(Ordering::SeqCst)
            + self.staff_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PortalService for MockPortal {
    async fn current_user(&self) -> PortResult<UserProfile> {
        self.user_calls.fetch_add(1, Ordering::SeqCst);
        Ok(UserProfile {
            username: "asha".to_string(),
            email: "asha@school.example".to_string(),
            role: Role::Student,
        })
    }

    async fn principal_dashboard(&self) -> PortResult<PrincipalStatistics> {
        self.principal_calls.fetch_add(1, Ordering::SeqCst);
        Ok(PrincipalStatistics {
            total_students: 412,
            total_staff: 28,
            total_announcements: 5,
        })
    }

    async fn staff_home(&self) -> PortResult<StaffHome> {
        self.staff_calls.fetch_add(1, Ordering::SeqCst);
        Ok(StaffHome {
            display_name: "A. Mehta".to_string(),
            department: Some("Mathematics".to_string()),
        })
    }

    async fn list_my_tasks(&self) -> PortResult<Vec<Task>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let gate = self.gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        if let Some(message) = self.listing_error.lock().unwrap().clone() {
            return Err(PortError::Network(message));
        }
        Ok(self.tasks.lock().unwrap().clone())
    }

    async fn complete_task(&self, task_id: i64, request: CompletionRequest) -> PortResult<Task> {
        self.complete_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = self.completion_error.lock().unwrap().clone() {
            return Err(PortError::Api(message));
        }
        let mut tasks = self.tasks.lock().unwrap();
        let task = tasks
            .iter_mut()
            .find(|t| t.id == task_id)
            .ok_or_else(|| PortError::NotFound(format!("Task {}", task_id)))?;
        task.status = TaskStatus::Completed;
        task.students_present = Some(request.students_present);
        task.completion_notes = request.completion_notes;
        task.completed_at = Some(Utc::now());
        Ok(task.clone())
    }
}

/// Records every redirect the guard issues.
#[derive(Default)]
pub(crate) struct RecordingNavigator {
    destinations: Mutex<Vec<Destination>>,
}

impl RecordingNavigator {
    pub fn destinations(&self) -> Vec<Destination> {
        self.destinations.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn redirect(&self, destination: Destination) {
        self.destinations.lock().unwrap().push(destination);
    }
}

pub(crate) fn session_expiring_in(role: Role, expires_in: Duration) -> Session {
    Session {
        token: "test-token".to_string(),
        expires_at: Utc::now() + expires_in,
        role,
    }
}

/// Obtains a clearance through the public guard path with a fresh session.
pub(crate) fn clearance_for(role: Role) -> Clearance {
    let store = SessionStore::new();
    store
        .writer()
        .install(session_expiring_in(role, Duration::minutes(5)));
    let guard = RouteGuard::new(
        store.reader(),
        Arc::new(RecordingNavigator::default()),
        GuardConfig::default(),
    );
    match guard.check() {
        GuardDecision::Allowed(clearance) => clearance,
        other => panic!("fresh session must pass the guard, got {:?}", other),
    }
}

pub(crate) fn pending_task(id: i64, total_students: Option<u32>) -> Task {
    Task {
        id,
        branch: format!("Grade {}A", id),
        medium: "English".to_string(),
        academic_year: "2024-25".to_string(),
        target_date: NaiveDate::from_ymd_opt(2024, 7, 1).unwrap(),
        assigned_by: "principal".to_string(),
        total_students,
        status: TaskStatus::Pending,
        students_present: None,
        completion_notes: None,
        completed_at: None,
    }
}

pub(crate) fn completed_task(
    id: i64,
    instant: &str,
    students_present: u32,
    total_students: Option<u32>,
) -> Task {
    let mut task = pending_task(id, total_students);
    task.status = TaskStatus::Completed;
    task.students_present = Some(students_present);
    task.completed_at = Some(
        instant
            .parse::<DateTime<Utc>>()
            .expect("test instant must parse"),
    );
    task
}
