//! services/client/src/app/dashboard.rs
//!
//! Role-based dashboard composition: the one place where task data becomes
//! human-facing statistics. All derived figures are recomputed from the
//! task store on every load; nothing here caches state that could drift.

use std::sync::Arc;

use campus_portal_core::domain::{
    PrincipalStatistics, Role, StaffHome, Task, TaskStatus, UserProfile,
};
use campus_portal_core::ports::{PortResult, PortalService};
use campus_portal_core::stats::{self, AttendanceFigure};
use chrono::NaiveDate;

use crate::app::guard::Clearance;
use crate::app::tasks::TaskStore;

/// Presentation cap for the completed-task grid. The underlying filtered
/// count stays exact; only the rendered entries are truncated.
pub const COMPLETED_GRID_LIMIT: usize = 6;

//=========================================================================================
// Rendered Content Types
//=========================================================================================

/// The content variant for the cleared role. Exhaustive by construction:
/// a new role cannot ship without a dashboard.
#[derive(Debug)]
pub enum DashboardContent {
    Student(UserProfile),
    Staff(Box<StaffView>),
    Principal(PrincipalStatistics),
}

/// Everything the staff dashboard shows.
#[derive(Debug)]
pub struct StaffView {
    pub home: StaffHome,
    /// Pending-task count badge.
    pub pending_badge: usize,
    pub pending: Vec<Task>,
    pub completed: CompletedGrid,
}

/// The (possibly date-filtered) completed-task grid.
#[derive(Debug)]
pub struct CompletedGrid {
    pub entries: Vec<CompletedEntry>,
    /// How many entries are rendered ("showing N of M": this is N).
    pub shown: usize,
    /// The exact filtered count ("showing N of M": this is M).
    pub total: usize,
    pub filter: Option<NaiveDate>,
}

#[derive(Debug)]
pub struct CompletedEntry {
    pub task: Task,
    /// Percentage when the class size is known and non-zero, raw
    /// headcount otherwise; absent for records missing a headcount.
    pub attendance: Option<AttendanceFigure>,
}

//=========================================================================================
// The Aggregator
//=========================================================================================

pub struct DashboardAggregator {
    api: Arc<dyn PortalService>,
    tasks: Arc<TaskStore>,
}

impl DashboardAggregator {
    pub fn new(api: Arc<dyn PortalService>, tasks: Arc<TaskStore>) -> Self {
        Self { api, tasks }
    }

    /// Loads the dashboard for the cleared role.
    ///
    /// Fetches only what that role's variant needs; the staff variant also
    /// refreshes the task store before deriving its figures.
    pub async fn load(
        &self,
        clearance: &Clearance,
        completed_filter: Option<NaiveDate>,
    ) -> PortResult<DashboardContent> {
        match clearance.role() {
            Role::Student => Ok(DashboardContent::Student(self.api.current_user().await?)),
            Role::Principal => Ok(DashboardContent::Principal(
                self.api.principal_dashboard().await?,
            )),
            Role::Staff => {
                let home = self.api.staff_home().await?;
                self.tasks.refresh(clearance).await?;
                let snapshot = self.tasks.snapshot().await;
                Ok(DashboardContent::Staff(Box::new(StaffView {
                    home,
                    pending_badge: stats::pending_count(&snapshot),
                    pending: snapshot
                        .iter()
                        .filter(|task| task.status == TaskStatus::Pending)
                        .cloned()
                        .collect(),
                    completed: completed_grid(&snapshot, completed_filter),
                })))
            }
        }
    }

    /// Re-derives the completed grid for a new date filter without
    /// refetching; the cached collection is the single source of truth.
    pub async fn completed_grid(&self, completed_filter: Option<NaiveDate>) -> CompletedGrid {
        let snapshot = self.tasks.snapshot().await;
        completed_grid(&snapshot, completed_filter)
    }
}

fn completed_grid(tasks: &[Task], filter: Option<NaiveDate>) -> CompletedGrid {
    let matching = stats::completed_on(tasks, filter);
    let total = matching.len();
    let entries: Vec<CompletedEntry> = matching
        .into_iter()
        .take(COMPLETED_GRID_LIMIT)
        .map(|task| CompletedEntry {
            attendance: stats::attendance_figure(task),
            task: task.clone(),
        })
        .collect();
    CompletedGrid {
        shown: entries.len(),
        total,
        entries,
        filter,
    }
}
