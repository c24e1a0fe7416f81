//! crates/campus_portal_core/src/stats.rs
//!
//! Derived attendance statistics. Every value here is a pure function over
//! the task collection; nothing is cached, so the numbers cannot drift from
//! the underlying data.

use chrono::NaiveDate;

use crate::domain::{Task, TaskStatus};

/// What the dashboard shows for a completed task's attendance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AttendanceFigure {
    /// `students_present / total_students * 100`; only when the class
    /// size is known and non-zero.
    Percent(f64),
    /// The raw present count, shown when no percentage is defined.
    Headcount(u32),
}

/// Attendance percentage for a completed task, when defined.
///
/// Returns `None` for tasks that are not completed, have no recorded
/// headcount, or whose class size is unknown or zero.
pub fn attendance_percentage(task: &Task) -> Option<f64> {
    if task.status != TaskStatus::Completed {
        return None;
    }
    let present = task.students_present?;
    let total = task.total_students?;
    if total == 0 {
        return None;
    }
    Some(f64::from(present) / f64::from(total) * 100.0)
}

/// The attendance figure to display for a task, if any.
pub fn attendance_figure(task: &Task) -> Option<AttendanceFigure> {
    if task.status != TaskStatus::Completed {
        return None;
    }
    let present = task.students_present?;
    match attendance_percentage(task) {
        Some(percent) => Some(AttendanceFigure::Percent(percent)),
        None => Some(AttendanceFigure::Headcount(present)),
    }
}

/// Completed tasks whose completion instant falls on `date`, or all
/// completed tasks when no date is given. Tasks lacking a completion
/// instant are excluded rather than raising an error.
pub fn completed_on(tasks: &[Task], date: Option<NaiveDate>) -> Vec<&Task> {
    tasks
        .iter()
        .filter(|task| task.status == TaskStatus::Completed)
        .filter(|task| match (date, task.completed_at) {
            (None, Some(_)) => true,
            (Some(wanted), Some(at)) => at.date_naive() == wanted,
            (_, None) => false,
        })
        .collect()
}

pub fn pending_count(tasks: &[Task]) -> usize {
    tasks
        .iter()
        .filter(|task| task.status == TaskStatus::Pending)
        .count()
}
