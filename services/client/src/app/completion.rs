//! services/client/src/app/completion.rs
//!
//! The per-task completion workflow: transient form state, deferred
//! validation, a single submission call, and the post-success refresh.

use std::collections::HashMap;
use std::sync::Arc;

use campus_portal_core::domain::{CompletionForm, CompletionRequest, Task};
use campus_portal_core::ports::{PortError, PortalService};
use tracing::{error, info, warn};

use crate::app::guard::Clearance;
use crate::app::notices::NoticeBoard;
use crate::app::tasks::TaskStore;

const GENERIC_SUBMIT_FAILURE: &str = "Failed to submit attendance. Please try again.";

/// Errors surfaced inline by a submission attempt.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    /// Rejected before any network call; the form is left untouched.
    #[error("{0}")]
    Validation(String),
    /// The server rejected the submission; the form is kept for retry.
    #[error("{0}")]
    Submission(String),
}

/// Which completion-form field an edit targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    StudentsPresent,
    Notes,
}

/// Manages the completion forms for the pending tasks of one view.
pub struct CompletionWorkflow {
    api: Arc<dyn PortalService>,
    tasks: Arc<TaskStore>,
    forms: HashMap<i64, CompletionForm>,
}

impl CompletionWorkflow {
    pub fn new(api: Arc<dyn PortalService>, tasks: Arc<TaskStore>) -> Self {
        Self {
            api,
            tasks,
            forms: HashMap::new(),
        }
    }

    /// Records an edit to a task's form. No validation happens here, so
    /// partial input is always representable; the form is created lazily
    /// on first edit.
    pub fn update_field(&mut self, task_id: i64, field: FormField, value: &str) {
        let form = self.forms.entry(task_id).or_default();
        match field {
            FormField::StudentsPresent => form.students_present = value.to_string(),
            FormField::Notes => form.notes = value.to_string(),
        }
    }

    pub fn form(&self, task_id: i64) -> Option<&CompletionForm> {
        self.forms.get(&task_id)
    }

    /// Submits a task's completion form.
    ///
    /// Exactly one network call per invocation, and only after the form
    /// validates. On success the form is cleared, the task store is
    /// refreshed, and a success notice is posted; on failure the form
    /// stays intact and the server's detail message (or a generic one)
    /// is posted for the user to dismiss.
    pub async fn submit(
        &mut self,
        task_id: i64,
        clearance: &Clearance,
        notices: &mut NoticeBoard,
    ) -> Result<Task, SubmitError> {
        // 1. Validate locally; validation failures never reach the network.
        let form = self.forms.get(&task_id).cloned().unwrap_or_default();
        let raw = form.students_present.trim();
        if raw.is_empty() {
            return Err(SubmitError::Validation(
                "Students present is required".to_string(),
            ));
        }
        let students_present: u32 = raw.parse().map_err(|_| {
            SubmitError::Validation(
                "Students present must be a non-negative whole number".to_string(),
            )
        })?;
        let known_total = self
            .tasks
            .snapshot()
            .await
            .iter()
            .find(|task| task.id == task_id)
            .and_then(|task| task.total_students);
        if let Some(total) = known_total {
            // The server remains the final authority on acceptance.
            if students_present > total {
                return Err(SubmitError::Validation(format!(
                    "Students present cannot exceed the class size of {}",
                    total
                )));
            }
        }

        let notes = form.notes.trim();
        let request = CompletionRequest {
            students_present,
            completion_notes: (!notes.is_empty()).then(|| notes.to_string()),
        };

        // 2. The one network call.
        match self.api.complete_task(task_id, request).await {
            Ok(updated) => {
                info!(task_id, students_present, "attendance recorded");
                self.forms.remove(&task_id);
                notices.post_success(format!("Attendance recorded for {}", updated.branch));

                // 3. Refresh strictly after the submission succeeded.
                if let Err(refresh_err) = self.tasks.refresh(clearance).await {
                    warn!(task_id, error = %refresh_err, "post-completion task refresh failed");
                    notices.post_error("Attendance was recorded, but the task list could not be refreshed.");
                }
                Ok(updated)
            }
            Err(err) => {
                error!(task_id, error = %err, "attendance submission failed");
                let message = match err {
                    PortError::Api(detail) => detail,
                    _ => GENERIC_SUBMIT_FAILURE.to_string(),
                };
                notices.post_error(message.clone());
                Err(SubmitError::Submission(message))
            }
        }
    }
}
