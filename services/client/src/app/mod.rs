pub mod auth;
pub mod completion;
pub mod dashboard;
pub mod guard;
pub mod notices;
pub mod state;
pub mod tasks;

#[cfg(test)]
pub(crate) mod testing;

// Re-export the pieces a view needs to assemble itself.
pub use completion::{CompletionWorkflow, FormField, SubmitError};
pub use dashboard::{DashboardAggregator, DashboardContent};
pub use guard::{Clearance, GuardConfig, GuardDecision, GuardHandle, RouteGuard};
pub use notices::{Notice, NoticeBoard, NoticeLevel};
pub use state::AppState;
pub use tasks::TaskStore;
