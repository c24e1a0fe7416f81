//! services/client/src/bin/client.rs

use std::sync::Arc;

use campus_portal_core::ports::{Destination, Navigator};
use campus_portal_core::session::SessionStore;
use campus_portal_core::AttendanceFigure;
use chrono::NaiveDate;
use client_lib::{
    adapters::HttpPortalAdapter,
    app::{auth::install_session, AppState, DashboardContent, GuardDecision},
    config::Config,
    error::ClientError,
};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// A navigator for the terminal driver: a redirect is reported, and the
/// run ends on the next check of the loop.
struct LogNavigator;

impl Navigator for LogNavigator {
    fn redirect(&self, destination: Destination) {
        warn!(destination = %destination, "navigation requested");
    }
}

#[tokio::main]
async fn main() -> Result<(), ClientError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting portal client...");

    // --- 2. Build the Adapter and Shared State ---
    // The adapter reads the credential from the session store at call
    // time, so the store must exist before the adapter.
    let session_store = SessionStore::new();
    let api = Arc::new(HttpPortalAdapter::new(
        config.api_base_url.clone(),
        config.request_timeout,
        session_store.reader(),
    )?);
    let state = AppState::new(api, Arc::new(LogNavigator), config.clone(), session_store);

    // --- 3. Install the Session from the Configured Token ---
    let token = config.portal_token.clone().ok_or_else(|| {
        ClientError::Internal("PORTAL_TOKEN is required to open the portal".to_string())
    })?;
    let session = install_session(&state.session.writer(), &token)?;

    // --- 4. Run the Guard for the Dashboard View ---
    let guard = state.guard();
    let clearance = match guard.check() {
        GuardDecision::Allowed(clearance) => clearance,
        _ => {
            warn!("session was rejected; sign in again to obtain a fresh token");
            return Ok(());
        }
    };
    let watch = guard.watch();
    info!(role = %session.role, "session accepted, loading dashboard");

    // --- 5. Load and Render the Role Dashboard ---
    let date_filter = completed_filter_from_env()?;
    let content = state.dashboard().load(&clearance, date_filter).await?;
    render(&content);

    // --- 6. Keep Re-validating Until Interrupted ---
    info!("press Ctrl-C to close the portal");
    tokio::signal::ctrl_c().await?;
    watch.cancel();
    info!("portal closed");

    Ok(())
}

/// Optional `COMPLETED_ON` date filter for the staff grid (YYYY-MM-DD).
fn completed_filter_from_env() -> Result<Option<NaiveDate>, ClientError> {
    match std::env::var("COMPLETED_ON") {
        Err(_) => Ok(None),
        Ok(raw) => raw
            .parse::<NaiveDate>()
            .map(Some)
            .map_err(|_| {
                ClientError::Internal(format!("'{}' is not a calendar date (YYYY-MM-DD)", raw))
            }),
    }
}

fn render(content: &DashboardContent) {
    match content {
        DashboardContent::Student(profile) => {
            info!(username = %profile.username, email = %profile.email, "student dashboard");
        }
        DashboardContent::Principal(stats) => {
            info!(
                total_students = stats.total_students,
                total_staff = stats.total_staff,
                total_announcements = stats.total_announcements,
                "principal dashboard"
            );
        }
        DashboardContent::Staff(view) => {
            info!(
                staff = %view.home.display_name,
                department = view.home.department.as_deref().unwrap_or("-"),
                pending = view.pending_badge,
                "staff dashboard"
            );
            for task in &view.pending {
                info!(
                    task_id = task.id,
                    branch = %task.branch,
                    target_date = %task.target_date,
                    "pending attendance task"
                );
            }
            info!(
                shown = view.completed.shown,
                total = view.completed.total,
                "completed tasks (showing {} of {})",
                view.completed.shown,
                view.completed.total
            );
            for entry in &view.completed.entries {
                match entry.attendance {
                    Some(AttendanceFigure::Percent(pct)) => {
                        info!(task_id = entry.task.id, branch = %entry.task.branch, attendance = %format!("{:.1}%", pct), "completed task");
                    }
                    Some(AttendanceFigure::Headcount(n)) => {
                        info!(task_id = entry.task.id, branch = %entry.task.branch, present = n, "completed task");
                    }
                    None => {
                        info!(task_id = entry.task.id, branch = %entry.task.branch, "completed task");
                    }
                }
            }
        }
    }
}
