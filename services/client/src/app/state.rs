//! services/client/src/app/state.rs
//!
//! Defines the client's shared application state and the wiring helpers
//! that hand each view its collaborators.

use std::sync::Arc;

use campus_portal_core::domain::Role;
use campus_portal_core::ports::{Navigator, PortalService};
use campus_portal_core::session::SessionStore;

use crate::app::completion::CompletionWorkflow;
use crate::app::dashboard::DashboardAggregator;
use crate::app::guard::{GuardConfig, RouteGuard};
use crate::app::tasks::TaskStore;
use crate::config::Config;

/// The shared application state, created once at startup.
///
/// Owns the session store; views obtain readers through the wiring
/// helpers, while the writer stays with the login/logout paths.
#[derive(Clone)]
pub struct AppState {
    pub api: Arc<dyn PortalService>,
    pub navigator: Arc<dyn Navigator>,
    pub config: Arc<Config>,
    pub session: SessionStore,
    pub tasks: Arc<TaskStore>,
}

impl AppState {
    /// Assembles the state around an existing session store; the store
    /// must predate the adapter that reads credentials from it.
    pub fn new(
        api: Arc<dyn PortalService>,
        navigator: Arc<dyn Navigator>,
        config: Arc<Config>,
        session: SessionStore,
    ) -> Self {
        let tasks = Arc::new(TaskStore::new(api.clone()));
        Self {
            api,
            navigator,
            config,
            session,
            tasks,
        }
    }

    /// A guard for a protected view open to any authenticated role.
    pub fn guard(&self) -> RouteGuard {
        RouteGuard::new(
            self.session.reader(),
            self.navigator.clone(),
            GuardConfig {
                interval: self.config.guard_interval,
            },
        )
    }

    /// A guard for a view restricted to one role.
    pub fn guard_for(&self, role: Role) -> RouteGuard {
        self.guard().with_required_role(role)
    }

    pub fn dashboard(&self) -> DashboardAggregator {
        DashboardAggregator::new(self.api.clone(), self.tasks.clone())
    }

    pub fn completion(&self) -> CompletionWorkflow {
        CompletionWorkflow::new(self.api.clone(), self.tasks.clone())
    }
}
