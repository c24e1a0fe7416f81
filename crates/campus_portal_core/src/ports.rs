//! crates/campus_portal_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the client's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of specific external implementations like the portal's REST API.

use async_trait::async_trait;

use crate::domain::{CompletionRequest, PrincipalStatistics, StaffHome, Task, UserProfile};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from the transport layer.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    /// The credential was rejected or has expired at the server.
    #[error("Unauthorized")]
    Unauthorized,
    /// Authenticated, but the role lacks access to the resource.
    #[error("Forbidden")]
    Forbidden,
    #[error("Item not found: {0}")]
    NotFound(String),
    /// A server-reported failure with a human-readable detail message.
    #[error("{0}")]
    Api(String),
    /// The request never produced a server response.
    #[error("Network error: {0}")]
    Network(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// The portal's remote API, as consumed by this client.
///
/// Session validity and role membership are local questions answered by
/// the session store; only the operations below suspend.
#[async_trait]
pub trait PortalService: Send + Sync {
    /// Fetches the authenticated user's profile.
    async fn current_user(&self) -> PortResult<UserProfile>;

    /// Fetches the institution-wide statistics for the principal dashboard.
    async fn principal_dashboard(&self) -> PortResult<PrincipalStatistics>;

    /// Fetches the profile card for the staff dashboard.
    async fn staff_home(&self) -> PortResult<StaffHome>;

    /// Lists the attendance tasks assigned to the caller.
    async fn list_my_tasks(&self) -> PortResult<Vec<Task>>;

    /// Marks a task completed with the given attendance figures and
    /// returns the updated record.
    async fn complete_task(&self, task_id: i64, request: CompletionRequest) -> PortResult<Task>;
}

//=========================================================================================
// Navigation Port
//=========================================================================================

/// Where a denied guard check sends the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    /// The login page; used when no valid session exists.
    Login,
    /// The neutral landing page; used when the session is valid but the
    /// role is insufficient for the requested view.
    Home,
}

impl std::fmt::Display for Destination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Destination::Login => f.write_str("login"),
            Destination::Home => f.write_str("home"),
        }
    }
}

/// Navigation sink for guard redirects. Implementations perform the
/// route change and nothing else; the guard never mutates session state.
pub trait Navigator: Send + Sync {
    fn redirect(&self, destination: Destination);
}
