//! services/client/src/error.rs
//!
//! Defines the primary error type for the entire client service.

use campus_portal_core::ports::PortError;

use crate::app::auth::AuthError;
use crate::config::ConfigError;

/// The primary error type for the `client` service.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Represents an error that propagated up from one of the core service ports.
    #[error("Service Port Error: {0}")]
    Port(#[from] PortError),

    /// Represents a credential token that could not be decoded into a session.
    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    /// Represents a standard Input/Output error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A catch-all for any other unexpected errors.
    #[error("An unexpected internal error occurred: {0}")]
    Internal(String),
}
