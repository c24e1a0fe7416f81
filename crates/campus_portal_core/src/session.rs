//! crates/campus_portal_core/src/session.rs
//!
//! The process-wide session slot, split into reader and writer capabilities.
//!
//! The session is shared, mutable, single-writer: only the login and logout
//! code paths hold a `SessionWriter`; every other component reads through a
//! `SessionReader`. The split is enforced by interface, not by convention.

use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Utc};

use crate::domain::{Role, Session};

type Slot = Arc<RwLock<Option<Session>>>;

/// Owns the session slot and hands out capabilities.
///
/// Created once at startup and injected into the components that need it;
/// there is no global state.
#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Slot,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reader(&self) -> SessionReader {
        SessionReader {
            inner: self.inner.clone(),
        }
    }

    pub fn writer(&self) -> SessionWriter {
        SessionWriter {
            inner: self.inner.clone(),
        }
    }
}

/// Read-only view of the session slot.
#[derive(Clone)]
pub struct SessionReader {
    inner: Slot,
}

impl SessionReader {
    /// Returns a snapshot of the current session, if any.
    pub fn current(&self) -> Option<Session> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// True iff a session exists and its expiry instant is in the future.
    /// Re-evaluated on every call; the answer is never cached.
    pub fn is_valid(&self) -> bool {
        self.valid_at(Utc::now())
    }

    pub fn valid_at(&self, now: DateTime<Utc>) -> bool {
        self.current().map(|s| s.valid_at(now)).unwrap_or(false)
    }

    /// True iff a session exists and carries the given role.
    pub fn has_role(&self, role: Role) -> bool {
        self.current().map(|s| s.role == role).unwrap_or(false)
    }
}

/// Write capability for the session slot. Held only by the session
/// install and logout paths.
#[derive(Clone)]
pub struct SessionWriter {
    inner: Slot,
}

impl SessionWriter {
    pub fn install(&self, session: Session) {
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = Some(session);
    }

    /// Removes the session (logout or detected expiry).
    pub fn clear(&self) {
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = None;
    }
}
