//! services/client/src/app/guard.rs
//!
//! The session guard that gates every protected view.
//!
//! A guard runs one immediate check when its view mounts and then re-checks
//! on a fixed interval for the view's lifetime. Both checks are purely local
//! (the session store never suspends); a failed check turns into a redirect
//! and nothing else. The guard does not mutate the session.

use std::sync::Arc;
use std::time::Duration;

use campus_portal_core::domain::Role;
use campus_portal_core::ports::{Destination, Navigator};
use campus_portal_core::session::SessionReader;
use tokio::task::JoinHandle;
use tokio::time::interval;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Configuration for the recurring re-validation check.
#[derive(Debug, Clone)]
pub struct GuardConfig {
    /// Interval between validity checks while the view stays mounted.
    pub interval: Duration,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(60),
        }
    }
}

/// Proof that a guard admitted the caller.
///
/// Only the guard can construct one, so every protected data load that
/// takes a `&Clearance` is statically downstream of a passed check: a
/// denied session can never reach a protected fetch.
#[derive(Debug)]
pub struct Clearance {
    role: Role,
}

impl Clearance {
    pub fn role(&self) -> Role {
        self.role
    }
}

/// The outcome of a single guard evaluation.
#[derive(Debug)]
pub enum GuardDecision {
    Allowed(Clearance),
    /// No valid session; the user was sent to the login page.
    RedirectedToLogin,
    /// Valid session, insufficient role; the user was sent to the neutral
    /// landing page. They ARE authenticated, merely unauthorized here.
    RedirectedToHome,
}

/// Guards one protected view, optionally requiring a specific role.
#[derive(Clone)]
pub struct RouteGuard {
    session: SessionReader,
    navigator: Arc<dyn Navigator>,
    required_role: Option<Role>,
    config: GuardConfig,
}

impl RouteGuard {
    pub fn new(session: SessionReader, navigator: Arc<dyn Navigator>, config: GuardConfig) -> Self {
        Self {
            session,
            navigator,
            required_role: None,
            config,
        }
    }

    pub fn with_required_role(mut self, role: Role) -> Self {
        self.required_role = Some(role);
        self
    }

    /// Runs one validity evaluation, performing the redirect on denial.
    ///
    /// The session is re-read on every call; an earlier `Allowed` says
    /// nothing about this one.
    pub fn check(&self) -> GuardDecision {
        let session = match self.session.current() {
            Some(session) => session,
            None => {
                warn!("no session present, redirecting to login");
                self.navigator.redirect(Destination::Login);
                return GuardDecision::RedirectedToLogin;
            }
        };

        if !session.is_valid() {
            warn!(expired_at = %session.expires_at, "session expired, redirecting to login");
            self.navigator.redirect(Destination::Login);
            return GuardDecision::RedirectedToLogin;
        }

        if let Some(required) = self.required_role {
            if session.role != required {
                warn!(role = %session.role, required = %required, "insufficient role, redirecting home");
                self.navigator.redirect(Destination::Home);
                return GuardDecision::RedirectedToHome;
            }
        }

        GuardDecision::Allowed(Clearance { role: session.role })
    }

    /// Starts the recurring re-validation loop for this view.
    ///
    /// The first tick fires immediately (the on-mount check); after that
    /// the loop re-enters checking once per configured interval until the
    /// session fails a check (one redirect, then the loop exits) or the
    /// returned handle is cancelled.
    pub fn watch(&self) -> GuardHandle {
        let guard = self.clone();
        let token = CancellationToken::new();
        let child = token.clone();

        let task = tokio::spawn(async move {
            let mut ticker = interval(guard.config.interval);
            loop {
                tokio::select! {
                    // Cancellation always wins over a due tick.
                    biased;
                    _ = child.cancelled() => {
                        debug!("guard watch cancelled");
                        break;
                    }
                    _ = ticker.tick() => {
                        if !matches!(guard.check(), GuardDecision::Allowed(_)) {
                            break;
                        }
                    }
                }
            }
        });

        GuardHandle { token, task }
    }
}

/// Cancellation handle for a guard's recurring check, tied to the view's
/// lifetime. Must be cancelled on every exit path; dropping it also
/// cancels, so a forced teardown cannot leak the timer.
pub struct GuardHandle {
    token: CancellationToken,
    task: JoinHandle<()>,
}

impl GuardHandle {
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// True once the watch loop has exited (denial or cancellation).
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for GuardHandle {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
