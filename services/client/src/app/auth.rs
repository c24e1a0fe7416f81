//! services/client/src/app/auth.rs
//!
//! Session establishment and teardown. These two paths are the only
//! holders of the `SessionWriter` capability; everything else reads.

use campus_portal_core::domain::{Role, Session};
use campus_portal_core::ports::{Destination, Navigator};
use campus_portal_core::session::SessionWriter;
use chrono::DateTime;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use tracing::{debug, info};

use crate::app::tasks::TaskStore;

/// Errors raised while turning a raw credential token into a session.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Malformed credential token: {0}")]
    Malformed(String),
    #[error("Unknown role '{0}' in credential token")]
    UnknownRole(String),
    #[error("Credential token carries an invalid expiry timestamp")]
    InvalidExpiry,
}

/// The claims this client reads from the credential token.
#[derive(Debug, Deserialize)]
struct TokenClaims {
    sub: String,
    role: String,
    exp: i64,
}

/// Decodes a credential token into a `Session`.
///
/// The signature is NOT verified here: the server is the authority on
/// every request, and this client only needs the expiry and role claims
/// to fail fast and redirect. An expired token still decodes; validity
/// is the session store's question, answered at use time.
pub fn decode_session(token: &str) -> Result<Session, AuthError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;

    let data = decode::<TokenClaims>(token, &DecodingKey::from_secret(&[]), &validation)
        .map_err(|e| AuthError::Malformed(e.to_string()))?;

    let role = Role::parse(&data.claims.role)
        .ok_or_else(|| AuthError::UnknownRole(data.claims.role.clone()))?;
    let expires_at =
        DateTime::from_timestamp(data.claims.exp, 0).ok_or(AuthError::InvalidExpiry)?;

    debug!(subject = %data.claims.sub, role = %role, "decoded credential token");

    Ok(Session {
        token: token.to_string(),
        expires_at,
        role,
    })
}

/// Decodes the token and installs the resulting session.
pub fn install_session(writer: &SessionWriter, token: &str) -> Result<Session, AuthError> {
    let session = decode_session(token)?;
    info!(role = %session.role, expires_at = %session.expires_at, "session installed");
    writer.install(session.clone());
    Ok(session)
}

/// Clears the session, drops the cached tasks, and sends the user to the
/// login page.
pub async fn logout(writer: &SessionWriter, tasks: &TaskStore, navigator: &dyn Navigator) {
    writer.clear();
    tasks.invalidate().await;
    info!("signed out");
    navigator.redirect(Destination::Login);
}

#[cfg(test)]
mod tests {
    use super::*;
    use campus_portal_core::session::SessionStore;
    use chrono::Utc;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde::Serialize;

    #[derive(Serialize)]
    struct RawClaims<'a> {
        sub: &'a str,
        role: &'a str,
        exp: i64,
    }

    fn token(role: &str, exp: i64) -> String {
        // Any signing key works; the client never checks the signature.
        encode(
            &Header::default(),
            &RawClaims {
                sub: "user-42",
                role,
                exp,
            },
            &EncodingKey::from_secret(b"test-only"),
        )
        .unwrap()
    }

    #[test]
    fn valid_token_decodes_role_and_expiry() {
        let exp = Utc::now().timestamp() + 3600;
        let session = decode_session(&token("staff", exp)).unwrap();
        assert_eq!(session.role, Role::Staff);
        assert_eq!(session.expires_at.timestamp(), exp);
        assert!(session.is_valid());
    }

    #[test]
    fn expired_token_still_decodes_but_is_invalid() {
        let exp = Utc::now().timestamp() - 3600;
        let session = decode_session(&token("principal", exp)).unwrap();
        assert_eq!(session.role, Role::Principal);
        assert!(!session.is_valid());
    }

    #[test]
    fn garbage_token_is_rejected() {
        assert!(matches!(
            decode_session("not-a-jwt"),
            Err(AuthError::Malformed(_))
        ));
    }

    #[test]
    fn unknown_role_is_rejected() {
        let exp = Utc::now().timestamp() + 3600;
        assert!(matches!(
            decode_session(&token("janitor", exp)),
            Err(AuthError::UnknownRole(_))
        ));
    }

    #[test]
    fn install_places_the_session_in_the_store() {
        let store = SessionStore::new();
        let exp = Utc::now().timestamp() + 3600;
        install_session(&store.writer(), &token("student", exp)).unwrap();
        assert!(store.reader().is_valid());
        assert!(store.reader().has_role(Role::Student));
    }

    #[tokio::test]
    async fn logout_clears_session_and_tasks_and_redirects_to_login() {
        use crate::app::testing::{clearance_for, pending_task, MockPortal, RecordingNavigator};
        use std::sync::Arc;

        let store = SessionStore::new();
        let exp = Utc::now().timestamp() + 3600;
        install_session(&store.writer(), &token("staff", exp)).unwrap();

        let api = Arc::new(MockPortal::with_tasks(vec![pending_task(1, Some(40))]));
        let tasks = crate::app::tasks::TaskStore::new(api);
        tasks.refresh(&clearance_for(Role::Staff)).await.unwrap();
        assert_eq!(tasks.snapshot().await.len(), 1);

        let navigator = RecordingNavigator::default();
        logout(&store.writer(), &tasks, &navigator).await;

        assert!(store.reader().current().is_none());
        assert!(tasks.snapshot().await.is_empty());
        assert_eq!(navigator.destinations(), vec![Destination::Login]);
    }
}
