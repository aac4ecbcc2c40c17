//! Data models used by the Atrium session authentication system.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::domain::{SessionId, UserId};
use crate::errors::AtriumError;

/// Prefix every Atrium session token value carries.
pub const SESSION_TOKEN_PREFIX: &str = "at_sess_";

/// Stored representation of an authentication session.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: SessionId,
    pub user_id: UserId,
    /// Hex-encoded SHA-256 digest of the session secret.
    pub secret_hash: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at < now
    }
}

/// New session database payload.
#[derive(Debug, Clone)]
pub struct NewSession {
    pub id: SessionId,
    pub user_id: UserId,
    pub secret_hash: String,
    pub expires_at: DateTime<Utc>,
}

/// Errors returned by session resolution.
///
/// Absence of credentials is not an error: it resolves to an anonymous
/// principal, whose fate is decided by the authorization policy downstream.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("unauthorized: malformed session token")]
    MalformedToken,
    #[error("unauthorized: session not found")]
    SessionNotFound,
    #[error("unauthorized: session expired")]
    SessionExpired,
    #[error(transparent)]
    Persistence(#[from] AtriumError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn session_expiry_compares_against_now() {
        let now = Utc::now();
        let session = Session {
            id: SessionId::new(),
            user_id: UserId::new(),
            secret_hash: "00".repeat(32),
            created_at: now - Duration::hours(2),
            expires_at: now - Duration::hours(1),
        };
        assert!(session.is_expired(now));
        assert!(!session.is_expired(now - Duration::hours(2)));
    }
}
