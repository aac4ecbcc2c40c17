//! Session issuance and resolution.
//!
//! Session tokens have the shape `at_sess_{id}.{secret}`. The id locates the
//! session row; the secret is a 256-bit random value whose SHA-256 digest is
//! stored at rest. Resolution is a pure lookup: it never mutates account or
//! session state.

use std::sync::Arc;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{Duration, Utc};
use rand::{rngs::OsRng, RngCore};
use sha2::{Digest, Sha256};
use tracing::{info, instrument, warn};

use crate::auth::models::{AuthError, NewSession, Session, SESSION_TOKEN_PREFIX};
use crate::config::AuthConfig;
use crate::domain::{Principal, SessionId, UserId};
use crate::errors::Result;
use crate::observability::metrics;
use crate::storage::repositories::{SessionRepository, UserRepository};

/// Session secret byte length (32 bytes = 256 bits of entropy)
const SESSION_SECRET_BYTES: usize = 32;

/// Render a full bearer token value from its parts.
pub fn format_session_token(id: &SessionId, secret: &str) -> String {
    format!("{}{}.{}", SESSION_TOKEN_PREFIX, id, secret)
}

/// Split a presented token into `(id, secret)`, if well-formed.
pub fn parse_session_token(token: &str) -> Option<(SessionId, &str)> {
    let stripped = token.strip_prefix(SESSION_TOKEN_PREFIX)?;
    let (id, secret) = stripped.split_once('.')?;
    if id.is_empty() || secret.is_empty() {
        return None;
    }
    Some((SessionId::from_str_unchecked(id), secret))
}

/// Hex-encoded SHA-256 digest of a session secret.
pub fn hash_session_secret(secret: &str) -> String {
    hex::encode(Sha256::digest(secret.as_bytes()))
}

/// Resolves transport credentials into a request [`Principal`].
#[derive(Clone)]
pub struct SessionResolver {
    sessions: Arc<dyn SessionRepository>,
    users: Arc<dyn UserRepository>,
}

impl SessionResolver {
    pub fn new(sessions: Arc<dyn SessionRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { sessions, users }
    }

    /// Resolve the `Authorization` header (or its absence) into a principal.
    ///
    /// Missing or blank credentials resolve to [`Principal::Anonymous`];
    /// whether anonymity is acceptable is decided by the authorization
    /// policy, not here. Malformed, unknown or expired credentials fail
    /// with an [`AuthError`].
    #[instrument(skip(self, header), fields(session_id = tracing::field::Empty))]
    pub async fn resolve(&self, header: Option<&str>) -> std::result::Result<Principal, AuthError> {
        let raw = header.map(str::trim).unwrap_or("");
        if raw.is_empty() {
            metrics::record_session_resolution("anonymous");
            return Ok(Principal::Anonymous);
        }

        let token = raw.strip_prefix("Bearer ").unwrap_or(raw);
        let Some((session_id, secret)) = parse_session_token(token) else {
            metrics::record_session_resolution("malformed");
            return Err(AuthError::MalformedToken);
        };
        tracing::Span::current().record("session_id", session_id.as_str());

        let session = match self.sessions.find_session(&session_id).await {
            Ok(Some(session)) => session,
            Ok(None) => {
                metrics::record_session_resolution("not_found");
                return Err(AuthError::SessionNotFound);
            }
            Err(err) => {
                metrics::record_session_resolution("error");
                return Err(AuthError::from(err));
            }
        };

        if hash_session_secret(secret) != session.secret_hash {
            metrics::record_session_resolution("not_found");
            return Err(AuthError::SessionNotFound);
        }

        if session.is_expired(Utc::now()) {
            metrics::record_session_resolution("expired");
            return Err(AuthError::SessionExpired);
        }

        let user = match self.users.find_user(&session.user_id).await {
            Ok(Some(user)) => user,
            Ok(None) => {
                warn!(user_id = %session.user_id, "session references a missing user");
                metrics::record_session_resolution("not_found");
                return Err(AuthError::SessionNotFound);
            }
            Err(err) => {
                metrics::record_session_resolution("error");
                return Err(AuthError::from(err));
            }
        };

        // Inactive accounts still resolve; the gateway rejects them before
        // any role check so the failure classifies as unauthorized.
        metrics::record_session_resolution("authenticated");
        let is_active = user.is_active();
        Ok(Principal::authenticated(user.id, user.role, is_active))
    }
}

/// A freshly issued session together with its one-time-visible token value.
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub session: Session,
    pub token: String,
}

/// Issues bearer sessions for user accounts.
///
/// Issuance is an administrative/bootstrap operation; the request gateway
/// itself never creates sessions.
#[derive(Clone)]
pub struct SessionService {
    sessions: Arc<dyn SessionRepository>,
    ttl: Duration,
}

impl SessionService {
    pub fn new(sessions: Arc<dyn SessionRepository>, config: &AuthConfig) -> Self {
        Self { sessions, ttl: Duration::hours(config.session_ttl_hours) }
    }

    /// Mint a new session for the given user.
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn issue(&self, user_id: &UserId) -> Result<IssuedSession> {
        let id = SessionId::new();
        let secret = generate_session_secret();
        let expires_at = Utc::now() + self.ttl;

        let session = self
            .sessions
            .insert_session(NewSession {
                id: id.clone(),
                user_id: user_id.clone(),
                secret_hash: hash_session_secret(&secret),
                expires_at,
            })
            .await?;

        info!(session_id = %session.id, expires_at = %session.expires_at, "session issued");

        let token = format_session_token(&session.id, &secret);
        Ok(IssuedSession { session, token })
    }

    /// Delete sessions whose expiry has passed. Returns the number removed.
    pub async fn purge_expired(&self) -> Result<u64> {
        self.sessions.delete_expired_sessions(Utc::now()).await
    }
}

fn generate_session_secret() -> String {
    let mut bytes = [0u8; SESSION_SECRET_BYTES];
    OsRng.fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}
