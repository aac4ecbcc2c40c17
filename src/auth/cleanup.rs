//! Background purge of expired sessions.

use std::time::Duration;

use tokio::time::interval;
use tracing::{debug, warn};

use crate::auth::session::SessionService;

/// How often the cleanup task wakes up.
const CLEANUP_INTERVAL: Duration = Duration::from_secs(15 * 60);

/// Spawn a background task that periodically deletes expired sessions.
///
/// Expired sessions are already rejected at resolution time; the purge only
/// keeps the table from growing without bound.
pub fn spawn_session_cleanup(service: SessionService) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval(CLEANUP_INTERVAL);
        loop {
            ticker.tick().await;
            match service.purge_expired().await {
                Ok(0) => {}
                Ok(removed) => debug!(removed, "purged expired sessions"),
                Err(err) => warn!(error = %err, "session cleanup pass failed"),
            }
        }
    })
}
