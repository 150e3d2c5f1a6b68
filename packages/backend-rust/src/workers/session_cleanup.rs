use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info};

use crate::services::SessionStore;

#[derive(Debug, Default)]
struct CleanupStats {
    expired_sessions: usize,
    remaining_sessions: usize,
    duration_secs: f64,
}

pub fn cleanup_expired_sessions(store: &Arc<SessionStore>) -> usize {
    let start = Instant::now();
    debug!("Starting session cleanup cycle");

    let stats = CleanupStats {
        expired_sessions: store.sweep_expired(),
        remaining_sessions: store.len(),
        duration_secs: start.elapsed().as_secs_f64(),
    };

    if stats.expired_sessions > 0 {
        info!(
            expired_sessions = stats.expired_sessions,
            remaining_sessions = stats.remaining_sessions,
            duration_secs = format!("{:.3}", stats.duration_secs),
            "Session cleanup completed"
        );
    }

    stats.expired_sessions
}
