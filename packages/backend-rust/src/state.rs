use std::sync::Arc;
use std::time::{Instant, SystemTime};

use area_tutor_algo::{MisconceptionOracle, NullOracle, RuleBookOracle, TimeoutOracle};

use crate::config::Config;
use crate::services::SessionStore;

#[derive(Clone)]
pub struct AppState {
    started_at: Instant,
    started_at_system: SystemTime,
    sessions: Arc<SessionStore>,
    oracle_enabled: bool,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        let (oracle, oracle_enabled) = Self::create_oracle(config);
        let sessions = Arc::new(SessionStore::new(
            config.tutor.clone(),
            oracle,
            config.session_ttl,
        ));

        Self {
            started_at: Instant::now(),
            started_at_system: SystemTime::now(),
            sessions,
            oracle_enabled,
        }
    }

    /// Rule-file oracle with a deadline when `ORACLE_RULES_PATH` points at a
    /// readable file; otherwise every miss gets the generic reason.
    pub fn create_oracle(config: &Config) -> (Arc<dyn MisconceptionOracle>, bool) {
        let Some(path) = config.oracle_rules_path.as_ref() else {
            tracing::info!("no misconception rules configured");
            return (Arc::new(NullOracle), false);
        };

        match RuleBookOracle::from_path(path) {
            Ok(rules) => (
                Arc::new(TimeoutOracle::new(rules, config.oracle_timeout)),
                true,
            ),
            Err(err) => {
                tracing::warn!(error = %err, "misconception oracle not initialized");
                (Arc::new(NullOracle), false)
            }
        }
    }

    pub fn sessions(&self) -> Arc<SessionStore> {
        Arc::clone(&self.sessions)
    }

    pub fn oracle_enabled(&self) -> bool {
        self.oracle_enabled
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }

    pub fn started_at_system(&self) -> SystemTime {
        self.started_at_system
    }
}
