use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use uuid::Uuid;

use area_tutor_algo::{MisconceptionOracle, Session, TutorConfig};

/// One learner's session plus bookkeeping for expiry.
pub struct SessionEntry {
    pub session: Session,
    pub created_at: DateTime<Utc>,
    last_active: Instant,
}

/// In-memory sessions keyed by id. Each session sits behind its own mutex so
/// requests for different learners never contend on tutoring state.
pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, Arc<Mutex<SessionEntry>>>>,
    tutor: TutorConfig,
    oracle: Arc<dyn MisconceptionOracle>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(tutor: TutorConfig, oracle: Arc<dyn MisconceptionOracle>, ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            tutor,
            oracle,
            ttl,
        }
    }

    /// Start a session and run `f` on it before it becomes visible to others.
    pub fn create<T>(&self, f: impl FnOnce(Uuid, &mut SessionEntry) -> T) -> (Uuid, T) {
        let id = Uuid::new_v4();
        let mut entry = SessionEntry {
            session: Session::new(self.tutor.clone(), Arc::clone(&self.oracle)),
            created_at: Utc::now(),
            last_active: Instant::now(),
        };
        let out = f(id, &mut entry);
        self.sessions.write().insert(id, Arc::new(Mutex::new(entry)));
        tracing::info!(session_id = %id, "session created");
        (id, out)
    }

    /// Run `f` against a live session. `None` when the id is unknown or the
    /// session has expired.
    pub fn with_session<T>(&self, id: Uuid, f: impl FnOnce(&mut SessionEntry) -> T) -> Option<T> {
        let handle = self.sessions.read().get(&id).cloned()?;
        let mut entry = handle.lock();
        if entry.last_active.elapsed() > self.ttl {
            drop(entry);
            self.remove(id);
            return None;
        }
        entry.last_active = Instant::now();
        Some(f(&mut entry))
    }

    pub fn remove(&self, id: Uuid) -> bool {
        let removed = self.sessions.write().remove(&id).is_some();
        if removed {
            tracing::info!(session_id = %id, "session removed");
        }
        removed
    }

    /// Drop sessions idle longer than the TTL. Returns how many were dropped.
    pub fn sweep_expired(&self) -> usize {
        let ttl = self.ttl;
        let mut sessions = self.sessions.write();
        let before = sessions.len();
        sessions.retain(|_, entry| match entry.try_lock() {
            Some(guard) => guard.last_active.elapsed() <= ttl,
            // Busy sessions are in use right now.
            None => true,
        });
        before - sessions.len()
    }

    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use area_tutor_algo::NullOracle;

    fn store(ttl: Duration) -> SessionStore {
        SessionStore::new(TutorConfig::default(), Arc::new(NullOracle), ttl)
    }

    #[test]
    fn test_create_and_lookup() {
        let store = store(Duration::from_secs(60));
        let (id, text) = store.create(|_, entry| entry.session.current_problem_text());
        assert_eq!(store.len(), 1);

        let again = store
            .with_session(id, |entry| entry.session.current_problem_text())
            .unwrap();
        assert_eq!(text, again);
        assert!(store.with_session(Uuid::new_v4(), |_| ()).is_none());
    }

    #[test]
    fn test_sessions_are_isolated() {
        let store = store(Duration::from_secs(60));
        let (a, _) = store.create(|_, _| ());
        let (b, _) = store.create(|_, _| ());

        store
            .with_session(a, |entry| {
                let unit = entry.session.problem().canonical_area_unit();
                entry.session.submit_answer(-1.0, unit).unwrap();
            })
            .unwrap();

        let b_snapshot = store.with_session(b, |entry| entry.session.mastery_snapshot()).unwrap();
        assert!(b_snapshot.values().all(|&m| m == 0.5));
        let a_stats = store.with_session(a, |entry| entry.session.stats()).unwrap();
        assert_eq!(a_stats.attempts, 1);
    }

    #[test]
    fn test_remove() {
        let store = store(Duration::from_secs(60));
        let (id, _) = store.create(|_, _| ());
        assert!(store.remove(id));
        assert!(!store.remove(id));
        assert!(store.is_empty());
    }

    #[test]
    fn test_expired_sessions_are_swept() {
        let store = store(Duration::from_millis(10));
        store.create(|_, _| ());
        store.create(|_, _| ());
        std::thread::sleep(Duration::from_millis(30));

        assert_eq!(store.sweep_expired(), 2);
        assert!(store.is_empty());
    }

    #[test]
    fn test_expired_session_not_returned() {
        let store = store(Duration::from_millis(10));
        let (id, _) = store.create(|_, _| ());
        std::thread::sleep(Duration::from_millis(30));
        assert!(store.with_session(id, |_| ()).is_none());
        assert!(store.is_empty());
    }
}
