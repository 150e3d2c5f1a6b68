mod session_cleanup;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, Mutex};
use tokio::task::JoinHandle;
use tracing::info;

use crate::services::SessionStore;

pub use session_cleanup::cleanup_expired_sessions;

pub struct WorkerManager {
    handles: Mutex<Vec<JoinHandle<()>>>,
    shutdown_tx: broadcast::Sender<()>,
    store: Arc<SessionStore>,
    sweep_interval: Duration,
}

impl WorkerManager {
    pub fn new(store: Arc<SessionStore>, sweep_interval: Duration) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);
        Self {
            handles: Mutex::new(Vec::new()),
            shutdown_tx,
            store,
            sweep_interval,
        }
    }

    pub async fn start(&self) {
        let store = Arc::clone(&self.store);
        let interval = self.sweep_interval;
        let mut shutdown_rx = self.shutdown_tx.subscribe();

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        cleanup_expired_sessions(&store);
                    }
                    _ = shutdown_rx.recv() => break,
                }
            }
        });

        self.handles.lock().await.push(handle);
        info!(interval_secs = interval.as_secs(), "Session cleanup worker started");
    }

    pub async fn stop(&self) {
        let _ = self.shutdown_tx.send(());
        let handles: Vec<_> = self.handles.lock().await.drain(..).collect();
        for handle in handles {
            let _ = handle.await;
        }
        info!("Workers stopped");
    }
}
