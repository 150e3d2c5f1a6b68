use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use super::MisconceptionOracle;
use crate::error::OracleError;
use crate::types::Shape;

/// Workers still running past their deadline, per oracle, before new
/// diagnoses are refused outright.
pub const DEFAULT_MAX_IN_FLIGHT: usize = 8;

/// Runs each diagnosis on a worker thread and gives up after `timeout`.
/// A late answer is dropped; the worker finishes on its own.
///
/// At most `max_in_flight` workers exist at once. A hung inner oracle
/// therefore pins that many threads and every later call fails fast with
/// [`OracleError::Unavailable`] until one of them returns.
pub struct TimeoutOracle<O> {
    inner: Arc<O>,
    timeout: Duration,
    max_in_flight: usize,
    in_flight: Arc<AtomicUsize>,
}

/// Releases a worker slot when the worker ends, including by panic.
struct InFlightSlot(Arc<AtomicUsize>);

impl Drop for InFlightSlot {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::AcqRel);
    }
}

impl<O> TimeoutOracle<O>
where
    O: MisconceptionOracle + 'static,
{
    pub fn new(inner: O, timeout: Duration) -> Self {
        Self {
            inner: Arc::new(inner),
            timeout,
            max_in_flight: DEFAULT_MAX_IN_FLIGHT,
            in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_max_in_flight(mut self, max_in_flight: usize) -> Self {
        self.max_in_flight = max_in_flight.max(1);
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::Acquire)
    }

    fn acquire_slot(&self) -> Option<InFlightSlot> {
        self.in_flight
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| {
                (n < self.max_in_flight).then_some(n + 1)
            })
            .ok()
            .map(|_| InFlightSlot(Arc::clone(&self.in_flight)))
    }
}

impl<O> MisconceptionOracle for TimeoutOracle<O>
where
    O: MisconceptionOracle + 'static,
{
    fn diagnose(&self, shape: Shape, value: f64) -> Result<Option<String>, OracleError> {
        let slot = self.acquire_slot().ok_or_else(|| {
            OracleError::Unavailable(format!(
                "{} oracle workers still running",
                self.max_in_flight
            ))
        })?;
        let (tx, rx) = mpsc::channel();
        let inner = Arc::clone(&self.inner);

        // On spawn failure the closure, and with it the slot, is dropped.
        thread::Builder::new()
            .name("misconception-oracle".to_string())
            .spawn(move || {
                let _slot = slot;
                let _ = tx.send(inner.diagnose(shape, value));
            })
            .map_err(|e| OracleError::Unavailable(format!("failed to spawn oracle worker: {e}")))?;

        match rx.recv_timeout(self.timeout) {
            Ok(result) => result,
            Err(mpsc::RecvTimeoutError::Timeout) => Err(OracleError::Timeout(self.timeout)),
            Err(mpsc::RecvTimeoutError::Disconnected) => Err(OracleError::Unavailable(
                "oracle worker stopped without answering".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::StaticOracle;

    struct SlowOracle(Duration);

    impl MisconceptionOracle for SlowOracle {
        fn diagnose(&self, _shape: Shape, _value: f64) -> Result<Option<String>, OracleError> {
            thread::sleep(self.0);
            Ok(Some("Too_slow".to_string()))
        }
    }

    struct PanickingOracle;

    impl MisconceptionOracle for PanickingOracle {
        fn diagnose(&self, _shape: Shape, _value: f64) -> Result<Option<String>, OracleError> {
            panic!("rule engine crashed");
        }
    }

    #[test]
    fn test_fast_oracle_passes_through() {
        let oracle = TimeoutOracle::new(
            StaticOracle::new().with(Shape::Triangle, 24.0, "Forgot_to_halve"),
            Duration::from_secs(2),
        );
        assert_eq!(
            oracle.diagnose(Shape::Triangle, 24.0).unwrap().as_deref(),
            Some("Forgot_to_halve")
        );
    }

    #[test]
    fn test_slow_oracle_times_out() {
        let oracle = TimeoutOracle::new(SlowOracle(Duration::from_millis(500)), Duration::from_millis(20));
        let err = oracle.diagnose(Shape::Circle, 1.0).unwrap_err();
        assert_eq!(err, OracleError::Timeout(Duration::from_millis(20)));
    }

    #[test]
    fn test_hung_oracle_caps_worker_threads() {
        let oracle = TimeoutOracle::new(SlowOracle(Duration::from_millis(400)), Duration::from_millis(10))
            .with_max_in_flight(2);

        for _ in 0..2 {
            assert!(matches!(
                oracle.diagnose(Shape::Circle, 1.0),
                Err(OracleError::Timeout(_))
            ));
        }
        assert_eq!(oracle.in_flight(), 2);
        assert!(matches!(
            oracle.diagnose(Shape::Circle, 1.0),
            Err(OracleError::Unavailable(_))
        ));
        assert_eq!(oracle.in_flight(), 2);

        // Slots come back once the stuck workers finish.
        thread::sleep(Duration::from_millis(800));
        assert_eq!(oracle.in_flight(), 0);
    }

    #[test]
    fn test_crashed_oracle_is_unavailable() {
        let oracle = TimeoutOracle::new(PanickingOracle, Duration::from_secs(2));
        let err = oracle.diagnose(Shape::Circle, 1.0).unwrap_err();
        assert!(matches!(err, OracleError::Unavailable(_)));
    }
}
