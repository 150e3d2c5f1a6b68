use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use area_tutor_algo::{MasteryConfig, TutorConfig};

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_SESSION_TTL_SECS: u64 = 3600;
const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 60;
const DEFAULT_ORACLE_TIMEOUT_MS: u64 = 500;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub log_level: String,
    /// Set when `ENABLE_FILE_LOGS` is on; file logs go to `LOG_DIR`.
    pub log_dir: Option<PathBuf>,
    pub session_ttl: Duration,
    pub sweep_interval: Duration,
    pub oracle_rules_path: Option<PathBuf>,
    pub oracle_timeout: Duration,
    pub tutor: TutorConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)),
            port: DEFAULT_PORT,
            log_level: "info".to_string(),
            log_dir: None,
            session_ttl: Duration::from_secs(DEFAULT_SESSION_TTL_SECS),
            sweep_interval: Duration::from_secs(DEFAULT_SWEEP_INTERVAL_SECS),
            oracle_rules_path: None,
            oracle_timeout: Duration::from_millis(DEFAULT_ORACLE_TIMEOUT_MS),
            tutor: TutorConfig::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);

        let host = std::env::var("HOST")
            .ok()
            .and_then(|value| value.parse::<IpAddr>().ok())
            .unwrap_or(IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)));

        let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let file_logs = std::env::var("ENABLE_FILE_LOGS")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);
        let log_dir = file_logs
            .then(|| PathBuf::from(env_string("LOG_DIR").unwrap_or_else(|| "./logs".to_string())));

        let session_ttl =
            Duration::from_secs(env_u64("SESSION_TTL_SECS").unwrap_or(DEFAULT_SESSION_TTL_SECS));
        let sweep_interval = Duration::from_secs(
            env_u64("SESSION_SWEEP_INTERVAL_SECS")
                .filter(|v| *v > 0)
                .unwrap_or(DEFAULT_SWEEP_INTERVAL_SECS),
        );

        let oracle_rules_path = env_string("ORACLE_RULES_PATH").map(PathBuf::from);
        let oracle_timeout =
            Duration::from_millis(env_u64("ORACLE_TIMEOUT_MS").unwrap_or(DEFAULT_ORACLE_TIMEOUT_MS));

        let defaults = TutorConfig::default();
        let tutor = TutorConfig {
            mastery: MasteryConfig {
                initial: env_f64("MASTERY_INITIAL").unwrap_or(defaults.mastery.initial),
                gain: env_f64("MASTERY_GAIN").unwrap_or(defaults.mastery.gain),
                decay: env_f64("MASTERY_DECAY").unwrap_or(defaults.mastery.decay),
                epsilon: env_f64("MASTERY_EPSILON").unwrap_or(defaults.mastery.epsilon),
            },
            tolerance: env_f64("ANSWER_TOLERANCE").unwrap_or(defaults.tolerance),
        }
        .sanitized();

        Self {
            host,
            port,
            log_level,
            log_dir,
            session_ttl,
            sweep_interval,
            oracle_rules_path,
            oracle_timeout,
            tutor,
        }
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_u64(key: &str) -> Option<u64> {
    env_string(key).and_then(|v| v.parse().ok())
}

fn env_f64(key: &str) -> Option<f64> {
    env_string(key)
        .and_then(|v| v.parse::<f64>().ok())
        .filter(|v| v.is_finite())
}
