use std::{net::SocketAddr, path::PathBuf, str::FromStr, time::Duration};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key}: cannot parse {value:?}")]
    Invalid { key: &'static str, value: String },
    #[error("{0} must be greater than zero")]
    Zero(&'static str),
}

/// Runtime settings, read from the environment (and `.env` via `dotenvy`)
#[derive(Debug, Clone)]
pub struct Config {
    /// MICROBLOG_ADDR
    pub addr: SocketAddr,
    /// LIKE_QUEUE_CAPACITY
    pub like_queue_capacity: usize,
    /// LIKE_QUEUE_WORKERS
    pub like_queue_workers: usize,
    /// LOG_FILE; an empty value turns the file sink off
    pub log_file: Option<PathBuf>,
    /// REQUEST_TIMEOUT_SECS
    pub request_timeout: Duration,
    /// LOG_FLUSH_GRACE_MS
    pub log_flush_grace: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            like_queue_capacity: crate::queue::DEFAULT_CAPACITY,
            like_queue_workers: crate::queue::DEFAULT_WORKERS,
            log_file: Some(PathBuf::from("app.log")),
            request_timeout: Duration::from_secs(15),
            log_flush_grace: Duration::from_millis(100),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let log_file = match lookup("LOG_FILE") {
            Some(path) if path.trim().is_empty() => None,
            Some(path) => Some(PathBuf::from(path)),
            None => defaults.log_file,
        };

        let config = Self {
            addr: parse(&lookup, "MICROBLOG_ADDR", defaults.addr)?,
            like_queue_capacity: parse(&lookup, "LIKE_QUEUE_CAPACITY", defaults.like_queue_capacity)?,
            like_queue_workers: parse(&lookup, "LIKE_QUEUE_WORKERS", defaults.like_queue_workers)?,
            log_file,
            request_timeout: Duration::from_secs(parse(
                &lookup,
                "REQUEST_TIMEOUT_SECS",
                defaults.request_timeout.as_secs(),
            )?),
            log_flush_grace: Duration::from_millis(parse(
                &lookup,
                "LOG_FLUSH_GRACE_MS",
                defaults.log_flush_grace.as_millis() as u64,
            )?),
        };

        if config.like_queue_capacity == 0 {
            return Err(ConfigError::Zero("LIKE_QUEUE_CAPACITY"));
        }
        if config.like_queue_workers == 0 {
            return Err(ConfigError::Zero("LIKE_QUEUE_WORKERS"));
        }
        Ok(config)
    }
}

fn parse<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(default),
    }
}
