//! Runtime configuration read from the process environment.

use std::path::PathBuf;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 5000;
const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid PORT `{value}`: {source}")]
    InvalidPort {
        value: String,
        source: std::num::ParseIntError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// When set, todos are persisted to this JSON file instead of memory.
    pub data_file: Option<PathBuf>,
    pub log_filter: String,
}

impl Config {
    /// Reads `HOST`, `PORT`, `TODO_DATA_FILE` and `RUST_LOG`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = match non_empty("PORT") {
            Some(value) => value
                .trim()
                .parse::<u16>()
                .map_err(|source| ConfigError::InvalidPort { value, source })?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            host: non_empty("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            data_file: non_empty("TODO_DATA_FILE").map(PathBuf::from),
            log_filter: non_empty("RUST_LOG").unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let config = config(&[]).unwrap();
        assert_eq!(config.bind_addr(), "0.0.0.0:5000");
        assert_eq!(config.data_file, None);
        assert_eq!(config.log_filter, "info");
    }

    #[test]
    fn overrides() {
        let config = config(&[
            ("HOST", "127.0.0.1"),
            ("PORT", "8080"),
            ("TODO_DATA_FILE", "/tmp/todos.json"),
            ("RUST_LOG", "todo_server=debug"),
        ])
        .unwrap();
        assert_eq!(config.bind_addr(), "127.0.0.1:8080");
        assert_eq!(config.data_file, Some(PathBuf::from("/tmp/todos.json")));
        assert_eq!(config.log_filter, "todo_server=debug");
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let config = config(&[("PORT", " "), ("HOST", "")]).unwrap();
        assert_eq!(config.bind_addr(), "0.0.0.0:5000");
    }

    #[test]
    fn invalid_port() {
        let err = config(&[("PORT", "http")]).unwrap_err();
        assert!(err.to_string().starts_with("invalid PORT `http`"));
    }
}
