use std::time::Duration;

use serde::Deserialize;

use codestore_core::config::Config;

use crate::domain::types::DEFAULT_CODE_LENGTH;

/// Code store configuration loaded from environment variables.
#[derive(Debug, Deserialize)]
pub struct CodeStoreConfig {
    /// Database connection URL. Env var: `DATABASE_URL`.
    pub database_url: String,
    /// Seconds between expired-code sweeps (default 60). Env var: `CLEANUP_INTERVAL_SECS`.
    #[serde(default = "default_cleanup_interval_secs")]
    pub cleanup_interval_secs: u64,
    /// Whether the sweep runs at all (default true). Env var: `CLEANUP_ENABLED`.
    #[serde(default = "default_true")]
    pub cleanup_enabled: bool,
    /// Characters per generated code (default 10). Env var: `CODE_LENGTH`.
    #[serde(default = "default_code_length")]
    pub code_length: usize,
    /// Apply pending migrations at startup (default true). Env var: `RUN_MIGRATIONS`.
    #[serde(default = "default_true")]
    pub run_migrations: bool,
}

fn default_cleanup_interval_secs() -> u64 {
    60
}

fn default_code_length() -> usize {
    DEFAULT_CODE_LENGTH
}

fn default_true() -> bool {
    true
}

impl Config for CodeStoreConfig {}

impl CodeStoreConfig {
    /// Sweep interval, never shorter than one second.
    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval_secs.max(1))
    }
}
