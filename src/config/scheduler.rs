//! Scheduler configuration structures.

use std::collections::HashMap;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::core::AppResult;
use crate::util::types::{Strategy, UnitType};

/// Environment variable naming the JSON configuration file.
pub const CONFIG_PATH_ENV: &str = "RESOURCE_CONSTRAINT_CONFIG";

/// Store backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackendConfig {
    /// In-memory store for development/testing.
    #[default]
    InMemory,
    /// Postgres store.
    Postgres,
}

/// One constraint to register at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConstraintConfig {
    /// Owning account.
    pub account_id: String,
    /// Concurrent permits per resource unit.
    pub capacity: u32,
    /// Admission ordering policy.
    #[serde(default)]
    pub strategy: Strategy,
    /// What resource unit keys name.
    #[serde(default)]
    pub unit_type: UnitType,
}

/// Periodic recomputation of every live unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupConfig {
    /// Whether the sweeper runs.
    pub enabled: bool,
    /// Seconds between sweeps.
    pub interval_secs: u64,
}

impl Default for BackupConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_secs: 60,
        }
    }
}

const fn default_audit_buffer() -> usize {
    1024
}

/// Root scheduler configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Map of constraint name to configuration.
    pub constraints: HashMap<String, ConstraintConfig>,
    /// Store backend selection.
    #[serde(default)]
    pub store: StoreBackendConfig,
    /// Audit events kept in memory.
    #[serde(default = "default_audit_buffer")]
    pub audit_buffer: usize,
    /// Backup sweep settings.
    #[serde(default)]
    pub backup: BackupConfig,
}

impl ConstraintConfig {
    /// Validate constraint configuration values.
    pub fn validate(&self) -> Result<(), String> {
        if self.capacity == 0 {
            return Err("capacity must be greater than 0".into());
        }
        if self.account_id.trim().is_empty() {
            return Err("account_id must not be empty".into());
        }
        Ok(())
    }
}

impl SchedulerConfig {
    /// Validate all constraints and ensure at least one exists.
    pub fn validate(&self) -> Result<(), String> {
        if self.constraints.is_empty() {
            return Err("at least one constraint must be defined".into());
        }
        for (name, constraint) in &self.constraints {
            if name.trim().is_empty() {
                return Err("constraint names must not be empty".into());
            }
            constraint
                .validate()
                .map_err(|e| format!("constraint `{name}` invalid: {e}"))?;
        }
        if self.audit_buffer == 0 {
            return Err("audit_buffer must be greater than 0".into());
        }
        if self.backup.enabled && self.backup.interval_secs == 0 {
            return Err("backup.interval_secs must be greater than 0".into());
        }
        Ok(())
    }

    /// Parse scheduler configuration from a JSON string and validate.
    pub fn from_json_str(input: &str) -> Result<Self, String> {
        let cfg: Self = serde_json::from_str(input).map_err(|e| format!("parse error: {e}"))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read and validate a JSON configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading scheduler config {}", path.display()))?;
        Self::from_json_str(&raw)
            .map_err(anyhow::Error::msg)
            .with_context(|| format!("loading scheduler config {}", path.display()))
    }

    /// Load `.env` if present, then read the file named by `RESOURCE_CONSTRAINT_CONFIG`.
    ///
    /// A missing `.env` is fine; a malformed one is an error.
    pub fn from_env() -> AppResult<Self> {
        load_dotenv(dotenvy::dotenv())?;
        Self::from_named_path()
    }

    /// Same as [`Self::from_env`], loading variables from `dotenv_path` instead of `.env`.
    pub fn from_env_file(dotenv_path: impl AsRef<Path>) -> AppResult<Self> {
        let dotenv_path = dotenv_path.as_ref();
        load_dotenv(dotenvy::from_path(dotenv_path)).with_context(|| format!("loading {}", dotenv_path.display()))?;
        Self::from_named_path()
    }

    fn from_named_path() -> AppResult<Self> {
        let path = std::env::var(CONFIG_PATH_ENV).with_context(|| format!("{CONFIG_PATH_ENV} is not set"))?;
        Self::from_path(path)
    }
}

fn load_dotenv<T>(loaded: dotenvy::Result<T>) -> AppResult<()> {
    match loaded {
        Ok(_) => Ok(()),
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(anyhow::Error::new(e).context("parsing dotenv file")),
    }
}
