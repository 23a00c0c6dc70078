// src/core/config.rs
use std::env;
use std::path::{Path, PathBuf};

use log::LevelFilter;

use crate::storage::{self, Backend};
use crate::utils::default_storage_file;

// Configuration for the password generator and its stores
#[derive(Debug, Clone)]
pub struct Config {
    // Storage
    pub storage_file: PathBuf,
    pub storage_dsn: Option<String>,

    // Password Generation
    pub default_length: usize,

    // Logging
    pub log_level: LevelFilter,

    // Problems found while loading; the logger is not up yet at that point
    pub warnings: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_file: default_storage_file(),
            storage_dsn: None,
            default_length: 16,
            log_level: LevelFilter::Warn,
            warnings: Vec::new(),
        }
    }
}

impl Config {
    // Load configuration from environment variables (and `.env`, if the caller loaded it)
    pub fn load() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        // Storage
        if let Some(file) = lookup("PASSGEN_STORAGE_FILE").filter(|f| !f.trim().is_empty()) {
            config.storage_file = PathBuf::from(file);
        }

        if let Some(dsn) = lookup("PASSGEN_DSN").filter(|d| !d.trim().is_empty()) {
            config.storage_dsn = Some(dsn);
        }

        // Password Generation
        if let Some(val) = lookup("PASSGEN_DEFAULT_LENGTH") {
            match val.parse() {
                Ok(length) => config.default_length = length,
                Err(_) => config
                    .warnings
                    .push(format!("Ignoring invalid PASSGEN_DEFAULT_LENGTH '{}'", val)),
            }
        }

        // Logging
        if let Some(level) = lookup("LOG_LEVEL") {
            match level.to_lowercase().as_str() {
                "off" => config.log_level = LevelFilter::Off,
                "error" => config.log_level = LevelFilter::Error,
                "warn" => config.log_level = LevelFilter::Warn,
                "info" => config.log_level = LevelFilter::Info,
                "debug" => config.log_level = LevelFilter::Debug,
                "trace" => config.log_level = LevelFilter::Trace,
                _ => {
                    let warning = format!("Unknown log level '{}', using {}", level, config.log_level);
                    config.warnings.push(warning);
                }
            }
        }

        config
    }

    // Emit the warnings collected by `from_lookup`; call once logging is initialised
    pub fn report_warnings(&self) {
        for warning in &self.warnings {
            log::warn!("{}", warning);
        }
    }

    /// Resolve the backend for one command.
    ///
    /// Flags beat the environment, and a DSN beats a file at the same level.
    pub fn backend(
        &self,
        storage_file: Option<&Path>,
        storage_dsn: Option<&str>,
    ) -> storage::Result<Backend> {
        // a blank `--storage-dsn` counts as absent
        let storage_dsn = storage_dsn.map(str::trim).filter(|dsn| !dsn.is_empty());
        if storage_dsn.is_some() {
            return Backend::select(storage_dsn, &self.storage_file);
        }
        if let Some(file) = storage_file {
            return Backend::select(None, file);
        }
        Backend::select(self.storage_dsn.as_deref(), &self.storage_file)
    }
}
