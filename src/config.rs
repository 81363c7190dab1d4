//! Configuration management for herakles-check-procs.
//!
//! This module handles loading, merging, and validating configuration from files
//! and CLI arguments. It supports YAML, JSON, and TOML formats. The merged
//! [`Config`] is turned into an immutable [`CheckConfig`] before any record is
//! evaluated; every validation failure is fatal.

use crate::cli::{Args, ConfigFormat};
use anyhow::Context;
use herakles_check_procs::{
    CheckConfig, ConfigError, FilterSet, StatusLetters, ThreadStateLetters, ThresholdBand,
    Thresholds,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

pub const DEFAULT_LOG_LEVEL: &str = "warn";

const DEFAULT_CONFIG_PATHS: [&str; 7] = [
    "/etc/herakles/check-procs.yaml",
    "/etc/herakles/check-procs.yml",
    "/etc/herakles/check-procs.json",
    "/etc/herakles/check-procs.toml",
    "./herakles-check-procs.yaml",
    "./herakles-check-procs.yml",
    "./herakles-check-procs.json",
];

/// File and CLI configuration before validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    // Filters
    pub command: Option<String>,
    #[serde(alias = "args")]
    pub argument: Option<String>,
    pub status: Option<String>,
    #[serde(alias = "not-status")]
    pub not_status: Option<String>,
    #[serde(alias = "thread-status")]
    pub thread_status: Option<String>,
    #[serde(alias = "not-thread-status")]
    pub not_thread_status: Option<String>,
    pub pid: Option<u32>,
    pub user: Option<String>,

    // Limits as "upper:lower"
    pub warning: Option<String>,
    pub critical: Option<String>,

    // Mode
    pub threads: Option<bool>,

    // Logging
    #[serde(alias = "log-level")]
    pub log_level: Option<String>,

    /// Path to JSON snapshot file (uses recorded data instead of /proc)
    #[serde(alias = "snapshot-file")]
    pub snapshot_file: Option<PathBuf>,
}

impl Config {
    /// Validates the configuration and builds the check configuration.
    pub fn to_check_config(&self, self_pid: Option<u32>) -> Result<CheckConfig, ConfigError> {
        let filters = FilterSet {
            command: self.command.clone(),
            argument: self.argument.clone(),
            status_in: self.status.as_deref().map(StatusLetters::parse).transpose()?,
            status_not_in: self
                .not_status
                .as_deref()
                .map(StatusLetters::parse)
                .transpose()?,
            thread_status_in: self
                .thread_status
                .as_deref()
                .map(ThreadStateLetters::parse)
                .transpose()?,
            thread_status_not_in: self
                .not_thread_status
                .as_deref()
                .map(ThreadStateLetters::parse)
                .transpose()?,
            pid: self.pid,
            user: self.user.clone(),
        };
        filters.validate()?;

        let warning = self
            .warning
            .as_deref()
            .map(|v| ThresholdBand::parse_for("warning", v))
            .transpose()?;
        let critical = self
            .critical
            .as_deref()
            .map(|v| ThresholdBand::parse_for("critical", v))
            .transpose()?;
        let thresholds = Thresholds::new(warning, critical)?;

        Ok(CheckConfig {
            filters,
            thresholds,
            thread_mode: self.threads.unwrap_or(false),
            self_pid,
        })
    }
}

/// Resolves configuration from CLI args, config file, and defaults.
/// This enforces precedence: CLI (if provided) > config file > default.
pub fn resolve_config(args: &Args) -> anyhow::Result<Config> {
    let mut config = if args.no_config {
        Config::default()
    } else {
        load_config(args.config.as_deref())?
    };

    override_with(&mut config.command, &args.command_name);
    override_with(&mut config.argument, &args.argument);
    override_with(&mut config.status, &args.status);
    override_with(&mut config.not_status, &args.not_status);
    override_with(&mut config.thread_status, &args.thread_status);
    override_with(&mut config.not_thread_status, &args.not_thread_status);
    override_with(&mut config.pid, &args.pid);
    override_with(&mut config.user, &args.user);
    override_with(&mut config.warning, &args.warning);
    override_with(&mut config.critical, &args.critical);
    override_with(&mut config.snapshot_file, &args.snapshot_file);

    if args.threads {
        config.threads = Some(true);
    }

    if args.debug {
        config.log_level = Some("debug".into());
    }
    if let Some(level) = &args.log_level {
        config.log_level = Some(format!("{:?}", level).to_lowercase());
    }

    Ok(config)
}

fn override_with<T: Clone>(target: &mut Option<T>, cli: &Option<T>) {
    if let Some(value) = cli {
        *target = Some(value.clone());
    }
}

/// Configuration loading with multiple format support
pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => match DEFAULT_CONFIG_PATHS.iter().find(|p| Path::new(p).exists()) {
            Some(p) => PathBuf::from(p),
            None => return Ok(Config::default()),
        },
    };

    let content = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;

    let config: Config = match path.extension().and_then(|s| s.to_str()) {
        Some("json") => serde_json::from_str(&content)
            .with_context(|| format!("Invalid JSON config {}", path.display()))?,
        Some("toml") => toml::from_str(&content)
            .with_context(|| format!("Invalid TOML config {}", path.display()))?,
        _ => serde_yaml::from_str(&content)
            .with_context(|| format!("Invalid YAML config {}", path.display()))?,
    };
    info!("Loaded configuration from: {}", path.display());
    Ok(config)
}

/// Renders configuration in the requested format
pub fn render_config(config: &Config, format: &ConfigFormat) -> anyhow::Result<String> {
    Ok(match format {
        ConfigFormat::Json => serde_json::to_string_pretty(config)?,
        ConfigFormat::Toml => toml::to_string_pretty(config)?,
        ConfigFormat::Yaml => serde_yaml::to_string(config)?,
    })
}
