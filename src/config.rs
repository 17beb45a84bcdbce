// src/config.rs
//! Application settings from `config.yaml`, environment and built-in defaults

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::pacing::Pacer;
use crate::utils::{ensure_dir_exists, resolve_path};

pub const CONFIG_FILE: &str = "config.yaml";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub database_path: PathBuf,
    pub output_path: PathBuf,
    /// Extra templates, one `<id>/manifest.toml` per directory
    pub templates_path: PathBuf,
    pub port: u16,
    pub generation_delay_ms: u64,
    pub review_delay_ms: u64,
    /// Converter run as `<cmd> <input.html> <output.pdf>`
    pub pdf_command: Option<String>,
    pub log_format: LogFormat,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("data/resume_studio.db"),
            output_path: PathBuf::from("out"),
            templates_path: PathBuf::from("templates"),
            port: 8000,
            generation_delay_ms: 2000,
            review_delay_ms: 1000,
            pdf_command: None,
            log_format: LogFormat::Text,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    local: AppConfig,
    production: AppConfig,
}

/// Values taken from the process environment
#[derive(Debug, Clone, Default)]
pub struct EnvOverrides {
    pub port: Option<String>,
    pub database_path: Option<String>,
    pub output_path: Option<String>,
}

impl EnvOverrides {
    pub fn from_env() -> Self {
        Self {
            port: std::env::var("ROCKET_PORT").ok(),
            database_path: std::env::var("RESUME_STUDIO_DB").ok(),
            output_path: std::env::var("RESUME_STUDIO_OUTPUT").ok(),
        }
    }
}

pub fn environment() -> String {
    std::env::var("RESUME_STUDIO_ENV")
        .or_else(|_| std::env::var("ENVIRONMENT"))
        .unwrap_or_else(|_| "local".to_string())
}

impl AppConfig {
    /// `config.yaml` in the working directory
    pub fn config_file() -> Result<PathBuf> {
        let base_dir = std::env::current_dir().context("Failed to get current directory")?;
        Ok(base_dir.join(CONFIG_FILE))
    }

    /// Load for the current environment from `./config.yaml`
    pub fn load() -> Result<Self> {
        let base_dir = std::env::current_dir().context("Failed to get current directory")?;
        Self::load_from(
            &Self::config_file()?,
            &environment(),
            &base_dir,
            &EnvOverrides::from_env(),
        )
    }

    pub fn load_from(
        config_path: &Path,
        environment: &str,
        base_dir: &Path,
        overrides: &EnvOverrides,
    ) -> Result<Self> {
        let mut config = if config_path.exists() {
            let content = std::fs::read_to_string(config_path)
                .with_context(|| format!("Failed to read {}", config_path.display()))?;
            let file: ConfigFile = serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse {}", config_path.display()))?;
            match environment {
                "production" => file.production,
                _ => file.local,
            }
        } else {
            Self::default()
        };

        if let Some(port) = &overrides.port {
            config.port = port
                .parse::<u16>()
                .map_err(|_| anyhow::anyhow!("ROCKET_PORT must be a valid port number"))?;
        }
        if let Some(path) = &overrides.database_path {
            config.database_path = PathBuf::from(path);
        }
        if let Some(path) = &overrides.output_path {
            config.output_path = PathBuf::from(path);
        }

        config.database_path = resolve_path(base_dir, &config.database_path);
        config.output_path = resolve_path(base_dir, &config.output_path);
        config.templates_path = resolve_path(base_dir, &config.templates_path);
        Ok(config)
    }

    /// Output directory and the database's parent directory
    pub fn ensure_directories(&self) -> Result<()> {
        ensure_dir_exists(&self.output_path)?;
        if let Some(parent) = self.database_path.parent() {
            ensure_dir_exists(parent)?;
        }
        Ok(())
    }

    pub fn generation_pacer(&self) -> Pacer {
        Pacer::from_millis(self.generation_delay_ms)
    }

    pub fn review_pacer(&self) -> Pacer {
        Pacer::from_millis(self.review_delay_ms)
    }
}
