//! Configuration management for the `WaveCast` service
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::WaveCastError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure for the `WaveCast` service
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveCastConfig {
    /// HTTP server configuration
    pub server: ServerConfig,
    /// Forecast request settings
    pub forecast: ForecastConfig,
    /// Forecast model backend configuration
    pub model: ModelConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Directory served for every path outside `/api`
    pub static_dir: String,
    /// PEM certificate, only used with the `tls` feature
    pub tls_cert: Option<PathBuf>,
    /// PEM private key, only used with the `tls` feature
    pub tls_key: Option<PathBuf>,
}

/// Forecast request settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    /// Steps returned when the request does not name a count
    pub default_steps: u32,
    /// Hours between two consecutive forecast steps
    pub step_hours: u32,
}

/// Forecast model backend settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Try to load the model at startup; the random fallback is used otherwise
    pub enabled: bool,
    /// Base URL of the inference server hosting the checkpoint
    pub endpoint: Option<String>,
    /// Checkpoint repository
    pub repo: String,
    /// Checkpoint file name inside the repository
    pub checkpoint: String,
    /// Device requested from the inference server (cpu or cuda)
    pub device: String,
    /// Timeout for a single load or rollout request in seconds
    pub timeout_seconds: u32,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    pub level: String,
    /// Log format (pretty or json)
    pub format: String,
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    7860
}

fn default_static_dir() -> String {
    "static".to_string()
}

fn default_steps() -> u32 {
    8
}

fn default_step_hours() -> u32 {
    6
}

fn default_model_repo() -> String {
    "microsoft/aurora".to_string()
}

fn default_model_checkpoint() -> String {
    "aurora-0.25-small-pretrained.ckpt".to_string()
}

fn default_model_device() -> String {
    "cpu".to_string()
}

fn default_model_timeout() -> u32 {
    120
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: default_static_dir(),
            tls_cert: None,
            tls_key: None,
        }
    }
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            default_steps: default_steps(),
            step_hours: default_step_hours(),
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: None,
            repo: default_model_repo(),
            checkpoint: default_model_checkpoint(),
            device: default_model_device(),
            timeout_seconds: default_model_timeout(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl WaveCastConfig {
    /// Load configuration from the given path, or the default location when
    /// none is given, then layer environment variables on top
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        // Load from file if path is provided or use default location
        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // Add environment variable overrides, e.g. WAVECAST_SERVER__PORT
        builder = builder.add_source(
            Environment::with_prefix("WAVECAST")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        // Hosting platforms hand out the listening port as plain PORT
        let platform_port = std::env::var("PORT")
            .ok()
            .and_then(|port| port.parse::<u16>().ok())
            .map(i64::from);
        builder = builder
            .set_override_option("server.port", platform_port)
            .with_context(|| "Failed to apply PORT override")?;

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: WaveCastConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        // Apply defaults for missing values
        config.apply_defaults();

        // Validate configuration
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("wavecast").join("config.toml"))
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        if self.server.host.is_empty() {
            self.server.host = default_host();
        }
        if self.server.port == 0 {
            self.server.port = default_port();
        }
        if self.server.static_dir.is_empty() {
            self.server.static_dir = default_static_dir();
        }
        if self.forecast.default_steps == 0 {
            self.forecast.default_steps = default_steps();
        }
        if self.forecast.step_hours == 0 {
            self.forecast.step_hours = default_step_hours();
        }
        if self.model.repo.is_empty() {
            self.model.repo = default_model_repo();
        }
        if self.model.checkpoint.is_empty() {
            self.model.checkpoint = default_model_checkpoint();
        }
        if self.model.device.is_empty() {
            self.model.device = default_model_device();
        }
        if self.model.timeout_seconds == 0 {
            self.model.timeout_seconds = default_model_timeout();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_model()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate the model backend settings
    pub fn validate_model(&self) -> Result<()> {
        if let Some(endpoint) = &self.model.endpoint {
            if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
                return Err(WaveCastError::config(
                    "Model endpoint must be a valid HTTP or HTTPS URL",
                )
                .into());
            }
        } else if self.model.enabled {
            return Err(WaveCastError::config(
                "Model is enabled but no model endpoint is configured",
            )
            .into());
        }

        let valid_devices = ["cpu", "cuda"];
        if !valid_devices.contains(&self.model.device.as_str()) {
            return Err(WaveCastError::config(format!(
                "Invalid model device '{}'. Must be one of: {}",
                self.model.device,
                valid_devices.join(", ")
            ))
            .into());
        }

        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.forecast.step_hours > 24 {
            return Err(WaveCastError::config("Forecast step cannot exceed 24 hours").into());
        }

        if self.model.timeout_seconds > 3600 {
            return Err(WaveCastError::config("Model timeout cannot exceed 3600 seconds").into());
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(WaveCastError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(WaveCastError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        if self.server.tls_cert.is_some() != self.server.tls_key.is_some() {
            return Err(WaveCastError::config("TLS needs both a certificate and a key").into());
        }

        Ok(())
    }

    /// Socket address string the server binds to
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
