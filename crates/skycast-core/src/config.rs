use anyhow::{Context, Result};
use config::FileFormat;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

use crate::error::ConfigError;

/// Prefix for structured environment overrides, e.g. `SKYCAST__SMTP__HOST`.
pub const ENV_PREFIX: &str = "SKYCAST";

/// Points at an alternate config file.
pub const CONFIG_PATH_VAR: &str = "SKYCAST_CONFIG";

const DEFAULT_CONFIG_FILE: &str = "skycast.toml";

/// Flat variables used by existing deployments, mapped onto config keys.
/// They take precedence over every other source.
const LEGACY_ENV_KEYS: &[(&str, &str)] = &[
    ("PORT", "server.port"),
    ("API_KEY", "weather.api_key"),
    ("SMTP_EMAIL", "smtp.username"),
    ("SMTP_PASS", "smtp.password"),
];

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// All errors joined into one line
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// HTTP listener
    #[serde(default)]
    pub server: ServerConfig,

    /// User record database
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Weather provider
    #[serde(default)]
    pub weather: WeatherConfig,

    /// Outbound mail relay
    #[serde(default)]
    pub smtp: SmtpConfig,

    /// Periodic report job
    #[serde(default)]
    pub schedule: ScheduleConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl ServerConfig {
    /// `host:port` string suitable for `TcpListener::bind`
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite file holding user records
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        let path = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("skycast")
            .join("users.db");
        Self { path }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// Base URL of the OpenWeatherMap API
    pub api_url: String,

    /// OpenWeatherMap API key (`appid`)
    pub api_key: String,

    /// Upper bound for a single lookup
    pub timeout_secs: u64,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.openweathermap.org".to_string(),
            api_key: String::new(),
            timeout_secs: 10,
        }
    }
}

impl WeatherConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// How the SMTP connection is secured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TlsMode {
    /// Implicit TLS, usually port 465
    #[default]
    Tls,
    /// Plain connection upgraded with STARTTLS, usually port 587
    Starttls,
    /// Unencrypted; only for local relays
    None,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,

    /// Sender address. Falls back to `username` when unset.
    #[serde(default)]
    pub from: Option<String>,

    #[serde(default)]
    pub tls: TlsMode,

    /// Upper bound for connecting to and talking with the relay
    pub timeout_secs: u64,
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: "smtp.gmail.com".to_string(),
            port: 465,
            username: String::new(),
            password: String::new(),
            from: None,
            tls: TlsMode::Tls,
            timeout_secs: 30,
        }
    }
}

impl SmtpConfig {
    /// Address reports are sent from
    pub fn sender(&self) -> &str {
        self.from
            .as_deref()
            .filter(|from| !from.trim().is_empty())
            .unwrap_or(&self.username)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// Run the periodic report job
    pub enabled: bool,

    /// Hours between two ticks
    pub interval_hours: u32,

    /// Subject line of every report email
    pub subject: String,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_hours: 3,
            subject: "Hourly Weather Report".to_string(),
        }
    }
}

impl ScheduleConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(u64::from(self.interval_hours) * 60 * 60)
    }
}

impl Config {
    /// Load configuration from defaults, `skycast.toml` and the process environment
    pub fn load() -> Result<Self> {
        let vars: HashMap<String, String> = std::env::vars().collect();
        Self::load_from(&vars)
    }

    /// Load configuration using `vars` in place of the process environment.
    ///
    /// Sources, lowest precedence first: built-in defaults, the TOML file
    /// named by `SKYCAST_CONFIG` (or `./skycast.toml`), `SKYCAST__*`
    /// variables, then the flat deployment variables (`PORT`, `API_KEY`,
    /// `SMTP_EMAIL`, `SMTP_PASS`).
    pub fn load_from(vars: &HashMap<String, String>) -> Result<Self> {
        let file = vars
            .get(CONFIG_PATH_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

        let defaults = config::Config::try_from(&Config::default())
            .map_err(ConfigError::from)
            .context("Failed to serialize default config")?;

        let mut builder = config::Config::builder()
            .add_source(defaults)
            .add_source(
                config::File::from(file.as_path())
                    .format(FileFormat::Toml)
                    .required(false),
            )
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true)
                    .source(Some(vars.clone())),
            );

        for (var, key) in LEGACY_ENV_KEYS {
            builder = builder
                .set_override_option(*key, vars.get(*var).cloned())
                .map_err(ConfigError::from)?;
        }

        let layered = builder
            .build()
            .map_err(ConfigError::from)
            .with_context(|| format!("Failed to read config file {}", file.display()))?;

        let config: Config = layered
            .try_deserialize()
            .map_err(ConfigError::from)
            .context("Failed to parse configuration")?;

        Ok(config)
    }

    /// Load configuration and validate it
    ///
    /// Warnings are logged. Returns an error if validation fails with
    /// critical errors.
    pub fn load_validated() -> Result<Self> {
        let config = Self::load()?;
        let validation = config.validate();

        if !validation.is_valid() {
            anyhow::bail!(
                "Configuration validation failed: {}",
                validation.error_summary()
            );
        }

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok(config)
    }

    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        self.validate_url(&self.weather.api_url, "weather.api_url", &mut result);

        if self.weather.api_key.trim().is_empty() {
            result.add_warning(
                "weather.api_key",
                "No API key configured - weather lookups will be rejected",
            );
        }

        if self.weather.timeout_secs == 0 {
            result.add_error("weather.timeout_secs", "Timeout must be greater than 0");
        }

        if self.smtp.host.trim().is_empty() {
            result.add_error("smtp.host", "SMTP host is required");
        }

        if self.smtp.port == 0 {
            result.add_error("smtp.port", "Port cannot be 0");
        }

        if self.smtp.timeout_secs == 0 {
            result.add_error("smtp.timeout_secs", "Timeout must be greater than 0");
        }

        if self.smtp.username.trim().is_empty() {
            result.add_warning("smtp.username", "No SMTP credentials - relay may reject mail");
        }

        if self.smtp.sender().trim().is_empty() {
            result.add_warning(
                "smtp.from",
                "No sender address - set smtp.from or smtp.username",
            );
        }

        if self.smtp.tls == TlsMode::None {
            result.add_warning("smtp.tls", "SMTP credentials will be sent unencrypted");
        }

        if self.schedule.enabled {
            if self.schedule.interval_hours == 0 {
                result.add_error(
                    "schedule.interval_hours",
                    "Interval must be at least 1 hour",
                );
            } else if self.schedule.interval_hours > 24 * 7 {
                result.add_warning(
                    "schedule.interval_hours",
                    "Reports are sent less than once a week",
                );
            }
        }

        if self.server.port == 0 {
            result.add_warning("server.port", "Port 0 binds a random port");
        }

        result
    }

    fn validate_url(&self, url_str: &str, field_name: &str, result: &mut ValidationResult) {
        match Url::parse(url_str) {
            Ok(url) => {
                if url.scheme() != "http" && url.scheme() != "https" {
                    result.add_error(
                        field_name,
                        format!("URL must use http or https scheme, got: {}", url.scheme()),
                    );
                }

                if url.host().is_none() {
                    result.add_error(field_name, "URL must have a host");
                }
            }
            Err(e) => {
                result.add_error(field_name, format!("Invalid URL: {}", e));
            }
        }
    }
}
