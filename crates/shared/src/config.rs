//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Leave policy defaults.
    #[serde(default)]
    pub leave: LeavePolicyConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// Defaults applied when a tenant has not configured a leave type yet.
#[derive(Debug, Clone, Deserialize)]
pub struct LeavePolicyConfig {
    /// Leave type used when a caller does not name one.
    #[serde(default = "default_leave_type")]
    pub default_leave_type: String,
    /// Days per service year written when a new leave type table is seeded.
    /// Kept as a string so it parses losslessly into a decimal.
    #[serde(default = "default_seed_days")]
    pub seed_days_per_year: String,
    /// Whether summary reports skip employees who have already exited.
    #[serde(default)]
    pub summary_active_only: bool,
}

fn default_leave_type() -> String {
    "Annual Leave".to_string()
}

fn default_seed_days() -> String {
    "14".to_string()
}

impl Default for LeavePolicyConfig {
    fn default() -> Self {
        Self {
            default_leave_type: default_leave_type(),
            seed_days_per_year: default_seed_days(),
            summary_active_only: false,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// `tracing` filter directive used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub filter: String,
    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

fn default_log_filter() -> String {
    "leavebook=info,sea_orm=warn".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            json: false,
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// Sources, later ones winning: `config/default`, `config/{RUN_MODE}`,
    /// then `LEAVEBOOK__SECTION__KEY` environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("LEAVEBOOK").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
