use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;
use std::fmt;
use std::path::Path;
use thiserror::Error;
use tracing::{error, info};
use validator::{Validate, ValidationError};

/// Default values for configuration
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_ENV: &str = "development";
const DEFAULT_CORS_ORIGIN: &str = "http://localhost:4200";
const DEFAULT_PRODUCTS_PORT: u16 = 5001;
const DEFAULT_TRANSACTIONS_PORT: u16 = 5002;
const DEFAULT_PAGE_SIZE: u64 = 10;
const CONFIG_DIR: &str = "config";

/// Which of the two services a process is running.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ServiceKind {
    Products,
    Transactions,
}

impl ServiceKind {
    /// Short name used for config file lookup and log output
    pub fn name(&self) -> &'static str {
        match self {
            ServiceKind::Products => "products",
            ServiceKind::Transactions => "transactions",
        }
    }

    /// Environment variable prefix, e.g. `PRODUCTS__PORT`
    pub fn env_prefix(&self) -> &'static str {
        match self {
            ServiceKind::Products => "PRODUCTS",
            ServiceKind::Transactions => "TRANSACTIONS",
        }
    }

    fn default_port(&self) -> u16 {
        match self {
            ServiceKind::Products => DEFAULT_PRODUCTS_PORT,
            ServiceKind::Transactions => DEFAULT_TRANSACTIONS_PORT,
        }
    }

    fn default_database_url(&self) -> String {
        format!("sqlite://{}.db?mode=rwc", self.name())
    }
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Application configuration structure with validation
#[derive(Clone, Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Database connection URL
    pub database_url: String,

    /// Server host address
    pub host: String,

    /// Server port
    pub port: u16,

    /// Application environment
    pub environment: String,

    /// Logging level
    #[serde(default = "default_log_level")]
    #[validate(custom = "validate_log_level")]
    pub log_level: String,

    /// Log in JSON format (structured logging)
    #[serde(default)]
    pub log_json: bool,

    /// Whether to run database migrations on startup
    #[serde(default)]
    pub auto_migrate: bool,

    /// CORS: the single origin allowed to call the service
    #[serde(default = "default_cors_origin")]
    #[validate(url)]
    pub cors_allowed_origin: String,

    /// DB pool: max connections
    #[serde(default = "default_db_max_connections")]
    #[validate(range(min = 1))]
    pub db_max_connections: u32,

    /// DB pool: min connections
    #[serde(default = "default_db_min_connections")]
    pub db_min_connections: u32,

    /// DB timeouts (seconds)
    #[serde(default = "default_db_connect_timeout_secs")]
    pub db_connect_timeout_secs: u64,
    #[serde(default = "default_db_idle_timeout_secs")]
    pub db_idle_timeout_secs: u64,
    #[serde(default = "default_db_acquire_timeout_secs")]
    pub db_acquire_timeout_secs: u64,

    /// Base URL of the Product Store, e.g. `http://localhost:5001`
    #[validate(url)]
    pub products_service_url: String,

    /// Base URL of the Transaction Service, e.g. `http://localhost:5002`
    #[validate(url)]
    pub transactions_service_url: String,

    /// Page size used when a list request does not specify one
    #[serde(default = "default_api_page_size")]
    #[validate(range(min = 1))]
    pub api_default_page_size: u64,
}

impl AppConfig {
    /// Built-in defaults for a service, before any file or environment overrides.
    pub fn for_service(service: ServiceKind) -> Self {
        Self {
            database_url: service.default_database_url(),
            host: "0.0.0.0".to_string(),
            port: service.default_port(),
            environment: DEFAULT_ENV.to_string(),
            log_level: default_log_level(),
            log_json: false,
            auto_migrate: true,
            cors_allowed_origin: default_cors_origin(),
            db_max_connections: default_db_max_connections(),
            db_min_connections: default_db_min_connections(),
            db_connect_timeout_secs: default_db_connect_timeout_secs(),
            db_idle_timeout_secs: default_db_idle_timeout_secs(),
            db_acquire_timeout_secs: default_db_acquire_timeout_secs(),
            products_service_url: format!("http://localhost:{}", DEFAULT_PRODUCTS_PORT),
            transactions_service_url: format!("http://localhost:{}", DEFAULT_TRANSACTIONS_PORT),
            api_default_page_size: default_api_page_size(),
        }
    }

    /// Gets log level reference
    pub fn log_level(&self) -> &str {
        &self.log_level
    }

    /// Socket address string the HTTP server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Peer base URLs handed to the inter-service clients
    pub fn endpoints(&self) -> ServiceEndpoints {
        ServiceEndpoints {
            products_url: self.products_service_url.trim_end_matches('/').to_string(),
            transactions_url: self.transactions_service_url.trim_end_matches('/').to_string(),
        }
    }
}

/// Base URLs of both services. Passed explicitly to the clients at construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServiceEndpoints {
    pub products_url: String,
    pub transactions_url: String,
}

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum AppConfigError {
    #[error("Configuration loading failed: {0}")]
    Load(#[from] ConfigError),

    #[error("Configuration validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

fn default_cors_origin() -> String {
    DEFAULT_CORS_ORIGIN.to_string()
}

fn default_db_max_connections() -> u32 {
    16
}
fn default_db_min_connections() -> u32 {
    1
}
fn default_db_connect_timeout_secs() -> u64 {
    30
}
fn default_db_idle_timeout_secs() -> u64 {
    600
}
fn default_db_acquire_timeout_secs() -> u64 {
    8
}

fn default_api_page_size() -> u64 {
    DEFAULT_PAGE_SIZE
}

/// Validates log level values
fn validate_log_level(level: &str) -> Result<(), ValidationError> {
    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if valid_levels.contains(&level.to_lowercase().as_str()) {
        Ok(())
    } else {
        let mut err = ValidationError::new("log_level");
        err.message = Some("Must be one of: trace, debug, info, warn, error".into());
        Err(err)
    }
}

/// Initializes tracing using the provided log level as the default filter
pub fn init_tracing(level: &str, json: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_directive = format!("stock_services={},tower_http=debug", level);
    let filter_directive = env::var("RUST_LOG")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(default_directive);

    let filter = EnvFilter::new(filter_directive);
    if json {
        let _ = fmt().with_env_filter(filter).json().try_init();
    } else {
        let _ = fmt().with_env_filter(filter).try_init();
    }
}

/// Loads the configuration of one service
///
/// Layers configuration sources in this order:
/// 1. Built-in defaults for the service
/// 2. Shared config (config/default.toml)
/// 3. Service config (config/{service}.toml)
/// 4. Environment-specific config (config/{env}.toml)
/// 5. Environment variables (`PRODUCTS__*` or `TRANSACTIONS__*`)
pub fn load_config(service: ServiceKind) -> Result<AppConfig, AppConfigError> {
    let run_env = env::var("RUN_ENV")
        .or_else(|_| env::var("APP_ENV"))
        .unwrap_or_else(|_| DEFAULT_ENV.to_string());
    info!(
        "Loading {} configuration for environment: {}",
        service, run_env
    );

    if !Path::new(CONFIG_DIR).exists() {
        info!(
            "Config directory '{}' not found; relying on built-in defaults and environment variables",
            CONFIG_DIR
        );
    }

    let defaults = AppConfig::for_service(service);
    let config = Config::builder()
        .set_default("database_url", defaults.database_url)?
        .set_default("host", defaults.host)?
        .set_default("port", i64::from(defaults.port))?
        .set_default("environment", run_env.clone())?
        .set_default("log_level", defaults.log_level)?
        .set_default("log_json", defaults.log_json)?
        .set_default("auto_migrate", defaults.auto_migrate)?
        .set_default("products_service_url", defaults.products_service_url)?
        .set_default("transactions_service_url", defaults.transactions_service_url)?
        .add_source(File::with_name(&format!("{}/default", CONFIG_DIR)).required(false))
        .add_source(File::with_name(&format!("{}/{}", CONFIG_DIR, service.name())).required(false))
        .add_source(File::with_name(&format!("{}/{}", CONFIG_DIR, run_env)).required(false))
        .add_source(Environment::with_prefix(service.env_prefix()).separator("__"))
        .build()?;

    let app_config: AppConfig = config.try_deserialize()?;

    app_config.validate().map_err(|e| {
        error!("Configuration validation failed: {:?}", e);
        AppConfigError::Validation(e)
    })?;

    info!("Configuration loaded successfully");
    Ok(app_config)
}
