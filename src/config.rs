//! Application configuration management.
//!
//! Provides typed configuration loaded from environment variables with validation.

use std::time::Duration;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// PostgreSQL database connection URL
    pub database_url: String,

    /// Address the HTTP server binds to
    pub bind_address: String,

    /// Server port to bind to
    pub port: u16,

    /// Database connection pool settings
    pub pool: PoolConfig,

    /// Connection and schema settings
    pub database: DatabaseConfig,

    /// Observability settings
    pub observability: ObservabilityConfig,
}

/// Database connection pool configuration.
#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// Maximum number of connections in the pool
    pub max_size: u32,

    /// Minimum number of idle connections to maintain
    pub min_idle: u32,

    /// Maximum lifetime of a connection
    pub max_lifetime: Duration,

    /// Idle timeout for connections
    pub idle_timeout: Duration,

    /// Connection acquisition timeout
    pub connection_timeout: Duration,

    /// Number of retries when acquiring a connection
    pub acquire_retries: u32,

    /// Delay between retry attempts
    pub retry_delay: Duration,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Connect through rustls with the platform certificate verifier
    pub tls: bool,

    /// Apply embedded migrations at startup
    pub run_migrations: bool,
}

/// Observability configuration for logging and metrics.
#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    /// Threshold in milliseconds for slow query warnings
    pub slow_query_threshold_ms: u64,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_size: 10,
            min_idle: 2,
            max_lifetime: Duration::from_secs(60 * 60 * 24), // 24 hours
            idle_timeout: Duration::from_secs(60 * 2),       // 2 minutes
            connection_timeout: Duration::from_secs(30),
            acquire_retries: 3,
            retry_delay: Duration::from_millis(100),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            tls: false,
            run_migrations: true,
        }
    }
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            slow_query_threshold_ms: 100,
        }
    }
}

/// Configuration loading error.
#[derive(Debug)]
pub struct ConfigError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Configuration error for '{}': {}",
            self.field, self.message
        )
    }
}

impl std::error::Error for ConfigError {}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Required environment variables:
    /// - `DATABASE_URL`: PostgreSQL connection string
    ///
    /// Optional environment variables:
    /// - `BIND_ADDRESS`: Interface to listen on (default: 0.0.0.0)
    /// - `PORT`: Server port (default: 8884)
    /// - `POOL_MAX_SIZE`: Max pool connections (default: 10)
    /// - `POOL_MIN_IDLE`: Min idle connections (default: 2)
    /// - `POOL_ACQUIRE_RETRIES`: Connection acquire retries (default: 3)
    /// - `POOL_RETRY_DELAY_MS`: Delay between acquire retries in ms (default: 100)
    /// - `POOL_TIMEOUT_SECS`: Connection acquisition timeout (default: 30)
    /// - `DATABASE_TLS`: Connect to PostgreSQL over TLS (default: 0)
    /// - `RUN_MIGRATIONS`: Apply embedded migrations at startup (default: 1)
    /// - `SLOW_QUERY_THRESHOLD_MS`: Threshold for slow query warnings in ms (default: 100)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_source(|name| std::env::var(name).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_source(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url = lookup("DATABASE_URL").ok_or_else(|| ConfigError {
            field: "DATABASE_URL".to_string(),
            message: "Required environment variable not set".to_string(),
        })?;

        let bind_address = lookup("BIND_ADDRESS").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = parse_or(&lookup, "PORT", 8884)?;

        let pool = PoolConfig {
            max_size: parse_or(&lookup, "POOL_MAX_SIZE", 10)?,
            min_idle: parse_or(&lookup, "POOL_MIN_IDLE", 2)?,
            acquire_retries: parse_or(&lookup, "POOL_ACQUIRE_RETRIES", 3)?,
            retry_delay: Duration::from_millis(parse_or(&lookup, "POOL_RETRY_DELAY_MS", 100)?),
            connection_timeout: Duration::from_secs(parse_or(&lookup, "POOL_TIMEOUT_SECS", 30)?),
            ..Default::default()
        };

        let database = DatabaseConfig {
            tls: parse_or(&lookup, "DATABASE_TLS", 0)? != 0,
            run_migrations: parse_or(&lookup, "RUN_MIGRATIONS", 1)? != 0,
        };

        let observability = ObservabilityConfig {
            slow_query_threshold_ms: parse_or(&lookup, "SLOW_QUERY_THRESHOLD_MS", 100)?,
        };

        let config = Self {
            database_url,
            bind_address,
            port,
            pool,
            database,
            observability,
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.database_url.is_empty() {
            return Err(ConfigError {
                field: "DATABASE_URL".to_string(),
                message: "Cannot be empty".to_string(),
            });
        }

        if !self.database_url.starts_with("postgres://")
            && !self.database_url.starts_with("postgresql://")
        {
            return Err(ConfigError {
                field: "DATABASE_URL".to_string(),
                message: "Must start with postgres:// or postgresql://".to_string(),
            });
        }

        if self.bind_address.trim().is_empty() {
            return Err(ConfigError {
                field: "BIND_ADDRESS".to_string(),
                message: "Cannot be empty".to_string(),
            });
        }

        if self.pool.max_size == 0 {
            return Err(ConfigError {
                field: "POOL_MAX_SIZE".to_string(),
                message: "Must be greater than 0".to_string(),
            });
        }

        if self.pool.min_idle > self.pool.max_size {
            return Err(ConfigError {
                field: "POOL_MIN_IDLE".to_string(),
                message: "Cannot be greater than POOL_MAX_SIZE".to_string(),
            });
        }

        Ok(())
    }
}

/// Parse a looked-up value or return a default value.
fn parse_or<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(name) {
        Some(val) => val.trim().parse().map_err(|_| ConfigError {
            field: name.to_string(),
            message: format!("Invalid value '{}', expected a valid number", val),
        }),
        None => Ok(default),
    }
}
