use clients_contracts::DbPool;
use clients_contracts::config::{Config, DatabaseConfig, ObservabilityConfig, PoolConfig};
use clients_contracts::handlers::AppState;
use std::sync::Arc;

/// Create test configuration
pub fn test_config(database_url: &str) -> Arc<Config> {
    Arc::new(Config {
        database_url: database_url.to_string(),
        bind_address: "127.0.0.1".to_string(),
        port: 8884,
        pool: PoolConfig {
            max_size: 5,
            min_idle: 1,
            acquire_retries: 2,
            retry_delay: std::time::Duration::from_millis(50),
            ..Default::default()
        },
        database: DatabaseConfig {
            tls: false,
            run_migrations: false,
        },
        observability: ObservabilityConfig::default(),
    })
}

/// Create app state for tests
pub fn create_test_state(pool: DbPool, database_url: &str) -> AppState {
    AppState {
        pool,
        config: test_config(database_url),
    }
}
