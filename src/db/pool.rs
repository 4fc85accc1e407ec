use diesel::{ConnectionError, ConnectionResult};
use diesel_async::AsyncPgConnection;
use diesel_async::pooled_connection::{AsyncDieselConnectionManager, ManagerConfig, bb8::Pool};
use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use rustls::ClientConfig;
use rustls_platform_verifier::ConfigVerifierExt;

use crate::{DbPool, config::Config, error::{ContractsError, ContractsResult}};

/// Build the shared connection pool. With `database.tls` set, connections go through
/// rustls and the platform certificate verifier.
pub async fn initialize_db_pool(config: &Config) -> ContractsResult<DbPool> {
    let manager = if config.database.tls {
        let mut manager_config = ManagerConfig::default();
        manager_config.custom_setup = Box::new(establish_tls_connection);
        AsyncDieselConnectionManager::<AsyncPgConnection>::new_with_config(
            &config.database_url,
            manager_config,
        )
    } else {
        AsyncDieselConnectionManager::<AsyncPgConnection>::new(&config.database_url)
    };

    let pool = Pool::builder()
        .max_size(config.pool.max_size)
        .min_idle(Some(config.pool.min_idle))
        .max_lifetime(Some(config.pool.max_lifetime))
        .idle_timeout(Some(config.pool.idle_timeout))
        .connection_timeout(config.pool.connection_timeout)
        .build(manager)
        .await
        .map_err(|e| ContractsError::Pool(e.to_string()))?;

    log::info!(
        "Database pool ready (max_size={}, min_idle={}, tls={})",
        config.pool.max_size,
        config.pool.min_idle,
        config.database.tls
    );
    Ok(pool)
}

fn establish_tls_connection(url: &str) -> BoxFuture<'_, ConnectionResult<AsyncPgConnection>> {
    let fut = async {
        let rustls_config = ClientConfig::with_platform_verifier();
        let tls = tokio_postgres_rustls::MakeRustlsConnect::new(rustls_config);
        let (client, connection) = tokio_postgres::connect(url, tls)
            .await
            .map_err(|e| ConnectionError::BadConnection(e.to_string()))?;
        tokio::spawn(async move {
            if let Err(e) = connection.await {
                log::error!("Database connection error: {}", e);
            }
        });
        AsyncPgConnection::try_from(client).await
    };
    fut.boxed()
}
