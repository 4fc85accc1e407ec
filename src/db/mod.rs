mod active_contracts;
mod client_crud;
mod contract_crud;
mod pool;

use crate::Conn;
use diesel_async::RunQueryDsl;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use std::future::Future;
use std::pin::Pin;
use std::time::Instant;

pub(crate) type DbError = crate::error::ContractsError;

/// Migrations compiled into the binary from `migrations/`.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

pub use pool::initialize_db_pool;

pub use active_contracts::{active_contracts_for_client, active_cost_for_client};
pub use client_crud::{delete_client_and_close_contracts, find_client_by_id, insert_client, update_client};
pub use contract_crud::{
    contracts_for_client, find_contract_by_id, insert_contract, update_contract_cost,
};

/// Execute a closure within a database transaction.
/// Automatically rolls back on error. Commits on success.
/// Callers must wrap their async block with `Box::pin(async move { ... })`.
pub async fn run_in_transaction<'a, T: Send>(
    conn: &mut Conn<'a>,
    f: impl for<'c> FnOnce(
        &'c mut Conn<'a>,
    ) -> Pin<Box<dyn Future<Output = Result<T, DbError>> + Send + 'c>>,
) -> Result<T, DbError> {
    diesel::sql_query("BEGIN").execute(&mut *conn).await?;
    match f(conn).await {
        Ok(val) => {
            diesel::sql_query("COMMIT").execute(&mut *conn).await?;
            Ok(val)
        }
        Err(e) => {
            if let Err(rb_err) = diesel::sql_query("ROLLBACK").execute(&mut *conn).await {
                log::error!("Failed to rollback transaction: {}", rb_err);
            }
            Err(e)
        }
    }
}

/// Await a query and record its duration under `query_name`.
pub(crate) async fn timed<T>(query_name: &str, query: impl Future<Output = T>) -> T {
    let start = Instant::now();
    let out = query.await;
    crate::metrics::record_db_query(query_name, start.elapsed().as_secs_f64());
    out
}

/// Apply pending embedded migrations on a blocking connection.
/// Call from `spawn_blocking` when inside an async runtime.
pub fn run_migrations(database_url: &str) -> Result<(), DbError> {
    use diesel::{Connection, PgConnection};

    let mut conn = PgConnection::establish(database_url)
        .map_err(|e| DbError::Pool(format!("migration connection failed: {}", e)))?;
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| DbError::Internal(format!("migrations failed: {}", e)))?;
    for version in &applied {
        log::info!("Applied migration {}", version);
    }
    Ok(())
}
