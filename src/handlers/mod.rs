//! HTTP handlers for the clients and contracts API.
//!
//! This module contains all HTTP handler functions that can be used by both
//! the main application and integration tests.

mod client;
mod contract;
mod health;

use std::sync::Arc;

use actix_web::{HttpRequest, web};

use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{DbPool, config::Config, dtos, error::ApiError, metrics};

// Re-export handlers for route configuration
pub use client::{create_client, delete_client, get_client, update_client};
pub use contract::{active_contracts, active_cost, create_contract, update_contract};
pub use health::{health_check, readiness_check, welcome};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub config: Arc<Config>,
}

impl AppState {
    /// Get a database connection with retry logic.
    pub async fn conn(&self) -> Result<crate::Conn<'_>, ApiError> {
        get_conn_with_retry(
            &self.pool,
            self.config.pool.acquire_retries,
            self.config.pool.retry_delay.as_millis() as u64,
        )
        .await
    }
}

/// Health check response showing service and database status.
#[derive(serde::Serialize, serde::Deserialize, utoipa::ToSchema)]
pub struct HealthResponse {
    /// Overall service status: "ok" or "degraded"
    pub status: String,
    /// Database connectivity status: "healthy" or "unhealthy"
    pub database: String,
    /// Total number of connections in the pool
    pub pool_size: u32,
    /// Number of idle (available) connections in the pool
    pub pool_idle: u32,
}

/// Acquire a pooled connection, retrying up to `max_retries` times with a fixed delay.
pub async fn get_conn_with_retry(
    pool: &DbPool,
    max_retries: u32,
    retry_delay_ms: u64,
) -> Result<crate::Conn<'_>, ApiError> {
    let attempts = max_retries.max(1);
    let mut last_error = String::new();

    for attempt in 1..=attempts {
        match pool.get().await {
            Ok(conn) => return Ok(conn),
            Err(e) => {
                last_error = e.to_string();
                if attempt < attempts {
                    log::warn!(
                        "Failed to acquire connection (attempt {}/{}), retrying in {}ms",
                        attempt,
                        attempts,
                        retry_delay_ms
                    );
                    tokio::time::sleep(std::time::Duration::from_millis(retry_delay_ms)).await;
                }
            }
        }
    }

    log::error!(
        "Failed to acquire connection after {} attempts: {}",
        attempts,
        last_error
    );
    metrics::record_pool_exhausted();
    Err(ApiError::ServiceUnavailable(
        "Database connection unavailable".to_string(),
    ))
}

// =============================================================================
// OpenAPI Documentation
// =============================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        health::welcome,
        health::health_check,
        health::readiness_check,
        client::create_client,
        client::get_client,
        client::update_client,
        client::delete_client,
        contract::create_contract,
        contract::update_contract,
        contract::active_cost,
        contract::active_contracts,
    ),
    components(schemas(
        HealthResponse,
        dtos::CreateClientDto,
        dtos::UpdateClientDto,
        dtos::ClientDto,
        dtos::CreateContractDto,
        dtos::UpdateContractCostDto,
        dtos::ContractDto,
        dtos::ActiveCostDto,
        crate::models::ClientType,
    )),
    tags(
        (name = "health", description = "Liveness and readiness probes."),
        (name = "clients", description = "Create, read, update and delete clients. Deleting a client closes its open contracts on the deletion date."),
        (name = "contracts", description = "Create contracts, update their cost, and query the contracts active on a given date."),
    ),
    info(
        title = "Clients Contracts API",
        version = "0.1.0",
        description = "Manages clients (persons and companies) and their contracts. A contract is active on a date when it has started and either has no end date or ends on or after that date.",
    )
)]
pub struct ApiDoc;

// =============================================================================
// Route Configuration
// =============================================================================

fn malformed(detail: String, req: &HttpRequest) -> actix_web::Error {
    log::debug!("Rejected malformed request to {}: {}", req.path(), detail);
    ApiError::MalformedBody(detail).into()
}

/// Configure all routes for the application.
/// This can be used by both the main application and integration tests.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default().error_handler(|err, req| malformed(err.to_string(), req)),
    )
    .app_data(web::QueryConfig::default().error_handler(|err, req| malformed(err.to_string(), req)))
    .app_data(web::PathConfig::default().error_handler(|err, req| malformed(err.to_string(), req)))
    .route("/", web::get().to(welcome))
    .route("/health", web::get().to(health_check))
    .route("/ready", web::get().to(readiness_check))
    .route("/clients/create-client", web::post().to(create_client))
    .route("/clients/update-client", web::put().to(update_client))
    .route("/clients/delete-client/{client_id}", web::delete().to(delete_client))
    .route("/clients/{client_id}", web::get().to(get_client))
    .route("/contracts/create-contract", web::post().to(create_contract))
    .route("/contracts/update-contract", web::patch().to(update_contract))
    .route(
        "/contracts/clients/{client_id}/active-cost",
        web::get().to(active_cost),
    )
    .route(
        "/contracts/clients/{client_id}/contracts",
        web::get().to(active_contracts),
    )
    .service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    );
}
