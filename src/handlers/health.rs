use actix_web::{HttpResponse, web};
use diesel_async::RunQueryDsl;

use super::{AppState, HealthResponse};

#[utoipa::path(
    get,
    path = "/",
    summary = "Welcome banner",
    responses((status = 200, description = "Plain-text greeting", body = String)),
    tag = "health"
)]
pub async fn welcome() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body("Welcome to Clients Contracts API!")
}

#[utoipa::path(
    get,
    path = "/health",
    summary = "Health check",
    description = "Runs a trivial query against the database and reports pool statistics. Returns 503 when the database is unreachable.",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
        (status = 503, description = "Database unreachable", body = HealthResponse),
    ),
    tag = "health"
)]
pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    let database_ok = match state.pool.get().await {
        Ok(mut conn) => match diesel::sql_query("SELECT 1").execute(&mut conn).await {
            Ok(_) => true,
            Err(e) => {
                log::warn!("Health check: query failed: {}", e);
                false
            }
        },
        Err(e) => {
            log::warn!("Health check: database connection failed: {}", e);
            false
        }
    };

    let pool_state = state.pool.state();
    let response = HealthResponse {
        status: if database_ok { "ok" } else { "degraded" }.to_string(),
        database: if database_ok { "healthy" } else { "unhealthy" }.to_string(),
        pool_size: pool_state.connections,
        pool_idle: pool_state.idle_connections,
    };

    if database_ok {
        HttpResponse::Ok().json(response)
    } else {
        HttpResponse::ServiceUnavailable().json(response)
    }
}

#[utoipa::path(
    get,
    path = "/ready",
    summary = "Readiness check",
    description = "Returns 503 when every pool connection is in use or none can be acquired.",
    responses(
        (status = 200, description = "Ready to accept traffic"),
        (status = 503, description = "Pool exhausted or database unreachable"),
    ),
    tag = "health"
)]
pub async fn readiness_check(state: web::Data<AppState>) -> HttpResponse {
    let pool_state = state.pool.state();
    if pool_state.idle_connections == 0 && pool_state.connections >= state.config.pool.max_size {
        return HttpResponse::ServiceUnavailable().json(serde_json::json!({
            "status": "not_ready",
            "reason": "connection pool exhausted"
        }));
    }

    match state.pool.get().await {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({"status": "ready"})),
        Err(_) => HttpResponse::ServiceUnavailable().json(serde_json::json!({
            "status": "not_ready",
            "reason": "cannot acquire database connection"
        })),
    }
}
