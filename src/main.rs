use std::sync::Arc;

use actix_web::{App, HttpServer, middleware, web};
use actix_web_prometheus::PrometheusMetricsBuilder;
use clients_contracts::{
    config::Config,
    db,
    handlers::{AppState, configure_routes},
    initialize_db_pool, metrics,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = match Config::from_env() {
        Ok(config) => Arc::new(config),
        Err(e) => {
            log::error!("{}", e);
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e));
        }
    };

    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    metrics::init_metrics();
    metrics::set_slow_query_threshold(config.observability.slow_query_threshold_ms);

    if config.database.run_migrations {
        let database_url = config.database_url.clone();
        web::block(move || db::run_migrations(&database_url))
            .await
            .map_err(|e| std::io::Error::other(e.to_string()))?
            .map_err(std::io::Error::other)?;
    }

    let pool = initialize_db_pool(&config)
        .await
        .map_err(std::io::Error::other)?;

    let state = AppState {
        pool,
        config: config.clone(),
    };

    let prometheus = PrometheusMetricsBuilder::new("api")
        .registry(metrics::REGISTRY.clone())
        .endpoint("/metrics")
        .build()
        .map_err(|e| std::io::Error::other(e.to_string()))?;

    log::info!(
        "starting HTTP server at http://{}:{}",
        config.bind_address,
        config.port
    );

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .wrap(prometheus.clone())
            .wrap(middleware::Logger::default())
            .configure(configure_routes)
    })
    .bind((config.bind_address.as_str(), config.port))?
    .run()
    .await
}
