//! Prometheus metrics for client and contract lifecycle events.
//!
//! HTTP request metrics come from the `actix-web-prometheus` middleware, which is given
//! [`REGISTRY`] so both sets are exposed on `/metrics`.

use prometheus::{HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts, Registry};
use std::sync::{LazyLock, OnceLock};

/// Global metrics registry
pub static REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::new);

/// Slow query threshold used by [`record_db_query`], set once at startup.
static SLOW_QUERY_THRESHOLD_MS: OnceLock<u64> = OnceLock::new();

const DEFAULT_SLOW_QUERY_THRESHOLD_MS: u64 = 100;

// ============================================================================
// Client Counters
// ============================================================================

/// Clients created, by client type
pub static CLIENTS_CREATED_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    let counter = IntCounterVec::new(
        Opts::new("clients_created_total", "Total number of clients created"),
        &["client_type"],
    )
    .expect("metric can be created");
    REGISTRY.register(Box::new(counter.clone())).unwrap();
    counter
});

pub static CLIENTS_DELETED_TOTAL: LazyLock<IntCounter> = LazyLock::new(|| {
    let counter = IntCounter::new("clients_deleted_total", "Total number of clients deleted")
        .expect("metric can be created");
    REGISTRY.register(Box::new(counter.clone())).unwrap();
    counter
});

// ============================================================================
// Contract Counters
// ============================================================================

pub static CONTRACTS_CREATED_TOTAL: LazyLock<IntCounter> = LazyLock::new(|| {
    let counter = IntCounter::new("contracts_created_total", "Total number of contracts created")
        .expect("metric can be created");
    REGISTRY.register(Box::new(counter.clone())).unwrap();
    counter
});

pub static CONTRACTS_COST_UPDATED_TOTAL: LazyLock<IntCounter> = LazyLock::new(|| {
    let counter = IntCounter::new(
        "contracts_cost_updated_total",
        "Total number of contract cost updates",
    )
    .expect("metric can be created");
    REGISTRY.register(Box::new(counter.clone())).unwrap();
    counter
});

/// Open contracts closed because their client was deleted
pub static CONTRACTS_CLOSED_ON_DELETE_TOTAL: LazyLock<IntCounter> = LazyLock::new(|| {
    let counter = IntCounter::new(
        "contracts_closed_on_delete_total",
        "Total number of open contracts closed by a client deletion",
    )
    .expect("metric can be created");
    REGISTRY.register(Box::new(counter.clone())).unwrap();
    counter
});

// ============================================================================
// Database Metrics
// ============================================================================

pub static DB_QUERY_DURATION_SECONDS: LazyLock<HistogramVec> = LazyLock::new(|| {
    let histogram = HistogramVec::new(
        HistogramOpts::new(
            "db_query_duration_seconds",
            "Database query duration in seconds",
        )
        .buckets(vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0]),
        &["query"],
    )
    .expect("metric can be created");
    REGISTRY.register(Box::new(histogram.clone())).unwrap();
    histogram
});

/// Total number of slow queries
pub static SLOW_QUERIES_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    let counter = IntCounterVec::new(
        Opts::new(
            "slow_queries_total",
            "Total number of queries exceeding slow query threshold",
        ),
        &["query"],
    )
    .expect("metric can be created");
    REGISTRY.register(Box::new(counter.clone())).unwrap();
    counter
});

/// Connection acquisitions that failed after every retry
pub static POOL_EXHAUSTED_TOTAL: LazyLock<IntCounter> = LazyLock::new(|| {
    let counter = IntCounter::new(
        "pool_exhausted_total",
        "Total number of requests that could not acquire a database connection",
    )
    .expect("metric can be created");
    REGISTRY.register(Box::new(counter.clone())).unwrap();
    counter
});

// ============================================================================
// Helpers
// ============================================================================

pub fn record_client_created(client_type: &str) {
    CLIENTS_CREATED_TOTAL.with_label_values(&[client_type]).inc();
}

pub fn record_client_deleted(contracts_closed: usize) {
    CLIENTS_DELETED_TOTAL.inc();
    CONTRACTS_CLOSED_ON_DELETE_TOTAL.inc_by(contracts_closed as u64);
}

pub fn record_contract_created() {
    CONTRACTS_CREATED_TOTAL.inc();
}

pub fn record_contract_cost_updated() {
    CONTRACTS_COST_UPDATED_TOTAL.inc();
}

pub fn record_pool_exhausted() {
    POOL_EXHAUSTED_TOTAL.inc();
}

/// Set the slow query threshold. Later calls are ignored.
pub fn set_slow_query_threshold(threshold_ms: u64) {
    let _ = SLOW_QUERY_THRESHOLD_MS.set(threshold_ms);
}

/// Record a query duration against the configured slow query threshold.
pub fn record_db_query(query_name: &str, duration_secs: f64) {
    let threshold_ms = SLOW_QUERY_THRESHOLD_MS
        .get()
        .copied()
        .unwrap_or(DEFAULT_SLOW_QUERY_THRESHOLD_MS);
    record_db_query_with_slow_warning(query_name, duration_secs, threshold_ms);
}

/// Record database query duration with slow query warning.
pub fn record_db_query_with_slow_warning(query_name: &str, duration_secs: f64, threshold_ms: u64) {
    DB_QUERY_DURATION_SECONDS
        .with_label_values(&[query_name])
        .observe(duration_secs);

    let duration_ms = (duration_secs * 1000.0) as u64;
    if duration_ms > threshold_ms {
        log::warn!(
            "Slow query detected: {} took {}ms (threshold: {}ms)",
            query_name,
            duration_ms,
            threshold_ms
        );
        SLOW_QUERIES_TOTAL.with_label_values(&[query_name]).inc();
    }
}

/// Initialize all metrics (call once at startup)
pub fn init_metrics() {
    // Force lazy initialization of all metrics
    let _ = &*CLIENTS_CREATED_TOTAL;
    let _ = &*CLIENTS_DELETED_TOTAL;
    let _ = &*CONTRACTS_CREATED_TOTAL;
    let _ = &*CONTRACTS_COST_UPDATED_TOTAL;
    let _ = &*CONTRACTS_CLOSED_ON_DELETE_TOTAL;
    let _ = &*DB_QUERY_DURATION_SECONDS;
    let _ = &*SLOW_QUERIES_TOTAL;
    let _ = &*POOL_EXHAUSTED_TOTAL;
}
