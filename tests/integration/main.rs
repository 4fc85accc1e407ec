// Single integration test binary.
// All test modules share one PostgreSQL container via LazyLock,
// with per-test isolation via CREATE DATABASE ... TEMPLATE.

#[macro_use]
mod common;

mod test_active_cost;
mod test_clients;
mod test_contracts;
mod test_health;
