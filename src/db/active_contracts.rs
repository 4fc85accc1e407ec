//! Read side of the active-contract rule. Rows are loaded per client and the
//! [`evaluator`] decides which of them count.

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use rust_decimal::Decimal;

use crate::{Conn, evaluator, models::Contract, schema::clients};

use super::{DbError, contracts_for_client, timed};

async fn ensure_client_exists(conn: &mut Conn<'_>, client_id: i64) -> Result<(), DbError> {
    let exists: bool = timed(
        "client_exists",
        diesel::select(diesel::dsl::exists(clients::table.find(client_id))).get_result(conn),
    )
    .await?;
    if exists {
        Ok(())
    } else {
        Err(DbError::ClientNotFound(client_id))
    }
}

/// Exact sum of the costs of the client's contracts active on `reference_date`.
pub async fn active_cost_for_client(
    conn: &mut Conn<'_>,
    client_id: i64,
    reference_date: NaiveDate,
) -> Result<Decimal, DbError> {
    ensure_client_exists(conn, client_id).await?;
    let contracts = contracts_for_client(conn, client_id).await?;
    Ok(evaluator::active_cost(&contracts, reference_date))
}

/// The client's contracts active on `reference_date`, optionally only those updated
/// strictly after `updated_since`, ordered by start date then id.
pub async fn active_contracts_for_client(
    conn: &mut Conn<'_>,
    client_id: i64,
    reference_date: NaiveDate,
    updated_since: Option<DateTime<Utc>>,
) -> Result<Vec<Contract>, DbError> {
    ensure_client_exists(conn, client_id).await?;
    let contracts = contracts_for_client(conn, client_id).await?;
    Ok(evaluator::list_active(contracts, reference_date, updated_since))
}
