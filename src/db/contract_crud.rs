use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use rust_decimal::Decimal;

use crate::{
    Conn,
    models::{Contract, NewContract},
    schema::{clients, contracts},
};

use super::{DbError, run_in_transaction, timed};

/// Insert a contract for an existing client. The client row is share-locked for the
/// duration of the insert so a concurrent deletion cannot orphan the new contract.
pub async fn insert_contract(
    conn: &mut Conn<'_>,
    new_contract: NewContract,
) -> Result<Contract, DbError> {
    run_in_transaction(conn, |conn| {
        Box::pin(async move {
            let owner: Option<i64> = clients::table
                .find(new_contract.client_id)
                .select(clients::id)
                .for_share()
                .first(conn)
                .await
                .optional()?;
            if owner.is_none() {
                return Err(DbError::ClientNotFound(new_contract.client_id));
            }

            let contract = timed(
                "insert_contract",
                diesel::insert_into(contracts::table)
                    .values(&new_contract)
                    .returning(Contract::as_returning())
                    .get_result(conn),
            )
            .await?;
            Ok(contract)
        })
    })
    .await
}

pub async fn update_contract_cost(
    conn: &mut Conn<'_>,
    contract_id: i64,
    cost_amount: Decimal,
    now: DateTime<Utc>,
) -> Result<Contract, DbError> {
    timed(
        "update_contract_cost",
        diesel::update(contracts::table.find(contract_id))
            .set((
                contracts::cost_amount.eq(cost_amount),
                contracts::updated_at.eq(now),
            ))
            .returning(Contract::as_returning())
            .get_result(conn),
    )
    .await
    .optional()?
    .ok_or(DbError::ContractNotFound(contract_id))
}

pub async fn find_contract_by_id(
    conn: &mut Conn<'_>,
    contract_id: i64,
) -> Result<Contract, DbError> {
    timed(
        "find_contract_by_id",
        contracts::table
            .find(contract_id)
            .select(Contract::as_select())
            .first(conn),
    )
    .await
    .optional()?
    .ok_or(DbError::ContractNotFound(contract_id))
}

/// Every contract owned by `client_id`, ordered by start date then id.
pub async fn contracts_for_client(
    conn: &mut Conn<'_>,
    client_id: i64,
) -> Result<Vec<Contract>, DbError> {
    let rows = timed(
        "contracts_for_client",
        contracts::table
            .filter(contracts::client_id.eq(client_id))
            .order((contracts::start_date.asc(), contracts::id.asc()))
            .select(Contract::as_select())
            .load(conn),
    )
    .await?;
    Ok(rows)
}
