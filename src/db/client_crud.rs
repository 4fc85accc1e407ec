use std::collections::BTreeMap;

use chrono::{NaiveDate, Utc};
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::sql_types::Text;
use diesel_async::RunQueryDsl;

use crate::{
    Conn, evaluator,
    models::{Client, ClientChanges, Contract, NewClient},
    schema::{clients, contracts},
};

use super::{DbError, run_in_transaction, timed};

diesel::define_sql_function!(fn lower(x: Text) -> Text);

fn email_taken(email: &str) -> DbError {
    DbError::Validation(format!("Client with email {} already exists.", email))
}

/// Map a unique-index violation on `lower(email)` to the caller-facing message.
fn map_email_conflict(err: DieselError, email: &str) -> DbError {
    match err {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => email_taken(email),
        other => other.into(),
    }
}

pub async fn find_client_by_id(conn: &mut Conn<'_>, client_id: i64) -> Result<Client, DbError> {
    timed(
        "find_client_by_id",
        clients::table
            .find(client_id)
            .select(Client::as_select())
            .first(conn),
    )
    .await
    .optional()?
    .ok_or(DbError::ClientNotFound(client_id))
}

/// `true` when a client other than `except_id` already uses `email`, compared case-insensitively.
async fn email_in_use(
    conn: &mut Conn<'_>,
    email: &str,
    except_id: Option<i64>,
) -> Result<bool, DbError> {
    let mut query = clients::table
        .select(clients::id)
        .filter(lower(clients::email).eq(email.to_lowercase()))
        .into_boxed();
    if let Some(id) = except_id {
        query = query.filter(clients::id.ne(id));
    }
    let found: Option<i64> = timed("email_in_use", query.first(conn)).await.optional()?;
    Ok(found.is_some())
}

pub async fn insert_client(conn: &mut Conn<'_>, new_client: NewClient) -> Result<Client, DbError> {
    run_in_transaction(conn, |conn| {
        Box::pin(async move {
            if email_in_use(conn, &new_client.email, None).await? {
                return Err(email_taken(&new_client.email));
            }

            timed(
                "insert_client",
                diesel::insert_into(clients::table)
                    .values(&new_client)
                    .returning(Client::as_returning())
                    .get_result(conn),
            )
            .await
            .map_err(|e| map_email_conflict(e, &new_client.email))
        })
    })
    .await
}

pub async fn update_client(
    conn: &mut Conn<'_>,
    client_id: i64,
    changes: ClientChanges,
) -> Result<Client, DbError> {
    run_in_transaction(conn, |conn| {
        Box::pin(async move {
            let exists: Option<i64> = clients::table
                .find(client_id)
                .select(clients::id)
                .for_update()
                .first(conn)
                .await
                .optional()?;
            if exists.is_none() {
                return Err(DbError::ClientNotFound(client_id));
            }

            if email_in_use(conn, &changes.email, Some(client_id)).await? {
                return Err(email_taken(&changes.email));
            }

            timed(
                "update_client",
                diesel::update(clients::table.find(client_id))
                    .set(&changes)
                    .returning(Client::as_returning())
                    .get_result(conn),
            )
            .await
            .map_err(|e| map_email_conflict(e, &changes.email))
        })
    })
    .await
}

/// Delete a client and close its open contracts on `deletion_date`, atomically.
/// An open contract starting after `deletion_date` is closed on its start date instead.
/// Contracts that already have an end date are left as they are. Returns the number of
/// contracts closed.
pub async fn delete_client_and_close_contracts(
    conn: &mut Conn<'_>,
    client_id: i64,
    deletion_date: NaiveDate,
) -> Result<usize, DbError> {
    run_in_transaction(conn, |conn| {
        Box::pin(async move {
            let locked: Option<i64> = clients::table
                .find(client_id)
                .select(clients::id)
                .for_update()
                .first(conn)
                .await
                .optional()?;
            if locked.is_none() {
                return Err(DbError::ClientNotFound(client_id));
            }

            let owned: Vec<Contract> = contracts::table
                .filter(contracts::client_id.eq(client_id))
                .select(Contract::as_select())
                .for_update()
                .load(conn)
                .await?;

            // One UPDATE per distinct end date.
            let mut by_end_date: BTreeMap<NaiveDate, Vec<i64>> = BTreeMap::new();
            for (id, end_date) in evaluator::contracts_to_close(&owned, deletion_date) {
                by_end_date.entry(end_date).or_default().push(id);
            }

            let now = Utc::now();
            let mut closed = 0;
            for (end_date, ids) in by_end_date {
                closed += timed(
                    "close_contracts_on_delete",
                    diesel::update(contracts::table.filter(contracts::id.eq_any(&ids)))
                        .set((
                            contracts::end_date.eq(Some(end_date)),
                            contracts::updated_at.eq(now),
                        ))
                        .execute(conn),
                )
                .await?;
            }

            timed(
                "delete_client",
                diesel::delete(clients::table.find(client_id)).execute(conn),
            )
            .await?;

            Ok(closed)
        })
    })
    .await
}
