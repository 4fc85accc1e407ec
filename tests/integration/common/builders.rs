use chrono::{DateTime, NaiveDate, Utc};
use clients_contracts::DbPool;
use clients_contracts::models::{Client, ClientType, Contract, NewClient, NewContract};
use clients_contracts::schema::{clients, contracts};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use rust_decimal::Decimal;
use serde_json::json;
use std::str::FromStr;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn dec(value: &str) -> Decimal {
    Decimal::from_str(value).unwrap()
}

/// Helper to create a valid person creation payload.
pub fn person_json(email: &str) -> serde_json::Value {
    json!({
        "phone": "+41 79 123 45 67",
        "email": email,
        "name": "Jane Doe",
        "birthdate": "1990-04-12"
    })
}

/// Helper to create a valid company creation payload.
pub fn company_json(email: &str, company_identifier: &str) -> serde_json::Value {
    json!({
        "phone": "+41 44 000 11 22",
        "email": email,
        "name": "Acme AG",
        "companyIdentifier": company_identifier
    })
}

/// Insert a person directly, bypassing the API.
pub async fn seed_person(pool: &DbPool, email: &str) -> Client {
    let mut conn = pool.get().await.unwrap();
    diesel::insert_into(clients::table)
        .values(NewClient {
            client_type: ClientType::Person,
            email: email.to_string(),
            phone: "+41 79 000 00 00".to_string(),
            name: "Seeded Person".to_string(),
            birthdate: Some(date(1990, 1, 1)),
            company_identifier: None,
        })
        .returning(Client::as_returning())
        .get_result(&mut conn)
        .await
        .unwrap()
}

/// Insert a contract directly, bypassing the API.
pub async fn seed_contract(
    pool: &DbPool,
    client_id: i64,
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
    cost: &str,
) -> Contract {
    let mut conn = pool.get().await.unwrap();
    diesel::insert_into(contracts::table)
        .values(NewContract {
            client_id,
            start_date,
            end_date,
            cost_amount: dec(cost),
        })
        .returning(Contract::as_returning())
        .get_result(&mut conn)
        .await
        .unwrap()
}

/// Overwrite a contract's `updated_at` to control `updatedSince` filtering.
pub async fn set_contract_updated_at(pool: &DbPool, contract_id: i64, at: DateTime<Utc>) {
    let mut conn = pool.get().await.unwrap();
    diesel::update(contracts::table.find(contract_id))
        .set(contracts::updated_at.eq(at))
        .execute(&mut conn)
        .await
        .unwrap();
}

pub async fn load_contract(pool: &DbPool, contract_id: i64) -> Contract {
    let mut conn = pool.get().await.unwrap();
    clients_contracts::db::find_contract_by_id(&mut conn, contract_id)
        .await
        .unwrap()
}

pub async fn client_exists(pool: &DbPool, client_id: i64) -> bool {
    let mut conn = pool.get().await.unwrap();
    diesel::select(diesel::dsl::exists(clients::table.find(client_id)))
        .get_result(&mut conn)
        .await
        .unwrap()
}
