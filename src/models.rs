use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Identifiable, Queryable, Selectable, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::clients)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Client {
    pub id: i64,
    pub client_type: ClientType,
    pub email: String,
    pub phone: String,
    pub name: String,
    /// Only set for `Person` clients.
    pub birthdate: Option<NaiveDate>,
    /// Only set for `Company` clients.
    pub company_identifier: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::schema::clients)]
pub struct NewClient {
    pub client_type: ClientType,
    pub email: String,
    pub phone: String,
    pub name: String,
    pub birthdate: Option<NaiveDate>,
    pub company_identifier: Option<String>,
}

/// Mutable client fields. The client type, birthdate and company identifier are fixed at creation.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = crate::schema::clients)]
pub struct ClientChanges {
    pub email: String,
    pub phone: String,
    pub name: String,
    pub updated_at: DateTime<Utc>,
}

#[derive(Identifiable, Queryable, Selectable, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::contracts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Contract {
    pub id: i64,
    pub client_id: i64,
    pub start_date: NaiveDate,
    /// `None` means the contract is open-ended.
    pub end_date: Option<NaiveDate>,
    pub cost_amount: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::schema::contracts)]
pub struct NewContract {
    pub client_id: i64,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub cost_amount: Decimal,
}

#[derive(
    Debug,
    PartialEq,
    Eq,
    Clone,
    Copy,
    Hash,
    Serialize,
    Deserialize,
    diesel_derive_enum::DbEnum,
    ToSchema,
)]
#[db_enum(existing_type_path = "crate::schema::sql_types::ClientType")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClientType {
    #[db_enum(rename = "PERSON")]
    Person,
    #[db_enum(rename = "COMPANY")]
    Company,
}

impl ClientType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClientType::Person => "PERSON",
            ClientType::Company => "COMPANY",
        }
    }
}
