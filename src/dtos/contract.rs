use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    error::{ContractsError, ContractsResult},
    models::{Contract, NewContract},
};

/// Input DTO for `POST /contracts/create-contract`.
///
/// ## Example
/// ```json
/// {"clientId": 1, "startDate": "2024-07-01", "endDate": "2025-06-30", "costAmount": 120.75}
/// ```
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateContractDto {
    /// Owning client. Must exist.
    pub client_id: Option<i64>,
    /// Defaults to today when omitted.
    pub start_date: Option<NaiveDate>,
    /// Omit for an open-ended contract. Must not be before `startDate`.
    pub end_date: Option<NaiveDate>,
    /// Non-negative amount with two decimal places.
    #[serde(default, with = "rust_decimal::serde::arbitrary_precision_option")]
    #[schema(value_type = Option<f64>)]
    pub cost_amount: Option<Decimal>,
}

impl CreateContractDto {
    /// Fill in the default start date and check the date range.
    pub fn resolve(self, today: NaiveDate) -> ContractsResult<NewContract> {
        let start_date = self.start_date.unwrap_or(today);
        if self.end_date.is_some_and(|end| end < start_date) {
            return Err(ContractsError::Validation(
                "End date must be on or after the start date.".to_string(),
            ));
        }

        Ok(NewContract {
            client_id: self.client_id.unwrap_or_default(),
            start_date,
            end_date: self.end_date,
            cost_amount: self.cost_amount.unwrap_or_default(),
        })
    }
}

/// Input DTO for `PATCH /contracts/update-contract`.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateContractCostDto {
    pub contract_id: Option<i64>,
    #[serde(default, with = "rust_decimal::serde::arbitrary_precision_option")]
    #[schema(value_type = Option<f64>)]
    pub cost_amount: Option<Decimal>,
}

/// A stored contract.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContractDto {
    pub id: i64,
    pub client_id: i64,
    pub start_date: NaiveDate,
    /// Null while the contract is open-ended.
    pub end_date: Option<NaiveDate>,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    #[schema(value_type = f64)]
    pub cost_amount: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Contract> for ContractDto {
    fn from(contract: Contract) -> Self {
        Self {
            id: contract.id,
            client_id: contract.client_id,
            start_date: contract.start_date,
            end_date: contract.end_date,
            cost_amount: contract.cost_amount,
            created_at: contract.created_at,
            updated_at: contract.updated_at,
        }
    }
}

/// Sum of the costs of a client's active contracts.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActiveCostDto {
    pub client_id: i64,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    #[schema(value_type = f64)]
    pub active_cost_amount: Decimal,
}
