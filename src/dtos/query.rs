use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::IntoParams;

use crate::evaluator;

/// Query parameters for `GET /contracts/clients/{client_id}/active-cost`.
#[derive(Debug, Serialize, Deserialize, Default, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ActiveCostQuery {
    /// Reference date (`YYYY-MM-DD`). Defaults to today.
    pub as_of: Option<NaiveDate>,
}

impl ActiveCostQuery {
    pub fn reference_date(&self) -> NaiveDate {
        self.as_of.unwrap_or_else(evaluator::today)
    }
}

/// Query parameters for `GET /contracts/clients/{client_id}/contracts`.
#[derive(Debug, Serialize, Deserialize, Default, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ActiveContractsQuery {
    /// Only return contracts updated strictly after this RFC 3339 timestamp.
    /// Example: `2024-07-01T00:00:00Z`.
    pub updated_since: Option<DateTime<Utc>>,
    /// Reference date (`YYYY-MM-DD`). Defaults to today.
    pub as_of: Option<NaiveDate>,
}

impl ActiveContractsQuery {
    pub fn reference_date(&self) -> NaiveDate {
        self.as_of.unwrap_or_else(evaluator::today)
    }
}
