//! Active-contract rules.
//!
//! A contract is active on a reference date `d` when `start_date <= d` and it is either
//! open-ended or its `end_date >= d`. Both bounds are inclusive. Everything here is a pure
//! function of its inputs; callers pick the reference date.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;

use crate::models::Contract;

/// The calendar date used when a request does not pin one.
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

pub fn is_active(contract: &Contract, reference_date: NaiveDate) -> bool {
    contract.start_date <= reference_date
        && contract.end_date.is_none_or(|end| end >= reference_date)
}

/// Exact sum of `cost_amount` over the contracts active on `reference_date`.
/// Returns zero when none are active.
pub fn active_cost<'a>(
    contracts: impl IntoIterator<Item = &'a Contract>,
    reference_date: NaiveDate,
) -> Decimal {
    contracts
        .into_iter()
        .filter(|c| is_active(c, reference_date))
        .map(|c| c.cost_amount)
        .sum()
}

/// Contracts active on `reference_date`, optionally restricted to those updated strictly
/// after `updated_since`, ordered by start date then id.
pub fn list_active(
    contracts: impl IntoIterator<Item = Contract>,
    reference_date: NaiveDate,
    updated_since: Option<DateTime<Utc>>,
) -> Vec<Contract> {
    let mut active: Vec<Contract> = contracts
        .into_iter()
        .filter(|c| is_active(c, reference_date))
        .filter(|c| updated_since.is_none_or(|since| c.updated_at > since))
        .collect();
    active.sort_by_key(|c| (c.start_date, c.id));
    active
}

/// The end date a client deletion on `deletion_date` gives an open contract. A contract
/// that has not started yet ends on its start date so that `end_date >= start_date` holds.
pub fn closing_date(contract: &Contract, deletion_date: NaiveDate) -> NaiveDate {
    contract.start_date.max(deletion_date)
}

/// The contracts a client deletion has to close, as `(id, end_date)` pairs: every
/// open-ended one. Contracts that already carry an end date keep it.
pub fn contracts_to_close(contracts: &[Contract], deletion_date: NaiveDate) -> Vec<(i64, NaiveDate)> {
    contracts
        .iter()
        .filter(|c| c.end_date.is_none())
        .map(|c| (c.id, closing_date(c, deletion_date)))
        .collect()
}
