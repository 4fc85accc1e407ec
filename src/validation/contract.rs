use rust_decimal::Decimal;

use crate::dtos::{CreateContractDto, UpdateContractCostDto};

use super::{MAX_COST_INTEGER_DIGITS, MAX_COST_SCALE, ValidationError, ValidationResult, finish};

/// Validates a contract creation request. The date range is checked by
/// `CreateContractDto::resolve` once the default start date is known.
pub fn validate_create_contract(dto: &CreateContractDto) -> ValidationResult {
    let mut errors = Vec::new();

    if dto.client_id.is_none() {
        errors.push(ValidationError::new("clientId", "Client id is required."));
    }
    check_cost(dto.cost_amount, &mut errors);

    finish(errors)
}

/// Validates a contract cost update request.
pub fn validate_update_contract_cost(dto: &UpdateContractCostDto) -> ValidationResult {
    let mut errors = Vec::new();

    if dto.contract_id.is_none() {
        errors.push(ValidationError::new("contractId", "Contract id is required."));
    }
    check_cost(dto.cost_amount, &mut errors);

    finish(errors)
}

fn check_cost(cost_amount: Option<Decimal>, errors: &mut Vec<ValidationError>) {
    match cost_amount {
        None => errors.push(ValidationError::new(
            "costAmount",
            "Cost amount is required.",
        )),
        Some(cost) if cost.is_sign_negative() && !cost.is_zero() => {
            errors.push(ValidationError::new(
                "costAmount",
                "Cost amount must be greater than or equal to 0.",
            ))
        }
        Some(cost) if cost >= cost_upper_bound() => errors.push(ValidationError::new(
            "costAmount",
            "Cost amount cannot exceed 17 integer digits.",
        )),
        Some(cost) if cost.normalize().scale() > MAX_COST_SCALE => {
            errors.push(ValidationError::new(
                "costAmount",
                "Cost amount cannot have more than 2 decimal places.",
            ))
        }
        _ => {}
    }
}

/// Smallest amount with more integer digits than the column holds.
fn cost_upper_bound() -> Decimal {
    Decimal::from(10i64.pow(MAX_COST_INTEGER_DIGITS))
}
