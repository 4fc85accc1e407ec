use actix_web::{HttpResponse, web};
use chrono::Utc;

use crate::{
    db,
    dtos::{
        ActiveContractsQuery, ActiveCostDto, ActiveCostQuery, ContractDto, CreateContractDto,
        UpdateContractCostDto,
    },
    error::{ApiError, ApiResult},
    evaluator, metrics, validation,
};

use super::AppState;

#[utoipa::path(
    post,
    path = "/contracts/create-contract",
    summary = "Create a contract",
    description = "Creates a contract for an existing client. startDate defaults to today; endDate may be omitted for an open-ended contract.",
    request_body = CreateContractDto,
    responses(
        (status = 201, description = "Contract created", body = ContractDto),
        (status = 400, description = "Invalid contract data"),
        (status = 404, description = "Client not found"),
    ),
    tag = "contracts"
)]
pub async fn create_contract(
    state: web::Data<AppState>,
    form: web::Json<CreateContractDto>,
) -> ApiResult<HttpResponse> {
    let dto = form.into_inner();
    validation::validate_create_contract(&dto)
        .inspect_err(|errors| log::debug!("Rejected contract creation: {:?}", errors))?;
    let new_contract = dto.resolve(evaluator::today())?;

    let mut conn = state.conn().await?;
    let contract = db::insert_contract(&mut conn, new_contract).await?;

    metrics::record_contract_created();
    log::info!(
        "Created contract {} for client {}",
        contract.id,
        contract.client_id
    );
    Ok(HttpResponse::Created().json(ContractDto::from(contract)))
}

#[utoipa::path(
    patch,
    path = "/contracts/update-contract",
    summary = "Update a contract's cost",
    request_body = UpdateContractCostDto,
    responses(
        (status = 200, description = "Contract updated", body = ContractDto),
        (status = 400, description = "Invalid cost amount"),
        (status = 404, description = "Contract not found"),
    ),
    tag = "contracts"
)]
pub async fn update_contract(
    state: web::Data<AppState>,
    form: web::Json<UpdateContractCostDto>,
) -> ApiResult<HttpResponse> {
    let dto = form.into_inner();
    validation::validate_update_contract_cost(&dto)
        .inspect_err(|errors| log::debug!("Rejected contract update: {:?}", errors))?;
    let (Some(contract_id), Some(cost_amount)) = (dto.contract_id, dto.cost_amount) else {
        return Err(ApiError::BadRequest("Request is invalid.".to_string()));
    };

    let mut conn = state.conn().await?;
    let contract = db::update_contract_cost(&mut conn, contract_id, cost_amount, Utc::now()).await?;

    metrics::record_contract_cost_updated();
    log::info!("Updated cost of contract {} to {}", contract.id, contract.cost_amount);
    Ok(HttpResponse::Ok().json(ContractDto::from(contract)))
}

#[utoipa::path(
    get,
    path = "/contracts/clients/{client_id}/active-cost",
    summary = "Sum of active contract costs",
    description = "Returns the exact sum of cost amounts of the client's contracts active on the reference date (today unless asOf is given).",
    params(
        ("client_id" = i64, Path, description = "Client identifier"),
        ActiveCostQuery,
    ),
    responses(
        (status = 200, description = "Sum computed", body = ActiveCostDto),
        (status = 404, description = "Client not found"),
    ),
    tag = "contracts"
)]
pub async fn active_cost(
    state: web::Data<AppState>,
    client_id: web::Path<i64>,
    query: web::Query<ActiveCostQuery>,
) -> ApiResult<HttpResponse> {
    let client_id = client_id.into_inner();
    let reference_date = query.reference_date();

    let mut conn = state.conn().await?;
    let active_cost_amount = db::active_cost_for_client(&mut conn, client_id, reference_date).await?;

    Ok(HttpResponse::Ok().json(ActiveCostDto {
        client_id,
        active_cost_amount,
    }))
}

#[utoipa::path(
    get,
    path = "/contracts/clients/{client_id}/contracts",
    summary = "List active contracts",
    description = "Returns the client's contracts active on the reference date, oldest start date first. With updatedSince, only contracts updated strictly after that timestamp are returned.",
    params(
        ("client_id" = i64, Path, description = "Client identifier"),
        ActiveContractsQuery,
    ),
    responses(
        (status = 200, description = "Active contracts", body = [ContractDto]),
        (status = 400, description = "Malformed query parameter"),
        (status = 404, description = "Client not found"),
    ),
    tag = "contracts"
)]
pub async fn active_contracts(
    state: web::Data<AppState>,
    client_id: web::Path<i64>,
    query: web::Query<ActiveContractsQuery>,
) -> ApiResult<HttpResponse> {
    let client_id = client_id.into_inner();
    let reference_date = query.reference_date();

    let mut conn = state.conn().await?;
    let contracts =
        db::active_contracts_for_client(&mut conn, client_id, reference_date, query.updated_since)
            .await?;

    let body: Vec<ContractDto> = contracts.into_iter().map(ContractDto::from).collect();
    Ok(HttpResponse::Ok().json(body))
}
