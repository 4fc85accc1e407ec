use actix_web::{HttpResponse, web};
use chrono::Utc;

use crate::{
    db,
    dtos::{ClientDto, CreateClientDto, UpdateClientDto},
    error::ApiResult,
    evaluator, metrics, validation,
};

use super::AppState;

#[utoipa::path(
    post,
    path = "/clients/create-client",
    summary = "Create a client",
    description = "Creates a person or a company. A non-blank companyIdentifier makes the client a company; persons must include a birthdate and companies must not.",
    request_body = CreateClientDto,
    responses(
        (status = 201, description = "Client created", body = ClientDto),
        (status = 400, description = "Invalid client data or email already in use"),
    ),
    tag = "clients"
)]
pub async fn create_client(
    state: web::Data<AppState>,
    form: web::Json<CreateClientDto>,
) -> ApiResult<HttpResponse> {
    let dto = form.into_inner();
    validation::validate_create_client(&dto)
        .inspect_err(|errors| log::debug!("Rejected client creation: {:?}", errors))?;
    let new_client = dto.resolve()?;

    let mut conn = state.conn().await?;
    let client = db::insert_client(&mut conn, new_client).await?;

    metrics::record_client_created(client.client_type.as_str());
    log::info!("Created {} client {}", client.client_type.as_str(), client.id);
    Ok(HttpResponse::Created().json(ClientDto::from(client)))
}

#[utoipa::path(
    get,
    path = "/clients/{client_id}",
    summary = "Get a client",
    params(("client_id" = i64, Path, description = "Client identifier")),
    responses(
        (status = 200, description = "Client found", body = ClientDto),
        (status = 404, description = "Client not found"),
    ),
    tag = "clients"
)]
pub async fn get_client(
    state: web::Data<AppState>,
    client_id: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let mut conn = state.conn().await?;
    let client = db::find_client_by_id(&mut conn, *client_id).await?;
    Ok(HttpResponse::Ok().json(ClientDto::from(client)))
}

#[utoipa::path(
    put,
    path = "/clients/update-client",
    summary = "Update a client",
    description = "Overwrites the email, phone and name of an existing client.",
    request_body = UpdateClientDto,
    responses(
        (status = 200, description = "Client updated", body = ClientDto),
        (status = 400, description = "Invalid client data or email already in use"),
        (status = 404, description = "Client not found"),
    ),
    tag = "clients"
)]
pub async fn update_client(
    state: web::Data<AppState>,
    form: web::Json<UpdateClientDto>,
) -> ApiResult<HttpResponse> {
    let dto = form.into_inner();
    validation::validate_update_client(&dto)
        .inspect_err(|errors| log::debug!("Rejected client update: {:?}", errors))?;
    let (client_id, changes) = dto.resolve(Utc::now());

    let mut conn = state.conn().await?;
    let client = db::update_client(&mut conn, client_id, changes).await?;

    log::info!("Updated client {}", client.id);
    Ok(HttpResponse::Ok().json(ClientDto::from(client)))
}

#[utoipa::path(
    delete,
    path = "/clients/delete-client/{client_id}",
    summary = "Delete a client",
    description = "Deletes the client and, in the same transaction, sets the end date of each of its open contracts to today. Contracts that already have an end date are unchanged.",
    params(("client_id" = i64, Path, description = "Client identifier")),
    responses(
        (status = 204, description = "Client deleted"),
        (status = 404, description = "Client not found"),
    ),
    tag = "clients"
)]
pub async fn delete_client(
    state: web::Data<AppState>,
    client_id: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let client_id = client_id.into_inner();
    let deletion_date = evaluator::today();

    let mut conn = state.conn().await?;
    let closed = db::delete_client_and_close_contracts(&mut conn, client_id, deletion_date).await?;

    metrics::record_client_deleted(closed);
    log::info!(
        "Deleted client {} and closed {} open contract(s) on {}",
        client_id,
        closed,
        deletion_date
    );
    Ok(HttpResponse::NoContent().finish())
}
