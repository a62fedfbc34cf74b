// src/handlers/addresses.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::i18n::Locale,
    models::address::{AddressEntry, AddressForm},
    services::form::TabUpdate,
};

// GET /api/clients/{id}/addresses
#[utoipa::path(
    get,
    path = "/api/clients/{id}/addresses",
    tag = "Endereços",
    responses(
        (status = 200, description = "Endereços do cliente", body = Vec<AddressEntry>),
    ),
    params(
        ("id" = i64, Path, description = "ID do cliente"),
    )
)]
pub async fn list_addresses(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(client_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let addresses = app_state
        .address_service
        .addresses(client_id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(addresses)))
}

// POST /api/clients/{id}/addresses
#[utoipa::path(
    post,
    path = "/api/clients/{id}/addresses",
    tag = "Endereços",
    request_body = AddressForm,
    responses(
        (status = 201, description = "Endereço salvo e lista atualizada", body = TabUpdate<AddressEntry>),
        (status = 400, description = "Campo inválido"),
        (status = 409, description = "Envio já em andamento para este formulário"),
    ),
    params(
        ("id" = i64, Path, description = "ID do cliente"),
    )
)]
pub async fn create_address(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(client_id): Path<i64>,
    Json(payload): Json<AddressForm>,
) -> Result<impl IntoResponse, ApiError> {
    let update = app_state
        .address_service
        .save(client_id, None, payload)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(update)))
}

// PUT /api/clients/{id}/addresses/{item}
#[utoipa::path(
    put,
    path = "/api/clients/{id}/addresses/{item}",
    tag = "Endereços",
    request_body = AddressForm,
    responses(
        (status = 200, description = "Endereço salvo e lista atualizada", body = TabUpdate<AddressEntry>),
        (status = 400, description = "Campo inválido"),
        (status = 404, description = "Registro não encontrado"),
        (status = 409, description = "Envio já em andamento para este formulário"),
    ),
    params(
        ("id" = i64, Path, description = "ID do cliente"),
        ("item" = i64, Path, description = "ID do endereço"),
    )
)]
pub async fn update_address(
    State(app_state): State<AppState>,
    locale: Locale,
    Path((client_id, address_id)): Path<(i64, i64)>,
    Json(payload): Json<AddressForm>,
) -> Result<impl IntoResponse, ApiError> {
    let update = app_state
        .address_service
        .save(client_id, Some(address_id), payload)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(update)))
}

// DELETE /api/clients/{id}/addresses/{item}
#[utoipa::path(
    delete,
    path = "/api/clients/{id}/addresses/{item}",
    tag = "Endereços",
    responses(
        (status = 200, description = "Lista sem o endereço removido", body = Vec<AddressEntry>),
        (status = 404, description = "Registro não encontrado"),
    ),
    params(
        ("id" = i64, Path, description = "ID do cliente"),
        ("item" = i64, Path, description = "ID do endereço"),
    )
)]
pub async fn delete_address(
    State(app_state): State<AppState>,
    locale: Locale,
    Path((client_id, address_id)): Path<(i64, i64)>,
) -> Result<impl IntoResponse, ApiError> {
    let addresses = app_state
        .address_service
        .remove(client_id, address_id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(addresses)))
}
