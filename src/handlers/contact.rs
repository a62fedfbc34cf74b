// src/handlers/contact.rs

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
    models::contact::{EmailEntry, EmailForm, PhoneEntry, PhoneForm},
    services::form::TabUpdate,
};

// =============================================================================
//  TELEFONES
// =============================================================================

// GET /api/clients/{id}/phones
#[utoipa::path(
    get,
    path = "/api/clients/{id}/phones",
    tag = "Contato",
    responses(
        (status = 200, description = "Telefones formatados", body = Vec<PhoneEntry>),
    ),
    params(
        ("id" = i64, Path, description = "ID do cliente"),
    )
)]
pub async fn list_phones(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(client_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let phones = app_state
        .contact_service
        .phones(client_id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(phones)))
}

// POST /api/clients/{id}/phones
#[utoipa::path(
    post,
    path = "/api/clients/{id}/phones",
    tag = "Contato",
    request_body = PhoneForm,
    responses(
        (status = 201, description = "Telefone salvo e lista atualizada", body = TabUpdate<PhoneEntry>),
        (status = 400, description = "Campo inválido"),
        (status = 409, description = "Envio já em andamento para este formulário"),
    ),
    params(
        ("id" = i64, Path, description = "ID do cliente"),
    )
)]
pub async fn create_phone(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(client_id): Path<i64>,
    Json(payload): Json<PhoneForm>,
) -> Result<impl IntoResponse, ApiError> {
    let update = app_state
        .contact_service
        .save_phone(client_id, None, payload)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(update)))
}

// PUT /api/clients/{id}/phones/{item}
#[utoipa::path(
    put,
    path = "/api/clients/{id}/phones/{item}",
    tag = "Contato",
    request_body = PhoneForm,
    responses(
        (status = 200, description = "Telefone salvo e lista atualizada", body = TabUpdate<PhoneEntry>),
        (status = 400, description = "Campo inválido"),
        (status = 404, description = "Registro não encontrado"),
        (status = 409, description = "Envio já em andamento para este formulário"),
    ),
    params(
        ("id" = i64, Path, description = "ID do cliente"),
        ("item" = i64, Path, description = "ID do telefone"),
    )
)]
pub async fn update_phone(
    State(app_state): State<AppState>,
    locale: Locale,
    Path((client_id, phone_id)): Path<(i64, i64)>,
    Json(payload): Json<PhoneForm>,
) -> Result<impl IntoResponse, ApiError> {
    let update = app_state
        .contact_service
        .save_phone(client_id, Some(phone_id), payload)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(update)))
}

// DELETE /api/clients/{id}/phones/{item}
#[utoipa::path(
    delete,
    path = "/api/clients/{id}/phones/{item}",
    tag = "Contato",
    responses(
        (status = 200, description = "Lista sem o telefone removido", body = Vec<PhoneEntry>),
        (status = 404, description = "Registro não encontrado"),
    ),
    params(
        ("id" = i64, Path, description = "ID do cliente"),
        ("item" = i64, Path, description = "ID do telefone"),
    )
)]
pub async fn delete_phone(
    State(app_state): State<AppState>,
    locale: Locale,
    Path((client_id, phone_id)): Path<(i64, i64)>,
) -> Result<impl IntoResponse, ApiError> {
    let phones = app_state
        .contact_service
        .remove_phone(client_id, phone_id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(phones)))
}

// =============================================================================
//  E-MAILS
// =============================================================================

// GET /api/clients/{id}/emails
#[utoipa::path(
    get,
    path = "/api/clients/{id}/emails",
    tag = "Contato",
    responses(
        (status = 200, description = "E-mails do cliente", body = Vec<EmailEntry>),
    ),
    params(
        ("id" = i64, Path, description = "ID do cliente"),
    )
)]
pub async fn list_emails(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(client_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let emails = app_state
        .contact_service
        .emails(client_id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(emails)))
}

// POST /api/clients/{id}/emails
#[utoipa::path(
    post,
    path = "/api/clients/{id}/emails",
    tag = "Contato",
    request_body = EmailForm,
    responses(
        (status = 201, description = "E-mail salvo e lista atualizada", body = TabUpdate<EmailEntry>),
        (status = 400, description = "Campo inválido"),
        (status = 409, description = "Envio já em andamento para este formulário"),
    ),
    params(
        ("id" = i64, Path, description = "ID do cliente"),
    )
)]
pub async fn create_email(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(client_id): Path<i64>,
    Json(payload): Json<EmailForm>,
) -> Result<impl IntoResponse, ApiError> {
    let update = app_state
        .contact_service
        .save_email(client_id, None, payload)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(update)))
}

// PUT /api/clients/{id}/emails/{item}
#[utoipa::path(
    put,
    path = "/api/clients/{id}/emails/{item}",
    tag = "Contato",
    request_body = EmailForm,
    responses(
        (status = 200, description = "E-mail salvo e lista atualizada", body = TabUpdate<EmailEntry>),
        (status = 400, description = "Campo inválido"),
        (status = 404, description = "Registro não encontrado"),
        (status = 409, description = "Envio já em andamento para este formulário"),
    ),
    params(
        ("id" = i64, Path, description = "ID do cliente"),
        ("item" = i64, Path, description = "ID do e-mail"),
    )
)]
pub async fn update_email(
    State(app_state): State<AppState>,
    locale: Locale,
    Path((client_id, email_id)): Path<(i64, i64)>,
    Json(payload): Json<EmailForm>,
) -> Result<impl IntoResponse, ApiError> {
    let update = app_state
        .contact_service
        .save_email(client_id, Some(email_id), payload)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(update)))
}

// DELETE /api/clients/{id}/emails/{item}
#[utoipa::path(
    delete,
    path = "/api/clients/{id}/emails/{item}",
    tag = "Contato",
    responses(
        (status = 200, description = "Lista sem o e-mail removido", body = Vec<EmailEntry>),
        (status = 404, description = "Registro não encontrado"),
    ),
    params(
        ("id" = i64, Path, description = "ID do cliente"),
        ("item" = i64, Path, description = "ID do e-mail"),
    )
)]
pub async fn delete_email(
    State(app_state): State<AppState>,
    locale: Locale,
    Path((client_id, email_id)): Path<(i64, i64)>,
) -> Result<impl IntoResponse, ApiError> {
    let emails = app_state
        .contact_service
        .remove_email(client_id, email_id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(emails)))
}
