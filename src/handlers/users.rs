// src/handlers/users.rs

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
    models::user::{ChangePasswordForm, UserEntry, UserForm},
    services::form::TabUpdate,
};

// GET /api/clients/{id}/users
#[utoipa::path(
    get,
    path = "/api/clients/{id}/users",
    tag = "Usuários",
    responses(
        (status = 200, description = "Usuários do cliente", body = Vec<UserEntry>),
    ),
    params(
        ("id" = i64, Path, description = "ID do cliente"),
    )
)]
pub async fn list_users(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(client_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let users = app_state
        .user_service
        .users(client_id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(users)))
}

// POST /api/clients/{id}/users
#[utoipa::path(
    post,
    path = "/api/clients/{id}/users",
    tag = "Usuários",
    request_body = UserForm,
    responses(
        (status = 201, description = "Usuário criado e lista atualizada", body = TabUpdate<UserEntry>),
        (status = 400, description = "Senhas não coincidem ou campo obrigatório ausente"),
        (status = 409, description = "Envio já em andamento para este formulário"),
    ),
    params(
        ("id" = i64, Path, description = "ID do cliente"),
    )
)]
pub async fn create_user(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(client_id): Path<i64>,
    Json(payload): Json<UserForm>,
) -> Result<impl IntoResponse, ApiError> {
    let update = app_state
        .user_service
        .create(client_id, payload)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(update)))
}

// PUT /api/clients/{id}/users/{item}
#[utoipa::path(
    put,
    path = "/api/clients/{id}/users/{item}",
    tag = "Usuários",
    request_body = ChangePasswordForm,
    responses(
        (status = 200, description = "Usuário atualizado e lista atualizada", body = TabUpdate<UserEntry>),
        (status = 400, description = "Campo inválido"),
        (status = 404, description = "Registro não encontrado"),
    ),
    params(
        ("id" = i64, Path, description = "ID do cliente"),
        ("item" = i64, Path, description = "ID do usuário"),
    )
)]
pub async fn update_user(
    State(app_state): State<AppState>,
    locale: Locale,
    Path((client_id, user_id)): Path<(i64, i64)>,
    Json(payload): Json<ChangePasswordForm>,
) -> Result<impl IntoResponse, ApiError> {
    let update = app_state
        .user_service
        .update(client_id, user_id, payload)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(update)))
}

// DELETE /api/clients/{id}/users/{item}
#[utoipa::path(
    delete,
    path = "/api/clients/{id}/users/{item}",
    tag = "Usuários",
    responses(
        (status = 200, description = "Lista sem o usuário removido", body = Vec<UserEntry>),
        (status = 404, description = "Registro não encontrado"),
    ),
    params(
        ("id" = i64, Path, description = "ID do cliente"),
        ("item" = i64, Path, description = "ID do usuário"),
    )
)]
pub async fn delete_user(
    State(app_state): State<AppState>,
    locale: Locale,
    Path((client_id, user_id)): Path<(i64, i64)>,
) -> Result<impl IntoResponse, ApiError> {
    let users = app_state
        .user_service
        .remove(client_id, user_id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(users)))
}
