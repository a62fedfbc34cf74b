// src/handlers/documents.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::{company::CompanyContext, i18n::Locale},
    models::document::{DocumentEntry, DocumentForm},
    services::form::TabUpdate,
};

// GET /api/clients/{id}/documents
#[utoipa::path(
    get,
    path = "/api/clients/{id}/documents",
    tag = "Documentos",
    responses(
        (status = 200, description = "Documentos visíveis com máscara", body = Vec<DocumentEntry>),
        (status = 404, description = "Registro não encontrado"),
    ),
    params(
        ("id" = i64, Path, description = "ID do cliente"),
        ("x-company-id" = Option<i64>, Header, description = "ID da empresa (padrão: empresa atual do store)"),
    )
)]
pub async fn list_documents(
    State(app_state): State<AppState>,
    locale: Locale,
    company: CompanyContext,
    Path(client_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let service = &app_state.document_service;

    let documents = async {
        let types = service.types(company).await?;
        service.documents(client_id, &types).await
    }
    .await
    .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(documents)))
}

// POST /api/clients/{id}/documents
#[utoipa::path(
    post,
    path = "/api/clients/{id}/documents",
    tag = "Documentos",
    request_body = DocumentForm,
    responses(
        (status = 201, description = "Documento salvo e lista atualizada", body = TabUpdate<DocumentEntry>),
        (status = 400, description = "Campo inválido"),
        (status = 409, description = "Tipo já cadastrado ou envio em andamento"),
    ),
    params(
        ("id" = i64, Path, description = "ID do cliente"),
        ("x-company-id" = Option<i64>, Header, description = "ID da empresa (padrão: empresa atual do store)"),
    )
)]
pub async fn create_document(
    State(app_state): State<AppState>,
    locale: Locale,
    company: CompanyContext,
    Path(client_id): Path<i64>,
    Json(payload): Json<DocumentForm>,
) -> Result<impl IntoResponse, ApiError> {
    let update = app_state
        .document_service
        .save(company, client_id, None, payload)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(update)))
}

// PUT /api/clients/{id}/documents/{item}
#[utoipa::path(
    put,
    path = "/api/clients/{id}/documents/{item}",
    tag = "Documentos",
    request_body = DocumentForm,
    responses(
        (status = 200, description = "Documento salvo e lista atualizada", body = TabUpdate<DocumentEntry>),
        (status = 400, description = "Campo inválido"),
        (status = 404, description = "Registro não encontrado"),
    ),
    params(
        ("id" = i64, Path, description = "ID do cliente"),
        ("item" = i64, Path, description = "ID do documento"),
        ("x-company-id" = Option<i64>, Header, description = "ID da empresa (padrão: empresa atual do store)"),
    )
)]
pub async fn update_document(
    State(app_state): State<AppState>,
    locale: Locale,
    company: CompanyContext,
    Path((client_id, document_id)): Path<(i64, i64)>,
    Json(payload): Json<DocumentForm>,
) -> Result<impl IntoResponse, ApiError> {
    let update = app_state
        .document_service
        .save(company, client_id, Some(document_id), payload)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(update)))
}

// DELETE /api/clients/{id}/documents/{item}
#[utoipa::path(
    delete,
    path = "/api/clients/{id}/documents/{item}",
    tag = "Documentos",
    responses(
        (status = 200, description = "Lista sem o documento removido", body = Vec<DocumentEntry>),
        (status = 404, description = "Registro não encontrado"),
    ),
    params(
        ("id" = i64, Path, description = "ID do cliente"),
        ("item" = i64, Path, description = "ID do documento"),
        ("x-company-id" = Option<i64>, Header, description = "ID da empresa (padrão: empresa atual do store)"),
    )
)]
pub async fn delete_document(
    State(app_state): State<AppState>,
    locale: Locale,
    company: CompanyContext,
    Path((client_id, document_id)): Path<(i64, i64)>,
) -> Result<impl IntoResponse, ApiError> {
    let documents = app_state
        .document_service
        .remove(company, client_id, document_id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(documents)))
}
