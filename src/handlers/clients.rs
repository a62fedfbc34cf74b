// src/handlers/clients.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Local;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{company::CompanyContext, i18n::Locale},
    models::{
        document::DocumentType,
        people::{Client, ClientDetail, ClientPage, ClientSearch, NewCompanyForm},
    },
    services::documents::visible_documents,
};

// =============================================================================
//  LISTAGEM E CADASTRO
// =============================================================================

// GET /api/clients?page=1&itemsPerPage=10&name=ana
#[utoipa::path(
    get,
    path = "/api/clients",
    tag = "Clientes",
    responses(
        (status = 200, description = "Página de clientes", body = ClientPage),
        (status = 400, description = "X-Company-ID ausente ou inválido"),
    ),
    params(
        ClientSearch,
        ("x-company-id" = Option<i64>, Header, description = "ID da empresa (padrão: empresa atual do store)"),
    )
)]
pub async fn list_clients(
    State(app_state): State<AppState>,
    locale: Locale,
    company: CompanyContext,
    Query(search): Query<ClientSearch>,
) -> Result<impl IntoResponse, ApiError> {
    let page = app_state
        .client_service
        .list(company, &search)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(page)))
}

// POST /api/clients
#[utoipa::path(
    post,
    path = "/api/clients",
    tag = "Clientes",
    request_body = NewCompanyForm,
    responses(
        (status = 201, description = "Empresa cadastrada", body = Client),
        (status = 400, description = "Campo inválido"),
    ),
    params(
        ("x-company-id" = Option<i64>, Header, description = "ID da empresa (padrão: empresa atual do store)"),
    )
)]
pub async fn create_client(
    State(app_state): State<AppState>,
    locale: Locale,
    company: CompanyContext,
    Json(payload): Json<NewCompanyForm>,
) -> Result<impl IntoResponse, ApiError> {
    let client = app_state
        .client_service
        .create_company(company, payload, Local::now().date_naive())
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(client)))
}

// =============================================================================
//  DETALHE (todas as abas de uma vez)
// =============================================================================

// GET /api/clients/{id}
#[utoipa::path(
    get,
    path = "/api/clients/{id}",
    tag = "Clientes",
    responses(
        (status = 200, description = "Cliente com todas as abas", body = ClientDetail),
        (status = 404, description = "Registro não encontrado"),
    ),
    params(
        ("id" = i64, Path, description = "ID do cliente"),
        ("x-company-id" = Option<i64>, Header, description = "ID da empresa (padrão: empresa atual do store)"),
    )
)]
pub async fn get_client(
    State(app_state): State<AppState>,
    locale: Locale,
    company: CompanyContext,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let to_api = |app_err: AppError| app_err.to_api_error(&locale, &app_state.i18n_store);

    let (client, types) = tokio::try_join!(
        app_state.client_service.get(id),
        app_state.document_service.types(company),
    )
    .map_err(to_api)?;

    let (phones, emails, documents, addresses, users) = tokio::try_join!(
        app_state.contact_service.phones(id),
        app_state.contact_service.emails(id),
        app_state.document_service.documents(id, &types),
        app_state.address_service.addresses(id),
        app_state.user_service.users(id),
    )
    .map_err(to_api)?;

    let documents = visible_documents(&client, documents);

    Ok((
        StatusCode::OK,
        Json(ClientDetail {
            client,
            phones,
            emails,
            documents,
            addresses,
            users,
        }),
    ))
}

// =============================================================================
//  TIPOS DE DOCUMENTO
// =============================================================================

// GET /api/document-types
#[utoipa::path(
    get,
    path = "/api/document-types",
    tag = "Documentos",
    responses(
        (status = 200, description = "Catálogo de tipos da empresa", body = Vec<DocumentType>),
    ),
    params(
        ("x-company-id" = Option<i64>, Header, description = "ID da empresa (padrão: empresa atual do store)"),
    )
)]
pub async fn list_document_types(
    State(app_state): State<AppState>,
    locale: Locale,
    company: CompanyContext,
) -> Result<impl IntoResponse, ApiError> {
    let types = app_state
        .document_service
        .types(company)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(types)))
}

// GET /api/clients/{id}/document-types
// Só os tipos que o cliente ainda pode cadastrar
#[utoipa::path(
    get,
    path = "/api/clients/{id}/document-types",
    tag = "Documentos",
    responses(
        (status = 200, description = "Tipos que o cliente ainda pode cadastrar", body = Vec<DocumentType>),
        (status = 404, description = "Registro não encontrado"),
    ),
    params(
        ("id" = i64, Path, description = "ID do cliente"),
        ("x-company-id" = Option<i64>, Header, description = "ID da empresa (padrão: empresa atual do store)"),
    )
)]
pub async fn list_client_document_types(
    State(app_state): State<AppState>,
    locale: Locale,
    company: CompanyContext,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let types = app_state
        .document_service
        .client_types(company, id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(types)))
}
