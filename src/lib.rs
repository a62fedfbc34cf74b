// src/lib.rs

use axum::{
    routing::{get, post, put},
    Router,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod common;
pub mod config;
pub mod docs;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod normalizer;
pub mod services;
pub mod store;

use crate::{config::AppState, docs::ApiDoc};

/// Monta o router com todas as rotas da API.
pub fn app(app_state: AppState) -> Router {
    // Abas do detalhe do cliente
    let client_routes = Router::new()
        .route("/{id}", get(handlers::clients::get_client))
        .route("/{id}/document-types", get(handlers::clients::list_client_document_types))
        .route(
            "/{id}/phones",
            post(handlers::contact::create_phone).get(handlers::contact::list_phones),
        )
        .route(
            "/{id}/phones/{item}",
            put(handlers::contact::update_phone).delete(handlers::contact::delete_phone),
        )
        .route(
            "/{id}/emails",
            post(handlers::contact::create_email).get(handlers::contact::list_emails),
        )
        .route(
            "/{id}/emails/{item}",
            put(handlers::contact::update_email).delete(handlers::contact::delete_email),
        )
        .route(
            "/{id}/documents",
            post(handlers::documents::create_document).get(handlers::documents::list_documents),
        )
        .route(
            "/{id}/documents/{item}",
            put(handlers::documents::update_document).delete(handlers::documents::delete_document),
        )
        .route(
            "/{id}/addresses",
            post(handlers::addresses::create_address).get(handlers::addresses::list_addresses),
        )
        .route(
            "/{id}/addresses/{item}",
            put(handlers::addresses::update_address).delete(handlers::addresses::delete_address),
        )
        .route(
            "/{id}/users",
            post(handlers::users::create_user).get(handlers::users::list_users),
        )
        .route(
            "/{id}/users/{item}",
            put(handlers::users::update_user).delete(handlers::users::delete_user),
        );

    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/clients", post(handlers::clients::create_client).get(handlers::clients::list_clients))
        .route("/api/document-types", get(handlers::clients::list_document_types))
        .route("/api/format", post(handlers::format::format_field))
        .nest("/api/clients", client_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(app_state)
}
