// src/middleware/company.rs

use axum::{
    extract::FromRequestParts,
    http::request::Parts,
};

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::i18n::Locale,
    store::Resource,
};

// O nome do nosso cabeçalho HTTP customizado
pub const COMPANY_ID_HEADER: &str = "x-company-id";

// A empresa "dona" da carteira de clientes (o currentCompany das telas).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompanyContext(pub i64);

impl CompanyContext {
    pub fn iri(&self) -> String {
        format!("/people/{}", self.0)
    }
}

impl FromRequestParts<AppState> for CompanyContext {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let locale = Locale::from_header(
            parts
                .headers
                .get(axum::http::header::ACCEPT_LANGUAGE)
                .and_then(|v| v.to_str().ok()),
        );

        match parts.headers.get(COMPANY_ID_HEADER) {
            Some(value) => value
                .to_str()
                .ok()
                .and_then(|s| s.trim().parse::<i64>().ok())
                .map(CompanyContext)
                .ok_or_else(|| {
                    AppError::invalid("x-company-id", "invalid_company_header")
                        .to_api_error(&locale, &state.i18n_store)
                }),
            // Sem cabeçalho, usamos a empresa atual do store
            None => state
                .store
                .getters(Resource::People)
                .current_company
                .map(CompanyContext)
                .ok_or_else(|| AppError::CompanyRequired.to_api_error(&locale, &state.i18n_store)),
        }
    }
}
