use std::collections::HashMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::{common::i18n::I18nStore, middleware::i18n::Locale, store::StoreError};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    // Regra de formulário que não cabe no derive do validator
    #[error("Campo inválido: {field} ({code})")]
    InvalidField {
        field: &'static str,
        code: &'static str,
    },

    #[error("Já existe um documento do tipo {0}")]
    DuplicateDocumentType(String),

    #[error("Envio em andamento para {0}")]
    SubmissionInProgress(String),

    #[error("Empresa atual não informada")]
    CompanyRequired,

    #[error("Registro não encontrado: {0}")]
    NotFound(String),

    #[error("Erro no store: {0}")]
    StoreError(#[from] StoreError),

    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),
}

// O erro que efetivamente vai para o cliente HTTP, já traduzido
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub details: Option<HashMap<String, Vec<String>>>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            details: None,
        }
    }
}

impl AppError {
    pub fn invalid(field: &'static str, code: &'static str) -> Self {
        AppError::InvalidField { field, code }
    }

    pub fn to_api_error(&self, locale: &Locale, i18n: &I18nStore) -> ApiError {
        let lang = locale.0.as_str();

        match self {
            AppError::ValidationError(errors) => {
                let mut details = HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .map(|e| i18n.translate(lang, &e.code))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                ApiError {
                    status: StatusCode::BAD_REQUEST,
                    message: i18n.translate(lang, "validation_failed"),
                    details: Some(details),
                }
            }
            AppError::InvalidField { field, code } => {
                let message = i18n.translate(lang, code);
                ApiError {
                    status: StatusCode::BAD_REQUEST,
                    details: Some(HashMap::from([(field.to_string(), vec![message.clone()])])),
                    message,
                }
            }
            AppError::DuplicateDocumentType(code) => ApiError::new(
                StatusCode::CONFLICT,
                i18n.translate_with(lang, "duplicate_document_type", code),
            ),
            AppError::SubmissionInProgress(_) => ApiError::new(
                StatusCode::CONFLICT,
                i18n.translate(lang, "submission_in_progress"),
            ),
            AppError::CompanyRequired => {
                ApiError::new(StatusCode::BAD_REQUEST, i18n.translate(lang, "company_required"))
            }
            AppError::NotFound(_) | AppError::StoreError(StoreError::NotFound(_)) => {
                ApiError::new(StatusCode::NOT_FOUND, i18n.translate(lang, "not_found"))
            }
            AppError::StoreError(e) => {
                tracing::error!("🔥 Falha no store: {}", e);
                ApiError::new(StatusCode::BAD_GATEWAY, i18n.translate(lang, "store_failure"))
            }
            AppError::InternalServerError(e) => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                ApiError::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    i18n.translate(lang, "internal_error"),
                )
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.details {
            Some(details) => json!({ "error": self.message, "details": details }),
            None => json!({ "error": self.message }),
        };
        (self.status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt() -> Locale {
        Locale("pt".to_string())
    }

    #[test]
    fn invalid_field_carries_details() {
        let api = AppError::invalid("phone", "phone_required").to_api_error(&pt(), &I18nStore::new());
        assert_eq!(api.status, StatusCode::BAD_REQUEST);
        assert_eq!(api.message, "Telefone com DDD é obrigatório.");
        assert_eq!(api.details.unwrap()["phone"], vec!["Telefone com DDD é obrigatório."]);
    }

    #[test]
    fn store_not_found_is_404() {
        let err = AppError::from(StoreError::NotFound("phones/7".into()));
        let api = err.to_api_error(&pt(), &I18nStore::new());
        assert_eq!(api.status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn store_rejection_is_bad_gateway() {
        let err = AppError::from(StoreError::Rejected { status: 500, body: "boom".into() });
        let api = err.to_api_error(&Locale("en".into()), &I18nStore::new());
        assert_eq!(api.status, StatusCode::BAD_GATEWAY);
        assert_eq!(api.message, "Could not reach the data server. Please try again.");
    }

    #[test]
    fn duplicate_document_type_names_the_type() {
        let api = AppError::DuplicateDocumentType("CPF".into()).to_api_error(&pt(), &I18nStore::new());
        assert_eq!(api.status, StatusCode::CONFLICT);
        assert_eq!(api.message, "Já existe um documento do tipo CPF.");
    }
}
