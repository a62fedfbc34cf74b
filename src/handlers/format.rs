// src/handlers/format.rs

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::normalizer::{
    apply_document_mask, digits_only, format_date_input, format_phone, parse_date, to_iso,
    validate_phone, DocumentKind,
};

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Phone,
    Date,
    Document,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FormatRequest {
    pub kind: FieldKind,
    #[serde(default)]
    #[schema(example = "12345678000199")]
    pub value: String,
    // Código do tipo: CPF, CNPJ, RG, IE, IM
    #[schema(example = "CNPJ")]
    pub document_type: Option<String>,
}

#[derive(Debug, Serialize, PartialEq, ToSchema)]
pub struct FormatResponse {
    pub display: String,
    pub canonical: String,
    pub valid: bool,
}

/// Aplica o normalizador a um valor digitado, como o formulário faria a cada tecla.
pub fn preview(request: &FormatRequest) -> FormatResponse {
    match request.kind {
        FieldKind::Phone => {
            let canonical = digits_only(&request.value);
            FormatResponse {
                display: format_phone(&request.value),
                valid: validate_phone(&canonical),
                canonical,
            }
        }
        FieldKind::Date => {
            let display = format_date_input(&request.value);
            let date = parse_date(&display);
            FormatResponse {
                canonical: date.map(to_iso).unwrap_or_default(),
                valid: date.is_some(),
                display,
            }
        }
        FieldKind::Document => {
            let code = request.document_type.as_deref().unwrap_or_default();
            let display = apply_document_mask(&request.value, code);
            let canonical = digits_only(&display);
            let valid = DocumentKind::from_code(code)
                .is_some_and(|kind| canonical.len() == kind.spec().max_len);
            FormatResponse {
                display,
                canonical,
                valid,
            }
        }
    }
}

// POST /api/format
#[utoipa::path(
    post,
    path = "/api/format",
    tag = "Formatação",
    request_body = FormatRequest,
    responses((status = 200, description = "Valor mascarado e forma canônica", body = FormatResponse))
)]
pub async fn format_field(Json(payload): Json<FormatRequest>) -> impl IntoResponse {
    (StatusCode::OK, Json(preview(&payload)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(kind: FieldKind, value: &str, document_type: Option<&str>) -> FormatRequest {
        FormatRequest {
            kind,
            value: value.into(),
            document_type: document_type.map(str::to_string),
        }
    }

    #[test]
    fn phone_preview() {
        let out = preview(&request(FieldKind::Phone, "11987654321", None));
        assert_eq!(
            out,
            FormatResponse {
                display: "(11) 98765-4321".into(),
                canonical: "11987654321".into(),
                valid: true,
            }
        );
        assert!(!preview(&request(FieldKind::Phone, "119999888", None)).valid);
    }

    #[test]
    fn date_preview() {
        let out = preview(&request(FieldKind::Date, "31122024", None));
        assert_eq!(out.display, "31/12/2024");
        assert_eq!(out.canonical, "2024-12-31");
        assert!(out.valid);

        let partial = preview(&request(FieldKind::Date, "3112", None));
        assert_eq!(partial.display, "31/12");
        assert!(!partial.valid);
        assert_eq!(partial.canonical, "");
    }

    #[test]
    fn document_preview() {
        let out = preview(&request(FieldKind::Document, "12345678901", Some("cpf")));
        assert_eq!(out.display, "123.456.789-01");
        assert!(out.valid);

        let partial = preview(&request(FieldKind::Document, "1234", Some("CNPJ")));
        assert_eq!(partial.display, "12.34");
        assert!(!partial.valid);

        // Tipo desconhecido: valor fica como veio
        let unknown = preview(&request(FieldKind::Document, "AB-12", Some("PASSAPORTE")));
        assert_eq!(unknown.display, "AB-12");
        assert_eq!(unknown.canonical, "12");
        assert!(!unknown.valid);
    }
}
