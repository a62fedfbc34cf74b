// src/models/document.rs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{de_digits, de_reference, people::PeopleType, HasId};
use crate::normalizer::{DocumentKind, DocumentSpec, DocumentTypeLookup};

// --- TIPOS DE DOCUMENTO (catálogo vindo do store) ---

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DocumentType {
    #[serde(rename = "@id")]
    pub iri: String,
    #[serde(default)]
    pub id: Option<i64>,
    // "CPF", "CNPJ", ...
    pub document_type: String,
    #[serde(default)]
    pub people_type: Option<PeopleType>,
}

impl DocumentType {
    pub fn kind(&self) -> Option<DocumentKind> {
        DocumentKind::from_code(&self.document_type)
    }
}

impl DocumentTypeLookup for [DocumentType] {
    fn lookup(&self, type_id: &str) -> Option<DocumentSpec> {
        self.iter()
            .find(|t| t.iri == type_id)
            .and_then(DocumentType::kind)
            .map(DocumentKind::spec)
    }
}

// --- DOCUMENTO ---

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: i64,
    #[serde(default, deserialize_with = "de_digits")]
    pub document: String,
    #[serde(default, deserialize_with = "de_reference")]
    pub document_type: String,
}

// Item da aba de documentos: valor canônico + máscara para exibição
#[derive(Debug, Clone, Serialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DocumentEntry {
    pub id: i64,
    pub value: String,
    #[serde(rename = "type")]
    pub type_id: String,
    pub code: Option<String>,
    pub display: String,
}

impl HasId for DocumentEntry {
    fn id(&self) -> i64 {
        self.id
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct DocumentForm {
    #[schema(example = "123.456.789-01")]
    pub value: Option<String>,
    #[serde(rename = "type")]
    #[schema(example = "/document_types/1")]
    pub type_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DocumentPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub document: String,
    pub document_type: String,
    pub people: String,
}
