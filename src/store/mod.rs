// src/store/mod.rs

//! Fronteira com o store de dados (a API REST/JSON-LD remota).
//!
//! Os serviços só conhecem o trait `DataStore`. `HttpStore` fala com a API de
//! verdade; `MemoryStore` é usado em desenvolvimento e nos testes.

pub mod http;
pub mod memory;

use std::{
    collections::HashMap,
    fmt,
    sync::{PoisonError, RwLock},
};

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::models::{
    people::CompanyPayload,
    user::{ChangePasswordPayload, CreateUserPayload},
};

pub use http::HttpStore;
pub use memory::MemoryStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Falha de transporte HTTP: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Requisição rejeitada ({status}): {body}")]
    Rejected { status: u16, body: String },

    #[error("Registro não encontrado: {0}")]
    NotFound(String),

    #[error("URL inválida: {0}")]
    InvalidUrl(String),

    #[error("Resposta inválida: {0}")]
    InvalidResponse(#[from] serde_json::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Falha na task de hashing: {0}")]
    Task(#[from] tokio::task::JoinError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    People,
    Phones,
    Emails,
    Documents,
    DocumentTypes,
    Addresses,
    Users,
}

impl Resource {
    pub fn path(self) -> &'static str {
        match self {
            Resource::People => "people",
            Resource::Phones => "phones",
            Resource::Emails => "emails",
            Resource::Documents => "documents",
            Resource::DocumentTypes => "document_types",
            Resource::Addresses => "addresses",
            Resource::Users => "users",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Parâmetros de consulta, na ordem em que foram adicionados.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: impl ToString) -> Self {
        self.0.push((key.to_string(), value.to_string()));
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.0
    }
}

#[derive(Debug, Clone, Default)]
pub struct Page {
    pub members: Vec<Value>,
    pub total: Option<u64>,
}

/// Estado reativo que as telas leem do store.
#[derive(Debug, Clone, Default)]
pub struct StoreGetters {
    pub items: Vec<Value>,
    pub is_loading: bool,
    pub error: Option<String>,
    pub current_company: Option<i64>,
}

#[derive(Debug, Default)]
struct ResourceState {
    items: Vec<Value>,
    is_loading: bool,
    error: Option<String>,
}

/// Bookkeeping dos getters, compartilhado pelas implementações.
/// Em caso de erro os `items` anteriores são mantidos.
#[derive(Debug, Default)]
pub struct StoreState {
    resources: RwLock<HashMap<Resource, ResourceState>>,
    current_company: RwLock<Option<i64>>,
}

impl StoreState {
    pub fn new(current_company: Option<i64>) -> Self {
        Self {
            resources: RwLock::default(),
            current_company: RwLock::new(current_company),
        }
    }

    pub fn begin(&self, resource: Resource) {
        let mut map = self.resources.write().unwrap_or_else(PoisonError::into_inner);
        map.entry(resource).or_default().is_loading = true;
    }

    pub fn loaded(&self, resource: Resource, items: Vec<Value>) {
        let mut map = self.resources.write().unwrap_or_else(PoisonError::into_inner);
        let state = map.entry(resource).or_default();
        state.items = items;
        state.is_loading = false;
        state.error = None;
    }

    pub fn done(&self, resource: Resource) {
        let mut map = self.resources.write().unwrap_or_else(PoisonError::into_inner);
        let state = map.entry(resource).or_default();
        state.is_loading = false;
        state.error = None;
    }

    pub fn failed(&self, resource: Resource, error: &StoreError) {
        let mut map = self.resources.write().unwrap_or_else(PoisonError::into_inner);
        let state = map.entry(resource).or_default();
        state.is_loading = false;
        state.error = Some(error.to_string());
    }

    /// Registra o desfecho de uma chamada e devolve o resultado intacto.
    pub fn track<T>(&self, resource: Resource, result: Result<T, StoreError>) -> Result<T, StoreError> {
        match &result {
            Ok(_) => self.done(resource),
            Err(e) => self.failed(resource, e),
        }
        result
    }

    pub fn set_current_company(&self, company: Option<i64>) {
        *self.current_company.write().unwrap_or_else(PoisonError::into_inner) = company;
    }

    pub fn getters(&self, resource: Resource) -> StoreGetters {
        let map = self.resources.read().unwrap_or_else(PoisonError::into_inner);
        let current_company = *self.current_company.read().unwrap_or_else(PoisonError::into_inner);
        match map.get(&resource) {
            Some(state) => StoreGetters {
                items: state.items.clone(),
                is_loading: state.is_loading,
                error: state.error.clone(),
                current_company,
            },
            None => StoreGetters {
                current_company,
                ..StoreGetters::default()
            },
        }
    }
}

#[async_trait]
pub trait DataStore: Send + Sync {
    async fn get_items(&self, resource: Resource, params: &QueryParams) -> Result<Page, StoreError>;

    async fn get_item(&self, resource: Resource, id: i64) -> Result<Value, StoreError>;

    /// Cria (sem `id`) ou atualiza (com `id`). `None` quando o store não ecoa a entidade.
    async fn save(&self, resource: Resource, entity: Value) -> Result<Option<Value>, StoreError>;

    async fn remove(&self, resource: Resource, id: i64) -> Result<(), StoreError>;

    async fn create_user(&self, payload: &CreateUserPayload) -> Result<Option<Value>, StoreError>;

    async fn change_password(&self, payload: &ChangePasswordPayload) -> Result<(), StoreError>;

    async fn create_company(&self, payload: &CompanyPayload) -> Result<Option<Value>, StoreError>;

    fn getters(&self, resource: Resource) -> StoreGetters;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn query_params_keep_order() {
        let params = QueryParams::new().with("page", 2).with("name", "ana");
        assert_eq!(params.get("page"), Some("2"));
        assert_eq!(params.pairs()[1], ("name".to_string(), "ana".to_string()));
        assert_eq!(params.get("missing"), None);
    }

    #[test]
    fn failure_keeps_previous_items() {
        let state = StoreState::new(Some(1));
        state.begin(Resource::Phones);
        assert!(state.getters(Resource::Phones).is_loading);
        state.loaded(Resource::Phones, vec![json!({"id": 1})]);

        state.begin(Resource::Phones);
        state.failed(Resource::Phones, &StoreError::NotFound("phones".into()));

        let getters = state.getters(Resource::Phones);
        assert!(!getters.is_loading);
        assert_eq!(getters.items.len(), 1);
        assert!(getters.error.is_some());
        assert_eq!(getters.current_company, Some(1));
    }

    #[test]
    fn untouched_resource_has_empty_getters() {
        let state = StoreState::new(None);
        let getters = state.getters(Resource::Users);
        assert!(getters.items.is_empty());
        assert_eq!(getters.current_company, None);
    }
}
