// src/store/http.rs

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Method, RequestBuilder, Response, StatusCode, Url};
use serde::Serialize;
use serde_json::Value;

use super::{DataStore, Page, QueryParams, Resource, StoreError, StoreGetters, StoreState};
use crate::models::{
    people::CompanyPayload,
    user::{ChangePasswordPayload, CreateUserPayload},
};

const LD_JSON: &str = "application/ld+json";

/// Cliente da API JSON-LD remota (coleções no formato Hydra).
pub struct HttpStore {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
    state: StoreState,
}

impl HttpStore {
    pub fn new(
        base_url: &str,
        token: Option<String>,
        timeout: Duration,
        current_company: Option<i64>,
    ) -> Result<Self, StoreError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
            state: StoreState::new(current_company),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, url: impl reqwest::IntoUrl) -> RequestBuilder {
        let request = self
            .client
            .request(method, url)
            .header(header::ACCEPT, LD_JSON);
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder, what: String) -> Result<Option<Value>, StoreError> {
        let response = request.send().await?;
        read_body(response, what).await
    }

    async fn send_json<T: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: &T,
    ) -> Result<Option<Value>, StoreError> {
        let request = self.request(method, self.url(path)).json(body);
        self.send(request, path.to_string()).await
    }

    async fn fetch_page(&self, resource: Resource, params: &QueryParams) -> Result<Page, StoreError> {
        let url = Url::parse_with_params(&self.url(resource.path()), params.pairs())
            .map_err(|e| StoreError::InvalidUrl(e.to_string()))?;
        let body = self
            .send(self.request(Method::GET, url), resource.path().to_string())
            .await?
            .unwrap_or(Value::Null);
        Ok(parse_collection(body))
    }

    async fn write(&self, resource: Resource, entity: Value) -> Result<Option<Value>, StoreError> {
        match entity.get("id").and_then(Value::as_i64) {
            Some(id) => {
                self.send_json(Method::PUT, &format!("{}/{}", resource.path(), id), &entity)
                    .await
            }
            None => self.send_json(Method::POST, resource.path(), &entity).await,
        }
    }
}

async fn read_body(response: Response, what: String) -> Result<Option<Value>, StoreError> {
    let status = response.status();
    if status == StatusCode::NOT_FOUND {
        return Err(StoreError::NotFound(what));
    }

    let text = response.text().await?;
    if !status.is_success() {
        return Err(StoreError::Rejected { status: status.as_u16(), body: text });
    }
    // 204 ou corpo vazio: a API não ecoou a entidade
    if text.trim().is_empty() {
        return Ok(None);
    }
    Ok(Some(serde_json::from_str(&text)?))
}

/// Lê `hydra:member`/`member` (ou um array puro) e o total, quando houver.
pub fn parse_collection(body: Value) -> Page {
    let total = ["hydra:totalItems", "totalItems"]
        .iter()
        .find_map(|key| body.get(*key).and_then(Value::as_u64));

    let members = match body {
        Value::Array(items) => items,
        Value::Object(mut obj) => ["hydra:member", "member"]
            .iter()
            .find_map(|key| obj.remove(*key))
            .and_then(|members| match members {
                Value::Array(items) => Some(items),
                _ => None,
            })
            .unwrap_or_default(),
        _ => Vec::new(),
    };

    Page { members, total }
}

#[async_trait]
impl DataStore for HttpStore {
    async fn get_items(&self, resource: Resource, params: &QueryParams) -> Result<Page, StoreError> {
        self.state.begin(resource);
        match self.fetch_page(resource, params).await {
            Ok(page) => {
                self.state.loaded(resource, page.members.clone());
                Ok(page)
            }
            Err(e) => {
                tracing::warn!("Falha ao listar {}: {}", resource, e);
                self.state.failed(resource, &e);
                Err(e)
            }
        }
    }

    async fn get_item(&self, resource: Resource, id: i64) -> Result<Value, StoreError> {
        self.state.begin(resource);
        let path = format!("{}/{}", resource.path(), id);
        let result = self
            .send(self.request(Method::GET, self.url(&path)), path.clone())
            .await
            .and_then(|body| body.ok_or(StoreError::NotFound(path)));
        self.state.track(resource, result)
    }

    async fn save(&self, resource: Resource, entity: Value) -> Result<Option<Value>, StoreError> {
        self.state.begin(resource);
        let result = self.write(resource, entity).await;
        self.state.track(resource, result)
    }

    async fn remove(&self, resource: Resource, id: i64) -> Result<(), StoreError> {
        self.state.begin(resource);
        let path = format!("{}/{}", resource.path(), id);
        let result = self
            .send(self.request(Method::DELETE, self.url(&path)), path)
            .await
            .map(|_| ());
        self.state.track(resource, result)
    }

    async fn create_user(&self, payload: &CreateUserPayload) -> Result<Option<Value>, StoreError> {
        self.state.begin(Resource::Users);
        let result = self.send_json(Method::POST, "users/create", payload).await;
        self.state.track(Resource::Users, result)
    }

    async fn change_password(&self, payload: &ChangePasswordPayload) -> Result<(), StoreError> {
        self.state.begin(Resource::Users);
        let path = format!("users/{}/change-password", payload.id);
        let result = self.send_json(Method::PUT, &path, payload).await.map(|_| ());
        self.state.track(Resource::Users, result)
    }

    async fn create_company(&self, payload: &CompanyPayload) -> Result<Option<Value>, StoreError> {
        self.state.begin(Resource::People);
        let result = self.send_json(Method::POST, "people/company", payload).await;
        self.state.track(Resource::People, result)
    }

    fn getters(&self, resource: Resource) -> StoreGetters {
        self.state.getters(resource)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reads_hydra_collections() {
        let page = parse_collection(json!({
            "hydra:member": [{"id": 1}, {"id": 2}],
            "hydra:totalItems": 40
        }));
        assert_eq!(page.members.len(), 2);
        assert_eq!(page.total, Some(40));
    }

    #[test]
    fn reads_plain_member_and_arrays() {
        let page = parse_collection(json!({"member": [{"id": 1}], "totalItems": 1}));
        assert_eq!(page.total, Some(1));
        let page = parse_collection(json!([{"id": 1}, {"id": 2}]));
        assert_eq!(page.members.len(), 2);
        assert_eq!(page.total, None);
        assert!(parse_collection(Value::Null).members.is_empty());
    }

    #[test]
    fn joins_urls_without_double_slashes() {
        let store = HttpStore::new("https://api.exemplo.com/", None, Duration::from_secs(1), None).unwrap();
        assert_eq!(store.url("people"), "https://api.exemplo.com/people");
        assert_eq!(store.url("/phones/3"), "https://api.exemplo.com/phones/3");
    }
}
