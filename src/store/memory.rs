// src/store/memory.rs

use std::{
    collections::{BTreeMap, HashMap, HashSet},
    sync::{PoisonError, RwLock},
};

use async_trait::async_trait;
use bcrypt::{hash, verify};
use serde_json::{json, Map, Value};

use super::{DataStore, Page, QueryParams, Resource, StoreError, StoreGetters, StoreState};
use crate::models::{
    people::CompanyPayload,
    user::{ChangePasswordPayload, CreateUserPayload},
};

type Table = BTreeMap<i64, Value>;

// Parâmetros que não são filtro de igualdade
const NON_FILTER_PARAMS: [&str; 4] = ["page", "itemsPerPage", "name", "company_document.people"];

/// Store em memória com a mesma semântica da API: ids sequenciais por recurso,
/// `@id` no formato `/{recurso}/{id}`, filtros por igualdade e paginação.
pub struct MemoryStore {
    tables: RwLock<HashMap<Resource, Table>>,
    // id do usuário -> hash bcrypt
    passwords: RwLock<HashMap<i64, String>>,
    failing: RwLock<HashSet<Resource>>,
    failing_writes: RwLock<HashSet<Resource>>,
    state: StoreState,
    bcrypt_cost: u32,
}

impl MemoryStore {
    pub fn new(current_company: Option<i64>) -> Self {
        let store = Self {
            tables: RwLock::default(),
            passwords: RwLock::default(),
            failing: RwLock::default(),
            failing_writes: RwLock::default(),
            state: StoreState::new(current_company),
            bcrypt_cost: bcrypt::DEFAULT_COST,
        };

        for (code, people_type) in [("CPF", "F"), ("RG", "F"), ("CNPJ", "J"), ("IE", "J"), ("IM", "J")] {
            store.seed(
                Resource::DocumentTypes,
                json!({ "documentType": code, "peopleType": people_type }),
            );
        }

        if let Some(company) = current_company {
            store.seed(
                Resource::People,
                json!({ "id": company, "name": "Empresa atual", "peopleType": "J" }),
            );
        }

        store
    }

    /// Custo bcrypt menor para testes.
    pub fn with_bcrypt_cost(mut self, cost: u32) -> Self {
        self.bcrypt_cost = cost;
        self
    }

    /// Insere uma entidade diretamente, sem passar pelo bookkeeping dos getters.
    pub fn seed(&self, resource: Resource, entity: Value) -> Value {
        let mut tables = self.tables.write().unwrap_or_else(PoisonError::into_inner);
        insert(tables.entry(resource).or_default(), resource, entity)
    }

    /// Faz a próxima chamada sobre `resource` falhar (simula a API fora do ar).
    pub fn fail_next(&self, resource: Resource) {
        self.failing
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(resource);
    }

    /// Faz só a próxima escrita sobre `resource` falhar; leituras seguem normais.
    pub fn fail_next_write(&self, resource: Resource) {
        self.failing_writes
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(resource);
    }

    pub fn set_current_company(&self, company: Option<i64>) {
        self.state.set_current_company(company);
    }

    pub fn count(&self, resource: Resource) -> usize {
        let tables = self.tables.read().unwrap_or_else(PoisonError::into_inner);
        tables.get(&resource).map_or(0, BTreeMap::len)
    }

    pub async fn verify_password(&self, user_id: i64, password: &str) -> Result<bool, StoreError> {
        let stored = self
            .passwords
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&user_id)
            .cloned();
        let Some(stored) = stored else {
            return Ok(false);
        };
        let password = password.to_owned();
        Ok(tokio::task::spawn_blocking(move || verify(&password, &stored)).await??)
    }

    fn check_failure(&self, resource: Resource) -> Result<(), StoreError> {
        take_failure(&self.failing, resource)
    }

    fn check_write_failure(&self, resource: Resource) -> Result<(), StoreError> {
        take_failure(&self.failing_writes, resource)
    }

    async fn hash_password(&self, password: &str) -> Result<String, StoreError> {
        let password = password.to_owned();
        let cost = self.bcrypt_cost;
        Ok(tokio::task::spawn_blocking(move || hash(&password, cost)).await??)
    }

    fn query(&self, resource: Resource, params: &QueryParams) -> Result<Page, StoreError> {
        self.check_failure(resource)?;

        let tables = self.tables.read().unwrap_or_else(PoisonError::into_inner);
        let filtered: Vec<&Value> = tables
            .get(&resource)
            .map(|table| table.values().filter(|e| matches(e, params)).collect())
            .unwrap_or_default();

        let total = filtered.len() as u64;
        let page = params.get("page").and_then(|p| p.parse::<usize>().ok()).unwrap_or(1).max(1);
        let per_page = params.get("itemsPerPage").and_then(|p| p.parse::<usize>().ok());

        let members = match per_page {
            Some(per_page) if per_page > 0 => filtered
                .into_iter()
                .skip((page - 1) * per_page)
                .take(per_page)
                .cloned()
                .collect(),
            _ => filtered.into_iter().cloned().collect(),
        };

        Ok(Page { members, total: Some(total) })
    }

    fn find(&self, resource: Resource, id: i64) -> Result<Value, StoreError> {
        self.check_failure(resource)?;
        let tables = self.tables.read().unwrap_or_else(PoisonError::into_inner);
        tables
            .get(&resource)
            .and_then(|table| table.get(&id))
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("{resource}/{id}")))
    }

    fn upsert(&self, resource: Resource, entity: Value) -> Result<Value, StoreError> {
        self.check_failure(resource)?;

        let mut tables = self.tables.write().unwrap_or_else(PoisonError::into_inner);
        let table = tables.entry(resource).or_default();

        match entity.get("id").and_then(Value::as_i64) {
            Some(id) => {
                let existing = table
                    .get_mut(&id)
                    .ok_or_else(|| StoreError::NotFound(format!("{resource}/{id}")))?;
                if let (Some(target), Value::Object(changes)) = (existing.as_object_mut(), entity) {
                    target.extend(changes);
                }
                Ok(existing.clone())
            }
            None => Ok(insert(table, resource, entity)),
        }
    }

    fn delete(&self, resource: Resource, id: i64) -> Result<(), StoreError> {
        self.check_failure(resource)?;
        let mut tables = self.tables.write().unwrap_or_else(PoisonError::into_inner);
        tables
            .get_mut(&resource)
            .and_then(|table| table.remove(&id))
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(format!("{resource}/{id}")))
    }
}

fn take_failure(failing: &RwLock<HashSet<Resource>>, resource: Resource) -> Result<(), StoreError> {
    let mut failing = failing.write().unwrap_or_else(PoisonError::into_inner);
    if failing.remove(&resource) {
        return Err(StoreError::Rejected {
            status: 503,
            body: format!("{resource} indisponível"),
        });
    }
    Ok(())
}

fn insert(table: &mut Table, resource: Resource, entity: Value) -> Value {
    let id = entity
        .get("id")
        .and_then(Value::as_i64)
        .unwrap_or_else(|| table.keys().next_back().map_or(1, |last| last + 1));

    let mut object = match entity {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    object.insert("id".into(), json!(id));
    object.insert("@id".into(), json!(format!("/{}/{}", resource.path(), id)));

    let value = Value::Object(object);
    table.insert(id, value.clone());
    value
}

fn field_equals(value: Option<&Value>, expected: &str) -> bool {
    match value {
        Some(Value::String(s)) => s == expected,
        Some(Value::Number(n)) => n.to_string() == expected,
        Some(Value::Bool(b)) => b.to_string() == expected,
        _ => false,
    }
}

fn matches(entity: &Value, params: &QueryParams) -> bool {
    let filters_ok = params
        .pairs()
        .iter()
        .filter(|(k, _)| !NON_FILTER_PARAMS.contains(&k.as_str()))
        .all(|(k, v)| field_equals(entity.get(k), v));

    let name_ok = match params.get("name") {
        Some(name) => {
            let needle = name.to_lowercase();
            ["name", "alias"].iter().any(|key| {
                entity
                    .get(*key)
                    .and_then(Value::as_str)
                    .is_some_and(|s| s.to_lowercase().contains(&needle))
            })
        }
        None => true,
    };

    filters_ok && name_ok
}

#[async_trait]
impl DataStore for MemoryStore {
    async fn get_items(&self, resource: Resource, params: &QueryParams) -> Result<Page, StoreError> {
        self.state.begin(resource);
        match self.query(resource, params) {
            Ok(page) => {
                self.state.loaded(resource, page.members.clone());
                Ok(page)
            }
            Err(e) => {
                self.state.failed(resource, &e);
                Err(e)
            }
        }
    }

    async fn get_item(&self, resource: Resource, id: i64) -> Result<Value, StoreError> {
        self.state.begin(resource);
        self.state.track(resource, self.find(resource, id))
    }

    async fn save(&self, resource: Resource, entity: Value) -> Result<Option<Value>, StoreError> {
        self.state.begin(resource);
        self.state.track(resource, self.check_write_failure(resource))?;
        let saved = self.state.track(resource, self.upsert(resource, entity))?;
        tracing::debug!("💾 {} salvo: {}", resource, saved["@id"]);
        Ok(Some(saved))
    }

    async fn remove(&self, resource: Resource, id: i64) -> Result<(), StoreError> {
        self.state.begin(resource);
        self.state.track(resource, self.check_write_failure(resource))?;
        self.state.track(resource, self.delete(resource, id))?;
        if resource == Resource::Users {
            self.passwords
                .write()
                .unwrap_or_else(PoisonError::into_inner)
                .remove(&id);
        }
        Ok(())
    }

    async fn create_user(&self, payload: &CreateUserPayload) -> Result<Option<Value>, StoreError> {
        self.state.begin(Resource::Users);
        self.state.track(Resource::Users, self.check_write_failure(Resource::Users))?;
        let hashed = self.state.track(Resource::Users, self.hash_password(&payload.password).await)?;

        let user = json!({
            "username": payload.username,
            "people": format!("/people/{}", payload.people),
            "active": true,
        });
        let created = self.state.track(Resource::Users, self.upsert(Resource::Users, user))?;

        if let Some(id) = created.get("id").and_then(Value::as_i64) {
            self.passwords
                .write()
                .unwrap_or_else(PoisonError::into_inner)
                .insert(id, hashed);
        }
        Ok(Some(created))
    }

    async fn change_password(&self, payload: &ChangePasswordPayload) -> Result<(), StoreError> {
        self.state.begin(Resource::Users);
        self.state.track(Resource::Users, self.check_write_failure(Resource::Users))?;
        self.state
            .track(Resource::Users, self.find(Resource::Users, payload.id))?;
        let hashed = self.state.track(Resource::Users, self.hash_password(&payload.password).await)?;

        self.state.track(
            Resource::Users,
            self.upsert(Resource::Users, json!({ "id": payload.id, "active": payload.active })),
        )?;
        self.passwords
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(payload.id, hashed);
        Ok(())
    }

    async fn create_company(&self, payload: &CompanyPayload) -> Result<Option<Value>, StoreError> {
        self.state.begin(Resource::People);
        self.state.track(Resource::People, self.check_write_failure(Resource::People))?;
        let entity = serde_json::to_value(payload)?;
        let created = self.state.track(Resource::People, self.upsert(Resource::People, entity))?;
        Ok(Some(created))
    }

    fn getters(&self, resource: Resource) -> StoreGetters {
        self.state.getters(resource)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> MemoryStore {
        MemoryStore::new(Some(1)).with_bcrypt_cost(4)
    }

    #[tokio::test]
    async fn seeds_document_types_and_company() {
        let store = store();
        let page = store.get_items(Resource::DocumentTypes, &QueryParams::new()).await.unwrap();
        assert_eq!(page.total, Some(5));
        assert_eq!(page.members[0]["@id"], "/document_types/1");
        assert_eq!(page.members[0]["documentType"], "CPF");
        assert!(store.get_item(Resource::People, 1).await.is_ok());
    }

    #[tokio::test]
    async fn save_creates_then_updates() {
        let store = store();
        let created = store
            .save(Resource::Phones, json!({"ddd": 11, "phone": 33334444, "people": "/people/2"}))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(created["id"], 1);
        assert_eq!(created["@id"], "/phones/1");

        let updated = store
            .save(Resource::Phones, json!({"id": 1, "phone": 933334444}))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated["phone"], 933334444);
        assert_eq!(updated["ddd"], 11);
    }

    #[tokio::test]
    async fn updating_missing_entity_is_not_found() {
        let store = store();
        let err = store.save(Resource::Emails, json!({"id": 99})).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
        assert!(store.getters(Resource::Emails).error.is_some());
    }

    #[tokio::test]
    async fn filters_and_paginates() {
        let store = store();
        for name in ["Ana Souza", "Bruno Lima", "Ana Paula", "Carla"] {
            store.seed(
                Resource::People,
                json!({"name": name, "company": "/people/1", "link_type": "client"}),
            );
        }
        let params = QueryParams::new()
            .with("company", "/people/1")
            .with("link_type", "client")
            .with("page", 1)
            .with("itemsPerPage", 2);
        let page = store.get_items(Resource::People, &params).await.unwrap();
        assert_eq!(page.total, Some(4));
        assert_eq!(page.members.len(), 2);

        let ana = store
            .get_items(Resource::People, &params.clone().with("name", "ana"))
            .await
            .unwrap();
        assert_eq!(ana.total, Some(2));

        let getters = store.getters(Resource::People);
        assert_eq!(getters.items.len(), 2);
        assert!(!getters.is_loading);
    }

    #[tokio::test]
    async fn users_keep_hashed_passwords() {
        let store = store();
        let user = store
            .create_user(&CreateUserPayload {
                username: "joana".into(),
                password: "segredo1".into(),
                confirm_password: "segredo1".into(),
                people: "2".into(),
            })
            .await
            .unwrap()
            .unwrap();
        let id = user["id"].as_i64().unwrap();
        assert_eq!(user["people"], "/people/2");
        assert!(user.get("password").is_none());
        assert!(store.verify_password(id, "segredo1").await.unwrap());

        store
            .change_password(&ChangePasswordPayload {
                id,
                password: "novasenha".into(),
                active: true,
                confirm_password: "novasenha".into(),
            })
            .await
            .unwrap();
        assert!(!store.verify_password(id, "segredo1").await.unwrap());
        assert!(store.verify_password(id, "novasenha").await.unwrap());
    }

    #[tokio::test]
    async fn simulated_failure_is_one_shot() {
        let store = store();
        store.fail_next(Resource::Addresses);
        assert!(store.remove(Resource::Addresses, 1).await.is_err());
        // Depois da falha simulada, volta ao normal (aqui: registro inexistente)
        let err = store.remove(Resource::Addresses, 1).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn write_failure_spares_reads() {
        let store = store();
        store.seed(Resource::Phones, json!({"ddd": 11, "phone": 33334444, "people": "/people/2"}));
        store.fail_next_write(Resource::Phones);

        let page = store.get_items(Resource::Phones, &QueryParams::new()).await.unwrap();
        assert_eq!(page.total, Some(1));

        let err = store.remove(Resource::Phones, 1).await.unwrap_err();
        assert!(matches!(err, StoreError::Rejected { status: 503, .. }));
        assert!(store.getters(Resource::Phones).error.is_some());
        assert_eq!(store.count(Resource::Phones), 1);

        store.remove(Resource::Phones, 1).await.unwrap();
        assert_eq!(store.count(Resource::Phones), 0);
    }

    #[tokio::test]
    async fn write_failure_blocks_user_creation() {
        let store = store();
        store.fail_next_write(Resource::Users);
        let payload = CreateUserPayload {
            username: "joana".into(),
            password: "segredo1".into(),
            confirm_password: "segredo1".into(),
            people: "2".into(),
        };
        assert!(store.create_user(&payload).await.is_err());
        assert_eq!(store.count(Resource::Users), 0);
        assert!(store.create_user(&payload).await.unwrap().is_some());
    }
}
