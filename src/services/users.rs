// src/services/users.rs

use std::sync::Arc;

use crate::{
    common::error::AppError,
    models::{
        people::people_iri,
        user::{ChangePasswordForm, ChangePasswordPayload, CreateUserPayload, UserEntry, UserForm, DEFAULT_ROLE},
    },
    services::form::{decode_members, form_key, placeholder_id, InFlight, LocalList, TabUpdate},
    store::{DataStore, QueryParams, Resource},
};

/// Contas de acesso vinculadas ao cliente.
#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn DataStore>,
    in_flight: InFlight,
}

impl UserService {
    pub fn new(store: Arc<dyn DataStore>, in_flight: InFlight) -> Self {
        Self { store, in_flight }
    }

    pub async fn users(&self, client_id: i64) -> Result<Vec<UserEntry>, AppError> {
        let params = QueryParams::new().with("people", people_iri(client_id));
        let page = self.store.get_items(Resource::Users, &params).await?;

        Ok(decode_members(Resource::Users, page.members, |v| {
            UserEntry::from_api(&v).ok_or("sem id")
        }))
    }

    pub async fn create(&self, client_id: i64, form: UserForm) -> Result<TabUpdate<UserEntry>, AppError> {
        let username = form.username.unwrap_or_default().trim().to_string();
        let password = form.password.unwrap_or_default();
        let confirm_password = form.confirm_password.unwrap_or_default();

        // Confirmação é checada antes dos obrigatórios
        if password != confirm_password {
            return Err(AppError::invalid("confirmPassword", "password_mismatch"));
        }
        if username.is_empty() || password.is_empty() {
            return Err(AppError::invalid("username", "username_password_required"));
        }

        let mut list = LocalList::new(self.users(client_id).await?);

        let payload = CreateUserPayload {
            username: username.clone(),
            password,
            confirm_password,
            people: client_id.to_string(),
        };
        let _guard = self.in_flight.begin(form_key(Resource::Users, client_id, None))?;
        let echoed = self.store.create_user(&payload).await?;

        let item = echoed
            .as_ref()
            .and_then(UserEntry::from_api)
            .unwrap_or_else(|| UserEntry {
                id: placeholder_id(),
                name: username,
                role: DEFAULT_ROLE.to_string(),
                email: String::new(),
            });

        list.upsert(None, item.clone());
        tracing::info!("👤 Usuário '{}' criado para o cliente {}", item.name, client_id);

        Ok(TabUpdate { item, items: list.into_vec() })
    }

    /// Edição: a senha só é trocada quando informada.
    pub async fn update(
        &self,
        client_id: i64,
        id: i64,
        form: ChangePasswordForm,
    ) -> Result<TabUpdate<UserEntry>, AppError> {
        let password = form.password.unwrap_or_default();
        let confirm_password = form.confirm_password.unwrap_or_default();
        if !password.is_empty() && password != confirm_password {
            return Err(AppError::invalid("confirmPassword", "password_mismatch"));
        }

        let mut list = LocalList::new(self.users(client_id).await?);
        let mut item = list
            .get(id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("users/{id}")))?;

        let _guard = self.in_flight.begin(form_key(Resource::Users, client_id, Some(id)))?;
        if !password.is_empty() {
            self.store
                .change_password(&ChangePasswordPayload {
                    id,
                    password,
                    active: true,
                    confirm_password,
                })
                .await?;
            tracing::info!("🔑 Senha do usuário {} alterada", id);
        }

        if let Some(username) = form.username.map(|u| u.trim().to_string()).filter(|u| !u.is_empty()) {
            item.name = username;
        }

        list.upsert(Some(id), item.clone());
        Ok(TabUpdate { item, items: list.into_vec() })
    }

    pub async fn remove(&self, client_id: i64, id: i64) -> Result<Vec<UserEntry>, AppError> {
        let mut list = LocalList::new(self.users(client_id).await?);
        let _guard = self.in_flight.begin(form_key(Resource::Users, client_id, Some(id)))?;

        self.store.remove(Resource::Users, id).await?;
        list.remove(id);
        Ok(list.into_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn service() -> (Arc<MemoryStore>, UserService) {
        let store = Arc::new(MemoryStore::new(Some(1)).with_bcrypt_cost(4));
        (store.clone(), UserService::new(store, InFlight::default()))
    }

    fn form(username: &str, password: &str, confirm: &str) -> UserForm {
        UserForm {
            username: Some(username.into()),
            password: Some(password.into()),
            confirm_password: Some(confirm.into()),
        }
    }

    #[tokio::test]
    async fn creates_user_linked_to_client() {
        let (store, service) = service();
        let update = service.create(7, form("joana", "segredo1", "segredo1")).await.unwrap();

        assert_eq!(update.item.name, "joana");
        assert_eq!(update.item.role, "Usuário");
        assert_eq!(service.users(7).await.unwrap().len(), 1);
        assert!(store.verify_password(update.item.id, "segredo1").await.unwrap());
    }

    #[tokio::test]
    async fn mismatch_is_reported_before_missing_fields() {
        let (store, service) = service();
        let err = service.create(7, form("", "a", "b")).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidField { code: "password_mismatch", .. }));

        let err = service.create(7, form("", "", "")).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidField { code: "username_password_required", .. }));
        assert_eq!(store.count(Resource::Users), 0);
    }

    #[tokio::test]
    async fn update_changes_password_only_when_given() {
        let (store, service) = service();
        let created = service.create(7, form("joana", "segredo1", "segredo1")).await.unwrap();
        let id = created.item.id;

        let renamed = service
            .update(7, id, ChangePasswordForm { username: Some("joana.s".into()), ..Default::default() })
            .await
            .unwrap();
        assert_eq!(renamed.item.name, "joana.s");
        assert!(store.verify_password(id, "segredo1").await.unwrap());

        service
            .update(
                7,
                id,
                ChangePasswordForm {
                    username: None,
                    password: Some("novasenha".into()),
                    confirm_password: Some("novasenha".into()),
                },
            )
            .await
            .unwrap();
        assert!(store.verify_password(id, "novasenha").await.unwrap());
    }

    #[tokio::test]
    async fn update_of_unknown_user_is_not_found() {
        let (_, service) = service();
        let err = service.update(7, 99, ChangePasswordForm::default()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn remove_deletes_the_account() {
        let (_, service) = service();
        let created = service.create(7, form("joana", "segredo1", "segredo1")).await.unwrap();
        assert!(service.remove(7, created.item.id).await.unwrap().is_empty());
        assert!(service.users(7).await.unwrap().is_empty());
    }
}
