// src/services/contact.rs

use std::sync::Arc;

use serde_json::Value;
use validator::Validate;

use crate::{
    common::error::AppError,
    models::{
        contact::{Email, EmailEntry, EmailForm, EmailPayload, Phone, PhoneEntry, PhoneForm, PhonePayload},
        people::people_iri,
    },
    normalizer::PhoneNumber,
    services::form::{decode_members, form_key, placeholder_id, InFlight, LocalList, TabUpdate},
    store::{DataStore, QueryParams, Resource},
};

// Aba de contato: telefones e e-mails do cliente
#[derive(Clone)]
pub struct ContactService {
    store: Arc<dyn DataStore>,
    in_flight: InFlight,
}

impl ContactService {
    pub fn new(store: Arc<dyn DataStore>, in_flight: InFlight) -> Self {
        Self { store, in_flight }
    }

    async fn fetch(&self, resource: Resource, client_id: i64) -> Result<Vec<Value>, AppError> {
        let params = QueryParams::new().with("people", people_iri(client_id));
        Ok(self.store.get_items(resource, &params).await?.members)
    }

    // =========================================================================
    //  TELEFONES
    // =========================================================================

    pub async fn phones(&self, client_id: i64) -> Result<Vec<PhoneEntry>, AppError> {
        let members = self.fetch(Resource::Phones, client_id).await?;
        Ok(decode_members(Resource::Phones, members, serde_json::from_value::<Phone>)
            .into_iter()
            .map(PhoneEntry::from)
            .collect())
    }

    pub async fn save_phone(
        &self,
        client_id: i64,
        editing: Option<i64>,
        form: PhoneForm,
    ) -> Result<TabUpdate<PhoneEntry>, AppError> {
        let number = PhoneNumber::from_input(&form.phone)
            .ok_or_else(|| AppError::invalid("phone", "phone_required"))?;

        let mut list = LocalList::new(self.phones(client_id).await?);
        if let Some(id) = editing {
            if !list.contains(id) {
                return Err(AppError::NotFound(format!("phones/{id}")));
            }
        }

        let payload = PhonePayload::new(&number, people_iri(client_id), editing);
        let _guard = self.in_flight.begin(form_key(Resource::Phones, client_id, editing))?;
        let echoed = self
            .store
            .save(Resource::Phones, serde_json::to_value(&payload).map_err(anyhow::Error::from)?)
            .await?;

        let item = echoed
            .and_then(|v| serde_json::from_value::<Phone>(v).ok())
            .map(PhoneEntry::from)
            .unwrap_or_else(|| PhoneEntry {
                id: editing.unwrap_or_else(placeholder_id),
                value: number.display(),
            });

        list.upsert(editing, item.clone());
        tracing::info!("📞 Telefone {} salvo para o cliente {}", item.id, client_id);

        Ok(TabUpdate { item, items: list.into_vec() })
    }

    pub async fn remove_phone(&self, client_id: i64, id: i64) -> Result<Vec<PhoneEntry>, AppError> {
        let mut list = LocalList::new(self.phones(client_id).await?);
        let _guard = self.in_flight.begin(form_key(Resource::Phones, client_id, Some(id)))?;

        self.store.remove(Resource::Phones, id).await?;
        list.remove(id);
        Ok(list.into_vec())
    }

    // =========================================================================
    //  E-MAILS
    // =========================================================================

    pub async fn emails(&self, client_id: i64) -> Result<Vec<EmailEntry>, AppError> {
        let members = self.fetch(Resource::Emails, client_id).await?;
        Ok(decode_members(Resource::Emails, members, serde_json::from_value::<Email>)
            .into_iter()
            .map(EmailEntry::from)
            .collect())
    }

    pub async fn save_email(
        &self,
        client_id: i64,
        editing: Option<i64>,
        form: EmailForm,
    ) -> Result<TabUpdate<EmailEntry>, AppError> {
        let form = EmailForm { email: form.email.trim().to_string() };
        form.validate()?;

        let mut list = LocalList::new(self.emails(client_id).await?);
        if let Some(id) = editing {
            if !list.contains(id) {
                return Err(AppError::NotFound(format!("emails/{id}")));
            }
        }

        let payload = EmailPayload {
            id: editing,
            email: form.email.clone(),
            people: people_iri(client_id),
        };
        let _guard = self.in_flight.begin(form_key(Resource::Emails, client_id, editing))?;
        let echoed = self
            .store
            .save(Resource::Emails, serde_json::to_value(&payload).map_err(anyhow::Error::from)?)
            .await?;

        let item = echoed
            .and_then(|v| serde_json::from_value::<Email>(v).ok())
            .map(EmailEntry::from)
            .unwrap_or_else(|| EmailEntry {
                id: editing.unwrap_or_else(placeholder_id),
                value: form.email,
            });

        list.upsert(editing, item.clone());
        Ok(TabUpdate { item, items: list.into_vec() })
    }

    pub async fn remove_email(&self, client_id: i64, id: i64) -> Result<Vec<EmailEntry>, AppError> {
        let mut list = LocalList::new(self.emails(client_id).await?);
        let _guard = self.in_flight.begin(form_key(Resource::Emails, client_id, Some(id)))?;

        self.store.remove(Resource::Emails, id).await?;
        list.remove(id);
        Ok(list.into_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, StoreError};
    use serde_json::json;

    fn service() -> (Arc<MemoryStore>, ContactService) {
        let store = Arc::new(MemoryStore::new(Some(1)));
        (store.clone(), ContactService::new(store, InFlight::default()))
    }

    #[tokio::test]
    async fn saves_phone_as_digits_and_returns_formatted_list() {
        let (store, service) = service();
        let update = service
            .save_phone(2, None, PhoneForm { phone: "(11) 98765-4321".into() })
            .await
            .unwrap();

        assert_eq!(update.item.value, "(11) 98765-4321");
        assert_eq!(update.items, vec![update.item.clone()]);

        let stored = store.get_item(Resource::Phones, update.item.id).await.unwrap();
        assert_eq!(stored["ddi"], 55);
        assert_eq!(stored["ddd"], 11);
        assert_eq!(stored["phone"], 987654321);
        assert_eq!(stored["people"], "/people/2");
    }

    #[tokio::test]
    async fn incomplete_phone_never_reaches_the_store() {
        let (store, service) = service();
        let err = service
            .save_phone(2, None, PhoneForm { phone: "(11) 9876".into() })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidField { code: "phone_required", .. }));
        assert_eq!(store.count(Resource::Phones), 0);
    }

    #[tokio::test]
    async fn editing_replaces_the_entry() {
        let (store, service) = service();
        store.seed(Resource::Phones, json!({"ddi": 55, "ddd": 11, "phone": 33334444, "people": "/people/2"}));
        store.seed(Resource::Phones, json!({"ddi": 55, "ddd": 21, "phone": 22223333, "people": "/people/2"}));

        let update = service
            .save_phone(2, Some(1), PhoneForm { phone: "1133335555".into() })
            .await
            .unwrap();
        let values: Vec<&str> = update.items.iter().map(|p| p.value.as_str()).collect();
        assert_eq!(values, vec!["(11) 3333-5555", "(21) 2222-3333"]);
    }

    #[tokio::test]
    async fn editing_unknown_phone_is_not_found() {
        let (_, service) = service();
        let err = service
            .save_phone(2, Some(42), PhoneForm { phone: "1133335555".into() })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn failed_remove_keeps_the_list() {
        let (store, service) = service();
        store.seed(Resource::Phones, json!({"ddd": 11, "phone": 33334444, "people": "/people/2"}));

        store.fail_next_write(Resource::Phones);
        let err = service.remove_phone(2, 1).await.unwrap_err();
        assert!(matches!(err, AppError::StoreError(StoreError::Rejected { status: 503, .. })));
        assert_eq!(service.phones(2).await.unwrap().len(), 1);
        assert!(!service.in_flight.is_pending(&form_key(Resource::Phones, 2, Some(1))));

        let err = service.remove_phone(2, 99).await.unwrap_err();
        assert!(matches!(err, AppError::StoreError(StoreError::NotFound(_))));

        // Mesma chave de formulário, aceita de novo
        assert!(service.remove_phone(2, 1).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn failed_save_keeps_the_list_and_allows_retry() {
        let (store, service) = service();
        store.seed(Resource::Phones, json!({"ddi": 55, "ddd": 11, "phone": 33334444, "people": "/people/2"}));

        store.fail_next_write(Resource::Phones);
        let err = service
            .save_phone(2, Some(1), PhoneForm { phone: "21999998888".into() })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::StoreError(StoreError::Rejected { .. })));

        let phones = service.phones(2).await.unwrap();
        assert_eq!(phones.len(), 1);
        assert_eq!(phones[0].value, "(11) 3333-4444");
        assert!(!service.in_flight.is_pending(&form_key(Resource::Phones, 2, Some(1))));

        let update = service
            .save_phone(2, Some(1), PhoneForm { phone: "21999998888".into() })
            .await
            .unwrap();
        assert_eq!(update.item.value, "(21) 99999-8888");
        assert_eq!(update.items.len(), 1);
    }

    #[tokio::test]
    async fn email_is_validated_and_trimmed() {
        let (_, service) = service();
        let err = service
            .save_email(2, None, EmailForm { email: "não-é-email".into() })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));

        let update = service
            .save_email(2, None, EmailForm { email: "  ana@empresa.com.br ".into() })
            .await
            .unwrap();
        assert_eq!(update.item.value, "ana@empresa.com.br");
        assert_eq!(service.emails(2).await.unwrap().len(), 1);
    }
}
