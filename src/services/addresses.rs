// src/services/addresses.rs

use std::sync::Arc;

use crate::{
    common::error::AppError,
    models::{
        address::{AddressEntry, AddressForm, AddressPayload, DEFAULT_NICKNAME},
        people::people_iri,
    },
    services::form::{decode_members, form_key, placeholder_id, InFlight, LocalList, TabUpdate},
    store::{DataStore, QueryParams, Resource},
};

#[derive(Clone)]
pub struct AddressService {
    store: Arc<dyn DataStore>,
    in_flight: InFlight,
}

// Campo opcional: texto em branco vira None
fn filled(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl AddressService {
    pub fn new(store: Arc<dyn DataStore>, in_flight: InFlight) -> Self {
        Self { store, in_flight }
    }

    pub async fn addresses(&self, client_id: i64) -> Result<Vec<AddressEntry>, AppError> {
        let params = QueryParams::new().with("people", people_iri(client_id));
        let page = self.store.get_items(Resource::Addresses, &params).await?;

        Ok(decode_members(Resource::Addresses, page.members, |v| {
            AddressEntry::from_api(&v).ok_or("sem id")
        }))
    }

    pub async fn save(
        &self,
        client_id: i64,
        editing: Option<i64>,
        form: AddressForm,
    ) -> Result<TabUpdate<AddressEntry>, AppError> {
        let (Some(street), Some(city)) = (filled(form.street), filled(form.city)) else {
            return Err(AppError::invalid("street", "street_city_required"));
        };

        let mut list = LocalList::new(self.addresses(client_id).await?);
        if let Some(id) = editing {
            if !list.contains(id) {
                return Err(AppError::NotFound(format!("addresses/{id}")));
            }
        }

        let payload = AddressPayload {
            id: editing,
            street,
            number: filled(form.number),
            complement: filled(form.complement),
            city,
            state: filled(form.state),
            cep: filled(form.zip_code),
            district: filled(form.district),
            country: filled(form.country),
            nickname: filled(form.nickname).unwrap_or_else(|| DEFAULT_NICKNAME.to_string()),
            people: editing.is_none().then(|| people_iri(client_id)),
        };

        let _guard = self.in_flight.begin(form_key(Resource::Addresses, client_id, editing))?;
        let echoed = self
            .store
            .save(Resource::Addresses, serde_json::to_value(&payload).map_err(anyhow::Error::from)?)
            .await?;

        let item = echoed
            .as_ref()
            .and_then(AddressEntry::from_api)
            .unwrap_or_else(|| AddressEntry {
                id: editing.unwrap_or_else(placeholder_id),
                street: payload.street,
                number: payload.number,
                complement: payload.complement.unwrap_or_default(),
                district: payload.district.unwrap_or_default(),
                city: payload.city,
                state: payload.state.unwrap_or_default(),
                zip_code: payload.cep.unwrap_or_default(),
                country: payload.country.unwrap_or_default(),
                nickname: Some(payload.nickname),
            });

        list.upsert(editing, item.clone());
        tracing::info!("📍 Endereço {} salvo para o cliente {}", item.id, client_id);

        Ok(TabUpdate { item, items: list.into_vec() })
    }

    pub async fn remove(&self, client_id: i64, id: i64) -> Result<Vec<AddressEntry>, AppError> {
        let mut list = LocalList::new(self.addresses(client_id).await?);
        let _guard = self.in_flight.begin(form_key(Resource::Addresses, client_id, Some(id)))?;

        self.store.remove(Resource::Addresses, id).await?;
        list.remove(id);
        Ok(list.into_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn service() -> (Arc<MemoryStore>, AddressService) {
        let store = Arc::new(MemoryStore::new(Some(1)));
        (store.clone(), AddressService::new(store, InFlight::default()))
    }

    fn form(street: &str, city: &str) -> AddressForm {
        AddressForm {
            street: Some(street.into()),
            city: Some(city.into()),
            zip_code: Some("01310-100".into()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn creates_with_cep_and_default_nickname() {
        let (store, service) = service();
        let update = service.save(2, None, form("Av. Paulista", "São Paulo")).await.unwrap();

        assert_eq!(update.item.zip_code, "01310-100");
        assert_eq!(update.item.nickname.as_deref(), Some("DEFAULT"));

        let stored = store.get_item(Resource::Addresses, update.item.id).await.unwrap();
        assert_eq!(stored["cep"], "01310-100");
        assert_eq!(stored["people"], "/people/2");
        assert!(stored.get("zipCode").is_none());
    }

    #[tokio::test]
    async fn update_does_not_resend_people() {
        let (store, service) = service();
        let created = service.save(2, None, form("Rua A", "Recife")).await.unwrap();

        let update = service
            .save(2, Some(created.item.id), AddressForm { nickname: Some("Loja".into()), ..form("Rua B", "Recife") })
            .await
            .unwrap();
        assert_eq!(update.items.len(), 1);
        assert_eq!(update.item.street, "Rua B");
        assert_eq!(update.item.nickname.as_deref(), Some("Loja"));

        // O vínculo original permanece
        let stored = store.get_item(Resource::Addresses, created.item.id).await.unwrap();
        assert_eq!(stored["people"], "/people/2");
    }

    #[tokio::test]
    async fn street_and_city_are_required() {
        let (store, service) = service();
        let err = service.save(2, None, form("Rua A", "   ")).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidField { code: "street_city_required", .. }));
        assert_eq!(store.count(Resource::Addresses), 0);
    }

    #[tokio::test]
    async fn remove_updates_the_address_list() {
        let (store, service) = service();
        let a = service.save(2, None, form("Rua A", "Recife")).await.unwrap();
        service.save(2, None, form("Rua B", "Olinda")).await.unwrap();

        store.fail_next_write(Resource::Addresses);
        assert!(service.remove(2, a.item.id).await.is_err());
        assert_eq!(service.addresses(2).await.unwrap().len(), 2);
        assert!(!service.in_flight.is_pending(&form_key(Resource::Addresses, 2, Some(a.item.id))));

        let left = service.remove(2, a.item.id).await.unwrap();
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].street, "Rua B");
    }

    #[tokio::test]
    async fn failed_save_leaves_nothing_behind() {
        let (store, service) = service();
        store.fail_next_write(Resource::Addresses);
        assert!(service.save(2, None, form("Rua A", "Recife")).await.is_err());
        assert!(service.addresses(2).await.unwrap().is_empty());

        let update = service.save(2, None, form("Rua A", "Recife")).await.unwrap();
        assert_eq!(update.items.len(), 1);
    }
}
