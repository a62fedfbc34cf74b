// src/services/clients.rs

use std::{collections::HashSet, sync::Arc};

use chrono::NaiveDate;
use serde_json::json;

use crate::{
    common::error::AppError,
    middleware::company::CompanyContext,
    models::people::{Client, ClientPage, ClientSearch, CompanyPayload, NewCompanyForm, PeopleType},
    normalizer::{format_date_input, parse_date, to_iso},
    services::form::{decode_members, form_key, placeholder_id, InFlight},
    store::{DataStore, QueryParams, Resource},
};

pub const LINK_TYPE_CLIENT: &str = "client";

#[derive(Clone)]
pub struct ClientService {
    store: Arc<dyn DataStore>,
    in_flight: InFlight,
    default_page_size: u32,
}

impl ClientService {
    pub fn new(store: Arc<dyn DataStore>, in_flight: InFlight, default_page_size: u32) -> Self {
        Self {
            store,
            in_flight,
            default_page_size,
        }
    }

    /// Parâmetros da listagem. O nome só entra se sobrar algo depois do trim.
    pub fn search_params(&self, company: CompanyContext, search: &ClientSearch) -> QueryParams {
        let params = QueryParams::new()
            .with("company", company.iri())
            .with("link_type", LINK_TYPE_CLIENT)
            .with("page", search.page.unwrap_or(1).max(1))
            .with("itemsPerPage", self.page_size(search));

        match search.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => params.with("name", name),
            _ => params,
        }
    }

    fn page_size(&self, search: &ClientSearch) -> u32 {
        search
            .items_per_page
            .filter(|n| *n > 0)
            .unwrap_or(self.default_page_size)
    }

    pub async fn list(&self, company: CompanyContext, search: &ClientSearch) -> Result<ClientPage, AppError> {
        let params = self.search_params(company, search);
        let page = search.page.unwrap_or(1).max(1);
        let items_per_page = self.page_size(search);

        let result = self.store.get_items(Resource::People, &params).await?;
        let members: Vec<Client> = decode_members(Resource::People, result.members, serde_json::from_value);

        let has_more = match result.total {
            Some(total) => u64::from(page) * u64::from(items_per_page) < total,
            None => members.len() as u32 >= items_per_page,
        };

        tracing::debug!("📋 Página {} de clientes da empresa {}: {} itens", page, company.0, members.len());

        Ok(ClientPage {
            members,
            total: result.total,
            page,
            items_per_page,
            has_more,
        })
    }

    pub async fn get(&self, id: i64) -> Result<Client, AppError> {
        let value = self.store.get_item(Resource::People, id).await?;
        serde_json::from_value(value).map_err(|e| AppError::InternalServerError(e.into()))
    }

    pub async fn create_company(
        &self,
        company: CompanyContext,
        form: NewCompanyForm,
        today: NaiveDate,
    ) -> Result<Client, AppError> {
        let name = form.name.trim().to_string();
        let alias = form.alias.trim().to_string();

        if name.is_empty() || alias.is_empty() {
            let code = match form.people_type {
                PeopleType::Individual => "name_alias_required_individual",
                PeopleType::Company => "name_alias_required_company",
            };
            return Err(AppError::invalid("name", code));
        }

        let foundation_date = match form.foundation_date.as_deref().map(str::trim) {
            None | Some("") => today,
            Some(text) => parse_date(&format_date_input(text))
                .ok_or_else(|| AppError::invalid("foundationDate", "invalid_date"))?,
        };

        let payload = CompanyPayload {
            name: name.clone(),
            alias: alias.clone(),
            foundation_date: to_iso(foundation_date),
            people_type: form.people_type,
            link_type: LINK_TYPE_CLIENT.to_string(),
            company: company.iri(),
            extra_data: json!({}),
        };

        let _guard = self.in_flight.begin(form_key(Resource::People, company.0, None))?;
        let echoed = self.store.create_company(&payload).await?;

        let client = echoed
            .and_then(|value| serde_json::from_value::<Client>(value).ok())
            .unwrap_or_else(|| Client {
                id: placeholder_id(),
                iri: None,
                name,
                alias: Some(alias),
                people_type: Some(form.people_type),
                foundation_date: Some(payload.foundation_date.clone()),
            });

        tracing::info!("🏢 Cliente {} criado para a empresa {}", client.id, company.0);
        Ok(client)
    }
}

/// Acumula páginas da listagem: a página 1 substitui tudo, as seguintes
/// acrescentam no fim sem repetir ids.
pub fn merge_page(previous: Vec<Client>, next: Vec<Client>, page: u32) -> Vec<Client> {
    if page <= 1 {
        return next;
    }
    let incoming: HashSet<i64> = next.iter().map(|c| c.id).collect();
    previous
        .into_iter()
        .filter(|c| !incoming.contains(&c.id))
        .chain(next)
        .collect()
}
