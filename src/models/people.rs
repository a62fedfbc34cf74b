// src/models/people.rs

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};

use super::{
    address::AddressEntry, contact::{EmailEntry, PhoneEntry}, document::DocumentEntry,
    user::UserEntry,
};

// --- ENUMS ---

// F = pessoa física, J = pessoa jurídica
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, ToSchema)]
pub enum PeopleType {
    #[serde(rename = "F", alias = "fisica")]
    Individual,
    #[default]
    #[serde(rename = "J", alias = "juridica")]
    Company,
}

pub fn people_iri(id: i64) -> String {
    format!("/people/{id}")
}

// --- CLIENTE ---

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: i64,

    #[serde(rename = "@id", default, skip_serializing_if = "Option::is_none")]
    pub iri: Option<String>,

    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub alias: Option<String>,

    #[serde(default)]
    pub people_type: Option<PeopleType>,

    // A API pode mandar data pura ou data/hora; guardamos como veio
    #[serde(default)]
    pub foundation_date: Option<String>,
}

impl Client {
    pub fn iri(&self) -> String {
        self.iri
            .clone()
            .unwrap_or_else(|| people_iri(self.id))
    }
}

/// Tela de detalhe: o cliente e o conteúdo de cada aba.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClientDetail {
    pub client: Client,
    pub phones: Vec<PhoneEntry>,
    pub emails: Vec<EmailEntry>,
    pub documents: Vec<DocumentEntry>,
    pub addresses: Vec<AddressEntry>,
    pub users: Vec<UserEntry>,
}

// --- LISTAGEM ---

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ClientSearch {
    pub page: Option<u32>,
    pub items_per_page: Option<u32>,
    /// Busca por nome ou apelido
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClientPage {
    pub members: Vec<Client>,
    pub total: Option<u64>,
    pub page: u32,
    pub items_per_page: u32,
    pub has_more: bool,
}

// --- NOVA EMPRESA ---

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewCompanyForm {
    #[serde(default)]
    #[schema(example = "Padaria Central Ltda")]
    pub name: String,
    #[serde(default)]
    #[schema(example = "Padaria Central")]
    pub alias: String,
    // Texto digitado, DD/MM/AAAA
    #[schema(example = "01/02/2003")]
    pub foundation_date: Option<String>,
    #[serde(default)]
    pub people_type: PeopleType,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CompanyPayload {
    pub name: String,
    pub alias: String,
    pub foundation_date: String,
    pub people_type: PeopleType,
    #[serde(rename = "link_type")]
    pub link_type: String,
    pub company: String,
    #[serde(rename = "extra-data")]
    pub extra_data: Value,
}
