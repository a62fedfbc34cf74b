// src/models/address.rs

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use super::{entity_id, HasId};

pub const DEFAULT_NICKNAME: &str = "DEFAULT";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddressEntry {
    pub id: i64,
    pub street: String,
    pub number: Option<String>,
    pub complement: String,
    pub district: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
    pub nickname: Option<String>,
}

impl HasId for AddressEntry {
    fn id(&self) -> i64 {
        self.id
    }
}

fn text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

impl AddressEntry {
    /// Achata o endereço da API. A rua pode vir aninhada
    /// (`street.city.state.state`) ou como campos planos.
    pub fn from_api(a: &Value) -> Option<Self> {
        let id = entity_id(a)?;
        let street = a.get("street");
        let nested_city = street.and_then(|s| s.get("city"));

        let zip_code = match a.get("zipCode") {
            Some(Value::Object(_)) => text(a.get("zipCode").and_then(|z| z.get("cep"))),
            other => text(other),
        }
        .or_else(|| text(street.and_then(|s| s.get("cep"))))
        .or_else(|| text(a.get("cep")))
        .unwrap_or_default();

        Some(Self {
            id,
            street: text(street.and_then(|s| s.get("street")))
                .or_else(|| text(street))
                .unwrap_or_default(),
            number: text(a.get("number")),
            complement: text(a.get("complement")).unwrap_or_default(),
            district: text(a.get("district")).unwrap_or_default(),
            city: text(nested_city.and_then(|c| c.get("city")))
                .or_else(|| text(a.get("city")))
                .unwrap_or_default(),
            state: text(nested_city.and_then(|c| c.get("state")).and_then(|s| s.get("state")))
                .or_else(|| text(a.get("state")))
                .unwrap_or_default(),
            zip_code,
            country: text(a.get("country")).unwrap_or_default(),
            nickname: text(a.get("nickname")),
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddressForm {
    #[schema(example = "Av. Paulista")]
    pub street: Option<String>,
    pub number: Option<String>,
    pub complement: Option<String>,
    pub district: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    #[schema(example = "01310-100")]
    pub zip_code: Option<String>,
    pub country: Option<String>,
    pub nickname: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AddressPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub street: String,
    pub number: Option<String>,
    pub complement: Option<String>,
    pub city: String,
    pub state: Option<String>,
    pub cep: Option<String>,
    pub district: Option<String>,
    pub country: Option<String>,
    pub nickname: String,
    // Só vai na criação
    #[serde(skip_serializing_if = "Option::is_none")]
    pub people: Option<String>,
}
