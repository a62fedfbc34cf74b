// src/models/user.rs

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use super::{entity_id, HasId};

pub const DEFAULT_ROLE: &str = "Usuário";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct UserEntry {
    pub id: i64,
    pub name: String,
    pub role: String,
    pub email: String,
}

impl HasId for UserEntry {
    fn id(&self) -> i64 {
        self.id
    }
}

impl UserEntry {
    pub fn from_api(u: &Value) -> Option<Self> {
        let field = |key: &str| u.get(key).and_then(Value::as_str).map(str::to_string);
        Some(Self {
            id: entity_id(u)?,
            name: field("username").or_else(|| field("name")).unwrap_or_default(),
            role: field("role").unwrap_or_else(|| DEFAULT_ROLE.to_string()),
            email: field("email").unwrap_or_default(),
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserForm {
    pub username: Option<String>,
    pub password: Option<String>,
    pub confirm_password: Option<String>,
}

// Edição: a senha é opcional, só é trocada se vier preenchida
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordForm {
    pub username: Option<String>,
    pub password: Option<String>,
    pub confirm_password: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserPayload {
    pub username: String,
    pub password: String,
    pub confirm_password: String,
    // Id numérico do cliente (o endpoint não aceita o IRI)
    pub people: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordPayload {
    pub id: i64,
    pub password: String,
    pub active: bool,
    pub confirm_password: String,
}
