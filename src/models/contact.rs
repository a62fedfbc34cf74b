// src/models/contact.rs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::{de_digits, HasId};
use crate::normalizer::{format_phone, PhoneNumber};

// --- TELEFONE ---

// Como a API guarda o telefone
#[derive(Debug, Clone, Deserialize)]
pub struct Phone {
    pub id: i64,
    #[serde(default, deserialize_with = "de_digits")]
    pub ddd: String,
    #[serde(default, deserialize_with = "de_digits")]
    pub phone: String,
}

// Como a aba de contato mostra o telefone
#[derive(Debug, Clone, Serialize, PartialEq, ToSchema)]
pub struct PhoneEntry {
    pub id: i64,
    pub value: String,
}

impl From<Phone> for PhoneEntry {
    fn from(p: Phone) -> Self {
        Self {
            id: p.id,
            value: format_phone(&format!("{}{}", p.ddd, p.phone)),
        }
    }
}

impl HasId for PhoneEntry {
    fn id(&self) -> i64 {
        self.id
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct PhoneForm {
    #[serde(default)]
    #[schema(example = "(11) 98765-4321")]
    pub phone: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PhonePayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub ddi: u16,
    pub ddd: u32,
    pub phone: u64,
    pub people: String,
}

impl PhonePayload {
    pub fn new(number: &PhoneNumber, people: String, id: Option<i64>) -> Self {
        let (ddd, phone) = number.numeric_parts();
        Self {
            id,
            ddi: number.ddi,
            ddd,
            phone,
            people,
        }
    }
}

// --- E-MAIL ---

#[derive(Debug, Clone, Deserialize)]
pub struct Email {
    pub id: i64,
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, ToSchema)]
pub struct EmailEntry {
    pub id: i64,
    pub value: String,
}

impl From<Email> for EmailEntry {
    fn from(e: Email) -> Self {
        Self {
            id: e.id,
            value: e.email,
        }
    }
}

impl HasId for EmailEntry {
    fn id(&self) -> i64 {
        self.id
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct EmailForm {
    #[serde(default)]
    #[schema(example = "ana@empresa.com.br")]
    #[validate(email(code = "invalid_email"))]
    pub email: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct EmailPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub email: String,
    pub people: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numeric_phone_from_api_is_formatted() {
        let phone: Phone = serde_json::from_value(json!({"id": 3, "ddi": 55, "ddd": 11, "phone": 987654321})).unwrap();
        assert_eq!(PhoneEntry::from(phone).value, "(11) 98765-4321");
    }

    #[test]
    fn payload_matches_store_contract() {
        let number = PhoneNumber::from_input("(11) 98765-4321").unwrap();
        let payload = PhonePayload::new(&number, "/people/5".into(), None);
        assert_eq!(
            serde_json::to_value(payload).unwrap(),
            json!({"ddi": 55, "ddd": 11, "phone": 987654321u64, "people": "/people/5"})
        );
    }

    #[test]
    fn email_form_validation() {
        assert!(EmailForm { email: "ana@empresa.com.br".into() }.validate().is_ok());
        assert!(EmailForm { email: "ana@".into() }.validate().is_err());
        assert!(EmailForm { email: String::new() }.validate().is_err());
    }
}
