pub mod address;
pub mod contact;
pub mod document;
pub mod people;
pub mod user;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Item de uma aba (telefones, documentos...) identificado por id.
pub trait HasId {
    fn id(&self) -> i64;
}

/// Primeira sequência de dígitos de um IRI: "/people/42" -> 42.
pub fn iri_id(iri: &str) -> Option<i64> {
    let digits: String = iri
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

// A API devolve DDD/telefone/documento ora como número, ora como string
pub(crate) fn de_digits<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s,
        _ => String::new(),
    })
}

// Referência a outra entidade: "/document_types/1" ou { "@id": ..., "id": ... }
pub(crate) fn de_reference<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(reference_of(&Value::deserialize(deserializer)?).unwrap_or_default())
}

pub(crate) fn reference_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Object(obj) => obj
            .get("@id")
            .and_then(Value::as_str)
            .map(str::to_string)
            .or_else(|| obj.get("id").and_then(reference_of)),
        _ => None,
    }
}

/// Id numérico de uma entidade: campo `id` ou, na falta dele, o `@id`.
pub(crate) fn entity_id(value: &Value) -> Option<i64> {
    value
        .get("id")
        .and_then(|id| id.as_i64().or_else(|| id.as_str().and_then(|s| s.parse().ok())))
        .or_else(|| value.get("@id").and_then(Value::as_str).and_then(iri_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extracts_id_from_iri() {
        assert_eq!(iri_id("/people/42"), Some(42));
        assert_eq!(iri_id("42"), Some(42));
        assert_eq!(iri_id("/people/"), None);
    }

    #[test]
    fn entity_id_prefers_id_field() {
        assert_eq!(entity_id(&json!({"id": 7, "@id": "/phones/9"})), Some(7));
        assert_eq!(entity_id(&json!({"@id": "/phones/9"})), Some(9));
        assert_eq!(entity_id(&json!({"id": "12"})), Some(12));
        assert_eq!(entity_id(&json!({})), None);
    }

    #[test]
    fn reference_accepts_string_or_object() {
        assert_eq!(reference_of(&json!("/document_types/1")).as_deref(), Some("/document_types/1"));
        assert_eq!(reference_of(&json!({"@id": "/document_types/2"})).as_deref(), Some("/document_types/2"));
        assert_eq!(reference_of(&json!({"id": 3})).as_deref(), Some("3"));
        assert_eq!(reference_of(&json!(null)), None);
    }
}
