// src/services/form.rs

use std::{
    collections::HashSet,
    sync::{Arc, Mutex, PoisonError},
};

use std::fmt::Display;

use chrono::Utc;
use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;

use crate::{common::error::AppError, models::HasId, store::Resource};

/// Chave de uma instância de formulário: recurso, cliente e item em edição.
pub fn form_key(resource: Resource, client_id: i64, editing: Option<i64>) -> String {
    match editing {
        Some(id) => format!("{resource}:{client_id}:{id}"),
        None => format!("{resource}:{client_id}:new"),
    }
}

/// Formulários com envio em andamento. Um segundo envio para a mesma chave é
/// recusado até o primeiro terminar (com sucesso ou erro).
#[derive(Debug, Clone, Default)]
pub struct InFlight {
    keys: Arc<Mutex<HashSet<String>>>,
}

impl InFlight {
    pub fn begin(&self, key: String) -> Result<SubmissionGuard, AppError> {
        let mut keys = self.keys.lock().unwrap_or_else(PoisonError::into_inner);
        if !keys.insert(key.clone()) {
            tracing::warn!("⏳ Envio duplicado recusado: {}", key);
            return Err(AppError::SubmissionInProgress(key));
        }
        Ok(SubmissionGuard {
            keys: Arc::clone(&self.keys),
            key,
        })
    }

    pub fn is_pending(&self, key: &str) -> bool {
        self.keys
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(key)
    }
}

// Libera a chave ao sair de escopo, inclusive no caminho de erro
#[derive(Debug)]
pub struct SubmissionGuard {
    keys: Arc<Mutex<HashSet<String>>>,
    key: String,
}

impl Drop for SubmissionGuard {
    fn drop(&mut self) {
        self.keys
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.key);
    }
}

/// Converte os membros de uma listagem. Membro que não pôde ser lido fica de
/// fora e gera um aviso com o `@id` dele.
pub fn decode_members<T, E, F>(resource: Resource, members: Vec<Value>, decode: F) -> Vec<T>
where
    E: Display,
    F: Fn(Value) -> Result<T, E>,
{
    members
        .into_iter()
        .filter_map(|member| {
            let iri = member
                .get("@id")
                .and_then(Value::as_str)
                .unwrap_or("?")
                .to_owned();
            match decode(member) {
                Ok(item) => Some(item),
                Err(e) => {
                    tracing::warn!("⚠️ Item de {} ignorado ({}): {}", resource, iri, e);
                    None
                }
            }
        })
        .collect()
}

/// Id provisório quando o store não devolve a entidade salva.
pub fn placeholder_id() -> i64 {
    Utc::now().timestamp_millis()
}

/// Lista local de uma aba. Só deve ser alterada depois que a chamada remota
/// terminou com sucesso; em caso de erro a lista anterior é descartada intacta.
#[derive(Debug, Clone)]
pub struct LocalList<T> {
    items: Vec<T>,
}

impl<T: HasId> LocalList<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self { items }
    }

    pub fn get(&self, id: i64) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn contains(&self, id: i64) -> bool {
        self.get(id).is_some()
    }

    /// Substitui o item `replacing` (edição) ou acrescenta no fim (criação).
    pub fn upsert(&mut self, replacing: Option<i64>, item: T) {
        let target = replacing.unwrap_or_else(|| item.id());
        match self.items.iter_mut().find(|existing| existing.id() == target) {
            Some(slot) => *slot = item,
            None => self.items.push(item),
        }
    }

    pub fn remove(&mut self, id: i64) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id() != id);
        self.items.len() != before
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn into_vec(self) -> Vec<T> {
        self.items
    }
}

/// Resposta de um envio: o item salvo e a lista completa da aba já atualizada.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TabUpdate<T> {
    pub item: T,
    pub items: Vec<T>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Item(i64, &'static str);

    impl HasId for Item {
        fn id(&self) -> i64 {
            self.0
        }
    }

    #[test]
    fn second_submission_is_rejected_while_first_is_pending() {
        let in_flight = InFlight::default();
        let key = form_key(Resource::Phones, 1, None);

        let guard = in_flight.begin(key.clone()).unwrap();
        assert!(matches!(
            in_flight.begin(key.clone()),
            Err(AppError::SubmissionInProgress(_))
        ));
        // Outro formulário não é afetado
        assert!(in_flight.begin(form_key(Resource::Phones, 1, Some(9))).is_ok());

        drop(guard);
        assert!(!in_flight.is_pending(&key));
        assert!(in_flight.begin(key).is_ok());
    }

    #[test]
    fn keys_identify_the_form_instance() {
        assert_eq!(form_key(Resource::Documents, 3, None), "documents:3:new");
        assert_eq!(form_key(Resource::Users, 3, Some(8)), "users:3:8");
    }

    #[test]
    fn upsert_replaces_or_appends() {
        let mut list = LocalList::new(vec![Item(1, "a"), Item(2, "b")]);
        list.upsert(Some(2), Item(2, "B"));
        list.upsert(None, Item(3, "c"));
        assert_eq!(list.items(), &[Item(1, "a"), Item(2, "B"), Item(3, "c")]);

        // Edição em que o store devolveu outro id: o item antigo é substituído
        list.upsert(Some(1), Item(10, "a2"));
        assert_eq!(list.get(10), Some(&Item(10, "a2")));
        assert!(!list.contains(1));
    }

    #[test]
    fn remove_reports_whether_something_changed() {
        let mut list = LocalList::new(vec![Item(1, "a")]);
        assert!(!list.remove(7));
        assert!(list.remove(1));
        assert!(list.into_vec().is_empty());
    }

    #[test]
    fn unreadable_members_are_skipped() {
        let members = vec![
            serde_json::json!({"@id": "/phones/1", "n": 1}),
            serde_json::json!({"@id": "/phones/2", "n": "dois"}),
            serde_json::json!({"@id": "/phones/3", "n": 3}),
        ];
        let decoded = decode_members(Resource::Phones, members, |v| {
            v["n"].as_i64().ok_or("n não numérico")
        });
        assert_eq!(decoded, vec![1, 3]);
    }

    #[test]
    fn placeholder_ids_are_timestamps() {
        assert!(placeholder_id() > 1_600_000_000_000);
    }
}
