// src/services/documents.rs

use std::sync::Arc;

use crate::{
    common::error::AppError,
    middleware::company::CompanyContext,
    models::{
        document::{Document, DocumentEntry, DocumentForm, DocumentPayload, DocumentType},
        people::{people_iri, Client, PeopleType},
    },
    normalizer::{digits_only, mask_with, DocumentKind, DocumentTypeLookup},
    services::form::{decode_members, form_key, placeholder_id, InFlight, LocalList, TabUpdate},
    store::{DataStore, QueryParams, Resource},
};

#[derive(Clone)]
pub struct DocumentService {
    store: Arc<dyn DataStore>,
    in_flight: InFlight,
}

impl DocumentService {
    pub fn new(store: Arc<dyn DataStore>, in_flight: InFlight) -> Self {
        Self { store, in_flight }
    }

    /// Catálogo de tipos de documento da empresa.
    pub async fn types(&self, company: CompanyContext) -> Result<Vec<DocumentType>, AppError> {
        let params = QueryParams::new().with("company_document.people", company.iri());
        let page = self.store.get_items(Resource::DocumentTypes, &params).await?;

        Ok(decode_members(Resource::DocumentTypes, page.members, serde_json::from_value))
    }

    pub async fn documents(&self, client_id: i64, types: &[DocumentType]) -> Result<Vec<DocumentEntry>, AppError> {
        let params = QueryParams::new().with("people", people_iri(client_id));
        let page = self.store.get_items(Resource::Documents, &params).await?;

        Ok(decode_members(Resource::Documents, page.members, serde_json::from_value::<Document>)
            .into_iter()
            .map(|doc| entry(types, doc))
            .collect())
    }

    /// Tipos que o cliente ainda pode cadastrar.
    pub async fn client_types(
        &self,
        company: CompanyContext,
        client_id: i64,
    ) -> Result<Vec<DocumentType>, AppError> {
        let client = self.client(client_id).await?;
        let types = self.types(company).await?;
        let documents = self.documents(client_id, &types).await?;
        Ok(available_types(&client, &types, &documents, None))
    }

    async fn client(&self, client_id: i64) -> Result<Client, AppError> {
        let value = self.store.get_item(Resource::People, client_id).await?;
        serde_json::from_value(value).map_err(|e| AppError::InternalServerError(e.into()))
    }

    pub async fn save(
        &self,
        company: CompanyContext,
        client_id: i64,
        editing: Option<i64>,
        form: DocumentForm,
    ) -> Result<TabUpdate<DocumentEntry>, AppError> {
        let value = digits_only(form.value.as_deref().unwrap_or_default());
        let type_id = form.type_id.as_deref().map(str::trim).unwrap_or_default().to_string();
        if value.is_empty() || type_id.is_empty() {
            return Err(AppError::invalid("document", "document_and_type_required"));
        }

        let client = self.client(client_id).await?;
        let types = self.types(company).await?;
        let mut list = LocalList::new(self.documents(client_id, &types).await?);

        let current = match editing {
            Some(id) => Some(
                list.get(id)
                    .cloned()
                    .ok_or_else(|| AppError::NotFound(format!("documents/{id}")))?,
            ),
            None => None,
        };

        if current.is_none() && list.items().iter().any(|d| d.type_id == type_id) {
            let code = type_code(&types, &type_id).unwrap_or_else(|| type_id.clone());
            return Err(AppError::DuplicateDocumentType(code));
        }

        let available = available_types(&client, &types, list.items(), current.as_ref());
        if !available.iter().any(|t| t.iri == type_id) {
            return Err(AppError::invalid("type", "document_type_unavailable"));
        }

        // Valor canônico: só dígitos, no tamanho máximo do tipo
        let document = match types.as_slice().lookup(&type_id) {
            Some(spec) => value.chars().take(spec.max_len).collect(),
            None => value,
        };

        let payload = DocumentPayload {
            id: editing,
            document: document.clone(),
            document_type: type_id.clone(),
            people: people_iri(client_id),
        };
        let _guard = self.in_flight.begin(form_key(Resource::Documents, client_id, editing))?;
        let echoed = self
            .store
            .save(Resource::Documents, serde_json::to_value(&payload).map_err(anyhow::Error::from)?)
            .await?;

        let item = echoed
            .and_then(|v| serde_json::from_value::<Document>(v).ok())
            .map(|doc| entry(&types, doc))
            .unwrap_or_else(|| {
                entry(
                    &types,
                    Document {
                        id: editing.unwrap_or_else(placeholder_id),
                        document,
                        document_type: type_id,
                    },
                )
            });

        list.upsert(editing, item.clone());
        tracing::info!("🪪 Documento {} salvo para o cliente {}", item.id, client_id);

        Ok(TabUpdate { item, items: list.into_vec() })
    }

    pub async fn remove(
        &self,
        company: CompanyContext,
        client_id: i64,
        id: i64,
    ) -> Result<Vec<DocumentEntry>, AppError> {
        let types = self.types(company).await?;
        let mut list = LocalList::new(self.documents(client_id, &types).await?);
        let _guard = self.in_flight.begin(form_key(Resource::Documents, client_id, Some(id)))?;

        self.store.remove(Resource::Documents, id).await?;
        list.remove(id);
        Ok(list.into_vec())
    }
}

fn type_code(types: &[DocumentType], type_id: &str) -> Option<String> {
    types
        .iter()
        .find(|t| t.iri == type_id)
        .map(|t| t.document_type.to_uppercase())
}

fn entry(types: &[DocumentType], doc: Document) -> DocumentEntry {
    DocumentEntry {
        id: doc.id,
        display: mask_with(types, &doc.document, &doc.document_type),
        code: type_code(types, &doc.document_type),
        value: doc.document,
        type_id: doc.document_type,
    }
}

fn people_type_of(t: &DocumentType) -> Option<PeopleType> {
    t.people_type.or_else(|| {
        t.kind().map(|kind| {
            if kind.for_individual() {
                PeopleType::Individual
            } else {
                PeopleType::Company
            }
        })
    })
}

/// Tipos do mesmo `peopleType` do cliente que ainda não têm documento.
/// Na edição, o tipo do documento editado continua disponível.
pub fn available_types(
    client: &Client,
    types: &[DocumentType],
    documents: &[DocumentEntry],
    editing: Option<&DocumentEntry>,
) -> Vec<DocumentType> {
    let people_type = client.people_type.unwrap_or_default();

    types
        .iter()
        .filter(|t| people_type_of(t) == Some(people_type))
        .filter(|t| {
            editing.is_some_and(|e| e.type_id == t.iri)
                || !documents.iter().any(|d| d.type_id == t.iri)
        })
        .cloned()
        .collect()
}

/// Documentos exibidos na aba: RG/CPF para pessoa física, CNPJ/IE/IM para jurídica.
pub fn visible_documents(client: &Client, documents: Vec<DocumentEntry>) -> Vec<DocumentEntry> {
    let individual = client.people_type == Some(PeopleType::Individual);

    documents
        .into_iter()
        .filter(|d| {
            d.code
                .as_deref()
                .and_then(DocumentKind::from_code)
                .is_some_and(|kind| kind.for_individual() == individual)
        })
        .collect()
}
