// src/docs.rs

use utoipa::OpenApi;

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "client-desk",
        description = "Telas de clientes: listagem, detalhe por abas e cadastro de empresa."
    ),
    paths(
        // --- Clientes ---
        handlers::clients::list_clients,
        handlers::clients::create_client,
        handlers::clients::get_client,

        // --- Contato ---
        handlers::contact::list_phones,
        handlers::contact::create_phone,
        handlers::contact::update_phone,
        handlers::contact::delete_phone,
        handlers::contact::list_emails,
        handlers::contact::create_email,
        handlers::contact::update_email,
        handlers::contact::delete_email,

        // --- Documentos ---
        handlers::clients::list_document_types,
        handlers::clients::list_client_document_types,
        handlers::documents::list_documents,
        handlers::documents::create_document,
        handlers::documents::update_document,
        handlers::documents::delete_document,

        // --- Endereços ---
        handlers::addresses::list_addresses,
        handlers::addresses::create_address,
        handlers::addresses::update_address,
        handlers::addresses::delete_address,

        // --- Usuários ---
        handlers::users::list_users,
        handlers::users::create_user,
        handlers::users::update_user,
        handlers::users::delete_user,

        // --- Formatação ---
        handlers::format::format_field,
    ),
    components(
        schemas(
            models::people::PeopleType,
            models::people::Client,
            models::people::ClientDetail,
            models::people::ClientPage,
            models::people::NewCompanyForm,
            models::contact::PhoneEntry,
            models::contact::PhoneForm,
            models::contact::EmailEntry,
            models::contact::EmailForm,
            models::document::DocumentType,
            models::document::DocumentEntry,
            models::document::DocumentForm,
            models::address::AddressEntry,
            models::address::AddressForm,
            models::user::UserEntry,
            models::user::UserForm,
            models::user::ChangePasswordForm,
            handlers::format::FieldKind,
            handlers::format::FormatRequest,
            handlers::format::FormatResponse,
        )
    ),
    tags(
        (name = "Clientes", description = "Listagem, busca, detalhe e cadastro de empresa"),
        (name = "Contato", description = "Telefones e e-mails do cliente"),
        (name = "Documentos", description = "Documentos com máscara por tipo"),
        (name = "Endereços", description = "Endereços do cliente"),
        (name = "Usuários", description = "Usuários de acesso do cliente"),
        (name = "Formatação", description = "Prévia das máscaras de telefone, data e documento")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_route_is_documented() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/clients",
            "/api/clients/{id}",
            "/api/document-types",
            "/api/clients/{id}/document-types",
            "/api/clients/{id}/phones/{item}",
            "/api/clients/{id}/emails/{item}",
            "/api/clients/{id}/documents/{item}",
            "/api/clients/{id}/addresses/{item}",
            "/api/clients/{id}/users/{item}",
            "/api/format",
        ] {
            assert!(doc.paths.paths.contains_key(path), "rota sem documentação: {path}");
        }

        let schemas = doc.components.expect("components").schemas;
        assert!(schemas.contains_key("PhoneForm"));
        assert!(schemas.contains_key("ClientPage"));
    }
}
