// src/common/i18n.rs

use std::collections::HashMap;

pub const DEFAULT_LANG: &str = "pt";

// Catálogo de mensagens: código -> texto. `{0}` é substituído pelo argumento.
const PT: &[(&str, &str)] = &[
    ("validation_failed", "Um ou mais campos são inválidos."),
    ("required", "Campo obrigatório."),
    ("invalid_email", "E-mail inválido."),
    ("phone_required", "Telefone com DDD é obrigatório."),
    ("invalid_date", "Data inválida. Use o formato DD/MM/AAAA."),
    ("name_alias_required_individual", "Nome e apelido são obrigatórios."),
    ("name_alias_required_company", "Razão social e nome fantasia são obrigatórios."),
    ("document_and_type_required", "Documento e tipo são obrigatórios."),
    ("document_type_unavailable", "Tipo de documento não disponível para este cliente."),
    ("duplicate_document_type", "Já existe um documento do tipo {0}."),
    ("street_city_required", "Rua e cidade são obrigatórios."),
    ("username_password_required", "Nome de usuário e senha são obrigatórios."),
    ("password_mismatch", "As senhas não coincidem."),
    ("submission_in_progress", "Já existe um envio em andamento para este formulário."),
    ("company_required", "O cabeçalho X-Company-ID é obrigatório."),
    ("invalid_company_header", "Cabeçalho X-Company-ID inválido."),
    ("not_found", "Registro não encontrado."),
    ("store_failure", "Falha ao comunicar com o servidor de dados. Tente novamente."),
    ("internal_error", "Ocorreu um erro inesperado."),
];

const EN: &[(&str, &str)] = &[
    ("validation_failed", "One or more fields are invalid."),
    ("required", "This field is required."),
    ("invalid_email", "Invalid e-mail."),
    ("phone_required", "A phone number with area code is required."),
    ("invalid_date", "Invalid date. Use DD/MM/YYYY."),
    ("name_alias_required_individual", "Name and nickname are required."),
    ("name_alias_required_company", "Legal name and trade name are required."),
    ("document_and_type_required", "Document and type are required."),
    ("document_type_unavailable", "Document type not available for this client."),
    ("duplicate_document_type", "A document of type {0} already exists."),
    ("street_city_required", "Street and city are required."),
    ("username_password_required", "Username and password are required."),
    ("password_mismatch", "Passwords do not match."),
    ("submission_in_progress", "A submission for this form is already in progress."),
    ("company_required", "The X-Company-ID header is required."),
    ("invalid_company_header", "Invalid X-Company-ID header."),
    ("not_found", "Record not found."),
    ("store_failure", "Could not reach the data server. Please try again."),
    ("internal_error", "An unexpected error occurred."),
];

#[derive(Debug, Clone)]
pub struct I18nStore {
    catalogs: HashMap<&'static str, HashMap<&'static str, &'static str>>,
}

impl I18nStore {
    pub fn new() -> Self {
        let mut catalogs = HashMap::new();
        catalogs.insert("pt", PT.iter().copied().collect());
        catalogs.insert("en", EN.iter().copied().collect());
        Self { catalogs }
    }

    /// Idioma sem catálogo cai para português; código sem tradução volta como está.
    pub fn translate(&self, lang: &str, code: &str) -> String {
        self.catalogs
            .get(lang)
            .and_then(|catalog| catalog.get(code))
            .or_else(|| self.catalogs.get(DEFAULT_LANG).and_then(|c| c.get(code)))
            .map(|text| text.to_string())
            .unwrap_or_else(|| code.to_string())
    }

    pub fn translate_with(&self, lang: &str, code: &str, arg: &str) -> String {
        self.translate(lang, code).replace("{0}", arg)
    }
}

impl Default for I18nStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falls_back_to_portuguese() {
        let store = I18nStore::new();
        assert_eq!(store.translate("en", "required"), "This field is required.");
        assert_eq!(store.translate("fr", "required"), "Campo obrigatório.");
        assert_eq!(store.translate("en", "unknown_code"), "unknown_code");
    }

    #[test]
    fn catalogs_have_the_same_keys() {
        let pt: Vec<_> = PT.iter().map(|(k, _)| *k).collect();
        let en: Vec<_> = EN.iter().map(|(k, _)| *k).collect();
        assert_eq!(pt, en);
    }

    #[test]
    fn substitutes_argument() {
        let store = I18nStore::new();
        assert_eq!(
            store.translate_with("pt", "duplicate_document_type", "CPF"),
            "Já existe um documento do tipo CPF."
        );
    }
}
