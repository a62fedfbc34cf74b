// src/normalizer/document.rs

use serde::{Deserialize, Serialize};

use super::{digits_only, truncate};

/// Metadados de máscara de um tipo de documento.
///
/// No `template`, cada `0` é uma posição de dígito e qualquer outro caractere é
/// separador. Novos tipos entram pela tabela, sem código novo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentSpec {
    pub code: &'static str,
    pub max_len: usize,
    pub template: &'static str,
}

// IE e IM variam por estado/município; usamos o formato genérico
const SPECS: [DocumentSpec; 5] = [
    DocumentSpec { code: "CPF", max_len: 11, template: "000.000.000-00" },
    DocumentSpec { code: "CNPJ", max_len: 14, template: "00.000.000/0000-00" },
    DocumentSpec { code: "RG", max_len: 9, template: "00.000.000-0" },
    DocumentSpec { code: "IE", max_len: 12, template: "000.000.000.000" },
    DocumentSpec { code: "IM", max_len: 9, template: "00.000.000-0" },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DocumentKind {
    Cpf,
    Cnpj,
    Rg,
    Ie,
    Im,
}

impl DocumentKind {
    pub const ALL: [DocumentKind; 5] = [Self::Cpf, Self::Cnpj, Self::Rg, Self::Ie, Self::Im];

    /// Aceita o código em qualquer caixa (`cpf`, `CPF`).
    pub fn from_code(code: &str) -> Option<Self> {
        let code = code.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.spec().code.eq_ignore_ascii_case(code))
    }

    pub fn spec(self) -> DocumentSpec {
        SPECS[self as usize]
    }

    pub fn code(self) -> &'static str {
        self.spec().code
    }

    /// Pessoa física usa RG/CPF; jurídica usa CNPJ/IE/IM.
    pub fn for_individual(self) -> bool {
        matches!(self, Self::Cpf | Self::Rg)
    }
}

/// Resolve o identificador de um tipo (ex.: `/document_types/3`) para sua máscara.
pub trait DocumentTypeLookup {
    fn lookup(&self, type_id: &str) -> Option<DocumentSpec>;
}

impl<F> DocumentTypeLookup for F
where
    F: Fn(&str) -> Option<DocumentSpec>,
{
    fn lookup(&self, type_id: &str) -> Option<DocumentSpec> {
        self(type_id)
    }
}

impl DocumentSpec {
    pub fn apply(&self, text: &str) -> String {
        let all = digits_only(text);
        let digits = truncate(&all, self.max_len);

        let mut out = String::with_capacity(self.template.len());
        let mut rest = digits.chars().peekable();
        for slot in self.template.chars() {
            // Separador final só aparece se houver dígito para vir depois
            let Some(&next) = rest.peek() else { break };
            if slot == '0' {
                out.push(next);
                rest.next();
            } else {
                out.push(slot);
            }
        }
        out
    }
}

/// Aplica a máscara do tipo `code`. Tipo desconhecido devolve a entrada intacta.
pub fn apply_document_mask(text: &str, code: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    match DocumentKind::from_code(code) {
        Some(kind) => kind.spec().apply(text),
        None => text.to_string(),
    }
}

/// Mesmo comportamento de `apply_document_mask`, mas resolvendo o tipo pelo lookup injetado.
pub fn mask_with<L>(lookup: &L, text: &str, type_id: &str) -> String
where
    L: DocumentTypeLookup + ?Sized,
{
    if text.is_empty() {
        return String::new();
    }
    match lookup.lookup(type_id) {
        Some(spec) => spec.apply(text),
        None => text.to_string(),
    }
}

pub fn remove_document_mask(text: &str) -> String {
    digits_only(text)
}
