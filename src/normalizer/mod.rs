// src/normalizer/mod.rs

//! Conversão entre o texto digitado, a forma canônica enviada ao store e a
//! máscara exibida na tela.
//!
//! Tudo aqui é puro e total: nenhuma função falha ou entra em pânico. Entrada
//! malformada vira string vazia ou `None`, e quem chama decide se bloqueia o envio.

pub mod date;
pub mod document;
pub mod phone;

pub use date::{format_date_input, parse_date, to_display, to_iso};
pub use document::{
    apply_document_mask, mask_with, remove_document_mask, DocumentKind, DocumentSpec,
    DocumentTypeLookup,
};
pub use phone::{format_phone, split_phone, validate_phone, PhoneNumber, PhoneParts, DDI_BRAZIL};

/// Remove tudo que não for dígito ASCII, preservando a ordem.
pub fn digits_only(text: &str) -> String {
    text.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Mantém no máximo `max` caracteres. Só é chamado com strings de dígitos ASCII.
pub(crate) fn truncate(digits: &str, max: usize) -> &str {
    &digits[..digits.len().min(max)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digits_only_strips_everything_else() {
        assert_eq!(digits_only("(11) 98765-4321"), "11987654321");
        assert_eq!(digits_only("abc"), "");
        assert_eq!(digits_only(""), "");
    }

    #[test]
    fn digits_only_ignores_non_ascii_digits() {
        // Dígitos arábicos orientais não contam como dígitos do formulário
        assert_eq!(digits_only("١٢3"), "3");
    }

    #[test]
    fn truncate_caps_length() {
        assert_eq!(truncate("123456", 4), "1234");
        assert_eq!(truncate("12", 4), "12");
    }
}
