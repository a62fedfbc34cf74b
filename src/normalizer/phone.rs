// src/normalizer/phone.rs

use serde::Serialize;

use super::{digits_only, truncate};

/// Código do país fixo para todos os telefones cadastrados.
pub const DDI_BRAZIL: u16 = 55;

const MAX_PHONE_DIGITS: usize = 11;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct PhoneParts {
    pub ddd: String,
    pub subscriber: String,
}

/// Telefone já validado (10 ou 11 dígitos).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhoneNumber {
    pub ddi: u16,
    pub ddd: String,
    pub subscriber: String,
}

impl PhoneNumber {
    /// Aceita qualquer texto digitado; retorna `None` se não sobrar 10 ou 11 dígitos.
    pub fn from_input(text: &str) -> Option<Self> {
        let digits = digits_only(text);
        if !validate_phone(&digits) {
            return None;
        }
        let parts = split_phone(&digits);
        Some(Self {
            ddi: DDI_BRAZIL,
            ddd: parts.ddd,
            subscriber: parts.subscriber,
        })
    }

    pub fn digits(&self) -> String {
        format!("{}{}", self.ddd, self.subscriber)
    }

    pub fn display(&self) -> String {
        format_phone(&self.digits())
    }

    /// DDD e número como inteiros, como a API espera.
    pub fn numeric_parts(&self) -> (u32, u64) {
        // Os dois campos só contêm dígitos e cabem nos tipos, então o parse não falha.
        let ddd = self.ddd.parse().unwrap_or_default();
        let phone = self.subscriber.parse().unwrap_or_default();
        (ddd, phone)
    }
}

/// Máscara progressiva: `(DD`, `(DD) NNNN`, `(DD) NNNN-NNNN`, `(DD) NNNNN-NNNN`.
pub fn format_phone(text: &str) -> String {
    let all = digits_only(text);
    let digits = truncate(&all, MAX_PHONE_DIGITS);

    if digits.is_empty() {
        return String::new();
    }
    if digits.len() <= 2 {
        return format!("({digits}");
    }

    let (ddd, number) = digits.split_at(2);

    match number.len() {
        0..=4 => format!("({ddd}) {number}"),
        5..=8 => {
            let (prefix, suffix) = number.split_at(number.len() - 4);
            format!("({ddd}) {prefix}-{suffix}")
        }
        _ => {
            let (prefix, suffix) = number.split_at(5);
            format!("({ddd}) {prefix}-{suffix}")
        }
    }
}

/// Separa DDD do restante. Menos de dois dígitos devolve partes vazias.
pub fn split_phone(digits: &str) -> PhoneParts {
    let all = digits_only(digits);
    let digits = truncate(&all, MAX_PHONE_DIGITS);
    if digits.len() < 2 {
        return PhoneParts::default();
    }
    let (ddd, subscriber) = digits.split_at(2);
    PhoneParts {
        ddd: ddd.to_string(),
        subscriber: subscriber.to_string(),
    }
}

pub fn validate_phone(digits: &str) -> bool {
    let count = digits_only(digits).len();
    count == 10 || count == 11
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_progressively() {
        assert_eq!(format_phone(""), "");
        assert_eq!(format_phone("1"), "(1");
        assert_eq!(format_phone("11"), "(11");
        assert_eq!(format_phone("119"), "(11) 9");
        assert_eq!(format_phone("119876"), "(11) 9876");
        assert_eq!(format_phone("1198765"), "(11) 9-8765");
        assert_eq!(format_phone("1133334444"), "(11) 3333-4444");
        assert_eq!(format_phone("11987654321"), "(11) 98765-4321");
    }

    #[test]
    fn extra_digits_are_dropped() {
        assert_eq!(format_phone("119876543219999"), "(11) 98765-4321");
    }

    #[test]
    fn formatting_is_idempotent() {
        let inputs = ["", "1", "(11", "11 9", "1198765", "(11) 3333-4444", "11987654321", "abc-12"];
        for input in inputs {
            let once = format_phone(input);
            assert_eq!(format_phone(&once), once, "entrada: {input:?}");
            assert_eq!(once, format_phone(&digits_only(input)));
        }
    }

    #[test]
    fn split_rebuilds_the_digits() {
        for digits in ["1199998888", "11987654321"] {
            let parts = split_phone(digits);
            assert_eq!(format!("{}{}", parts.ddd, parts.subscriber), digits);
        }
        assert_eq!(split_phone("1"), PhoneParts::default());
    }

    #[test]
    fn validates_length() {
        assert!(validate_phone("1199998888"));
        assert!(validate_phone("11999988887"));
        assert!(!validate_phone("119999888"));
        assert!(!validate_phone("119999888877"));
    }

    #[test]
    fn mobile_number_to_payload_parts() {
        let phone = PhoneNumber::from_input("11987654321").unwrap();
        assert_eq!(phone.display(), "(11) 98765-4321");
        assert_eq!(phone.ddd, "11");
        assert_eq!(phone.subscriber, "987654321");
        assert_eq!(phone.ddi, 55);
        assert_eq!(phone.numeric_parts(), (11, 987_654_321));
    }

    #[test]
    fn incomplete_number_is_rejected() {
        assert!(PhoneNumber::from_input("(11) 9876").is_none());
    }
}
