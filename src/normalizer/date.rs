// src/normalizer/date.rs

use chrono::{Datelike, NaiveDate};

use super::{digits_only, truncate};

const MASKED_DATE_LEN: usize = 10;
const MIN_YEAR: i32 = 1900;

/// Aplica `DD/MM/AAAA` enquanto o usuário digita. Não valida o calendário.
pub fn format_date_input(text: &str) -> String {
    let all = digits_only(text);
    let digits = truncate(&all, 8);

    let mut out = String::with_capacity(MASKED_DATE_LEN);
    for (i, c) in digits.chars().enumerate() {
        // A barra só entra quando existe um dígito depois dela
        if i == 2 || i == 4 {
            out.push('/');
        }
        out.push(c);
    }
    out
}

/// Só tenta interpretar quando a máscara está completa (`DD/MM/AAAA`).
pub fn parse_date(formatted: &str) -> Option<NaiveDate> {
    if formatted.len() != MASKED_DATE_LEN {
        return None;
    }

    let mut parts = formatted.split('/');
    let (day, month, year) = match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(d), Some(m), Some(y), None) if d.len() == 2 && m.len() == 2 && y.len() == 4 => {
            (d.parse::<u32>().ok()?, m.parse::<u32>().ok()?, y.parse::<i32>().ok()?)
        }
        _ => return None,
    };

    if !(1..=31).contains(&day) || !(1..=12).contains(&month) || year < MIN_YEAR {
        return None;
    }

    // from_ymd_opt recusa 31/04 e 29/02 fora de ano bissexto
    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    (date.day() == day && date.month() == month && date.year() == year).then_some(date)
}

pub fn to_iso(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn to_display(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masks_while_typing() {
        assert_eq!(format_date_input("3"), "3");
        assert_eq!(format_date_input("31"), "31");
        assert_eq!(format_date_input("311"), "31/1");
        assert_eq!(format_date_input("3112"), "31/12");
        assert_eq!(format_date_input("31122"), "31/12/2");
        assert_eq!(format_date_input("31122024"), "31/12/2024");
    }

    #[test]
    fn reformatting_masked_text_is_stable() {
        assert_eq!(format_date_input("31/12/2024"), "31/12/2024");
        assert_eq!(format_date_input("31/12/20249"), "31/12/2024");
    }

    #[test]
    fn parses_only_complete_dates() {
        assert_eq!(parse_date("31/12/2024"), NaiveDate::from_ymd_opt(2024, 12, 31));
        assert_eq!(parse_date("31/12/202"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn leap_years() {
        assert!(parse_date("29/02/2024").is_some());
        assert!(parse_date("29/02/2023").is_none());
        assert!(parse_date("31/02/2024").is_none());
        assert!(parse_date("31/04/2024").is_none());
    }

    #[test]
    fn rejects_out_of_range_fields() {
        assert!(parse_date("00/01/2000").is_none());
        assert!(parse_date("32/01/2000").is_none());
        assert!(parse_date("10/13/2000").is_none());
        assert!(parse_date("10/00/2000").is_none());
        assert!(parse_date("01/01/1899").is_none());
        assert!(parse_date("01/01/1900").is_some());
    }

    #[test]
    fn rejects_garbage_of_the_right_length() {
        assert!(parse_date("ab/cd/efgh").is_none());
        assert!(parse_date("2024-12-31").is_none());
    }

    #[test]
    fn iso_and_display_forms() {
        let date = NaiveDate::from_ymd_opt(1990, 5, 20).unwrap();
        assert_eq!(to_iso(date), "1990-05-20");
        assert_eq!(to_display(date), "20/05/1990");
        assert_eq!(parse_date(&to_display(date)), Some(date));
    }
}
