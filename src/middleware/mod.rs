pub mod company;
pub mod i18n;
