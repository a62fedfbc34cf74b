// src/services/mod.rs

pub mod addresses;
pub mod clients;
pub mod contact;
pub mod documents;
pub mod form;
pub mod users;
