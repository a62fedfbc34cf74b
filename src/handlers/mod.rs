// src/handlers/mod.rs

pub mod addresses;
pub mod clients;
pub mod contact;
pub mod documents;
pub mod format;
pub mod users;
