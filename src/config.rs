// src/config.rs

use std::{env, net::SocketAddr, str::FromStr, sync::Arc, time::Duration};

use anyhow::Context;

use crate::{
    common::i18n::I18nStore,
    services::{
        addresses::AddressService, clients::ClientService, contact::ContactService,
        documents::DocumentService, form::InFlight, users::UserService,
    },
    store::{DataStore, HttpStore, MemoryStore},
};

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    // Sem URL, roda com o store em memória
    pub api_base_url: Option<String>,
    pub api_token: Option<String>,
    pub default_company_id: Option<i64>,
    pub default_page_size: u32,
    pub request_timeout: Duration,
}

// Variável opcional: vazia conta como ausente
fn optional(key: &str) -> Option<String> {
    env::var(key).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn parsed<T>(key: &str) -> anyhow::Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    optional(key)
        .map(|v| v.parse::<T>().with_context(|| format!("{key} inválida: '{v}'")))
        .transpose()
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            bind_addr: parsed("BIND_ADDR")?
                .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 3000))),
            api_base_url: optional("API_BASE_URL"),
            api_token: optional("API_TOKEN"),
            default_company_id: parsed("DEFAULT_COMPANY_ID")?,
            default_page_size: parsed("DEFAULT_PAGE_SIZE")?
                .filter(|n: &u32| *n > 0)
                .unwrap_or(DEFAULT_PAGE_SIZE),
            request_timeout: Duration::from_secs(
                parsed("REQUEST_TIMEOUT_SECS")?.unwrap_or(DEFAULT_TIMEOUT_SECS),
            ),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            api_base_url: None,
            api_token: None,
            default_company_id: None,
            default_page_size: DEFAULT_PAGE_SIZE,
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<dyn DataStore>,
    pub i18n_store: I18nStore,
    pub client_service: ClientService,
    pub contact_service: ContactService,
    pub document_service: DocumentService,
    pub address_service: AddressService,
    pub user_service: UserService,
}

impl AppState {
    pub fn new() -> anyhow::Result<Self> {
        let config = Config::from_env()?;

        let store: Arc<dyn DataStore> = match &config.api_base_url {
            Some(url) => {
                let store = HttpStore::new(
                    url,
                    config.api_token.clone(),
                    config.request_timeout,
                    config.default_company_id,
                )
                .context("Falha ao montar o cliente HTTP da API")?;
                tracing::info!("🌐 Usando a API remota em {}", url);
                Arc::new(store)
            }
            None => {
                tracing::warn!("⚠️ API_BASE_URL não definida, usando o store em memória");
                Arc::new(MemoryStore::new(config.default_company_id))
            }
        };

        Ok(Self::with_store(config, store))
    }

    /// Monta o gráfico de dependências sobre um store já criado.
    pub fn with_store(config: Config, store: Arc<dyn DataStore>) -> Self {
        // Um único registro de envios em andamento, compartilhado pelas abas
        let in_flight = InFlight::default();

        Self {
            client_service: ClientService::new(store.clone(), in_flight.clone(), config.default_page_size),
            contact_service: ContactService::new(store.clone(), in_flight.clone()),
            document_service: DocumentService::new(store.clone(), in_flight.clone()),
            address_service: AddressService::new(store.clone(), in_flight.clone()),
            user_service: UserService::new(store.clone(), in_flight),
            i18n_store: I18nStore::new(),
            config: Arc::new(config),
            store,
        }
    }
}
