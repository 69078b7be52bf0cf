use crate::infra_http::TransportConfig;
use anyhow::{Result, anyhow};
use config::{Config, ConfigBuilder, Environment, File, builder::DefaultState};
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub api: Api,
    pub auth: Auth,
    pub store: Store,
    pub log: Log,
}

#[derive(Debug, Deserialize)]
pub struct Api {
    pub base_url: String,
    pub timeout_ms: u64,
    pub with_credentials: bool,
}

#[derive(Debug, Deserialize)]
pub struct Auth {
    pub backend: String, // "fake" or "real"
}

#[derive(Debug, Deserialize)]
pub struct Store {
    pub backend: String, // "file", "memory" or "none"
    pub credentials_path: String,
    pub snapshot_path: String,
}

#[derive(Debug, Deserialize)]
pub struct Log {
    pub filter: String,
}

impl Api {
    pub fn transport_config(&self) -> TransportConfig {
        TransportConfig {
            base_url: self.base_url.clone(),
            timeout: Duration::from_millis(self.timeout_ms),
            with_credentials: self.with_credentials,
        }
    }
}

#[cfg(debug_assertions)]
const SETTINGS_PATH: &str = "settings/dev.toml";
#[cfg(not(debug_assertions))]
const SETTINGS_PATH: &str = "settings/release.toml";

const ENV_PREFIX: &str = "AGRICONNECT";
/// Single-variable override for the backend address.
const API_URL_VAR: &str = "AGRICONNECT_API_URL";

pub fn parse_settings(path: Option<&str>) -> Result<Settings> {
    build_settings(path, None, std::env::var(API_URL_VAR).ok())
}

fn defaults() -> Result<ConfigBuilder<DefaultState>> {
    Config::builder()
        .set_default("api.base_url", crate::infra_http::DEFAULT_BASE_URL)?
        .set_default("api.timeout_ms", 10_000)?
        .set_default("api.with_credentials", true)?
        .set_default("auth.backend", "real")?
        .set_default("store.backend", "file")?
        .set_default("store.credentials_path", ".agriconnect/credentials.json")?
        .set_default("store.snapshot_path", ".agriconnect/auth-store.json")?
        .set_default("log.filter", "info")
        .map_err(|e| anyhow!(e))
}

/// `env` replaces the process environment when given.
fn build_settings(
    path: Option<&str>,
    env: Option<config::Map<String, String>>,
    api_url: Option<String>,
) -> Result<Settings> {
    // An explicit path must exist; the default one is optional.
    let file = File::with_name(path.unwrap_or(SETTINGS_PATH)).required(path.is_some());

    let settings: Settings = defaults()?
        .add_source(file)
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .source(env),
        )
        .set_override_option("api.base_url", api_url)
        .map_err(|e| anyhow!(e))?
        .build()
        .map_err(|e| anyhow!(e))?
        .try_deserialize()
        .map_err(|e| anyhow!(e))?;

    Ok(settings)
}
