// src/config.rs

use std::collections::HashMap;
use std::env;

use anyhow::{Context, Result};
use secrecy::SecretString;

/// Environment variable that carries the provider URL of each supported chain,
/// keyed by chain id.
pub const PROVIDER_URL_VARS: &[(u64, &str)] = &[
    (1, "EVM_PROVIDER_URL"),
    (43114, "ETHEREUM_PROVIDER_AVALANCHE"),
    (8453, "ETHEREUM_PROVIDER_BASE"),
    (11155111, "ETHEREUM_PROVIDER_SEPOLIA"),
    (84532, "ETHEREUM_PROVIDER_BASE_SEPOLIA"),
];

pub const DEFAULT_MODEL_API_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_SMALL_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_LARGE_MODEL: &str = "gpt-4o";

// All configuration, loaded once at startup from the environment / .env file.
#[derive(Clone, Debug, Default)]
pub struct Config {
    // Server settings
    pub port: u16,

    /// JSON-RPC provider URL per chain id. Chains without an entry stay in the
    /// registry but cannot be queried.
    pub provider_urls: HashMap<u64, String>,

    /// Key used to sign pool-creation transactions.
    pub evm_private_key: Option<SecretString>,

    // Model inference
    pub model_api_url: String,
    pub model_api_key: Option<SecretString>,
    pub small_model: String,
    pub large_model: String,
}

impl Config {
    /// Returns the configured provider URL for a chain.
    pub fn provider_url(&self, chain_id: u64) -> Option<&str> {
        self.provider_urls.get(&chain_id).map(String::as_str)
    }

    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        // Load variables from the .env file into the environment
        dotenvy::dotenv().ok();

        let mut provider_urls = HashMap::new();
        for (chain_id, var) in PROVIDER_URL_VARS {
            if let Some(raw) = env::var(var).ok().filter(|v| !v.trim().is_empty()) {
                url::Url::parse(raw.trim())
                    .with_context(|| format!("{} must be a valid URL", var))?;
                provider_urls.insert(*chain_id, raw.trim().to_string());
            }
        }

        Ok(Config {
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("PORT must be a valid number")?,

            provider_urls,
            evm_private_key: env::var("EVM_PRIVATE_KEY").ok().map(SecretString::new),

            model_api_url: env::var("MODEL_API_URL")
                .unwrap_or_else(|_| DEFAULT_MODEL_API_URL.to_string()),
            model_api_key: env::var("MODEL_API_KEY").ok().map(SecretString::new),
            small_model: env::var("SMALL_MODEL")
                .unwrap_or_else(|_| DEFAULT_SMALL_MODEL.to_string()),
            large_model: env::var("LARGE_MODEL")
                .unwrap_or_else(|_| DEFAULT_LARGE_MODEL.to_string()),
        })
    }
}
