//! Supported chains and the Uniswap v4 deployments on each of them.
//!
//! Contract addresses and explorer links are static data; provider URLs are
//! injected from [`Config`] when the registry is built.

use std::str::FromStr;

use anyhow::{Context, Result};
use ethers_core::types::Address;
use serde::Serialize;

use crate::config::Config;

/// Static description of a chain the plugin knows how to talk to.
#[derive(Debug, Clone, Copy)]
pub struct ChainDefinition {
    pub chain_id: u64,
    pub name: &'static str,
    pub native_currency: &'static str,
    pub state_view: &'static str,
    pub position_manager: &'static str,
    pub pool_manager: &'static str,
    pub block_explorer_url: Option<&'static str>,
}

pub const SUPPORTED_CHAINS: &[ChainDefinition] = &[
    ChainDefinition {
        chain_id: 43114,
        name: "Avalanche",
        native_currency: "Avalanche",
        state_view: "0xc3c9e198c735a4b97e3e683f391ccbdd60b69286",
        position_manager: "0xb74b1f14d2754acfcbbe1a221023a5cf50ab8acd",
        pool_manager: "0x06380c0e0912312b5150364b9dc4542ba0dbbc85",
        block_explorer_url: Some("https://snowscan.xyz"),
    },
    ChainDefinition {
        chain_id: 1,
        name: "Ethereum",
        native_currency: "Ether",
        state_view: "0x7ffe42c4a5deea5b0fec41c94c136cf115597227",
        position_manager: "0xbd216513d74c8cf14cf4747e6aaa6420ff64ee9e",
        pool_manager: "0x000000000004444c5dc75cb358380d2e3de08a90",
        block_explorer_url: Some("https://etherscan.io"),
    },
    ChainDefinition {
        chain_id: 8453,
        name: "Base",
        native_currency: "Ether",
        state_view: "0xa3c0c9b65bad0b08107aa264b0f3db444b867a71",
        position_manager: "0x7c5f5a4bbd8fd63184577525326123b519429bdc",
        pool_manager: "0x498581ff718922c3f8e6a244956af099b2652b2b",
        block_explorer_url: Some("https://basescan.org"),
    },
    ChainDefinition {
        chain_id: 11155111,
        name: "Sepolia",
        native_currency: "Sepolia Ether",
        state_view: "0xe1dd9c3fa50edb962e442f60dfbc432e24537e4c",
        position_manager: "0x429ba70129df741b2ca2a85bc3a2a3328e5c09b4",
        pool_manager: "0xe03a1074c86cfedd5c142c4f04f1a1536e203543",
        block_explorer_url: Some("https://sepolia.etherscan.io"),
    },
    ChainDefinition {
        chain_id: 84532,
        name: "Base Sepolia",
        native_currency: "Sepolia Ether",
        state_view: "0x571291b572ed32ce6751a2cb2486ebee8defb9b4",
        position_manager: "0x4b2c77d209d3405f41a037ec6c77f7f5b8e2ca80",
        pool_manager: "0x05e73354cfdd6745c338b50bcfdfa3aa6fa03408",
        block_explorer_url: Some("https://sepolia.basescan.org"),
    },
];

/// A supported chain with its deployments and configured provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainEntry {
    pub chain_id: u64,
    pub name: String,
    pub native_currency: String,
    #[serde(skip_serializing)]
    pub provider_url: Option<String>,
    pub state_view: Address,
    pub position_manager: Address,
    pub pool_manager: Address,
    pub block_explorer_url: Option<String>,
}

impl ChainEntry {
    pub fn from_definition(def: &ChainDefinition, provider_url: Option<String>) -> Result<Self> {
        let parse = |label: &str, raw: &str| {
            Address::from_str(raw)
                .with_context(|| format!("invalid {} address for chain {}", label, def.chain_id))
        };

        Ok(Self {
            chain_id: def.chain_id,
            name: def.name.to_string(),
            native_currency: def.native_currency.to_string(),
            provider_url,
            state_view: parse("state view", def.state_view)?,
            position_manager: parse("position manager", def.position_manager)?,
            pool_manager: parse("pool manager", def.pool_manager)?,
            block_explorer_url: def.block_explorer_url.map(str::to_string),
        })
    }

    /// Explorer link for a transaction, when the chain has an explorer.
    pub fn tx_url(&self, tx_hash: &str) -> Option<String> {
        self.block_explorer_url
            .as_ref()
            .map(|base| format!("{}/tx/{}", base.trim_end_matches('/'), tx_hash))
    }
}

/// Read-only set of chains, built once at startup.
#[derive(Debug, Clone, Default)]
pub struct ChainRegistry {
    chains: Vec<ChainEntry>,
}

impl ChainRegistry {
    pub fn new(chains: Vec<ChainEntry>) -> Self {
        Self { chains }
    }

    /// Builds the registry from the static chain table and the configured
    /// provider URLs.
    pub fn from_config(config: &Config) -> Result<Self> {
        let chains = SUPPORTED_CHAINS
            .iter()
            .map(|def| {
                ChainEntry::from_definition(
                    def,
                    config.provider_url(def.chain_id).map(str::to_string),
                )
            })
            .collect::<Result<Vec<_>>>()?;

        for chain in chains.iter().filter(|c| c.provider_url.is_none()) {
            tracing::warn!("No provider URL configured for {} ({})", chain.name, chain.chain_id);
        }

        Ok(Self { chains })
    }

    /// Returns the entry whose id matches exactly; ambiguous matches count as
    /// no match.
    pub fn resolve(&self, chain_id: u64) -> Option<&ChainEntry> {
        let mut matches = self.chains.iter().filter(|c| c.chain_id == chain_id);
        match (matches.next(), matches.next()) {
            (Some(entry), None) => Some(entry),
            _ => None,
        }
    }

    pub fn chains(&self) -> &[ChainEntry] {
        &self.chains
    }

    /// Chain listing safe to embed in a model prompt: ids and names only.
    pub fn prompt_listing(&self) -> String {
        self.chains
            .iter()
            .map(|c| format!("{} (chainId {})", c.name, c.chain_id))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> ChainRegistry {
        let mut config = Config::default();
        config
            .provider_urls
            .insert(1, "https://mainnet.example.com/secret-key".to_string());
        ChainRegistry::from_config(&config).unwrap()
    }

    #[test]
    fn every_static_chain_parses() {
        assert_eq!(registry().chains().len(), SUPPORTED_CHAINS.len());
    }

    #[test]
    fn resolves_known_chain() {
        let registry = registry();
        let mainnet = registry.resolve(1).unwrap();
        assert_eq!(mainnet.name, "Ethereum");
        assert_eq!(
            mainnet.provider_url.as_deref(),
            Some("https://mainnet.example.com/secret-key")
        );
        assert_eq!(registry.resolve(8453).unwrap().name, "Base");
        assert!(registry.resolve(43114).unwrap().provider_url.is_none());
    }

    #[test]
    fn unknown_chain_does_not_resolve() {
        assert!(registry().resolve(137).is_none());
        assert!(registry().resolve(0).is_none());
    }

    #[test]
    fn duplicate_ids_are_ambiguous() {
        let entry = registry().resolve(1).unwrap().clone();
        let registry = ChainRegistry::new(vec![entry.clone(), entry]);
        assert!(registry.resolve(1).is_none());
    }

    #[test]
    fn prompt_listing_omits_provider_urls() {
        let listing = registry().prompt_listing();
        assert!(listing.contains("Ethereum (chainId 1)"));
        assert!(!listing.contains("secret-key"));
    }

    #[test]
    fn tx_url_joins_explorer_and_hash() {
        let registry = registry();
        assert_eq!(
            registry.resolve(1).unwrap().tx_url("0xabc").as_deref(),
            Some("https://etherscan.io/tx/0xabc")
        );
    }
}
