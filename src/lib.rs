// src/lib.rs

use std::sync::Arc;

pub mod actions;
pub mod api;
pub mod blockchain;
pub mod config;
pub mod error;
pub mod llm;
pub mod mcp;
pub mod plugin;
pub mod utils;
pub mod validation;

/// Application state shared across all request handlers
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: config::Config,
    /// Model, chain registry and signer handed to every action
    pub runtime: Arc<actions::AgentRuntime>,
    /// The registered action set
    pub plugin: Arc<plugin::Plugin>,
}

impl AppState {
    pub fn new(config: config::Config, runtime: actions::AgentRuntime) -> Self {
        Self {
            config,
            runtime: Arc::new(runtime),
            plugin: Arc::new(plugin::Plugin::uniswap()),
        }
    }
}
