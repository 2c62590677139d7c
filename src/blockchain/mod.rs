// src/blockchain/mod.rs

pub mod abi;
pub mod client;
pub mod models;
pub mod registry;
pub mod services;

pub use client::{bind_contract, build_client, build_signing_client, ContractHandle};
pub use registry::{ChainEntry, ChainRegistry};
