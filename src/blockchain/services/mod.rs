// src/blockchain/services/mod.rs

pub mod erc20;
pub mod pool_manager;
pub mod position_manager;
pub mod state_view;
