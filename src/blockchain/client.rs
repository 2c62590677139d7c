//! Contract client factory.
//!
//! Builds JSON-RPC providers for a [`ChainEntry`] and binds them to a contract
//! address and ABI. Transport, retries and JSON-RPC error mapping are left to
//! `ethers`.

use std::str::FromStr;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use ethers_core::abi::{Abi, Token};
use ethers_core::types::{Address, TransactionRequest, TxHash, U256};
use ethers_providers::{Http, Middleware, Provider};
use ethers_signers::{LocalWallet, Signer};
use ethers::middleware::SignerMiddleware;
use secrecy::{ExposeSecret, SecretString};

use super::registry::ChainEntry;

const UINT24_MAX: u32 = (1 << 24) - 1;

pub type ReadOnlyClient = Provider<Http>;
pub type SigningClient = SignerMiddleware<Provider<Http>, LocalWallet>;

/// Create a provider for the given RPC URL
pub fn create_provider(rpc_url: &str) -> Result<Provider<Http>> {
    Provider::<Http>::try_from(rpc_url)
        .map_err(|e| anyhow!("Failed to create provider: {}", e))
}

/// Read-only client bound to the chain's provider URL.
pub fn build_client(chain: &ChainEntry) -> Result<Arc<ReadOnlyClient>> {
    let url = chain
        .provider_url
        .as_deref()
        .ok_or_else(|| anyhow!("No provider URL configured for {}", chain.name))?;
    Ok(Arc::new(create_provider(url)?))
}

/// Client that signs transactions with `private_key` for the chain.
pub fn build_signing_client(
    chain: &ChainEntry,
    private_key: &SecretString,
) -> Result<Arc<SigningClient>> {
    let url = chain
        .provider_url
        .as_deref()
        .ok_or_else(|| anyhow!("No provider URL configured for {}", chain.name))?;
    let wallet = LocalWallet::from_str(private_key.expose_secret().trim())
        .map_err(|e| anyhow!("Invalid private key: {}", e))?
        .with_chain_id(chain.chain_id);
    Ok(Arc::new(SignerMiddleware::new(create_provider(url)?, wallet)))
}

/// A contract address and ABI bound to a client.
#[derive(Debug, Clone)]
pub struct ContractHandle<M> {
    address: Address,
    abi: Abi,
    client: Arc<M>,
}

/// Binds `address` and `abi` to `client`.
pub fn bind_contract<M: Middleware>(address: Address, abi: Abi, client: Arc<M>) -> ContractHandle<M> {
    ContractHandle { address, abi, client }
}

impl<M: Middleware> ContractHandle<M> {
    fn encode(&self, method: &str, args: &[Token]) -> Result<Vec<u8>> {
        let function = self
            .abi
            .function(method)
            .with_context(|| format!("function {} not found in ABI", method))?;
        function
            .encode_input(args)
            .with_context(|| format!("failed to encode arguments for {}", method))
    }

    /// `eth_call` of a view method; returns the decoded outputs.
    pub async fn read(&self, method: &str, args: &[Token]) -> Result<Vec<Token>> {
        let data = self.encode(method, args)?;
        let tx = TransactionRequest::new().to(self.address).data(data);
        tracing::debug!("eth_call {} on {:?}", method, self.address);

        let raw = self
            .client
            .call(&tx.into(), None)
            .await
            .map_err(|e| anyhow!("eth_call {} failed: {}", method, e))?;

        let function = self
            .abi
            .function(method)
            .with_context(|| format!("function {} not found in ABI", method))?;
        function
            .decode_output(&raw)
            .with_context(|| format!("failed to decode {} output", method))
    }

    /// Sends a state-changing call and returns the transaction hash once the
    /// node has accepted it.
    pub async fn write(&self, method: &str, args: &[Token]) -> Result<TxHash> {
        let data = self.encode(method, args)?;
        let tx = TransactionRequest::new()
            .to(self.address)
            .value(U256::zero())
            .data(data);
        tracing::info!("Sending {} to {:?}", method, self.address);

        let pending = self
            .client
            .send_transaction(tx, None)
            .await
            .map_err(|e| anyhow!("{} transaction failed: {}", method, e))?;
        Ok(pending.tx_hash())
    }
}

// --- Token readers shared by the contract services ---

pub fn token_u256(token: &Token) -> Result<U256> {
    match token {
        Token::Uint(v) | Token::Int(v) => Ok(*v),
        other => Err(anyhow!("expected integer, got {:?}", other)),
    }
}

/// A `uint128` output; wider words are rejected rather than truncated.
pub fn token_u128(token: &Token, method: &str) -> Result<u128> {
    let value = token_u256(token)?;
    u128::try_from(value)
        .map_err(|_| anyhow!("{} returned {} which exceeds uint128", method, value))
}

/// A `uint24` output such as a fee.
pub fn token_uint24(token: &Token, method: &str) -> Result<u32> {
    let value = token_u256(token)?;
    u32::try_from(value)
        .ok()
        .filter(|v| *v <= UINT24_MAX)
        .ok_or_else(|| anyhow!("{} returned {} which exceeds uint24", method, value))
}

pub fn token_address(token: &Token) -> Result<Address> {
    match token {
        Token::Address(a) => Ok(*a),
        other => Err(anyhow!("expected address, got {:?}", other)),
    }
}

pub fn token_string(token: &Token) -> Result<String> {
    match token {
        Token::String(s) => Ok(s.clone()),
        other => Err(anyhow!("expected string, got {:?}", other)),
    }
}

/// Output at `index`, or an error naming the method.
pub fn output<'a>(tokens: &'a [Token], index: usize, method: &str) -> Result<&'a Token> {
    tokens
        .get(index)
        .ok_or_else(|| anyhow!("{} returned {} values, expected more", method, tokens.len()))
}
