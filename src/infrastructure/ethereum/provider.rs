//! Chain client backed by an Alloy HTTP provider

use alloy::primitives::Address;
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy_dyn_abi::DynSolValue;
use anyhow::{Context, Result};
use tracing::debug;

use crate::domain::chain::{ChainClient, ContractCall, Simulation};

/// Read, simulation and gas queries over JSON-RPC
pub struct AlloyChainClient {
    provider: DynProvider,
    endpoint: String,
}

impl AlloyChainClient {
    /// Connect to an HTTP JSON-RPC endpoint
    pub fn connect_http(url: &str) -> Result<Self> {
        let rpc_url = url.parse().context("Invalid HTTP URL")?;
        let provider = ProviderBuilder::new().connect_http(rpc_url).erased();
        Ok(Self {
            provider,
            endpoint: url.to_string(),
        })
    }

    /// Get endpoint display name
    pub fn endpoint_name(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait::async_trait]
impl ChainClient for AlloyChainClient {
    async fn read_call(&self, call: &ContractCall) -> Result<Vec<DynSolValue>> {
        debug!(function = %call.function.signature, to = %call.to, "eth_call");
        let request = call.request(None)?;
        let data = self.provider.call(request).await?;
        call.function.decode_output(&data)
    }

    async fn simulate_call(&self, call: &ContractCall, account: Address) -> Result<Simulation> {
        debug!(function = %call.function.signature, %account, "simulating call");
        let request = call.request(Some(account))?;
        let data = self.provider.call(request.clone()).await?;
        Ok(Simulation {
            return_values: call.function.decode_output(&data)?,
            request,
        })
    }

    async fn estimate_gas(&self, call: &ContractCall, account: Address) -> Result<u64> {
        let request = call.request(Some(account))?;
        Ok(self.provider.estimate_gas(request).await?)
    }

    async fn gas_price(&self) -> Result<u128> {
        Ok(self.provider.get_gas_price().await?)
    }
}
