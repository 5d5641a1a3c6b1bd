//! Contracts for the external chain and wallet capabilities
//!
//! The playground never talks to a node directly. Everything that touches
//! the network goes through these two traits so the call sequencing can be
//! exercised against in-memory clients.

use alloy::primitives::{Address, Bytes, B256};
use alloy::rpc::types::TransactionRequest;
use alloy_dyn_abi::DynSolValue;
use anyhow::Result;

use super::abi::FunctionDescriptor;

/// A fully coerced call against one function of one contract
#[derive(Debug, Clone)]
pub struct ContractCall {
    pub to: Address,
    pub function: FunctionDescriptor,
    pub args: Vec<DynSolValue>,
}

impl ContractCall {
    pub fn new(to: Address, function: FunctionDescriptor, args: Vec<DynSolValue>) -> Self {
        Self { to, function, args }
    }

    /// Encoded calldata for this call
    pub fn calldata(&self) -> Result<Bytes> {
        Ok(self.function.encode_input(&self.args)?.into())
    }

    /// Transaction request targeting the contract, optionally sent from `account`
    pub fn request(&self, account: Option<Address>) -> Result<TransactionRequest> {
        let request = TransactionRequest::default()
            .to(self.to)
            .input(self.calldata()?.into());
        Ok(match account {
            Some(from) => request.from(from),
            None => request,
        })
    }
}

/// Result of a dry-run of a state-changing call
#[derive(Debug, Clone)]
pub struct Simulation {
    /// Values the call would return
    pub return_values: Vec<DynSolValue>,
    /// Request that would be submitted
    pub request: TransactionRequest,
}

/// Chain read and simulation capability
#[async_trait::async_trait]
pub trait ChainClient: Send + Sync {
    /// Execute a read-only call and decode its outputs
    async fn read_call(&self, call: &ContractCall) -> Result<Vec<DynSolValue>>;

    /// Dry-run a call as `account`
    async fn simulate_call(&self, call: &ContractCall, account: Address) -> Result<Simulation>;

    /// Estimate gas units for the call as `account`
    async fn estimate_gas(&self, call: &ContractCall, account: Address) -> Result<u64>;

    /// Current network gas price in wei
    async fn gas_price(&self) -> Result<u128>;
}

/// Wallet and transaction submission capability
#[async_trait::async_trait]
pub trait WalletClient: Send + Sync {
    /// Resolve the account controlled by this wallet
    async fn connect(&self) -> Result<Address>;

    /// Chain id the wallet is connected to
    async fn chain_id(&self) -> Result<u64>;

    /// Sign and broadcast the call, returning the transaction hash without
    /// waiting for inclusion
    async fn submit_transaction(&self, call: &ContractCall, account: Address) -> Result<B256>;
}
