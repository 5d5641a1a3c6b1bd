//! Call orchestrator - sequences read, simulate and write against the
//! external chain and wallet clients

use alloy::primitives::U256;
use tracing::{debug, info, warn};

use super::session::{
    CallOutcome, OperationKind, OperationState, Session, SimulationOutcome, WriteOutcome,
};
use crate::domain::abi::FunctionKind;
use crate::domain::chain::{ChainClient, ContractCall, WalletClient};
use crate::error::{PlaygroundError, Result};
use crate::infrastructure::abi::coerce_arguments;

/// Network the wallet is expected to be on
#[derive(Debug, Clone)]
pub struct TargetChain {
    pub id: u64,
    pub name: String,
}

/// Drives operations for a session through the external clients
pub struct Orchestrator {
    chain: Box<dyn ChainClient>,
    wallet: Box<dyn WalletClient>,
}

impl Orchestrator {
    pub fn new(chain: Box<dyn ChainClient>, wallet: Box<dyn WalletClient>) -> Self {
        Self { chain, wallet }
    }

    /// Connect the wallet and check it is on `target`
    ///
    /// A wrong network keeps the account connected but records an error.
    pub async fn connect(&self, session: &Session, target: &TargetChain) -> Session {
        let mut next = session.clone();
        next.error = None;

        let account = match self.wallet.connect().await {
            Ok(account) => account,
            Err(err) => {
                warn!(error = %err, "wallet connection failed");
                next.error = Some(PlaygroundError::external(err));
                return next;
            }
        };

        let chain_id = match self.wallet.chain_id().await {
            Ok(chain_id) => chain_id,
            Err(err) => {
                next.error = Some(PlaygroundError::external(err));
                return next.with_account(account, None);
            }
        };

        info!(%account, chain_id, "wallet connected");
        let mut next = next.with_account(account, Some(chain_id));
        if chain_id != target.id {
            next.error = Some(PlaygroundError::validation(format!(
                "Wrong network! Please switch to {} (chain ID: {}). Current chain ID: {}",
                target.name, target.id, chain_id
            )));
        }
        next
    }

    /// Mark `kind` in flight, or `None` if it already is
    pub fn begin(session: &Session, kind: OperationKind) -> Option<Session> {
        if session.slot(kind).is_in_flight() {
            return None;
        }
        Some(session.with_slot(kind, OperationState::InFlight))
    }

    /// Begin and finish one operation, returning only the settled snapshot
    ///
    /// An operation that is already in flight in `session` is not started
    /// again; the snapshot is returned unchanged.
    pub async fn execute(&self, session: &Session, kind: OperationKind) -> Session {
        let Some(in_flight) = Self::begin(session, kind) else {
            warn!(operation = kind.label(), "operation already in flight");
            return session.clone();
        };
        self.finish(&in_flight, kind).await
    }

    /// Run an operation previously marked by [`Orchestrator::begin`] and
    /// settle its slot to `Success` or `Failed`
    pub async fn finish(&self, in_flight: &Session, kind: OperationKind) -> Session {
        let result = match kind {
            OperationKind::Read => self.read(in_flight).await,
            OperationKind::Simulate => self.simulate(in_flight).await,
            OperationKind::Write => self.write(in_flight).await,
        };

        let state = match result {
            Ok(outcome) => {
                debug!(operation = kind.label(), "operation succeeded");
                OperationState::Success(outcome)
            }
            Err(err) => {
                warn!(operation = kind.label(), error = %err, "operation failed");
                OperationState::Failed(err.to_string())
            }
        };
        in_flight.with_slot(kind, state)
    }

    async fn read(&self, session: &Session) -> Result<CallOutcome> {
        let call = prepare_call(session, FunctionKind::Read)?;
        let values = self
            .chain
            .read_call(&call)
            .await
            .map_err(PlaygroundError::external)?;
        Ok(CallOutcome::Read(values))
    }

    /// Dry-run, then gas estimate, then gas price; the first failure wins
    async fn simulate(&self, session: &Session) -> Result<CallOutcome> {
        let account = require_account(session)?;
        let call = prepare_call(session, FunctionKind::Write)?;

        let simulation = self
            .chain
            .simulate_call(&call, account)
            .await
            .map_err(PlaygroundError::external)?;
        let gas_units = self
            .chain
            .estimate_gas(&call, account)
            .await
            .map_err(PlaygroundError::external)?;
        let gas_price = self
            .chain
            .gas_price()
            .await
            .map_err(PlaygroundError::external)?;

        Ok(CallOutcome::Simulation(SimulationOutcome {
            return_values: simulation.return_values,
            gas_units,
            gas_price,
            total_cost: U256::from(gas_units) * U256::from(gas_price),
            request: simulation.request,
        }))
    }

    async fn write(&self, session: &Session) -> Result<CallOutcome> {
        let account = require_account(session)?;
        let call = prepare_call(session, FunctionKind::Write)?;
        let tx_hash = self
            .wallet
            .submit_transaction(&call, account)
            .await
            .map_err(PlaygroundError::external)?;
        Ok(CallOutcome::Write(WriteOutcome { tx_hash }))
    }
}

fn require_account(session: &Session) -> Result<alloy::primitives::Address> {
    session
        .account
        .ok_or_else(|| PlaygroundError::validation("Please connect your wallet first."))
}

/// Resolve the selected function and coerce its arguments
fn prepare_call(session: &Session, expected: FunctionKind) -> Result<ContractCall> {
    let contract = session
        .contract
        .as_ref()
        .ok_or_else(|| PlaygroundError::validation("Load a contract first."))?;
    let function = session
        .selected_function()
        .ok_or_else(|| PlaygroundError::validation("Select a function first."))?;

    if function.kind != expected {
        return Err(PlaygroundError::validation(format!(
            "{} is a {} function",
            function.name,
            function.kind.label()
        )));
    }

    let args = coerce_arguments(function, &session.binding)?;
    Ok(ContractCall::new(contract.address, function.clone(), args))
}
