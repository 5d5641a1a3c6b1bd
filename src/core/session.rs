//! Session state for one playground user
//!
//! Every transition takes `&self` and returns a new snapshot, so a caller
//! always holds a consistent view and stale state never leaks across a
//! reload.

use alloy::primitives::{Address, B256, U256};
use alloy::rpc::types::TransactionRequest;
use alloy_dyn_abi::DynSolValue;
use tracing::{debug, info};

use crate::domain::abi::{ArgumentBinding, FunctionDescriptor};
use crate::error::PlaygroundError;
use crate::infrastructure::abi::{AbiLoader, LoadedContract};

/// The three executable operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    Read,
    Simulate,
    Write,
}

impl OperationKind {
    pub fn label(self) -> &'static str {
        match self {
            OperationKind::Read => "read",
            OperationKind::Simulate => "simulate",
            OperationKind::Write => "write",
        }
    }
}

/// Successful dry-run of a write function
#[derive(Debug, Clone)]
pub struct SimulationOutcome {
    pub return_values: Vec<DynSolValue>,
    pub gas_units: u64,
    /// Wei per gas unit
    pub gas_price: u128,
    /// `gas_units * gas_price`, in wei
    pub total_cost: U256,
    /// Request the wallet would submit
    pub request: TransactionRequest,
}

/// Accepted transaction submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteOutcome {
    pub tx_hash: B256,
}

/// Result of one successful operation
#[derive(Debug, Clone)]
pub enum CallOutcome {
    Read(Vec<DynSolValue>),
    Simulation(SimulationOutcome),
    Write(WriteOutcome),
}

/// Per-operation state machine: `Idle -> InFlight -> Success | Failed`
#[derive(Debug, Clone, Default)]
pub enum OperationState {
    #[default]
    Idle,
    InFlight,
    Success(CallOutcome),
    Failed(String),
}

impl OperationState {
    pub fn is_idle(&self) -> bool {
        matches!(self, OperationState::Idle)
    }

    pub fn is_in_flight(&self) -> bool {
        matches!(self, OperationState::InFlight)
    }

    pub fn outcome(&self) -> Option<&CallOutcome> {
        match self {
            OperationState::Success(outcome) => Some(outcome),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            OperationState::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// The two free-text inputs, kept verbatim
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields {
    pub contract_address: String,
    pub abi_text: String,
}

/// Complete state of a playground session
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub form: FormFields,
    pub contract: Option<LoadedContract>,
    /// Selector of the selected function
    pub selected: Option<[u8; 4]>,
    pub binding: ArgumentBinding,
    pub account: Option<Address>,
    pub chain_id: Option<u64>,
    pub read: OperationState,
    pub simulate: OperationState,
    pub write: OperationState,
    /// Last load, selection or connection error
    pub error: Option<PlaygroundError>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a session from restored form fields; nothing is validated yet
    pub fn with_form(form: FormFields) -> Self {
        Self {
            form,
            ..Self::default()
        }
    }

    /// Replace the form fields without loading
    pub fn edit_form(&self, contract_address: &str, abi_text: &str) -> Self {
        let mut next = self.clone();
        next.form = FormFields {
            contract_address: contract_address.to_string(),
            abi_text: abi_text.to_string(),
        };
        next
    }

    /// Load the contract described by the form fields
    ///
    /// Contract, selection, bindings, results and errors are all reset first,
    /// whatever the outcome.
    pub fn load_contract(&self) -> Self {
        let mut next = Self {
            form: self.form.clone(),
            account: self.account,
            chain_id: self.chain_id,
            ..Self::default()
        };

        match AbiLoader::load(&next.form.contract_address, &next.form.abi_text) {
            Ok(contract) => {
                info!(
                    address = %contract.address,
                    functions = contract.functions.len(),
                    "contract loaded"
                );
                next.contract = Some(contract);
            }
            Err(err) => {
                debug!(error = %err, "contract load failed");
                next.error = Some(err);
            }
        }
        next
    }

    /// Select a function by name, signature or selector
    ///
    /// Bindings and every operation slot are cleared.
    pub fn select_function(&self, reference: &str) -> Self {
        let mut next = self.clone();
        next.selected = None;
        next.binding.clear();
        next.reset_slots();
        next.error = None;

        let found = match &next.contract {
            Some(contract) => contract.functions.find(reference).map(|f| f.selector),
            None => Err(PlaygroundError::validation("Load a contract first.")),
        };
        match found {
            Ok(selector) => next.selected = Some(selector),
            Err(err) => next.error = Some(err),
        }
        next
    }

    /// Bind a raw value to a parameter of the selected function
    pub fn set_param(&self, key: &str, value: &str) -> Self {
        let mut next = self.clone();
        next.binding.set(key, value);
        next.reset_slots();
        next
    }

    /// Record a connected wallet account
    pub fn with_account(&self, account: Address, chain_id: Option<u64>) -> Self {
        let mut next = self.clone();
        next.account = Some(account);
        next.chain_id = chain_id;
        next
    }

    pub fn selected_function(&self) -> Option<&FunctionDescriptor> {
        let selector = self.selected?;
        self.contract.as_ref()?.functions.lookup(selector)
    }

    pub fn slot(&self, kind: OperationKind) -> &OperationState {
        match kind {
            OperationKind::Read => &self.read,
            OperationKind::Simulate => &self.simulate,
            OperationKind::Write => &self.write,
        }
    }

    /// Replace one operation slot wholesale
    pub fn with_slot(&self, kind: OperationKind, state: OperationState) -> Self {
        let mut next = self.clone();
        match kind {
            OperationKind::Read => next.read = state,
            OperationKind::Simulate => next.simulate = state,
            OperationKind::Write => next.write = state,
        }
        next
    }

    fn reset_slots(&mut self) {
        self.read = OperationState::Idle;
        self.simulate = OperationState::Idle;
        self.write = OperationState::Idle;
    }
}
