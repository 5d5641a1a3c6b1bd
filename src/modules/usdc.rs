//! USDC balance viewer
//!
//! Reuses the playground pipeline with a fixed one-function ABI, so the
//! balance read goes through the same loader, coercer and chain client as
//! any user-supplied contract.

use alloy::primitives::{Address, U256};
use alloy_dyn_abi::DynSolValue;

use super::Report;
use crate::core::{CallOutcome, OperationKind, OperationState, Orchestrator, Session};
use crate::error::{PlaygroundError, Result};
use crate::infrastructure::abi::format_fixed;

pub const USDC_DECIMALS: u8 = 6;

/// Legacy ERC-20 fragment; `constant: true` classifies it as a read
pub const BALANCE_OF_ABI: &str = r#"[{"constant":true,"inputs":[{"name":"_owner","type":"address"}],"name":"balanceOf","outputs":[{"name":"balance","type":"uint256"}],"type":"function"}]"#;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsdcBalance {
    pub owner: Address,
    /// Base units, 6 decimals
    pub raw: U256,
}

impl UsdcBalance {
    /// Two fractional digits, e.g. `12.35 USDC`
    pub fn display(&self) -> String {
        format!("{} USDC", format_fixed(self.raw, USDC_DECIMALS, 2))
    }
}

/// Read the USDC balance of `owner`
pub async fn fetch_balance(
    orchestrator: &Orchestrator,
    usdc_address: &str,
    owner: Address,
) -> Result<UsdcBalance> {
    let session = Session::new()
        .edit_form(usdc_address, BALANCE_OF_ABI)
        .load_contract()
        .select_function("balanceOf");
    if let Some(err) = session.error {
        return Err(err);
    }

    let session = session.set_param("_owner", &owner.to_string());
    let session = orchestrator.execute(&session, OperationKind::Read).await;

    match &session.read {
        OperationState::Success(CallOutcome::Read(values)) => match values.as_slice() {
            [DynSolValue::Uint(raw, _)] => Ok(UsdcBalance { owner, raw: *raw }),
            _ => Err(PlaygroundError::validation(
                "Unexpected balanceOf return value",
            )),
        },
        OperationState::Failed(message) => Err(PlaygroundError::External(message.clone())),
        _ => Err(PlaygroundError::validation("Balance read did not complete")),
    }
}

/// Shorten an address to `0x1234...abcd`
pub fn truncate_address(address: &Address) -> String {
    let full = address.to_checksum(None);
    format!("{}...{}", &full[..6], &full[full.len() - 4..])
}

pub fn balance_report(balance: &UsdcBalance) -> Report {
    Report::new("USDC Balance")
        .add("account", truncate_address(&balance.owner))
        .add("balance", balance.display())
}

/// Shown when there is no account to read a balance for
pub fn disconnected_report() -> Report {
    Report::new("USDC Balance").add("status", "Connect your wallet to view USDC balance")
}
