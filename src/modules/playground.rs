//! Contract playground rendering

use alloy::primitives::U256;

use super::Report;
use crate::config::Config;
use crate::core::{CallOutcome, OperationKind, OperationState, Session};
use crate::domain::abi::{ArgumentBinding, FunctionDescriptor};
use crate::infrastructure::abi::{format_result, format_units};
use crate::infrastructure::LoadedContract;

/// List the loaded functions, reads first, each class in ABI order
pub fn functions_report(contract: &LoadedContract) -> Report {
    let functions = &contract.functions;
    let mut report = Report::new(format!("Available Functions ({})", functions.len()))
        .add("contract", contract.address.to_checksum(None));

    for function in functions.reads().chain(functions.writes()) {
        let returns = function
            .returns_hint()
            .map(|ty| format!(" ⇒ {}", ty))
            .unwrap_or_default();
        report = report.add(
            function.name.clone(),
            format!(
                "[{}] ({}){}  {}",
                function.kind.label(),
                function.param_list(),
                returns,
                function.selector_hex()
            ),
        );
    }
    report
}

/// Describe the state of one operation slot
pub fn outcome_report(session: &Session, kind: OperationKind, config: &Config) -> Report {
    let function = session
        .selected_function()
        .map(|f| f.name.clone())
        .unwrap_or_default();

    match (kind, session.slot(kind)) {
        (_, OperationState::Idle) => {
            Report::new(format!("Execute: {}", function)).add("status", "idle")
        }
        (_, OperationState::InFlight) => {
            Report::new(format!("Execute: {}", function)).add("status", "in flight")
        }

        (OperationKind::Simulate, OperationState::Failed(message)) => {
            Report::new("Simulation Result")
                .add("status", "✗ Transaction would fail")
                .add("error", message.clone())
        }
        (_, OperationState::Failed(message)) => Report::new("Error").add("error", message.clone()),

        (_, OperationState::Success(CallOutcome::Read(values))) => {
            Report::new("Result").add(function, format_result(values))
        }

        (_, OperationState::Success(CallOutcome::Simulation(sim))) => {
            let mut report = Report::new("Simulation Result")
                .add("status", "✓ Transaction would succeed")
                .add("gas estimate", format!("{} units", sim.gas_units))
                .add(
                    "gas price",
                    format!("{} Gwei", format_units(U256::from(sim.gas_price), 9)),
                )
                .add(
                    "estimated cost",
                    format!("{} ETH", format_units(sim.total_cost, 18)),
                );
            if !sim.return_values.is_empty() {
                report = report.add("return value", format_result(&sim.return_values));
            }
            report
        }

        (_, OperationState::Success(CallOutcome::Write(write))) => {
            let hash = write.tx_hash.to_string();
            Report::new("Transaction Submitted")
                .add("status", "Transaction submitted successfully!")
                .add("hash", hash.clone())
                .add("explorer", config.tx_url(&hash))
        }
    }
}

/// Bound keys that match no input of `function`
pub fn unknown_parameters(
    function: &FunctionDescriptor,
    binding: &ArgumentBinding,
) -> Vec<String> {
    let keys = function.input_keys();
    binding
        .iter()
        .filter(|(key, _)| !keys.iter().any(|k| k == key))
        .map(|(key, _)| key.to_string())
        .collect()
}

/// Split a `key=value` argument at the first `=`
pub fn parse_binding(arg: &str) -> Result<(String, String), String> {
    let (key, value) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{}'", arg))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing parameter name in '{}'", arg));
    }
    Ok((key.to_string(), value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{SimulationOutcome, WriteOutcome};
    use alloy::primitives::B256;
    use alloy::rpc::types::TransactionRequest;
    use alloy_dyn_abi::DynSolValue;

    const ABI: &str = r#"[
        {"type":"function","name":"transfer","inputs":[{"name":"to","type":"address"},{"name":"amount","type":"uint256"}],"outputs":[{"name":"","type":"bool"}],"stateMutability":"nonpayable"},
        {"type":"function","name":"balanceOf","inputs":[{"name":"account","type":"address"}],"outputs":[{"name":"","type":"uint256"}],"stateMutability":"view"}
    ]"#;

    fn session() -> Session {
        Session::new()
            .edit_form("0xaf88d065e77c8cC2239327C5EDb3A432268e5831", ABI)
            .load_contract()
    }

    #[test]
    fn test_functions_report_lists_reads_first() {
        let session = session();
        let report = functions_report(session.contract.as_ref().unwrap());
        assert_eq!(report.title, "Available Functions (2)");
        assert_eq!(report.content[1].0, "balanceOf");
        assert_eq!(
            report.get("balanceOf"),
            Some("[read] (address account) ⇒ uint256  0x70a08231")
        );
        assert_eq!(
            report.get("transfer"),
            Some("[write] (address to, uint256 amount) ⇒ bool  0xa9059cbb")
        );
    }

    #[test]
    fn test_simulation_report_units() {
        let session = session().select_function("transfer").with_slot(
            OperationKind::Simulate,
            OperationState::Success(CallOutcome::Simulation(SimulationOutcome {
                return_values: vec![DynSolValue::Bool(true)],
                gas_units: 50_000,
                gas_price: 10_000_000,
                total_cost: U256::from(500_000_000_000u64),
                request: TransactionRequest::default(),
            })),
        );
        let report = outcome_report(&session, OperationKind::Simulate, &Config::default());
        assert_eq!(report.get("gas estimate"), Some("50000 units"));
        assert_eq!(report.get("gas price"), Some("0.01 Gwei"));
        assert_eq!(report.get("estimated cost"), Some("0.0000005 ETH"));
        assert_eq!(report.get("return value"), Some("true"));
    }

    #[test]
    fn test_failed_simulation_report() {
        let session = session().with_slot(
            OperationKind::Simulate,
            OperationState::Failed("execution reverted".into()),
        );
        let report = outcome_report(&session, OperationKind::Simulate, &Config::default());
        assert_eq!(report.get("status"), Some("✗ Transaction would fail"));
        assert_eq!(report.get("error"), Some("execution reverted"));
    }

    #[test]
    fn test_write_report_links_explorer() {
        let hash = B256::repeat_byte(0xab);
        let session = session().with_slot(
            OperationKind::Write,
            OperationState::Success(CallOutcome::Write(WriteOutcome { tx_hash: hash })),
        );
        let report = outcome_report(&session, OperationKind::Write, &Config::default());
        assert_eq!(
            report.get("explorer"),
            Some(format!("https://arbiscan.io/tx/{}", hash).as_str())
        );
    }

    #[test]
    fn test_unknown_parameters() {
        let session = session()
            .select_function("transfer")
            .set_param("to", "0x1111111111111111111111111111111111111111")
            .set_param("amout", "5");
        let function = session.selected_function().unwrap();
        assert_eq!(function.input_keys(), vec!["to", "amount"]);
        assert_eq!(unknown_parameters(function, &session.binding), vec!["amout"]);
    }

    #[test]
    fn test_parse_binding() {
        assert_eq!(
            parse_binding("amount=10").unwrap(),
            ("amount".to_string(), "10".to_string())
        );
        assert_eq!(
            parse_binding("data=a=b").unwrap(),
            ("data".to_string(), "a=b".to_string())
        );
        assert!(parse_binding("amount").is_err());
        assert!(parse_binding("=5").is_err());
    }
}
