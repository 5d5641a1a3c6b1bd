//! ABI loader - validates user input and builds the function table

use std::str::FromStr;

use alloy::primitives::Address;
use alloy_json_abi::{Function, Param, StateMutability};
use alloy_primitives::keccak256;
use serde_json::Value;
use tracing::debug;

use crate::domain::abi::{FunctionDescriptor, FunctionKind, FunctionTable, ParamSpec, ParamType};
use crate::error::{PlaygroundError, Result};

/// A contract whose ABI loaded successfully
#[derive(Debug, Clone)]
pub struct LoadedContract {
    pub address: Address,
    pub functions: FunctionTable,
}

/// ABI loader
pub struct AbiLoader;

impl AbiLoader {
    /// Validate the contract address and ABI text and classify every function
    ///
    /// The address is checked first so a bad address never reaches the JSON
    /// parser.
    pub fn load(address: &str, abi_text: &str) -> Result<LoadedContract> {
        let address = Self::validate_address(address)?;
        let entries = Self::function_entries(abi_text)?;

        let mut functions = FunctionTable::new();
        for entry in &entries {
            let descriptor = Self::describe(entry)?;
            if !functions.insert(descriptor) {
                debug!("dropping duplicate selector in ABI");
            }
        }

        debug!(
            reads = functions.reads().count(),
            writes = functions.writes().count(),
            "classified ABI functions"
        );

        Ok(LoadedContract { address, functions })
    }

    /// Check the address against `0x` followed by exactly 40 hex digits
    pub fn validate_address(address: &str) -> Result<Address> {
        let Some(payload) = address.strip_prefix("0x") else {
            return Err(PlaygroundError::Format);
        };
        if payload.len() != 40 || !payload.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(PlaygroundError::Format);
        }
        Address::from_str(address).map_err(|_| PlaygroundError::Format)
    }

    /// Parse the ABI text and keep only `function` entries
    fn function_entries(abi_text: &str) -> Result<Vec<Value>> {
        let invalid = || PlaygroundError::parse("Invalid ABI JSON. Please provide a valid JSON array.");

        let value: Value = serde_json::from_str(abi_text).map_err(|_| invalid())?;
        let Value::Array(items) = value else {
            return Err(invalid());
        };

        let functions: Vec<Value> = items
            .into_iter()
            .filter(|item| item.get("type").and_then(Value::as_str) == Some("function"))
            .collect();

        if functions.is_empty() {
            return Err(PlaygroundError::EmptyAbi);
        }
        Ok(functions)
    }

    /// Build a descriptor from one raw `function` entry
    fn describe(entry: &Value) -> Result<FunctionDescriptor> {
        let name = entry
            .get("name")
            .and_then(Value::as_str)
            .filter(|name| !name.is_empty())
            .ok_or_else(|| PlaygroundError::parse("Function entry without a name"))?
            .to_string();

        let inputs = Self::params(entry, "inputs", &name)?;
        let outputs = Self::params(entry, "outputs", &name)?;
        let kind = FunctionKind::classify(entry);

        let fragment = Function {
            name: name.clone(),
            inputs: inputs.clone(),
            outputs: outputs.clone(),
            state_mutability: Self::state_mutability(entry, kind),
        };
        let signature = fragment.signature();
        let selector = Self::compute_selector(&signature);

        Ok(FunctionDescriptor {
            name: name.clone(),
            kind,
            inputs: Self::specs(&inputs, &Self::raw_tags(entry, "inputs"), &name)?,
            outputs: Self::specs(&outputs, &Self::raw_tags(entry, "outputs"), &name)?,
            selector,
            signature,
            fragment,
        })
    }

    fn params(entry: &Value, field: &str, function: &str) -> Result<Vec<Param>> {
        match entry.get(field) {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(value) => {
                let mut value = value.clone();
                strip_payable(&mut value);
                serde_json::from_value(value).map_err(|e| {
                    PlaygroundError::parse(format!(
                        "Invalid {} of function {}: {}",
                        field, function, e
                    ))
                })
            }
        }
    }

    /// Type tags exactly as written in the ABI
    fn raw_tags(entry: &Value, field: &str) -> Vec<String> {
        entry
            .get(field)
            .and_then(Value::as_array)
            .map(|params| {
                params
                    .iter()
                    .map(|p| p.get("type").and_then(Value::as_str).unwrap_or_default().to_string())
                    .collect()
            })
            .unwrap_or_default()
    }

    fn specs(params: &[Param], raw_tags: &[String], function: &str) -> Result<Vec<ParamSpec>> {
        params
            .iter()
            .enumerate()
            .map(|(i, param)| {
                let ty = ParamType::from_param(param).map_err(|e| {
                    PlaygroundError::parse(format!("{} in function {}", e, function))
                })?;
                let type_tag = raw_tags
                    .get(i)
                    .filter(|tag| !tag.is_empty())
                    .cloned()
                    .unwrap_or_else(|| param.ty.clone());
                Ok(ParamSpec {
                    name: param.name.clone(),
                    type_tag,
                    ty,
                })
            })
            .collect()
    }

    fn state_mutability(entry: &Value, kind: FunctionKind) -> StateMutability {
        match entry.get("stateMutability").and_then(Value::as_str) {
            Some("pure") => StateMutability::Pure,
            Some("view") => StateMutability::View,
            Some("payable") => StateMutability::Payable,
            Some(_) => StateMutability::NonPayable,
            None if kind == FunctionKind::Read => StateMutability::View,
            None if entry.get("payable").and_then(Value::as_bool) == Some(true) => {
                StateMutability::Payable
            }
            None => StateMutability::NonPayable,
        }
    }

    /// Compute the 4-byte function selector from a signature
    fn compute_selector(signature: &str) -> [u8; 4] {
        let hash = keccak256(signature.as_bytes());
        [hash[0], hash[1], hash[2], hash[3]]
    }
}

/// Rewrite `address payable` to `address` in every `type` field, components included
fn strip_payable(value: &mut Value) {
    match value {
        Value::Array(items) => items.iter_mut().for_each(strip_payable),
        Value::Object(map) => {
            if let Some(Value::String(ty)) = map.get_mut("type") {
                if let Some(rest) = ty.strip_prefix("address payable") {
                    *ty = format!("address{}", rest);
                }
            }
            if let Some(components) = map.get_mut("components") {
                strip_payable(components);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const USDC: &str = "0xaf88d065e77c8cC2239327C5EDb3A432268e5831";

    #[test]
    fn test_compute_selector() {
        // transfer(address,uint256) -> 0xa9059cbb
        let selector = AbiLoader::compute_selector("transfer(address,uint256)");
        assert_eq!(selector, [0xa9, 0x05, 0x9c, 0xbb]);

        // approve(address,uint256) -> 0x095ea7b3
        let selector = AbiLoader::compute_selector("approve(address,uint256)");
        assert_eq!(selector, [0x09, 0x5e, 0xa7, 0xb3]);
    }

    #[test]
    fn test_address_rejected_before_json() {
        // The ABI is garbage too; the address error must win
        for address in ["", "0x123", "af88d065e77c8cC2239327C5EDb3A432268e5831", "0Xaf88d065e77c8cC2239327C5EDb3A432268e5831", "0xzf88d065e77c8cC2239327C5EDb3A432268e5831", " 0xaf88d065e77c8cC2239327C5EDb3A432268e5831"] {
            assert_eq!(
                AbiLoader::load(address, "not json").unwrap_err(),
                PlaygroundError::Format,
                "{address:?}"
            );
        }
    }

    #[test]
    fn test_non_array_json_is_parse_error() {
        for abi in ["{}", "42", "\"abi\"", "null", "[", ""] {
            assert!(
                matches!(AbiLoader::load(USDC, abi), Err(PlaygroundError::Parse(_))),
                "{abi:?}"
            );
        }
    }

    #[test]
    fn test_no_functions_is_empty_abi() {
        let abi = r#"[{"type":"event","name":"Transfer","inputs":[]},{"type":"constructor","inputs":[]}]"#;
        assert_eq!(AbiLoader::load(USDC, abi).unwrap_err(), PlaygroundError::EmptyAbi);
        assert_eq!(AbiLoader::load(USDC, "[]").unwrap_err(), PlaygroundError::EmptyAbi);
    }

    #[test]
    fn test_load_and_classify() {
        let abi = r#"[
            {"type":"function","name":"transfer","inputs":[{"name":"to","type":"address"},{"name":"amount","type":"uint256"}],"outputs":[{"name":"","type":"bool"}],"stateMutability":"nonpayable"},
            {"type":"event","name":"Transfer","inputs":[]},
            {"type":"function","name":"balanceOf","inputs":[{"name":"account","type":"address"}],"outputs":[{"name":"","type":"uint256"}],"stateMutability":"view"},
            {"type":"function","name":"decimals","constant":true,"inputs":[],"outputs":[{"name":"","type":"uint8"}]}
        ]"#;
        let contract = AbiLoader::load(USDC, abi).unwrap();

        assert_eq!(contract.functions.len(), 3);
        let reads: Vec<_> = contract.functions.reads().map(|f| f.name.as_str()).collect();
        let writes: Vec<_> = contract.functions.writes().map(|f| f.name.as_str()).collect();
        assert_eq!(reads, vec!["balanceOf", "decimals"]);
        assert_eq!(writes, vec!["transfer"]);

        let transfer = contract.functions.lookup_hex("0xa9059cbb").unwrap();
        assert_eq!(transfer.signature, "transfer(address,uint256)");
        assert_eq!(transfer.inputs[1].ty, ParamType::Uint(256));
        assert_eq!(transfer.returns_hint(), Some("bool"));
    }

    #[test]
    fn test_identical_signatures_classified_independently() {
        let abi = r#"[
            {"type":"function","name":"peek","inputs":[],"outputs":[],"stateMutability":"view"},
            {"type":"function","name":"poke","inputs":[],"outputs":[],"stateMutability":"nonpayable"}
        ]"#;
        let contract = AbiLoader::load(USDC, abi).unwrap();
        assert_eq!(contract.functions.find("peek").unwrap().kind, FunctionKind::Read);
        assert_eq!(contract.functions.find("poke").unwrap().kind, FunctionKind::Write);
    }

    #[test]
    fn test_tuple_signature() {
        let abi = r#"[{"type":"function","name":"submit","stateMutability":"nonpayable","inputs":[
            {"name":"order","type":"tuple","components":[{"name":"maker","type":"address"},{"name":"amount","type":"uint256"}]},
            {"name":"tags","type":"string[]"}
        ],"outputs":[]}]"#;
        let contract = AbiLoader::load(USDC, abi).unwrap();
        let submit = contract.functions.find("submit").unwrap();
        assert_eq!(submit.signature, "submit((address,uint256),string[])");
        assert!(submit.inputs[0].ty.is_composite());
    }

    #[test]
    fn test_address_payable_loads_and_coerces() {
        let abi = r#"[{"type":"function","name":"pay","stateMutability":"payable","inputs":[
            {"name":"to","type":"address payable"},
            {"name":"split","type":"tuple","components":[{"name":"dest","type":"address payable"},{"name":"bps","type":"uint16"}]},
            {"name":"extra","type":"address payable[]"}
        ],"outputs":[]}]"#;
        let contract = AbiLoader::load(USDC, abi).unwrap();
        let pay = contract.functions.find("pay").unwrap();

        assert_eq!(pay.signature, "pay(address,(address,uint16),address[])");
        assert_eq!(pay.inputs[0].type_tag, "address payable");
        assert_eq!(pay.inputs[0].ty, ParamType::Address);
        assert_eq!(pay.inputs[2].type_tag, "address payable[]");

        let value = crate::infrastructure::abi::coerce(&pay.inputs[0], "to", USDC).unwrap();
        assert_eq!(
            value,
            alloy_dyn_abi::DynSolValue::Address(Address::from_str(USDC).unwrap())
        );
    }

    #[test]
    fn test_unsupported_type_rejected() {
        let abi = r#"[{"type":"function","name":"hook","inputs":[{"name":"cb","type":"function"}],"outputs":[],"stateMutability":"nonpayable"}]"#;
        let err = AbiLoader::load(USDC, abi).unwrap_err();
        assert!(matches!(err, PlaygroundError::Parse(msg) if msg.contains("hook")));
    }
}
