//! Function descriptors derived from a loaded ABI

use alloy_dyn_abi::{DynSolType, DynSolValue};
use alloy_json_abi::Function;
use anyhow::{bail, Context};
use serde_json::Value;

use super::ParamType;

/// Whether a function can be called without a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionKind {
    Read,
    Write,
}

impl FunctionKind {
    /// Classify a raw ABI entry from its declared mutability
    ///
    /// `view` and `pure` functions, and legacy entries with `constant: true`,
    /// are reads. Everything else mutates state.
    pub fn classify(entry: &Value) -> Self {
        let mutability = entry.get("stateMutability").and_then(Value::as_str);
        let constant = entry
            .get("constant")
            .and_then(Value::as_bool)
            .unwrap_or(false);

        if matches!(mutability, Some("view") | Some("pure")) || constant {
            FunctionKind::Read
        } else {
            FunctionKind::Write
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FunctionKind::Read => "read",
            FunctionKind::Write => "write",
        }
    }
}

/// A function parameter specification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamSpec {
    /// Parameter name (may be empty)
    pub name: String,
    /// Type tag as written in the ABI (e.g. "address", "tuple[]")
    pub type_tag: String,
    /// Resolved type
    pub ty: ParamType,
}

impl ParamSpec {
    /// Key used to bind a user value to this parameter
    pub fn key(&self, index: usize) -> String {
        if self.name.is_empty() {
            format!("param{}", index)
        } else {
            self.name.clone()
        }
    }
}

/// A callable contract function, classified once at load time
#[derive(Debug, Clone)]
pub struct FunctionDescriptor {
    pub name: String,
    pub kind: FunctionKind,
    pub inputs: Vec<ParamSpec>,
    pub outputs: Vec<ParamSpec>,
    /// 4-byte function selector
    pub selector: [u8; 4],
    /// Canonical signature (e.g. "transfer(address,uint256)")
    pub signature: String,
    /// Single-entry ABI fragment handed to the chain clients
    pub fragment: Function,
}

impl FunctionDescriptor {
    /// Get selector as hex string
    pub fn selector_hex(&self) -> String {
        format!("0x{}", hex::encode(self.selector))
    }

    /// Human readable parameter list, e.g. "address to, uint256 amount"
    pub fn param_list(&self) -> String {
        self.inputs
            .iter()
            .map(|p| {
                if p.name.is_empty() {
                    p.type_tag.clone()
                } else {
                    format!("{} {}", p.type_tag, p.name)
                }
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Type of the first return value, if any
    pub fn returns_hint(&self) -> Option<&str> {
        self.outputs.first().map(|p| p.type_tag.as_str())
    }

    /// Binding keys for every input, in declared order
    pub fn input_keys(&self) -> Vec<String> {
        self.inputs
            .iter()
            .enumerate()
            .map(|(i, p)| p.key(i))
            .collect()
    }

    /// Build calldata: selector followed by the ABI-encoded arguments
    pub fn encode_input(&self, args: &[DynSolValue]) -> anyhow::Result<Vec<u8>> {
        if args.len() != self.inputs.len() {
            bail!(
                "Argument count mismatch: expected {} arguments, got {}",
                self.inputs.len(),
                args.len()
            );
        }

        let mut calldata = self.selector.to_vec();
        if !args.is_empty() {
            let tuple_value = DynSolValue::Tuple(args.to_vec());
            calldata.extend_from_slice(&tuple_value.abi_encode_params());
        }
        Ok(calldata)
    }

    /// Decode returned data into one value per declared output
    pub fn decode_output(&self, data: &[u8]) -> anyhow::Result<Vec<DynSolValue>> {
        if self.outputs.is_empty() {
            return Ok(Vec::new());
        }

        let tuple_type =
            DynSolType::Tuple(self.outputs.iter().map(|p| p.ty.to_sol_type()).collect());
        let decoded = tuple_type
            .abi_decode_params(data)
            .with_context(|| format!("Failed to decode return data of {}", self.name))?;

        match decoded {
            DynSolValue::Tuple(values) => Ok(values),
            other => Ok(vec![other]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_classify_mutability() {
        assert_eq!(
            FunctionKind::classify(&json!({ "stateMutability": "view" })),
            FunctionKind::Read
        );
        assert_eq!(
            FunctionKind::classify(&json!({ "stateMutability": "pure" })),
            FunctionKind::Read
        );
        assert_eq!(
            FunctionKind::classify(&json!({ "stateMutability": "payable" })),
            FunctionKind::Write
        );
        assert_eq!(
            FunctionKind::classify(&json!({ "stateMutability": "nonpayable" })),
            FunctionKind::Write
        );
    }

    #[test]
    fn test_classify_legacy_constant() {
        assert_eq!(
            FunctionKind::classify(&json!({ "constant": true })),
            FunctionKind::Read
        );
        assert_eq!(
            FunctionKind::classify(&json!({ "constant": false })),
            FunctionKind::Write
        );
        assert_eq!(FunctionKind::classify(&json!({})), FunctionKind::Write);
    }

    #[test]
    fn test_param_key_fallback() {
        let named = ParamSpec {
            name: "owner".to_string(),
            type_tag: "address".to_string(),
            ty: ParamType::Address,
        };
        let unnamed = ParamSpec {
            name: String::new(),
            type_tag: "uint256".to_string(),
            ty: ParamType::Uint(256),
        };
        assert_eq!(named.key(0), "owner");
        assert_eq!(unnamed.key(1), "param1");
    }

    fn descriptor(abi: &str, name: &str) -> FunctionDescriptor {
        crate::infrastructure::abi::AbiLoader::load(
            "0xaf88d065e77c8cC2239327C5EDb3A432268e5831",
            abi,
        )
        .unwrap()
        .functions
        .find(name)
        .unwrap()
        .clone()
    }

    #[test]
    fn test_decode_multiple_outputs() {
        let quote = descriptor(
            r#"[{"type":"function","name":"quote","inputs":[],"stateMutability":"view","outputs":[
                {"name":"amount","type":"uint256"},
                {"name":"to","type":"address"},
                {"name":"memo","type":"string"}
            ]}]"#,
            "quote",
        );
        let values = vec![
            DynSolValue::Uint(alloy::primitives::U256::from(42u64), 256),
            DynSolValue::Address(alloy::primitives::Address::repeat_byte(0x11)),
            DynSolValue::String("gm".to_string()),
        ];
        let data = DynSolValue::Tuple(values.clone()).abi_encode_params();

        assert_eq!(quote.decode_output(&data).unwrap(), values);
    }

    #[test]
    fn test_decode_truncated_data_fails() {
        let pair = descriptor(
            r#"[{"type":"function","name":"pair","inputs":[],"stateMutability":"view","outputs":[
                {"name":"","type":"uint256"},
                {"name":"","type":"bool"}
            ]}]"#,
            "pair",
        );
        let data = DynSolValue::Tuple(vec![
            DynSolValue::Uint(alloy::primitives::U256::from(7u64), 256),
            DynSolValue::Bool(true),
        ])
        .abi_encode_params();

        let err = pair.decode_output(&data[..data.len() - 1]).unwrap_err();
        assert!(err.to_string().contains("pair"));
        assert!(pair.decode_output(&[]).is_err());
    }

    #[test]
    fn test_no_outputs_decode_to_nothing() {
        let poke = descriptor(
            r#"[{"type":"function","name":"poke","inputs":[],"outputs":[],"stateMutability":"nonpayable"}]"#,
            "poke",
        );
        assert!(poke.decode_output(&[]).unwrap().is_empty());
    }
}
