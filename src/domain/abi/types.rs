//! Closed representation of the Solidity ABI type grammar

use alloy_dyn_abi::DynSolType;
use alloy_json_abi::Param;

use crate::error::{PlaygroundError, Result};

/// A named component of a tuple type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TupleField {
    /// Component name (may be empty)
    pub name: String,
    pub ty: ParamType,
}

/// Resolved ABI parameter type
///
/// Only the types a user can reasonably enter as text are represented.
/// Anything else (function pointers, fixed-point numbers) is rejected when
/// the ABI is loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamType {
    Address,
    Bool,
    /// Signed integer with its bit width
    Int(usize),
    /// Unsigned integer with its bit width
    Uint(usize),
    /// `bytesN` with its byte length
    FixedBytes(usize),
    Bytes,
    String,
    /// `T[]`
    Array(Box<ParamType>),
    /// `T[k]`
    FixedArray(Box<ParamType>, usize),
    Tuple(Vec<TupleField>),
}

impl ParamType {
    /// Resolve the type of a JSON ABI parameter, including tuple components
    pub fn from_param(param: &Param) -> Result<Self> {
        Self::resolve(&param.ty, &param.components)
    }

    /// Resolve a type tag such as `uint256`, `tuple[]` or `bytes32[4]`
    pub fn resolve(tag: &str, components: &[Param]) -> Result<Self> {
        let tag = tag.trim();

        if let Some(body) = tag.strip_suffix(']') {
            let open = body
                .rfind('[')
                .ok_or_else(|| unsupported(tag))?;
            let inner = Box::new(Self::resolve(&body[..open], components)?);
            let size = &body[open + 1..];
            if size.is_empty() {
                return Ok(ParamType::Array(inner));
            }
            let size = size.parse::<usize>().map_err(|_| unsupported(tag))?;
            return Ok(ParamType::FixedArray(inner, size));
        }

        let ty = match tag {
            "address" | "address payable" => ParamType::Address,
            "bool" => ParamType::Bool,
            "string" => ParamType::String,
            "bytes" => ParamType::Bytes,
            "int" => ParamType::Int(256),
            "uint" => ParamType::Uint(256),
            "tuple" => ParamType::Tuple(
                components
                    .iter()
                    .map(|component| {
                        Ok(TupleField {
                            name: component.name.clone(),
                            ty: Self::from_param(component)?,
                        })
                    })
                    .collect::<Result<Vec<_>>>()?,
            ),
            _ => {
                if let Some(bits) = tag.strip_prefix("uint") {
                    ParamType::Uint(parse_bits(bits).ok_or_else(|| unsupported(tag))?)
                } else if let Some(bits) = tag.strip_prefix("int") {
                    ParamType::Int(parse_bits(bits).ok_or_else(|| unsupported(tag))?)
                } else if let Some(len) = tag.strip_prefix("bytes") {
                    match len.parse::<usize>() {
                        Ok(len) if (1..=32).contains(&len) => ParamType::FixedBytes(len),
                        _ => return Err(unsupported(tag)),
                    }
                } else {
                    return Err(unsupported(tag));
                }
            }
        };

        Ok(ty)
    }

    /// Whether values of this type are entered as JSON
    pub fn is_composite(&self) -> bool {
        matches!(
            self,
            ParamType::Array(_) | ParamType::FixedArray(..) | ParamType::Tuple(_)
        )
    }

    /// Convert to the alloy dynamic type used for encoding and decoding
    pub fn to_sol_type(&self) -> DynSolType {
        match self {
            ParamType::Address => DynSolType::Address,
            ParamType::Bool => DynSolType::Bool,
            ParamType::Int(bits) => DynSolType::Int(*bits),
            ParamType::Uint(bits) => DynSolType::Uint(*bits),
            ParamType::FixedBytes(len) => DynSolType::FixedBytes(*len),
            ParamType::Bytes => DynSolType::Bytes,
            ParamType::String => DynSolType::String,
            ParamType::Array(inner) => DynSolType::Array(Box::new(inner.to_sol_type())),
            ParamType::FixedArray(inner, size) => {
                DynSolType::FixedArray(Box::new(inner.to_sol_type()), *size)
            }
            ParamType::Tuple(fields) => {
                DynSolType::Tuple(fields.iter().map(|f| f.ty.to_sol_type()).collect())
            }
        }
    }
}

fn parse_bits(digits: &str) -> Option<usize> {
    let bits = digits.parse::<usize>().ok()?;
    (bits > 0 && bits <= 256 && bits % 8 == 0).then_some(bits)
}

fn unsupported(tag: &str) -> PlaygroundError {
    PlaygroundError::parse(format!("Unsupported ABI type '{}'", tag))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn component(name: &str, ty: &str) -> Param {
        serde_json::from_value(serde_json::json!({ "name": name, "type": ty })).unwrap()
    }

    #[test]
    fn test_resolve_primitives() {
        assert_eq!(ParamType::resolve("address", &[]).unwrap(), ParamType::Address);
        assert_eq!(ParamType::resolve("address payable", &[]).unwrap(), ParamType::Address);
        assert_eq!(ParamType::resolve("uint", &[]).unwrap(), ParamType::Uint(256));
        assert_eq!(ParamType::resolve("int24", &[]).unwrap(), ParamType::Int(24));
        assert_eq!(ParamType::resolve("bytes32", &[]).unwrap(), ParamType::FixedBytes(32));
        assert_eq!(ParamType::resolve("bytes", &[]).unwrap(), ParamType::Bytes);
    }

    #[test]
    fn test_resolve_nested_arrays() {
        let ty = ParamType::resolve("uint8[2][]", &[]).unwrap();
        assert_eq!(
            ty,
            ParamType::Array(Box::new(ParamType::FixedArray(
                Box::new(ParamType::Uint(8)),
                2
            )))
        );
        assert!(ty.is_composite());
    }

    #[test]
    fn test_resolve_tuple_components() {
        let components = vec![component("to", "address"), component("amount", "uint256")];
        let ty = ParamType::resolve("tuple[]", &components).unwrap();
        let ParamType::Array(inner) = ty else {
            panic!("expected array");
        };
        let ParamType::Tuple(fields) = *inner else {
            panic!("expected tuple");
        };
        assert_eq!(fields[0].name, "to");
        assert_eq!(fields[1].ty, ParamType::Uint(256));
    }

    #[test]
    fn test_reject_unknown_tags() {
        for tag in ["function", "fixed128x18", "uint7", "uint512", "bytes33", "bytes0", "foo"] {
            assert!(
                matches!(ParamType::resolve(tag, &[]), Err(PlaygroundError::Parse(_))),
                "{tag} should be rejected"
            );
        }
    }

    #[test]
    fn test_to_sol_type() {
        let ty = ParamType::resolve("uint256[]", &[]).unwrap();
        assert_eq!(ty.to_sol_type().sol_type_name(), "uint256[]");
    }
}
