//! Argument coercion - turns user-entered strings into typed ABI values

use std::str::FromStr;

use alloy::primitives::{Address, FixedBytes, Sign, I256, U256};
use alloy_dyn_abi::DynSolValue;
use serde_json::Value;

use crate::domain::abi::{ArgumentBinding, FunctionDescriptor, ParamSpec, ParamType};
use crate::error::{PlaygroundError, Result};

/// Coerce every input of `function` from the bound values, in declared order
///
/// Stops at the first parameter that is missing or cannot be coerced.
pub fn coerce_arguments(
    function: &FunctionDescriptor,
    binding: &ArgumentBinding,
) -> Result<Vec<DynSolValue>> {
    function
        .inputs
        .iter()
        .enumerate()
        .map(|(index, param)| {
            let key = param.key(index);
            let raw = binding.non_empty(&key).ok_or_else(|| {
                PlaygroundError::validation(format!("Missing value for parameter: {}", key))
            })?;
            coerce(param, &key, raw)
        })
        .collect()
}

/// Coerce a single raw value for `param`
pub fn coerce(param: &ParamSpec, key: &str, raw: &str) -> Result<DynSolValue> {
    if param.ty.is_composite() {
        let normalized = quote_numbers(&raw.replace('\'', "\""));
        let json: Value = serde_json::from_str(&normalized).map_err(|e| {
            PlaygroundError::parse(format!("Invalid JSON for parameter {}: {}", key, e))
        })?;
        return from_json(&param.ty, &json, key);
    }
    parse_text(&param.ty, raw, key)
}

/// Parse a primitive value from text
fn parse_text(ty: &ParamType, text: &str, key: &str) -> Result<DynSolValue> {
    match ty {
        ParamType::Address => parse_address(text, key).map(DynSolValue::Address),

        // Only a case-insensitive "true" is true; nothing is rejected
        ParamType::Bool => Ok(DynSolValue::Bool(text.eq_ignore_ascii_case("true"))),

        ParamType::Int(bits) => {
            let value = parse_int(text.trim(), key)?;
            if !int_fits(value, *bits) {
                return Err(out_of_range(key, "int", *bits));
            }
            Ok(DynSolValue::Int(value, *bits))
        }

        ParamType::Uint(bits) => {
            let value = parse_uint(text.trim(), key)?;
            if *bits < 256 && value.bit_len() > *bits {
                return Err(out_of_range(key, "uint", *bits));
            }
            Ok(DynSolValue::Uint(value, *bits))
        }

        ParamType::Bytes => parse_hex(text, key).map(DynSolValue::Bytes),

        ParamType::FixedBytes(size) => {
            let bytes = parse_hex(text, key)?;
            if bytes.len() != *size {
                return Err(PlaygroundError::validation(format!(
                    "Invalid bytes{} for parameter {}: expected {} bytes, got {}",
                    size,
                    key,
                    size,
                    bytes.len()
                )));
            }
            Ok(DynSolValue::FixedBytes(
                FixedBytes::<32>::right_padding_from(&bytes),
                *size,
            ))
        }

        ParamType::String => Ok(DynSolValue::String(text.to_string())),

        ParamType::Array(_) | ParamType::FixedArray(..) | ParamType::Tuple(_) => {
            Err(PlaygroundError::validation(format!(
                "Parameter {} expects a JSON value",
                key
            )))
        }
    }
}

/// Convert a JSON value into the declared type
fn from_json(ty: &ParamType, value: &Value, key: &str) -> Result<DynSolValue> {
    match (ty, value) {
        (ParamType::Array(inner), Value::Array(items)) => items
            .iter()
            .map(|item| from_json(inner, item, key))
            .collect::<Result<Vec<_>>>()
            .map(DynSolValue::Array),

        (ParamType::FixedArray(inner, size), Value::Array(items)) => {
            if items.len() != *size {
                return Err(PlaygroundError::validation(format!(
                    "Fixed array size mismatch for parameter {}: expected {} elements, got {}",
                    key,
                    size,
                    items.len()
                )));
            }
            items
                .iter()
                .map(|item| from_json(inner, item, key))
                .collect::<Result<Vec<_>>>()
                .map(DynSolValue::FixedArray)
        }

        (ParamType::Tuple(fields), Value::Array(items)) => {
            if items.len() != fields.len() {
                return Err(PlaygroundError::validation(format!(
                    "Tuple size mismatch for parameter {}: expected {} elements, got {}",
                    key,
                    fields.len(),
                    items.len()
                )));
            }
            fields
                .iter()
                .zip(items)
                .map(|(field, item)| from_json(&field.ty, item, key))
                .collect::<Result<Vec<_>>>()
                .map(DynSolValue::Tuple)
        }

        (ParamType::Tuple(fields), Value::Object(map)) => fields
            .iter()
            .map(|field| {
                let item = map.get(&field.name).ok_or_else(|| {
                    PlaygroundError::validation(format!(
                        "Missing tuple field '{}' in parameter {}",
                        field.name, key
                    ))
                })?;
                from_json(&field.ty, item, key)
            })
            .collect::<Result<Vec<_>>>()
            .map(DynSolValue::Tuple),

        (ParamType::Bool, Value::Bool(b)) => Ok(DynSolValue::Bool(*b)),
        (ParamType::Bool, Value::String(s)) => parse_text(ty, s, key),
        (ParamType::Bool, _) => Ok(DynSolValue::Bool(false)),

        (ty, Value::String(s)) if !ty.is_composite() => parse_text(ty, s, key),

        _ => Err(PlaygroundError::validation(format!(
            "Value {} does not match type {:?} in parameter {}",
            value, ty, key
        ))),
    }
}

/// Wrap every bare JSON number in quotes so its digits reach the integer
/// parser intact instead of passing through `f64`
fn quote_numbers(json: &str) -> String {
    let mut out = String::with_capacity(json.len() + 8);
    let mut chars = json.chars().peekable();
    let mut in_string = false;
    let mut escaped = false;

    while let Some(c) = chars.next() {
        if in_string {
            out.push(c);
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => {
                in_string = true;
                out.push(c);
            }
            '-' | '0'..='9' => {
                out.push('"');
                out.push(c);
                while let Some(&next) = chars.peek() {
                    if !matches!(next, '0'..='9' | '.' | 'e' | 'E' | '+' | '-') {
                        break;
                    }
                    out.push(next);
                    chars.next();
                }
                out.push('"');
            }
            _ => out.push(c),
        }
    }
    out
}

/// Parse an address without enforcing the `0x` prefix or a checksum
fn parse_address(text: &str, key: &str) -> Result<Address> {
    Address::from_str(text.trim()).map_err(|e| {
        PlaygroundError::validation(format!("Invalid address for parameter {}: {}", key, e))
    })
}

fn parse_uint(text: &str, key: &str) -> Result<U256> {
    let invalid = |e: String| {
        PlaygroundError::validation(format!("Invalid integer for parameter {}: {}", key, e))
    };

    if let Some(hex_str) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        let bytes = parse_hex_to_bytes(hex_str, 32).map_err(invalid)?;
        return Ok(U256::from_be_slice(&bytes));
    }
    if text.is_empty() || !text.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid(format!("'{}' is not a number", text)));
    }
    U256::from_str_radix(text, 10).map_err(|e| invalid(e.to_string()))
}

fn parse_int(text: &str, key: &str) -> Result<I256> {
    let (negative, magnitude) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    let magnitude = parse_uint(magnitude, key)?;
    let out_of_bounds = || {
        PlaygroundError::validation(format!("Integer out of range for parameter {}", key))
    };

    let sign = if negative { Sign::Negative } else { Sign::Positive };
    I256::checked_from_sign_and_abs(sign, magnitude).ok_or_else(out_of_bounds)
}

/// Whether `value` fits in a two's complement integer of `bits` width
fn int_fits(value: I256, bits: usize) -> bool {
    if bits >= 256 {
        return true;
    }
    let bound = U256::from(1u8) << (bits - 1);
    let magnitude = value.unsigned_abs();
    if value.is_negative() {
        magnitude <= bound
    } else {
        magnitude < bound
    }
}

fn parse_hex(text: &str, key: &str) -> Result<Vec<u8>> {
    let text = text.trim();
    let hex_str = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text);
    hex::decode(hex_str).map_err(|e| {
        PlaygroundError::validation(format!("Invalid hex for parameter {}: {}", key, e))
    })
}

/// Parse hex string to bytes with left padding
fn parse_hex_to_bytes(hex_str: &str, expected_size: usize) -> std::result::Result<Vec<u8>, String> {
    let padded_hex = if hex_str.len() % 2 == 1 {
        format!("0{}", hex_str)
    } else {
        hex_str.to_string()
    };
    let bytes = hex::decode(&padded_hex).map_err(|e| format!("Invalid hex: {}", e))?;

    if bytes.len() > expected_size {
        return Err(format!(
            "Hex value too large: expected max {} bytes, got {}",
            expected_size,
            bytes.len()
        ));
    }

    let mut padded = vec![0u8; expected_size];
    padded[expected_size - bytes.len()..].copy_from_slice(&bytes);
    Ok(padded)
}

fn out_of_range(key: &str, prefix: &str, bits: usize) -> PlaygroundError {
    PlaygroundError::validation(format!(
        "Value for parameter {} does not fit in {}{}",
        key, prefix, bits
    ))
}
