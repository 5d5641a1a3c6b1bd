//! Result formatting for display

use alloy::primitives::U256;
use alloy_dyn_abi::DynSolValue;
use serde_json::Value;

/// Render the values returned by a call
///
/// A single value is rendered on its own; several values are rendered as a
/// JSON array.
pub fn format_result(values: &[DynSolValue]) -> String {
    match values {
        [] => "(no return value)".to_string(),
        [single] => format_value(single),
        many => pretty_json(&Value::Array(many.iter().map(to_json).collect())),
    }
}

/// Render one value
///
/// Integers are always plain decimal digits. Composite values become
/// indented JSON with integers as decimal strings at every depth.
pub fn format_value(value: &DynSolValue) -> String {
    match value {
        DynSolValue::Int(i, _) => i.to_string(),
        DynSolValue::Uint(u, _) => u.to_string(),
        DynSolValue::Bool(b) => b.to_string(),
        DynSolValue::Address(addr) => addr.to_checksum(None),
        DynSolValue::String(s) => s.clone(),
        DynSolValue::Bytes(bytes) => format!("0x{}", hex::encode(bytes)),
        DynSolValue::FixedBytes(word, size) => {
            format!("0x{}", hex::encode(&word.as_slice()[..(*size).min(32)]))
        }
        DynSolValue::Function(func) => format!("0x{}", hex::encode(func.as_slice())),
        DynSolValue::Array(_) | DynSolValue::FixedArray(_) | DynSolValue::Tuple(_) => {
            pretty_json(&to_json(value))
        }
    }
}

/// JSON view of a value with integers substituted by decimal strings
pub fn to_json(value: &DynSolValue) -> Value {
    match value {
        DynSolValue::Bool(b) => Value::Bool(*b),
        DynSolValue::Array(items) | DynSolValue::FixedArray(items) | DynSolValue::Tuple(items) => {
            Value::Array(items.iter().map(to_json).collect())
        }
        other => Value::String(format_value(other)),
    }
}

/// Exact decimal rendering of `value` scaled down by `decimals`
///
/// Trailing zeros of the fraction are dropped: `1500000` with 6 decimals is `1.5`.
pub fn format_units(value: U256, decimals: u8) -> String {
    if decimals == 0 {
        return value.to_string();
    }

    let divisor = U256::from(10u64).pow(U256::from(decimals));
    let whole = value / divisor;
    let frac = value % divisor;

    if frac.is_zero() {
        return whole.to_string();
    }
    let frac_str = format!("{:0>width$}", frac.to_string(), width = decimals as usize);
    format!("{}.{}", whole, frac_str.trim_end_matches('0'))
}

/// Decimal rendering of `value` scaled down by `decimals`, rounded half-up to
/// exactly `places` fractional digits
pub fn format_fixed(value: U256, decimals: u8, places: u8) -> String {
    let scaled = if places >= decimals {
        value * U256::from(10u64).pow(U256::from(places - decimals))
    } else {
        let step = U256::from(10u64).pow(U256::from(decimals - places));
        (value + step / U256::from(2u64)) / step
    };

    if places == 0 {
        return scaled.to_string();
    }
    let unit = U256::from(10u64).pow(U256::from(places));
    format!(
        "{}.{:0>width$}",
        scaled / unit,
        (scaled % unit).to_string(),
        width = places as usize
    )
}

fn pretty_json(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::{Address, I256};

    fn big() -> U256 {
        U256::from_str_radix("123456789012345678901234567890", 10).unwrap()
    }

    #[test]
    fn test_big_integer_is_plain_decimal() {
        assert_eq!(
            format_value(&DynSolValue::Uint(big(), 256)),
            "123456789012345678901234567890"
        );
        assert_eq!(
            format_value(&DynSolValue::Int("-42".parse::<I256>().unwrap(), 256)),
            "-42"
        );
    }

    #[test]
    fn test_nested_integers_become_strings() {
        let value = DynSolValue::Tuple(vec![
            DynSolValue::Uint(big(), 256),
            DynSolValue::Array(vec![DynSolValue::Uint(U256::from(7u64), 8)]),
            DynSolValue::Bool(true),
        ]);
        let expected = "[\n  \"123456789012345678901234567890\",\n  [\n    \"7\"\n  ],\n  true\n]";
        assert_eq!(format_value(&value), expected);
    }

    #[test]
    fn test_primitives_default_form() {
        let addr: Address = "0xaf88d065e77c8cc2239327c5edb3a432268e5831".parse().unwrap();
        assert_eq!(
            format_value(&DynSolValue::Address(addr)),
            "0xaf88d065e77c8cC2239327C5EDb3A432268e5831"
        );
        assert_eq!(format_value(&DynSolValue::String("USD Coin".into())), "USD Coin");
        assert_eq!(format_value(&DynSolValue::Bytes(vec![0xde, 0xad])), "0xdead");
    }

    #[test]
    fn test_format_result_shapes() {
        assert_eq!(format_result(&[]), "(no return value)");
        assert_eq!(format_result(&[DynSolValue::Uint(U256::from(5u64), 256)]), "5");
        assert_eq!(
            format_result(&[DynSolValue::Uint(U256::from(5u64), 256), DynSolValue::Bool(false)]),
            "[\n  \"5\",\n  false\n]"
        );
    }

    #[test]
    fn test_format_units() {
        assert_eq!(format_units(U256::from(1_500_000u64), 6), "1.5");
        assert_eq!(format_units(U256::from(2_000_000u64), 6), "2");
        assert_eq!(format_units(U256::from(1u64), 9), "0.000000001");
        assert_eq!(format_units(U256::from(42u64), 0), "42");
    }

    #[test]
    fn test_format_fixed_rounds() {
        assert_eq!(format_fixed(U256::from(12_345_678u64), 6, 2), "12.35");
        assert_eq!(format_fixed(U256::from(12_344_999u64), 6, 2), "12.34");
        assert_eq!(format_fixed(U256::ZERO, 6, 2), "0.00");
        assert_eq!(format_fixed(U256::from(5u64), 0, 2), "5.00");
    }
}
