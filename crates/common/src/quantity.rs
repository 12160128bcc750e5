//! Conversions between integers and the JSON-RPC "quantity" encoding.
//!
//! A quantity is a non-negative integer written as lowercase hex with a `0x` prefix and without
//! leading zero digits, so `0` is `0x0` and `1024` is `0x400`. Values are held as [`U256`] since
//! wei amounts routinely exceed the range of the native integer types.

use alloy::primitives::U256;
use serde_json::Value;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum QuantityError {
    #[error("malformed quantity '{value}': {reason}")]
    Malformed { value: String, reason: &'static str },

    #[error("a quantity can't be negative, got {0}")]
    Negative(i128),
}

impl QuantityError {
    fn malformed(value: impl ToString, reason: &'static str) -> Self {
        Self::Malformed {
            value: value.to_string(),
            reason,
        }
    }
}

/// Encodes the value as a minimal `0x` prefixed lowercase hex quantity.
pub fn to_quantity(value: U256) -> String {
    if value.is_zero() {
        return "0x0".to_owned();
    }
    format!("0x{value:x}")
}

/// Encodes a signed value, rejecting negative ones.
pub fn to_quantity_signed(value: i128) -> Result<String, QuantityError> {
    if value < 0 {
        return Err(QuantityError::Negative(value));
    }
    Ok(to_quantity(U256::from(value.unsigned_abs())))
}

/// Decodes a `0x` prefixed hex quantity.
///
/// Leading zero digits are tolerated on input since some nodes emit them (e.g. `0x00`).
pub fn from_quantity(value: &str) -> Result<U256, QuantityError> {
    let digits = value
        .strip_prefix("0x")
        .ok_or_else(|| QuantityError::malformed(value, "missing the 0x prefix"))?;
    if digits.is_empty() {
        return Err(QuantityError::malformed(value, "no digits after the prefix"));
    }
    if !digits.bytes().all(|byte| byte.is_ascii_hexdigit()) {
        return Err(QuantityError::malformed(value, "contains a non-hex digit"));
    }
    U256::from_str_radix(digits, 16)
        .map_err(|_| QuantityError::malformed(value, "does not fit in 256 bits"))
}

/// Decodes a quantity held in a JSON value. Anything other than a string is malformed.
pub fn quantity_from_value(value: &Value) -> Result<U256, QuantityError> {
    match value {
        Value::String(string) => from_quantity(string),
        other => Err(QuantityError::malformed(other, "expected a hex string")),
    }
}
