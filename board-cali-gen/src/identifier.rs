//! Device identifier parsing
//!
//! Spreadsheets hand the STM32 unique ID over in whatever form the cell
//! happened to be typed as: an integer, a `0x` string, or (most often, since
//! Excel stores numbers as doubles) a float. This module resolves all of them
//! into a [`DeviceId`] and splits it into the three `uint32_t` words the
//! firmware struct expects.

use crate::types::{DeviceId, GeneratorError, IdentifierValue, Result};

/// Maximum significant hex digits in a 96-bit identifier
const MAX_HEX_DIGITS: usize = 24;

/// 2^96 as an f64; exact, since it is a power of two
const FLOAT_LIMIT: f64 = 79_228_162_514_264_337_593_543_950_336.0;

/// Resolve a raw identifier value into a validated 96-bit [`DeviceId`]
pub fn parse_identifier(value: &IdentifierValue) -> Result<DeviceId> {
    match value {
        IdentifierValue::Integer(v) => {
            if *v < 0 {
                return Err(GeneratorError::InvalidIdentifier(format!(
                    "negative integer {}",
                    v
                )));
            }
            DeviceId::new(*v as u128)
        }
        IdentifierValue::HexString(s) => parse_hex(s),
        IdentifierValue::Float(v) => parse_float(*v),
        IdentifierValue::Other(description) => Err(GeneratorError::InvalidIdentifier(format!(
            "expected an integer or a 0x-prefixed hex string, got {}",
            description
        ))),
    }
}

fn parse_hex(text: &str) -> Result<DeviceId> {
    let trimmed = text.trim();
    let digits = match trimmed.get(..2) {
        Some(prefix) if prefix.eq_ignore_ascii_case("0x") => &trimmed[2..],
        _ => {
            return Err(GeneratorError::InvalidIdentifier(format!(
                "missing 0x prefix: {:?}",
                text
            )))
        }
    };

    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(GeneratorError::InvalidIdentifier(format!(
            "invalid hexadecimal string: {:?}",
            text
        )));
    }

    let significant = digits.trim_start_matches('0');
    if significant.len() > MAX_HEX_DIGITS {
        return Err(GeneratorError::IdentifierOverflow(trimmed.to_string()));
    }
    if significant.is_empty() {
        return DeviceId::new(0);
    }

    let value = u128::from_str_radix(significant, 16).map_err(|e| {
        GeneratorError::InvalidIdentifier(format!("invalid hexadecimal string {:?}: {}", text, e))
    })?;
    DeviceId::new(value)
}

fn parse_float(value: f64) -> Result<DeviceId> {
    if !value.is_finite() {
        return Err(GeneratorError::InvalidIdentifier(format!(
            "non-finite float {}",
            value
        )));
    }
    if value.fract() != 0.0 {
        return Err(GeneratorError::InvalidIdentifier(format!(
            "float {} has a fractional part and cannot be converted without data loss",
            value
        )));
    }
    if value < 0.0 {
        return Err(GeneratorError::InvalidIdentifier(format!(
            "negative float {}",
            value
        )));
    }
    if value >= FLOAT_LIMIT {
        return Err(GeneratorError::IdentifierOverflow(format!("{:.0}", value)));
    }
    DeviceId::new(value as u128)
}

/// The three `0xHHHHHHHH` literals of an identifier, most significant first
pub fn identifier_literals(id: &DeviceId) -> [String; 3] {
    id.words().map(|word| format!("0x{:08x}", word))
}

/// Parse a raw identifier and split it into its three hex literals
pub fn split_identifier(value: &IdentifierValue) -> Result<[String; 3]> {
    let id = parse_identifier(value)?;
    Ok(identifier_literals(&id))
}
