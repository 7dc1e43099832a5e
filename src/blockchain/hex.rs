use crate::error::DecodeError;

/// Decode a `0x`-prefixed hex quantity into an integer.
///
/// The prefix is mandatory and at least one hex digit must follow it.
/// Upper and lower case digits are both accepted, as are leading zeros.
pub fn hex_to_int(hex_str: &str) -> Result<u64, DecodeError> {
    let digits = hex_str
        .strip_prefix("0x")
        .or_else(|| hex_str.strip_prefix("0X"))
        .ok_or_else(|| DecodeError::InvalidHex(hex_str.to_string()))?;

    // from_str_radix tolerates a leading '+', the wire format does not
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(DecodeError::InvalidHex(hex_str.to_string()));
    }

    u64::from_str_radix(digits, 16).map_err(|_| DecodeError::InvalidHex(hex_str.to_string()))
}

/// Lenient variant of [`hex_to_int`]: malformed input decodes to zero.
pub fn hex_to_int_or_zero(hex_str: &str) -> u64 {
    hex_to_int(hex_str).unwrap_or(0)
}

/// Encode an integer as a lowercase `0x`-prefixed hex quantity without leading zeros.
pub fn int_to_hex(value: u64) -> String {
    format!("0x{:x}", value)
}
