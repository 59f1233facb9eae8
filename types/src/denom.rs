//! Denomination name validation.

use crate::error::TypesError;

/// Checks `[a-zA-Z][a-zA-Z0-9/:._-]{2,127}`.
pub fn validate_denom(denom: &str) -> Result<(), TypesError> {
    let bytes = denom.as_bytes();
    let valid_len = (3..=128).contains(&bytes.len());
    let valid_head = bytes.first().is_some_and(|b| b.is_ascii_alphabetic());
    let valid_tail = bytes
        .iter()
        .skip(1)
        .all(|&b| b.is_ascii_alphanumeric() || matches!(b, b'/' | b':' | b'.' | b'_' | b'-'));

    if valid_len && valid_head && valid_tail {
        Ok(())
    } else {
        Err(TypesError::InvalidDenom(denom.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_canonical_denoms() {
        for denom in ["uusd", "foo", "ibc/27394FB092D2ECCD", "alion", "a.b_c-d"] {
            assert!(validate_denom(denom).is_ok(), "{denom}");
        }
    }

    #[test]
    fn rejects_non_canonical_denoms() {
        let too_long = "a".repeat(129);
        for denom in ["", "ab", "1abc", "foo bar", "foo!", too_long.as_str()] {
            assert!(validate_denom(denom).is_err(), "{denom}");
        }
    }
}
