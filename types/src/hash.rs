//! Commitment hash carried by a prevote.

use crate::error::TypesError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Hash length in bytes (a truncated SHA-256).
pub const VOTE_HASH_LEN: usize = 20;

/// A 20-byte commitment to a salted set of exchange-rate claims.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VoteHash([u8; VOTE_HASH_LEN]);

impl VoteHash {
    pub fn new(bytes: [u8; VOTE_HASH_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; VOTE_HASH_LEN] {
        &self.0
    }
}

impl FromStr for VoteHash {
    type Err = TypesError;

    /// Parses the 40-character hex form.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s).map_err(|_| TypesError::InvalidHash(s.to_string()))?;
        let arr: [u8; VOTE_HASH_LEN] = bytes
            .try_into()
            .map_err(|_| TypesError::InvalidHash(s.to_string()))?;
        Ok(Self(arr))
    }
}

impl fmt::Debug for VoteHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VoteHash({})", hex::encode(&self.0[..4]))
    }
}

impl fmt::Display for VoteHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_roundtrip() {
        let hash = VoteHash::new([0xab; VOTE_HASH_LEN]);
        assert_eq!(hash.to_string().len(), 40);
        assert_eq!(hash.to_string().parse::<VoteHash>().unwrap(), hash);
    }

    #[test]
    fn wrong_length_is_rejected() {
        assert!("abcd".parse::<VoteHash>().is_err());
        assert!("zz".repeat(20).parse::<VoteHash>().is_err());
    }
}
