//! Validator operator and account addresses.
//!
//! Both are 20 raw bytes; they differ only in their human-readable prefix. A
//! validator's own account shares its operator bytes, which is how the default
//! feeder of a validator is resolved.

use crate::error::TypesError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Address length in bytes.
pub const ADDRESS_LEN: usize = 20;

/// A validator operator address, displayed as `oravaloper` + hex.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ValAddress([u8; ADDRESS_LEN]);

/// An account address, displayed as `ora` + hex.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AccAddress([u8; ADDRESS_LEN]);

impl ValAddress {
    pub const PREFIX: &'static str = "oravaloper";

    pub fn new(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, TypesError> {
        let arr: [u8; ADDRESS_LEN] = bytes
            .try_into()
            .map_err(|_| TypesError::InvalidAddress(hex::encode(bytes)))?;
        Ok(Self(arr))
    }

    /// The account controlled by this validator's operator key.
    pub fn to_account(&self) -> AccAddress {
        AccAddress(self.0)
    }
}

impl AccAddress {
    pub const PREFIX: &'static str = "ora";

    pub fn new(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, TypesError> {
        let arr: [u8; ADDRESS_LEN] = bytes
            .try_into()
            .map_err(|_| TypesError::InvalidAddress(hex::encode(bytes)))?;
        Ok(Self(arr))
    }
}

impl From<ValAddress> for AccAddress {
    fn from(val: ValAddress) -> Self {
        val.to_account()
    }
}

fn parse_prefixed(s: &str, prefix: &str) -> Result<[u8; ADDRESS_LEN], TypesError> {
    let body = s
        .strip_prefix(prefix)
        .ok_or_else(|| TypesError::InvalidAddress(s.to_string()))?;
    let bytes = hex::decode(body).map_err(|_| TypesError::InvalidAddress(s.to_string()))?;
    bytes
        .try_into()
        .map_err(|_| TypesError::InvalidAddress(s.to_string()))
}

impl FromStr for ValAddress {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_prefixed(s, Self::PREFIX).map(Self)
    }
}

impl FromStr for AccAddress {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // `ora` is itself a prefix of `oravaloper`.
        if s.starts_with(ValAddress::PREFIX) {
            return Err(TypesError::InvalidAddress(s.to_string()));
        }
        parse_prefixed(s, Self::PREFIX).map(Self)
    }
}

impl fmt::Display for ValAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", Self::PREFIX, hex::encode(self.0))
    }
}

impl fmt::Debug for ValAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ValAddress({})", hex::encode(&self.0[..4]))
    }
}

impl fmt::Display for AccAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", Self::PREFIX, hex::encode(self.0))
    }
}

impl fmt::Debug for AccAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccAddress({})", hex::encode(&self.0[..4]))
    }
}
