//! Key layout of the oracle store.
//!
//! One byte of prefix per record kind. Denom-keyed records append the raw denom
//! bytes; validator-keyed records append a length-prefixed address.

use crate::StoreError;
use oracle_types::ValAddress;

pub const EXCHANGE_RATE_PREFIX: u8 = 0x01;
pub const FEEDER_DELEGATION_PREFIX: u8 = 0x02;
pub const MISS_COUNTER_PREFIX: u8 = 0x03;
pub const PREVOTE_PREFIX: u8 = 0x04;
pub const VOTE_PREFIX: u8 = 0x05;
pub const VOTE_TARGET_PREFIX: u8 = 0x06;
pub const PARAMS_KEY: &[u8] = &[0x07];

fn denom_key(prefix: u8, denom: &str) -> Vec<u8> {
    let mut key = Vec::with_capacity(1 + denom.len());
    key.push(prefix);
    key.extend_from_slice(denom.as_bytes());
    key
}

fn validator_key(prefix: u8, validator: &ValAddress) -> Vec<u8> {
    let bytes = validator.as_bytes();
    let mut key = Vec::with_capacity(2 + bytes.len());
    key.push(prefix);
    key.push(bytes.len() as u8);
    key.extend_from_slice(bytes);
    key
}

pub fn exchange_rate_key(denom: &str) -> Vec<u8> {
    denom_key(EXCHANGE_RATE_PREFIX, denom)
}

pub fn vote_target_key(denom: &str) -> Vec<u8> {
    denom_key(VOTE_TARGET_PREFIX, denom)
}

pub fn feeder_delegation_key(validator: &ValAddress) -> Vec<u8> {
    validator_key(FEEDER_DELEGATION_PREFIX, validator)
}

pub fn miss_counter_key(validator: &ValAddress) -> Vec<u8> {
    validator_key(MISS_COUNTER_PREFIX, validator)
}

pub fn prevote_key(validator: &ValAddress) -> Vec<u8> {
    validator_key(PREVOTE_PREFIX, validator)
}

pub fn vote_key(validator: &ValAddress) -> Vec<u8> {
    validator_key(VOTE_PREFIX, validator)
}

/// Denom suffix of a denom-keyed record.
pub fn denom_from_key(key: &[u8]) -> Result<String, StoreError> {
    let suffix = key
        .get(1..)
        .ok_or_else(|| StoreError::Corruption("empty key".to_string()))?;
    String::from_utf8(suffix.to_vec())
        .map_err(|_| StoreError::Corruption(format!("non-utf8 denom key {suffix:?}")))
}

/// Validator suffix of a validator-keyed record.
pub fn validator_from_key(key: &[u8]) -> Result<ValAddress, StoreError> {
    let corrupt = || StoreError::Corruption(format!("bad validator key {key:?}"));
    let len = *key.get(1).ok_or_else(corrupt)? as usize;
    let bytes = key.get(2..).filter(|b| b.len() == len).ok_or_else(corrupt)?;
    ValAddress::from_slice(bytes).map_err(|_| corrupt())
}
