//! SHA-256 hashing for vote commitments.

use oracle_types::hash::VOTE_HASH_LEN;
use oracle_types::{ValAddress, VoteHash};
use sha2::{Digest, Sha256};

/// Compute the SHA-256 digest of arbitrary data.
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Hash multiple byte slices in sequence (avoids concatenation allocation).
pub fn sha256_multi(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize().into()
}

/// Commitment a validator publishes in its prevote.
///
/// The rates string is hashed exactly as it will be revealed, so a reveal must
/// repeat the same bytes, not merely the same rates.
pub fn aggregate_vote_hash(salt: &str, exchange_rates: &str, voter: &ValAddress) -> VoteHash {
    let voter = voter.to_string();
    let digest = sha256_multi(&[
        salt.as_bytes(),
        b":",
        exchange_rates.as_bytes(),
        b":",
        voter.as_bytes(),
    ]);
    let mut truncated = [0u8; VOTE_HASH_LEN];
    truncated.copy_from_slice(&digest[..VOTE_HASH_LEN]);
    VoteHash::new(truncated)
}

/// Whether `hash` commits to this salt, rates string and voter.
pub fn verify_vote_hash(
    hash: &VoteHash,
    salt: &str,
    exchange_rates: &str,
    voter: &ValAddress,
) -> bool {
    aggregate_vote_hash(salt, exchange_rates, voter) == *hash
}
