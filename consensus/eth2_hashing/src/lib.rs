//! The `blake` oracle named in the attestation signing domain.
//!
//! The modern lighthouse `eth2_hashing` wraps `ring`'s SHA-256 because phase0
//! mainnet settled on SHA-256. This prototype's attestation message predates
//! that choice and is specified in terms of Blake2 (spec §1, §6), matching
//! what the original Python state transition imports from
//! `atc_chain.utils.blake`. We keep the crate name the teacher workspace uses
//! for this concern, but point it at `blake2` instead.

use blake2::{Blake2s256, Digest};

pub const HASH_LEN: usize = 32;

/// Blake2s-256 of `input`. Always 32 bytes, matching `ZERO_HASH32`'s width.
pub fn hash(input: &[u8]) -> [u8; HASH_LEN] {
    let mut hasher = Blake2s256::new();
    hasher.update(input);
    hasher.finalize().into()
}
