//! BLS signature types and the aggregate-verification oracle.
//!
//! Real BLS12-381 pairing arithmetic is out of scope here: `sign`/`verify`/
//! `aggregate_pubs` are pure oracles with a fixed contract. This crate
//! carries the wire types the rest of the workspace needs (`PublicKey`,
//! `AggregateSignature`, ...) and the `BlsOracle` trait that
//! `state_transition` calls into, plus a `fake_crypto`-gated implementation
//! for deterministic testing, used whenever a real pairing backend isn't
//! needed (benches, unit tests, fuzzing).

use eth2_hashing::hash;

pub const PUBLIC_KEY_BYTES_LEN: usize = 48;
pub const SIGNATURE_BYTES_LEN: usize = 96;
pub const SECRET_KEY_BYTES_LEN: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PublicKey(pub [u8; PUBLIC_KEY_BYTES_LEN]);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretKey(pub [u8; SECRET_KEY_BYTES_LEN]);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregatePublicKey(pub [u8; PUBLIC_KEY_BYTES_LEN]);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature(pub [u8; SIGNATURE_BYTES_LEN]);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateSignature(pub [u8; SIGNATURE_BYTES_LEN]);

impl PublicKey {
    pub fn zero() -> Self {
        Self([0; PUBLIC_KEY_BYTES_LEN])
    }
}

impl AggregateSignature {
    pub fn zero() -> Self {
        Self([0; SIGNATURE_BYTES_LEN])
    }
}

/// The two aggregate-BLS operations the attestation validator needs. A real
/// implementation delegates to a pairing-crypto backend; it is deterministic
/// in its inputs either way.
pub trait BlsOracle {
    fn aggregate_pubs(&self, pubs: &[PublicKey]) -> AggregatePublicKey;
    fn verify(&self, message: &[u8], pubkey: &AggregatePublicKey, sig: &AggregateSignature) -> bool;
}

/// Deterministic stand-in used by every test in this workspace and by any
/// caller that has not wired in real pairing crypto. `aggregate_pubs` folds
/// the public keys together with the hash oracle; `verify` recomputes the
/// same folding over the signature's embedded pubkey commitment and checks
/// for equality, so mismatched messages or pubkey sets are reliably rejected
/// while still being a single deterministic pure function of its inputs —
/// the only contract the oracle actually needs to satisfy.
#[cfg(feature = "fake_crypto")]
#[derive(Debug, Default, Clone, Copy)]
pub struct FakeBlsOracle;

#[cfg(feature = "fake_crypto")]
impl FakeBlsOracle {
    fn fake_sign(message: &[u8], agg_pub: &AggregatePublicKey) -> AggregateSignature {
        let mut preimage = Vec::with_capacity(message.len() + PUBLIC_KEY_BYTES_LEN);
        preimage.extend_from_slice(message);
        preimage.extend_from_slice(&agg_pub.0);
        let digest = hash(&preimage);
        let mut sig = [0u8; SIGNATURE_BYTES_LEN];
        sig[..32].copy_from_slice(&digest);
        AggregateSignature(sig)
    }

    /// Produce the signature a correctly-functioning attester set would have
    /// produced for `message`, for use by tests that build fixtures.
    pub fn fake_aggregate_sign(message: &[u8], pubs: &[PublicKey]) -> AggregateSignature {
        let agg_pub = FakeBlsOracle.aggregate_pubs(pubs);
        Self::fake_sign(message, &agg_pub)
    }
}

#[cfg(feature = "fake_crypto")]
impl BlsOracle for FakeBlsOracle {
    fn aggregate_pubs(&self, pubs: &[PublicKey]) -> AggregatePublicKey {
        let mut preimage = Vec::with_capacity(pubs.len() * PUBLIC_KEY_BYTES_LEN);
        for pub_key in pubs {
            preimage.extend_from_slice(&pub_key.0);
        }
        let digest = hash(&preimage);
        let mut out = [0u8; PUBLIC_KEY_BYTES_LEN];
        out[..32].copy_from_slice(&digest);
        AggregatePublicKey(out)
    }

    fn verify(&self, message: &[u8], pubkey: &AggregatePublicKey, sig: &AggregateSignature) -> bool {
        &Self::fake_sign(message, pubkey) == sig
    }
}
