use std::fmt;
use types::Hash256;

/// Spec §7. Every attestation-level validation failure; the block (or
/// attestation) that triggered it is rejected as a unit, the parent state is
/// left untouched, and no variant is retried or partially accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttestationValidationError {
    EmptyAttestations,
    ProposerNotAttester,
    AttestationSlotOutOfRange { slot: u64, bound: u64, too_high: bool },
    JustifiedSlotTooNew { justified_slot: u64, last_justified_slot: u64 },
    JustifiedBlockMissing { hash: Hash256 },
    JustifiedBlockSlotMismatch { expected: u64, found: u64 },
    BitfieldLengthWrong { found: usize, expected: usize },
    BitfieldTrailingBitsNonZero,
    AggregateSignatureInvalid,
}

impl fmt::Display for AttestationValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyAttestations => write!(f, "block has zero attestations but slot > 0"),
            Self::ProposerNotAttester => {
                write!(f, "block.attestations[0] does not cover the expected proposer")
            }
            Self::AttestationSlotOutOfRange { slot, bound, too_high } => write!(
                f,
                "attestation slot {} {} bound {}",
                slot,
                if *too_high { ">" } else { "<" },
                bound
            ),
            Self::JustifiedSlotTooNew { justified_slot, last_justified_slot } => write!(
                f,
                "attestation.justified_slot {} > crystallized_state.last_justified_slot {}",
                justified_slot, last_justified_slot
            ),
            Self::JustifiedBlockMissing { hash } => {
                write!(f, "no block with hash {:?} in active_state.chain", hash)
            }
            Self::JustifiedBlockSlotMismatch { expected, found } => write!(
                f,
                "justified_block_hash's slot {} does not match justified_slot {}",
                found, expected
            ),
            Self::BitfieldLengthWrong { found, expected } => write!(
                f,
                "attester_bitfield has length {}, expected {}",
                found, expected
            ),
            Self::BitfieldTrailingBitsNonZero => {
                write!(f, "attester_bitfield has non-zero trailing bits")
            }
            Self::AggregateSignatureInvalid => write!(f, "aggregate signature failed to verify"),
        }
    }
}

impl std::error::Error for AttestationValidationError {}

/// Top-level error returned by `compute_state_transition` (spec §4.8/§7).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateTransitionError {
    Attestation(AttestationValidationError),
}

impl fmt::Display for StateTransitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Attestation(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for StateTransitionError {}

impl From<AttestationValidationError> for StateTransitionError {
    fn from(e: AttestationValidationError) -> Self {
        StateTransitionError::Attestation(e)
    }
}
