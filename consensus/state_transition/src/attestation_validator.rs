//! Attestation Validator (spec §4.2).

use crate::errors::AttestationValidationError as Error;
use crate::helpers::{
    get_attestation_indices, get_bitfield_length, get_proposer_position, get_signed_parent_hashes,
    has_voted,
};
use bls::BlsOracle;
use int_to_bytes::{int_to_bytes2, int_to_bytes8};
use log::warn;
use types::{ActiveState, AttestationRecord, Block, ChainSpec, CrystallizedState};

/// Every bullet of spec §4.2 step by step; the first failing check
/// short-circuits the rest, matching the reference's sequential validation.
pub fn validate_attestation(
    cs: &CrystallizedState,
    active: &ActiveState,
    att: &AttestationRecord,
    block: &Block,
    parent_block: &Block,
    bls: &impl BlsOracle,
    spec: &ChainSpec,
) -> Result<(), Error> {
    // 1 & 2: slot bounds.
    if att.slot > parent_block.slot_number {
        warn!(
            "rejecting attestation: slot {} is ahead of parent block slot {}",
            att.slot, parent_block.slot_number
        );
        return Err(Error::AttestationSlotOutOfRange {
            slot: att.slot,
            bound: parent_block.slot_number,
            too_high: true,
        });
    }
    let lower_bound = parent_block
        .slot_number
        .saturating_sub(spec.cycle_length - 1);
    if att.slot < lower_bound {
        warn!(
            "rejecting attestation: slot {} is below the cycle_length window (bound {})",
            att.slot, lower_bound
        );
        return Err(Error::AttestationSlotOutOfRange {
            slot: att.slot,
            bound: lower_bound,
            too_high: false,
        });
    }

    // 3: justified_slot no newer than the crystallized state's.
    if att.justified_slot > cs.last_justified_slot {
        return Err(Error::JustifiedSlotTooNew {
            justified_slot: att.justified_slot,
            last_justified_slot: cs.last_justified_slot,
        });
    }

    // 4: justified_block_hash exists and its slot matches.
    let justified_block = active
        .chain
        .get_block_by_hash(&att.justified_block_hash)
        .ok_or(Error::JustifiedBlockMissing {
            hash: att.justified_block_hash,
        })?;
    if justified_block.slot_number != att.justified_slot {
        return Err(Error::JustifiedBlockSlotMismatch {
            expected: att.justified_slot,
            found: justified_block.slot_number,
        });
    }

    let committee = get_attestation_indices(cs, att.slot, att.shard_id, spec);

    // 5: bitfield length.
    let expected_len = get_bitfield_length(committee.len());
    if att.attester_bitfield.len() != expected_len {
        return Err(Error::BitfieldLengthWrong {
            found: att.attester_bitfield.len(),
            expected: expected_len,
        });
    }

    // 6: trailing bits beyond the committee size must be zero.
    let last_bit = committee.len();
    if last_bit % 8 != 0 {
        for i in last_bit..(expected_len * 8) {
            if has_voted(&att.attester_bitfield, i) {
                return Err(Error::BitfieldTrailingBitsNonZero);
            }
        }
    }

    // 7: aggregate signature.
    let parent_hashes = get_signed_parent_hashes(
        active,
        block,
        att.slot,
        &att.oblique_parent_hashes,
        spec,
    );
    let pubkeys: Vec<_> = committee
        .iter()
        .enumerate()
        .filter(|(committee_index, _)| has_voted(&att.attester_bitfield, *committee_index))
        .map(|(_, &validator_index)| cs.validators[validator_index].pubkey.clone())
        .collect();

    let mut message = Vec::new();
    message.extend_from_slice(&int_to_bytes8(att.slot));
    for hash in &parent_hashes {
        message.extend_from_slice(hash.as_bytes());
    }
    message.extend_from_slice(&int_to_bytes2(att.shard_id));
    message.extend_from_slice(att.shard_block_hash.as_bytes());
    message.extend_from_slice(&int_to_bytes8(att.justified_slot));
    let message = eth2_hashing::hash(&message);

    let agg_pub = bls.aggregate_pubs(&pubkeys);
    if !bls.verify(&message, &agg_pub, &att.aggregate_sig) {
        return Err(Error::AggregateSignatureInvalid);
    }

    Ok(())
}

/// Block-level rule: `block.attestations[0]` must be the proposer's own
/// attestation (spec §4.2). Skipped at genesis (`block.slot_number == 0`).
pub fn validate_proposer_attestation(
    block: &Block,
    parent_block: &Block,
    cs: &CrystallizedState,
    spec: &ChainSpec,
) -> Result<(), Error> {
    if block.slot_number == 0 {
        return Ok(());
    }

    let (proposer_index_in_committee, shard_id) = get_proposer_position(parent_block, cs, spec);

    let attestation = block.attestations.first().ok_or(Error::EmptyAttestations)?;

    let is_proposer_attestation = attestation.shard_id == shard_id
        && attestation.slot == parent_block.slot_number
        && has_voted(&attestation.attester_bitfield, proposer_index_in_committee);

    if !is_proposer_attestation {
        return Err(Error::ProposerNotAttester);
    }

    Ok(())
}
