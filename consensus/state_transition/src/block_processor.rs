//! Block Processor (spec §4.3): absorb a block's attestations into the
//! active state and update the vote cache.

use crate::attestation_validator::{validate_attestation, validate_proposer_attestation};
use crate::errors::AttestationValidationError as Error;
use crate::helpers::{get_attestation_indices, get_signed_parent_hashes, has_voted};
use bls::BlsOracle;
use types::{ActiveState, AttestationRecord, Block, BlockVoteCache, ChainSpec, CrystallizedState, Hash256, VoteCacheEntry};

/// Folds one attestation into a copy of `cache` (spec §4.3's folding rule).
fn fold_attestation_into_cache(
    cs: &CrystallizedState,
    active: &ActiveState,
    att: &AttestationRecord,
    block: &Block,
    cache: &mut BlockVoteCache,
    spec: &ChainSpec,
) {
    let parent_hashes = get_signed_parent_hashes(
        active,
        block,
        att.slot,
        &att.oblique_parent_hashes,
        spec,
    );
    let committee = get_attestation_indices(cs, att.slot, att.shard_id, spec);

    for parent_hash in &parent_hashes {
        if att.oblique_parent_hashes.contains(parent_hash) {
            continue;
        }
        let entry = cache.entry(*parent_hash).or_insert_with(VoteCacheEntry::default);
        for (committee_index, &validator_index) in committee.iter().enumerate() {
            if has_voted(&att.attester_bitfield, committee_index)
                && entry.voter_indices.insert(validator_index)
            {
                entry.total_voter_deposits += cs.validators[validator_index].balance;
            }
        }
    }
}

/// Validates and absorbs every attestation in `block`, in order, returning a
/// fresh `ActiveState`. The parent states are left untouched; on any
/// validation failure the whole block is rejected as a unit.
///
/// `block_hash` is the block's canonical hash, computed and carried by the
/// caller — the same way `block.parent_hash` and `att.justified_block_hash`
/// are already externally supplied, rather than derived here from
/// `crystallized_state_root`, which stays fixed for an entire cycle and
/// would collide across every block produced within it.
pub fn process_block(
    cs: &CrystallizedState,
    active: &ActiveState,
    block: &Block,
    block_hash: Hash256,
    parent_block: &Block,
    bls: &impl BlsOracle,
    spec: &ChainSpec,
) -> Result<ActiveState, Error> {
    validate_proposer_attestation(block, parent_block, cs, spec)?;

    let mut new_block_vote_cache = active.block_vote_cache.clone();
    for att in &block.attestations {
        validate_attestation(cs, active, att, block, parent_block, bls, spec)?;
        fold_attestation_into_cache(cs, active, att, block, &mut new_block_vote_cache, spec);
    }

    let mut pending_attestations = active.pending_attestations.clone();
    pending_attestations.extend(block.attestations.iter().cloned());

    let mut chain = active.chain.clone();
    chain.push(block_hash, block.clone());

    Ok(ActiveState {
        pending_attestations,
        recent_block_hashes: active.recent_block_hashes.clone(),
        block_vote_cache: new_block_vote_cache,
        chain,
    })
}
