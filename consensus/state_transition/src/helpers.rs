//! Shared utilities: bitfield ops, committee lookup, integer sqrt,
//! parent-hash expansion (spec §4.1). Every function here is a leaf with no
//! dependency on the rest of the crate, and is unit-tested directly.

use integer_sqrt::IntegerSquareRoot;
use types::{ActiveState, Block, ChainSpec, CrystallizedState, Hash256, ShardAndCommittee};

/// `get_bitfield_length(n) = (n + 7) / 8`.
pub fn get_bitfield_length(n: usize) -> usize {
    (n + 7) / 8
}

/// Bit `i`, MSB-first within byte `i / 8`.
pub fn has_voted(bitfield: &[u8], i: usize) -> bool {
    let byte = i / 8;
    if byte >= bitfield.len() {
        return false;
    }
    let bit = 7 - (i % 8);
    (bitfield[byte] >> bit) & 1 == 1
}

/// Elementwise OR. All inputs must share length (spec §4.1); `bitfields`
/// empty returns an empty vec.
pub fn or_bitfields(bitfields: &[Vec<u8>]) -> Vec<u8> {
    match bitfields.first() {
        None => vec![],
        Some(first) => {
            let len = first.len();
            debug_assert!(
                bitfields.iter().all(|b| b.len() == len),
                "or_bitfields: all inputs must share length"
            );
            let mut out = vec![0u8; len];
            for bitfield in bitfields {
                for (o, b) in out.iter_mut().zip(bitfield.iter()) {
                    *o |= b;
                }
            }
            out
        }
    }
}

pub fn get_empty_bitfield(n: usize) -> Vec<u8> {
    vec![0u8; get_bitfield_length(n)]
}

/// Newton-iterated integer floor square root.
pub fn int_sqrt(x: u64) -> u64 {
    x.integer_sqrt()
}

pub fn get_active_validator_indices(
    dynasty: u64,
    validators: &[types::ValidatorRecord],
) -> Vec<usize> {
    validators
        .iter()
        .enumerate()
        .filter_map(|(i, v)| if v.is_active(dynasty) { Some(i) } else { None })
        .collect()
}

/// Sum of balances of validators active in `cs.current_dynasty`
/// (spec §3, "Derived: total_deposits").
pub fn total_deposits(cs: &CrystallizedState) -> u64 {
    get_active_validator_indices(cs.current_dynasty, &cs.validators)
        .into_iter()
        .map(|i| cs.validators[i].balance)
        .sum()
}

/// Indexes `shard_and_committee_for_slots` at `slot - (last_state_recalc -
/// cycle_length)`. `slot` must fall within `[last_state_recalc -
/// cycle_length, last_state_recalc + cycle_length)` (spec §4.1).
pub fn get_shards_and_committees_for_slot(
    cs: &CrystallizedState,
    slot: u64,
    spec: &ChainSpec,
) -> &[ShardAndCommittee] {
    let cycle_length = spec.cycle_length as i64;
    let offset = slot as i64 - (cs.last_state_recalc as i64 - cycle_length);
    assert!(
        offset >= 0 && offset < 2 * cycle_length,
        "slot {} out of range for last_state_recalc {}",
        slot,
        cs.last_state_recalc
    );
    &cs.shard_and_committee_for_slots[offset as usize]
}

/// The committee for `(att.slot, att.shard_id)`.
pub fn get_attestation_indices<'a>(
    cs: &'a CrystallizedState,
    att_slot: u64,
    att_shard_id: u16,
    spec: &ChainSpec,
) -> &'a [usize] {
    get_shards_and_committees_for_slot(cs, att_slot, spec)
        .iter()
        .find(|sac| sac.shard_id == att_shard_id)
        .map(|sac| sac.committee.as_slice())
        .unwrap_or_else(|| {
            panic!(
                "no committee scheduled for shard {} at slot {}",
                att_shard_id, att_slot
            )
        })
}

/// Reconstructs the `cycle_length`-length ordered list of block hashes an
/// attestation is signing (spec §4.1): the window `[att.slot - cycle_length +
/// 1 .. att.slot]`, drawn from `active.recent_block_hashes` (whose last entry
/// covers `block.slot_number`), with positions earlier than
/// `recent_block_hashes`' own coverage filled in order from
/// `oblique_parent_hashes`.
pub fn get_signed_parent_hashes(
    active: &ActiveState,
    block: &Block,
    att_slot: u64,
    att_oblique_parent_hashes: &[Hash256],
    spec: &ChainSpec,
) -> Vec<Hash256> {
    let cycle_length = spec.cycle_length as i64;
    let window_start_slot = att_slot as i64 - cycle_length + 1;
    let array_start_slot = block.slot_number as i64 - 2 * cycle_length + 1;
    let start_index = window_start_slot - array_start_slot;

    let missing = (-start_index).max(0) as usize;
    let from_array_start = start_index.max(0) as usize;
    let from_array_len = (cycle_length as usize).saturating_sub(missing);
    let from_array_end = (from_array_start + from_array_len).min(active.recent_block_hashes.len());

    let mut out = Vec::with_capacity(cycle_length as usize);
    out.extend_from_slice(&att_oblique_parent_hashes[..missing.min(att_oblique_parent_hashes.len())]);
    out.extend_from_slice(&active.recent_block_hashes[from_array_start.min(from_array_end)..from_array_end]);
    out
}

/// Shifts `prev` left by `new_slot - parent_slot` positions and pads the
/// right with that many copies of `parent_hash` (spec §4.1). Output length
/// equals input length whenever the shift doesn't exceed it.
pub fn get_new_recent_block_hashes(
    prev: &[Hash256],
    parent_slot: u64,
    new_slot: u64,
    parent_hash: Hash256,
) -> Vec<Hash256> {
    let shift = new_slot.saturating_sub(parent_slot) as usize;
    let start = shift.min(prev.len());
    let mut out = prev[start..].to_vec();
    out.extend(std::iter::repeat(parent_hash).take(shift));
    out
}

/// `(proposer_index_in_committee, shard_id)` for the proposer of
/// `parent_block` (spec §4.1).
pub fn get_proposer_position(
    parent_block: &Block,
    cs: &CrystallizedState,
    spec: &ChainSpec,
) -> (usize, u16) {
    let committee = &get_shards_and_committees_for_slot(cs, parent_block.slot_number, spec)[0];
    let index = (parent_block.slot_number as usize) % committee.committee.len();
    (index, committee.shard_id)
}
