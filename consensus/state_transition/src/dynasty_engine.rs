//! Dynasty Engine (spec §4.6): detects dynasty readiness and rotates the
//! second half of the committee schedule via the shuffling oracle.

use log::info;
use shuffling::Shuffler;
use types::{Block, ChainSpec, CrystallizedState};

/// spec §4.6. All three conditions must hold.
pub fn ready_for_dynasty_transition(cs: &CrystallizedState, block: &Block, spec: &ChainSpec) -> bool {
    let slots_since_dynasty_start = block.slot_number.saturating_sub(cs.dynasty_start);
    if slots_since_dynasty_start < spec.min_dynasty_length {
        return false;
    }
    if cs.last_finalized_slot <= cs.dynasty_start {
        return false;
    }
    cs.shard_and_committee_for_slots.iter().flatten().all(|sac| {
        cs.crosslink_records[sac.shard_id as usize].slot > cs.dynasty_start
    })
}

/// spec §4.6: `next_start_shard` is derived from the last committee of the
/// last slot of the current schedule. This is consensus-observable and is
/// reproduced exactly (spec §9, open question 4) rather than replaced by
/// some other derivation, e.g. the first committee of the next cycle.
pub fn compute_dynasty_transition(
    cs: &CrystallizedState,
    block: &Block,
    shuffler: &impl Shuffler,
    spec: &ChainSpec,
) -> CrystallizedState {
    info!("dynasty transition at dynasty {}", cs.current_dynasty);

    let current_dynasty = cs.current_dynasty + 1;
    let dynasty_start = cs.last_state_recalc;

    let last_slot_committees = cs
        .shard_and_committee_for_slots
        .last()
        .expect("shard_and_committee_for_slots is never empty");
    let last_committee = last_slot_committees
        .last()
        .expect("every scheduled slot has at least one committee");
    let next_start_shard = (last_committee.shard_id as u64 + 1) % spec.shard_count;

    let new_second_half =
        shuffler.get_new_shuffling(block.parent_hash, &cs.validators, current_dynasty, next_start_shard, spec);

    let cycle_length = spec.cycle_length as usize;
    let mut shard_and_committee_for_slots = cs.shard_and_committee_for_slots.clone();
    shard_and_committee_for_slots.splice(cycle_length.., new_second_half);

    CrystallizedState {
        current_dynasty,
        dynasty_start,
        shard_and_committee_for_slots,
        ..cs.clone()
    }
}
