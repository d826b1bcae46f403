//! Cycle Engine (spec §4.4): advances justification/finality over a
//! completed cycle, updates crosslinks, prunes stale attestations, and
//! advances `last_state_recalc` by exactly `cycle_length`.

use crate::helpers::{get_attestation_indices, total_deposits};
use crate::reward_engine::{apply_rewards_and_penalties, calculate_crosslink_rewards, calculate_ffg_rewards};
use itertools::Itertools;
use log::info;
use types::{ActiveState, Block, ChainSpec, CrosslinkRecord, CrystallizedState};

/// spec §4.4.1: groups `pending_attestations` by `(shard_id,
/// shard_block_hash)` and replaces a shard's crosslink when 2/3 of its
/// committee balance attests to the same hash under a newer dynasty.
fn process_updated_crosslinks(
    cs: &CrystallizedState,
    active: &ActiveState,
    spec: &ChainSpec,
) -> Vec<CrosslinkRecord> {
    let mut crosslinks = cs.crosslink_records.clone();

    let groups = active
        .pending_attestations
        .iter()
        .map(|att| ((att.shard_id, att.shard_block_hash), att))
        .into_group_map();

    for ((shard_id, shard_block_hash), atts) in groups {
        let committee = get_attestation_indices(cs, atts[0].slot, shard_id, spec);
        let total_committee_balance: u64 = committee.iter().map(|&v| cs.validators[v].balance).sum();

        let mut voted = vec![false; committee.len()];
        for att in &atts {
            for (c, voted_c) in voted.iter_mut().enumerate() {
                if crate::helpers::has_voted(&att.attester_bitfield, c) {
                    *voted_c = true;
                }
            }
        }
        let total_attestation_balance: u64 = committee
            .iter()
            .zip(voted.iter())
            .filter(|(_, &v)| v)
            .map(|(&idx, _)| cs.validators[idx].balance)
            .sum();

        let shard = shard_id as usize;
        if 3 * total_attestation_balance >= 2 * total_committee_balance
            && cs.current_dynasty > crosslinks[shard].dynasty
        {
            crosslinks[shard] = CrosslinkRecord {
                dynasty: cs.current_dynasty,
                slot: cs.last_state_recalc + spec.cycle_length,
                hash: shard_block_hash,
            };
        }
    }

    crosslinks
}

/// spec §4.4: runs the justification/finality loop, the reward engine, the
/// crosslink update, pruning, and advances `last_state_recalc`. The
/// committee schedule itself is left as the documented stub (spec §9, open
/// question 1): the second half is duplicated rather than freshly computed,
/// preserved here rather than silently fixed.
pub fn initialize_new_cycle(
    cs: &CrystallizedState,
    active: &ActiveState,
    block: &Block,
    spec: &ChainSpec,
) -> (CrystallizedState, ActiveState) {
    info!("cycle boundary reached at last_state_recalc={}", cs.last_state_recalc);

    let total = total_deposits(cs);
    let mut last_justified_slot = cs.last_justified_slot;
    let mut justified_streak = cs.justified_streak;
    let mut last_finalized_slot = cs.last_finalized_slot;

    for i in 0..spec.cycle_length {
        let slot = cs.last_state_recalc as i64 - spec.cycle_length as i64 + i as i64;
        let block_hash = active.recent_block_hashes[i as usize];

        let vote_balance = active
            .block_vote_cache
            .get(&block_hash)
            .map(|entry| entry.total_voter_deposits)
            .unwrap_or(0);

        if total > 0 && 3 * vote_balance >= 2 * total {
            if slot >= 0 {
                last_justified_slot = last_justified_slot.max(slot as u64);
            }
            justified_streak += 1;
        } else {
            justified_streak = 0;
        }

        if justified_streak >= spec.cycle_length + 1 {
            let finalized = slot - spec.cycle_length as i64 - 1;
            if finalized >= 0 {
                last_finalized_slot = last_finalized_slot.max(finalized as u64);
            }
        }
    }

    let ffg_deltas = calculate_ffg_rewards(cs, active, block, spec);
    let crosslink_deltas = calculate_crosslink_rewards(cs, active, block, spec);
    let validators = apply_rewards_and_penalties(cs, &ffg_deltas, &crosslink_deltas);

    let crosslink_records = process_updated_crosslinks(cs, active, spec);

    let new_last_state_recalc = cs.last_state_recalc + spec.cycle_length;

    // Reference stub (spec §9, open question 1): the second half of the
    // schedule is duplicated from the first instead of a freshly shuffled
    // committee set. Reproduced verbatim rather than fixed.
    let cycle_length = spec.cycle_length as usize;
    let mut shard_and_committee_for_slots = cs.shard_and_committee_for_slots[cycle_length..].to_vec();
    shard_and_committee_for_slots.extend(cs.shard_and_committee_for_slots[cycle_length..].to_vec());

    let new_cs = CrystallizedState {
        validators,
        last_state_recalc: new_last_state_recalc,
        shard_and_committee_for_slots,
        last_justified_slot,
        justified_streak,
        last_finalized_slot,
        current_dynasty: cs.current_dynasty,
        dynasty_start: cs.dynasty_start,
        dynasty_seed: cs.dynasty_seed,
        crosslink_records,
    };

    let pending_attestations = active
        .pending_attestations
        .iter()
        .filter(|att| att.slot >= new_last_state_recalc)
        .cloned()
        .collect();

    let new_active = ActiveState {
        pending_attestations,
        recent_block_hashes: active.recent_block_hashes.clone(),
        block_vote_cache: active.block_vote_cache.clone(),
        chain: active.chain.clone(),
    };

    (new_cs, new_active)
}
