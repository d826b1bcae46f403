//! State Transition Driver (spec §4.7/§4.8): top-level orchestration —
//! pre-checks, block absorption, then every cycle/dynasty boundary the new
//! block crosses.

use crate::block_processor::process_block;
use crate::cycle_engine::initialize_new_cycle;
use crate::dynasty_engine::{compute_dynasty_transition, ready_for_dynasty_transition};
use crate::errors::StateTransitionError;
use crate::helpers::get_new_recent_block_hashes;
use bls::BlsOracle;
use log::{debug, info};
use shuffling::Shuffler;
use types::{ActiveState, Block, ChainSpec, CrystallizedState, Hash256};

/// spec §9, open question 2: a placeholder returning success unconditionally.
/// The reference enumerates four checks it does not implement; this is
/// deliberately not "fixed" here, matching that deferral.
fn validate_block_pre_processing_conditions(
    _cs: &CrystallizedState,
    _active: &ActiveState,
    _block: &Block,
    _parent_block: &Block,
) -> Result<(), StateTransitionError> {
    Ok(())
}

/// spec §4.1/§4.3: slides `active.recent_block_hashes` so it ends at
/// `block`'s slot, padding newly-skipped slots with `block.parent_hash`.
fn fill_recent_block_hashes(active: &ActiveState, parent_block: &Block, block: &Block) -> ActiveState {
    let recent_block_hashes = get_new_recent_block_hashes(
        &active.recent_block_hashes,
        parent_block.slot_number,
        block.slot_number,
        block.parent_hash,
    );

    ActiveState {
        recent_block_hashes,
        ..active.clone()
    }
}

/// Top-level orchestration: `(parent_state, parent_block, block) -> (cs,
/// active)`. The while-loop is the one piece of this function that must not
/// be simplified away: a block that skips several cycle boundaries has to
/// run every intermediate `initialize_new_cycle` (and any dynasty
/// transitions inside them) in order, not just the last one.
///
/// `block_hash` is `block`'s canonical hash, supplied by the caller —
/// threaded straight through to `process_block`'s `chain` entry.
pub fn compute_state_transition(
    cs: &CrystallizedState,
    active: &ActiveState,
    block: &Block,
    block_hash: Hash256,
    parent_block: &Block,
    bls: &impl BlsOracle,
    shuffler: &impl Shuffler,
    spec: &ChainSpec,
) -> Result<(CrystallizedState, ActiveState), StateTransitionError> {
    debug!(
        "processing block at slot {} (parent slot {})",
        block.slot_number, parent_block.slot_number
    );

    validate_block_pre_processing_conditions(cs, active, block, parent_block)?;

    let active = fill_recent_block_hashes(active, parent_block, block);
    let mut active = process_block(cs, &active, block, block_hash, parent_block, bls, spec)?;
    let mut cs = cs.clone();

    while block.slot_number >= cs.last_state_recalc + spec.cycle_length {
        info!("cycle boundary reached at last_state_recalc={}", cs.last_state_recalc);
        let (new_cs, new_active) = initialize_new_cycle(&cs, &active, block, spec);
        cs = new_cs;
        active = new_active;

        if ready_for_dynasty_transition(&cs, block, spec) {
            cs = compute_dynasty_transition(&cs, block, shuffler, spec);
        }
    }

    Ok((cs, active))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bls::FakeBlsOracle;
    use shuffling::SwapOrNotShuffler;
    use types::{CrosslinkRecord, ShardAndCommittee};

    fn spec() -> ChainSpec {
        ChainSpec {
            cycle_length: 4,
            ..ChainSpec::default()
        }
    }

    fn genesis(spec: &ChainSpec) -> (CrystallizedState, ActiveState, Block) {
        let sac = vec![ShardAndCommittee { shard_id: 0, committee: vec![] }];
        let cs = CrystallizedState {
            last_state_recalc: 0,
            shard_and_committee_for_slots: vec![sac; 2 * spec.cycle_length as usize],
            crosslink_records: vec![CrosslinkRecord::zero(); spec.shard_count as usize],
            ..CrystallizedState::default()
        };
        let active = ActiveState {
            recent_block_hashes: vec![Hash256::zero(); 2 * spec.cycle_length as usize],
            ..ActiveState::default()
        };
        let genesis_block = types::test_utils::zero_block();
        (cs, active, genesis_block)
    }

    #[test]
    fn genesis_pass_through_runs_no_cycle() {
        let spec = spec();
        let (cs, active, genesis_block) = genesis(&spec);

        let (new_cs, _new_active) = compute_state_transition(
            &cs,
            &active,
            &genesis_block,
            Hash256::repeat_byte(1),
            &genesis_block,
            &FakeBlsOracle,
            &SwapOrNotShuffler,
            &spec,
        )
        .unwrap();

        assert_eq!(new_cs.last_state_recalc, 0);
    }
}
