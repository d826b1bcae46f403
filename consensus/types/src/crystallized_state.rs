use crate::{CrosslinkRecord, Hash256, ShardAndCommittee, ValidatorRecord};

/// The slowly-changing half of consensus state, recomputed only at cycle
/// boundaries (spec §3).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CrystallizedState {
    pub validators: Vec<ValidatorRecord>,
    pub last_state_recalc: u64,
    /// Length `2 * cycle_length` at all times (invariant 1); entry `i` is the
    /// committee schedule for slot `last_state_recalc - cycle_length + i`.
    pub shard_and_committee_for_slots: Vec<Vec<ShardAndCommittee>>,
    pub last_justified_slot: u64,
    pub justified_streak: u64,
    pub last_finalized_slot: u64,
    pub current_dynasty: u64,
    pub dynasty_start: u64,
    pub dynasty_seed: Hash256,
    /// Indexed by shard_id (invariant 4: `crosslink_records[s].dynasty <=
    /// current_dynasty` for every shard).
    pub crosslink_records: Vec<CrosslinkRecord>,
}
