use crate::Hash256;
use std::collections::{HashMap, HashSet};

/// `ActiveState.block_vote_cache` (spec §3, §9): a mapping from block hash to
/// the set of validators that have voted for it and their combined deposits.
/// Invariant 6: `voter_indices` is always a subset of active validators and
/// `total_voter_deposits` always equals the sum of their balances at the time
/// they were added.
pub type BlockVoteCache = HashMap<Hash256, VoteCacheEntry>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VoteCacheEntry {
    pub voter_indices: HashSet<usize>,
    pub total_voter_deposits: u64,
}
