use crate::{AttestationRecord, BlockVoteCache, Chain, Hash256};

/// The fast-changing half of consensus state, updated every block (spec §3).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActiveState {
    pub pending_attestations: Vec<AttestationRecord>,
    /// Sliding window of length `2 * cycle_length`, ending at the parent
    /// block's slot (invariant 2).
    pub recent_block_hashes: Vec<Hash256>,
    pub block_vote_cache: BlockVoteCache,
    pub chain: Chain,
}
