//! Fixture builders. **Never used for production purposes.**

use crate::{Block, Hash256};

pub fn zero_block() -> Block {
    Block {
        parent_hash: Hash256::zero(),
        slot_number: 0,
        attestations: vec![],
        randao_reveal: Hash256::zero(),
        pow_chain_ref: Hash256::zero(),
        active_state_root: Hash256::zero(),
        crystallized_state_root: Hash256::zero(),
    }
}
