use crate::{AttestationRecord, Hash256};

/// spec §3. Block hashing/serialization is an external collaborator (spec
/// §1); callers are expected to compute and carry a block's canonical hash
/// alongside it (see `Chain::push`) rather than this type computing one.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub parent_hash: Hash256,
    pub slot_number: u64,
    pub attestations: Vec<AttestationRecord>,
    pub randao_reveal: Hash256,
    pub pow_chain_ref: Hash256,
    pub active_state_root: Hash256,
    pub crystallized_state_root: Hash256,
}
