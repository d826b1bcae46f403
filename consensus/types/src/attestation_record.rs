use crate::Hash256;
use bls::AggregateSignature;

/// Packed bit vector, MSB-first within each byte, indexed by position within
/// a committee (spec §4.1, Glossary). Represented as plain bytes rather than
/// a growable bit-vector type: every bitfield here has a length fixed in
/// advance by `get_bitfield_length`, so the richer `BooleanBitfield`
/// abstraction the teacher workspace evolved into isn't needed.
pub type Bitfield = Vec<u8>;

/// One attester's vote, as carried inside a `Block` (spec §3).
#[derive(Debug, Clone, PartialEq)]
pub struct AttestationRecord {
    pub slot: u64,
    pub shard_id: u16,
    pub oblique_parent_hashes: Vec<Hash256>,
    pub shard_block_hash: Hash256,
    pub attester_bitfield: Bitfield,
    pub justified_slot: u64,
    pub justified_block_hash: Hash256,
    pub aggregate_sig: AggregateSignature,
}
