use crate::Hash256;

/// The latest committee-confirmed shard-block hash for one shard
/// (spec §3, `crosslink_records`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrosslinkRecord {
    pub dynasty: u64,
    pub slot: u64,
    pub hash: Hash256,
}

impl CrosslinkRecord {
    pub fn zero() -> Self {
        CrosslinkRecord {
            dynasty: 0,
            slot: 0,
            hash: Hash256::zero(),
        }
    }
}
