/// A shard paired with its ordered committee of validator indices, scheduled
/// for one slot (spec §3, `shard_and_committee_for_slots`).
#[derive(Debug, Clone, PartialEq)]
pub struct ShardAndCommittee {
    pub shard_id: u16,
    pub committee: Vec<usize>,
}
