/// Tunable consensus constants (spec §6). Threaded by reference through every
/// component rather than hard-coded, the way the teacher workspace's
/// `ChainSpec` is threaded through `state_processing`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainSpec {
    /// Slots per cycle; the reference value is 64.
    pub cycle_length: u64,
    /// Minimum slots before a dynasty may rotate.
    pub min_dynasty_length: u64,
    /// Total shard count; bounds `crosslink_records`' length.
    pub shard_count: u64,
    /// Base scaling factor for FFG/crosslink rewards.
    pub base_reward_quotient: u64,
    /// Numerator of the quadratic leak penalty.
    pub sqrt_e_drop_time: u64,
    /// Denominator of the quadratic leak penalty;
    /// `sqrt_e_drop_time / slot_duration` must be an exact integer.
    pub slot_duration: u64,
    /// Standard deposit size. Used only by genesis, never read by the core;
    /// carried here for completeness per spec §6.
    pub deposit_size: u64,
}

impl ChainSpec {
    pub const WEI_PER_ETH: u64 = 1_000_000_000_000_000_000;
    pub const ZERO_HASH32: [u8; 32] = [0u8; 32];
}

impl Default for ChainSpec {
    fn default() -> Self {
        ChainSpec {
            cycle_length: 64,
            min_dynasty_length: 256,
            shard_count: 1024,
            base_reward_quotient: 5,
            sqrt_e_drop_time: 65_536,
            slot_duration: 8,
            deposit_size: 32,
        }
    }
}
