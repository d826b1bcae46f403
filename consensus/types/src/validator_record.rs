use bls::PublicKey;

/// One entry of `CrystallizedState.validators` (spec §3). `start_dynasty`/
/// `end_dynasty` bound the half-open dynasty range in which this validator is
/// active; `balance` is wei-equivalent and must never go negative (invariant
/// 5).
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatorRecord {
    pub pubkey: PublicKey,
    pub balance: u64,
    pub start_dynasty: u64,
    pub end_dynasty: u64,
}

impl ValidatorRecord {
    pub fn is_active(&self, dynasty: u64) -> bool {
        self.start_dynasty <= dynasty && dynasty < self.end_dynasty
    }
}
