//! Data model for the beacon-chain state transition core (spec §3).
//!
//! This crate carries no logic — every operation on these types lives in
//! `state_transition`, mirroring the teacher workspace's split between
//! `consensus/types` (data + encoding) and `consensus/state_processing`
//! (logic). Encoding is out of scope here too (spec §1: "block serialization
//! and hashing codec" is an external collaborator).

pub mod active_state;
pub mod attestation_record;
pub mod block;
pub mod chain;
pub mod config;
pub mod crosslink_record;
pub mod crystallized_state;
pub mod shard_and_committee;
pub mod test_utils;
pub mod validator_record;
pub mod vote_cache;

pub use active_state::ActiveState;
pub use attestation_record::{AttestationRecord, Bitfield};
pub use block::Block;
pub use chain::Chain;
pub use config::ChainSpec;
pub use crosslink_record::CrosslinkRecord;
pub use crystallized_state::CrystallizedState;
pub use shard_and_committee::ShardAndCommittee;
pub use validator_record::ValidatorRecord;
pub use vote_cache::{BlockVoteCache, VoteCacheEntry};

pub type Hash256 = ethereum_types::H256;
