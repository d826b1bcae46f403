//! End-to-end scenarios for the beacon-chain state transition core. Each
//! fixture is built by hand (no codec, per the crate's scope) and exercises
//! either the full driver or the specific component the scenario is about.

use bls::{FakeBlsOracle, PublicKey};
use shuffling::SwapOrNotShuffler;
use state_transition::cycle_engine::initialize_new_cycle;
use state_transition::driver::compute_state_transition;
use state_transition::helpers::{get_signed_parent_hashes, int_sqrt};
use state_transition::reward_engine::calculate_ffg_rewards;
use types::{
    ActiveState, AttestationRecord, Block, ChainSpec, CrosslinkRecord, CrystallizedState, Hash256,
    ShardAndCommittee, ValidatorRecord,
};

fn test_spec() -> ChainSpec {
    ChainSpec {
        cycle_length: 4,
        min_dynasty_length: 10,
        shard_count: 8,
        base_reward_quotient: 5,
        sqrt_e_drop_time: 64,
        slot_duration: 8,
        deposit_size: 32,
    }
}

fn validator(balance: u64) -> ValidatorRecord {
    ValidatorRecord {
        pubkey: PublicKey::zero(),
        balance,
        start_dynasty: 0,
        end_dynasty: u64::MAX,
    }
}

fn schedule_one_shard_per_slot(spec: &ChainSpec, committee: Vec<usize>) -> Vec<Vec<ShardAndCommittee>> {
    let sac = vec![ShardAndCommittee {
        shard_id: 0,
        committee,
    }];
    vec![sac; 2 * spec.cycle_length as usize]
}

fn genesis_block() -> Block {
    types::test_utils::zero_block()
}

// Scenario 1: genesis pass-through.
#[test]
fn genesis_pass_through() {
    let spec = test_spec();
    let cs = CrystallizedState {
        last_state_recalc: 0,
        shard_and_committee_for_slots: schedule_one_shard_per_slot(&spec, vec![0]),
        validators: vec![validator(spec.deposit_size)],
        crosslink_records: vec![CrosslinkRecord::zero(); spec.shard_count as usize],
        ..CrystallizedState::default()
    };
    let active = ActiveState {
        recent_block_hashes: vec![Hash256::zero(); 2 * spec.cycle_length as usize],
        ..ActiveState::default()
    };
    let genesis = genesis_block();

    let (new_cs, _new_active) = compute_state_transition(
        &cs,
        &active,
        &genesis,
        Hash256::repeat_byte(1),
        &genesis,
        &FakeBlsOracle,
        &SwapOrNotShuffler,
        &spec,
    )
    .expect("genesis block is always valid");

    assert_eq!(new_cs.last_state_recalc, 0);
    assert_eq!(new_cs.crosslink_records, cs.crosslink_records);
}

// Scenario 2: a single attestation absorbs into the vote cache.
#[test]
fn single_attestation_absorbs_into_cache() {
    let spec = test_spec();
    let cs = CrystallizedState {
        last_state_recalc: 0,
        shard_and_committee_for_slots: schedule_one_shard_per_slot(&spec, vec![0]),
        validators: vec![validator(spec.deposit_size)],
        crosslink_records: vec![CrosslinkRecord::zero(); spec.shard_count as usize],
        ..CrystallizedState::default()
    };
    let active = ActiveState {
        recent_block_hashes: vec![Hash256::zero(); 2 * spec.cycle_length as usize],
        ..ActiveState::default()
    };
    let genesis = genesis_block();
    let genesis_hash = Hash256::repeat_byte(1);

    // Seed the chain with genesis first, as the real driver would.
    let (cs1, active1) = compute_state_transition(
        &cs,
        &active,
        &genesis,
        genesis_hash,
        &genesis,
        &FakeBlsOracle,
        &SwapOrNotShuffler,
        &spec,
    )
    .unwrap();

    let mut block1 = genesis_block();
    block1.slot_number = 1;

    // Block at slot 1 carries the proposer's own attestation over slot 0,
    // the same shard/committee scheduled for every slot in this fixture.
    // Signed over the recent-hashes window as the driver will see it, i.e.
    // after `fill_recent_block_hashes` slides the window to end at block1.
    let justified_block_hash = active1.chain.hash_of(&genesis).unwrap();
    let shifted_hashes = state_transition::helpers::get_new_recent_block_hashes(
        &active1.recent_block_hashes,
        genesis.slot_number,
        block1.slot_number,
        block1.parent_hash,
    );
    let active1_shifted = ActiveState {
        recent_block_hashes: shifted_hashes,
        ..active1.clone()
    };
    let parent_hashes = get_signed_parent_hashes(&active1_shifted, &block1, 0, &[], &spec);

    let mut message = Vec::new();
    message.extend_from_slice(&int_to_bytes::int_to_bytes8(0));
    for h in &parent_hashes {
        message.extend_from_slice(h.as_bytes());
    }
    message.extend_from_slice(&int_to_bytes::int_to_bytes2(0));
    message.extend_from_slice(Hash256::zero().as_bytes());
    message.extend_from_slice(&int_to_bytes::int_to_bytes8(0));
    let digest = eth2_hashing::hash(&message);
    let sig = FakeBlsOracle::fake_aggregate_sign(&digest, &[cs1.validators[0].pubkey.clone()]);

    let attestation = AttestationRecord {
        slot: 0,
        shard_id: 0,
        oblique_parent_hashes: vec![],
        shard_block_hash: Hash256::zero(),
        attester_bitfield: vec![0b1000_0000],
        justified_slot: 0,
        justified_block_hash,
        aggregate_sig: sig,
    };
    block1.attestations = vec![attestation];

    let (_cs2, active2) = compute_state_transition(
        &cs1,
        &active1,
        &block1,
        Hash256::repeat_byte(2),
        &genesis,
        &FakeBlsOracle,
        &SwapOrNotShuffler,
        &spec,
    )
    .expect("proposer attestation should validate");

    let entry = active2
        .block_vote_cache
        .get(&Hash256::zero())
        .expect("parent hash should have an entry");
    assert_eq!(entry.voter_indices, [0usize].into_iter().collect());
    assert_eq!(entry.total_voter_deposits, spec.deposit_size);
}

// Scenario 3/4: full-participation justification, then finality once the
// streak has held for an entire extra cycle.
#[test]
fn justification_then_finality_under_unanimous_voting() {
    let spec = test_spec();
    let validators = vec![validator(100), validator(100), validator(100)];
    let total = 300u64;

    let mut cs = CrystallizedState {
        last_state_recalc: spec.cycle_length,
        validators,
        shard_and_committee_for_slots: schedule_one_shard_per_slot(&spec, vec![]),
        crosslink_records: vec![CrosslinkRecord::zero(); spec.shard_count as usize],
        ..CrystallizedState::default()
    };

    let run_unanimous_cycle = |cs: &CrystallizedState| -> CrystallizedState {
        let hashes: Vec<Hash256> = (0..spec.cycle_length).map(Hash256::from_low_u64_be).collect();
        let mut recent_block_hashes = vec![Hash256::zero(); 2 * spec.cycle_length as usize];
        recent_block_hashes[..hashes.len()].copy_from_slice(&hashes);

        let mut active = ActiveState {
            recent_block_hashes,
            ..ActiveState::default()
        };
        for h in &hashes {
            active.block_vote_cache.insert(
                *h,
                types::VoteCacheEntry {
                    voter_indices: (0..cs.validators.len()).collect(),
                    total_voter_deposits: total,
                },
            );
        }

        let mut block = genesis_block();
        block.slot_number = cs.last_state_recalc;
        let (new_cs, _) = initialize_new_cycle(cs, &active, &block, &spec);
        new_cs
    };

    // Cycle 1: streak builds to cycle_length, nothing finalizes yet.
    cs = run_unanimous_cycle(&cs);
    assert_eq!(cs.last_justified_slot, spec.cycle_length - 1);
    assert_eq!(cs.justified_streak, spec.cycle_length);
    assert_eq!(cs.last_finalized_slot, 0);

    // Cycle 2: streak crosses cycle_length + 1 partway through.
    let finalized_after_cycle_2 = {
        cs = run_unanimous_cycle(&cs);
        cs.last_finalized_slot
    };
    assert!(finalized_after_cycle_2 > 0);

    // Cycle 3: the whole cycle now runs with an already-overdue streak, so
    // finality advances by exactly one cycle_length.
    cs = run_unanimous_cycle(&cs);
    assert_eq!(cs.last_finalized_slot - finalized_after_cycle_2, spec.cycle_length);
}

// Scenario 5: crosslink promotion when 2/3+ of a shard's committee agrees.
#[test]
fn crosslink_promotion() {
    let spec = test_spec();
    let committee = vec![0usize, 1, 2];
    let cs = CrystallizedState {
        last_state_recalc: spec.cycle_length,
        validators: vec![validator(100), validator(100), validator(100)],
        shard_and_committee_for_slots: schedule_one_shard_per_slot(&spec, committee),
        current_dynasty: 1,
        crosslink_records: vec![CrosslinkRecord::zero(); spec.shard_count as usize],
        ..CrystallizedState::default()
    };

    let shard_block_hash = Hash256::repeat_byte(0x42);
    let attestation = AttestationRecord {
        slot: 0,
        shard_id: 0,
        oblique_parent_hashes: vec![],
        shard_block_hash,
        attester_bitfield: vec![0b1110_0000],
        justified_slot: 0,
        justified_block_hash: Hash256::zero(),
        aggregate_sig: bls::AggregateSignature::zero(),
    };

    let active = ActiveState {
        recent_block_hashes: vec![Hash256::zero(); 2 * spec.cycle_length as usize],
        pending_attestations: vec![attestation],
        ..ActiveState::default()
    };
    let mut block = genesis_block();
    block.slot_number = spec.cycle_length;

    let (new_cs, _) = initialize_new_cycle(&cs, &active, &block, &spec);

    let crosslink = &new_cs.crosslink_records[0];
    assert_eq!(crosslink.dynasty, cs.current_dynasty);
    assert_eq!(crosslink.hash, shard_block_hash);
    assert_eq!(crosslink.slot, cs.last_state_recalc + spec.cycle_length);
}

// Scenario 6: quadratic leak under prolonged non-finality and zero
// participation.
#[test]
fn quadratic_leak_penalizes_nonparticipants() {
    let spec = test_spec();
    let balance = 4_000_000_000_000_000_000u64; // 4 ETH-equivalent
    let cs = CrystallizedState {
        last_state_recalc: spec.cycle_length,
        validators: vec![validator(balance)],
        last_finalized_slot: 0,
        shard_and_committee_for_slots: schedule_one_shard_per_slot(&spec, vec![0]),
        crosslink_records: vec![CrosslinkRecord::zero(); spec.shard_count as usize],
        ..CrystallizedState::default()
    };
    let active = ActiveState {
        recent_block_hashes: vec![Hash256::zero(); 2 * spec.cycle_length as usize],
        ..ActiveState::default()
    };

    let time_since_finality = 4 * spec.cycle_length; // past the 3*cycle_length cutoff
    let mut block = genesis_block();
    block.slot_number = cs.last_finalized_slot + time_since_finality;

    let deltas = calculate_ffg_rewards(&cs, &active, &block, &spec);

    let reward_quotient = spec.base_reward_quotient * int_sqrt(balance / ChainSpec::WEI_PER_ETH);
    let quadratic_penalty_quotient = (spec.sqrt_e_drop_time / spec.slot_duration).pow(2);
    let leak = (balance as u128 * time_since_finality as u128 / quadratic_penalty_quotient as u128) as i64;
    let per_slot_delta = -((balance / reward_quotient) as i64) - leak;
    let expected_total = per_slot_delta * spec.cycle_length as i64;

    assert_eq!(deltas[0], expected_total);
    assert!(deltas[0] < 0);
}
