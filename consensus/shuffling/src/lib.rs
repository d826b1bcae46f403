//! Committee reshuffling (spec §6, "Shuffler"). The core only requires
//! determinism and the specified shape from this oracle (spec §9: "Committee
//! rotation is delegated; the core only requires determinism and the
//! specified shape"), so the split across shards/committees below is one
//! valid choice among many, not a reproduction of any particular reference
//! implementation's exact committee-size heuristics.
//!
//! The index permutation itself follows the swap-or-not construction the
//! teacher workspace names `consensus/swap_or_not_shuffle`: a small number of
//! rounds, each computing a pivot and a per-index "flip" bit from the hash
//! oracle, so the whole permutation is a pure function of `seed`.

use eth2_hashing::hash;
use types::{ChainSpec, Hash256, ShardAndCommittee, ValidatorRecord};

const SHUFFLE_ROUND_COUNT: u8 = 90;

/// Permute a single index into a list of length `index_count`, seeded by
/// `seed`. Repeatedly applying this to every index in `0..index_count`
/// yields a full permutation.
fn shuffled_index(input_index: usize, index_count: usize, seed: &Hash256) -> usize {
    if index_count <= 1 {
        return input_index;
    }

    let mut index = input_index;
    for round in 0..SHUFFLE_ROUND_COUNT {
        let pivot = {
            let mut preimage = seed.as_bytes().to_vec();
            preimage.push(round);
            let digest = hash(&preimage);
            let mut buf = [0u8; 8];
            buf.copy_from_slice(&digest[0..8]);
            (u64::from_le_bytes(buf) as usize) % index_count
        };
        let flip = (pivot + index_count - index % index_count) % index_count;
        let position = index.max(flip);

        let source_byte = {
            let mut preimage = seed.as_bytes().to_vec();
            preimage.push(round);
            preimage.extend_from_slice(&((position / 256) as u32).to_le_bytes());
            let digest = hash(&preimage);
            digest[(position % 256) / 8]
        };
        let bit = (source_byte >> (position % 8)) & 1;
        if bit == 1 {
            index = flip;
        }
    }
    index
}

fn active_validator_indices(dynasty: u64, validators: &[ValidatorRecord]) -> Vec<usize> {
    validators
        .iter()
        .enumerate()
        .filter_map(|(i, v)| if v.is_active(dynasty) { Some(i) } else { None })
        .collect()
}

/// `get_new_shuffling(seed, validators, dynasty, start_shard) -> sequence of
/// length cycle_length` (spec §6). One committee per slot, shards assigned
/// round-robin from `start_shard`.
pub trait Shuffler {
    fn get_new_shuffling(
        &self,
        seed: Hash256,
        validators: &[ValidatorRecord],
        dynasty: u64,
        start_shard: u64,
        spec: &ChainSpec,
    ) -> Vec<Vec<ShardAndCommittee>>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SwapOrNotShuffler;

impl Shuffler for SwapOrNotShuffler {
    fn get_new_shuffling(
        &self,
        seed: Hash256,
        validators: &[ValidatorRecord],
        dynasty: u64,
        start_shard: u64,
        spec: &ChainSpec,
    ) -> Vec<Vec<ShardAndCommittee>> {
        let active = active_validator_indices(dynasty, validators);
        let index_count = active.len();

        let shuffled: Vec<usize> = (0..index_count)
            .map(|i| active[shuffled_index(i, index_count.max(1), &seed)])
            .collect();

        let cycle_length = spec.cycle_length as usize;
        (0..cycle_length)
            .map(|slot_index| {
                let committee = if index_count == 0 {
                    vec![]
                } else {
                    let start = index_count * slot_index / cycle_length;
                    let end = index_count * (slot_index + 1) / cycle_length;
                    shuffled[start..end].to_vec()
                };
                let shard_id = ((start_shard as usize + slot_index) % spec.shard_count as usize) as u16;
                vec![ShardAndCommittee { shard_id, committee }]
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bls::PublicKey;

    fn make_validators(n: usize) -> Vec<ValidatorRecord> {
        (0..n)
            .map(|_| ValidatorRecord {
                pubkey: PublicKey::zero(),
                balance: 32_000_000_000,
                start_dynasty: 0,
                end_dynasty: u64::MAX,
            })
            .collect()
    }

    #[test]
    fn shape_matches_cycle_length() {
        let spec = ChainSpec::default();
        let validators = make_validators(200);
        let shuffling =
            SwapOrNotShuffler.get_new_shuffling(Hash256::zero(), &validators, 0, 0, &spec);
        assert_eq!(shuffling.len(), spec.cycle_length as usize);
    }

    #[test]
    fn deterministic_in_its_inputs() {
        let spec = ChainSpec::default();
        let validators = make_validators(200);
        let a = SwapOrNotShuffler.get_new_shuffling(Hash256::repeat_byte(9), &validators, 1, 3, &spec);
        let b = SwapOrNotShuffler.get_new_shuffling(Hash256::repeat_byte(9), &validators, 1, 3, &spec);
        assert_eq!(a, b);
    }

    #[test]
    fn every_active_validator_is_scheduled_exactly_once() {
        let spec = ChainSpec::default();
        let validators = make_validators(130);
        let shuffling =
            SwapOrNotShuffler.get_new_shuffling(Hash256::repeat_byte(4), &validators, 0, 0, &spec);
        let mut seen: Vec<usize> = shuffling
            .iter()
            .flat_map(|slot| slot.iter().flat_map(|sac| sac.committee.clone()))
            .collect();
        seen.sort_unstable();
        let expected: Vec<usize> = (0..130).collect();
        assert_eq!(seen, expected);
    }
}
