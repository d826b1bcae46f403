use crate::{Block, Hash256};

/// Append-only sequence of blocks with a `head` pointer (spec §3). Block
/// hashing lives outside the core (spec §1), so entries are keyed by a hash
/// the caller supplies rather than one this type derives.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Chain {
    entries: Vec<(Hash256, Block)>,
    pub head: Option<Hash256>,
}

impl Chain {
    pub fn new() -> Self {
        Chain::default()
    }

    pub fn push(&mut self, hash: Hash256, block: Block) {
        self.head = Some(hash);
        self.entries.push((hash, block));
    }

    pub fn get_block_by_hash(&self, hash: &Hash256) -> Option<&Block> {
        self.entries
            .iter()
            .find(|(h, _)| h == hash)
            .map(|(_, block)| block)
    }

    pub fn get_block_by_slot_number(&self, slot: u64) -> Option<&Block> {
        self.entries
            .iter()
            .find(|(_, block)| block.slot_number == slot)
            .map(|(_, block)| block)
    }

    /// Returns the hash associated with a block, if it is part of the chain.
    pub fn hash_of(&self, block: &Block) -> Option<Hash256> {
        self.entries
            .iter()
            .find(|(_, b)| b == block)
            .map(|(h, _)| *h)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::zero_block;

    #[test]
    fn lookup_by_hash_and_slot() {
        let mut chain = Chain::new();
        let hash = Hash256::repeat_byte(7);
        let mut block = zero_block();
        block.slot_number = 3;
        chain.push(hash, block.clone());

        assert_eq!(chain.get_block_by_hash(&hash), Some(&block));
        assert_eq!(chain.get_block_by_slot_number(3), Some(&block));
        assert_eq!(chain.get_block_by_slot_number(4), None);
        assert_eq!(chain.head, Some(hash));
    }
}
