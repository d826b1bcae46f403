//! Big-endian, fixed-width integer encoding.
//!
//! The attestation signing domain (spec step "blake(big8(slot) || ... ||
//! big2(shard_id) || ...)") is built from fixed-width big-endian integers
//! with no length prefix. These are the only two widths the state transition
//! needs.

use bytes::{BufMut, BytesMut};

pub fn int_to_bytes8(int: u64) -> Vec<u8> {
    let mut bytes = BytesMut::with_capacity(8);
    bytes.put_u64(int);
    bytes.to_vec()
}

pub fn int_to_bytes2(int: u16) -> Vec<u8> {
    let mut bytes = BytesMut::with_capacity(2);
    bytes.put_u16(int);
    bytes.to_vec()
}
