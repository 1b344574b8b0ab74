use super::*;
use crate::hash::HashFunction;

// Standard vectors from GB/T 32905-2016 appendix A
#[test]
fn gbt_32905_vector_abc() {
    let digest = Sm3::digest(b"abc").unwrap();
    assert_eq!(
        digest.to_hex(),
        "66c7f0f462eeedd9d1f2d46bdc10e4e24167c4875cf2f7a2297da02b8f4ba8e0"
    );
}

#[test]
fn gbt_32905_vector_512_bits() {
    let msg = b"abcd".repeat(16);
    let digest = Sm3::digest(&msg).unwrap();
    assert_eq!(
        digest.to_hex(),
        "debe9ff92275b8a138604889c18e5a4d6fdb70e5387e5765293dcba39c0c5732"
    );
}

#[test]
fn empty_input() {
    let digest = Sm3::digest(b"").unwrap();
    assert_eq!(
        digest.to_hex(),
        "1ab21d8355cfa17f8e61194831e81a8f22bec8c728fefb747ed035eb5082aa2b"
    );
}

#[test]
fn incremental_update_matches_one_shot() {
    let msg = b"The quick brown fox jumps over the lazy dog";
    let one_shot = Sm3::digest(msg).unwrap();

    let mut hasher = Sm3::new();
    for chunk in msg.chunks(7) {
        hasher.update(chunk).unwrap();
    }
    assert_eq!(hasher.finalize().unwrap(), one_shot);
}

#[test]
fn cloned_state_branches_independently() {
    let mut prefix = Sm3::new();
    prefix.update(b"shared prefix ").unwrap();

    let mut left = prefix.clone();
    let mut right = prefix;
    left.update(b"left").unwrap();
    right.update(b"right").unwrap();

    let expected_left = Sm3::digest(b"shared prefix left").unwrap();
    let expected_right = Sm3::digest(b"shared prefix right").unwrap();
    assert_eq!(left.finalize().unwrap(), expected_left);
    assert_eq!(right.finalize().unwrap(), expected_right);
}

#[test]
fn multi_block_boundary_lengths() {
    // crosses the 56-byte padding boundary and the block boundary
    for len in [55usize, 56, 57, 63, 64, 65, 127, 128] {
        let msg = vec![0x61u8; len];
        let mut hasher = Sm3::new();
        hasher.update(&msg).unwrap();
        let split = Sm3::digest(&msg).unwrap();
        assert_eq!(hasher.finalize().unwrap(), split, "length {}", len);
    }
}

#[test]
fn algorithm_constants() {
    assert_eq!(Sm3::output_size(), 32);
    assert_eq!(Sm3::block_size(), 64);
    assert_eq!(Sm3::name(), "SM3");
}
