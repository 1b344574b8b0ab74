//! End-to-end key exchange flows through the facade crate

use gmcrypt::kex::sm2::Sm2ExchangePublic;
use gmcrypt::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

#[test]
fn full_exchange_with_confirmation() {
    let mut rng = ChaCha20Rng::seed_from_u64(300);
    let alice = Sm2ExchangeParty::generate(Role::Initiator, b"alice@example.com", &mut rng).unwrap();
    let bob = Sm2ExchangeParty::generate(Role::Responder, b"bob@example.com", &mut rng).unwrap();

    // the bundles travel over the wire
    let alice_msg = alice.public().encode();
    let bob_msg = bob.public().encode();

    let alice_secret = alice
        .derive(&Sm2ExchangePublic::decode(&bob_msg).unwrap(), 32)
        .unwrap();
    let bob_secret = bob
        .derive(&Sm2ExchangePublic::decode(&alice_msg).unwrap(), 32)
        .unwrap();

    // the two directions use distinct tags
    let alice_tag = *alice_secret.outbound_tag();
    let bob_tag = *bob_secret.outbound_tag();
    assert_ne!(alice_tag, bob_tag);

    // keys are released only through confirmation
    let alice_key = alice_secret.confirm(&bob_tag).unwrap();
    let bob_key = bob_secret.confirm(&alice_tag).unwrap();
    assert_eq!(*alice_key, *bob_key);
}

#[test]
fn derived_key_feeds_symmetric_use() {
    let mut rng = ChaCha20Rng::seed_from_u64(301);
    let alice = Sm2ExchangeParty::generate(Role::Initiator, b"alice", &mut rng).unwrap();
    let bob = Sm2ExchangeParty::generate(Role::Responder, b"bob", &mut rng).unwrap();

    for key_len in [16usize, 24, 32, 64, 100] {
        let a = alice.derive(&bob.public(), key_len).unwrap();
        let b = bob.derive(&alice.public(), key_len).unwrap();
        let tag_a = *a.outbound_tag();
        let key_a = a.confirm(b.outbound_tag()).unwrap();
        let key_b = b.confirm(&tag_a).unwrap();
        assert_eq!(key_a.len(), key_len);
        assert_eq!(*key_a, *key_b);
    }
}

#[test]
fn mismatched_identity_detected_at_confirmation() {
    let mut rng = ChaCha20Rng::seed_from_u64(302);
    let alice = Sm2ExchangeParty::generate(Role::Initiator, b"alice", &mut rng).unwrap();
    let bob = Sm2ExchangeParty::generate(Role::Responder, b"bob", &mut rng).unwrap();

    let genuine = alice.derive(&bob.public(), 32).unwrap();
    let bob_secret = bob.derive(&alice.public(), 32).unwrap();

    // an attacker relabelling bob's bundle desynchronizes the Z digests;
    // the first identity byte sits after both points and the ENTL prefix
    let mut forged = bob.public().encode();
    forged[132] ^= 0x01;
    let forged = Sm2ExchangePublic::decode(&forged).unwrap();
    let attacked = alice.derive(&forged, 32).unwrap();

    assert!(genuine.verify_inbound(bob_secret.outbound_tag()));
    assert!(!attacked.verify_inbound(bob_secret.outbound_tag()));
    assert!(attacked.confirm(bob_secret.outbound_tag()).is_err());
}
