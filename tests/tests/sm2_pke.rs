//! End-to-end encryption flows through the facade crate

use gmcrypt::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

#[test]
fn encrypt_decrypt_through_the_trait() {
    let mut rng = ChaCha20Rng::seed_from_u64(200);
    let (pk, sk) = <Sm2Pke as Pke>::keypair(&mut rng).unwrap();

    let ciphertext = <Sm2Pke as Pke>::encrypt(&pk, b"facade round trip", None, &mut rng).unwrap();
    let plaintext = <Sm2Pke as Pke>::decrypt(&sk, &ciphertext, None).unwrap();
    assert_eq!(plaintext, b"facade round trip");
}

#[test]
fn both_orderings_interoperate_on_the_same_keypair() {
    let mut rng = ChaCha20Rng::seed_from_u64(201);
    let (pk, sk) = Sm2Pke::keypair(&mut rng).unwrap();

    let c_new = Sm2Pke::encrypt_with_mode(&pk, b"payload", CiphertextMode::C1C3C2, &mut rng).unwrap();
    let c_old = Sm2Pke::encrypt_with_mode(&pk, b"payload", CiphertextMode::C1C2C3, &mut rng).unwrap();

    assert_eq!(
        Sm2Pke::decrypt_with_mode(&sk, &c_new, CiphertextMode::C1C3C2).unwrap(),
        b"payload"
    );
    assert_eq!(
        Sm2Pke::decrypt_with_mode(&sk, &c_old, CiphertextMode::C1C2C3).unwrap(),
        b"payload"
    );
}

#[test]
fn wrong_recipient_cannot_decrypt() {
    let mut rng = ChaCha20Rng::seed_from_u64(202);
    let (pk, _) = Sm2Pke::keypair(&mut rng).unwrap();
    let (_, other_sk) = Sm2Pke::keypair(&mut rng).unwrap();

    let ciphertext = Sm2Pke::encrypt(&pk, b"for one recipient only", &mut rng).unwrap();
    assert!(Sm2Pke::decrypt(&other_sk, &ciphertext).is_err());
}

#[test]
fn large_plaintext_spans_many_kdf_blocks() {
    let mut rng = ChaCha20Rng::seed_from_u64(203);
    let (pk, sk) = Sm2Pke::keypair(&mut rng).unwrap();

    let message = vec![0xA5u8; 1000];
    let ciphertext = Sm2Pke::encrypt(&pk, &message, &mut rng).unwrap();
    assert_eq!(ciphertext.len(), Sm2Pke::output_size(message.len()));
    assert_eq!(Sm2Pke::decrypt(&sk, &ciphertext).unwrap(), message);
}
