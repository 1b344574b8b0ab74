//! End-to-end signature flows through the facade crate

use gmcrypt::prelude::*;
use gmcrypt::sign::sm2::Sm2SecretKey;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

#[test]
fn one_shot_sign_and_verify() {
    let mut rng = ChaCha20Rng::seed_from_u64(100);
    let keypair = Sm2::keypair(&mut rng).unwrap();
    let pk = Sm2::public_key(&keypair);
    let sk = Sm2::secret_key(&keypair);

    let signature = Sm2::sign(b"integration message", &sk).unwrap();
    Sm2::verify(b"integration message", &signature, &pk).unwrap();
    assert!(Sm2::verify(b"wrong message", &signature, &pk).is_err());
}

#[test]
fn streaming_signer_interoperates_with_one_shot_verifier() {
    let mut rng = ChaCha20Rng::seed_from_u64(101);
    let keypair = Sm2::keypair(&mut rng).unwrap();
    let sk = Sm2::secret_key(&keypair);
    let pk = Sm2::public_key(&keypair);

    let mut signer = Sm2Signer::new(&sk, None).unwrap();
    signer.update(b"part one, ").unwrap();
    signer.update(b"part two").unwrap();
    let signature = signer.sign(&mut rng).unwrap();

    let mut verifier = Sm2Verifier::new(&pk, None).unwrap();
    verifier.update(b"part one, part two").unwrap();
    assert!(verifier.verify(signature.as_ref()));
}

#[test]
fn signer_reuse_across_messages() {
    let mut rng = ChaCha20Rng::seed_from_u64(102);
    let keypair = Sm2::keypair(&mut rng).unwrap();
    let sk = Sm2::secret_key(&keypair);
    let pk = Sm2::public_key(&keypair);

    let mut signer = Sm2Signer::new(&sk, Some(b"session-42")).unwrap();
    let mut verifier = Sm2Verifier::new(&pk, Some(b"session-42")).unwrap();

    for message in [&b"first"[..], b"second", b"third"] {
        signer.update(message).unwrap();
        let signature = signer.sign(&mut rng).unwrap();
        verifier.update(message).unwrap();
        assert!(verifier.verify(signature.as_ref()));
    }
}

#[test]
fn secret_key_round_trips_through_bytes() {
    let mut rng = ChaCha20Rng::seed_from_u64(103);
    let keypair = Sm2::keypair(&mut rng).unwrap();
    let sk = Sm2::secret_key(&keypair);
    let pk = Sm2::public_key(&keypair);

    let restored = Sm2SecretKey::from_bytes(&sk.to_bytes()).unwrap();
    let signature = Sm2::sign(b"restored key", &restored).unwrap();
    Sm2::verify(b"restored key", &signature, &pk).unwrap();
}
