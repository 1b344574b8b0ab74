use super::*;
use gmcrypt_params::sm2::SM2_DEFAULT_USER_ID;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

fn hex32(s: &str) -> [u8; 32] {
    let mut out = [0u8; 32];
    hex::decode_to_slice(s, &mut out).unwrap();
    out
}

// GB/T 32918.5 key exchange example
const D_A: &str = "81eb26e941bb5af16df116495f90695272ae2cd63d6c4ae1678418be48230029";
const D_B: &str = "785129917d45a9ea5437a59356b82338eaadda6ceb199088f14ae10defa229b5";
const R_A: &str = "d4de15474db74d06491c440d305e012400990f3e390c7e87153c12db2ea60bb3";
const R_B: &str = "7e07124814b309489125eaed101113164ebf0f3458c5bd88335c1f9d596243d6";

const K_16: &str = "6c89347354de2484c60b4ab1fde4c6e5";
const TAG_TO_INITIATOR: &str =
    "d3a0fe15dee185ceae907a6b595cc32a266ed7b3367e9983a896dc32fa20f8eb";
const TAG_TO_RESPONDER: &str =
    "18c7894b3816df16cf07b05c5ec0bef5d655d58f779cc1b400a4f3884644db88";

fn standard_parties() -> (Sm2ExchangeParty, Sm2ExchangeParty) {
    let initiator = Sm2ExchangeParty::new(
        Role::Initiator,
        &hex32(D_A),
        &hex32(R_A),
        SM2_DEFAULT_USER_ID,
    )
    .unwrap();
    let responder = Sm2ExchangeParty::new(
        Role::Responder,
        &hex32(D_B),
        &hex32(R_B),
        SM2_DEFAULT_USER_ID,
    )
    .unwrap();
    (initiator, responder)
}

#[test]
fn standard_vector_public_points() {
    let (initiator, responder) = standard_parties();
    let pub_a = initiator.public();
    let pub_b = responder.public();

    assert_eq!(
        hex::encode(pub_a.static_point()),
        "04160e12897df4edb61dd812feb96748fbd3ccf4ffe26aa6f6db9540af49c942324a7dad08bb9a459531694beb20aa489d6649975e1bfcf8c4741b78b4b223007f"
    );
    assert_eq!(
        hex::encode(pub_b.static_point()),
        "046ae848c57c53c7b1b5fa99eb2286af078ba64c64591b8b566f7357d576f16dfbee489d771621a27b36c5c7992062e9cd09a9264386f3fbea54dff69305621c4d"
    );
    assert_eq!(
        hex::encode(pub_a.ephemeral_point()),
        "0464ced1bdbc99d590049b434d0fd73428cf608a5db8fe5ce07f15026940bae40e376629c7ab21e7db260922499ddb118f07ce8eaae3e7720afef6a5cc062070c0"
    );
    assert_eq!(
        hex::encode(pub_b.ephemeral_point()),
        "04acc27688a6f7b706098bc91ff3ad1bff7dc2802cdb14ccccdb0a90471f9bd7072fedac0494b2ffc4d6853876c79b8f301c6573ad0aa50f39fc87181e1a1b46fe"
    );
}

#[test]
fn standard_vector_session_key_and_tags() {
    let (initiator, responder) = standard_parties();

    let secret_a = initiator.derive(&responder.public(), 16).unwrap();
    let secret_b = responder.derive(&initiator.public(), 16).unwrap();

    assert_eq!(hex::encode(secret_a.outbound_tag()), TAG_TO_RESPONDER);
    assert_eq!(hex::encode(secret_b.outbound_tag()), TAG_TO_INITIATOR);

    assert!(secret_a.verify_inbound(secret_b.outbound_tag()));
    assert!(secret_b.verify_inbound(secret_a.outbound_tag()));

    let tag_a = *secret_a.outbound_tag();
    let tag_b = *secret_b.outbound_tag();
    let key_a = secret_a.confirm(&tag_b).unwrap();
    let key_b = secret_b.confirm(&tag_a).unwrap();
    assert_eq!(hex::encode(&*key_a), K_16);
    assert_eq!(hex::encode(&*key_b), K_16);
}

#[test]
fn standard_vector_longer_keys() {
    let (initiator, responder) = standard_parties();

    let secret_a = initiator.derive(&responder.public(), 32).unwrap();
    let secret_b = responder.derive(&initiator.public(), 32).unwrap();
    let key = secret_a.confirm(secret_b.outbound_tag()).unwrap();
    assert_eq!(
        hex::encode(&*key),
        "6c89347354de2484c60b4ab1fde4c6e579391a21fa6cb72ae8754ec21ad8b703"
    );

    let secret_a = initiator.derive(&responder.public(), 48).unwrap();
    let secret_b = responder.derive(&initiator.public(), 48).unwrap();
    let key = secret_a.confirm(secret_b.outbound_tag()).unwrap();
    assert_eq!(
        hex::encode(&*key),
        "6c89347354de2484c60b4ab1fde4c6e579391a21fa6cb72ae8754ec21ad8b703\
         4692f6ba1fa89d3cf33128f1a9028710"
    );
}

#[test]
fn fresh_keys_agree() {
    let mut rng = ChaCha20Rng::seed_from_u64(21);
    let initiator = Sm2ExchangeParty::generate(Role::Initiator, b"alice", &mut rng).unwrap();
    let responder = Sm2ExchangeParty::generate(Role::Responder, b"bob", &mut rng).unwrap();

    let secret_a = initiator.derive(&responder.public(), 32).unwrap();
    let secret_b = responder.derive(&initiator.public(), 32).unwrap();

    let tag_a = *secret_a.outbound_tag();
    let tag_b = *secret_b.outbound_tag();
    let key_a = secret_a.confirm(&tag_b).unwrap();
    let key_b = secret_b.confirm(&tag_a).unwrap();
    assert_eq!(*key_a, *key_b);
}

#[test]
fn tampered_tag_rejected() {
    let (initiator, responder) = standard_parties();
    let secret_a = initiator.derive(&responder.public(), 16).unwrap();
    let secret_b = responder.derive(&initiator.public(), 16).unwrap();

    let mut tag = *secret_b.outbound_tag();
    tag[0] ^= 0x01;
    assert!(!secret_a.verify_inbound(&tag));
    assert!(!secret_a.verify_inbound(&tag[..16]));
    assert!(!secret_a.verify_inbound(secret_a.outbound_tag()));

    // the key never leaves a secret whose confirmation failed
    assert!(secret_a.confirm(&tag).is_err());
}

#[test]
fn tampered_ephemeral_point_breaks_agreement() {
    let (initiator, responder) = standard_parties();
    let mut peer = responder.public();

    // replace the ephemeral point with a different valid point
    let replacement = *peer.static_point();
    peer.ephemeral_point = replacement;
    let secret_a = initiator.derive(&peer, 16).unwrap();
    let secret_b = responder.derive(&initiator.public(), 16).unwrap();
    assert!(!secret_a.verify_inbound(secret_b.outbound_tag()));
    assert!(secret_a.confirm(secret_b.outbound_tag()).is_err());
}

#[test]
fn invalid_peer_material_rejected() {
    let (initiator, responder) = standard_parties();

    let mut off_curve = responder.public();
    off_curve.static_point[64] ^= 0x01;
    assert!(initiator.derive(&off_curve, 16).is_err());

    let mut identity_eph = responder.public();
    identity_eph.ephemeral_point = [0u8; 65];
    assert!(initiator.derive(&identity_eph, 16).is_err());

    // zero-length session keys are meaningless
    assert!(initiator.derive(&responder.public(), 0).is_err());
}

#[test]
fn exchange_message_layout() {
    let (initiator, _) = standard_parties();
    let bundle = initiator.public();
    let encoded = bundle.encode();

    // static point, ephemeral point, ENTL in bits, identity
    assert_eq!(&encoded[..65], bundle.static_point());
    assert_eq!(&encoded[65..130], bundle.ephemeral_point());
    let entl = u16::from_be_bytes([encoded[130], encoded[131]]) as usize;
    assert_eq!(entl, bundle.id().len() * 8);
    assert_eq!(&encoded[132..], bundle.id());
}

#[test]
fn exchange_message_round_trip() {
    let (initiator, _) = standard_parties();
    let bundle = initiator.public();
    let encoded = bundle.encode();
    assert_eq!(Sm2ExchangePublic::decode(&encoded).unwrap(), bundle);

    assert!(Sm2ExchangePublic::decode(&encoded[..encoded.len() - 1]).is_err());
    assert!(Sm2ExchangePublic::decode(&[]).is_err());

    // an ENTL that is not a multiple of eight bits cannot be an identity
    let mut crooked = encoded.clone();
    crooked[131] ^= 0x01;
    assert!(Sm2ExchangePublic::decode(&crooked).is_err());
}

#[test]
fn degenerate_own_keys_rejected() {
    assert!(Sm2ExchangeParty::new(
        Role::Initiator,
        &[0u8; 32],
        &hex32(R_A),
        SM2_DEFAULT_USER_ID
    )
    .is_err());
}
