use super::*;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

fn hex32(s: &str) -> [u8; 32] {
    let mut out = [0u8; 32];
    hex::decode_to_slice(s, &mut out).unwrap();
    out
}

fn point(x: &str, y: &str) -> Point {
    Point::new_uncompressed(&hex32(x), &hex32(y)).unwrap()
}

fn scalar(s: &str) -> Scalar {
    Scalar::new(hex32(s)).unwrap()
}

// 2G and 3G, computed independently
const G2_X: &str = "56cefd60d7c87c000d58ef57fa73ba4d9c0dfa08c08a7331495c2e1da3f2bd52";
const G2_Y: &str = "31b7e7e6cc8189f668535ce0f8eaf1bd6de84c182f6c8e716f780d3a970a23c3";
const G3_X: &str = "a97f7cd4b3c993b4be2daa8cdb41e24ca13f6bd945302244e26918f1d0509ebf";
const G3_Y: &str = "530b5dd88c688ef5ccc5cec08a72150f7c400ee5cd045292aaacdd037458f6e6";

#[test]
fn generator_matches_parameters() {
    let g = base_point_g();
    assert_eq!(
        g.x_coordinate_bytes(),
        gmcrypt_params::sm2::SM2.g_x,
    );
    assert_eq!(
        g.y_coordinate_bytes(),
        gmcrypt_params::sm2::SM2.g_y,
    );
    // G must also pass the curve-equation check
    Point::new_uncompressed(&g.x_coordinate_bytes(), &g.y_coordinate_bytes()).unwrap();
}

#[test]
fn double_and_add_small_multiples() {
    let g = base_point_g();
    let g2 = point(G2_X, G2_Y);
    let g3 = point(G3_X, G3_Y);

    assert_eq!(g.double(), g2);
    assert_eq!(g.add(&g), g2);
    assert_eq!(g2.add(&g), g3);
    assert_eq!(g.add(&g2), g3);
}

#[test]
fn identity_is_the_neutral_element() {
    let g = base_point_g();
    let id = Point::identity();

    assert_eq!(g.add(&id), g);
    assert_eq!(id.add(&g), g);
    assert_eq!(id.add(&id), id);
    assert_eq!(g.add(&g.negate()), id);
}

#[test]
fn scalar_multiplication_known_answer() {
    let k = scalar("1234567812345678123456781234567812345678123456781234567812345678");
    let expected = point(
        "012ce1ec6e8f4872f9e46dffd5e7faf25468f2c39c98a243de91cc36bf869688",
        "0587174e000cfa24aa0a2e70a774c1999a31fcfa1c294fb01d5c638ab8cf7f3b",
    );
    assert_eq!(scalar_mult_base_g(&k), expected);
}

#[test]
fn public_key_derivation_known_answer() {
    let d = scalar("128b2fa8bd433c6c068c8d803dff79792a519a55171b1b650c23661d15897263");
    let q = scalar_mult_base_g(&d);
    let expected = point(
        "d5548c7825cbb56150a3506cd57464af8a1ae0519dfaf3c58221dc810caf28dd",
        "921073768fe3d59ce54e79a49445cf73fed23086537027264d168946d479533e",
    );
    assert_eq!(q, expected);
}

#[test]
fn zero_and_one_scalars() {
    let g = base_point_g();
    let one = Scalar::from_bytes_reduced(&{
        let mut b = [0u8; 32];
        b[31] = 1;
        b
    });
    let zero = Scalar::from_bytes_reduced(&[0u8; 32]);

    assert_eq!(g.mul(&one), g);
    assert!(g.mul(&zero).is_identity());
}

#[test]
fn generator_has_order_n() {
    assert!(base_point_g().has_order_n());
    assert!(!Point::identity().has_order_n());
}

#[test]
fn multipliers_agree() {
    let g = base_point_g();
    let simple = SimpleMultiplier::new(g);
    let comb = FixedPointCombMultiplier::new(g);

    let mut rng = ChaCha20Rng::seed_from_u64(7);
    for _ in 0..8 {
        let (k, _) = generate_keypair(&mut rng).unwrap();
        assert_eq!(simple.multiply(&k), comb.multiply(&k));
    }

    // boundary scalars
    let one = Scalar::from_bytes_reduced(&{
        let mut b = [0u8; 32];
        b[31] = 1;
        b
    });
    assert_eq!(comb.multiply(&one), g);
}

#[test]
fn uncompressed_round_trip() {
    let g2 = point(G2_X, G2_Y);
    let encoded = g2.serialize_uncompressed();
    assert_eq!(encoded[0], 0x04);
    assert_eq!(Point::deserialize_uncompressed(&encoded).unwrap(), g2);
}

#[test]
fn compressed_round_trip_both_parities() {
    // G has even y, 2G has odd y
    let g = base_point_g();
    let g2 = point(G2_X, G2_Y);

    let cg = g.serialize_compressed();
    assert_eq!(cg[0], 0x02);
    assert_eq!(Point::deserialize_compressed(&cg).unwrap(), g);

    let cg2 = g2.serialize_compressed();
    assert_eq!(cg2[0], 0x03);
    assert_eq!(Point::deserialize_compressed(&cg2).unwrap(), g2);
}

#[test]
fn identity_wire_encoding_is_one_zero_byte() {
    let id = Point::identity();
    assert_eq!(id.encode(PointFormat::Uncompressed), [0x00]);
    assert_eq!(id.encode(PointFormat::Compressed), [0x00]);
    assert_eq!(Point::decode(&[0x00]).unwrap(), id);

    let g = base_point_g();
    assert_eq!(Point::decode(&g.encode(PointFormat::Uncompressed)).unwrap(), g);
    assert_eq!(Point::decode(&g.encode(PointFormat::Compressed)).unwrap(), g);
}

#[test]
fn off_curve_points_rejected() {
    let g = base_point_g();
    let mut bytes = g.serialize_uncompressed();
    bytes[64] ^= 0x01;
    assert!(Point::deserialize_uncompressed(&bytes).is_err());

    let mut compressed = g.serialize_compressed();
    compressed[0] = 0x05;
    assert!(Point::deserialize_compressed(&compressed).is_err());

    assert!(Point::decode(&[0x00, 0x00]).is_err());
    assert!(Point::decode(&[]).is_err());
}

#[test]
fn z_digest_known_answer() {
    let q = point(
        "d5548c7825cbb56150a3506cd57464af8a1ae0519dfaf3c58221dc810caf28dd",
        "921073768fe3d59ce54e79a49445cf73fed23086537027264d168946d479533e",
    );
    let z = compute_z(gmcrypt_params::sm2::SM2_DEFAULT_USER_ID, &q).unwrap();
    assert_eq!(
        hex::encode(z),
        "879215bd4850a48adb86915f5bac8c609939d220f55ef4e1982324da6f628a07"
    );
}

#[test]
fn z_digest_rejects_oversized_identity() {
    let q = base_point_g();
    let id = vec![0u8; 8192];
    assert!(compute_z(&id, &q).is_err());
}

#[test]
fn keypair_generation_produces_valid_keys() {
    let mut rng = ChaCha20Rng::seed_from_u64(42);
    let (d, q) = generate_keypair(&mut rng).unwrap();
    assert!(!d.is_zero());
    validate_public_key(&q).unwrap();
    assert!(validate_public_key(&Point::identity()).is_err());
}
