//! SM2 curve domain parameters (GB/T 32918.5)
//!
//! The recommended 256-bit prime-field curve y² = x³ + ax + b with a ≡ −3
//! (mod p) and cofactor 1. All byte arrays are big-endian.

/// Size of an SM2 field element in bytes
pub const SM2_FIELD_ELEMENT_SIZE: usize = 32;

/// Size of an SM2 scalar in bytes
pub const SM2_SCALAR_SIZE: usize = 32;

/// Size of an uncompressed SM2 point: 0x04 ∥ x ∥ y
pub const SM2_POINT_UNCOMPRESSED_SIZE: usize = 1 + 2 * SM2_FIELD_ELEMENT_SIZE;

/// Size of a compressed SM2 point: 0x02/0x03 ∥ x
pub const SM2_POINT_COMPRESSED_SIZE: usize = 1 + SM2_FIELD_ELEMENT_SIZE;

/// Default distinguished identity used for the Z value when no user
/// identity has been agreed (GB/T 32918.2). Byte-exact: the ASCII digits
/// "1234567812345678".
pub const SM2_DEFAULT_USER_ID: &[u8] = b"1234567812345678";

/// Curve domain parameters for a short-Weierstrass prime-field curve
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sm2CurveParams {
    /// Field prime p
    pub p: [u8; SM2_FIELD_ELEMENT_SIZE],
    /// Curve coefficient a
    pub a: [u8; SM2_FIELD_ELEMENT_SIZE],
    /// Curve coefficient b
    pub b: [u8; SM2_FIELD_ELEMENT_SIZE],
    /// Base point x-coordinate
    pub g_x: [u8; SM2_FIELD_ELEMENT_SIZE],
    /// Base point y-coordinate
    pub g_y: [u8; SM2_FIELD_ELEMENT_SIZE],
    /// Order n of the base point
    pub n: [u8; SM2_SCALAR_SIZE],
    /// Cofactor h
    pub h: u32,
}

/// The recommended SM2 curve
pub static SM2: Sm2CurveParams = Sm2CurveParams {
    // p = FFFFFFFE FFFFFFFF FFFFFFFF FFFFFFFF FFFFFFFF 00000000 FFFFFFFF FFFFFFFF
    p: [
        0xFF, 0xFF, 0xFF, 0xFE, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
        0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x00, 0x00, 0x00, 0x00, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
        0xFF, 0xFF,
    ],
    // a = p - 3
    a: [
        0xFF, 0xFF, 0xFF, 0xFE, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
        0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x00, 0x00, 0x00, 0x00, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
        0xFF, 0xFC,
    ],
    b: [
        0x28, 0xE9, 0xFA, 0x9E, 0x9D, 0x9F, 0x5E, 0x34, 0x4D, 0x5A, 0x9E, 0x4B, 0xCF, 0x65, 0x09,
        0xA7, 0xF3, 0x97, 0x89, 0xF5, 0x15, 0xAB, 0x8F, 0x92, 0xDD, 0xBC, 0xBD, 0x41, 0x4D, 0x94,
        0x0E, 0x93,
    ],
    g_x: [
        0x32, 0xC4, 0xAE, 0x2C, 0x1F, 0x19, 0x81, 0x19, 0x5F, 0x99, 0x04, 0x46, 0x6A, 0x39, 0xC9,
        0x94, 0x8F, 0xE3, 0x0B, 0xBF, 0xF2, 0x66, 0x0B, 0xE1, 0x71, 0x5A, 0x45, 0x89, 0x33, 0x4C,
        0x74, 0xC7,
    ],
    g_y: [
        0xBC, 0x37, 0x36, 0xA2, 0xF4, 0xF6, 0x77, 0x9C, 0x59, 0xBD, 0xCE, 0xE3, 0x6B, 0x69, 0x21,
        0x53, 0xD0, 0xA9, 0x87, 0x7C, 0xC6, 0x2A, 0x47, 0x40, 0x02, 0xDF, 0x32, 0xE5, 0x21, 0x39,
        0xF0, 0xA0,
    ],
    n: [
        0xFF, 0xFF, 0xFF, 0xFE, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
        0xFF, 0x72, 0x03, 0xDF, 0x6B, 0x21, 0xC6, 0x05, 0x2B, 0x53, 0xBB, 0xF4, 0x09, 0x39, 0xD5,
        0x41, 0x23,
    ],
    h: 1,
};
