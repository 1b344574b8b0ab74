//! Arithmetic for the SM2 curve of GB/T 32918.1
//!
//! The curve is `y^2 = x^3 - 3x + b` over a 256-bit prime field with
//! cofactor 1, so the curve group and the order-n subgroup coincide.

mod field;
mod mul;
mod point;
mod scalar;

pub use field::FieldElement;
pub use mul::{FixedPointCombMultiplier, ScalarMultiplier, SimpleMultiplier};
pub use point::{Point, PointFormat};
pub use scalar::Scalar;

use rand::{CryptoRng, RngCore};
use zeroize::Zeroize;

use crate::error::{validate, Error, Result};
use crate::hash::{HashFunction, Sm3};
use gmcrypt_params::sm2::{SM2, SM2_FIELD_ELEMENT_SIZE, SM2_SCALAR_SIZE};

const G_X_LIMBS: [u32; 8] = [
    0x334C_74C7,
    0x715A_4589,
    0xF266_0BE1,
    0x8FE3_0BBF,
    0x6A39_C994,
    0x5F99_0446,
    0x1F19_8119,
    0x32C4_AE2C,
];

const G_Y_LIMBS: [u32; 8] = [
    0x2139_F0A0,
    0x02DF_32E5,
    0xC62A_4740,
    0xD0A9_877C,
    0x6B69_2153,
    0x59BD_CEE3,
    0xF4F6_779C,
    0xBC37_36A2,
];

/// Returns the standard base point G
pub fn base_point_g() -> Point {
    Point::from_parts(FieldElement(G_X_LIMBS), FieldElement(G_Y_LIMBS))
}

/// Computes `[scalar]point`
pub fn scalar_mult(scalar: &Scalar, point: &Point) -> Point {
    point.mul(scalar)
}

/// Computes `[scalar]G`
pub fn scalar_mult_base_g(scalar: &Scalar) -> Point {
    base_point_g().mul(scalar)
}

/// Generates a keypair by rejection sampling the scalar in `[1, n - 1]`
pub fn generate_keypair<R: CryptoRng + RngCore>(rng: &mut R) -> Result<(Scalar, Point)> {
    loop {
        let mut bytes = [0u8; SM2_SCALAR_SIZE];
        rng.fill_bytes(&mut bytes);
        let parsed = Scalar::from_canonical_bytes(&bytes);
        bytes.zeroize();
        if let Ok(d) = parsed {
            let q = scalar_mult_base_g(&d);
            return Ok((d, q));
        }
    }
}

/// Full public key validation
///
/// Construction already guarantees canonical coordinates on the curve;
/// this adds the identity and subgroup-order checks.
pub fn validate_public_key(point: &Point) -> Result<()> {
    if point.is_identity() {
        return Err(Error::param("PublicKey", "The identity is not a valid public key"));
    }
    if !point.has_order_n() {
        return Err(Error::param("PublicKey", "Point is not in the order-n subgroup"));
    }
    Ok(())
}

/// Computes the Z identity digest of GB/T 32918.2
///
/// `Z = SM3(ENTL || ID || a || b || Gx || Gy || Qx || Qy)` where ENTL is the
/// identity length in bits as a 16-bit big-endian integer.
pub fn compute_z(user_id: &[u8], public_key: &Point) -> Result<[u8; SM2_FIELD_ELEMENT_SIZE]> {
    validate::parameter(
        user_id.len() <= (u16::MAX as usize) / 8,
        "user_id",
        "Identity does not fit a 16-bit bit length",
    )?;
    let entl = ((user_id.len() * 8) as u16).to_be_bytes();

    let mut hasher = Sm3::new();
    hasher.update(&entl)?;
    hasher.update(user_id)?;
    hasher.update(&SM2.a)?;
    hasher.update(&SM2.b)?;
    hasher.update(&SM2.g_x)?;
    hasher.update(&SM2.g_y)?;
    hasher.update(&public_key.x_coordinate_bytes())?;
    hasher.update(&public_key.y_coordinate_bytes())?;

    let digest = hasher.finalize()?;
    let mut out = [0u8; SM2_FIELD_ELEMENT_SIZE];
    out.copy_from_slice(digest.as_ref());
    Ok(out)
}

#[cfg(test)]
mod tests;
