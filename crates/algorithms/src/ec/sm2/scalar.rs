//! Scalars modulo the SM2 group order n
//!
//! The representation is big-endian bytes inside a `SecretBuffer`, so
//! private scalars are wiped on drop. Arithmetic converts to little-endian
//! limbs, works in `[0, n)`, and converts back.

use subtle::{Choice, ConditionallySelectable};
use zeroize::Zeroize;

use crate::error::{Error, Result};
use gmcrypt_common::security::SecretBuffer;
use gmcrypt_params::sm2::SM2_SCALAR_SIZE;

/// n as little-endian limbs
const N_LIMBS: [u32; 8] = [
    0x39D5_4123,
    0x53BB_F409,
    0x21C6_052B,
    0x7203_DF6B,
    0xFFFF_FFFF,
    0xFFFF_FFFF,
    0xFFFF_FFFF,
    0xFFFF_FFFE,
];

/// n - 2, big-endian, the Fermat inversion exponent
const N_MINUS_2: [u8; 32] = [
    0xFF, 0xFF, 0xFF, 0xFE, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
    0xFF, 0x72, 0x03, 0xDF, 0x6B, 0x21, 0xC6, 0x05, 0x2B, 0x53, 0xBB, 0xF4, 0x09, 0x39, 0xD5,
    0x41, 0x21,
];

#[inline(always)]
fn adc(a: u32, b: u32, carry: u32) -> (u32, u32) {
    let t = a as u64 + b as u64 + carry as u64;
    (t as u32, (t >> 32) as u32)
}

#[inline(always)]
fn sbb(a: u32, b: u32, borrow: u32) -> (u32, u32) {
    let t = (a as u64).wrapping_sub(b as u64 + borrow as u64);
    (t as u32, ((t >> 32) as u32) & 1)
}

fn select_limbs(a: &[u32; 8], b: &[u32; 8], choice: Choice) -> [u32; 8] {
    let mut out = [0u32; 8];
    for i in 0..8 {
        out[i] = u32::conditional_select(&a[i], &b[i], choice);
    }
    out
}

/// Adds two reduced values mod n
fn add_mod_n_limbs(a: &[u32; 8], b: &[u32; 8]) -> [u32; 8] {
    let mut sum = [0u32; 8];
    let mut carry = 0u32;
    for i in 0..8 {
        let (s, c) = adc(a[i], b[i], carry);
        sum[i] = s;
        carry = c;
    }

    let mut diff = [0u32; 8];
    let mut borrow = 0u32;
    for i in 0..8 {
        let (d, b) = sbb(sum[i], N_LIMBS[i], borrow);
        diff[i] = d;
        borrow = b;
    }

    let need_sub = Choice::from(carry as u8) | !Choice::from(borrow as u8);
    select_limbs(&sum, &diff, need_sub)
}

/// Subtracts two reduced values mod n
fn sub_mod_n_limbs(a: &[u32; 8], b: &[u32; 8]) -> [u32; 8] {
    let mut diff = [0u32; 8];
    let mut borrow = 0u32;
    for i in 0..8 {
        let (d, bo) = sbb(a[i], b[i], borrow);
        diff[i] = d;
        borrow = bo;
    }

    let mut adjusted = [0u32; 8];
    let mut carry = 0u32;
    for i in 0..8 {
        let (s, c) = adc(diff[i], N_LIMBS[i], carry);
        adjusted[i] = s;
        carry = c;
    }

    select_limbs(&diff, &adjusted, Choice::from(borrow as u8))
}

/// Multiplication mod n by interleaved double-and-add
fn mul_mod_n_limbs(a: &[u32; 8], b_be: &[u8; 32]) -> [u32; 8] {
    let mut acc = [0u32; 8];
    for byte in b_be.iter() {
        for bit in (0..8).rev() {
            acc = add_mod_n_limbs(&acc, &acc);
            let with_addend = add_mod_n_limbs(&acc, a);
            acc = select_limbs(&acc, &with_addend, Choice::from((byte >> bit) & 1));
        }
    }
    acc
}

fn to_le_limbs(bytes: &[u8; SM2_SCALAR_SIZE]) -> [u32; 8] {
    let mut limbs = [0u32; 8];
    for i in 0..8 {
        let start = (7 - i) * 4;
        limbs[i] = u32::from_be_bytes([
            bytes[start],
            bytes[start + 1],
            bytes[start + 2],
            bytes[start + 3],
        ]);
    }
    limbs
}

fn limbs_to_be(limbs: &[u32; 8]) -> [u8; SM2_SCALAR_SIZE] {
    let mut out = [0u8; SM2_SCALAR_SIZE];
    for i in 0..8 {
        out[(7 - i) * 4..(8 - i) * 4].copy_from_slice(&limbs[i].to_be_bytes());
    }
    out
}

/// True when the value is below n
fn below_n(limbs: &[u32; 8]) -> bool {
    let mut borrow = 0u32;
    for i in 0..8 {
        let (_, b) = sbb(limbs[i], N_LIMBS[i], borrow);
        borrow = b;
    }
    borrow == 1
}

/// Conditionally subtracts n once, mapping any 256-bit value into `[0, n)`
///
/// One subtraction suffices because n > 2^255, so every 256-bit value is
/// below 2n.
fn reduce_once(limbs: &[u32; 8]) -> [u32; 8] {
    let mut diff = [0u32; 8];
    let mut borrow = 0u32;
    for i in 0..8 {
        let (d, b) = sbb(limbs[i], N_LIMBS[i], borrow);
        diff[i] = d;
        borrow = b;
    }
    select_limbs(&diff, limbs, Choice::from(borrow as u8))
}

/// A scalar in `[0, n)`
#[derive(Clone, Zeroize)]
pub struct Scalar(SecretBuffer<SM2_SCALAR_SIZE>);

impl Scalar {
    /// Creates a scalar from big-endian bytes, reducing mod n and rejecting
    /// a zero result
    ///
    /// Suitable for private keys: the result is always in `[1, n - 1]`.
    pub fn new(mut bytes: [u8; SM2_SCALAR_SIZE]) -> Result<Self> {
        let reduced = reduce_once(&to_le_limbs(&bytes));
        bytes.zeroize();
        let out = limbs_to_be(&reduced);
        if out.iter().all(|&b| b == 0) {
            return Err(Error::param("Scalar", "Scalar reduced to zero"));
        }
        Ok(Scalar(SecretBuffer::new(out)))
    }

    /// Creates a scalar by reducing mod n; zero is allowed
    pub fn from_bytes_reduced(bytes: &[u8; SM2_SCALAR_SIZE]) -> Self {
        let reduced = reduce_once(&to_le_limbs(bytes));
        Scalar(SecretBuffer::new(limbs_to_be(&reduced)))
    }

    /// Parses a scalar that must already be canonical and nonzero
    ///
    /// This is the strict form used for values received from the wire, such
    /// as signature components.
    pub fn from_canonical_bytes(bytes: &[u8; SM2_SCALAR_SIZE]) -> Result<Self> {
        let limbs = to_le_limbs(bytes);
        if !below_n(&limbs) {
            return Err(Error::param("Scalar", "Value is not below the group order"));
        }
        if bytes.iter().all(|&b| b == 0) {
            return Err(Error::param("Scalar", "Value is zero"));
        }
        Ok(Scalar(SecretBuffer::new(*bytes)))
    }

    /// Creates a scalar from an existing secret buffer, reducing mod n
    pub fn from_secret_buffer(buffer: SecretBuffer<SM2_SCALAR_SIZE>) -> Result<Self> {
        let mut bytes = [0u8; SM2_SCALAR_SIZE];
        bytes.copy_from_slice(buffer.as_ref());
        Self::new(bytes)
    }

    pub fn as_secret_buffer(&self) -> &SecretBuffer<SM2_SCALAR_SIZE> {
        &self.0
    }

    /// Big-endian canonical encoding
    pub fn serialize(&self) -> [u8; SM2_SCALAR_SIZE] {
        let mut out = [0u8; SM2_SCALAR_SIZE];
        out.copy_from_slice(self.0.as_ref());
        out
    }

    /// Strict parse of a canonical nonzero encoding
    pub fn deserialize(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != SM2_SCALAR_SIZE {
            return Err(Error::Length {
                context: "Scalar::deserialize",
                expected: SM2_SCALAR_SIZE,
                actual: bytes.len(),
            });
        }
        let mut fixed = [0u8; SM2_SCALAR_SIZE];
        fixed.copy_from_slice(bytes);
        Self::from_canonical_bytes(&fixed)
    }

    pub fn is_zero(&self) -> bool {
        self.0.as_ref().iter().all(|&b| b == 0)
    }

    fn limbs(&self) -> [u32; 8] {
        let mut bytes = [0u8; SM2_SCALAR_SIZE];
        bytes.copy_from_slice(self.0.as_ref());
        to_le_limbs(&bytes)
    }

    fn from_limbs(limbs: &[u32; 8]) -> Self {
        Scalar(SecretBuffer::new(limbs_to_be(limbs)))
    }

    pub fn add_mod_n(&self, other: &Self) -> Self {
        Self::from_limbs(&add_mod_n_limbs(&self.limbs(), &other.limbs()))
    }

    pub fn sub_mod_n(&self, other: &Self) -> Self {
        Self::from_limbs(&sub_mod_n_limbs(&self.limbs(), &other.limbs()))
    }

    /// Additive inverse mod n; zero maps to zero
    pub fn negate(&self) -> Self {
        Self::from_limbs(&sub_mod_n_limbs(&[0u32; 8], &self.limbs()))
    }

    pub fn mul_mod_n(&self, other: &Self) -> Self {
        Self::from_limbs(&mul_mod_n_limbs(&self.limbs(), &other.serialize()))
    }

    /// Fermat inversion mod n, rejecting zero
    pub fn inv_mod_n(&self) -> Result<Self> {
        if self.is_zero() {
            return Err(Error::param("Scalar", "Inversion of zero"));
        }
        let mut acc = [0u32; 8];
        acc[0] = 1;
        let base = self.limbs();
        for byte in N_MINUS_2.iter() {
            for bit in (0..8).rev() {
                acc = mul_mod_n_limbs(&acc, &limbs_to_be(&acc));
                if (byte >> bit) & 1 == 1 {
                    acc = mul_mod_n_limbs(&base, &limbs_to_be(&acc));
                }
            }
        }
        Ok(Self::from_limbs(&acc))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const N_BE: [u8; 32] = [
        0xFF, 0xFF, 0xFF, 0xFE, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
        0xFF, 0xFF, 0x72, 0x03, 0xDF, 0x6B, 0x21, 0xC6, 0x05, 0x2B, 0x53, 0xBB, 0xF4, 0x09,
        0x39, 0xD5, 0x41, 0x23,
    ];

    fn scalar_from_u64(v: u64) -> Scalar {
        let mut bytes = [0u8; 32];
        bytes[24..].copy_from_slice(&v.to_be_bytes());
        Scalar::new(bytes).unwrap()
    }

    #[test]
    fn new_reduces_and_rejects_zero() {
        assert!(Scalar::new([0u8; 32]).is_err());
        // n reduces to zero
        assert!(Scalar::new(N_BE).is_err());
        // n + 1 reduces to one
        let mut n_plus_1 = N_BE;
        n_plus_1[31] += 1;
        let s = Scalar::new(n_plus_1).unwrap();
        assert_eq!(s.serialize(), scalar_from_u64(1).serialize());
    }

    #[test]
    fn canonical_parse_is_strict() {
        assert!(Scalar::from_canonical_bytes(&N_BE).is_err());
        assert!(Scalar::from_canonical_bytes(&[0u8; 32]).is_err());
        let mut n_minus_1 = N_BE;
        n_minus_1[31] -= 1;
        assert!(Scalar::from_canonical_bytes(&n_minus_1).is_ok());
    }

    #[test]
    fn add_wraps_at_order() {
        let mut n_minus_1 = N_BE;
        n_minus_1[31] -= 1;
        let a = Scalar::from_canonical_bytes(&n_minus_1).unwrap();
        let one = scalar_from_u64(1);
        assert!(a.add_mod_n(&one).is_zero());
        let two = scalar_from_u64(2);
        assert_eq!(a.add_mod_n(&two).serialize(), one.serialize());
    }

    #[test]
    fn sub_borrows_through_order() {
        let one = scalar_from_u64(1);
        let two = scalar_from_u64(2);
        let mut n_minus_1 = N_BE;
        n_minus_1[31] -= 1;
        assert_eq!(one.sub_mod_n(&two).serialize(), n_minus_1);
    }

    #[test]
    fn mul_matches_small_products() {
        let a = scalar_from_u64(0x1234_5678);
        let b = scalar_from_u64(0x9abc_def0);
        let expected = scalar_from_u64(0x1234_5678u64 * 0x9abc_def0u64);
        assert_eq!(a.mul_mod_n(&b).serialize(), expected.serialize());
    }

    #[test]
    fn inversion_round_trip() {
        let mut bytes = [0u8; 32];
        bytes[0] = 0x3a;
        bytes[31] = 0x17;
        let a = Scalar::new(bytes).unwrap();
        let inv = a.inv_mod_n().unwrap();
        assert_eq!(a.mul_mod_n(&inv).serialize(), scalar_from_u64(1).serialize());
    }

    #[test]
    fn negation_cancels() {
        let a = scalar_from_u64(0x1234_5678);
        assert!(a.add_mod_n(&a.negate()).is_zero());
        assert!(Scalar::from_bytes_reduced(&[0u8; 32]).negate().is_zero());
    }

    #[test]
    fn serialization_round_trip() {
        let a = scalar_from_u64(0xdead_beef);
        let restored = Scalar::deserialize(&a.serialize()).unwrap();
        assert_eq!(restored.serialize(), a.serialize());
        assert!(Scalar::deserialize(&[1u8; 16]).is_err());
    }
}
