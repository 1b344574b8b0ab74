//! Field arithmetic modulo the SM2 prime
//!
//! Elements are held as eight little-endian 32-bit limbs in canonical
//! reduced form, so every public operation both consumes and produces values
//! in `[0, p)`. The prime satisfies `p ≡ 3 (mod 4)`, which gives square
//! roots by a single exponentiation.

use byteorder::{BigEndian, ByteOrder};
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};

use crate::error::{Error, Result};
use gmcrypt_params::sm2::SM2_FIELD_ELEMENT_SIZE;

/// An element of GF(p) for the SM2 curve
#[derive(Clone, Copy, Debug)]
pub struct FieldElement(pub(crate) [u32; 8]);

/// p as little-endian limbs
pub(crate) const MOD_LIMBS: [u32; 8] = [
    0xFFFF_FFFF,
    0xFFFF_FFFF,
    0x0000_0000,
    0xFFFF_FFFF,
    0xFFFF_FFFF,
    0xFFFF_FFFF,
    0xFFFF_FFFF,
    0xFFFF_FFFE,
];

/// Curve coefficient a = p - 3 as a field element
pub(crate) const A_M3: FieldElement = FieldElement([
    0xFFFF_FFFC,
    0xFFFF_FFFF,
    0x0000_0000,
    0xFFFF_FFFF,
    0xFFFF_FFFF,
    0xFFFF_FFFF,
    0xFFFF_FFFF,
    0xFFFF_FFFE,
]);

/// Curve coefficient b as a field element
pub(crate) const B: FieldElement = FieldElement([
    0x4D94_0E93,
    0xDDBC_BD41,
    0x15AB_8F92,
    0xF397_89F5,
    0xCF65_09A7,
    0x4D5A_9E4B,
    0x9D9F_5E34,
    0x28E9_FA9E,
]);

/// p - 2, big-endian, the Fermat inversion exponent
const P_MINUS_2: [u8; 32] = [
    0xFF, 0xFF, 0xFF, 0xFE, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x00, 0x00, 0x00, 0x00, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
    0xFF, 0xFD,
];

/// (p + 1) / 4, big-endian, the square-root exponent for p ≡ 3 (mod 4)
const SQRT_EXP: [u8; 32] = [
    0x3F, 0xFF, 0xFF, 0xFF, 0xBF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xC0, 0x00, 0x00, 0x00, 0x40, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00,
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

impl ConditionallySelectable for FieldElement {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        let mut limbs = [0u32; 8];
        for i in 0..8 {
            limbs[i] = u32::conditional_select(&a.0[i], &b.0[i], choice);
        }
        FieldElement(limbs)
    }
}

impl ConstantTimeEq for FieldElement {
    fn ct_eq(&self, other: &Self) -> Choice {
        let mut acc = Choice::from(1u8);
        for i in 0..8 {
            acc &= self.0[i].ct_eq(&other.0[i]);
        }
        acc
    }
}

impl PartialEq for FieldElement {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

impl Eq for FieldElement {}

impl FieldElement {
    pub fn zero() -> Self {
        FieldElement([0u32; 8])
    }

    pub fn one() -> Self {
        FieldElement([1, 0, 0, 0, 0, 0, 0, 0])
    }

    /// Lifts a small integer into the field
    pub fn from_u32(value: u32) -> Self {
        FieldElement([value, 0, 0, 0, 0, 0, 0, 0])
    }

    pub fn is_zero(&self) -> Choice {
        self.ct_eq(&FieldElement::zero())
    }

    /// Parity of the canonical representative, used for point compression
    pub fn is_odd(&self) -> Choice {
        Choice::from((self.0[0] & 1) as u8)
    }

    /// Parses a big-endian encoding, rejecting values not in `[0, p)`
    pub fn from_bytes(bytes: &[u8; SM2_FIELD_ELEMENT_SIZE]) -> Result<Self> {
        let mut limbs = [0u32; 8];
        for i in 0..8 {
            limbs[i] = BigEndian::read_u32(&bytes[(7 - i) * 4..(8 - i) * 4]);
        }
        // value < p exactly when subtracting p borrows
        let mut borrow = 0u32;
        for i in 0..8 {
            let (_, b) = sbb(limbs[i], MOD_LIMBS[i], borrow);
            borrow = b;
        }
        if borrow == 0 {
            return Err(Error::param(
                "FieldElement",
                "Encoded value is not a canonical field element",
            ));
        }
        Ok(FieldElement(limbs))
    }

    /// Big-endian canonical encoding
    pub fn to_bytes(&self) -> [u8; SM2_FIELD_ELEMENT_SIZE] {
        let mut out = [0u8; SM2_FIELD_ELEMENT_SIZE];
        for i in 0..8 {
            BigEndian::write_u32(&mut out[(7 - i) * 4..(8 - i) * 4], self.0[i]);
        }
        out
    }

    pub fn add(&self, other: &Self) -> Self {
        let mut sum = [0u32; 8];
        let mut carry = 0u32;
        for i in 0..8 {
            let (s, c) = adc(self.0[i], other.0[i], carry);
            sum[i] = s;
            carry = c;
        }

        // both inputs are < p, so at most one subtraction of p is needed
        let mut diff = [0u32; 8];
        let mut borrow = 0u32;
        for i in 0..8 {
            let (d, b) = sbb(sum[i], MOD_LIMBS[i], borrow);
            diff[i] = d;
            borrow = b;
        }

        let need_sub = Choice::from(carry as u8) | !Choice::from(borrow as u8);
        FieldElement::conditional_select(&FieldElement(sum), &FieldElement(diff), need_sub)
    }

    pub fn sub(&self, other: &Self) -> Self {
        let mut diff = [0u32; 8];
        let mut borrow = 0u32;
        for i in 0..8 {
            let (d, b) = sbb(self.0[i], other.0[i], borrow);
            diff[i] = d;
            borrow = b;
        }

        let mut adjusted = [0u32; 8];
        let mut carry = 0u32;
        for i in 0..8 {
            let (s, c) = adc(diff[i], MOD_LIMBS[i], carry);
            adjusted[i] = s;
            carry = c;
        }

        FieldElement::conditional_select(
            &FieldElement(diff),
            &FieldElement(adjusted),
            Choice::from(borrow as u8),
        )
    }

    pub fn negate(&self) -> Self {
        FieldElement::zero().sub(self)
    }

    /// Modular multiplication by interleaved double-and-add
    ///
    /// Every intermediate stays reduced, so no wide product or special-form
    /// reduction is involved.
    pub fn mul(&self, other: &Self) -> Self {
        let mut acc = FieldElement::zero();
        let other_bytes = other.to_bytes();
        for byte in other_bytes.iter() {
            for bit in (0..8).rev() {
                acc = acc.add(&acc);
                let with_addend = acc.add(self);
                let take = Choice::from((byte >> bit) & 1);
                acc = FieldElement::conditional_select(&acc, &with_addend, take);
            }
        }
        acc
    }

    pub fn square(&self) -> Self {
        self.mul(self)
    }

    /// Exponentiation with a public big-endian exponent
    fn pow(&self, exp: &[u8; 32]) -> Self {
        let mut result = FieldElement::one();
        for byte in exp.iter() {
            for bit in (0..8).rev() {
                result = result.square();
                if (byte >> bit) & 1 == 1 {
                    result = result.mul(self);
                }
            }
        }
        result
    }

    /// Fermat inversion, rejecting zero
    pub fn invert(&self) -> Result<Self> {
        if self.is_zero().into() {
            return Err(Error::param("FieldElement", "Inversion of zero"));
        }
        Ok(self.pow(&P_MINUS_2))
    }

    /// Square root via the `(p + 1) / 4` exponent
    ///
    /// Returns `None` when the element is a quadratic non-residue.
    pub fn sqrt(&self) -> Option<Self> {
        let candidate = self.pow(&SQRT_EXP);
        if candidate.square() == *self {
            Some(candidate)
        } else {
            None
        }
    }
}
