//! Points on the SM2 curve
//!
//! Affine points carry an identity flag so the group identity has a value
//! representation. Group arithmetic runs through Jacobian coordinates with
//! the a = -3 doubling formulas and converts back at the API boundary.

#[cfg(all(feature = "alloc", not(feature = "std")))]
use alloc::vec::Vec;

use subtle::{Choice, ConditionallySelectable};

use super::field::{FieldElement, A_M3, B};
use super::scalar::Scalar;
use crate::error::{Error, Result};
use gmcrypt_params::sm2::{
    SM2, SM2_FIELD_ELEMENT_SIZE, SM2_POINT_COMPRESSED_SIZE, SM2_POINT_UNCOMPRESSED_SIZE,
};

/// Serialization format for curve points
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointFormat {
    /// `0x04 || x || y`
    Uncompressed,
    /// `0x02/0x03 || x`, prefix selected by the parity of y
    Compressed,
}

/// A point on the SM2 curve in affine coordinates, or the identity
#[derive(Clone, Copy, Debug)]
pub struct Point {
    is_identity: Choice,
    x: FieldElement,
    y: FieldElement,
}

impl PartialEq for Point {
    fn eq(&self, other: &Self) -> bool {
        let both_identity = self.is_identity & other.is_identity;
        let neither = !self.is_identity & !other.is_identity;
        let coords_equal = subtle::ConstantTimeEq::ct_eq(&self.x, &other.x)
            & subtle::ConstantTimeEq::ct_eq(&self.y, &other.y);
        (both_identity | (neither & coords_equal)).into()
    }
}

impl Eq for Point {}

fn curve_rhs(x: &FieldElement) -> FieldElement {
    // x^3 + a*x + b
    x.square().add(&A_M3).mul(x).add(&B)
}

impl Point {
    pub fn identity() -> Self {
        Point {
            is_identity: Choice::from(1u8),
            x: FieldElement::zero(),
            y: FieldElement::zero(),
        }
    }

    pub(crate) fn from_parts(x: FieldElement, y: FieldElement) -> Self {
        Point {
            is_identity: Choice::from(0u8),
            x,
            y,
        }
    }

    /// Builds a point from affine coordinates, verifying the curve equation
    pub fn new_uncompressed(
        x: &[u8; SM2_FIELD_ELEMENT_SIZE],
        y: &[u8; SM2_FIELD_ELEMENT_SIZE],
    ) -> Result<Self> {
        let x = FieldElement::from_bytes(x)?;
        let y = FieldElement::from_bytes(y)?;
        let on_curve: bool = subtle::ConstantTimeEq::ct_eq(&y.square(), &curve_rhs(&x)).into();
        if !on_curve {
            return Err(Error::param("Point", "Coordinates do not satisfy the curve equation"));
        }
        Ok(Point::from_parts(x, y))
    }

    pub fn is_identity(&self) -> bool {
        self.is_identity.into()
    }

    /// Affine x as big-endian bytes; all zeros for the identity
    pub fn x_coordinate_bytes(&self) -> [u8; SM2_FIELD_ELEMENT_SIZE] {
        self.x.to_bytes()
    }

    /// Affine y as big-endian bytes; all zeros for the identity
    pub fn y_coordinate_bytes(&self) -> [u8; SM2_FIELD_ELEMENT_SIZE] {
        self.y.to_bytes()
    }

    pub fn serialize_uncompressed(&self) -> [u8; SM2_POINT_UNCOMPRESSED_SIZE] {
        let mut out = [0u8; SM2_POINT_UNCOMPRESSED_SIZE];
        if self.is_identity() {
            return out;
        }
        out[0] = 0x04;
        out[1..33].copy_from_slice(&self.x.to_bytes());
        out[33..65].copy_from_slice(&self.y.to_bytes());
        out
    }

    pub fn deserialize_uncompressed(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != SM2_POINT_UNCOMPRESSED_SIZE {
            return Err(Error::Length {
                context: "Point::deserialize_uncompressed",
                expected: SM2_POINT_UNCOMPRESSED_SIZE,
                actual: bytes.len(),
            });
        }
        if bytes.iter().all(|&b| b == 0) {
            return Ok(Point::identity());
        }
        if bytes[0] != 0x04 {
            return Err(Error::param("Point", "Invalid uncompressed point prefix"));
        }
        let mut x = [0u8; SM2_FIELD_ELEMENT_SIZE];
        let mut y = [0u8; SM2_FIELD_ELEMENT_SIZE];
        x.copy_from_slice(&bytes[1..33]);
        y.copy_from_slice(&bytes[33..65]);
        Point::new_uncompressed(&x, &y)
    }

    pub fn serialize_compressed(&self) -> [u8; SM2_POINT_COMPRESSED_SIZE] {
        let mut out = [0u8; SM2_POINT_COMPRESSED_SIZE];
        if self.is_identity() {
            return out;
        }
        out[0] = if bool::from(self.y.is_odd()) { 0x03 } else { 0x02 };
        out[1..33].copy_from_slice(&self.x.to_bytes());
        out
    }

    pub fn deserialize_compressed(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != SM2_POINT_COMPRESSED_SIZE {
            return Err(Error::Length {
                context: "Point::deserialize_compressed",
                expected: SM2_POINT_COMPRESSED_SIZE,
                actual: bytes.len(),
            });
        }
        if bytes.iter().all(|&b| b == 0) {
            return Ok(Point::identity());
        }
        if bytes[0] != 0x02 && bytes[0] != 0x03 {
            return Err(Error::param("Point", "Invalid compressed point prefix"));
        }
        let mut x_bytes = [0u8; SM2_FIELD_ELEMENT_SIZE];
        x_bytes.copy_from_slice(&bytes[1..33]);
        let x = FieldElement::from_bytes(&x_bytes)?;
        let y = curve_rhs(&x)
            .sqrt()
            .ok_or_else(|| Error::param("Point", "No curve point with the given x"))?;
        let want_odd = bytes[0] == 0x03;
        let y = if bool::from(y.is_odd()) == want_odd {
            y
        } else {
            y.negate()
        };
        Ok(Point::from_parts(x, y))
    }

    /// Encodes the point for the wire; the identity is a single `0x00` byte
    pub fn encode(&self, format: PointFormat) -> Vec<u8> {
        if self.is_identity() {
            return Vec::from([0x00u8]);
        }
        match format {
            PointFormat::Uncompressed => self.serialize_uncompressed().to_vec(),
            PointFormat::Compressed => self.serialize_compressed().to_vec(),
        }
    }

    /// Decodes any of the wire formats, dispatching on the leading byte
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        match bytes.first() {
            Some(0x00) if bytes.len() == 1 => Ok(Point::identity()),
            Some(0x04) => Point::deserialize_uncompressed(bytes),
            Some(0x02) | Some(0x03) => Point::deserialize_compressed(bytes),
            _ => Err(Error::param("Point", "Unrecognized point encoding")),
        }
    }

    pub fn add(&self, other: &Point) -> Point {
        ProjectivePoint::from_affine(self)
            .add(&ProjectivePoint::from_affine(other))
            .to_affine()
    }

    pub fn double(&self) -> Point {
        ProjectivePoint::from_affine(self).double().to_affine()
    }

    pub fn negate(&self) -> Point {
        Point {
            is_identity: self.is_identity,
            x: self.x,
            y: FieldElement::conditional_select(
                &self.y.negate(),
                &FieldElement::zero(),
                self.is_identity,
            ),
        }
    }

    /// Scalar multiplication by a raw big-endian exponent
    pub(crate) fn mul_bytes(&self, k: &[u8; 32]) -> Point {
        let base = ProjectivePoint::from_affine(self);
        let mut acc = ProjectivePoint::identity();
        for byte in k.iter() {
            for bit in (0..8).rev() {
                acc = acc.double();
                let with_base = acc.add(&base);
                let take = Choice::from((byte >> bit) & 1);
                acc = ProjectivePoint::conditional_select(&acc, &with_base, take);
            }
        }
        acc.to_affine()
    }

    pub fn mul(&self, scalar: &Scalar) -> Point {
        self.mul_bytes(&scalar.serialize())
    }

    /// Checks that the point generates the order-n subgroup
    pub fn has_order_n(&self) -> bool {
        if self.is_identity() {
            return false;
        }
        self.mul_bytes(&SM2.n).is_identity()
    }
}

/// Jacobian coordinates; the identity is any point with z = 0
#[derive(Clone, Copy, Debug)]
pub(crate) struct ProjectivePoint {
    x: FieldElement,
    y: FieldElement,
    z: FieldElement,
}

impl ConditionallySelectable for ProjectivePoint {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        ProjectivePoint {
            x: FieldElement::conditional_select(&a.x, &b.x, choice),
            y: FieldElement::conditional_select(&a.y, &b.y, choice),
            z: FieldElement::conditional_select(&a.z, &b.z, choice),
        }
    }
}

impl ProjectivePoint {
    pub(crate) fn identity() -> Self {
        ProjectivePoint {
            x: FieldElement::one(),
            y: FieldElement::one(),
            z: FieldElement::zero(),
        }
    }

    pub(crate) fn from_affine(p: &Point) -> Self {
        if p.is_identity() {
            return Self::identity();
        }
        ProjectivePoint {
            x: p.x,
            y: p.y,
            z: FieldElement::one(),
        }
    }

    pub(crate) fn to_affine(&self) -> Point {
        match self.z.invert() {
            Err(_) => Point::identity(),
            Ok(z_inv) => {
                let z_inv2 = z_inv.square();
                let z_inv3 = z_inv2.mul(&z_inv);
                Point::from_parts(self.x.mul(&z_inv2), self.y.mul(&z_inv3))
            }
        }
    }

    /// Doubling with the a = -3 shortcut (dbl-2001-b)
    pub(crate) fn double(&self) -> Self {
        let delta = self.z.square();
        let gamma = self.y.square();
        let beta = self.x.mul(&gamma);
        let diff = self.x.sub(&delta);
        let sum = self.x.add(&delta);
        let m = diff.mul(&sum);
        let alpha = m.add(&m).add(&m);

        let beta2 = beta.add(&beta);
        let beta4 = beta2.add(&beta2);
        let beta8 = beta4.add(&beta4);

        let x3 = alpha.square().sub(&beta8);
        let z3 = self.y.add(&self.z).square().sub(&gamma).sub(&delta);

        let gamma_sq = gamma.square();
        let gamma_sq2 = gamma_sq.add(&gamma_sq);
        let gamma_sq4 = gamma_sq2.add(&gamma_sq2);
        let gamma_sq8 = gamma_sq4.add(&gamma_sq4);
        let y3 = alpha.mul(&beta4.sub(&x3)).sub(&gamma_sq8);

        ProjectivePoint {
            x: x3,
            y: y3,
            z: z3,
        }
    }

    pub(crate) fn add(&self, other: &Self) -> Self {
        if bool::from(self.z.is_zero()) {
            return *other;
        }
        if bool::from(other.z.is_zero()) {
            return *self;
        }

        let z1z1 = self.z.square();
        let z2z2 = other.z.square();
        let u1 = self.x.mul(&z2z2);
        let u2 = other.x.mul(&z1z1);
        let s1 = self.y.mul(&other.z).mul(&z2z2);
        let s2 = other.y.mul(&self.z).mul(&z1z1);

        let h = u2.sub(&u1);
        let r = s2.sub(&s1);

        if bool::from(h.is_zero()) {
            if bool::from(r.is_zero()) {
                return self.double();
            }
            return Self::identity();
        }

        let h2 = h.square();
        let h3 = h2.mul(&h);
        let v = u1.mul(&h2);

        let x3 = r.square().sub(&h3).sub(&v).sub(&v);
        let y3 = r.mul(&v.sub(&x3)).sub(&s1.mul(&h3));
        let z3 = self.z.mul(&other.z).mul(&h);

        ProjectivePoint {
            x: x3,
            y: y3,
            z: z3,
        }
    }
}
