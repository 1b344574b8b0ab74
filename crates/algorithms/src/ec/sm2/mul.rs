//! Scalar multiplication strategies
//!
//! Both multipliers are bound to a base point at construction. The simple
//! strategy is a plain double-and-add; the comb strategy trades a one-time
//! table build for roughly four times fewer group operations per call,
//! which pays off when many multiples of the same point are needed.

use super::point::{Point, ProjectivePoint};
use super::scalar::Scalar;

/// A strategy for computing multiples of a fixed base point
pub trait ScalarMultiplier {
    /// Computes `[scalar]B` for the base point this multiplier was built on
    fn multiply(&self, scalar: &Scalar) -> Point;
}

/// Plain double-and-add multiplication
pub struct SimpleMultiplier {
    base: Point,
}

impl SimpleMultiplier {
    pub fn new(base: Point) -> Self {
        SimpleMultiplier { base }
    }
}

impl ScalarMultiplier for SimpleMultiplier {
    fn multiply(&self, scalar: &Scalar) -> Point {
        self.base.mul(scalar)
    }
}

const COMB_WIDTH: usize = 4;
const COMB_COLUMNS: usize = 64;

/// Fixed-base comb multiplication with a width-4 precomputed table
///
/// The scalar is read as four 64-bit rows; the table holds every nonzero
/// combination of `[2^(64j)]B` for `j = 0..4`, so each of the 64 columns
/// costs one doubling and at most one addition.
pub struct FixedPointCombMultiplier {
    table: [Point; (1 << COMB_WIDTH) - 1],
}

impl FixedPointCombMultiplier {
    pub fn new(base: Point) -> Self {
        // teeth[j] = [2^(64j)]B
        let mut teeth = [base; COMB_WIDTH];
        for j in 1..COMB_WIDTH {
            let mut acc = ProjectivePoint::from_affine(&teeth[j - 1]);
            for _ in 0..COMB_COLUMNS {
                acc = acc.double();
            }
            teeth[j] = acc.to_affine();
        }

        let mut table = [Point::identity(); (1 << COMB_WIDTH) - 1];
        for m in 1..(1 << COMB_WIDTH) {
            let mut sum = Point::identity();
            for (j, tooth) in teeth.iter().enumerate() {
                if (m >> j) & 1 == 1 {
                    sum = sum.add(tooth);
                }
            }
            table[m - 1] = sum;
        }

        FixedPointCombMultiplier { table }
    }
}

impl ScalarMultiplier for FixedPointCombMultiplier {
    fn multiply(&self, scalar: &Scalar) -> Point {
        let bytes = scalar.serialize();
        let bit = |i: usize| -> usize { ((bytes[31 - i / 8] >> (i % 8)) & 1) as usize };

        let mut acc = ProjectivePoint::identity();
        for column in (0..COMB_COLUMNS).rev() {
            acc = acc.double();
            let mut m = 0usize;
            for j in 0..COMB_WIDTH {
                m |= bit(COMB_COLUMNS * j + column) << j;
            }
            if m != 0 {
                acc = acc.add(&ProjectivePoint::from_affine(&self.table[m - 1]));
            }
        }
        acc.to_affine()
    }
}
