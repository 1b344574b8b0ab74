//! Elliptic curve operations

pub mod sm2;
