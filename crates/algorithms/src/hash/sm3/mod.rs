//! SM3 hash function implementation with enhanced memory safety
//!
//! Implements the SM3 cryptographic hash function as specified in
//! GB/T 32905-2016 (256-bit digest, 64-byte blocks, Merkle–Damgård with
//! big-endian length padding).

#[cfg(all(feature = "alloc", not(feature = "std")))]
use alloc::string::{String, ToString};

use crate::error::{validate, Result};
use crate::hash::{HashAlgorithm, HashFunction};
use crate::types::Digest;
use byteorder::{BigEndian, ByteOrder};
use core::sync::atomic::{compiler_fence, Ordering};
use zeroize::Zeroize;

use gmcrypt_common::security::{EphemeralSecret, SecureZeroingType, ZeroizeGuard};
use gmcrypt_params::utils::hash::{SM3_BLOCK_SIZE, SM3_OUTPUT_SIZE};

// Round constants T_j, rotated by the round index during compression
const T0: u32 = 0x79cc4519; // rounds 0..=15
const T1: u32 = 0x7a879d8a; // rounds 16..=63

#[inline(always)]
fn p0(x: u32) -> u32 {
    x ^ x.rotate_left(9) ^ x.rotate_left(17)
}

#[inline(always)]
fn p1(x: u32) -> u32 {
    x ^ x.rotate_left(15) ^ x.rotate_left(23)
}

#[inline(always)]
fn ff(j: usize, x: u32, y: u32, z: u32) -> u32 {
    if j < 16 {
        x ^ y ^ z
    } else {
        (x & y) | (x & z) | (y & z)
    }
}

#[inline(always)]
fn gg(j: usize, x: u32, y: u32, z: u32) -> u32 {
    if j < 16 {
        x ^ y ^ z
    } else {
        (x & y) | ((!x) & z)
    }
}

/// Marker type for the SM3 algorithm
pub enum Sm3Algorithm {}

impl HashAlgorithm for Sm3Algorithm {
    const OUTPUT_SIZE: usize = SM3_OUTPUT_SIZE;
    const BLOCK_SIZE: usize = SM3_BLOCK_SIZE;
    const ALGORITHM_ID: &'static str = "SM3";
}

/// SM3 hash function state with enhanced memory safety
#[derive(Clone, Zeroize)]
pub struct Sm3 {
    state: [u32; 8],
    buffer: [u8; SM3_BLOCK_SIZE],
    buffer_idx: usize,
    total_bytes: u64,
}

impl Drop for Sm3 {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl Sm3 {
    fn init_state() -> [u32; 8] {
        [
            0x7380166f, 0x4914b2b9, 0x172442d7, 0xda8a0600, 0xa96f30bc, 0x163138aa, 0xe38dee4d,
            0xb0fb0e4e,
        ]
    }

    /// Creates a fresh hasher in the standard initial state
    pub fn new() -> Self {
        Sm3 {
            state: Self::init_state(),
            buffer: [0u8; SM3_BLOCK_SIZE],
            buffer_idx: 0,
            total_bytes: 0,
        }
    }

    fn compress(state: &mut [u32; 8], block: &[u8; SM3_BLOCK_SIZE]) -> Result<()> {
        // Message schedule lives in an ephemeral buffer
        let mut w = EphemeralSecret::new([0u32; 68]);
        let mut w_prime = EphemeralSecret::new([0u32; 64]);

        compiler_fence(Ordering::SeqCst);

        for i in 0..16 {
            let start = i * 4;
            validate::max_length("SM3 block read", start + 4, SM3_BLOCK_SIZE)?;
            w[i] = BigEndian::read_u32(&block[start..]);
        }

        for j in 16..68 {
            w[j] = p1(w[j - 16] ^ w[j - 9] ^ w[j - 3].rotate_left(15))
                ^ w[j - 13].rotate_left(7)
                ^ w[j - 6];
        }

        for j in 0..64 {
            w_prime[j] = w[j] ^ w[j + 4];
        }

        let mut working_vars = [
            state[0], state[1], state[2], state[3], state[4], state[5], state[6], state[7],
        ];
        let mut guard = ZeroizeGuard::new(&mut working_vars);

        let mut a = guard[0];
        let mut b = guard[1];
        let mut c = guard[2];
        let mut d = guard[3];
        let mut e = guard[4];
        let mut f = guard[5];
        let mut g = guard[6];
        let mut h = guard[7];

        for j in 0..64 {
            let t = if j < 16 { T0 } else { T1 };
            let ss1 = a
                .rotate_left(12)
                .wrapping_add(e)
                .wrapping_add(t.rotate_left((j % 32) as u32))
                .rotate_left(7);
            let ss2 = ss1 ^ a.rotate_left(12);
            let tt1 = ff(j, a, b, c)
                .wrapping_add(d)
                .wrapping_add(ss2)
                .wrapping_add(w_prime[j]);
            let tt2 = gg(j, e, f, g)
                .wrapping_add(h)
                .wrapping_add(ss1)
                .wrapping_add(w[j]);

            d = c;
            c = b.rotate_left(9);
            b = a;
            a = tt1;
            h = g;
            g = f.rotate_left(19);
            f = e;
            e = p0(tt2);
        }

        guard[0] = a;
        guard[1] = b;
        guard[2] = c;
        guard[3] = d;
        guard[4] = e;
        guard[5] = f;
        guard[6] = g;
        guard[7] = h;

        // Davies–Meyer style feed-forward is an XOR for SM3
        state[0] ^= guard[0];
        state[1] ^= guard[1];
        state[2] ^= guard[2];
        state[3] ^= guard[3];
        state[4] ^= guard[4];
        state[5] ^= guard[5];
        state[6] ^= guard[6];
        state[7] ^= guard[7];

        compiler_fence(Ordering::SeqCst);

        Ok(())
    }

    fn update_internal(&mut self, mut input: &[u8]) -> Result<()> {
        while !input.is_empty() {
            let fill = core::cmp::min(input.len(), SM3_BLOCK_SIZE - self.buffer_idx);
            self.buffer[self.buffer_idx..self.buffer_idx + fill].copy_from_slice(&input[..fill]);
            self.buffer_idx += fill;
            input = &input[fill..];
            if self.buffer_idx == SM3_BLOCK_SIZE {
                let mut block = [0u8; SM3_BLOCK_SIZE];
                block.copy_from_slice(&self.buffer);
                Self::compress(&mut self.state, &block)?;
                self.total_bytes += SM3_BLOCK_SIZE as u64;
                self.buffer_idx = 0;
            }
        }
        Ok(())
    }

    fn finalize_internal(&mut self) -> Result<[u8; SM3_OUTPUT_SIZE]> {
        self.total_bytes += self.buffer_idx as u64;
        let bit_len = self.total_bytes * 8;

        let pad_buffer = EphemeralSecret::new([0u8; SM3_BLOCK_SIZE]);

        // padding: 0x80, zeros, 64-bit big-endian bit length
        self.buffer[self.buffer_idx] = 0x80;
        if self.buffer_idx >= 56 {
            for b in &mut self.buffer[self.buffer_idx + 1..] {
                *b = 0;
            }
            let mut block = [0u8; SM3_BLOCK_SIZE];
            block.copy_from_slice(&self.buffer);
            Self::compress(&mut self.state, &block)?;
            self.buffer = *pad_buffer;
        } else {
            for b in &mut self.buffer[self.buffer_idx + 1..56] {
                *b = 0;
            }
        }

        BigEndian::write_u64(&mut self.buffer[56..], bit_len);
        let mut block = [0u8; SM3_BLOCK_SIZE];
        block.copy_from_slice(&self.buffer);
        Self::compress(&mut self.state, &block)?;

        let mut out = [0u8; SM3_OUTPUT_SIZE];
        for (i, &word) in self.state.iter().enumerate() {
            out[i * 4..i * 4 + 4].copy_from_slice(&word.to_be_bytes());
        }
        self.zeroize();
        Ok(out)
    }
}

impl Default for Sm3 {
    fn default() -> Self {
        Self::new()
    }
}

impl SecureZeroingType for Sm3 {
    fn zeroed() -> Self {
        Self::new()
    }
}

impl HashFunction for Sm3 {
    type Algorithm = Sm3Algorithm;
    type Output = Digest<SM3_OUTPUT_SIZE>;

    fn new() -> Self {
        Sm3::new()
    }

    fn update(&mut self, data: &[u8]) -> Result<&mut Self> {
        self.update_internal(data)?;
        Ok(self)
    }

    fn finalize(&mut self) -> Result<Self::Output> {
        let out = self.finalize_internal()?;
        Ok(Digest::new(out))
    }

    fn output_size() -> usize {
        SM3_OUTPUT_SIZE
    }

    fn block_size() -> usize {
        SM3_BLOCK_SIZE
    }

    fn name() -> String {
        "SM3".to_string()
    }
}

#[cfg(test)]
mod tests;
