//! DER encoding for the (r, s) signature pair
//!
//! Encoding is `SEQUENCE { r INTEGER, s INTEGER }` with minimal-length
//! integers. Parsing is strict: non-minimal integers, negative values,
//! oversized lengths, and trailing bytes are all rejected.

#[cfg(all(feature = "alloc", not(feature = "std")))]
use alloc::vec::Vec;

use gmcrypt_algorithms::error::{Error, Result};
use gmcrypt_params::sm2::SM2_SCALAR_SIZE;

const TAG_SEQUENCE: u8 = 0x30;
const TAG_INTEGER: u8 = 0x02;

/// The raw r and s components of a signature, zero-padded to scalar width
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignatureComponents {
    pub r: [u8; SM2_SCALAR_SIZE],
    pub s: [u8; SM2_SCALAR_SIZE],
}

fn encode_integer(out: &mut Vec<u8>, value: &[u8; SM2_SCALAR_SIZE]) {
    let mut start = 0;
    while start < SM2_SCALAR_SIZE - 1 && value[start] == 0 {
        start += 1;
    }
    let pad = value[start] & 0x80 != 0;
    out.push(TAG_INTEGER);
    out.push((SM2_SCALAR_SIZE - start + usize::from(pad)) as u8);
    if pad {
        out.push(0x00);
    }
    out.extend_from_slice(&value[start..]);
}

fn read_integer(cursor: &mut &[u8]) -> Result<[u8; SM2_SCALAR_SIZE]> {
    if cursor.len() < 2 || cursor[0] != TAG_INTEGER {
        return Err(Error::param("Signature", "Expected a DER INTEGER"));
    }
    let len = cursor[1] as usize;
    if len == 0 || len > SM2_SCALAR_SIZE + 1 || cursor.len() < 2 + len {
        return Err(Error::param("Signature", "Bad DER INTEGER length"));
    }
    let content = &cursor[2..2 + len];
    if content[0] & 0x80 != 0 {
        return Err(Error::param("Signature", "Negative DER INTEGER"));
    }
    if content[0] == 0x00 && (len == 1 || content[1] & 0x80 == 0) {
        return Err(Error::param("Signature", "Non-minimal DER INTEGER"));
    }
    let digits = if content[0] == 0x00 {
        &content[1..]
    } else {
        content
    };
    if digits.len() > SM2_SCALAR_SIZE {
        return Err(Error::param("Signature", "DER INTEGER wider than a scalar"));
    }

    let mut out = [0u8; SM2_SCALAR_SIZE];
    out[SM2_SCALAR_SIZE - digits.len()..].copy_from_slice(digits);
    *cursor = &cursor[2 + len..];
    Ok(out)
}

impl SignatureComponents {
    pub fn to_der(&self) -> Vec<u8> {
        let mut body = Vec::with_capacity(2 * (SM2_SCALAR_SIZE + 3));
        encode_integer(&mut body, &self.r);
        encode_integer(&mut body, &self.s);

        // body is at most 70 bytes, so the short length form always fits
        let mut out = Vec::with_capacity(body.len() + 2);
        out.push(TAG_SEQUENCE);
        out.push(body.len() as u8);
        out.extend_from_slice(&body);
        out
    }

    pub fn from_der(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < 2 || bytes[0] != TAG_SEQUENCE {
            return Err(Error::param("Signature", "Expected a DER SEQUENCE"));
        }
        let body_len = bytes[1] as usize;
        if bytes[1] & 0x80 != 0 || bytes.len() != 2 + body_len {
            return Err(Error::param("Signature", "Bad DER SEQUENCE length"));
        }

        let mut cursor = &bytes[2..];
        let r = read_integer(&mut cursor)?;
        let s = read_integer(&mut cursor)?;
        if !cursor.is_empty() {
            return Err(Error::param("Signature", "Trailing bytes after signature"));
        }
        Ok(SignatureComponents { r, s })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn components(r_hex: &str, s_hex: &str) -> SignatureComponents {
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        hex::decode_to_slice(r_hex, &mut r).unwrap();
        hex::decode_to_slice(s_hex, &mut s).unwrap();
        SignatureComponents { r, s }
    }

    #[test]
    fn round_trip_with_high_bit_padding() {
        // r has its high bit set and needs a 0x00 pad; s does not
        let c = components(
            "f5a03b0648d2c4630eeac513e1bb81a15944da3827d5b74143ac7eaceee720b3",
            "31b6aa29df212fd8763182bc0d421ca1bb9038fd1f7f42d4840b69c485bbc1aa",
        );
        let der = c.to_der();
        assert_eq!(der[0], TAG_SEQUENCE);
        assert_eq!(der[2], TAG_INTEGER);
        assert_eq!(der[3], 33);
        assert_eq!(der[4], 0x00);
        assert_eq!(SignatureComponents::from_der(&der).unwrap(), c);
    }

    #[test]
    fn short_integers_shrink() {
        let mut r = [0u8; 32];
        r[31] = 0x7f;
        let mut s = [0u8; 32];
        s[30] = 0x01;
        let c = SignatureComponents { r, s };
        let der = c.to_der();
        // 0x7f is one content byte, 0x0100 is two
        assert_eq!(der.len(), 2 + 3 + 4);
        assert_eq!(SignatureComponents::from_der(&der).unwrap(), c);
    }

    #[test]
    fn trailing_garbage_rejected() {
        let c = components(
            "0000000000000000000000000000000000000000000000000000000000000001",
            "0000000000000000000000000000000000000000000000000000000000000002",
        );
        let mut der = c.to_der();
        der.push(0x00);
        assert!(SignatureComponents::from_der(&der).is_err());
    }

    #[test]
    fn length_mismatch_rejected() {
        let c = components(
            "0000000000000000000000000000000000000000000000000000000000000001",
            "0000000000000000000000000000000000000000000000000000000000000002",
        );
        let mut der = c.to_der();
        der[1] += 1;
        assert!(SignatureComponents::from_der(&der).is_err());
        der[1] -= 2;
        assert!(SignatureComponents::from_der(&der).is_err());
    }

    #[test]
    fn non_minimal_integer_rejected() {
        // INTEGER 0x00 0x01 has a needless leading zero
        let der = [
            TAG_SEQUENCE,
            7,
            TAG_INTEGER,
            2,
            0x00,
            0x01,
            TAG_INTEGER,
            1,
            0x02,
        ];
        assert!(SignatureComponents::from_der(&der).is_err());
    }

    #[test]
    fn negative_integer_rejected() {
        let der = [TAG_SEQUENCE, 6, TAG_INTEGER, 1, 0x81, TAG_INTEGER, 1, 0x02];
        assert!(SignatureComponents::from_der(&der).is_err());
    }

    #[test]
    fn empty_and_truncated_input_rejected() {
        assert!(SignatureComponents::from_der(&[]).is_err());
        assert!(SignatureComponents::from_der(&[TAG_SEQUENCE]).is_err());
        assert!(SignatureComponents::from_der(&[TAG_INTEGER, 0]).is_err());
    }
}
