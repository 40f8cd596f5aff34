//! c32check encoding of Stacks principals.
//!
//! Legacy standard principals carry a version byte and a hash160; the current
//! representation wants the textual address (`SP...`, `ST...`).

use sha2::{Digest, Sha256};
use thiserror::Error;

const C32_ALPHABET: &[u8; 32] = b"0123456789ABCDEFGHJKMNPQRSTVWXYZ";

/// Errors from c32 address encoding.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum C32Error {
    #[error("invalid address version {0}: must be below 32")]
    InvalidVersion(u8),
    #[error("invalid hash160 length {0}: expected 20 bytes")]
    InvalidHashLength(usize),
}

/// Encode bytes as a c32 string.
///
/// Leading zero bytes are kept as one `0` each, the rest is the base-32 form
/// of the remaining big-endian integer.
pub fn c32_encode(data: &[u8]) -> String {
    let mut digits: Vec<u8> = Vec::with_capacity(data.len() * 8 / 5 + 1);
    let mut acc: u32 = 0;
    let mut bits = 0;
    for byte in data.iter().rev() {
        acc |= u32::from(*byte) << bits;
        bits += 8;
        while bits >= 5 {
            digits.push(C32_ALPHABET[(acc & 0x1f) as usize]);
            acc >>= 5;
            bits -= 5;
        }
    }
    if bits > 0 {
        digits.push(C32_ALPHABET[(acc & 0x1f) as usize]);
    }

    while digits.last() == Some(&b'0') {
        digits.pop();
    }
    let leading_zeros = data.iter().take_while(|b| **b == 0).count();
    digits.extend(std::iter::repeat(b'0').take(leading_zeros));
    digits.reverse();

    digits.into_iter().map(char::from).collect()
}

/// Encode `data` with a version character and a 4-byte double-SHA256 checksum.
pub fn c32check_encode(version: u8, data: &[u8]) -> Result<String, C32Error> {
    if version >= 32 {
        return Err(C32Error::InvalidVersion(version));
    }
    let mut preimage = Vec::with_capacity(data.len() + 1);
    preimage.push(version);
    preimage.extend_from_slice(data);
    let checksum = Sha256::digest(Sha256::digest(&preimage));

    let mut payload = data.to_vec();
    payload.extend_from_slice(&checksum[..4]);

    let mut out = String::with_capacity(payload.len() * 2);
    out.push(char::from(C32_ALPHABET[version as usize]));
    out.push_str(&c32_encode(&payload));
    Ok(out)
}

/// Build a Stacks address from a version byte and a 20-byte hash160.
pub fn c32_address(version: u8, hash160: &[u8]) -> Result<String, C32Error> {
    if hash160.len() != 20 {
        return Err(C32Error::InvalidHashLength(hash160.len()));
    }
    Ok(format!("S{}", c32check_encode(version, hash160)?))
}
