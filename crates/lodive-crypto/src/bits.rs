//! Canonical bit encodings fed to the identity hasher

use lodive_core::WalletIdentity;

use crate::error::{CryptoError, CryptoResult};

/// Human-readable part of a wallet address
pub const ALEO_HRP: &str = "aleo";

/// Size of a decoded address payload
const ADDRESS_BYTES: usize = 32;

/// Bit width of the base field an address coordinate lives in
pub const ADDRESS_BITS: usize = 253;

/// Encode a name as bits: each character's code point as 8 big-endian bits,
/// in character order, for `8 * chars` bits in total.
///
/// Characters above U+00FF have no 8-bit form and are rejected.
pub fn string_to_bits(s: &str) -> CryptoResult<Vec<bool>> {
    let mut bits = Vec::with_capacity(s.chars().count() * 8);
    for c in s.chars() {
        let code = u8::try_from(u32::from(c)).map_err(|_| CryptoError::UnencodableChar(c))?;
        for shift in (0..8).rev() {
            bits.push((code >> shift) & 1 == 1);
        }
    }
    Ok(bits)
}

/// Inverse of [`string_to_bits`]: every 8-bit group is one code point
pub fn bits_to_string(bits: &[bool]) -> CryptoResult<String> {
    if bits.len() % 8 != 0 {
        return Err(CryptoError::UnalignedBits(bits.len()));
    }
    Ok(bits
        .chunks(8)
        .map(|chunk| char::from(chunk.iter().fold(0u8, |acc, &bit| (acc << 1) | bit as u8)))
        .collect())
}

/// Encode a wallet address as bits.
///
/// The bech32m payload is the address coordinate as a little-endian field
/// element. Its bits are emitted least-significant first and cut to the
/// field's 253 bits; a payload using the top 3 bits is not a field element.
pub fn address_to_bits(wallet: &WalletIdentity) -> CryptoResult<Vec<bool>> {
    let (hrp, data) = bech32::decode(wallet.as_str().trim())
        .map_err(|e| CryptoError::InvalidAddress(e.to_string()))?;

    if !hrp.as_str().eq_ignore_ascii_case(ALEO_HRP) {
        return Err(CryptoError::WrongPrefix {
            expected: ALEO_HRP.to_string(),
            actual: hrp.as_str().to_string(),
        });
    }

    if data.len() != ADDRESS_BYTES {
        return Err(CryptoError::InvalidAddressLength {
            expected: ADDRESS_BYTES,
            actual: data.len(),
        });
    }

    if data[ADDRESS_BYTES - 1] >> (ADDRESS_BITS % 8) != 0 {
        return Err(CryptoError::InvalidAddress(
            "coordinate exceeds the field size".to_string(),
        ));
    }

    let mut bits = Vec::with_capacity(ADDRESS_BYTES * 8);
    for byte in data {
        for shift in 0..8 {
            bits.push((byte >> shift) & 1 == 1);
        }
    }
    bits.truncate(ADDRESS_BITS);
    Ok(bits)
}
