//! Identity hasher
//!
//! [`BitHasher`] is the seam for the fixed-input hash the on-chain program
//! uses. [`Blake3BitHasher`] is the shipped implementation: it produces a
//! 128-bit digest, small enough to always fit a field element, rendered as a
//! field literal so it can be embedded directly into transaction inputs and
//! compared against owner fields.

use std::fmt::{self, Display};
use std::str::FromStr;

use lodive_core::{InputValue, LiteralType, WalletIdentity, split_literal};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::bits::{address_to_bits, string_to_bits};
use crate::error::{CryptoError, CryptoResult};

/// Derive-key context separating Lodive digests from other BLAKE3 uses
const HASH_CONTEXT: &str = "lodive 2025-01 identity hash v1";

/// Digest of an identity, compared only for equality
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IdentityHash(u128);

impl IdentityHash {
    pub const fn from_u128(value: u128) -> Self {
        Self(value)
    }

    pub fn as_u128(&self) -> u128 {
        self.0
    }

    /// The digest as a typed `field` transaction input
    pub fn to_input(&self) -> InputValue {
        InputValue::Field(self.0.to_string())
    }
}

impl Display for IdentityHash {
    /// Canonical form: `<decimal>field`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}field", self.0)
    }
}

impl FromStr for IdentityHash {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match split_literal(s) {
            (body, Some(LiteralType::Field)) => body
                .parse::<u128>()
                .map(IdentityHash)
                .map_err(|_| CryptoError::InvalidHash(s.to_string())),
            _ => Err(CryptoError::InvalidHash(s.to_string())),
        }
    }
}

impl From<IdentityHash> for InputValue {
    fn from(hash: IdentityHash) -> Self {
        hash.to_input()
    }
}

impl Serialize for IdentityHash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for IdentityHash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Hash over a sequence of bits
pub trait BitHasher: Send + Sync {
    /// Hash a bit sequence. Total: every input, including the empty one,
    /// has a digest.
    fn hash(&self, bits: &[bool]) -> IdentityHash;

    /// Hash a human-readable name using the character encoding
    fn hash_name(&self, name: &str) -> CryptoResult<IdentityHash> {
        Ok(self.hash(&string_to_bits(name)?))
    }

    /// Hash a wallet address using the address encoding
    fn hash_address(&self, wallet: &WalletIdentity) -> CryptoResult<IdentityHash> {
        Ok(self.hash(&address_to_bits(wallet)?))
    }
}

/// BLAKE3-backed [`BitHasher`]
#[derive(Debug, Clone, Copy, Default)]
pub struct Blake3BitHasher;

impl Blake3BitHasher {
    pub fn new() -> Self {
        Self
    }
}

/// Pack bits MSB-first; the final byte is zero-padded
fn pack_bits(bits: &[bool]) -> Vec<u8> {
    bits.chunks(8)
        .map(|chunk| {
            chunk
                .iter()
                .enumerate()
                .fold(0u8, |acc, (i, &bit)| acc | ((bit as u8) << (7 - i)))
        })
        .collect()
}

impl BitHasher for Blake3BitHasher {
    fn hash(&self, bits: &[bool]) -> IdentityHash {
        let mut hasher = blake3::Hasher::new_derive_key(HASH_CONTEXT);
        // Length prefix keeps zero-padded inputs of different lengths apart
        hasher.update(&(bits.len() as u64).to_le_bytes());
        hasher.update(&pack_bits(bits));

        let digest = hasher.finalize();
        let mut truncated = [0u8; 16];
        truncated.copy_from_slice(&digest.as_bytes()[..16]);
        IdentityHash(u128::from_le_bytes(truncated))
    }
}
