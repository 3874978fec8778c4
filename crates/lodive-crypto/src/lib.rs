//! # Lodive Crypto
//!
//! Identity hashing for Lodive.
//!
//! Owner fields on chain never hold a raw address. They hold a digest of the
//! owner's identity, and ownership is decided by comparing digests. This
//! crate produces those digests.
//!
//! ## Encodings
//!
//! Two canonical bit encodings feed the hasher, and they are not
//! interchangeable:
//!
//! - [`string_to_bits`]: human-readable names (event and venue names), 8
//!   big-endian bits per code point, Latin-1 only
//! - [`address_to_bits`]: wallet addresses, the decoded address payload in
//!   little-endian bit order, 253 bits
//!
//! ## Example
//!
//! ```rust
//! use lodive_crypto::{BitHasher, Blake3BitHasher};
//!
//! let hasher = Blake3BitHasher::new();
//! let venue_id = hasher.hash_name("Red Rocks").unwrap();
//! assert!(venue_id.to_string().ends_with("field"));
//! ```

pub mod bits;
pub mod error;
pub mod hasher;

// Re-exports
pub use bits::{ALEO_HRP, address_to_bits, bits_to_string, string_to_bits};
pub use error::{CryptoError, CryptoResult};
pub use hasher::{BitHasher, Blake3BitHasher, IdentityHash};
