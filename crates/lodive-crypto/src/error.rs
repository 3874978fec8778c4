//! Error types for lodive-crypto

use thiserror::Error;

/// Errors that can occur while encoding identities
#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Invalid address prefix: expected {expected}, got {actual}")]
    WrongPrefix { expected: String, actual: String },

    #[error("Invalid address length: expected {expected} bytes, got {actual}")]
    InvalidAddressLength { expected: usize, actual: usize },

    #[error("Bit sequence length {0} is not a multiple of 8")]
    UnalignedBits(usize),

    #[error("Character {0:?} has no 8-bit encoding")]
    UnencodableChar(char),

    #[error("Invalid identity hash: {0}")]
    InvalidHash(String),
}

/// Result type for crypto operations
pub type CryptoResult<T> = Result<T, CryptoError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crypto_error_display() {
        let err = CryptoError::InvalidAddress("bad checksum".to_string());
        assert!(format!("{}", err).contains("Invalid address"));
        assert!(format!("{}", err).contains("bad checksum"));

        let err = CryptoError::WrongPrefix {
            expected: "aleo".to_string(),
            actual: "bc".to_string(),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("aleo"));
        assert!(msg.contains("bc"));

        let err = CryptoError::InvalidAddressLength {
            expected: 32,
            actual: 20,
        };
        let msg = format!("{}", err);
        assert!(msg.contains("32"));
        assert!(msg.contains("20"));

        let err = CryptoError::UnalignedBits(13);
        assert!(format!("{}", err).contains("13"));
    }
}
