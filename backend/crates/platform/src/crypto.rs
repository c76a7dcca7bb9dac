//! Cryptographic Utilities

use rand::{RngCore, rngs::OsRng};

/// Generate cryptographically secure random bytes (e.g. signing secrets)
pub fn random_bytes(len: usize) -> Vec<u8> {
    let mut bytes = vec![0u8; len];
    OsRng.fill_bytes(&mut bytes);
    bytes
}

/// Constant-time equality for secret material
///
/// Unequal lengths return early; for equal lengths the full slices are
/// always walked so timing does not reveal the first differing byte.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    a.iter()
        .zip(b.iter())
        .fold(0u8, |acc, (x, y)| acc | (x ^ y))
        == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_bytes_length_and_entropy() {
        let bytes = random_bytes(32);
        assert_eq!(bytes.len(), 32);
        assert!(bytes.iter().any(|&b| b != 0));

        assert!(random_bytes(0).is_empty());
    }

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq(b"token-r1", b"token-r1"));
        assert!(!constant_time_eq(b"token-r1", b"token-r2"));
        assert!(!constant_time_eq(b"token-r1", b"token-r"));
        assert!(constant_time_eq(b"", b""));
    }
}
