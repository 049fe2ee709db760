//! Cryptographic utilities

use rand::Rng;
use sha2::{Digest, Sha256};

/// Generate a cryptographically secure random token
pub fn generate_secure_token(length: usize) -> String {
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    let mut rng = rand::rng();

    (0..length)
        .map(|_| {
            let idx = rng.random_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}

/// SHA-256 of a token, hex encoded; the form refresh tokens are stored in
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_secure_token() {
        let token1 = generate_secure_token(48);
        let token2 = generate_secure_token(48);

        assert_eq!(token1.len(), 48);
        assert!(token1.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(token1, token2);
    }

    #[test]
    fn test_hash_token() {
        let hash = hash_token("test");
        assert_eq!(hash.len(), 64);
        assert_eq!(hash, hash_token("test"));
        assert_ne!(hash, hash_token("different"));
        assert_eq!(
            hash,
            "9f86d081884c7d659a2feaa0c55ad015a3bf4f1b2b0b822cd15d6c15b0f00a08"
        );
    }
}
