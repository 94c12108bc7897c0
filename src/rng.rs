//! Cryptographically secure randomness.

use rand_core::{CryptoRng, OsRng, RngCore};

/// Cryptographically secure random number generator.
///
/// Thin wrapper around `OsRng`, so every nonce, key, and session identifier
/// in this crate draws from the operating system entropy source. There is
/// deliberately no fallback to a weaker generator.
pub struct SecureRng(OsRng);

impl SecureRng {
    /// Creates a new cryptographically secure random number generator.
    pub fn new() -> Self {
        Self(OsRng)
    }

    /// Returns `len` random bytes as a lowercase hex string.
    pub fn random_hex(&mut self, len: usize) -> String {
        let mut bytes = vec![0u8; len];
        self.0.fill_bytes(&mut bytes);
        hex::encode(bytes)
    }
}

impl Default for SecureRng {
    fn default() -> Self {
        Self::new()
    }
}

impl RngCore for SecureRng {
    fn next_u32(&mut self) -> u32 {
        self.0.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.0.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.0.fill_bytes(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
        self.0.try_fill_bytes(dest)
    }
}

impl CryptoRng for SecureRng {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_hex_length_and_charset() {
        let mut rng = SecureRng::new();
        let id = rng.random_hex(16);
        assert_eq!(id.len(), 32);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn random_hex_is_not_constant() {
        let mut rng = SecureRng::new();
        assert_ne!(rng.random_hex(16), rng.random_hex(16));
    }
}
