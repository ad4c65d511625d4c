//! Encryption-at-rest for stored database secrets.
//!
//! ChaCha20-Poly1305 with a fresh random nonce per write; the stored form is
//! base64 of `nonce || ciphertext`. The key is supplied by configuration and
//! is the only input needed for decryption.

use crate::error::{StoreError, StoreResult};
use base64::{Engine, engine::general_purpose::STANDARD};
use chacha20poly1305::aead::{Aead, AeadCore, KeyInit, OsRng};
use chacha20poly1305::{ChaCha20Poly1305, Key, Nonce};

const NONCE_SIZE: usize = 12;

/// Symmetric cipher wrapping one 32-byte key.
#[derive(Clone)]
pub struct SecretBox {
    cipher: ChaCha20Poly1305,
}

impl SecretBox {
    pub fn new(key: &[u8; 32]) -> Self {
        Self {
            cipher: ChaCha20Poly1305::new(Key::from_slice(key)),
        }
    }

    /// Builds a cipher from a base64-encoded 32-byte key.
    pub fn from_base64_key(encoded: &str) -> StoreResult<Self> {
        let bytes = STANDARD
            .decode(encoded)
            .map_err(|e| StoreError::Encryption(format!("invalid key encoding: {e}")))?;
        let key: [u8; 32] = bytes.try_into().map_err(|b: Vec<u8>| {
            StoreError::Encryption(format!("key must be 32 bytes, got {}", b.len()))
        })?;
        Ok(Self::new(&key))
    }

    /// Encrypts a secret for storage. Each call uses a fresh nonce, so the
    /// same plaintext never produces the same ciphertext twice.
    pub fn encrypt(&self, plaintext: &str) -> StoreResult<String> {
        let nonce = ChaCha20Poly1305::generate_nonce(&mut OsRng);
        let ciphertext = self
            .cipher
            .encrypt(&nonce, plaintext.as_bytes())
            .map_err(|e| StoreError::Encryption(format!("encrypt failed: {e}")))?;

        let mut out = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
        out.extend_from_slice(&nonce);
        out.extend_from_slice(&ciphertext);
        Ok(STANDARD.encode(out))
    }

    /// Decrypts a stored secret.
    pub fn decrypt(&self, stored: &str) -> StoreResult<String> {
        let bytes = STANDARD
            .decode(stored)
            .map_err(|e| StoreError::Encryption(format!("invalid ciphertext encoding: {e}")))?;
        if bytes.len() < NONCE_SIZE {
            return Err(StoreError::Encryption("ciphertext too short".to_string()));
        }
        let (nonce, ciphertext) = bytes.split_at(NONCE_SIZE);
        let plaintext = self
            .cipher
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map_err(|_| StoreError::Encryption("decrypt failed".to_string()))?;
        String::from_utf8(plaintext)
            .map_err(|e| StoreError::Encryption(format!("invalid plaintext: {e}")))
    }
}
