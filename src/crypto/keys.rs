//! Media Vault - Key Material
//!
//! The master key lives in the secure key store; the core only ever holds
//! it wrapped in [`VaultKey`] for the duration of a call.

use secrecy::{ExposeSecret, Secret};
use zeroize::ZeroizeOnDrop;

use crate::error::{VaultError, VaultResult};

/// Key length for AES-256
pub const KEY_LEN: usize = 32;

/// Nonce length for AES-GCM
pub const NONCE_LEN: usize = 12;

/// Secure key wrapper with automatic zeroization
#[derive(Clone, ZeroizeOnDrop)]
pub struct VaultKey {
    #[zeroize(skip)]
    inner: Secret<[u8; KEY_LEN]>,
}

impl VaultKey {
    /// Create a new vault key from bytes
    pub fn new(bytes: [u8; KEY_LEN]) -> Self {
        Self {
            inner: Secret::new(bytes),
        }
    }

    /// Create a vault key from a byte slice, rejecting wrong lengths
    pub fn from_slice(bytes: &[u8]) -> VaultResult<Self> {
        let arr: [u8; KEY_LEN] = bytes.try_into().map_err(|_| VaultError::InvalidKeyLength {
            expected: KEY_LEN,
            actual: bytes.len(),
        })?;
        Ok(Self::new(arr))
    }

    /// Expose the key bytes (use with caution)
    pub fn expose(&self) -> &[u8; KEY_LEN] {
        self.inner.expose_secret()
    }

    /// Generate a random key
    pub fn generate() -> Self {
        use rand::RngCore;
        let mut bytes = [0u8; KEY_LEN];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self::new(bytes)
    }
}

/// Generate a random nonce for AES-GCM
pub fn generate_nonce() -> [u8; NONCE_LEN] {
    use rand::RngCore;
    let mut nonce = [0u8; NONCE_LEN];
    rand::thread_rng().fill_bytes(&mut nonce);
    nonce
}
