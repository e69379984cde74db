//! Media Vault - Error Types

use thiserror::Error;

/// Result type for vault operations
pub type VaultResult<T> = Result<T, VaultError>;

/// Vault error types
#[derive(Error, Debug)]
pub enum VaultError {
    /// Codec input shorter than its own declared header implies.
    #[error("Encrypted payload truncated")]
    Truncated,

    /// AEAD tag verification failed: wrong key, tampered bytes, or a
    /// foreign version byte that slipped past the codec.
    #[error("Authentication failed - wrong key or corrupted data")]
    AuthenticationFailure,

    /// Artifact path missing or unreadable.
    #[error("Artifact not found: {0}")]
    NotFound(String),

    /// The secure key store did not return the requested slot.
    #[error("Secure key store unavailable: {0}")]
    KeyStoreUnavailable(String),

    /// The master key slot is already populated; overwriting it would
    /// strand every stored artifact.
    #[error("Master key already initialized")]
    MasterKeyExists,

    /// Write-path I/O failure. Always raised before the rename commits,
    /// so the target path keeps its prior contents.
    #[error("Storage failure: {0}")]
    StorageFailure(#[from] std::io::Error),

    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Invalid key length: expected {expected}, got {actual}")]
    InvalidKeyLength { expected: usize, actual: usize },
}

impl VaultError {
    /// Check if this error indicates corruption or tampering
    pub fn is_security_critical(&self) -> bool {
        matches!(
            self,
            VaultError::AuthenticationFailure | VaultError::Truncated
        )
    }
}
