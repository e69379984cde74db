//! Media Vault - AEAD Cipher Engine
//!
//! AES-256-GCM between plaintext bytes and [`EncryptedRecord`]s. The tag is
//! carried as its own payload field, so the AEAD output is split after
//! sealing and rejoined before opening.

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};

use super::keys::{generate_nonce, VaultKey, NONCE_LEN};
use crate::error::{VaultError, VaultResult};
use crate::payload::{EncryptedRecord, PAYLOAD_VERSION};

/// GCM authentication tag length
pub const TAG_LEN: usize = 16;

/// Encrypt plaintext under the vault key with a fresh random nonce
///
/// Ciphertext length equals plaintext length; the 16-byte tag travels in
/// its own record field.
pub fn encrypt(key: &VaultKey, plaintext: &[u8]) -> VaultResult<EncryptedRecord> {
    let cipher = Aes256Gcm::new_from_slice(key.expose())
        .map_err(|e| VaultError::EncryptionFailed(e.to_string()))?;

    let nonce_bytes = generate_nonce();
    let nonce = Nonce::from_slice(&nonce_bytes);

    let mut sealed = cipher
        .encrypt(nonce, plaintext)
        .map_err(|e| VaultError::EncryptionFailed(e.to_string()))?;

    // aes-gcm appends the tag to the ciphertext
    let tag = sealed.split_off(sealed.len() - TAG_LEN);

    Ok(EncryptedRecord {
        version: PAYLOAD_VERSION,
        nonce: nonce_bytes.to_vec(),
        tag,
        ciphertext: sealed,
    })
}

/// Decrypt a record under the vault key
///
/// This is the sole integrity check in the pipeline: a wrong key, any bit
/// flip in nonce/tag/ciphertext, or a foreign version byte all surface as
/// [`VaultError::AuthenticationFailure`]. No partial plaintext is ever
/// returned.
pub fn decrypt(key: &VaultKey, record: &EncryptedRecord) -> VaultResult<Vec<u8>> {
    let cipher = Aes256Gcm::new_from_slice(key.expose())
        .map_err(|_| VaultError::AuthenticationFailure)?;

    // The codec carries any version byte through; content sealed under a
    // different scheme is rejected here, as a failed authentication.
    if record.version != PAYLOAD_VERSION {
        return Err(VaultError::AuthenticationFailure);
    }

    if record.nonce.len() != NONCE_LEN {
        return Err(VaultError::AuthenticationFailure);
    }
    let nonce = Nonce::from_slice(&record.nonce);

    let mut sealed = Vec::with_capacity(record.ciphertext.len() + record.tag.len());
    sealed.extend_from_slice(&record.ciphertext);
    sealed.extend_from_slice(&record.tag);

    cipher
        .decrypt(nonce, sealed.as_slice())
        .map_err(|_| VaultError::AuthenticationFailure)
}
