//! Media Vault - Public API
//!
//! Composes the artifact store with the injected secure key store. The
//! master key is re-fetched from the key store on every encrypt/decrypt
//! call; the vault never caches it and never synthesizes a fallback key.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::info;
use sha2::{Digest, Sha256};

use crate::crypto::VaultKey;
use crate::error::{VaultError, VaultResult};
use crate::keystore::{SecureKeyStore, MASTER_KEY_SLOT, PIN_HASH_SLOT};
use crate::store::{ArtifactKind, VaultStore};

/// Local encrypted media vault
pub struct MediaVault {
    store: VaultStore,
    keystore: Arc<dyn SecureKeyStore>,
}

impl MediaVault {
    /// Open a vault rooted at `root`, backed by the given key store
    pub fn new<P: AsRef<Path>>(root: P, keystore: Arc<dyn SecureKeyStore>) -> Self {
        Self {
            store: VaultStore::new(root),
            keystore,
        }
    }

    pub fn store(&self) -> &VaultStore {
        &self.store
    }

    // ═══════════════════════════════════════════════════════════════════════
    // MASTER KEY
    // ═══════════════════════════════════════════════════════════════════════

    /// Generate a master key and persist it in the key store
    ///
    /// Refuses to overwrite an existing key: losing it would strand every
    /// artifact in the vault.
    pub fn init_master_key(&self) -> VaultResult<VaultKey> {
        if self.keystore.get(MASTER_KEY_SLOT).is_some() {
            return Err(VaultError::MasterKeyExists);
        }

        let key = VaultKey::generate();
        if !self.keystore.put(MASTER_KEY_SLOT, key.expose()) {
            return Err(VaultError::KeyStoreUnavailable(
                "failed to persist master key".into(),
            ));
        }

        info!("master key initialized");
        Ok(key)
    }

    /// Fetch the master key from the key store
    fn master_key(&self) -> VaultResult<VaultKey> {
        let raw = self
            .keystore
            .get(MASTER_KEY_SLOT)
            .ok_or_else(|| VaultError::KeyStoreUnavailable("master key missing".into()))?;
        VaultKey::from_slice(&raw)
    }

    // ═══════════════════════════════════════════════════════════════════════
    // MEDIA OPERATIONS
    // ═══════════════════════════════════════════════════════════════════════

    /// Encrypt and store a media payload under a fresh id
    pub fn store_media(&self, plaintext: &[u8]) -> VaultResult<String> {
        let id = self.store.new_id();
        self.store_media_as(&id, plaintext)?;
        Ok(id)
    }

    /// Encrypt and store a media payload under a caller-chosen id,
    /// replacing any existing content
    pub fn store_media_as(&self, id: &str, plaintext: &[u8]) -> VaultResult<PathBuf> {
        let key = self.master_key()?;
        self.store
            .encrypt_and_store(plaintext, ArtifactKind::Media, id, &key)
    }

    /// Encrypt and store a thumbnail for an existing id
    pub fn store_thumbnail(&self, id: &str, plaintext: &[u8]) -> VaultResult<PathBuf> {
        let key = self.master_key()?;
        self.store
            .encrypt_and_store(plaintext, ArtifactKind::Thumbnail, id, &key)
    }

    /// Load and decrypt a media payload
    pub fn load_media(&self, id: &str) -> VaultResult<Vec<u8>> {
        let key = self.master_key()?;
        self.store.load_and_decrypt(ArtifactKind::Media, id, &key)
    }

    /// Load and decrypt a thumbnail
    pub fn load_thumbnail(&self, id: &str) -> VaultResult<Vec<u8>> {
        let key = self.master_key()?;
        self.store
            .load_and_decrypt(ArtifactKind::Thumbnail, id, &key)
    }

    /// Delete a media payload and its thumbnail, if present
    pub fn delete(&self, id: &str) -> VaultResult<()> {
        self.store.delete(ArtifactKind::Media, id)?;
        self.store.delete(ArtifactKind::Thumbnail, id)?;
        Ok(())
    }

    /// List all stored media ids
    pub fn list_media(&self) -> VaultResult<Vec<String>> {
        self.store.list(ArtifactKind::Media)
    }

    /// Remove temp files orphaned by a crash mid-write
    pub fn sweep_temp_files(&self) -> VaultResult<usize> {
        self.store.sweep_temp_files()
    }

    // ═══════════════════════════════════════════════════════════════════════
    // PIN VERIFIER
    // ═══════════════════════════════════════════════════════════════════════

    /// Store a verifier hash for the PIN
    pub fn set_pin(&self, pin: &str) -> VaultResult<()> {
        let hash = pin_hash(pin);
        if !self.keystore.put(PIN_HASH_SLOT, &hash) {
            return Err(VaultError::KeyStoreUnavailable(
                "failed to persist PIN hash".into(),
            ));
        }
        Ok(())
    }

    /// Check a PIN against the stored verifier hash
    ///
    /// Returns `false` when no hash has been stored yet.
    pub fn verify_pin(&self, pin: &str) -> bool {
        let Some(stored) = self.keystore.get(PIN_HASH_SLOT) else {
            return false;
        };
        let computed = pin_hash(pin);
        // Constant-time comparison
        stored.len() == computed.len()
            && stored
                .iter()
                .zip(computed.iter())
                .fold(0u8, |acc, (a, b)| acc | (a ^ b))
                == 0
    }
}

fn pin_hash(pin: &str) -> [u8; 32] {
    Sha256::digest(pin.as_bytes()).into()
}
