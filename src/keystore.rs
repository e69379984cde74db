//! Media Vault - Secure Key Store
//!
//! The master key and PIN verifier hash live outside the vault, in the
//! platform's protected credential storage. The core only sees that
//! storage through the [`SecureKeyStore`] trait, injected into the vault
//! so tests can swap in the in-memory fake.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use base64::{engine::general_purpose::STANDARD as B64, Engine as _};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

/// Slot name for the vault master key
pub const MASTER_KEY_SLOT: &str = "vault.master-key";

/// Slot name for the PIN verifier hash
pub const PIN_HASH_SLOT: &str = "vault.pin-hash";

/// Opaque byte-blob storage keyed by name
///
/// Both slots hold raw byte blobs; the vault imposes no internal format.
pub trait SecureKeyStore: Send + Sync {
    /// Store a value, overwriting any existing value under `name`
    fn put(&self, name: &str, value: &[u8]) -> bool;

    /// Retrieve a value, or `None` if the slot is empty
    fn get(&self, name: &str) -> Option<Vec<u8>>;
}

// ═══════════════════════════════════════════════════════════════════════════
// In-memory store (tests, embedding)
// ═══════════════════════════════════════════════════════════════════════════

/// In-memory key store
#[derive(Default)]
pub struct MemoryKeyStore {
    slots: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryKeyStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SecureKeyStore for MemoryKeyStore {
    fn put(&self, name: &str, value: &[u8]) -> bool {
        self.slots.write().insert(name.to_string(), value.to_vec());
        true
    }

    fn get(&self, name: &str) -> Option<Vec<u8>> {
        self.slots.read().get(name).cloned()
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// File-backed store (CLI)
// ═══════════════════════════════════════════════════════════════════════════

/// JSON-file key store, the CLI's stand-in for the OS credential store.
///
/// Slots are base64 blobs in a flat JSON object. This file is only as
/// protected as its filesystem permissions; real deployments back the
/// trait with platform credential storage instead.
pub struct FileKeyStore {
    path: PathBuf,
}

#[derive(Default, Serialize, Deserialize)]
struct SlotFile {
    slots: HashMap<String, String>,
}

impl FileKeyStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Slots currently on disk
    ///
    /// A missing file is an empty store. A file that exists but cannot
    /// be read or parsed is `None`: it must never be rewritten from a
    /// default, or every other slot would be destroyed.
    fn load(&self) -> Option<SlotFile> {
        if !self.path.exists() {
            return Some(SlotFile::default());
        }
        let data = fs::read(&self.path).ok()?;
        serde_json::from_slice(&data).ok()
    }

    fn save(&self, file: &SlotFile) -> bool {
        let Ok(data) = serde_json::to_vec_pretty(file) else {
            return false;
        };
        if let Some(parent) = self.path.parent() {
            if fs::create_dir_all(parent).is_err() {
                return false;
            }
        }
        fs::write(&self.path, data).is_ok()
    }
}

impl SecureKeyStore for FileKeyStore {
    fn put(&self, name: &str, value: &[u8]) -> bool {
        let Some(mut file) = self.load() else {
            return false;
        };
        file.slots.insert(name.to_string(), B64.encode(value));
        self.save(&file)
    }

    fn get(&self, name: &str) -> Option<Vec<u8>> {
        let file = self.load()?;
        let encoded = file.slots.get(name)?;
        B64.decode(encoded).ok()
    }
}
