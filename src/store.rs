//! Media Vault - Artifact Store
//!
//! Maps logical artifacts to filesystem paths and performs crash-safe
//! writes. Layout under the vault root:
//!
//! ```text
//! <root>/Media/<id>.enc
//! <root>/Thumbs/<id>.thumb.enc
//! ```
//!
//! Every write lands on a `.tmp` sibling first and becomes visible only
//! through the final rename, so a reader of the stable path sees either
//! the complete old content or the complete new content, never a torn
//! write. A crash between the temp write and the rename leaves the prior
//! content in place plus, possibly, an orphaned temp file; those are only
//! removed by an explicit [`VaultStore::sweep_temp_files`] call.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use uuid::Uuid;

use crate::crypto::{self, VaultKey};
use crate::error::{VaultError, VaultResult};
use crate::payload::EncryptedRecord;

/// Suffix appended to the final file name while a write is in flight
const TEMP_SUFFIX: &str = ".tmp";

/// Kind of encrypted artifact, determines folder and extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Media,
    Thumbnail,
}

impl ArtifactKind {
    /// Storage subdirectory under the vault root
    pub fn folder(&self) -> &'static str {
        match self {
            ArtifactKind::Media => "Media",
            ArtifactKind::Thumbnail => "Thumbs",
        }
    }

    /// File extension, appended to the id
    pub fn extension(&self) -> &'static str {
        match self {
            ArtifactKind::Media => "enc",
            ArtifactKind::Thumbnail => "thumb.enc",
        }
    }
}

/// Artifact store rooted at a vault directory
pub struct VaultStore {
    root: PathBuf,
}

impl VaultStore {
    /// Create a store rooted at `root`. Directories are created lazily on
    /// first write, not here.
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Deterministic path for an artifact: `<root>/<folder>/<id>.<ext>`
    pub fn path_for(&self, kind: ArtifactKind, id: &str) -> PathBuf {
        self.root
            .join(kind.folder())
            .join(format!("{}.{}", id, kind.extension()))
    }

    /// Freshly generated collision-resistant artifact id
    pub fn new_id(&self) -> String {
        Uuid::new_v4().to_string()
    }

    // ═══════════════════════════════════════════════════════════════════════
    // DURABLE WRITES
    // ═══════════════════════════════════════════════════════════════════════

    /// Write `data` to `path` atomically
    ///
    /// The bytes are flushed to a temp sibling first; the rename onto the
    /// final name is the sole visibility transition. Any failure before
    /// the rename leaves the target's prior state untouched.
    pub fn atomic_write(&self, path: &Path, data: &[u8]) -> VaultResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let temp_path = temp_sibling(path);

        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_path)?;
        file.write_all(data)?;
        file.sync_all()?;
        drop(file);

        if path.exists() {
            fs::remove_file(path)?;
        }
        fs::rename(&temp_path, path)?;

        debug!("wrote {} bytes to {}", data.len(), path.display());
        Ok(())
    }

    // ═══════════════════════════════════════════════════════════════════════
    // ARTIFACT OPERATIONS
    // ═══════════════════════════════════════════════════════════════════════

    /// Encrypt `plaintext` and store it as the artifact `(kind, id)`
    ///
    /// Writing an id that already exists replaces its content wholesale.
    pub fn encrypt_and_store(
        &self,
        plaintext: &[u8],
        kind: ArtifactKind,
        id: &str,
        key: &VaultKey,
    ) -> VaultResult<PathBuf> {
        let record = crypto::encrypt(key, plaintext)?;
        let path = self.path_for(kind, id);
        self.atomic_write(&path, &record.to_bytes())?;
        Ok(path)
    }

    /// Load the artifact `(kind, id)` and decrypt it
    ///
    /// Distinguishes never-written (`NotFound`) from bad framing
    /// (`Truncated`) from failed authentication.
    pub fn load_and_decrypt(
        &self,
        kind: ArtifactKind,
        id: &str,
        key: &VaultKey,
    ) -> VaultResult<Vec<u8>> {
        let path = self.path_for(kind, id);
        let data = fs::read(&path).map_err(|_| VaultError::NotFound(path.display().to_string()))?;

        let record = EncryptedRecord::from_bytes(&data)?;
        crypto::decrypt(key, &record)
    }

    /// Check whether the artifact exists on disk
    pub fn exists(&self, kind: ArtifactKind, id: &str) -> bool {
        self.path_for(kind, id).exists()
    }

    /// Delete the artifact if present
    pub fn delete(&self, kind: ArtifactKind, id: &str) -> VaultResult<()> {
        let path = self.path_for(kind, id);
        if path.exists() {
            fs::remove_file(&path)?;
            debug!("deleted {}", path.display());
        }
        Ok(())
    }

    /// List the ids of all artifacts of a kind
    pub fn list(&self, kind: ArtifactKind) -> VaultResult<Vec<String>> {
        let dir = self.root.join(kind.folder());
        let mut ids = Vec::new();

        if dir.exists() {
            let suffix = format!(".{}", kind.extension());
            for entry in fs::read_dir(&dir)? {
                let entry = entry?;
                if let Some(name) = entry.file_name().to_str() {
                    if let Some(id) = name.strip_suffix(&suffix) {
                        ids.push(id.to_string());
                    }
                }
            }
        }

        ids.sort();
        Ok(ids)
    }

    /// Remove temp files orphaned by a crash mid-write
    ///
    /// Never runs implicitly; the atomic-write contract itself does not
    /// clean these up.
    pub fn sweep_temp_files(&self) -> VaultResult<usize> {
        let mut removed = 0;

        for kind in [ArtifactKind::Media, ArtifactKind::Thumbnail] {
            let dir = self.root.join(kind.folder());
            if !dir.exists() {
                continue;
            }
            for entry in fs::read_dir(&dir)? {
                let entry = entry?;
                let path = entry.path();
                let is_temp = path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .map(|n| n.ends_with(TEMP_SUFFIX))
                    .unwrap_or(false);
                if is_temp {
                    warn!("removing stale temp file {}", path.display());
                    fs::remove_file(&path)?;
                    removed += 1;
                }
            }
        }

        Ok(removed)
    }
}

/// Temp path next to `path`: same directory, final name plus [`TEMP_SUFFIX`]
fn temp_sibling(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(TEMP_SUFFIX);
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn store() -> (tempfile::TempDir, VaultStore) {
        let dir = tempdir().unwrap();
        let store = VaultStore::new(dir.path());
        (dir, store)
    }

    #[test]
    fn test_path_layout() {
        let (_dir, store) = store();
        let media = store.path_for(ArtifactKind::Media, "abc");
        let thumb = store.path_for(ArtifactKind::Thumbnail, "abc");

        assert!(media.ends_with("Media/abc.enc"));
        assert!(thumb.ends_with("Thumbs/abc.thumb.enc"));
    }

    #[test]
    fn test_store_and_load_roundtrip() {
        let (_dir, store) = store();
        let key = VaultKey::generate();
        let id = store.new_id();

        let path = store
            .encrypt_and_store(b"SecretMessage123", ArtifactKind::Media, &id, &key)
            .unwrap();
        assert!(path.exists());
        assert!(store.exists(ArtifactKind::Media, &id));

        let plaintext = store.load_and_decrypt(ArtifactKind::Media, &id, &key).unwrap();
        assert_eq!(plaintext, b"SecretMessage123");
    }

    #[test]
    fn test_replace_semantics() {
        let (_dir, store) = store();
        let key = VaultKey::generate();

        store
            .encrypt_and_store(b"content X", ArtifactKind::Media, "abc", &key)
            .unwrap();
        store
            .encrypt_and_store(b"content Y, a bit longer", ArtifactKind::Media, "abc", &key)
            .unwrap();

        let plaintext = store.load_and_decrypt(ArtifactKind::Media, "abc", &key).unwrap();
        assert_eq!(plaintext, b"content Y, a bit longer");
    }

    #[test]
    fn test_missing_artifact_is_not_found() {
        let (_dir, store) = store();
        let key = VaultKey::generate();

        assert!(matches!(
            store.load_and_decrypt(ArtifactKind::Media, "nope", &key),
            Err(VaultError::NotFound(_))
        ));
    }

    #[test]
    fn test_truncated_file_is_rejected() {
        let (_dir, store) = store();
        let key = VaultKey::generate();

        let path = store
            .encrypt_and_store(b"SecretMessage123", ArtifactKind::Media, "abc", &key)
            .unwrap();

        let data = fs::read(&path).unwrap();
        fs::write(&path, &data[..data.len() - 5]).unwrap();

        assert!(matches!(
            store.load_and_decrypt(ArtifactKind::Media, "abc", &key),
            Err(VaultError::Truncated)
        ));
    }

    #[test]
    fn test_corrupted_version_fails_authentication() {
        let (_dir, store) = store();
        let key = VaultKey::generate();

        let path = store
            .encrypt_and_store(b"SecretMessage123", ArtifactKind::Media, "abc", &key)
            .unwrap();

        let mut data = fs::read(&path).unwrap();
        data[0] = 0xFF;
        fs::write(&path, &data).unwrap();

        assert!(matches!(
            store.load_and_decrypt(ArtifactKind::Media, "abc", &key),
            Err(VaultError::AuthenticationFailure)
        ));
    }

    #[test]
    fn test_no_temp_file_left_after_write() {
        let (_dir, store) = store();
        let key = VaultKey::generate();

        let path = store
            .encrypt_and_store(b"data", ArtifactKind::Media, "abc", &key)
            .unwrap();

        let temp = temp_sibling(&path);
        assert!(!temp.exists());
        assert!(path.exists());
    }

    #[test]
    fn test_sweep_removes_only_temp_files() {
        let (_dir, store) = store();
        let key = VaultKey::generate();

        let path = store
            .encrypt_and_store(b"data", ArtifactKind::Media, "abc", &key)
            .unwrap();

        // Plant orphans as a crashed writer would leave them
        fs::write(temp_sibling(&path), b"partial").unwrap();
        let thumb_dir = store.root().join(ArtifactKind::Thumbnail.folder());
        fs::create_dir_all(&thumb_dir).unwrap();
        fs::write(thumb_dir.join("x.thumb.enc.tmp"), b"partial").unwrap();

        assert_eq!(store.sweep_temp_files().unwrap(), 2);
        assert!(path.exists());
        assert_eq!(store.sweep_temp_files().unwrap(), 0);
    }

    #[test]
    fn test_delete_is_idempotent() {
        let (_dir, store) = store();
        let key = VaultKey::generate();

        store
            .encrypt_and_store(b"data", ArtifactKind::Media, "abc", &key)
            .unwrap();
        store.delete(ArtifactKind::Media, "abc").unwrap();
        assert!(!store.exists(ArtifactKind::Media, "abc"));

        // Deleting again is fine
        store.delete(ArtifactKind::Media, "abc").unwrap();
    }

    #[test]
    fn test_list_recovers_ids() {
        let (_dir, store) = store();
        let key = VaultKey::generate();

        store
            .encrypt_and_store(b"a", ArtifactKind::Media, "id-b", &key)
            .unwrap();
        store
            .encrypt_and_store(b"b", ArtifactKind::Media, "id-a", &key)
            .unwrap();
        store
            .encrypt_and_store(b"t", ArtifactKind::Thumbnail, "id-a", &key)
            .unwrap();

        assert_eq!(store.list(ArtifactKind::Media).unwrap(), vec!["id-a", "id-b"]);
        assert_eq!(store.list(ArtifactKind::Thumbnail).unwrap(), vec!["id-a"]);
    }
}
