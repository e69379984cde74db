//! # Media Vault
//!
//! Local encrypted-blob vault for media and thumbnails.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                     MEDIA VAULT                      │
//! │  ┌────────────┐   ┌─────────────┐   ┌─────────────┐  │
//! │  │ KEY STORE  │   │   CIPHER    │   │   PAYLOAD   │  │
//! │  │ (injected) │   │ AES-256-GCM │   │    CODEC    │  │
//! │  └─────┬──────┘   └──────┬──────┘   └──────┬──────┘  │
//! │        │                 │                 │         │
//! │  ┌─────┴─────────────────┴─────────────────┴──────┐  │
//! │  │         VAULT STORE (atomic file writes)       │  │
//! │  │        Media/<id>.enc  Thumbs/<id>.thumb.enc   │  │
//! │  └────────────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! ## Guarantees
//!
//! - Every artifact is sealed with AES-256-GCM under a fresh random nonce
//! - The GCM tag is the single integrity check; any corruption fails closed
//! - Writes become visible only through an atomic rename, so readers never
//!   observe a half-written file
//! - The master key lives in the injected secure key store and is fetched
//!   per call, never cached or persisted by the vault

pub mod api;
pub mod crypto;
pub mod error;
pub mod keystore;
pub mod payload;
pub mod store;

pub use api::MediaVault;
pub use error::{VaultError, VaultResult};
pub use keystore::{FileKeyStore, MemoryKeyStore, SecureKeyStore};
pub use payload::{EncryptedRecord, PAYLOAD_VERSION};
pub use store::{ArtifactKind, VaultStore};

/// Media Vault version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
