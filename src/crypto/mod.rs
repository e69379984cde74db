//! Media Vault - Cryptographic Core
//!
//! Key material handling and the AES-256-GCM cipher engine.

pub mod aead;
pub mod keys;

pub use aead::*;
pub use keys::*;
