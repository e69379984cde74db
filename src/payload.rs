//! Media Vault - Encrypted Payload Codec
//!
//! On-disk format of an encrypted artifact:
//! ```text
//! [VERSION   1B]
//! [NONCE_LEN 1B][0-255]
//! [NONCE     variable]
//! [TAG_LEN   1B][0-255]
//! [TAG       variable]
//! [CIPHERTEXT   everything after the tag]
//! ```
//!
//! The version byte is carried but never validated here. A corrupted or
//! unknown version parses fine and is rejected at decrypt time by the
//! AEAD tag, which is the single integrity check in the pipeline.

use crate::error::{VaultError, VaultResult};

/// Current payload format version
pub const PAYLOAD_VERSION: u8 = 1;

/// One encrypted record: the unit of protected storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedRecord {
    /// Format version tag
    pub version: u8,
    /// AEAD nonce, unique per encryption under the same key
    pub nonce: Vec<u8>,
    /// AEAD authentication tag
    pub tag: Vec<u8>,
    /// Ciphertext, same length as the plaintext
    pub ciphertext: Vec<u8>,
}

impl EncryptedRecord {
    /// Serialize to bytes (version || nonce_len || nonce || tag_len || tag || ciphertext)
    ///
    /// The Cipher Engine guarantees nonce and tag lengths fit in one byte.
    pub fn to_bytes(&self) -> Vec<u8> {
        debug_assert!(self.nonce.len() <= u8::MAX as usize);
        debug_assert!(self.tag.len() <= u8::MAX as usize);

        let mut data =
            Vec::with_capacity(3 + self.nonce.len() + self.tag.len() + self.ciphertext.len());
        data.push(self.version);
        data.push(self.nonce.len() as u8);
        data.extend_from_slice(&self.nonce);
        data.push(self.tag.len() as u8);
        data.extend_from_slice(&self.tag);
        data.extend_from_slice(&self.ciphertext);
        data
    }

    /// Deserialize from bytes
    ///
    /// Pure and total: any input either yields a record or `Truncated`,
    /// never a panic and never I/O.
    pub fn from_bytes(data: &[u8]) -> VaultResult<Self> {
        // Room for version + nonce_len + tag_len at minimum
        if data.len() <= 3 {
            return Err(VaultError::Truncated);
        }

        let version = data[0];
        let nonce_len = data[1] as usize;

        // Declared nonce plus the tag-length byte must fit
        if data.len() <= 2 + nonce_len {
            return Err(VaultError::Truncated);
        }
        let nonce = data[2..2 + nonce_len].to_vec();

        let tag_len = data[2 + nonce_len] as usize;

        // Declared tag must fit
        if data.len() <= 3 + nonce_len + tag_len {
            return Err(VaultError::Truncated);
        }
        let tag = data[3 + nonce_len..3 + nonce_len + tag_len].to_vec();

        let ciphertext = data[3 + nonce_len + tag_len..].to_vec();

        Ok(Self {
            version,
            nonce,
            tag,
            ciphertext,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> EncryptedRecord {
        EncryptedRecord {
            version: PAYLOAD_VERSION,
            nonce: vec![0x11; 12],
            tag: vec![0x22; 16],
            ciphertext: b"opaque ciphertext bytes".to_vec(),
        }
    }

    #[test]
    fn test_roundtrip_preserves_fields() {
        let record = sample_record();
        let blob = record.to_bytes();
        let parsed = EncryptedRecord::from_bytes(&blob).unwrap();
        assert_eq!(parsed, record);
    }

    #[test]
    fn test_layout_is_bit_exact() {
        let record = sample_record();
        let blob = record.to_bytes();

        assert_eq!(blob[0], PAYLOAD_VERSION);
        assert_eq!(blob[1], 12);
        assert_eq!(&blob[2..14], record.nonce.as_slice());
        assert_eq!(blob[14], 16);
        assert_eq!(&blob[15..31], record.tag.as_slice());
        assert_eq!(&blob[31..], record.ciphertext.as_slice());
    }

    #[test]
    fn test_short_input_rejected() {
        for len in 0..=3 {
            let blob = vec![0u8; len];
            assert!(matches!(
                EncryptedRecord::from_bytes(&blob),
                Err(VaultError::Truncated)
            ));
        }
    }

    #[test]
    fn test_truncated_nonce_rejected() {
        // Declares a 12-byte nonce but only carries 4 bytes
        let mut blob = vec![PAYLOAD_VERSION, 12];
        blob.extend_from_slice(&[0xAA; 4]);
        assert!(matches!(
            EncryptedRecord::from_bytes(&blob),
            Err(VaultError::Truncated)
        ));
    }

    #[test]
    fn test_truncated_tag_rejected() {
        // Full nonce, declares a 16-byte tag but carries 3 bytes
        let mut blob = vec![PAYLOAD_VERSION, 12];
        blob.extend_from_slice(&[0xAA; 12]);
        blob.push(16);
        blob.extend_from_slice(&[0xBB; 3]);
        assert!(matches!(
            EncryptedRecord::from_bytes(&blob),
            Err(VaultError::Truncated)
        ));
    }

    #[test]
    fn test_ciphertext_boundary() {
        // Exactly header + tag, no ciphertext: rejected
        let mut blob = vec![PAYLOAD_VERSION, 12];
        blob.extend_from_slice(&[0xAA; 12]);
        blob.push(16);
        blob.extend_from_slice(&[0xBB; 16]);
        assert!(matches!(
            EncryptedRecord::from_bytes(&blob),
            Err(VaultError::Truncated)
        ));

        // One ciphertext byte past the tag: accepted
        blob.push(0xCC);
        let parsed = EncryptedRecord::from_bytes(&blob).unwrap();
        assert_eq!(parsed.ciphertext, vec![0xCC]);
    }

    #[test]
    fn test_trailing_truncation_rejected() {
        let blob = sample_record().to_bytes();
        let short = &blob[..blob.len() - 5];
        assert!(matches!(
            EncryptedRecord::from_bytes(short),
            Err(VaultError::Truncated)
        ));
    }

    #[test]
    fn test_version_byte_not_validated() {
        let mut blob = sample_record().to_bytes();
        blob[0] = 0xFF;
        let parsed = EncryptedRecord::from_bytes(&blob).unwrap();
        assert_eq!(parsed.version, 0xFF);
    }
}
