//! MD5 content keys used as integrity digests

use binrw::{BinRead, BinWrite};
use md5::{Digest, Md5};
use std::fmt;

/// Content key (MD5 of the decoded payload)
#[derive(BinRead, BinWrite, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentKey([u8; 16]);

impl ContentKey {
    /// Create content key from raw bytes
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    /// Compute the content key of a payload
    pub fn from_data(data: &[u8]) -> Self {
        let digest = Md5::digest(data);
        let mut bytes = [0u8; 16];
        bytes.copy_from_slice(&digest);
        Self(bytes)
    }

    /// Parse content key from hex string
    pub fn from_hex(hex: &str) -> Result<Self, hex::FromHexError> {
        let mut bytes = [0u8; 16];
        hex::decode_to_slice(hex, &mut bytes)?;
        Ok(Self(bytes))
    }

    /// Get raw bytes
    pub const fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    /// Convert to lowercase hex string
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Check that `data` hashes to this key
    pub fn verify(&self, data: &[u8]) -> bool {
        Self::from_data(data) == *self
    }
}

impl fmt::Display for ContentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}
