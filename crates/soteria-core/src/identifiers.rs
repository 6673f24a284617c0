//! Identifiers for access keys and the principals that hold or issue them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Maximum length of a key identifier in bytes.
pub const MAX_KEY_ID_LEN: usize = 64;

/// Length of an [`Address`] in bytes.
pub const ADDRESS_LEN: usize = 32;

/// Errors raised while constructing identifiers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentifierError {
    /// Key id is empty or longer than [`MAX_KEY_ID_LEN`].
    #[error("Invalid key id: length {len} outside 1..={MAX_KEY_ID_LEN}")]
    InvalidKeyId {
        /// Length of the rejected id
        len: usize,
    },

    /// Address text is not 64 hex characters.
    #[error("Invalid address: {reason}")]
    InvalidAddress {
        /// What was wrong with the input
        reason: String,
    },
}

/// Opaque, caller-chosen identifier of one access key record.
///
/// The id names the storage box holding the record, so it carries the same
/// bounds as a box name: between 1 and 64 bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct KeyId(Vec<u8>);

impl KeyId {
    /// Create a key id from raw bytes.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Result<Self, IdentifierError> {
        let bytes = bytes.into();
        if bytes.is_empty() || bytes.len() > MAX_KEY_ID_LEN {
            return Err(IdentifierError::InvalidKeyId { len: bytes.len() });
        }
        Ok(Self(bytes))
    }

    /// Borrow the raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Number of bytes in the id.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the id has no bytes; never true for a constructed id.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl TryFrom<Vec<u8>> for KeyId {
    type Error = IdentifierError;

    fn try_from(value: Vec<u8>) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for KeyId {
    type Error = IdentifierError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value.as_bytes())
    }
}

impl From<KeyId> for Vec<u8> {
    fn from(value: KeyId) -> Self {
        value.0
    }
}

impl FromStr for KeyId {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.as_bytes())
    }
}

impl fmt::Display for KeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.0))
    }
}

/// 32-byte principal identity: the owner, a caller, or a key recipient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Address(pub [u8; ADDRESS_LEN]);

impl Address {
    /// Create an address from raw bytes.
    pub const fn from_bytes(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }

    /// Borrow the raw bytes.
    pub fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl FromStr for Address {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s.trim()).map_err(|e| IdentifierError::InvalidAddress {
            reason: e.to_string(),
        })?;
        let array: [u8; ADDRESS_LEN] = bytes.try_into().map_err(|b: Vec<u8>| {
            IdentifierError::InvalidAddress {
                reason: format!("expected {ADDRESS_LEN} bytes, got {}", b.len()),
            }
        })?;
        Ok(Self(array))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_id_bounds() {
        assert!(KeyId::new(Vec::new()).is_err());
        assert!(KeyId::new(vec![b'a'; MAX_KEY_ID_LEN]).is_ok());
        assert_eq!(
            KeyId::new(vec![b'a'; MAX_KEY_ID_LEN + 1]),
            Err(IdentifierError::InvalidKeyId {
                len: MAX_KEY_ID_LEN + 1
            })
        );
    }

    #[test]
    fn key_id_displays_as_text() {
        let id: KeyId = "room42".parse().unwrap();
        assert_eq!(id.to_string(), "room42");
        assert_eq!(id.as_bytes(), b"room42");
    }

    #[test]
    fn address_hex_roundtrip() {
        let addr = Address::from_bytes([0xab; ADDRESS_LEN]);
        let text = addr.to_string();
        assert_eq!(text.len(), 64);
        assert_eq!(text.parse::<Address>().unwrap(), addr);
    }

    #[test]
    fn address_rejects_short_hex() {
        assert!(matches!(
            "abcd".parse::<Address>(),
            Err(IdentifierError::InvalidAddress { .. })
        ));
        assert!("zz".repeat(32).parse::<Address>().is_err());
    }
}
