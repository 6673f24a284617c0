//! Access key record layout.
//!
//! Each access key is persisted as one fixed 64-byte box:
//!
//! ```text
//! offset  size  field
//!      0    32  recipient address
//!     32     8  valid_from  (u64, big-endian seconds)
//!     40     8  valid_until (u64, big-endian seconds)
//!     48     1  status      (1 = ACTIVE, 0 = REVOKED)
//!     49    15  reserved, zero-filled at creation, never interpreted
//! ```
//!
//! The layout is a compatibility contract with already-stored records; the
//! offsets and widths below must not change.

use crate::identifiers::{Address, ADDRESS_LEN};
use crate::time::Timestamp;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Size of the storage allocation for one record.
pub const RECORD_SIZE: usize = 64;

/// Number of bytes carrying meaning; the remainder is padding.
pub const RECORD_USED_LEN: usize = 49;

/// Offset of the recipient address.
pub const RECIPIENT_OFFSET: usize = 0;

/// Offset of the big-endian `valid_from` timestamp.
pub const VALID_FROM_OFFSET: usize = 32;

/// Offset of the big-endian `valid_until` timestamp.
pub const VALID_UNTIL_OFFSET: usize = 40;

/// Offset of the one-byte status flag.
pub const STATUS_OFFSET: usize = 48;

const TIMESTAMP_LEN: usize = 8;

/// Errors decoding a stored record.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordError {
    /// Box contents are not exactly [`RECORD_SIZE`] bytes.
    #[error("Record length {actual}, expected {RECORD_SIZE}")]
    InvalidLength {
        /// Observed length
        actual: usize,
    },

    /// Status byte is neither 0 nor 1.
    #[error("Invalid status byte {0:#04x}")]
    InvalidStatus(u8),

    /// Stored window violates `valid_from < valid_until`.
    #[error("Invalid time window: valid_from {valid_from} >= valid_until {valid_until}")]
    InvalidTimeWindow {
        /// Stored start of the window
        valid_from: Timestamp,
        /// Stored end of the window
        valid_until: Timestamp,
    },
}

/// Lifecycle flag of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum KeyStatus {
    /// Key was revoked by the owner; terminal.
    Revoked,
    /// Key is usable inside its time window.
    Active,
}

impl KeyStatus {
    /// Byte stored at [`STATUS_OFFSET`].
    pub const fn to_byte(self) -> u8 {
        match self {
            Self::Revoked => 0,
            Self::Active => 1,
        }
    }

    /// Parse the stored status byte.
    pub const fn from_byte(byte: u8) -> Result<Self, RecordError> {
        match byte {
            0 => Ok(Self::Revoked),
            1 => Ok(Self::Active),
            other => Err(RecordError::InvalidStatus(other)),
        }
    }
}

impl fmt::Display for KeyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Revoked => write!(f, "REVOKED"),
            Self::Active => write!(f, "ACTIVE"),
        }
    }
}

/// Decoded contents of one access key box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessKeyRecord {
    /// Principal the key was issued to
    pub recipient: Address,
    /// First second (inclusive) at which access is granted
    pub valid_from: Timestamp,
    /// Last second (inclusive) at which access is granted
    pub valid_until: Timestamp,
    /// Current lifecycle flag
    pub status: KeyStatus,
}

impl AccessKeyRecord {
    /// A freshly issued, active record.
    pub const fn active(recipient: Address, valid_from: Timestamp, valid_until: Timestamp) -> Self {
        Self {
            recipient,
            valid_from,
            valid_until,
            status: KeyStatus::Active,
        }
    }

    /// Whether the status flag is ACTIVE.
    pub fn is_active(&self) -> bool {
        self.status == KeyStatus::Active
    }

    /// Encode into the full zero-padded allocation.
    pub fn encode(&self) -> [u8; RECORD_SIZE] {
        let mut buf = [0u8; RECORD_SIZE];
        buf[RECIPIENT_OFFSET..RECIPIENT_OFFSET + ADDRESS_LEN]
            .copy_from_slice(self.recipient.as_bytes());
        buf[VALID_FROM_OFFSET..VALID_FROM_OFFSET + TIMESTAMP_LEN]
            .copy_from_slice(&self.valid_from.to_be_bytes());
        buf[VALID_UNTIL_OFFSET..VALID_UNTIL_OFFSET + TIMESTAMP_LEN]
            .copy_from_slice(&self.valid_until.to_be_bytes());
        buf[STATUS_OFFSET] = self.status.to_byte();
        buf
    }

    /// Decode box contents. Padding bytes are ignored.
    pub fn decode(bytes: &[u8]) -> Result<Self, RecordError> {
        let buf: &[u8; RECORD_SIZE] = bytes
            .try_into()
            .map_err(|_| RecordError::InvalidLength {
                actual: bytes.len(),
            })?;

        let mut recipient = [0u8; ADDRESS_LEN];
        recipient.copy_from_slice(&buf[RECIPIENT_OFFSET..RECIPIENT_OFFSET + ADDRESS_LEN]);
        let valid_from = read_timestamp(buf, VALID_FROM_OFFSET);
        let valid_until = read_timestamp(buf, VALID_UNTIL_OFFSET);
        let status = KeyStatus::from_byte(buf[STATUS_OFFSET])?;

        if valid_from >= valid_until {
            return Err(RecordError::InvalidTimeWindow {
                valid_from,
                valid_until,
            });
        }

        Ok(Self {
            recipient: Address::from_bytes(recipient),
            valid_from,
            valid_until,
            status,
        })
    }
}

fn read_timestamp(buf: &[u8; RECORD_SIZE], offset: usize) -> Timestamp {
    let mut raw = [0u8; TIMESTAMP_LEN];
    raw.copy_from_slice(&buf[offset..offset + TIMESTAMP_LEN]);
    Timestamp::from_be_bytes(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> AccessKeyRecord {
        AccessKeyRecord::active(
            Address::from_bytes([7u8; ADDRESS_LEN]),
            Timestamp::from_secs(1000),
            Timestamp::from_secs(2000),
        )
    }

    #[test]
    fn encode_places_fields_at_fixed_offsets() {
        let bytes = sample().encode();

        assert_eq!(&bytes[0..32], &[7u8; 32]);
        assert_eq!(&bytes[32..40], &1000u64.to_be_bytes());
        assert_eq!(&bytes[40..48], &2000u64.to_be_bytes());
        assert_eq!(bytes[48], 1);
        assert!(bytes[RECORD_USED_LEN..].iter().all(|b| *b == 0));
    }

    #[test]
    fn timestamps_are_big_endian() {
        let record = AccessKeyRecord::active(
            Address::from_bytes([0u8; ADDRESS_LEN]),
            Timestamp::from_secs(0x0102_0304_0506_0708),
            Timestamp::from_secs(u64::MAX),
        );
        let bytes = record.encode();
        assert_eq!(&bytes[32..40], &[1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(&bytes[40..48], &[0xff; 8]);
    }

    #[test]
    fn revoked_status_encodes_as_zero() {
        let mut record = sample();
        record.status = KeyStatus::Revoked;
        assert_eq!(record.encode()[STATUS_OFFSET], 0);
        assert_eq!(AccessKeyRecord::decode(&record.encode()), Ok(record));
    }

    #[test]
    fn decode_ignores_padding() {
        let mut bytes = sample().encode();
        bytes[RECORD_USED_LEN..].fill(0xee);
        assert_eq!(AccessKeyRecord::decode(&bytes), Ok(sample()));
    }

    #[test]
    fn decode_rejects_wrong_length() {
        let bytes = sample().encode();
        assert_eq!(
            AccessKeyRecord::decode(&bytes[..RECORD_USED_LEN]),
            Err(RecordError::InvalidLength {
                actual: RECORD_USED_LEN
            })
        );
    }

    #[test]
    fn decode_rejects_unknown_status() {
        let mut bytes = sample().encode();
        bytes[STATUS_OFFSET] = 2;
        assert_eq!(
            AccessKeyRecord::decode(&bytes),
            Err(RecordError::InvalidStatus(2))
        );
    }

    #[test]
    fn decode_rejects_inverted_window() {
        let mut bytes = sample().encode();
        bytes[40..48].copy_from_slice(&1000u64.to_be_bytes());
        assert!(matches!(
            AccessKeyRecord::decode(&bytes),
            Err(RecordError::InvalidTimeWindow { .. })
        ));
    }
}
