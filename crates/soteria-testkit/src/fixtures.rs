//! Shared identities and key ids.

use soteria_core::{Address, KeyId};

/// The ledger owner used across tests.
pub fn owner() -> Address {
    Address::from_bytes([0x0a; 32])
}

/// A caller that is not the owner.
pub fn stranger() -> Address {
    Address::from_bytes([0x5e; 32])
}

/// A key recipient.
pub fn recipient() -> Address {
    Address::from_bytes([0x7c; 32])
}

/// Key id from text.
///
/// # Panics
/// If `id` is empty or longer than 64 bytes.
pub fn key_id(id: &str) -> KeyId {
    KeyId::new(id.as_bytes()).expect("fixture key ids are 1..=64 bytes")
}
