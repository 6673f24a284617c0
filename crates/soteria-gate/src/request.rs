//! Scanned QR payloads
//!
//! A guest presents `{"keyId": "...", "appId": 42, "keyName": "..."}`. The
//! `appId` may arrive as a number or a numeric string.

use serde::Deserialize;
use soteria_core::{IdentifierError, KeyId};
use thiserror::Error;

use crate::config::GateConfig;

/// Why a payload was refused before any ledger lookup
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    /// Not JSON, not an object, or a required field is missing
    #[error("Malformed access request: {reason}")]
    Malformed {
        /// Parser or field message
        reason: String,
    },

    /// The key id is empty or too long
    #[error("Invalid key id: {0}")]
    InvalidKeyId(#[from] IdentifierError),

    /// The payload was issued for another deployment
    #[error("Request for app {actual} presented to app {expected}")]
    AppMismatch {
        /// This gate's app id
        expected: u64,
        /// App id in the payload
        actual: u64,
        /// Key the payload named
        key_id: KeyId,
        /// Guest the payload named
        guest: String,
    },
}

impl RequestError {
    /// Key id and guest, when the payload got far enough to name them.
    pub fn subject(&self) -> Option<(&KeyId, &str)> {
        match self {
            Self::AppMismatch { key_id, guest, .. } => Some((key_id, guest.as_str())),
            _ => None,
        }
    }

    fn malformed(reason: impl Into<String>) -> Self {
        Self::Malformed {
            reason: reason.into(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AppIdField {
    Number(u64),
    Text(String),
}

#[derive(Deserialize)]
struct RawRequest {
    #[serde(rename = "keyId")]
    key_id: Option<String>,
    #[serde(rename = "appId")]
    app_id: Option<AppIdField>,
    #[serde(rename = "keyName")]
    key_name: Option<String>,
}

/// An admission request ready for verification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessRequest {
    /// Key to verify
    pub key_id: KeyId,
    /// Deployment the payload was issued for
    pub app_id: u64,
    /// Display name of the guest
    pub guest: String,
}

impl AccessRequest {
    /// Parse `payload` and check it belongs to this deployment.
    pub fn parse(payload: &str, config: &GateConfig) -> Result<Self, RequestError> {
        let raw: RawRequest = serde_json::from_str(payload.trim())
            .map_err(|e| RequestError::malformed(e.to_string()))?;

        let key_id = raw
            .key_id
            .ok_or_else(|| RequestError::malformed("missing keyId"))?;
        let key_id = KeyId::new(key_id)?;

        let app_id = match raw.app_id {
            Some(AppIdField::Number(n)) => n,
            Some(AppIdField::Text(s)) => s
                .trim()
                .parse()
                .map_err(|_| RequestError::malformed(format!("appId is not a number: {s}")))?,
            None => return Err(RequestError::malformed("missing appId")),
        };

        let guest = raw
            .key_name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| config.default_guest_name.clone());

        if app_id != config.app_id {
            return Err(RequestError::AppMismatch {
                expected: config.app_id,
                actual: app_id,
                key_id,
                guest,
            });
        }

        Ok(Self {
            key_id,
            app_id,
            guest,
        })
    }
}
