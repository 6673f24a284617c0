//! Verification outcomes.

use serde::{Deserialize, Serialize};
use soteria_core::{AccessKeyRecord, KeyStatus, Timestamp};
use std::fmt;
use std::str::FromStr;

/// Outcome of verifying an existing key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    /// Key is active and `now` is inside its window.
    Granted,
    /// Key was revoked; checked before the window.
    DeniedRevoked,
    /// `now` is before `valid_from`.
    DeniedNotYetValid,
    /// `now` is after `valid_until`.
    DeniedExpired,
}

impl Verdict {
    /// Wire token for this verdict.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Granted => "GRANTED",
            Self::DeniedRevoked => "DENIED_REVOKED",
            Self::DeniedNotYetValid => "DENIED_NOT_YET_VALID",
            Self::DeniedExpired => "DENIED_EXPIRED",
        }
    }

    /// Whether access is allowed.
    pub const fn is_granted(self) -> bool {
        matches!(self, Self::Granted)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Token that is not one of the four verdicts.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown verdict token: {0}")]
pub struct UnknownVerdict(pub String);

impl FromStr for Verdict {
    type Err = UnknownVerdict;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GRANTED" => Ok(Self::Granted),
            "DENIED_REVOKED" => Ok(Self::DeniedRevoked),
            "DENIED_NOT_YET_VALID" => Ok(Self::DeniedNotYetValid),
            "DENIED_EXPIRED" => Ok(Self::DeniedExpired),
            other => Err(UnknownVerdict(other.to_string())),
        }
    }
}

/// Apply the time-lock rules to a record at a single clock reading.
///
/// First match wins: revoked, then not yet valid, then expired. Both window
/// bounds are inclusive.
pub fn evaluate(record: &AccessKeyRecord, now: Timestamp) -> Verdict {
    if record.status == KeyStatus::Revoked {
        Verdict::DeniedRevoked
    } else if now < record.valid_from {
        Verdict::DeniedNotYetValid
    } else if now > record.valid_until {
        Verdict::DeniedExpired
    } else {
        Verdict::Granted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use soteria_core::Address;

    fn record(status: KeyStatus) -> AccessKeyRecord {
        AccessKeyRecord {
            recipient: Address::from_bytes([1; 32]),
            valid_from: Timestamp::from_secs(1000),
            valid_until: Timestamp::from_secs(2000),
            status,
        }
    }

    #[test]
    fn window_bounds_are_inclusive() {
        let r = record(KeyStatus::Active);
        assert_eq!(evaluate(&r, Timestamp::from_secs(1000)), Verdict::Granted);
        assert_eq!(evaluate(&r, Timestamp::from_secs(2000)), Verdict::Granted);
        assert_eq!(
            evaluate(&r, Timestamp::from_secs(999)),
            Verdict::DeniedNotYetValid
        );
        assert_eq!(
            evaluate(&r, Timestamp::from_secs(2001)),
            Verdict::DeniedExpired
        );
    }

    #[test]
    fn revocation_takes_priority_over_window() {
        let r = record(KeyStatus::Revoked);
        for t in [0, 999, 1500, 2001, u64::MAX] {
            assert_eq!(evaluate(&r, Timestamp::from_secs(t)), Verdict::DeniedRevoked);
        }
    }

    #[test]
    fn tokens_parse_back() {
        for v in [
            Verdict::Granted,
            Verdict::DeniedRevoked,
            Verdict::DeniedNotYetValid,
            Verdict::DeniedExpired,
        ] {
            assert_eq!(v.as_str().parse::<Verdict>(), Ok(v));
        }
        assert!("DENIED".parse::<Verdict>().is_err());
    }

    #[test]
    fn serde_uses_wire_tokens() {
        let json = serde_json::to_string(&Verdict::DeniedNotYetValid).unwrap();
        assert_eq!(json, "\"DENIED_NOT_YET_VALID\"");
    }
}
