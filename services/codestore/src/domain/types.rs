use chrono::{DateTime, Duration, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use codestore_domain::id::ZoneId;

use crate::error::CodeStoreError;

/// Opaque one-time code and the payload it unlocks.
///
/// Records are scoped to a zone: the same `code` string may exist in two
/// zones and each resolves independently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpiringCode {
    pub code: String,
    pub expires_at: DateTime<Utc>,
    pub data: String,
    pub intent: Option<String>,
    pub zone_id: ZoneId,
}

impl ExpiringCode {
    /// A record is logically absent once `now` has reached its expiry.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// Default number of characters in a generated code.
/// Longest code the `code` column holds.
pub const MAX_CODE_LENGTH: usize = 255;

pub const DEFAULT_CODE_LENGTH: usize = 10;

/// Validated input for `generate`, before a code string is attached.
#[derive(Debug)]
pub(crate) struct PendingCode {
    pub expires_at: DateTime<Utc>,
    pub data: String,
    pub intent: Option<String>,
    pub zone_id: ZoneId,
}

impl PendingCode {
    /// Checks required inputs against `now`.
    ///
    /// Expiry is stored with millisecond precision so both backends hand back
    /// identical records. Sub-millisecond expiries are rounded up, never down,
    /// so an accepted future expiry is still in the future once stored.
    pub fn validate(
        data: Option<&str>,
        expires_at: Option<DateTime<Utc>>,
        intent: Option<&str>,
        zone_id: &ZoneId,
        now: DateTime<Utc>,
    ) -> Result<Self, CodeStoreError> {
        let data = data.ok_or_else(|| CodeStoreError::invalid_argument("data is required"))?;
        let expires_at =
            expires_at.ok_or_else(|| CodeStoreError::invalid_argument("expires_at is required"))?;
        if expires_at < now {
            return Err(CodeStoreError::invalid_argument("expiry in the past"));
        }
        Ok(Self {
            expires_at: ceil_to_millis(expires_at),
            data: data.to_owned(),
            intent: intent.map(str::to_owned),
            zone_id: zone_id.clone(),
        })
    }

    pub fn with_code(self, code: String) -> ExpiringCode {
        ExpiringCode {
            code,
            expires_at: self.expires_at,
            data: self.data,
            intent: self.intent,
            zone_id: self.zone_id,
        }
    }
}

fn ceil_to_millis(instant: DateTime<Utc>) -> DateTime<Utc> {
    let truncated = instant.trunc_subsecs(3);
    if truncated == instant {
        return truncated;
    }
    truncated
        .checked_add_signed(Duration::milliseconds(1))
        .unwrap_or(truncated)
}

/// Rejects a missing code before any lookup.
pub(crate) fn require_code(code: Option<&str>) -> Result<&str, CodeStoreError> {
    code.ok_or_else(|| CodeStoreError::invalid_argument("code is required"))
}
