#![allow(async_fn_in_trait)]

use chrono::{DateTime, Utc};

use codestore_domain::id::ZoneId;

use crate::domain::types::ExpiringCode;
use crate::error::CodeStoreError;

/// Store for one-time codes. Every operation is scoped to `zone_id`.
pub trait ExpiringCodeStore: Send + Sync {
    /// Issue a new code carrying `data` until `expires_at`.
    ///
    /// Fails with `InvalidArgument` when `data` or `expires_at` is missing or
    /// the expiry lies in the past, and with `Conflict` when the generated code
    /// is already taken in the zone. Generation is never retried here.
    ///
    /// A taken code that has expired but not been swept yet still conflicts on
    /// the database backend; the in-memory backend replaces it instead.
    async fn generate(
        &self,
        data: Option<&str>,
        expires_at: Option<DateTime<Utc>>,
        intent: Option<&str>,
        zone_id: &ZoneId,
    ) -> Result<ExpiringCode, CodeStoreError>;

    /// Consume a code: returns the record at most once and deletes it.
    ///
    /// Unknown and expired codes yield `Ok(None)`; an expired record is
    /// deleted as a side effect.
    async fn retrieve(
        &self,
        code: Option<&str>,
        zone_id: &ZoneId,
    ) -> Result<Option<ExpiringCode>, CodeStoreError>;

    /// Delete every record tagged with `intent` in the zone, expired or not.
    /// Returns the number of deleted records.
    async fn expire_by_intent(&self, intent: &str, zone_id: &ZoneId)
    -> Result<u64, CodeStoreError>;
}

/// Housekeeping sweep removing expired records across all zones.
pub trait ExpiredCodeCleanup: Send + Sync {
    /// Returns the number of removed records.
    async fn clean_expired(&self) -> Result<u64, CodeStoreError>;
}

/// Single source of truth for expiry comparisons.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Produces unpredictable code strings.
pub trait CodeGenerator: Send + Sync {
    fn generate(&self) -> String;
}
