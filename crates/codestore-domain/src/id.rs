//! Newtype wrappers for domain identifiers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Zone used when a caller has no tenant of its own.
pub const DEFAULT_ZONE_ID: &str = "default";

/// Identifies a tenant zone. Every store operation is scoped to exactly one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ZoneId(String);

/// Returned when parsing an empty zone identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("zone id must not be empty")]
pub struct EmptyZoneId;

impl ZoneId {
    pub fn new(id: impl Into<String>) -> Result<Self, EmptyZoneId> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(EmptyZoneId);
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ZoneId {
    fn default() -> Self {
        Self(DEFAULT_ZONE_ID.to_owned())
    }
}

impl fmt::Display for ZoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ZoneId {
    type Err = EmptyZoneId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for ZoneId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
