//! Intent tags used to group codes for bulk invalidation.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Well-known purposes a code can be issued for.
///
/// Intents are not a uniqueness key. Any string is accepted by the store;
/// `Custom` carries tags that have no dedicated variant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CodeIntent {
    Registration,
    Invitation,
    Autologin,
    EmailChange,
    PasswordReset,
    #[serde(untagged)]
    Custom(String),
}

impl CodeIntent {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Registration => "REGISTRATION",
            Self::Invitation => "INVITATION",
            Self::Autologin => "AUTOLOGIN",
            Self::EmailChange => "EMAIL_CHANGE",
            Self::PasswordReset => "PASSWORD_RESET",
            Self::Custom(s) => s,
        }
    }
}

impl fmt::Display for CodeIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for CodeIntent {
    fn from(s: &str) -> Self {
        match s {
            "REGISTRATION" => Self::Registration,
            "INVITATION" => Self::Invitation,
            "AUTOLOGIN" => Self::Autologin,
            "EMAIL_CHANGE" => Self::EmailChange,
            "PASSWORD_RESET" => Self::PasswordReset,
            other => Self::Custom(other.to_owned()),
        }
    }
}
