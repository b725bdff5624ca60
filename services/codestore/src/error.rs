/// Code store error variants.
///
/// An unknown, consumed or expired code is not an error: lookups return `Ok(None)`.
#[derive(Debug, thiserror::Error)]
pub enum CodeStoreError {
    /// Missing required input or an expiry already in the past. Raised before any mutation.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// A record with the same zone and code already exists.
    #[error("duplicate code")]
    Conflict,
    /// The backing storage could not be reached or the statement failed.
    #[error("data access failure")]
    DataAccess(#[from] anyhow::Error),
}

impl CodeStoreError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidArgument(_) => "INVALID_ARGUMENT",
            Self::Conflict => "CONFLICT",
            Self::DataAccess(_) => "DATA_ACCESS",
        }
    }
}
