use thiserror::Error;

pub(crate) type Result<T> = std::result::Result<T, Error>;

/// Coarse classification of [`Error`], for callers that branch on the
/// failure rather than print it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorKind {
    NotFound,
    Conflict,
    InvalidReference,
    Validation,
    Unauthorized,
    Storage,
}

impl ErrorKind {
    /// Whether retrying the same call could succeed.
    pub(crate) fn is_transient(self) -> bool {
        matches!(self, Self::Storage)
    }
}

/// Errors produced by the database and service layers.
#[derive(Error, Debug)]
pub(crate) enum Error {
    /// The record does not exist or belongs to another user.
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    Conflict(String),

    /// A category id that the caller cannot see.
    #[error("category {0} does not exist or is not available")]
    InvalidReference(i64),

    #[error("invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    #[error("no valid session; sign up or pass --user <email>")]
    Unauthorized,

    #[error("Database error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl Error {
    pub(crate) fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field,
            reason: reason.into(),
        }
    }

    pub(crate) fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Conflict(_) => ErrorKind::Conflict,
            Self::InvalidReference(_) => ErrorKind::InvalidReference,
            Self::Validation { .. } => ErrorKind::Validation,
            Self::Unauthorized => ErrorKind::Unauthorized,
            Self::Storage(_) | Self::Io(_) | Self::Csv(_) => ErrorKind::Storage,
        }
    }
}
