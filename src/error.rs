use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Already exists: {0}")]
    AlreadyExists(String),
    #[error("Permission denied: {0}")]
    PermissionDenied(String),
    #[error("Out of range: {0}")]
    OutOfRange(String),
    #[error("Ledger state poisoned: {0}")]
    StatePoisoned(String),
}

pub type LedgerResult<T> = Result<T, LedgerError>;

/// An operation refused a linear value; the value comes back untouched.
///
/// Works like `std::sync::mpsc::SendError<T>`: a failed deposit or merge must
/// never destroy the value it was handed.
#[derive(Error, Debug)]
#[error("{error}")]
pub struct Rejected<T> {
    pub error: LedgerError,
    pub value: T,
}

impl<T> Rejected<T> {
    pub fn new(error: LedgerError, value: T) -> Self {
        Self { error, value }
    }

    pub fn into_parts(self) -> (LedgerError, T) {
        (self.error, self.value)
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Config serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}
