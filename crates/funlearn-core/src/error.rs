use thiserror::Error;

/// All errors that can occur in funlearn-core.
#[derive(Debug, Error)]
pub enum FunlearnError {
    #[error("Book not found: {0}")]
    BookNotFound(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Unknown feature: {0} (expected summary, quiz, games or audio)")]
    InvalidFeature(String),

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("Generation failed: {0}")]
    Generation(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

impl FunlearnError {
    /// True for the "unknown book id" case, which callers often treat as a no-op.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::BookNotFound(_))
    }
}

/// Exit codes used by the CLI.
#[repr(i32)]
pub enum ExitCode {
    Success = 0,
    GeneralError = 1,
    NotFound = 2,
    InvalidArgs = 3,
    ConfirmRequired = 8,
}

impl From<&FunlearnError> for ExitCode {
    fn from(err: &FunlearnError) -> Self {
        match err {
            FunlearnError::BookNotFound(_) => Self::NotFound,
            FunlearnError::ValidationError(_) | FunlearnError::InvalidFeature(_) => {
                Self::InvalidArgs
            }
            _ => Self::GeneralError,
        }
    }
}

pub type Result<T> = std::result::Result<T, FunlearnError>;
