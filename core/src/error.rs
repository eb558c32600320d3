// core/src/error.rs
use thiserror::Error;

/// Felles feiltype for kjernen.
///
/// For lite data er aldri en feil: det gir 0-verdier med confidence 0.
/// Feilene her gjelder ugyldig input, feil bruk av konfig og eksport.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("konfigurasjon kan kun endres når økten er idle")]
    ConfigWhileRecording,

    #[error("ugyldig konfigurasjon: {0}")]
    InvalidConfig(String),

    #[error("ugyldig frame: {reason}")]
    InvalidFrame { reason: String },

    #[error("ugyldig sample: {reason}")]
    InvalidSample { reason: String },

    #[error("mangler subjectId (tom eller \"unknown\")")]
    MissingSubject,

    #[error("ingen ppg-data å lagre")]
    EmptyRecord,

    #[error("lagring feilet: {0}")]
    Store(String),

    #[error("parse at {path}: {message}")]
    Parse { path: String, message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl CoreError {
    pub(crate) fn invalid_frame(reason: impl Into<String>) -> Self {
        CoreError::InvalidFrame { reason: reason.into() }
    }

    pub(crate) fn invalid_sample(reason: impl Into<String>) -> Self {
        CoreError::InvalidSample { reason: reason.into() }
    }
}

impl<E: std::fmt::Display> From<serde_path_to_error::Error<E>> for CoreError {
    fn from(e: serde_path_to_error::Error<E>) -> Self {
        CoreError::Parse {
            path: e.path().to_string(),
            message: e.inner().to_string(),
        }
    }
}

pub type CoreResult<T> = Result<T, CoreError>;
