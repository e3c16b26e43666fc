use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AppError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Authentication error ({status}): {message}")]
    Auth { status: u16, message: String },

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Bad Request ({status}): {message}")]
    BadRequest { status: u16, message: String },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("API error ({status}): {message}")]
    Http { status: u16, message: String },

    #[error("Malformed response from {path}: {message}")]
    Decode { path: String, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl AppError {
    /// Builds the error for a non-success response, keyed on its status code.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            401 | 403 => AppError::Auth { status, message },
            404 => AppError::NotFound(message),
            400 | 422 => AppError::BadRequest { status, message },
            409 => AppError::Conflict(message),
            _ => AppError::Http { status, message },
        }
    }

    /// HTTP status behind this error, when the server produced one.
    pub fn status(&self) -> Option<u16> {
        match self {
            AppError::Auth { status, .. }
            | AppError::BadRequest { status, .. }
            | AppError::Http { status, .. } => Some(*status),
            AppError::NotFound(_) => Some(404),
            AppError::Conflict(_) => Some(409),
            _ => None,
        }
    }
}
