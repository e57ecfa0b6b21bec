//! Error handling for the Beereign console
//!
//! Every failure here is recoverable: the view goes back to an interactive,
//! retryable state. Messages are provided in English and Spanish.

use shared::{FieldError, Language};
use thiserror::Error;

/// Console error types
#[derive(Error, Debug)]
pub enum ConsoleError {
    // Local errors
    #[error("Validation error: {0}")]
    Validation(#[from] FieldError),

    #[error("Resource not found: {0}")]
    NotFound(String),

    // Remote errors
    #[error("Server rejected the request: {message}")]
    Rejected { status: u16, message: String },

    #[error("Server error {status}: {message}")]
    Server { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Could not decode response: {0}")]
    Decode(String),

    // Setup errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ConsoleError {
    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            ConsoleError::Validation(_) => "VALIDATION_ERROR",
            ConsoleError::NotFound(_) => "NOT_FOUND",
            ConsoleError::Rejected { .. } => "REJECTED",
            ConsoleError::Server { .. } => "SERVER_ERROR",
            ConsoleError::Network(_) => "NETWORK_ERROR",
            ConsoleError::Decode(_) => "DECODE_ERROR",
            ConsoleError::Configuration(_) => "CONFIGURATION_ERROR",
            ConsoleError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Whether retrying the same action can succeed without user changes
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ConsoleError::Network(_) | ConsoleError::Server { .. } | ConsoleError::Decode(_)
        )
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ConsoleError::NotFound(_))
    }

    /// Message for the transient notification shown to the user
    pub fn user_message(&self, language: Language) -> String {
        match (self, language) {
            (ConsoleError::Validation(field), _) => field.message.clone(),
            (ConsoleError::NotFound(what), Language::English) => format!("{} not found", what),
            (ConsoleError::NotFound(what), Language::Spanish) => format!("No se encontró {}", what),
            (ConsoleError::Rejected { message, .. }, Language::English) => {
                format!("The server rejected the data: {}", message)
            }
            (ConsoleError::Rejected { message, .. }, Language::Spanish) => {
                format!("El servidor rechazó los datos: {}", message)
            }
            (ConsoleError::Server { .. }, Language::English) => {
                "The server could not complete the request".to_string()
            }
            (ConsoleError::Server { .. }, Language::Spanish) => {
                "El servidor no pudo completar la solicitud".to_string()
            }
            (ConsoleError::Network(_), Language::English) => {
                "Could not reach the server, please retry".to_string()
            }
            (ConsoleError::Network(_), Language::Spanish) => {
                "No se pudo conectar con el servidor, intente de nuevo".to_string()
            }
            (ConsoleError::Decode(_), Language::English) => {
                "Unexpected response from the server".to_string()
            }
            (ConsoleError::Decode(_), Language::Spanish) => {
                "Respuesta inesperada del servidor".to_string()
            }
            (ConsoleError::Configuration(_) | ConsoleError::Internal(_), Language::English) => {
                "Something went wrong".to_string()
            }
            (ConsoleError::Configuration(_) | ConsoleError::Internal(_), Language::Spanish) => {
                "Ocurrió un error".to_string()
            }
        }
    }
}

impl From<reqwest::Error> for ConsoleError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ConsoleError::Decode(err.to_string())
        } else {
            ConsoleError::Network(err.to_string())
        }
    }
}

impl From<config::ConfigError> for ConsoleError {
    fn from(err: config::ConfigError) -> Self {
        ConsoleError::Configuration(err.to_string())
    }
}

/// Result type alias for console operations
pub type ConsoleResult<T> = Result<T, ConsoleError>;
