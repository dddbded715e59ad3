//! Error types and handling for the `SkyCast` pipeline

use thiserror::Error;

/// Main error type for the `SkyCast` pipeline
#[derive(Error, Debug)]
pub enum SkyCastError {
    /// The geocoder returned no match for a place name
    #[error("Location not found: {place}")]
    NotFound { place: String },

    /// Network failure, timeout or upstream rejection
    #[error("Service unavailable: {message}")]
    ServiceUnavailable { message: String },

    /// Upstream answered with a shape we cannot use
    #[error("Malformed response: {message}")]
    MalformedResponse { message: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl SkyCastError {
    /// Create a new not-found error for a place name
    pub fn not_found<S: Into<String>>(place: S) -> Self {
        Self::NotFound {
            place: place.into(),
        }
    }

    /// Create a new service-unavailable error
    pub fn service_unavailable<S: Into<String>>(message: S) -> Self {
        Self::ServiceUnavailable {
            message: message.into(),
        }
    }

    /// Create a new malformed-response error
    pub fn malformed<S: Into<String>>(message: S) -> Self {
        Self::MalformedResponse {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Short machine-readable name of the error category
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            SkyCastError::NotFound { .. } => "not_found",
            SkyCastError::ServiceUnavailable { .. } => "service_unavailable",
            SkyCastError::MalformedResponse { .. } => "malformed_response",
            SkyCastError::Validation { .. } => "validation",
            SkyCastError::Config { .. } => "config",
        }
    }

    /// Whether the user may simply try the same request again
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, SkyCastError::ServiceUnavailable { .. })
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            SkyCastError::NotFound { place } => {
                format!("Could not find a location named '{place}'.")
            }
            SkyCastError::ServiceUnavailable { message } => {
                format!("The weather service is unavailable right now ({message}). Please try again.")
            }
            SkyCastError::MalformedResponse { .. } => {
                "The weather service returned data we could not read.".to_string()
            }
            SkyCastError::Validation { message } => {
                format!("Invalid input: {message}")
            }
            SkyCastError::Config { .. } => {
                "Configuration error. Please check your config file.".to_string()
            }
        }
    }
}

impl From<reqwest::Error> for SkyCastError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            SkyCastError::malformed(err.to_string())
        } else if err.is_timeout() {
            SkyCastError::service_unavailable(format!("request timed out: {err}"))
        } else {
            SkyCastError::service_unavailable(err.to_string())
        }
    }
}
