//! Error types for driverboard.
//!
//! This module defines all error types used throughout the driverboard crate,
//! providing detailed context for debugging and user-friendly error messages.

use thiserror::Error;

use crate::driver::DriverId;

/// The main error type for driverboard operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Backend Errors ===
    /// The HTTP request could not be completed.
    #[error("HTTP error calling {endpoint}: {source}")]
    Http {
        /// Method and path of the request, e.g. `GET /drivers`.
        endpoint: String,
        /// The underlying error.
        #[source]
        source: reqwest::Error,
    },

    /// The backend answered with a non-success status.
    #[error("{endpoint} returned {status}: {body}")]
    Api {
        /// Method and path of the request.
        endpoint: String,
        /// HTTP status code.
        status: u16,
        /// Response body, if any.
        body: String,
    },

    /// The response body was not the expected shape.
    #[error("failed to decode response from {endpoint}: {source}")]
    Decode {
        /// Method and path of the request.
        endpoint: String,
        /// The underlying error.
        #[source]
        source: reqwest::Error,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Board Errors ===
    /// The creation form lacks one of the required named inputs.
    #[error("form is missing input '{name}'")]
    MissingFormInput {
        /// Name of the missing input.
        name: String,
    },

    /// A value was addressed to an input the form does not have.
    #[error("form has no input named '{name}'")]
    UnknownFormInput {
        /// The offending input name.
        name: String,
    },

    /// An action named a driver that is not on the board.
    #[error("no driver with id {id} on the board")]
    UnknownDriver {
        /// The requested id.
        id: DriverId,
    },

    /// Save was requested for a card that is not being edited.
    #[error("driver {id} is not being edited")]
    NotEditing {
        /// The requested id.
        id: DriverId,
    },

    /// A delegated event could not be decoded from its attributes.
    #[error("invalid event: {message}")]
    InvalidEvent {
        /// Description of what was wrong.
        message: String,
    },
}

/// A specialized Result type for driverboard operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create an invalid event error.
    #[must_use]
    pub fn invalid_event(message: impl Into<String>) -> Self {
        Self::InvalidEvent {
            message: message.into(),
        }
    }

    /// Create a missing form input error.
    #[must_use]
    pub fn missing_form_input(name: impl Into<String>) -> Self {
        Self::MissingFormInput { name: name.into() }
    }

    /// Check if this error came from talking to the backend.
    #[must_use]
    pub fn is_request_failure(&self) -> bool {
        matches!(
            self,
            Self::Http { .. } | Self::Api { .. } | Self::Decode { .. }
        )
    }

    /// The HTTP status of a backend rejection, if this is one.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}
