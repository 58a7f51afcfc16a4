//! Error types for input validation and configuration loading.
//!
//! Every rejected input is a [`ValidationError`]; callers must treat an
//! error as "no recommendation", never as a zero-stake recommendation.

use thiserror::Error;

#[cfg(feature = "api")]
use actix_web::{http::StatusCode, HttpResponse, ResponseError};

#[cfg(feature = "api")]
use crate::models::ErrorResponse;

/// Invalid input or configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Predicted probability outside the open interval (0, 1)
    #[error("predicted probability must be strictly between 0 and 1, got {0}")]
    ProbabilityOutOfRange(f64),

    /// Decimal odds below the tradable floor
    #[error("decimal odds must be at least 1.01, got {0}")]
    OddsOutOfRange(f64),

    /// Regression spread must be positive
    #[error("sigma must be positive, got {0}")]
    NonPositiveSigma(f64),

    /// Model confidence outside [0, 1]
    #[error("model confidence must be between 0 and 1, got {0}")]
    ConfidenceOutOfRange(f64),

    /// Candidate carried neither a probability nor a full (mu, sigma, line) triple
    #[error("candidate needs either predicted_probability or all of mu, sigma and line")]
    IncompleteEstimate,

    /// Market type string not recognized
    #[error("unknown market type: {0}")]
    UnknownMarketType(String),

    /// Configuration source did not supply a required key
    #[error("missing configuration key: {0}")]
    MissingConfigKey(String),

    /// Configuration value failed to parse as a number
    #[error("configuration key {key} has unparseable value '{value}'")]
    MalformedConfigValue { key: String, value: String },

    /// Configuration value parsed but violates its legal range
    #[error("configuration key {key} is out of range, got {value}")]
    ConfigValueOutOfRange { key: String, value: f64 },
}

impl ValidationError {
    /// Stable machine-readable code for the error body.
    pub fn error_code(&self) -> &'static str {
        match self {
            ValidationError::MissingConfigKey(_)
            | ValidationError::MalformedConfigValue { .. }
            | ValidationError::ConfigValueOutOfRange { .. } => "config_error",
            _ => "validation_error",
        }
    }
}

#[cfg(feature = "api")]
impl ResponseError for ValidationError {
    fn status_code(&self) -> StatusCode {
        match self {
            ValidationError::MissingConfigKey(_)
            | ValidationError::MalformedConfigValue { .. }
            | ValidationError::ConfigValueOutOfRange { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.error_code().to_string(),
            message: self.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ValidationError::ProbabilityOutOfRange(1.5);
        assert!(err.to_string().contains("strictly between 0 and 1"));
        assert!(err.to_string().contains("1.5"));

        let err = ValidationError::MissingConfigKey("kelly_fraction".to_string());
        assert!(err.to_string().contains("kelly_fraction"));
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            ValidationError::OddsOutOfRange(1.0).error_code(),
            "validation_error"
        );
        assert_eq!(
            ValidationError::ConfigValueOutOfRange {
                key: "max_stake_percent".to_string(),
                value: -0.1,
            }
            .error_code(),
            "config_error"
        );
    }

    #[cfg(feature = "api")]
    #[test]
    fn test_error_status_codes() {
        assert_eq!(
            ValidationError::ProbabilityOutOfRange(0.0).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ValidationError::NonPositiveSigma(-1.0).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ValidationError::MissingConfigKey("kelly_fraction".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
