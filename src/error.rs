//! Input validation errors
//!
//! Only malformed or missing input is an error. A shipment that does not fit
//! or a stop reached late is reported inside the result instead.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("invalid time '{value}' for {field}: expected HH:MM")]
    InvalidTime { field: String, value: String },

    #[error("average speed must be a positive number of km/h (got {0})")]
    InvalidSpeed(f64),

    #[error("default service time must be a non-negative number of minutes (got {0})")]
    InvalidServiceTime(f64),
}

impl ValidationError {
    /// Stable code sent back in error responses
    pub const fn code(&self) -> &'static str {
        match self {
            ValidationError::MissingField(_) => "MISSING_FIELD",
            ValidationError::InvalidTime { .. } => "INVALID_TIME",
            ValidationError::InvalidSpeed(_) => "INVALID_SPEED",
            ValidationError::InvalidServiceTime(_) => "INVALID_SERVICE_TIME",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_message() {
        let err = ValidationError::MissingField("vehicle");
        assert_eq!(err.to_string(), "vehicle is required");
        assert_eq!(err.code(), "MISSING_FIELD");
    }

    #[test]
    fn test_invalid_time_message_names_field_and_value() {
        let err = ValidationError::InvalidTime {
            field: "start_time".to_string(),
            value: "8h".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("start_time"));
        assert!(message.contains("'8h'"));
        assert_eq!(err.code(), "INVALID_TIME");
    }
}
