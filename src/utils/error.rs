use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Malformed response for author {author_id}: {message}")]
    MalformedResponse { author_id: String, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Configuration,
    Data,
    Output,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ReportError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ReportError::ApiError(_) => ErrorCategory::Network,
            ReportError::ConfigError { .. }
            | ReportError::MissingConfigError { .. }
            | ReportError::InvalidConfigValueError { .. }
            | ReportError::ConfigValidationError { .. }
            | ReportError::TomlError(_) => ErrorCategory::Configuration,
            ReportError::MalformedResponse { .. } | ReportError::SerializationError(_) => {
                ErrorCategory::Data
            }
            ReportError::ZipError(_) | ReportError::CsvError(_) | ReportError::IoError(_) => {
                ErrorCategory::Output
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            ReportError::MalformedResponse { .. } => ErrorSeverity::Low,
            ReportError::ApiError(_) => ErrorSeverity::Medium,
            ReportError::ConfigError { .. }
            | ReportError::MissingConfigError { .. }
            | ReportError::InvalidConfigValueError { .. }
            | ReportError::ConfigValidationError { .. }
            | ReportError::TomlError(_)
            | ReportError::SerializationError(_) => ErrorSeverity::High,
            ReportError::ZipError(_) | ReportError::CsvError(_) | ReportError::IoError(_) => {
                ErrorSeverity::Critical
            }
        }
    }

    /// True when the error came from the HTTP layer (connect, timeout or a non-2xx status).
    pub fn is_request_failure(&self) -> bool {
        matches!(self, ReportError::ApiError(_))
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            ReportError::ApiError(e) => match e.status() {
                Some(status) => format!("The Scopus API answered with HTTP {}", status),
                None => "Could not reach the Scopus API".to_string(),
            },
            ReportError::MissingConfigError { field } => {
                format!("Configuration is missing '{}'", field)
            }
            ReportError::InvalidConfigValueError { field, reason, .. } => {
                format!("Configuration value '{}' is invalid: {}", field, reason)
            }
            ReportError::ConfigValidationError { field, message } => {
                format!("Configuration problem in '{}': {}", field, message)
            }
            ReportError::ConfigError { message } => format!("Configuration problem: {}", message),
            ReportError::TomlError(_) => "The configuration file is not valid TOML".to_string(),
            ReportError::SerializationError(_) => {
                "A JSON document could not be parsed".to_string()
            }
            ReportError::MalformedResponse { author_id, .. } => {
                format!("Unexpected response layout for author {}", author_id)
            }
            ReportError::ZipError(_) | ReportError::CsvError(_) | ReportError::IoError(_) => {
                "The report file could not be written".to_string()
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            ReportError::ApiError(e) => match e.status().map(|s| s.as_u16()) {
                Some(401) | Some(403) => "Check that API_KEY is a valid Elsevier API key",
                Some(429) => "Raise min_request_interval_ms to slow down requests",
                _ => "Check network connectivity and api_base_url",
            },
            ReportError::MissingConfigError { .. }
            | ReportError::InvalidConfigValueError { .. }
            | ReportError::ConfigValidationError { .. }
            | ReportError::ConfigError { .. } => "Fix the configuration file or CLI flags",
            ReportError::TomlError(_) | ReportError::SerializationError(_) => {
                "Check the configuration file syntax"
            }
            ReportError::MalformedResponse { .. } => {
                "Verify the author identifier on the Scopus website"
            }
            ReportError::ZipError(_) | ReportError::CsvError(_) | ReportError::IoError(_) => {
                "Check that output_path exists and is writable"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, ReportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_errors_are_high_severity() {
        let err = ReportError::MissingConfigError {
            field: "api_key".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert!(err.user_friendly_message().contains("api_key"));
    }

    #[test]
    fn test_config_file_errors_carry_the_message() {
        let err = ReportError::ConfigError {
            message: "config.json: expected value at line 1 column 1".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert_eq!(err.recovery_suggestion(), "Fix the configuration file or CLI flags");
        assert!(err.user_friendly_message().contains("config.json"));
    }

    #[test]
    fn test_io_errors_are_output_errors() {
        let err = ReportError::from(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "denied",
        ));
        assert_eq!(err.category(), ErrorCategory::Output);
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert!(!err.is_request_failure());
    }

    #[test]
    fn test_malformed_response_message_names_author() {
        let err = ReportError::MalformedResponse {
            author_id: "123".to_string(),
            message: "missing preferred-name".to_string(),
        };
        assert_eq!(err.severity(), ErrorSeverity::Low);
        assert!(err.to_string().contains("123"));
        assert!(err.to_string().contains("missing preferred-name"));
    }
}
