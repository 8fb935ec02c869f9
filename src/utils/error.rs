use crate::domain::model::FailureKind;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlannerError {
    #[error("Request failed: {0}")]
    RequestFailed(#[from] FailureKind),

    #[error("HTTP client error: {0}")]
    HttpClientError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Unexpected payload: {message}")]
    UnexpectedPayload { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Server,
    Configuration,
    Input,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl PlannerError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            PlannerError::RequestFailed(FailureKind::Server { .. }) => ErrorCategory::Server,
            PlannerError::RequestFailed(_) | PlannerError::HttpClientError(_) => {
                ErrorCategory::Network
            }
            PlannerError::UnexpectedPayload { .. } => ErrorCategory::Server,
            PlannerError::ConfigError { .. }
            | PlannerError::ConfigValidationError { .. }
            | PlannerError::InvalidConfigValueError { .. }
            | PlannerError::MissingConfigError { .. } => ErrorCategory::Configuration,
            PlannerError::ValidationError { .. } | PlannerError::SerializationError(_) => {
                ErrorCategory::Input
            }
            PlannerError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 使用者主動取消，不算失敗
            PlannerError::RequestFailed(FailureKind::Cancelled) => ErrorSeverity::Low,
            PlannerError::RequestFailed(_) | PlannerError::HttpClientError(_) => {
                ErrorSeverity::Medium
            }
            PlannerError::UnexpectedPayload { .. }
            | PlannerError::ValidationError { .. }
            | PlannerError::SerializationError(_)
            | PlannerError::ConfigError { .. }
            | PlannerError::ConfigValidationError { .. }
            | PlannerError::InvalidConfigValueError { .. }
            | PlannerError::MissingConfigError { .. } => ErrorSeverity::High,
            PlannerError::IoError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, PlannerError::RequestFailed(FailureKind::Timeout))
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            PlannerError::RequestFailed(FailureKind::Timeout) => {
                "The service is slow to respond; raise --timeout-ms or try again later"
            }
            PlannerError::RequestFailed(FailureKind::Network(_))
            | PlannerError::HttpClientError(_) => {
                "Check that the planner service is running and --base-url is reachable"
            }
            PlannerError::RequestFailed(FailureKind::Server { .. }) => {
                "The service rejected the request; inspect the server message above"
            }
            PlannerError::RequestFailed(FailureKind::Cancelled) => "Run the command again",
            PlannerError::UnexpectedPayload { .. } => {
                "The service answered with an unexpected shape; check client and server versions"
            }
            PlannerError::ConfigError { .. }
            | PlannerError::ConfigValidationError { .. }
            | PlannerError::InvalidConfigValueError { .. }
            | PlannerError::MissingConfigError { .. } => {
                "Fix the configuration file or command line options"
            }
            PlannerError::ValidationError { .. } | PlannerError::SerializationError(_) => {
                "Check the input data format"
            }
            PlannerError::IoError(_) => "Check file paths and permissions",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            PlannerError::RequestFailed(FailureKind::Timeout) => {
                "Request took too long. Please try again.".to_string()
            }
            PlannerError::RequestFailed(FailureKind::Cancelled) => {
                "Request was cancelled.".to_string()
            }
            PlannerError::RequestFailed(_)
            | PlannerError::HttpClientError(_)
            | PlannerError::UnexpectedPayload { .. } => {
                "Failed to generate itinerary. Please try again.".to_string()
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PlannerError>;
