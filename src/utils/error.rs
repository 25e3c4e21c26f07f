use thiserror::Error;

#[derive(Error, Debug)]
pub enum OrderEntryError {
    #[error("Scan format error: {message}")]
    FormatError { message: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Manual entry has {} problem(s): {}", errors.len(), errors.join("; "))]
    FormValidationError { errors: Vec<String> },

    #[error("Network error: {message}")]
    TransportError { message: String },

    #[error("Request timed out after {seconds}s")]
    TimeoutError { seconds: u64 },

    #[error("Authentication rejected (HTTP {status})")]
    AuthError { status: u16 },

    #[error("Remote processing error (HTTP {status}): {detail}")]
    RemoteProcessingError { status: u16, detail: String },

    #[error("Submission cancelled: no credentials provided")]
    Cancelled,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid configuration value for {field} ('{value}'): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Network,
    Authentication,
    Remote,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl OrderEntryError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::FormatError { .. }
            | Self::ValidationError { .. }
            | Self::FormValidationError { .. }
            | Self::Cancelled => ErrorCategory::Input,
            Self::TransportError { .. } | Self::TimeoutError { .. } => ErrorCategory::Network,
            Self::AuthError { .. } => ErrorCategory::Authentication,
            Self::RemoteProcessingError { .. } => ErrorCategory::Remote,
            Self::ConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::ConfigValidationError { .. } => ErrorCategory::Configuration,
            Self::IoError(_) | Self::SerializationError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input => ErrorSeverity::Low,
            ErrorCategory::Network | ErrorCategory::Authentication => ErrorSeverity::Medium,
            ErrorCategory::Remote | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// Process exit code for the CLI. An operator cancel is not a failure.
    pub fn exit_code(&self) -> i32 {
        if matches!(self, Self::Cancelled) {
            return 0;
        }
        match self.severity() {
            ErrorSeverity::Low | ErrorSeverity::High => 1,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::Critical => 3,
        }
    }

    /// Operator-facing text for the failure, without internal detail.
    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::FormatError { .. } => {
                "Invalid barcode format. Expected tagged segments such as <B12345><PR1001><Q5>"
                    .to_string()
            }
            Self::ValidationError { message } => format!("Order is not valid: {}", message),
            Self::FormValidationError { errors } => {
                format!("Please fix the following errors:\n{}", errors.join("\n"))
            }
            Self::TransportError { .. } => {
                "Cannot reach the order-entry server. Check your network connection.".to_string()
            }
            Self::TimeoutError { .. } => "Request timed out. Please try again.".to_string(),
            Self::AuthError { .. } => "The server rejected your credentials.".to_string(),
            Self::RemoteProcessingError { status, detail } => {
                format!("The server could not process the order ({}): {}", status, detail)
            }
            Self::Cancelled => {
                "Submission cancelled. Please provide credentials to submit.".to_string()
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::FormatError { .. } => "Rescan the label or use manual entry",
            Self::ValidationError { .. } => {
                "Make sure at least one item has an item number and a quantity above zero"
            }
            Self::FormValidationError { .. } => "Correct the listed fields and submit again",
            Self::TransportError { .. } => {
                "Connect to the company network or VPN, then retry"
            }
            Self::TimeoutError { .. } => "Retry the submission or raise endpoint.timeout_seconds",
            Self::AuthError { .. } => "Re-enter your username and password",
            Self::RemoteProcessingError { .. } => {
                "Review the order in the ERP system or contact support"
            }
            Self::Cancelled => "Run again and enter your credentials when prompted",
            Self::ConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::ConfigValidationError { .. } => "Fix the configuration file and retry",
            Self::IoError(_) | Self::SerializationError(_) => "Check file permissions and inputs",
        }
    }
}

pub type Result<T> = std::result::Result<T, OrderEntryError>;
