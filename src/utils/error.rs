use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipetteError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("{message}")]
    ParseError { message: String },

    #[error("Validation failed: {}", .errors.join("; "))]
    ValidationError { errors: Vec<String> },

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Validation,
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

impl PipetteError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            PipetteError::CsvError(_) | PipetteError::ParseError { .. } => ErrorCategory::Input,
            PipetteError::ValidationError { .. } => ErrorCategory::Validation,
            PipetteError::ConfigValidationError { .. }
            | PipetteError::InvalidConfigValueError { .. }
            | PipetteError::MissingConfigError { .. } => ErrorCategory::Configuration,
            PipetteError::ZipError(_)
            | PipetteError::IoError(_)
            | PipetteError::SerializationError(_) => ErrorCategory::System,
        }
    }

    /// Drives the CLI exit code.
    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Validation => ErrorSeverity::Medium,
            ErrorCategory::Input | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            PipetteError::ParseError { .. } | PipetteError::CsvError(_) => {
                "Check that every row has the same number of columns as the header"
            }
            PipetteError::ValidationError { .. } => {
                "Fix the listed samples in the CSV file and run again"
            }
            PipetteError::ConfigValidationError { .. }
            | PipetteError::InvalidConfigValueError { .. }
            | PipetteError::MissingConfigError { .. } => {
                "Review the configuration values; all volumes and concentrations must be positive"
            }
            PipetteError::IoError(_) => "Check that the file exists and the output path is writable",
            PipetteError::ZipError(_) | PipetteError::SerializationError(_) => {
                "Retry without compression or JSON output and report the problem"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            PipetteError::ValidationError { errors } => errors.join("\n"),
            PipetteError::ParseError { message } => message.clone(),
            PipetteError::IoError(e) => format!("Failed to access file: {}", e),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PipetteError>;
