use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashError {
    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Missing column '{column}' in {file}")]
    MissingColumn { column: String, file: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidFilterValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Invalid config value for {field} ('{value}'): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Config validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Io,
    Data,
    Config,
    Processing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl DashError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            DashError::IoError(_) | DashError::FileNotFound { .. } | DashError::ZipError(_) => {
                ErrorCategory::Io
            }
            DashError::CsvError(_)
            | DashError::SerializationError(_)
            | DashError::MissingColumn { .. }
            | DashError::InvalidFilterValue { .. } => ErrorCategory::Data,
            DashError::InvalidConfigValueError { .. }
            | DashError::ConfigValidationError { .. } => ErrorCategory::Config,
            DashError::ProcessingError { .. } => ErrorCategory::Processing,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            DashError::InvalidFilterValue { .. } => ErrorSeverity::Medium,
            DashError::InvalidConfigValueError { .. }
            | DashError::ConfigValidationError { .. } => ErrorSeverity::High,
            DashError::IoError(_) | DashError::ZipError(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::High,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            DashError::FileNotFound { path } => {
                format!("Check that '{}' exists and the path is spelled correctly", path)
            }
            DashError::MissingColumn { column, file } => format!(
                "Add a '{}' column to {} or export the spreadsheet with its full header row",
                column, file
            ),
            DashError::InvalidFilterValue { field, .. } => {
                format!("Pick one of the supported values for {}", field)
            }
            DashError::CsvError(_) => {
                "Inspect the input file for malformed rows or a wrong delimiter".to_string()
            }
            DashError::InvalidConfigValueError { field, .. }
            | DashError::ConfigValidationError { field, .. } => {
                format!("Correct the '{}' setting and retry", field)
            }
            DashError::IoError(_) | DashError::ZipError(_) => {
                "Check file permissions and free disk space".to_string()
            }
            DashError::SerializationError(_) => {
                "This is likely a bug; rerun with --verbose and report the log".to_string()
            }
            DashError::ProcessingError { .. } => {
                "Rerun with --verbose to see which stage failed".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            DashError::FileNotFound { path } => format!("Could not find input file: {}", path),
            DashError::MissingColumn { column, file } => {
                format!("The file {} is missing the required column {}", file, column)
            }
            DashError::InvalidFilterValue { field, value, .. } => {
                format!("'{}' is not a valid {} value", value, field)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DashError>;
