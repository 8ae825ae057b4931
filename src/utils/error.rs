use thiserror::Error;

#[derive(Error, Debug)]
pub enum BoxerError {
    #[error("Missing required columns: {}", missing.join(", "))]
    MissingColumns { missing: Vec<String> },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Spreadsheet read error: {0}")]
    XlsxReadError(#[from] calamine::Error),

    #[error("Spreadsheet write error: {0}")]
    XlsxWriteError(#[from] rust_xlsxwriter::XlsxError),

    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

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

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },

    #[error("Progress reporting aborted: {message}")]
    ProgressAborted { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Output,
    Configuration,
    Processing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl BoxerError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            BoxerError::MissingColumns { .. }
            | BoxerError::CsvError(_)
            | BoxerError::XlsxReadError(_) => ErrorCategory::Input,
            BoxerError::XlsxWriteError(_)
            | BoxerError::ZipError(_)
            | BoxerError::IoError(_)
            | BoxerError::SerializationError(_) => ErrorCategory::Output,
            BoxerError::ConfigValidationError { .. }
            | BoxerError::InvalidConfigValueError { .. }
            | BoxerError::MissingConfigError { .. } => ErrorCategory::Configuration,
            BoxerError::ProcessingError { .. } | BoxerError::ProgressAborted { .. } => {
                ErrorCategory::Processing
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 使用者中止，不算真正的失敗
            BoxerError::ProgressAborted { .. } => ErrorSeverity::Low,
            BoxerError::IoError(_) => ErrorSeverity::Critical,
            BoxerError::ConfigValidationError { .. }
            | BoxerError::InvalidConfigValueError { .. }
            | BoxerError::MissingConfigError { .. } => ErrorSeverity::Medium,
            _ => ErrorSeverity::High,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            BoxerError::MissingColumns { missing } => {
                format!("누락된 컬럼이 있습니다: {}", missing.join(", "))
            }
            BoxerError::CsvError(_) | BoxerError::XlsxReadError(_) => {
                format!("Could not read the input file: {}", self)
            }
            BoxerError::XlsxWriteError(_) | BoxerError::ZipError(_) => {
                format!("Could not write the output file: {}", self)
            }
            BoxerError::ProgressAborted { .. } => "Conversion was cancelled".to_string(),
            _ => self.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Input => {
                "Check that the input is a CSV or XLSX file containing 카드번호, 권면금액, 상품번호, 시퀀스, 영업점번호, 영업점명"
            }
            ErrorCategory::Output => "Check that the output directory exists and is writable",
            ErrorCategory::Configuration => "Review the command line arguments or the job file",
            ErrorCategory::Processing => "Re-run the conversion; the input was not modified",
        }
    }
}

pub type Result<T> = std::result::Result<T, BoxerError>;
