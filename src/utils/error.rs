use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChartError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Spreadsheet error: {0}")]
    SpreadsheetError(#[from] calamine::Error),

    #[error("Image encoding error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Report structure mismatch: expected {expected} columns, found {found}")]
    StructuralMismatch { expected: usize, found: usize },

    #[error("No report file was supplied")]
    MissingInput,

    #[error("Chart rendering failed for '{metric}': {message}")]
    RenderError { metric: String, message: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Input,
    Processing,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ChartError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ChartError::ConfigError { .. }
            | ChartError::ConfigValidationError { .. }
            | ChartError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            ChartError::MissingInput
            | ChartError::StructuralMismatch { .. }
            | ChartError::SpreadsheetError(_) => ErrorCategory::Input,
            ChartError::RenderError { .. }
            | ChartError::ImageError(_)
            | ChartError::ProcessingError { .. } => ErrorCategory::Processing,
            ChartError::ZipError(_) | ChartError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 沒有檔案只是「沒有結果」
            ChartError::MissingInput => ErrorSeverity::Low,
            ChartError::IoError(e) if e.kind() == std::io::ErrorKind::NotFound => {
                ErrorSeverity::Medium
            }
            ChartError::ZipError(_) | ChartError::IoError(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::High,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            ChartError::MissingInput => {
                "Pass a report file with --input or set report.input_path in the config".to_string()
            }
            ChartError::StructuralMismatch { expected, .. } => format!(
                "Check that the report keeps its header rows and has exactly {} columns: Group, Code, Value, Start, End",
                expected
            ),
            ChartError::SpreadsheetError(_) => {
                "Make sure the file is a valid xlsx, xlsm, xlsb, xls or ods workbook".to_string()
            }
            ChartError::ConfigError { .. }
            | ChartError::ConfigValidationError { .. }
            | ChartError::InvalidConfigValueError { .. } => {
                "Review the command line arguments and the TOML configuration file".to_string()
            }
            ChartError::IoError(_) => {
                "Check that the input exists and the output directory is writable".to_string()
            }
            ChartError::ZipError(_) => "Check free disk space and retry".to_string(),
            ChartError::RenderError { .. } | ChartError::ImageError(_) => {
                "Check chart dimensions and that system fonts are available".to_string()
            }
            ChartError::ProcessingError { .. } => "Re-run with --verbose for details".to_string(),
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            ChartError::MissingInput => "No report was uploaded, nothing to chart.".to_string(),
            ChartError::StructuralMismatch { expected, found } => format!(
                "The report layout is not recognised: expected {} columns after the header, found {}.",
                expected, found
            ),
            ChartError::SpreadsheetError(e) => format!("The spreadsheet could not be read: {}", e),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ChartError>;
