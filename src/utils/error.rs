use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeckError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Image decoding failed: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("Unsupported image format: {format}")]
    UnsupportedImageFormat { format: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Document processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Configuration,
    Document,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl DeckError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            DeckError::HttpError(_) | DeckError::UrlError(_) => ErrorCategory::Network,
            DeckError::ConfigError { .. }
            | DeckError::InvalidConfigValueError { .. }
            | DeckError::ConfigValidationError { .. } => ErrorCategory::Configuration,
            DeckError::ZipError(_)
            | DeckError::ImageError(_)
            | DeckError::UnsupportedImageFormat { .. }
            | DeckError::ProcessingError { .. } => ErrorCategory::Document,
            DeckError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // 圖示層級的錯誤都會降級處理
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Document => match self {
                DeckError::ImageError(_) | DeckError::UnsupportedImageFormat { .. } => {
                    ErrorSeverity::Low
                }
                _ => ErrorSeverity::High,
            },
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => {
                "Check that the icon search and placeholder services are reachable"
            }
            ErrorCategory::Configuration => {
                "Review the command line flags or the TOML configuration file"
            }
            ErrorCategory::Document => "Retry with fewer or different icon names",
            ErrorCategory::System => "Check file permissions and available resources",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Network => format!("Could not reach an external service: {}", self),
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
            ErrorCategory::Document => format!("Could not build the presentation: {}", self),
            ErrorCategory::System => format!("System error: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, DeckError>;
