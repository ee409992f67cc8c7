use thiserror::Error;

#[derive(Error, Debug)]
pub enum CadError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

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

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid STL content: {message}")]
    InvalidStl { message: String },

    #[error("Truncated STL: expected {expected} triangles, got {got}")]
    TruncatedStl { expected: u32, got: u32 },

    #[error("Unsupported file type: {extension}")]
    UnsupportedFormat { extension: String },

    #[error("Background task failed: {message}")]
    TaskError { message: String },
}

impl CadError {
    pub fn invalid_stl(message: impl Into<String>) -> Self {
        Self::InvalidStl {
            message: message.into(),
        }
    }

    /// 給使用者看的訊息，不含伺服器上的路徑或內部細節
    pub fn user_friendly_message(&self) -> String {
        match self {
            CadError::IoError(_) => "Failed to read the uploaded file".to_string(),
            CadError::SerializationError(_) => "Failed to encode the result".to_string(),
            CadError::ConfigError { .. }
            | CadError::ConfigValidationError { .. }
            | CadError::InvalidConfigValueError { .. }
            | CadError::MissingConfigError { .. } => format!("Invalid configuration: {}", self),
            CadError::InvalidStl { .. } | CadError::TruncatedStl { .. } => self.to_string(),
            CadError::UnsupportedFormat { .. } => "File type not allowed".to_string(),
            CadError::TaskError { .. } => "Processing was interrupted".to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            CadError::IoError(_) => "Check that the upload directory exists and is writable",
            CadError::SerializationError(_) => "Report the input file that triggered this error",
            CadError::ConfigError { .. }
            | CadError::ConfigValidationError { .. }
            | CadError::InvalidConfigValueError { .. }
            | CadError::MissingConfigError { .. } => {
                "Fix the configuration file or command line flags and restart"
            }
            CadError::InvalidStl { .. } | CadError::TruncatedStl { .. } => {
                "Re-export the model as ASCII or binary STL and upload it again"
            }
            CadError::UnsupportedFormat { .. } => "Upload a .stl, .stp, .step, .igs or .iges file",
            CadError::TaskError { .. } => "Retry the request",
        }
    }

    /// Client-side problems with the uploaded content, as opposed to server faults.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            CadError::InvalidStl { .. }
                | CadError::TruncatedStl { .. }
                | CadError::UnsupportedFormat { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, CadError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_message_hides_path() {
        let err = CadError::from(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "/srv/uploads/secret.stl not found",
        ));
        assert_eq!(err.user_friendly_message(), "Failed to read the uploaded file");
        assert!(!err.is_input_error());
    }

    #[test]
    fn test_stl_errors_are_input_errors() {
        let err = CadError::TruncatedStl {
            expected: 12,
            got: 3,
        };
        assert!(err.is_input_error());
        assert_eq!(
            err.user_friendly_message(),
            "Truncated STL: expected 12 triangles, got 3"
        );
    }
}
