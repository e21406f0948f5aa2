//! Error types shared across the workspace

use thiserror::Error;

/// Result type alias for shared operations
pub type Result<T> = std::result::Result<T, CsvProcError>;

/// Main error type shared by the CSV processor crates
#[derive(Error, Debug)]
pub enum CsvProcError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Logging initialization failed: {0}")]
    Logging(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CsvProcError::Logging("subscriber already set".to_string());
        assert_eq!(err.to_string(), "Logging initialization failed: subscriber already set");

        let err = CsvProcError::Config("port must be greater than 0".to_string());
        assert_eq!(err.to_string(), "Configuration error: port must be greater than 0");
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: CsvProcError = io.into();
        assert!(matches!(err, CsvProcError::Io(_)));
        assert!(err.to_string().starts_with("IO error"));
    }
}
