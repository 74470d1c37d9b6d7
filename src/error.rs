use thiserror::Error;

/// Error type for the palette core
#[derive(Error, Debug)]
pub enum PaletteError {
    #[error("Command discovery error: {0}")]
    Discovery(String),

    #[error("Execution error: {0}")]
    Execution(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl PaletteError {
    /// Create a command discovery error
    pub fn discovery<S: Into<String>>(msg: S) -> Self {
        Self::Discovery(msg.into())
    }

    /// Create an execution error
    pub fn execution<S: Into<String>>(msg: S) -> Self {
        Self::Execution(msg.into())
    }

    /// Create a configuration error
    pub fn configuration<S: Into<String>>(msg: S) -> Self {
        Self::Configuration(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Get user-friendly error message with suggestions
    pub fn user_message(&self) -> String {
        match self {
            // Executor messages are already end-user strings; pass them through.
            Self::Execution(msg) => msg.clone(),
            Self::InvalidInput(msg) => {
                format!("{}. Provide both a command and input text.", msg)
            }
            Self::Configuration(msg) => {
                format!("Configuration problem: {}. Check your config.toml.", msg)
            }
            _ => self.to_string(),
        }
    }
}

/// Convenient result type for the palette core
pub type Result<T> = std::result::Result<T, PaletteError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_error_creation_helpers() {
        let discovery_err = PaletteError::discovery("Failed to scan commands");
        match discovery_err {
            PaletteError::Discovery(msg) => assert_eq!(msg, "Failed to scan commands"),
            _ => panic!("Expected Discovery error"),
        }

        let execution_err = PaletteError::execution("Command execution failed");
        match execution_err {
            PaletteError::Execution(msg) => assert_eq!(msg, "Command execution failed"),
            _ => panic!("Expected Execution error"),
        }

        let config_err = PaletteError::configuration("Bad config");
        match config_err {
            PaletteError::Configuration(msg) => assert_eq!(msg, "Bad config"),
            _ => panic!("Expected Configuration error"),
        }

        let input_err = PaletteError::invalid_input("empty command");
        match input_err {
            PaletteError::InvalidInput(msg) => assert_eq!(msg, "empty command"),
            _ => panic!("Expected InvalidInput error"),
        }
    }

    #[test]
    fn test_error_display_messages() {
        let errors = vec![
            (
                PaletteError::Discovery("scan failed".to_string()),
                "Command discovery error: scan failed",
            ),
            (
                PaletteError::Execution("exec failed".to_string()),
                "Execution error: exec failed",
            ),
            (
                PaletteError::Configuration("bad value".to_string()),
                "Configuration error: bad value",
            ),
            (
                PaletteError::InvalidInput("empty input".to_string()),
                "Invalid input: empty input",
            ),
        ];

        for (error, expected_message) in errors {
            assert_eq!(error.to_string(), expected_message);
        }
    }

    #[test]
    fn test_error_type_conversions() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let palette_error: PaletteError = io_error.into();
        match palette_error {
            PaletteError::Io(_) => {}
            _ => panic!("Expected Io error"),
        }

        let json_result: std::result::Result<i32, serde_json::Error> =
            serde_json::from_str("invalid json");
        let palette_error: PaletteError = json_result.unwrap_err().into();
        match palette_error {
            PaletteError::Serialization(_) => {}
            _ => panic!("Expected Serialization error"),
        }
    }

    #[test]
    fn test_user_friendly_messages() {
        let execution = PaletteError::execution("コマンドの実行に失敗しました");
        assert_eq!(execution.user_message(), "コマンドの実行に失敗しました");

        let invalid = PaletteError::invalid_input("command must not be empty");
        let message = invalid.user_message();
        assert!(message.contains("command must not be empty"));
        assert!(message.contains("Provide both"));

        let config = PaletteError::configuration("unreadable file");
        assert!(config.user_message().contains("config.toml"));

        // Generic errors fall back to Display
        let io_err = PaletteError::Io(io::Error::new(io::ErrorKind::Other, "disk gone"));
        assert!(io_err.user_message().contains("disk gone"));
    }
}
