//! Error handling for brand-forge

use thiserror::Error;

/// Main error type for brand-forge
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BrandForgeError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Parse error: {message}")]
    Parse { message: String },

    #[error("IO error: {message}")]
    Io {
        message: String,
        path: Option<String>,
    },

    #[error("Internal error: {message}")]
    Internal { message: String },

    #[error("CLI error: {message}")]
    Cli { message: String },
}

impl BrandForgeError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a parse error
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    /// Create an IO error
    pub fn io(message: impl Into<String>, path: Option<String>) -> Self {
        Self::Io {
            message: message.into(),
            path,
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Create a CLI error
    pub fn cli(message: impl Into<String>) -> Self {
        Self::Cli {
            message: message.into(),
        }
    }

    /// True for errors caused by caller input rather than configuration or bugs
    pub fn is_input_error(&self) -> bool {
        matches!(self, Self::Validation { .. } | Self::Cli { .. })
    }

    /// Get user-friendly error message with suggestions
    pub fn user_message(&self) -> String {
        match self {
            Self::Config { message } => {
                format!("❌ Configuration problem: {}\n💡 Check the file named by BRAND_FORGE_CONFIG", message)
            }
            Self::Validation { message } => {
                format!("❌ Validation error: {}\n💡 Check your input, --help lists the accepted ranges", message)
            }
            Self::Parse { message } => {
                format!("❌ JSON error: {}\n💡 This is a bug, please report it", message)
            }
            Self::Io { message, path } => {
                let path_info = path.as_ref().map_or(String::new(), |p| format!(" ({})", p));
                format!("❌ File error{}: {}\n💡 Check file permissions and paths", path_info, message)
            }
            Self::Internal { message } => {
                format!("❌ Internal error: {}\n💡 This is a bug, please report it", message)
            }
            Self::Cli { message } => {
                format!("❌ Command error: {}\n💡 Use --help for usage information", message)
            }
        }
    }
}

impl From<serde_json::Error> for BrandForgeError {
    fn from(err: serde_json::Error) -> Self {
        Self::parse(err.to_string())
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, BrandForgeError>;

/// Helper macros for common error patterns
#[macro_export]
macro_rules! config_error {
    ($msg:expr) => {
        $crate::error::BrandForgeError::config($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::error::BrandForgeError::config(format!($fmt, $($arg)*))
    };
}

#[macro_export]
macro_rules! validation_error {
    ($msg:expr) => {
        $crate::error::BrandForgeError::validation($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::error::BrandForgeError::validation(format!($fmt, $($arg)*))
    };
}

#[macro_export]
macro_rules! internal_error {
    ($msg:expr) => {
        $crate::error::BrandForgeError::internal($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::error::BrandForgeError::internal(format!($fmt, $($arg)*))
    };
}
