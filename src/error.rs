//! Global error handling for projsnap
//!
//! This module provides a centralized error type that can represent errors
//! from all modules in the project. Per-file problems during a scan never
//! surface here; they are folded into the run statistics instead.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Global error type for projsnap operations
#[derive(Error, Debug)]
pub enum SnapshotError {
    /// Scan root does not exist
    #[error("Root directory not found: {}", .0.display())]
    RootNotFound(PathBuf),

    /// Scan root exists but is not a directory
    #[error("Root is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    /// File system errors
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON config parsing errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML config parsing errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Gitignore parsing errors
    #[error("Gitignore error: {0}")]
    Gitignore(#[from] ignore::Error),

    /// Invalid argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Specialized Result type for projsnap operations
pub type Result<T> = std::result::Result<T, SnapshotError>;

/// Creates a SnapshotError with a formatted message
#[macro_export]
macro_rules! error {
    ($error_type:ident, $($arg:tt)*) => {
        $crate::error::SnapshotError::$error_type(format!($($arg)*))
    };
}

/// Returns an error result with a formatted message
#[macro_export]
macro_rules! bail {
    ($error_type:ident, $($arg:tt)*) => {
        return Err($crate::error!($error_type, $($arg)*))
    };
}

/// Ensures a condition is true, otherwise returns an error
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $error_type:ident, $($arg:tt)*) => {
        if !($cond) {
            $crate::bail!($error_type, $($arg)*)
        }
    };
}

/// Extension trait for adding context to errors
pub trait ResultExt<T, E> {
    /// Add additional context to an error
    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: std::fmt::Display;
}

impl<T, E: std::error::Error + 'static> ResultExt<T, E> for std::result::Result<T, E> {
    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: std::fmt::Display,
    {
        self.map_err(|e| {
            let context = f();
            SnapshotError::Config(format!("{}: {}", context, e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checked(value: u64) -> Result<u64> {
        ensure!(value > 0, InvalidArgument, "value must be positive, got {}", value);
        Ok(value)
    }

    #[test]
    fn test_ensure_macro() {
        assert_eq!(checked(3).unwrap(), 3);
        let err = checked(0).unwrap_err();
        assert_eq!(err.to_string(), "Invalid argument: value must be positive, got 0");
    }

    #[test]
    fn test_io_errors_convert() {
        fn open_missing() -> Result<String> {
            Ok(std::fs::read_to_string("/definitely/not/here.txt")?)
        }
        assert!(matches!(open_missing(), Err(SnapshotError::Io(_))));
        let err = SnapshotError::RootNotFound(PathBuf::from("/nope"));
        assert_eq!(err.to_string(), "Root directory not found: /nope");
    }

    #[test]
    fn test_with_context() {
        let parsed: std::result::Result<u32, std::num::ParseIntError> = "x".parse();
        let err = parsed.with_context(|| "max_bytes").unwrap_err();
        assert!(err.to_string().starts_with("Configuration error: max_bytes:"));
    }
}
