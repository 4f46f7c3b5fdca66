//! Error types for sorting operations.
//!
//! Every failure that can happen while sorting a file maps onto one
//! [`SortError`] variant. The variants follow the batch policy of the tool:
//!
//! - `Parse`, `UnknownEncoding`, `Decoding`, `Io`: the file is skipped and reported, the batch
//!   continues.
//! - `Consistency`: an internal bug detected while rewriting one file. The
//!   file is left untouched and reported, the batch continues.
//! - `Config`: fatal, raised before any file is processed.
//!
//! # Error Codes
//!
//! - E001-E009: I/O and filesystem errors
//! - E010-E019: Parse and decoding errors
//! - E020-E029: Configuration errors
//! - E030-E039: Internal consistency errors
//!
//! # Example
//!
//! ```rust
//! use osort::errors::SortError;
//!
//! let err = SortError::parse("models/sale.py", 3, 5);
//! assert_eq!(err.code().as_str(), "E010");
//! assert!(!err.is_fatal());
//! ```

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Structured error code for documentation and programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ErrorCode(&'static str);

impl ErrorCode {
    /// I/O error - file not found
    pub const IO_FILE_NOT_FOUND: ErrorCode = ErrorCode("E001");
    /// I/O error - permission denied
    pub const IO_PERMISSION_DENIED: ErrorCode = ErrorCode("E002");
    /// I/O error - path is a directory
    pub const IO_IS_DIRECTORY: ErrorCode = ErrorCode("E003");
    /// I/O error - generic
    pub const IO_GENERIC: ErrorCode = ErrorCode("E009");

    /// Parse error - syntax error
    pub const PARSE_SYNTAX: ErrorCode = ErrorCode("E010");
    /// Parse error - coding declaration names an unknown encoding
    pub const PARSE_UNKNOWN_ENCODING: ErrorCode = ErrorCode("E011");
    /// Parse error - invalid encoding
    pub const PARSE_ENCODING: ErrorCode = ErrorCode("E012");

    /// Config error - invalid value
    pub const CONFIG_INVALID: ErrorCode = ErrorCode("E020");

    /// Internal error - span/permutation mismatch
    pub const INTERNAL_CONSISTENCY: ErrorCode = ErrorCode("E030");

    /// Get the error code string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What went wrong with an I/O operation, as reported to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoFailure {
    NotFound,
    IsDirectory,
    NotReadable,
    NotWritable,
    Other,
}

impl IoFailure {
    fn describe(self) -> &'static str {
        match self {
            Self::NotFound => "does not exist",
            Self::IsDirectory => "is a directory",
            Self::NotReadable => "is not readable",
            Self::NotWritable => "is not writable",
            Self::Other => "could not be accessed",
        }
    }
}

/// Error raised anywhere in the sorting pipeline.
#[derive(Debug, Error)]
pub enum SortError {
    /// The file is not valid Python.
    #[error("syntax error in {}: line {line}, column {column}", .path.display())]
    Parse {
        path: PathBuf,
        /// 1-based line of the first syntax error.
        line: usize,
        /// 0-based column of the first syntax error.
        column: usize,
    },

    /// The coding declaration names an encoding osort cannot handle.
    #[error("unknown encoding, '{encoding}', in {}", .path.display())]
    UnknownEncoding { path: PathBuf, encoding: String },

    /// The file is not valid in its declared encoding.
    #[error("encoding error in {}: {detail}", .path.display())]
    Decoding { path: PathBuf, detail: String },

    /// Reading or writing the file failed.
    #[error("{} {}", .path.display(), .failure.describe())]
    Io {
        path: PathBuf,
        failure: IoFailure,
        #[source]
        source: std::io::Error,
    },

    /// Invalid or unreadable configuration.
    #[error("invalid configuration{}: {message}", location_suffix(.path))]
    Config {
        message: String,
        path: Option<PathBuf>,
    },

    /// The rewriter was handed inconsistent spans or an invalid permutation.
    #[error("internal error while sorting {}: {detail}", .path.display())]
    Consistency { path: PathBuf, detail: String },
}

impl SortError {
    /// Create a parse error at a 1-based line and 0-based column.
    #[must_use]
    pub fn parse(path: impl Into<PathBuf>, line: usize, column: usize) -> Self {
        Self::Parse {
            path: path.into(),
            line,
            column,
        }
    }

    /// Create a configuration error not tied to a file.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            path: None,
        }
    }

    /// Create a configuration error for a specific config file.
    #[must_use]
    pub fn config_in(message: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::Config {
            message: message.into(),
            path: Some(path.into()),
        }
    }

    /// Create an internal consistency error.
    #[must_use]
    pub fn consistency(path: impl Into<PathBuf>, detail: impl Into<String>) -> Self {
        Self::Consistency {
            path: path.into(),
            detail: detail.into(),
        }
    }

    /// Map an I/O error from reading `path`.
    #[must_use]
    pub fn from_read(path: &Path, source: std::io::Error) -> Self {
        let failure = match source.kind() {
            std::io::ErrorKind::NotFound => IoFailure::NotFound,
            std::io::ErrorKind::IsADirectory => IoFailure::IsDirectory,
            std::io::ErrorKind::PermissionDenied => IoFailure::NotReadable,
            _ if path.is_dir() => IoFailure::IsDirectory,
            _ => IoFailure::Other,
        };
        Self::Io {
            path: path.to_path_buf(),
            failure,
            source,
        }
    }

    /// Map an I/O error from writing `path`.
    #[must_use]
    pub fn from_write(path: &Path, source: std::io::Error) -> Self {
        let failure = match source.kind() {
            std::io::ErrorKind::PermissionDenied => IoFailure::NotWritable,
            _ => IoFailure::Other,
        };
        Self::Io {
            path: path.to_path_buf(),
            failure,
            source,
        }
    }

    /// Error code for documentation lookup.
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Parse { .. } => ErrorCode::PARSE_SYNTAX,
            Self::UnknownEncoding { .. } => ErrorCode::PARSE_UNKNOWN_ENCODING,
            Self::Decoding { .. } => ErrorCode::PARSE_ENCODING,
            Self::Io { failure, .. } => match failure {
                IoFailure::NotFound => ErrorCode::IO_FILE_NOT_FOUND,
                IoFailure::IsDirectory => ErrorCode::IO_IS_DIRECTORY,
                IoFailure::NotReadable | IoFailure::NotWritable => {
                    ErrorCode::IO_PERMISSION_DENIED
                }
                IoFailure::Other => ErrorCode::IO_GENERIC,
            },
            Self::Config { .. } => ErrorCode::CONFIG_INVALID,
            Self::Consistency { .. } => ErrorCode::INTERNAL_CONSISTENCY,
        }
    }

    /// Fatal errors abort the whole run; everything else only skips a file.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Config { .. })
    }

    /// Internal errors point at a bug in osort rather than in the input.
    #[must_use]
    pub fn is_internal(&self) -> bool {
        matches!(self, Self::Consistency { .. })
    }
}

fn location_suffix(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|p| format!(" in {}", p.display()))
        .unwrap_or_default()
}

pub type Result<T> = std::result::Result<T, SortError>;
