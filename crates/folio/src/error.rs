//! Error types for folio.
//!
//! This module defines all error types used throughout the folio crate,
//! providing detailed context for debugging and user-friendly error messages.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for folio operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Storage Errors ===
    /// Failed to open or create the database.
    #[error("failed to open database at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database query failed.
    #[error("database query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    /// Failed to run database migrations.
    #[error("database migration failed: {message}")]
    DatabaseMigration {
        /// Description of what went wrong.
        message: String,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Catalog Errors ===
    /// The catalog source could not be read or decoded.
    #[error("failed to load catalog from {source_name}: {message}")]
    CatalogLoad {
        /// Where the catalog was being loaded from.
        source_name: String,
        /// Description of what went wrong.
        message: String,
    },

    /// An HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A CSV catalog could not be parsed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    // === Notes Errors ===
    /// Attempted to save a note with no content.
    #[error("note has no content")]
    EmptyNote,

    // === Capability Errors ===
    /// A platform capability is not available.
    #[error("{capability} is not available: {reason}")]
    CapabilityUnavailable {
        /// Name of the capability.
        capability: &'static str,
        /// Why it is unavailable.
        reason: String,
    },

    /// The user declined a capability grant.
    #[error("permission denied for {capability}: {message}")]
    PermissionDenied {
        /// Name of the capability.
        capability: &'static str,
        /// Description of the denial.
        message: String,
    },

    /// A capability failed to start.
    #[error("failed to start {capability}: {message}")]
    CapabilityStart {
        /// Name of the capability.
        capability: &'static str,
        /// Description of what went wrong.
        message: String,
    },

    /// An operation is not allowed in the current session state.
    #[error("invalid state: {0}")]
    InvalidState(String),

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for folio operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a catalog load error.
    #[must_use]
    pub fn catalog_load(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::CatalogLoad {
            source_name: source_name.into(),
            message: message.into(),
        }
    }

    /// Create a capability unavailable error.
    #[must_use]
    pub fn capability_unavailable(capability: &'static str, reason: impl Into<String>) -> Self {
        Self::CapabilityUnavailable {
            capability,
            reason: reason.into(),
        }
    }

    /// Create a permission denied error.
    #[must_use]
    pub fn permission_denied(capability: &'static str, message: impl Into<String>) -> Self {
        Self::PermissionDenied {
            capability,
            message: message.into(),
        }
    }

    /// Create a capability start error.
    #[must_use]
    pub fn capability_start(capability: &'static str, message: impl Into<String>) -> Self {
        Self::CapabilityStart {
            capability,
            message: message.into(),
        }
    }

    /// Create an invalid state error.
    #[must_use]
    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState(message.into())
    }

    /// Check if this error is a permission issue.
    #[must_use]
    pub fn is_permission_error(&self) -> bool {
        matches!(self, Self::PermissionDenied { .. })
    }

    /// Check if this error means a capability is missing entirely.
    #[must_use]
    pub fn is_capability_unavailable(&self) -> bool {
        matches!(self, Self::CapabilityUnavailable { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(Error::EmptyNote.to_string(), "note has no content");

        let err = Error::invalid_state("recording in progress");
        assert_eq!(err.to_string(), "invalid state: recording in progress");
    }

    #[test]
    fn test_catalog_load_error() {
        let err = Error::catalog_load("books.json", "unexpected end of input");
        let msg = err.to_string();
        assert!(msg.contains("books.json"));
        assert!(msg.contains("unexpected end of input"));
    }

    #[test]
    fn test_permission_denied_error() {
        let err = Error::permission_denied("microphone", "user dismissed the prompt");
        assert!(err.is_permission_error());
        assert!(!err.is_capability_unavailable());
        assert!(err.to_string().contains("microphone"));
    }

    #[test]
    fn test_capability_unavailable_error() {
        let err = Error::capability_unavailable("speech recognition", "no engine installed");
        assert!(err.is_capability_unavailable());
        assert!(!err.is_permission_error());
        assert_eq!(
            err.to_string(),
            "speech recognition is not available: no engine installed"
        );
    }

    #[test]
    fn test_capability_start_error() {
        let err = Error::capability_start("audio capture", "device busy");
        let msg = err.to_string();
        assert!(msg.contains("audio capture"));
        assert!(msg.contains("device busy"));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_from_rusqlite_error() {
        let result = rusqlite::Connection::open_with_flags(
            "/nonexistent/path/db.sqlite",
            rusqlite::OpenFlags::SQLITE_OPEN_READ_ONLY,
        );
        if let Err(sqlite_err) = result {
            let err: Error = sqlite_err.into();
            assert!(matches!(err, Error::DatabaseQuery(_)));
        }
    }

    #[test]
    fn test_from_json_error() {
        let json_result: std::result::Result<i32, serde_json::Error> =
            serde_json::from_str("not valid json");
        if let Err(json_err) = json_result {
            let err: Error = json_err.into();
            assert!(matches!(err, Error::Json(_)));
        }
    }

    #[test]
    fn test_database_migration_error_display() {
        let err = Error::DatabaseMigration {
            message: "version mismatch".to_string(),
        };
        assert!(err.to_string().contains("version mismatch"));
    }

    #[test]
    fn test_config_validation_error_display() {
        let err = Error::ConfigValidation {
            message: "page_size must be greater than 0".to_string(),
        };
        assert!(err.to_string().contains("page_size"));
    }

    #[test]
    fn test_directory_create_error_display() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = Error::DirectoryCreate {
            path: PathBuf::from("/root/forbidden"),
            source: io_err,
        };
        assert!(err.to_string().contains("/root/forbidden"));
    }
}
