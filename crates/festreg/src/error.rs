//! Error types for festreg.
//!
//! Every failure a store or CLI operation can report is a variant of
//! [`Error`]. The CLI renders all of them as messages; only a failure to open
//! the database is treated as fatal.

use std::path::PathBuf;
use thiserror::Error;

use crate::validation::ValidationError;

/// The main error type for festreg operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Record Errors ===
    /// A participant payload failed field validation.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// A participant with this registration ID already exists.
    #[error("registration ID already exists: {registration_id}")]
    DuplicateKey {
        /// The conflicting registration ID.
        registration_id: String,
    },

    /// No participant matched the registration ID.
    #[error("no participant found with registration ID: {registration_id}")]
    NotFound {
        /// The registration ID that was looked up.
        registration_id: String,
    },

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

    /// A database statement failed.
    #[error("database query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    /// Failed to run database migrations.
    #[error("database migration failed: {message}")]
    DatabaseMigration {
        /// Description of what went wrong.
        message: String,
    },

    // === Image Errors ===
    /// The ID photo could not be read from disk.
    #[error("error reading image file {path}: {source}")]
    ImageRead {
        /// Path of the image file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The ID photo has an extension outside the allowed list.
    #[error("unsupported image type '{extension}' for {path}")]
    ImageType {
        /// Path of the image file.
        path: PathBuf,
        /// The rejected extension (empty if the file had none).
        extension: String,
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
    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for festreg operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a not-found error for the given registration ID.
    #[must_use]
    pub fn not_found(registration_id: impl Into<String>) -> Self {
        Self::NotFound {
            registration_id: registration_id.into(),
        }
    }

    /// Create a duplicate-key error for the given registration ID.
    #[must_use]
    pub fn duplicate_key(registration_id: impl Into<String>) -> Self {
        Self::DuplicateKey {
            registration_id: registration_id.into(),
        }
    }

    /// Check if this error means no participant matched.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this error is a registration ID collision.
    #[must_use]
    pub fn is_duplicate_key(&self) -> bool {
        matches!(self, Self::DuplicateKey { .. })
    }

    /// Check if this error came from field validation.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::{Field, ValidationReason};

    #[test]
    fn test_not_found_display() {
        let err = Error::not_found("R001");
        assert_eq!(
            err.to_string(),
            "no participant found with registration ID: R001"
        );
        assert!(err.is_not_found());
        assert!(!err.is_duplicate_key());
    }

    #[test]
    fn test_duplicate_key_display() {
        let err = Error::duplicate_key("R002");
        assert!(err.to_string().contains("R002"));
        assert!(err.is_duplicate_key());
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_from_validation_error() {
        let err: Error = ValidationError::new(Field::Name, ValidationReason::Required).into();
        assert!(err.is_validation());
        assert!(err.to_string().contains("Participant Name is required"));
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
    fn test_image_type_error_display() {
        let err = Error::ImageType {
            path: PathBuf::from("/tmp/id.tiff"),
            extension: "tiff".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("tiff"));
        assert!(msg.contains("/tmp/id.tiff"));
    }

    #[test]
    fn test_image_read_error_display() {
        let err = Error::ImageRead {
            path: PathBuf::from("/tmp/missing.png"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert!(err.to_string().contains("/tmp/missing.png"));
    }

    #[test]
    fn test_config_validation_error_display() {
        let err = Error::ConfigValidation {
            message: "no image extensions".to_string(),
        };
        assert!(err.to_string().contains("no image extensions"));
    }

    #[test]
    fn test_database_migration_error_display() {
        let err = Error::DatabaseMigration {
            message: "version mismatch".to_string(),
        };
        assert!(err.to_string().contains("version mismatch"));
    }
}
