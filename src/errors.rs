use serde::Serialize;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a whole copy run
#[derive(Debug, Error)]
pub enum CopyRunError {
    #[error("Manifest not found: {path:?}")]
    ManifestNotFound { path: PathBuf },

    #[error("Failed to read manifest {path:?}: {source}")]
    ManifestUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Destination directory unavailable {path:?}: {source}")]
    DestinationUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Errors recorded against a single manifest entry; the run keeps going
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EntryError {
    #[error("Source file does not exist: {path:?}")]
    SourceNotFound { path: PathBuf },

    #[error("I/O error: {detail}")]
    Io { detail: String },

    #[error("Invalid manifest entry: {reason}")]
    InvalidEntry { reason: String },

    #[error("Copied file does not match source: {path:?}")]
    VerificationFailed { path: PathBuf },
}

impl From<io::Error> for EntryError {
    fn from(error: io::Error) -> Self {
        EntryError::Io {
            detail: error.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_keeps_detail() {
        let error: EntryError = io::Error::new(io::ErrorKind::PermissionDenied, "denied").into();
        assert_eq!(
            error,
            EntryError::Io {
                detail: "denied".to_string()
            }
        );
    }

    #[test]
    fn test_entry_error_serializes_with_kind_tag() {
        let error = EntryError::InvalidEntry {
            reason: "no file name".to_string(),
        };
        let json = serde_json::to_value(&error).unwrap();
        assert_eq!(json["kind"], "invalid_entry");
        assert_eq!(json["reason"], "no file name");
    }
}
