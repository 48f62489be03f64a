//! Storage errors
//!
//! I/O failures are classified by what the user can do about them, and
//! `recovery_suggestion` turns that into a line the CLI can print.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// ENOSPC on unix, ERROR_DISK_FULL on windows
const DISK_FULL_OS_CODES: [i32; 2] = [28, 112];

/// Errors reading or writing catalog slots
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Cannot create data directory {path:?}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Permission denied on {path:?}")]
    PermissionDenied {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("No space left to write {path:?}")]
    DiskFull {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Cannot read slot file {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Cannot write slot file {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The slot exists but does not hold the expected JSON
    #[error("Slot '{key}' holds unreadable data: {details}")]
    Corrupt { key: String, details: String },

    #[error("Cannot encode slot '{key}': {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

impl StorageError {
    /// Wrap a failed write to `path`
    pub fn write(path: PathBuf, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::PermissionDenied {
            StorageError::PermissionDenied { path, source }
        } else if is_disk_full(&source) {
            StorageError::DiskFull { path, source }
        } else {
            StorageError::Write { path, source }
        }
    }

    /// Wrap a failed read of `path`
    pub fn read(path: PathBuf, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::PermissionDenied {
            StorageError::PermissionDenied { path, source }
        } else {
            StorageError::Read { path, source }
        }
    }

    /// What the user can do about this error, if anything
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            StorageError::DiskFull { .. } => Some("Free up disk space and run the command again."),
            StorageError::PermissionDenied { .. } | StorageError::CreateDir { .. } => {
                Some("Make data_dir writable, or point it elsewhere with `shelf config set data_dir <path>`.")
            }
            StorageError::Corrupt { .. } => {
                Some("Defaults were used instead. Restore your data with `shelf import <backup>`.")
            }
            StorageError::Read { .. } | StorageError::Write { .. } | StorageError::Encode { .. } => {
                None
            }
        }
    }
}

fn is_disk_full(error: &io::Error) -> bool {
    if let Some(code) = error.raw_os_error() {
        return DISK_FULL_OS_CODES.contains(&code);
    }
    let msg = error.to_string().to_lowercase();
    msg.contains("no space left") || msg.contains("quota exceeded")
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;
