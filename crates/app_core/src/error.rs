//! Application error types

use crate::navigation::NavError;
use std::path::PathBuf;
use thiserror::Error;

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    // ===== Caller contract violations (reported, never fatal) =====
    #[error("Binding index {index} out of range ({len} bindings)")]
    OutOfRange { index: usize, len: usize },

    #[error("Key not bound: {0}")]
    KeyNotBound(String),

    #[error("Binding limit reached ({0})")]
    RegistryFull(usize),

    #[error(transparent)]
    Navigation(#[from] NavError),

    // ===== Route failures (notify user, route abandoned in place) =====
    #[error("Invalid destination folder: {0}")]
    InvalidSubfolder(String),

    #[error("Cannot create directory {path}: {source}")]
    DirectoryCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot copy {from} to {to}: {source}")]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot delete {path}: {source}")]
    Delete {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ===== Environment =====
    #[error("Cannot open folder: {0}")]
    OpenFolder(String),

    #[error("Settings error: {0}")]
    Settings(String),
}

impl AppError {
    /// IO failures while routing; the user should be told and may retry
    pub fn is_io(&self) -> bool {
        matches!(
            self,
            AppError::DirectoryCreate { .. } | AppError::Copy { .. } | AppError::Delete { .. }
        )
    }

    /// Errors caused by the surrounding layer breaking a precondition
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            AppError::OutOfRange { .. } | AppError::KeyNotBound(_) | AppError::Navigation(_)
        )
    }

    /// Get a user-friendly message
    pub fn user_message(&self) -> String {
        match self {
            AppError::DirectoryCreate { path, .. } => {
                format!("Could not create folder {}", path.display())
            }
            AppError::Copy { from, .. } => format!("Could not copy {}", display_name(from)),
            AppError::Delete { path, .. } => format!(
                "{} was copied but could not be removed from its folder",
                display_name(path)
            ),
            AppError::InvalidSubfolder(name) => format!("Invalid destination folder: {}", name),
            AppError::Settings(msg) => format!("Bindings were not saved: {}", msg),
            _ => self.to_string(),
        }
    }
}

fn display_name(path: &std::path::Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

impl From<app_fs::FsError> for AppError {
    fn from(e: app_fs::FsError) -> Self {
        match e {
            app_fs::FsError::InvalidPath(msg) => AppError::InvalidSubfolder(msg),
            other => AppError::OpenFolder(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        let io = AppError::Delete {
            path: PathBuf::from("/photos/img1.jpg"),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        };
        assert!(io.is_io());
        assert!(!io.is_contract_violation());

        let logic = AppError::OutOfRange { index: 3, len: 2 };
        assert!(logic.is_contract_violation());
        assert!(!logic.is_io());
    }

    #[test]
    fn test_user_message_uses_file_name() {
        let err = AppError::Copy {
            from: PathBuf::from("/photos/img1.jpg"),
            to: PathBuf::from("/photos/cats/img1.jpg"),
            source: std::io::Error::from(std::io::ErrorKind::Other),
        };
        assert_eq!(err.user_message(), "Could not copy img1.jpg");
    }

    #[test]
    fn test_fs_error_mapping() {
        let err: AppError = app_fs::FsError::NotFound("/nowhere".into()).into();
        assert!(matches!(err, AppError::OpenFolder(_)));
    }
}
