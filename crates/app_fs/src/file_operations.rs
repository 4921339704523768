//! File operations module
//! Blocking primitives used when routing an image: ensure a directory,
//! copy a file, delete a file (permanently or to the trash).

use std::path::{Path, PathBuf};
use thiserror::Error;

/// File operation errors
#[derive(Debug, Error)]
pub enum FileOpError {
    #[error("Cannot create directory {path}: {source}")]
    CreateDir {
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

    #[error("Trash error for {path}: {message}")]
    Trash { path: PathBuf, message: String },

    #[error("File not found: {0}")]
    NotFound(PathBuf),

    #[error("File already exists: {0}")]
    AlreadyExists(PathBuf),
}

pub type Result<T> = std::result::Result<T, FileOpError>;

impl FileOpError {
    /// Collapse into the underlying OS error, keeping the kind where one exists
    pub fn into_io_error(self) -> std::io::Error {
        use std::io::{Error, ErrorKind};

        match self {
            FileOpError::CreateDir { source, .. }
            | FileOpError::Copy { source, .. }
            | FileOpError::Delete { source, .. } => source,
            FileOpError::Trash { path, message } => {
                Error::other(format!("{}: {}", path.display(), message))
            }
            FileOpError::NotFound(path) => {
                Error::new(ErrorKind::NotFound, format!("not found: {}", path.display()))
            }
            FileOpError::AlreadyExists(path) => {
                Error::new(ErrorKind::AlreadyExists, format!("already exists: {}", path.display()))
            }
        }
    }
}

/// Filesystem primitives the organizer drives.
///
/// Implementations must never overwrite an existing file in `copy_file`.
pub trait FileOperations {
    /// Whether a regular file exists at `path`; directories do not count
    fn is_file(&self, path: &Path) -> bool;

    /// Create `path` (and parents) if missing. Returns `true` if it was created.
    fn ensure_dir(&self, path: &Path) -> Result<bool>;

    /// Copy the file `from` to the full target path `to`
    fn copy_file(&self, from: &Path, to: &Path) -> Result<()>;

    /// Delete a single file, to the recycle bin if `use_trash` is set
    fn delete_file(&self, path: &Path, use_trash: bool) -> Result<()>;
}

/// Default implementation on top of `std::fs`
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultFileOperations;

impl DefaultFileOperations {
    pub fn new() -> Self {
        Self
    }
}

impl FileOperations for DefaultFileOperations {
    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn ensure_dir(&self, path: &Path) -> Result<bool> {
        if path.is_dir() {
            return Ok(false);
        }

        std::fs::create_dir_all(path).map_err(|source| FileOpError::CreateDir {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!("Created directory: {}", path.display());

        Ok(true)
    }

    fn copy_file(&self, from: &Path, to: &Path) -> Result<()> {
        if !from.is_file() {
            return Err(FileOpError::NotFound(from.to_path_buf()));
        }

        if to.exists() {
            return Err(FileOpError::AlreadyExists(to.to_path_buf()));
        }

        let copy_err = |source| FileOpError::Copy {
            from: from.to_path_buf(),
            to: to.to_path_buf(),
            source,
        };

        // create_new guards against a file appearing between the check and the write
        let mut reader = std::fs::File::open(from).map_err(copy_err)?;
        let mut writer = std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(to)
            .map_err(copy_err)?;

        if let Err(source) = std::io::copy(&mut reader, &mut writer) {
            drop(writer);
            let _ = std::fs::remove_file(to);
            return Err(copy_err(source));
        }

        if let Ok(meta) = std::fs::metadata(from) {
            if let Err(e) = std::fs::set_permissions(to, meta.permissions()) {
                tracing::debug!("Could not copy permissions to {}: {}", to.display(), e);
            }
        }

        tracing::info!("Copied: {} -> {}", from.display(), to.display());
        Ok(())
    }

    fn delete_file(&self, path: &Path, use_trash: bool) -> Result<()> {
        if !path.exists() {
            return Err(FileOpError::NotFound(path.to_path_buf()));
        }

        if use_trash {
            return move_to_trash(path);
        }

        std::fs::remove_file(path).map_err(|source| FileOpError::Delete {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!("Deleted: {}", path.display());

        Ok(())
    }
}

#[cfg(feature = "trash-support")]
fn move_to_trash(path: &Path) -> Result<()> {
    trash::delete(path).map_err(|e| FileOpError::Trash {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    tracing::info!("Moved to trash: {}", path.display());
    Ok(())
}

#[cfg(not(feature = "trash-support"))]
fn move_to_trash(path: &Path) -> Result<()> {
    tracing::warn!("Trash support not compiled in, deleting permanently: {}", path.display());
    std::fs::remove_file(path).map_err(|source| FileOpError::Delete {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_ensure_dir_is_idempotent() {
        let ops = DefaultFileOperations::new();
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("cats");

        assert!(ops.ensure_dir(&target).unwrap());
        assert!(target.is_dir());
        assert!(!ops.ensure_dir(&target).unwrap());
    }

    #[test]
    fn test_ensure_dir_over_file_fails() {
        let ops = DefaultFileOperations::new();
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("cats");
        fs::write(&blocker, b"not a dir").unwrap();

        let err = ops.ensure_dir(&blocker).unwrap_err();
        assert!(matches!(err, FileOpError::CreateDir { .. }));
    }

    #[test]
    fn test_copy_file() {
        let ops = DefaultFileOperations::new();
        let dir = TempDir::new().unwrap();
        let from = dir.path().join("img1.jpg");
        let to = dir.path().join("img1-copy.jpg");
        fs::write(&from, b"pixels").unwrap();

        ops.copy_file(&from, &to).unwrap();

        assert_eq!(fs::read(&to).unwrap(), b"pixels");
        assert!(from.exists());
    }

    #[test]
    fn test_copy_never_overwrites() {
        let ops = DefaultFileOperations::new();
        let dir = TempDir::new().unwrap();
        let from = dir.path().join("a.jpg");
        let to = dir.path().join("b.jpg");
        fs::write(&from, b"new").unwrap();
        fs::write(&to, b"old").unwrap();

        let err = ops.copy_file(&from, &to).unwrap_err();
        assert!(matches!(err, FileOpError::AlreadyExists(_)));
        assert_eq!(fs::read(&to).unwrap(), b"old");
    }

    #[test]
    fn test_directory_is_not_a_file() {
        let ops = DefaultFileOperations::new();
        let dir = TempDir::new().unwrap();
        let from = dir.path().join("img1.jpg");
        let blocker = dir.path().join("cats").join("img1.jpg");
        fs::write(&from, b"pixels").unwrap();
        fs::create_dir_all(&blocker).unwrap();

        assert!(ops.is_file(&from));
        assert!(!ops.is_file(&blocker));

        let err = ops.copy_file(&from, &blocker).unwrap_err();
        assert!(matches!(err, FileOpError::AlreadyExists(_)));
        assert!(blocker.is_dir());
    }

    #[test]
    fn test_copy_missing_source() {
        let ops = DefaultFileOperations::new();
        let dir = TempDir::new().unwrap();

        let err = ops
            .copy_file(&dir.path().join("gone.jpg"), &dir.path().join("x.jpg"))
            .unwrap_err();
        assert!(matches!(err, FileOpError::NotFound(_)));
        assert_eq!(err.into_io_error().kind(), std::io::ErrorKind::NotFound);
    }

    #[test]
    fn test_delete_file() {
        let ops = DefaultFileOperations::new();
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("img1.jpg");
        fs::write(&path, b"x").unwrap();

        ops.delete_file(&path, false).unwrap();
        assert!(!path.exists());

        let err = ops.delete_file(&path, false).unwrap_err();
        assert!(matches!(err, FileOpError::NotFound(_)));
    }
}
