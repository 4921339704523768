//! ImageTriage file system layer
//!
//! Provides:
//! - Directory listing with image filtering and natural sort
//! - Blocking file primitives behind the `FileOperations` trait
//! - Destination folder name validation

mod browser;
mod file_operations;
mod sanitize;

pub use browser::{
    list_directory, list_file_paths, FileEntry, ListOptions, SortBy, SortOrder,
    DEFAULT_IMAGE_EXTENSIONS,
};
pub use file_operations::{DefaultFileOperations, FileOpError, FileOperations};
pub use sanitize::{is_valid_folder_name, validate_folder_name};

use thiserror::Error;

/// File system errors
#[derive(Error, Debug)]
pub enum FsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Path not found: {0}")]
    NotFound(String),

    #[error("Invalid path: {0}")]
    InvalidPath(String),
}

pub type Result<T> = std::result::Result<T, FsError>;
