//! Destination folder name validation

use crate::{FsError, Result};

/// Windows reserved device names
#[cfg_attr(not(windows), allow(dead_code))]
const RESERVED_NAMES: &[&str] = &[
    "CON", "PRN", "AUX", "NUL",
    "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8", "COM9",
    "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

/// Characters Windows refuses in a path component
#[cfg_attr(not(windows), allow(dead_code))]
const WINDOWS_FORBIDDEN: &[char] = &[':', '*', '?', '"', '<', '>', '|'];

/// Check that `name` is a single, non-empty path component.
///
/// A destination must stay a direct child of the image's folder: separators,
/// `.` and `..` are rejected on every platform, Windows-specific rules only
/// on Windows.
pub fn validate_folder_name(name: &str) -> Result<()> {
    let invalid = |reason: &str| Err(FsError::InvalidPath(format!("{:?}: {}", name, reason)));

    if name.trim().is_empty() {
        return invalid("folder name is empty");
    }

    if name == "." || name == ".." {
        return invalid("relative folder names are not allowed");
    }

    if name.contains('/') || name.contains('\\') {
        return invalid("folder name must not contain path separators");
    }

    if name.chars().any(|c| c.is_control()) {
        return invalid("folder name contains control characters");
    }

    #[cfg(windows)]
    {
        if name.chars().any(|c| WINDOWS_FORBIDDEN.contains(&c)) {
            return invalid("folder name contains a reserved character");
        }

        let upper = name.to_uppercase();
        let base = upper.split('.').next().unwrap_or("");
        if RESERVED_NAMES.contains(&base) {
            return invalid("folder name is a reserved device name");
        }

        if name.ends_with('.') || name.ends_with(' ') {
            return invalid("folder name ends with a dot or space");
        }
    }

    Ok(())
}

/// Convenience predicate over [`validate_folder_name`]
pub fn is_valid_folder_name(name: &str) -> bool {
    validate_folder_name(name).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_names() {
        assert!(is_valid_folder_name("cats"));
        assert!(is_valid_folder_name("best shots 2026"));
        assert!(is_valid_folder_name(".hidden"));
    }

    #[test]
    fn test_empty_rejected() {
        assert!(!is_valid_folder_name(""));
        assert!(!is_valid_folder_name("   "));
    }

    #[test]
    fn test_traversal_rejected() {
        assert!(!is_valid_folder_name("."));
        assert!(!is_valid_folder_name(".."));
        assert!(!is_valid_folder_name("a/b"));
        assert!(!is_valid_folder_name("..\\up"));
    }

    #[test]
    fn test_control_chars_rejected() {
        assert!(!is_valid_folder_name("tab\there"));
    }

    #[test]
    fn test_error_names_input() {
        let err = validate_folder_name("a/b").unwrap_err();
        assert!(err.to_string().contains("a/b"));
    }

    #[cfg(windows)]
    #[test]
    fn test_windows_rules() {
        assert!(!is_valid_folder_name("CON"));
        assert!(!is_valid_folder_name("what?"));
        assert!(!is_valid_folder_name("trailing."));
    }
}
