//! Directory listing for opening a folder of images

use crate::{FsError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default image extensions recognised when opening a folder
pub const DEFAULT_IMAGE_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "webp", "bmp", "ico", "tiff", "tif",
];

/// File entry with metadata
#[derive(Debug, Clone)]
pub struct FileEntry {
    pub path: PathBuf,
    pub name: String,
    pub is_dir: bool,
    pub is_hidden: bool,
    pub size: u64,
    pub modified: Option<i64>,
    pub extension: String,
}

impl FileEntry {
    /// Create a new file entry from path
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let metadata = fs::metadata(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        let modified = metadata
            .modified()
            .ok()
            .and_then(|t| t.duration_since(std::time::UNIX_EPOCH).ok())
            .map(|d| d.as_secs() as i64);

        let is_hidden = is_hidden_file(path, &name);

        Ok(Self {
            path: path.to_path_buf(),
            name,
            is_dir: metadata.is_dir(),
            is_hidden,
            size: metadata.len(),
            modified,
            extension,
        })
    }
}

/// Sort key for file listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortBy {
    #[serde(rename = "name")]
    Name,
    #[serde(rename = "size")]
    Size,
    #[serde(rename = "modified")]
    Modified,
    #[serde(rename = "extension")]
    Extension,
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    #[serde(rename = "asc")]
    Ascending,
    #[serde(rename = "desc")]
    Descending,
}

/// Options for listing directory contents
#[derive(Debug, Clone)]
pub struct ListOptions {
    pub show_hidden: bool,
    pub show_directories: bool,
    pub sort_by: SortBy,
    pub sort_order: SortOrder,
    /// Lowercase extensions without the dot; `None` keeps every file
    pub filter_extensions: Option<Vec<String>>,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            show_hidden: false,
            show_directories: true,
            sort_by: SortBy::Name,
            sort_order: SortOrder::Ascending,
            filter_extensions: None,
        }
    }
}

impl ListOptions {
    /// Plain files with one of `extensions`, no directories
    pub fn images<S: AsRef<str>>(extensions: &[S]) -> Self {
        Self {
            show_directories: false,
            filter_extensions: Some(
                extensions
                    .iter()
                    .map(|e| e.as_ref().trim_start_matches('.').to_lowercase())
                    .collect(),
            ),
            ..Default::default()
        }
    }
}

/// List directory contents (non-recursive)
pub fn list_directory<P: AsRef<Path>>(path: P, options: &ListOptions) -> Result<Vec<FileEntry>> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(FsError::NotFound(path.display().to_string()));
    }

    if !path.is_dir() {
        return Err(FsError::InvalidPath(format!("Not a directory: {}", path.display())));
    }

    let mut entries = Vec::new();

    for entry in fs::read_dir(path)? {
        let entry = entry?;
        let file_entry = match FileEntry::from_path(entry.path()) {
            Ok(e) => e,
            Err(_) => continue, // Skip entries we can't read
        };

        if !options.show_hidden && file_entry.is_hidden {
            continue;
        }

        if !options.show_directories && file_entry.is_dir {
            continue;
        }

        if let Some(ref exts) = options.filter_extensions {
            if !file_entry.is_dir && !exts.contains(&file_entry.extension) {
                continue;
            }
        }

        entries.push(file_entry);
    }

    sort_entries(&mut entries, options.sort_by, options.sort_order);

    tracing::debug!("Listed {} entries in {}", entries.len(), path.display());
    Ok(entries)
}

/// Ordered paths of the files `list_directory` yields
pub fn list_file_paths<P: AsRef<Path>>(path: P, options: &ListOptions) -> Result<Vec<PathBuf>> {
    Ok(list_directory(path, options)?
        .into_iter()
        .filter(|e| !e.is_dir)
        .map(|e| e.path)
        .collect())
}

fn sort_entries(entries: &mut [FileEntry], sort_by: SortBy, order: SortOrder) {
    entries.sort_by(|a, b| {
        // Directories always come first
        if a.is_dir != b.is_dir {
            return if a.is_dir {
                std::cmp::Ordering::Less
            } else {
                std::cmp::Ordering::Greater
            };
        }

        let by_name = || natural_sort_key(&a.name).cmp(&natural_sort_key(&b.name));
        let cmp = match sort_by {
            SortBy::Name => by_name(),
            SortBy::Size => a.size.cmp(&b.size).then_with(by_name),
            SortBy::Modified => a.modified.cmp(&b.modified).then_with(by_name),
            SortBy::Extension => a.extension.cmp(&b.extension).then_with(by_name),
        };

        match order {
            SortOrder::Ascending => cmp,
            SortOrder::Descending => cmp.reverse(),
        }
    });
}

/// Generate a natural sort key (handles numbers correctly)
/// "image2.jpg" < "image10.jpg"
fn natural_sort_key(s: &str) -> Vec<NaturalSortPart> {
    let mut parts = Vec::new();
    let mut current_num = String::new();
    let mut current_str = String::new();

    for c in s.chars() {
        if c.is_ascii_digit() {
            if !current_str.is_empty() {
                parts.push(NaturalSortPart::Str(current_str.to_lowercase()));
                current_str.clear();
            }
            current_num.push(c);
        } else {
            if !current_num.is_empty() {
                if let Ok(n) = current_num.parse::<u64>() {
                    parts.push(NaturalSortPart::Num(n));
                }
                current_num.clear();
            }
            current_str.push(c);
        }
    }

    if !current_num.is_empty() {
        if let Ok(n) = current_num.parse::<u64>() {
            parts.push(NaturalSortPart::Num(n));
        }
    }
    if !current_str.is_empty() {
        parts.push(NaturalSortPart::Str(current_str.to_lowercase()));
    }

    parts
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum NaturalSortPart {
    Num(u64),
    Str(String),
}

#[cfg(windows)]
fn is_hidden_file(path: &Path, _name: &str) -> bool {
    use std::os::windows::fs::MetadataExt;

    const FILE_ATTRIBUTE_HIDDEN: u32 = 0x2;

    fs::metadata(path)
        .map(|m| m.file_attributes() & FILE_ATTRIBUTE_HIDDEN != 0)
        .unwrap_or(false)
}

#[cfg(not(windows))]
fn is_hidden_file(_path: &Path, name: &str) -> bool {
    name.starts_with('.')
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), b"x").unwrap();
    }

    #[test]
    fn test_natural_sort() {
        let mut names = vec!["image10.jpg", "image2.jpg", "image1.jpg", "image20.jpg"];
        names.sort_by(|a, b| natural_sort_key(a).cmp(&natural_sort_key(b)));
        assert_eq!(names, vec!["image1.jpg", "image2.jpg", "image10.jpg", "image20.jpg"]);
    }

    #[test]
    fn test_images_only_listing() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "b10.JPG");
        touch(dir.path(), "b2.png");
        touch(dir.path(), "notes.txt");
        touch(dir.path(), ".secret.jpg");
        fs::create_dir(dir.path().join("sub.jpg")).unwrap();

        let paths = list_file_paths(dir.path(), &ListOptions::images(DEFAULT_IMAGE_EXTENSIONS)).unwrap();
        let names: Vec<_> = paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();

        assert_eq!(names, vec!["b2.png", "b10.JPG"]);
    }

    #[test]
    fn test_extension_filter_accepts_dotted_input() {
        let options = ListOptions::images(&[".JPG", "png"]);
        assert_eq!(
            options.filter_extensions,
            Some(vec!["jpg".to_string(), "png".to_string()])
        );
    }

    #[test]
    fn test_missing_directory() {
        let dir = TempDir::new().unwrap();
        let err = list_directory(dir.path().join("missing"), &ListOptions::default()).unwrap_err();
        assert!(matches!(err, FsError::NotFound(_)));
    }

    #[test]
    fn test_descending_order() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "a.jpg");
        touch(dir.path(), "c.jpg");
        touch(dir.path(), "b.jpg");

        let options = ListOptions {
            sort_order: SortOrder::Descending,
            ..ListOptions::images(DEFAULT_IMAGE_EXTENSIONS)
        };
        let paths = list_file_paths(dir.path(), &options).unwrap();
        assert_eq!(paths[0].file_name().unwrap(), "c.jpg");
        assert_eq!(paths[2].file_name().unwrap(), "a.jpg");
    }
}
