//! Working set of images and circular navigation over it

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Navigation precondition failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NavError {
    #[error("No images in the working set")]
    Empty,

    #[error("Image is not in the working set: {0}")]
    NotFound(PathBuf),
}

/// The images of the opened folder and the one on display.
///
/// The list is captured when a folder is opened and never re-scanned; it
/// only shrinks as images are moved out, or is replaced wholesale.
#[derive(Debug, Clone, Default)]
pub struct ImageNavigator {
    paths: Vec<PathBuf>,
    current: Option<PathBuf>,
}

impl ImageNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the working set and display its first image
    pub fn open(&mut self, paths: Vec<PathBuf>) -> Option<&Path> {
        self.current = paths.first().cloned();
        self.paths = paths;
        tracing::debug!("Working set replaced: {} images", self.paths.len());
        self.current()
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// The displayed image, `None` once the set is exhausted
    pub fn current(&self) -> Option<&Path> {
        self.current.as_deref()
    }

    fn position_of(&self, path: &Path) -> Result<usize, NavError> {
        if self.paths.is_empty() {
            return Err(NavError::Empty);
        }

        self.paths
            .iter()
            .position(|p| p == path)
            .ok_or_else(|| NavError::NotFound(path.to_path_buf()))
    }

    /// Index after `current_path`, wrapping to the start
    pub fn next_index(&self, current_path: &Path) -> Result<usize, NavError> {
        let position = self.position_of(current_path)?;
        Ok((position + 1) % self.paths.len())
    }

    /// Index before `current_path`, wrapping to the end
    pub fn previous_index(&self, current_path: &Path) -> Result<usize, NavError> {
        let position = self.position_of(current_path)?;
        let len = self.paths.len();
        Ok((position + len - 1) % len)
    }

    /// Display the next image. No-op without a displayed image.
    pub fn show_next(&mut self) -> Result<Option<&Path>, NavError> {
        self.step(Self::next_index)
    }

    /// Display the previous image. No-op without a displayed image.
    pub fn show_previous(&mut self) -> Result<Option<&Path>, NavError> {
        self.step(Self::previous_index)
    }

    fn step(
        &mut self,
        pick: fn(&Self, &Path) -> Result<usize, NavError>,
    ) -> Result<Option<&Path>, NavError> {
        let Some(current) = self.current.as_deref() else {
            return Ok(None);
        };

        let index = pick(self, current)?;
        self.current = Some(self.paths[index].clone());
        tracing::debug!("Showing {}/{}", index + 1, self.paths.len());
        Ok(self.current())
    }

    /// Drop `path` from the set and display what followed it.
    ///
    /// The successor is taken from the ordering before removal, wrapping to
    /// the first image; `None` when `path` was the last one left.
    pub fn remove_and_advance(&mut self, path: &Path) -> Result<Option<&Path>, NavError> {
        let position = self.position_of(path)?;
        let successor = self.paths[(position + 1) % self.paths.len()].clone();

        self.paths.remove(position);
        self.current = if self.paths.is_empty() { None } else { Some(successor) };

        tracing::debug!("Removed {} ({} left)", path.display(), self.paths.len());
        Ok(self.current())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nav(names: &[&str]) -> ImageNavigator {
        let mut nav = ImageNavigator::new();
        nav.open(names.iter().map(PathBuf::from).collect());
        nav
    }

    #[test]
    fn test_open_shows_first() {
        let mut n = ImageNavigator::new();
        assert_eq!(n.open(vec!["a.jpg".into(), "b.jpg".into()]), Some(Path::new("a.jpg")));

        assert_eq!(n.open(Vec::new()), None);
        assert!(n.is_empty());
        assert_eq!(n.current(), None);
    }

    #[test]
    fn test_next_and_previous_wrap() {
        let n = nav(&["a", "b", "c"]);
        assert_eq!(n.next_index(Path::new("a")).unwrap(), 1);
        assert_eq!(n.next_index(Path::new("c")).unwrap(), 0);
        assert_eq!(n.previous_index(Path::new("a")).unwrap(), 2);
        assert_eq!(n.previous_index(Path::new("b")).unwrap(), 0);
    }

    #[test]
    fn test_next_full_cycle_returns_to_start() {
        let n = nav(&["a", "b", "c", "d", "e"]);
        for start in n.paths().to_vec() {
            let mut at = start.clone();
            for _ in 0..n.len() {
                at = n.paths()[n.next_index(&at).unwrap()].clone();
            }
            assert_eq!(at, start);
        }
    }

    #[test]
    fn test_single_image() {
        let n = nav(&["only"]);
        assert_eq!(n.next_index(Path::new("only")).unwrap(), 0);
        assert_eq!(n.previous_index(Path::new("only")).unwrap(), 0);
    }

    #[test]
    fn test_preconditions() {
        let n = nav(&["a"]);
        assert_eq!(
            n.next_index(Path::new("zzz")),
            Err(NavError::NotFound(PathBuf::from("zzz")))
        );

        let empty = ImageNavigator::new();
        assert_eq!(empty.previous_index(Path::new("a")), Err(NavError::Empty));
    }

    #[test]
    fn test_show_next_and_previous() {
        let mut n = nav(&["a", "b"]);
        assert_eq!(n.show_next().unwrap(), Some(Path::new("b")));
        assert_eq!(n.show_next().unwrap(), Some(Path::new("a")));
        assert_eq!(n.show_previous().unwrap(), Some(Path::new("b")));

        let mut empty = ImageNavigator::new();
        assert_eq!(empty.show_next().unwrap(), None);
    }

    #[test]
    fn test_remove_and_advance_uses_old_order() {
        let mut n = nav(&["a", "b", "c"]);
        assert_eq!(n.remove_and_advance(Path::new("b")).unwrap(), Some(Path::new("c")));
        assert_eq!(n.paths(), &[PathBuf::from("a"), PathBuf::from("c")]);

        // last element wraps to the first survivor
        assert_eq!(n.remove_and_advance(Path::new("c")).unwrap(), Some(Path::new("a")));
        assert_eq!(n.remove_and_advance(Path::new("a")).unwrap(), None);
        assert!(n.is_empty());
        assert_eq!(n.current(), None);
    }

    #[test]
    fn test_remove_unknown_path_leaves_set() {
        let mut n = nav(&["a", "b"]);
        assert!(n.remove_and_advance(Path::new("x")).is_err());
        assert_eq!(n.len(), 2);
        assert_eq!(n.current(), Some(Path::new("a")));
    }
}
