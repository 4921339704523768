//! Routes the displayed image into a sibling folder
//!
//! Each route walks `DestinationEnsured -> Copied|Skipped`, and for Move
//! continues `-> Advanced -> Deleted`, where advancing drops the image from
//! the working set. A failure stops the walk where it happened; earlier
//! steps are not rolled back. The source is only deleted once the
//! destination file is known to exist.

use crate::binding::OperationMode;
use crate::navigation::ImageNavigator;
use crate::AppError;
use app_fs::{FileOpError, FileOperations};
use std::path::{Path, PathBuf};

/// Step reached by a route
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteStage {
    DestinationEnsured,
    Copied,
    Skipped,
    Advanced,
    Deleted,
}

/// Result of a completed route
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteOutcome {
    /// Full path of the routed file in its destination folder
    pub destination: PathBuf,
    pub mode: OperationMode,
    /// `false` when the destination already held a file of that name
    pub copied: bool,
    /// Image to display afterwards (Move only; unchanged for Copy)
    pub next_image: Option<PathBuf>,
    pub stage: RouteStage,
}

/// Executes routing decisions against the filesystem
pub struct FileOrganizer {
    files: Box<dyn FileOperations>,
    use_trash: bool,
}

impl FileOrganizer {
    pub fn new(files: Box<dyn FileOperations>, use_trash: bool) -> Self {
        Self { files, use_trash }
    }

    /// Directory a file named `subfolder` next to `image` resolves to
    pub fn destination_dir(image: &Path, subfolder: &str) -> PathBuf {
        image
            .parent()
            .unwrap_or_else(|| Path::new(""))
            .join(subfolder)
    }

    /// Copy `current` into its sibling folder `subfolder`; on Move, drop it
    /// from `images`, advance the display and delete the source.
    pub fn route(
        &self,
        images: &mut ImageNavigator,
        current: &Path,
        subfolder: &str,
        mode: OperationMode,
    ) -> Result<RouteOutcome, AppError> {
        app_fs::validate_folder_name(subfolder)?;

        let file_name = current.file_name().ok_or_else(|| AppError::Copy {
            from: current.to_path_buf(),
            to: PathBuf::from(subfolder),
            source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "path has no file name"),
        })?;

        let destination_dir = Self::destination_dir(current, subfolder);
        self.files
            .ensure_dir(&destination_dir)
            .map_err(|e| AppError::DirectoryCreate {
                path: destination_dir.clone(),
                source: e.into_io_error(),
            })?;
        tracing::debug!(stage = ?RouteStage::DestinationEnsured, "{}", destination_dir.display());

        let destination = destination_dir.join(file_name);
        let (copied, stage) = if self.files.is_file(&destination) {
            tracing::info!("Already organized, skipping copy: {}", destination.display());
            (false, RouteStage::Skipped)
        } else {
            self.files
                .copy_file(current, &destination)
                .map_err(|e| copy_error(current, &destination, e))?;
            (true, RouteStage::Copied)
        };

        if !mode.is_destructive() {
            tracing::info!("Copied {} -> {}", current.display(), destination.display());
            return Ok(RouteOutcome {
                destination,
                mode,
                copied,
                next_image: images.current().map(Path::to_path_buf),
                stage,
            });
        }

        tracing::debug!(?stage, "{}", destination.display());
        let next_image = images.remove_and_advance(current)?.map(Path::to_path_buf);
        tracing::debug!(stage = ?RouteStage::Advanced, "Next image: {:?}", next_image);

        self.files
            .delete_file(current, self.use_trash)
            .map_err(|e| AppError::Delete {
                path: current.to_path_buf(),
                source: e.into_io_error(),
            })?;

        tracing::info!("Moved {} -> {}", current.display(), destination.display());
        Ok(RouteOutcome {
            destination,
            mode,
            copied,
            next_image,
            stage: RouteStage::Deleted,
        })
    }
}

fn copy_error(from: &Path, to: &Path, e: FileOpError) -> AppError {
    AppError::Copy {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source: e.into_io_error(),
    }
}
