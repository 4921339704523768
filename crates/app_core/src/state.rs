//! Triage session: the single owner of bindings, working set and IO
//!
//! Every `on_*` handler runs to completion before the next event. Editing
//! handlers write the binding list through the settings bridge before they
//! return.

use crate::binding::{Binding, BindingRegistry, OperationMode};
use crate::command::{Command, KeyMap};
use crate::config::AppConfig;
use crate::navigation::ImageNavigator;
use crate::organizer::{FileOrganizer, RouteOutcome};
use crate::settings::{SettingsBridge, TomlSettingsStore};
use crate::AppError;
use app_fs::{DefaultFileOperations, FileOperations};
use std::path::{Path, PathBuf};

/// What a key press did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    /// No image on display, or the key means nothing
    Ignored,
    /// Browsed to another image
    Navigated(Option<PathBuf>),
    Routed(RouteOutcome),
}

pub struct Session {
    config: AppConfig,
    registry: BindingRegistry,
    images: ImageNavigator,
    organizer: FileOrganizer,
    keymap: KeyMap,
    settings: Box<dyn SettingsBridge>,
}

impl Session {
    /// Build a session and restore bindings from `settings`
    pub fn new(
        config: AppConfig,
        settings: Box<dyn SettingsBridge>,
        files: Box<dyn FileOperations>,
    ) -> Self {
        let registry = BindingRegistry::from_bindings(settings.load(), config.bindings.max_bindings);
        let organizer = FileOrganizer::new(files, config.filer.use_recycle_bin);
        let keymap = KeyMap::new(&config.navigation);

        tracing::info!("Session started with {} bindings", registry.len());

        Self {
            config,
            registry,
            images: ImageNavigator::new(),
            organizer,
            keymap,
            settings,
        }
    }

    /// Session on the real filesystem, bindings in the platform config dir
    pub fn with_defaults(config: AppConfig) -> Self {
        Self::new(
            config,
            Box::new(TomlSettingsStore::new(AppConfig::bindings_path())),
            Box::new(DefaultFileOperations::new()),
        )
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn bindings(&self) -> &[Binding] {
        self.registry.bindings()
    }

    pub fn registry(&self) -> &BindingRegistry {
        &self.registry
    }

    pub fn images(&self) -> &ImageNavigator {
        &self.images
    }

    pub fn current_image(&self) -> Option<&Path> {
        self.images.current()
    }

    pub fn settings(&self) -> &dyn SettingsBridge {
        self.settings.as_ref()
    }

    /// Browse or route the displayed image
    pub fn on_key_pressed(&mut self, key: &str) -> Result<KeyOutcome, AppError> {
        let Some(current) = self.images.current().map(Path::to_path_buf) else {
            return Ok(KeyOutcome::Ignored);
        };

        let Some(command) = self.keymap.resolve(key, &self.registry) else {
            return Ok(KeyOutcome::Ignored);
        };
        tracing::debug!("{} -> {}", key, command.id());

        match command {
            Command::NextImage => {
                let shown = self.images.show_next()?.map(Path::to_path_buf);
                Ok(KeyOutcome::Navigated(shown))
            }
            Command::PreviousImage => {
                let shown = self.images.show_previous()?.map(Path::to_path_buf);
                Ok(KeyOutcome::Navigated(shown))
            }
            Command::Route(bind_key) => {
                let (subfolder, mode) = self.registry.resolve_key(bind_key.as_str())?;
                let outcome = self
                    .organizer
                    .route(&mut self.images, &current, subfolder, mode)?;
                Ok(KeyOutcome::Routed(outcome))
            }
        }
    }

    /// Add an empty binding. `None` once the limit is reached.
    pub fn on_add_binding(&mut self) -> Result<Option<usize>, AppError> {
        match self.registry.add_binding() {
            Ok(index) => {
                self.persist()?;
                Ok(Some(index))
            }
            Err(AppError::RegistryFull(max)) => {
                tracing::debug!("Binding limit of {} reached, not adding", max);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    pub fn on_remove_binding(&mut self, index: usize) -> Result<(), AppError> {
        self.registry.remove_binding(index)?;
        self.persist()
    }

    /// Returns whether the key was taken. Navigation keys are refused since
    /// they would never reach the binding.
    pub fn on_assign_key(&mut self, index: usize, key: &str) -> Result<bool, AppError> {
        self.registry.get(index)?;
        if self.keymap.is_navigation_key(key) {
            tracing::warn!("{} is a navigation key, not binding it to {}", key, index);
            return Ok(false);
        }

        let assigned = self.registry.assign_key(index, key)?;
        self.persist()?;
        Ok(assigned)
    }

    pub fn on_clear_key(&mut self, index: usize) -> Result<(), AppError> {
        self.registry.clear_key(index)?;
        self.persist()
    }

    pub fn on_subfolder_edited(&mut self, index: usize, text: &str) -> Result<(), AppError> {
        self.registry.set_subfolder(index, text)?;

        if self.config.bindings.auto_assign_from_subfolder
            && text.chars().count() == 1
            && !self.keymap.is_navigation_key(text)
            && self.registry.get(index)?.key.is_none()
        {
            self.registry.assign_key(index, text)?;
        }

        self.persist()
    }

    pub fn on_mode_changed(&mut self, index: usize, mode: OperationMode) -> Result<(), AppError> {
        self.registry.set_mode(index, mode)?;
        self.persist()
    }

    /// Replace the working set with the images in `path`
    pub fn on_open_folder(&mut self, path: &Path) -> Result<&[PathBuf], AppError> {
        let paths = app_fs::list_file_paths(path, &self.config.filer.list_options())?;
        tracing::info!("Opened {} ({} images)", path.display(), paths.len());

        self.images.open(paths);
        Ok(self.images.paths())
    }

    fn persist(&mut self) -> Result<(), AppError> {
        self.settings.save(self.registry.bindings()).map_err(|e| {
            tracing::warn!("Failed to save bindings: {}", e);
            e
        })
    }
}
