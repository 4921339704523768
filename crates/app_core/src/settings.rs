//! Binding persistence
//!
//! The session writes the full binding list through a [`SettingsBridge`]
//! after every edit. A missing or unreadable store loads as an empty list.

use crate::binding::Binding;
use crate::AppError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Load/save contract for the binding list
pub trait SettingsBridge {
    /// Saved bindings in saved order; empty when nothing usable is stored
    fn load(&self) -> Vec<Binding>;

    fn save(&mut self, bindings: &[Binding]) -> Result<(), AppError>;
}

/// On-disk layout of `bindings.toml`
#[derive(Debug, Default, Serialize, Deserialize)]
struct BindingsFile {
    #[serde(default)]
    bindings: Vec<Binding>,
}

/// Bindings stored as a TOML file
#[derive(Debug, Clone)]
pub struct TomlSettingsStore {
    path: PathBuf,
}

impl TomlSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<Vec<Binding>, AppError> {
        let content = std::fs::read_to_string(&self.path)
            .map_err(|e| AppError::Settings(format!("{}: {}", self.path.display(), e)))?;
        let file: BindingsFile = toml::from_str(&content)
            .map_err(|e| AppError::Settings(format!("{}: {}", self.path.display(), e)))?;
        Ok(file.bindings)
    }
}

impl SettingsBridge for TomlSettingsStore {
    fn load(&self) -> Vec<Binding> {
        if !self.path.exists() {
            tracing::info!("No saved bindings at {:?}", self.path);
            return Vec::new();
        }

        match self.read() {
            Ok(bindings) => {
                tracing::info!("Loaded {} bindings from {:?}", bindings.len(), self.path);
                bindings
            }
            Err(e) => {
                tracing::warn!("Ignoring unreadable bindings file: {}", e);
                Vec::new()
            }
        }
    }

    fn save(&mut self, bindings: &[Binding]) -> Result<(), AppError> {
        let to_settings = |e: &dyn std::fmt::Display| {
            AppError::Settings(format!("{}: {}", self.path.display(), e))
        };

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| to_settings(&e))?;
        }

        let file = BindingsFile {
            bindings: bindings.to_vec(),
        };
        let content = toml::to_string_pretty(&file).map_err(|e| to_settings(&e))?;

        // Write then rename so a crash never leaves a truncated file behind
        let tmp = self.path.with_extension("toml.tmp");
        std::fs::write(&tmp, content).map_err(|e| to_settings(&e))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| to_settings(&e))?;

        tracing::debug!("Saved {} bindings to {:?}", bindings.len(), self.path);
        Ok(())
    }
}

/// In-process store for embedding and tests
#[derive(Debug, Clone, Default)]
pub struct MemorySettingsStore {
    bindings: Vec<Binding>,
}

impl MemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bindings(bindings: Vec<Binding>) -> Self {
        Self { bindings }
    }
}

impl SettingsBridge for MemorySettingsStore {
    fn load(&self) -> Vec<Binding> {
        self.bindings.clone()
    }

    fn save(&mut self, bindings: &[Binding]) -> Result<(), AppError> {
        self.bindings = bindings.to_vec();
        Ok(())
    }
}
