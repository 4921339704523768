//! Application configuration

use crate::binding::DEFAULT_MAX_BINDINGS;
use app_fs::{ListOptions, SortBy, SortOrder, DEFAULT_IMAGE_EXTENSIONS};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub bindings: BindingsConfig,
    pub filer: FilerConfig,
    pub navigation: NavigationConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BindingsConfig {
    /// Upper bound on live bindings; adding past it does nothing
    pub max_bindings: usize,
    /// Typing a one-character folder name on an unkeyed binding also binds that key
    pub auto_assign_from_subfolder: bool,
}

impl Default for BindingsConfig {
    fn default() -> Self {
        Self {
            max_bindings: DEFAULT_MAX_BINDINGS,
            auto_assign_from_subfolder: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilerConfig {
    pub show_hidden_files: bool,
    /// Send moved sources to the recycle bin instead of unlinking them
    pub use_recycle_bin: bool,
    pub image_extensions: Vec<String>,
    pub sort_by: SortBy,
    pub sort_order: SortOrder,
}

impl Default for FilerConfig {
    fn default() -> Self {
        Self {
            show_hidden_files: false,
            use_recycle_bin: false,
            image_extensions: DEFAULT_IMAGE_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            sort_by: SortBy::Name,
            sort_order: SortOrder::Ascending,
        }
    }
}

impl FilerConfig {
    /// Listing options used when a folder is opened
    pub fn list_options(&self) -> ListOptions {
        ListOptions {
            show_hidden: self.show_hidden_files,
            sort_by: self.sort_by,
            sort_order: self.sort_order,
            ..ListOptions::images(&self.image_extensions)
        }
    }
}

/// Keys that browse instead of route; checked before bindings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    pub next_keys: Vec<String>,
    pub prev_keys: Vec<String>,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            next_keys: vec!["Right".into(), "Space".into()],
            prev_keys: vec!["Left".into(), "Backspace".into()],
        }
    }
}

impl AppConfig {
    /// Load configuration from the platform config directory
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from `config_path`, defaults if it does not exist
    pub fn load_from(config_path: &Path) -> anyhow::Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            let config: Self = toml::from_str(&content)?;
            tracing::info!("Configuration loaded from {:?}", config_path);
            Ok(config)
        } else {
            tracing::info!("Using default configuration");
            Ok(Self::default())
        }
    }

    /// Save configuration to the platform config directory
    pub fn save(&self) -> anyhow::Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, config_path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;

        tracing::info!("Configuration saved to {:?}", config_path);
        Ok(())
    }

    pub fn config_dir() -> PathBuf {
        ProjectDirs::from("com", "ImageTriage", "ImageTriage")
            .map(|dirs| dirs.config_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Get the configuration file path
    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Where the binding list is persisted
    pub fn bindings_path() -> PathBuf {
        Self::config_dir().join("bindings.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.bindings.max_bindings, 8);
        assert!(!config.filer.use_recycle_bin);
        assert!(config.filer.image_extensions.contains(&"jpg".to_string()));
        assert_eq!(config.navigation.next_keys, vec!["Right", "Space"]);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [bindings]
            max_bindings = 4

            [filer]
            sort_order = "desc"
            "#,
        )
        .unwrap();

        assert_eq!(config.bindings.max_bindings, 4);
        assert!(!config.bindings.auto_assign_from_subfolder);
        assert_eq!(config.filer.sort_order, SortOrder::Descending);
        assert_eq!(config.filer.sort_by, SortBy::Name);
        assert_eq!(config.navigation, NavigationConfig::default());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = AppConfig::default();
        config.filer.use_recycle_bin = true;
        config.navigation.next_keys = vec!["N".into()];
        config.save_to(&path).unwrap();

        assert_eq!(AppConfig::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = TempDir::new().unwrap();
        let config = AppConfig::load_from(&dir.path().join("none.toml")).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_list_options_follow_filer() {
        let filer = FilerConfig {
            show_hidden_files: true,
            image_extensions: vec!["PNG".into()],
            ..FilerConfig::default()
        };
        let options = filer.list_options();
        assert!(options.show_hidden);
        assert!(!options.show_directories);
        assert_eq!(options.filter_extensions, Some(vec!["png".to_string()]));
    }
}
