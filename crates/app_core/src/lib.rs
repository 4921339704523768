//! ImageTriage core domain logic
//!
//! This crate contains:
//! - Key binding registry
//! - Image working set and navigation
//! - File organizer (copy/move routing)
//! - Binding persistence
//! - Configuration
//! - Error types
//! - The session that ties them together

pub mod binding;
pub mod command;
pub mod config;
pub mod error;
pub mod navigation;
pub mod organizer;
pub mod settings;
pub mod state;

pub use binding::{BindKey, Binding, BindingRegistry, OperationMode, DEFAULT_MAX_BINDINGS};
pub use command::{Command, CommandId, KeyMap};
pub use config::{AppConfig, BindingsConfig, FilerConfig, NavigationConfig};
pub use error::AppError;
pub use navigation::{ImageNavigator, NavError};
pub use organizer::{FileOrganizer, RouteOutcome, RouteStage};
pub use settings::{MemorySettingsStore, SettingsBridge, TomlSettingsStore};
pub use state::{KeyOutcome, Session};
