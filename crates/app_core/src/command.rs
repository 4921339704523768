//! Key press -> command resolution

use crate::binding::{BindKey, BindingRegistry};
use crate::config::NavigationConfig;
use std::collections::HashMap;

/// Command identifier strings, used in logs and by hosts
pub struct CommandId;

impl CommandId {
    pub const NAV_NEXT_ITEM: &'static str = "nav.next_item";
    pub const NAV_PREV_ITEM: &'static str = "nav.prev_item";
    pub const FILE_ROUTE: &'static str = "file.route";
}

/// What a key press asks the session to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    NextImage,
    PreviousImage,
    /// Route the displayed image through the binding holding this key
    Route(BindKey),
}

impl Command {
    pub fn id(&self) -> &'static str {
        match self {
            Command::NextImage => CommandId::NAV_NEXT_ITEM,
            Command::PreviousImage => CommandId::NAV_PREV_ITEM,
            Command::Route(_) => CommandId::FILE_ROUTE,
        }
    }
}

/// Navigation keys; everything else is looked up in the binding registry
#[derive(Debug, Clone)]
pub struct KeyMap {
    /// lowercase key name -> navigation command
    navigation: HashMap<String, Command>,
}

impl KeyMap {
    pub fn new(config: &NavigationConfig) -> Self {
        let mut navigation = HashMap::new();

        for key in &config.next_keys {
            navigation.insert(key.trim().to_lowercase(), Command::NextImage);
        }
        for key in &config.prev_keys {
            // first writer wins when a key is listed both ways
            navigation
                .entry(key.trim().to_lowercase())
                .or_insert(Command::PreviousImage);
        }

        Self { navigation }
    }

    pub fn is_navigation_key(&self, key: &str) -> bool {
        self.navigation.contains_key(&key.trim().to_lowercase())
    }

    /// Navigation keys shadow bindings; unbound keys resolve to nothing
    pub fn resolve(&self, key: &str, registry: &BindingRegistry) -> Option<Command> {
        if let Some(cmd) = self.navigation.get(&key.trim().to_lowercase()) {
            return Some(cmd.clone());
        }

        if registry.is_key_used(key) {
            return BindKey::parse(key).map(Command::Route);
        }

        tracing::debug!("Key pressed with no command: {}", key);
        None
    }
}

impl Default for KeyMap {
    fn default() -> Self {
        Self::new(&NavigationConfig::default())
    }
}
