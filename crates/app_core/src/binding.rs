//! Key binding registry
//!
//! An ordered arena of bindings whose `index` always equals the binding's
//! position. Indices are handed to the UI as row handles, so every removal
//! renumbers the whole list.

use crate::AppError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default cap on live bindings
pub const DEFAULT_MAX_BINDINGS: usize = 8;

/// A bound key token, normalized to uppercase ("A", "F5", "SPACE")
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct BindKey(String);

impl BindKey {
    /// Normalize a raw key name. Returns `None` for blank input.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_uppercase()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn is_blank(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<String> for BindKey {
    fn from(raw: String) -> Self {
        Self(raw.trim().to_uppercase())
    }
}

impl From<BindKey> for String {
    fn from(key: BindKey) -> Self {
        key.0
    }
}

impl fmt::Display for BindKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What happens to the source image after it is copied
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationMode {
    /// Duplicate into the destination, leave the source in place
    #[default]
    #[serde(rename = "copy")]
    Copy,
    /// Duplicate into the destination, then delete the source
    #[serde(rename = "move")]
    Move,
}

impl OperationMode {
    pub fn is_destructive(self) -> bool {
        self == OperationMode::Move
    }
}

impl std::str::FromStr for OperationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "copy" => Ok(OperationMode::Copy),
            "move" => Ok(OperationMode::Move),
            other => Err(format!("unknown operation mode: {}", other)),
        }
    }
}

impl fmt::Display for OperationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperationMode::Copy => f.pad("copy"),
            OperationMode::Move => f.pad("move"),
        }
    }
}

/// One key -> destination row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Binding {
    pub index: usize,
    /// `None` while awaiting assignment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<BindKey>,
    #[serde(default)]
    pub subfolder_name: String,
    #[serde(default)]
    pub operation_mode: OperationMode,
}

impl Binding {
    pub fn new(index: usize) -> Self {
        Self {
            index,
            key: None,
            subfolder_name: String::new(),
            operation_mode: OperationMode::default(),
        }
    }

    fn holds(&self, key: &BindKey) -> bool {
        self.key.as_ref() == Some(key)
    }
}

/// Ordered collection of bindings
#[derive(Debug, Clone)]
pub struct BindingRegistry {
    bindings: Vec<Binding>,
    max_bindings: usize,
}

impl BindingRegistry {
    pub fn new(max_bindings: usize) -> Self {
        Self {
            bindings: Vec::new(),
            max_bindings,
        }
    }

    /// Rebuild a registry from persisted rows.
    ///
    /// Order is kept as given; rows past `max_bindings` are dropped, blank
    /// keys become unset and indices are renumbered if they were not
    /// contiguous.
    pub fn from_bindings(bindings: Vec<Binding>, max_bindings: usize) -> Self {
        let mut bindings = bindings;
        if bindings.len() > max_bindings {
            tracing::warn!(
                "Dropping {} persisted bindings over the limit of {}",
                bindings.len() - max_bindings,
                max_bindings
            );
            bindings.truncate(max_bindings);
        }

        for binding in &mut bindings {
            if binding.key.as_ref().is_some_and(BindKey::is_blank) {
                binding.key = None;
            }
        }

        let mut registry = Self {
            bindings,
            max_bindings,
        };
        if !registry.is_contiguous() {
            tracing::warn!("Persisted binding indices were not contiguous, renumbering");
            registry.reindex();
        }
        registry
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.bindings.len() >= self.max_bindings
    }

    pub fn max_bindings(&self) -> usize {
        self.max_bindings
    }

    /// Rows in index order
    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    pub fn get(&self, index: usize) -> Result<&Binding, AppError> {
        let len = self.bindings.len();
        self.bindings
            .get(index)
            .ok_or(AppError::OutOfRange { index, len })
    }

    fn get_mut(&mut self, index: usize) -> Result<&mut Binding, AppError> {
        let len = self.bindings.len();
        self.bindings
            .get_mut(index)
            .ok_or(AppError::OutOfRange { index, len })
    }

    /// Append an empty binding and return its index
    pub fn add_binding(&mut self) -> Result<usize, AppError> {
        if self.is_full() {
            return Err(AppError::RegistryFull(self.max_bindings));
        }

        let index = self.bindings.len();
        self.bindings.push(Binding::new(index));
        tracing::debug!("Added binding {}", index);
        Ok(index)
    }

    /// Remove the binding at `index` and renumber the rest
    pub fn remove_binding(&mut self, index: usize) -> Result<Binding, AppError> {
        self.get(index)?;

        let removed = self.bindings.remove(index);
        self.reindex();
        tracing::debug!("Removed binding {} ({} left)", index, self.bindings.len());
        Ok(removed)
    }

    /// Give an unkeyed binding its key.
    ///
    /// One-shot: a binding that already holds a key keeps it. A key already
    /// held by another binding is refused too. Returns whether the key was set.
    pub fn assign_key(&mut self, index: usize, candidate_key: &str) -> Result<bool, AppError> {
        self.get(index)?;

        let Some(key) = BindKey::parse(candidate_key) else {
            return Ok(false);
        };

        if self.bindings[index].key.is_some() {
            tracing::debug!("Binding {} already keyed, ignoring {}", index, key);
            return Ok(false);
        }

        if self.is_bound(&key) {
            tracing::debug!("Key {} already in use, not assigning to {}", key, index);
            return Ok(false);
        }

        tracing::debug!("Bound key {} to binding {}", key, index);
        self.bindings[index].key = Some(key);
        Ok(true)
    }

    /// Reset a binding's key so it can be assigned again
    pub fn clear_key(&mut self, index: usize) -> Result<Option<BindKey>, AppError> {
        Ok(self.get_mut(index)?.key.take())
    }

    pub fn set_subfolder(&mut self, index: usize, name: &str) -> Result<(), AppError> {
        self.get_mut(index)?.subfolder_name = name.to_string();
        Ok(())
    }

    pub fn set_mode(&mut self, index: usize, mode: OperationMode) -> Result<(), AppError> {
        self.get_mut(index)?.operation_mode = mode;
        Ok(())
    }

    /// Destination and mode for `key`; the lowest index wins on duplicates
    pub fn resolve_key(&self, key: &str) -> Result<(&str, OperationMode), AppError> {
        BindKey::parse(key)
            .and_then(|key| self.bindings.iter().find(|b| b.holds(&key)))
            .map(|b| (b.subfolder_name.as_str(), b.operation_mode))
            .ok_or_else(|| AppError::KeyNotBound(key.to_string()))
    }

    pub fn is_key_used(&self, key: &str) -> bool {
        BindKey::parse(key).is_some_and(|key| self.is_bound(&key))
    }

    fn is_bound(&self, key: &BindKey) -> bool {
        self.bindings.iter().any(|b| b.holds(key))
    }

    fn is_contiguous(&self) -> bool {
        self.bindings.iter().enumerate().all(|(i, b)| b.index == i)
    }

    fn reindex(&mut self) {
        for (position, binding) in self.bindings.iter_mut().enumerate() {
            binding.index = position;
        }
    }
}

impl Default for BindingRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_BINDINGS)
    }
}
