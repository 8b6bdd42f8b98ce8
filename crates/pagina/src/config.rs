//! Configuration consumed by the core: base URL, default fetch mode, and
//! the named wait presets.
//!
//! The core only reads configuration, never mutates it. Preset names are
//! case-normalized on insert and lookup, and a compiled-in default preset
//! guarantees that the default always exists, whatever a loaded
//! configuration contains.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::locator::FetchMode;
use crate::result::{PaginaError, PaginaResult};
use crate::wait::{WaitPreset, DEFAULT_PRESET_NAME};

/// Browser configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Prefix for page URLs; empty means page URLs are used untouched
    pub base_url: String,
    /// Fetch mode used by mode-agnostic resolution
    pub elements_fetch_type: FetchMode,
    presets: HashMap<String, WaitPreset>,
    default_preset_name: String,
}

impl Default for Config {
    fn default() -> Self {
        let mut presets = HashMap::new();
        let _ = presets.insert(DEFAULT_PRESET_NAME.to_string(), WaitPreset::default());
        Self {
            base_url: String::new(),
            elements_fetch_type: FetchMode::Single,
            presets,
            default_preset_name: DEFAULT_PRESET_NAME.to_string(),
        }
    }
}

fn normalize(name: &str) -> String {
    name.to_uppercase()
}

impl Config {
    /// Create a configuration with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base URL page URLs are resolved against
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the default fetch mode
    #[must_use]
    pub const fn with_elements_fetch_type(mut self, mode: FetchMode) -> Self {
        self.elements_fetch_type = mode;
        self
    }

    /// Register a named wait preset; the name is case-normalized
    #[must_use]
    pub fn with_preset(mut self, name: impl Into<String>, preset: WaitPreset) -> Self {
        let _ = self.presets.insert(normalize(&name.into()), preset);
        self
    }

    /// Register a preset and make it the default
    #[must_use]
    pub fn with_default_preset(mut self, name: impl Into<String>, preset: WaitPreset) -> Self {
        let name = normalize(&name.into());
        let _ = self.presets.insert(name.clone(), preset);
        self.default_preset_name = name;
        self
    }

    /// Look up a named preset.
    ///
    /// # Errors
    ///
    /// [`PaginaError::PresetNotFound`] for unknown names; a configuration
    /// error, never retried.
    pub fn preset(&self, name: &str) -> PaginaResult<WaitPreset> {
        self.presets
            .get(&normalize(name))
            .copied()
            .ok_or_else(|| PaginaError::PresetNotFound {
                name: name.to_string(),
            })
    }

    /// The default preset. Falls back to the compiled-in preset if a loaded
    /// configuration lost its default entry.
    #[must_use]
    pub fn default_preset(&self) -> WaitPreset {
        self.presets
            .get(&self.default_preset_name)
            .copied()
            .unwrap_or_default()
    }

    /// Named preset if `name` is given, the default preset otherwise
    ///
    /// # Errors
    ///
    /// [`PaginaError::PresetNotFound`] for unknown names.
    pub fn preset_or_default(&self, name: Option<&str>) -> PaginaResult<WaitPreset> {
        match name {
            Some(name) => self.preset(name),
            None => Ok(self.default_preset()),
        }
    }

    /// Load a configuration from JSON, re-normalizing preset names
    ///
    /// # Errors
    ///
    /// [`PaginaError::Json`] on malformed input.
    pub fn from_json(json: &str) -> PaginaResult<Self> {
        let mut config: Self = serde_json::from_str(json)?;
        config.presets = config
            .presets
            .into_iter()
            .map(|(name, preset)| (normalize(&name), preset))
            .collect();
        config.default_preset_name = normalize(&config.default_preset_name);
        Ok(config)
    }
}
