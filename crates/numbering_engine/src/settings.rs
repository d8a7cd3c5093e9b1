//! Numbering output settings
//!
//! Controls the presentation-layer choices of the engine: the attribute names
//! attached to numbered elements, counter naming in the stylesheet, and
//! whether numbers are written as literal text, CSS counters, or both.

use crate::Result;
use numbering_model::DEFAULT_BULLET;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main settings container
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NumberingSettings {
    /// Names of the four numbering attributes
    pub attributes: AttributeNames,
    /// Counter name prefix; counters are named "{prefix}-{abstractId}-{level}"
    pub counter_prefix: String,
    /// How numbers appear in rendered markup
    pub render_mode: RenderMode,
    /// Emit level indentation into the stylesheet
    pub emit_indentation: bool,
    /// Glyph for bullet levels without their own character
    pub default_bullet: String,
}

impl Default for NumberingSettings {
    fn default() -> Self {
        Self {
            attributes: AttributeNames::default(),
            counter_prefix: "num".to_string(),
            render_mode: RenderMode::Literal,
            emit_indentation: true,
            default_bullet: DEFAULT_BULLET.to_string(),
        }
    }
}

/// Attribute names attached to numbered elements
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AttributeNames {
    pub numbering_id: String,
    pub abstract_numbering_id: String,
    pub level: String,
    pub format: String,
}

impl Default for AttributeNames {
    fn default() -> Self {
        Self {
            numbering_id: "data-numbering-id".to_string(),
            abstract_numbering_id: "data-abstract-numbering-id".to_string(),
            level: "data-numbering-level".to_string(),
            format: "data-numbering-format".to_string(),
        }
    }
}

/// How numbers are displayed in the output markup
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    /// Number text is written into the markup
    #[default]
    Literal,
    /// Numbers come from stylesheet counters only
    Counter,
    /// Both literal text and counter rules (counter content hidden)
    Both,
}

impl RenderMode {
    pub fn writes_literal(&self) -> bool {
        matches!(self, RenderMode::Literal | RenderMode::Both)
    }

    pub fn uses_counters(&self) -> bool {
        matches!(self, RenderMode::Counter | RenderMode::Both)
    }
}

/// Loads and saves settings from a JSON file
pub struct SettingsLoader {
    /// Path to the settings file
    settings_path: PathBuf,
    /// Current settings (cached)
    current: NumberingSettings,
}

impl SettingsLoader {
    /// Create a loader for the given file
    pub fn new(settings_path: impl Into<PathBuf>) -> Self {
        Self {
            settings_path: settings_path.into(),
            current: NumberingSettings::default(),
        }
    }

    /// Get the path to the settings file
    pub fn settings_path(&self) -> &Path {
        &self.settings_path
    }

    /// Load settings from disk, or use defaults if the file is missing or invalid
    pub fn load(&mut self) -> Result<&NumberingSettings> {
        if self.settings_path.exists() {
            let content = std::fs::read_to_string(&self.settings_path)?;
            match serde_json::from_str::<NumberingSettings>(&content) {
                Ok(settings) => {
                    self.current = settings;
                }
                Err(e) => {
                    tracing::warn!(
                        "Failed to parse settings file {:?}, using defaults: {}",
                        self.settings_path,
                        e
                    );
                    self.current = NumberingSettings::default();
                }
            }
        } else {
            self.current = NumberingSettings::default();
        }
        Ok(&self.current)
    }

    /// Save current settings to disk
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.settings_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(&self.current)?;
        std::fs::write(&self.settings_path, content)?;
        Ok(())
    }

    /// Get current settings
    pub fn get(&self) -> &NumberingSettings {
        &self.current
    }

    /// Replace settings and save to disk
    pub fn update(&mut self, settings: NumberingSettings) -> Result<()> {
        self.current = settings;
        self.save()
    }

    /// Take ownership of the loaded settings
    pub fn into_settings(self) -> NumberingSettings {
        self.current
    }
}
