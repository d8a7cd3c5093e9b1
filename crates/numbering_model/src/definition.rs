//! Numbering definitions and the definition store
//!
//! This module implements the OOXML split between:
//! - Abstract numbering definitions (reusable templates of up to 9 levels)
//! - Concrete numbering instances (named uses of a template, each with its own
//!   counters and optional per-level overrides)
//!
//! The `DefinitionStore` is built once per document and never mutated. Level
//! lookups go through it so that override resolution happens in one place.

use crate::error::{NumberingError, Result};
use crate::format::NumberFormat;
use crate::ids::{AbstractNumId, NumId};
use crate::level::{
    Indentation, LevelDefinition, LevelRestart, LevelSuffix, LevelTemplate, RunProperties,
};
use crate::MAX_LEVELS;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

// =============================================================================
// Abstract Numbering Definition
// =============================================================================

/// Abstract numbering definition - a template for list styles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbstractNumberingDefinition {
    /// Unique identifier
    pub id: AbstractNumId,
    /// Human-readable name
    pub name: Option<String>,
    /// Levels ordered by index
    pub levels: Vec<LevelDefinition>,
}

impl AbstractNumberingDefinition {
    /// Create a definition with no levels
    pub fn new(id: AbstractNumId) -> Self {
        Self {
            id,
            name: None,
            levels: Vec::new(),
        }
    }

    /// Builder: add or replace a level
    pub fn with_level(mut self, level: LevelDefinition) -> Self {
        self.levels.retain(|l| l.level != level.level);
        self.levels.push(level);
        self.levels.sort_by_key(|l| l.level);
        self
    }

    /// Get a level definition
    pub fn level(&self, level: u8) -> Option<&LevelDefinition> {
        self.levels.iter().find(|l| l.level == level)
    }
}

// =============================================================================
// Concrete Numbering Instance
// =============================================================================

/// Level override for a numbering instance
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LevelOverride {
    /// Override the starting number only
    pub start_override: Option<u32>,
    /// Replace the whole level definition
    pub level_override: Option<LevelDefinition>,
}

/// Concrete numbering instance - a use of an abstract numbering definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConcreteNumberingInstance {
    /// Unique identifier
    pub id: NumId,
    /// Reference to abstract numbering definition
    pub abstract_num_id: AbstractNumId,
    /// Per-level overrides
    pub level_overrides: BTreeMap<u8, LevelOverride>,
}

impl ConcreteNumberingInstance {
    /// Create a new numbering instance
    pub fn new(id: NumId, abstract_num_id: AbstractNumId) -> Self {
        Self {
            id,
            abstract_num_id,
            level_overrides: BTreeMap::new(),
        }
    }

    /// Builder: override the starting value of a level
    pub fn with_start_override(mut self, level: u8, start: u32) -> Self {
        self.level_overrides.entry(level).or_default().start_override = Some(start);
        self
    }

    /// Builder: replace a level wholesale
    pub fn with_level_override(mut self, level: LevelDefinition) -> Self {
        let index = level.level;
        self.level_overrides.entry(index).or_default().level_override = Some(level);
        self
    }

    /// Get the start override for a level
    pub fn start_override(&self, level: u8) -> Option<u32> {
        self.level_overrides
            .get(&level)
            .and_then(|o| o.start_override)
    }
}

// =============================================================================
// Raw definitions (as read from the numbering part)
// =============================================================================

/// A level as read from the source, before validation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawLevel {
    pub ilvl: u32,
    /// `w:numFmt` keyword
    pub format: Option<String>,
    pub start: Option<u32>,
    /// `w:lvlRestart` value (1-based, 0 = never)
    pub restart: Option<u32>,
    pub restart_period: Option<u32>,
    /// `w:lvlText` pattern
    pub level_text: Option<String>,
    pub is_legal: bool,
    /// `w:suff` keyword
    pub suffix: Option<String>,
    pub indentation: Indentation,
    pub run_properties: RunProperties,
}

/// An abstract definition as read from the source
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawAbstractDefinition {
    pub id: u32,
    pub name: Option<String>,
    pub levels: Vec<RawLevel>,
}

/// A level override as read from the source
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawLevelOverride {
    pub ilvl: u32,
    pub start_override: Option<u32>,
    pub level: Option<RawLevel>,
}

/// A numbering instance as read from the source
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawInstance {
    pub id: u32,
    pub abstract_id: u32,
    pub overrides: Vec<RawLevelOverride>,
}

/// Everything read from a numbering part
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawDefinitions {
    pub abstracts: Vec<RawAbstractDefinition>,
    pub instances: Vec<RawInstance>,
}

fn checked_level(ilvl: u32, owner: impl FnOnce() -> String) -> Result<u8> {
    if (ilvl as usize) < MAX_LEVELS {
        Ok(ilvl as u8)
    } else {
        Err(NumberingError::LevelOutOfRange {
            owner: owner(),
            level: ilvl.min(u8::MAX as u32) as u8,
        })
    }
}

impl RawLevel {
    /// Validate and convert to a level definition
    pub fn into_level(self, owner: impl FnOnce() -> String) -> Result<LevelDefinition> {
        let level = checked_level(self.ilvl, owner)?;

        let format = match self.format.as_deref() {
            Some(keyword) => NumberFormat::from_keyword(keyword).unwrap_or_else(|| {
                tracing::debug!("Unsupported number format '{}', using decimal", keyword);
                NumberFormat::Decimal
            }),
            None => NumberFormat::Decimal,
        };

        let (template, bullet_glyph) = match (format, self.level_text) {
            (NumberFormat::Bullet, text) => (None, text.filter(|t| !t.is_empty())),
            (_, Some(text)) => (Some(LevelTemplate::parse(&text)), None),
            (_, None) => (None, None),
        };

        let suffix = match self.suffix.as_deref() {
            Some("space") => LevelSuffix::Space,
            Some("nothing") => LevelSuffix::Nothing,
            _ => LevelSuffix::Tab,
        };

        Ok(LevelDefinition {
            level,
            format,
            start: self.start.unwrap_or(1),
            restart: self
                .restart
                .map(LevelRestart::from_ooxml)
                .unwrap_or_default(),
            restart_period: self.restart_period.filter(|&p| p > 0),
            template,
            bullet_glyph,
            is_legal: self.is_legal,
            suffix,
            indentation: self.indentation,
            run_properties: self.run_properties,
        })
    }
}

impl RawAbstractDefinition {
    /// Validate and convert to an abstract definition
    pub fn into_definition(self) -> Result<AbstractNumberingDefinition> {
        let id = self.id;
        let mut definition = AbstractNumberingDefinition::new(AbstractNumId::new(id));
        definition.name = self.name;
        for raw in self.levels {
            let level = raw.into_level(|| format!("abstract definition {}", id))?;
            definition = definition.with_level(level);
        }
        Ok(definition)
    }
}

impl RawInstance {
    /// Validate and convert to a numbering instance
    pub fn into_instance(self) -> Result<ConcreteNumberingInstance> {
        let id = self.id;
        let mut instance =
            ConcreteNumberingInstance::new(NumId::new(id), AbstractNumId::new(self.abstract_id));

        for raw in self.overrides {
            let level = checked_level(raw.ilvl, || format!("override on numbering instance {}", id))?;
            let entry = instance.level_overrides.entry(level).or_default();
            entry.start_override = raw.start_override.or(entry.start_override);
            if let Some(raw_level) = raw.level {
                // The override slot decides the level, whatever ilvl the replacement carries
                let replacement = RawLevel {
                    ilvl: level as u32,
                    ..raw_level
                };
                entry.level_override = Some(
                    replacement.into_level(|| format!("override on numbering instance {}", id))?,
                );
            }
        }

        Ok(instance)
    }
}

// =============================================================================
// Definition Store
// =============================================================================

/// Validated numbering definitions for one document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DefinitionStore {
    abstracts: HashMap<AbstractNumId, AbstractNumberingDefinition>,
    instances: HashMap<NumId, ConcreteNumberingInstance>,
    /// Effective levels per instance with overrides applied
    effective: HashMap<NumId, Vec<Option<LevelDefinition>>>,
}

impl DefinitionStore {
    /// A store with no definitions
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load and validate raw definitions.
    ///
    /// Fails if an instance references a missing abstract definition, or if
    /// any level or override index lies outside 0..8.
    pub fn load(raw: RawDefinitions) -> Result<Self> {
        let abstracts = raw
            .abstracts
            .into_iter()
            .map(RawAbstractDefinition::into_definition)
            .collect::<Result<Vec<_>>>()?;
        let instances = raw
            .instances
            .into_iter()
            .map(RawInstance::into_instance)
            .collect::<Result<Vec<_>>>()?;

        Self::from_definitions(abstracts, instances)
    }

    /// Build a store from already-typed definitions
    pub fn from_definitions(
        abstracts: Vec<AbstractNumberingDefinition>,
        instances: Vec<ConcreteNumberingInstance>,
    ) -> Result<Self> {
        let mut store = Self::empty();

        for definition in abstracts {
            if let Some(bad) = definition.levels.iter().find(|l| l.level as usize >= MAX_LEVELS) {
                return Err(NumberingError::LevelOutOfRange {
                    owner: format!("abstract definition {}", definition.id),
                    level: bad.level,
                });
            }
            let id = definition.id;
            if store.abstracts.insert(id, definition).is_some() {
                tracing::debug!("Duplicate abstract definition {}, keeping the last", id);
            }
        }

        for instance in instances {
            let abstract_def = store.abstracts.get(&instance.abstract_num_id).ok_or(
                NumberingError::MissingAbstract {
                    num_id: instance.id,
                    abstract_num_id: instance.abstract_num_id,
                },
            )?;

            if let Some(&bad) = instance.level_overrides.keys().find(|&&l| l as usize >= MAX_LEVELS) {
                return Err(NumberingError::LevelOutOfRange {
                    owner: format!("override on numbering instance {}", instance.id),
                    level: bad,
                });
            }
            for (&slot, replacement) in instance
                .level_overrides
                .iter()
                .filter_map(|(slot, o)| o.level_override.as_ref().map(|l| (slot, l)))
            {
                if replacement.level as usize >= MAX_LEVELS {
                    return Err(NumberingError::LevelOutOfRange {
                        owner: format!("override on numbering instance {}", instance.id),
                        level: replacement.level,
                    });
                }
                if replacement.level != slot {
                    return Err(NumberingError::MalformedDefinition(format!(
                        "numbering instance {} overrides level {} with a definition for level {}",
                        instance.id, slot, replacement.level
                    )));
                }
            }

            let effective = (0..MAX_LEVELS as u8)
                .map(|level| effective_level(abstract_def, &instance, level))
                .collect();

            let id = instance.id;
            store.effective.insert(id, effective);
            if store.instances.insert(id, instance).is_some() {
                tracing::debug!("Duplicate numbering instance {}, keeping the last", id);
            }
        }

        tracing::debug!(
            abstracts = store.abstracts.len(),
            instances = store.instances.len(),
            "Loaded numbering definitions"
        );

        Ok(store)
    }

    /// The abstract definition an instance refers to
    pub fn abstract_for(&self, num_id: NumId) -> Option<&AbstractNumberingDefinition> {
        let instance = self.instances.get(&num_id)?;
        self.abstracts.get(&instance.abstract_num_id)
    }

    /// The effective level definition for an instance, with overrides applied
    pub fn level_for(&self, num_id: NumId, level: u8) -> Option<&LevelDefinition> {
        self.effective
            .get(&num_id)?
            .get(level as usize)?
            .as_ref()
    }

    /// Get a numbering instance
    pub fn instance(&self, num_id: NumId) -> Option<&ConcreteNumberingInstance> {
        self.instances.get(&num_id)
    }

    /// Get an abstract definition
    pub fn abstract_definition(&self, id: AbstractNumId) -> Option<&AbstractNumberingDefinition> {
        self.abstracts.get(&id)
    }

    /// All numbering instances
    pub fn instances(&self) -> impl Iterator<Item = &ConcreteNumberingInstance> {
        self.instances.values()
    }

    /// All abstract definitions
    pub fn abstracts(&self) -> impl Iterator<Item = &AbstractNumberingDefinition> {
        self.abstracts.values()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty() && self.abstracts.is_empty()
    }
}

/// Apply an instance's override to the abstract level.
///
/// A complete replacement wins over the abstract level; a start override then
/// replaces only the starting value of whichever level is in effect.
fn effective_level(
    abstract_def: &AbstractNumberingDefinition,
    instance: &ConcreteNumberingInstance,
    level: u8,
) -> Option<LevelDefinition> {
    let override_info = instance.level_overrides.get(&level);

    let mut effective = override_info
        .and_then(|o| o.level_override.clone())
        .or_else(|| abstract_def.level(level).cloned())?;

    if let Some(start) = override_info.and_then(|o| o.start_override) {
        effective.start = start;
    }

    Some(effective)
}
