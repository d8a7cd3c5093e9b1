//! List level definitions
//!
//! A level describes how one depth (0-8) of an abstract numbering definition
//! is counted and displayed: its format, starting value, restart rule, the
//! composition template for multi-level text such as "1.2.3.", and the
//! presentation payload (indentation and glyph run properties) that is carried
//! through to the stylesheet untouched.

use crate::error::{NumberingError, Result};
use crate::format::NumberFormat;
use crate::MAX_LEVELS;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Glyph used for bullet levels that do not carry their own character
pub const DEFAULT_BULLET: &str = "\u{2022}";

// =============================================================================
// Restart rules
// =============================================================================

/// When a level's counter returns to its starting value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", content = "level", rename_all = "camelCase")]
pub enum LevelRestart {
    /// Restart whenever any shallower level is counted (the format default)
    #[default]
    AnyShallower,
    /// Restart only after a level at or above the given index was counted
    AfterLevel(u8),
    /// Never restart; the level keeps counting through shallower items
    Never,
}

impl LevelRestart {
    /// Map a `w:lvlRestart` value (1-based level, 0 = never) to a rule
    pub fn from_ooxml(value: u32) -> Self {
        match value {
            0 => LevelRestart::Never,
            n => LevelRestart::AfterLevel((n - 1).min(u8::MAX as u32) as u8),
        }
    }
}

/// Separator written between the number and the paragraph text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum LevelSuffix {
    #[default]
    Tab,
    Space,
    Nothing,
}

impl LevelSuffix {
    /// Text emitted after the number in rendered markup
    pub fn separator(&self) -> &'static str {
        match self {
            LevelSuffix::Tab | LevelSuffix::Space => " ",
            LevelSuffix::Nothing => "",
        }
    }
}

// =============================================================================
// Presentation payload
// =============================================================================

/// Level indentation in points. Opaque to resolution, consumed by layout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Indentation {
    pub left: Option<f32>,
    pub hanging: Option<f32>,
    pub first_line: Option<f32>,
}

impl Indentation {
    pub fn is_empty(&self) -> bool {
        self.left.is_none() && self.hanging.is_none() && self.first_line.is_none()
    }
}

/// Character formatting applied to the number glyph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RunProperties {
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    pub font: Option<String>,
    /// CSS color such as "#FF0000"
    pub color: Option<String>,
}

impl RunProperties {
    pub fn is_empty(&self) -> bool {
        self.bold.is_none() && self.italic.is_none() && self.font.is_none() && self.color.is_none()
    }
}

// =============================================================================
// Composition template
// =============================================================================

/// A piece of a level text template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TemplateSegment {
    /// Literal text copied as-is
    Literal(String),
    /// The current number of a level (0-based index)
    Level(u8),
}

/// Multi-level composition template, e.g. "%1.%2." for "1.2."
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct LevelTemplate {
    pub segments: Vec<TemplateSegment>,
}

impl LevelTemplate {
    /// Parse a `w:lvlText` pattern. `%1`..`%9` reference levels 0..8; any
    /// other text, including a stray `%`, is literal.
    pub fn parse(pattern: &str) -> Self {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = pattern.chars().peekable();

        while let Some(c) = chars.next() {
            if c == '%' {
                if let Some(&digit @ '1'..='9') = chars.peek() {
                    chars.next();
                    if !literal.is_empty() {
                        segments.push(TemplateSegment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(TemplateSegment::Level(digit as u8 - b'1'));
                    continue;
                }
            }
            literal.push(c);
        }

        if !literal.is_empty() {
            segments.push(TemplateSegment::Literal(literal));
        }

        Self { segments }
    }

    /// Build a template from level indices joined by a separator, wrapped in
    /// a prefix and suffix: `joined(&[0, 1], ".", "", ".")` is "%1.%2.".
    pub fn joined(levels: &[u8], separator: &str, prefix: &str, suffix: &str) -> Result<Self> {
        if levels.is_empty() {
            return Err(NumberingError::InvalidTemplate {
                template: format!("{}{}", prefix, suffix),
                reason: "no levels referenced".to_string(),
            });
        }
        if let Some(&bad) = levels.iter().find(|&&l| l as usize >= MAX_LEVELS) {
            return Err(NumberingError::InvalidTemplate {
                template: format!("{:?}", levels),
                reason: format!("level {} outside 0..8", bad),
            });
        }

        let mut segments = Vec::new();
        if !prefix.is_empty() {
            segments.push(TemplateSegment::Literal(prefix.to_string()));
        }
        for (i, &level) in levels.iter().enumerate() {
            if i > 0 && !separator.is_empty() {
                segments.push(TemplateSegment::Literal(separator.to_string()));
            }
            segments.push(TemplateSegment::Level(level));
        }
        if !suffix.is_empty() {
            segments.push(TemplateSegment::Literal(suffix.to_string()));
        }

        Ok(Self { segments })
    }

    /// The single-level default, "%N." for level N-1
    pub fn single(level: u8) -> Self {
        Self {
            segments: vec![
                TemplateSegment::Level(level),
                TemplateSegment::Literal(".".to_string()),
            ],
        }
    }

    /// Level indices referenced by the template, in order of appearance
    pub fn referenced_levels(&self) -> impl Iterator<Item = u8> + '_ {
        self.segments.iter().filter_map(|s| match s {
            TemplateSegment::Level(l) => Some(*l),
            TemplateSegment::Literal(_) => None,
        })
    }

    /// Check if the template references more than the given level
    pub fn is_multi_level(&self) -> bool {
        let mut levels = self.referenced_levels();
        match levels.next() {
            Some(first) => levels.any(|l| l != first),
            None => false,
        }
    }
}

impl fmt::Display for LevelTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            match segment {
                TemplateSegment::Literal(text) => f.write_str(text)?,
                TemplateSegment::Level(l) => write!(f, "%{}", l + 1)?,
            }
        }
        Ok(())
    }
}

// =============================================================================
// Level Definition
// =============================================================================

/// Definition for a single level of a list (0-8)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelDefinition {
    /// Level index (0-8)
    pub level: u8,
    /// Number format for this level
    pub format: NumberFormat,
    /// Starting number for this level
    pub start: u32,
    /// Restart rule relative to shallower levels
    pub restart: LevelRestart,
    /// Restart after this many items at this level
    pub restart_period: Option<u32>,
    /// Composition template (None = "%N." for numbers, glyph for bullets)
    pub template: Option<LevelTemplate>,
    /// Bullet glyph, if this is a bullet level
    pub bullet_glyph: Option<String>,
    /// Legal numbering: render every composed level as decimal
    pub is_legal: bool,
    /// Separator after the number
    pub suffix: LevelSuffix,
    /// Indentation payload
    pub indentation: Indentation,
    /// Glyph run properties
    pub run_properties: RunProperties,
}

impl LevelDefinition {
    /// Create a decimal level starting at 1
    pub fn new(level: u8) -> Self {
        Self {
            level,
            format: NumberFormat::Decimal,
            start: 1,
            restart: LevelRestart::AnyShallower,
            restart_period: None,
            template: None,
            bullet_glyph: None,
            is_legal: false,
            suffix: LevelSuffix::Tab,
            indentation: Indentation::default(),
            run_properties: RunProperties::default(),
        }
    }

    /// Create a numbered level with the given format
    pub fn numbered(level: u8, format: NumberFormat) -> Self {
        Self {
            format,
            ..Self::new(level)
        }
    }

    /// Create a bullet level
    pub fn bullet(level: u8, glyph: impl Into<String>) -> Self {
        Self {
            format: NumberFormat::Bullet,
            bullet_glyph: Some(glyph.into()),
            ..Self::new(level)
        }
    }

    /// Builder: set the starting value
    pub fn with_start(mut self, start: u32) -> Self {
        self.start = start;
        self
    }

    /// Builder: set the composition template
    pub fn with_template(mut self, template: LevelTemplate) -> Self {
        self.template = Some(template);
        self
    }

    /// Builder: set the restart rule
    pub fn with_restart(mut self, restart: LevelRestart) -> Self {
        self.restart = restart;
        self
    }

    /// The level whose counting restarts this one, if an explicit rule exists
    pub fn restart_after_level(&self) -> Option<u8> {
        match self.restart {
            LevelRestart::AfterLevel(l) => Some(l),
            LevelRestart::AnyShallower | LevelRestart::Never => None,
        }
    }

    /// Template used for composition
    pub fn effective_template(&self) -> LevelTemplate {
        self.template
            .clone()
            .unwrap_or_else(|| LevelTemplate::single(self.level))
    }

    /// Bullet glyph, falling back to the given default
    pub fn glyph<'a>(&'a self, default: &'a str) -> &'a str {
        self.bullet_glyph.as_deref().unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_template() {
        let template = LevelTemplate::parse("%1.%2.");
        assert_eq!(
            template.segments,
            vec![
                TemplateSegment::Level(0),
                TemplateSegment::Literal(".".into()),
                TemplateSegment::Level(1),
                TemplateSegment::Literal(".".into()),
            ]
        );
        assert!(template.is_multi_level());
        assert_eq!(template.to_string(), "%1.%2.");
    }

    #[test]
    fn test_parse_template_literals() {
        let template = LevelTemplate::parse("(%1) 100%");
        assert_eq!(template.referenced_levels().collect::<Vec<_>>(), vec![0]);
        assert_eq!(template.to_string(), "(%1) 100%");
        assert!(!template.is_multi_level());
    }

    #[test]
    fn test_joined_template() {
        let template = LevelTemplate::joined(&[0, 1, 2], ".", "", ".").unwrap();
        assert_eq!(template, LevelTemplate::parse("%1.%2.%3."));

        let template = LevelTemplate::joined(&[1], "", "(", ")").unwrap();
        assert_eq!(template.to_string(), "(%2)");

        assert!(LevelTemplate::joined(&[], ".", "", "").is_err());
        assert!(LevelTemplate::joined(&[9], ".", "", "").is_err());
    }

    #[test]
    fn test_restart_from_ooxml() {
        assert_eq!(LevelRestart::from_ooxml(0), LevelRestart::Never);
        assert_eq!(LevelRestart::from_ooxml(1), LevelRestart::AfterLevel(0));
        assert_eq!(LevelRestart::from_ooxml(3), LevelRestart::AfterLevel(2));
    }

    #[test]
    fn test_effective_template_default() {
        let level = LevelDefinition::numbered(2, NumberFormat::LowerRoman);
        assert_eq!(level.effective_template().to_string(), "%3.");
        assert_eq!(level.restart_after_level(), None);
    }

    #[test]
    fn test_bullet_glyph() {
        let level = LevelDefinition::bullet(0, "o");
        assert!(level.format.is_bullet());
        assert_eq!(level.glyph(DEFAULT_BULLET), "o");
        assert_eq!(LevelDefinition::new(0).glyph(DEFAULT_BULLET), DEFAULT_BULLET);
    }
}
