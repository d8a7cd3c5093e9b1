//! Per-paragraph numbering references and their resolved values

use crate::format::NumberFormat;
use crate::ids::{AbstractNumId, NumId, ParagraphId};
use crate::level::{LevelSuffix, RunProperties};
use serde::{Deserialize, Serialize};

/// Numbering reference carried by a paragraph: which instance, which level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NumberingReference {
    pub num_id: NumId,
    pub level: u8,
}

impl NumberingReference {
    pub fn new(num_id: NumId, level: u8) -> Self {
        Self { num_id, level }
    }
}

/// One paragraph of the body, in document order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParagraphNumberingContext {
    /// Stable identifier (ordinal position in document order)
    pub id: ParagraphId,
    /// Numbering reference, if the paragraph is numbered
    pub reference: Option<NumberingReference>,
    /// Plain-text content
    pub text: String,
    /// Paragraph style id
    pub style_id: Option<String>,
}

impl ParagraphNumberingContext {
    /// An unnumbered paragraph
    pub fn plain(ordinal: usize, text: impl Into<String>) -> Self {
        Self {
            id: ParagraphId::new(ordinal),
            reference: None,
            text: text.into(),
            style_id: None,
        }
    }

    /// A numbered paragraph
    pub fn numbered(ordinal: usize, num_id: NumId, level: u8, text: impl Into<String>) -> Self {
        Self {
            reference: Some(NumberingReference::new(num_id, level)),
            ..Self::plain(ordinal, text)
        }
    }

    /// Builder: set the paragraph style
    pub fn with_style(mut self, style_id: impl Into<String>) -> Self {
        self.style_id = Some(style_id.into());
        self
    }

    pub fn ordinal(&self) -> usize {
        self.id.ordinal()
    }

    pub fn num_id(&self) -> Option<NumId> {
        self.reference.map(|r| r.num_id)
    }

    pub fn level(&self) -> Option<u8> {
        self.reference.map(|r| r.level)
    }

    pub fn is_numbered(&self) -> bool {
        self.reference.is_some()
    }
}

/// The number assigned to one paragraph. Produced once by the resolver and
/// shared read-only with every downstream consumer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedNumbering {
    pub num_id: NumId,
    pub abstract_num_id: AbstractNumId,
    pub level: u8,
    /// Actual number (start + counter - 1)
    pub value: u32,
    /// Formatted token for this level alone ("b", "iv", bullet glyph)
    pub token: String,
    /// Full composed text ("1.b.")
    pub text: String,
    pub format: NumberFormat,
    pub suffix: LevelSuffix,
    pub run_properties: RunProperties,
}

impl ResolvedNumbering {
    /// Text to place before the paragraph content, including the separator
    pub fn display_prefix(&self) -> String {
        if self.text.is_empty() {
            return String::new();
        }
        format!("{}{}", self.text, self.suffix.separator())
    }
}
