//! Identifier types for numbering definitions and paragraphs

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for an abstract numbering definition
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AbstractNumId(pub u32);

impl AbstractNumId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }
}

impl fmt::Display for AbstractNumId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a concrete numbering instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NumId(pub u32);

impl NumId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }
}

impl fmt::Display for NumId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stable paragraph identifier assigned during the shared body traversal.
///
/// The value is the paragraph's ordinal position in document order. Both the
/// context extractor and the base converter obtain it from the same walk, so
/// it is the only key used to bind numbering to rendered elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ParagraphId(pub usize);

impl ParagraphId {
    pub fn new(ordinal: usize) -> Self {
        Self(ordinal)
    }

    pub fn ordinal(&self) -> usize {
        self.0
    }
}

impl fmt::Display for ParagraphId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "p{}", self.0)
    }
}
