//! Non-fatal problems recorded while numbering a document
//!
//! A bad reference or an unrenderable value affects one paragraph only, so it
//! is recorded here instead of aborting resolution of the whole document.

use crate::format::FormatRangeViolation;
use crate::ids::{AbstractNumId, NumId, ParagraphId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// What went wrong for a paragraph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DiagnosticKind {
    /// The paragraph references an instance or level the store cannot resolve
    UnresolvedNumberingReference { num_id: NumId, level: u8 },
    /// A value could not be expressed in its format; decimal text was used
    FormatRangeViolation(FormatRangeViolation),
    /// Resolved numbering had no rendered element to attach to
    UnattachedParagraph,
    /// A second instance of an abstract definition starts here; counter CSS
    /// keeps counting across both instances
    SharedCounter {
        abstract_num_id: AbstractNumId,
        num_id: NumId,
        first_num_id: NumId,
    },
}

/// A diagnostic tied to the paragraph it concerns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub paragraph: ParagraphId,
    #[serde(flatten)]
    pub kind: DiagnosticKind,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            DiagnosticKind::UnresolvedNumberingReference { num_id, level } => write!(
                f,
                "{}: unresolved numbering reference (numId {}, level {})",
                self.paragraph, num_id, level
            ),
            DiagnosticKind::FormatRangeViolation(violation) => {
                write!(f, "{}: {}", self.paragraph, violation)
            }
            DiagnosticKind::UnattachedParagraph => {
                write!(f, "{}: no rendered element for numbered paragraph", self.paragraph)
            }
            DiagnosticKind::SharedCounter {
                abstract_num_id,
                num_id,
                first_num_id,
            } => write!(
                f,
                "{}: numId {} shares CSS counters of abstract definition {} with numId {}",
                self.paragraph, num_id, abstract_num_id, first_num_id
            ),
        }
    }
}

/// Ordered collection of diagnostics for one document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Diagnostics(Vec<Diagnostic>);

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a diagnostic and log it
    pub fn push(&mut self, paragraph: ParagraphId, kind: DiagnosticKind) {
        let diagnostic = Diagnostic { paragraph, kind };
        tracing::warn!("{}", diagnostic);
        self.0.push(diagnostic);
    }

    pub fn extend(&mut self, other: Diagnostics) {
        self.0.extend(other.0);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.0.iter()
    }

    /// Diagnostics for one paragraph
    pub fn for_paragraph(&self, paragraph: ParagraphId) -> impl Iterator<Item = &Diagnostic> {
        self.0.iter().filter(move |d| d.paragraph == paragraph)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
