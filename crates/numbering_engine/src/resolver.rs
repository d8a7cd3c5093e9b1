//! Sequence resolution
//!
//! Assigns actual numbers to numbered paragraphs in document order. All state
//! lives in the trackers created by a single [`SequenceResolver::resolve`]
//! call; nothing carries over between calls.

use crate::tracker::SequenceTracker;
use numbering_model::{
    render, DefinitionStore, DiagnosticKind, Diagnostics, NumId, NumberingReference, ParagraphId,
    ParagraphNumberingContext, RenderTarget, ResolvedNumbering, DEFAULT_BULLET,
};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

/// A paragraph context with the number it was assigned, if any
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedParagraph {
    pub context: ParagraphNumberingContext,
    pub numbering: Option<Arc<ResolvedNumbering>>,
}

impl ResolvedParagraph {
    pub fn id(&self) -> ParagraphId {
        self.context.id
    }
}

/// Result of resolving one document
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResolvedDocument {
    /// One entry per input context, in ordinal order
    pub paragraphs: Vec<ResolvedParagraph>,
    pub diagnostics: Diagnostics,
}

impl ResolvedDocument {
    /// Paragraphs that received a number
    pub fn numbered(&self) -> impl Iterator<Item = (ParagraphId, &Arc<ResolvedNumbering>)> {
        self.paragraphs
            .iter()
            .filter_map(|p| p.numbering.as_ref().map(|n| (p.id(), n)))
    }

    pub fn get(&self, id: ParagraphId) -> Option<&ResolvedParagraph> {
        self.paragraphs
            .get(id.ordinal())
            .filter(|p| p.id() == id)
            .or_else(|| self.paragraphs.iter().find(|p| p.id() == id))
    }

    /// Composed number texts of the numbered paragraphs, in order
    pub fn texts(&self) -> Vec<&str> {
        self.numbered().map(|(_, n)| n.text.as_str()).collect()
    }
}

/// Walks paragraph contexts and assigns numbers
#[derive(Debug, Clone)]
pub struct SequenceResolver {
    default_bullet: String,
}

impl Default for SequenceResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl SequenceResolver {
    pub fn new() -> Self {
        Self {
            default_bullet: DEFAULT_BULLET.to_string(),
        }
    }

    /// Glyph for bullet levels that do not define one
    pub fn with_default_bullet(mut self, glyph: impl Into<String>) -> Self {
        self.default_bullet = glyph.into();
        self
    }

    /// Resolve every context against the store.
    ///
    /// Contexts are processed in ordinal order regardless of slice order.
    /// References the store cannot resolve leave the paragraph unnumbered and
    /// record a diagnostic.
    pub fn resolve(&self, contexts: &[ParagraphNumberingContext], store: &DefinitionStore) -> ResolvedDocument {
        let mut ordered: Vec<&ParagraphNumberingContext> = contexts.iter().collect();
        ordered.sort_by_key(|c| c.id);

        let mut trackers: HashMap<NumId, SequenceTracker> = HashMap::new();
        let mut diagnostics = Diagnostics::new();
        let mut paragraphs = Vec::with_capacity(ordered.len());

        for context in ordered {
            let numbering = context.reference.and_then(|reference| {
                self.resolve_one(context.id, reference, store, &mut trackers, &mut diagnostics)
            });
            paragraphs.push(ResolvedParagraph {
                context: context.clone(),
                numbering,
            });
        }

        tracing::debug!(
            paragraphs = paragraphs.len(),
            numbered = paragraphs.iter().filter(|p| p.numbering.is_some()).count(),
            instances = trackers.len(),
            diagnostics = diagnostics.len(),
            "Resolved document numbering"
        );

        ResolvedDocument {
            paragraphs,
            diagnostics,
        }
    }

    fn resolve_one(
        &self,
        paragraph: ParagraphId,
        reference: NumberingReference,
        store: &DefinitionStore,
        trackers: &mut HashMap<NumId, SequenceTracker>,
        diagnostics: &mut Diagnostics,
    ) -> Option<Arc<ResolvedNumbering>> {
        let (Some(instance), Some(level)) = (
            store.instance(reference.num_id),
            store.level_for(reference.num_id, reference.level),
        ) else {
            diagnostics.push(
                paragraph,
                DiagnosticKind::UnresolvedNumberingReference {
                    num_id: reference.num_id,
                    level: reference.level,
                },
            );
            return None;
        };

        let tracker = trackers
            .entry(reference.num_id)
            .or_insert_with(|| SequenceTracker::new(reference.num_id));
        let actual = tracker.count(paragraph, level, store);
        let snapshot = tracker.snapshot(level.level, store);

        let target = RenderTarget {
            num_id: instance.id,
            abstract_num_id: instance.abstract_num_id,
        };
        let rendered = render(target, actual, level, &snapshot, &self.default_bullet);
        for violation in rendered.violations {
            diagnostics.push(paragraph, DiagnosticKind::FormatRangeViolation(violation));
        }

        Some(Arc::new(rendered.numbering))
    }
}
