//! Attachment of resolved numbering to rendered elements
//!
//! Elements produced by the base conversion carry the `ParagraphId` of the
//! paragraph they came from. Resolved numbering is matched to elements by that
//! id alone, never by text.

use crate::emitter::emit_attributes;
use crate::resolver::ResolvedDocument;
use crate::settings::AttributeNames;
use numbering_model::{DiagnosticKind, Diagnostics, ParagraphId, ResolvedNumbering};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// One block-level element of the converted document
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedElement {
    /// Paragraph this element was produced from
    pub paragraph_id: ParagraphId,
    /// Element name, e.g. "p" or "h2"
    pub tag: String,
    pub text: String,
    pub attributes: BTreeMap<String, String>,
    /// Numbering attached by [`attach`]
    pub numbering: Option<Arc<ResolvedNumbering>>,
}

impl RenderedElement {
    pub fn new(paragraph_id: ParagraphId, tag: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            paragraph_id,
            tag: tag.into(),
            text: text.into(),
            attributes: BTreeMap::new(),
            numbering: None,
        }
    }

    pub fn is_numbered(&self) -> bool {
        self.numbering.is_some()
    }
}

/// Outcome of an attachment pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttachReport {
    /// Elements that received numbering
    pub attached: usize,
    /// Numbered paragraphs without an element
    pub diagnostics: Diagnostics,
}

/// Attach numbering and its attributes to the matching elements.
///
/// Numbered paragraphs whose id has no element are reported as
/// `UnattachedParagraph`. Elements without numbering are left untouched.
pub fn attach(resolved: &ResolvedDocument, elements: &mut [RenderedElement], names: &AttributeNames) -> AttachReport {
    let index: HashMap<ParagraphId, usize> = elements
        .iter()
        .enumerate()
        .map(|(i, element)| (element.paragraph_id, i))
        .collect();

    let mut report = AttachReport::default();

    for (id, numbering) in resolved.numbered() {
        match index.get(&id) {
            Some(&i) => {
                let element = &mut elements[i];
                element.attributes.extend(emit_attributes(numbering, names));
                element.numbering = Some(Arc::clone(numbering));
                report.attached += 1;
            }
            None => report.diagnostics.push(id, DiagnosticKind::UnattachedParagraph),
        }
    }

    tracing::debug!(
        attached = report.attached,
        unattached = report.diagnostics.len(),
        "Attached numbering to elements"
    );

    report
}
