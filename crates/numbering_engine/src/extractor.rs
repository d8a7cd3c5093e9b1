//! Paragraph context extraction
//!
//! Walks the document body once and produces one `ParagraphNumberingContext`
//! per paragraph, numbered or not, in document order. The walk itself
//! ([`paragraph_nodes`]) is shared with the base converter so that both sides
//! assign the same `ParagraphId` to the same paragraph.

use crate::ooxml::StyleNumberingMap;
use numbering_model::{NumId, NumberingReference, ParagraphId, ParagraphNumberingContext, XmlNode};

/// Paragraph elements of a body tree in document order, with their ids.
///
/// Paragraphs nested in tables and content controls are included. A
/// paragraph is not searched for further paragraphs, so text-box content
/// stays with its anchoring paragraph.
pub fn paragraph_nodes(body: &XmlNode) -> Vec<(ParagraphId, &XmlNode)> {
    let mut paragraphs = Vec::new();
    let mut stack: Vec<&XmlNode> = body.children.iter().rev().collect();

    while let Some(node) = stack.pop() {
        if node.is("p") {
            paragraphs.push((ParagraphId::new(paragraphs.len()), node));
        } else {
            stack.extend(node.children.iter().rev());
        }
    }

    paragraphs
}

/// Plain text of a paragraph: run text with tabs and breaks
pub fn paragraph_text(paragraph: &XmlNode) -> String {
    let mut text = String::new();
    collect_text(paragraph, &mut text);
    text
}

fn collect_text(node: &XmlNode, out: &mut String) {
    for child in &node.children {
        match child.local_name() {
            "t" => out.push_str(&child.text),
            "tab" => out.push('\t'),
            "br" | "cr" => out.push('\n'),
            // Text boxes belong to their own story
            "txbxContent" => {}
            _ => collect_text(child, out),
        }
    }
}

/// Builds paragraph numbering contexts from a body tree
#[derive(Debug, Default, Clone, Copy)]
pub struct ParagraphContextExtractor<'a> {
    styles: Option<&'a StyleNumberingMap>,
}

impl<'a> ParagraphContextExtractor<'a> {
    /// Create an extractor that only reads direct paragraph numbering
    pub fn new() -> Self {
        Self { styles: None }
    }

    /// Also resolve numbering inherited from paragraph styles
    pub fn with_styles(mut self, styles: &'a StyleNumberingMap) -> Self {
        self.styles = Some(styles);
        self
    }

    /// Extract one context per paragraph, ordinal = position in the walk
    pub fn extract(&self, body: &XmlNode) -> Vec<ParagraphNumberingContext> {
        let contexts: Vec<_> = paragraph_nodes(body)
            .into_iter()
            .map(|(id, node)| self.context_for(id, node))
            .collect();

        tracing::debug!(
            paragraphs = contexts.len(),
            numbered = contexts.iter().filter(|c| c.is_numbered()).count(),
            "Extracted paragraph contexts"
        );

        contexts
    }

    /// Build the context for a single paragraph element
    pub fn context_for(&self, id: ParagraphId, paragraph: &XmlNode) -> ParagraphNumberingContext {
        let style_id = paragraph
            .path(&["pPr", "pStyle"])
            .and_then(|n| n.val())
            .map(str::to_string);

        ParagraphNumberingContext {
            id,
            reference: self.reference_for(paragraph, style_id.as_deref()),
            text: paragraph_text(paragraph),
            style_id,
        }
    }

    fn reference_for(&self, paragraph: &XmlNode, style_id: Option<&str>) -> Option<NumberingReference> {
        let from_style = || {
            let styles = self.styles?;
            styles.lookup(style_id?)
        };

        let Some(num_pr) = paragraph.path(&["pPr", "numPr"]) else {
            return from_style();
        };

        let direct_level = num_pr
            .child("ilvl")
            .and_then(|n| n.val())
            .and_then(|v| v.trim().parse::<u32>().ok())
            .map(|l| l.min(u8::MAX as u32) as u8);
        let direct_num = num_pr
            .child("numId")
            .and_then(|n| n.val())
            .and_then(|v| v.trim().parse::<u32>().ok());

        match direct_num {
            // numId 0 explicitly removes numbering, including style numbering
            Some(0) => None,
            Some(num_id) => {
                let level = direct_level
                    .or_else(|| {
                        let styles = self.styles?;
                        styles.level_for(style_id?)
                    })
                    .unwrap_or(0);
                Some(NumberingReference::new(NumId::new(num_id), level))
            }
            None => {
                let inherited = from_style()?;
                Some(NumberingReference::new(
                    inherited.num_id,
                    direct_level.unwrap_or(inherited.level),
                ))
            }
        }
    }
}
