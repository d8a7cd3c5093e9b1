//! Base conversion of paragraphs to block elements
//!
//! Produces one `RenderedElement` per paragraph using the same walk as the
//! numbering extractor, so element ids and paragraph ids line up without any
//! text matching.

use crate::error::DocxResult;
use crate::package::DocxParts;
use numbering_engine::{
    attach, paragraph_nodes, paragraph_text, AttachReport, NumberingPipeline, NumberingSettings, PipelineOutput,
    RenderedElement,
};
use numbering_model::XmlNode;
use std::collections::HashMap;

/// A converted document with numbering attached
#[derive(Debug, Clone)]
pub struct NumberedDocument {
    pub output: PipelineOutput,
    pub elements: Vec<RenderedElement>,
    pub report: AttachReport,
}

/// Resolve numbering for a package and attach it to the converted elements
pub fn number_document(parts: &DocxParts, settings: &NumberingSettings) -> DocxResult<NumberedDocument> {
    let output = NumberingPipeline::new(settings.clone()).run(
        &parts.body,
        parts.numbering.as_ref(),
        parts.styles.as_ref(),
    )?;

    let mut converter = BaseConverter::new();
    if let Some(styles) = &parts.styles {
        converter = converter.with_styles(styles);
    }
    let mut elements = converter.convert(&parts.body);
    let report = attach(&output.resolved, &mut elements, &settings.attributes);

    Ok(NumberedDocument {
        output,
        elements,
        report,
    })
}

/// Converts a document body into block elements
#[derive(Debug, Clone, Default)]
pub struct BaseConverter {
    /// Style id to heading level (1-6)
    headings: HashMap<String, u8>,
}

impl BaseConverter {
    /// Converter that recognizes the built-in heading style ids
    pub fn new() -> Self {
        let mut headings: HashMap<String, u8> = (1..=6u8).map(|n| (format!("Heading{}", n), n)).collect();
        headings.insert("Title".to_string(), 1);
        Self { headings }
    }

    /// Also recognize headings declared in a styles part.
    ///
    /// Paragraph styles with an outline level (`w:pPr/w:outlineLvl`) map to
    /// h1-h6; styles based on a heading inherit its level.
    pub fn with_styles(mut self, styles: &XmlNode) -> Self {
        let mut based_on: HashMap<&str, &str> = HashMap::new();

        for style in styles.children_named("style") {
            let Some(id) = style.attr("styleId") else {
                continue;
            };
            let outline = style
                .path(&["pPr", "outlineLvl"])
                .and_then(|n| n.val())
                .and_then(|v| v.parse::<u8>().ok());
            if let Some(level) = outline {
                if level < 6 {
                    self.headings.insert(id.to_string(), level + 1);
                }
            }
            if let Some(parent) = style.child("basedOn").and_then(|n| n.val()) {
                based_on.insert(id, parent);
            }
        }

        // Resolve inherited levels, bounded to guard against cycles
        for (&id, _) in based_on.iter() {
            if self.headings.contains_key(id) {
                continue;
            }
            let mut current = id;
            for _ in 0..based_on.len() {
                let Some(&parent) = based_on.get(current) else {
                    break;
                };
                if let Some(&level) = self.headings.get(parent) {
                    self.headings.insert(id.to_string(), level);
                    break;
                }
                current = parent;
            }
        }

        self
    }

    /// Element name for a paragraph style
    pub fn tag_for(&self, style_id: Option<&str>) -> String {
        match style_id.and_then(|id| self.headings.get(id)) {
            Some(level) => format!("h{}", level),
            None => "p".to_string(),
        }
    }

    /// One element per paragraph, in document order
    pub fn convert(&self, body: &XmlNode) -> Vec<RenderedElement> {
        paragraph_nodes(body)
            .into_iter()
            .map(|(id, node)| {
                let style = node.path(&["pPr", "pStyle"]).and_then(|n| n.val());
                RenderedElement::new(id, self.tag_for(style), paragraph_text(node))
            })
            .collect()
    }
}
