//! End-to-end numbering of one document

use crate::emitter::CounterStylesheet;
use crate::extractor::ParagraphContextExtractor;
use crate::ooxml::{numbering_definitions, StyleNumberingMap};
use crate::resolver::{ResolvedDocument, SequenceResolver};
use crate::settings::{NumberingSettings, RenderMode};
use crate::Result;
use numbering_model::{DefinitionStore, XmlNode};

/// Everything produced for one document
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub store: DefinitionStore,
    pub resolved: ResolvedDocument,
    /// Complete counter stylesheet; apply `for_mode` for embedding
    pub stylesheet: CounterStylesheet,
}

/// Runs definition loading, extraction, resolution and stylesheet emission
#[derive(Debug, Clone, Default)]
pub struct NumberingPipeline {
    settings: NumberingSettings,
}

impl NumberingPipeline {
    pub fn new(settings: NumberingSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &NumberingSettings {
        &self.settings
    }

    /// Number the paragraphs of `body`.
    ///
    /// A missing numbering part yields an empty store, so every numbered
    /// paragraph is reported unresolved. In counter mode, instances that share
    /// CSS counters are reported too. Fails only when the numbering part holds
    /// malformed definitions.
    pub fn run(&self, body: &XmlNode, numbering: Option<&XmlNode>, styles: Option<&XmlNode>) -> Result<PipelineOutput> {
        let store = match numbering {
            Some(part) => DefinitionStore::load(numbering_definitions(part))?,
            None => DefinitionStore::empty(),
        };

        let style_map = styles.map(StyleNumberingMap::from_styles_part).unwrap_or_default();
        let mut extractor = ParagraphContextExtractor::new();
        if !style_map.is_empty() {
            extractor = extractor.with_styles(&style_map);
        }
        let contexts = extractor.extract(body);

        let mut resolved = SequenceResolver::new()
            .with_default_bullet(self.settings.default_bullet.clone())
            .resolve(&contexts, &store);
        let stylesheet = CounterStylesheet::build(&store, &resolved, &self.settings);
        if self.settings.render_mode == RenderMode::Counter {
            for diagnostic in stylesheet.shared_counters() {
                resolved.diagnostics.push(diagnostic.paragraph, diagnostic.kind.clone());
            }
        }

        Ok(PipelineOutput {
            store,
            resolved,
            stylesheet,
        })
    }
}
