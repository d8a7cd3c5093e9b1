//! Numbering Engine - Resolves document list numbering
//!
//! Reads numbering and style parts, extracts per-paragraph numbering
//! references from the body, assigns actual numbers in document order, and
//! emits element attributes plus an equivalent CSS counter stylesheet.
//!
//! Processing within one document is strictly sequential. Every call to
//! [`SequenceResolver::resolve`] creates its own trackers, so separate
//! documents may be processed on separate threads.

mod error;
mod settings;
pub mod ooxml;
pub mod extractor;
mod tracker;
pub mod resolver;
pub mod emitter;
pub mod attach;
mod pipeline;

pub use error::*;
pub use settings::*;
pub use ooxml::{numbering_definitions, StyleNumberingMap};
pub use extractor::{paragraph_nodes, paragraph_text, ParagraphContextExtractor};
pub use tracker::SequenceTracker;
pub use resolver::{ResolvedDocument, ResolvedParagraph, SequenceResolver};
pub use emitter::{emit_attributes, CounterStylesheet};
pub use attach::{attach, AttachReport, RenderedElement};
pub use pipeline::{NumberingPipeline, PipelineOutput};
