//! Numbering Model - Value types for document list numbering
//!
//! This crate provides the data side of numbering resolution: the parsed XML
//! node tree handed over by the container reader, abstract numbering
//! definitions and their concrete instances, the definition store that applies
//! level overrides, paragraph numbering contexts, and the format renderer that
//! turns resolved counters into number text.

mod error;
mod ids;
mod xml_node;
pub mod format;
pub mod level;
pub mod definition;
mod paragraph;
pub mod render;
mod diagnostic;

pub use error::*;
pub use ids::*;
pub use xml_node::*;
pub use format::{FormatRangeViolation, NumberFormat};
pub use level::*;
pub use definition::*;
pub use paragraph::*;
pub use render::{render, LevelSnapshot, RenderTarget, Rendered, TrackerSnapshot};
pub use diagnostic::*;

/// Number of list levels supported by the format (0-8)
pub const MAX_LEVELS: usize = 9;
