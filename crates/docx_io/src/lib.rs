//! DOCX IO - Reads numbering-relevant DOCX parts and writes numbered HTML
//!
//! A DOCX file is a ZIP archive of XML parts. This crate locates the main
//! document, numbering and styles parts through their relationships, parses
//! them into `XmlNode` trees, converts paragraphs to block elements, and
//! writes the elements with their resolved numbering as HTML.

mod error;
mod reader;
mod relationships;
mod package;
mod convert;
mod html;

pub use error::{DocxError, DocxResult};
pub use reader::{parse_tree, DocxReader};
pub use relationships::{relationship_types, Relationship, Relationships};
pub use package::{import_docx, import_docx_bytes, DocxParts};
pub use convert::{number_document, BaseConverter, NumberedDocument};
pub use html::HtmlWriter;
