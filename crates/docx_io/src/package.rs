//! DOCX package loading
//!
//! Locates the main document, numbering and styles parts and parses each into
//! an `XmlNode` tree for the numbering engine.

use crate::error::{DocxError, DocxResult};
use crate::reader::{parse_tree, DocxReader};
use crate::relationships::{part_dir, rels_path_for, relationship_types, resolve_target, Relationships};
use numbering_model::XmlNode;
use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek};
use std::path::Path;

const DEFAULT_DOCUMENT: &str = "word/document.xml";

/// The parts of a DOCX package that numbering needs
#[derive(Debug, Clone)]
pub struct DocxParts {
    /// The `w:body` element of the main document
    pub body: XmlNode,
    /// Root of the numbering part, if present
    pub numbering: Option<XmlNode>,
    /// Root of the styles part, if present
    pub styles: Option<XmlNode>,
}

impl DocxParts {
    /// Read the parts from a source that implements Read + Seek
    pub fn read<R: Read + Seek>(reader: R) -> DocxResult<Self> {
        let mut docx = DocxReader::new(reader)?;

        if !docx.is_valid_docx() {
            return Err(DocxError::InvalidStructure("Missing [Content_Types].xml".to_string()));
        }

        // Find the main document through the root relationships
        let document_path = match docx.read_optional("_rels/.rels")? {
            Some(content) => Relationships::parse(&content)?
                .get_by_type(relationship_types::DOCUMENT)
                .map(|rel| resolve_target("", &rel.target))
                .unwrap_or_else(|| DEFAULT_DOCUMENT.to_string()),
            None => DEFAULT_DOCUMENT.to_string(),
        };

        let document = parse_tree(&docx.read_file_as_string(&document_path)?)?;
        let body = document
            .children
            .into_iter()
            .find(|n| n.is("body"))
            .ok_or_else(|| DocxError::InvalidStructure(format!("{} has no w:body", document_path)))?;

        let doc_rels = match docx.read_optional(&rels_path_for(&document_path))? {
            Some(content) => Relationships::parse(&content)?,
            None => Relationships::new(),
        };
        let base = part_dir(&document_path);

        let mut read_related = |rel_type: &str, fallback: &str| -> DocxResult<Option<XmlNode>> {
            let path = doc_rels
                .get_by_type(rel_type)
                .map(|rel| resolve_target(base, &rel.target))
                .unwrap_or_else(|| fallback.to_string());
            docx.read_optional(&path)?.map(|content| parse_tree(&content)).transpose()
        };

        let numbering = read_related(relationship_types::NUMBERING, "word/numbering.xml")?;
        let styles = read_related(relationship_types::STYLES, "word/styles.xml")?;

        tracing::debug!(
            document = %document_path,
            has_numbering = numbering.is_some(),
            has_styles = styles.is_some(),
            "Read DOCX parts"
        );

        Ok(Self {
            body,
            numbering,
            styles,
        })
    }
}

/// Import the numbering-relevant parts of a DOCX file on disk
pub fn import_docx(path: &Path) -> DocxResult<DocxParts> {
    let file = File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            DocxError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("File not found: {}", path.display()),
            ))
        } else {
            DocxError::Io(e)
        }
    })?;

    DocxParts::read(BufReader::new(file))
}

/// Import from DOCX bytes in memory
pub fn import_docx_bytes(bytes: &[u8]) -> DocxResult<DocxParts> {
    DocxParts::read(Cursor::new(bytes))
}
