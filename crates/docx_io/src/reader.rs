//! ZIP archive reading and XML tree building

use crate::error::{DocxError, DocxResult};
use numbering_model::XmlNode;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::io::{Read, Seek};
use zip::ZipArchive;

/// A wrapper around a ZIP archive for reading DOCX files
pub struct DocxReader<R: Read + Seek> {
    archive: ZipArchive<R>,
}

impl<R: Read + Seek> DocxReader<R> {
    /// Create a new DOCX reader from a source that implements Read + Seek
    pub fn new(reader: R) -> DocxResult<Self> {
        let archive = ZipArchive::new(reader)?;
        Ok(Self { archive })
    }

    /// Read a file from the archive as a string
    pub fn read_file_as_string(&mut self, path: &str) -> DocxResult<String> {
        let mut file = self.archive.by_name(path).map_err(|e| {
            if matches!(e, zip::result::ZipError::FileNotFound) {
                DocxError::MissingPart(path.to_string())
            } else {
                DocxError::from(e)
            }
        })?;

        let mut contents = String::new();
        file.read_to_string(&mut contents)?;
        Ok(contents)
    }

    /// Read a part if it exists
    pub fn read_optional(&mut self, path: &str) -> DocxResult<Option<String>> {
        if self.file_exists(path) {
            self.read_file_as_string(path).map(Some)
        } else {
            Ok(None)
        }
    }

    /// Check if a file exists in the archive
    pub fn file_exists(&self, path: &str) -> bool {
        self.archive.file_names().any(|name| name == path)
    }

    /// Check if this is a valid DOCX file
    pub fn is_valid_docx(&self) -> bool {
        // Must have [Content_Types].xml and a main document
        self.file_exists("[Content_Types].xml")
    }
}

/// XML reader utilities for parsing DOCX XML content
pub struct XmlParser;

impl XmlParser {
    /// Create a new XML reader from a string.
    ///
    /// Text is not trimmed: `w:t` content may carry significant spaces.
    pub fn from_string(content: &str) -> Reader<&[u8]> {
        let mut reader = Reader::from_str(content);
        reader.config_mut().trim_text(false);
        reader
    }

    /// Get an attribute value from an event
    pub fn get_attribute(event: &BytesStart, name: &[u8]) -> Option<String> {
        event
            .attributes()
            .filter_map(|a| a.ok())
            .find(|a| a.key.as_ref() == name)
            .map(|a| String::from_utf8_lossy(&a.value).to_string())
    }

    /// Check if an element name matches with optional namespace prefix
    pub fn matches_element(name: &[u8], expected: &str) -> bool {
        let name_str = std::str::from_utf8(name).unwrap_or("");
        name_str == expected || name_str.ends_with(&format!(":{}", expected))
    }

    /// Build a node (without children) from a start or empty tag
    fn node_from(event: &BytesStart) -> DocxResult<XmlNode> {
        let mut node = XmlNode::new(String::from_utf8_lossy(event.name().as_ref()).to_string());
        for attr in event.attributes() {
            let attr = attr?;
            let value = attr.unescape_value()?;
            node.attributes
                .push((String::from_utf8_lossy(attr.key.as_ref()).to_string(), value.to_string()));
        }
        Ok(node)
    }
}

/// Parse an XML part into a node tree and return its root element
pub fn parse_tree(content: &str) -> DocxResult<XmlNode> {
    let mut reader = XmlParser::from_string(content);
    let mut buf = Vec::new();
    let mut stack: Vec<XmlNode> = Vec::new();
    let mut root: Option<XmlNode> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => stack.push(XmlParser::node_from(e)?),
            Ok(Event::Empty(ref e)) => {
                let node = XmlParser::node_from(e)?;
                append(&mut stack, &mut root, node)?;
            }
            Ok(Event::End(_)) => {
                let node = stack
                    .pop()
                    .ok_or_else(|| DocxError::XmlParse("Unexpected closing tag".into()))?;
                append(&mut stack, &mut root, node)?;
            }
            Ok(Event::Text(ref e)) => {
                if let Some(current) = stack.last_mut() {
                    let text = e.unescape().map_err(|e| DocxError::XmlParse(e.to_string()))?;
                    current.text.push_str(&text);
                }
            }
            Ok(Event::CData(e)) => {
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&String::from_utf8_lossy(&e.into_inner()));
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(DocxError::from(e)),
            _ => {}
        }
        buf.clear();
    }

    if let Some(open) = stack.last() {
        return Err(DocxError::XmlParse(format!("Unclosed element <{}>", open.name)));
    }
    root.ok_or_else(|| DocxError::XmlParse("No root element".into()))
}

fn append(stack: &mut [XmlNode], root: &mut Option<XmlNode>, node: XmlNode) -> DocxResult<()> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None if root.is_none() => *root = Some(node),
        None => return Err(DocxError::XmlParse("Multiple root elements".into())),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_element() {
        assert!(XmlParser::matches_element(b"p", "p"));
        assert!(XmlParser::matches_element(b"w:p", "p"));
        assert!(!XmlParser::matches_element(b"w:r", "p"));
    }

    #[test]
    fn test_parse_tree() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<w:document xmlns:w="urn:w"><w:body>
  <w:p><w:pPr><w:numPr><w:ilvl w:val="1"/><w:numId w:val="3"/></w:numPr></w:pPr>
  <w:r><w:t xml:space="preserve"> Fish &amp; chips</w:t></w:r></w:p>
</w:body></w:document>"#;

        let root = parse_tree(xml).unwrap();
        assert_eq!(root.name, "w:document");
        let body = root.child("body").unwrap();
        let p = body.child("p").unwrap();

        assert_eq!(p.path(&["pPr", "numPr", "numId"]).and_then(|n| n.val()), Some("3"));
        assert_eq!(p.path(&["r", "t"]).unwrap().text, " Fish & chips");
        assert_eq!(p.path(&["r", "t"]).unwrap().attr("space"), Some("preserve"));
    }

    #[test]
    fn test_parse_tree_errors() {
        assert!(matches!(parse_tree(""), Err(DocxError::XmlParse(_))));
        assert!(matches!(parse_tree("<a><b></b>"), Err(DocxError::XmlParse(_))));
        assert!(parse_tree("<a></b>").is_err());
    }
}
