//! Integration tests for reading DOCX packages and numbering their paragraphs

use docx_io::{import_docx, import_docx_bytes, number_document, DocxError, HtmlWriter};
use numbering_engine::{NumberingSettings, RenderMode};
use numbering_model::DiagnosticKind;
use std::io::{Cursor, Write};
use tempfile::TempDir;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="xml" ContentType="application/xml"/>
</Types>"#;

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>
</Relationships>"#;

const DOCUMENT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/numbering" Target="numbering.xml"/>
  <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>
</Relationships>"#;

const DOCUMENT: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>
    <w:p><w:pPr><w:pStyle w:val="Heading1"/></w:pPr><w:r><w:t>Scope</w:t></w:r></w:p>
    <w:p><w:pPr><w:numPr><w:ilvl w:val="0"/><w:numId w:val="2"/></w:numPr></w:pPr><w:r><w:t>Apples</w:t></w:r></w:p>
    <w:p><w:pPr><w:numPr><w:ilvl w:val="1"/><w:numId w:val="2"/></w:numPr></w:pPr><w:r><w:t>Green</w:t></w:r></w:p>
    <w:p><w:r><w:t>Apples</w:t></w:r></w:p>
    <w:p><w:pPr><w:numPr><w:ilvl w:val="1"/><w:numId w:val="2"/></w:numPr></w:pPr><w:r><w:t>Red</w:t></w:r></w:p>
    <w:p><w:pPr><w:pStyle w:val="Heading1"/></w:pPr><w:r><w:t>Terms</w:t></w:r></w:p>
    <w:p><w:pPr><w:numPr><w:ilvl w:val="0"/><w:numId w:val="3"/></w:numPr></w:pPr><w:r><w:t>Restarted</w:t></w:r></w:p>
    <w:sectPr/>
  </w:body>
</w:document>"#;

const NUMBERING: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:numbering xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:abstractNum w:abstractNumId="0">
    <w:lvl w:ilvl="0"><w:start w:val="1"/><w:numFmt w:val="decimal"/><w:lvlText w:val="%1."/></w:lvl>
  </w:abstractNum>
  <w:abstractNum w:abstractNumId="1">
    <w:lvl w:ilvl="0"><w:start w:val="1"/><w:numFmt w:val="decimal"/><w:lvlText w:val="%1."/>
      <w:pPr><w:ind w:left="720" w:hanging="360"/></w:pPr>
    </w:lvl>
    <w:lvl w:ilvl="1"><w:start w:val="1"/><w:numFmt w:val="lowerLetter"/><w:lvlText w:val="%1.%2"/><w:suff w:val="space"/></w:lvl>
  </w:abstractNum>
  <w:num w:numId="1"><w:abstractNumId w:val="0"/></w:num>
  <w:num w:numId="2"><w:abstractNumId w:val="1"/></w:num>
  <w:num w:numId="3"><w:abstractNumId w:val="1"/>
    <w:lvlOverride w:ilvl="0"><w:startOverride w:val="1"/></w:lvlOverride>
  </w:num>
</w:numbering>"#;

const STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:style w:type="paragraph" w:styleId="Heading1">
    <w:pPr><w:numPr><w:numId w:val="1"/></w:numPr><w:outlineLvl w:val="0"/></w:pPr>
  </w:style>
</w:styles>"#;

fn build_docx(parts: &[(&str, &str)]) -> Vec<u8> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();
    for (name, content) in parts {
        zip.start_file(*name, options).unwrap();
        zip.write_all(content.as_bytes()).unwrap();
    }
    zip.finish().unwrap().into_inner()
}

fn full_docx() -> Vec<u8> {
    build_docx(&[
        ("[Content_Types].xml", CONTENT_TYPES),
        ("_rels/.rels", ROOT_RELS),
        ("word/_rels/document.xml.rels", DOCUMENT_RELS),
        ("word/document.xml", DOCUMENT),
        ("word/numbering.xml", NUMBERING),
        ("word/styles.xml", STYLES),
    ])
}

#[test]
fn test_number_docx_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("numbered.docx");
    std::fs::write(&path, full_docx()).unwrap();

    let parts = import_docx(&path).unwrap();
    assert!(parts.numbering.is_some());
    assert!(parts.styles.is_some());

    let document = number_document(&parts, &NumberingSettings::default()).unwrap();
    let texts: Vec<_> = document
        .elements
        .iter()
        .map(|e| {
            (
                e.tag.as_str(),
                e.numbering.as_ref().map(|n| n.text.as_str()).unwrap_or(""),
                e.text.as_str(),
            )
        })
        .collect();

    assert_eq!(
        texts,
        vec![
            ("h1", "1.", "Scope"),
            ("p", "1.", "Apples"),
            ("p", "1.a", "Green"),
            ("p", "", "Apples"),
            ("p", "1.b", "Red"),
            ("h1", "2.", "Terms"),
            ("p", "1.", "Restarted"),
        ]
    );
    assert_eq!(document.report.attached, 6);
    assert!(document.output.resolved.diagnostics.is_empty());
}

#[test]
fn test_html_output() {
    let parts = import_docx_bytes(&full_docx()).unwrap();
    let settings = NumberingSettings {
        render_mode: RenderMode::Both,
        ..Default::default()
    };
    let document = number_document(&parts, &settings).unwrap();
    let html = HtmlWriter::new(&settings).write(&document.elements, &document.output.stylesheet);

    assert!(html.contains("<span class=\"numbering\">1.a</span> Green</p>"));
    assert!(html.contains("counter-reset: num-1-1 0;"));
    assert!(html.contains("padding-left: 36pt;"));
    assert!(!html.contains("content:"));
}

#[test]
fn test_missing_numbering_part() {
    let bytes = build_docx(&[
        ("[Content_Types].xml", CONTENT_TYPES),
        ("_rels/.rels", ROOT_RELS),
        ("word/document.xml", DOCUMENT),
    ]);

    let parts = import_docx_bytes(&bytes).unwrap();
    assert!(parts.numbering.is_none());

    let document = number_document(&parts, &NumberingSettings::default()).unwrap();
    assert!(document.elements.iter().all(|e| e.numbering.is_none()));
    assert!(document
        .output
        .resolved
        .diagnostics
        .iter()
        .all(|d| matches!(d.kind, DiagnosticKind::UnresolvedNumberingReference { .. })));
    assert_eq!(document.output.resolved.diagnostics.len(), 4);
}

#[test]
fn test_malformed_numbering_is_fatal() {
    let numbering = r#"<w:numbering xmlns:w="urn:w"><w:num w:numId="1"><w:abstractNumId w:val="5"/></w:num></w:numbering>"#;
    let bytes = build_docx(&[
        ("[Content_Types].xml", CONTENT_TYPES),
        ("word/document.xml", DOCUMENT),
        ("word/numbering.xml", numbering),
    ]);

    let parts = import_docx_bytes(&bytes).unwrap();
    let err = number_document(&parts, &NumberingSettings::default()).unwrap_err();
    assert!(matches!(err, DocxError::Engine(_)));
}

#[test]
fn test_invalid_packages() {
    assert!(matches!(import_docx_bytes(b"not a zip"), Err(DocxError::Zip(_))));

    let no_types = build_docx(&[("word/document.xml", DOCUMENT)]);
    assert!(matches!(import_docx_bytes(&no_types), Err(DocxError::InvalidStructure(_))));

    let no_document = build_docx(&[("[Content_Types].xml", CONTENT_TYPES)]);
    assert!(matches!(import_docx_bytes(&no_document), Err(DocxError::MissingPart(_))));

    let dir = TempDir::new().unwrap();
    assert!(matches!(import_docx(&dir.path().join("absent.docx")), Err(DocxError::Io(_))));
}
