use super::DecodeError;
use std::io::{Cursor, Read};
use zip::ZipArchive;

const WORD_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const DOCUMENT_PART: &str = "word/document.xml";

/// Paragraph text from the main document part: runs concatenated inside a
/// paragraph, one line per paragraph, text-less paragraphs skipped.
pub fn extract(bytes: &[u8]) -> Result<String, DecodeError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;
    let mut xml = String::new();
    archive.by_name(DOCUMENT_PART)?.read_to_string(&mut xml)?;
    paragraphs_from_xml(&xml)
}

pub fn paragraphs_from_xml(xml: &str) -> Result<String, DecodeError> {
    let doc = roxmltree::Document::parse(xml)?;
    let paragraphs: Vec<String> = doc
        .descendants()
        .filter(|n| n.has_tag_name((WORD_NS, "p")))
        .map(|p| {
            p.descendants()
                .filter(|n| n.has_tag_name((WORD_NS, "t")))
                .filter_map(|t| t.text())
                .collect::<String>()
        })
        .filter(|text| !text.is_empty())
        .collect();
    Ok(paragraphs.join("\n"))
}
