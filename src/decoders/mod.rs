//! Per-format text extraction.
//!
//! Every decoder maps raw bytes to text and reports whether its capability
//! was present. Optional capabilities (PDF support, the OCR engine) report
//! `available = false` instead of failing; structural problems in the input
//! come back as a [`DecodeError`].

pub mod docx;
pub mod json;
pub mod pdf;
pub mod text;

use crate::{engine::OcrEngine, report::Extractor, upload::FileKind};
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    pub text: String,
    pub available: bool,
}

impl Decoded {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            available: true,
        }
    }

    pub fn unavailable() -> Self {
        Self {
            text: String::new(),
            available: false,
        }
    }
}

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unreadable archive: {0}")]
    Archive(#[from] zip::result::ZipError),
    #[error("malformed XML: {0}")]
    Xml(#[from] roxmltree::Error),
    #[error("unreadable PDF: {0}")]
    Pdf(String),
    #[error("I/O: {0}")]
    Io(#[from] std::io::Error),
}

impl DecodeError {
    /// Short, stable failure class used in per-file warnings.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Json(_) => "JSONDecodeError",
            Self::Archive(_) => "BadZipFile",
            Self::Xml(_) => "ParseError",
            Self::Pdf(_) => "PdfReadError",
            Self::Io(_) => "IOError",
        }
    }
}

pub fn extractor_for(kind: FileKind) -> Extractor {
    match kind {
        FileKind::Text => Extractor::PlainText,
        FileKind::Json => Extractor::JsonParse,
        FileKind::Docx => Extractor::DocxXml,
        FileKind::Pdf => Extractor::PdfNative,
        FileKind::Image => Extractor::TesseractLocal,
    }
}

/// Routes by file kind alone; no content sniffing.
pub fn decode(kind: FileKind, bytes: &[u8], ocr: &dyn OcrEngine) -> Result<Decoded, DecodeError> {
    match kind {
        FileKind::Text => Ok(Decoded::text(text::decode_lenient(bytes))),
        FileKind::Json => json::extract(bytes).map(Decoded::text),
        FileKind::Docx => docx::extract(bytes).map(Decoded::text),
        FileKind::Pdf => pdf::extract(bytes),
        FileKind::Image => Ok(ocr_image(ocr, bytes)),
    }
}

fn ocr_image(ocr: &dyn OcrEngine, bytes: &[u8]) -> Decoded {
    match ocr.recognize(bytes) {
        Ok(text) => Decoded::text(text),
        Err(err) if err.is_unavailable() => {
            warn!("ocr unavailable: {err}");
            Decoded::unavailable()
        }
        Err(err) => {
            warn!("ocr failed: {err}");
            Decoded::text(String::new())
        }
    }
}
