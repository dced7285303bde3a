use serde::{Deserialize, Serialize};

/// Strategy that produced an outcome's text, or the reason none was produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Extractor {
    PlainText,
    JsonParse,
    DocxXml,
    PdfNative,
    TesseractLocal,
    Error,
    /// Placeholder for artifacts naming an extractor this build doesn't know.
    #[default]
    #[serde(other)]
    Unknown,
}

impl Extractor {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PlainText => "plain_text",
            Self::JsonParse => "json_parse",
            Self::DocxXml => "docx_xml",
            Self::PdfNative => "pdf_native",
            Self::TesseractLocal => "tesseract_local",
            Self::Error => "error",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for Extractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionOutcome {
    pub name: String,
    #[serde(rename = "extractor")]
    pub extractor_used: Extractor,
    #[serde(rename = "chars")]
    pub char_count: usize,
    #[serde(rename = "text")]
    pub normalized_text: String,
    /// SHA-256 of the raw upload, absent when it could not be read.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha256: Option<String>,
}

impl ExtractionOutcome {
    pub fn failed(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            extractor_used: Extractor::Error,
            char_count: 0,
            normalized_text: String::new(),
            sha256: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentText {
    pub name: String,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchResult {
    pub accepted: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
    pub used_file_names: Vec<String>,
    pub non_empty_documents: Vec<DocumentText>,
    pub all_outcomes: Vec<ExtractionOutcome>,
    pub warnings: Vec<String>,
}

impl BatchResult {
    pub fn accepted() -> Self {
        Self {
            accepted: true,
            ..Default::default()
        }
    }

    pub fn rejected(reason: impl Into<String>) -> Self {
        Self {
            accepted: false,
            rejection_reason: Some(reason.into()),
            ..Default::default()
        }
    }

    pub fn push(&mut self, outcome: ExtractionOutcome) {
        self.used_file_names.push(outcome.name.clone());
        if !outcome.normalized_text.is_empty() {
            self.non_empty_documents.push(DocumentText {
                name: outcome.name.clone(),
                text: outcome.normalized_text.clone(),
            });
        }
        self.all_outcomes.push(outcome);
    }

    /// Every readable document as `FILE: <name>` followed by its text,
    /// separated by blank lines. Empty when nothing was readable.
    pub fn combined_text(&self) -> String {
        self.non_empty_documents
            .iter()
            .map(|doc| format!("FILE: {}\n{}", doc.name, doc.text))
            .collect::<Vec<_>>()
            .join("\n\n")
            .trim()
            .to_string()
    }
}
