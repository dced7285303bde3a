use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{Cursor, Read, Seek, SeekFrom};
use std::path::Path;

pub const ALLOWED_EXTENSIONS: &[&str] = &[
    "txt", "csv", "json", "pdf", "docx", "png", "jpg", "jpeg", "webp",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileKind {
    Text,
    Json,
    Docx,
    Pdf,
    Image,
}

impl FileKind {
    /// Classifies a file by the final suffix of its name. `None` means the
    /// extension is not on the allow-list.
    pub fn from_name(name: &str) -> Option<Self> {
        let ext = Path::new(name)
            .extension()
            .and_then(|s| s.to_str())?
            .to_ascii_lowercase();
        match ext.as_str() {
            "txt" | "csv" => Some(Self::Text),
            "json" => Some(Self::Json),
            "docx" => Some(Self::Docx),
            "pdf" => Some(Self::Pdf),
            "png" | "jpg" | "jpeg" | "webp" => Some(Self::Image),
            _ => None,
        }
    }
}

/// A caller-owned upload. The pipeline only reads `content` and always puts
/// the read position back where it found it.
#[derive(Debug)]
pub struct UploadedFile<R> {
    pub name: String,
    pub declared_size: Option<u64>,
    pub content: R,
}

impl<R: Read + Seek> UploadedFile<R> {
    pub fn new(name: impl Into<String>, declared_size: Option<u64>, content: R) -> Self {
        Self {
            name: name.into(),
            declared_size,
            content,
        }
    }

    /// Trimmed name, or `file` when the upload came without one.
    pub fn display_name(&self) -> String {
        let trimmed = self.name.trim();
        if trimmed.is_empty() {
            "file".to_string()
        } else {
            trimmed.to_string()
        }
    }

    pub fn read_all(&mut self) -> std::io::Result<Vec<u8>> {
        let start = self.content.stream_position()?;
        let mut buf = Vec::new();
        let read = self.content.read_to_end(&mut buf);
        self.content.seek(SeekFrom::Start(start))?;
        read?;
        Ok(buf)
    }
}

impl UploadedFile<Cursor<Vec<u8>>> {
    pub fn from_bytes(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let size = bytes.len() as u64;
        Self::new(name, Some(size), Cursor::new(bytes))
    }
}

impl UploadedFile<File> {
    pub fn open(path: &Path) -> Result<Self> {
        let file =
            File::open(path).with_context(|| format!("open upload: {}", path.display()))?;
        let size = file
            .metadata()
            .with_context(|| format!("stat upload: {}", path.display()))?
            .len();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self::new(name, Some(size), file))
    }
}
