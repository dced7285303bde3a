use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub limits: Limits,
    #[serde(default)]
    pub paths: Paths,
    #[serde(default)]
    pub ocr: Ocr,
    #[serde(default)]
    pub debug: Debug,
    #[serde(default)]
    pub logging: Logging,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config: {}", path.display()))?;
        let cfg: Config = toml::from_str(&raw).with_context(|| "parsing TOML")?;
        Ok(cfg)
    }

    /// Applies the environment-style overrides understood by the upload
    /// pipeline. `lookup` is `std::env::var` in production.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("MAX_ATTACHMENTS") {
            self.limits.max_attachments = parse_int("MAX_ATTACHMENTS", &v)?;
        }
        if let Some(v) = lookup("MAX_ATTACHMENT_SIZE_MB") {
            self.limits.max_attachment_size_mb = parse_int("MAX_ATTACHMENT_SIZE_MB", &v)?;
        }
        if let Some(v) = lookup("MAX_EXTRACTED_TEXT_CHARS") {
            self.limits.max_extracted_text_chars = parse_int("MAX_EXTRACTED_TEXT_CHARS", &v)?;
        }
        if let Some(v) = lookup("OCR_DEBUG_DIR") {
            if !v.trim().is_empty() {
                self.paths.ocr_debug_dir = v.trim().to_string();
            }
        }
        if let Some(v) = lookup("TESSERACT_CMD") {
            self.ocr.tesseract_cmd = v.trim().to_string();
        }
        Ok(())
    }

    pub fn apply_process_env(&mut self) -> Result<()> {
        self.apply_env_overrides(|key| std::env::var(key).ok())
    }

    pub fn ocr_debug_dir(&self) -> PathBuf {
        PathBuf::from(&self.paths.ocr_debug_dir)
    }

    /// Log file for `logging.write_to_file`; an empty `file_path` puts it
    /// next to the debug artifacts.
    pub fn log_file_path(&self) -> Option<PathBuf> {
        if !self.logging.write_to_file {
            return None;
        }
        match self.logging.file_path.trim() {
            "" => Some(self.ocr_debug_dir().join("report-ingest.log")),
            path => Some(PathBuf::from(path)),
        }
    }
}

fn parse_int<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.trim()
        .parse::<T>()
        .with_context(|| format!("{key} must be an integer, got {raw:?}"))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    pub max_attachments: usize,
    pub max_attachment_size_mb: u64,
    pub max_extracted_text_chars: usize,
}
impl Limits {
    pub fn max_attachment_size_bytes(&self) -> u64 {
        self.max_attachment_size_mb.saturating_mul(1024 * 1024)
    }
}
impl Default for Limits {
    fn default() -> Self {
        Self {
            max_attachments: 4,
            max_attachment_size_mb: 8,
            max_extracted_text_chars: 14_000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Paths {
    pub ocr_debug_dir: String,
}
impl Default for Paths {
    fn default() -> Self {
        Self {
            ocr_debug_dir: "chat/data/ocr_debug".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Ocr {
    /// Explicit tesseract executable. Used only when it exists on disk.
    pub tesseract_cmd: String,
    /// Install locations tried, in order, after `tesseract_cmd`.
    pub search_paths: Vec<String>,
    /// Program name resolved through PATH when nothing else matched.
    pub program: String,
    pub language: String,
    /// 0 disables the per-image wall-clock limit.
    pub timeout_seconds: u64,
}
impl Default for Ocr {
    fn default() -> Self {
        Self {
            tesseract_cmd: "".into(),
            search_paths: Vec::new(),
            program: "tesseract".into(),
            language: "eng".into(),
            timeout_seconds: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Debug {
    pub persist_artifacts: bool,
}
impl Default for Debug {
    fn default() -> Self {
        Self {
            persist_artifacts: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Logging {
    pub level: String,
    pub json: bool,
    pub write_to_file: bool,
    pub file_path: String,
}
impl Default for Logging {
    fn default() -> Self {
        Self {
            level: "info".into(),
            json: false,
            write_to_file: false,
            file_path: "".into(),
        }
    }
}
