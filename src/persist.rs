use crate::{
    report::{BatchResult, ExtractionOutcome},
    util::{ensure_dir, now_rfc3339, unique_timestamp},
};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// On-disk audit record of one extraction run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebugArtifact {
    pub session_id: String,
    pub user_id: String,
    pub created_at: String,
    pub warnings: Vec<String>,
    pub files: Vec<ExtractionOutcome>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DebugPaths {
    pub json: PathBuf,
    pub text: PathBuf,
}

/// Writes `session{sid}_user{uid}_{stamp}.json` and the matching `.txt`
/// rendering into `dir`, creating it if needed. The artifact keeps the ids
/// verbatim; only the file name is sanitized.
pub fn persist_debug_output(
    dir: &Path,
    session_id: &str,
    user_id: &str,
    result: &BatchResult,
) -> Result<DebugPaths> {
    ensure_dir(dir)?;
    let base = format!(
        "session{}_user{}_{}",
        file_component(session_id),
        file_component(user_id),
        unique_timestamp()?
    );
    let paths = DebugPaths {
        json: dir.join(format!("{base}.json")),
        text: dir.join(format!("{base}.txt")),
    };

    let artifact = DebugArtifact {
        session_id: session_id.to_string(),
        user_id: user_id.to_string(),
        created_at: now_rfc3339(),
        warnings: result.warnings.clone(),
        files: result.all_outcomes.clone(),
    };

    std::fs::write(&paths.json, serde_json::to_string_pretty(&artifact)?)
        .with_context(|| format!("write {}", paths.json.display()))?;
    std::fs::write(&paths.text, render_text(&artifact.files, &artifact.warnings))
        .with_context(|| format!("write {}", paths.text.display()))?;

    info!(
        "debug artifacts json={} text={}",
        paths.json.display(),
        paths.text.display()
    );
    Ok(paths)
}

/// Path separators and control characters become `_`, so the name stays in `dir`.
fn file_component(id: &str) -> String {
    id.chars()
        .map(|c| match c {
            '/' | '\\' | ':' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}

/// Never fails: a write problem is logged and reported as `None`.
pub fn persist_best_effort(
    dir: &Path,
    session_id: &str,
    user_id: &str,
    result: &BatchResult,
) -> Option<DebugPaths> {
    match persist_debug_output(dir, session_id, user_id, result) {
        Ok(paths) => Some(paths),
        Err(err) => {
            warn!("persisting debug output failed: {err:#}");
            None
        }
    }
}

pub fn render_text(files: &[ExtractionOutcome], warnings: &[String]) -> String {
    let rule = "-".repeat(80);
    let mut chunks: Vec<String> = files
        .iter()
        .map(|f| {
            let body = if f.normalized_text.is_empty() {
                "(empty)"
            } else {
                f.normalized_text.as_str()
            };
            [
                format!("FILE: {}", f.name),
                format!("EXTRACTOR: {}", f.extractor_used),
                format!("CHARS: {}", f.char_count),
                "TEXT:".to_string(),
                body.to_string(),
                rule.clone(),
            ]
            .join("\n")
        })
        .collect();

    if !warnings.is_empty() {
        chunks.push(format!("WARNINGS:\n{}", warnings.join("\n")));
    }
    chunks.join("\n\n")
}
