use crate::{
    config::Config,
    decoders::{self, Decoded},
    engine::OcrEngine,
    postprocess,
    report::{BatchResult, ExtractionOutcome, Extractor},
    upload::{FileKind, UploadedFile},
    util::sha256_hex,
    validate::{self, Admission, BatchRejected},
};
use std::io::{Read, Seek};
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Turns a batch of uploads into a [`BatchResult`]. Files are processed
/// strictly in submission order; one file failing never stops the others.
pub struct Pipeline<E: OcrEngine> {
    cfg: Config,
    engine: E,
}

impl<E: OcrEngine> Pipeline<E> {
    pub fn new(cfg: &Config, engine: E) -> Self {
        Self {
            cfg: cfg.clone(),
            engine,
        }
    }

    /// Validates the whole batch, then extracts every file. Only batch-level
    /// rejection is an error; per-file problems become warnings.
    pub fn run<R: Read + Seek>(
        &self,
        files: &mut [UploadedFile<R>],
    ) -> Result<BatchResult, BatchRejected> {
        let started = Instant::now();
        let admitted = validate::admit(&self.cfg.limits, files)?;
        info!("batch files={}", files.len());

        let mut result = BatchResult::accepted();
        for (file, admission) in files.iter_mut().zip(admitted) {
            let outcome = self.extract_one(file, &admission, &mut result.warnings);
            debug!(
                "file name={} extractor={} chars={}",
                outcome.name, outcome.extractor_used, outcome.char_count
            );
            result.push(outcome);
        }

        info!(
            "batch done files={} documents={} warnings={} elapsed_ms={}",
            result.all_outcomes.len(),
            result.non_empty_documents.len(),
            result.warnings.len(),
            started.elapsed().as_millis()
        );
        Ok(result)
    }

    /// Like [`Pipeline::run`], with a rejection folded into the result as
    /// `accepted = false`.
    pub fn extract_batch<R: Read + Seek>(&self, files: &mut [UploadedFile<R>]) -> BatchResult {
        match self.run(files) {
            Ok(result) => result,
            Err(rejected) => {
                warn!("batch rejected: {rejected}");
                BatchResult::rejected(rejected.to_string())
            }
        }
    }

    fn extract_one<R: Read + Seek>(
        &self,
        file: &mut UploadedFile<R>,
        admission: &Admission,
        warnings: &mut Vec<String>,
    ) -> ExtractionOutcome {
        let name = admission.name.clone();
        let bytes = match file.read_all() {
            Ok(bytes) => bytes,
            Err(err) => {
                warn!("reading upload {name}: {err}");
                warnings.push(format!("Could not process '{name}': IOError."));
                return ExtractionOutcome::failed(name);
            }
        };
        let sha256 = Some(sha256_hex(&bytes));

        let engine: &dyn OcrEngine = &self.engine;
        let decoded = panic::catch_unwind(AssertUnwindSafe(|| {
            decoders::decode(admission.kind, &bytes, engine)
        }));

        let (extractor_used, text) = match decoded {
            Ok(Ok(decoded)) => {
                if let Some(w) = empty_result_warning(admission.kind, &name, &decoded) {
                    warnings.push(w);
                }
                (decoders::extractor_for(admission.kind), decoded.text)
            }
            Ok(Err(err)) => {
                warn!("decoding {name} failed: {err}");
                warnings.push(format!("Could not process '{name}': {}.", err.category()));
                (Extractor::Error, String::new())
            }
            Err(_) => {
                warn!("decoder panicked on {name}");
                warnings.push(format!("Could not process '{name}': DecoderPanic."));
                (Extractor::Error, String::new())
            }
        };

        let normalized_text = postprocess::normalize(&text, self.cfg.limits.max_extracted_text_chars);
        ExtractionOutcome {
            name,
            extractor_used,
            char_count: normalized_text.chars().count(),
            normalized_text,
            sha256,
        }
    }
}

/// Only the optional-capability formats warn about coming back empty.
fn empty_result_warning(kind: FileKind, name: &str, decoded: &Decoded) -> Option<String> {
    if !decoded.text.trim().is_empty() {
        return None;
    }
    match (kind, decoded.available) {
        (FileKind::Pdf, false) => Some(format!(
            "Could not extract text from '{name}'. PDF support is not available; upload a text-based file."
        )),
        (FileKind::Pdf, true) => Some(format!(
            "Could not extract text from '{name}'. Upload a text-based file."
        )),
        (FileKind::Image, false) => Some(format!(
            "Could not OCR '{name}'. Install or configure tesseract (TESSERACT_CMD)."
        )),
        (FileKind::Image, true) => Some(format!(
            "Could not OCR '{name}'. No readable text was recognized."
        )),
        _ => None,
    }
}
