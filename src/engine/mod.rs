pub mod tesseract;
pub mod types;

pub use types::{OcrDiag, OcrError};

/// External OCR capability. Implementations absorb their own process and I/O
/// failures into `OcrError`; nothing here may panic on bad input.
pub trait OcrEngine {
    fn doctor(&self) -> OcrDiag;
    fn recognize(&self, image: &[u8]) -> Result<String, OcrError>;
}
