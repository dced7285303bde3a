use super::{Decoded, DecodeError};

/// Whether this build carries the native PDF text reader.
pub const fn is_available() -> bool {
    cfg!(feature = "pdf")
}

#[cfg(feature = "pdf")]
pub fn extract(bytes: &[u8]) -> Result<Decoded, DecodeError> {
    use tracing::debug;

    let doc = lopdf::Document::load_mem(bytes).map_err(|e| DecodeError::Pdf(e.to_string()))?;
    let mut pages = Vec::new();
    // get_pages is keyed by page number, so iteration is in reading order.
    for page_number in doc.get_pages().keys() {
        match doc.extract_text(&[*page_number]) {
            Ok(text) => pages.push(text),
            Err(err) => debug!("skipping pdf page {page_number}: {err}"),
        }
    }
    Ok(Decoded::text(pages.join("\n")))
}

#[cfg(not(feature = "pdf"))]
pub fn extract(_bytes: &[u8]) -> Result<Decoded, DecodeError> {
    Ok(Decoded::unavailable())
}
