use super::{text::decode_lenient, DecodeError};

/// Parses the document and re-emits it pretty-printed. Key order and the
/// exact digits of every number are kept.
pub fn extract(bytes: &[u8]) -> Result<String, DecodeError> {
    let raw = decode_lenient(bytes);
    let value: serde_json::Value = serde_json::from_str(&raw)?;
    Ok(serde_json::to_string_pretty(&value)?)
}
