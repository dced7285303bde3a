use encoding_rs::{Encoding, UTF_16BE, UTF_16LE};

/// Decodes text bytes trying UTF-8, then BOM-marked UTF-16, then Latin-1.
/// Latin-1 maps every byte to a char, so this never fails and only returns
/// an empty string for empty input.
pub fn decode_lenient(bytes: &[u8]) -> String {
    decode_utf8(bytes)
        .or_else(|| decode_utf16(bytes))
        .unwrap_or_else(|| decode_latin1(bytes))
}

fn decode_utf8(bytes: &[u8]) -> Option<String> {
    let body = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    std::str::from_utf8(body).ok().map(str::to_owned)
}

fn decode_utf16(bytes: &[u8]) -> Option<String> {
    let (encoding, bom_len) = Encoding::for_bom(bytes)?;
    if encoding != UTF_16LE && encoding != UTF_16BE {
        return None;
    }
    encoding
        .decode_without_bom_handling_and_without_replacement(&bytes[bom_len..])
        .map(|cow| cow.into_owned())
}

fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}
